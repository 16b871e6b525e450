use thiserror::Error;
use url::Url;

use crate::model::QuizId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShareLinkError {
    #[error("invalid share origin: {0}")]
    InvalidOrigin(String),
}

/// Builds `<origin>/quiz/shared/<uuid>`.
///
/// Any path or query on `origin` is discarded.
///
/// # Errors
///
/// Returns `ShareLinkError::InvalidOrigin` when `origin` is not an absolute URL.
pub fn share_link(origin: &str, id: QuizId) -> Result<String, ShareLinkError> {
    let base = Url::parse(origin.trim())
        .map_err(|_| ShareLinkError::InvalidOrigin(origin.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(ShareLinkError::InvalidOrigin(origin.to_string()));
    }
    let link = base
        .join(&format!("/quiz/shared/{id}"))
        .map_err(|_| ShareLinkError::InvalidOrigin(origin.to_string()))?;
    Ok(link.to_string())
}

/// Extracts the quiz id from a share link or a bare id.
#[must_use]
pub fn parse_share_target(raw: &str) -> Option<QuizId> {
    let trimmed = raw.trim().trim_end_matches('/');
    let candidate = trimmed.rsplit('/').next().unwrap_or(trimmed);
    candidate.parse().ok()
}
