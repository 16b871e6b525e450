use thiserror::Error;

/// Characters that satisfy the "special character" rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PasswordError {
    #[error("Password must be at least 8 characters long")]
    TooShort,
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,
    #[error("Password must contain at least one number")]
    MissingDigit,
    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

/// Which sign-up password rules a candidate satisfies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordStrength {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub number: bool,
    pub special: bool,
}

impl PasswordStrength {
    #[must_use]
    pub fn evaluate(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LEN,
            uppercase: password.chars().any(|ch| ch.is_ascii_uppercase()),
            lowercase: password.chars().any(|ch| ch.is_ascii_lowercase()),
            number: password.chars().any(|ch| ch.is_ascii_digit()),
            special: password.chars().any(|ch| SPECIAL_CHARACTERS.contains(ch)),
        }
    }

    #[must_use]
    pub fn is_strong(&self) -> bool {
        self.first_failure().is_none()
    }

    /// First unmet rule, in the order the sign-up form lists them.
    #[must_use]
    pub fn first_failure(&self) -> Option<PasswordError> {
        if !self.length {
            Some(PasswordError::TooShort)
        } else if !self.uppercase {
            Some(PasswordError::MissingUppercase)
        } else if !self.lowercase {
            Some(PasswordError::MissingLowercase)
        } else if !self.number {
            Some(PasswordError::MissingDigit)
        } else if !self.special {
            Some(PasswordError::MissingSpecial)
        } else {
            None
        }
    }
}

/// # Errors
///
/// Returns the first `PasswordError` rule the password breaks.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    match PasswordStrength::evaluate(password).first_failure() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
