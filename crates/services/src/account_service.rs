use std::sync::Arc;

use tracing::info;

use quiz_core::ValidationError;
use quiz_core::password::validate_password;

use crate::api::{AccountApi, LoginRequest, RegisterRequest};
use crate::auth::AuthContext;
use crate::error::AccountError;

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Sign-in, sign-up and sign-out.
#[derive(Clone)]
pub struct AccountService {
    api: Arc<dyn AccountApi>,
    auth: AuthContext,
}

impl AccountService {
    #[must_use]
    pub fn new(api: Arc<dyn AccountApi>, auth: AuthContext) -> Self {
        Self { api, auth }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Exchanges credentials for a token and stores it.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` for blank fields, `AccountError::Api`
    /// when the backend rejects the credentials and `AccountError::Storage`
    /// when the token cannot be stored.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AccountError> {
        let request = LoginRequest {
            email: required(email, "email")?,
            password: required(password, "password")?,
        };
        let token = self.api.login(&request).await?;
        self.auth.establish(token).await?;
        info!("signed in");
        Ok(())
    }

    /// Registers a new account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` for blank fields or a weak password
    /// (checked before contacting the backend) and `AccountError::Api` when
    /// the backend rejects the registration.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<(), AccountError> {
        let name = required(name, "name")?;
        let email = required(email, "email")?;
        if password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }
        validate_password(password).map_err(ValidationError::from)?;
        let request = RegisterRequest {
            name,
            email,
            password: password.to_string(),
        };
        self.api.register(&request).await?;
        info!("account registered");
        Ok(())
    }

    pub async fn sign_out(&self) {
        self.auth.invalidate().await;
        info!("signed out");
    }
}
