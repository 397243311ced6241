//! Authentication for Mastodon-compatible instances.
//!
//! Only pre-issued OAuth bearer tokens are supported; without one the client
//! runs read-only against public endpoints.

pub mod credentials;

use thiserror::Error;

use credentials::CredentialSet;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("an access token is required; set KRONK_ACCESS_TOKEN")]
    MissingToken,
}

#[derive(Debug, Clone, Default)]
pub struct AuthProvider {
    pub credentials: CredentialSet,
}

impl AuthProvider {
    pub fn new(credentials: CredentialSet) -> Self {
        Self { credentials }
    }

    pub fn signed_in(&self) -> bool {
        self.credentials.signed_in()
    }

    /// `Bearer <token>` for the configured token, if any.
    pub fn bearer_header(&self) -> Option<String> {
        self.credentials
            .access_token
            .as_ref()
            .map(|t| format!("Bearer {t}"))
    }

    /// Like [`bearer_header`](Self::bearer_header) but for endpoints that
    /// refuse anonymous access.
    pub fn require_bearer_header(&self) -> Result<String, AuthError> {
        self.bearer_header().ok_or(AuthError::MissingToken)
    }
}
