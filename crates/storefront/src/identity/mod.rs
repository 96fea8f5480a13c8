//! Hosted identity service access and session projection.
//!
//! The identity service owns accounts and credentials; this module wraps
//! its REST API ([`IdentityClient`]) and projects provider sessions into
//! the internal [`User`](crate::models::User) shape
//! ([`session::SessionAdapter`]), merging in the mirrored profile fields
//! the provider does not hold.

mod client;
pub mod session;

pub use client::IdentityClient;
pub use session::{AuthWatcher, SessionAdapter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bakehouse_core::{Email, UserId};

/// Errors from the identity service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP transport failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The identity service rejected the request. `code` is the
    /// service's error code, e.g. `EMAIL_EXISTS`.
    #[error("identity error ({status}): {code}")]
    Api { status: u16, code: String },

    /// The response body did not decode.
    #[error("decode error: {0}")]
    Decode(String),
}

impl AuthError {
    /// The message shown to the user. Known service codes get a friendly
    /// phrasing; everything else degrades to a generic retry message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { code, .. } => match code.as_str() {
                "EMAIL_EXISTS" => "An account with this email already exists.".to_string(),
                "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                    "Invalid email or password.".to_string()
                }
                "WEAK_PASSWORD" => "Please choose a stronger password.".to_string(),
                "TOO_MANY_ATTEMPTS_TRY_LATER" => {
                    "Too many attempts. Please try again later.".to_string()
                }
                _ => "Sign-in failed. Please try again.".to_string(),
            },
            Self::Http(_) | Self::Decode(_) => {
                "Could not reach the sign-in service. Please try again.".to_string()
            }
        }
    }
}

/// A provider-issued session: the fields the identity service natively
/// holds, plus the token that authorizes profile updates and sign-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// Bearer token for follow-up calls on this session.
    pub id_token: String,
}

/// The identity service operations the session adapter needs.
pub trait IdentityProvider {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &Email, password: &str) -> Result<AuthSession, AuthError>;

    /// Sign in to an existing account.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthSession, AuthError>;

    /// Revoke a session's token.
    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError>;

    /// Update the provider-held profile fields. `None` fields are left
    /// untouched.
    async fn update_profile(
        &self,
        session: &AuthSession,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<(), AuthError>;
}
