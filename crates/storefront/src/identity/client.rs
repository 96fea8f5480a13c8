//! REST client for the hosted identity service.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use bakehouse_core::{Email, UserId};

use crate::config::IdentityConfig;

use super::{AuthError, AuthSession, IdentityProvider};

/// HTTP client for the identity service REST API.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Wire shape of a sign-up/sign-in response.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(rename = "localId")]
    local_id: String,
    email: String,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "photoUrl")]
    photo_url: Option<String>,
    #[serde(rename = "idToken")]
    id_token: String,
}

/// Wire shape of an error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl IdentityClient {
    /// Create a new identity service client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &IdentityConfig) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.expose_secret().to_string(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/accounts:{action}?key={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn post(&self, action: &str, body: &Value) -> Result<reqwest::Response, AuthError> {
        let response = self.client.post(self.endpoint(action)).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorResponse>(&body)
                .map_or_else(|_| "UNKNOWN".to_string(), |parsed| parsed.error.message);
            return Err(AuthError::Api {
                status: status.as_u16(),
                code,
            });
        }
        Ok(response)
    }

    async fn post_session(&self, action: &str, body: &Value) -> Result<AuthSession, AuthError> {
        let response = self.post(action, body).await?;
        let parsed: SessionResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        let email =
            Email::parse(&parsed.email).map_err(|e| AuthError::Decode(format!("email: {e}")))?;

        Ok(AuthSession {
            user_id: UserId::new(parsed.local_id),
            email,
            display_name: parsed.display_name,
            photo_url: parsed.photo_url,
            id_token: parsed.id_token,
        })
    }
}

impl IdentityProvider for IdentityClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_up(&self, email: &Email, password: &str) -> Result<AuthSession, AuthError> {
        self.post_session(
            "signUp",
            &json!({
                "email": email.as_str(),
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthSession, AuthError> {
        self.post_session(
            "signInWithPassword",
            &json!({
                "email": email.as_str(),
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    #[instrument(skip(self, session))]
    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError> {
        self.post("signOut", &json!({ "idToken": session.id_token }))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, session))]
    async fn update_profile(
        &self,
        session: &AuthSession,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<(), AuthError> {
        let mut body = json!({ "idToken": session.id_token });
        if let (Some(map), Some(name)) = (body.as_object_mut(), display_name) {
            map.insert("displayName".to_string(), Value::from(name));
        }
        if let (Some(map), Some(url)) = (body.as_object_mut(), photo_url) {
            map.insert("photoUrl".to_string(), Value::from(url));
        }

        self.post("update", &body).await?;
        Ok(())
    }
}
