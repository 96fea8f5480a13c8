//! REST client for the hosted document database.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::config::DocStoreConfig;

use super::{Document, DocumentStore, StoreError};

/// HTTP client for the document database REST API.
#[derive(Clone)]
pub struct DocStoreClient {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of a listed document.
#[derive(Debug, Deserialize)]
struct DocumentBody {
    id: String,
    #[serde(default)]
    fields: Value,
}

/// Wire shape of a list response.
#[derive(Debug, Deserialize)]
struct ListResponse {
    documents: Vec<DocumentBody>,
}

/// Wire shape of a create response.
#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: String,
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

impl DocStoreClient {
    /// Create a new document store client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &DocStoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| StoreError::Decode(format!("invalid API key format: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{collection}/documents", self.base_url)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/collections/{collection}/documents/{}",
            self.base_url,
            urlencoding::encode(id)
        )
    }
}

/// Turn a non-2xx response into a `StoreError::Api` carrying the store's
/// own message when the body has one.
async fn error_from_response(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map_or(body, |parsed| parsed.error.message);
    StoreError::Api { status, message }
}

impl DocumentStore for DocStoreClient {
    #[instrument(skip(self))]
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let response = self.client.get(self.collection_url(collection)).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: ListResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(parsed
            .documents
            .into_iter()
            .map(|d| Document::new(d.id, d.fields))
            .collect())
    }

    #[instrument(skip(self))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let response = self
            .client
            .get(self.document_url(collection, id))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: DocumentBody = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(Some(Document::new(parsed.id, parsed.fields)))
    }

    #[instrument(skip(self, data))]
    async fn create(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .json(&serde_json::json!({ "fields": data }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: CreateResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(parsed.id)
    }

    #[instrument(skip(self, data))]
    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.document_url(collection, id))
            .json(&serde_json::json!({ "fields": data }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    #[instrument(skip(self, data))]
    async fn patch(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.document_url(collection, id))
            .json(&serde_json::json!({ "fields": data }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.document_url(collection, id))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}
