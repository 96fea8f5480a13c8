//! Hosted document database access.
//!
//! The shop's collections (`Cookies`, `orders`, `users`, `feedback`) live
//! in a hosted, schema-on-write document database reached over REST. This
//! module provides the [`DocumentStore`] trait, the HTTP client
//! implementation, and an in-memory implementation for tests.

mod client;
mod memory;

pub use client::DocStoreClient;
pub use memory::InMemoryDocStore;

use serde_json::{Map, Value};
use thiserror::Error;

/// A document fetched from a collection: the store-issued identifier plus
/// the raw JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-issued identifier, unique within the collection.
    pub id: String,
    /// The document body. No server-side schema is enforced.
    pub data: Map<String, Value>,
}

impl Document {
    /// Build a document from an id and a JSON object.
    ///
    /// Non-object values become an empty body; the store only ever hands
    /// back objects.
    #[must_use]
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            data,
        }
    }

    /// Fetch a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a non-2xx response.
    #[error("store error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body did not decode.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Operations on named collections of JSON documents.
///
/// Writes are whole-document inserts or merge patches; last writer wins.
pub trait DocumentStore {
    /// List every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Fetch one document, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Insert a new document and return its store-issued id.
    async fn create(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// Create or replace a document under a caller-chosen id.
    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Merge the given top-level fields into an existing document.
    async fn patch(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
