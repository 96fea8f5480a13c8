//! Customer feedback repository.

use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use crate::docstore::DocumentStore;
use crate::error::AppError;

use super::collections;

/// Repository for the `feedback` collection.
pub struct FeedbackRepository<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> FeedbackRepository<'a, S> {
    /// Create a repository over a document store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Append a feedback entry.
    ///
    /// # Errors
    ///
    /// `Validation` if the message is empty, `Storage` on transport
    /// failure.
    #[instrument(skip(self, message))]
    pub async fn submit(&self, name: &str, email: &str, message: &str) -> Result<(), AppError> {
        if message.trim().is_empty() {
            return Err(AppError::Validation(
                "Please enter your feedback".to_string(),
            ));
        }

        self.store
            .create(
                collections::FEEDBACK,
                json!({
                    "name": name,
                    "email": email,
                    "message": message,
                    "createdAt": Utc::now().to_rfc3339(),
                }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docstore::InMemoryDocStore;

    #[tokio::test]
    async fn test_submit_appends_entry() {
        let store = InMemoryDocStore::new();
        let repo = FeedbackRepository::new(&store);

        repo.submit("Ana", "ana@example.com", "More ube crinkles please!")
            .await
            .expect("submit must succeed");

        assert_eq!(store.len(collections::FEEDBACK), 1);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let store = InMemoryDocStore::new();
        let repo = FeedbackRepository::new(&store);

        let err = repo
            .submit("Ana", "ana@example.com", "   ")
            .await
            .expect_err("empty message must be rejected");
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty(collections::FEEDBACK));
    }
}
