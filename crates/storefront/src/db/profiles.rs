//! Mirrored-profile repository.
//!
//! The identity service owns accounts; the `users` collection mirrors
//! the fields it does not hold (role, phone) plus a copy of the display
//! name and photo. Documents are keyed by the identity service's user
//! id.

use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use bakehouse_core::{Email, Role, UserId};

use crate::docstore::DocumentStore;
use crate::error::AppError;
use crate::models::MirroredProfile;

use super::{collections, value};

/// Repository for the `users` collection.
pub struct ProfileRepository<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> ProfileRepository<'a, S> {
    /// Create a repository over a document store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch the mirrored profile for a user, or `None` if no mirror
    /// exists.
    ///
    /// # Errors
    ///
    /// `Storage` on transport failure. Callers on the sign-in path treat
    /// any failure as a missing mirror.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &UserId) -> Result<Option<MirroredProfile>, AppError> {
        let doc = self.store.get(collections::USERS, user_id.as_str()).await?;

        Ok(doc.map(|doc| MirroredProfile {
            display_name: doc
                .field("displayName")
                .and_then(value::as_string)
                .unwrap_or_default(),
            phone: doc.field("phoneNumber").and_then(value::as_string),
            photo_url: doc.field("photoURL").and_then(value::as_string),
            role: Role::from_admin_flag(
                doc.field("isAdmin").and_then(serde_json::Value::as_bool) == Some(true),
            ),
        }))
    }

    /// Create the mirror for a freshly signed-up user.
    ///
    /// # Errors
    ///
    /// `Storage` on transport failure.
    #[instrument(skip(self, profile))]
    pub async fn create(
        &self,
        user_id: &UserId,
        email: &Email,
        profile: &MirroredProfile,
    ) -> Result<(), AppError> {
        let body = json!({
            "email": email.as_str(),
            "displayName": profile.display_name,
            "phoneNumber": profile.phone,
            "isAdmin": profile.role.is_admin(),
            "createdAt": Utc::now().to_rfc3339(),
        });
        self.store
            .put(collections::USERS, user_id.as_str(), body)
            .await?;
        Ok(())
    }

    /// Record a new profile photo URL on the mirror.
    ///
    /// # Errors
    ///
    /// `Storage` on transport failure or a missing mirror.
    #[instrument(skip(self))]
    pub async fn set_photo_url(&self, user_id: &UserId, url: &str) -> Result<(), AppError> {
        self.store
            .patch(
                collections::USERS,
                user_id.as_str(),
                json!({ "photoURL": url }),
            )
            .await?;
        Ok(())
    }
}
