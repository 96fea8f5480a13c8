//! User and mirrored-profile models.

use bakehouse_core::{Email, Role, UserId};
use serde::{Deserialize, Serialize};

/// The storefront's view of a signed-in user: the identity provider's
/// session fields merged with the mirrored profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub display_name: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
}

impl User {
    /// Whether this user may reach the admin screens and write operations.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Profile fields the identity service does not natively hold, mirrored
/// into the `users` collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MirroredProfile {
    pub display_name: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
}
