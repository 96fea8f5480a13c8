//! Repositories over the hosted document store collections.
//!
//! Each repository borrows a [`DocumentStore`](crate::docstore::DocumentStore)
//! implementation, mirroring how the HTTP client is shared through
//! [`AppState`](crate::state::AppState).

pub mod feedback;
pub mod orders;
pub mod profiles;

pub use feedback::FeedbackRepository;
pub use orders::OrdersRepository;
pub use profiles::ProfileRepository;

/// Collection names in the hosted document store.
///
/// `Cookies` keeps its legacy capitalized name; renaming a collection in
/// a schema-on-write store means migrating every document.
pub mod collections {
    pub const PRODUCTS: &str = "Cookies";
    pub const ORDERS: &str = "orders";
    pub const USERS: &str = "users";
    pub const FEEDBACK: &str = "feedback";
}

/// Coercions for loosely-typed document fields.
pub(crate) mod value {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::Value;

    /// Decimal from a JSON number or decimal string.
    pub fn as_decimal(value: &Value) -> Option<Decimal> {
        match value {
            Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            Value::String(s) => Decimal::from_str(s).ok(),
            _ => None,
        }
    }

    /// Unsigned int from a JSON number or numeric string.
    pub fn as_u32(value: &Value) -> Option<u32> {
        match value {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Non-empty string.
    pub fn as_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}
