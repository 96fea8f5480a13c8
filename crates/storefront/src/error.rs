//! Unified error handling for the storefront core.
//!
//! Nothing here is fatal to the process: every error degrades to a
//! user-visible message (the app shell renders it as a toast) and a safe
//! return to the prior state. [`AppError::is_transient`] tells the shell
//! whether "try again" is honest advice.

use thiserror::Error;

use crate::docstore::StoreError;
use crate::identity::AuthError;
use crate::media::MediaError;
use crate::payment::PaymentError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed user input; fixed locally, never reaches a
    /// hosted service.
    #[error("validation error: {0}")]
    Validation(String),

    /// The product catalog could not be fetched or written.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(#[source] StoreError),

    /// Identity service operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Document store operation failed (orders, profiles, feedback).
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Object storage or image handling failed.
    #[error("media error: {0}")]
    Media(#[from] MediaError),

    /// Non-2xx from the payment gateway; checkout aborted, cart preserved.
    #[error("payment gateway error: {0}")]
    PaymentGateway(#[from] PaymentError),

    /// A cart add would exceed the product's tracked stock.
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },
}

impl AppError {
    /// The message shown to the user.
    ///
    /// Gateway errors surface the gateway's own message verbatim; hosted
    /// service transport failures get a generic retryable message so
    /// internals are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::CatalogUnavailable(_) => {
                "Could not load the catalog. Please try again.".to_string()
            }
            Self::Auth(err) => err.user_message(),
            Self::Storage(_) => "Something went wrong saving your data. Please try again.".to_string(),
            Self::Media(err) => err.user_message(),
            Self::PaymentGateway(err) => err.detail().to_string(),
            Self::InsufficientStock {
                product, available, ..
            } => format!("Only {available} of {product} left in stock."),
        }
    }

    /// Whether retrying the same operation unchanged can succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Validation(_) | Self::InsufficientStock { .. } => false,
            Self::Media(err) => err.is_transient(),
            Self::CatalogUnavailable(_)
            | Self::Auth(_)
            | Self::Storage(_)
            | Self::PaymentGateway(_) => true,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = AppError::Validation("Please fill in shipping details".to_string());
        assert_eq!(err.user_message(), "Please fill in shipping details");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = AppError::InsufficientStock {
            product: "Choco Crinkle".to_string(),
            requested: 5,
            available: 3,
        };
        assert_eq!(err.user_message(), "Only 3 of Choco Crinkle left in stock.");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_gateway_detail_surfaced_verbatim() {
        let err = AppError::PaymentGateway(PaymentError::Gateway {
            status: 400,
            detail: "The card number is invalid.".to_string(),
        });
        assert_eq!(err.user_message(), "The card number is invalid.");
        assert!(err.is_transient());
    }

    #[test]
    fn test_storage_message_is_generic() {
        let err = AppError::Storage(StoreError::Api {
            status: 503,
            message: "internal shard unavailable".to_string(),
        });
        assert!(!err.user_message().contains("shard"));
        assert!(err.is_transient());
    }
}
