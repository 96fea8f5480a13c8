//! Payment gateway access.
//!
//! Checkout charges run through a hosted gateway's REST API. The
//! [`PaymentGateway`] trait is the seam the checkout orchestrator is
//! written against; [`PayMongoClient`] is the production implementation.

mod paymongo;

pub use paymongo::PayMongoClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP transport failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response. `detail` is the
    /// gateway's own message and is surfaced to the user verbatim.
    #[error("gateway error ({status}): {detail}")]
    Gateway { status: u16, detail: String },

    /// The response body did not decode.
    #[error("decode error: {0}")]
    Decode(String),
}

impl PaymentError {
    /// The message to show the user.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Gateway { detail, .. } => detail,
            Self::Http(_) => "Could not reach the payment service. Please try again.",
            Self::Decode(_) => "The payment service returned an unexpected response.",
        }
    }
}

/// A gateway-side record of an authorized-but-not-yet-captured charge.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Gateway intent identifier.
    pub id: String,
    /// Gateway-reported status (e.g. `awaiting_payment_method`).
    pub status: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Client-side key for redirect flows.
    pub client_key: String,
}

/// Card fields collected by the checkout screen.
#[derive(Debug, Clone, Serialize)]
pub struct CardDetails {
    /// Card number with spaces already stripped.
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

/// Billing identity attached to a tokenized payment method.
#[derive(Debug, Clone, Serialize)]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// The three gateway calls checkout needs.
pub trait PaymentGateway {
    /// Create a payment intent for `amount` minor units.
    async fn create_intent(
        &self,
        amount: i64,
        description: &str,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Tokenize card details into a payment method id.
    async fn create_card_method(
        &self,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<String, PaymentError>;

    /// Attach a payment method to an intent, triggering the charge.
    async fn attach_method(&self, intent_id: &str, method_id: &str) -> Result<(), PaymentError>;
}
