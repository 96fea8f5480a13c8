//! PayMongo REST client.
//!
//! All calls use basic auth with the secret key and JSON:API-style
//! `{"data":{"attributes":...}}` bodies. Non-2xx responses carry an
//! `errors[0].detail` message that is surfaced verbatim.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::config::PaymentConfig;

use super::{BillingDetails, CardDetails, PaymentError, PaymentGateway, PaymentIntent};

/// Payment methods offered at checkout.
const PAYMENT_METHODS_ALLOWED: [&str; 3] = ["card", "gcash", "paymaya"];

/// Statement descriptor shown on the shopper's bill.
const STATEMENT_DESCRIPTOR: &str = "Bakehouse";

/// URL the gateway redirects back to after 3DS or wallet approval.
const RETURN_URL: &str = "https://app.bakehouse.ph/payment/success";

/// PayMongo API client.
#[derive(Clone)]
pub struct PayMongoClient {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of a successful `{"data": ...}` response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: ApiResource<T>,
}

#[derive(Debug, Deserialize)]
struct ApiResource<T> {
    id: String,
    attributes: T,
}

/// Intent attributes as returned by the gateway (id lives one level up).
#[derive(Debug, Deserialize)]
struct IntentAttributes {
    status: String,
    amount: i64,
    currency: String,
    client_key: String,
}

/// Attributes of a tokenized method; only the id matters to checkout.
#[derive(Debug, Deserialize)]
struct MethodAttributes {}

#[derive(Debug, Deserialize)]
struct ErrorsResponse {
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    detail: String,
}

impl PayMongoClient {
    /// Create a new PayMongo client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        // Basic auth: the secret key is the username, the password is empty.
        let credentials = BASE64.encode(format!("{}:", config.secret_key.expose_secret()));
        let auth_value = format!("Basic {credentials}");
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| PaymentError::Decode(format!("invalid secret key format: {e}")))?,
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

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
        fallback_detail: &str,
    ) -> Result<ApiResource<T>, PaymentError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                detail: extract_error_detail(&body, fallback_detail),
            });
        }

        let parsed: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))?;
        Ok(parsed.data)
    }
}

/// Pull `errors[0].detail` out of a gateway error body, falling back to a
/// per-operation message when the body has no detail.
fn extract_error_detail(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorsResponse>(body)
        .ok()
        .and_then(|parsed| parsed.errors.into_iter().next())
        .map_or_else(|| fallback.to_string(), |entry| entry.detail)
}

/// Body for `POST /payment_intents`.
fn intent_body(amount: i64, description: &str) -> Value {
    json!({
        "data": {
            "attributes": {
                "amount": amount,
                "payment_method_allowed": PAYMENT_METHODS_ALLOWED,
                "currency": "PHP",
                "description": description,
                "statement_descriptor": STATEMENT_DESCRIPTOR,
            }
        }
    })
}

/// Body for `POST /payment_methods`.
fn method_body(card: &CardDetails, billing: &BillingDetails) -> Value {
    json!({
        "data": {
            "attributes": {
                "type": "card",
                "details": card,
                "billing": billing,
            }
        }
    })
}

/// Body for `POST /payment_intents/{id}/attach`.
fn attach_body(method_id: &str) -> Value {
    json!({
        "data": {
            "attributes": {
                "payment_method": method_id,
                "return_url": RETURN_URL,
            }
        }
    })
}

impl PaymentGateway for PayMongoClient {
    #[instrument(skip(self))]
    async fn create_intent(
        &self,
        amount: i64,
        description: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let resource: ApiResource<IntentAttributes> = self
            .post(
                "/payment_intents",
                &intent_body(amount, description),
                "Payment intent creation failed",
            )
            .await?;

        Ok(PaymentIntent {
            id: resource.id,
            status: resource.attributes.status,
            amount: resource.attributes.amount,
            currency: resource.attributes.currency,
            client_key: resource.attributes.client_key,
        })
    }

    #[instrument(skip(self, card, billing))]
    async fn create_card_method(
        &self,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<String, PaymentError> {
        let resource: ApiResource<MethodAttributes> = self
            .post(
                "/payment_methods",
                &method_body(card, billing),
                "Payment method creation failed",
            )
            .await?;
        Ok(resource.id)
    }

    #[instrument(skip(self))]
    async fn attach_method(&self, intent_id: &str, method_id: &str) -> Result<(), PaymentError> {
        let path = format!("/payment_intents/{}/attach", urlencoding::encode(intent_id));
        let _resource: ApiResource<Value> = self
            .post(
                &path,
                &attach_body(method_id),
                "Payment method attachment failed",
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_body_shape() {
        let body = intent_body(25000, "Order from Ana");
        let attributes = &body["data"]["attributes"];

        assert_eq!(attributes["amount"], 25000);
        assert_eq!(attributes["currency"], "PHP");
        assert_eq!(attributes["description"], "Order from Ana");
        assert_eq!(attributes["payment_method_allowed"][1], "gcash");
    }

    #[test]
    fn test_method_body_shape() {
        let card = CardDetails {
            number: "4343434343434345".to_string(),
            exp_month: 12,
            exp_year: 2027,
            cvc: "123".to_string(),
        };
        let billing = BillingDetails {
            name: "Ana Reyes".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+63 912 555 0123".to_string(),
        };

        let body = method_body(&card, &billing);
        let attributes = &body["data"]["attributes"];
        assert_eq!(attributes["type"], "card");
        assert_eq!(attributes["details"]["exp_month"], 12);
        assert_eq!(attributes["billing"]["name"], "Ana Reyes");
    }

    #[test]
    fn test_attach_body_shape() {
        let body = attach_body("pm_123");
        assert_eq!(body["data"]["attributes"]["payment_method"], "pm_123");
        assert_eq!(body["data"]["attributes"]["return_url"], RETURN_URL);
    }

    #[test]
    fn test_error_detail_extraction() {
        let body = r#"{"errors":[{"code":"parameter_invalid","detail":"The card number is invalid."}]}"#;
        assert_eq!(
            extract_error_detail(body, "fallback"),
            "The card number is invalid."
        );
    }

    #[test]
    fn test_error_detail_fallback() {
        assert_eq!(
            extract_error_detail("not json", "Payment intent creation failed"),
            "Payment intent creation failed"
        );
        assert_eq!(
            extract_error_detail(r#"{"errors":[]}"#, "fallback"),
            "fallback"
        );
    }
}
