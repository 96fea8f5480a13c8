//! End-to-end checkout scenarios against in-memory fakes.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;

use bakehouse_core::{CurrencyCode, Email, OrderStatus, Price, ProductId, Role, UserId};
use bakehouse_storefront::cart::{CartStore, InMemoryCartStorage};
use bakehouse_storefront::checkout::{
    CheckoutOrchestrator, CheckoutRequest, PaymentMethodKind, ShippingDetails,
};
use bakehouse_storefront::db::{OrdersRepository, collections};
use bakehouse_storefront::docstore::InMemoryDocStore;
use bakehouse_storefront::error::AppError;
use bakehouse_storefront::models::{Product, User};
use bakehouse_storefront::payment::{
    BillingDetails, CardDetails, PaymentError, PaymentGateway, PaymentIntent,
};

/// Gateway fake that records calls and fails on demand.
#[derive(Default)]
struct FakeGateway {
    calls: Mutex<Vec<String>>,
    fail_intent: AtomicBool,
    fail_attach: AtomicBool,
}

impl FakeGateway {
    fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
    }

    fn declined() -> PaymentError {
        PaymentError::Gateway {
            status: 400,
            detail: "The payment was declined.".to_string(),
        }
    }
}

impl PaymentGateway for FakeGateway {
    async fn create_intent(
        &self,
        amount: i64,
        description: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record(format!("create_intent:{amount}:{description}"));
        if self.fail_intent.load(Ordering::SeqCst) {
            return Err(Self::declined());
        }
        Ok(PaymentIntent {
            id: "pi_test_1".to_string(),
            status: "awaiting_payment_method".to_string(),
            amount,
            currency: "PHP".to_string(),
            client_key: "pi_test_1_client".to_string(),
        })
    }

    async fn create_card_method(
        &self,
        _card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<String, PaymentError> {
        self.record(format!("create_card_method:{}", billing.name));
        Ok("pm_test_1".to_string())
    }

    async fn attach_method(&self, intent_id: &str, method_id: &str) -> Result<(), PaymentError> {
        self.record(format!("attach_method:{intent_id}:{method_id}"));
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(Self::declined());
        }
        Ok(())
    }
}

fn shopper() -> User {
    User {
        id: UserId::new("u1"),
        email: Email::parse("ana@example.com").expect("valid email"),
        display_name: "Ana".to_string(),
        phone: Some("+63 912 555 0123".to_string()),
        photo_url: None,
        role: Role::Customer,
    }
}

fn product_a() -> Product {
    Product {
        id: ProductId::new("prod-a"),
        name: "Choco Crinkle".to_string(),
        description: "Fudgy".to_string(),
        price: Price::new(Decimal::from(100), CurrencyCode::Php),
        image_url: None,
        category: Some("Chocolate".to_string()),
        stock: None,
    }
}

fn loaded_cart() -> CartStore<InMemoryCartStorage> {
    let mut cart = CartStore::load(InMemoryCartStorage::new());
    cart.add_item(&product_a(), 2).expect("add must succeed");
    cart
}

fn card_request() -> CheckoutRequest {
    CheckoutRequest {
        shipping: ShippingDetails {
            address: "1 Mabini St".to_string(),
            city: "Manila".to_string(),
            postal_code: "1000".to_string(),
        },
        method: PaymentMethodKind::Card,
        card: Some(CardDetails {
            number: "4343434343434345".to_string(),
            exp_month: 12,
            exp_year: 2027,
            cvc: "123".to_string(),
        }),
    }
}

#[tokio::test]
async fn successful_checkout_persists_one_paid_order_and_clears_cart() {
    let gateway = FakeGateway::default();
    let store = InMemoryDocStore::new();
    let orchestrator = CheckoutOrchestrator::new(&gateway, &store);
    let mut cart = loaded_cart();
    let user = shopper();

    let order = orchestrator
        .run(Some(&user), &mut cart, &card_request())
        .await
        .expect("checkout must succeed");

    // 2 × 100 + 50 shipping
    assert_eq!(order.total.amount, Decimal::from(250));
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.payment_ref.as_deref(), Some("pi_test_1"));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);
    assert!(cart.is_empty());

    // Exactly one order landed in the collection, with the stored total.
    let listed = OrdersRepository::new(&store)
        .list_for_user(&user.id)
        .await
        .expect("list must succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].total.amount, Decimal::from(250));

    // Intent was created in minor units, then the card path ran.
    assert_eq!(
        gateway.calls(),
        vec![
            "create_intent:25000:Order from Ana".to_string(),
            "create_card_method:Ana".to_string(),
            "attach_method:pi_test_1:pm_test_1".to_string(),
        ]
    );
}

#[tokio::test]
async fn failed_intent_leaves_cart_and_creates_no_order() {
    let gateway = FakeGateway::default();
    gateway.fail_intent.store(true, Ordering::SeqCst);
    let store = InMemoryDocStore::new();
    let orchestrator = CheckoutOrchestrator::new(&gateway, &store);
    let mut cart = loaded_cart();
    let user = shopper();

    let err = orchestrator
        .run(Some(&user), &mut cart, &card_request())
        .await
        .expect_err("checkout must fail");

    assert!(matches!(err, AppError::PaymentGateway(_)));
    assert_eq!(err.user_message(), "The payment was declined.");

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);
    assert!(store.is_empty(collections::ORDERS));
}

#[tokio::test]
async fn failed_attach_leaves_cart_and_creates_no_order() {
    let gateway = FakeGateway::default();
    gateway.fail_attach.store(true, Ordering::SeqCst);
    let store = InMemoryDocStore::new();
    let orchestrator = CheckoutOrchestrator::new(&gateway, &store);
    let mut cart = loaded_cart();
    let user = shopper();

    let err = orchestrator
        .run(Some(&user), &mut cart, &card_request())
        .await
        .expect_err("checkout must fail");

    assert!(matches!(err, AppError::PaymentGateway(_)));
    assert_eq!(cart.total_items(), 2);
    assert!(store.is_empty(collections::ORDERS));
}

#[tokio::test]
async fn validation_failure_makes_no_external_calls() {
    let gateway = FakeGateway::default();
    let store = InMemoryDocStore::new();
    let orchestrator = CheckoutOrchestrator::new(&gateway, &store);
    let mut cart = loaded_cart();
    let user = shopper();

    let mut request = card_request();
    request.shipping.postal_code = String::new();

    let err = orchestrator
        .run(Some(&user), &mut cart, &request)
        .await
        .expect_err("checkout must fail");

    assert!(matches!(err, AppError::Validation(_)));
    assert!(gateway.calls().is_empty());
    assert!(store.is_empty(collections::ORDERS));
    assert_eq!(cart.total_items(), 2);
}

#[tokio::test]
async fn anonymous_checkout_is_rejected_before_the_gateway() {
    let gateway = FakeGateway::default();
    let store = InMemoryDocStore::new();
    let orchestrator = CheckoutOrchestrator::new(&gateway, &store);
    let mut cart = loaded_cart();

    let err = orchestrator
        .run(None, &mut cart, &card_request())
        .await
        .expect_err("checkout must fail");

    assert_eq!(err.user_message(), "Please login to continue");
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn wallet_checkout_skips_tokenization() {
    let gateway = FakeGateway::default();
    let store = InMemoryDocStore::new();
    let orchestrator = CheckoutOrchestrator::new(&gateway, &store);
    let mut cart = loaded_cart();
    let user = shopper();

    let request = CheckoutRequest {
        method: PaymentMethodKind::GCash,
        card: None,
        ..card_request()
    };

    let order = orchestrator
        .run(Some(&user), &mut cart, &request)
        .await
        .expect("checkout must succeed");

    assert_eq!(order.payment_method, "gcash");
    assert_eq!(
        gateway.calls(),
        vec!["create_intent:25000:Order from Ana".to_string()]
    );
    assert!(cart.is_empty());
}

#[tokio::test]
async fn failed_order_persistence_preserves_cart() {
    let gateway = FakeGateway::default();
    let store = InMemoryDocStore::new();
    let orchestrator = CheckoutOrchestrator::new(&gateway, &store);
    let mut cart = loaded_cart();
    let user = shopper();

    // The gateway succeeds but the order write fails: the charge-without-
    // order gap. The cart must survive so the user can retry.
    store.set_failing(true);
    let err = orchestrator
        .run(Some(&user), &mut cart, &card_request())
        .await
        .expect_err("checkout must fail");

    assert!(matches!(err, AppError::Storage(_)));
    assert_eq!(cart.total_items(), 2);
}
