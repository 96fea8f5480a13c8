//! Order repository.
//!
//! Orders are created exactly once, by the checkout orchestrator, and
//! only their status is mutated afterwards. The stored total is the
//! total computed at creation time; it is never recomputed from the
//! items.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use tracing::instrument;

use bakehouse_core::{CurrencyCode, OrderId, OrderStatus, Price, ProductId, UserId};

use crate::docstore::{Document, DocumentStore};
use crate::error::AppError;
use crate::models::{NewOrder, Order, OrderItem, OrderStats};

use super::{collections, value};

/// Repository for the `orders` collection.
pub struct OrdersRepository<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> OrdersRepository<'a, S> {
    /// Create a repository over a document store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Persist a new order with status `paid`.
    ///
    /// # Errors
    ///
    /// `Storage` on transport failure; nothing is written in that case.
    #[instrument(skip(self, new), fields(user = %new.user_id))]
    pub async fn create(&self, new: NewOrder) -> Result<Order, AppError> {
        let created_at = Utc::now();
        let body = json!({
            "userId": new.user_id.as_str(),
            "items": new.items.iter().map(item_body).collect::<Vec<_>>(),
            "totalAmount": new.total.amount.to_string(),
            "status": OrderStatus::Paid.to_string(),
            "shippingAddress": new.shipping_address,
            "paymentId": new.payment_ref,
            "paymentMethod": new.payment_method,
            "createdAt": created_at.to_rfc3339(),
        });

        let id = self.store.create(collections::ORDERS, body).await?;

        Ok(Order {
            id: OrderId::new(id),
            user_id: new.user_id,
            items: new.items,
            total: new.total,
            status: OrderStatus::Paid,
            shipping_address: Some(new.shipping_address),
            payment_ref: Some(new.payment_ref),
            payment_method: new.payment_method,
            created_at,
        })
    }

    /// A user's order history, newest first.
    ///
    /// # Errors
    ///
    /// `Storage` on transport failure.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, AppError> {
        let mut orders: Vec<Order> = self
            .store
            .list(collections::ORDERS)
            .await?
            .iter()
            .map(order_from_document)
            .filter(|order| &order.user_id == user_id)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Every order, newest first. Admin operation.
    ///
    /// # Errors
    ///
    /// `Storage` on transport failure.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Order>, AppError> {
        let mut orders: Vec<Order> = self
            .store
            .list(collections::ORDERS)
            .await?
            .iter()
            .map(order_from_document)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Move an order to a new status. Admin operation.
    ///
    /// # Errors
    ///
    /// `Validation` if the order does not exist or the transition is not
    /// legal for its current status; `Storage` on transport failure.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &OrderId, next: OrderStatus) -> Result<(), AppError> {
        let doc = self
            .store
            .get(collections::ORDERS, id.as_str())
            .await?
            .ok_or_else(|| AppError::Validation(format!("No such order: {id}")))?;

        let current = status_of(&doc.data);
        if !current.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Cannot move an order from {current} to {next}"
            )));
        }

        self.store
            .patch(
                collections::ORDERS,
                id.as_str(),
                json!({ "status": next.to_string() }),
            )
            .await?;
        Ok(())
    }
}

impl OrderStats {
    /// Tally status counts and gross revenue (cancelled orders excluded
    /// from revenue) over a fetched order list.
    #[must_use]
    pub fn tally(orders: &[Order]) -> Self {
        let mut stats = Self::default();
        for order in orders {
            match order.status {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Paid => stats.paid += 1,
                OrderStatus::Processing => stats.processing += 1,
                OrderStatus::Shipped => stats.shipped += 1,
                OrderStatus::Delivered => stats.delivered += 1,
                OrderStatus::Cancelled => stats.cancelled += 1,
            }
            if order.status != OrderStatus::Cancelled {
                stats.revenue += order.total.amount;
            }
        }
        stats
    }
}

fn item_body(item: &OrderItem) -> Value {
    json!({
        "productId": item.product_id.as_str(),
        "name": item.name,
        "price": item.unit_price.amount.to_string(),
        "quantity": item.quantity,
    })
}

fn status_of(data: &Map<String, Value>) -> OrderStatus {
    data.get("status")
        .and_then(value::as_string)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

/// Decode an order document, degrading unreadable fields to defaults
/// rather than dropping the order from history.
fn order_from_document(doc: &Document) -> Order {
    let items = doc
        .field("items")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(item_from_value).collect())
        .unwrap_or_default();

    Order {
        id: OrderId::new(doc.id.clone()),
        user_id: UserId::new(
            doc.field("userId")
                .and_then(value::as_string)
                .unwrap_or_default(),
        ),
        items,
        total: Price::new(
            doc.field("totalAmount")
                .and_then(value::as_decimal)
                .unwrap_or_default(),
            CurrencyCode::Php,
        ),
        status: status_of(&doc.data),
        shipping_address: doc.field("shippingAddress").and_then(value::as_string),
        payment_ref: doc.field("paymentId").and_then(value::as_string),
        payment_method: doc
            .field("paymentMethod")
            .and_then(value::as_string)
            .unwrap_or_default(),
        created_at: doc
            .field("createdAt")
            .and_then(value::as_string)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc)),
    }
}

fn item_from_value(entry: &Value) -> OrderItem {
    let empty = Map::new();
    let fields = entry.as_object().unwrap_or(&empty);
    OrderItem {
        product_id: ProductId::new(
            fields
                .get("productId")
                .and_then(value::as_string)
                .unwrap_or_default(),
        ),
        name: fields
            .get("name")
            .and_then(value::as_string)
            .unwrap_or_default(),
        unit_price: Price::new(
            fields
                .get("price")
                .and_then(value::as_decimal)
                .unwrap_or_default(),
            CurrencyCode::Php,
        ),
        quantity: fields.get("quantity").and_then(value::as_u32).unwrap_or(1),
    }
}
