//! Order models.

use bakehouse_core::{OrderId, OrderStatus, Price, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of an order: a denormalized copy of the product's name and
/// unit price at purchase time, independent of later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl OrderItem {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::new(
            self.unit_price.amount * rust_decimal::Decimal::from(self.quantity),
            self.unit_price.currency,
        )
    }
}

/// A placed order.
///
/// Created once at successful payment; `total` is fixed at creation time
/// and never recomputed. Only the status is mutated afterwards, by an
/// administrator. Orders are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    /// Item totals plus the fixed shipping fee, fixed at creation time.
    pub total: Price,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    /// The payment gateway's intent identifier.
    pub payment_ref: Option<String>,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for persisting a new order (the store issues the id, the
/// repository stamps the creation time and the `paid` status).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub shipping_address: String,
    pub payment_ref: String,
    pub payment_method: String,
}

/// Admin dashboard tallies over the order collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderStats {
    pub pending: usize,
    pub paid: usize,
    pub processing: usize,
    pub shipped: usize,
    pub delivered: usize,
    pub cancelled: usize,
    /// Gross revenue over non-cancelled orders.
    pub revenue: rust_decimal::Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakehouse_core::CurrencyCode;
    use rust_decimal::Decimal;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            product_id: ProductId::new("p1"),
            name: "Crinkle".to_string(),
            unit_price: Price::new(Decimal::new(2550, 2), CurrencyCode::Php),
            quantity: 3,
        };
        assert_eq!(item.line_total().amount, Decimal::new(7650, 2));
    }
}
