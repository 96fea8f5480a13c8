//! The shopper's working selection.
//!
//! An explicit state container the app shell injects into its screens:
//! one line per product id, quantities merged on repeat adds, totals
//! computed from the prices captured when each line was added. Every
//! mutation persists the full line set through [`CartStorage`]; the cart
//! outlives app restarts but is local to one device and independent of
//! the signed-in identity.

pub mod storage;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use bakehouse_core::ProductId;

use crate::error::AppError;
use crate::models::Product;

pub use storage::{CART_NAMESPACE, CartStorage, FileCartStorage, InMemoryCartStorage};

/// One product-plus-quantity entry.
///
/// The product snapshot keeps the price captured at add time; later
/// catalog edits do not change an existing line's contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

/// The cart state container.
pub struct CartStore<S: CartStorage> {
    lines: Vec<CartLine>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart from storage.
    ///
    /// A missing or corrupt record yields an empty cart, never an error:
    /// losing a cart beats refusing to start.
    pub fn load(storage: S) -> Self {
        let lines = match storage.load() {
            Ok(Some(record)) => serde_json::from_str(&record).unwrap_or_else(|e| {
                warn!(error = %e, "discarding corrupt cart record");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read cart record, starting empty");
                Vec::new()
            }
        };
        Self { lines, storage }
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of a product, merging into an existing line.
    ///
    /// If the product tracks stock, the line's resulting quantity may not
    /// exceed it; the add is rejected with `InsufficientStock` and the
    /// cart is left unchanged. Stock is only decremented virtually here;
    /// authoritative stock moves via explicit admin edits.
    ///
    /// # Errors
    ///
    /// `Validation` if `quantity` is zero, `InsufficientStock` per the
    /// stock policy above.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), AppError> {
        if quantity == 0 {
            return Err(AppError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let existing = self
            .lines
            .iter()
            .find(|line| line.product.id == product.id)
            .map_or(0, |line| line.quantity);

        let requested = existing.saturating_add(quantity);
        if let Some(stock) = product.stock
            && requested > stock
        {
            return Err(AppError::InsufficientStock {
                product: product.name.clone(),
                requested,
                available: stock,
            });
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity,
            }),
        }
        self.persist();
        Ok(())
    }

    /// Delete the line for a product. No-op if absent.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| &line.product.id != product_id);
        self.persist();
    }

    /// Replace a line's quantity; zero behaves as [`Self::remove_item`].
    ///
    /// No-op if no line exists for the product.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| &line.product.id == product_id)
        {
            line.quantity = quantity;
        }
        self.persist();
    }

    /// Empty all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum over lines of captured unit price × quantity.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.product.price.amount * Decimal::from(line.quantity))
            .sum()
    }

    /// Write the full line set to durable storage.
    ///
    /// A failed write is logged and otherwise ignored; the in-memory
    /// state stays authoritative for this session.
    fn persist(&self) {
        let record = match serde_json::to_string(&self.lines) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "could not serialize cart record");
                return;
            }
        };
        if let Err(e) = self.storage.save(&record) {
            warn!(error = %e, "could not persist cart record");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bakehouse_core::{CurrencyCode, Price};

    fn product(id: &str, price: i64, stock: Option<u32>) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Cookie {id}"),
            description: String::new(),
            price: Price::new(Decimal::from(price), CurrencyCode::Php),
            image_url: None,
            category: None,
            stock,
        }
    }

    fn empty_cart() -> CartStore<InMemoryCartStorage> {
        CartStore::load(InMemoryCartStorage::new())
    }

    #[test]
    fn test_repeat_adds_merge_into_one_line() {
        let mut cart = empty_cart();
        let p = product("a", 100, None);

        cart.add_item(&p, 1).unwrap();
        cart.add_item(&p, 2).unwrap();
        cart.add_item(&p, 3).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 6);
        assert_eq!(cart.total_items(), 6);
    }

    #[test]
    fn test_zero_quantity_add_rejected() {
        let mut cart = empty_cart();
        let p = product("a", 100, None);
        assert!(matches!(
            cart.add_item(&p, 0),
            Err(AppError::Validation(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let p = product("a", 100, None);

        let mut removed = empty_cart();
        removed.add_item(&p, 2).unwrap();
        removed.remove_item(&p.id);

        let mut zeroed = empty_cart();
        zeroed.add_item(&p, 2).unwrap();
        zeroed.set_quantity(&p.id, 0);

        assert_eq!(removed.lines(), zeroed.lines());
        assert!(removed.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = empty_cart();
        cart.add_item(&product("a", 100, None), 1).unwrap();
        cart.remove_item(&ProductId::new("ghost"));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_total_price_uses_captured_prices() {
        let mut cart = empty_cart();
        let mut p = product("a", 100, None);
        cart.add_item(&p, 2).unwrap();

        // A later catalog price change must not alter the existing line.
        p.price = Price::new(Decimal::from(999), CurrencyCode::Php);
        assert_eq!(cart.total_price(), Decimal::from(200));

        cart.add_item(&product("b", 25, None), 3).unwrap();
        assert_eq!(cart.total_price(), Decimal::from(275));
    }

    #[test]
    fn test_stock_bound_add_rejected() {
        let mut cart = empty_cart();
        let p = product("a", 100, Some(3));

        let err = cart.add_item(&p, 5).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock { available: 3, .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_stock_counts_existing_line_quantity() {
        let mut cart = empty_cart();
        let p = product("a", 100, Some(3));

        cart.add_item(&p, 2).unwrap();
        assert!(cart.add_item(&p, 2).is_err());
        assert_eq!(cart.lines()[0].quantity, 2);

        cart.add_item(&p, 1).unwrap();
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_untracked_stock_is_unbounded() {
        let mut cart = empty_cart();
        cart.add_item(&product("a", 100, None), 10_000).unwrap();
        assert_eq!(cart.total_items(), 10_000);
    }

    #[test]
    fn test_persist_reload_roundtrip() {
        let storage = InMemoryCartStorage::new();
        let mut cart = CartStore::load(storage);
        cart.add_item(&product("a", 100, None), 2).unwrap();
        cart.add_item(&product("b", 50, None), 1).unwrap();

        let record = cart.storage.record().unwrap();
        let reloaded = CartStore::load(InMemoryCartStorage::with_record(&record));

        assert_eq!(reloaded.lines(), cart.lines());
        assert_eq!(reloaded.total_price(), Decimal::from(250));
    }

    #[test]
    fn test_corrupt_record_loads_empty() {
        let cart = CartStore::load(InMemoryCartStorage::with_record("{not json"));
        assert!(cart.is_empty());

        let wrong_shape = CartStore::load(InMemoryCartStorage::with_record("{\"a\":1}"));
        assert!(wrong_shape.is_empty());
    }

    #[test]
    fn test_clear_empties_and_persists() {
        let mut cart = empty_cart();
        cart.add_item(&product("a", 100, None), 2).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.storage.record().as_deref(), Some("[]"));
    }
}
