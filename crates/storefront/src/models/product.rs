//! Product model.

use bakehouse_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

/// A catalog product, normalized from the document store's legacy field
/// naming by the catalog gateway.
///
/// Read-only to shoppers; administrators create and edit products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price captured into cart lines at add time.
    pub price: Price,
    pub image_url: Option<String>,
    pub category: Option<String>,
    /// Tracked stock count. `None` means stock is untracked and cart adds
    /// are never stock-bound.
    pub stock: Option<u32>,
}

/// Fields for creating a product (the store issues the id).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock: Option<u32>,
}

/// A partial product update.
///
/// `None` fields are left untouched server-side; only provided fields are
/// written.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock: Option<u32>,
}
