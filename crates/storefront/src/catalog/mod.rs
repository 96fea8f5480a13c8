//! Catalog gateway: read-through access to the product collection.
//!
//! Products live in the hosted document store under the legacy `Cookies`
//! collection name. The gateway normalizes heterogeneous field casings
//! into the canonical [`Product`] shape and exposes the admin write
//! operations. The admin screens are gated by the route guard; the
//! gateway itself trusts its caller, like every other hosted-service
//! write in this app.

pub mod normalize;

use std::collections::BTreeSet;

use tracing::instrument;

use bakehouse_core::ProductId;

use crate::db::collections;
use crate::docstore::DocumentStore;
use crate::error::AppError;
use crate::models::{NewProduct, Product, ProductUpdate};

/// Sentinel filter option for the unfiltered catalog view.
pub const ALL_CATEGORIES: &str = "All";

/// Gateway over the product collection.
pub struct CatalogGateway<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> CatalogGateway<'a, S> {
    /// Create a gateway over a document store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch all products, normalized.
    ///
    /// # Errors
    ///
    /// `CatalogUnavailable` on transport or decoding failure; callers
    /// surface it as a retryable message, not a crash.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let docs = self
            .store
            .list(collections::PRODUCTS)
            .await
            .map_err(AppError::CatalogUnavailable)?;

        Ok(docs.iter().map(normalize::product_from_document).collect())
    }

    /// Create a product. Admin operation.
    ///
    /// # Errors
    ///
    /// `CatalogUnavailable` on transport failure.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<ProductId, AppError> {
        let id = self
            .store
            .create(
                collections::PRODUCTS,
                normalize::document_from_new_product(product),
            )
            .await
            .map_err(AppError::CatalogUnavailable)?;
        Ok(ProductId::new(id))
    }

    /// Patch a product with only the explicitly provided fields. Admin
    /// operation.
    ///
    /// # Errors
    ///
    /// `CatalogUnavailable` on transport failure.
    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<(), AppError> {
        self.store
            .patch(
                collections::PRODUCTS,
                id.as_str(),
                normalize::patch_from_update(update),
            )
            .await
            .map_err(AppError::CatalogUnavailable)
    }

    /// Delete a product. Admin operation.
    ///
    /// Existing order items keep their denormalized copy of the product.
    ///
    /// # Errors
    ///
    /// `CatalogUnavailable` on transport failure.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), AppError> {
        self.store
            .delete(collections::PRODUCTS, id.as_str())
            .await
            .map_err(AppError::CatalogUnavailable)
    }
}

/// Derive the category filter options for a product list: sorted distinct
/// non-empty labels, case preserved, with the [`ALL_CATEGORIES`] sentinel
/// first.
#[must_use]
pub fn category_filters(products: &[Product]) -> Vec<String> {
    let distinct: BTreeSet<&str> = products
        .iter()
        .filter_map(|p| p.category.as_deref())
        .filter(|c| !c.is_empty())
        .collect();

    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(distinct.into_iter().map(str::to_owned))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::docstore::InMemoryDocStore;
    use bakehouse_core::{CurrencyCode, Price};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn product_with_category(category: Option<&str>) -> Product {
        Product {
            id: ProductId::new("p"),
            name: "Cookie".to_string(),
            description: String::new(),
            price: Price::zero(CurrencyCode::Php),
            image_url: None,
            category: category.map(str::to_owned),
            stock: None,
        }
    }

    #[test]
    fn test_category_filters() {
        let products = vec![
            product_with_category(Some("Chocolate")),
            product_with_category(Some("vanilla")),
            product_with_category(Some("Chocolate")),
            product_with_category(Some("")),
            product_with_category(None),
        ];

        assert_eq!(category_filters(&products), vec!["All", "Chocolate", "vanilla"]);
    }

    #[test]
    fn test_category_filters_empty_catalog() {
        assert_eq!(category_filters(&[]), vec!["All"]);
    }

    #[tokio::test]
    async fn test_list_products_normalizes_mixed_casings() {
        let store = InMemoryDocStore::new();
        store.seed(
            collections::PRODUCTS,
            "c1",
            json!({"Name": "Crinkle", "Price": 25, "Category": "Chocolate"}),
        );
        store.seed(
            collections::PRODUCTS,
            "c2",
            json!({"name": "Oatmeal", "price": "18.50"}),
        );

        let gateway = CatalogGateway::new(&store);
        let mut products = gateway.list_products().await.unwrap();
        products.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Crinkle");
        assert_eq!(products[0].price.amount, Decimal::from(25));
        assert_eq!(products[1].name, "Oatmeal");
        assert_eq!(products[1].price.amount, Decimal::new(1850, 2));
    }

    #[tokio::test]
    async fn test_list_products_unavailable() {
        let store = InMemoryDocStore::new();
        store.set_failing(true);

        let gateway = CatalogGateway::new(&store);
        let err = gateway.list_products().await.unwrap_err();
        assert!(matches!(err, AppError::CatalogUnavailable(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_update_patches_only_provided_fields() {
        let store = InMemoryDocStore::new();
        store.seed(
            collections::PRODUCTS,
            "c1",
            json!({"Name": "Crinkle", "Price": 25, "Stock": 3}),
        );

        let gateway = CatalogGateway::new(&store);
        gateway
            .update_product(
                &ProductId::new("c1"),
                &ProductUpdate {
                    stock: Some(10),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap();

        let products = gateway.list_products().await.unwrap();
        assert_eq!(products[0].stock, Some(10));
        assert_eq!(products[0].name, "Crinkle");
        assert_eq!(products[0].price.amount, Decimal::from(25));
    }

    #[tokio::test]
    async fn test_create_then_delete() {
        let store = InMemoryDocStore::new();
        let gateway = CatalogGateway::new(&store);

        let id = gateway
            .create_product(&NewProduct {
                name: "Snickerdoodle".to_string(),
                description: String::new(),
                price: Price::new(Decimal::from(22), CurrencyCode::Php),
                image_url: None,
                category: None,
                stock: Some(4),
            })
            .await
            .unwrap();

        assert_eq!(gateway.list_products().await.unwrap().len(), 1);

        gateway.delete_product(&id).await.unwrap();
        assert!(gateway.list_products().await.unwrap().is_empty());
    }
}
