//! Field normalization between document-store records and [`Product`].
//!
//! The product collection predates the current field naming and holds a
//! mix of legacy capitalized keys (`Name`, `Price`, ...) and
//! current-cased ones. All coercion happens here, through one alias
//! table, instead of inline at every read site.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use bakehouse_core::{CurrencyCode, Price, ProductId};

use crate::db::value;
use crate::docstore::Document;
use crate::models::{NewProduct, Product, ProductUpdate};

/// Canonical field name → accepted aliases, checked in order. Legacy
/// capitalized names win over current casing, matching what the store
/// actually holds.
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("name", &["Name", "name"]),
    ("description", &["Description", "description"]),
    ("price", &["Price", "price"]),
    ("image_url", &["ImageUrl", "imageUrl"]),
    ("category", &["Category", "category"]),
    ("stock", &["Stock", "stock"]),
];

/// Key products are written under (the legacy casing, so old and new
/// records stay uniform in the collection).
const WRITE_KEYS: WriteKeys = WriteKeys {
    name: "Name",
    description: "Description",
    price: "Price",
    image_url: "ImageUrl",
    category: "Category",
    stock: "Stock",
};

struct WriteKeys {
    name: &'static str,
    description: &'static str,
    price: &'static str,
    image_url: &'static str,
    category: &'static str,
    stock: &'static str,
}

/// Look up a canonical field through the alias table.
fn aliased<'a>(data: &'a Map<String, Value>, canonical: &str) -> Option<&'a Value> {
    let (_, aliases) = FIELD_ALIASES
        .iter()
        .find(|(name, _)| *name == canonical)?;
    aliases.iter().find_map(|alias| data.get(*alias))
}

fn string_field(data: &Map<String, Value>, canonical: &str) -> Option<String> {
    aliased(data, canonical).and_then(value::as_string)
}

fn decimal_field(data: &Map<String, Value>, canonical: &str) -> Option<Decimal> {
    aliased(data, canonical).and_then(value::as_decimal)
}

fn stock_field(data: &Map<String, Value>) -> Option<u32> {
    aliased(data, "stock").and_then(value::as_u32)
}

/// Normalize a fetched document into the canonical product shape.
///
/// Missing name/description/price degrade to empty strings and a zero
/// price rather than dropping the record; a missing stock field means
/// stock is untracked.
#[must_use]
pub fn product_from_document(doc: &Document) -> Product {
    Product {
        id: ProductId::new(doc.id.clone()),
        name: string_field(&doc.data, "name").unwrap_or_default(),
        description: string_field(&doc.data, "description").unwrap_or_default(),
        price: Price::new(
            decimal_field(&doc.data, "price").unwrap_or_default(),
            CurrencyCode::Php,
        ),
        image_url: string_field(&doc.data, "image_url"),
        category: string_field(&doc.data, "category"),
        stock: stock_field(&doc.data),
    }
}

/// Build the document body for a new product.
///
/// Prices are written as decimal strings to keep them minor-unit exact;
/// the reader accepts both strings and legacy numbers.
#[must_use]
pub fn document_from_new_product(product: &NewProduct) -> Value {
    let mut fields = Map::new();
    fields.insert(WRITE_KEYS.name.to_string(), Value::from(product.name.clone()));
    fields.insert(
        WRITE_KEYS.description.to_string(),
        Value::from(product.description.clone()),
    );
    fields.insert(
        WRITE_KEYS.price.to_string(),
        Value::from(product.price.amount.to_string()),
    );
    if let Some(url) = &product.image_url {
        fields.insert(WRITE_KEYS.image_url.to_string(), Value::from(url.clone()));
    }
    if let Some(category) = &product.category {
        fields.insert(WRITE_KEYS.category.to_string(), Value::from(category.clone()));
    }
    if let Some(stock) = product.stock {
        fields.insert(WRITE_KEYS.stock.to_string(), Value::from(stock));
    }
    Value::Object(fields)
}

/// Build a merge patch carrying only the explicitly provided fields.
#[must_use]
pub fn patch_from_update(update: &ProductUpdate) -> Value {
    let mut fields = Map::new();
    if let Some(name) = &update.name {
        fields.insert(WRITE_KEYS.name.to_string(), Value::from(name.clone()));
    }
    if let Some(description) = &update.description {
        fields.insert(
            WRITE_KEYS.description.to_string(),
            Value::from(description.clone()),
        );
    }
    if let Some(price) = &update.price {
        fields.insert(
            WRITE_KEYS.price.to_string(),
            Value::from(price.amount.to_string()),
        );
    }
    if let Some(url) = &update.image_url {
        fields.insert(WRITE_KEYS.image_url.to_string(), Value::from(url.clone()));
    }
    if let Some(category) = &update.category {
        fields.insert(WRITE_KEYS.category.to_string(), Value::from(category.clone()));
    }
    if let Some(stock) = update.stock {
        fields.insert(WRITE_KEYS.stock.to_string(), Value::from(stock));
    }
    Value::Object(fields)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_capitalized_fields() {
        let doc = Document::new(
            "c1",
            json!({
                "Name": "Choco Crinkle",
                "Description": "Fudgy",
                "Price": 25.5,
                "ImageUrl": "https://img.example.com/crinkle.jpg",
                "Category": "Chocolate",
                "Stock": 12
            }),
        );

        let product = product_from_document(&doc);
        assert_eq!(product.name, "Choco Crinkle");
        assert_eq!(product.price.amount, Decimal::new(255, 1));
        assert_eq!(product.category.as_deref(), Some("Chocolate"));
        assert_eq!(product.stock, Some(12));
    }

    #[test]
    fn test_current_cased_fields() {
        let doc = Document::new(
            "c2",
            json!({
                "name": "Oatmeal",
                "description": "Chewy",
                "price": "18.00",
                "imageUrl": "https://img.example.com/oat.jpg"
            }),
        );

        let product = product_from_document(&doc);
        assert_eq!(product.name, "Oatmeal");
        assert_eq!(product.price.amount, Decimal::new(1800, 2));
        assert_eq!(product.image_url.as_deref(), Some("https://img.example.com/oat.jpg"));
        assert_eq!(product.category, None);
        assert_eq!(product.stock, None);
    }

    #[test]
    fn test_legacy_casing_wins_when_both_present() {
        let doc = Document::new("c3", json!({"Name": "Legacy", "name": "Current"}));
        assert_eq!(product_from_document(&doc).name, "Legacy");
    }

    #[test]
    fn test_missing_fields_degrade() {
        let doc = Document::new("c4", json!({}));
        let product = product_from_document(&doc);
        assert_eq!(product.name, "");
        assert_eq!(product.price.amount, Decimal::ZERO);
        assert_eq!(product.stock, None);
    }

    #[test]
    fn test_patch_carries_only_provided_fields() {
        let update = ProductUpdate {
            price: Some(Price::new(Decimal::new(3000, 2), CurrencyCode::Php)),
            stock: Some(5),
            ..ProductUpdate::default()
        };

        let patch = patch_from_update(&update);
        let obj = patch.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("Price"), Some(&json!("30.00")));
        assert_eq!(obj.get("Stock"), Some(&json!(5)));
        assert!(!obj.contains_key("Name"));
    }

    #[test]
    fn test_new_product_written_with_legacy_keys() {
        let new = NewProduct {
            name: "Snickerdoodle".to_string(),
            description: "Cinnamon sugar".to_string(),
            price: Price::new(Decimal::new(2200, 2), CurrencyCode::Php),
            image_url: None,
            category: Some("Classics".to_string()),
            stock: None,
        };

        let body = document_from_new_product(&new);
        let obj = body.as_object().unwrap();
        assert_eq!(obj.get("Name"), Some(&json!("Snickerdoodle")));
        assert_eq!(obj.get("Price"), Some(&json!("22.00")));
        assert_eq!(obj.get("Category"), Some(&json!("Classics")));
        assert!(!obj.contains_key("ImageUrl"));
        assert!(!obj.contains_key("Stock"));
    }
}
