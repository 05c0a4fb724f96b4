//! Entity model for the catalog: Category → Product → SKU.
//!
//! References point one way only. A Product holds its `category_id`, a SKU holds its
//! `product_id`, and no parent ever carries a collection of children. "Children of X"
//! is always a store query.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Free-form SKU variant attributes (color, storage, ram, …). No schema is enforced.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

// ── Entities ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub id: i64,
    pub sku_code: String,
    pub quantity: i32,
    pub product_id: i64,
    pub attributes: Attributes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Drafts ────────────────────────────────────────────────────
//
// A draft is the field-validated, non-optional form of an inbound request. Stores
// only ever receive drafts or whole entities, never raw requests.

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkuDraft {
    pub sku_code: String,
    pub product_id: i64,
    pub quantity: i32,
    pub attributes: Attributes,
}

impl Category {
    /// Overwrite the mutable fields. `id` and `created_at` are never touched.
    pub fn apply(&mut self, draft: CategoryDraft) {
        self.name = draft.name;
        self.description = draft.description;
    }
}

impl Product {
    /// Overwrite the mutable fields, including the category link.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.category_id = draft.category_id;
    }
}

impl Sku {
    /// Overwrite the mutable fields, including the product link.
    pub fn apply(&mut self, draft: SkuDraft) {
        self.sku_code = draft.sku_code;
        self.quantity = draft.quantity;
        self.product_id = draft.product_id;
        self.attributes = draft.attributes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn category() -> Category {
        let now = Utc::now();
        Category {
            id: 7,
            name: "Electronics".into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn category_apply_preserves_identity() {
        let mut c = category();
        let created = c.created_at;
        c.apply(CategoryDraft {
            name: "Gadgets".into(),
            description: Some("small things".into()),
        });
        assert_eq!(c.id, 7);
        assert_eq!(c.created_at, created);
        assert_eq!(c.name, "Gadgets");
        assert_eq!(c.description.as_deref(), Some("small things"));
    }

    #[test]
    fn product_apply_relinks_category() {
        let now = Utc::now();
        let mut p = Product {
            id: 1,
            name: "Laptop".into(),
            description: None,
            price: dec("1299.99"),
            category_id: 1,
            created_at: now,
            updated_at: now,
        };
        p.apply(ProductDraft {
            name: "Laptop Pro".into(),
            description: None,
            price: dec("1499.00"),
            category_id: 2,
        });
        assert_eq!(p.id, 1);
        assert_eq!(p.category_id, 2);
        assert_eq!(p.price, dec("1499.00"));
    }

    #[test]
    fn sku_apply_replaces_attributes() {
        let now = Utc::now();
        let mut attrs = Attributes::new();
        attrs.insert("color".into(), serde_json::json!("black"));
        let mut s = Sku {
            id: 3,
            sku_code: "LAP-001".into(),
            quantity: 10,
            product_id: 1,
            attributes: attrs,
            created_at: now,
            updated_at: now,
        };
        s.apply(SkuDraft {
            sku_code: "LAP-002".into(),
            product_id: 4,
            quantity: 0,
            attributes: Attributes::new(),
        });
        assert_eq!(s.sku_code, "LAP-002");
        assert_eq!(s.product_id, 4);
        assert_eq!(s.quantity, 0);
        assert!(s.attributes.is_empty());
    }
}
