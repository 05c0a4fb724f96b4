//! Row types decoded by sqlx and their conversion into core entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;

use catalog_core::types::{Attributes, Category, Product, Sku};

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub struct PgCategoryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PgCategoryRow> for Category {
    fn from(r: PgCategoryRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PgProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PgProductRow> for Product {
    fn from(r: PgProductRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            category_id: r.category_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PgSkuRow {
    pub id: i64,
    pub sku_code: String,
    pub quantity: i32,
    pub product_id: i64,
    /// Non-object JSONB fails to decode and surfaces as an internal error.
    pub attributes: Json<Attributes>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PgSkuRow> for Sku {
    fn from(r: PgSkuRow) -> Self {
        Self {
            id: r.id,
            sku_code: r.sku_code,
            quantity: r.quantity,
            product_id: r.product_id,
            attributes: r.attributes.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
