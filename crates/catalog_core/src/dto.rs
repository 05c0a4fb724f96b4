//! Wire-level request/response shapes and their translation to and from entities.
//!
//! Requests keep every field optional so that a missing field is reported as a field
//! violation rather than a deserialization failure. `into_draft` is the only way from
//! a request to something a store accepts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CatalogError;
use crate::types::*;
use crate::validation::{self as v, Violations};

// ── Requests ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkuRequest {
    pub sku_code: Option<String>,
    pub product_id: Option<i64>,
    pub quantity: Option<i32>,
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<Attributes>,
}

impl CategoryRequest {
    pub fn into_draft(self) -> Result<CategoryDraft, CatalogError> {
        let mut errs = Violations::new();
        v::required_text(
            &mut errs,
            "name",
            self.name.as_deref(),
            (v::CATEGORY_NAME_MIN, v::CATEGORY_NAME_MAX),
            "Category name is required",
            "Category name must be between 2 and 100 characters",
        );
        v::optional_text_max(
            &mut errs,
            "description",
            self.description.as_deref(),
            v::CATEGORY_DESCRIPTION_MAX,
            "Description cannot exceed 500 characters",
        );
        errs.finish(|| CategoryDraft {
            name: self.name.unwrap_or_default(),
            description: self.description,
        })
    }
}

impl ProductRequest {
    pub fn into_draft(self) -> Result<ProductDraft, CatalogError> {
        let mut errs = Violations::new();
        v::required_text(
            &mut errs,
            "name",
            self.name.as_deref(),
            (v::PRODUCT_NAME_MIN, v::PRODUCT_NAME_MAX),
            "Product name is required",
            "Product name must be between 2 and 200 characters",
        );
        v::optional_text_max(
            &mut errs,
            "description",
            self.description.as_deref(),
            v::PRODUCT_DESCRIPTION_MAX,
            "Description cannot exceed 1000 characters",
        );
        v::price(&mut errs, "price", self.price.as_ref());
        v::required(
            &mut errs,
            "categoryId",
            self.category_id.as_ref(),
            "Category ID is required",
        );
        errs.finish(|| ProductDraft {
            name: self.name.unwrap_or_default(),
            description: self.description,
            price: v::normalize_price(self.price.unwrap_or_default()),
            category_id: self.category_id.unwrap_or_default(),
        })
    }
}

impl SkuRequest {
    pub fn into_draft(self) -> Result<SkuDraft, CatalogError> {
        let mut errs = Violations::new();
        v::sku_code(&mut errs, "skuCode", self.sku_code.as_deref());
        v::required(
            &mut errs,
            "productId",
            self.product_id.as_ref(),
            "Product ID is required",
        );
        v::quantity(&mut errs, "quantity", self.quantity);
        errs.finish(|| SkuDraft {
            sku_code: self.sku_code.unwrap_or_default(),
            product_id: self.product_id.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
            attributes: self.attributes.unwrap_or_default(),
        })
    }
}

// ── Responses ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub category_id: i64,
    /// Read-time copy of the owning category's name; omitted if the category is gone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkuResponse {
    pub id: i64,
    pub sku_code: String,
    pub product_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity: i32,
    #[schema(value_type = Object)]
    pub attributes: Attributes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl ProductResponse {
    pub fn from_entity(p: Product, category_name: Option<String>) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            category_id: p.category_id,
            category_name,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl SkuResponse {
    pub fn from_entity(s: Sku, product_name: Option<String>) -> Self {
        Self {
            id: s.id,
            sku_code: s.sku_code,
            product_id: s.product_id,
            product_name,
            quantity: s.quantity,
            attributes: s.attributes,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
