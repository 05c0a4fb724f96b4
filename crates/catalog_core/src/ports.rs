//! Storage port traits for the catalog.
//! Implemented by `MemoryStore` here and by catalog_postgres. The service depends only on these traits.
//!
//! Stores are assumed reliable and strongly consistent. Any failure they report is
//! terminal for the call and surfaces as `CatalogError::Internal`. Each store must also
//! enforce the hard constraints itself (unique category name, unique SKU code,
//! foreign keys), because the service's existence and uniqueness checks are not
//! atomic with the write that follows them.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::filter::ProductFilter;
use crate::page::PageRequest;
use crate::types::*;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>>;

    async fn exists_by_id(&self, id: i64) -> Result<bool>;

    /// Exact, case-sensitive name match.
    async fn exists_by_name(&self, name: &str) -> Result<bool>;

    /// Whether a category other than `id` already uses `name`.
    async fn exists_by_name_excluding_id(&self, name: &str, id: i64) -> Result<bool>;

    /// Persist a new category; the store assigns id and timestamps.
    async fn insert(&self, draft: CategoryDraft) -> Result<Category>;

    /// Write back the mutable fields of an existing category and bump `updated_at`.
    async fn update(&self, category: Category) -> Result<Category>;

    async fn delete(&self, id: i64) -> Result<()>;

    async fn list_all(&self) -> Result<Vec<Category>>;

    /// Display names for a batch of ids. Ids that do not resolve are simply absent.
    async fn names_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, String>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>>;

    async fn exists_by_id(&self, id: i64) -> Result<bool>;

    /// Whether any product references the category.
    async fn exists_by_category_id(&self, category_id: i64) -> Result<bool>;

    async fn insert(&self, draft: ProductDraft) -> Result<Product>;

    async fn update(&self, product: Product) -> Result<Product>;

    async fn delete(&self, id: i64) -> Result<()>;

    /// One page of matches in the requested order, plus the total match count.
    async fn search(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Product>, u64)>;

    async fn names_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, String>>;
}

#[async_trait]
pub trait SkuStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Sku>>;

    async fn exists_by_code(&self, sku_code: &str) -> Result<bool>;

    async fn exists_by_code_excluding_id(&self, sku_code: &str, id: i64) -> Result<bool>;

    async fn insert(&self, draft: SkuDraft) -> Result<Sku>;

    async fn update(&self, sku: Sku) -> Result<Sku>;

    async fn delete(&self, id: i64) -> Result<()>;

    /// All SKUs of one product, ordered by id.
    async fn list_by_product_id(&self, product_id: i64) -> Result<Vec<Sku>>;
}
