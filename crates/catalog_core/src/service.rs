//! CatalogService: the validation and integrity engine for the catalog.
//!
//! Every mutation is guarded here before it reaches a store: existence of the target,
//! existence of the referenced parent, uniqueness of the natural key and, for
//! categories, the absence of dependent products. The stores remain the correctness
//! backstop for races between a check and its write.
//!
//! Responses carry the parent's display name, resolved at read time. A parent that
//! cannot be resolved leaves the field empty instead of failing the read.

use std::sync::Arc;

use async_trait::async_trait;

use crate::dto::*;
use crate::error::CatalogError;
use crate::filter::ProductCriteria;
use crate::page::{Page, PageRequest};
use crate::ports::{CategoryStore, ProductStore, Result, SkuStore};

// ── CatalogService trait ──────────────────────────────────────

/// The single service interface the HTTP layer talks to.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn create_category(&self, req: CategoryRequest) -> Result<CategoryResponse>;
    async fn get_category(&self, id: i64) -> Result<CategoryResponse>;
    /// Every category, unpaginated, ordered by id.
    async fn list_categories(&self) -> Result<Vec<CategoryResponse>>;
    async fn update_category(&self, id: i64, req: CategoryRequest) -> Result<CategoryResponse>;
    /// Refused while any product still references the category.
    async fn delete_category(&self, id: i64) -> Result<()>;

    async fn create_product(&self, req: ProductRequest) -> Result<ProductResponse>;
    async fn get_product(&self, id: i64) -> Result<ProductResponse>;
    async fn search_products(
        &self,
        criteria: ProductCriteria,
        page: PageRequest,
    ) -> Result<Page<ProductResponse>>;
    async fn update_product(&self, id: i64, req: ProductRequest) -> Result<ProductResponse>;
    /// Not guarded against dependent SKUs; a store with a foreign key will refuse it.
    async fn delete_product(&self, id: i64) -> Result<()>;

    async fn create_sku(&self, req: SkuRequest) -> Result<SkuResponse>;
    async fn get_sku(&self, id: i64) -> Result<SkuResponse>;
    /// SKUs of an existing product, ordered by id. Empty when it has none.
    async fn list_skus_by_product(&self, product_id: i64) -> Result<Vec<SkuResponse>>;
    async fn update_sku(&self, id: i64, req: SkuRequest) -> Result<SkuResponse>;
    async fn delete_sku(&self, id: i64) -> Result<()>;
}

// ── CatalogServiceImpl ────────────────────────────────────────

pub struct CatalogServiceImpl {
    pub categories: Arc<dyn CategoryStore>,
    pub products: Arc<dyn ProductStore>,
    pub skus: Arc<dyn SkuStore>,
}

impl CatalogServiceImpl {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        products: Arc<dyn ProductStore>,
        skus: Arc<dyn SkuStore>,
    ) -> Self {
        Self {
            categories,
            products,
            skus,
        }
    }

    async fn category_name(&self, id: i64) -> Result<Option<String>> {
        Ok(self.categories.names_by_ids(&[id]).await?.remove(&id))
    }

    async fn product_name(&self, id: i64) -> Result<Option<String>> {
        Ok(self.products.names_by_ids(&[id]).await?.remove(&id))
    }

    async fn require_category(&self, id: i64) -> Result<()> {
        if self.categories.exists_by_id(id).await? {
            Ok(())
        } else {
            tracing::warn!(category_id = id, "referenced category does not exist");
            Err(CatalogError::not_found("Category", id))
        }
    }

    async fn require_product(&self, id: i64) -> Result<()> {
        if self.products.exists_by_id(id).await? {
            Ok(())
        } else {
            tracing::warn!(product_id = id, "referenced product does not exist");
            Err(CatalogError::not_found("Product", id))
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    // ── Categories ────────────────────────────────────────────

    async fn create_category(&self, req: CategoryRequest) -> Result<CategoryResponse> {
        tracing::debug!(name = ?req.name, "create category");
        let draft = req.into_draft()?;
        if self.categories.exists_by_name(&draft.name).await? {
            tracing::warn!(name = %draft.name, "category name already taken");
            return Err(CatalogError::duplicate_name(&draft.name));
        }
        let saved = self.categories.insert(draft).await?;
        tracing::info!(category_id = saved.id, "category created");
        Ok(saved.into())
    }

    async fn get_category(&self, id: i64) -> Result<CategoryResponse> {
        tracing::debug!(category_id = id, "get category");
        self.categories
            .find_by_id(id)
            .await?
            .map(CategoryResponse::from)
            .ok_or_else(|| CatalogError::not_found("Category", id))
    }

    async fn list_categories(&self) -> Result<Vec<CategoryResponse>> {
        tracing::debug!("list categories");
        let mut all = self.categories.list_all().await?;
        all.sort_by_key(|c| c.id);
        Ok(all.into_iter().map(CategoryResponse::from).collect())
    }

    async fn update_category(&self, id: i64, req: CategoryRequest) -> Result<CategoryResponse> {
        tracing::debug!(category_id = id, "update category");
        let draft = req.into_draft()?;
        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Category", id))?;
        if self
            .categories
            .exists_by_name_excluding_id(&draft.name, id)
            .await?
        {
            tracing::warn!(category_id = id, name = %draft.name, "category name already taken");
            return Err(CatalogError::duplicate_name(&draft.name));
        }
        category.apply(draft);
        let saved = self.categories.update(category).await?;
        tracing::info!(category_id = saved.id, "category updated");
        Ok(saved.into())
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        tracing::debug!(category_id = id, "delete category");
        let category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Category", id))?;
        if self.products.exists_by_category_id(id).await? {
            tracing::warn!(category_id = id, "category still has products");
            return Err(CatalogError::IntegrityConflict {
                entity: "Category",
                reason: format!(
                    "Cannot delete category '{}' because it has associated products. \
                     Please delete or reassign the products first.",
                    category.name
                ),
            });
        }
        self.categories.delete(id).await?;
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }

    // ── Products ──────────────────────────────────────────────

    async fn create_product(&self, req: ProductRequest) -> Result<ProductResponse> {
        tracing::debug!(category_id = ?req.category_id, "create product");
        let draft = req.into_draft()?;
        self.require_category(draft.category_id).await?;
        let saved = self.products.insert(draft).await?;
        tracing::info!(product_id = saved.id, category_id = saved.category_id, "product created");
        let name = self.category_name(saved.category_id).await?;
        Ok(ProductResponse::from_entity(saved, name))
    }

    async fn get_product(&self, id: i64) -> Result<ProductResponse> {
        tracing::debug!(product_id = id, "get product");
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;
        let name = self.category_name(product.category_id).await?;
        Ok(ProductResponse::from_entity(product, name))
    }

    async fn search_products(
        &self,
        criteria: ProductCriteria,
        page: PageRequest,
    ) -> Result<Page<ProductResponse>> {
        tracing::debug!(?criteria, page = page.page, size = page.size, "search products");
        let filter = criteria.to_filter();
        let (rows, total) = self.products.search(&filter, &page).await?;

        let mut ids: Vec<i64> = rows.iter().map(|p| p.category_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let names = self.categories.names_by_ids(&ids).await?;

        Ok(Page::new(rows, &page, total).map(|p| {
            let name = names.get(&p.category_id).cloned();
            ProductResponse::from_entity(p, name)
        }))
    }

    async fn update_product(&self, id: i64, req: ProductRequest) -> Result<ProductResponse> {
        tracing::debug!(product_id = id, "update product");
        let draft = req.into_draft()?;
        let mut product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;
        self.require_category(draft.category_id).await?;
        product.apply(draft);
        let saved = self.products.update(product).await?;
        tracing::info!(product_id = saved.id, "product updated");
        let name = self.category_name(saved.category_id).await?;
        Ok(ProductResponse::from_entity(saved, name))
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        tracing::debug!(product_id = id, "delete product");
        if !self.products.exists_by_id(id).await? {
            return Err(CatalogError::not_found("Product", id));
        }
        self.products.delete(id).await?;
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }

    // ── SKUs ──────────────────────────────────────────────────

    async fn create_sku(&self, req: SkuRequest) -> Result<SkuResponse> {
        tracing::debug!(sku_code = ?req.sku_code, "create sku");
        let draft = req.into_draft()?;
        self.require_product(draft.product_id).await?;
        if self.skus.exists_by_code(&draft.sku_code).await? {
            tracing::warn!(sku_code = %draft.sku_code, "sku code already taken");
            return Err(CatalogError::duplicate_code(&draft.sku_code));
        }
        let saved = self.skus.insert(draft).await?;
        tracing::info!(sku_id = saved.id, product_id = saved.product_id, "sku created");
        let name = self.product_name(saved.product_id).await?;
        Ok(SkuResponse::from_entity(saved, name))
    }

    async fn get_sku(&self, id: i64) -> Result<SkuResponse> {
        tracing::debug!(sku_id = id, "get sku");
        let sku = self
            .skus
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("SKU", id))?;
        let name = self.product_name(sku.product_id).await?;
        Ok(SkuResponse::from_entity(sku, name))
    }

    async fn list_skus_by_product(&self, product_id: i64) -> Result<Vec<SkuResponse>> {
        tracing::debug!(product_id, "list skus by product");
        self.require_product(product_id).await?;
        let name = self.product_name(product_id).await?;
        let skus = self.skus.list_by_product_id(product_id).await?;
        Ok(skus
            .into_iter()
            .map(|s| SkuResponse::from_entity(s, name.clone()))
            .collect())
    }

    async fn update_sku(&self, id: i64, req: SkuRequest) -> Result<SkuResponse> {
        tracing::debug!(sku_id = id, "update sku");
        let draft = req.into_draft()?;
        let mut sku = self
            .skus
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("SKU", id))?;
        self.require_product(draft.product_id).await?;
        if self
            .skus
            .exists_by_code_excluding_id(&draft.sku_code, id)
            .await?
        {
            tracing::warn!(sku_id = id, sku_code = %draft.sku_code, "sku code already taken");
            return Err(CatalogError::duplicate_code(&draft.sku_code));
        }
        sku.apply(draft);
        let saved = self.skus.update(sku).await?;
        tracing::info!(sku_id = saved.id, "sku updated");
        let name = self.product_name(saved.product_id).await?;
        Ok(SkuResponse::from_entity(saved, name))
    }

    async fn delete_sku(&self, id: i64) -> Result<()> {
        tracing::debug!(sku_id = id, "delete sku");
        if self.skus.find_by_id(id).await?.is_none() {
            return Err(CatalogError::not_found("SKU", id));
        }
        self.skus.delete(id).await?;
        tracing::info!(sku_id = id, "sku deleted");
        Ok(())
    }
}
