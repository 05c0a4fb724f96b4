//! Postgres implementations of the catalog port traits.
//!
//! Each adapter is a newtype wrapping PgPool. Hard constraints live in the schema
//! (unique name, unique SKU code, foreign keys); a violation comes back as a
//! database error and propagates as `CatalogError::Internal`.

use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use catalog_core::filter::{ProductFilter, ProductPredicate};
use catalog_core::page::{PageRequest, ProductSortField, Sort, SortDirection};
use catalog_core::ports::{CategoryStore, ProductStore, Result, SkuStore};
use catalog_core::types::*;

use crate::sqlx_types::{PgCategoryRow, PgProductRow, PgSkuRow, PRODUCT_COLUMNS};

// ── PgCategoryStore ───────────────────────────────────────────

pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, PgCategoryRow>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(row.map(Into::into))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(exists)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(exists)
    }

    async fn exists_by_name_excluding_id(&self, name: &str, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND id <> $2)",
        )
        .bind(name)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(exists)
    }

    async fn insert(&self, draft: CategoryDraft) -> Result<Category> {
        let row = sqlx::query_as::<_, PgCategoryRow>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(row.into())
    }

    async fn update(&self, category: Category) -> Result<Category> {
        let row = sqlx::query_as::<_, PgCategoryRow>(
            r#"
            UPDATE categories
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        row.map(Into::into)
            .ok_or_else(|| anyhow!("category {} vanished before update", category.id).into())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, PgCategoryRow>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn names_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM categories WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(rows.into_iter().collect())
    }
}

// ── PgProductStore ────────────────────────────────────────────

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `\`, `%` and `_` are literal inside the search needle.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Append `AND <condition>` for every predicate. `Any` renders as `TRUE`.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    for predicate in filter.predicates() {
        qb.push(" AND ");
        match predicate {
            ProductPredicate::Any => {
                qb.push("TRUE");
            }
            ProductPredicate::NameContains(needle) => {
                qb.push("LOWER(name) LIKE ");
                qb.push_bind(format!("%{}%", escape_like(needle)));
                qb.push(r" ESCAPE '\'");
            }
            ProductPredicate::CategoryIs(id) => {
                qb.push("category_id = ");
                qb.push_bind(*id);
            }
            ProductPredicate::PriceAtLeast(min) => {
                qb.push("price >= ");
                qb.push_bind(*min);
            }
            ProductPredicate::PriceAtMost(max) => {
                qb.push("price <= ");
                qb.push_bind(*max);
            }
        }
    }
}

/// Append `ORDER BY`, matching how `MemoryStore` orders rows: text compares
/// bytewise (`COLLATE "C"`, the same as `String`'s `Ord`), NULL descriptions sit
/// where `None` does, and `id` breaks ties.
fn push_order(qb: &mut QueryBuilder<'_, Postgres>, sort: Sort) {
    let collate = match sort.field {
        ProductSortField::Name | ProductSortField::Description => r#" COLLATE "C""#,
        _ => "",
    };
    let nulls = match sort.direction {
        SortDirection::Asc => "NULLS FIRST",
        SortDirection::Desc => "NULLS LAST",
    };
    qb.push(format!(
        " ORDER BY {}{collate} {} {nulls}, id ASC",
        sort.field.column(),
        sort.direction.as_sql(),
    ));
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, PgProductRow>(
            r#"
            SELECT id, name, description, price, category_id, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(row.map(Into::into))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| anyhow!(e))?;
        Ok(exists)
    }

    async fn exists_by_category_id(&self, category_id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE category_id = $1)",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(exists)
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product> {
        let row = sqlx::query_as::<_, PgProductRow>(
            r#"
            INSERT INTO products (name, description, price, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, category_id, created_at, updated_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(row.into())
    }

    async fn update(&self, product: Product) -> Result<Product> {
        let row = sqlx::query_as::<_, PgProductRow>(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, category_id = $5, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, price, category_id, created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        row.map(Into::into)
            .ok_or_else(|| anyhow!("product {} vanished before update", product.id).into())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(())
    }

    async fn search(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Product>, u64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products WHERE 1=1");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE 1=1"
        ));
        push_filter(&mut select, filter);

        push_order(&mut select, page.sort);
        select.push(" LIMIT ");
        select.push_bind(i64::try_from(page.limit()).unwrap_or(i64::MAX));
        select.push(" OFFSET ");
        select.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = select
            .build_query_as::<PgProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;

        tracing::debug!(total, returned = rows.len(), "product search");
        Ok((
            rows.into_iter().map(Into::into).collect(),
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn names_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows =
            sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM products WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| anyhow!(e))?;
        Ok(rows.into_iter().collect())
    }
}

// ── PgSkuStore ────────────────────────────────────────────────

pub struct PgSkuStore {
    pool: PgPool,
}

impl PgSkuStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SkuStore for PgSkuStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Sku>> {
        let row = sqlx::query_as::<_, PgSkuRow>(
            r#"
            SELECT id, sku_code, quantity, product_id, attributes, created_at, updated_at
            FROM skus
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(row.map(Into::into))
    }

    async fn exists_by_code(&self, sku_code: &str) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM skus WHERE sku_code = $1)")
                .bind(sku_code)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| anyhow!(e))?;
        Ok(exists)
    }

    async fn exists_by_code_excluding_id(&self, sku_code: &str, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM skus WHERE sku_code = $1 AND id <> $2)",
        )
        .bind(sku_code)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(exists)
    }

    async fn insert(&self, draft: SkuDraft) -> Result<Sku> {
        let row = sqlx::query_as::<_, PgSkuRow>(
            r#"
            INSERT INTO skus (sku_code, quantity, product_id, attributes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sku_code, quantity, product_id, attributes, created_at, updated_at
            "#,
        )
        .bind(&draft.sku_code)
        .bind(draft.quantity)
        .bind(draft.product_id)
        .bind(Json(&draft.attributes))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(row.into())
    }

    async fn update(&self, sku: Sku) -> Result<Sku> {
        let row = sqlx::query_as::<_, PgSkuRow>(
            r#"
            UPDATE skus
            SET sku_code = $2, quantity = $3, product_id = $4, attributes = $5, updated_at = now()
            WHERE id = $1
            RETURNING id, sku_code, quantity, product_id, attributes, created_at, updated_at
            "#,
        )
        .bind(sku.id)
        .bind(&sku.sku_code)
        .bind(sku.quantity)
        .bind(sku.product_id)
        .bind(Json(&sku.attributes))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        row.map(Into::into)
            .ok_or_else(|| anyhow!("sku {} vanished before update", sku.id).into())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM skus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(())
    }

    async fn list_by_product_id(&self, product_id: i64) -> Result<Vec<Sku>> {
        let rows = sqlx::query_as::<_, PgSkuRow>(
            r#"
            SELECT id, sku_code, quantity, product_id, attributes, created_at, updated_at
            FROM skus
            WHERE product_id = $1
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
