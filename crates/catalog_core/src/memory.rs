//! In-memory store implementing every catalog port.
//!
//! Tables are id-keyed arenas behind one `RwLock`, so a write sees a consistent view
//! of all three tables. The store enforces the same hard constraints as the SQL
//! schema: unique category name, unique SKU code, and the product → category and
//! SKU → product foreign keys. A violating write fails with `Internal`, the same
//! outcome a commit-time constraint error has on Postgres.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::filter::ProductFilter;
use crate::page::{PageRequest, ProductSortField, SortDirection};
use crate::ports::{CategoryStore, ProductStore, Result, SkuStore};
use crate::types::*;

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    skus: BTreeMap<i64, Sku>,
}

impl Tables {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn category_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn sku_code_taken(&self, code: &str, except: Option<i64>) -> bool {
        self.skus
            .values()
            .any(|s| s.sku_code == code && Some(s.id) != except)
    }

    fn check_category_fk(&self, category_id: i64) -> Result<()> {
        if self.categories.contains_key(&category_id) {
            Ok(())
        } else {
            Err(anyhow!("foreign key violation fk_product_category: category {category_id}").into())
        }
    }

    fn check_product_fk(&self, product_id: i64) -> Result<()> {
        if self.products.contains_key(&product_id) {
            Ok(())
        } else {
            Err(anyhow!("foreign key violation fk_sku_product: product {product_id}").into())
        }
    }
}

/// Shared in-process backing store. Cheap to clone behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Text compares bytewise; the Postgres store sorts with `COLLATE "C"` to agree.
fn compare(a: &Product, b: &Product, field: ProductSortField) -> Ordering {
    match field {
        ProductSortField::Id => a.id.cmp(&b.id),
        ProductSortField::Name => a.name.cmp(&b.name),
        ProductSortField::Description => a.description.cmp(&b.description),
        ProductSortField::Price => a.price.cmp(&b.price),
        ProductSortField::CategoryId => a.category_id.cmp(&b.category_id),
        ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        ProductSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

// ── Categories ────────────────────────────────────────────────

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.tables.read().await.categories.contains_key(&id))
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        Ok(self.tables.read().await.category_name_taken(name, None))
    }

    async fn exists_by_name_excluding_id(&self, name: &str, id: i64) -> Result<bool> {
        Ok(self.tables.read().await.category_name_taken(name, Some(id)))
    }

    async fn insert(&self, draft: CategoryDraft) -> Result<Category> {
        let mut t = self.tables.write().await;
        if t.category_name_taken(&draft.name, None) {
            return Err(anyhow!("unique violation uq_category_name: {}", draft.name).into());
        }
        let now = Utc::now();
        let category = Category {
            id: t.assign_id(),
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
        };
        t.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, mut category: Category) -> Result<Category> {
        let mut t = self.tables.write().await;
        if t.category_name_taken(&category.name, Some(category.id)) {
            return Err(anyhow!("unique violation uq_category_name: {}", category.name).into());
        }
        let Some(stored) = t.categories.get_mut(&category.id) else {
            return Err(anyhow!("category {} vanished before update", category.id).into());
        };
        category.created_at = stored.created_at;
        category.updated_at = Utc::now();
        *stored = category.clone();
        Ok(category)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut t = self.tables.write().await;
        if t.products.values().any(|p| p.category_id == id) {
            return Err(anyhow!("foreign key violation fk_product_category: category {id} is referenced").into());
        }
        t.categories.remove(&id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn names_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        let t = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| t.categories.get(id).map(|c| (*id, c.name.clone())))
            .collect())
    }
}

// ── Products ──────────────────────────────────────────────────

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.tables.read().await.products.contains_key(&id))
    }

    async fn exists_by_category_id(&self, category_id: i64) -> Result<bool> {
        Ok(self
            .tables
            .read()
            .await
            .products
            .values()
            .any(|p| p.category_id == category_id))
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product> {
        let mut t = self.tables.write().await;
        t.check_category_fk(draft.category_id)?;
        let now = Utc::now();
        let product = Product {
            id: t.assign_id(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            category_id: draft.category_id,
            created_at: now,
            updated_at: now,
        };
        t.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, mut product: Product) -> Result<Product> {
        let mut t = self.tables.write().await;
        t.check_category_fk(product.category_id)?;
        let Some(stored) = t.products.get_mut(&product.id) else {
            return Err(anyhow!("product {} vanished before update", product.id).into());
        };
        product.created_at = stored.created_at;
        product.updated_at = Utc::now();
        *stored = product.clone();
        Ok(product)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut t = self.tables.write().await;
        if t.skus.values().any(|s| s.product_id == id) {
            return Err(anyhow!("foreign key violation fk_sku_product: product {id} is referenced").into());
        }
        t.products.remove(&id);
        Ok(())
    }

    async fn search(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Product>, u64)> {
        let t = self.tables.read().await;
        let mut matches: Vec<&Product> = t.products.values().filter(|p| filter.matches(p)).collect();
        let total = matches.len() as u64;

        let sort = page.sort;
        matches.sort_by(|a, b| {
            let primary = match sort.direction {
                SortDirection::Asc => compare(a, b, sort.field),
                SortDirection::Desc => compare(b, a, sort.field),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let rows = matches
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .cloned()
            .collect();
        Ok((rows, total))
    }

    async fn names_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        let t = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| t.products.get(id).map(|p| (*id, p.name.clone())))
            .collect())
    }
}

// ── SKUs ──────────────────────────────────────────────────────

#[async_trait]
impl SkuStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Sku>> {
        Ok(self.tables.read().await.skus.get(&id).cloned())
    }

    async fn exists_by_code(&self, sku_code: &str) -> Result<bool> {
        Ok(self.tables.read().await.sku_code_taken(sku_code, None))
    }

    async fn exists_by_code_excluding_id(&self, sku_code: &str, id: i64) -> Result<bool> {
        Ok(self.tables.read().await.sku_code_taken(sku_code, Some(id)))
    }

    async fn insert(&self, draft: SkuDraft) -> Result<Sku> {
        let mut t = self.tables.write().await;
        t.check_product_fk(draft.product_id)?;
        if t.sku_code_taken(&draft.sku_code, None) {
            return Err(anyhow!("unique violation uq_sku_code: {}", draft.sku_code).into());
        }
        let now = Utc::now();
        let sku = Sku {
            id: t.assign_id(),
            sku_code: draft.sku_code,
            quantity: draft.quantity,
            product_id: draft.product_id,
            attributes: draft.attributes,
            created_at: now,
            updated_at: now,
        };
        t.skus.insert(sku.id, sku.clone());
        Ok(sku)
    }

    async fn update(&self, mut sku: Sku) -> Result<Sku> {
        let mut t = self.tables.write().await;
        t.check_product_fk(sku.product_id)?;
        if t.sku_code_taken(&sku.sku_code, Some(sku.id)) {
            return Err(anyhow!("unique violation uq_sku_code: {}", sku.sku_code).into());
        }
        let Some(stored) = t.skus.get_mut(&sku.id) else {
            return Err(anyhow!("sku {} vanished before update", sku.id).into());
        };
        sku.created_at = stored.created_at;
        sku.updated_at = Utc::now();
        *stored = sku.clone();
        Ok(sku)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.tables.write().await.skus.remove(&id);
        Ok(())
    }

    async fn list_by_product_id(&self, product_id: i64) -> Result<Vec<Sku>> {
        Ok(self
            .tables
            .read()
            .await
            .skus
            .values()
            .filter(|s| s.product_id == product_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ProductCriteria;
    use crate::page::Sort;
    use crate::error::CatalogError;

    fn dec(s: &str) -> rust_decimal::Decimal {
        s.parse().unwrap()
    }

    async fn seed_category(store: &MemoryStore, name: &str) -> Category {
        CategoryStore::insert(
            store,
            CategoryDraft {
                name: name.into(),
                description: None,
            },
        )
        .await
        .unwrap()
    }

    async fn seed_product(store: &MemoryStore, name: &str, price: &str, category_id: i64) -> Product {
        ProductStore::insert(
            store,
            ProductDraft {
                name: name.into(),
                description: None,
                price: dec(price),
                category_id,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn ids_are_server_assigned_and_increasing() {
        let store = MemoryStore::new();
        let a = seed_category(&store, "A1").await;
        let b = seed_category(&store, "B1").await;
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn unique_category_name_is_a_hard_constraint() {
        let store = MemoryStore::new();
        seed_category(&store, "Electronics").await;
        let err = CategoryStore::insert(
            &store,
            CategoryDraft {
                name: "Electronics".into(),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogError::Internal(_)));
    }

    #[tokio::test]
    async fn category_update_keeps_created_at() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Electronics").await;
        let mut changed = c.clone();
        changed.name = "Gadgets".into();
        changed.created_at = Utc::now() + chrono::Duration::days(1);
        let saved = CategoryStore::update(&store, changed).await.unwrap();
        assert_eq!(saved.created_at, c.created_at);
        assert!(saved.updated_at >= c.updated_at);
        assert_eq!(saved.name, "Gadgets");
    }

    #[tokio::test]
    async fn product_delete_with_skus_is_rejected_by_fk() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Electronics").await;
        let p = seed_product(&store, "Laptop", "1299.99", c.id).await;
        SkuStore::insert(
            &store,
            SkuDraft {
                sku_code: "LAP-001".into(),
                product_id: p.id,
                quantity: 1,
                attributes: Attributes::new(),
            },
        )
        .await
        .unwrap();
        let err = ProductStore::delete(&store, p.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::Internal(_)));
    }

    #[tokio::test]
    async fn search_sorts_with_id_tiebreak_and_pages() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Electronics").await;
        let first = seed_product(&store, "Same", "10.00", c.id).await;
        let second = seed_product(&store, "Same", "10.00", c.id).await;
        seed_product(&store, "Alpha", "99.00", c.id).await;

        let sort = Sort {
            field: ProductSortField::Price,
            direction: SortDirection::Asc,
        };
        let page = PageRequest::new(0, 2, sort).unwrap();
        let (rows, total) = store
            .search(&ProductCriteria::default().to_filter(), &page)
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.iter().map(|p| p.id).collect::<Vec<_>>(), vec![first.id, second.id]);

        let page = PageRequest::new(1, 2, sort).unwrap();
        let (rows, _) = store
            .search(&ProductCriteria::default().to_filter(), &page)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Alpha");
    }

    #[tokio::test]
    async fn name_sort_is_bytewise() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Electronics").await;
        for name in ["apple", "Zebra", "Banana"] {
            seed_product(&store, name, "1.00", c.id).await;
        }
        let (rows, _) = store
            .search(&ProductCriteria::default().to_filter(), &PageRequest::default())
            .await
            .unwrap();
        let names: Vec<_> = rows.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Banana", "Zebra", "apple"]);
    }

    #[tokio::test]
    async fn names_by_ids_skips_unknown_ids() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Electronics").await;
        let names = CategoryStore::names_by_ids(&store, &[c.id, 999]).await.unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[&c.id], "Electronics");
    }
}
