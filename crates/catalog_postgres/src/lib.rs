//! catalog_postgres: PostgreSQL adapter for the catalog ports.
//!
//! All SQL is runtime-checked (`sqlx::query_as`), so building the crate never needs
//! a live database. The schema ships as an embedded migration.

pub mod sqlx_types;
pub mod store;

use sqlx::PgPool;

pub use store::{PgCategoryStore, PgProductStore, PgSkuStore};

/// All three catalog stores over one shared pool.
pub struct PgStores {
    pub categories: PgCategoryStore,
    pub products: PgProductStore,
    pub skus: PgSkuStore,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            categories: PgCategoryStore::new(pool.clone()),
            products: PgProductStore::new(pool.clone()),
            skus: PgSkuStore::new(pool),
        }
    }
}

/// Apply the embedded schema migrations.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
