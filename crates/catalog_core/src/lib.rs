//! Inventory catalog core: Category → Product → SKU.
//!
//! Pure domain crate. It holds the entity model, request/response shapes, field
//! validation, the product search filter, the storage ports and the
//! [`service::CatalogServiceImpl`] integrity engine. The in-memory adapter lives here
//! too. The Postgres adapter is in `catalog_postgres`.

pub mod dto;
pub mod error;
pub mod filter;
pub mod memory;
pub mod page;
pub mod ports;
pub mod service;
pub mod types;
pub mod validation;

pub use error::{CatalogError, FieldViolation};
pub use memory::MemoryStore;
pub use service::{CatalogService, CatalogServiceImpl};
