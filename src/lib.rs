//! inventory-catalog: REST server for the Category → Product → SKU catalog.
//!
//! The engine and storage ports live in `catalog_core`; this crate is the HTTP
//! boundary around them.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod openapi;
pub mod router;

pub use router::build_router;
