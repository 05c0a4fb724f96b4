pub mod categories;
pub mod health;
pub mod openapi;
pub mod products;
pub mod skus;
