//! Router construction for the catalog server.

use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    middleware as axum_mw,
    routing::{get, post},
    Extension, Router,
};
use catalog_core::service::CatalogService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{error_envelope, AppError};
use crate::handlers;

/// Build the full axum router with all routes and middleware.
pub fn build_router(service: Arc<dyn CatalogService>) -> Router {
    let categories = Router::new()
        .route(
            "/categories",
            post(handlers::categories::create_category).get(handlers::categories::list_categories),
        )
        .route(
            "/categories/:id",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        );

    let products = Router::new()
        .route(
            "/products",
            post(handlers::products::create_product).get(handlers::products::search_products),
        )
        .route(
            "/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let skus = Router::new()
        .route(
            "/skus",
            post(handlers::skus::create_sku).get(handlers::skus::list_skus),
        )
        .route(
            "/skus/:id",
            get(handlers::skus::get_sku)
                .put(handlers::skus::update_sku)
                .delete(handlers::skus::delete_sku),
        );

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api-docs/openapi.json", get(handlers::openapi::get_openapi_json))
        .merge(categories)
        .merge(products)
        .merge(skus)
        .fallback(route_not_found)
        .layer(Extension(service))
        .layer(axum_mw::from_fn(error_envelope))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::RouteNotFound {
        method,
        path: uri.path().to_string(),
    }
}
