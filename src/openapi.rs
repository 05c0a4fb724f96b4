//! OpenAPI document for the catalog REST API, served at `/api-docs/openapi.json`.

use std::sync::OnceLock;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Catalog API",
        description = "Categories, products and SKUs with product search and paging."
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::openapi::get_openapi_json,
        crate::handlers::categories::create_category,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::products::create_product,
        crate::handlers::products::search_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::skus::create_sku,
        crate::handlers::skus::list_skus,
        crate::handlers::skus::get_sku,
        crate::handlers::skus::update_sku,
        crate::handlers::skus::delete_sku,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::handlers::health::HealthStatus,
            catalog_core::error::FieldViolation,
            catalog_core::dto::CategoryRequest,
            catalog_core::dto::CategoryResponse,
            catalog_core::dto::ProductRequest,
            catalog_core::dto::ProductResponse,
            catalog_core::dto::SkuRequest,
            catalog_core::dto::SkuResponse,
            catalog_core::page::ProductPage,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "openapi", description = "This document"),
        (name = "categories", description = "Category operations"),
        (name = "products", description = "Product operations and search"),
        (name = "skus", description = "SKU operations"),
    ),
)]
pub struct CatalogApiDoc;

pub fn openapi() -> utoipa::openapi::OpenApi {
    CatalogApiDoc::openapi()
}

static OPENAPI_JSON: OnceLock<String> = OnceLock::new();

/// The document as pretty JSON, generated once.
pub fn openapi_json() -> Result<String, serde_json::Error> {
    if let Some(spec) = OPENAPI_JSON.get() {
        return Ok(spec.clone());
    }
    let spec = serde_json::to_string_pretty(&openapi())?;
    let _ = OPENAPI_JSON.set(spec.clone());
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn spec() -> Value {
        serde_json::to_value(openapi()).unwrap()
    }

    #[test]
    fn every_route_is_documented() {
        let spec = spec();
        let paths = spec["paths"].as_object().unwrap();
        for (path, methods) in [
            ("/health", &["get"][..]),
            ("/api-docs/openapi.json", &["get"]),
            ("/categories", &["get", "post"]),
            ("/categories/{id}", &["get", "put", "delete"]),
            ("/products", &["get", "post"]),
            ("/products/{id}", &["get", "put", "delete"]),
            ("/skus", &["get", "post"]),
            ("/skus/{id}", &["get", "put", "delete"]),
        ] {
            for method in methods {
                assert!(
                    paths.get(path).and_then(|p| p.get(*method)).is_some(),
                    "missing {method} {path}"
                );
            }
        }
    }

    #[test]
    fn search_documents_camel_case_query_parameters() {
        let spec = spec();
        let params: Vec<&str> = spec["paths"]["/products"]["get"]["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["name"].as_str())
            .collect();
        for name in ["search", "categoryId", "minPrice", "maxPrice", "page", "size", "sortBy", "sortDir"] {
            assert!(params.contains(&name), "missing query parameter {name}");
        }
    }

    #[test]
    fn schemas_use_wire_field_names() {
        let spec = spec();
        let schemas = &spec["components"]["schemas"];
        assert!(schemas["ProductResponse"]["properties"]["categoryName"].is_object());
        assert!(schemas["SkuRequest"]["properties"]["skuCode"].is_object());
        assert!(schemas["ErrorBody"]["properties"]["validationErrors"].is_object());
        assert!(schemas["ProductPage"]["properties"]["totalElements"].is_object());
    }

    #[test]
    fn json_is_cached() {
        assert_eq!(openapi_json().unwrap(), openapi_json().unwrap());
    }
}
