//! Product handlers.
//!
//! POST   /products       - create
//! GET    /products       - search (filters, paging, sorting from the query string)
//! GET    /products/:id   - get one
//! PUT    /products/:id   - replace all fields, possibly moving category
//! DELETE /products/:id   - delete

use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use catalog_core::dto::{ProductRequest, ProductResponse};
use catalog_core::error::CatalogError;
use catalog_core::filter::ProductCriteria;
use catalog_core::page::{Page, PageRequest, ProductPage, ProductSortField, Sort, SortDirection, DEFAULT_PAGE_SIZE};
use catalog_core::service::CatalogService;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, ErrorBody};
use crate::extract::{parse_optional, IdPath, JsonBody, QueryParams};

/// Raw search query string. Every value stays a string until [`Self::into_query`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductSearchParams {
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    #[param(value_type = Option<i64>)]
    pub category_id: Option<String>,
    /// Inclusive lower price bound.
    #[param(value_type = Option<f64>)]
    pub min_price: Option<String>,
    /// Inclusive upper price bound.
    #[param(value_type = Option<f64>)]
    pub max_price: Option<String>,
    /// Zero-based page index, default 0.
    #[param(value_type = Option<u32>)]
    pub page: Option<String>,
    /// Page size, 1 to 1000, default 20.
    #[param(value_type = Option<u32>)]
    pub size: Option<String>,
    /// id, name, description, price, categoryId, createdAt or updatedAt. Default name.
    pub sort_by: Option<String>,
    /// asc or desc, default asc.
    pub sort_dir: Option<String>,
}

impl ProductSearchParams {
    pub fn into_query(self) -> Result<(ProductCriteria, PageRequest), CatalogError> {
        let criteria = ProductCriteria {
            search: self.search,
            category_id: parse_optional::<i64>("categoryId", self.category_id.as_deref(), "integer")?,
            min_price: parse_optional::<Decimal>("minPrice", self.min_price.as_deref(), "decimal")?,
            max_price: parse_optional::<Decimal>("maxPrice", self.max_price.as_deref(), "decimal")?,
        };

        let field = match self.sort_by.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.parse::<ProductSortField>()?,
            _ => ProductSortField::default(),
        };
        let direction = self
            .sort_dir
            .as_deref()
            .map(|s| SortDirection::parse_lenient(s.trim()))
            .unwrap_or_default();

        let page = PageRequest::new(
            parse_optional::<u32>("page", self.page.as_deref(), "non-negative integer")?.unwrap_or(0),
            parse_optional::<u32>("size", self.size.as_deref(), "positive integer")?
                .unwrap_or(DEFAULT_PAGE_SIZE),
            Sort { field, direction },
        )?;
        Ok((criteria, page))
    }
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "No such category", body = ErrorBody),
    )
)]
pub async fn create_product(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let created = service.create_product(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ProductSearchParams),
    responses(
        (status = 200, description = "One page of matching products", body = ProductPage),
        (status = 400, description = "Bad search parameter", body = ErrorBody),
    )
)]
pub async fn search_products(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    QueryParams(params): QueryParams<ProductSearchParams>,
) -> Result<Json<Page<ProductResponse>>, AppError> {
    let (criteria, page) = params.into_query()?;
    Ok(Json(service.search_products(criteria, page).await?))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "No such product", body = ErrorBody),
    )
)]
pub async fn get_product(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    IdPath(id): IdPath,
) -> Result<Json<ProductResponse>, AppError> {
    Ok(Json(service.get_product(id).await?))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "No such product or category", body = ErrorBody),
    )
)]
pub async fn update_product(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    IdPath(id): IdPath,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    Ok(Json(service.update_product(id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "No such product", body = ErrorBody),
        (status = 500, description = "SKUs still reference the product", body = ErrorBody),
    )
)]
pub async fn delete_product(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    IdPath(id): IdPath,
) -> Result<StatusCode, AppError> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
