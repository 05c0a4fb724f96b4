//! Category handlers.
//!
//! POST   /categories       - create
//! GET    /categories       - list all (unpaginated)
//! GET    /categories/:id   - get one
//! PUT    /categories/:id   - replace name/description
//! DELETE /categories/:id   - delete, refused while products reference it

use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use catalog_core::dto::{CategoryRequest, CategoryResponse};
use catalog_core::service::CatalogService;

use crate::error::{AppError, ErrorBody};
use crate::extract::{IdPath, JsonBody};

#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation failed or name already taken", body = ErrorBody),
    )
)]
pub async fn create_category(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    let created = service.create_category(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses((status = 200, description = "All categories", body = Vec<CategoryResponse>))
)]
pub async fn list_categories(
    Extension(service): Extension<Arc<dyn CatalogService>>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    Ok(Json(service.list_categories().await?))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "No such category", body = ErrorBody),
    )
)]
pub async fn get_category(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    IdPath(id): IdPath,
) -> Result<Json<CategoryResponse>, AppError> {
    Ok(Json(service.get_category(id).await?))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation failed or name already taken", body = ErrorBody),
        (status = 404, description = "No such category", body = ErrorBody),
    )
)]
pub async fn update_category(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    IdPath(id): IdPath,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    Ok(Json(service.update_category(id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Products still reference the category", body = ErrorBody),
        (status = 404, description = "No such category", body = ErrorBody),
    )
)]
pub async fn delete_category(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    IdPath(id): IdPath,
) -> Result<StatusCode, AppError> {
    service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
