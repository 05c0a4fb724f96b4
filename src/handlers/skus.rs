//! SKU handlers.
//!
//! POST   /skus                 - create
//! GET    /skus?productId=      - list a product's SKUs (productId required)
//! GET    /skus/:id             - get one
//! PUT    /skus/:id             - replace all fields
//! DELETE /skus/:id             - delete

use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use catalog_core::dto::{SkuRequest, SkuResponse};
use catalog_core::service::CatalogService;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, ErrorBody};
use crate::extract::{parse_param, require_param, IdPath, JsonBody, QueryParams};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SkuListParams {
    /// Required.
    #[param(value_type = i64)]
    pub product_id: Option<String>,
}

#[utoipa::path(
    post,
    path = "/skus",
    tag = "skus",
    request_body = SkuRequest,
    responses(
        (status = 201, description = "SKU created", body = SkuResponse),
        (status = 400, description = "Validation failed or code already taken", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody),
    )
)]
pub async fn create_sku(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    JsonBody(req): JsonBody<SkuRequest>,
) -> Result<(StatusCode, Json<SkuResponse>), AppError> {
    let created = service.create_sku(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/skus",
    tag = "skus",
    params(SkuListParams),
    responses(
        (status = 200, description = "The product's SKUs", body = Vec<SkuResponse>),
        (status = 400, description = "productId missing or not an integer", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody),
    )
)]
pub async fn list_skus(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    QueryParams(params): QueryParams<SkuListParams>,
) -> Result<Json<Vec<SkuResponse>>, AppError> {
    let raw = require_param("productId", params.product_id.as_deref())?;
    let product_id: i64 = parse_param("productId", raw, "integer")?;
    Ok(Json(service.list_skus_by_product(product_id).await?))
}

#[utoipa::path(
    get,
    path = "/skus/{id}",
    tag = "skus",
    params(("id" = i64, Path, description = "SKU id")),
    responses(
        (status = 200, description = "SKU found", body = SkuResponse),
        (status = 404, description = "No such SKU", body = ErrorBody),
    )
)]
pub async fn get_sku(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    IdPath(id): IdPath,
) -> Result<Json<SkuResponse>, AppError> {
    Ok(Json(service.get_sku(id).await?))
}

#[utoipa::path(
    put,
    path = "/skus/{id}",
    tag = "skus",
    params(("id" = i64, Path, description = "SKU id")),
    request_body = SkuRequest,
    responses(
        (status = 200, description = "SKU updated", body = SkuResponse),
        (status = 400, description = "Validation failed or code already taken", body = ErrorBody),
        (status = 404, description = "No such SKU or product", body = ErrorBody),
    )
)]
pub async fn update_sku(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    IdPath(id): IdPath,
    JsonBody(req): JsonBody<SkuRequest>,
) -> Result<Json<SkuResponse>, AppError> {
    Ok(Json(service.update_sku(id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/skus/{id}",
    tag = "skus",
    params(("id" = i64, Path, description = "SKU id")),
    responses(
        (status = 204, description = "SKU deleted"),
        (status = 404, description = "No such SKU", body = ErrorBody),
    )
)]
pub async fn delete_sku(
    Extension(service): Extension<Arc<dyn CatalogService>>,
    IdPath(id): IdPath,
) -> Result<StatusCode, AppError> {
    service.delete_sku(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
