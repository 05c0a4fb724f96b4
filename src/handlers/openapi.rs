//! GET /api-docs/openapi.json - the generated OpenAPI document.

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_core::error::CatalogError;

use crate::error::{AppError, ErrorBody};
use crate::openapi::openapi_json;

#[utoipa::path(
    get,
    path = "/api-docs/openapi.json",
    tag = "openapi",
    responses(
        (status = 200, description = "OpenAPI document for the catalog API", body = String, content_type = "application/json"),
        (status = 500, description = "Internal error", body = ErrorBody),
    )
)]
pub async fn get_openapi_json() -> Result<Response, AppError> {
    let spec = openapi_json()
        .map_err(|e| CatalogError::Internal(anyhow::anyhow!("failed to serialize OpenAPI document: {e}")))?;
    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/json")], spec).into_response())
}
