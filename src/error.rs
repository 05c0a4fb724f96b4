//! HTTP error mapping. Every non-2xx response leaves the server in one JSON shape.
//!
//! `AppError` renders a `CatalogError` through its `http_status()` mapping and stashes
//! the body in the response extensions. [`error_envelope`] is the outermost
//! boundary: it fills in the request path and turns the router's bare 405
//! responses into the same body.

use axum::extract::Request;
use axum::http::{header, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use catalog_core::error::{CatalogError, FieldViolation};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("No endpoint {method} {path}.")]
    RouteNotFound { method: Method, path: String },

    #[error("Request method '{method}' not supported. Supported methods: [{allowed}]")]
    MethodNotAllowed { method: Method, allowed: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(e) => {
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Build the wire body, logging as a side effect. Internal detail stops here.
    fn to_body(&self) -> ErrorBody {
        let status = self.status();
        let error_id = Uuid::new_v4();
        let message = match self {
            Self::Catalog(CatalogError::Internal(e)) => {
                tracing::error!(%error_id, error = ?e, "unexpected error");
                format!("An unexpected error occurred. Please contact support with error ID: {error_id}")
            }
            other => {
                tracing::warn!(%error_id, status = status.as_u16(), "{other}");
                other.to_string()
            }
        };
        let violations = match self {
            Self::Catalog(e) if !e.violations().is_empty() => Some(e.violations().to_vec()),
            _ => None,
        };
        ErrorBody {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
            path: String::new(),
            error_id,
            validation_errors: violations,
        }
    }
}

/// The single error shape on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    pub error_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<FieldViolation>>,
}

impl ErrorBody {
    fn render(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = (status, Json(&self)).into_response();
        resp.extensions_mut().insert(self);
        resp
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_body().render()
    }
}

/// Outermost error boundary, installed with `axum::middleware::from_fn`.
pub async fn error_envelope(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let mut resp = next.run(req).await;

    if let Some(mut body) = resp.extensions_mut().remove::<ErrorBody>() {
        body.path = path;
        return body.render();
    }

    if resp.status() == StatusCode::METHOD_NOT_ALLOWED {
        let allow = resp.headers().get(header::ALLOW).cloned();
        let allowed = allow
            .as_ref()
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let mut body = AppError::MethodNotAllowed { method, allowed }.to_body();
        body.path = path;
        let mut out = body.render();
        if let Some(allow) = allow {
            out.headers_mut().insert(header::ALLOW, allow);
        }
        return out;
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn internal_errors_are_scrubbed() {
        let err = AppError::from(CatalogError::Internal(anyhow!("connection refused to 10.0.0.3")));
        let body = err.to_body();
        assert_eq!(body.status, 500);
        assert_eq!(body.error, "Internal Server Error");
        assert!(!body.message.contains("10.0.0.3"));
        assert!(body.message.ends_with(&body.error_id.to_string()));
    }

    #[test]
    fn violations_are_listed() {
        let err = AppError::from(CatalogError::invalid_field("price", "Price must be greater than 0"));
        let body = err.to_body();
        assert_eq!(body.status, 400);
        assert_eq!(body.message, "Validation failed for one or more fields");
        let v = body.validation_errors.unwrap();
        assert_eq!(v[0].field, "price");
    }

    #[test]
    fn not_found_keeps_the_domain_message() {
        let body = AppError::from(CatalogError::not_found("Product", 7)).to_body();
        assert_eq!(body.status, 404);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.message, "Product not found with id: '7'");
        assert!(body.validation_errors.is_none());
    }

    #[test]
    fn method_not_allowed_message() {
        let err = AppError::MethodNotAllowed {
            method: Method::PATCH,
            allowed: "GET,PUT,DELETE".into(),
        };
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            err.to_string(),
            "Request method 'PATCH' not supported. Supported methods: [GET,PUT,DELETE]"
        );
    }
}
