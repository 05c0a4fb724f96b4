//! Extractors whose rejections are `AppError`s, so a bad body or parameter renders
//! the same error body as any other 400.

use std::str::FromStr;

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use catalog_core::error::CatalogError;

use crate::error::AppError;

pub const MALFORMED_JSON: &str = "Malformed JSON request. Please check your request body.";

/// JSON request body.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(%rejection, "unreadable request body");
                Err(CatalogError::MalformedInput(MALFORMED_JSON.to_string()).into())
            }
        }
    }
}

/// Numeric `{id}` path segment.
pub struct IdPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| CatalogError::MalformedInput(e.body_text()))?;
        Ok(Self(parse_param("id", &raw, "integer")?))
    }
}

/// Query string as a struct of optional strings; typed parsing is left to
/// [`parse_param`] so a bad value names its parameter.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| CatalogError::MalformedInput(e.body_text()))?;
        Ok(Self(value))
    }
}

pub fn parse_param<T: FromStr>(name: &str, raw: &str, expected: &str) -> Result<T, CatalogError> {
    raw.trim().parse::<T>().map_err(|_| {
        CatalogError::MalformedInput(format!(
            "Invalid value for parameter '{name}'. Expected type: {expected}"
        ))
    })
}

/// An optional parameter; blank counts as absent.
pub fn parse_optional<T: FromStr>(
    name: &str,
    raw: Option<&str>,
    expected: &str,
) -> Result<Option<T>, CatalogError> {
    match raw {
        Some(v) if !v.trim().is_empty() => parse_param(name, v, expected).map(Some),
        _ => Ok(None),
    }
}

/// A parameter the endpoint cannot work without.
pub fn require_param<'a>(name: &str, raw: Option<&'a str>) -> Result<&'a str, CatalogError> {
    raw.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        CatalogError::MalformedInput(format!("Required request parameter '{name}' is missing"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_value_names_the_parameter() {
        let err = parse_param::<i64>("categoryId", "abc", "integer").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for parameter 'categoryId'. Expected type: integer"
        );
    }

    #[test]
    fn blank_optional_is_absent() {
        assert_eq!(parse_optional::<i64>("page", Some(" "), "integer").unwrap(), None);
        assert_eq!(parse_optional::<i64>("page", Some("2"), "integer").unwrap(), Some(2));
    }

    #[test]
    fn missing_required_parameter() {
        let err = require_param("productId", None).unwrap_err();
        assert_eq!(err.to_string(), "Required request parameter 'productId' is missing");
        assert_eq!(require_param("productId", Some("3")).unwrap(), "3");
    }
}
