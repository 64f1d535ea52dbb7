use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use service_core::error::AppError;

/// Bearer credential from the `Authorization` header.
///
/// Declared for the API's security scheme but not required by any current
/// route; handlers that need authentication take it as an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!(
                    "Missing or invalid Authorization header"
                ))
            })?;

        Ok(BearerToken(token.to_string()))
    }
}
