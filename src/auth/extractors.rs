use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::error::ApiError;

use super::Claims;
use super::jwt::{JwtKeys, TokenError};

/// Auth gate. Pulls the bearer token out of the Authorization header, verifies
/// it and hands the decoded identity to the handler, read-only.
///
/// Failure mapping:
/// - no Authorization header        -> 401 missing token
/// - header not `Bearer <token>`    -> 401 malformed header
/// - token past its expiry          -> 401 expired, re-login message
/// - bad signature / unparseable    -> 403 invalid token
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::MalformedHeader)?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(TokenError::Expired) => Err(ApiError::TokenExpired),
            Err(TokenError::Malformed) => Err(ApiError::InvalidToken),
        }
    }
}
