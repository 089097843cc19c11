use crate::rest::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header the upstream auth layer uses to hand over the authenticated
/// identity (the user's email). JWT validation itself happens upstream; the
/// server only needs the identity as a partition key.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user on whose behalf a request runs.
#[derive(Debug, Clone)]
pub struct UserPrincipal(pub String);

impl<S> FromRequestParts<S> for UserPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| UserPrincipal(value.to_string()))
            .ok_or_else(|| ApiError::unauthorized("Missing user identity"))
    }
}
