//! Authentication extractors.
//!
//! Identity lives with an upstream identity provider (reverse-proxy style):
//! it authenticates the caller and forwards the stable user identifier in
//! `x-user-id`, optionally with a display label in `x-user-label`. The
//! storefront trusts the forwarded identifier as given and never defaults a
//! missing identity to an anonymous one.

use axum::http::{HeaderMap, request::Parts};
use axum::extract::FromRequestParts;

use tgmarket_core::UserId;

use crate::error::AppError;

/// Header carrying the authenticated user identifier.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying an optional display label for the user.
pub const USER_LABEL_HEADER: &str = "x-user-label";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Stable identifier supplied by the identity provider.
    pub id: UserId,
    /// Display label for denormalized payloads; falls back to `user:{id}`.
    pub label: String,
}

/// Extractor that requires an authenticated identity.
///
/// Rejects with 401 `Unauthenticated` when the identity headers are missing
/// or malformed.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.label)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(&parts.headers)
            .map(Self)
            .ok_or(AppError::Unauthenticated)
    }
}

fn current_user(headers: &HeaderMap) -> Option<CurrentUser> {
    let id = headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()?;
    if id <= 0 {
        return None;
    }

    let label = headers
        .get(USER_LABEL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map_or_else(|| format!("user:{id}"), str::to_owned);

    Some(CurrentUser {
        id: UserId::new(id),
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_forwarded_identity() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("42"));
        headers.insert(USER_LABEL_HEADER, HeaderValue::from_static("alex@example.com"));

        let user = current_user(&headers).unwrap();
        assert_eq!(user.id, UserId::new(42));
        assert_eq!(user.label, "alex@example.com");
    }

    #[test]
    fn label_falls_back_to_user_id() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("7"));

        let user = current_user(&headers).unwrap();
        assert_eq!(user.label, "user:7");
    }

    #[test]
    fn missing_or_malformed_identity_is_rejected() {
        assert!(current_user(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-number"));
        assert!(current_user(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("0"));
        assert!(current_user(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("-3"));
        assert!(current_user(&headers).is_none());
    }
}
