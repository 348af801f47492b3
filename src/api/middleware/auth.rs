//! Session authentication middleware.
//!
//! The credential is the `token` cookie set at login. An
//! `Authorization: Bearer` header is accepted when no cookie is present.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, SESSION_COOKIE_NAME};
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated user resolved from the session token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Session token carried by a request, cookie first.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::to_string)
}

/// Session authentication middleware.
///
/// Verifies the token, loads the user it names, then injects the
/// CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers())
        .ok_or_else(|| AppError::unauthorized("Not authorized, no token"))?;

    let claims = state.auth_service.verify_token(&token)?;

    let user = match state.user_service.get_user(claims.sub).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => {
            tracing::debug!(user_id = %claims.sub, "Token names a user that no longer exists");
            return Err(AppError::unauthorized("User not found"));
        }
        Err(e) => return Err(e),
    };

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        role: user.role,
    });

    Ok(next.run(request).await)
}

/// Reject authenticated callers without the admin role.
///
/// Must run after [`auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let current = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::unauthorized("Not authorized, no token"))?;

    if !current.is_admin() {
        tracing::warn!(user_id = %current.id, "Non-admin attempted a catalog change");
        return Err(AppError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    #[test]
    fn test_cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=from-cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_fallback_and_absence() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_cleared_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("token="));
        assert_eq!(session_token(&headers), None);
    }
}
