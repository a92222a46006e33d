/// Session extraction for Axum
///
/// A request may carry its session in two places:
///
/// - the `docportal_session` cookie set by the login endpoint (browsers)
/// - an `Authorization: Bearer <token>` header (scripts and API clients)
///
/// The bearer header wins when both are present. After validation a
/// [`Session`] is built from the token's claims. The API's router layers
/// insert it into request extensions for handlers to take with
/// `Extension<Session>`.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use docportal_shared::auth::jwt::{create_token, Claims};
/// use docportal_shared::auth::middleware::{session_from_headers, SESSION_COOKIE};
/// use docportal_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let secret = "an-example-secret-of-at-least-32-bytes";
/// let token = create_token(&Claims::new(Uuid::new_v4(), "a@example.com", Role::Admin), secret).unwrap();
///
/// let mut headers = HeaderMap::new();
/// let cookie = format!("{}={}", SESSION_COOKIE, token);
/// headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());
///
/// let session = session_from_headers(&headers, secret).unwrap();
/// assert!(session.is_admin());
/// ```

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::user::Role;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "docportal_session";

/// Where the session token was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionSource {
    /// `Authorization: Bearer` header
    Bearer,

    /// Session cookie
    Cookie,
}

/// Authenticated session added to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub source: SessionSource,
}

impl Session {
    /// Builds a session from validated claims
    pub fn from_claims(claims: Claims, source: SessionSource) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            source,
        }
    }

    /// Whether the session belongs to an administrator
    pub fn is_admin(&self) -> bool {
        self.role.can_manage_content()
    }
}

/// Error type for session extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No cookie and no Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header present but not a Bearer token
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("Invalid session: {0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Session expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Every session failure is a 401; the portal has no 403 path
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

/// Finds the raw session token in request headers
///
/// Checks the Authorization header first, then the session cookie.
pub fn find_token(headers: &HeaderMap) -> Result<(String, SessionSource), AuthError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AuthError::InvalidFormat("Header is not valid ASCII".to_string()))?;

        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

        return Ok((token.trim().to_string(), SessionSource::Bearer));
    }

    let jar = CookieJar::from_headers(headers);
    match jar.get(SESSION_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => {
            Ok((cookie.value().to_string(), SessionSource::Cookie))
        }
        _ => Err(AuthError::MissingCredentials),
    }
}

/// Extracts and validates the session carried by a request
///
/// # Errors
///
/// - `MissingCredentials` when neither header nor cookie is present
/// - `InvalidFormat` for a non-Bearer Authorization header
/// - `InvalidToken` when the token fails signature/expiry/issuer checks
pub fn session_from_headers(headers: &HeaderMap, secret: &str) -> Result<Session, AuthError> {
    let (token, source) = find_token(headers)?;
    let claims = validate_token(&token, secret)?;

    Ok(Session::from_claims(claims, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn token_for(role: Role) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "user@example.com", role);
        (user_id, create_token(&claims, SECRET).unwrap())
    }

    #[test]
    fn test_session_from_bearer_header() {
        let (user_id, token) = token_for(Role::Admin);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        let session = session_from_headers(&headers, SECRET).unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.source, SessionSource::Bearer);
        assert!(session.is_admin());
    }

    #[test]
    fn test_session_from_cookie() {
        let (user_id, token) = token_for(Role::Viewer);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, token)).unwrap(),
        );

        let session = session_from_headers(&headers, SECRET).unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.source, SessionSource::Cookie);
        assert!(!session.is_admin());
    }

    #[test]
    fn test_bearer_takes_precedence_over_cookie() {
        let (admin_id, admin_token) = token_for(Role::Admin);
        let (_, viewer_token) = token_for(Role::Viewer);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", admin_token)).unwrap(),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, viewer_token)).unwrap(),
        );

        let session = session_from_headers(&headers, SECRET).unwrap();
        assert_eq!(session.user_id, admin_id);
    }

    #[test]
    fn test_missing_credentials() {
        let headers = HeaderMap::new();
        assert!(matches!(
            session_from_headers(&headers, SECRET),
            Err(AuthError::MissingCredentials)
        ));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("docportal_session="));
        assert!(matches!(
            session_from_headers(&headers, SECRET),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_non_bearer_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));

        assert!(matches!(
            session_from_headers(&headers, SECRET),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret() {
        let claims = Claims::new(Uuid::new_v4(), "x@example.com", Role::Admin);
        let token = create_token(&claims, "a-completely-different-secret-value").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        assert!(matches!(
            session_from_headers(&headers, SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_auth_error_into_response_is_401() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat("x".to_string()),
            AuthError::InvalidToken("x".to_string()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }
}
