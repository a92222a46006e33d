/// Sign-in endpoints
///
/// - `POST /api/auth/login` - Check credentials, issue a session
/// - `POST /api/auth/logout` - Clear the session cookie
/// - `GET /api/auth/session` - Who am I
///
/// The session is a signed token carried in an HttpOnly cookie. The same
/// token is returned in the login body for non-browser clients, which send
/// it back as `Authorization: Bearer <token>`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
};
use axum::{extract::State, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use docportal_shared::{
    auth::{
        jwt::{create_token, Claims},
        middleware::{Session, SESSION_COOKIE},
        password,
    },
    models::user::{Role, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,

    /// Session token, also set as the session cookie
    pub token: String,
}

/// Current session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

/// Sign in
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "admin@example.com", "password": "..." }
/// ```
///
/// When the users table is empty, the first login creates that account as
/// an admin. Afterwards only existing accounts can sign in.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or email
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    req.validate()?;

    let user = match User::find_by_email(&state.db, &req.email).await? {
        Some(user) => {
            if !password::verify_password(&req.password, &user.password_hash)? {
                tracing::info!(user_id = %user.id, "Login failed: wrong password");
                return Err(invalid_credentials());
            }
            user
        }
        None => bootstrap_or_reject(&state, &req).await?,
    };

    let claims = Claims::with_expiration(user.id, user.email.clone(), user.role, state.session_ttl());
    let token = create_token(&claims, state.session_secret())?;

    tracing::info!(user_id = %user.id, role = %user.role, "User signed in");

    let jar = jar.add(session_cookie(&state, token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            user_id: user.id,
            email: user.email,
            role: user.role,
            token,
        }),
    ))
}

/// Creates the first admin, or rejects an unknown email
async fn bootstrap_or_reject(state: &AppState, req: &LoginRequest) -> ApiResult<User> {
    if User::count(&state.db).await? > 0 {
        password::verify_against_dummy(&req.password);
        tracing::info!("Login failed: unknown email");
        return Err(invalid_credentials());
    }

    let hash = password::hash_password(&req.password)?;
    match User::bootstrap_admin(&state.db, &req.email, &hash).await? {
        Some(user) => Ok(user),
        // Another request bootstrapped first
        None => Err(invalid_credentials()),
    }
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let max_age = time::Duration::seconds(state.session_ttl().num_seconds());

    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.api.production)
        .max_age(max_age)
        .build()
}

/// Sign out
///
/// Always succeeds, with or without a session.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    // `CookieJar::remove` only emits a removal for cookies the request
    // carried, so the expired cookie is always added explicitly
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();

    let jar = jar.add(cookie);
    (jar, MessageResponse::new("Logged out"))
}

/// Current session
///
/// Runs behind the session layer, so a missing session never reaches here.
pub async fn current_session(Extension(session): Extension<Session>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: session.user_id,
        email: session.email,
        role: session.role,
    })
}
