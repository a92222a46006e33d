/// Session guards for the router
///
/// Both layers read the session from the Bearer header or the session
/// cookie, verify it with the configured secret and place the
/// [`Session`] in request extensions.
///
/// - [`session_layer`]: any signed-in user
/// - [`admin_layer`]: admins only
///
/// Every failure is a 401.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use docportal_shared::auth::{
    authorization::require_admin,
    middleware::{session_from_headers, Session},
};

use crate::{app::AppState, error::ApiError};

fn authenticate(state: &AppState, req: &Request) -> Result<Session, ApiError> {
    Ok(session_from_headers(req.headers(), state.session_secret())?)
}

/// Requires a valid session
pub async fn session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = authenticate(&state, &req)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// Requires a valid admin session
pub async fn admin_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = authenticate(&state, &req).map_err(|err| {
        tracing::debug!(path = %req.uri().path(), "Rejected admin request without a session");
        err
    })?;
    require_admin(Some(&session))?;

    tracing::debug!(
        user_id = %session.user_id,
        method = %req.method(),
        path = %req.uri().path(),
        "Admin request authorized"
    );

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
