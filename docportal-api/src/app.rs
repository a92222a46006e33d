/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use docportal_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = docportal_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        security::SecurityHeadersLayer,
        session::{admin_layer, session_layer},
    },
    routes,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Session signing key
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }

    /// Lifetime of newly issued sessions
    pub fn session_ttl(&self) -> Duration {
        self.config.session.ttl()
    }
}

/// Builds the complete router
///
/// ```text
/// /health                              GET     public
/// /api/auth/login                      POST    public
/// /api/auth/logout                     POST    public
/// /api/auth/session                    GET     session
/// /api/subjects                        GET     public   POST admin
/// /api/subjects/:id                    GET     public   DELETE admin
/// /api/subjects/:id/lessons            GET     public   POST admin
/// /api/subjects/:id/download           GET     public
/// /api/lessons/:id                     GET     public   PUT, DELETE admin
/// /api/documents                       POST    admin
/// /api/documents/:id                   GET     public   PUT, DELETE admin
/// ```
///
/// Public and admin routes on the same path are separate routers merged
/// together. `route_layer` scopes the guard to the admin router's methods.
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then the
/// per-router guards.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/subjects", get(routes::subjects::list_subjects))
        .route("/api/subjects/:id", get(routes::subjects::get_subject))
        .route("/api/subjects/:id/lessons", get(routes::lessons::list_lessons))
        .route("/api/subjects/:id/download", get(routes::subjects::download_subject))
        .route("/api/lessons/:id", get(routes::lessons::get_lesson))
        // GET routes answer HEAD as well
        .route("/api/documents/:id", get(routes::documents::get_document));

    let session_routes = Router::new()
        .route("/api/auth/session", get(routes::auth::current_session))
        .route_layer(from_fn_with_state(state.clone(), session_layer));

    let upload_routes = Router::new()
        .route("/api/documents", post(routes::documents::upload_document))
        .layer(DefaultBodyLimit::max(state.config.upload.max_bytes))
        .route_layer(from_fn_with_state(state.clone(), admin_layer));

    let admin_routes = Router::new()
        .route("/api/subjects", post(routes::subjects::create_subject))
        .route("/api/subjects/:id", delete(routes::subjects::delete_subject))
        .route("/api/subjects/:id/lessons", post(routes::lessons::create_lesson))
        .route(
            "/api/lessons/:id",
            put(routes::lessons::update_lesson).delete(routes::lessons::delete_lesson),
        )
        .route(
            "/api/documents/:id",
            put(routes::documents::update_document)
                .delete(routes::documents::delete_document),
        )
        .route_layer(from_fn_with_state(state.clone(), admin_layer));

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(upload_routes)
        .merge(admin_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Permissive when no origins are configured, otherwise an allow-list with
/// credentials so the session cookie crosses origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
