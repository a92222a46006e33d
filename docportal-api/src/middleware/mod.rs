/// Middleware for the API server
///
/// - `security`: Response security headers
/// - `session`: Session and admin guards for the router

pub mod security;
pub mod session;
