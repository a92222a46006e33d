/// Authorization checks
///
/// The portal has exactly one privilege boundary: reading is open to
/// everyone, mutating content requires the `admin` role. Both failures map
/// to 401 at the HTTP layer.
///
/// # Example
///
/// ```
/// use docportal_shared::auth::authorization::{require_admin, AuthzError};
///
/// assert!(matches!(require_admin(None), Err(AuthzError::NotAuthenticated)));
/// ```

use super::middleware::Session;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// No session at all
    #[error("Authentication required")]
    NotAuthenticated,

    /// Signed in, but not as an admin
    #[error("Admin role required")]
    NotAdmin,
}

/// Requires an admin session
///
/// # Errors
///
/// - `NotAuthenticated` if `session` is None
/// - `NotAdmin` if the session's role can't manage content
pub fn require_admin(session: Option<&Session>) -> Result<&Session, AuthzError> {
    let session = session.ok_or(AuthzError::NotAuthenticated)?;

    if !session.is_admin() {
        tracing::debug!(user_id = %session.user_id, role = %session.role, "Rejected non-admin session");
        return Err(AuthzError::NotAdmin);
    }

    Ok(session)
}
