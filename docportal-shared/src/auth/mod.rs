/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: Session token signing and validation
/// - [`middleware`]: Session extraction from cookie or bearer header
/// - [`authorization`]: The admin guard
///
/// # Example
///
/// ```
/// use docportal_shared::auth::jwt::{create_token, validate_token, Claims};
/// use docportal_shared::auth::password::{hash_password, verify_password};
/// use docportal_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "admin@example.com", Role::Admin);
/// let token = create_token(&claims, "secret-key")?;
/// assert_eq!(validate_token(&token, "secret-key")?.role, Role::Admin);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
