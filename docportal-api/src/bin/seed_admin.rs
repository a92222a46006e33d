//! # Admin seeding tool
//!
//! Creates an admin account, or resets an existing account's password and
//! promotes it to admin.
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/docportal \
//! cargo run -p docportal-api --bin docportal-seed-admin -- \
//!     --email admin@example.com --password 'correct horse'
//! ```
//!
//! `ADMIN_EMAIL` and `ADMIN_PASSWORD` are used when the flags are absent.

use anyhow::{bail, Context};
use clap::Parser;
use docportal_shared::{
    auth::password::hash_password,
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    models::user::{normalize_email, User},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Create or reset a DocPortal admin account", long_about = None)]
struct SeedArgs {
    /// Admin email address
    #[arg(long, env = "ADMIN_EMAIL")]
    email: String,

    /// Admin password
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

impl SeedArgs {
    /// Normalized email, after checking both values are usable
    fn admin_email(&self) -> anyhow::Result<String> {
        let email = normalize_email(&self.email);
        if email.is_empty() || !email.contains('@') {
            bail!("Invalid email address: {:?}", self.email);
        }
        if self.password.is_empty() {
            bail!("Admin password must not be empty");
        }
        Ok(email)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docportal_shared=info".into()),
        )
        .init();

    let args = SeedArgs::parse();
    let email = args.admin_email()?;
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    ensure_database_exists(&database_url).await?;
    let pool = create_pool(DatabaseConfig::new(database_url)).await?;
    run_migrations(&pool).await?;

    let password_hash = hash_password(&args.password)?;
    let user = User::upsert_admin(&pool, &email, &password_hash).await?;

    println!("Admin user seeded");
    println!("Email: {}", user.email);
    println!("Role:  {}", user.role);

    close_pool(pool).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = SeedArgs::try_parse_from([
            "docportal-seed-admin",
            "--email",
            " Admin@Example.com ",
            "--password",
            "secret",
        ])
        .unwrap();

        assert_eq!(args.admin_email().unwrap(), "admin@example.com");
        assert_eq!(args.password, "secret");

        let args = SeedArgs::try_parse_from([
            "docportal-seed-admin",
            "--email=inline@example.com",
            "--password=x",
        ])
        .unwrap();
        assert_eq!(args.admin_email().unwrap(), "inline@example.com");
    }

    // Environment fallback and missing values share one test so no other
    // test observes the variables
    #[test]
    fn test_env_fallback_and_missing_values() {
        std::env::remove_var("ADMIN_EMAIL");
        std::env::remove_var("ADMIN_PASSWORD");
        assert!(SeedArgs::try_parse_from(["docportal-seed-admin"]).is_err());
        assert!(SeedArgs::try_parse_from(["docportal-seed-admin", "--email"]).is_err());

        std::env::set_var("ADMIN_EMAIL", "env@example.com");
        std::env::set_var("ADMIN_PASSWORD", "from-env");
        let args = SeedArgs::try_parse_from(["docportal-seed-admin", "--password", "flag"]).unwrap();
        std::env::remove_var("ADMIN_EMAIL");
        std::env::remove_var("ADMIN_PASSWORD");

        assert_eq!(args.admin_email().unwrap(), "env@example.com");
        assert_eq!(args.password, "flag");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(SeedArgs::try_parse_from([
            "docportal-seed-admin",
            "--email",
            "a@example.com",
            "--password",
            "x",
            "--verbose",
        ])
        .is_err());

        let args = SeedArgs::try_parse_from([
            "docportal-seed-admin",
            "--email",
            "nobody",
            "--password",
            "x",
        ])
        .unwrap();
        assert!(args.admin_email().is_err());

        let args = SeedArgs::try_parse_from([
            "docportal-seed-admin",
            "--email",
            "a@example.com",
            "--password",
            "",
        ])
        .unwrap();
        assert!(args.admin_email().is_err());
    }
}
