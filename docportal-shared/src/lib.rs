//! # DocPortal Shared Library
//!
//! This crate contains the data layer, authentication primitives and the
//! archive builder used by the DocPortal API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, subjects, lessons, documents)
//! - `db`: Connection pool and migrations
//! - `auth`: Password hashing, session tokens, role checks
//! - `archive`: Zip bundling for "download all"

pub mod archive;
pub mod auth;
pub mod db;
pub mod models;

/// Current version of the DocPortal shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
