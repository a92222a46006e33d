//! # DocPortal API Server Library
//!
//! HTTP API for the document portal: subjects, lessons, documents, the
//! "download all" archive and sign-in.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from the environment
//! - `error`: Error type and HTTP response mapping
//! - `extract`: Extractors with JSON rejections
//! - `middleware`: Security headers and session guards
//! - `routes`: Route handlers
//! - `telemetry`: Tracing subscriber setup

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod telemetry;
