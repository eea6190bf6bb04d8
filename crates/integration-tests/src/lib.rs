//! Integration tests for Bakeledger.
//!
//! # Test Categories
//!
//! - `bakery_workflow` - Catalog to report flow through the core calculations
//! - `api` - Router behaviour that does not need a live database
//! - `database` - Repository behaviour against `DATABASE_URL` (ignored by default)
//!
//! The HTTP tests build the router over a lazily connected pool, so they only
//! exercise paths that are answered before any query runs (health, session
//! gate, unknown endpoints).

use std::path::PathBuf;

use bakeledger_core::CurrencyCode;
use bakeledger_server::config::{LogFormat, RecipeCacheConfig, ServerConfig};
use bakeledger_server::state::AppState;
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;

/// Configuration pointing at a database that is never contacted.
#[must_use]
pub fn offline_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("postgres://bakeledger@127.0.0.1:1/unused"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost".to_string(),
        static_dir: PathBuf::from("does-not-exist"),
        currency: CurrencyCode::BRL,
        recipe_cache: RecipeCacheConfig::default(),
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Build the full router over a pool that connects on first use.
///
/// # Panics
///
/// Panics if the configured database URL cannot be parsed.
#[must_use]
#[allow(clippy::expect_used)]
pub fn offline_app() -> axum::Router {
    let config = offline_config();
    let pool = PgPoolOptions::new()
        .connect_lazy(config.database_url.expose_secret())
        .expect("lazy pool from static URL");
    bakeledger_server::app(AppState::new(config, pool))
}
