//! Connection pool management for the PostgreSQL corpus backend.

use std::time::Duration;

use sqlx_core::pool::PoolOptions;
use sqlx_postgres::{PgPool, Postgres};
use tracing::{debug, info, instrument};

use crate::config::PostgresConfig;
use crate::error::{PostgresError, Result};

pub type PgPoolOptions = PoolOptions<Postgres>;

/// Translates [`PostgresConfig`] into sqlx pool options.
pub fn pool_options(config: &PostgresConfig) -> Result<PgPoolOptions> {
    if config.pool_size == 0 {
        return Err(PostgresError::config("pool_size must be > 0"));
    }
    if config.connect_timeout_ms == 0 {
        return Err(PostgresError::config("connect_timeout_ms must be > 0"));
    }

    let options = PgPoolOptions::new()
        .max_connections(config.pool_size)
        .min_connections(config.effective_min_connections())
        .acquire_timeout(Duration::from_millis(config.connect_timeout_ms))
        .idle_timeout(config.idle_timeout_ms.map(Duration::from_millis))
        .max_lifetime(config.max_lifetime_ms.map(Duration::from_millis))
        .test_before_acquire(false);

    Ok(options)
}

/// Opens the corpus connection pool.
#[instrument(skip(config), fields(url = %mask_password(&config.url)))]
pub async fn create_pool(config: &PostgresConfig) -> Result<PgPool> {
    let options = pool_options(config)?;
    info!(
        max = config.pool_size,
        min = config.effective_min_connections(),
        "opening corpus connection pool"
    );

    let pool = options.connect(&config.url).await?;
    debug!("corpus connection pool ready");
    Ok(pool)
}

/// Masks the password in a database URL for logging.
pub fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@')
        && let Some(colon_pos) = url[..at_pos].rfind(':')
    {
        let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
        if colon_pos > scheme_end {
            return format!("{}:****{}", &url[..colon_pos], &url[at_pos..]);
        }
    }
    url.to_string()
}
