//! HTTP server for the Wikistats corpus API.
//!
//! Routes live in [`server::build_app`]; every handler delegates to a
//! [`wikistats_storage::CorpusStore`] held in [`AppState`].

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::{AppConfig, LimitsConfig, LoggingConfig, PostgresStorageConfig, ServerConfig};
pub use observability::init_tracing;
pub use server::{AppState, ServerBuilder, WikistatsServer, build_app};
