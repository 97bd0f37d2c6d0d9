use std::net::SocketAddr;

use anyhow::Context;
use axum::{Router, http::StatusCode, middleware, routing::get};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer, trace::TraceLayer,
};
use wikistats_db_postgres::{create_store, mask_password};
use wikistats_storage::DynCorpusStore;

use crate::{
    config::{AppConfig, LimitsConfig},
    handlers, middleware as app_middleware,
};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: DynCorpusStore,
    pub limits: LimitsConfig,
}

impl AppState {
    pub fn new(store: DynCorpusStore, limits: LimitsConfig) -> Self {
        Self { store, limits }
    }
}

pub struct WikistatsServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Pages
        .route("/api/busqueda", get(handlers::search_word))
        .route("/api/paginas", get(handlers::list_paginas))
        .route("/api/paginas/buscar", get(handlers::search_titles))
        .route("/api/paginas/{id}", get(handlers::pagina_detail))
        .route(
            "/api/paginas/{id}/porcentajes",
            get(handlers::word_percentages),
        )
        .route("/api/paginas/{id}/palabras", get(handlers::word_shares))
        .route(
            "/api/paginas/{id}/similares/{kind}",
            get(handlers::similar_pages),
        )
        // N-grams
        .route("/api/ngrams", get(handlers::top_ngrams))
        .route("/api/ngrams/frase/{frase}", get(handlers::ngram_pages))
        .route("/api/ngrams/search", get(handlers::search_ngrams))
        .route("/api/ngrams/top/{kind}", get(handlers::search_ngrams_by_kind))
        .route("/api/distribucion", get(handlers::length_distribution))
        .fallback(handlers::not_found)
        .with_state(state)
        // Middleware stack, outermost last. Oversized bodies get 413 before routing.
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            cfg.request_timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    store: Option<DynCorpusStore>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            store: None,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Use an existing store instead of connecting to PostgreSQL.
    pub fn with_store(mut self, store: DynCorpusStore) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn build(self) -> anyhow::Result<WikistatsServer> {
        self.config.validate().map_err(anyhow::Error::msg)?;
        let store = match self.store {
            Some(store) => store,
            None => {
                let pg = self.config.storage.postgres.to_postgres_config();
                tracing::info!(
                    url = %mask_password(&pg.url),
                    pool_size = pg.pool_size,
                    run_migrations = pg.run_migrations,
                    "connecting to corpus database"
                );
                let store = create_store(pg)
                    .await
                    .context("failed to initialize PostgreSQL corpus store")?;
                store as DynCorpusStore
            }
        };

        let state = AppState::new(store, self.config.limits);
        let app = build_app(state, &self.config);

        Ok(WikistatsServer {
            addr: self.addr,
            app,
        })
    }
}

impl WikistatsServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.addr))?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
