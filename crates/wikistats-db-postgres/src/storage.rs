//! PostgreSQL implementation of the CorpusStore trait.

use async_trait::async_trait;
use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use wikistats_storage::{
    CorpusStore, LengthBucket, NgramHit, NgramKind, NgramPage, NgramTotal, PaginaDetail,
    PaginaMatch, PaginaSummary, SharedNgramKind, SimilarPage, StorageError, WordHit,
    WordPercentage, WordShare,
};

use crate::config::PostgresConfig;
use crate::error::query_error;
use crate::migrations;
use crate::pool;
use crate::queries::{ngrams, paginas, palabras, similares};

/// PostgreSQL corpus backend.
#[derive(Debug, Clone)]
pub struct PostgresCorpusStore {
    pool: PgPool,
}

impl PostgresCorpusStore {
    /// Creates a new `PostgresCorpusStore` with the given configuration.
    ///
    /// This will:
    /// 1. Create a connection pool
    /// 2. Create the corpus schema (if configured)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created
    /// or if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresCorpusStore` from an existing connection pool.
    ///
    /// Migrations are not run automatically when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CorpusStore for PostgresCorpusStore {
    #[instrument(skip(self))]
    async fn search_word(&self, palabra: &str, limit: u32) -> Result<Vec<WordHit>, StorageError> {
        let hits = paginas::search_word(&self.pool, palabra, limit).await?;
        debug!(rows = hits.len(), "word search");
        Ok(hits)
    }

    #[instrument(skip(self))]
    async fn list_paginas(&self) -> Result<Vec<PaginaSummary>, StorageError> {
        paginas::list_paginas(&self.pool).await
    }

    #[instrument(skip(self))]
    async fn search_titles(
        &self,
        fragment: &str,
        limit: u32,
    ) -> Result<Vec<PaginaMatch>, StorageError> {
        paginas::search_titles(&self.pool, fragment, limit).await
    }

    #[instrument(skip(self))]
    async fn pagina_detail(
        &self,
        id: i64,
        top_words: u32,
    ) -> Result<Option<PaginaDetail>, StorageError> {
        paginas::pagina_detail(&self.pool, id, top_words).await
    }

    #[instrument(skip(self))]
    async fn word_percentages(
        &self,
        pagina_id: i64,
        limit: u32,
    ) -> Result<Vec<WordPercentage>, StorageError> {
        palabras::word_percentages(&self.pool, pagina_id, limit).await
    }

    #[instrument(skip(self))]
    async fn word_shares(&self, pagina_id: i64) -> Result<Vec<WordShare>, StorageError> {
        palabras::word_shares(&self.pool, pagina_id).await
    }

    #[instrument(skip(self))]
    async fn similar_pages(
        &self,
        pagina_id: i64,
        kind: SharedNgramKind,
        limit: u32,
    ) -> Result<Vec<SimilarPage>, StorageError> {
        similares::similar_pages(&self.pool, pagina_id, kind, limit).await
    }

    #[instrument(skip(self))]
    async fn top_ngrams(&self, limit: u32) -> Result<Vec<NgramTotal>, StorageError> {
        ngrams::top_ngrams(&self.pool, limit).await
    }

    #[instrument(skip(self))]
    async fn ngram_pages(&self, frase: &str, limit: u32) -> Result<Vec<NgramPage>, StorageError> {
        ngrams::ngram_pages(&self.pool, frase, limit).await
    }

    #[instrument(skip(self))]
    async fn search_ngrams(
        &self,
        kind: NgramKind,
        prefix: &str,
        limit: u32,
    ) -> Result<Vec<NgramHit>, StorageError> {
        let hits = ngrams::search_ngrams(&self.pool, kind, prefix, limit).await?;
        debug!(rows = hits.len(), %kind, "n-gram search");
        Ok(hits)
    }

    #[instrument(skip(self))]
    async fn length_distribution(&self) -> Result<Vec<LengthBucket>, StorageError> {
        palabras::length_distribution(&self.pool).await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx_core::query::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("ping", e))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
