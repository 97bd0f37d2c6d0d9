//! The lookup trait every corpus backend implements.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::query::{NgramKind, SharedNgramKind};
use crate::types::{
    LengthBucket, NgramHit, NgramPage, NgramTotal, PaginaDetail, PaginaMatch, PaginaSummary,
    SimilarPage, WordHit, WordPercentage, WordShare,
};

/// Read-only lookups over the precomputed corpus tables.
///
/// Each method maps to a single parameterized query. Implementations must be
/// thread-safe (`Send + Sync`). Text arguments arrive already normalized by
/// the caller; `limit` bounds the number of rows returned.
///
/// # Example
///
/// ```ignore
/// use wikistats_storage::{CorpusStore, PaginaDetail, StorageError};
///
/// async fn page(store: &dyn CorpusStore, id: i64) -> Result<PaginaDetail, StorageError> {
///     store
///         .pagina_detail(id, 10)
///         .await?
///         .ok_or_else(|| StorageError::invalid_query(format!("no page {id}")))
/// }
/// ```
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Pages containing `palabra`, most frequent first.
    async fn search_word(&self, palabra: &str, limit: u32) -> Result<Vec<WordHit>, StorageError>;

    /// Every page, ordered by title.
    async fn list_paginas(&self) -> Result<Vec<PaginaSummary>, StorageError>;

    /// Pages whose title contains `fragment`, ordered by title.
    async fn search_titles(
        &self,
        fragment: &str,
        limit: u32,
    ) -> Result<Vec<PaginaMatch>, StorageError>;

    /// A page and its `top_words` most frequent words.
    ///
    /// Returns `None` if the page does not exist.
    async fn pagina_detail(
        &self,
        id: i64,
        top_words: u32,
    ) -> Result<Option<PaginaDetail>, StorageError>;

    /// Words taking the largest share of a page, highest share first.
    async fn word_percentages(
        &self,
        pagina_id: i64,
        limit: u32,
    ) -> Result<Vec<WordPercentage>, StorageError>;

    /// Every word of a page with both its frequency and its share.
    ///
    /// Ordered by frequency descending, then word ascending.
    async fn word_shares(&self, pagina_id: i64) -> Result<Vec<WordShare>, StorageError>;

    /// Pages sharing the most n-grams of `kind` with `pagina_id`.
    ///
    /// Coincidence rows are stored once per unordered pair, so both columns
    /// are searched for `pagina_id`.
    async fn similar_pages(
        &self,
        pagina_id: i64,
        kind: SharedNgramKind,
        limit: u32,
    ) -> Result<Vec<SimilarPage>, StorageError>;

    /// Most frequent n-grams over the whole corpus.
    async fn top_ngrams(&self, limit: u32) -> Result<Vec<NgramTotal>, StorageError>;

    /// Pages in which exactly `frase` occurs, most frequent first.
    async fn ngram_pages(&self, frase: &str, limit: u32) -> Result<Vec<NgramPage>, StorageError>;

    /// Top n-gram entries of `kind` starting with `prefix`, most frequent first.
    async fn search_ngrams(
        &self,
        kind: NgramKind,
        prefix: &str,
        limit: u32,
    ) -> Result<Vec<NgramHit>, StorageError>;

    /// The global word-length histogram, shortest length first.
    async fn length_distribution(&self) -> Result<Vec<LengthBucket>, StorageError>;

    /// Verifies the backend is reachable.
    async fn ping(&self) -> Result<(), StorageError>;

    /// Short backend identifier for logs.
    fn backend_name(&self) -> &'static str;
}
