//! Storage abstraction layer for the Wikistats server.
//!
//! The corpus (pages, word frequencies, n-grams, pairwise similarity counts)
//! is computed upstream and stored in relational tables. This crate defines
//! the lookups the HTTP layer needs as the [`CorpusStore`] trait, together
//! with the row types those lookups return.
//!
//! # Architecture
//!
//! - [`error`]: Storage error types
//! - [`types`]: Row types, serialized field-for-field into the JSON contract
//! - [`query`]: Query normalization and n-gram kind detection
//! - [`traits`]: The `CorpusStore` trait implemented by storage backends
//!
//! # Example
//!
//! ```ignore
//! use wikistats_storage::{CorpusStore, NgramKind, normalize_query};
//!
//! async fn lookup(store: &dyn CorpusStore, raw: &str) -> Result<(), wikistats_storage::StorageError> {
//!     let q = normalize_query(raw);
//!     let kind = NgramKind::detect(&q)?;
//!     let hits = store.search_ngrams(kind, &q, 15).await?;
//!     println!("{} {} hits", hits.len(), kind);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod query;
pub mod traits;
pub mod types;

pub use error::StorageError;
pub use query::{NgramKind, SharedNgramKind, escape_like, normalize_query};
pub use traits::CorpusStore;
pub use types::{
    LengthBucket, NgramHit, NgramPage, NgramTotal, Pagina, PaginaDetail, PaginaMatch,
    PaginaSummary, SimilarPage, WordFrequency, WordHit, WordPercentage, WordShare,
};

/// Type alias for a shareable, dynamically dispatched corpus store.
pub type DynCorpusStore = std::sync::Arc<dyn CorpusStore>;
