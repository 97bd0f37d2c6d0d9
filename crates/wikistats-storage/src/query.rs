//! Query normalization and n-gram kind detection.
//!
//! Table and column names used by n-gram lookups come only from the closed
//! enums in this module, never from request input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Largest phrase the corpus keeps n-gram tables for.
pub const MAX_NGRAM_WORDS: usize = 3;

/// Normalizes a search query the way the corpus was normalized upstream:
/// trimmed, internal whitespace collapsed to single spaces, lowercased.
pub fn normalize_query(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escapes `\`, `%` and `_` so the input matches literally inside a LIKE
/// pattern using `\` as escape character.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Length class of a phrase, selecting which top n-gram table to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NgramKind {
    Unigrama,
    Bigrama,
    Trigrama,
}

impl NgramKind {
    const ALL: [Self; MAX_NGRAM_WORDS] = [Self::Unigrama, Self::Bigrama, Self::Trigrama];

    /// Picks the n-gram kind from the number of words in `query`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidQuery` when the query has no words or
    /// more than [`MAX_NGRAM_WORDS`].
    pub fn detect(query: &str) -> Result<Self, StorageError> {
        let words = query.split_whitespace().count();
        if words == 0 {
            return Err(StorageError::invalid_query("empty search query"));
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.word_count() == words)
            .ok_or_else(|| {
                StorageError::invalid_query(format!(
                    "only 1, 2 or {MAX_NGRAM_WORDS} word searches are supported"
                ))
            })
    }

    /// Parses the path segment naming a kind (`unigramas`, `bigrama`, ...).
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment.to_ascii_lowercase().as_str() {
            "unigrama" | "unigramas" => Some(Self::Unigrama),
            "bigrama" | "bigramas" => Some(Self::Bigrama),
            "trigrama" | "trigramas" => Some(Self::Trigrama),
            _ => None,
        }
    }

    /// Number of words a phrase of this kind has.
    pub fn word_count(self) -> usize {
        match self {
            Self::Unigrama => 1,
            Self::Bigrama => 2,
            Self::Trigrama => 3,
        }
    }

    /// Denormalized per-page top n-gram table.
    pub fn table(self) -> &'static str {
        match self {
            Self::Unigrama => "top_unigramas",
            Self::Bigrama => "top_bigramas",
            Self::Trigrama => "top_trigramas",
        }
    }

    /// Column of [`Self::table`] holding the phrase.
    pub fn column(self) -> &'static str {
        match self {
            Self::Unigrama => "palabra",
            Self::Bigrama => "bigrama",
            Self::Trigrama => "trigrama",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unigrama => "unigrama",
            Self::Bigrama => "bigrama",
            Self::Trigrama => "trigrama",
        }
    }
}

impl fmt::Display for NgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which shared n-gram count ranks similar pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharedNgramKind {
    Bigramas,
    Trigramas,
}

impl SharedNgramKind {
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment.to_ascii_lowercase().as_str() {
            "bigrama" | "bigramas" => Some(Self::Bigramas),
            "trigrama" | "trigramas" => Some(Self::Trigramas),
            _ => None,
        }
    }

    /// Pairwise coincidence table, one row per unordered page pair.
    pub fn table(self) -> &'static str {
        match self {
            Self::Bigramas => "coincidencia_bigramas",
            Self::Trigramas => "coincidencia_trigramas",
        }
    }

    /// Column holding the shared n-gram count.
    pub fn count_column(self) -> &'static str {
        match self {
            Self::Bigramas => "cantidad_bigramas_comunes",
            Self::Trigramas => "cantidad_trigramas_comunes",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bigramas => "bigramas",
            Self::Trigramas => "trigramas",
        }
    }
}

impl fmt::Display for SharedNgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
