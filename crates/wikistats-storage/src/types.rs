//! Row types returned by corpus lookups.
//!
//! Field names are the JSON contract consumed by the dashboard frontend.

use serde::{Deserialize, Serialize};

/// A corpus page with its precomputed statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagina {
    pub id: i64,
    pub titulo: String,
    pub url: String,
    pub num_palabras: i64,
    pub num_palabras_unicas: i64,
    pub enlaces_salientes: i64,
    pub enlaces_entrantes: i64,
    pub edits_por_dia: f64,
    pub pagerank: f64,
    /// Mean word length in characters.
    pub longitud_promedio: f64,
}

/// Minimal page reference used in page pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginaSummary {
    pub id: i64,
    pub titulo: String,
}

/// Title search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginaMatch {
    pub id: i64,
    pub titulo: String,
    pub url: String,
    pub num_palabras: i64,
    pub num_palabras_unicas: i64,
    pub enlaces_salientes: i64,
    pub enlaces_entrantes: i64,
    pub pagerank: f64,
    pub longitud_promedio: f64,
}

impl From<Pagina> for PaginaMatch {
    fn from(p: Pagina) -> Self {
        Self {
            id: p.id,
            titulo: p.titulo,
            url: p.url,
            num_palabras: p.num_palabras,
            num_palabras_unicas: p.num_palabras_unicas,
            enlaces_salientes: p.enlaces_salientes,
            enlaces_entrantes: p.enlaces_entrantes,
            pagerank: p.pagerank,
            longitud_promedio: p.longitud_promedio,
        }
    }
}

/// A page containing the searched word, with the word's frequency in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordHit {
    #[serde(flatten)]
    pub pagina: Pagina,
    pub frecuencia: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub palabra: String,
    pub frecuencia: i64,
}

/// Share of a page's words taken by one word, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPercentage {
    pub palabra: String,
    pub porcentaje: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordShare {
    pub palabra: String,
    pub frecuencia: i64,
    pub porcentaje: f64,
}

/// A page with its most frequent words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginaDetail {
    pub pagina: Pagina,
    pub top_palabras: Vec<WordFrequency>,
}

/// A page sharing n-grams with the page being inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarPage {
    pub pagina_id: i64,
    pub titulo: String,
    pub url: String,
    pub cantidad_comunes: i64,
}

/// An n-gram with its frequency summed over every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramTotal {
    pub frase: String,
    pub longitud: i32,
    pub frecuencia: i64,
}

/// A page in which a given phrase occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramPage {
    pub pagina_id: i64,
    pub titulo: String,
    pub url: String,
    pub longitud: i32,
    pub frecuencia: i64,
}

/// A top n-gram entry matching a prefix search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramHit {
    pub pagina_id: i64,
    pub titulo: String,
    pub url: String,
    pub ngrama: String,
    pub frecuencia: i64,
}

/// One bar of the global word-length histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBucket {
    pub longitud: i32,
    pub frecuencia_total: i64,
}
