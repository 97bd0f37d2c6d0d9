//! Page lookups: listing, title search, detail, and word search.

use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use wikistats_storage::{
    PaginaDetail, PaginaMatch, PaginaSummary, StorageError, WordFrequency, WordHit, escape_like,
};

use super::{PAGINA_COLUMNS, PaginaRow, pagina_from_row};
use crate::error::query_error;

/// Pages containing a word, joined with the word's per-page frequency.
pub async fn search_word(
    pool: &PgPool,
    palabra: &str,
    limit: u32,
) -> Result<Vec<WordHit>, StorageError> {
    let sql = format!(
        "SELECT {PAGINA_COLUMNS}, pp.frecuencia \
         FROM palabra_pagina pp \
         JOIN pagina p ON pp.pagina_id = p.id \
         WHERE pp.palabra = $1 \
         ORDER BY pp.frecuencia DESC, p.id ASC \
         LIMIT $2"
    );

    let rows: Vec<(i64, String, String, i64, i64, i64, i64, f64, f64, f64, i64)> =
        query_as(&sql)
            .bind(palabra)
            .bind(i64::from(limit))
            .fetch_all(pool)
            .await
            .map_err(|e| query_error("search_word", e))?;

    Ok(rows
        .into_iter()
        .map(|(id, titulo, url, np, npu, es, ee, epd, pr, lp, frecuencia)| WordHit {
            pagina: pagina_from_row((id, titulo, url, np, npu, es, ee, epd, pr, lp)),
            frecuencia,
        })
        .collect())
}

pub async fn list_paginas(pool: &PgPool) -> Result<Vec<PaginaSummary>, StorageError> {
    let rows: Vec<(i64, String)> =
        query_as("SELECT id, titulo FROM pagina ORDER BY titulo ASC, id ASC")
            .fetch_all(pool)
            .await
            .map_err(|e| query_error("list_paginas", e))?;

    Ok(rows
        .into_iter()
        .map(|(id, titulo)| PaginaSummary { id, titulo })
        .collect())
}

/// Pages whose title contains `fragment` (case-insensitive, literal match).
pub async fn search_titles(
    pool: &PgPool,
    fragment: &str,
    limit: u32,
) -> Result<Vec<PaginaMatch>, StorageError> {
    let sql = format!(
        "SELECT {PAGINA_COLUMNS} \
         FROM pagina p \
         WHERE p.titulo ILIKE $1 ESCAPE '\\' \
         ORDER BY p.titulo ASC, p.id ASC \
         LIMIT $2"
    );
    let pattern = format!("%{}%", escape_like(fragment));

    let rows: Vec<PaginaRow> = query_as(&sql)
        .bind(pattern)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("search_titles", e))?;

    Ok(rows
        .into_iter()
        .map(|row| PaginaMatch::from(pagina_from_row(row)))
        .collect())
}

/// A page row plus its most frequent words. Two statements, no transaction:
/// the corpus is read-only while served.
pub async fn pagina_detail(
    pool: &PgPool,
    id: i64,
    top_words: u32,
) -> Result<Option<PaginaDetail>, StorageError> {
    let sql = format!("SELECT {PAGINA_COLUMNS} FROM pagina p WHERE p.id = $1");
    let row: Option<PaginaRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| query_error("pagina_detail", e))?;

    let Some(row) = row else {
        return Ok(None);
    };

    let words: Vec<(String, i64)> = query_as(
        "SELECT palabra, frecuencia FROM palabra_pagina \
         WHERE pagina_id = $1 \
         ORDER BY frecuencia DESC, palabra ASC \
         LIMIT $2",
    )
    .bind(id)
    .bind(i64::from(top_words))
    .fetch_all(pool)
    .await
    .map_err(|e| query_error("pagina_detail.top_palabras", e))?;

    Ok(Some(PaginaDetail {
        pagina: pagina_from_row(row),
        top_palabras: words
            .into_iter()
            .map(|(palabra, frecuencia)| WordFrequency {
                palabra,
                frecuencia,
            })
            .collect(),
    }))
}
