//! N-gram lookups over the `ngram` table and the per-kind top tables.

use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use wikistats_storage::{NgramHit, NgramKind, NgramPage, NgramTotal, StorageError, escape_like};

use crate::error::query_error;

/// Builds the prefix search over the top table of `kind`.
///
/// Identifiers come from `NgramKind`, never from input.
pub(crate) fn search_sql(kind: NgramKind) -> String {
    let table = kind.table();
    let column = kind.column();
    format!(
        "SELECT t.pagina_id, p.titulo, p.url, t.{column}, t.frecuencia \
         FROM {table} t \
         JOIN pagina p ON t.pagina_id = p.id \
         WHERE t.{column} LIKE $1 ESCAPE '\\' \
         ORDER BY t.frecuencia DESC, t.pagina_id ASC \
         LIMIT $2"
    )
}

pub async fn search_ngrams(
    pool: &PgPool,
    kind: NgramKind,
    prefix: &str,
    limit: u32,
) -> Result<Vec<NgramHit>, StorageError> {
    let sql = search_sql(kind);
    let pattern = format!("{}%", escape_like(prefix));

    let rows: Vec<(i64, String, String, String, i64)> = query_as(&sql)
        .bind(pattern)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("search_ngrams", e))?;

    Ok(rows
        .into_iter()
        .map(|(pagina_id, titulo, url, ngrama, frecuencia)| NgramHit {
            pagina_id,
            titulo,
            url,
            ngrama,
            frecuencia,
        })
        .collect())
}

pub async fn top_ngrams(pool: &PgPool, limit: u32) -> Result<Vec<NgramTotal>, StorageError> {
    // SUM(bigint) is numeric in PostgreSQL
    let rows: Vec<(String, i32, i64)> = query_as(
        "SELECT frase, longitud, SUM(frecuencia)::BIGINT AS frecuencia \
         FROM ngram \
         GROUP BY frase, longitud \
         ORDER BY frecuencia DESC, frase ASC \
         LIMIT $1",
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
    .map_err(|e| query_error("top_ngrams", e))?;

    Ok(rows
        .into_iter()
        .map(|(frase, longitud, frecuencia)| NgramTotal {
            frase,
            longitud,
            frecuencia,
        })
        .collect())
}

pub async fn ngram_pages(
    pool: &PgPool,
    frase: &str,
    limit: u32,
) -> Result<Vec<NgramPage>, StorageError> {
    let rows: Vec<(i64, String, String, i32, i64)> = query_as(
        "SELECT n.pagina_id, p.titulo, p.url, n.longitud, n.frecuencia \
         FROM ngram n \
         JOIN pagina p ON n.pagina_id = p.id \
         WHERE n.frase = $1 \
         ORDER BY n.frecuencia DESC, n.pagina_id ASC \
         LIMIT $2",
    )
    .bind(frase)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
    .map_err(|e| query_error("ngram_pages", e))?;

    Ok(rows
        .into_iter()
        .map(|(pagina_id, titulo, url, longitud, frecuencia)| NgramPage {
            pagina_id,
            titulo,
            url,
            longitud,
            frecuencia,
        })
        .collect())
}
