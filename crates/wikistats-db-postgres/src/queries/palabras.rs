//! Word statistics: per-page shares and the global length histogram.

use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use wikistats_storage::{LengthBucket, StorageError, WordPercentage, WordShare};

use crate::error::query_error;

pub async fn word_percentages(
    pool: &PgPool,
    pagina_id: i64,
    limit: u32,
) -> Result<Vec<WordPercentage>, StorageError> {
    let rows: Vec<(String, f64)> = query_as(
        "SELECT palabra, porcentaje FROM porcentaje_palabra_pagina \
         WHERE pagina_id = $1 \
         ORDER BY porcentaje DESC, palabra ASC \
         LIMIT $2",
    )
    .bind(pagina_id)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
    .map_err(|e| query_error("word_percentages", e))?;

    Ok(rows
        .into_iter()
        .map(|(palabra, porcentaje)| WordPercentage {
            palabra,
            porcentaje,
        })
        .collect())
}

pub async fn word_shares(pool: &PgPool, pagina_id: i64) -> Result<Vec<WordShare>, StorageError> {
    let rows: Vec<(String, i64, f64)> = query_as(
        "SELECT DISTINCT pp.palabra, pp.frecuencia, prpp.porcentaje \
         FROM palabra_pagina AS pp \
         INNER JOIN porcentaje_palabra_pagina AS prpp USING (palabra, pagina_id) \
         WHERE pp.pagina_id = $1 \
         ORDER BY pp.frecuencia DESC, pp.palabra ASC",
    )
    .bind(pagina_id)
    .fetch_all(pool)
    .await
    .map_err(|e| query_error("word_shares", e))?;

    Ok(rows
        .into_iter()
        .map(|(palabra, frecuencia, porcentaje)| WordShare {
            palabra,
            frecuencia,
            porcentaje,
        })
        .collect())
}

pub async fn length_distribution(pool: &PgPool) -> Result<Vec<LengthBucket>, StorageError> {
    let rows: Vec<(i32, i64)> = query_as(
        "SELECT longitud, frecuencia_total FROM distribucion_longitud_palabra \
         ORDER BY longitud ASC",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| query_error("length_distribution", e))?;

    Ok(rows
        .into_iter()
        .map(|(longitud, frecuencia_total)| LengthBucket {
            longitud,
            frecuencia_total,
        })
        .collect())
}
