//! Similar-page ranking from the pairwise coincidence tables.

use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use wikistats_storage::{SharedNgramKind, SimilarPage, StorageError};

use crate::error::query_error;

/// Coincidence rows exist once per unordered pair, so the page is looked up
/// in both columns and the other column is reported.
pub(crate) fn similar_sql(kind: SharedNgramKind) -> String {
    let table = kind.table();
    let count = kind.count_column();
    format!(
        "SELECT t.otro_id, p.titulo, p.url, t.cantidad \
         FROM ( \
             SELECT pagina_id_coincidente AS otro_id, {count} AS cantidad \
             FROM {table} WHERE pagina_id_base = $1 \
             UNION ALL \
             SELECT pagina_id_base AS otro_id, {count} AS cantidad \
             FROM {table} WHERE pagina_id_coincidente = $1 \
         ) AS t \
         JOIN pagina p ON p.id = t.otro_id \
         ORDER BY t.cantidad DESC, t.otro_id ASC \
         LIMIT $2"
    )
}

pub async fn similar_pages(
    pool: &PgPool,
    pagina_id: i64,
    kind: SharedNgramKind,
    limit: u32,
) -> Result<Vec<SimilarPage>, StorageError> {
    let sql = similar_sql(kind);

    let rows: Vec<(i64, String, String, i64)> = query_as(&sql)
        .bind(pagina_id)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("similar_pages", e))?;

    Ok(rows
        .into_iter()
        .map(|(pagina_id, titulo, url, cantidad_comunes)| SimilarPage {
            pagina_id,
            titulo,
            url,
            cantidad_comunes,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similar_sql_searches_both_directions() {
        let sql = similar_sql(SharedNgramKind::Trigramas);
        assert_eq!(sql.matches("FROM coincidencia_trigramas").count(), 2);
        assert!(sql.contains("WHERE pagina_id_base = $1"));
        assert!(sql.contains("WHERE pagina_id_coincidente = $1"));
        assert!(sql.contains("cantidad_trigramas_comunes AS cantidad"));
        assert!(sql.contains("UNION ALL"));
    }
}
