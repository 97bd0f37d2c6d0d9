//! SQL query implementations for the PostgreSQL corpus backend.
//!
//! One function per lookup, each running a single parameterized statement.

pub mod ngrams;
pub mod paginas;
pub mod palabras;
pub mod similares;

/// Column list shared by every query that returns a full `pagina` row.
pub(crate) const PAGINA_COLUMNS: &str = "p.id, p.titulo, p.url, p.num_palabras, \
     p.num_palabras_unicas, p.enlaces_salientes, p.enlaces_entrantes, p.edits_por_dia, \
     p.pagerank, p.longitud_promedio";

/// Row tuple matching [`PAGINA_COLUMNS`].
pub(crate) type PaginaRow = (i64, String, String, i64, i64, i64, i64, f64, f64, f64);

pub(crate) fn pagina_from_row(row: PaginaRow) -> wikistats_storage::Pagina {
    let (
        id,
        titulo,
        url,
        num_palabras,
        num_palabras_unicas,
        enlaces_salientes,
        enlaces_entrantes,
        edits_por_dia,
        pagerank,
        longitud_promedio,
    ) = row;
    wikistats_storage::Pagina {
        id,
        titulo,
        url,
        num_palabras,
        num_palabras_unicas,
        enlaces_salientes,
        enlaces_entrantes,
        edits_por_dia,
        pagerank,
        longitud_promedio,
    }
}
