use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wikistats_api::{ApiError, Envelope};
use wikistats_storage::{
    LengthBucket, NgramHit, NgramKind, NgramPage, NgramTotal, PaginaDetail, PaginaMatch,
    PaginaSummary, SharedNgramKind, SimilarPage, WordHit, WordPercentage, WordShare,
    normalize_query,
};

use crate::server::AppState;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    pub status: &'a str,
}

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "service": "Wikistats Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.store.backend_name(),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    state.store.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "readiness check failed");
        ApiError::service_unavailable(e.to_string())
    })?;
    Ok((StatusCode::OK, Json(HealthResponse { status: "ready" })))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("resource not found")
}

// ---- Query parameters ----

#[derive(Debug, Default, Deserialize)]
pub struct WordParams {
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TitleParams {
    pub titulo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NgramParams {
    pub q: Option<String>,
}

/// Trimmed value of a required parameter; blank counts as missing.
fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing_param(name))
}

// ---- Pages ----

pub async fn search_word(
    State(state): State<AppState>,
    params: Result<Query<WordParams>, QueryRejection>,
) -> ApiResult<Envelope<WordHit>> {
    let Query(params) = params?;
    let palabra = normalize_query(params.query.as_deref().unwrap_or_default());
    if palabra.is_empty() {
        return Ok(Envelope::new(Vec::new()).with_query(palabra));
    }

    let hits = state
        .store
        .search_word(&palabra, state.limits.word_search)
        .await?;
    tracing::debug!(palabra = %palabra, rows = hits.len(), "word search");
    Ok(Envelope::new(hits).with_query(palabra))
}

pub async fn list_paginas(State(state): State<AppState>) -> ApiResult<Envelope<PaginaSummary>> {
    let paginas = state.store.list_paginas().await?;
    Ok(Envelope::new(paginas))
}

pub async fn search_titles(
    State(state): State<AppState>,
    params: Result<Query<TitleParams>, QueryRejection>,
) -> ApiResult<Envelope<PaginaMatch>> {
    let Query(params) = params?;
    let titulo = required(params.titulo, "titulo")?;

    let matches = state
        .store
        .search_titles(&titulo, state.limits.title_search)
        .await?;
    tracing::debug!(titulo = %titulo, rows = matches.len(), "title search");
    Ok(Envelope::new(matches).with_query(titulo))
}

pub async fn pagina_detail(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<PaginaDetail>> {
    let Path(id) = id?;
    let detail = state
        .store
        .pagina_detail(id, state.limits.top_words)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("pagina {id} not found")))?;
    Ok(Json(detail))
}

pub async fn word_percentages(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Envelope<WordPercentage>> {
    let Path(id) = id?;
    let rows = state
        .store
        .word_percentages(id, state.limits.word_percentages)
        .await?;
    Ok(Envelope::new(rows).with_pagina_id(id))
}

pub async fn word_shares(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Envelope<WordShare>> {
    let Path(id) = id?;
    let rows = state.store.word_shares(id).await?;
    Ok(Envelope::new(rows).with_pagina_id(id))
}

pub async fn similar_pages(
    State(state): State<AppState>,
    path: Result<Path<(i64, String)>, PathRejection>,
) -> ApiResult<Envelope<SimilarPage>> {
    let Path((id, kind)) = path?;
    let kind = SharedNgramKind::from_path(&kind).ok_or_else(|| {
        ApiError::bad_request(format!(
            "unknown similarity kind '{kind}', expected bigramas or trigramas"
        ))
    })?;

    let rows = state
        .store
        .similar_pages(id, kind, state.limits.similar_pages)
        .await?;
    tracing::debug!(pagina_id = id, %kind, rows = rows.len(), "similar pages");
    Ok(Envelope::new(rows).with_pagina_id(id))
}

// ---- N-grams ----

pub async fn top_ngrams(State(state): State<AppState>) -> ApiResult<Envelope<NgramTotal>> {
    let rows = state.store.top_ngrams(state.limits.top_ngrams).await?;
    Ok(Envelope::new(rows))
}

pub async fn ngram_pages(
    State(state): State<AppState>,
    frase: Result<Path<String>, PathRejection>,
) -> ApiResult<Envelope<NgramPage>> {
    let Path(frase) = frase?;
    let frase = normalize_query(&frase);
    if frase.is_empty() {
        return Err(ApiError::missing_param("frase"));
    }

    let rows = state
        .store
        .ngram_pages(&frase, state.limits.ngram_pages)
        .await?;
    Ok(Envelope::new(rows).with_query(frase))
}

pub async fn search_ngrams(
    State(state): State<AppState>,
    params: Result<Query<NgramParams>, QueryRejection>,
) -> ApiResult<Envelope<NgramHit>> {
    let Query(params) = params?;
    let q = normalize_query(&required(params.q, "q")?);
    let kind = NgramKind::detect(&q)?;
    run_ngram_search(&state, kind, q).await
}

pub async fn search_ngrams_by_kind(
    State(state): State<AppState>,
    kind: Result<Path<String>, PathRejection>,
    params: Result<Query<NgramParams>, QueryRejection>,
) -> ApiResult<Envelope<NgramHit>> {
    let Path(kind) = kind?;
    let kind = NgramKind::from_path(&kind).ok_or_else(|| {
        ApiError::bad_request(format!(
            "unknown n-gram kind '{kind}', expected unigramas, bigramas or trigramas"
        ))
    })?;
    let Query(params) = params?;
    let q = normalize_query(&required(params.q, "q")?);
    // Rejects 4+ word prefixes even though the table comes from the path
    NgramKind::detect(&q)?;
    run_ngram_search(&state, kind, q).await
}

async fn run_ngram_search(
    state: &AppState,
    kind: NgramKind,
    q: String,
) -> ApiResult<Envelope<NgramHit>> {
    let hits = state
        .store
        .search_ngrams(kind, &q, state.limits.ngram_search)
        .await?;
    tracing::debug!(q = %q, %kind, rows = hits.len(), "n-gram search");
    Ok(Envelope::new(hits).with_query(q).with_kind(kind))
}

// ---- Distribution ----

pub async fn length_distribution(
    State(state): State<AppState>,
) -> ApiResult<Envelope<LengthBucket>> {
    let buckets = state.store.length_distribution().await?;
    Ok(Envelope::new(buckets))
}
