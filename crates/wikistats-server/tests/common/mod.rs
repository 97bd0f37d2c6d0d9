//! In-memory corpus used by the router tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use wikistats_server::{AppConfig, AppState, build_app};
use wikistats_storage::{
    CorpusStore, LengthBucket, NgramHit, NgramKind, NgramPage, NgramTotal, Pagina, PaginaDetail,
    PaginaMatch, PaginaSummary, SharedNgramKind, SimilarPage, StorageError, WordFrequency,
    WordHit, WordPercentage, WordShare,
};

/// Forces every lookup to fail with the given kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Connection,
    Query,
}

#[derive(Debug, Default)]
pub struct MemoryCorpus {
    pub paginas: Vec<Pagina>,
    /// (palabra, pagina_id, frecuencia)
    pub palabras: Vec<(String, i64, i64)>,
    /// (palabra, pagina_id, porcentaje)
    pub porcentajes: Vec<(String, i64, f64)>,
    /// (frase, longitud, pagina_id, frecuencia)
    pub ngrams: Vec<(String, i32, i64, i64)>,
    /// (kind, pagina_id, ngrama, frecuencia)
    pub top: Vec<(NgramKind, i64, String, i64)>,
    /// (kind, pagina_id_base, pagina_id_coincidente, cantidad)
    pub coincidencias: Vec<(SharedNgramKind, i64, i64, i64)>,
    pub histograma: Vec<LengthBucket>,
    pub failure: Option<Failure>,
    /// Added to every lookup before it answers.
    pub delay: Option<Duration>,
}

fn pagina(id: i64, titulo: &str, pagerank: f64) -> Pagina {
    Pagina {
        id,
        titulo: titulo.to_string(),
        url: format!("https://es.wikipedia.org/wiki/{}", titulo.replace(' ', "_")),
        num_palabras: 1000 * id,
        num_palabras_unicas: 400 * id,
        enlaces_salientes: 10 * id,
        enlaces_entrantes: 3 * id,
        edits_por_dia: 0.5,
        pagerank,
        longitud_promedio: 5.0,
    }
}

impl MemoryCorpus {
    pub fn sample() -> Self {
        let s = |v: &str| v.to_string();
        Self {
            paginas: vec![
                pagina(1, "Cristóbal Colón", 1.25),
                pagina(2, "Colonia", 0.75),
                pagina(3, "Historia de España", 3.5),
            ],
            palabras: vec![
                (s("colón"), 1, 30),
                (s("colón"), 2, 5),
                (s("colón"), 3, 12),
                (s("historia"), 3, 40),
                (s("de"), 1, 50),
            ],
            porcentajes: vec![
                (s("colón"), 1, 2.5),
                (s("de"), 1, 4.1),
                (s("historia"), 3, 1.3),
            ],
            ngrams: vec![
                (s("historia de"), 2, 3, 9),
                (s("historia de"), 2, 1, 2),
                (s("colón"), 1, 1, 30),
            ],
            top: vec![
                (NgramKind::Unigrama, 1, s("colón"), 30),
                (NgramKind::Unigrama, 2, s("colonia"), 20),
                (NgramKind::Bigrama, 3, s("historia de"), 9),
                (NgramKind::Bigrama, 1, s("historia de"), 2),
                (NgramKind::Trigrama, 3, s("historia de españa"), 6),
            ],
            coincidencias: vec![
                (SharedNgramKind::Bigramas, 1, 2, 90),
                (SharedNgramKind::Bigramas, 1, 3, 120),
                (SharedNgramKind::Bigramas, 2, 3, 95),
                (SharedNgramKind::Trigramas, 1, 3, 75),
            ],
            histograma: vec![
                LengthBucket {
                    longitud: 1,
                    frecuencia_total: 10,
                },
                LengthBucket {
                    longitud: 2,
                    frecuencia_total: 40,
                },
            ],
            failure: None,
            delay: None,
        }
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::sample()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::sample()
        }
    }

    async fn check(&self) -> Result<(), StorageError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure {
            None => Ok(()),
            Some(Failure::Connection) => Err(StorageError::connection("pool timed out")),
            Some(Failure::Query) => Err(StorageError::query(
                "search_word: corpus table missing: relation \"palabra_pagina\" does not exist",
            )),
        }
    }

    fn find(&self, id: i64) -> Option<&Pagina> {
        self.paginas.iter().find(|p| p.id == id)
    }
}

fn take<T>(rows: Vec<T>, limit: u32) -> Vec<T> {
    rows.into_iter().take(limit as usize).collect()
}

#[async_trait]
impl CorpusStore for MemoryCorpus {
    async fn search_word(&self, palabra: &str, limit: u32) -> Result<Vec<WordHit>, StorageError> {
        self.check().await?;
        let mut hits: Vec<WordHit> = self
            .palabras
            .iter()
            .filter(|(w, _, _)| w == palabra)
            .filter_map(|(_, id, f)| {
                self.find(*id).map(|p| WordHit {
                    pagina: p.clone(),
                    frecuencia: *f,
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            b.frecuencia
                .cmp(&a.frecuencia)
                .then(a.pagina.id.cmp(&b.pagina.id))
        });
        Ok(take(hits, limit))
    }

    async fn list_paginas(&self) -> Result<Vec<PaginaSummary>, StorageError> {
        self.check().await?;
        let mut rows: Vec<PaginaSummary> = self
            .paginas
            .iter()
            .map(|p| PaginaSummary {
                id: p.id,
                titulo: p.titulo.clone(),
            })
            .collect();
        rows.sort_by(|a, b| a.titulo.cmp(&b.titulo));
        Ok(rows)
    }

    async fn search_titles(
        &self,
        fragment: &str,
        limit: u32,
    ) -> Result<Vec<PaginaMatch>, StorageError> {
        self.check().await?;
        let needle = fragment.to_lowercase();
        let mut rows: Vec<PaginaMatch> = self
            .paginas
            .iter()
            .filter(|p| p.titulo.to_lowercase().contains(&needle))
            .cloned()
            .map(PaginaMatch::from)
            .collect();
        rows.sort_by(|a, b| a.titulo.cmp(&b.titulo));
        Ok(take(rows, limit))
    }

    async fn pagina_detail(
        &self,
        id: i64,
        top_words: u32,
    ) -> Result<Option<PaginaDetail>, StorageError> {
        self.check().await?;
        let Some(pagina) = self.find(id).cloned() else {
            return Ok(None);
        };
        let mut words: Vec<WordFrequency> = self
            .palabras
            .iter()
            .filter(|(_, pid, _)| *pid == id)
            .map(|(w, _, f)| WordFrequency {
                palabra: w.clone(),
                frecuencia: *f,
            })
            .collect();
        words.sort_by(|a, b| {
            b.frecuencia
                .cmp(&a.frecuencia)
                .then(a.palabra.cmp(&b.palabra))
        });
        Ok(Some(PaginaDetail {
            pagina,
            top_palabras: take(words, top_words),
        }))
    }

    async fn word_percentages(
        &self,
        pagina_id: i64,
        limit: u32,
    ) -> Result<Vec<WordPercentage>, StorageError> {
        self.check().await?;
        let mut rows: Vec<WordPercentage> = self
            .porcentajes
            .iter()
            .filter(|(_, pid, _)| *pid == pagina_id)
            .map(|(w, _, pct)| WordPercentage {
                palabra: w.clone(),
                porcentaje: *pct,
            })
            .collect();
        rows.sort_by(|a, b| b.porcentaje.total_cmp(&a.porcentaje));
        Ok(take(rows, limit))
    }

    async fn word_shares(&self, pagina_id: i64) -> Result<Vec<WordShare>, StorageError> {
        self.check().await?;
        let mut rows: Vec<WordShare> = self
            .palabras
            .iter()
            .filter(|(_, pid, _)| *pid == pagina_id)
            .filter_map(|(w, _, f)| {
                self.porcentajes
                    .iter()
                    .find(|(pw, pid, _)| pw == w && *pid == pagina_id)
                    .map(|(_, _, pct)| WordShare {
                        palabra: w.clone(),
                        frecuencia: *f,
                        porcentaje: *pct,
                    })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.frecuencia
                .cmp(&a.frecuencia)
                .then(a.palabra.cmp(&b.palabra))
        });
        Ok(rows)
    }

    async fn similar_pages(
        &self,
        pagina_id: i64,
        kind: SharedNgramKind,
        limit: u32,
    ) -> Result<Vec<SimilarPage>, StorageError> {
        self.check().await?;
        let mut rows: Vec<SimilarPage> = self
            .coincidencias
            .iter()
            .filter(|(k, _, _, _)| *k == kind)
            .filter_map(|(_, base, other, count)| {
                let otro = if *base == pagina_id {
                    *other
                } else if *other == pagina_id {
                    *base
                } else {
                    return None;
                };
                self.find(otro).map(|p| SimilarPage {
                    pagina_id: otro,
                    titulo: p.titulo.clone(),
                    url: p.url.clone(),
                    cantidad_comunes: *count,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.cantidad_comunes
                .cmp(&a.cantidad_comunes)
                .then(a.pagina_id.cmp(&b.pagina_id))
        });
        Ok(take(rows, limit))
    }

    async fn top_ngrams(&self, limit: u32) -> Result<Vec<NgramTotal>, StorageError> {
        self.check().await?;
        let mut totals: Vec<NgramTotal> = Vec::new();
        for (frase, longitud, _, f) in &self.ngrams {
            match totals
                .iter_mut()
                .find(|t| &t.frase == frase && t.longitud == *longitud)
            {
                Some(t) => t.frecuencia += f,
                None => totals.push(NgramTotal {
                    frase: frase.clone(),
                    longitud: *longitud,
                    frecuencia: *f,
                }),
            }
        }
        totals.sort_by(|a, b| {
            b.frecuencia
                .cmp(&a.frecuencia)
                .then(a.frase.cmp(&b.frase))
        });
        Ok(take(totals, limit))
    }

    async fn ngram_pages(&self, frase: &str, limit: u32) -> Result<Vec<NgramPage>, StorageError> {
        self.check().await?;
        let mut rows: Vec<NgramPage> = self
            .ngrams
            .iter()
            .filter(|(f, _, _, _)| f == frase)
            .filter_map(|(_, longitud, pid, freq)| {
                self.find(*pid).map(|p| NgramPage {
                    pagina_id: p.id,
                    titulo: p.titulo.clone(),
                    url: p.url.clone(),
                    longitud: *longitud,
                    frecuencia: *freq,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.frecuencia
                .cmp(&a.frecuencia)
                .then(a.pagina_id.cmp(&b.pagina_id))
        });
        Ok(take(rows, limit))
    }

    async fn search_ngrams(
        &self,
        kind: NgramKind,
        prefix: &str,
        limit: u32,
    ) -> Result<Vec<NgramHit>, StorageError> {
        self.check().await?;
        let mut rows: Vec<NgramHit> = self
            .top
            .iter()
            .filter(|(k, _, text, _)| *k == kind && text.starts_with(prefix))
            .filter_map(|(_, pid, text, freq)| {
                self.find(*pid).map(|p| NgramHit {
                    pagina_id: p.id,
                    titulo: p.titulo.clone(),
                    url: p.url.clone(),
                    ngrama: text.clone(),
                    frecuencia: *freq,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.frecuencia.cmp(&a.frecuencia));
        Ok(take(rows, limit))
    }

    async fn length_distribution(&self) -> Result<Vec<LengthBucket>, StorageError> {
        self.check().await?;
        let mut rows = self.histograma.clone();
        rows.sort_by_key(|b| b.longitud);
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.check().await
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

pub fn app_with(corpus: MemoryCorpus, cfg: &AppConfig) -> Router {
    let state = AppState::new(Arc::new(corpus), cfg.limits);
    build_app(state, cfg)
}

pub fn sample_app() -> Router {
    app_with(MemoryCorpus::sample(), &AppConfig::default())
}

/// Sends a GET through the router and decodes the JSON body.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}
