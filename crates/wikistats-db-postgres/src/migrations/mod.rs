//! Database migration management for the PostgreSQL corpus backend.
//!
//! Migrations are embedded in the binary, so an empty database can be
//! prepared for the loading pipeline without shipping SQL files.

use sqlx_core::migrate::{Migration, MigrationType};
use sqlx_postgres::PgPool;
use std::borrow::Cow;
use tracing::{info, instrument};

use crate::error::{PostgresError, Result};

/// Embedded migrations in chronological order: (version, description, sql).
macro_rules! embedded_migrations {
    () => {
        &[(
            20250601000001i64,
            "corpus_schema",
            include_str!("../../migrations/20250601000001_corpus_schema.sql"),
        )]
    };
}

fn build_migrations() -> Vec<Migration> {
    embedded_migrations!()
        .iter()
        .map(|(version, description, sql)| Migration {
            version: *version,
            description: Cow::Borrowed(description),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]),
            no_tx: false,
        })
        .collect()
}

/// Runs all pending database migrations.
///
/// Applied versions are tracked in `_sqlx_migrations`.
///
/// # Errors
///
/// Returns an error if a migration fails to execute.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<()> {
    let migrations = build_migrations();
    info!(count = migrations.len(), "Running embedded database migrations");

    let migrator = sqlx_core::migrate::Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| PostgresError::Migration(format!("Migration failed: {e}")))?;

    info!("Database migrations completed successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered_and_create_corpus_tables() {
        let migrations = build_migrations();
        assert!(!migrations.is_empty());
        assert!(
            migrations
                .windows(2)
                .all(|pair| pair[0].version < pair[1].version)
        );

        let sql = &migrations[0].sql;
        for table in [
            "pagina",
            "palabra_pagina",
            "porcentaje_palabra_pagina",
            "ngram",
            "top_unigramas",
            "top_bigramas",
            "top_trigramas",
            "coincidencia_bigramas",
            "coincidencia_trigramas",
            "distribucion_longitud_palabra",
        ] {
            assert!(
                sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
                "missing table {table}"
            );
        }
    }
}
