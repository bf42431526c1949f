//! schema_baseline: turns a PostgreSQL schema dump into a baseline migration
//!
//! A `pg_dump --schema-only` text is scanned for tables, indexes, constraints
//! and comments. The extracted model is rendered as an AdonisJS Lucid / Knex
//! migration class and independently checked against raw counts taken from the
//! same text, so anything the extractors missed shows up in the report.

pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod schema;
pub mod utils;
pub mod verify;

use std::fs;
use std::path::Path;

// Re-export main types for easier access
pub use config::Config;
pub use error::{Error, Result};
pub use extract::SchemaExtractor;
pub use generate::{GeneratedMigration, MigrationGenerator};
pub use schema::types::SchemaModel;
pub use verify::{SchemaVerifier, VerificationResult};

/// Everything produced from one schema dump
#[derive(Debug, Clone)]
pub struct Conversion {
    pub model: SchemaModel,
    pub migration: GeneratedMigration,
    pub verification: VerificationResult,
}

impl Conversion {
    /// The migration source file
    pub fn script(&self) -> String {
        self.migration.render()
    }

    /// Digest of the rendered script
    pub fn digest(&self) -> String {
        utils::script_digest(&self.script())
    }
}

/// Extract, generate and verify in one pass
pub fn convert(sql: &str, config: &Config) -> Result<Conversion> {
    let extractor = SchemaExtractor::new(&config.extraction)?;
    let verifier = SchemaVerifier::new(sql, &config.extraction)?;

    let model = extractor.extract(sql);
    let migration = MigrationGenerator::new(&config.generator).generate(&model);
    let verification = verifier.verify(&model);

    tracing::info!(
        tables = model.tables.len(),
        columns = model.column_count(),
        passed = verification.passed,
        "Converted schema dump"
    );

    Ok(Conversion {
        model,
        migration,
        verification,
    })
}

/// Read a dump from disk and convert it
pub fn convert_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<Conversion> {
    let sql = fs::read_to_string(path.as_ref())?;
    convert(&sql, config)
}
