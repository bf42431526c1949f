//! Extraction of schema constructs from a pg_dump text
//!
//! Every extractor scans the full text independently for one construct class.
//! Column comments and `ALTER TABLE ... CHECK` constraints are merged into the
//! extracted tables afterwards, in a single back-fill pass.

pub mod check;
pub mod comment;
pub mod foreign_key;
pub mod index;
pub mod table;
pub mod unique;

pub use check::{AddedCheck, CheckConstraintExtractor};
pub use comment::CommentExtractor;
pub use foreign_key::ForeignKeyExtractor;
pub use index::IndexExtractor;
pub use table::TableExtractor;
pub use unique::UniqueConstraintExtractor;

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::schema::types::{ColumnComments, SchemaModel, Table};

/// Runs all extractors over a schema dump and assembles the model
pub struct SchemaExtractor {
    tables: TableExtractor,
    indexes: IndexExtractor,
    foreign_keys: ForeignKeyExtractor,
    unique_constraints: UniqueConstraintExtractor,
    checks: CheckConstraintExtractor,
    comments: CommentExtractor,
}

impl SchemaExtractor {
    /// Compile every pattern for the configured schema qualifier
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let schema = config.schema.as_str();

        Ok(Self {
            tables: TableExtractor::new(config)?,
            indexes: IndexExtractor::new(schema)?,
            foreign_keys: ForeignKeyExtractor::new(schema)?,
            unique_constraints: UniqueConstraintExtractor::new(schema)?,
            checks: CheckConstraintExtractor::new(schema)?,
            comments: CommentExtractor::new(schema)?,
        })
    }

    /// Extract the full model from the dump text
    pub fn extract(&self, sql: &str) -> SchemaModel {
        let tables = self.tables.extract(sql);
        let indexes = self.indexes.extract(sql);
        let foreign_keys = self.foreign_keys.extract(sql);
        let unique_constraints = self.unique_constraints.extract(sql);
        let checks = self.checks.extract(sql);
        let comments = self.comments.extract(sql);

        tracing::debug!(
            tables = tables.len(),
            indexes = indexes.len(),
            foreign_keys = foreign_keys.len(),
            unique_constraints = unique_constraints.len(),
            added_checks = checks.len(),
            comments = comments.len(),
            "Extracted schema constructs"
        );

        SchemaModel {
            tables: backfill(tables, &comments, &checks),
            indexes,
            foreign_keys,
            unique_constraints,
        }
    }
}

/// Attach comments to their columns and added checks to their tables
fn backfill(tables: Vec<Table>, comments: &ColumnComments, checks: &[AddedCheck]) -> Vec<Table> {
    tables
        .into_iter()
        .map(|table| {
            let columns = table
                .columns
                .into_iter()
                .map(|mut column| {
                    let key = (table.name.clone(), column.name.clone());
                    if let Some(comment) = comments.get(&key) {
                        column.comment = Some(comment.clone());
                    }
                    column
                })
                .collect();

            let check_constraints = table
                .check_constraints
                .into_iter()
                .chain(
                    checks
                        .iter()
                        .filter(|check| check.table == table.name)
                        .map(AddedCheck::to_clause),
                )
                .collect();

            Table {
                name: table.name,
                columns,
                check_constraints,
            }
        })
        .collect()
}

/// Split a parenthesized column list on commas
pub(crate) fn split_column_list(list: &str) -> Vec<String> {
    list.split(',').map(|col| col.trim().to_string()).collect()
}
