//! Completeness verification
//!
//! Counts constructs in the dump text with deliberately simpler patterns than
//! the extractors and compares them with the extracted model. Disagreement means
//! some statement was not recognized and the migration needs manual review.

pub mod report;

pub use report::VerificationResult;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::generate::type_mapper::is_mapped_base_type;
use crate::schema::types::SchemaModel;

static FOREIGN_KEY_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ADD CONSTRAINT \w+\s+FOREIGN KEY").expect("foreign key count pattern"));

static UNIQUE_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ADD CONSTRAINT \w+\s+UNIQUE\s+\(").expect("unique count pattern"));

static CHECK_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CONSTRAINT \w+\s+CHECK\s+\(").expect("check count pattern"));

static COLUMN_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+)\s+([\w\s\(\),\[\]]+?)(?:\s+(?:NOT\s+NULL|DEFAULT|CONSTRAINT)|$)")
        .expect("column type pattern")
});

/// Counts taken directly from the dump text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedCounts {
    pub tables: usize,
    /// Column lines per table, in source order
    pub columns: IndexMap<String, usize>,
    pub indexes: usize,
    pub foreign_keys: usize,
    pub unique_constraints: usize,
    /// Raw check clauses, enum-shaped ones included
    pub check_constraints: usize,
}

/// Compares an extracted [`SchemaModel`] against the dump it came from
pub struct SchemaVerifier {
    expected: ExpectedCounts,
    column_types: BTreeSet<String>,
}

impl SchemaVerifier {
    /// Count every construct class in the dump text
    pub fn new(sql: &str, config: &ExtractionConfig) -> Result<Self> {
        let schema = regex::escape(&config.schema);
        let table_names = Regex::new(&format!(r"CREATE TABLE {}\.(\w+)", schema))?;
        let table_blocks = Regex::new(&format!(r"(?s)CREATE TABLE {}\.(\w+) \((.*?)\);", schema))?;
        let indexes = Regex::new(&format!(
            r"CREATE\s+(?:UNIQUE\s+)?INDEX\s+\w+\s+ON\s+{}\.",
            schema
        ))?;

        let tables = table_names
            .captures_iter(sql)
            .filter(|caps| !config.is_excluded(&caps[1]))
            .count();

        let mut columns = IndexMap::new();
        let mut column_types = BTreeSet::new();
        for caps in table_blocks.captures_iter(sql) {
            let table_name = &caps[1];
            if config.is_excluded(table_name) {
                continue;
            }

            let column_lines: Vec<&str> = caps[2]
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with("CONSTRAINT"))
                .collect();

            columns.insert(table_name.to_string(), column_lines.len());
            column_types.extend(
                column_lines
                    .iter()
                    .filter_map(|line| declared_base_type(line.trim_end_matches(','))),
            );
        }

        let expected = ExpectedCounts {
            tables,
            columns,
            indexes: indexes.find_iter(sql).count(),
            foreign_keys: FOREIGN_KEY_COUNT.find_iter(sql).count(),
            unique_constraints: UNIQUE_COUNT.find_iter(sql).count(),
            check_constraints: CHECK_COUNT.find_iter(sql).count(),
        };

        tracing::debug!(?expected, "Counted constructs in dump text");

        Ok(Self {
            expected,
            column_types,
        })
    }

    pub fn expected(&self) -> &ExpectedCounts {
        &self.expected
    }

    /// Compare the model against the text counts
    pub fn verify(&self, model: &SchemaModel) -> VerificationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let expected = &self.expected;

        let actual_tables = model.tables.len();
        if actual_tables != expected.tables {
            errors.push(format!(
                "Table count mismatch: expected {}, got {}",
                expected.tables, actual_tables
            ));
        }

        for table in &model.tables {
            let expected_columns = expected.columns.get(&table.name).copied().unwrap_or(0);
            if table.columns.len() != expected_columns {
                errors.push(format!(
                    "Table '{}': expected {} columns, got {}",
                    table.name,
                    expected_columns,
                    table.columns.len()
                ));
            }
        }

        let actual_columns = model.column_count();
        let expected_columns: usize = expected.columns.values().sum();
        if actual_columns != expected_columns {
            errors.push(format!(
                "Total columns: expected {}, got {}",
                expected_columns, actual_columns
            ));
        }

        let actual_indexes = model.indexes.len();
        if actual_indexes != expected.indexes {
            errors.push(format!(
                "Index count mismatch: expected {}, got {}",
                expected.indexes, actual_indexes
            ));
        }

        let actual_foreign_keys = model.foreign_keys.len();
        if actual_foreign_keys != expected.foreign_keys {
            errors.push(format!(
                "Foreign key count mismatch: expected {}, got {}",
                expected.foreign_keys, actual_foreign_keys
            ));
        }

        let actual_uniques = model.unique_constraints.len();
        if actual_uniques != expected.unique_constraints {
            errors.push(format!(
                "UNIQUE constraint count mismatch: expected {}, got {}",
                expected.unique_constraints, actual_uniques
            ));
        }

        // Enum columns absorbed their check clause, so they count towards checks
        let actual_checks = model.check_constraint_count();
        let actual_enums = model.enum_column_count();
        if actual_checks + actual_enums != expected.check_constraints {
            errors.push(format!(
                "CHECK/ENUM count mismatch: expected {}, got {} CHECKs + {} ENUMs = {}",
                expected.check_constraints,
                actual_checks,
                actual_enums,
                actual_checks + actual_enums
            ));
        }

        let without_pk: Vec<&str> = model
            .tables
            .iter()
            .filter(|t| !t.has_primary_key())
            .map(|t| t.name.as_str())
            .collect();
        if !without_pk.is_empty() {
            warnings.push(format!("Tables without primary key: {}", without_pk.join(", ")));
        }

        for table in &model.tables {
            if table.columns.iter().any(|c| c.name == "id" && c.nullable) {
                warnings.push(format!("Table '{}': 'id' column is nullable (unusual)", table.name));
            }
        }

        let unmapped: Vec<&str> = self
            .column_types
            .iter()
            .map(String::as_str)
            .filter(|base| !is_mapped_base_type(base))
            .collect();
        if !unmapped.is_empty() {
            warnings.push(format!(
                "Potentially unmapped PostgreSQL types: {}",
                unmapped.join(", ")
            ));
        }

        for dangling in model.dangling_references() {
            warnings.push(format!("Dangling reference: {}", dangling));
        }

        let mut statistics = IndexMap::new();
        statistics.insert("tables".to_string(), actual_tables);
        statistics.insert("columns".to_string(), actual_columns);
        statistics.insert("indexes".to_string(), actual_indexes);
        statistics.insert("unique_constraints".to_string(), actual_uniques);
        statistics.insert("enum_columns".to_string(), actual_enums);
        statistics.insert("check_constraints".to_string(), actual_checks);
        statistics.insert("foreign_keys".to_string(), actual_foreign_keys);

        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), "Verification found count mismatches");
        }

        VerificationResult::new(errors, warnings, statistics)
    }
}

/// Base type of a column line, ignoring length parameters and array brackets
fn declared_base_type(line: &str) -> Option<String> {
    let caps = COLUMN_TYPE.captures(line)?;
    let declared = caps[2].trim();
    let base = declared
        .split('(')
        .next()
        .unwrap_or(declared)
        .trim()
        .trim_end_matches(|c: char| c == '[' || c == ']');

    Some(base.to_string())
}
