//! Table and column extraction
//!
//! Each `CREATE TABLE` block is parsed line by line in two passes: first the
//! check constraints (to learn which columns are enum-style), then the columns.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::generate::single_quoted;
use crate::schema::types::{Column, Table};

/// `CHECK ((col = ANY (ARRAY['a'::text, 'b'::text])))`
static ENUM_CHECK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^CONSTRAINT\s+\w+\s+CHECK\s+\(\((\w+)\s+=\s+ANY\s+\(ARRAY\[(.+?)\]\)\)\)")
        .expect("enum check pattern")
});

/// `CHECK (((col)::text = ANY ((ARRAY['a'::character varying])::text[])))`
static CAST_ENUM_CHECK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^CONSTRAINT\s+\w+\s+CHECK\s+\(\(\((\w+)\)::[\w ]+?\s+=\s+ANY\s+\(\(ARRAY\[(.+?)\]\)::[\w ]+\[\]\)\)\)",
    )
    .expect("cast enum check pattern")
});

/// A SQL string literal; `''` stands for an embedded quote
static QUOTED_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'((?:[^']|'')+)'").expect("quoted value pattern"));

static COLUMN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)\s+(.+)$").expect("column pattern"));

static COLUMN_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\w\s\(\),\[\]]+?)(?:\s+(NOT\s+NULL|DEFAULT|CONSTRAINT)|$)")
        .expect("column type pattern")
});

static DEFAULT_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"DEFAULT\s+(.+?)(?:\s+(?:NOT\s+NULL|CONSTRAINT)|$)").expect("default pattern")
});

static TYPE_CAST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"::\w+(?:\s+\w+)*(?:\[\])*").expect("cast pattern"));

/// Extracts table definitions from a schema dump
pub struct TableExtractor {
    pattern: Regex,
    config: ExtractionConfig,
}

impl TableExtractor {
    /// Create an extractor for tables under the configured schema
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?s)CREATE TABLE {}\.(\w+) \((.*?)\);",
            regex::escape(&config.schema)
        ))?;

        Ok(Self {
            pattern,
            config: config.clone(),
        })
    }

    /// Extract all tables in declaration order, skipping excluded ones
    pub fn extract(&self, sql: &str) -> Vec<Table> {
        self.pattern
            .captures_iter(sql)
            .filter(|caps| !self.config.is_excluded(&caps[1]))
            .map(|caps| parse_table(&caps[1], &caps[2]))
            .collect()
    }
}

/// Parse a single table body
fn parse_table(table_name: &str, body: &str) -> Table {
    let mut table = Table::new(table_name);

    let lines: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.trim_end_matches(','))
        .collect();

    let mut enum_columns: HashMap<String, Vec<String>> = HashMap::new();

    for line in &lines {
        if line.starts_with("CONSTRAINT") && line.contains("CHECK") {
            match parse_enum_check(line) {
                Some((column, values)) => {
                    enum_columns.insert(column, values);
                }
                None => table.check_constraints.push(line.to_string()),
            }
        }
    }

    for line in &lines {
        if line.starts_with("CONSTRAINT") {
            continue;
        }

        match parse_column(line) {
            Some(mut column) => {
                if let Some(values) = enum_columns.get(&column.name) {
                    column.enum_values = Some(values.clone());
                }
                table.add_column(column);
            }
            None => tracing::debug!(table = table_name, clause = *line, "Unrecognized column clause"),
        }
    }

    table
}

/// Recognize an allowed-values check and return the column with its literals
pub fn parse_enum_check(constraint: &str) -> Option<(String, Vec<String>)> {
    let caps = ENUM_CHECK
        .captures(constraint)
        .or_else(|| CAST_ENUM_CHECK.captures(constraint))?;

    let values: Vec<String> = QUOTED_VALUE
        .captures_iter(&caps[2])
        .map(|v| v[1].replace("''", "'"))
        .collect();

    if values.is_empty() {
        return None;
    }

    Some((caps[1].to_string(), values))
}

/// Parse `<name> <type> [modifiers]`
pub fn parse_column(definition: &str) -> Option<Column> {
    let caps = COLUMN.captures(definition)?;
    let name = &caps[1];
    let rest = caps.get(2)?.as_str();

    let type_caps = COLUMN_TYPE.captures(rest)?;
    let pg_type = type_caps[1].trim();
    let modifiers = rest[pg_type.len()..].trim();

    let nullable = !modifiers.contains("NOT NULL");
    let is_primary_key = name == "id" && (pg_type == "integer" || pg_type == "uuid") && !nullable;

    Some(Column {
        name: name.to_string(),
        pg_type: pg_type.to_string(),
        nullable,
        default: extract_default(modifiers),
        is_primary_key,
        enum_values: None,
        comment: None,
    })
}

/// Convert a `DEFAULT` expression into a target literal
pub fn extract_default(modifiers: &str) -> Option<String> {
    let caps = DEFAULT_VALUE.captures(modifiers)?;
    let without_casts = TYPE_CAST.replace_all(caps[1].trim(), "");
    let value = without_casts.trim_matches(|c: char| c == '\'' || c == '"');

    if is_bare_literal(value) {
        Some(value.to_string())
    } else {
        Some(single_quoted(&value.replace("''", "'")))
    }
}

/// Numbers and `true`/`false`/`null` are emitted unquoted
fn is_bare_literal(value: &str) -> bool {
    let digits: String = value.chars().filter(|c| *c != '.' && *c != '-').collect();
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    matches!(value.to_lowercase().as_str(), "true" | "false" | "null")
}
