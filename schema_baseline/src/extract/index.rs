//! Index extraction

use regex::Regex;

use crate::error::Result;
use crate::schema::types::Index;

use super::split_column_list;

/// Extracts `CREATE [UNIQUE] INDEX ... USING method (columns)` statements
pub struct IndexExtractor {
    pattern: Regex,
}

impl IndexExtractor {
    pub fn new(schema: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?s)CREATE\s+(UNIQUE\s+)?INDEX\s+(\w+)\s+ON\s+{}\.(\w+)\s+USING\s+\w+\s+\((.*?)\)",
            regex::escape(schema)
        ))?;

        Ok(Self { pattern })
    }

    pub fn extract(&self, sql: &str) -> Vec<Index> {
        self.pattern
            .captures_iter(sql)
            .map(|caps| Index {
                name: caps[2].to_string(),
                table: caps[3].to_string(),
                columns: split_column_list(&caps[4]),
                unique: caps.get(1).is_some(),
            })
            .collect()
    }
}
