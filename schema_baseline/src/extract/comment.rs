//! Column comment extraction

use regex::Regex;

use crate::error::Result;
use crate::schema::types::ColumnComments;

/// Extracts `COMMENT ON COLUMN schema.table.column IS '...';` statements
pub struct CommentExtractor {
    pattern: Regex,
}

impl CommentExtractor {
    pub fn new(schema: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?s)COMMENT ON COLUMN {}\.(\w+)\.(\w+) IS '(.+?)';",
            regex::escape(schema)
        ))?;

        Ok(Self { pattern })
    }

    /// Map `(table, column)` to the comment text; a later comment wins
    pub fn extract(&self, sql: &str) -> ColumnComments {
        let mut comments = ColumnComments::new();

        for caps in self.pattern.captures_iter(sql) {
            comments.insert(
                (caps[1].to_string(), caps[2].to_string()),
                caps[3].replace("''", "'"),
            );
        }

        comments
    }
}
