//! Foreign key extraction

use regex::Regex;

use crate::error::Result;
use crate::schema::types::{ForeignKey, OnDelete};

/// Extracts `ALTER TABLE ONLY ... ADD CONSTRAINT ... FOREIGN KEY` statements
pub struct ForeignKeyExtractor {
    pattern: Regex,
}

impl ForeignKeyExtractor {
    pub fn new(schema: &str) -> Result<Self> {
        let schema = regex::escape(schema);
        // pg_dump prints ON UPDATE before ON DELETE; the update action is not modelled
        let pattern = Regex::new(&format!(
            r"(?s)ALTER TABLE ONLY {schema}\.(\w+)\s+ADD CONSTRAINT \w+\s+FOREIGN KEY\s+\((\w+)\)\s+REFERENCES\s+{schema}\.(\w+)\((\w+)\)(?:\s+ON UPDATE\s+(?:SET NULL|SET DEFAULT|CASCADE|RESTRICT|NO ACTION))?(?:\s+ON DELETE\s+(SET NULL|CASCADE|RESTRICT|NO ACTION))?",
        ))?;

        Ok(Self { pattern })
    }

    pub fn extract(&self, sql: &str) -> Vec<ForeignKey> {
        self.pattern
            .captures_iter(sql)
            .map(|caps| ForeignKey {
                table: caps[1].to_string(),
                column: caps[2].to_string(),
                ref_table: caps[3].to_string(),
                ref_column: caps[4].to_string(),
                on_delete: caps.get(5).and_then(|m| OnDelete::from_sql(m.as_str())),
            })
            .collect()
    }
}
