//! Check constraints added after table creation
//!
//! pg_dump emits `NOT VALID` checks as separate `ALTER TABLE` statements instead
//! of inside the `CREATE TABLE` body. Trailing options such as `NOT VALID` or
//! `NO INHERIT` are dropped; the condition never extends past the statement's `;`.

use regex::Regex;

use crate::error::Result;

/// A check constraint declared through `ALTER TABLE ... ADD CONSTRAINT`
#[derive(Debug, Clone, PartialEq)]
pub struct AddedCheck {
    pub table: String,
    pub name: String,
    pub condition: String,
}

impl AddedCheck {
    /// The clause as it would appear inside a table body
    pub fn to_clause(&self) -> String {
        format!("CONSTRAINT {} CHECK ({})", self.name, self.condition)
    }
}

/// Extracts `ALTER TABLE [ONLY] ... ADD CONSTRAINT name CHECK (...)` statements
pub struct CheckConstraintExtractor {
    pattern: Regex,
}

impl CheckConstraintExtractor {
    pub fn new(schema: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"ALTER TABLE (?:ONLY )?{}\.(\w+)\s+ADD CONSTRAINT (\w+)\s+CHECK\s+\(([^;]*)\)[^;)]*;",
            regex::escape(schema)
        ))?;

        Ok(Self { pattern })
    }

    pub fn extract(&self, sql: &str) -> Vec<AddedCheck> {
        self.pattern
            .captures_iter(sql)
            .map(|caps| AddedCheck {
                table: caps[1].to_string(),
                name: caps[2].to_string(),
                condition: caps[3].to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_added_checks() {
        let sql = r#"
ALTER TABLE public.products
    ADD CONSTRAINT products_price_check CHECK ((price >= (0)::numeric)) NOT VALID;

ALTER TABLE ONLY public.products
    ADD CONSTRAINT products_stock_check CHECK ((stock >= 0));
"#;
        let checks = CheckConstraintExtractor::new("public").unwrap().extract(sql);

        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].table, "products");
        assert_eq!(checks[0].name, "products_price_check");
        assert_eq!(checks[0].condition, "(price >= (0)::numeric)");
        assert_eq!(
            checks[1].to_clause(),
            "CONSTRAINT products_stock_check CHECK ((stock >= 0))"
        );
    }

    #[test]
    fn test_condition_stops_at_statement_end() {
        let sql = r#"
ALTER TABLE public.t
    ADD CONSTRAINT t_x_check CHECK ((x > 0)) NO INHERIT;

CREATE INDEX t_x_index ON public.t USING btree (x);

ALTER TABLE public.t
    ADD CONSTRAINT t_y_check CHECK ((y > 0)) NOT VALID;
"#;
        let checks = CheckConstraintExtractor::new("public").unwrap().extract(sql);

        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].to_clause(), "CONSTRAINT t_x_check CHECK ((x > 0))");
        assert_eq!(checks[1].to_clause(), "CONSTRAINT t_y_check CHECK ((y > 0))");
    }
}
