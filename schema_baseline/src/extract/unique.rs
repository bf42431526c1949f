//! UNIQUE constraint extraction

use regex::Regex;

use crate::error::Result;
use crate::schema::types::UniqueConstraint;

use super::split_column_list;

/// Extracts `ALTER TABLE [ONLY] ... ADD CONSTRAINT name UNIQUE (columns)` statements
pub struct UniqueConstraintExtractor {
    pattern: Regex,
}

impl UniqueConstraintExtractor {
    pub fn new(schema: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?s)ALTER TABLE (?:ONLY )?{}\.(\w+)\s+ADD CONSTRAINT (\w+)\s+UNIQUE\s+\((.*?)\)",
            regex::escape(schema)
        ))?;

        Ok(Self { pattern })
    }

    pub fn extract(&self, sql: &str) -> Vec<UniqueConstraint> {
        self.pattern
            .captures_iter(sql)
            .map(|caps| UniqueConstraint {
                name: caps[2].to_string(),
                table: caps[1].to_string(),
                columns: split_column_list(&caps[3]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_unique_constraints() {
        let sql = r#"
ALTER TABLE ONLY public.users
    ADD CONSTRAINT users_email_unique UNIQUE (email);

ALTER TABLE public.memberships
    ADD CONSTRAINT memberships_user_team_unique UNIQUE (user_id, team_id);

ALTER TABLE ONLY public.users
    ADD CONSTRAINT users_pkey PRIMARY KEY (id);
"#;
        let constraints = UniqueConstraintExtractor::new("public").unwrap().extract(sql);

        assert_eq!(
            constraints,
            vec![
                UniqueConstraint {
                    name: "users_email_unique".to_string(),
                    table: "users".to_string(),
                    columns: vec!["email".to_string()],
                },
                UniqueConstraint {
                    name: "memberships_user_team_unique".to_string(),
                    table: "memberships".to_string(),
                    columns: vec!["user_id".to_string(), "team_id".to_string()],
                },
            ]
        );
    }
}
