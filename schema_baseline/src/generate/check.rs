//! Check constraint rendering
//!
//! Check constraints that were not turned into enum columns are carried as raw
//! SQL conditions, either inline via `table.check()` or as `this.schema.raw()`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::escape_string;

static CHECK_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^CONSTRAINT\s+(\w+)\s+CHECK\s+\((.+)\)").expect("check clause pattern"));

/// Name and condition of a `CONSTRAINT name CHECK (condition)` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckClause {
    pub name: String,
    pub condition: String,
}

impl CheckClause {
    pub fn parse(clause: &str) -> Option<Self> {
        let caps = CHECK_CLAUSE.captures(clause)?;

        Some(Self {
            name: caps[1].to_string(),
            condition: caps[2].trim().to_string(),
        })
    }

    /// `table.check("<condition>", undefined, "<name>")`
    pub fn render_inline(&self) -> String {
        format!(
            "table.check(\"{}\", undefined, \"{}\")",
            escape_string(strip_enclosing_parens(&self.condition)),
            self.name
        )
    }

    pub fn render_raw(&self, table_name: &str) -> String {
        format!(
            "this.schema.raw(`ALTER TABLE \"{}\" ADD CONSTRAINT {} CHECK ({})`)",
            table_name,
            self.name,
            escape_template(&self.condition)
        )
    }

    pub fn render_raw_drop(&self, table_name: &str) -> String {
        format!(
            "this.schema.raw(`ALTER TABLE \"{}\" DROP CONSTRAINT IF EXISTS {}`)",
            table_name, self.name
        )
    }
}

/// Escape text for a backtick template literal
fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Remove one pair of parentheses when it encloses the whole condition
pub fn strip_enclosing_parens(condition: &str) -> &str {
    let inner = match condition
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => inner,
        None => return condition,
    };

    // The opening paren must stay open until the very last character
    let mut depth = 0usize;
    let mut in_literal = false;
    for c in inner.chars() {
        match c {
            '\'' => in_literal = !in_literal,
            '(' if !in_literal => depth += 1,
            ')' if !in_literal => {
                if depth == 0 {
                    return condition;
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    inner
}
