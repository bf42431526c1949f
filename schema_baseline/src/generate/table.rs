//! createTable / dropTable generation

use crate::schema::types::{Column, Table};

use super::check::CheckClause;
use super::{escape_string, single_quoted};
use super::type_mapper::map_type;

/// Generate `this.schema.createTable(...)` for a table
///
/// Check constraints are rendered inside the callback only when `inline_checks`
/// is set; otherwise the caller emits them as raw statements.
pub fn create_table(table: &Table, inline_checks: bool) -> String {
    let mut lines = vec![format!("this.schema.createTable(\"{}\", (table) => {{", table.name)];

    for column in &table.columns {
        lines.push(format!("  {}", render_column(column)));
    }

    if inline_checks {
        for clause in &table.check_constraints {
            match CheckClause::parse(clause) {
                Some(check) => lines.push(format!("  {}", check.render_inline())),
                None => tracing::warn!(table = %table.name, clause = %clause, "Skipping unparseable check constraint"),
            }
        }
    }

    lines.push("})".to_string());
    lines.join("\n")
}

/// Generate the inverse of [`create_table`]
pub fn drop_table(table: &Table) -> String {
    format!("this.schema.dropTableIfExists(\"{}\")", table.name)
}

/// Render a single column builder chain
pub fn render_column(column: &Column) -> String {
    if column.is_primary_key {
        match column.pg_type.as_str() {
            "integer" => return format!("table.increments(\"{}\").primary()", column.name),
            "uuid" => {
                let mut code = format!("table.uuid(\"{}\").primary()", column.name);
                if let Some(default) = &column.default {
                    code.push_str(&format!(".defaultTo(this.raw({}))", default));
                }
                return code;
            }
            _ => {}
        }
    }

    let mut code = match &column.enum_values {
        Some(values) if !values.is_empty() => {
            let values: Vec<String> = values.iter().map(|v| single_quoted(v)).collect();
            format!("table.enum(\"{}\", [{}])", column.name, values.join(", "))
        }
        _ => map_type(&column.pg_type).render(&column.name),
    };

    if column.nullable {
        code.push_str(".nullable()");
    } else {
        code.push_str(".notNullable()");
    }

    if let Some(default) = &column.default {
        code.push_str(&format!(".defaultTo({})", default));
    }

    if let Some(comment) = &column.comment {
        code.push_str(&format!(".comment(\"{}\")", escape_string(comment)));
    }

    code
}
