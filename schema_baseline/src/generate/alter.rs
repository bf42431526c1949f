//! Operations emitted inside `alterTable` callbacks

use crate::schema::types::{ForeignKey, Index, UniqueConstraint};

/// A reversible operation applied to an existing table
pub trait AlterOperation {
    /// Table the operation belongs to
    fn table_name(&self) -> &str;

    /// Builder call applying the operation, without the alterTable wrapper
    fn up(&self) -> String;

    /// Builder call reverting [`AlterOperation::up`]
    fn down(&self) -> String;

    /// Standalone `alterTable` statement applying the operation
    fn up_statement(&self) -> String {
        alter_table_block(self.table_name(), &[self.up()])
    }

    /// Standalone `alterTable` statement reverting the operation
    fn down_statement(&self) -> String {
        alter_table_block(self.table_name(), &[self.down()])
    }
}

impl AlterOperation for Index {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn up(&self) -> String {
        let method = if self.unique { "unique" } else { "index" };
        format!("table.{}([{}], \"{}\")", method, quote_list(&self.columns), self.name)
    }

    fn down(&self) -> String {
        format!("table.dropIndex([], \"{}\")", self.name)
    }
}

impl AlterOperation for UniqueConstraint {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn up(&self) -> String {
        format!("table.unique([{}], \"{}\")", quote_list(&self.columns), self.name)
    }

    fn down(&self) -> String {
        format!("table.dropUnique([], \"{}\")", self.name)
    }
}

impl AlterOperation for ForeignKey {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn up(&self) -> String {
        let mut code = format!(
            "table.foreign(\"{}\").references(\"{}\").inTable(\"{}\")",
            self.column, self.ref_column, self.ref_table
        );
        if let Some(action) = self.on_delete {
            code.push_str(&format!(".onDelete(\"{}\")", action));
        }
        code
    }

    fn down(&self) -> String {
        format!("table.dropForeign([\"{}\"])", self.column)
    }
}

/// Wrap builder calls in a single `this.schema.alterTable(...)` callback
pub fn alter_table_block(table_name: &str, operations: &[String]) -> String {
    let mut lines = vec![format!("this.schema.alterTable(\"{}\", (table) => {{", table_name)];
    lines.extend(operations.iter().map(|op| format!("  {}", op)));
    lines.push("})".to_string());
    lines.join("\n")
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::OnDelete;
    use pretty_assertions::assert_eq;

    fn index(unique: bool) -> Index {
        Index {
            name: "users_org_email_idx".to_string(),
            table: "users".to_string(),
            columns: vec!["org_id".to_string(), "email".to_string()],
            unique,
        }
    }

    #[test]
    fn test_index_operations() {
        assert_eq!(
            index(false).up(),
            "table.index([\"org_id\", \"email\"], \"users_org_email_idx\")"
        );
        assert_eq!(
            index(true).up(),
            "table.unique([\"org_id\", \"email\"], \"users_org_email_idx\")"
        );
        assert_eq!(index(true).down(), "table.dropIndex([], \"users_org_email_idx\")");
    }

    #[test]
    fn test_unique_constraint_operations() {
        let unique = UniqueConstraint {
            name: "users_email_unique".to_string(),
            table: "users".to_string(),
            columns: vec!["email".to_string()],
        };
        assert_eq!(unique.up(), "table.unique([\"email\"], \"users_email_unique\")");
        assert_eq!(unique.down(), "table.dropUnique([], \"users_email_unique\")");
    }

    #[test]
    fn test_foreign_key_operations() {
        let mut fk = ForeignKey {
            table: "orders".to_string(),
            column: "user_id".to_string(),
            ref_table: "users".to_string(),
            ref_column: "id".to_string(),
            on_delete: Some(OnDelete::SetNull),
        };
        assert_eq!(
            fk.up(),
            "table.foreign(\"user_id\").references(\"id\").inTable(\"users\").onDelete(\"SET NULL\")"
        );
        assert_eq!(fk.down(), "table.dropForeign([\"user_id\"])");

        fk.on_delete = None;
        assert_eq!(fk.up(), "table.foreign(\"user_id\").references(\"id\").inTable(\"users\")");
    }

    #[test]
    fn test_standalone_statements() {
        assert_eq!(
            index(false).up_statement(),
            "this.schema.alterTable(\"users\", (table) => {\n  table.index([\"org_id\", \"email\"], \"users_org_email_idx\")\n})"
        );
        assert_eq!(
            index(false).down_statement(),
            "this.schema.alterTable(\"users\", (table) => {\n  table.dropIndex([], \"users_org_email_idx\")\n})"
        );
    }
}
