//! Migration generation
//!
//! Turns a [`SchemaModel`] into the apply and revert statement lists of a
//! baseline migration class. Every revert statement is prepended as its
//! apply counterpart is appended, so `down` is always the exact reverse.

pub mod alter;
pub mod check;
pub mod table;
pub mod type_mapper;

pub use alter::{alter_table_block, AlterOperation};
pub use check::CheckClause;
pub use type_mapper::{map_type, MappedType};

use indexmap::IndexMap;
use std::collections::VecDeque;

use crate::config::{CheckStyle, GeneratorConfig};
use crate::schema::types::{SchemaModel, Table};
use crate::utils::naming::class_name;

/// Escape a value for a double-quoted target string literal
pub fn escape_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Wrap a value in a single-quoted target string literal
pub fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Apply and revert statements for one migration class
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMigration {
    pub class_name: String,
    pub import_path: String,
    pub up: Vec<String>,
    pub down: Vec<String>,
}

impl GeneratedMigration {
    /// Render the complete migration source file
    pub fn render(&self) -> String {
        format!(
            "import {{ BaseSchema }} from \"{}\"\n\nexport default class {} extends BaseSchema {{\n  async up() {{\n{}\n  }}\n\n  async down() {{\n{}\n  }}\n}}\n",
            self.import_path,
            self.class_name,
            indent_statements(&self.up),
            indent_statements(&self.down),
        )
    }
}

fn indent_statements(statements: &[String]) -> String {
    statements
        .join("\n\n")
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds a [`GeneratedMigration`] from an extracted model
pub struct MigrationGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> MigrationGenerator<'a> {
    /// Create a new migration generator
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate apply and revert statements for the whole model
    pub fn generate(&self, model: &SchemaModel) -> GeneratedMigration {
        let mut up = Vec::new();
        let mut down = VecDeque::new();

        for table in &model.tables {
            self.push_table(table, &mut up, &mut down);
        }

        for (table_name, operations) in group_by_table(model) {
            let up_ops: Vec<String> = operations.iter().map(|op| op.up()).collect();
            let down_ops: Vec<String> = operations.iter().rev().map(|op| op.down()).collect();

            up.push(alter_table_block(table_name, &up_ops));
            down.push_front(alter_table_block(table_name, &down_ops));
        }

        tracing::debug!(up = up.len(), down = down.len(), "Generated migration statements");

        GeneratedMigration {
            class_name: class_name(&self.config.class_name),
            import_path: self.config.import_path.clone(),
            up,
            down: down.into(),
        }
    }

    fn push_table(&self, table: &Table, up: &mut Vec<String>, down: &mut VecDeque<String>) {
        let inline_checks = self.config.check_style == CheckStyle::Inline;

        up.push(table::create_table(table, inline_checks));
        down.push_front(table::drop_table(table));

        if inline_checks {
            return;
        }

        for clause in &table.check_constraints {
            match CheckClause::parse(clause) {
                Some(check) => {
                    up.push(check.render_raw(&table.name));
                    down.push_front(check.render_raw_drop(&table.name));
                }
                None => {
                    tracing::warn!(table = %table.name, clause = %clause, "Skipping unparseable check constraint")
                }
            }
        }
    }
}

/// Alter operations grouped by owning table in order of first appearance
fn group_by_table(model: &SchemaModel) -> IndexMap<&str, Vec<&dyn AlterOperation>> {
    let operations = model
        .indexes
        .iter()
        .map(|index| index as &dyn AlterOperation)
        .chain(model.unique_constraints.iter().map(|u| u as &dyn AlterOperation))
        .chain(model.foreign_keys.iter().map(|fk| fk as &dyn AlterOperation));

    let mut groups: IndexMap<&str, Vec<&dyn AlterOperation>> = IndexMap::new();
    for operation in operations {
        groups.entry(operation.table_name()).or_default().push(operation);
    }
    groups
}
