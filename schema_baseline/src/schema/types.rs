//! Type definitions for extracted schema objects

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything extracted from a single schema dump
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaModel {
    pub tables: Vec<Table>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub unique_constraints: Vec<UniqueConstraint>,
}

impl SchemaModel {
    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Total number of columns across all tables
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Number of retained free-form check constraints
    pub fn check_constraint_count(&self) -> usize {
        self.tables.iter().map(|t| t.check_constraints.len()).sum()
    }

    /// Number of columns rendered as enums
    pub fn enum_column_count(&self) -> usize {
        self.tables
            .iter()
            .flat_map(|t| t.columns.iter())
            .filter(|c| c.is_enum())
            .count()
    }

    /// Every reference to a table that was not extracted
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let known = |name: &str| self.tables.iter().any(|t| t.name == name);
        let mut dangling = Vec::new();

        for index in &self.indexes {
            if !known(&index.table) {
                dangling.push(DanglingReference {
                    kind: "index",
                    name: index.name.clone(),
                    table: index.table.clone(),
                });
            }
        }

        for unique in &self.unique_constraints {
            if !known(&unique.table) {
                dangling.push(DanglingReference {
                    kind: "unique constraint",
                    name: unique.name.clone(),
                    table: unique.table.clone(),
                });
            }
        }

        for fk in &self.foreign_keys {
            let name = format!("{}.{}", fk.table, fk.column);
            if !known(&fk.table) {
                dangling.push(DanglingReference {
                    kind: "foreign key",
                    name: name.clone(),
                    table: fk.table.clone(),
                });
            }
            if !known(&fk.ref_table) {
                dangling.push(DanglingReference {
                    kind: "foreign key target",
                    name,
                    table: fk.ref_table.clone(),
                });
            }
        }

        dangling
    }
}

/// A construct naming a table absent from the extracted set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub kind: &'static str,
    pub name: String,
    pub table: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' references unknown table '{}'", self.kind, self.name, self.table)
    }
}

/// Represents a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    /// Raw `CONSTRAINT name CHECK (...)` clauses not absorbed into enum columns
    pub check_constraints: Vec<String>,
}

impl Table {
    /// Create a new table with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            check_constraints: Vec::new(),
        }
    }

    /// Add a column to the table
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Whether any column was detected as the primary key
    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.is_primary_key)
    }
}

/// Represents a table column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Type exactly as written in the dump, e.g. `numeric(16,8)` or `text[]`
    pub pg_type: String,
    pub nullable: bool,
    /// Default expression already converted to a target literal
    pub default: Option<String>,
    pub is_primary_key: bool,
    pub enum_values: Option<Vec<String>>,
    pub comment: Option<String>,
}

impl Column {
    /// Create a new nullable column with the given name and type
    pub fn new(name: &str, pg_type: &str) -> Self {
        Self {
            name: name.to_string(),
            pg_type: pg_type.to_string(),
            nullable: true,
            default: None,
            is_primary_key: false,
            enum_values: None,
            comment: None,
        }
    }

    /// Set whether the column is nullable
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set a default value for the column
    pub fn default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Mark the column as the table's primary key
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Restrict the column to a fixed set of values
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a comment
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Whether the column renders as an enumerated type
    pub fn is_enum(&self) -> bool {
        self.enum_values.as_ref().map_or(false, |v| !v.is_empty())
    }
}

/// Represents an index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Referential action applied when the referenced row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnDelete {
    Cascade,
    SetNull,
    Restrict,
    NoAction,
}

impl OnDelete {
    /// Parse the keyword sequence used by PostgreSQL
    pub fn from_sql(action: &str) -> Option<Self> {
        match action {
            "CASCADE" => Some(OnDelete::Cascade),
            "SET NULL" => Some(OnDelete::SetNull),
            "RESTRICT" => Some(OnDelete::Restrict),
            "NO ACTION" => Some(OnDelete::NoAction),
            _ => None,
        }
    }

    /// The keyword sequence as written in SQL
    pub fn as_sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
            OnDelete::Restrict => "RESTRICT",
            OnDelete::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Represents a foreign key constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
    pub on_delete: Option<OnDelete>,
}

/// Represents a UNIQUE constraint declared through ALTER TABLE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
}

/// Column comments keyed by `(table, column)`, in declaration order
pub type ColumnComments = IndexMap<(String, String), String>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> SchemaModel {
        let mut users = Table::new("users");
        users.add_column(Column::new("id", "integer").nullable(false).primary_key());
        users.add_column(Column::new("role", "text").enum_values(["admin", "member"]));
        users
            .check_constraints
            .push("CONSTRAINT users_age_check CHECK ((age > 0))".to_string());

        let mut logs = Table::new("logs");
        logs.add_column(Column::new("message", "text"));

        SchemaModel {
            tables: vec![users, logs],
            indexes: vec![Index {
                name: "ghosts_idx".to_string(),
                table: "ghosts".to_string(),
                columns: vec!["id".to_string()],
                unique: false,
            }],
            foreign_keys: vec![ForeignKey {
                table: "logs".to_string(),
                column: "user_id".to_string(),
                ref_table: "accounts".to_string(),
                ref_column: "id".to_string(),
                on_delete: None,
            }],
            unique_constraints: Vec::new(),
        }
    }

    #[test]
    fn test_counts() {
        let model = sample_model();
        assert_eq!(model.column_count(), 3);
        assert_eq!(model.check_constraint_count(), 1);
        assert_eq!(model.enum_column_count(), 1);
        assert!(model.table("users").unwrap().has_primary_key());
        assert!(!model.table("logs").unwrap().has_primary_key());
        assert!(model.table("missing").is_none());
    }

    #[test]
    fn test_empty_enum_is_not_enum() {
        let column = Column::new("kind", "text").enum_values(Vec::<String>::new());
        assert!(!column.is_enum());
    }

    #[test]
    fn test_dangling_references() {
        let dangling = sample_model().dangling_references();
        let rendered: Vec<String> = dangling.iter().map(ToString::to_string).collect();

        assert_eq!(
            rendered,
            vec![
                "index 'ghosts_idx' references unknown table 'ghosts'".to_string(),
                "foreign key target 'logs.user_id' references unknown table 'accounts'".to_string(),
            ]
        );
    }

    #[test]
    fn test_on_delete_keywords() {
        for action in ["CASCADE", "SET NULL", "RESTRICT", "NO ACTION"] {
            assert_eq!(OnDelete::from_sql(action).unwrap().as_sql(), action);
        }
        assert_eq!(OnDelete::from_sql("SET DEFAULT"), None);
    }
}
