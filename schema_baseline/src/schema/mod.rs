//! Schema module for schema_baseline
//!
//! Plain value types describing what was recognized in a schema dump.

pub mod types;

// Re-export key types
pub use types::{
    Column, ColumnComments, DanglingReference, ForeignKey, Index, OnDelete, SchemaModel, Table,
    UniqueConstraint,
};
