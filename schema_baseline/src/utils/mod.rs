//! Utilities for schema_baseline
//!
//! Logging setup and naming helpers shared by the library and the binary.

pub mod logging;
pub mod naming;

pub use logging::init_logging;
pub use naming::{class_name, migration_file_name, script_digest};
