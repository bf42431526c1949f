//! Naming utilities for generated migrations

use chrono::{DateTime, Utc};
use inflector::Inflector;

/// Class name used when the configured one normalizes to nothing
pub const DEFAULT_CLASS_NAME: &str = "BaselineMigration";

/// Normalize a configured class name to PascalCase
pub fn class_name(name: &str) -> String {
    let pascal = name.to_pascal_case();
    if pascal.is_empty() {
        DEFAULT_CLASS_NAME.to_string()
    } else {
        pascal
    }
}

/// Timestamped migration file name, e.g. `1729339200000_baseline.ts`
pub fn migration_file_name(description: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.ts", at.timestamp_millis(), description.to_snake_case())
}

/// Hex md5 digest of a rendered script, used to compare runs
pub fn script_digest(script: &str) -> String {
    format!("{:x}", md5::compute(script.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("BaselineMigration"), "BaselineMigration");
        assert_eq!(class_name("initial_schema"), "InitialSchema");
        assert_eq!(class_name("initial schema"), "InitialSchema");
        assert_eq!(class_name(""), DEFAULT_CLASS_NAME);
    }

    #[test]
    fn test_migration_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(migration_file_name("baseline", at), "1729339200000_baseline.ts");
        assert_eq!(
            migration_file_name("Initial Schema", at),
            "1729339200000_initial_schema.ts"
        );
    }

    #[test]
    fn test_script_digest() {
        assert_eq!(script_digest(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(script_digest("a"), script_digest("a"));
        assert_ne!(script_digest("a"), script_digest("b"));
    }
}
