//! Configuration handling for schema_baseline

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Load configuration from a TOML or YAML file, chosen by extension
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&config_str)?,
        _ => toml::from_str(&config_str)?,
    };

    Ok(config)
}

/// Represents the complete schema_baseline configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub generator: GeneratorConfig,
    pub verification: VerificationConfig,
    pub logging: Option<LoggingConfig>,
}

/// Which part of the dump is recognized
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Schema qualifier every recognized statement must carry
    pub schema: String,
    /// Tables owned by the migration framework itself
    pub excluded_tables: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            excluded_tables: vec![
                "adonis_schema".to_string(),
                "adonis_schema_versions".to_string(),
            ],
        }
    }
}

impl ExtractionConfig {
    /// Whether a table belongs to the denylist
    pub fn is_excluded(&self, table_name: &str) -> bool {
        self.excluded_tables.iter().any(|t| t == table_name)
    }
}

/// How free-form check constraints are emitted
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckStyle {
    /// `table.check(...)` inside the createTable callback
    #[default]
    Inline,
    /// `this.schema.raw(ALTER TABLE ... ADD CONSTRAINT ...)` after the table
    Raw,
}

/// Shape of the generated migration file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub class_name: String,
    pub import_path: String,
    pub check_style: CheckStyle,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            class_name: "BaselineMigration".to_string(),
            import_path: "@adonisjs/lucid/schema".to_string(),
            check_style: CheckStyle::Inline,
        }
    }
}

/// Verification behavior
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct VerificationConfig {
    /// Refuse to write the migration when counts disagree
    pub fail_on_error: bool,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: String,
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: "text".to_string(),
            stdout: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.extraction.schema, "public");
        assert!(config.extraction.is_excluded("adonis_schema"));
        assert!(!config.extraction.is_excluded("users"));
        assert_eq!(config.generator.check_style, CheckStyle::Inline);
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [extraction]
            schema = "app"
            excluded_tables = []

            [generator]
            class_name = "InitialSchema"
            check_style = "raw"

            [verification]
            fail_on_error = true
            "#
        )
        .unwrap();

        let config = load_from_file(file.path()).unwrap();
        assert_eq!(config.extraction.schema, "app");
        assert!(config.extraction.excluded_tables.is_empty());
        assert_eq!(config.generator.class_name, "InitialSchema");
        assert_eq!(config.generator.import_path, "@adonisjs/lucid/schema");
        assert_eq!(config.generator.check_style, CheckStyle::Raw);
        assert!(config.verification.fail_on_error);
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "extraction:\n  schema: tenant\nlogging:\n  level: debug\n  format: json"
        )
        .unwrap();

        let config = load_from_file(file.path()).unwrap();
        assert_eq!(config.extraction.schema, "tenant");
        assert_eq!(config.extraction.excluded_tables.len(), 2);
        let logging = config.logging.unwrap();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, "json");
        assert!(!logging.stdout);
    }

    #[test]
    fn test_malformed_files_are_config_errors() {
        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml_file, "[generator\nclass_name = 1").unwrap();
        let err = load_from_file(toml_file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref msg) if msg.starts_with("Failed to parse config file")));

        let mut yaml_file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(yaml_file, "extraction: [unclosed").unwrap();
        let err = load_from_file(yaml_file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref msg) if msg.starts_with("Failed to parse config file")));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
