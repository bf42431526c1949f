//! Maps PostgreSQL column types to Knex column builder methods

use once_cell::sync::Lazy;
use regex::Regex;

static VARCHAR_WITH_LENGTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:character varying|varchar)\((\d+)\)").expect("varchar pattern")
});

static NUMERIC_WITH_SCALE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^numeric\((\d+),(\d+)\)").expect("numeric pattern"));

/// Base types with a direct builder method
const TYPE_TABLE: &[(&str, &str)] = &[
    ("integer", "integer"),
    ("bigint", "bigInteger"),
    ("smallint", "integer"),
    ("text", "text"),
    ("character varying", "string"),
    ("varchar", "string"),
    ("boolean", "boolean"),
    ("date", "date"),
    ("time", "time"),
    ("json", "json"),
    ("jsonb", "jsonb"),
    ("uuid", "uuid"),
    ("numeric", "decimal"),
    ("real", "float"),
    ("double precision", "double"),
];

const TIMESTAMP_TZ: &str = "timestamp with time zone";
const TIMESTAMP_TYPES: &[&str] = &["timestamp without time zone", "timestamp"];

/// Builder method used for unknown types
pub const FALLBACK_METHOD: &str = "text";

/// A builder method plus the extra argument text after the column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub method: &'static str,
    pub options: String,
}

impl MappedType {
    fn new(method: &'static str, options: impl Into<String>) -> Self {
        Self {
            method,
            options: options.into(),
        }
    }

    /// Render `table.<method>("<column>"[, options])`
    pub fn render(&self, column_name: &str) -> String {
        if self.options.is_empty() {
            format!("table.{}(\"{}\")", self.method, column_name)
        } else {
            format!("table.{}(\"{}\", {})", self.method, column_name, self.options)
        }
    }
}

/// Map a PostgreSQL type to a builder method; first matching rule wins
pub fn map_type(pg_type: &str) -> MappedType {
    // No native array builder: fall back to specificType
    if let Some(base) = pg_type.strip_suffix("[]") {
        return MappedType::new("specificType", format!("`{} ARRAY`", base.trim().to_uppercase()));
    }

    if let Some(caps) = VARCHAR_WITH_LENGTH.captures(pg_type) {
        return MappedType::new("string", &caps[1]);
    }

    if let Some(caps) = NUMERIC_WITH_SCALE.captures(pg_type) {
        return MappedType::new("decimal", format!("{}, {}", &caps[1], &caps[2]));
    }

    let base = base_type(pg_type);

    if base == TIMESTAMP_TZ {
        return MappedType::new("timestamp", "{ useTz: true }");
    }
    if TIMESTAMP_TYPES.contains(&base) {
        return MappedType::new("timestamp", "");
    }

    let method = TYPE_TABLE
        .iter()
        .find(|(pg, _)| *pg == base)
        .map_or(FALLBACK_METHOD, |(_, method)| *method);

    MappedType::new(method, "")
}

/// The type name before any parameter list
pub fn base_type(pg_type: &str) -> &str {
    pg_type.split('(').next().unwrap_or(pg_type).trim()
}

/// Whether a base type has a dedicated mapping rather than the text fallback
pub fn is_mapped_base_type(base: &str) -> bool {
    base == TIMESTAMP_TZ
        || TIMESTAMP_TYPES.contains(&base)
        || TYPE_TABLE.iter().any(|(pg, _)| *pg == base)
}
