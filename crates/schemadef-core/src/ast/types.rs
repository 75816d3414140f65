//! Column data types.

use std::fmt;

use serde::Serialize;

/// A column data type as written in DDL.
///
/// The name is kept as written (lower-cased, multi-word names joined by a
/// single space) so that rendering reproduces the author's spelling. Equality
/// is alias-aware: `int` equals `integer`, `bool` equals `boolean`, and
/// integer display widths such as MySQL's `int(11)` are ignored.
#[derive(Debug, Clone, Serialize)]
pub struct DataType {
    /// Base type name, e.g. `varchar` or `double precision`.
    pub name: String,
    /// Rendered type parameters, e.g. `["10", "2"]` or `["'a'", "'b'"]`.
    pub params: Vec<String>,
    /// Trailing modifier such as `with time zone`.
    pub suffix: Option<String>,
    /// MySQL `UNSIGNED`.
    pub unsigned: bool,
    /// PostgreSQL array type (`text[]`).
    pub array: bool,
}

impl DataType {
    /// Creates a type without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            params: Vec::new(),
            suffix: None,
            unsigned: false,
            array: false,
        }
    }

    /// Adds type parameters.
    #[must_use]
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the canonical name used for comparisons.
    #[must_use]
    pub fn canonical_name(&self) -> &str {
        let with_zone = self.suffix.as_deref() == Some("with time zone");
        match self.name.as_str() {
            "int" | "integer" | "int4" => "integer",
            "bigint" | "int8" => "bigint",
            "smallint" | "int2" => "smallint",
            "bool" | "boolean" => "boolean",
            "varchar" | "character varying" => "varchar",
            "char" | "character" => "char",
            "double" | "double precision" | "float8" => "double precision",
            "real" | "float4" => "real",
            "decimal" | "numeric" | "dec" => "numeric",
            "varbit" | "bit varying" => "varbit",
            "timestamp" if with_zone => "timestamptz",
            "time" if with_zone => "timetz",
            other => other,
        }
    }

    /// Returns true for the integer family.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(
            self.canonical_name(),
            "integer" | "bigint" | "smallint" | "tinyint" | "mediumint"
        )
    }

    /// Parameters that change the meaning of the type.
    fn significant_params(&self) -> &[String] {
        if self.is_integer() {
            // display widths only
            &[]
        } else {
            &self.params
        }
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_name() == other.canonical_name()
            && self.significant_params() == other.significant_params()
            && self.unsigned == other.unsigned
            && self.array == other.array
    }
}

impl Eq for DataType {}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            write!(f, "({})", self.params.join(", "))?;
        }
        if let Some(suffix) = &self.suffix {
            write!(f, " {suffix}")?;
        }
        if self.unsigned {
            f.write_str(" unsigned")?;
        }
        if self.array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DataType::new("VARCHAR").with_params(["100"]).to_string(), "varchar(100)");
        assert_eq!(
            DataType::new("numeric").with_params(["10", "2"]).to_string(),
            "numeric(10, 2)"
        );
        let mut ts = DataType::new("timestamp").with_params(["3"]);
        ts.suffix = Some("with time zone".to_string());
        assert_eq!(ts.to_string(), "timestamp(3) with time zone");
    }

    #[test]
    fn test_aliases_are_equal() {
        assert_eq!(DataType::new("int"), DataType::new("integer"));
        assert_eq!(DataType::new("bool"), DataType::new("boolean"));
        assert_eq!(
            DataType::new("character varying").with_params(["20"]),
            DataType::new("varchar").with_params(["20"])
        );
        let mut tz = DataType::new("timestamp");
        tz.suffix = Some("with time zone".to_string());
        assert_eq!(tz, DataType::new("timestamptz"));
    }

    #[test]
    fn test_integer_display_width_ignored() {
        assert_eq!(DataType::new("int").with_params(["11"]), DataType::new("int"));
        assert_ne!(
            DataType::new("varchar").with_params(["10"]),
            DataType::new("varchar").with_params(["20"])
        );
    }

    #[test]
    fn test_unsigned_matters() {
        let mut unsigned = DataType::new("int");
        unsigned.unsigned = true;
        assert_ne!(unsigned, DataType::new("int"));
        assert_eq!(unsigned.to_string(), "int unsigned");
    }
}
