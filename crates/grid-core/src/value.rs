//! Cell values and type-aware validation/casting

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free-form text
    String,
    /// Signed decimal number
    Number,
    /// Email-shaped text
    Email,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::String => write!(f, "string"),
            ColumnType::Number => write!(f, "number"),
            ColumnType::Email => write!(f, "email"),
        }
    }
}

impl std::str::FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(ColumnType::String),
            "number" => Ok(ColumnType::Number),
            "email" => Ok(ColumnType::Email),
            other => Err(format!("unknown column type '{other}'")),
        }
    }
}

/// A cell value with an explicit "unset" state
///
/// `Empty` is distinct from `Number(0.0)` and from `Text("")`: an unset
/// numeric cell stays `Empty` rather than being coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Empty/unset cell
    Empty,
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Check if the cell is unset
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Convert to a display string (empty cells render as "")
    pub fn to_string_value(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
        }
    }

    /// Numeric view of the value, if it has one
    ///
    /// Text that parses as a number counts, so sorting can compare
    /// "7" and 12 numerically.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Empty => None,
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

// Integral floats print without a trailing ".0" so a round-trip through
// text gives back what the user typed ("26", not "26.0").
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap())
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.+@.+\..+$").unwrap())
}

/// Check a raw textual value against a column type.
///
/// Callers skip validation entirely for empty drafts, so this function
/// only ever sees non-empty text. The email check is a deliberately
/// permissive presence check, not an RFC validator.
pub fn validate(ty: ColumnType, raw: &str) -> bool {
    match ty {
        ColumnType::String => true,
        ColumnType::Number => number_re().is_match(raw),
        ColumnType::Email => email_re().is_match(raw),
    }
}

/// Coerce raw text into a typed [`Value`].
///
/// Empty text maps to `Value::Empty` for every type. For number columns,
/// text that fails the float parse is kept verbatim as `Text` rather than
/// becoming a NaN; `validate` rejects such input upstream.
pub fn cast(ty: ColumnType, raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Empty;
    }
    match ty {
        ColumnType::Number => match raw.parse::<f64>() {
            Ok(n) if !n.is_nan() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        },
        ColumnType::String | ColumnType::Email => Value::Text(raw.to_string()),
    }
}
