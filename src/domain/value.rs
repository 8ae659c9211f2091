// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration values with provenance and variant-aware coercion.
//!
//! A [`Value`] is one node of an untyped configuration tree: a scalar, an array
//! of values or an object ([`Config`]). Values are produced by a parser and are
//! never modified by the reification engine.

use crate::domain::config::Config;
use crate::domain::errors::{ConfigError, ErrorContext, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Source location of a configuration value.
///
/// Provenance is only used to render error messages.
///
/// # Examples
///
/// ```
/// use reifycfg::domain::Meta;
///
/// let meta = Meta::new("config.yaml").at_line(4);
/// assert_eq!(meta.to_string(), "source:'config.yaml', line 4");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Meta {
    /// Name of the source, usually a file path.
    pub source: String,
    /// 1-based line number, if known.
    pub line: Option<u32>,
    /// 1-based column number, if known.
    pub column: Option<u32>,
}

impl Meta {
    /// Creates provenance for the named source without a position.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line: None,
            column: None,
        }
    }

    /// Sets the line number.
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Sets the column number.
    pub fn at_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source:'{}'", self.source)?;
        if let Some(line) = self.line {
            write!(f, ", line {}", line)?;
        }
        if let Some(column) = self.column {
            write!(f, ", column {}", column)?;
        }
        Ok(())
    }
}

/// The variant of a [`Value`].
#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    /// An explicitly empty value.
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A nested object.
    Object(Arc<Config>),
}

/// A node of the configuration tree.
///
/// Equality compares data only; provenance is ignored.
///
/// # Examples
///
/// ```
/// use reifycfg::domain::Value;
///
/// let value = Value::string("42");
/// assert_eq!(value.to_int().unwrap(), 42);
/// assert_eq!(Value::int(7).to_string_value().unwrap(), "7");
/// ```
#[derive(Clone, Debug)]
pub struct Value {
    kind: ValueKind,
    meta: Option<Arc<Meta>>,
}

impl Value {
    /// Creates a value from its variant.
    pub fn new(kind: ValueKind) -> Self {
        Self { kind, meta: None }
    }

    /// Creates a nil value.
    pub fn nil() -> Self {
        Self::new(ValueKind::Nil)
    }

    /// Creates a boolean value.
    pub fn bool(b: bool) -> Self {
        Self::new(ValueKind::Bool(b))
    }

    /// Creates a signed integer value.
    pub fn int(i: i64) -> Self {
        Self::new(ValueKind::Int(i))
    }

    /// Creates an unsigned integer value.
    pub fn uint(u: u64) -> Self {
        Self::new(ValueKind::Uint(u))
    }

    /// Creates a floating point value.
    pub fn float(f: f64) -> Self {
        Self::new(ValueKind::Float(f))
    }

    /// Creates a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::new(ValueKind::String(s.into()))
    }

    /// Creates an array value.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::new(ValueKind::Array(items.into_iter().map(Into::into).collect()))
    }

    /// Creates an object value.
    pub fn object(config: impl Into<Arc<Config>>) -> Self {
        Self::new(ValueKind::Object(config.into()))
    }

    /// Attaches provenance to this value.
    pub fn with_meta(mut self, meta: impl Into<Arc<Meta>>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Returns the variant of this value.
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ValueKind {
        &mut self.kind
    }

    /// Returns the provenance of this value.
    pub fn meta(&self) -> Option<&Arc<Meta>> {
        self.meta.as_ref()
    }

    /// Returns a short name for the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Nil => "nil",
            ValueKind::Bool(_) => "bool",
            ValueKind::Int(_) => "int",
            ValueKind::Uint(_) => "uint",
            ValueKind::Float(_) => "float",
            ValueKind::String(_) => "string",
            ValueKind::Array(_) => "array",
            ValueKind::Object(_) => "object",
        }
    }

    /// Returns `true` if this is the nil value.
    pub fn is_nil(&self) -> bool {
        matches!(self.kind, ValueKind::Nil)
    }

    /// Number of elements this value contributes to a sequence.
    ///
    /// Nil is empty, arrays and objects report their size, scalars count as one.
    pub fn len(&self) -> usize {
        match &self.kind {
            ValueKind::Nil => 0,
            ValueKind::Array(items) => items.len(),
            ValueKind::Object(config) => config.len(),
            _ => 1,
        }
    }

    /// Returns `true` if [`Value::len`] is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the nested object, failing unless this value is an object.
    pub fn to_config(&self) -> Result<&Arc<Config>> {
        match &self.kind {
            ValueKind::Object(config) => Ok(config),
            _ => Err(ConfigError::ExpectedObject {
                found: self.type_name(),
                context: ErrorContext::new("", self.meta.clone()),
            }),
        }
    }

    /// Renders a scalar value as a string.
    pub fn to_string_value(&self) -> Result<String> {
        match &self.kind {
            ValueKind::Nil => Ok("null".to_string()),
            ValueKind::Bool(b) => Ok(b.to_string()),
            ValueKind::Int(i) => Ok(i.to_string()),
            ValueKind::Uint(u) => Ok(u.to_string()),
            ValueKind::Float(f) => Ok(f.to_string()),
            ValueKind::String(s) => Ok(s.clone()),
            _ => Err(self.mismatch("string")),
        }
    }

    /// Reads the value as a signed 64-bit integer.
    ///
    /// Strings are parsed as decimal, or as hexadecimal, octal or binary with a
    /// `0x`, `0o` or `0b` prefix. Floats must be whole numbers.
    pub fn to_int(&self) -> Result<i64> {
        match &self.kind {
            ValueKind::Int(i) => Ok(*i),
            ValueKind::Uint(u) => i64::try_from(*u).map_err(|_| self.overflow("i64")),
            ValueKind::Float(f) => {
                if f.fract() != 0.0 || f.is_nan() {
                    Err(self.mismatch("int"))
                } else if *f < i64::MIN as f64 || *f >= i64::MAX as f64 {
                    Err(self.overflow("i64"))
                } else {
                    Ok(*f as i64)
                }
            }
            ValueKind::String(s) => parse_i64(s).ok_or_else(|| self.mismatch("int")),
            _ => Err(self.mismatch("int")),
        }
    }

    /// Reads the value as an unsigned 64-bit integer.
    pub fn to_uint(&self) -> Result<u64> {
        match &self.kind {
            ValueKind::Uint(u) => Ok(*u),
            ValueKind::Int(i) => u64::try_from(*i).map_err(|_| self.overflow("u64")),
            ValueKind::Float(f) => {
                if f.fract() != 0.0 || f.is_nan() {
                    Err(self.mismatch("uint"))
                } else if *f < 0.0 || *f >= u64::MAX as f64 {
                    Err(self.overflow("u64"))
                } else {
                    Ok(*f as u64)
                }
            }
            ValueKind::String(s) => parse_u64(s).ok_or_else(|| self.mismatch("uint")),
            _ => Err(self.mismatch("uint")),
        }
    }

    /// Reads the value as a 64-bit float.
    pub fn to_float(&self) -> Result<f64> {
        match &self.kind {
            ValueKind::Float(f) => Ok(*f),
            ValueKind::Int(i) => Ok(*i as f64),
            ValueKind::Uint(u) => Ok(*u as f64),
            ValueKind::String(s) => s.trim().parse::<f64>().map_err(|_| self.mismatch("float")),
            _ => Err(self.mismatch("float")),
        }
    }

    /// Reads the value as a boolean.
    ///
    /// Recognizes the following strings (case-insensitive):
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    pub fn to_bool(&self) -> Result<bool> {
        match &self.kind {
            ValueKind::Bool(b) => Ok(*b),
            ValueKind::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(true),
                "false" | "no" | "0" | "off" => Ok(false),
                _ => Err(self.mismatch("bool")),
            },
            _ => Err(self.mismatch("bool")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ConfigError {
        ConfigError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    fn overflow(&self, type_name: &'static str) -> ConfigError {
        ConfigError::Overflow {
            type_name,
            value: self.to_string(),
            context: ErrorContext::new("", self.meta.clone()),
        }
    }
}

/// Splits an optional radix prefix off an unsigned literal.
fn parse_radix(s: &str) -> Option<u64> {
    let (radix, digits) = if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (16, rest)
    } else if let Some(rest) = s.strip_prefix("0o").or_else(|| s.strip_prefix("0O")) {
        (8, rest)
    } else if let Some(rest) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (2, rest)
    } else {
        (10, s)
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

fn parse_i64(s: &str) -> Option<i64> {
    let s = s.trim();
    match s.strip_prefix('-') {
        Some(rest) => {
            let magnitude = parse_radix(rest)?;
            if magnitude == i64::MIN.unsigned_abs() {
                Some(i64::MIN)
            } else {
                i64::try_from(magnitude).ok().map(|v| -v)
            }
        }
        None => i64::try_from(parse_radix(s.strip_prefix('+').unwrap_or(s))?).ok(),
    }
}

fn parse_u64(s: &str) -> Option<u64> {
    let s = s.trim();
    parse_radix(s.strip_prefix('+').unwrap_or(s))
}

impl Default for Value {
    fn default() -> Self {
        Self::nil()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Nil => write!(f, "null"),
            ValueKind::Bool(b) => write!(f, "{}", b),
            ValueKind::Int(i) => write!(f, "{}", i),
            ValueKind::Uint(u) => write!(f, "{}", u),
            ValueKind::Float(x) => write!(f, "{}", x),
            ValueKind::String(s) => write!(f, "{:?}", s),
            ValueKind::Array(items) => write!(f, "<array of {}>", items.len()),
            ValueKind::Object(config) => write!(f, "<object with {} fields>", config.len()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.kind {
            ValueKind::Nil => serializer.serialize_unit(),
            ValueKind::Bool(b) => serializer.serialize_bool(*b),
            ValueKind::Int(i) => serializer.serialize_i64(*i),
            ValueKind::Uint(u) => serializer.serialize_u64(*u),
            ValueKind::Float(f) => serializer.serialize_f64(*f),
            ValueKind::String(s) => serializer.serialize_str(s),
            ValueKind::Array(items) => serializer.collect_seq(items),
            ValueKind::Object(config) => config.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::uint(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::new(ValueKind::Array(items))
    }
}

impl From<Config> for Value {
    fn from(config: Config) -> Self {
        Value::object(config)
    }
}

impl From<Arc<Config>> for Value {
    fn from(config: Arc<Config>) -> Self {
        Value::object(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::nil().type_name(), "nil");
        assert_eq!(Value::bool(true).type_name(), "bool");
        assert_eq!(Value::int(1).type_name(), "int");
        assert_eq!(Value::uint(1).type_name(), "uint");
        assert_eq!(Value::float(1.0).type_name(), "float");
        assert_eq!(Value::string("x").type_name(), "string");
        assert_eq!(Value::array(vec![1i64]).type_name(), "array");
        assert_eq!(Value::object(Config::new()).type_name(), "object");
    }

    #[test]
    fn test_to_config_requires_object() {
        let err = Value::int(3).to_config().unwrap_err();
        assert!(matches!(err, ConfigError::ExpectedObject { found: "int", .. }));

        let cfg = Config::new().with("a", 1i64);
        let value = Value::object(cfg);
        assert_eq!(value.to_config().unwrap().len(), 1);
    }

    #[test]
    fn test_to_string_value() {
        assert_eq!(Value::int(-12).to_string_value().unwrap(), "-12");
        assert_eq!(Value::uint(12).to_string_value().unwrap(), "12");
        assert_eq!(Value::float(1.5).to_string_value().unwrap(), "1.5");
        assert_eq!(Value::bool(false).to_string_value().unwrap(), "false");
        assert_eq!(Value::nil().to_string_value().unwrap(), "null");
        assert!(Value::array(Vec::<Value>::new()).to_string_value().is_err());
    }

    #[test]
    fn test_to_int() {
        assert_eq!(Value::string("42").to_int().unwrap(), 42);
        assert_eq!(Value::string("-42").to_int().unwrap(), -42);
        assert_eq!(Value::string("0x1f").to_int().unwrap(), 31);
        assert_eq!(Value::string("0b101").to_int().unwrap(), 5);
        assert_eq!(Value::string("-9223372036854775808").to_int().unwrap(), i64::MIN);
        assert_eq!(Value::float(3.0).to_int().unwrap(), 3);
        assert_eq!(Value::uint(7).to_int().unwrap(), 7);
    }

    #[test]
    fn test_to_int_invalid() {
        assert!(matches!(
            Value::string("abc").to_int().unwrap_err(),
            ConfigError::TypeMismatch { expected: "int", .. }
        ));
        assert!(matches!(
            Value::float(3.5).to_int().unwrap_err(),
            ConfigError::TypeMismatch { .. }
        ));
        assert!(matches!(
            Value::uint(u64::MAX).to_int().unwrap_err(),
            ConfigError::Overflow { .. }
        ));
        assert!(Value::bool(true).to_int().is_err());
        assert!(Value::string("--1").to_int().is_err());
    }

    #[test]
    fn test_to_uint() {
        assert_eq!(Value::int(5).to_uint().unwrap(), 5);
        assert_eq!(Value::string("18446744073709551615").to_uint().unwrap(), u64::MAX);
        assert!(matches!(
            Value::int(-1).to_uint().unwrap_err(),
            ConfigError::Overflow { .. }
        ));
        assert!(Value::string("-1").to_uint().is_err());
    }

    #[test]
    fn test_to_float() {
        assert_eq!(Value::int(2).to_float().unwrap(), 2.0);
        assert_eq!(Value::string("2.5").to_float().unwrap(), 2.5);
        assert!(Value::bool(true).to_float().is_err());
    }

    #[test]
    fn test_to_bool_variants() {
        for s in ["true", "True", "YES", "1", "on"] {
            assert!(Value::string(s).to_bool().unwrap(), "Failed for value: {}", s);
        }
        for s in ["false", "No", "0", "OFF"] {
            assert!(!Value::string(s).to_bool().unwrap(), "Failed for value: {}", s);
        }
        assert!(Value::string("maybe").to_bool().is_err());
        assert!(Value::int(1).to_bool().is_err());
    }

    #[test]
    fn test_len_for_sequence_promotion() {
        assert_eq!(Value::nil().len(), 0);
        assert_eq!(Value::string("x").len(), 1);
        assert_eq!(Value::array(vec![1i64, 2, 3]).len(), 3);
        assert!(Value::object(Config::new()).is_empty());
    }

    #[test]
    fn test_equality_ignores_meta() {
        let a = Value::int(1).with_meta(Meta::new("a.yaml"));
        let b = Value::int(1).with_meta(Meta::new("b.yaml"));
        assert_eq!(a, b);
        assert_ne!(a, Value::uint(1));
    }

    #[test]
    fn test_meta_display() {
        let meta = Meta::new("x.yaml").at_line(3).at_column(9);
        assert_eq!(meta.to_string(), "source:'x.yaml', line 3, column 9");
    }
}
