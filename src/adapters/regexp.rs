// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regular expression converter.

use crate::domain::{ConfigError, Result, Value};
use crate::service::FieldOptions;
use regex_lite::Regex;

/// Compiles the string form of `value` as a regular expression.
pub fn convert(field: &FieldOptions<'_>, value: &Value) -> Result<Regex> {
    let conversion = |reason: String| ConfigError::Conversion {
        target: "regex",
        found: value.type_name(),
        reason,
        context: field.context(value),
    };
    let pattern = value.to_string_value().map_err(|e| conversion(e.to_string()))?;
    Regex::new(&pattern).map_err(|e| conversion(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Config, ErrorKind};
    use crate::service::Options;

    #[test]
    fn test_compile() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let re = convert(&field, &Value::string(r"^\d{3}$")).unwrap();
        assert!(re.is_match("123"));
        assert!(!re.is_match("12"));
    }

    #[test]
    fn test_scalar_is_rendered() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let re = convert(&field, &Value::int(42)).unwrap();
        assert!(re.is_match("x42x"));
    }

    #[test]
    fn test_invalid_pattern() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts).child("pattern");
        let err = convert(&field, &Value::string("[a-")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConversionFailed);
        assert_eq!(err.context().map(|c| c.path.as_str()), Some("pattern"));
    }

    #[test]
    fn test_composite_is_conversion_error() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts).child("pattern");
        let err = convert(&field, &Value::array(vec!["a", "b"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConversionFailed);

        let err = convert(&field, &Value::object(Config::new())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConversionFailed);
        assert_eq!(err.context().map(|c| c.path.as_str()), Some("pattern"));
    }
}
