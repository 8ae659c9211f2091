// SPDX-License-Identifier: MIT OR Apache-2.0

//! Duration literals and the `Duration` converter.
//!
//! A literal is a sequence of decimal numbers, each with an optional fraction
//! and a unit suffix, such as `"300ms"`, `"1.5h"` or `"2h45m"`. Valid units
//! are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. The bare literal `"0"` is
//! also accepted. Negative durations cannot be represented.

use crate::domain::{ConfigError, Result, Value, ValueKind};
use crate::service::primitive::scalar_error;
use crate::service::FieldOptions;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parses a duration literal.
///
/// # Examples
///
/// ```
/// use reifycfg::adapters::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
/// assert!(parse_duration("10 parsecs").is_err());
/// ```
pub fn parse_duration(literal: &str) -> std::result::Result<Duration, String> {
    let trimmed = literal.trim();
    let mut rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if rest.starts_with('-') {
        return Err("negative durations are not supported".to_string());
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after) = split_digits(rest);
        let (frac, after) = match after.strip_prefix('.') {
            Some(tail) => split_digits(tail),
            None => ("", after),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(format!("expected a number at '{}'", rest));
        }

        let unit_end = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_end);
        let scale = unit_scale(unit)?;

        let mut nanos = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .ok()
                .and_then(|n| n.checked_mul(scale))
                .ok_or_else(|| "duration out of range".to_string())?
        };
        if !frac.is_empty() {
            // Digits past the 18th cannot change the result at nanosecond precision.
            let digits = &frac[..frac.len().min(18)];
            let numerator: u128 = digits.parse().map_err(|_| "invalid fraction".to_string())?;
            let denominator = 10u128.pow(digits.len() as u32);
            nanos += numerator * scale / denominator;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| "duration out of range".to_string())?;
        rest = after;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| "duration out of range".to_string())?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn unit_scale(unit: &str) -> std::result::Result<u128, String> {
    match unit {
        "ns" => Ok(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Ok(1_000),
        "ms" => Ok(1_000_000),
        "s" => Ok(NANOS_PER_SEC),
        "m" => Ok(60 * NANOS_PER_SEC),
        "h" => Ok(3_600 * NANOS_PER_SEC),
        "" => Err("missing unit".to_string()),
        other => Err(format!("unknown unit '{}'", other)),
    }
}

/// Builds a `Duration` from a configuration value.
///
/// Integers are whole seconds, floats are fractional seconds and strings are
/// duration literals. Other scalars are rendered as text and parsed.
pub fn convert(field: &FieldOptions<'_>, value: &Value) -> Result<Duration> {
    let invalid = |reason: String| ConfigError::InvalidDuration {
        value: value.to_string(),
        reason,
        context: field.context(value),
    };

    match value.kind() {
        ValueKind::Nil => Ok(Duration::ZERO),
        ValueKind::Int(secs) => u64::try_from(*secs)
            .map(Duration::from_secs)
            .map_err(|_| invalid("negative durations are not supported".to_string())),
        ValueKind::Uint(secs) => Ok(Duration::from_secs(*secs)),
        ValueKind::Float(secs) => {
            Duration::try_from_secs_f64(*secs).map_err(|e| invalid(e.to_string()))
        }
        ValueKind::String(s) => parse_duration(s).map_err(invalid),
        _ => {
            let text = value
                .to_string_value()
                .map_err(|e| scalar_error(field, value, "Duration", e))?;
            parse_duration(&text).map_err(invalid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Config, ErrorKind};
    use crate::service::Options;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_duration("15ns").unwrap(), Duration::from_nanos(15));
        assert_eq!(parse_duration("7us").unwrap(), Duration::from_micros(7));
        assert_eq!(parse_duration("7\u{b5}s").unwrap(), Duration::from_micros(7));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
    }

    #[test]
    fn test_parse_compound_and_fraction() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("2h45m30.5s").unwrap(), Duration::from_millis(9_930_500));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("+3s").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("-5s").is_err());
        assert!(parse_duration("5 days").is_err());
        assert!(parse_duration("1.s").is_ok());
        assert!(parse_duration(".s").is_err());
        assert!(parse_duration("99999999999999999999999999999999999999999h").is_err());
    }

    #[test]
    fn test_convert_values() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        assert_eq!(convert(&field, &Value::int(3)).unwrap(), Duration::from_secs(3));
        assert_eq!(convert(&field, &Value::uint(4)).unwrap(), Duration::from_secs(4));
        assert_eq!(convert(&field, &Value::float(0.25)).unwrap(), Duration::from_millis(250));
        assert_eq!(convert(&field, &Value::string("1m")).unwrap(), Duration::from_secs(60));
        assert_eq!(convert(&field, &Value::int(-1)).unwrap_err().kind(), ErrorKind::InvalidDuration);
        assert_eq!(convert(&field, &Value::float(-0.5)).unwrap_err().kind(), ErrorKind::InvalidDuration);
        assert_eq!(convert(&field, &Value::bool(true)).unwrap_err().kind(), ErrorKind::InvalidDuration);
        assert_eq!(
            convert(&field, &Value::object(Config::new())).unwrap_err().kind(),
            ErrorKind::TypeNotSupported
        );
    }
}
