// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in validators.
//!
//! | Name       | Parameter | Rejects                                               |
//! |------------|-----------|-------------------------------------------------------|
//! | `required` | none      | nil, empty strings, empty sequences and empty maps    |
//! | `nonzero`  | none      | zero numbers, zero durations and empty strings        |
//! | `positive` | none      | negative numbers                                      |
//! | `min`      | bound     | numbers below the bound, lengths below the bound      |
//! | `max`      | bound     | numbers above the bound, lengths above the bound      |
//!
//! Bounds on durations are duration literals (`min=1s`); a plain number is
//! read as seconds. Nil values pass every validator except `required`.

use crate::adapters::duration::parse_duration;
use crate::domain::Inspect;
use crate::service::{ValidatorRegistry, REQUIRED};
use std::cmp::Ordering;
use std::time::Duration;

type Outcome = Result<(), String>;

/// Registers the built-in validators.
pub fn register_builtins(registry: &mut ValidatorRegistry) {
    registry.register(REQUIRED, required);
    registry.register("nonzero", nonzero);
    registry.register("positive", positive);
    registry.register("min", min);
    registry.register("max", max);
}

fn required(value: Inspect<'_>, _: Option<&str>) -> Outcome {
    match value {
        Inspect::Nil => Err("required value is missing".to_string()),
        Inspect::Str(s) if s.is_empty() => Err("string value is not set".to_string()),
        Inspect::Seq(0) => Err("empty sequence is not allowed".to_string()),
        Inspect::Map(0) => Err("empty map is not allowed".to_string()),
        _ => Ok(()),
    }
}

fn nonzero(value: Inspect<'_>, _: Option<&str>) -> Outcome {
    let zero = match value {
        Inspect::Int(i) => i == 0,
        Inspect::Uint(u) => u == 0,
        Inspect::Float(f) => f == 0.0,
        Inspect::Duration(d) => d.is_zero(),
        Inspect::Str(s) => s.is_empty(),
        _ => false,
    };
    if zero {
        Err("zero value is not allowed".to_string())
    } else {
        Ok(())
    }
}

fn positive(value: Inspect<'_>, _: Option<&str>) -> Outcome {
    let negative = match value {
        Inspect::Int(i) => i < 0,
        Inspect::Float(f) => f < 0.0,
        _ => false,
    };
    if negative {
        Err("negative value is not allowed".to_string())
    } else {
        Ok(())
    }
}

fn min(value: Inspect<'_>, param: Option<&str>) -> Outcome {
    bound(value, param, "min", Ordering::Less, ">=")
}

fn max(value: Inspect<'_>, param: Option<&str>) -> Outcome {
    bound(value, param, "max", Ordering::Greater, "<=")
}

/// Fails when `value` compared to the bound yields `reject`.
fn bound(value: Inspect<'_>, param: Option<&str>, name: &str, reject: Ordering, op: &str) -> Outcome {
    let param = param
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| format!("validator '{}' requires a parameter", name))?;

    let (ordering, what) = match value {
        Inspect::Int(i) => (compare_number(i as f64, param, name)?, "value"),
        Inspect::Uint(u) => (compare_number(u as f64, param, name)?, "value"),
        Inspect::Float(f) => (compare_number(f, param, name)?, "value"),
        Inspect::Str(s) => (compare_number(s.chars().count() as f64, param, name)?, "length"),
        Inspect::Seq(n) | Inspect::Map(n) => (compare_number(n as f64, param, name)?, "length"),
        Inspect::Duration(d) => (d.cmp(&duration_bound(param, name)?), "duration"),
        _ => return Ok(()),
    };

    if ordering == reject {
        Err(format!("requires {} {} {}", what, op, param))
    } else {
        Ok(())
    }
}

fn compare_number(actual: f64, param: &str, name: &str) -> Result<Ordering, String> {
    let limit = param
        .parse::<f64>()
        .map_err(|_| format!("invalid parameter '{}' for validator '{}'", param, name))?;
    actual
        .partial_cmp(&limit)
        .ok_or_else(|| format!("cannot compare {} with '{}'", actual, param))
}

fn duration_bound(param: &str, name: &str) -> Result<Duration, String> {
    parse_duration(param).or_else(|_| {
        param
            .parse::<f64>()
            .ok()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .ok_or_else(|| format!("invalid parameter '{}' for validator '{}'", param, name))
    })
}
