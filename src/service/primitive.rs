// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scalar destinations: integers, floats, booleans, strings, durations,
//! regular expressions and paths.
//!
//! Every scalar follows the same rules: a nil value yields the type's zero
//! value, anything else is coerced through the value model, narrowed with an
//! overflow check and then handed to the field's validators.

use crate::domain::{ConfigError, Inspect, Result, Shape, Value, ValueKind};
use crate::ports::Reify;
use crate::service::validate::validate_reified;
use crate::service::FieldOptions;
use regex_lite::Regex;
use std::path::PathBuf;
use std::time::Duration;

/// Maps a value-model coercion failure to a reification error for `target`.
pub(crate) fn scalar_error(
    field: &FieldOptions<'_>,
    value: &Value,
    target: &'static str,
    err: ConfigError,
) -> ConfigError {
    match (value.kind(), err) {
        (ValueKind::Array(_) | ValueKind::Object(_), _) => ConfigError::TypeNotSupported {
            type_name: target,
            found: value.type_name(),
            context: field.context(value),
        },
        (_, ConfigError::Overflow { .. }) => overflow(field, value, target),
        (_, err) => ConfigError::Conversion {
            target,
            found: value.type_name(),
            reason: err.to_string(),
            context: field.context(value),
        },
    }
}

fn overflow(field: &FieldOptions<'_>, value: &Value, target: &'static str) -> ConfigError {
    ConfigError::Overflow {
        type_name: target,
        value: value.to_string(),
        context: field.context(value),
    }
}

macro_rules! reify_signed {
    ($($t:ty),*) => {$(
        impl Reify for $t {
            fn shape() -> Shape {
                Shape::Primitive
            }

            fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
                if value.is_nil() {
                    return Ok(0);
                }
                let wide = value
                    .to_int()
                    .map_err(|e| scalar_error(field, value, stringify!($t), e))?;
                let narrow = <$t>::try_from(wide)
                    .map_err(|_| overflow(field, value, stringify!($t)))?;
                validate_reified(field, &narrow, value.meta())?;
                Ok(narrow)
            }

            fn inspect(&self) -> Inspect<'_> {
                Inspect::Int(*self as i64)
            }
        }
    )*};
}

macro_rules! reify_unsigned {
    ($($t:ty),*) => {$(
        impl Reify for $t {
            fn shape() -> Shape {
                Shape::Primitive
            }

            fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
                if value.is_nil() {
                    return Ok(0);
                }
                let wide = value
                    .to_uint()
                    .map_err(|e| scalar_error(field, value, stringify!($t), e))?;
                let narrow = <$t>::try_from(wide)
                    .map_err(|_| overflow(field, value, stringify!($t)))?;
                validate_reified(field, &narrow, value.meta())?;
                Ok(narrow)
            }

            fn inspect(&self) -> Inspect<'_> {
                Inspect::Uint(*self as u64)
            }
        }
    )*};
}

reify_signed!(i8, i16, i32, i64, isize);
reify_unsigned!(u8, u16, u32, u64, usize);

impl Reify for f64 {
    fn shape() -> Shape {
        Shape::Primitive
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            return Ok(0.0);
        }
        let f = value
            .to_float()
            .map_err(|e| scalar_error(field, value, "f64", e))?;
        validate_reified(field, &f, value.meta())?;
        Ok(f)
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Float(*self)
    }
}

impl Reify for f32 {
    fn shape() -> Shape {
        Shape::Primitive
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            return Ok(0.0);
        }
        let wide = value
            .to_float()
            .map_err(|e| scalar_error(field, value, "f32", e))?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return Err(overflow(field, value, "f32"));
        }
        let f = wide as f32;
        validate_reified(field, &f, value.meta())?;
        Ok(f)
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Float(f64::from(*self))
    }
}

impl Reify for bool {
    fn shape() -> Shape {
        Shape::Primitive
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            return Ok(false);
        }
        let b = value
            .to_bool()
            .map_err(|e| scalar_error(field, value, "bool", e))?;
        validate_reified(field, &b, value.meta())?;
        Ok(b)
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Bool(*self)
    }
}

impl Reify for String {
    fn shape() -> Shape {
        Shape::Primitive
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            return Ok(String::new());
        }
        let s = value
            .to_string_value()
            .map_err(|e| scalar_error(field, value, "String", e))?;
        validate_reified(field, &s, value.meta())?;
        Ok(s)
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Str(self)
    }
}

impl Reify for PathBuf {
    fn shape() -> Shape {
        Shape::Primitive
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            return Ok(PathBuf::new());
        }
        let path = value
            .to_string_value()
            .map(PathBuf::from)
            .map_err(|e| scalar_error(field, value, "PathBuf", e))?;
        validate_reified(field, &path, value.meta())?;
        Ok(path)
    }

    fn inspect(&self) -> Inspect<'_> {
        self.to_str().map(Inspect::Str).unwrap_or(Inspect::Other)
    }
}

impl Reify for Duration {
    fn shape() -> Shape {
        Shape::Primitive
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            return Ok(Duration::ZERO);
        }
        let d = match field.options().converters().convert::<Duration>(field, value) {
            Some(converted) => converted?,
            None => crate::adapters::duration::convert(field, value)?,
        };
        validate_reified(field, &d, value.meta())?;
        Ok(d)
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Duration(*self)
    }
}

/// Regular expressions have no zero value; a nil value is a conversion error.
/// Use `Option<Regex>` for optional patterns.
impl Reify for Regex {
    fn shape() -> Shape {
        Shape::Primitive
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            return Err(ConfigError::Conversion {
                target: "regex",
                found: value.type_name(),
                reason: "a regular expression has no zero value".to_string(),
                context: field.context(value),
            });
        }
        let re = match field.options().converters().convert::<Regex>(field, value) {
            Some(converted) => converted?,
            None => crate::adapters::regexp::convert(field, value)?,
        };
        validate_reified(field, &re, value.meta())?;
        Ok(re)
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Str(self.as_str())
    }
}

/// Implements [`Reify`] for types built through the converter registry.
///
/// The type must implement `Default`, which is used for nil values. Reifying a
/// type whose converter is not registered in the options fails with
/// `TypeNotSupported`.
///
/// # Examples
///
/// ```rust
/// use reifycfg::domain::{Config, Value};
/// use reifycfg::service::{FieldOptions, Options};
/// use reifycfg::{reify_extension, reify_struct};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Percent(u8);
///
/// reify_extension!(Percent);
///
/// #[derive(Debug, Default)]
/// struct Limits {
///     cpu: Percent,
/// }
///
/// reify_struct! {
///     Limits { cpu }
/// }
///
/// let opts = Options::builder()
///     .with_converter(|field: &FieldOptions<'_>, value: &Value| {
///         let s = value.to_string_value()?;
///         let n = s.trim_end_matches('%').parse::<u8>().map_err(|e| {
///             reifycfg::domain::ConfigError::Conversion {
///                 target: "Percent",
///                 found: value.type_name(),
///                 reason: e.to_string(),
///                 context: field.context(value),
///             }
///         })?;
///         Ok(Percent(n))
///     })
///     .build();
///
/// let cfg = Config::new().with("cpu", "75%");
/// let mut limits = Limits::default();
/// cfg.unpack_with(&mut limits, &opts).unwrap();
/// assert_eq!(limits.cpu, Percent(75));
/// ```
#[macro_export]
macro_rules! reify_extension {
    ($($t:ty),+ $(,)?) => {$(
        impl $crate::ports::Reify for $t {
            fn shape() -> $crate::domain::Shape {
                $crate::domain::Shape::Primitive
            }

            fn reify_value(
                field: &$crate::service::FieldOptions<'_>,
                value: &$crate::domain::Value,
            ) -> $crate::domain::Result<Self> {
                $crate::service::primitive::reify_extension_value::<Self>(field, value)
            }

            fn inspect(&self) -> $crate::domain::Inspect<'_> {
                $crate::domain::Inspect::Other
            }
        }
    )+};
}

/// Builds an extension type through the converter registry.
///
/// Used by [`reify_extension!`](crate::reify_extension).
pub fn reify_extension_value<T>(field: &FieldOptions<'_>, value: &Value) -> Result<T>
where
    T: Reify + Default + 'static,
{
    if value.is_nil() {
        return Ok(T::default());
    }
    let converted = field
        .options()
        .converters()
        .convert::<T>(field, value)
        .ok_or_else(|| ConfigError::TypeNotSupported {
            type_name: std::any::type_name::<T>(),
            found: value.type_name(),
            context: field.context(value),
        })??;
    validate_reified(field, &converted, value.meta())?;
    Ok(converted)
}
