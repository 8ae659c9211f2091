// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converter registry for extension types.
//!
//! Types that are not plain scalars (durations, regular expressions, or user
//! types) are built by converter functions registered per target type. The
//! registry is queried before the generic scalar conversion.

use crate::adapters::{duration, regexp};
use crate::domain::{ConfigError, Result, Value};
use crate::service::FieldOptions;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ConvertFn = dyn Fn(&FieldOptions<'_>, &Value) -> Result<Box<dyn Any>> + Send + Sync;

struct Entry {
    type_name: &'static str,
    convert: Arc<ConvertFn>,
}

impl Clone for Entry {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            convert: Arc::clone(&self.convert),
        }
    }
}

/// Converter functions keyed by target type.
///
/// # Examples
///
/// ```rust
/// use reifycfg::domain::Value;
/// use reifycfg::service::{ConverterRegistry, FieldOptions, Options};
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(f64);
///
/// let mut registry = ConverterRegistry::new();
/// registry.register(|_field: &FieldOptions<'_>, value: &Value| {
///     Ok(Celsius(value.to_float()?))
/// });
///
/// let opts = Options::default();
/// let field = FieldOptions::new(&opts);
/// let converted = registry.convert::<Celsius>(&field, &Value::int(21));
/// assert_eq!(converted.unwrap().unwrap(), Celsius(21.0));
/// ```
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Entry>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with converters for `Duration` and `Regex`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(duration::convert);
        registry.register(regexp::convert);
        registry
    }

    /// Registers the converter for `T`, replacing any previous one.
    pub fn register<T, F>(&mut self, convert: F)
    where
        T: Any,
        F: Fn(&FieldOptions<'_>, &Value) -> Result<T> + Send + Sync + 'static,
    {
        let convert: Arc<ConvertFn> = Arc::new(
            move |field: &FieldOptions<'_>, value: &Value| -> Result<Box<dyn Any>> {
                convert(field, value).map(|v| Box::new(v) as Box<dyn Any>)
            },
        );
        self.converters.insert(
            TypeId::of::<T>(),
            Entry {
                type_name: std::any::type_name::<T>(),
                convert,
            },
        );
    }

    /// Returns `true` if a converter for `T` is registered.
    pub fn contains<T: Any>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    /// Converts `value` to `T`, or returns `None` if no converter is registered.
    pub fn convert<T: Any>(&self, field: &FieldOptions<'_>, value: &Value) -> Option<Result<T>> {
        let entry = self.converters.get(&TypeId::of::<T>())?;
        tracing::trace!(
            "Converting '{}' to {} through the converter registry",
            field.path(),
            entry.type_name
        );
        let converted = (entry.convert)(field, value).and_then(|boxed| {
            boxed
                .downcast::<T>()
                .map(|v| *v)
                .map_err(|_| ConfigError::Conversion {
                    target: entry.type_name,
                    found: value.type_name(),
                    reason: "converter produced a value of another type".to_string(),
                    context: field.context(value),
                })
        });
        Some(converted)
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.converters.values().map(|e| e.type_name).collect();
        names.sort_unstable();
        f.debug_set().entries(names).finish()
    }
}
