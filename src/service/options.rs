// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine options and per-field reification context.

use crate::domain::{ErrorContext, Meta, Result, Value};
use crate::ports::Validator;
use crate::service::convert::ConverterRegistry;
use crate::service::validate::{Directive, ValidatorRegistry};
use once_cell::sync::Lazy;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

static DEFAULT_VALIDATORS: Lazy<Arc<ValidatorRegistry>> =
    Lazy::new(|| Arc::new(ValidatorRegistry::with_builtins()));

static DEFAULT_CONVERTERS: Lazy<Arc<ConverterRegistry>> =
    Lazy::new(|| Arc::new(ConverterRegistry::with_builtins()));

/// Options controlling a reification call.
///
/// The default options have no path separator and use the built-in
/// validators and converters.
///
/// # Examples
///
/// ```rust
/// use reifycfg::service::Options;
///
/// let opts = Options::builder().with_path_sep(".").build();
/// assert_eq!(opts.path_sep(), Some("."));
/// assert_eq!(Options::default().path_sep(), None);
/// ```
#[derive(Clone)]
pub struct Options {
    path_sep: Option<String>,
    validators: Arc<ValidatorRegistry>,
    converters: Arc<ConverterRegistry>,
}

impl Options {
    /// Creates a new options builder.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    /// The separator splitting field names into paths, if any.
    pub fn path_sep(&self) -> Option<&str> {
        self.path_sep.as_deref().filter(|sep| !sep.is_empty())
    }

    /// The validators available to field directives.
    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// The converters for extension types.
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            path_sep: None,
            validators: Arc::clone(&DEFAULT_VALIDATORS),
            converters: Arc::clone(&DEFAULT_CONVERTERS),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("path_sep", &self.path_sep)
            .field("validators", &self.validators)
            .field("converters", &self.converters)
            .finish()
    }
}

/// Builder for [`Options`].
///
/// # Examples
///
/// ```rust
/// use reifycfg::domain::Inspect;
/// use reifycfg::service::Options;
///
/// let opts = Options::builder()
///     .with_path_sep(".")
///     .with_validator("even", |value: Inspect<'_>, _: Option<&str>| match value {
///         Inspect::Int(i) if i % 2 != 0 => Err("must be even".to_string()),
///         _ => Ok(()),
///     })
///     .build();
/// assert!(opts.validators().contains("even"));
/// assert!(opts.validators().contains("required"));
/// ```
#[derive(Default)]
pub struct OptionsBuilder {
    path_sep: Option<String>,
    validators: Option<ValidatorRegistry>,
    converters: Option<ConverterRegistry>,
}

impl OptionsBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits field names on `sep` and resolves them as paths.
    pub fn with_path_sep(mut self, sep: impl Into<String>) -> Self {
        self.path_sep = Some(sep.into());
        self
    }

    /// Replaces the validator registry.
    pub fn with_validators(mut self, registry: ValidatorRegistry) -> Self {
        self.validators = Some(registry);
        self
    }

    /// Adds a validator to the registry, starting from the built-in validators.
    pub fn with_validator(mut self, name: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.validators
            .get_or_insert_with(|| (**DEFAULT_VALIDATORS).clone())
            .register(name, validator);
        self
    }

    /// Replaces the converter registry.
    pub fn with_converters(mut self, registry: ConverterRegistry) -> Self {
        self.converters = Some(registry);
        self
    }

    /// Adds a converter for `T`, starting from the built-in converters.
    pub fn with_converter<T, F>(mut self, convert: F) -> Self
    where
        T: Any,
        F: Fn(&FieldOptions<'_>, &Value) -> Result<T> + Send + Sync + 'static,
    {
        self.converters
            .get_or_insert_with(|| (**DEFAULT_CONVERTERS).clone())
            .register::<T, F>(convert);
        self
    }

    /// Builds the options.
    pub fn build(self) -> Options {
        Options {
            path_sep: self.path_sep,
            validators: self
                .validators
                .map(Arc::new)
                .unwrap_or_else(|| Arc::clone(&DEFAULT_VALIDATORS)),
            converters: self
                .converters
                .map(Arc::new)
                .unwrap_or_else(|| Arc::clone(&DEFAULT_CONVERTERS)),
        }
    }
}

/// Context for reifying one destination value.
///
/// Carries the engine options, the dotted path of the destination and the
/// validator directives declared on the field being populated.
#[derive(Clone, Debug)]
pub struct FieldOptions<'a> {
    opts: &'a Options,
    validators: &'a [Directive],
    path: String,
}

impl<'a> FieldOptions<'a> {
    /// Creates the context for a top-level destination.
    pub fn new(opts: &'a Options) -> Self {
        Self {
            opts,
            validators: &[],
            path: String::new(),
        }
    }

    /// The engine options.
    pub fn options(&self) -> &'a Options {
        self.opts
    }

    /// Dotted path of the destination.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Validator directives to run on the reified value.
    pub fn validators(&self) -> &'a [Directive] {
        self.validators
    }

    /// Context for the named child, without validators.
    pub fn child(&self, name: &str) -> FieldOptions<'a> {
        FieldOptions {
            opts: self.opts,
            validators: &[],
            path: join_path(&self.path, name),
        }
    }

    /// Context for the named child carrying its own validators.
    pub fn child_with<'b>(&self, name: &str, validators: &'b [Directive]) -> FieldOptions<'b>
    where
        'a: 'b,
    {
        FieldOptions {
            opts: self.opts,
            validators,
            path: join_path(&self.path, name),
        }
    }

    /// Context for a sequence element; the field's validators apply to it.
    pub fn element(&self, index: usize) -> FieldOptions<'a> {
        FieldOptions {
            opts: self.opts,
            validators: self.validators,
            path: join_path(&self.path, &index.to_string()),
        }
    }

    /// Error context pointing at this field and the provenance of `value`.
    pub fn context(&self, value: &Value) -> ErrorContext {
        ErrorContext::new(self.path.clone(), value.meta().cloned())
    }

    /// Error context pointing at this field with the given provenance.
    pub fn context_meta(&self, meta: Option<&Arc<Meta>>) -> ErrorContext {
        ErrorContext::new(self.path.clone(), meta.cloned())
    }
}

/// Joins a dotted path and a child name.
pub(crate) fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();
        assert_eq!(opts.path_sep(), None);
        assert!(opts.validators().contains("required"));
    }

    #[test]
    fn test_empty_path_sep_is_disabled() {
        let opts = Options::builder().with_path_sep("").build();
        assert_eq!(opts.path_sep(), None);
    }

    #[test]
    fn test_field_paths() {
        let opts = Options::default();
        let root = FieldOptions::new(&opts);
        assert_eq!(root.path(), "");

        let db = root.child("db");
        assert_eq!(db.path(), "db");
        assert_eq!(db.child("host").path(), "db.host");
        assert_eq!(db.element(2).path(), "db.2");
        assert_eq!(root.element(0).path(), "0");
    }

    #[test]
    fn test_child_with_validators() {
        let opts = Options::default();
        let root = FieldOptions::new(&opts);
        let directives = Directive::parse_list("required, min=1");
        let field = root.child_with("port", &directives);
        assert_eq!(field.validators().len(), 2);
        assert_eq!(field.element(0).validators().len(), 2);
        assert!(field.child("x").validators().is_empty());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "a"), "a");
        assert_eq!(join_path("a", "b"), "a.b");
    }
}
