// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validator registry and the post-conversion validation hook.

use crate::adapters::validators;
use crate::domain::{ConfigError, Inspect, Meta, Result};
use crate::ports::{Reify, Validator};
use crate::service::FieldOptions;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the validator that also runs when a struct key is missing.
pub const REQUIRED: &str = "required";

/// One parsed validator directive, e.g. `min=1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    /// Name of the validator.
    pub name: String,
    /// Text after `=`, if any.
    pub param: Option<String>,
}

impl Directive {
    /// Parses a single directive.
    pub fn parse(directive: &str) -> Self {
        match directive.split_once('=') {
            Some((name, param)) => Self {
                name: name.trim().to_string(),
                param: Some(param.trim().to_string()),
            },
            None => Self {
                name: directive.trim().to_string(),
                param: None,
            },
        }
    }

    /// Parses a comma separated list of directives, skipping empty entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use reifycfg::service::Directive;
    ///
    /// let directives = Directive::parse_list("required, min=1,,max = 10");
    /// assert_eq!(directives.len(), 3);
    /// assert_eq!(directives[2].param.as_deref(), Some("10"));
    /// ```
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(Self::parse)
            .collect()
    }
}

/// Named validators available to field directives.
///
/// # Examples
///
/// ```rust
/// use reifycfg::domain::Inspect;
/// use reifycfg::service::ValidatorRegistry;
///
/// let mut registry = ValidatorRegistry::with_builtins();
/// registry.register("short", |value: Inspect<'_>, _: Option<&str>| match value {
///     Inspect::Str(s) if s.len() > 8 => Err("too long".to_string()),
///     _ => Ok(()),
/// });
/// assert!(registry.contains("short"));
/// assert!(registry.contains("min"));
/// ```
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn Validator>>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in validators.
    ///
    /// See [`crate::adapters::validators`] for the list.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        validators::register_builtins(&mut registry);
        registry
    }

    /// Registers a validator, replacing any validator with the same name.
    pub fn register(&mut self, name: impl Into<String>, validator: impl Validator + 'static) {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    /// Returns the validator registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Validator>> {
        self.validators.get(name)
    }

    /// Returns `true` if a validator is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Fails if a directive names a validator that is not registered.
pub(crate) fn check_directives(field: &FieldOptions<'_>, directives: &[Directive]) -> Result<()> {
    let registry = field.options().validators();
    match directives.iter().find(|d| !registry.contains(&d.name)) {
        Some(unknown) => Err(ConfigError::InvalidValidator {
            name: unknown.name.clone(),
            field: field.path().to_string(),
        }),
        None => Ok(()),
    }
}

/// Runs the field's directives in order, stopping at the first failure.
pub(crate) fn run_validators(
    field: &FieldOptions<'_>,
    value: Inspect<'_>,
    meta: Option<&Arc<Meta>>,
) -> Result<()> {
    for directive in field.validators() {
        run_directive(field, directive, value, meta)?;
    }
    Ok(())
}

/// Runs the field's directives and then the type-level validation of `value`.
pub(crate) fn validate_reified<T: Reify>(
    field: &FieldOptions<'_>,
    value: &T,
    meta: Option<&Arc<Meta>>,
) -> Result<()> {
    run_validators(field, value.inspect(), meta)?;
    value.validate().map_err(|message| ConfigError::Validation {
        message,
        context: field.context_meta(meta),
    })
}

/// Presence check for a field whose key is absent from the configuration.
///
/// Only the `required` directive is evaluated, against the field's current
/// value, so a field that already holds a value passes.
pub(crate) fn check_missing(
    field: &FieldOptions<'_>,
    current: Inspect<'_>,
    meta: Option<&Arc<Meta>>,
) -> Result<()> {
    for directive in field.validators().iter().filter(|d| d.name == REQUIRED) {
        run_directive(field, directive, current, meta)?;
    }
    Ok(())
}

fn run_directive(
    field: &FieldOptions<'_>,
    directive: &Directive,
    value: Inspect<'_>,
    meta: Option<&Arc<Meta>>,
) -> Result<()> {
    let validator = field
        .options()
        .validators()
        .get(&directive.name)
        .ok_or_else(|| ConfigError::InvalidValidator {
            name: directive.name.clone(),
            field: field.path().to_string(),
        })?;

    validator
        .validate(value, directive.param.as_deref())
        .map_err(|message| {
            tracing::debug!(
                "Validator '{}' rejected '{}': {}",
                directive.name,
                field.path(),
                message
            );
            ConfigError::Validation {
                message,
                context: field.context_meta(meta),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::service::Options;

    #[test]
    fn test_parse_directive() {
        assert_eq!(
            Directive::parse("min=3"),
            Directive {
                name: "min".to_string(),
                param: Some("3".to_string())
            }
        );
        assert_eq!(Directive::parse(" required ").param, None);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(Directive::parse_list("").is_empty());
        assert!(Directive::parse_list(" , ").is_empty());
    }

    #[test]
    fn test_builtins_registered() {
        let registry = ValidatorRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec!["max", "min", "nonzero", "positive", "required"]
        );
    }

    #[test]
    fn test_check_directives_unknown() {
        let opts = Options::default();
        let root = FieldOptions::new(&opts);
        let directives = Directive::parse_list("required, bogus");
        let field = root.child_with("port", &directives);
        let err = check_directives(&field, &directives).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValidator);
    }

    #[test]
    fn test_run_validators_short_circuits() {
        let opts = Options::default();
        let root = FieldOptions::new(&opts);
        let directives = Directive::parse_list("min=10, max=1");
        let field = root.child_with("n", &directives);
        let err = run_validators(&field, Inspect::Int(5), None).unwrap_err();
        match err {
            ConfigError::Validation { message, context } => {
                assert!(message.contains("10"));
                assert_eq!(context.path, "n");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_check_missing_only_runs_required() {
        let opts = Options::default();
        let root = FieldOptions::new(&opts);
        let directives = Directive::parse_list("min=10");
        let field = root.child_with("n", &directives);
        assert!(check_missing(&field, Inspect::Int(0), None).is_ok());

        let directives = Directive::parse_list("required");
        let field = root.child_with("name", &directives);
        assert!(check_missing(&field, Inspect::Str(""), None).is_err());
        assert!(check_missing(&field, Inspect::Str("set"), None).is_ok());
    }
}
