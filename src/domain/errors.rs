// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the reification engine.
//!
//! Every failure the engine can report is a variant of [`ConfigError`]. Variants
//! that relate to a place in the configuration tree carry an [`ErrorContext`]
//! with the dotted field path and, when the parser supplied it, the source
//! location of the offending value.

use crate::domain::value::Meta;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Where in the configuration tree an error happened.
///
/// `path` is the dotted path of the destination field being reified (empty at
/// the top level) and `meta` is the provenance of the source value, if known.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Dotted path of the destination field.
    pub path: String,
    /// Provenance of the source value.
    pub meta: Option<Arc<Meta>>,
}

impl ErrorContext {
    /// Creates a context for the given field path and provenance.
    pub fn new(path: impl Into<String>, meta: Option<Arc<Meta>>) -> Self {
        Self {
            path: path.into(),
            meta,
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, " accessing '{}'", self.path)?;
        }
        if let Some(meta) = &self.meta {
            write!(f, " ({})", meta)?;
        }
        Ok(())
    }
}

/// Coarse classification of a [`ConfigError`], for programmatic inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A required input (the config) was absent.
    NilInput,
    /// The destination cannot be a top-level target.
    InvalidDestinationShape,
    /// A map destination does not have string-compatible keys.
    KeyTypeInvalid,
    /// An intermediate path segment does not exist.
    MissingRequiredPathSegment,
    /// A scalar or array was found where an object is required.
    ExpectedObject,
    /// The destination type cannot be produced from the value.
    TypeNotSupported,
    /// A numeric value does not fit the destination type.
    Overflow,
    /// A value could not be read as a duration.
    InvalidDuration,
    /// A fixed-size array destination got the wrong number of elements.
    ArraySizeMismatch,
    /// A squashed field is not object shaped, or is an unset optional.
    InlineTargetNotObject,
    /// A validator rejected the reified value.
    ValidationFailed,
    /// A value could not be converted to the destination type.
    ConversionFailed,
    /// A value variant does not support the requested coercion.
    TypeMismatch,
    /// A field declares a validator that does not exist.
    InvalidValidator,
    /// A configuration tree could not be built from an external representation.
    Parse,
}

/// The main error type for reification operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use reifycfg::domain::errors::{ConfigError, ErrorContext, ErrorKind};
///
/// let error = ConfigError::Overflow {
///     type_name: "i8",
///     value: "1000".to_string(),
///     context: ErrorContext::new("limits.small", None),
/// };
/// assert_eq!(error.kind(), ErrorKind::Overflow);
/// assert!(error.to_string().contains("limits.small"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No configuration was supplied.
    #[error("configuration is nil")]
    NilConfig,

    /// The destination is not a struct, map or config at the top level.
    #[error("type {type_name} is not supported as top-level target (expected struct, map or config)")]
    InvalidTopLevelType {
        /// Name of the destination type
        type_name: &'static str,
    },

    /// The destination map's key type is not string compatible.
    #[error("map key type {type_name} is not string compatible{context}")]
    KeyTypeInvalid {
        /// Name of the map key type
        type_name: &'static str,
        /// Where the error happened
        context: ErrorContext,
    },

    /// An intermediate path segment is missing from the configuration.
    #[error("missing field '{field}'{context}")]
    MissingField {
        /// The missing path segment
        field: String,
        /// Where the error happened
        context: ErrorContext,
    },

    /// An object was required but another kind of value was found.
    #[error("expected object but found {found}{context}")]
    ExpectedObject {
        /// Kind of the value that was found
        found: &'static str,
        /// Where the error happened
        context: ErrorContext,
    },

    /// The destination type cannot be built from the value.
    #[error("type {type_name} cannot be built from {found}{context}")]
    TypeNotSupported {
        /// Name of the destination type
        type_name: &'static str,
        /// Kind of the source value
        found: &'static str,
        /// Where the error happened
        context: ErrorContext,
    },

    /// A numeric value does not fit the destination type.
    #[error("value {value} overflows {type_name}{context}")]
    Overflow {
        /// Name of the destination type
        type_name: &'static str,
        /// The offending value, rendered as text
        value: String,
        /// Where the error happened
        context: ErrorContext,
    },

    /// A duration literal could not be parsed.
    #[error("invalid duration '{value}': {reason}{context}")]
    InvalidDuration {
        /// The offending value, rendered as text
        value: String,
        /// Why parsing failed
        reason: String,
        /// Where the error happened
        context: ErrorContext,
    },

    /// A fixed-size array got the wrong number of elements.
    #[error("array of length {actual} does not fit array of length {expected}{context}")]
    ArraySize {
        /// Length of the destination array
        expected: usize,
        /// Length of the source array
        actual: usize,
        /// Where the error happened
        context: ErrorContext,
    },

    /// A squashed field is neither a struct, a map nor a config, or is an unset optional.
    #[error("inlined field '{field}' of type {type_name} must be a struct or map{context}")]
    InlineNeedsObject {
        /// Name of the squashed field
        field: &'static str,
        /// Name of the field's type
        type_name: &'static str,
        /// Where the error happened
        context: ErrorContext,
    },

    /// A validator rejected a value.
    #[error("validation failed: {message}{context}")]
    Validation {
        /// The validator's message
        message: String,
        /// Where the error happened
        context: ErrorContext,
    },

    /// A value could not be converted to the destination type.
    #[error("cannot convert {found} to {target}: {reason}{context}")]
    Conversion {
        /// Name of the destination type
        target: &'static str,
        /// Kind of the source value
        found: &'static str,
        /// Why the conversion failed
        reason: String,
        /// Where the error happened
        context: ErrorContext,
    },

    /// The value's variant does not support the requested coercion.
    #[error("type mismatch: cannot read {found} as {expected}")]
    TypeMismatch {
        /// The requested representation
        expected: &'static str,
        /// Kind of the source value
        found: &'static str,
    },

    /// A field declares a validator that is not registered.
    #[error("unknown validator '{name}' on field '{field}'")]
    InvalidValidator {
        /// Name of the validator
        name: String,
        /// Path of the field declaring it
        field: String,
    },

    /// A configuration tree could not be built from an external representation.
    #[error("failed to build configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
    },
}

impl ConfigError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::NilConfig => ErrorKind::NilInput,
            ConfigError::InvalidTopLevelType { .. } => ErrorKind::InvalidDestinationShape,
            ConfigError::KeyTypeInvalid { .. } => ErrorKind::KeyTypeInvalid,
            ConfigError::MissingField { .. } => ErrorKind::MissingRequiredPathSegment,
            ConfigError::ExpectedObject { .. } => ErrorKind::ExpectedObject,
            ConfigError::TypeNotSupported { .. } => ErrorKind::TypeNotSupported,
            ConfigError::Overflow { .. } => ErrorKind::Overflow,
            ConfigError::InvalidDuration { .. } => ErrorKind::InvalidDuration,
            ConfigError::ArraySize { .. } => ErrorKind::ArraySizeMismatch,
            ConfigError::InlineNeedsObject { .. } => ErrorKind::InlineTargetNotObject,
            ConfigError::Validation { .. } => ErrorKind::ValidationFailed,
            ConfigError::Conversion { .. } => ErrorKind::ConversionFailed,
            ConfigError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ConfigError::InvalidValidator { .. } => ErrorKind::InvalidValidator,
            ConfigError::ParseError { .. } => ErrorKind::Parse,
        }
    }

    /// Returns the tree location attached to this error, if any.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ConfigError::KeyTypeInvalid { context, .. }
            | ConfigError::MissingField { context, .. }
            | ConfigError::ExpectedObject { context, .. }
            | ConfigError::TypeNotSupported { context, .. }
            | ConfigError::Overflow { context, .. }
            | ConfigError::InvalidDuration { context, .. }
            | ConfigError::ArraySize { context, .. }
            | ConfigError::InlineNeedsObject { context, .. }
            | ConfigError::Validation { context, .. }
            | ConfigError::Conversion { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// A specialized Result type for reification operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_config_error() {
        let error = ConfigError::NilConfig;
        assert_eq!(error.to_string(), "configuration is nil");
        assert_eq!(error.kind(), ErrorKind::NilInput);
        assert!(error.context().is_none());
    }

    #[test]
    fn test_context_display_with_path_and_meta() {
        let meta = Arc::new(Meta::new("app.yaml").at_line(12));
        let error = ConfigError::ExpectedObject {
            found: "string",
            context: ErrorContext::new("db", Some(meta)),
        };
        assert_eq!(
            error.to_string(),
            "expected object but found string accessing 'db' (source:'app.yaml', line 12)"
        );
    }

    #[test]
    fn test_context_display_empty() {
        let error = ConfigError::ArraySize {
            expected: 3,
            actual: 2,
            context: ErrorContext::default(),
        };
        assert_eq!(
            error.to_string(),
            "array of length 2 does not fit array of length 3"
        );
        assert_eq!(error.kind(), ErrorKind::ArraySizeMismatch);
    }

    #[test]
    fn test_context_accessor() {
        let error = ConfigError::Validation {
            message: "value must not be empty".to_string(),
            context: ErrorContext::new("name", None),
        };
        assert_eq!(error.context().map(|c| c.path.as_str()), Some("name"));
    }

    #[test]
    fn test_invalid_validator_error() {
        let error = ConfigError::InvalidValidator {
            name: "bogus".to_string(),
            field: "port".to_string(),
        };
        assert_eq!(error.kind(), ErrorKind::InvalidValidator);
        assert_eq!(
            error.to_string(),
            "unknown validator 'bogus' on field 'port'"
        );
    }
}
