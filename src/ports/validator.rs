// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validator trait definition.
//!
//! A validator is a named check that runs on a reified value. Validators are
//! looked up by name in a [`ValidatorRegistry`](crate::service::ValidatorRegistry)
//! when a field declares them.

use crate::domain::Inspect;

/// A named check on reified values.
///
/// `param` is the text after `=` in a directive such as `min=1`, or `None`
/// for directives without a parameter. Returning `Err` rejects the value with
/// the given message.
///
/// Any `Fn(Inspect<'_>, Option<&str>) -> Result<(), String>` is a validator.
///
/// # Examples
///
/// ```rust
/// use reifycfg::domain::Inspect;
/// use reifycfg::ports::Validator;
///
/// fn even(value: Inspect<'_>, _param: Option<&str>) -> Result<(), String> {
///     match value {
///         Inspect::Int(i) if i % 2 != 0 => Err(format!("{} is not even", i)),
///         _ => Ok(()),
///     }
/// }
///
/// assert!(even.validate(Inspect::Int(4), None).is_ok());
/// assert!(even.validate(Inspect::Int(3), None).is_err());
/// ```
pub trait Validator: Send + Sync {
    /// Checks `value`, returning a message on failure.
    fn validate(&self, value: Inspect<'_>, param: Option<&str>) -> Result<(), String>;
}

impl<F> Validator for F
where
    F: Fn(Inspect<'_>, Option<&str>) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, value: Inspect<'_>, param: Option<&str>) -> Result<(), String> {
        self(value, param)
    }
}
