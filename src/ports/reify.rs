// SPDX-License-Identifier: MIT OR Apache-2.0

//! Destination type descriptors.
//!
//! This module defines the [`Reify`] trait, which every destination type
//! implements to tell the engine its [`Shape`] and how to build or merge itself
//! from a [`Value`]. Struct types describe their fields through [`ReifyStruct`],
//! usually generated by the [`reify_struct!`](crate::reify_struct) macro.

use crate::domain::{Config, ConfigError, Inspect, Result, Shape, Value};
use crate::service::merge::merge_value;
use crate::service::FieldOptions;
use std::sync::Arc;

/// A type that can be populated from a configuration tree.
///
/// Implementations exist for scalars, strings, durations, regular expressions,
/// `Option`, `Box`, `Vec`, fixed-size arrays, string-keyed maps, [`Config`] and
/// [`Value`]. Struct types implement it through
/// [`reify_struct!`](crate::reify_struct).
///
/// # Examples
///
/// ```rust
/// use reifycfg::domain::{Inspect, Result, Shape, Value};
/// use reifycfg::ports::Reify;
/// use reifycfg::service::FieldOptions;
///
/// #[derive(Debug, PartialEq)]
/// struct Port(u16);
///
/// impl Reify for Port {
///     fn shape() -> Shape {
///         Shape::Primitive
///     }
///
///     fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
///         u16::reify_value(field, value).map(Port)
///     }
///
///     fn inspect(&self) -> Inspect<'_> {
///         Inspect::Uint(u64::from(self.0))
///     }
/// }
/// ```
pub trait Reify: Sized {
    /// Returns the shape of this type.
    fn shape() -> Shape;

    /// Returns the shape of this type after chasing optional and boxed layers.
    fn base_shape() -> Shape {
        Self::shape()
    }

    /// Builds a fresh value from `value`.
    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self>;

    /// Merges `value` into this existing value.
    ///
    /// The default replaces `self` with a freshly built value, which is the
    /// behavior of scalars and sequences.
    fn reify_merge(&mut self, field: &FieldOptions<'_>, value: &Value) -> Result<()> {
        *self = Self::reify_value(field, value)?;
        Ok(())
    }

    /// Populates this value directly from the fields of `config`.
    ///
    /// Only object shaped types support this; it is used for top-level targets
    /// and squashed fields.
    fn reify_into(&mut self, field: &FieldOptions<'_>, config: &Config) -> Result<()> {
        let _ = (field, config);
        Err(ConfigError::InvalidTopLevelType {
            type_name: std::any::type_name::<Self>(),
        })
    }

    /// Returns a view of this value for validators.
    fn inspect(&self) -> Inspect<'_>;

    /// Type-level validation, run after the value is fully reified.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }

    /// Returns `true` if this value is an absent optional.
    fn is_nil(&self) -> bool {
        false
    }
}

/// Object-safe access to a struct field, used by the struct reifier.
///
/// This trait is implemented for every [`Reify`] type.
pub trait ReifyField {
    /// Shape of the field's type after chasing optional and boxed layers.
    fn field_shape(&self) -> Shape;

    /// Name of the field's type.
    fn field_type_name(&self) -> &'static str;

    /// Merges `value` into the field through the merge engine.
    fn merge_field(&mut self, field: &FieldOptions<'_>, value: &Value) -> Result<()>;

    /// Populates the field from the parent object, for squashed fields.
    fn reify_inline(&mut self, field: &FieldOptions<'_>, config: &Config) -> Result<()>;

    /// Returns a view of the field's current value.
    fn inspect_field(&self) -> Inspect<'_>;
}

impl<T: Reify> ReifyField for T {
    fn field_shape(&self) -> Shape {
        T::base_shape()
    }

    fn field_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn merge_field(&mut self, field: &FieldOptions<'_>, value: &Value) -> Result<()> {
        merge_value(self, field, value)
    }

    fn reify_inline(&mut self, field: &FieldOptions<'_>, config: &Config) -> Result<()> {
        self.reify_into(field, config)
    }

    fn inspect_field(&self) -> Inspect<'_> {
        self.inspect()
    }
}

/// Field metadata of a struct destination.
///
/// Descriptors are built in `const` context, usually by
/// [`reify_struct!`](crate::reify_struct).
///
/// # Examples
///
/// ```
/// use reifycfg::ports::FieldDescriptor;
///
/// const HOST: FieldDescriptor = FieldDescriptor::new("host")
///     .rename("hostname")
///     .validate("required");
/// assert_eq!(HOST.name(), "hostname");
/// assert!(!HOST.squash);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The Rust identifier of the field.
    pub ident: &'static str,
    /// Explicit configuration key, overriding the identifier.
    pub rename: Option<&'static str>,
    /// Read the field's own fields from the parent object.
    pub squash: bool,
    /// Comma separated validator directives, e.g. `"required, min=1"`.
    pub validate: &'static str,
}

impl FieldDescriptor {
    /// Creates a descriptor for the field with the given identifier.
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            rename: None,
            squash: false,
            validate: "",
        }
    }

    /// Reads the field from `name` instead of its identifier.
    pub const fn rename(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    /// Reads the field's own fields from the parent object.
    pub const fn squash(mut self) -> Self {
        self.squash = true;
        self
    }

    /// Sets the validator directives.
    pub const fn validate(mut self, directives: &'static str) -> Self {
        self.validate = directives;
        self
    }

    /// The configuration key this field is read from.
    pub fn name(&self) -> &'static str {
        match self.rename {
            Some(name) => name,
            None => self.ident.strip_prefix("r#").unwrap_or(self.ident),
        }
    }
}

/// Field registration of a struct destination.
pub trait ReifyStruct {
    /// Descriptors of the fields, in declaration order.
    fn fields() -> &'static [FieldDescriptor];

    /// Returns the field at `index` in [`ReifyStruct::fields`].
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn ReifyField>;

    /// Struct-level validation, run after all fields are populated.
    fn validate_struct(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Key types of map destinations.
///
/// Only string-like keys can be read from a configuration object; integer keys
/// are accepted by the type system but rejected at reification time.
pub trait MapKey: Sized {
    /// Whether configuration keys can be converted to this type.
    const STRING_COMPATIBLE: bool = true;

    /// Converts a configuration key.
    fn from_key(key: &str) -> Option<Self>;
}

impl MapKey for String {
    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_string())
    }
}

impl MapKey for Box<str> {
    fn from_key(key: &str) -> Option<Self> {
        Some(key.into())
    }
}

impl MapKey for Arc<str> {
    fn from_key(key: &str) -> Option<Self> {
        Some(key.into())
    }
}

macro_rules! non_string_keys {
    ($($t:ty),*) => {$(
        impl MapKey for $t {
            const STRING_COMPATIBLE: bool = false;

            fn from_key(_key: &str) -> Option<Self> {
                None
            }
        }
    )*};
}

non_string_keys!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, bool, char);
