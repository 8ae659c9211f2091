// SPDX-License-Identifier: MIT OR Apache-2.0

//! Struct destinations.
//!
//! Structs describe their fields with [`ReifyStruct`], normally generated by
//! [`reify_struct!`](crate::reify_struct). The functions here walk that field
//! table against a source object.

use crate::domain::{Config, ConfigError, Inspect, Result, Value};
use crate::ports::{Reify, ReifyStruct};
use crate::service::path::resolve_path;
use crate::service::validate::{check_directives, check_missing, Directive};
use crate::service::FieldOptions;

/// Returns the object held by `value`, failing with `ExpectedObject` otherwise.
pub fn object_of<'v>(field: &FieldOptions<'_>, value: &'v Value) -> Result<&'v Config> {
    value
        .to_config()
        .map(|config| &**config)
        .map_err(|_| ConfigError::ExpectedObject {
            found: value.type_name(),
            context: field.context(value),
        })
}

/// Builds a struct from `value`, starting from its `Default`.
///
/// A nil value yields the default struct.
pub fn reify_struct_value<S>(field: &FieldOptions<'_>, value: &Value) -> Result<S>
where
    S: ReifyStruct + Reify + Default,
{
    let mut dst = S::default();
    if !value.is_nil() {
        reify_struct(&mut dst, field, object_of(field, value)?)?;
    }
    Ok(dst)
}

/// Merges the object held by `value` into an existing struct.
pub fn merge_struct<S>(dst: &mut S, field: &FieldOptions<'_>, value: &Value) -> Result<()>
where
    S: ReifyStruct + Reify,
{
    reify_struct(dst, field, object_of(field, value)?)
}

/// Populates the fields of `dst` from `config`.
///
/// Fields are processed in declaration order. A squashed field is populated
/// from `config` itself and, when optional, must already be set; every other
/// field looks up its key, descending through nested objects when a path
/// separator is configured. Absent keys leave the field as it is, subject to
/// its `required` directive. Once all fields are set, the struct-level
/// validation runs.
pub fn reify_struct<S>(dst: &mut S, field: &FieldOptions<'_>, config: &Config) -> Result<()>
where
    S: ReifyStruct + Reify,
{
    tracing::trace!(
        "Reifying struct {} at '{}'",
        std::any::type_name::<S>(),
        field.path()
    );

    for (index, desc) in S::fields().iter().enumerate() {
        let name = desc.name();
        let directives = Directive::parse_list(desc.validate);
        let child = field.child_with(name, &directives);
        check_directives(&child, &directives)?;

        let Some(slot) = dst.field_mut(index) else {
            continue;
        };

        if desc.squash {
            // An unset optional is never allocated just to be inlined.
            if !slot.field_shape().is_object() || matches!(slot.inspect_field(), Inspect::Nil) {
                return Err(ConfigError::InlineNeedsObject {
                    field: desc.ident,
                    type_name: slot.field_type_name(),
                    context: field.context_meta(config.meta()),
                });
            }
            slot.reify_inline(field, config)?;
            continue;
        }

        let (from, key) = resolve_path(config, field.options(), name, field.path())?;
        match from.get(key) {
            Some(value) => slot.merge_field(&child, value)?,
            None => {
                tracing::debug!("Key '{}' not found, keeping field '{}'", key, child.path());
                check_missing(&child, slot.inspect_field(), from.meta())?;
            }
        }
    }

    dst.validate().map_err(|message| ConfigError::Validation {
        message,
        context: field.context_meta(config.meta()),
    })
}

/// Registers a struct as a configuration destination.
///
/// Lists the fields to populate, each optionally followed by `:` and a chain
/// of field options:
///
/// - `rename("key")` reads the field from `key` instead of its identifier.
/// - `squash()` reads the field's own fields from the parent object.
/// - `validate("required, min=1")` attaches validator directives.
///
/// An optional trailing `validate_with path` names a
/// `fn(&Self) -> Result<(), String>` run once all fields are populated.
/// The struct must implement `Default`. Fields that are not listed are left
/// alone.
///
/// # Examples
///
/// ```rust
/// use reifycfg::domain::Config;
/// use reifycfg::reify_struct;
///
/// #[derive(Debug, Default)]
/// struct Server {
///     host: String,
///     port: u16,
///     tls: bool,
/// }
///
/// fn check_tls(server: &Server) -> Result<(), String> {
///     if server.tls && server.port == 80 {
///         return Err("tls on port 80".to_string());
///     }
///     Ok(())
/// }
///
/// reify_struct! {
///     Server {
///         host: rename("hostname").validate("required"),
///         port: validate("min=1"),
///         tls,
///     }
///     validate_with check_tls
/// }
///
/// let cfg = Config::new().with("hostname", "example.org").with("port", 8443i64);
/// let mut server = Server::default();
/// cfg.unpack(&mut server).unwrap();
/// assert_eq!(server.host, "example.org");
/// assert_eq!(server.port, 8443);
/// ```
#[macro_export]
macro_rules! reify_struct {
    (
        $ty:ty {
            $( $field:ident $( : $( $opt:ident ( $( $arg:expr )? ) ).+ )? ),* $(,)?
        }
        $( validate_with $check:path )?
    ) => {
        impl $crate::ports::ReifyStruct for $ty {
            fn fields() -> &'static [$crate::ports::FieldDescriptor] {
                const FIELDS: &[$crate::ports::FieldDescriptor] = &[
                    $(
                        $crate::ports::FieldDescriptor::new(stringify!($field))
                            $( $( .$opt( $( $arg )? ) )+ )?
                    ),*
                ];
                FIELDS
            }

            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn $crate::ports::ReifyField> {
                #[allow(unused_mut)]
                let mut position = 0usize;
                $(
                    if index == position {
                        return ::core::option::Option::Some(&mut self.$field);
                    }
                    position += 1;
                )*
                let _ = position;
                ::core::option::Option::None
            }

            fn validate_struct(&self) -> ::core::result::Result<(), ::std::string::String> {
                let check: fn(&Self) -> ::core::result::Result<(), ::std::string::String> =
                    $crate::__reify_struct_check!($( $check )?);
                check(self)
            }
        }

        impl $crate::ports::Reify for $ty {
            fn shape() -> $crate::domain::Shape {
                $crate::domain::Shape::Struct
            }

            fn reify_value(
                field: &$crate::service::FieldOptions<'_>,
                value: &$crate::domain::Value,
            ) -> $crate::domain::Result<Self> {
                $crate::service::structure::reify_struct_value(field, value)
            }

            fn reify_merge(
                &mut self,
                field: &$crate::service::FieldOptions<'_>,
                value: &$crate::domain::Value,
            ) -> $crate::domain::Result<()> {
                $crate::service::structure::merge_struct(self, field, value)
            }

            fn reify_into(
                &mut self,
                field: &$crate::service::FieldOptions<'_>,
                config: &$crate::domain::Config,
            ) -> $crate::domain::Result<()> {
                $crate::service::structure::reify_struct(self, field, config)
            }

            fn inspect(&self) -> $crate::domain::Inspect<'_> {
                $crate::domain::Inspect::Struct
            }

            fn validate(&self) -> ::core::result::Result<(), ::std::string::String> {
                <Self as $crate::ports::ReifyStruct>::validate_struct(self)
            }
        }
    };
}

/// Expands to the struct-level check of [`reify_struct!`](crate::reify_struct).
#[doc(hidden)]
#[macro_export]
macro_rules! __reify_struct_check {
    () => {
        |_| ::core::result::Result::Ok(())
    };
    ($check:path) => {
        $check
    };
}
