// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional and boxed destinations.
//!
//! `Option<T>` is the nullable layer: it starts out absent and is allocated on
//! the first write. `Box<T>` is always present and forwards to its content.

use crate::domain::{Config, ConfigError, Inspect, Result, Shape, Value};
use crate::ports::Reify;
use crate::service::merge::merge_value;
use crate::service::validate::run_validators;
use crate::service::FieldOptions;

impl<T: Reify> Reify for Option<T> {
    fn shape() -> Shape {
        Shape::Pointer
    }

    fn base_shape() -> Shape {
        T::base_shape()
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            run_validators(field, Inspect::Nil, value.meta())?;
            return Ok(None);
        }
        T::reify_value(field, value).map(Some)
    }

    fn reify_merge(&mut self, field: &FieldOptions<'_>, value: &Value) -> Result<()> {
        if value.is_nil() && self.is_some() && !T::base_shape().is_object() {
            run_validators(field, Inspect::Nil, value.meta())?;
            *self = None;
            return Ok(());
        }
        match self {
            Some(inner) => merge_value(inner, field, value),
            None => {
                *self = Self::reify_value(field, value)?;
                Ok(())
            }
        }
    }

    fn reify_into(&mut self, field: &FieldOptions<'_>, config: &Config) -> Result<()> {
        if !T::base_shape().is_object() {
            return Err(ConfigError::InvalidTopLevelType {
                type_name: std::any::type_name::<Self>(),
            });
        }
        match self {
            Some(inner) => inner.reify_into(field, config),
            None => {
                tracing::debug!("Allocating {} at '{}'", std::any::type_name::<T>(), field.path());
                let mut inner = T::reify_value(field, &Value::nil())?;
                inner.reify_into(field, config)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }

    fn inspect(&self) -> Inspect<'_> {
        match self {
            Some(inner) => inner.inspect(),
            None => Inspect::Nil,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Some(inner) => inner.validate(),
            None => Ok(()),
        }
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<T: Reify> Reify for Box<T> {
    fn shape() -> Shape {
        Shape::Pointer
    }

    fn base_shape() -> Shape {
        T::base_shape()
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        T::reify_value(field, value).map(Box::new)
    }

    fn reify_merge(&mut self, field: &FieldOptions<'_>, value: &Value) -> Result<()> {
        merge_value(&mut **self, field, value)
    }

    fn reify_into(&mut self, field: &FieldOptions<'_>, config: &Config) -> Result<()> {
        (**self).reify_into(field, config)
    }

    fn inspect(&self) -> Inspect<'_> {
        (**self).inspect()
    }

    fn validate(&self) -> std::result::Result<(), String> {
        (**self).validate()
    }

    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::service::validate::Directive;
    use crate::service::{unpack, Options};
    use std::collections::HashMap;

    fn reify<T: Reify>(value: Value) -> Result<T> {
        let opts = Options::default();
        T::reify_value(&FieldOptions::new(&opts), &value)
    }

    #[test]
    fn test_nil_into_optional_int() {
        assert_eq!(reify::<Option<i32>>(Value::nil()).unwrap(), None);
        assert_eq!(reify::<Option<i32>>(Value::int(4)).unwrap(), Some(4));
    }

    #[test]
    fn test_nested_optionals() {
        assert_eq!(reify::<Option<Option<u8>>>(Value::int(1)).unwrap(), Some(Some(1)));
        assert_eq!(<Option<Option<Vec<u8>>>>::base_shape(), Shape::Slice);
    }

    #[test]
    fn test_nil_clears_scalar_optional() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let mut dst = Some(3i32);
        merge_value(&mut dst, &field, &Value::nil()).unwrap();
        assert_eq!(dst, None);
    }

    #[test]
    fn test_nil_keeps_object_optional() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let mut dst: Option<HashMap<String, i64>> = Some(HashMap::from([("a".to_string(), 1)]));
        merge_value(&mut dst, &field, &Value::nil()).unwrap();
        assert_eq!(dst.map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_required_rejects_nil_optional() {
        let opts = Options::default();
        let root = FieldOptions::new(&opts);
        let directives = Directive::parse_list("required");
        let field = root.child_with("timeout", &directives);
        let err = Option::<u32>::reify_value(&field, &Value::nil()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[test]
    fn test_top_level_optional_map_is_allocated() {
        let cfg = Config::new().with("a", 1i64);
        let mut dst: Option<HashMap<String, i64>> = None;
        unpack(Some(&cfg), &mut dst, &Options::default()).unwrap();
        assert_eq!(dst.unwrap()["a"], 1);
    }

    #[test]
    fn test_top_level_scalar_rejected() {
        let mut dst: Option<i32> = None;
        let err = unpack(Some(&Config::new()), &mut dst, &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDestinationShape);

        let mut dst = 0u8;
        let err = unpack(Some(&Config::new()), &mut dst, &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDestinationShape);
    }

    #[test]
    fn test_boxed_values() {
        let b: Box<u16> = reify(Value::int(80)).unwrap();
        assert_eq!(*b, 80);

        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let mut boxed: Box<HashMap<String, i64>> = Box::default();
        boxed.insert("x".to_string(), 1);
        merge_value(&mut boxed, &field, &Value::object(Config::new().with("y", 2i64))).unwrap();
        assert_eq!(boxed.len(), 2);
    }
}
