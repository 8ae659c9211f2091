// SPDX-License-Identifier: MIT OR Apache-2.0

//! Untyped destinations: [`Config`], `Arc<Config>` and [`Value`].

use crate::domain::{merge_config, Config, Inspect, Result, Shape, Value, ValueKind};
use crate::ports::Reify;
use crate::service::structure::object_of;
use crate::service::validate::validate_reified;
use crate::service::FieldOptions;
use std::sync::Arc;

impl Reify for Config {
    fn shape() -> Shape {
        Shape::ConfigAlias
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            return Ok(Config::new());
        }
        let config = object_of(field, value)?.clone();
        validate_reified(field, &config, value.meta())?;
        Ok(config)
    }

    fn reify_merge(&mut self, field: &FieldOptions<'_>, value: &Value) -> Result<()> {
        let src = object_of(field, value)?;
        self.reify_into(field, src)?;
        validate_reified(field, self, value.meta())
    }

    fn reify_into(&mut self, field: &FieldOptions<'_>, config: &Config) -> Result<()> {
        tracing::debug!("Deep-merging {} keys into config at '{}'", config.len(), field.path());
        merge_config(self, config);
        Ok(())
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Map(self.len())
    }
}

/// Shared configuration nodes are adopted by reference when built fresh and
/// copied on write when merged.
impl Reify for Arc<Config> {
    fn shape() -> Shape {
        Shape::ConfigAlias
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        let config = match value.kind() {
            ValueKind::Nil => return Ok(Arc::new(Config::new())),
            ValueKind::Object(config) => Arc::clone(config),
            _ => Arc::new(object_of(field, value)?.clone()),
        };
        tracing::debug!("Adopting config node at '{}'", field.path());
        validate_reified(field, &config, value.meta())?;
        Ok(config)
    }

    fn reify_merge(&mut self, field: &FieldOptions<'_>, value: &Value) -> Result<()> {
        if let ValueKind::Object(src) = value.kind() {
            if Arc::ptr_eq(self, src) {
                tracing::trace!("Source config at '{}' is the destination, skipping", field.path());
                return Ok(());
            }
        }
        let src = object_of(field, value)?;
        self.reify_into(field, src)?;
        validate_reified(field, self, value.meta())
    }

    fn reify_into(&mut self, field: &FieldOptions<'_>, config: &Config) -> Result<()> {
        if std::ptr::eq(&**self, config) {
            return Ok(());
        }
        tracing::debug!("Deep-merging {} keys into shared config at '{}'", config.len(), field.path());
        merge_config(Arc::make_mut(self), config);
        Ok(())
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Map(self.len())
    }
}

/// A [`Value`] destination accepts any source value verbatim. Objects merged
/// into an object deep-merge; everything else replaces.
impl Reify for Value {
    fn shape() -> Shape {
        Shape::Interface
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        validate_reified(field, value, value.meta())?;
        Ok(value.clone())
    }

    fn reify_merge(&mut self, field: &FieldOptions<'_>, value: &Value) -> Result<()> {
        let merged = match (self.kind_mut(), value.kind()) {
            (ValueKind::Object(dst), ValueKind::Object(src)) => {
                if !Arc::ptr_eq(dst, src) {
                    merge_config(Arc::make_mut(dst), src);
                }
                true
            }
            _ => false,
        };
        if !merged {
            *self = value.clone();
        }
        validate_reified(field, self, value.meta())
    }

    fn inspect(&self) -> Inspect<'_> {
        match self.kind() {
            ValueKind::Nil => Inspect::Nil,
            ValueKind::Bool(b) => Inspect::Bool(*b),
            ValueKind::Int(i) => Inspect::Int(*i),
            ValueKind::Uint(u) => Inspect::Uint(*u),
            ValueKind::Float(f) => Inspect::Float(*f),
            ValueKind::String(s) => Inspect::Str(s),
            ValueKind::Array(items) => Inspect::Seq(items.len()),
            ValueKind::Object(config) => Inspect::Map(config.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::service::merge::merge_value;
    use crate::service::{unpack, Options};

    #[test]
    fn test_config_destination_deep_merges() {
        let mut dst = Config::new().with("db", Config::new().with("host", "a").with("port", 1i64));
        let src = Config::new().with("db", Config::new().with("port", 2i64)).with("debug", true);
        unpack(Some(&src), &mut dst, &Options::default()).unwrap();

        let db = dst.get("db").unwrap().to_config().unwrap();
        assert_eq!(db.get("host"), Some(&Value::string("a")));
        assert_eq!(db.get("port"), Some(&Value::int(2)));
        assert_eq!(dst.get("debug"), Some(&Value::bool(true)));
    }

    #[test]
    fn test_arc_config_adopted_by_reference() {
        let shared = Arc::new(Config::new().with("k", "v"));
        let value = Value::object(Arc::clone(&shared));
        let opts = Options::default();
        let field = FieldOptions::new(&opts);

        let adopted = Arc::<Config>::reify_value(&field, &value).unwrap();
        assert!(Arc::ptr_eq(&adopted, &shared));
    }

    #[test]
    fn test_arc_config_copy_on_write() {
        let shared = Arc::new(Config::new().with("k", "v"));
        let opts = Options::default();
        let field = FieldOptions::new(&opts);

        let mut dst = Arc::clone(&shared);
        merge_value(&mut dst, &field, &Value::object(Config::new().with("x", 1i64))).unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(dst.len(), 2);

        let before = Arc::clone(&dst);
        merge_value(&mut dst, &field, &Value::object(Arc::clone(&before))).unwrap();
        assert!(Arc::ptr_eq(&dst, &before));
    }

    #[test]
    fn test_config_rejects_scalar() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let err = Config::reify_value(&field, &Value::string("x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpectedObject);
    }

    #[test]
    fn test_value_destination() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);

        let mut dst = Value::reify_value(&field, &Value::object(Config::new().with("a", 1i64))).unwrap();
        merge_value(&mut dst, &field, &Value::object(Config::new().with("b", 2i64))).unwrap();
        assert_eq!(dst.len(), 2);

        merge_value(&mut dst, &field, &Value::string("scalar")).unwrap();
        assert_eq!(dst, Value::string("scalar"));
    }

    #[test]
    fn test_value_is_not_top_level() {
        let mut dst = Value::nil();
        let err = unpack(Some(&Config::new()), &mut dst, &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDestinationShape);
    }
}
