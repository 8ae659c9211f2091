// SPDX-License-Identifier: MIT OR Apache-2.0

//! Map destinations.

use crate::domain::{Config, ConfigError, Inspect, Result, Shape, Value};
use crate::ports::{MapKey, Reify};
use crate::service::merge::merge_value;
use crate::service::structure::object_of;
use crate::service::validate::validate_reified;
use crate::service::FieldOptions;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// Common access to the map types the engine fills.
trait MapSink {
    type Key: MapKey;
    type Item: Reify;

    fn item_mut(&mut self, key: &Self::Key) -> Option<&mut Self::Item>;

    fn put(&mut self, key: Self::Key, item: Self::Item);
}

impl<K, V, S> MapSink for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Reify,
    S: BuildHasher,
{
    type Key = K;
    type Item = V;

    fn item_mut(&mut self, key: &K) -> Option<&mut V> {
        self.get_mut(key)
    }

    fn put(&mut self, key: K, item: V) {
        self.insert(key, item);
    }
}

impl<K, V> MapSink for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: Reify,
{
    type Key = K;
    type Item = V;

    fn item_mut(&mut self, key: &K) -> Option<&mut V> {
        self.get_mut(key)
    }

    fn put(&mut self, key: K, item: V) {
        self.insert(key, item);
    }
}

fn check_key_type<M: MapSink>(field: &FieldOptions<'_>, config: &Config) -> Result<()> {
    if <M::Key as MapKey>::STRING_COMPATIBLE {
        return Ok(());
    }
    Err(ConfigError::KeyTypeInvalid {
        type_name: std::any::type_name::<M::Key>(),
        context: field.context_meta(config.meta()),
    })
}

/// Merges every field of `config` into `map`.
///
/// Existing entries are merged through the merge engine; absent ones are
/// reified fresh. Entries without a counterpart in `config` are kept.
fn fill_map<M: MapSink>(map: &mut M, field: &FieldOptions<'_>, config: &Config) -> Result<()> {
    check_key_type::<M>(field, config)?;
    for (name, value) in config.fields() {
        let child = field.child(name);
        let key = <M::Key as MapKey>::from_key(name).ok_or_else(|| ConfigError::KeyTypeInvalid {
            type_name: std::any::type_name::<M::Key>(),
            context: child.context(value),
        })?;
        match map.item_mut(&key) {
            Some(existing) => merge_value(existing, &child, value)?,
            None => map.put(key, M::Item::reify_value(&child, value)?),
        }
    }
    Ok(())
}

macro_rules! reify_map {
    ($map:ident < K, V $(, $s:ident)? > where $($bound:tt)*) => {
        impl<K, V $(, $s)?> Reify for $map<K, V $(, $s)?>
        where
            $($bound)*
        {
            fn shape() -> Shape {
                Shape::Map
            }

            fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
                let mut map = Self::default();
                if value.is_nil() {
                    return Ok(map);
                }
                let config = object_of(field, value)?;
                fill_map(&mut map, field, config)?;
                validate_reified(field, &map, value.meta())?;
                Ok(map)
            }

            fn reify_merge(&mut self, field: &FieldOptions<'_>, value: &Value) -> Result<()> {
                let config = object_of(field, value)?;
                fill_map(self, field, config)?;
                validate_reified(field, self, value.meta())
            }

            fn reify_into(&mut self, field: &FieldOptions<'_>, config: &Config) -> Result<()> {
                tracing::trace!("Reifying {} keys into map at '{}'", config.len(), field.path());
                fill_map(self, field, config)?;
                validate_reified(field, self, config.meta())
            }

            fn inspect(&self) -> Inspect<'_> {
                Inspect::Map(self.len())
            }
        }
    };
}

reify_map!(HashMap<K, V, S> where K: MapKey + Eq + Hash, V: Reify, S: BuildHasher + Default);
reify_map!(BTreeMap<K, V> where K: MapKey + Ord, V: Reify);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::service::validate::Directive;
    use crate::service::{unpack, Options};
    use std::sync::Arc;

    #[test]
    fn test_fresh_map() {
        let cfg = Config::new().with("a", 1i64).with("b", 2i64);
        let mut map: HashMap<String, u32> = HashMap::new();
        unpack(Some(&cfg), &mut map, &Options::default()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["b"], 2);
    }

    #[test]
    fn test_btree_map_with_arc_keys() {
        let cfg = Config::new().with("z", "last").with("a", "first");
        let mut map: BTreeMap<Arc<str>, String> = BTreeMap::new();
        unpack(Some(&cfg), &mut map, &Options::default()).unwrap();
        let keys: Vec<&str> = map.keys().map(|k| &**k).collect();
        assert_eq!(keys, vec!["a", "z"]);
    }

    #[test]
    fn test_integer_keys_rejected() {
        let cfg = Config::new().with("1", "one");
        let mut map: HashMap<i32, String> = HashMap::new();
        let err = unpack(Some(&cfg), &mut map, &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyTypeInvalid);
    }

    #[test]
    fn test_empty_config_leaves_map_untouched() {
        let mut map: HashMap<String, i64> = HashMap::new();
        map.insert("keep".to_string(), 1);
        unpack(Some(&Config::new()), &mut map, &Options::default()).unwrap();
        assert_eq!(map.get("keep"), Some(&1));
    }

    #[test]
    fn test_existing_entries_merge() {
        let mut map: HashMap<String, HashMap<String, i64>> = HashMap::new();
        let first = Config::new().with("limits", Config::new().with("cpu", 1i64));
        let second = Config::new().with("limits", Config::new().with("mem", 2i64));
        unpack(Some(&first), &mut map, &Options::default()).unwrap();
        unpack(Some(&second), &mut map, &Options::default()).unwrap();
        assert_eq!(map["limits"].len(), 2);
        assert_eq!(map["limits"]["cpu"], 1);
    }

    #[test]
    fn test_scalar_is_not_a_map() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let err = HashMap::<String, i64>::reify_value(&field, &Value::int(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpectedObject);
    }

    #[test]
    fn test_nil_is_empty_map() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let map = BTreeMap::<String, i64>::reify_value(&field, &Value::nil()).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_map_validators_see_length() {
        let opts = Options::default();
        let root = FieldOptions::new(&opts);
        let directives = Directive::parse_list("max=1");
        let field = root.child_with("labels", &directives);
        let value = Value::object(Config::new().with("a", "x").with("b", "y"));
        let err = HashMap::<String, String>::reify_value(&field, &value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }
}
