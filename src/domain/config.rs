// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object nodes of the configuration tree.
//!
//! A [`Config`] maps string keys to [`Value`]s, keeping the order in which keys
//! were first inserted. Inserting an existing key replaces its value in place.

use crate::domain::value::{Meta, Value, ValueKind};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// An ordered mapping from string keys to values.
///
/// Fields live in a `Vec` and lookups scan it, so `get` and `insert` are
/// linear in the number of keys and [`merge_config`] is O(n·m). This suits
/// configuration objects, which rarely hold more than a few dozen keys.
///
/// Equality ignores key order and provenance.
///
/// # Examples
///
/// ```
/// use reifycfg::domain::{Config, Value};
///
/// let mut base = Config::new().with("host", "localhost").with("port", 80i64);
/// let overlay = Config::new().with("port", 8080i64);
/// base.merge(&overlay);
///
/// assert_eq!(base.get("host"), Some(&Value::string("localhost")));
/// assert_eq!(base.get("port"), Some(&Value::int(8080)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Config {
    fields: Vec<(String, Value)>,
    meta: Option<Arc<Meta>>,
}

impl Config {
    /// Creates an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches provenance to this config.
    pub fn with_meta(mut self, meta: impl Into<Arc<Meta>>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Returns the provenance of this config.
    pub fn meta(&self) -> Option<&Arc<Meta>> {
        self.meta.as_ref()
    }

    /// Inserts a field and returns `self`, for building trees inline.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a field, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(index).1)
    }

    /// Returns `true` if the config has a field named `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the config has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Deep-merges `other` into this config.
    ///
    /// See [`merge_config`].
    pub fn merge(&mut self, other: &Config) {
        merge_config(self, other);
    }
}

/// Deep-merges `src` into `dst`.
///
/// Keys missing from `dst` are inserted. When both sides hold an object for
/// the same key the objects are merged recursively, otherwise the value from
/// `src` wins. Nested objects in `dst` that are shared with other owners are
/// copied before being modified.
pub fn merge_config(dst: &mut Config, src: &Config) {
    for (key, value) in src.fields() {
        if let ValueKind::Object(src_sub) = value.kind() {
            if let Some(existing) = dst.get_mut(key) {
                if let ValueKind::Object(dst_sub) = existing.kind_mut() {
                    if !Arc::ptr_eq(dst_sub, src_sub) {
                        merge_config(Arc::make_mut(dst_sub), src_sub);
                    }
                    continue;
                }
            }
        }
        dst.insert(key, value.clone());
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.fields().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V> FromIterator<(K, V)> for Config
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Config::new();
        for (k, v) in iter {
            config.insert(k, v);
        }
        config
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields())
    }
}
