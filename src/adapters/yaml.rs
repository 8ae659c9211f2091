// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML tree adapter.
//!
//! Converts an already parsed `serde_yaml::Value` into a [`Config`] tree.
//! Every produced value carries the adapter's source name as provenance.

use crate::domain::{Config, ConfigError, Meta, Result, Value};
use std::sync::Arc;

/// Converts `serde_yaml` documents into configuration trees.
///
/// # Examples
///
/// ```rust
/// use reifycfg::adapters::YamlTreeAdapter;
///
/// let doc: serde_yaml::Value = serde_yaml::from_str("db:\n  host: localhost\n  port: 5432\n").unwrap();
/// let cfg = YamlTreeAdapter::new("app.yaml").to_config(&doc).unwrap();
///
/// let db = cfg.get("db").unwrap().to_config().unwrap();
/// assert_eq!(db.get("port").unwrap().to_int().unwrap(), 5432);
/// ```
#[derive(Debug, Clone)]
pub struct YamlTreeAdapter {
    meta: Arc<Meta>,
}

impl YamlTreeAdapter {
    /// Creates an adapter tagging values with the given source name.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            meta: Arc::new(Meta::new(source)),
        }
    }

    /// The provenance attached to converted values.
    pub fn meta(&self) -> &Arc<Meta> {
        &self.meta
    }

    /// Converts a YAML mapping into a config.
    ///
    /// A null document yields an empty config.
    pub fn to_config(&self, doc: &serde_yaml::Value) -> Result<Config> {
        match doc {
            serde_yaml::Value::Null => Ok(Config::new().with_meta(Arc::clone(&self.meta))),
            serde_yaml::Value::Mapping(map) => self.mapping(map),
            serde_yaml::Value::Tagged(tagged) => self.to_config(&tagged.value),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "{}: document root must be a mapping, found {}",
                    self.meta.source,
                    kind_name(other)
                ),
            }),
        }
    }

    /// Converts any YAML node into a value.
    pub fn to_value(&self, node: &serde_yaml::Value) -> Result<Value> {
        let value = match node {
            serde_yaml::Value::Null => Value::nil(),
            serde_yaml::Value::Bool(b) => Value::bool(*b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::uint(u)
                } else {
                    Value::float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_yaml::Value::String(s) => Value::string(s.as_str()),
            serde_yaml::Value::Sequence(items) => Value::array(
                items
                    .iter()
                    .map(|item| self.to_value(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_yaml::Value::Mapping(map) => Value::object(self.mapping(map)?),
            serde_yaml::Value::Tagged(tagged) => return self.to_value(&tagged.value),
        };
        Ok(value.with_meta(Arc::clone(&self.meta)))
    }

    fn mapping(&self, map: &serde_yaml::Mapping) -> Result<Config> {
        let mut config = Config::new().with_meta(Arc::clone(&self.meta));
        for (key, node) in map {
            config.insert(self.key(key)?, self.to_value(node)?);
        }
        tracing::trace!("Converted YAML mapping with {} keys from {}", config.len(), self.meta.source);
        Ok(config)
    }

    fn key(&self, key: &serde_yaml::Value) -> Result<String> {
        match key {
            serde_yaml::Value::String(s) => Ok(s.clone()),
            serde_yaml::Value::Number(n) => Ok(n.to_string()),
            serde_yaml::Value::Bool(b) => Ok(b.to_string()),
            serde_yaml::Value::Tagged(tagged) => self.key(&tagged.value),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "{}: unsupported mapping key of kind {}",
                    self.meta.source,
                    kind_name(other)
                ),
            }),
        }
    }
}

fn kind_name(node: &serde_yaml::Value) -> &'static str {
    match node {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged",
    }
}
