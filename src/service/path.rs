// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of path-like field names through nested objects.

use crate::domain::{Config, ConfigError, ErrorContext, Result};
use crate::service::options::join_path;
use crate::service::Options;

/// Resolves a field name to the object holding it and the final key.
///
/// Without a path separator the name is a single literal key in `config`.
/// With one, every segment but the last must name an object in the current
/// config; the resolver descends one level per segment and returns the last
/// segment as the key to look up. `base` is the dotted path of `config`, used
/// for error messages.
///
/// # Examples
///
/// ```
/// use reifycfg::domain::Config;
/// use reifycfg::service::{resolve_path, Options};
///
/// let cfg = Config::new().with("db", Config::new().with("host", "localhost"));
/// let opts = Options::builder().with_path_sep(".").build();
///
/// let (db, key) = resolve_path(&cfg, &opts, "db.host", "").unwrap();
/// assert_eq!(key, "host");
/// assert!(db.contains_key("host"));
/// ```
pub fn resolve_path<'c, 'n>(
    config: &'c Config,
    opts: &Options,
    name: &'n str,
    base: &str,
) -> Result<(&'c Config, &'n str)> {
    let Some(sep) = opts.path_sep() else {
        return Ok((config, name));
    };
    let Some((parents, key)) = name.rsplit_once(sep) else {
        return Ok((config, name));
    };

    let mut current = config;
    let mut walked = base.to_string();
    for segment in parents.split(sep) {
        let sub = current
            .get(segment)
            .ok_or_else(|| ConfigError::MissingField {
                field: segment.to_string(),
                context: ErrorContext::new(walked.clone(), current.meta().cloned()),
            })?;
        walked = join_path(&walked, segment);
        current = sub
            .to_config()
            .map(|c| &**c)
            .map_err(|_| ConfigError::ExpectedObject {
                found: sub.type_name(),
                context: ErrorContext::new(walked.clone(), sub.meta().cloned()),
            })?;
    }

    tracing::trace!("Resolved field '{}' to key '{}' under '{}'", name, key, walked);
    Ok((current, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, Value};

    fn dotted() -> Options {
        Options::builder().with_path_sep(".").build()
    }

    #[test]
    fn test_no_separator_is_literal() {
        let cfg = Config::new().with("db.host", "x");
        let opts = Options::default();
        let (from, key) = resolve_path(&cfg, &opts, "db.host", "").unwrap();
        assert_eq!(key, "db.host");
        assert_eq!(from.get(key), Some(&Value::string("x")));
    }

    #[test]
    fn test_single_segment() {
        let cfg = Config::new().with("host", "x");
        let opts = dotted();
        let (from, key) = resolve_path(&cfg, &opts, "host", "").unwrap();
        assert_eq!(key, "host");
        assert!(from.contains_key("host"));
    }

    #[test]
    fn test_descends_multiple_levels() {
        let cfg = Config::new().with(
            "a",
            Config::new().with("b", Config::new().with("c", 1i64)),
        );
        let opts = dotted();
        let (from, key) = resolve_path(&cfg, &opts, "a.b.c", "").unwrap();
        assert_eq!(from.get(key), Some(&Value::int(1)));
    }

    #[test]
    fn test_missing_segment() {
        let cfg = Config::new().with("other", 1i64);
        let opts = dotted();
        let err = resolve_path(&cfg, &opts, "db.host", "server").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredPathSegment);
        match err {
            ConfigError::MissingField { field, context } => {
                assert_eq!(field, "db");
                assert_eq!(context.path, "server");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_segment_not_an_object() {
        let cfg = Config::new().with("db", "postgres://");
        let opts = dotted();
        let err = resolve_path(&cfg, &opts, "db.host", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpectedObject);
    }

    #[test]
    fn test_custom_separator() {
        let cfg = Config::new().with("db", Config::new().with("host", "h"));
        let opts = Options::builder().with_path_sep("::").build();
        let (from, key) = resolve_path(&cfg, &opts, "db::host", "").unwrap();
        assert_eq!(from.get(key), Some(&Value::string("h")));
    }
}
