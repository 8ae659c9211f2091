// SPDX-License-Identifier: MIT OR Apache-2.0

//! Public entry points.

use crate::domain::{Config, ConfigError, Result};
use crate::ports::Reify;
use crate::service::{FieldOptions, Options};

/// Populates `to` from `config`.
///
/// The destination must be object shaped: a registered struct, a string-keyed
/// map, a [`Config`], or an `Option`/`Box` of one of those. Fields already set
/// in `to` are merged with the incoming data. The first error aborts the call;
/// fields written before it keep their new values.
///
/// # Errors
///
/// Returns [`ConfigError::NilConfig`] if `config` is `None` and
/// [`ConfigError::InvalidTopLevelType`] if `T` is not object shaped.
///
/// # Examples
///
/// ```rust
/// use reifycfg::domain::Config;
/// use reifycfg::service::{unpack, Options};
/// use std::collections::HashMap;
///
/// let cfg = Config::new().with("retries", 3i64).with("backoff", 10i64);
/// let mut limits: HashMap<String, u32> = HashMap::new();
/// unpack(Some(&cfg), &mut limits, &Options::default()).unwrap();
/// assert_eq!(limits["retries"], 3);
/// ```
pub fn unpack<T: Reify>(config: Option<&Config>, to: &mut T, options: &Options) -> Result<()> {
    let config = config.ok_or(ConfigError::NilConfig)?;
    tracing::debug!(
        "Unpacking {} keys into {} ({} shape)",
        config.len(),
        std::any::type_name::<T>(),
        T::shape()
    );
    to.reify_into(&FieldOptions::new(options), config)
}

impl Config {
    /// Populates `to` from this config with the default options.
    ///
    /// See [`unpack`].
    pub fn unpack<T: Reify>(&self, to: &mut T) -> Result<()> {
        unpack(Some(self), to, &Options::default())
    }

    /// Populates `to` from this config with the given options.
    pub fn unpack_with<T: Reify>(&self, to: &mut T, options: &Options) -> Result<()> {
        unpack(Some(self), to, options)
    }
}
