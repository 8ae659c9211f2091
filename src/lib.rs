// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture configuration reification crate.
//!
//! This crate populates statically typed Rust values from an untyped
//! configuration tree. A parser (out of scope for this crate) produces a
//! [`Config`](domain::Config) of [`Value`](domain::Value)s; the engine walks
//! the destination type and converts, merges and validates the data into it.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The configuration tree (`Config`, `Value`, `Meta`), shape
//!   classification and errors
//! - **Ports**: Trait definitions that define interfaces (`Reify`, `ReifyStruct`, `Validator`)
//! - **Adapters**: Built-in converters (durations, regular expressions), validators and
//!   the YAML tree adapter
//! - **Service**: The reification engine: options, merge engine, path resolver and the
//!   per-shape reifiers
//!
//! # Features
//!
//! - **Merging**: Object shaped destinations (structs, maps, configs) merge structurally;
//!   sequences and scalars are replaced
//! - **Type Safety**: Range-checked numeric narrowing and variant-aware coercion
//! - **Squash and Paths**: Flatten nested structs into their parent, or address nested keys
//!   with a path separator
//! - **Validation**: Per-field validator directives and struct-level checks, reported with
//!   source provenance
//! - **Extensible**: Register converters for your own types and validators by name
//!
//! # Feature Flags
//!
//! - `yaml`: Enable conversion of `serde_yaml` documents into configuration trees (default)
//!
//! # Quick Start
//!
//! ```rust
//! use reifycfg::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default)]
//! struct Database {
//!     host: String,
//!     port: u16,
//! }
//!
//! reify_struct! {
//!     Database {
//!         host: validate("required"),
//!         port: validate("min=1"),
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! struct App {
//!     name: String,
//!     timeout: Duration,
//!     db: Database,
//! }
//!
//! reify_struct! {
//!     App { name, timeout, db }
//! }
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let cfg = Config::new()
//!     .with("name", "billing")
//!     .with("timeout", "1m30s")
//!     .with("db", Config::new().with("host", "db.internal").with("port", 5432i64));
//!
//! let mut app = App::default();
//! cfg.unpack(&mut app)?;
//!
//! assert_eq!(app.timeout, Duration::from_secs(90));
//! assert_eq!(app.db.port, 5432);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{Config, ConfigError, ErrorKind, Meta, Result, Value};
    pub use crate::ports::{Reify, ReifyStruct, Validator};
    pub use crate::service::{unpack, Options, OptionsBuilder};
    pub use crate::{reify_extension, reify_struct};

    // Re-export adapters based on feature flags
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlTreeAdapter;
}
