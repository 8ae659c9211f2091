// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the configuration tree model.
//!
//! This module holds the untyped configuration tree ([`Value`], [`Config`]),
//! the shape classification of destination types and the error types. It has
//! no knowledge of how trees are produced or how destinations are populated.

pub mod config;
pub mod errors;
pub mod shape;
pub mod value;

// Re-export commonly used types
pub use config::{merge_config, Config};
pub use errors::{ConfigError, ErrorContext, ErrorKind, Result};
pub use shape::{Inspect, Shape};
pub use value::{Meta, Value, ValueKind};
