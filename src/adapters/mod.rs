// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing the built-in converters, validators and tree
//! adapters.
//!
//! The converters and validators here are registered in the default
//! [`Options`](crate::service::Options). Tree adapters turn documents from
//! external parsers into [`Config`](crate::domain::Config) trees.

pub mod duration;
pub mod regexp;
pub mod validators;
#[cfg(feature = "yaml")]
pub mod yaml;

// Re-export adapters based on feature flags
pub use duration::parse_duration;
#[cfg(feature = "yaml")]
pub use yaml::YamlTreeAdapter;
