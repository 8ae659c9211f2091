// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the reification engine.
//!
//! The engine walks a destination type, described through [`Reify`], against
//! a [`Config`] tree. Entry points are [`unpack`] and
//! [`Config::unpack`](crate::domain::Config::unpack).
//!
//! [`Reify`]: crate::ports::Reify
//! [`Config`]: crate::domain::Config

mod convert;
mod map;
pub mod merge;
mod options;
mod path;
mod pointer;
pub mod primitive;
mod sequence;
pub mod structure;
mod tree;
mod unpack;
mod validate;

// Re-export commonly used types
pub use convert::ConverterRegistry;
pub use merge::{merge_action, merge_value, MergeAction};
pub use options::{FieldOptions, Options, OptionsBuilder};
pub use path::resolve_path;
pub use unpack::unpack;
pub use validate::{Directive, ValidatorRegistry, REQUIRED};
