// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the traits that connect destination types and checks
//! to the reification engine. Destination types implement [`Reify`]; struct
//! types additionally describe their fields through [`ReifyStruct`]; named
//! checks implement [`Validator`].

pub mod reify;
pub mod validator;

// Re-export commonly used types
pub use reify::{FieldDescriptor, MapKey, Reify, ReifyField, ReifyStruct};
pub use validator::Validator;
