// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shape classification of destination types.

use std::fmt;
use std::time::Duration;

/// The shape of a destination type, as seen by the reification engine.
///
/// Every type the engine can populate reports exactly one shape. Optional and
/// boxed types report [`Shape::Pointer`]; `Reify::base_shape` chases them to
/// the first non-pointer shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// The destination is itself a configuration object.
    ConfigAlias,
    /// A map with string keys.
    Map,
    /// A record with named fields.
    Struct,
    /// A variable-length sequence.
    Slice,
    /// A fixed-length sequence of the given length.
    Array(usize),
    /// An optional or boxed value.
    Pointer,
    /// Accepts any value verbatim.
    Interface,
    /// A scalar.
    Primitive,
}

impl Shape {
    /// Returns `true` for shapes that are populated from objects.
    pub fn is_object(&self) -> bool {
        matches!(self, Shape::ConfigAlias | Shape::Map | Shape::Struct)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::ConfigAlias => write!(f, "config"),
            Shape::Map => write!(f, "map"),
            Shape::Struct => write!(f, "struct"),
            Shape::Slice => write!(f, "slice"),
            Shape::Array(n) => write!(f, "array[{}]", n),
            Shape::Pointer => write!(f, "pointer"),
            Shape::Interface => write!(f, "interface"),
            Shape::Primitive => write!(f, "primitive"),
        }
    }
}

/// A read-only view of a reified value, handed to validators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Inspect<'a> {
    /// An absent optional or a nil value.
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(&'a str),
    /// A duration.
    Duration(Duration),
    /// A sequence with the given number of elements.
    Seq(usize),
    /// A map or config with the given number of entries.
    Map(usize),
    /// A struct.
    Struct,
    /// Anything else.
    Other,
}
