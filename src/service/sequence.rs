// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slice and fixed-size array destinations.

use crate::domain::{ConfigError, Inspect, Result, Shape, Value, ValueKind};
use crate::ports::Reify;
use crate::service::validate::run_validators;
use crate::service::FieldOptions;

/// Views `value` as a sequence.
///
/// Arrays yield their items, nil and empty objects yield nothing and any
/// other value is promoted to a one-element sequence.
pub(crate) fn cast_arr(value: &Value) -> &[Value] {
    if value.is_empty() {
        return &[];
    }
    match value.kind() {
        ValueKind::Array(items) => items,
        _ => std::slice::from_ref(value),
    }
}

/// Reifies every item; the field's validators run on each element.
fn reify_elements<T: Reify>(field: &FieldOptions<'_>, items: &[Value]) -> Result<Vec<T>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| T::reify_value(&field.element(index), item))
        .collect()
}

impl<T: Reify> Reify for Vec<T> {
    fn shape() -> Shape {
        Shape::Slice
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        if value.is_nil() {
            return Ok(Vec::new());
        }
        let items = cast_arr(value);
        tracing::trace!("Reifying {} elements into '{}'", items.len(), field.path());
        let out = reify_elements(field, items)?;
        run_validators(field, Inspect::Seq(out.len()), value.meta())?;
        Ok(out)
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Seq(self.len())
    }
}

impl<T: Reify, const N: usize> Reify for [T; N] {
    fn shape() -> Shape {
        Shape::Array(N)
    }

    fn reify_value(field: &FieldOptions<'_>, value: &Value) -> Result<Self> {
        let out: Vec<T> = if value.is_nil() {
            (0..N)
                .map(|index| T::reify_value(&field.child(&index.to_string()), value))
                .collect::<Result<_>>()?
        } else {
            let items = cast_arr(value);
            if items.len() != N {
                return Err(ConfigError::ArraySize {
                    expected: N,
                    actual: items.len(),
                    context: field.context(value),
                });
            }
            let out = reify_elements(field, items)?;
            run_validators(field, Inspect::Seq(N), value.meta())?;
            out
        };

        let actual = out.len();
        out.try_into().map_err(|_| ConfigError::ArraySize {
            expected: N,
            actual,
            context: field.context(value),
        })
    }

    fn inspect(&self) -> Inspect<'_> {
        Inspect::Seq(N)
    }
}
