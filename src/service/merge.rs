// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge engine.
//!
//! Decides, for an existing destination value and an incoming source value,
//! whether the destination is built fresh, merged structurally, replaced, or
//! kept as it is.

use crate::domain::{Result, Shape, Value};
use crate::ports::Reify;
use crate::service::FieldOptions;

/// What the merge engine does with an existing destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeAction {
    /// The destination is an absent optional; build it from scratch.
    Fresh,
    /// Merge the incoming value into the destination structurally.
    Merge,
    /// Replace the destination wholesale.
    Replace,
    /// Leave the destination untouched.
    Keep,
}

/// Chooses the merge action for `dst` and `value`.
///
/// Object shaped destinations merge, sequences and scalars are replaced, and
/// optional or boxed destinations delegate to their content. A nil value never
/// clears an object shaped destination.
pub fn merge_action<T: Reify>(dst: &T, value: &Value) -> MergeAction {
    if dst.is_nil() {
        return MergeAction::Fresh;
    }
    match T::shape() {
        Shape::ConfigAlias | Shape::Map | Shape::Struct => {
            if value.is_nil() {
                MergeAction::Keep
            } else {
                MergeAction::Merge
            }
        }
        Shape::Pointer | Shape::Interface => MergeAction::Merge,
        Shape::Slice | Shape::Array(_) | Shape::Primitive => MergeAction::Replace,
    }
}

/// Merges `value` into the existing destination `dst`.
///
/// # Examples
///
/// ```rust
/// use reifycfg::domain::Value;
/// use reifycfg::service::{merge_value, FieldOptions, Options};
///
/// let opts = Options::default();
/// let field = FieldOptions::new(&opts);
///
/// let mut ports: Vec<u16> = vec![80, 443];
/// merge_value(&mut ports, &field, &Value::array(vec![8080i64])).unwrap();
/// assert_eq!(ports, vec![8080]);
/// ```
pub fn merge_value<T: Reify>(dst: &mut T, field: &FieldOptions<'_>, value: &Value) -> Result<()> {
    let action = merge_action(dst, value);
    tracing::debug!(
        "Merging {} value into '{}' ({} shape): {:?}",
        value.type_name(),
        field.path(),
        T::shape(),
        action
    );

    match action {
        MergeAction::Fresh | MergeAction::Replace => {
            *dst = T::reify_value(field, value)?;
        }
        MergeAction::Merge => dst.reify_merge(field, value)?,
        MergeAction::Keep => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Config;
    use crate::service::Options;
    use std::collections::HashMap;

    #[test]
    fn test_action_for_absent_optional() {
        let dst: Option<i32> = None;
        assert_eq!(merge_action(&dst, &Value::int(1)), MergeAction::Fresh);
    }

    #[test]
    fn test_action_for_present_optional() {
        let dst: Option<i32> = Some(3);
        assert_eq!(merge_action(&dst, &Value::int(1)), MergeAction::Merge);
    }

    #[test]
    fn test_action_for_sequences_and_scalars() {
        assert_eq!(
            merge_action(&vec![1i32], &Value::array(vec![2i64])),
            MergeAction::Replace
        );
        assert_eq!(
            merge_action(&[1i32, 2], &Value::array(vec![2i64, 3])),
            MergeAction::Replace
        );
        assert_eq!(merge_action(&5u8, &Value::int(6)), MergeAction::Replace);
    }

    #[test]
    fn test_action_for_objects() {
        let map: HashMap<String, i32> = HashMap::new();
        let obj = Value::object(Config::new().with("a", 1i64));
        assert_eq!(merge_action(&map, &obj), MergeAction::Merge);
        assert_eq!(merge_action(&map, &Value::nil()), MergeAction::Keep);
        assert_eq!(merge_action(&Config::new(), &obj), MergeAction::Merge);
    }

    #[test]
    fn test_merge_replaces_slice() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let mut dst = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        merge_value(&mut dst, &field, &Value::array(vec!["x"])).unwrap();
        assert_eq!(dst, vec!["x".to_string()]);
    }

    #[test]
    fn test_merge_into_map_keeps_existing_entries() {
        let opts = Options::default();
        let field = FieldOptions::new(&opts);
        let mut dst: HashMap<String, i64> = HashMap::new();
        dst.insert("a".to_string(), 1);
        let value = Value::object(Config::new().with("b", 2i64));
        merge_value(&mut dst, &field, &value).unwrap();
        assert_eq!(dst.get("a"), Some(&1));
        assert_eq!(dst.get("b"), Some(&2));
    }
}
