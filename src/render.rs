//! Rendering a single failure path into an error-tree fragment.

use std::num::IntErrorKind;

use serde_json::Value;
use tracing::warn;

use crate::classify::{is_array_frame, is_intersection_frame};
use crate::context::{Context, ContextFrame};
use crate::error::MalformedPath;
use crate::tree::ErrorTree;

/// Largest index accepted when the frame recorded no array value.
const MAX_UNSEEN_INDEX: usize = 1 << 16;

/// Renders the frames of `context` below its root into a single-path tree.
///
/// `leaf` produces the message for the failing field. It is only called once
/// the whole path has been placed, so a malformed path never evaluates it.
///
/// When the root decodes an intersection, the first frame below it names the
/// intersection branch rather than a field and gets no nesting level.
pub(crate) fn render_path<F>(context: &Context, leaf: F) -> ErrorTree
where
    F: FnOnce() -> String,
{
    let flatten_branch = context.root_frame().is_some_and(is_intersection_frame);
    render(context.below_root(), flatten_branch, leaf)
}

/// Renders `frames`, where `skip_key` means the first frame was already
/// placed one level up (an array index or an intersection branch).
fn render<F>(frames: &[ContextFrame], skip_key: bool, leaf: F) -> ErrorTree
where
    F: FnOnce() -> String,
{
    let Some((frame, rest)) = frames.split_first() else {
        return ErrorTree::Message(leaf());
    };

    if is_array_frame(frame) {
        let node = match element_index(frame, rest) {
            Ok(index) => ErrorTree::element(index, render(rest, true, leaf)),
            Err(malformed) => {
                warn!(key = %frame.key, error = %malformed, "malformed failure path");
                ErrorTree::Message(malformed.to_string())
            }
        };
        // An array directly inside an array element nests as a bare list.
        if skip_key {
            node
        } else {
            ErrorTree::field(frame.key.clone(), node)
        }
    } else if skip_key {
        render(rest, false, leaf)
    } else {
        ErrorTree::field(frame.key.clone(), render(rest, false, leaf))
    }
}

/// Reads the array index from the frame following an array frame.
///
/// The index must address an element of the array seen at `frame`, so a
/// hand-built path can never size a list beyond the data it describes.
fn element_index(frame: &ContextFrame, rest: &[ContextFrame]) -> Result<usize, MalformedPath> {
    let next = rest.first().ok_or(MalformedPath::MissingIndex)?;
    let index = next.key.parse::<usize>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => MalformedPath::IndexOutOfRange(next.key.clone()),
        _ => MalformedPath::NonIntegerIndex(next.key.clone()),
    })?;

    let bound = match frame.actual() {
        Some(Value::Array(items)) => items.len(),
        _ => MAX_UNSEEN_INDEX,
    };
    if index < bound {
        Ok(index)
    } else {
        Err(MalformedPath::IndexOutOfRange(next.key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TypeTag;
    use serde_json::{json, Value};

    const MSG: &str = "This field is invalid.";

    fn root() -> Context {
        Context::root(TypeTag::Exact(Box::new(TypeTag::Interface)), Some(&json!({})))
    }

    fn rendered(context: &Context) -> Value {
        render_path(context, || MSG.to_string()).to_json()
    }

    #[test]
    fn test_flat_field() {
        let context = root().append("foo", TypeTag::String, None);
        assert_eq!(rendered(&context), json!({"foo": MSG}));
    }

    #[test]
    fn test_nested_field() {
        let context = root()
            .append("foo", TypeTag::Interface, Some(&json!({})))
            .append("bar", TypeTag::String, None);
        assert_eq!(rendered(&context), json!({"foo": {"bar": MSG}}));
    }

    #[test]
    fn test_array_element() {
        let context = root()
            .append("foo", TypeTag::ReadonlyArray, Some(&json!(["a", null, "b"])))
            .append("2", TypeTag::String, Some(&Value::Null));
        assert_eq!(rendered(&context), json!({"foo": [null, null, MSG]}));
    }

    #[test]
    fn test_array_element_property() {
        let context = root()
            .append("foo", TypeTag::Array, Some(&json!([{}, {}])))
            .append("1", TypeTag::Interface, Some(&json!({})))
            .append("bar", TypeTag::String, None);
        assert_eq!(rendered(&context), json!({"foo": [null, {"bar": MSG}]}));
    }

    #[test]
    fn test_nested_arrays() {
        let context = root()
            .append("grid", TypeTag::Array, Some(&json!([[], ["a", 1]])))
            .append("1", TypeTag::Array, Some(&json!(["a", 1])))
            .append("1", TypeTag::String, Some(&json!(1)));
        assert_eq!(rendered(&context), json!({"grid": [null, [null, MSG]]}));
    }

    #[test]
    fn test_runtime_array_without_tag() {
        let context = root()
            .append("tags", TypeTag::Other("UnknownType".to_string()), Some(&json!(["x", 3])))
            .append("1", TypeTag::String, Some(&json!(3)));
        assert_eq!(rendered(&context), json!({"tags": [null, MSG]}));
    }

    #[test]
    fn test_numeric_object_key_stays_a_field() {
        let context = root()
            .append("foo", TypeTag::Interface, Some(&json!({"0": 1})))
            .append("0", TypeTag::String, Some(&json!(1)));
        assert_eq!(rendered(&context), json!({"foo": {"0": MSG}}));
    }

    #[test]
    fn test_intersection_branch_is_flattened() {
        let context = Context::root(TypeTag::Exact(Box::new(TypeTag::Intersection)), Some(&json!({})))
            .append("0", TypeTag::Interface, Some(&json!({})))
            .append("foo", TypeTag::String, None);
        assert_eq!(rendered(&context), json!({"foo": MSG}));
    }

    #[test]
    fn test_intersection_only_flattens_first_frame() {
        let context = Context::root(TypeTag::Intersection, Some(&json!({})))
            .append("1", TypeTag::Partial, Some(&json!({})))
            .append("address", TypeTag::Interface, Some(&json!({})))
            .append("city", TypeTag::String, None);
        assert_eq!(rendered(&context), json!({"address": {"city": MSG}}));
    }

    #[test]
    fn test_missing_index_frame() {
        let context = root().append("foo", TypeTag::ReadonlyArray, Some(&json!("not a list")));
        assert_eq!(
            rendered(&context),
            json!({"foo": "Expected next context entry to exist."})
        );
    }

    #[test]
    fn test_non_integer_index() {
        let context = root()
            .append("foo", TypeTag::Array, Some(&json!([])))
            .append("first", TypeTag::String, None);
        assert_eq!(rendered(&context), json!({"foo": "Index [first] not an integer"}));

        let negative = root()
            .append("foo", TypeTag::Array, Some(&json!([])))
            .append("-1", TypeTag::String, None);
        assert_eq!(rendered(&negative), json!({"foo": "Index [-1] not an integer"}));
    }

    #[test]
    fn test_index_out_of_range() {
        let past_end = root()
            .append("foo", TypeTag::Array, Some(&json!(["a", "b"])))
            .append("2", TypeTag::String, None);
        assert_eq!(rendered(&past_end), json!({"foo": "Index [2] out of range"}));

        let huge = root()
            .append("foo", TypeTag::Array, Some(&json!([])))
            .append("18446744073709551615", TypeTag::String, None);
        assert_eq!(
            rendered(&huge),
            json!({"foo": "Index [18446744073709551615] out of range"})
        );

        let overflow = root()
            .append("foo", TypeTag::Array, None)
            .append("99999999999999999999999", TypeTag::String, None);
        assert_eq!(
            rendered(&overflow),
            json!({"foo": "Index [99999999999999999999999] out of range"})
        );
    }

    #[test]
    fn test_index_capped_without_array_value() {
        let within = root()
            .append("foo", TypeTag::Array, None)
            .append("3", TypeTag::String, None);
        assert_eq!(rendered(&within), json!({"foo": [null, null, null, MSG]}));

        let beyond = root()
            .append("foo", TypeTag::Array, None)
            .append("4294967296", TypeTag::String, None);
        assert_eq!(rendered(&beyond), json!({"foo": "Index [4294967296] out of range"}));
    }

    #[test]
    fn test_out_of_range_entry_keeps_other_errors() {
        let entries = vec![
            crate::ErrorEntry::new(
                root()
                    .append("foo", TypeTag::Array, Some(&json!([])))
                    .append("18446744073709551615", TypeTag::String, None),
                None,
            ),
            crate::ErrorEntry::new(root().append("bar", TypeTag::String, None), None),
        ];

        let tree = crate::to_validation_errors(&entries, |_| MSG.to_string());

        assert_eq!(
            tree.to_json(),
            json!({"foo": "Index [18446744073709551615] out of range", "bar": MSG})
        );
    }

    #[test]
    fn test_root_only_path_is_a_bare_message() {
        assert_eq!(render_path(&root(), || MSG.to_string()), ErrorTree::message(MSG));
    }

    #[test]
    fn test_leaf_not_evaluated_for_malformed_path() {
        let context = root().append("foo", TypeTag::Array, Some(&json!([])));
        let tree = render_path(&context, || panic!("leaf message must not be computed"));
        assert_eq!(tree.leaf_count(), 1);
    }
}
