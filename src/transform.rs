//! Conversion of codec failures into a field-shaped error tree.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::ErrorEntry;
use crate::render::render_path;
use crate::tree::{ErrorTree, FORM_ERROR};

/// Converts decoding failures into an [`ErrorTree`] shaped like the form data.
///
/// Each entry is rendered along its failure path and the results are merged
/// in input order, so sibling and descendant errors end up in one tree and
/// array errors keep their indices. `default_message` is only called for
/// entries that carry no message of their own (or an empty one).
///
/// Every entry shows up in the result: malformed paths are stored as a
/// diagnostic message, and failures about the form value as a whole are
/// stored under [`FORM_ERROR`]. When two entries target the same field, the
/// first one wins. An empty input yields an empty tree.
///
/// # Example
///
/// ```rust
/// use formbind::{to_validation_errors, Codec, Decoder};
/// use serde_json::json;
///
/// let codec = Codec::form(
///     Codec::object()
///         .field("name", Codec::string())
///         .field("tags", Codec::readonly_array(Codec::string())),
///     Codec::partial(),
/// );
///
/// let errors = codec
///     .decode(&json!({"tags": ["a", null]}))
///     .into_result()
///     .unwrap_err();
///
/// let tree = to_validation_errors(&errors, |_| "This field is invalid.".to_string());
/// assert_eq!(
///     tree.to_json(),
///     json!({"name": "This field is invalid.", "tags": [null, "This field is invalid."]})
/// );
/// ```
pub fn to_validation_errors<'a, I, F>(entries: I, default_message: F) -> ErrorTree
where
    I: IntoIterator<Item = &'a ErrorEntry>,
    F: Fn(&ErrorEntry) -> String,
{
    let mut count = 0usize;
    let tree = entries
        .into_iter()
        .fold(ErrorTree::empty(), |accumulated, entry| {
            count += 1;
            let fragment = render_path(&entry.context, || {
                entry
                    .message
                    .clone()
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| default_message(entry))
            });
            accumulated.merge(into_record(fragment))
        });

    debug!(entries = count, leaves = tree.leaf_count(), "built validation error tree");
    tree
}

/// Keeps the root a record; anything else is a form-wide error.
fn into_record(fragment: ErrorTree) -> ErrorTree {
    match fragment {
        record @ ErrorTree::Record(_) => record,
        other => {
            let mut record = IndexMap::with_capacity(1);
            record.insert(FORM_ERROR.to_string(), other);
            ErrorTree::Record(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, TypeTag};
    use serde_json::json;
    use std::cell::Cell;

    fn root() -> Context {
        Context::root(TypeTag::Exact(Box::new(TypeTag::Interface)), Some(&json!({})))
    }

    fn invalid(_: &ErrorEntry) -> String {
        "This field is invalid.".to_string()
    }

    #[test]
    fn test_empty_input_is_empty_tree() {
        let entries: Vec<ErrorEntry> = Vec::new();
        let tree = to_validation_errors(&entries, invalid);
        assert_eq!(tree, ErrorTree::empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_own_message_wins_over_default() {
        let entries = vec![
            ErrorEntry::new(root().append("a", TypeTag::String, None), None).with_message("custom"),
            ErrorEntry::new(root().append("b", TypeTag::String, None), None),
        ];
        let tree = to_validation_errors(&entries, invalid);
        assert_eq!(tree.to_json(), json!({"a": "custom", "b": "This field is invalid."}));
    }

    #[test]
    fn test_empty_message_falls_back_to_default() {
        let entries = vec![
            ErrorEntry::new(root().append("a", TypeTag::String, None), None).with_message(""),
        ];
        let tree = to_validation_errors(&entries, invalid);
        assert_eq!(tree.to_json(), json!({"a": "This field is invalid."}));
    }

    #[test]
    fn test_default_message_is_lazy() {
        let calls = Cell::new(0);
        let entries = vec![
            ErrorEntry::new(root().append("a", TypeTag::String, None), None).with_message("custom"),
            ErrorEntry::new(root().append("b", TypeTag::Array, None), None),
            ErrorEntry::new(root().append("c", TypeTag::String, None), None),
        ];

        let tree = to_validation_errors(&entries, |entry| {
            calls.set(calls.get() + 1);
            format!("bad {}", entry.code)
        });

        assert_eq!(calls.get(), 1);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_default_message_sees_the_entry() {
        let entries = vec![
            ErrorEntry::new(root().append("age", TypeTag::String, None), None).with_code("required"),
        ];
        let tree = to_validation_errors(&entries, |entry| format!("{} ({})", entry.context, entry.code));
        assert_eq!(tree.to_json(), json!({"age": "age (required)"}));
    }

    #[test]
    fn test_root_failure_goes_to_form_error() {
        let entries = vec![
            ErrorEntry::new(root(), Some(json!({}))).with_message("passwords do not match"),
            ErrorEntry::new(root().append("a", TypeTag::String, None), None),
        ];
        let tree = to_validation_errors(&entries, invalid);

        assert_eq!(tree.form_error(), Some("passwords do not match"));
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_first_error_for_a_field_wins() {
        let entries = vec![
            ErrorEntry::new(root().append("a", TypeTag::String, None), None).with_message("first"),
            ErrorEntry::new(root().append("a", TypeTag::String, None), None).with_message("second"),
        ];
        let tree = to_validation_errors(&entries, invalid);
        assert_eq!(tree.to_json(), json!({"a": "first"}));
    }
}
