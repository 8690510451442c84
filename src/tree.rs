//! The field-shaped error tree handed to the rendering layer.
//!
//! An [`ErrorTree`] mirrors the shape of the form data it describes: records
//! for objects, sparse lists for arrays, and messages at the failing leaves.
//! The error for any field is found by walking the tree with the field's
//! [`FieldPath`].

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::warn;

use crate::path::{FieldPath, PathSegment};

/// Key under which a form-wide error message is stored.
pub const FORM_ERROR: &str = "FINAL_FORM/form-error";

/// A nested error structure mirroring form data.
///
/// # Example
///
/// ```rust
/// use formbind::{ErrorTree, FieldPath};
///
/// let left = ErrorTree::field("foo", ErrorTree::field("bar", ErrorTree::message("required")));
/// let right = ErrorTree::field("foo", ErrorTree::field("baz", ErrorTree::message("too short")));
///
/// let merged = left.merge(right);
/// assert_eq!(merged.message_at(&FieldPath::parse("foo.bar").unwrap()), Some("required"));
/// assert_eq!(merged.message_at(&FieldPath::parse("foo.baz").unwrap()), Some("too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorTree {
    /// The message for a failing field.
    Message(String),
    /// Errors for array elements, aligned by index. `None` marks an element without errors.
    List(Vec<Option<ErrorTree>>),
    /// Errors for object properties. Properties without errors are absent.
    Record(IndexMap<String, ErrorTree>),
}

impl ErrorTree {
    /// Creates a tree with no errors.
    pub fn empty() -> Self {
        ErrorTree::Record(IndexMap::new())
    }

    /// Creates a leaf message.
    pub fn message(message: impl Into<String>) -> Self {
        ErrorTree::Message(message.into())
    }

    /// Creates a record with a single property.
    pub fn field(key: impl Into<String>, child: ErrorTree) -> Self {
        let mut record = IndexMap::with_capacity(1);
        record.insert(key.into(), child);
        ErrorTree::Record(record)
    }

    /// Creates a list of length `index + 1` whose only entry is at `index`.
    pub fn element(index: usize, child: ErrorTree) -> Self {
        let mut items = vec![None; index];
        items.push(Some(child));
        ErrorTree::List(items)
    }

    /// Creates a tree holding only a form-wide message.
    ///
    /// Submit handlers return this to report failures that belong to no
    /// single field.
    pub fn form_level(message: impl Into<String>) -> Self {
        Self::field(FORM_ERROR, Self::message(message))
    }

    /// Combines two trees without losing errors from either side.
    ///
    /// Records are merged key by key and lists index by index, padding the
    /// shorter list. In every other case `self` wins: two messages for the
    /// same field keep the first, and a record/list conflict keeps `self`
    /// and drops `other`.
    pub fn merge(self, other: ErrorTree) -> ErrorTree {
        match (self, other) {
            (ErrorTree::Record(left), ErrorTree::Record(mut right)) => {
                let mut merged: IndexMap<String, ErrorTree> = left
                    .into_iter()
                    .map(|(key, value)| {
                        let value = match right.shift_remove(&key) {
                            Some(other) => value.merge(other),
                            None => value,
                        };
                        (key, value)
                    })
                    .collect();
                merged.extend(right);
                ErrorTree::Record(merged)
            }
            (ErrorTree::List(left), ErrorTree::List(right)) => {
                let len = left.len().max(right.len());
                let mut left = left.into_iter();
                let mut right = right.into_iter();
                ErrorTree::List(
                    (0..len)
                        .map(|_| merge_slots(left.next().flatten(), right.next().flatten()))
                        .collect(),
                )
            }
            (left @ ErrorTree::Message(_), ErrorTree::Message(_)) => left,
            (left, right) => {
                warn!(
                    kept = left.kind(),
                    dropped = right.kind(),
                    "conflicting error shapes at the same position"
                );
                left
            }
        }
    }

    /// Returns true if the tree holds no errors at all.
    pub fn is_empty(&self) -> bool {
        match self {
            ErrorTree::Message(_) => false,
            ErrorTree::List(items) => items.iter().flatten().all(ErrorTree::is_empty),
            ErrorTree::Record(record) => record.values().all(ErrorTree::is_empty),
        }
    }

    /// Returns the subtree at `path`, if there is one.
    pub fn get(&self, path: &FieldPath) -> Option<&ErrorTree> {
        path.segments()
            .try_fold(self, |node, segment| match (node, segment) {
                (ErrorTree::Record(record), PathSegment::Field(key)) => record.get(key),
                (ErrorTree::List(items), PathSegment::Index(index)) => {
                    items.get(*index).and_then(Option::as_ref)
                }
                _ => None,
            })
    }

    /// Returns the message at `path` when that position is a leaf.
    pub fn message_at(&self, path: &FieldPath) -> Option<&str> {
        match self.get(path)? {
            ErrorTree::Message(message) => Some(message),
            _ => None,
        }
    }

    /// Returns the form-wide message, if any.
    pub fn form_error(&self) -> Option<&str> {
        self.message_at(&FieldPath::from_field(FORM_ERROR))
    }

    /// Returns every leaf message with its path, depth first.
    pub fn leaves(&self) -> Vec<(FieldPath, &str)> {
        let mut leaves = Vec::new();
        collect_leaves(self, FieldPath::root(), &mut leaves);
        leaves
    }

    /// Returns the number of leaf messages.
    pub fn leaf_count(&self) -> usize {
        match self {
            ErrorTree::Message(_) => 1,
            ErrorTree::List(items) => items.iter().flatten().map(ErrorTree::leaf_count).sum(),
            ErrorTree::Record(record) => record.values().map(ErrorTree::leaf_count).sum(),
        }
    }

    /// Converts the tree into JSON; list gaps become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            ErrorTree::Message(message) => Value::String(message.clone()),
            ErrorTree::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.as_ref().map_or(Value::Null, ErrorTree::to_json))
                    .collect(),
            ),
            ErrorTree::Record(record) => Value::Object(
                record
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ErrorTree::Message(_) => "message",
            ErrorTree::List(_) => "list",
            ErrorTree::Record(_) => "record",
        }
    }
}

impl Default for ErrorTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<ErrorTree> for Value {
    fn from(tree: ErrorTree) -> Self {
        tree.to_json()
    }
}

fn merge_slots(left: Option<ErrorTree>, right: Option<ErrorTree>) -> Option<ErrorTree> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.merge(right)),
        (left, right) => left.or(right),
    }
}

fn collect_leaves<'a>(node: &'a ErrorTree, path: FieldPath, out: &mut Vec<(FieldPath, &'a str)>) {
    match node {
        ErrorTree::Message(message) => out.push((path, message)),
        ErrorTree::List(items) => {
            for (index, item) in items.iter().enumerate() {
                if let Some(item) = item {
                    collect_leaves(item, path.push_index(index), out);
                }
            }
        }
        ErrorTree::Record(record) => {
            for (key, value) in record {
                collect_leaves(value, path.push_field(key), out);
            }
        }
    }
}
