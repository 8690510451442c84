//! Array codec.
//!
//! This module provides [`ArrayCodec`] for decoding arrays whose elements
//! all share one codec. Each element is decoded in its own context frame,
//! keyed by its index.

use serde_json::Value;
use stillwater::Validation;

use crate::context::{Context, TypeTag};
use crate::error::{ErrorEntries, ErrorEntry};

use super::traits::{type_failure, Decoder};

/// A codec for arrays of `D`.
///
/// Errors from every element are accumulated.
///
/// # Example
///
/// ```rust
/// use formbind::{Codec, Decoder};
/// use serde_json::json;
///
/// let codec = Codec::readonly_array(Codec::string());
///
/// let errors = codec.decode(&json!(["a", null, 3])).into_result().unwrap_err();
/// let indices: Vec<_> = errors
///     .iter()
///     .map(|e| e.context.last().unwrap().key.clone())
///     .collect();
/// assert_eq!(indices, vec!["1", "2"]);
/// ```
#[derive(Clone)]
pub struct ArrayCodec<D> {
    item: D,
    readonly: bool,
}

impl<D: Decoder> ArrayCodec<D> {
    /// Creates a codec for a mutable array.
    pub fn new(item: D) -> Self {
        Self {
            item,
            readonly: false,
        }
    }

    /// Creates a codec for a read-only array.
    pub fn readonly(item: D) -> Self {
        Self {
            item,
            readonly: true,
        }
    }
}

impl<D: Decoder> Decoder for ArrayCodec<D> {
    fn tag(&self) -> TypeTag {
        if self.readonly {
            TypeTag::ReadonlyArray
        } else {
            TypeTag::Array
        }
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value, ErrorEntries> {
        let Some(items) = input.and_then(Value::as_array) else {
            return type_failure(input, context, None);
        };

        let item_tag = self.item.tag();
        let mut errors: Vec<ErrorEntry> = Vec::new();
        let mut decoded = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let item_context = context.append(index.to_string(), item_tag.clone(), Some(item));
            match self.item.validate(Some(item), &item_context) {
                Validation::Success(value) => decoded.push(value),
                Validation::Failure(e) => errors.extend(e),
            }
        }

        if errors.is_empty() {
            Validation::Success(Value::Array(decoded))
        } else {
            Validation::Failure(ErrorEntries::from_vec(errors))
        }
    }
}
