//! The decoder trait shared by every codec.
//!
//! A [`Decoder`] checks an input value against a shape and either returns the
//! decoded value or every failure it found. Each failure carries the
//! [`Context`] walked to reach it, which is what the error-tree renderer
//! consumes.

use serde_json::Value;
use stillwater::Validation;

use crate::context::{Context, TypeTag};
use crate::error::{ErrorEntries, ErrorEntry};

/// A codec that decodes JSON form data.
///
/// Implementations append one frame to the context for every step into a
/// child value (a property or an array element) and report failures at the
/// context of the value that failed.
///
/// # Example
///
/// ```rust
/// use formbind::{Codec, Decoder};
/// use serde_json::json;
///
/// let codec = Codec::object()
///     .field("name", Codec::string())
///     .field("age", Codec::number_from_string());
///
/// assert!(codec.decode(&json!({"name": "Ada", "age": "36"})).is_success());
///
/// let errors = codec.decode(&json!({"age": "old"})).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub trait Decoder: Send + Sync {
    /// The kind of this codec, recorded in every frame it decodes.
    fn tag(&self) -> TypeTag;

    /// Decodes `input` at `context`. `None` means the value was missing.
    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value, ErrorEntries>;

    /// Property names this codec knows about. Empty for non-object codecs.
    fn props(&self) -> Vec<String> {
        Vec::new()
    }

    /// Decodes a whole form value, starting from a root frame.
    fn decode(&self, input: &Value) -> Validation<Value, ErrorEntries> {
        let context = Context::root(self.tag(), Some(input));
        self.validate(Some(input), &context)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn tag(&self) -> TypeTag {
        (**self).tag()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value, ErrorEntries> {
        (**self).validate(input, context)
    }

    fn props(&self) -> Vec<String> {
        (**self).props()
    }
}

/// A type failure at `context`, carrying the custom message if one was set.
pub(crate) fn type_failure(
    input: Option<&Value>,
    context: &Context,
    message: Option<&String>,
) -> Validation<Value, ErrorEntries> {
    let mut entry = ErrorEntry::new(context.clone(), input.cloned());
    if let Some(message) = message {
        entry = entry.with_message(message.clone());
    }
    Validation::Failure(ErrorEntries::single(entry))
}
