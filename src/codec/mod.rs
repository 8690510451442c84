//! Codecs for decoding form data.
//!
//! A codec describes the shape of a form's data. Decoding either yields the
//! decoded value or every failure found, each tagged with the [`Context`]
//! frames leading to it. Those failure reports are what
//! [`to_validation_errors`](crate::to_validation_errors) turns into an
//! error tree.
//!
//! [`Context`]: crate::Context
//!
//! # Example
//!
//! ```rust
//! use formbind::{Codec, Decoder};
//! use serde_json::json;
//!
//! let codec = Codec::form(
//!     Codec::object().field("email", Codec::string().pattern("@").unwrap()),
//!     Codec::partial().field("nickname", Codec::string()),
//! );
//!
//! assert!(codec.decode(&json!({"email": "ada@example.com"})).is_success());
//! assert!(codec.decode(&json!({"email": "nope"})).is_failure());
//! ```

mod array;
mod combinators;
mod number;
mod object;
mod string;
mod traits;

pub use array::ArrayCodec;
pub use combinators::{ExactCodec, IntersectionCodec, WithMessage};
pub use number::NumberFromStringCodec;
pub use object::ObjectCodec;
pub use string::StringCodec;
pub use traits::Decoder;

use serde_json::Value;

/// Entry point for creating codecs.
pub struct Codec;

impl Codec {
    /// Creates a string codec.
    pub fn string() -> StringCodec {
        StringCodec::new()
    }

    /// Creates a codec that parses numeric text into a number.
    pub fn number_from_string() -> NumberFromStringCodec {
        NumberFromStringCodec::new()
    }

    /// Creates a codec for a mutable array of `item`.
    pub fn array<D: Decoder>(item: D) -> ArrayCodec<D> {
        ArrayCodec::new(item)
    }

    /// Creates a codec for a read-only array of `item`.
    pub fn readonly_array<D: Decoder>(item: D) -> ArrayCodec<D> {
        ArrayCodec::readonly(item)
    }

    /// Creates an object codec with required properties.
    pub fn object() -> ObjectCodec {
        ObjectCodec::required()
    }

    /// Creates an object codec whose properties may be absent.
    pub fn partial() -> ObjectCodec {
        ObjectCodec::partial()
    }

    /// Creates an empty intersection; add branches with `branch`.
    pub fn intersection() -> IntersectionCodec {
        IntersectionCodec::new()
    }

    /// Wraps `inner` so undeclared properties are stripped.
    pub fn exact<D: Decoder>(inner: D) -> ExactCodec<D> {
        ExactCodec::new(inner)
    }

    /// Wraps `inner` so any failure is reported with `message`.
    pub fn with_message<D, F>(inner: D, message: F) -> WithMessage<D, F>
    where
        D: Decoder,
        F: Fn(Option<&Value>) -> String + Send + Sync,
    {
        WithMessage::new(inner, message)
    }

    /// Builds the codec for a whole form from its required and optional fields.
    ///
    /// The result strips undeclared properties. When both halves declare
    /// fields they are combined in an intersection, required first.
    pub fn form(required: ObjectCodec, optional: ObjectCodec) -> ExactCodec<Box<dyn Decoder>> {
        let inner: Box<dyn Decoder> = if optional.is_empty() {
            Box::new(required)
        } else if required.is_empty() {
            Box::new(optional)
        } else {
            Box::new(IntersectionCodec::new().branch(required).branch(optional))
        };
        ExactCodec::new(inner)
    }
}
