//! # Formbind
//!
//! Typed form binding: decode form data with a codec and turn every decoding
//! failure into an error tree shaped like the form itself.
//!
//! ## Overview
//!
//! A codec reports failures as a flat list of entries, each carrying the
//! context frames walked from the form root to the failing value. Form
//! rendering needs the opposite: for each field, the message to show next to
//! it. [`to_validation_errors`] renders every failure along its path and
//! merges the results, so that
//!
//! - nested fields end up nested (`{ address: { city: msg } }`),
//! - sibling errors share their parent instead of overwriting it,
//! - array errors keep their index and leave gaps for valid elements
//!   (`{ tags: [null, msg] }`),
//! - the branch frames a required/optional intersection introduces are
//!   flattened away,
//! - failures about the form as a whole land under [`FORM_ERROR`].
//!
//! ## Core Types
//!
//! - [`Context`] / [`ContextFrame`]: where a failure happened
//! - [`ErrorEntry`] / [`ErrorEntries`]: the failures of one decoding pass
//! - [`ErrorTree`]: the field-shaped result, addressed with [`FieldPath`]
//! - [`Codec`] / [`Decoder`]: codecs producing failure reports
//! - [`Form`]: validation and submission for one form
//!
//! ## Example
//!
//! ```rust
//! use formbind::{Codec, Form};
//! use serde_json::json;
//!
//! let form = Form::new(Codec::form(
//!     Codec::object().field("foo", Codec::readonly_array(Codec::object().field("bar", Codec::string()))),
//!     Codec::partial().field("note", Codec::string()),
//! ));
//!
//! let errors = form
//!     .validate(&json!({"foo": [{"bar": "a"}, {}, {"bar": "a"}]}))
//!     .unwrap();
//!
//! assert_eq!(
//!     errors.to_json(),
//!     json!({"foo": [null, {"bar": "This field is invalid."}]})
//! );
//! ```

pub mod classify;
pub mod codec;
pub mod context;
pub mod error;
pub mod form;
pub mod path;
mod render;
pub mod transform;
pub mod tree;

pub use codec::{
    ArrayCodec, Codec, Decoder, ExactCodec, IntersectionCodec, NumberFromStringCodec, ObjectCodec,
    StringCodec, WithMessage,
};
pub use context::{Context, ContextFrame, TypeTag};
pub use error::{ErrorEntries, ErrorEntry, MalformedPath};
pub use form::{Form, FormConfig, DEFAULT_ERROR_MESSAGE};
pub use path::{FieldPath, PathSegment};
pub use transform::to_validation_errors;
pub use tree::{ErrorTree, FORM_ERROR};

/// Result of decoding form data.
pub type DecodeResult<T> = stillwater::Validation<T, ErrorEntries>;
