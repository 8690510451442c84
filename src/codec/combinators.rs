//! Codec combinators.
//!
//! - [`IntersectionCodec`]: several object codecs decode the same value
//! - [`ExactCodec`]: strips properties the inner codec does not declare
//! - [`WithMessage`]: replaces the inner codec's failures with one message

use serde_json::{Map, Value};
use stillwater::Validation;

use crate::context::{Context, TypeTag};
use crate::error::{ErrorEntries, ErrorEntry};

use super::traits::Decoder;

/// All branches must decode the value; their outputs are merged.
///
/// Each branch decodes in its own frame keyed by the branch index, which is
/// how a form's required and optional halves are told apart in a failure
/// path.
#[derive(Default)]
pub struct IntersectionCodec {
    branches: Vec<Box<dyn Decoder>>,
}

impl IntersectionCodec {
    /// Creates an intersection with no branches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a branch.
    pub fn branch<D>(mut self, codec: D) -> Self
    where
        D: Decoder + 'static,
    {
        self.branches.push(Box::new(codec));
        self
    }
}

impl Decoder for IntersectionCodec {
    fn tag(&self) -> TypeTag {
        TypeTag::Intersection
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value, ErrorEntries> {
        let mut errors: Vec<ErrorEntry> = Vec::new();
        let mut merged: Option<Value> = None;

        for (index, branch) in self.branches.iter().enumerate() {
            let branch_context = context.append(index.to_string(), branch.tag(), input);
            match branch.validate(input, &branch_context) {
                Validation::Success(value) => {
                    merged = Some(match (merged, value) {
                        (Some(Value::Object(mut acc)), Value::Object(next)) => {
                            acc.extend(next);
                            Value::Object(acc)
                        }
                        (_, next) => next,
                    });
                }
                Validation::Failure(e) => errors.extend(e),
            }
        }

        if errors.is_empty() {
            Validation::Success(merged.unwrap_or_else(|| input.cloned().unwrap_or(Value::Null)))
        } else {
            Validation::Failure(ErrorEntries::from_vec(errors))
        }
    }

    fn props(&self) -> Vec<String> {
        let mut props: Vec<String> = Vec::new();
        for prop in self.branches.iter().flat_map(|b| b.props()) {
            if !props.contains(&prop) {
                props.push(prop);
            }
        }
        props
    }
}

/// Decodes with the inner codec and drops undeclared properties.
///
/// Adds no frame of its own; the frame it decodes in is tagged
/// `Exact(inner tag)`.
///
/// # Example
///
/// ```rust
/// use formbind::{Codec, Decoder};
/// use serde_json::json;
///
/// let codec = Codec::exact(Codec::object().field("name", Codec::string()));
/// let decoded = codec.decode(&json!({"name": "Ada", "admin": true})).into_result().unwrap();
/// assert_eq!(decoded, json!({"name": "Ada"}));
/// ```
#[derive(Clone)]
pub struct ExactCodec<D> {
    inner: D,
}

impl<D: Decoder> ExactCodec<D> {
    /// Wraps `inner`.
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: Decoder> Decoder for ExactCodec<D> {
    fn tag(&self) -> TypeTag {
        TypeTag::Exact(Box::new(self.inner.tag()))
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value, ErrorEntries> {
        self.inner.validate(input, context).map(|value| match value {
            Value::Object(object) => {
                let props = self.inner.props();
                Value::Object(
                    object
                        .into_iter()
                        .filter(|(key, _)| props.contains(key))
                        .collect::<Map<String, Value>>(),
                )
            }
            other => other,
        })
    }

    fn props(&self) -> Vec<String> {
        self.inner.props()
    }
}

/// Reports any failure of the inner codec as one entry with a custom message.
///
/// The entry sits at the context the inner codec was decoding, so the
/// message lands on that field rather than on whichever nested value failed.
///
/// # Example
///
/// ```rust
/// use formbind::{Codec, Decoder};
/// use serde_json::json;
///
/// let codec = Codec::with_message(Codec::number_from_string(), |_| "Enter a number".to_string());
/// let errors = codec.decode(&json!("abc")).into_result().unwrap_err();
/// assert_eq!(errors.first().message.as_deref(), Some("Enter a number"));
/// ```
#[derive(Clone)]
pub struct WithMessage<D, F> {
    inner: D,
    message: F,
}

impl<D, F> WithMessage<D, F>
where
    D: Decoder,
    F: Fn(Option<&Value>) -> String + Send + Sync,
{
    /// Wraps `inner`; `message` receives the value that failed.
    pub fn new(inner: D, message: F) -> Self {
        Self { inner, message }
    }
}

impl<D, F> Decoder for WithMessage<D, F>
where
    D: Decoder,
    F: Fn(Option<&Value>) -> String + Send + Sync,
{
    fn tag(&self) -> TypeTag {
        self.inner.tag()
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value, ErrorEntries> {
        match self.inner.validate(input, context) {
            Validation::Success(value) => Validation::Success(value),
            Validation::Failure(errors) => {
                let code = errors.first().code.clone();
                Validation::Failure(ErrorEntries::single(
                    ErrorEntry::new(context.clone(), input.cloned())
                        .with_message((self.message)(input))
                        .with_code(code),
                ))
            }
        }
    }

    fn props(&self) -> Vec<String> {
        self.inner.props()
    }
}
