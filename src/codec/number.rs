//! Numeric text codec.
//!
//! Form inputs deliver numbers as text. [`NumberFromStringCodec`] accepts a
//! numeric string and decodes it into a JSON number.

use serde_json::{Number, Value};
use stillwater::Validation;

use crate::context::{Context, TypeTag};
use crate::error::{ErrorEntries, ErrorEntry};

use super::traits::{type_failure, Decoder};

#[derive(Clone)]
enum NumberConstraint {
    Min { value: f64, message: Option<String> },
    Max { value: f64, message: Option<String> },
}

/// A codec that parses a string into a number.
///
/// Integers decode to integer JSON numbers, everything else to floats.
/// Blank strings, non-numeric text and non-finite values are rejected
/// without a message.
///
/// # Example
///
/// ```rust
/// use formbind::{Codec, Decoder};
/// use serde_json::json;
///
/// let codec = Codec::number_from_string().min(0.0);
///
/// assert_eq!(codec.decode(&json!("42")).into_result().unwrap(), json!(42));
/// assert_eq!(codec.decode(&json!(" 2.5 ")).into_result().unwrap(), json!(2.5));
/// assert!(codec.decode(&json!("-1")).is_failure());
/// assert!(codec.decode(&json!("forty")).is_failure());
/// ```
#[derive(Clone, Default)]
pub struct NumberFromStringCodec {
    constraints: Vec<NumberConstraint>,
}

impl NumberFromStringCodec {
    /// Creates a new codec with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the number to be at least `value`.
    pub fn min(mut self, value: f64) -> Self {
        self.constraints
            .push(NumberConstraint::Min { value, message: None });
        self
    }

    /// Requires the number to be at most `value`.
    pub fn max(mut self, value: f64) -> Self {
        self.constraints
            .push(NumberConstraint::Max { value, message: None });
        self
    }

    /// Sets a custom error message for the most recent constraint.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                NumberConstraint::Min { message: m, .. } => *m = Some(message.into()),
                NumberConstraint::Max { message: m, .. } => *m = Some(message.into()),
            }
        }
        self
    }
}

impl Decoder for NumberFromStringCodec {
    fn tag(&self) -> TypeTag {
        TypeTag::NumberFromString
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value, ErrorEntries> {
        let Some(number) = input.and_then(Value::as_str).and_then(parse_number) else {
            return type_failure(input, context, None);
        };

        let errors: Vec<ErrorEntry> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, &number, input, context))
            .collect();

        if errors.is_empty() {
            Validation::Success(Value::Number(number))
        } else {
            Validation::Failure(ErrorEntries::from_vec(errors))
        }
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

fn check_constraint(
    constraint: &NumberConstraint,
    number: &Number,
    input: Option<&Value>,
    context: &Context,
) -> Option<ErrorEntry> {
    let actual = number.as_f64()?;
    let (violated, default_message, code, message) = match constraint {
        NumberConstraint::Min { value, message } => (
            actual < *value,
            format!("must be at least {}, got {}", value, number),
            "min_value",
            message,
        ),
        NumberConstraint::Max { value, message } => (
            actual > *value,
            format!("must be at most {}, got {}", value, number),
            "max_value",
            message,
        ),
    };

    violated.then(|| {
        ErrorEntry::new(context.clone(), input.cloned())
            .with_message(message.clone().unwrap_or(default_message))
            .with_code(code)
    })
}
