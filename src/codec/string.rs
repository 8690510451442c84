//! String codec.
//!
//! This module provides [`StringCodec`] for decoding string fields with
//! constraints like minimum/maximum length and regex patterns.

use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::context::{Context, TypeTag};
use crate::error::{ErrorEntries, ErrorEntry};

use super::traits::{type_failure, Decoder};

/// A constraint applied to string values.
#[derive(Clone)]
enum StringConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        pattern_str: String,
        message: Option<String>,
    },
}

/// A codec for string fields.
///
/// A missing or non-string value fails without a message, so the form's
/// default message is shown for it. Constraint violations carry their own
/// messages and are all reported, not only the first.
///
/// # Example
///
/// ```rust
/// use formbind::{Codec, Decoder};
/// use serde_json::json;
///
/// let codec = Codec::string()
///     .min_len(3)
///     .pattern(r"^[a-z]+$")
///     .unwrap()
///     .error("lowercase letters only");
///
/// let errors = codec.decode(&json!("AB")).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct StringCodec {
    constraints: Vec<StringConstraint>,
    type_error_message: Option<String>,
}

impl StringCodec {
    /// Creates a new string codec with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires at least `min` characters (Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// Requires at most `max` characters (Unicode scalar values).
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// Requires a match of the provided regex pattern.
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            pattern_str: pattern.to_string(),
            message: None,
        });
        Ok(self)
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the message used
    /// when the value is missing or not a string.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                StringConstraint::MinLength { message: m, .. } => *m = Some(message.into()),
                StringConstraint::MaxLength { message: m, .. } => *m = Some(message.into()),
                StringConstraint::Pattern { message: m, .. } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl Decoder for StringCodec {
    fn tag(&self) -> TypeTag {
        TypeTag::String
    }

    fn validate(&self, input: Option<&Value>, context: &Context) -> Validation<Value, ErrorEntries> {
        let Some(s) = input.and_then(Value::as_str) else {
            return type_failure(input, context, self.type_error_message.as_ref());
        };

        let errors: Vec<ErrorEntry> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, s, context))
            .collect();

        if errors.is_empty() {
            Validation::Success(Value::String(s.to_string()))
        } else {
            Validation::Failure(ErrorEntries::from_vec(errors))
        }
    }
}

/// Checks a single constraint and returns an entry if it fails.
fn check_constraint(constraint: &StringConstraint, value: &str, context: &Context) -> Option<ErrorEntry> {
    let entry = |message: String, code: &str| {
        ErrorEntry::new(context.clone(), Some(Value::String(value.to_string())))
            .with_message(message)
            .with_code(code)
    };

    match constraint {
        StringConstraint::MinLength { min, message } => {
            let len = value.chars().count();
            (len < *min).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("length must be at least {}, got {}", min, len));
                entry(msg, "min_length")
            })
        }
        StringConstraint::MaxLength { max, message } => {
            let len = value.chars().count();
            (len > *max).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("length must be at most {}, got {}", max, len));
                entry(msg, "max_length")
            })
        }
        StringConstraint::Pattern {
            regex,
            pattern_str,
            message,
        } => (!regex.is_match(value)).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("must match pattern '{}'", pattern_str));
            entry(msg, "pattern")
        }),
    }
}
