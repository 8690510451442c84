//! Form-level validation and submission.
//!
//! [`Form`] ties a codec to the error-tree conversion: validating raw form
//! data yields either nothing (the data decodes) or the [`ErrorTree`] to
//! display, and submitting only reaches the submit handler with decoded data.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;
use tracing::debug;

use crate::codec::Decoder;
use crate::error::ErrorEntry;
use crate::transform::to_validation_errors;
use crate::tree::ErrorTree;

/// Message shown for a failing field when the codec supplied none.
pub const DEFAULT_ERROR_MESSAGE: &str = "This field is invalid.";

type DefaultMessageFn = Arc<dyn Fn(&ErrorEntry) -> String + Send + Sync>;

/// Settings shared by every validation pass of a [`Form`].
///
/// # Example
///
/// ```rust
/// use formbind::FormConfig;
///
/// let config = FormConfig::new()
///     .default_error_message(|entry| format!("Check {}", entry.context));
/// ```
#[derive(Clone)]
pub struct FormConfig {
    default_error_message: DefaultMessageFn,
}

impl FormConfig {
    /// Creates a config using [`DEFAULT_ERROR_MESSAGE`].
    pub fn new() -> Self {
        Self {
            default_error_message: Arc::new(invalid_field),
        }
    }

    /// Sets the fallback message for failures that carry none.
    pub fn default_error_message<F>(mut self, message: F) -> Self
    where
        F: Fn(&ErrorEntry) -> String + Send + Sync + 'static,
    {
        self.default_error_message = Arc::new(message);
        self
    }

    /// Returns the fallback message for `entry`.
    pub fn message_for(&self, entry: &ErrorEntry) -> String {
        (self.default_error_message)(entry)
    }
}

fn invalid_field(_: &ErrorEntry) -> String {
    DEFAULT_ERROR_MESSAGE.to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfig").finish_non_exhaustive()
    }
}

/// A form bound to its codec.
///
/// # Example
///
/// ```rust
/// use formbind::{Codec, ErrorTree, Form, FieldPath};
/// use serde_json::json;
///
/// let form = Form::new(Codec::form(
///     Codec::object().field("username", Codec::string().min_len(3)),
///     Codec::partial(),
/// ));
///
/// let errors = form.validate(&json!({"username": "al"})).unwrap();
/// assert_eq!(
///     errors.message_at(&FieldPath::from_field("username")),
///     Some("length must be at least 3, got 2")
/// );
///
/// let response = form.submit(&json!({"username": "alice"}), |_| {
///     Some(ErrorTree::form_level("username already taken"))
/// });
/// assert_eq!(response.unwrap().form_error(), Some("username already taken"));
/// ```
pub struct Form<D> {
    codec: D,
    config: FormConfig,
}

impl<D: Decoder> Form<D> {
    /// Creates a form with the default config.
    pub fn new(codec: D) -> Self {
        Self::with_config(codec, FormConfig::new())
    }

    /// Creates a form with an explicit config.
    pub fn with_config(codec: D, config: FormConfig) -> Self {
        Self { codec, config }
    }

    /// Returns the form's codec.
    pub fn codec(&self) -> &D {
        &self.codec
    }

    /// Returns the form's config.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Validates raw form data.
    ///
    /// Returns `None` when the data decodes, otherwise the errors to display.
    pub fn validate(&self, raw: &Value) -> Option<ErrorTree> {
        match self.codec.decode(raw) {
            Validation::Success(_) => None,
            Validation::Failure(errors) => {
                debug!(failures = errors.len(), "form data failed to decode");
                Some(to_validation_errors(&errors, |entry| self.config.message_for(entry)))
            }
        }
    }

    /// Decodes raw form data and hands the result to `on_submit`.
    ///
    /// If decoding fails the handler is not called and the validation errors
    /// are returned. Otherwise the handler's response is returned: `None` for
    /// a successful submission, or the errors the submission produced.
    pub fn submit<F>(&self, raw: &Value, on_submit: F) -> Option<ErrorTree>
    where
        F: FnOnce(Value) -> Option<ErrorTree>,
    {
        match self.codec.decode(raw) {
            Validation::Success(decoded) => on_submit(decoded),
            Validation::Failure(errors) => {
                debug!(failures = errors.len(), "submission blocked by validation errors");
                Some(to_validation_errors(&errors, |entry| self.config.message_for(entry)))
            }
        }
    }
}

impl<D> fmt::Debug for Form<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form").field("config", &self.config).finish_non_exhaustive()
    }
}
