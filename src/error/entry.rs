//! Codec failure entries.
//!
//! This module provides [`ErrorEntry`] for a single decoding failure and
//! [`ErrorEntries`] for accumulating every failure of one decoding pass.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;

use crate::context::Context;

/// A single decoding failure with its full context.
///
/// - **context**: the frames walked from the root to the failing value
/// - **value**: the value that failed (absent when the key was missing)
/// - **message**: an explanation supplied by the codec, if it had one
/// - **code**: machine-readable error code for programmatic handling
///
/// Entries without a message get one from the default-message function
/// passed to [`to_validation_errors`](crate::to_validation_errors).
///
/// # Example
///
/// ```rust
/// use formbind::{Context, ErrorEntry, TypeTag};
///
/// let context = Context::root(TypeTag::Interface, None).append("email", TypeTag::String, None);
/// let entry = ErrorEntry::new(context, None)
///     .with_message("email is required")
///     .with_code("required");
///
/// assert_eq!(entry.code, "required");
/// assert_eq!(entry.to_string(), "email: email is required");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEntry {
    /// Frames from the decoded root to the failing value.
    pub context: Context,
    /// The value that failed decoding.
    pub value: Option<Value>,
    /// Human-readable message, when the codec supplied one.
    pub message: Option<String>,
    /// Machine-readable error code (e.g., `min_length`).
    pub code: String,
}

impl ErrorEntry {
    /// Creates a new entry with no message.
    ///
    /// The error code defaults to "invalid_type". Use `with_code` to set
    /// a more specific code.
    pub fn new(context: Context, value: Option<Value>) -> Self {
        Self {
            context,
            value,
            message: None,
            code: "invalid_type".to_string(),
        }
    }

    /// Sets the message and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

impl Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.context)?;
        match (&self.message, self.context.last()) {
            (Some(message), _) => write!(f, "{}", message),
            (None, Some(frame)) => {
                let got = match &self.value {
                    Some(value) => value.to_string(),
                    None => "undefined".to_string(),
                };
                write!(f, "invalid value {} supplied to {}", got, frame.tag)
            }
            (None, None) => write!(f, "invalid value"),
        }
    }
}

impl std::error::Error for ErrorEntry {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ErrorEntry>();
    assert_sync::<ErrorEntry>();
};

/// A non-empty collection of decoding failures.
///
/// A failed decode always has at least one entry, so `ErrorEntries` wraps a
/// `NonEmptyVec` for use as the failure side of `Validation<T, ErrorEntries>`.
///
/// # Combining Errors
///
/// ```rust
/// use formbind::{Context, ErrorEntries, ErrorEntry, TypeTag};
/// use stillwater::prelude::*;
///
/// let root = Context::root(TypeTag::Interface, None);
/// let name = ErrorEntries::single(ErrorEntry::new(root.append("name", TypeTag::String, None), None));
/// let email = ErrorEntries::single(ErrorEntry::new(root.append("email", TypeTag::String, None), None));
///
/// let combined = name.combine(email);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEntries(NonEmptyVec<ErrorEntry>);

impl ErrorEntries {
    /// Creates a collection containing a single entry.
    pub fn single(entry: ErrorEntry) -> Self {
        Self(NonEmptyVec::singleton(entry))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the entries in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.0.iter()
    }

    /// Returns the first entry.
    pub fn first(&self) -> &ErrorEntry {
        self.0.head()
    }

    /// Returns all entries with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&ErrorEntry> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// Converts this collection into a `Vec<ErrorEntry>`.
    pub fn into_vec(self) -> Vec<ErrorEntry> {
        self.0.into_vec()
    }

    /// Creates a collection from a vec of entries.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_vec(entries: Vec<ErrorEntry>) -> Self {
        Self(NonEmptyVec::from_vec(entries).expect("ErrorEntries requires at least one entry"))
    }
}

impl Semigroup for ErrorEntries {
    fn combine(self, other: Self) -> Self {
        ErrorEntries(self.0.combine(other.0))
    }
}

impl Display for ErrorEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decoding failed with {} error(s):", self.len())?;
        for (i, entry) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, entry)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorEntries {}

impl IntoIterator for ErrorEntries {
    type Item = ErrorEntry;
    type IntoIter = std::vec::IntoIter<ErrorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorEntries {
    type Item = &'a ErrorEntry;
    type IntoIter = Box<dyn Iterator<Item = &'a ErrorEntry> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ErrorEntries>();
    assert_sync::<ErrorEntries>();
};
