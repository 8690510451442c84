//! Error types for codec failures and error-tree rendering.
//!
//! [`ErrorEntry`] is one failure reported by a codec, [`ErrorEntries`] a
//! non-empty collection of them, and [`MalformedPath`] describes a failure
//! path the renderer cannot place in the error tree.

mod entry;
mod malformed;

pub use entry::{ErrorEntries, ErrorEntry};
pub use malformed::MalformedPath;
