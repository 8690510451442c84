use thiserror::Error;

/// A failure path that cannot be placed in an error tree.
///
/// The renderer never propagates this. Its `Display` text is stored in the
/// tree in place of the field message, so the field still shows as invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedPath {
    /// An array frame was the last frame, so no index follows it.
    #[error("Expected next context entry to exist.")]
    MissingIndex,

    /// The frame after an array frame does not hold a non-negative integer.
    #[error("Index [{0}] not an integer")]
    NonIntegerIndex(String),

    /// The index lies past the end of the array seen at the frame, or past
    /// the largest index accepted when no array value was recorded.
    #[error("Index [{0}] out of range")]
    IndexOutOfRange(String),
}
