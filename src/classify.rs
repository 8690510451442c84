//! Frame classification.
//!
//! Codec metadata does not always say whether a step went through an array,
//! so array detection also looks at the runtime value seen at the frame.

use crate::context::{ContextFrame, TypeTag};

/// Returns true if the frame's container is array-shaped.
///
/// That is the case when the frame's tag names an array codec, or when the
/// value seen at the frame is an array at runtime.
pub fn is_array_frame(frame: &ContextFrame) -> bool {
    matches!(
        frame.tag,
        TypeTag::Array | TypeTag::ReadonlyArray | TypeTag::AnyArray
    ) || frame.actual().is_some_and(|value| value.is_array())
}

/// Returns true if the frame decodes an intersection of object codecs.
///
/// An `Exact` wrapper around an intersection counts as well. Only the root
/// frame of a failure path is checked with this.
pub fn is_intersection_frame(frame: &ContextFrame) -> bool {
    let tag = frame.tag.inner().unwrap_or(&frame.tag);
    matches!(tag, TypeTag::Intersection)
}
