//! Context frames describing where a codec failure happened.
//!
//! Every failure reported by a codec carries a [`Context`]: the ordered list
//! of [`ContextFrame`]s walked from the decoded root down to the failing value.
//! Each frame records the key used at that step, the [`TypeTag`] of the codec
//! that was decoding there, and the runtime value it saw.

use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;

/// The kind of codec that produced a context frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// A string value.
    String,
    /// A string that decodes to a number.
    NumberFromString,
    /// A mutable array of items.
    Array,
    /// A read-only array of items.
    ReadonlyArray,
    /// An array whose items are not checked.
    AnyArray,
    /// An object with required properties.
    Interface,
    /// An object whose properties may be absent.
    Partial,
    /// A combination of several object codecs decoding the same value.
    Intersection,
    /// A wrapper that strips properties unknown to the inner codec.
    Exact(Box<TypeTag>),
    /// Any codec kind this crate does not know about.
    Other(String),
}

impl TypeTag {
    /// Returns the tag name as reported in diagnostics (e.g. `ReadonlyArrayType`).
    pub fn name(&self) -> &str {
        match self {
            TypeTag::String => "StringType",
            TypeTag::NumberFromString => "NumberFromString",
            TypeTag::Array => "ArrayType",
            TypeTag::ReadonlyArray => "ReadonlyArrayType",
            TypeTag::AnyArray => "AnyArrayType",
            TypeTag::Interface => "InterfaceType",
            TypeTag::Partial => "PartialType",
            TypeTag::Intersection => "IntersectionType",
            TypeTag::Exact(_) => "ExactType",
            TypeTag::Other(name) => name,
        }
    }

    /// Returns the codec kind wrapped by an `Exact` tag, if any.
    pub fn inner(&self) -> Option<&TypeTag> {
        match self {
            TypeTag::Exact(inner) => Some(inner),
            _ => None,
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Exact(inner) => write!(f, "ExactType<{}>", inner),
            other => f.write_str(other.name()),
        }
    }
}

/// One step of a failure path.
///
/// The value seen at the step is shared, so extending a context never copies
/// the values recorded by its ancestors.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextFrame {
    /// Property name or array index used to reach this step. Empty for the root.
    pub key: String,
    /// Kind of codec decoding at this step.
    pub tag: TypeTag,
    pub(crate) actual: Option<Arc<Value>>,
}

impl ContextFrame {
    /// Creates a new frame.
    pub fn new(key: impl Into<String>, tag: TypeTag, actual: Option<Value>) -> Self {
        Self {
            key: key.into(),
            tag,
            actual: actual.map(Arc::new),
        }
    }

    /// Value seen at this step; `None` when the key was missing.
    pub fn actual(&self) -> Option<&Value> {
        self.actual.as_deref()
    }
}

/// The full path of frames from the decoded root to a failing value.
///
/// Like a path, a context is never modified once built: [`Context::append`]
/// returns a new context one frame deeper.
///
/// # Example
///
/// ```rust
/// use formbind::{Context, TypeTag};
/// use serde_json::json;
///
/// let root = Context::root(TypeTag::Interface, Some(&json!({"foo": 1})));
/// let foo = root.append("foo", TypeTag::String, Some(&json!(1)));
///
/// assert_eq!(root.len(), 1);
/// assert_eq!(foo.len(), 2);
/// assert_eq!(foo.to_string(), "foo");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    frames: Vec<ContextFrame>,
}

impl Context {
    /// Creates a context holding only the root frame.
    pub fn root(tag: TypeTag, actual: Option<&Value>) -> Self {
        Self {
            frames: vec![ContextFrame::new("", tag, actual.cloned())],
        }
    }

    /// Builds a context from explicit frames.
    pub fn from_frames(frames: Vec<ContextFrame>) -> Self {
        Self { frames }
    }

    /// Returns a new context with one more frame.
    pub fn append(&self, key: impl Into<String>, tag: TypeTag, actual: Option<&Value>) -> Self {
        let mut frames = self.frames.clone();
        frames.push(ContextFrame::new(key, tag, actual.cloned()));
        Self { frames }
    }

    /// Returns the root frame, if any.
    pub fn root_frame(&self) -> Option<&ContextFrame> {
        self.frames.first()
    }

    /// Returns every frame below the root.
    pub fn below_root(&self) -> &[ContextFrame] {
        self.frames.get(1..).unwrap_or(&[])
    }

    /// Returns all frames including the root.
    pub fn frames(&self) -> &[ContextFrame] {
        &self.frames
    }

    /// Returns the last frame, or None if empty.
    pub fn last(&self) -> Option<&ContextFrame> {
        self.frames.last()
    }

    /// Returns the number of frames, counting the root.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the context has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Keys below the root joined with `.`, or `(root)`.
impl Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let below = self.below_root();
        if below.is_empty() {
            return f.write_str("(root)");
        }
        for (i, frame) in below.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&frame.key)?;
        }
        Ok(())
    }
}
