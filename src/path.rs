//! Field paths for addressing positions in an [`ErrorTree`](crate::ErrorTree).
//!
//! A [`FieldPath`] is the same path a form uses to read a field's value
//! (`users[0].email`), so the error for a field is found by walking the
//! error tree with the field's own path.

use std::fmt::{self, Display};

/// A segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field (e.g., `user`, `email`)
    Field(String),
    /// An array position (e.g., `[0]`, `[42]`)
    Index(usize),
}

/// A path to a field inside nested form data.
///
/// # Example
///
/// ```rust
/// use formbind::FieldPath;
///
/// let path = FieldPath::root()
///     .push_field("users")
///     .push_index(0)
///     .push_field("email");
///
/// assert_eq!(path.to_string(), "users[0].email");
/// assert_eq!(FieldPath::parse("users[0].email"), Some(path));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Creates an empty path pointing at the form root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field name.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Parses the dotted/bracketed notation produced by `Display`.
    ///
    /// Returns `None` for malformed input such as unbalanced brackets,
    /// non-numeric indices, or empty field names.
    pub fn parse(input: &str) -> Option<Self> {
        let mut segments = Vec::new();
        let mut rest = input;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let end = after.find(']')?;
                let index = after[..end].parse::<usize>().ok()?;
                segments.push(PathSegment::Index(index));
                rest = &after[end + 1..];
            } else {
                let body = if segments.is_empty() {
                    rest
                } else {
                    rest.strip_prefix('.')?
                };
                let end = body.find(['.', '[']).unwrap_or(body.len());
                if end == 0 {
                    return None;
                }
                segments.push(PathSegment::Field(body[..end].to_string()));
                rest = &body[end..];
            }
        }

        Some(Self { segments })
    }

    /// Returns a new path with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this path has no segments.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
