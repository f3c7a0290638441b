//! Error taxonomy of the graph engine.
//!
//! Every fatal condition is a [`GraphError`] carrying a stable numeric
//! [`code`](GraphError::code). Non-fatal conditions (container fallback,
//! header load failures) are logged and never surface here.

use std::io;

use thiserror::Error;
use weft_reflect::info::PrimitiveCode;
use weft_reflect::ops::SetError;
use weft_reflect::registry::ConstructError as InvokeError;

// -----------------------------------------------------------------------------
// ConstructError

/// A value could not be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConstructError {
    #[error("`{type_path}` has no usable constructor")]
    NotConstructible { type_path: &'static str },
    #[error(
        "parameter `{parameter}` of `{type_path}::{constructor}` matches field `{field}`, which is not serialized"
    )]
    FilteredParameter {
        type_path: &'static str,
        constructor: &'static str,
        parameter: &'static str,
        field: &'static str,
    },
    #[error("instance {instance} of `{type_path}` is referenced while its constructor arguments are read")]
    CircularConstructorParameter {
        type_path: &'static str,
        instance: u32,
    },
    #[error("member `{member}` required by the constructor of `{type_path}` was not read")]
    MissingMember {
        type_path: &'static str,
        member: &'static str,
    },
    #[error("constructor `{constructor}` of `{type_path}` failed: {source}")]
    Invoke {
        type_path: &'static str,
        constructor: &'static str,
        #[source]
        source: InvokeError,
    },
}

impl ConstructError {
    pub fn code(&self) -> u32 {
        match self {
            Self::NotConstructible { .. } => 101,
            Self::FilteredParameter { .. } => 102,
            Self::CircularConstructorParameter { .. } => 103,
            Self::MissingMember { .. } => 104,
            Self::Invoke { .. } => 105,
        }
    }
}

// -----------------------------------------------------------------------------
// AssignError

/// A member could not be stored after construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot assign `{value}` of type `{value_type}` to `{container}::{member}`: {source}")]
pub struct AssignError {
    pub container: &'static str,
    pub member: String,
    pub value: String,
    pub value_type: &'static str,
    #[source]
    pub source: SetError,
}

impl AssignError {
    #[inline]
    pub fn code(&self) -> u32 {
        201
    }
}

// -----------------------------------------------------------------------------
// FormatError

/// The stream does not have the expected structure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("unsupported format version `{found}`")]
    Version { found: String },
    #[error("expected {expected}, found {found}")]
    UnexpectedElement { expected: &'static str, found: String },
    #[error("unexpected end of stream")]
    UnexpectedEnd,
    #[error("the end-of-data mark is missing")]
    MissingEndMark,
    #[error("malformed stream: {reason}")]
    Malformed { reason: String },
    #[error("`{text}` is not a valid {code} value")]
    InvalidPrimitive { code: PrimitiveCode, text: String },
    #[error("`{type_path}` has no member `{member}`")]
    UnknownMember { type_path: &'static str, member: String },
    #[error("instance {instance} was never declared")]
    UnknownInstance { instance: u32 },
    #[error("`{type_path}` has no variant with discriminant {discriminant}")]
    UnknownVariant { type_path: &'static str, discriminant: i64 },
    #[error("a value of type `{type_path}` needs a type tag here")]
    MissingTypeTag { type_path: &'static str },
    #[error("`{type_path}` wraps a value that needs its own type tag")]
    NestedTypeTag { type_path: &'static str },
    #[error("`{type_path}` holds {expected:?} items, found {found}")]
    ArrayLength {
        type_path: &'static str,
        expected: Option<usize>,
        found: usize,
    },
    #[error("`{type_path}` is borrowed mutably while being written")]
    Borrowed { type_path: &'static str },
    #[error(transparent)]
    Xml(#[from] roxmltree::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FormatError {
    pub fn code(&self) -> u32 {
        match self {
            Self::Version { .. } => 301,
            Self::UnexpectedElement { .. } => 302,
            Self::UnexpectedEnd => 303,
            Self::MissingEndMark => 304,
            Self::Malformed { .. } => 305,
            Self::InvalidPrimitive { .. } => 306,
            Self::UnknownMember { .. } => 307,
            Self::UnknownInstance { .. } => 308,
            Self::UnknownVariant { .. } => 309,
            Self::MissingTypeTag { .. } => 310,
            Self::NestedTypeTag { .. } => 311,
            Self::ArrayLength { .. } => 312,
            Self::Borrowed { .. } => 313,
            Self::Xml(_) => 314,
            Self::Json(_) => 315,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// ContainerError

/// A substitute could not be turned back into its original value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContainerError {
    #[error("container `{container}` cannot resolve `{type_path}`")]
    Unresolved {
        container: &'static str,
        type_path: String,
    },
    #[error("container `{container}` failed to restore `{type_path}`: {reason}")]
    Restore {
        container: &'static str,
        type_path: String,
        reason: String,
    },
}

impl ContainerError {
    pub fn code(&self) -> u32 {
        match self {
            Self::Unresolved { .. } => 401,
            Self::Restore { .. } => 402,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeIndexError

/// A type could not be resolved through the session type index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TypeIndexError {
    #[error("type index {index} was never declared")]
    UnknownIndex { index: u32 },
    #[error("type `{type_path}` is not registered")]
    TypeNotFound { type_path: String },
    #[error("type `{type_path}` is still being analyzed")]
    InProgress { type_path: &'static str },
    #[error("expected a value of type `{expected}`, found `{found}`")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl TypeIndexError {
    pub fn code(&self) -> u32 {
        match self {
            Self::UnknownIndex { .. } => 501,
            Self::TypeNotFound { .. } => 502,
            Self::InProgress { .. } => 503,
            Self::Mismatch { .. } => 504,
        }
    }
}

// -----------------------------------------------------------------------------
// GraphError

/// Any fatal failure of a serialize or deserialize pass.
///
/// ```
/// use weft_graph::error::{FormatError, GraphError};
///
/// let err = GraphError::from(FormatError::UnexpectedEnd);
/// assert_eq!(err.code(), 303);
/// assert_eq!(err.to_string(), "[303] unexpected end of stream");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    #[error("[{code}] {0}", code = .0.code())]
    Construct(#[from] ConstructError),
    #[error("[{code}] {0}", code = .0.code())]
    Assign(#[from] AssignError),
    #[error("[{code}] {0}", code = .0.code())]
    Format(#[from] FormatError),
    #[error("[{code}] {0}", code = .0.code())]
    Container(#[from] ContainerError),
    #[error("[{code}] {0}", code = .0.code())]
    TypeIndex(#[from] TypeIndexError),
    #[error("[601] {0}")]
    Io(#[from] io::Error),
}

impl GraphError {
    pub fn code(&self) -> u32 {
        match self {
            Self::Construct(err) => err.code(),
            Self::Assign(err) => err.code(),
            Self::Format(err) => err.code(),
            Self::Container(err) => err.code(),
            Self::TypeIndex(err) => err.code(),
            Self::Io(_) => 601,
        }
    }
}

impl From<roxmltree::Error> for GraphError {
    #[inline]
    fn from(err: roxmltree::Error) -> Self {
        Self::Format(FormatError::Xml(err))
    }
}

impl From<serde_json::Error> for GraphError {
    #[inline]
    fn from(err: serde_json::Error) -> Self {
        Self::Format(FormatError::Json(err))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ConstructError, GraphError, TypeIndexError};

    #[test]
    fn codes_follow_the_wrapped_error() {
        let err = GraphError::from(ConstructError::NotConstructible { type_path: "a::B" });
        assert_eq!(err.code(), 101);
        assert_eq!(err.to_string(), "[101] `a::B` has no usable constructor");

        let err = GraphError::from(TypeIndexError::UnknownIndex { index: 40 });
        assert_eq!(err.code(), 501);
    }
}
