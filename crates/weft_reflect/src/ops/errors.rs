use thiserror::Error;

/// A value could not be cloned through reflection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReflectCloneError {
    #[error("`{type_path}` does not support `reflect_clone`")]
    NotSupported { type_path: &'static str },
    #[error("`{type_path}` is mutably borrowed and cannot be cloned")]
    Borrowed { type_path: &'static str },
}

/// A value could not be stored into a field, property, item or entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetError {
    #[error("`{container}` has no member named `{member}`")]
    UnknownMember {
        container: &'static str,
        member: String,
    },
    #[error("expected a value of type `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("property `{member}` of `{container}` has no setter")]
    ReadOnly {
        container: &'static str,
        member: String,
    },
}
