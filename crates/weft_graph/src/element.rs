//! The wire-agnostic tree node shared by every format.
//!
//! A stream is a tree of [`Element`]s. Elements that carry children are
//! opened and closed. The rest stand alone: their close is implicit, and a
//! [`Primitive`](Element::Primitive) is followed by exactly one value.
//!
//! Collections and dictionaries never carry a count. The count lives on the
//! enclosing [`SubBranch`](Element::SubBranch), so a reader can size the
//! target before it descends into items.

use core::fmt;

// -----------------------------------------------------------------------------
// ElementKind

/// The closed set of element kinds and their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementKind {
    TypeSection = 1,
    InstanceSection = 2,
    Primitive = 3,
    Reference = 4,
    Null = 5,
    Default = 6,
    SubBranch = 7,
    Collection = 8,
    Dictionary = 9,
}

impl ElementKind {
    pub const ALL: [Self; 9] = [
        Self::TypeSection,
        Self::InstanceSection,
        Self::Primitive,
        Self::Reference,
        Self::Null,
        Self::Default,
        Self::SubBranch,
        Self::Collection,
        Self::Dictionary,
    ];

    #[inline(always)]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Whether an opened element of this kind must be closed.
    #[inline]
    pub const fn needs_end(self) -> bool {
        matches!(
            self,
            Self::TypeSection
                | Self::InstanceSection
                | Self::SubBranch
                | Self::Collection
                | Self::Dictionary
        )
    }

    /// The short tag name used by the text formats.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::TypeSection => "types",
            Self::InstanceSection => "instances",
            Self::Primitive => "p",
            Self::Reference => "r",
            Self::Null => "n",
            Self::Default => "d",
            Self::SubBranch => "b",
            Self::Collection => "c",
            Self::Dictionary => "m",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// -----------------------------------------------------------------------------
// Element

/// One node of the element tree.
///
/// Each variant holds exactly the attributes its kind allows, so a count on
/// a primitive or an instance index on a collection cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// A detour holding one type descriptor record.
    TypeSection,
    /// A detour declaring instance `instance` of the shared type `ty`.
    InstanceSection { ty: u32, instance: u32 },
    /// A primitive value follows.
    Primitive { ty: Option<u32> },
    /// A back-reference to an already declared instance.
    Reference { ty: Option<u32>, instance: u32 },
    Null,
    /// The zero value of `ty`, or of the declared type.
    Default { ty: Option<u32> },
    /// A structure, or the wrapper of a collection or dictionary.
    SubBranch { ty: Option<u32>, count: Option<u32> },
    Collection,
    Dictionary,
}

impl Element {
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::TypeSection => ElementKind::TypeSection,
            Self::InstanceSection { .. } => ElementKind::InstanceSection,
            Self::Primitive { .. } => ElementKind::Primitive,
            Self::Reference { .. } => ElementKind::Reference,
            Self::Null => ElementKind::Null,
            Self::Default { .. } => ElementKind::Default,
            Self::SubBranch { .. } => ElementKind::SubBranch,
            Self::Collection => ElementKind::Collection,
            Self::Dictionary => ElementKind::Dictionary,
        }
    }

    /// The type tag, if any.
    pub const fn ty(&self) -> Option<u32> {
        match *self {
            Self::InstanceSection { ty, .. } => Some(ty),
            Self::Primitive { ty }
            | Self::Reference { ty, .. }
            | Self::Default { ty }
            | Self::SubBranch { ty, .. } => ty,
            Self::TypeSection | Self::Null | Self::Collection | Self::Dictionary => None,
        }
    }

    pub const fn instance(&self) -> Option<u32> {
        match *self {
            Self::InstanceSection { instance, .. } | Self::Reference { instance, .. } => {
                Some(instance)
            }
            _ => None,
        }
    }

    pub const fn count(&self) -> Option<u32> {
        match *self {
            Self::SubBranch { count, .. } => count,
            _ => None,
        }
    }

    /// Rebuilds an element from decoded attributes.
    ///
    /// Returns `None` when a required attribute is missing. Attributes the
    /// kind does not carry are ignored.
    pub fn from_parts(
        kind: ElementKind,
        ty: Option<u32>,
        instance: Option<u32>,
        count: Option<u32>,
    ) -> Option<Self> {
        let element = match kind {
            ElementKind::TypeSection => Self::TypeSection,
            ElementKind::InstanceSection => Self::InstanceSection {
                ty: ty?,
                instance: instance?,
            },
            ElementKind::Primitive => Self::Primitive { ty },
            ElementKind::Reference => Self::Reference {
                ty,
                instance: instance?,
            },
            ElementKind::Null => Self::Null,
            ElementKind::Default => Self::Default { ty },
            ElementKind::SubBranch => Self::SubBranch { ty, count },
            ElementKind::Collection => Self::Collection,
            ElementKind::Dictionary => Self::Dictionary,
        };
        Some(element)
    }
}

// -----------------------------------------------------------------------------
// Token

/// One step of a reader walking the element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Open(Element),
    /// The close of an element whose kind needs an end.
    Close(ElementKind),
    /// The end-of-data mark.
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(element) => write!(f, "<{}>", element.kind()),
            Self::Close(kind) => write!(f, "</{kind}>"),
            Self::End => f.write_str("end mark"),
        }
    }
}

/// Logs one step of the walk when the `debug` feature is on in a debug build.
#[inline(always)]
pub(crate) fn trace(direction: &'static str, step: &dyn fmt::Debug) {
    #[cfg(all(debug_assertions, feature = "debug"))]
    log::trace!("{direction} {step:?}");
    #[cfg(not(all(debug_assertions, feature = "debug")))]
    let _ = (direction, step);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Element, ElementKind};

    #[test]
    fn codes_and_tags_are_unique() {
        for (i, a) in ElementKind::ALL.iter().enumerate() {
            assert_eq!(ElementKind::from_code(a.code()), Some(*a));
            assert_eq!(ElementKind::from_tag(a.tag()), Some(*a));
            for b in &ElementKind::ALL[i + 1..] {
                assert_ne!(a.tag(), b.tag());
            }
        }
        assert_eq!(ElementKind::from_code(0), None);
        assert_eq!(ElementKind::from_code(10), None);
    }

    #[test]
    fn from_parts_requires_attributes() {
        assert_eq!(
            Element::from_parts(ElementKind::Reference, None, None, None),
            None
        );
        assert_eq!(
            Element::from_parts(ElementKind::Reference, Some(3), Some(1), Some(9)),
            Some(Element::Reference {
                ty: Some(3),
                instance: 1
            })
        );
        let branch = Element::SubBranch {
            ty: None,
            count: Some(2),
        };
        assert_eq!(branch.count(), Some(2));
        assert!(branch.kind().needs_end());
        assert!(!ElementKind::Primitive.needs_end());
    }
}
