use weft_reflect::Reflect;
use weft_reflect::info::{FieldFlags, StructInfo, TypeInfo};
use weft_reflect::ops::{ReflectMut, ReflectRef, SetError, Struct};
use weft_utils::hash::HashSet;

use super::DescribeContext;
use crate::error::AssignError;

// -----------------------------------------------------------------------------
// Member

/// How a member is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Property,
}

/// A selected field or property.
///
/// Members inherited from an embedded base struct carry the names of the
/// base fields leading to them.
#[derive(Debug, Clone)]
pub struct Member {
    name: &'static str,
    kind: MemberKind,
    type_info: &'static TypeInfo,
    base_path: Vec<&'static str>,
}

/// A member value, borrowed for fields and owned for properties.
pub enum MemberValue<'a> {
    Borrowed(&'a dyn Reflect),
    Owned(Box<dyn Reflect>),
}

impl MemberValue<'_> {
    #[inline]
    pub fn as_reflect(&self) -> &dyn Reflect {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => &**value,
        }
    }
}

impl Member {
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline]
    pub fn base_path(&self) -> &[&'static str] {
        &self.base_path
    }

    /// Reads the member out of a struct value.
    pub fn get<'a>(&self, value: &'a dyn Reflect) -> Option<MemberValue<'a>> {
        let ReflectRef::Struct(mut target) = value.reflect_ref() else {
            return None;
        };
        for segment in &self.base_path {
            let ReflectRef::Struct(base) = target.field(segment)?.reflect_ref() else {
                return None;
            };
            target = base;
        }
        match self.kind {
            MemberKind::Field => target.field(self.name).map(MemberValue::Borrowed),
            MemberKind::Property => target.property(self.name).map(MemberValue::Owned),
        }
    }

    /// Stores `value` into the member of a struct value.
    pub fn set(&self, target: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), AssignError> {
        let container = target.reflect_type_path();
        let fail = |source: SetError, value: &dyn Reflect| AssignError {
            container,
            member: self.name.to_owned(),
            value: format!("{value:?}"),
            value_type: value.reflect_type_path(),
            source,
        };

        let ReflectMut::Struct(mut owner) = target.reflect_mut() else {
            return Err(fail(self.unknown(container), &*value));
        };
        for segment in &self.base_path {
            let Some(ReflectMut::Struct(base)) = owner.field_mut(segment).map(|field| field.reflect_mut())
            else {
                return Err(fail(self.unknown(container), &*value));
            };
            owner = base;
        }
        match self.kind {
            MemberKind::Field => store_field(owner, self.name, value)
                .map_err(|(source, value)| fail(source, &*value)),
            MemberKind::Property => {
                let shown = format!("{value:?}");
                let value_type = value.reflect_type_path();
                owner
                    .set_property(self.name, value)
                    .map_err(|source| AssignError {
                        container,
                        member: self.name.to_owned(),
                        value: shown,
                        value_type,
                        source,
                    })
            }
        }
    }

    fn unknown(&self, container: &'static str) -> SetError {
        SetError::UnknownMember {
            container,
            member: self.name.to_owned(),
        }
    }
}

fn store_field(
    owner: &mut dyn Struct,
    name: &str,
    value: Box<dyn Reflect>,
) -> Result<(), (SetError, Box<dyn Reflect>)> {
    let container = owner.reflect_type_path();
    let Some(field) = owner.field_mut(name) else {
        let source = SetError::UnknownMember {
            container,
            member: name.to_owned(),
        };
        return Err((source, value));
    };
    let expected = field.reflect_type_path();
    field.set(value).map_err(|value| {
        let source = SetError::TypeMismatch {
            expected,
            found: value.reflect_type_path(),
        };
        (source, value)
    })
}

// -----------------------------------------------------------------------------
// Selection

/// A field considered during selection, selected or not.
///
/// Constructor parameters are matched against every candidate so that a
/// parameter bound to an excluded field can be reported precisely.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub member: Member,
    /// The index in the selected member list.
    pub slot: Option<usize>,
}

/// Selects the members of a struct, own fields first, then inherited ones,
/// then properties. Names already seen are skipped.
pub(crate) fn select(
    info: &'static TypeInfo,
    struct_info: &'static StructInfo,
    ctx: &DescribeContext<'_>,
) -> (Vec<Member>, Vec<Candidate>) {
    let mut selection = Selection::default();
    selection.walk(info, struct_info, &mut Vec::new(), ctx);
    (selection.members, selection.candidates)
}

#[derive(Default)]
struct Selection {
    members: Vec<Member>,
    candidates: Vec<Candidate>,
    seen: HashSet<&'static str>,
}

impl Selection {
    fn walk(
        &mut self,
        type_info: &'static TypeInfo,
        info: &'static StructInfo,
        path: &mut Vec<&'static str>,
        ctx: &DescribeContext<'_>,
    ) {
        let extra = ctx.extra_fields(type_info);

        for field in info.fields().iter().filter(|field| !field.is_base()) {
            if !self.seen.insert(field.name()) {
                continue;
            }
            let member = Member {
                name: field.name(),
                kind: MemberKind::Field,
                type_info: field.type_info(),
                base_path: path.clone(),
            };
            let forced = extra.contains(&field.name());
            let slot = ctx
                .includes(field.flags(), forced, field.type_info())
                .then(|| self.push(member.clone()));
            self.candidates.push(Candidate { member, slot });
        }

        for base in info.fields().iter().filter(|field| field.is_base()) {
            if base.flags().contains(FieldFlags::NEVER_SERIALIZE) {
                continue;
            }
            let base_type = base.type_info();
            if let TypeInfo::Struct(base_info) = base_type {
                path.push(base.name());
                self.walk(base_type, base_info, path, ctx);
                path.pop();
            }
        }

        for property in info.properties() {
            if !property.has_setter() || !self.seen.insert(property.name()) {
                continue;
            }
            let forced = extra.contains(&property.name());
            if ctx.includes(property.flags(), forced, property.type_info()) {
                self.push(Member {
                    name: property.name(),
                    kind: MemberKind::Property,
                    type_info: property.type_info(),
                    base_path: path.clone(),
                });
            }
        }
    }

    fn push(&mut self, member: Member) -> usize {
        self.members.push(member);
        self.members.len() - 1
    }
}
