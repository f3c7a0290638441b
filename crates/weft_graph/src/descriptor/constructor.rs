use core::fmt;
use core::panic::AssertUnwindSafe;
use std::panic::catch_unwind;

use weft_reflect::info::TypeInfo;
use weft_reflect::registry::{ConstructorInfo, TypeTraitConstructors, TypeTraitDefault};

use super::DescribeContext;
use super::member::Candidate;
use crate::error::ConstructError;

// -----------------------------------------------------------------------------
// Construction

/// How values of a type are built while reading.
#[derive(Clone)]
pub enum Construction {
    /// Built from its default, then every member is assigned.
    Default(TypeTraitDefault),
    /// Built by `constructor`, parameter `i` taking member `arguments[i]`.
    /// Members not consumed are assigned afterwards.
    Parametric {
        constructor: ConstructorInfo,
        arguments: Vec<usize>,
    },
    /// Built by the walk itself: primitives, enums, collections, wrappers.
    Intrinsic,
    Unavailable(ConstructError),
}

impl Construction {
    #[inline]
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable(_))
    }
}

impl fmt::Debug for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default(_) => f.write_str("Default"),
            Self::Parametric {
                constructor,
                arguments,
            } => f
                .debug_struct("Parametric")
                .field("constructor", &constructor.name())
                .field("arguments", arguments)
                .finish(),
            Self::Intrinsic => f.write_str("Intrinsic"),
            Self::Unavailable(err) => f.debug_tuple("Unavailable").field(err).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Analysis

/// Picks the construction strategy of a struct.
///
/// The default constructor wins unless the type is forced parametric, in
/// which case a parametric constructor is tried first.
pub(crate) fn analyze(
    info: &'static TypeInfo,
    candidates: &[Candidate],
    ctx: &DescribeContext<'_>,
) -> Construction {
    let type_path = info.type_path();
    let Some(meta) = ctx.registry.get(info.type_id()) else {
        return Construction::Unavailable(ConstructError::NotConstructible { type_path });
    };
    let default = meta.get_trait::<TypeTraitDefault>();
    let constructors = meta.get_trait::<TypeTraitConstructors>();

    if ctx.is_forced_parametric(info)
        && let Some(constructors) = constructors
        && let Ok(found) = parametric(info, constructors, candidates, ctx)
    {
        return found;
    }

    if let Some(default) = default
        && test_default(info, default, ctx)
    {
        return Construction::Default(default.clone());
    }

    match constructors {
        Some(constructors) => parametric(info, constructors, candidates, ctx)
            .unwrap_or_else(Construction::Unavailable),
        None => Construction::Unavailable(ConstructError::NotConstructible { type_path }),
    }
}

/// Calls the default constructor once, unless a filter refuses.
fn test_default(
    info: &'static TypeInfo,
    default: &TypeTraitDefault,
    ctx: &DescribeContext<'_>,
) -> bool {
    let allowed = ctx
        .filters
        .iter()
        .find_map(|filter| filter.can_test_constructor(info))
        .unwrap_or(true);
    if !allowed {
        return true;
    }

    match catch_unwind(AssertUnwindSafe(|| default.default())) {
        Ok(instance) => {
            for filter in ctx.filters {
                filter.cleanup_test_instance(&*instance);
            }
            true
        }
        Err(_) => {
            log::warn!(
                "the default constructor of `{}` panicked, looking for a parametric one",
                info.type_path()
            );
            false
        }
    }
}

/// Finds the constructor with the most parameters whose every parameter
/// binds to a distinct selected field.
fn parametric(
    info: &'static TypeInfo,
    constructors: &TypeTraitConstructors,
    candidates: &[Candidate],
    ctx: &DescribeContext<'_>,
) -> Result<Construction, ConstructError> {
    let mut ordered: Vec<&ConstructorInfo> = constructors.iter().collect();
    ordered.sort_by_key(|ctor| core::cmp::Reverse(ctor.params().len()));

    let mut filtered = None;
    'constructors: for ctor in ordered {
        let mut used = vec![false; candidates.len()];
        let mut arguments = Vec::with_capacity(ctor.params().len());

        for param in ctor.params() {
            let bound = ctx.naming.iter().find_map(|convention| {
                candidates.iter().enumerate().find(|(index, candidate)| {
                    !used[*index]
                        && candidate.member.type_info().ty() == param.ty()
                        && convention.matches(param.name(), candidate.member.name())
                })
            });
            match bound {
                Some((index, Candidate { slot: Some(slot), .. })) => {
                    used[index] = true;
                    arguments.push(*slot);
                }
                Some((_, candidate)) => {
                    filtered.get_or_insert(ConstructError::FilteredParameter {
                        type_path: info.type_path(),
                        constructor: ctor.name(),
                        parameter: param.name(),
                        field: candidate.member.name(),
                    });
                    continue 'constructors;
                }
                None => continue 'constructors,
            }
        }

        log::trace!(
            "`{}` is built by its `{}` constructor",
            info.type_path(),
            ctor.name()
        );
        return Ok(Construction::Parametric {
            constructor: ctor.clone(),
            arguments,
        });
    }

    Err(filtered.unwrap_or(ConstructError::NotConstructible {
        type_path: info.type_path(),
    }))
}
