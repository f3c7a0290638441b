//! The serializable shape of a type.
//!
//! [`describe`] derives a [`TypeDescriptor`] from reflected type information
//! and the active modifiers: its category, the selected members in order,
//! how values are constructed and whether a container stands in for it.
//! Descriptors are immutable and cached per modifier combination.
//!
//! # Member selection
//!
//! Own fields come first, then the fields of embedded bases (`#[reflect(base)]`)
//! and finally properties with a setter, skipping names already taken.
//! A member is included when
//! - it is forced (`always_serialize` or a filter's extra field), or
//! - it is not `never_serialize`, `non_serialized` or `hidden`, and the
//!   first filter with an opinion on its type allows it.

use alloc::sync::Arc;
use core::any::TypeId;

use weft_reflect::info::{FieldFlags, ReflectKind, TypeInfo};
use weft_reflect::registry::TypeRegistry;

use crate::container::{self, Container};
use crate::error::ConstructError;
use crate::modifiers::{FilterSet, NamingConvention};

// -----------------------------------------------------------------------------
// Modules

mod constructor;
mod member;

// -----------------------------------------------------------------------------
// Exports

pub use constructor::Construction;
pub use member::{Member, MemberKind, MemberValue};

// -----------------------------------------------------------------------------
// Category

/// The broad shape of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Primitive,
    Enum,
    /// A plain struct, copied by value and never identity-tracked.
    Structure,
    Nullable,
    /// A `Shared` handle, tracked by identity.
    Class,
    /// A `Dynamic` value whose runtime type is always tagged.
    Object,
    Collection,
    Array,
    Dictionary,
    Opaque,
}

impl Category {
    pub fn of(info: &TypeInfo) -> Self {
        match info.kind() {
            ReflectKind::Primitive => Self::Primitive,
            ReflectKind::Enum => Self::Enum,
            ReflectKind::Struct => Self::Structure,
            ReflectKind::Nullable => Self::Nullable,
            ReflectKind::Shared => Self::Class,
            ReflectKind::Dynamic => Self::Object,
            ReflectKind::List => Self::Collection,
            ReflectKind::Array => Self::Array,
            ReflectKind::Map => Self::Dictionary,
            ReflectKind::Opaque => Self::Opaque,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The derived serializable shape of one type.
#[derive(Debug)]
pub struct TypeDescriptor {
    info: &'static TypeInfo,
    category: Category,
    members: Vec<Member>,
    construction: Construction,
    container: Option<Arc<dyn Container>>,
}

impl TypeDescriptor {
    #[inline(always)]
    pub const fn info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline(always)]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<(usize, &Member)> {
        self.members
            .iter()
            .enumerate()
            .find(|(_, member)| member.name() == name)
    }

    #[inline]
    pub fn construction(&self) -> &Construction {
        &self.construction
    }

    /// The container bound to this type, regardless of later invalidation.
    #[inline]
    pub fn container(&self) -> Option<&Arc<dyn Container>> {
        self.container.as_ref()
    }
}

// -----------------------------------------------------------------------------
// DescribeContext

/// Everything a descriptor depends on besides the type itself.
pub(crate) struct DescribeContext<'a> {
    pub registry: &'a TypeRegistry,
    pub filters: &'a [Arc<dyn FilterSet>],
    pub naming: &'a [Arc<dyn NamingConvention>],
    pub forced_parametric: &'a [TypeId],
    pub containers: &'a [Arc<dyn Container>],
}

impl DescribeContext<'_> {
    fn extra_fields(&self, info: &'static TypeInfo) -> Vec<&'static str> {
        self.filters
            .iter()
            .flat_map(|filter| filter.extra_fields(info))
            .collect()
    }

    fn includes(&self, flags: FieldFlags, forced: bool, info: &'static TypeInfo) -> bool {
        if forced || flags.contains(FieldFlags::ALWAYS_SERIALIZE) {
            return true;
        }
        if flags.intersects(
            FieldFlags::NEVER_SERIALIZE | FieldFlags::NON_SERIALIZED | FieldFlags::HIDDEN,
        ) {
            return false;
        }
        self.filters
            .iter()
            .find_map(|filter| filter.type_policy(info))
            .unwrap_or(true)
    }

    fn is_forced_parametric(&self, info: &'static TypeInfo) -> bool {
        self.forced_parametric.contains(&info.type_id())
    }
}

/// Derives the descriptor of `info`.
pub(crate) fn describe(info: &'static TypeInfo, ctx: &DescribeContext<'_>) -> TypeDescriptor {
    let category = Category::of(info);
    let (members, construction) = match info {
        TypeInfo::Struct(struct_info) => {
            let (members, candidates) = member::select(info, struct_info, ctx);
            let construction = constructor::analyze(info, &candidates, ctx);
            (members, construction)
        }
        TypeInfo::Opaque(_) => (
            Vec::new(),
            Construction::Unavailable(ConstructError::NotConstructible {
                type_path: info.type_path(),
            }),
        ),
        _ => (Vec::new(), Construction::Intrinsic),
    };

    let constructible = construction.is_available();
    let container = ctx
        .containers
        .iter()
        .find(|candidate| {
            container::is_eligible(&***candidate, info, constructible)
                && candidate.can_substitute(info, ctx.registry)
        })
        .cloned();

    log::debug!(
        "described `{}`: {} members, {:?}, container {:?}",
        info.type_path(),
        members.len(),
        construction,
        container.as_ref().map(|container| container.name()),
    );

    TypeDescriptor {
        info,
        category,
        members,
        construction,
        container,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use core::any::TypeId;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use weft_reflect::derive::Reflect;
    use weft_reflect::info::{TypeInfo, Typed};
    use weft_reflect::registry::GetTypeMeta;
    use weft_reflect::registry::TypeRegistry;

    use super::{Category, Construction, DescribeContext, MemberKind, describe};
    use crate::error::ConstructError;
    use crate::modifiers::{FilterSet, ModifierSet};

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Animal {
        name: String,
        legs: u8,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    #[reflect(property(name = "loud", get = loud, set = set_loud))]
    #[reflect(property(name = "summary", get = summary))]
    struct Dog {
        #[reflect(base)]
        base: Animal,
        legs: u8,
        #[reflect(never_serialize)]
        cache: u32,
        #[reflect(non_serialized)]
        scratch: u32,
        #[reflect(non_serialized, always_serialize)]
        pinned: u32,
    }

    impl Dog {
        fn loud(&self) -> bool {
            self.legs > 3
        }

        fn set_loud(&mut self, _loud: bool) {}

        fn summary(&self) -> String {
            self.base.name.clone()
        }
    }

    #[derive(Reflect)]
    #[reflect(memberwise = false, constructor(new(x: i32)))]
    struct Point {
        _x: i32,
    }

    impl Point {
        fn new(x: i32) -> Self {
            Self { _x: x }
        }
    }

    #[derive(Reflect)]
    #[reflect(memberwise = false, constructor(new(secret: u32)))]
    struct Guarded {
        #[reflect(never_serialize)]
        secret: u32,
    }

    impl Guarded {
        fn new(secret: u32) -> Self {
            Self { secret }
        }
    }

    #[derive(Reflect)]
    #[reflect(memberwise = false, constructor(two(a: i32, b: i32)), constructor(one(a: i32)))]
    struct Pair {
        a: i32,
        b: i32,
    }

    impl Pair {
        fn two(a: i32, b: i32) -> Self {
            Self { a, b }
        }

        fn one(a: i32) -> Self {
            Self { a, b: 0 }
        }
    }

    struct DenyStrings;

    impl FilterSet for DenyStrings {
        fn name(&self) -> &'static str {
            "deny-strings"
        }

        fn type_policy(&self, info: &'static TypeInfo) -> Option<bool> {
            info.type_is::<String>().then_some(false)
        }
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Both {
        x: i32,
    }

    static DEFAULTS: AtomicUsize = AtomicUsize::new(0);
    static CLEANUPS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Reflect)]
    #[reflect(default)]
    struct Counted {
        n: u8,
    }

    impl Default for Counted {
        fn default() -> Self {
            DEFAULTS.fetch_add(1, Ordering::Relaxed);
            Self { n: 0 }
        }
    }

    struct TrialDefaults {
        allow: bool,
    }

    impl FilterSet for TrialDefaults {
        fn name(&self) -> &'static str {
            "trial-defaults"
        }

        fn can_test_constructor(&self, info: &'static TypeInfo) -> Option<bool> {
            info.type_is::<Counted>().then_some(self.allow)
        }

        fn cleanup_test_instance(&self, instance: &dyn weft_reflect::Reflect) {
            if instance.reflect_type_info().type_is::<Counted>() {
                CLEANUPS.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    #[derive(Reflect)]
    #[reflect(default, memberwise = false, constructor(new(x: i32)))]
    struct Fragile {
        x: i32,
    }

    impl Default for Fragile {
        fn default() -> Self {
            panic!("no default for `Fragile`");
        }
    }

    impl Fragile {
        fn new(x: i32) -> Self {
            Self { x }
        }
    }

    struct KeepCache;

    impl FilterSet for KeepCache {
        fn name(&self) -> &'static str {
            "keep-cache"
        }

        fn extra_fields(&self, info: &'static TypeInfo) -> Vec<&'static str> {
            if info.type_is::<Dog>() {
                vec!["cache"]
            } else {
                Vec::new()
            }
        }
    }

    fn describe_with<T: GetTypeMeta>(
        filters: &[Arc<dyn FilterSet>],
    ) -> super::TypeDescriptor {
        describe_forced::<T>(filters, &[])
    }

    fn describe_forced<T: GetTypeMeta>(
        filters: &[Arc<dyn FilterSet>],
        forced: &[TypeId],
    ) -> super::TypeDescriptor {
        let mut registry = TypeRegistry::new();
        registry.register::<T>();
        let builtin = ModifierSet::builtin();
        let ctx = DescribeContext {
            registry: &registry,
            filters,
            naming: builtin.naming(),
            forced_parametric: forced,
            containers: builtin.containers(),
        };
        describe(T::type_info(), &ctx)
    }

    #[test]
    fn selects_own_then_base_then_properties() {
        let desc = describe_with::<Dog>(&[]);
        let names: Vec<_> = desc.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["legs", "pinned", "name", "loud"]);
        assert_eq!(desc.members()[2].base_path(), ["base"]);
        assert_eq!(desc.members()[3].kind(), MemberKind::Property);
        assert_eq!(desc.category(), Category::Structure);
        assert!(matches!(desc.construction(), Construction::Default(_)));
    }

    #[test]
    fn filters_decide_by_member_type() {
        let filters: [Arc<dyn FilterSet>; 1] = [Arc::new(DenyStrings)];
        let desc = describe_with::<Dog>(&filters);
        assert!(desc.member("name").is_none());
        assert!(desc.member("legs").is_some());
    }

    #[test]
    fn parameters_bind_through_naming_conventions() {
        let desc = describe_with::<Point>(&[]);
        let Construction::Parametric {
            constructor,
            arguments,
        } = desc.construction()
        else {
            panic!("{:?}", desc.construction());
        };
        assert_eq!(constructor.name(), "new");
        assert_eq!(arguments, &[0]);
    }

    #[test]
    fn widest_constructor_wins() {
        let desc = describe_with::<Pair>(&[]);
        let Construction::Parametric { constructor, .. } = desc.construction() else {
            panic!("{:?}", desc.construction());
        };
        assert_eq!(constructor.name(), "two");
    }

    #[test]
    fn parameter_bound_to_excluded_field_is_reported() {
        let desc = describe_with::<Guarded>(&[]);
        let Construction::Unavailable(err) = desc.construction() else {
            panic!("{:?}", desc.construction());
        };
        assert!(matches!(
            err,
            ConstructError::FilteredParameter {
                parameter: "secret",
                field: "secret",
                ..
            }
        ));
        assert!(desc.container().is_none());
    }

    #[test]
    fn forced_types_prefer_a_parametric_constructor() {
        let desc = describe_with::<Both>(&[]);
        assert!(matches!(desc.construction(), Construction::Default(_)));

        let forced = [Both::type_info().type_id()];
        let desc = describe_forced::<Both>(&[], &forced);
        let Construction::Parametric { constructor, .. } = desc.construction() else {
            panic!("{:?}", desc.construction());
        };
        assert_eq!(constructor.name(), "memberwise");
    }

    #[test]
    fn refused_defaults_are_trusted_without_a_call() {
        let refuse: [Arc<dyn FilterSet>; 1] = [Arc::new(TrialDefaults { allow: false })];
        let desc = describe_with::<Counted>(&refuse);
        assert!(matches!(desc.construction(), Construction::Default(_)));
        assert_eq!(DEFAULTS.load(Ordering::Relaxed), 0);
        assert_eq!(CLEANUPS.load(Ordering::Relaxed), 0);

        let allow: [Arc<dyn FilterSet>; 1] = [Arc::new(TrialDefaults { allow: true })];
        let desc = describe_with::<Counted>(&allow);
        assert!(matches!(desc.construction(), Construction::Default(_)));
        assert_eq!(DEFAULTS.load(Ordering::Relaxed), 1);
        assert_eq!(CLEANUPS.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn panicking_default_falls_back_to_a_constructor() {
        let desc = describe_with::<Fragile>(&[]);
        let Construction::Parametric { constructor, .. } = desc.construction() else {
            panic!("{:?}", desc.construction());
        };
        assert_eq!(constructor.name(), "new");
    }

    #[test]
    fn extra_fields_override_exclusions() {
        assert!(describe_with::<Dog>(&[]).member("cache").is_none());
        let filters: [Arc<dyn FilterSet>; 1] = [Arc::new(KeepCache)];
        let desc = describe_with::<Dog>(&filters);
        assert!(desc.member("cache").is_some());
        assert!(desc.member("scratch").is_none());
    }
}
