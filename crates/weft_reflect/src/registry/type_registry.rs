use core::any::TypeId;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use weft_utils::TypeIdMap;
use weft_utils::hash::{HashMap, HashSet};

use crate::Dynamic;
use crate::info::{TypeHandle, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTrait};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of [reflected] types.
///
/// [Registering] a type stores the [`TypeMeta`] produced by its
/// [`GetTypeMeta`] implementation, indexed by [`TypeId`], full type path and
/// short type name. The serializer resolves type descriptors read from a
/// stream through the path index.
///
/// # Example
///
/// ```
/// use weft_reflect::registry::{TypeRegistry, TypeTraitDefault};
/// use weft_reflect::info::DynamicTypePath;
///
/// let registry = TypeRegistry::new();
///
/// let generator = registry
///     .get_with_type_name("String").unwrap()
///     .get_trait::<TypeTraitDefault>().unwrap();
///
/// let s = generator.default();
/// assert_eq!(s.reflect_type_path(), "alloc::string::String");
/// ```
///
/// [reflected]: crate
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    pub fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Creates a registry holding every primitive type plus [`Dynamic`].
    ///
    /// - `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String`
    /// - `NaiveDateTime` `DateTime<Utc>` `DateTime<Local>`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<NaiveDateTime>();
        registry.register::<DateTime<Utc>>();
        registry.register::<DateTime<Local>>();
        registry.register::<Dynamic>();
        registry.register::<TypeHandle>();
        registry.register::<uuid::Uuid>();
        registry
    }

    // The type must not be registered yet.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        type_path_to_id.insert(ty.path(), ty.id());
    }

    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_meta: impl FnOnce() -> TypeMeta,
    ) -> bool {
        self.type_meta_table.try_insert(type_id, || {
            let meta = get_type_meta();
            Self::add_new_type_indices(
                &meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            meta
        })
    }

    /// Registers `T` and, recursively, its dependencies.
    ///
    /// Does nothing if `T` is already registered.
    ///
    /// ```
    /// # use core::any::TypeId;
    /// # use weft_reflect::{derive::Reflect, registry::{TypeRegistry, TypeTraitDefault}};
    /// #[derive(Reflect, Default)]
    /// #[reflect(default)]
    /// struct Foo {
    ///     name: Option<String>,
    ///     value: i32,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register::<Foo>();
    ///
    /// assert!(registry.contains(TypeId::of::<Foo>()));
    /// assert!(registry.contains(TypeId::of::<Option<String>>()));
    /// assert!(registry.contains(TypeId::of::<i32>()));
    /// assert!(registry.get_type_trait::<TypeTraitDefault>(TypeId::of::<Foo>()).is_some());
    /// ```
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            T::register_dependencies(self);
        }
    }

    /// Registers every type annotated with `#[reflect(auto_register)]`.
    ///
    /// Repeated calls are cheap. Returns `true` if the `auto_register`
    /// feature is on and the platform supports static registration.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        use crate::__macro_exports::auto_register;

        if !cfg!(feature = "auto_register") {
            return false;
        }
        if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
            return true;
        }
        auto_register::__register_types(self);
        self.contains(TypeId::of::<auto_register::__AvailFlag>())
    }

    /// Adds the type trait `D` to the already registered type `T`.
    ///
    /// Returns `false` if `T` is not registered.
    ///
    /// ```
    /// use weft_reflect::registry::{TypeRegistry, TypeTraitConvert};
    ///
    /// let mut registry = TypeRegistry::new();
    /// assert!(registry.register_type_trait::<u64, TypeTraitConvert>());
    /// ```
    pub fn register_type_trait<T: Typed, D: TypeTrait + FromType<T>>(&mut self) -> bool {
        match self.type_meta_table.get_mut(&TypeId::of::<T>()) {
            Some(type_meta) => {
                type_meta.insert_trait(D::from_type());
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Looks a type up by its full [type path], as written in type records.
    ///
    /// [type path]: crate::info::TypePath::type_path
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    /// Looks a type up by its short [type name]. Ambiguous names find nothing.
    ///
    /// [type name]: crate::info::TypePath::type_name
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        self.type_name_to_id
            .get(type_name)
            .and_then(|id| self.get(*id))
    }

    /// Whether two registered types share the short name `type_name`.
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        self.get(type_id)?.get_trait::<T>()
    }

    /// The number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::Shared;
    use crate::registry::{TypeTraitConvert, TypeTraitDefault};

    #[test]
    fn new_holds_primitives() {
        let registry = TypeRegistry::new();
        assert!(!registry.is_empty());
        assert!(TypeRegistry::empty().is_empty());
        assert!(registry.contains(TypeId::of::<u128>()));
        assert!(registry.get_with_type_path("alloc::string::String").is_some());
        assert!(registry.get_with_type_name("f64").is_some());
    }

    #[test]
    fn register_pulls_dependencies() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Shared<Vec<Option<u8>>>>();
        assert!(registry.contains(TypeId::of::<Vec<Option<u8>>>()));
        assert!(registry.contains(TypeId::of::<Option<u8>>()));
        assert!(registry.contains(TypeId::of::<u8>()));
    }

    #[test]
    fn register_type_trait_needs_registration() {
        let mut registry = TypeRegistry::empty();
        assert!(!registry.register_type_trait::<u8, TypeTraitDefault>());
        registry.register::<u8>();
        assert!(registry.register_type_trait::<u8, TypeTraitConvert>());
        assert!(registry.get_type_trait::<TypeTraitConvert>(TypeId::of::<u8>()).is_some());
    }

    #[test]
    fn ambiguous_names_are_not_indexed() {
        mod a {
            #[derive(crate::derive::Reflect)]
            pub struct Twin;
        }
        mod b {
            #[derive(crate::derive::Reflect)]
            pub struct Twin;
        }

        let mut registry = TypeRegistry::empty();
        registry.register::<a::Twin>();
        registry.register::<b::Twin>();
        assert!(registry.is_ambiguous("Twin"));
        assert!(registry.get_with_type_name("Twin").is_none());
        assert!(registry.get_with_type_path(&format!("{}::a::Twin", module_path!())).is_some());
    }
}
