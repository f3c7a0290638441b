use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use weft_reflect::info::TypeInfo;
use weft_reflect::registry::TypeRegistry;
use weft_utils::hash::HashSet;
use weft_utils::{LfuCache, TypeIdMap};

use super::{FilterSet, ModifierSet, NamingConvention};
use crate::container::Container;
use crate::descriptor::{self, DescribeContext, TypeDescriptor};
use crate::record::ModuleIdentifier;

// -----------------------------------------------------------------------------
// CombinedModifiers

/// Several modifier sets merged into one, with the descriptors derived
/// under them.
///
/// Lists are concatenated in set order. Naming conventions with the same
/// name are kept once.
pub struct CombinedModifiers {
    key: Vec<u64>,
    identities: Vec<ModuleIdentifier>,
    containers: Vec<Arc<dyn Container>>,
    filters: Vec<Arc<dyn FilterSet>>,
    forced_parametric: Vec<TypeId>,
    naming: Vec<Arc<dyn NamingConvention>>,
    descriptors: TypeIdMap<Arc<TypeDescriptor>>,
    invalid_containers: HashSet<TypeId>,
}

impl CombinedModifiers {
    pub fn new(sets: &[Arc<ModifierSet>]) -> Self {
        let mut naming: Vec<Arc<dyn NamingConvention>> = Vec::new();
        for convention in sets.iter().flat_map(|set| set.naming()) {
            if naming.iter().all(|known| known.name() != convention.name()) {
                naming.push(convention.clone());
            }
        }

        Self {
            key: Self::key_of(sets),
            identities: sets.iter().map(|set| set.identity().clone()).collect(),
            containers: sets.iter().flat_map(|set| set.containers()).cloned().collect(),
            filters: sets.iter().flat_map(|set| set.filters()).cloned().collect(),
            forced_parametric: sets
                .iter()
                .flat_map(|set| set.forced_parametric())
                .copied()
                .collect(),
            naming,
            descriptors: TypeIdMap::default(),
            invalid_containers: HashSet::default(),
        }
    }

    /// The cache key of a combination: the set ids in order.
    pub fn key_of(sets: &[Arc<ModifierSet>]) -> Vec<u64> {
        sets.iter().map(|set| set.id()).collect()
    }

    #[inline]
    pub fn key(&self) -> &[u64] {
        &self.key
    }

    #[inline]
    pub fn identities(&self) -> &[ModuleIdentifier] {
        &self.identities
    }

    #[inline]
    pub fn containers(&self) -> &[Arc<dyn Container>] {
        &self.containers
    }

    /// Returns the descriptor of `info`, deriving it on first use.
    pub fn describe(&mut self, info: &'static TypeInfo, registry: &TypeRegistry) -> Arc<TypeDescriptor> {
        if let Some(descriptor) = self.descriptors.get(&info.type_id()) {
            return descriptor.clone();
        }
        let ctx = DescribeContext {
            registry,
            filters: &self.filters,
            naming: &self.naming,
            forced_parametric: &self.forced_parametric,
            containers: &self.containers,
        };
        let descriptor = Arc::new(descriptor::describe(info, &ctx));
        self.descriptors.insert(info.type_id(), descriptor.clone());
        descriptor
    }

    /// The container to use for `descriptor`, unless it failed before.
    pub fn container_for<'d>(&self, descriptor: &'d TypeDescriptor) -> Option<&'d Arc<dyn Container>> {
        if self.invalid_containers.contains(&descriptor.info().type_id()) {
            return None;
        }
        descriptor.container()
    }

    /// Stops using the container of a type for the rest of this combination.
    pub fn invalidate_container(&mut self, type_id: TypeId) {
        self.invalid_containers.insert(type_id);
    }

    /// The container whose substitute type is `type_id`.
    pub fn container_for_substitute(&self, type_id: TypeId) -> Option<&Arc<dyn Container>> {
        self.containers
            .iter()
            .find(|container| container.substitute_info().type_id() == type_id)
    }

    /// Registers the substitute types of every container.
    pub fn register_substitutes(&self, registry: &mut TypeRegistry) {
        for container in &self.containers {
            container.register_substitute(registry);
        }
    }
}

impl fmt::Debug for CombinedModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedModifiers")
            .field("key", &self.key)
            .field("containers", &self.containers)
            .field("filters", &self.filters)
            .field("naming", &self.naming)
            .field("descriptors", &self.descriptors.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ModifierCache

/// The most frequently used modifier combinations.
pub struct ModifierCache {
    cache: LfuCache<Vec<u64>, CombinedModifiers>,
}

impl ModifierCache {
    pub const CAPACITY: usize = 8;

    pub fn new() -> Self {
        Self {
            cache: LfuCache::new(Self::CAPACITY),
        }
    }

    /// Returns the combination of `sets`, building it if needed.
    pub fn combine(&mut self, sets: &[Arc<ModifierSet>]) -> &mut CombinedModifiers {
        let key = CombinedModifiers::key_of(sets);
        if !self.cache.contains(&key) {
            if let Some((evicted, _)) = self.cache.insert(key.clone(), CombinedModifiers::new(sets)) {
                log::debug!("modifier combination {evicted:?} evicted");
            }
        }
        self.cache
            .get_or_insert_with(key, || CombinedModifiers::new(sets))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn contains(&self, sets: &[Arc<ModifierSet>]) -> bool {
        self.cache.contains(&CombinedModifiers::key_of(sets))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use weft_reflect::info::Typed;
    use weft_reflect::registry::TypeRegistry;

    use super::{CombinedModifiers, ModifierCache};
    use crate::container::NullableContainer;
    use crate::modifiers::{ExactName, ModifierSet};
    use crate::record::ModuleIdentifier;

    fn set(name: &str) -> Arc<ModifierSet> {
        let identity = ModuleIdentifier::new(name, format!("{name}@1"), name);
        Arc::new(ModifierSet::builder(identity).naming(ExactName).build())
    }

    #[test]
    fn naming_conventions_are_deduplicated() {
        let first = set("a");
        let combined = CombinedModifiers::new(&[first.clone(), Arc::new(ModifierSet::builtin())]);
        let names: Vec<_> = combined.naming.iter().map(|n| n.name()).collect();
        assert_eq!(names, ["exact", "underscore-prefix", "case-flip"]);
        assert_eq!(combined.key()[0], first.id());
    }

    #[test]
    fn sets_with_one_identity_are_cached_apart() {
        let mut cache = ModifierCache::new();
        let plain = [set("app")];
        let other = [set("app")];
        assert_ne!(plain[0].id(), other[0].id());

        cache.combine(&plain);
        assert!(cache.contains(&plain));
        assert!(!cache.contains(&other));
        cache.combine(&other);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn descriptors_are_cached() {
        let registry = TypeRegistry::new();
        let mut combined = CombinedModifiers::new(&[Arc::new(ModifierSet::builtin())]);
        let first = combined.describe(u32::type_info(), &registry);
        let second = combined.describe(u32::type_info(), &registry);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn substitute_lookup() {
        let identity = ModuleIdentifier::new("n", "n@1", "n");
        let sets = [Arc::new(ModifierSet::builder(identity).container(NullableContainer).build())];
        let combined = CombinedModifiers::new(&sets);
        let info = combined.containers()[0].substitute_info();
        assert!(combined.container_for_substitute(info.type_id()).is_some());
    }

    #[test]
    fn least_frequent_combination_is_evicted() {
        let mut cache = ModifierCache::new();
        let hot = [set("hot")];
        cache.combine(&hot);
        cache.combine(&hot);
        for index in 0..ModifierCache::CAPACITY {
            cache.combine(&[set(&format!("cold{index}"))]);
        }
        assert_eq!(cache.len(), ModifierCache::CAPACITY);
        assert!(cache.contains(&hot));
        assert!(!cache.contains(&[set("cold0")]));
    }
}
