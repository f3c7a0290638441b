//! Caller-supplied configuration of the type descriptor layer.
//!
//! A [`ModifierSet`] bundles containers, filter sets, forced parametric
//! types and naming conventions under a [`ModuleIdentifier`]. Sets are
//! combined by concatenation, the first set deciding single-valued
//! questions. Combinations are expensive, so the last few are kept in a
//! frequency-ordered cache together with the descriptors derived under them.
//!
//! # Menu
//!
//! - [`ModifierSet`] / [`ModifierSetBuilder`]
//! - [`FilterSet`]: type policy, constructor probing, extra fields.
//! - [`NamingConvention`]: [`ExactName`], [`UnderscorePrefix`], [`CaseFlip`].
//! - [`CombinedModifiers`] / [`ModifierCache`]
//! - [`ModifierProvider`]: modules a reader can load by name.

use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use weft_reflect::info::TypePath;
use weft_reflect::registry::TypeRegistry;

use crate::container::{
    Container, ConverterContainer, SerdeBlobContainer, TypeHandleContainer, UuidContainer,
};
use crate::record::ModuleIdentifier;

// -----------------------------------------------------------------------------
// Modules

mod combined;
mod filter;
mod naming;

// -----------------------------------------------------------------------------
// Exports

pub use combined::{CombinedModifiers, ModifierCache};
pub use filter::FilterSet;
pub use naming::{CaseFlip, ExactName, NamingConvention, UnderscorePrefix};

// -----------------------------------------------------------------------------
// ModifierSet

/// One module's contribution to type handling.
///
/// Every built set has its own [`id`](Self::id), so two sets sharing an
/// identity are still told apart.
pub struct ModifierSet {
    id: u64,
    identity: ModuleIdentifier,
    containers: Vec<Arc<dyn Container>>,
    filters: Vec<Arc<dyn FilterSet>>,
    forced_parametric: Vec<TypeId>,
    naming: Vec<Arc<dyn NamingConvention>>,
}

impl ModifierSet {
    pub fn builder(identity: ModuleIdentifier) -> ModifierSetBuilder {
        ModifierSetBuilder {
            set: Self {
                id: 0,
                identity,
                containers: Vec::new(),
                filters: Vec::new(),
                forced_parametric: Vec::new(),
                naming: Vec::new(),
            },
        }
    }

    /// The set every engine appends after the caller's sets.
    ///
    /// Containers: serde blob, converter, uuid, type handle. Naming
    /// conventions: exact name, underscore prefix, case flip.
    pub fn builtin() -> Self {
        Self::builder(ModuleIdentifier::builtin())
            .container(SerdeBlobContainer)
            .container(ConverterContainer)
            .container(UuidContainer)
            .container(TypeHandleContainer)
            .naming(ExactName)
            .naming(UnderscorePrefix)
            .naming(CaseFlip)
            .build()
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn identity(&self) -> &ModuleIdentifier {
        &self.identity
    }

    #[inline]
    pub fn containers(&self) -> &[Arc<dyn Container>] {
        &self.containers
    }

    #[inline]
    pub fn filters(&self) -> &[Arc<dyn FilterSet>] {
        &self.filters
    }

    #[inline]
    pub fn forced_parametric(&self) -> &[TypeId] {
        &self.forced_parametric
    }

    #[inline]
    pub fn naming(&self) -> &[Arc<dyn NamingConvention>] {
        &self.naming
    }
}

impl fmt::Debug for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierSet")
            .field("id", &self.id)
            .field("identity", &self.identity.full_name)
            .field("containers", &self.containers)
            .field("filters", &self.filters)
            .field("forced_parametric", &self.forced_parametric.len())
            .field("naming", &self.naming)
            .finish()
    }
}

/// Builds a [`ModifierSet`].
///
/// ```
/// use weft_graph::container::NullableContainer;
/// use weft_graph::modifiers::{ExactName, ModifierSet};
/// use weft_graph::record::ModuleIdentifier;
///
/// let set = ModifierSet::builder(ModuleIdentifier::new("app", "app@1", "app"))
///     .container(NullableContainer)
///     .naming(ExactName)
///     .build();
/// assert_eq!(set.containers().len(), 1);
/// ```
pub struct ModifierSetBuilder {
    set: ModifierSet,
}

impl ModifierSetBuilder {
    pub fn container(mut self, container: impl Container) -> Self {
        self.set.containers.push(Arc::new(container));
        self
    }

    pub fn filter(mut self, filter: impl FilterSet) -> Self {
        self.set.filters.push(Arc::new(filter));
        self
    }

    /// `T` is built through a parametric constructor even if it has a default.
    pub fn force_parametric<T: TypePath>(mut self) -> Self {
        self.set.forced_parametric.push(TypeId::of::<T>());
        self
    }

    pub fn naming(mut self, convention: impl NamingConvention) -> Self {
        self.set.naming.push(Arc::new(convention));
        self
    }

    pub fn build(mut self) -> ModifierSet {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        self.set.id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        self.set
    }
}

// -----------------------------------------------------------------------------
// ModifierProvider

/// A module whose types a reader can load when a stream header names it.
///
/// ```
/// use weft_graph::modifiers::ModifierProvider;
/// use weft_reflect::registry::TypeRegistry;
///
/// fn register(registry: &mut TypeRegistry) {
///     registry.register::<Vec<u64>>();
/// }
///
/// weft_graph::inventory::submit! {
///     ModifierProvider::new("doc-module", register)
/// }
///
/// let provider = ModifierProvider::find("doc-module").unwrap();
/// let mut registry = TypeRegistry::new();
/// provider.load(&mut registry);
/// assert!(registry.contains(core::any::TypeId::of::<Vec<u64>>()));
/// ```
pub struct ModifierProvider {
    module: &'static str,
    register_types: fn(&mut TypeRegistry),
}

impl ModifierProvider {
    pub const fn new(module: &'static str, register_types: fn(&mut TypeRegistry)) -> Self {
        Self {
            module,
            register_types,
        }
    }

    #[inline]
    pub const fn module(&self) -> &'static str {
        self.module
    }

    pub fn load(&self, registry: &mut TypeRegistry) {
        (self.register_types)(registry);
    }

    /// Finds a provider by short or full module name.
    pub fn find(name: &str) -> Option<&'static Self> {
        inventory::iter::<Self>
            .into_iter()
            .find(|provider| provider.module == name)
    }
}

inventory::collect!(ModifierProvider);

fn register_builtin(registry: &mut TypeRegistry) {
    for container in ModifierSet::builtin().containers() {
        container.register_substitute(registry);
    }
}

inventory::submit! {
    ModifierProvider::new(env!("CARGO_PKG_NAME"), register_builtin)
}
