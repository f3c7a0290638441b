use core::fmt;

use weft_reflect::Reflect;
use weft_reflect::info::TypeInfo;

/// A bundle of caller-supplied selection rules.
///
/// Every method has a neutral default, so a filter overrides only what it
/// cares about. When several filter sets are active, the first one with an
/// opinion decides.
pub trait FilterSet: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Whether members of this type may be serialized, `None` for no opinion.
    fn type_policy(&self, _info: &'static TypeInfo) -> Option<bool> {
        None
    }

    /// Whether the default constructor of this type may be called once as a
    /// test. A type whose test call is refused is trusted to be constructible.
    fn can_test_constructor(&self, _info: &'static TypeInfo) -> Option<bool> {
        None
    }

    /// Receives the test instance before it is dropped.
    fn cleanup_test_instance(&self, _instance: &dyn Reflect) {}

    /// Fields of this type to include even though annotations exclude them.
    fn extra_fields(&self, _info: &'static TypeInfo) -> Vec<&'static str> {
        Vec::new()
    }
}

impl fmt::Debug for dyn FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
