use crate::info::Typed;

/// Builds a [`TypeTrait`] for the type `T`.
///
/// Used by `#[derive(Reflect)]` to fill the trait table of a [`TypeMeta`].
///
/// ```
/// # use weft_reflect::registry::{TypeMeta, TypeTraitDefault, FromType};
/// let mut meta = TypeMeta::of::<String>();
///
/// meta.insert_trait::<TypeTraitDefault>(FromType::<String>::from_type());
/// ```
///
/// [`TypeTrait`]: crate::registry::TypeTrait
/// [`TypeMeta`]: crate::registry::TypeMeta
pub trait FromType<T: Typed> {
    fn from_type() -> Self;
}
