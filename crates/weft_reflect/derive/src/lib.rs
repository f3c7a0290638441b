//! Derive and helper macros for `weft_reflect`.
//!
//! - [`Reflect`]
//! - [`impl_reflect_opaque`]
//! - [`impl_type_path`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection derivation
///
/// `#[derive(Reflect)]` implements `TypePath`, `Typed`, `Reflect` and
/// `GetTypeMeta`, plus `Struct` for structs with named fields (and unit
/// structs) or `Enum` for field-less enums. Tuple structs, data-carrying
/// enums and unions are rejected.
///
/// The type path is `module_path!()` followed by the type name, with the
/// paths of generic arguments appended.
///
/// ## Type attributes
///
/// Standard traits the type implements, registered as type traits:
///
/// - `default`: `Default`, registers `TypeTraitDefault`.
/// - `clone`: `Clone`, used by `reflect_clone`.
/// - `convert`: `Display` + `FromStr`, registers `TypeTraitConvert`.
/// - `serialize` / `deserialize`: serde, registers `TypeTraitSerialize` /
///   `TypeTraitDeserialize`. `serde` enables both.
///
/// Constructors and members:
///
/// - `constructor(name(param: Type, ...))`: the associated function
///   `Self::name` becomes a parametric constructor. Repeatable.
/// - `memberwise = false`: do not generate the `memberwise` constructor that
///   takes every reflected field, in declaration order.
/// - `property(name = "...", get = method, set = method)`: a member read
///   through `fn(&self) -> T` and written through `fn(&mut self, T)`.
///   `name` defaults to the getter name, `set` is optional.
///
/// `auto_register` submits the type for `TypeRegistry::auto_register`.
/// It has no effect on generic types.
///
/// ```rust, ignore
/// #[derive(Reflect, Default, Clone)]
/// #[reflect(default, clone, auto_register)]
/// #[reflect(property(name = "area", get = area))]
/// struct Rect {
///     width: u32,
///     height: u32,
/// }
/// ```
///
/// ## Field attributes
///
/// - `skip`: not reflected at all, filled with `Default::default()` by the
///   memberwise constructor.
/// - `always_serialize` / `never_serialize`: force the field in or out.
/// - `non_serialized`, `hidden` (also `#[doc(hidden)]`): out unless forced.
/// - `base`: the field embeds a base struct whose members are inherited.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    use crate::derive_data::ReflectDerive;

    let ast = parse_macro_input!(input as DeriveInput);

    match ReflectDerive::from_input(&ast) {
        Ok(ReflectDerive::Struct(info)) => impls::impl_struct(&info).into(),
        Ok(ReflectDerive::Enum(info)) => impls::impl_enum(&info).into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Implements reflection for a type without exposing its structure.
///
/// A path with a leading `::` is used as the type path verbatim (without the
/// colons). Any other path is named after the invoking module.
///
/// Type attributes are accepted as an outer `#[reflect(...)]` attribute,
/// constructors and properties excepted.
///
/// ```rust, ignore
/// impl_reflect_opaque!(#[reflect(clone, default)] ::uuid::Uuid);
/// ```
#[proc_macro]
pub fn impl_reflect_opaque(input: TokenStream) -> TokenStream {
    use crate::derive_data::{ReflectMeta, ReflectOpaqueParser, TypeParser};

    let ReflectOpaqueParser {
        attrs,
        type_path,
        generics,
    } = parse_macro_input!(input with ReflectOpaqueParser::parse);

    let parser = TypeParser::new_foreign(&type_path, &generics);
    let meta = ReflectMeta::new(attrs, parser);

    impls::impl_opaque(&meta).into()
}

/// Implements `TypePath` for a foreign type.
///
/// Every type parameter must implement `TypePath`.
///
/// ```rust, ignore
/// impl_type_path!(::alloc::vec::Vec<T>);
/// // `Vec<i32>` => "alloc::vec::Vec<i32>", name "Vec<i32>"
/// ```
#[proc_macro]
pub fn impl_type_path(input: TokenStream) -> TokenStream {
    use crate::derive_data::{ReflectMeta, ReflectTypePathParser, TypeAttributes, TypeParser};

    let ReflectTypePathParser {
        type_path,
        generics,
    } = parse_macro_input!(input with ReflectTypePathParser::parse);

    let parser = TypeParser::new_foreign(&type_path, &generics);
    let meta = ReflectMeta::new(TypeAttributes::default(), parser);

    impls::impl_trait_type_path(&meta).into()
}
