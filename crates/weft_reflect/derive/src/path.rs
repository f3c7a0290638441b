//! Paths into `weft_reflect` used by the generated code.
//!
//! Kept in one place so a layout change in `weft_reflect` touches only this
//! module.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// The access path of the `weft_reflect` crate from the invoking crate.
///
/// 1. Crates depending on `weft_reflect` get `::weft_reflect`.
/// 2. Crates depending on `weft` get `::weft::reflect`.
/// 3. Anything else falls back to `::weft_reflect`.
///
/// Reading the manifest is not cheap, so the path is computed once per
/// macro invocation and passed around.
pub(crate) fn weft_reflect() -> syn::Path {
    weft_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("weft_reflect"))
}

macro_rules! reflect_paths {
    ($($name:ident => $($seg:ident)::+;)*) => {
        $(
            #[inline(always)]
            pub(crate) fn $name(weft_reflect_path: &syn::Path) -> TokenStream {
                quote! { #weft_reflect_path::$($seg)::+ }
            }
        )*
    };
}

// -----------------------------------------------------------------------------
// Root and macro exports

reflect_paths! {
    reflect_ => Reflect;
    macro_utils_ => __macro_exports::macro_utils;
    auto_register_ => __macro_exports::auto_register;
}

// -----------------------------------------------------------------------------
// info

reflect_paths! {
    type_path_ => info::TypePath;
    typed_ => info::Typed;
    type_info_ => info::TypeInfo;
    reflect_kind_ => info::ReflectKind;
    struct_info_ => info::StructInfo;
    named_field_ => info::NamedField;
    field_flags_ => info::FieldFlags;
    property_info_ => info::PropertyInfo;
    enum_info_ => info::EnumInfo;
    variant_info_ => info::VariantInfo;
    opaque_info_ => info::OpaqueInfo;
}

// -----------------------------------------------------------------------------
// cell

reflect_paths! {
    non_generic_type_info_cell_ => cell::NonGenericTypeInfoCell;
    generic_type_info_cell_ => cell::GenericTypeInfoCell;
    generic_type_path_cell_ => cell::GenericTypePathCell;
}

// -----------------------------------------------------------------------------
// ops

reflect_paths! {
    reflect_ref_ => ops::ReflectRef;
    reflect_mut_ => ops::ReflectMut;
    reflect_clone_error_ => ops::ReflectCloneError;
    set_error_ => ops::SetError;
    struct_ => ops::Struct;
    enum_ => ops::Enum;
}

// -----------------------------------------------------------------------------
// registry

reflect_paths! {
    type_meta_ => registry::TypeMeta;
    get_type_meta_ => registry::GetTypeMeta;
    from_type_ => registry::FromType;
    type_registry_ => registry::TypeRegistry;
    type_trait_default_ => registry::TypeTraitDefault;
    type_trait_convert_ => registry::TypeTraitConvert;
    type_trait_serialize_ => registry::TypeTraitSerialize;
    type_trait_deserialize_ => registry::TypeTraitDeserialize;
    type_trait_constructors_ => registry::TypeTraitConstructors;
    constructor_info_ => registry::ConstructorInfo;
    constructor_param_ => registry::ConstructorParam;
    constructor_args_ => registry::ConstructorArgs;
}

// -----------------------------------------------------------------------------
// Fully qualified std items

pub(crate) mod fp {
    use proc_macro2::TokenStream;
    use quote::{ToTokens, quote};

    macro_rules! fully_qualified {
        ($($name:ident => $($seg:ident)::+;)*) => {
            $(
                pub(crate) struct $name;

                impl ToTokens for $name {
                    fn to_tokens(&self, tokens: &mut TokenStream) {
                        quote!(:: $($seg)::+).to_tokens(tokens);
                    }
                }
            )*
        };
    }

    fully_qualified! {
        OptionFP => core::option::Option;
        ResultFP => core::result::Result;
        BoxFP => std::boxed::Box;
        VecFP => std::vec::Vec;
        CloneFP => core::clone::Clone;
        DefaultFP => core::default::Default;
    }
}
