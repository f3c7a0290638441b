use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::derive_data::ReflectMeta;

/// Generates the `GetTypeMeta` implementation.
///
/// The declared standard traits become type traits. `extra_traits` inserts
/// further ones (constructors), `dependencies` registers field types.
pub(crate) fn impl_trait_get_type_meta(
    meta: &ReflectMeta,
    extra_traits: TokenStream,
    dependencies: TokenStream,
) -> TokenStream {
    let weft_reflect_path = meta.weft_reflect_path();
    let get_type_meta_ = crate::path::get_type_meta_(weft_reflect_path);
    let type_meta_ = crate::path::type_meta_(weft_reflect_path);
    let type_registry_ = crate::path::type_registry_(weft_reflect_path);
    let from_type_ = crate::path::from_type_(weft_reflect_path);

    let flags = &meta.attrs().avail_traits;
    let insert = |span: Option<proc_macro2::Span>, type_trait: TokenStream| match span {
        Some(span) => quote_spanned! { span =>
            type_meta.insert_trait::<#type_trait>(<#type_trait as #from_type_<Self>>::from_type());
        },
        None => crate::utils::empty(),
    };

    let insert_default = insert(
        flags.default,
        crate::path::type_trait_default_(weft_reflect_path),
    );
    let insert_convert = insert(
        flags.convert,
        crate::path::type_trait_convert_(weft_reflect_path),
    );
    let insert_serialize = insert(
        flags.serialize,
        crate::path::type_trait_serialize_(weft_reflect_path),
    );
    let insert_deserialize = insert(
        flags.deserialize,
        crate::path::type_trait_deserialize_(weft_reflect_path),
    );

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(true);

    let register_dependencies = if dependencies.is_empty() {
        crate::utils::empty()
    } else {
        quote! {
            fn register_dependencies(registry: &mut #type_registry_) {
                #dependencies
            }
        }
    };

    quote! {
        impl #impl_generics #get_type_meta_ for #real_ident #ty_generics #where_clause {
            fn get_type_meta() -> #type_meta_ {
                let mut type_meta = #type_meta_::of::<Self>();
                #insert_default
                #insert_convert
                #insert_serialize
                #insert_deserialize
                #extra_traits
                type_meta
            }

            #register_dependencies
        }
    }
}
