use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

fn static_path_cell(weft_reflect_path: &syn::Path, generator: TokenStream) -> TokenStream {
    let path_cell_ = crate::path::generic_type_path_cell_(weft_reflect_path);

    quote! {
        static CELL: #path_cell_ = #path_cell_::new();
        CELL.get_or_insert::<Self>(|| {
            #generator
        })
    }
}

/// Generates the `TypePath` implementation.
///
/// Non generic types get `concat!`-ed constants, generic types build their
/// path once per instantiation in a `GenericTypePathCell`.
pub(crate) fn impl_trait_type_path(meta: &ReflectMeta) -> TokenStream {
    let weft_reflect_path = meta.weft_reflect_path();
    let type_path_ = crate::path::type_path_(weft_reflect_path);
    let real_ident = meta.real_ident();

    let (type_path, type_name, inline_flag) = if meta.impl_with_generic() {
        (
            static_path_cell(weft_reflect_path, meta.type_path().into_owned(weft_reflect_path)),
            static_path_cell(weft_reflect_path, meta.type_name().into_owned(weft_reflect_path)),
            crate::utils::empty(),
        )
    } else {
        (
            meta.type_path().into_borrowed(),
            meta.type_name().into_borrowed(),
            quote! { #[inline] },
        )
    };

    let (impl_generics, ty_generics, where_clause) = meta.split_generics(false);

    quote! {
        impl #impl_generics #type_path_ for #real_ident #ty_generics #where_clause {
            #inline_flag
            fn type_path() -> &'static str {
                #type_path
            }

            #inline_flag
            fn type_name() -> &'static str {
                #type_name
            }
        }
    }
}
