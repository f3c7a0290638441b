use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;
use crate::path::fp::{BoxFP, CloneFP, ResultFP};

/// Generates the reflection impls of an opaque type.
///
/// Opaque values expose no structure: the graph engine needs a container
/// for them, or they travel through one of their type traits.
pub(crate) fn impl_opaque(meta: &ReflectMeta) -> TokenStream {
    let weft_reflect_path = meta.weft_reflect_path();
    let reflect_ = crate::path::reflect_(weft_reflect_path);
    let reflect_kind_ = crate::path::reflect_kind_(weft_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(weft_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(weft_reflect_path);
    let reflect_clone_error_ = crate::path::reflect_clone_error_(weft_reflect_path);
    let type_info_ = crate::path::type_info_(weft_reflect_path);
    let opaque_info_ = crate::path::opaque_info_(weft_reflect_path);

    let type_path_impl = super::impl_trait_type_path(meta);
    let typed_impl = super::impl_trait_typed(
        meta,
        quote! { #type_info_::Opaque(#opaque_info_::new::<Self>()) },
    );
    let get_type_meta_impl =
        super::impl_trait_get_type_meta(meta, crate::utils::empty(), crate::utils::empty());
    let auto_register = super::get_auto_register_impl(meta);

    let reflect_clone = meta.attrs().avail_traits.clone.map(|_| {
        quote! {
            fn reflect_clone(&self) -> #ResultFP<#BoxFP<dyn #reflect_>, #reflect_clone_error_> {
                #ResultFP::Ok(#BoxFP::new(<Self as #CloneFP>::clone(self)))
            }
        }
    });

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(true);

    quote! {
        #type_path_impl

        #typed_impl

        impl #impl_generics #reflect_ for #real_ident #ty_generics #where_clause {
            fn set(&mut self, value: #BoxFP<dyn #reflect_>) -> #ResultFP<(), #BoxFP<dyn #reflect_>> {
                *self = <dyn #reflect_>::take::<Self>(value)?;
                #ResultFP::Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> #reflect_kind_ {
                #reflect_kind_::Opaque
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Opaque(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::Opaque(self)
            }

            #reflect_clone
        }

        #get_type_meta_impl

        #auto_register
    }
}
