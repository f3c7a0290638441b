use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use crate::derive_data::ReflectEnum;
use crate::path::fp::{BoxFP, ResultFP};

/// Generates every reflection impl of a field-less enum.
pub(crate) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();
    let weft_reflect_path = meta.weft_reflect_path();
    let reflect_ = crate::path::reflect_(weft_reflect_path);
    let enum_ = crate::path::enum_(weft_reflect_path);
    let reflect_kind_ = crate::path::reflect_kind_(weft_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(weft_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(weft_reflect_path);
    let reflect_clone_error_ = crate::path::reflect_clone_error_(weft_reflect_path);
    let box_ = BoxFP.to_token_stream();

    let type_path_impl = super::impl_trait_type_path(meta);
    let typed_impl = super::impl_trait_typed(meta, info.to_info_tokens());
    let get_type_meta_impl =
        super::impl_trait_get_type_meta(meta, crate::utils::empty(), crate::utils::empty());
    let auto_register = super::get_auto_register_impl(meta);

    let idents: Vec<_> = info.variants().iter().map(|variant| variant.ident).collect();
    let names: Vec<String> = info.variants().iter().map(|variant| variant.name()).collect();

    let real_ident = meta.real_ident();

    quote! {
        #type_path_impl

        #typed_impl

        impl #enum_ for #real_ident {
            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }

            fn discriminant(&self) -> i64 {
                match self {
                    #(Self::#idents => Self::#idents as i64,)*
                }
            }
        }

        impl #reflect_ for #real_ident {
            fn set(&mut self, value: #BoxFP<dyn #reflect_>) -> #ResultFP<(), #BoxFP<dyn #reflect_>> {
                *self = <dyn #reflect_>::take::<Self>(value)?;
                #ResultFP::Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> #reflect_kind_ {
                #reflect_kind_::Enum
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Enum(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::Enum(self)
            }

            fn reflect_clone(&self) -> #ResultFP<#BoxFP<dyn #reflect_>, #reflect_clone_error_> {
                let value: #BoxFP<dyn #reflect_> = match self {
                    #(Self::#idents => #box_::new(Self::#idents),)*
                };
                #ResultFP::Ok(value)
            }
        }

        #get_type_meta_impl

        #auto_register
    }
}
