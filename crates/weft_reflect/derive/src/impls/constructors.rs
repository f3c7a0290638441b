use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

/// Builds the `TypeTraitConstructors` insertion for a struct.
///
/// Each `#[reflect(constructor(name(param: Type, ...)))]` calls the associated
/// function `Self::name`. Unless `memberwise = false`, a `memberwise`
/// constructor taking every reflected field by name comes first; skipped
/// fields are filled with `Default::default()`.
pub(crate) fn get_constructors_tokens(info: &ReflectStruct) -> TokenStream {
    use crate::path::fp::{BoxFP, DefaultFP, VecFP};

    let meta = info.meta();
    let weft_reflect_path = meta.weft_reflect_path();
    let reflect_ = crate::path::reflect_(weft_reflect_path);
    let constructor_info_ = crate::path::constructor_info_(weft_reflect_path);
    let constructor_param_ = crate::path::constructor_param_(weft_reflect_path);
    let constructor_args_ = crate::path::constructor_args_(weft_reflect_path);
    let constructors_ = crate::path::type_trait_constructors_(weft_reflect_path);

    let mut constructors = Vec::new();

    if meta.attrs().memberwise {
        let params = info.active_fields().map(|field| {
            let ty = field.ty;
            let name = field.name();
            quote! { #constructor_param_::new::<#ty>(#name) }
        });
        let takes = info.active_fields().map(|field| {
            let ident = field.ident;
            let ty = field.ty;
            quote! { #ident: __args.take::<#ty>()?, }
        });
        let defaults = info.skipped_fields().map(|field| {
            let ident = field.ident;
            quote! { #ident: #DefaultFP::default(), }
        });
        constructors.push(quote! {
            #constructor_info_::new(
                "memberwise",
                #VecFP::from([ #(#params),* ]),
                |__args: &mut #constructor_args_| {
                    let value: #BoxFP<dyn #reflect_> = #BoxFP::new(Self {
                        #(#takes)*
                        #(#defaults)*
                    });
                    ::core::result::Result::Ok(value)
                },
            )
        });
    }

    for ctor in &meta.attrs().constructors {
        let fn_ident = &ctor.name;
        let name = fn_ident.to_string();
        let params = ctor.params.iter().map(|(ident, ty)| {
            let name = ident.to_string();
            quote! { #constructor_param_::new::<#ty>(#name) }
        });
        let takes = ctor.params.iter().map(|(ident, ty)| {
            quote! { let #ident = __args.take::<#ty>()?; }
        });
        let args = ctor.params.iter().map(|(ident, _)| ident);
        constructors.push(quote! {
            #constructor_info_::new(
                #name,
                #VecFP::from([ #(#params),* ]),
                |__args: &mut #constructor_args_| {
                    #(#takes)*
                    let value: #BoxFP<dyn #reflect_> = #BoxFP::new(Self::#fn_ident(#(#args),*));
                    ::core::result::Result::Ok(value)
                },
            )
        });
    }

    if constructors.is_empty() {
        return crate::utils::empty();
    }

    quote! {
        type_meta.insert_trait(#constructors_::new(#VecFP::from([ #(#constructors),* ])));
    }
}
