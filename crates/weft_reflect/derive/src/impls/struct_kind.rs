use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use crate::derive_data::ReflectStruct;
use crate::path::fp::{BoxFP, CloneFP, OptionFP, ResultFP};

/// Generates every reflection impl of a struct with named fields.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();

    let type_path_impl = super::impl_trait_type_path(meta);
    let typed_impl = super::impl_trait_typed(meta, info.to_info_tokens());
    let struct_impl = impl_struct_ops(info);
    let reflect_impl = impl_reflect(info);
    let get_type_meta_impl = super::impl_trait_get_type_meta(
        meta,
        super::get_constructors_tokens(info),
        dependencies_tokens(info),
    );
    let auto_register = super::get_auto_register_impl(meta);

    quote! {
        #type_path_impl

        #typed_impl

        #struct_impl

        #reflect_impl

        #get_type_meta_impl

        #auto_register
    }
}

fn impl_struct_ops(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let weft_reflect_path = meta.weft_reflect_path();
    let reflect_ = crate::path::reflect_(weft_reflect_path);
    let struct_ = crate::path::struct_(weft_reflect_path);
    let set_error_ = crate::path::set_error_(weft_reflect_path);
    let type_path_ = crate::path::type_path_(weft_reflect_path);
    let macro_utils_ = crate::path::macro_utils_(weft_reflect_path);

    let names: Vec<String> = info.active_fields().map(|field| field.name()).collect();
    let idents: Vec<_> = info.active_fields().map(|field| field.ident).collect();
    let indices = 0..names.len();
    let field_len = names.len();

    let properties = &meta.attrs().properties;
    let property_methods = if properties.is_empty() {
        crate::utils::empty()
    } else {
        let getters = properties.iter().map(|property| {
            let name = &property.name;
            let get = &property.get;
            quote! {
                #name => #OptionFP::Some(#BoxFP::new(Self::#get(self)) as #BoxFP<dyn #reflect_>),
            }
        });
        let setters = properties.iter().map(|property| {
            let name = &property.name;
            match &property.set {
                Some(set) => quote! {
                    #name => #macro_utils_::set_via(self, value, Self::#set),
                },
                None => quote! {
                    #name => #ResultFP::Err(#set_error_::ReadOnly {
                        container: <Self as #type_path_>::type_path(),
                        member: #macro_utils_::ToOwned::to_owned(name),
                    }),
                },
            }
        });
        quote! {
            fn property(&self, name: &str) -> #OptionFP<#BoxFP<dyn #reflect_>> {
                match name {
                    #(#getters)*
                    _ => #OptionFP::None,
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: #BoxFP<dyn #reflect_>,
            ) -> #ResultFP<(), #set_error_> {
                match name {
                    #(#setters)*
                    _ => #ResultFP::Err(#set_error_::UnknownMember {
                        container: <Self as #type_path_>::type_path(),
                        member: #macro_utils_::ToOwned::to_owned(name),
                    }),
                }
            }
        }
    };

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(true);
    let option_ = OptionFP.to_token_stream();

    quote! {
        impl #impl_generics #struct_ for #real_ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> #OptionFP<&dyn #reflect_> {
                match name {
                    #(#names => #option_::Some(&self.#idents as &dyn #reflect_),)*
                    _ => #OptionFP::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> #OptionFP<&mut dyn #reflect_> {
                match name {
                    #(#names => #option_::Some(&mut self.#idents as &mut dyn #reflect_),)*
                    _ => #OptionFP::None,
                }
            }

            fn field_at(&self, index: usize) -> #OptionFP<&dyn #reflect_> {
                match index {
                    #(#indices => #option_::Some(&self.#idents as &dyn #reflect_),)*
                    _ => #OptionFP::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }

            #property_methods
        }
    }
}

fn impl_reflect(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let weft_reflect_path = meta.weft_reflect_path();
    let reflect_ = crate::path::reflect_(weft_reflect_path);
    let reflect_kind_ = crate::path::reflect_kind_(weft_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(weft_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(weft_reflect_path);
    let reflect_clone_error_ = crate::path::reflect_clone_error_(weft_reflect_path);
    let macro_utils_ = crate::path::macro_utils_(weft_reflect_path);

    let clone_body = if meta.attrs().avail_traits.clone.is_some() {
        Some(quote! {
            #ResultFP::Ok(#BoxFP::new(<Self as #CloneFP>::clone(self)))
        })
    } else if info.skipped_fields().next().is_none() {
        let idents: Vec<_> = info.active_fields().map(|field| field.ident).collect();
        Some(quote! {
            #ResultFP::Ok(#BoxFP::new(Self {
                #(#idents: #macro_utils_::clone_field(&self.#idents)?,)*
            }))
        })
    } else {
        None
    };

    let reflect_clone = clone_body.map(|body| {
        quote! {
            fn reflect_clone(&self) -> #ResultFP<#BoxFP<dyn #reflect_>, #reflect_clone_error_> {
                #body
            }
        }
    });

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(true);

    quote! {
        impl #impl_generics #reflect_ for #real_ident #ty_generics #where_clause {
            fn set(&mut self, value: #BoxFP<dyn #reflect_>) -> #ResultFP<(), #BoxFP<dyn #reflect_>> {
                *self = <dyn #reflect_>::take::<Self>(value)?;
                #ResultFP::Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> #reflect_kind_ {
                #reflect_kind_::Struct
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Struct(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::Struct(self)
            }

            #reflect_clone
        }
    }
}

fn dependencies_tokens(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let macro_utils_ = crate::path::macro_utils_(meta.weft_reflect_path());

    let fields = info.active_fields().map(|field| {
        let ty = field.ty;
        quote! { registry.register::<#ty>(); }
    });
    let properties = meta.attrs().properties.iter().map(|property| {
        let get = &property.get;
        quote! { #macro_utils_::register_getter(registry, Self::#get); }
    });
    let params = meta
        .attrs()
        .constructors
        .iter()
        .flat_map(|ctor| ctor.params.iter())
        .map(|(_, ty)| quote! { registry.register::<#ty>(); });

    quote! {
        #(#fields)*
        #(#properties)*
        #(#params)*
    }
}
