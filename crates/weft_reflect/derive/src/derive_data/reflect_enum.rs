use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Fields, Ident, Token, Variant};

use super::ReflectMeta;

/// A variant of a field-less enum.
pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
}

impl EnumVariant<'_> {
    #[inline]
    pub fn name(&self) -> String {
        self.ident.to_string()
    }
}

/// A field-less enum, reflected as its discriminant.
pub(crate) struct ReflectEnum<'a> {
    meta: ReflectMeta<'a>,
    variants: Vec<EnumVariant<'a>>,
}

impl<'a> ReflectEnum<'a> {
    pub fn new(
        meta: ReflectMeta<'a>,
        variants: &'a Punctuated<Variant, Token![,]>,
    ) -> syn::Result<Self> {
        if variants.is_empty() {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "enums without variants cannot derive `Reflect`",
            ));
        }
        if meta.impl_with_generic() {
            return Err(syn::Error::new_spanned(
                &meta.generics().params,
                "generic enums cannot derive `Reflect`",
            ));
        }

        let variants = variants
            .iter()
            .map(|variant| match &variant.fields {
                Fields::Unit => Ok(EnumVariant {
                    ident: &variant.ident,
                }),
                fields => Err(syn::Error::new_spanned(
                    fields,
                    "only field-less enums can derive `Reflect`",
                )),
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self { meta, variants })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn variants(&self) -> &[EnumVariant<'a>] {
        &self.variants
    }

    /// The `TypeInfo::Enum(...)` expression.
    pub fn to_info_tokens(&self) -> TokenStream {
        let weft_reflect_path = self.meta.weft_reflect_path();
        let type_info_ = crate::path::type_info_(weft_reflect_path);
        let enum_info_ = crate::path::enum_info_(weft_reflect_path);
        let variant_info_ = crate::path::variant_info_(weft_reflect_path);
        let reflect_ = crate::path::reflect_(weft_reflect_path);
        use crate::path::fp::{BoxFP, OptionFP};

        let infos = self.variants.iter().map(|variant| {
            let ident = variant.ident;
            let name = variant.name();
            quote! {
                #variant_info_ {
                    name: #name,
                    discriminant: Self::#ident as i64,
                }
            }
        });

        let arms = self.variants.iter().map(|variant| {
            let ident = variant.ident;
            quote! {
                discriminant if discriminant == Self::#ident as i64 => {
                    #OptionFP::Some(#BoxFP::new(Self::#ident) as #BoxFP<dyn #reflect_>)
                }
            }
        });

        quote! {
            #type_info_::Enum(#enum_info_::new::<Self>(
                &[ #(#infos),* ],
                |discriminant| match discriminant {
                    #(#arms)*
                    _ => #OptionFP::None,
                },
            ))
        }
    }
}
