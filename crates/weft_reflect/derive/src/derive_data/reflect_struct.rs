use proc_macro2::TokenStream;
use quote::quote;
use syn::{Fields, Ident, Type};

use super::{FieldAttributes, ReflectMeta};

/// A named field of a derived struct.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl StructField<'_> {
    #[inline]
    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    /// `FieldFlags` expression for this field, `None` when no flag is set.
    fn flags_tokens(&self, field_flags_: &TokenStream) -> Option<TokenStream> {
        let names = self.attrs.flag_names();
        if names.is_empty() {
            return None;
        }
        let flags = names
            .iter()
            .map(|name| Ident::new(name, proc_macro2::Span::call_site()));
        Some(quote! { #( #field_flags_::#flags )|* })
    }
}

/// A struct with named fields (or a unit struct).
pub(crate) struct ReflectStruct<'a> {
    meta: ReflectMeta<'a>,
    fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn new(mut meta: ReflectMeta<'a>, fields: &'a Fields) -> syn::Result<Self> {
        let fields = match fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(|field| {
                    Ok(StructField {
                        ident: field
                            .ident
                            .as_ref()
                            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?,
                        ty: &field.ty,
                        attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()?,
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new_spanned(
                    unnamed,
                    "tuple structs cannot derive `Reflect`, name the fields",
                ));
            }
        };

        meta.set_active_types(
            fields
                .iter()
                .filter(|field| !field.attrs.skip)
                .map(|field| field.ty.clone()),
        );

        Ok(Self { meta, fields })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    /// Reflected fields, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| !field.attrs.skip)
    }

    /// Fields hidden from reflection with `#[reflect(skip)]`.
    pub fn skipped_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| field.attrs.skip)
    }

    /// The `TypeInfo::Struct(...)` expression.
    pub fn to_info_tokens(&self) -> TokenStream {
        let weft_reflect_path = self.meta.weft_reflect_path();
        let type_info_ = crate::path::type_info_(weft_reflect_path);
        let struct_info_ = crate::path::struct_info_(weft_reflect_path);
        let named_field_ = crate::path::named_field_(weft_reflect_path);
        let field_flags_ = crate::path::field_flags_(weft_reflect_path);
        let property_info_ = crate::path::property_info_(weft_reflect_path);

        let fields = self.active_fields().map(|field| {
            let ty = field.ty;
            let name = field.name();
            let with_flags = field
                .flags_tokens(&field_flags_)
                .map(|flags| quote! { .with_flags(#flags) });
            quote! {
                #named_field_::new::<#ty>(#name) #with_flags
            }
        });

        let properties = &self.meta.attrs().properties;
        let with_properties = if properties.is_empty() {
            crate::utils::empty()
        } else {
            let properties = properties.iter().map(|property| {
                let name = &property.name;
                let get = &property.get;
                let has_setter = property.set.is_some();
                quote! {
                    #property_info_::from_getter::<Self, _>(#name, Self::#get, #has_setter)
                }
            });
            quote! { .with_properties(&[ #(#properties),* ]) }
        };

        quote! {
            #type_info_::Struct(
                #struct_info_::new::<Self>(&[ #(#fields),* ])
                    #with_properties
            )
        }
    }
}
