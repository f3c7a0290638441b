use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Generics, Ident, ImplGenerics, Path, Type, TypeGenerics};

use super::{TypeAttributes, TypeParser};
use crate::utils::StringExpr;

/// Everything shared by the generators of one type.
pub(crate) struct ReflectMeta<'a> {
    weft_reflect_path: Path,
    attrs: TypeAttributes,
    type_parser: TypeParser<'a>,
    /// Types of reflected fields, in declaration order and without duplicates.
    active_types: Vec<Type>,
}

impl<'a> ReflectMeta<'a> {
    #[inline]
    pub fn new(attrs: TypeAttributes, type_parser: TypeParser<'a>) -> Self {
        Self {
            attrs,
            type_parser,
            weft_reflect_path: crate::path::weft_reflect(),
            active_types: Vec::new(),
        }
    }

    pub(super) fn set_active_types(&mut self, types: impl IntoIterator<Item = Type>) {
        for ty in types {
            let key = ty.to_token_stream().to_string();
            if !self
                .active_types
                .iter()
                .any(|known| known.to_token_stream().to_string() == key)
            {
                self.active_types.push(ty);
            }
        }
    }

    #[inline]
    pub fn weft_reflect_path(&self) -> &Path {
        &self.weft_reflect_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn generics(&self) -> &'a Generics {
        self.type_parser.generics()
    }

    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        self.type_parser.impl_with_generic()
    }

    #[inline]
    pub fn real_ident(&self) -> TokenStream {
        self.type_parser.real_ident()
    }

    #[inline]
    pub fn type_name(&self) -> StringExpr {
        self.type_parser.type_name(&self.weft_reflect_path)
    }

    #[inline]
    pub fn type_path(&self) -> StringExpr {
        self.type_parser.type_path(&self.weft_reflect_path)
    }

    /// Returns `impl_generics`, `ty_generics` and a `where` clause.
    ///
    /// Every type parameter is bounded by `TypePath`. With `add_field_bounds`,
    /// each field type mentioning a type parameter is bounded by
    /// `Reflect + GetTypeMeta`, which every trait but `TypePath` needs.
    ///
    /// ```ignore
    /// let (impl_generics, ty_generics, where_clause) = meta.split_generics(true);
    ///
    /// quote! {
    ///     impl #impl_generics Trait for #real_ident #ty_generics #where_clause { }
    /// }
    /// ```
    pub fn split_generics(
        &self,
        add_field_bounds: bool,
    ) -> (ImplGenerics<'_>, TypeGenerics<'_>, TokenStream) {
        let generics = self.generics();
        let mut where_tokens = quote! { where };

        if generics.type_params().next().is_none() && generics.lifetimes().next().is_some() {
            where_tokens.extend(quote! { Self: 'static, });
        }

        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        if let Some(where_clause) = where_clause {
            let predicates = where_clause.predicates.iter();
            where_tokens.extend(quote! { #(#predicates,)* });
        }

        let type_path_ = crate::path::type_path_(&self.weft_reflect_path);
        for param in generics.type_params() {
            let ident = &param.ident;
            where_tokens.extend(quote! { #ident: #type_path_, });
        }

        if add_field_bounds {
            where_tokens.extend(self.field_type_predicates());
        }

        (impl_generics, ty_generics, where_tokens)
    }

    fn field_type_predicates(&self) -> TokenStream {
        let type_params: Vec<Ident> = self
            .generics()
            .type_params()
            .map(|param| param.ident.clone())
            .collect();

        if type_params.is_empty() {
            return crate::utils::empty();
        }

        let reflect_ = crate::path::reflect_(&self.weft_reflect_path);
        let get_type_meta_ = crate::path::get_type_meta_(&self.weft_reflect_path);

        fn mentions_any(idents: &[Ident], tokens: TokenStream) -> bool {
            tokens.into_iter().any(|tree| match tree {
                proc_macro2::TokenTree::Ident(ident) => idents.contains(&ident),
                proc_macro2::TokenTree::Group(group) => mentions_any(idents, group.stream()),
                _ => false,
            })
        }

        self.active_types
            .iter()
            .filter(|ty| mentions_any(&type_params, ty.to_token_stream()))
            .map(|ty| quote! { #ty: #reflect_ + #get_type_meta_, })
            .collect()
    }
}
