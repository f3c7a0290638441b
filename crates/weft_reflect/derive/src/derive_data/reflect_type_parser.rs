use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{GenericParam, Generics, Ident, Path, TypeParam};

use crate::utils::StringExpr;

/// How a type is named, both in `impl ... for <name>` and in its `TypePath`.
pub(crate) enum TypeParser<'a> {
    /// A type declared in the invoking crate, named through `module_path!()`.
    Local {
        ident: &'a Ident,
        generics: &'a Generics,
    },
    /// A type named with a leading `::`, e.g. `::uuid::Uuid`.
    ///
    /// The written path becomes the type path with the leading colons removed.
    Foreign {
        path: &'a Path,
        generics: &'a Generics,
    },
    /// A type named with a relative path, e.g. `crate::handle::TypeHandle`.
    ///
    /// The type path is `module_path!()` of the invocation site plus the last
    /// segment, so the macro should be invoked in the module declaring the type.
    Scoped {
        path: &'a Path,
        generics: &'a Generics,
    },
}

impl<'a> TypeParser<'a> {
    pub(crate) fn new_local(ident: &'a Ident, generics: &'a Generics) -> Self {
        TypeParser::Local { ident, generics }
    }

    pub(crate) fn new_foreign(path: &'a Path, generics: &'a Generics) -> Self {
        if path.leading_colon.is_some() {
            TypeParser::Foreign { path, generics }
        } else {
            TypeParser::Scoped { path, generics }
        }
    }

    pub(super) fn generics(&self) -> &'a Generics {
        match self {
            Self::Local { generics, .. }
            | Self::Foreign { generics, .. }
            | Self::Scoped { generics, .. } => generics,
        }
    }

    /// Whether the type has non-lifetime generic parameters.
    pub(super) fn impl_with_generic(&self) -> bool {
        !self
            .generics()
            .params
            .iter()
            .all(|param| matches!(param, GenericParam::Lifetime(_)))
    }

    /// Used in `impl ... for #real_ident {...}`.
    pub(super) fn real_ident(&self) -> TokenStream {
        match self {
            Self::Local { ident, .. } => ident.to_token_stream(),
            Self::Foreign { path, .. } | Self::Scoped { path, .. } => path.to_token_stream(),
        }
    }

    fn ident(&self) -> &Ident {
        match self {
            Self::Local { ident, .. } => ident,
            Self::Foreign { path, .. } | Self::Scoped { path, .. } => path
                .segments
                .last()
                .map(|segment| &segment.ident)
                .unwrap_or_else(|| unreachable!("a parsed path has at least one segment")),
        }
    }

    pub(super) fn module_path(&self) -> StringExpr {
        match self {
            Self::Local { .. } | Self::Scoped { .. } => {
                StringExpr::Const(quote!(::core::module_path!()))
            }
            Self::Foreign { path, .. } => {
                let module = path
                    .segments
                    .iter()
                    .take(path.segments.len() - 1)
                    .map(|segment| segment.ident.to_string())
                    .collect::<Vec<_>>()
                    .join("::");
                StringExpr::from_str(&module)
            }
        }
    }

    pub(super) fn type_ident(&self) -> StringExpr {
        StringExpr::from(self.ident())
    }

    /// Joins the generic arguments with `", "`.
    fn reduce_generics(
        generics: &Generics,
        mut ty_generic_fn: impl FnMut(&TypeParam) -> StringExpr,
        weft_reflect_path: &Path,
    ) -> StringExpr {
        let macro_utils_ = crate::path::macro_utils_(weft_reflect_path);

        let mut params = generics.params.iter().filter_map(|param| match param {
            GenericParam::Type(type_param) => Some(ty_generic_fn(type_param)),
            GenericParam::Const(const_param) => {
                let ident = &const_param.ident;
                let ty = &const_param.ty;
                Some(StringExpr::Owned(quote! {
                    <#ty as #macro_utils_::ToString>::to_string(&#ident)
                }))
            }
            GenericParam::Lifetime(_) => None,
        });

        let first = params.next().into_iter();
        StringExpr::from_iter(
            first.chain(params.flat_map(|x| [StringExpr::from_str(", "), x])),
            weft_reflect_path,
        )
    }

    fn with_generics(
        &self,
        head: Vec<StringExpr>,
        weft_reflect_path: &Path,
        accessor: fn(&Ident, &TokenStream) -> TokenStream,
    ) -> StringExpr {
        if !self.impl_with_generic() {
            return StringExpr::from_iter(head, weft_reflect_path);
        }

        let type_path_ = crate::path::type_path_(weft_reflect_path);
        let generics = Self::reduce_generics(
            self.generics(),
            |TypeParam { ident, .. }| StringExpr::Borrowed(accessor(ident, &type_path_)),
            weft_reflect_path,
        );

        let mut parts = head;
        parts.extend([
            StringExpr::from_str("<"),
            generics,
            StringExpr::from_str(">"),
        ]);
        StringExpr::from_iter(parts, weft_reflect_path)
    }

    /// For `demo::Pair<i32>`, this is `"Pair<i32>"`.
    pub(super) fn type_name(&self, weft_reflect_path: &Path) -> StringExpr {
        self.with_generics(vec![self.type_ident()], weft_reflect_path, |ident, type_path_| {
            quote!(<#ident as #type_path_>::type_name())
        })
    }

    /// For `demo::Pair<i32>`, this is `"demo::Pair<i32>"`.
    pub(super) fn type_path(&self, weft_reflect_path: &Path) -> StringExpr {
        let head = vec![
            self.module_path(),
            StringExpr::from_str("::"),
            self.type_ident(),
        ];
        self.with_generics(head, weft_reflect_path, |ident, type_path_| {
            quote!(<#ident as #type_path_>::type_path())
        })
    }
}
