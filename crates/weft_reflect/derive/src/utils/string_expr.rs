use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{LitStr, spanned::Spanned};

/// A string-valued expression in generated code.
#[derive(Clone)]
pub(crate) enum StringExpr {
    /// Known at compile time: a literal, or a macro such as `module_path!()`.
    Const(TokenStream),
    /// A `&'static str` computed at runtime.
    Borrowed(TokenStream),
    /// A `String`.
    Owned(TokenStream),
}

impl Default for StringExpr {
    fn default() -> Self {
        Self::Const("".to_token_stream())
    }
}

impl<T: ToString + Spanned> From<T> for StringExpr {
    fn from(value: T) -> Self {
        Self::Const(LitStr::new(&value.to_string(), value.span()).to_token_stream())
    }
}

impl StringExpr {
    pub fn from_str(string: &str) -> Self {
        Self::Const(string.to_token_stream())
    }

    /// Tokens for a `&'static str`.
    pub fn into_borrowed(self) -> TokenStream {
        match self {
            Self::Const(tokens) | Self::Borrowed(tokens) => tokens,
            Self::Owned(owned) => quote! {
                &#owned as &str
            },
        }
    }

    /// Tokens for a `String`.
    pub fn into_owned(self, weft_reflect_path: &syn::Path) -> TokenStream {
        match self {
            Self::Const(tokens) | Self::Borrowed(tokens) => {
                let macro_utils_ = crate::path::macro_utils_(weft_reflect_path);
                quote! {
                    #macro_utils_::ToOwned::to_owned(#tokens)
                }
            }
            Self::Owned(owned) => owned,
        }
    }

    fn is_const(&self) -> bool {
        matches!(self, StringExpr::Const(_))
    }

    /// Concatenates the expressions, with `concat!` when all are constant.
    pub fn from_iter<T: IntoIterator<Item = StringExpr>>(
        iter: T,
        weft_reflect_path: &syn::Path,
    ) -> Self {
        let exprs: Vec<StringExpr> = iter.into_iter().collect();

        if exprs.is_empty() {
            return Self::default();
        }

        if exprs.iter().all(StringExpr::is_const) {
            let inner = exprs.into_iter().map(StringExpr::into_borrowed);
            Self::Const(quote! {
                ::core::concat!( #(#inner),* )
            })
        } else {
            let macro_utils_ = crate::path::macro_utils_(weft_reflect_path);
            let inner = exprs.into_iter().map(StringExpr::into_borrowed);
            Self::Owned(quote! {
                #macro_utils_::concat(&[ #(#inner),* ])
            })
        }
    }
}
