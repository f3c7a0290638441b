//! Parsing of `#[reflect(...)]` attributes.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, LitBool, LitStr, Meta, Token, Type, parenthesized};

use crate::REFLECT_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TraitAvailableFlags

/// Standard traits the type declares to implement.
#[derive(Default, Debug)]
pub(crate) struct TraitAvailableFlags {
    pub default: Option<Span>,
    pub clone: Option<Span>,
    pub convert: Option<Span>,
    pub serialize: Option<Span>,
    pub deserialize: Option<Span>,
}

// -----------------------------------------------------------------------------
// ConstructorAttr

/// `constructor(name(param: Type, ...))`
pub(crate) struct ConstructorAttr {
    pub name: Ident,
    pub params: Vec<(Ident, Type)>,
}

struct ConstructorParamAttr {
    name: Ident,
    ty: Type,
}

impl syn::parse::Parse for ConstructorParamAttr {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let name = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty = input.parse()?;
        Ok(Self { name, ty })
    }
}

impl ConstructorAttr {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let outer;
        parenthesized!(outer in meta.input);
        let name: Ident = outer.parse()?;
        let inner;
        parenthesized!(inner in outer);
        let params = Punctuated::<ConstructorParamAttr, Token![,]>::parse_terminated(&inner)?
            .into_iter()
            .map(|param| (param.name, param.ty))
            .collect();
        if !outer.is_empty() {
            return Err(outer.error("expected `constructor(name(param: Type, ...))`"));
        }
        Ok(Self { name, params })
    }
}

// -----------------------------------------------------------------------------
// PropertyAttr

/// `property(name = "...", get = method, set = method)`
pub(crate) struct PropertyAttr {
    pub name: LitStr,
    pub get: Ident,
    pub set: Option<Ident>,
}

impl PropertyAttr {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let mut name = None;
        let mut get = None;
        let mut set = None;
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("name") {
                name = Some(inner.value()?.parse::<LitStr>()?);
            } else if inner.path.is_ident("get") {
                get = Some(inner.value()?.parse::<Ident>()?);
            } else if inner.path.is_ident("set") {
                set = Some(inner.value()?.parse::<Ident>()?);
            } else {
                return Err(inner.error("expected `name`, `get` or `set`"));
            }
            Ok(())
        })?;

        let get = get.ok_or_else(|| meta.error("a property needs a `get` method"))?;
        let name = name.unwrap_or_else(|| LitStr::new(&get.to_string(), get.span()));
        Ok(Self { name, get, set })
    }
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Type-level `#[reflect(...)]` attributes.
pub(crate) struct TypeAttributes {
    pub avail_traits: TraitAvailableFlags,
    pub auto_register: Option<Span>,
    pub memberwise: bool,
    pub constructors: Vec<ConstructorAttr>,
    pub properties: Vec<PropertyAttr>,
}

impl Default for TypeAttributes {
    fn default() -> Self {
        Self {
            avail_traits: TraitAvailableFlags::default(),
            auto_register: None,
            memberwise: true,
            constructors: Vec::new(),
            properties: Vec::new(),
        }
    }
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.span();
        let flags = &mut self.avail_traits;

        if meta.path.is_ident("default") {
            flags.default = Some(span);
        } else if meta.path.is_ident("clone") {
            flags.clone = Some(span);
        } else if meta.path.is_ident("convert") {
            flags.convert = Some(span);
        } else if meta.path.is_ident("serialize") {
            flags.serialize = Some(span);
        } else if meta.path.is_ident("deserialize") {
            flags.deserialize = Some(span);
        } else if meta.path.is_ident("serde") {
            flags.serialize = Some(span);
            flags.deserialize = Some(span);
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(span);
        } else if meta.path.is_ident("memberwise") {
            self.memberwise = meta.value()?.parse::<LitBool>()?.value;
        } else if meta.path.is_ident("constructor") {
            self.constructors.push(ConstructorAttr::parse(&meta)?);
        } else if meta.path.is_ident("property") {
            self.properties.push(PropertyAttr::parse(&meta)?);
        } else {
            return Err(meta.error(
                "unknown reflect attribute, expected one of `default`, `clone`, `convert`, \
                 `serialize`, `deserialize`, `serde`, `auto_register`, `memberwise`, \
                 `constructor`, `property`",
            ));
        }
        Ok(())
    }

    /// Only trait flags are meaningful for opaque types.
    pub fn validate_opaque(&self) -> syn::Result<()> {
        if let Some(ctor) = self.constructors.first() {
            return Err(syn::Error::new(
                ctor.name.span(),
                "opaque types cannot declare constructors",
            ));
        }
        if let Some(property) = self.properties.first() {
            return Err(syn::Error::new(
                property.get.span(),
                "opaque types cannot declare properties",
            ));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Field-level attributes, mapped onto `FieldFlags`.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub skip: bool,
    pub always_serialize: bool,
    pub never_serialize: bool,
    pub non_serialized: bool,
    pub hidden: bool,
    pub base: bool,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip") {
                        this.skip = true;
                    } else if meta.path.is_ident("always_serialize") {
                        this.always_serialize = true;
                    } else if meta.path.is_ident("never_serialize") {
                        this.never_serialize = true;
                    } else if meta.path.is_ident("non_serialized") {
                        this.non_serialized = true;
                    } else if meta.path.is_ident("hidden") {
                        this.hidden = true;
                    } else if meta.path.is_ident("base") {
                        this.base = true;
                    } else {
                        return Err(meta.error(
                            "unknown field attribute, expected one of `skip`, \
                             `always_serialize`, `never_serialize`, `non_serialized`, \
                             `hidden`, `base`",
                        ));
                    }
                    Ok(())
                })?;
            } else if is_doc_hidden(attr) {
                this.hidden = true;
            }
        }

        if this.always_serialize && this.never_serialize {
            return Err(syn::Error::new(
                Span::call_site(),
                "`always_serialize` and `never_serialize` are exclusive",
            ));
        }
        Ok(this)
    }

    /// The `FieldFlags` constant names set by these attributes.
    pub fn flag_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.always_serialize {
            names.push("ALWAYS_SERIALIZE");
        }
        if self.never_serialize {
            names.push("NEVER_SERIALIZE");
        }
        if self.non_serialized {
            names.push("NON_SERIALIZED");
        }
        if self.hidden {
            names.push("HIDDEN");
        }
        if self.base {
            names.push("BASE");
        }
        names
    }
}

fn is_doc_hidden(attr: &Attribute) -> bool {
    match &attr.meta {
        Meta::List(list) if list.path.is_ident("doc") => list
            .parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)
            .map(|idents| idents.iter().any(|ident| ident == "hidden"))
            .unwrap_or(false),
        _ => false,
    }
}
