use syn::parse::ParseStream;
use syn::{Attribute, Generics, Path};

use super::TypeAttributes;

/// Input of `impl_type_path!`: `::module::Name<Generics> where ...`.
pub(crate) struct ReflectTypePathParser {
    pub type_path: Path,
    pub generics: Generics,
}

impl ReflectTypePathParser {
    pub fn parse(input: ParseStream) -> syn::Result<Self> {
        let type_path = Path::parse_mod_style(input)?;
        if type_path.segments.is_empty() {
            return Err(input.error("expected a type path"));
        }

        let mut generics = input.parse::<Generics>()?;
        generics.where_clause = input.parse()?;

        Ok(Self {
            type_path,
            generics,
        })
    }
}

/// Input of `impl_reflect_opaque!`: `#[reflect(...)] ::module::Name<Generics>`.
pub(crate) struct ReflectOpaqueParser {
    pub attrs: TypeAttributes,
    pub type_path: Path,
    pub generics: Generics,
}

impl ReflectOpaqueParser {
    pub fn parse(input: ParseStream) -> syn::Result<Self> {
        let outer = input.call(Attribute::parse_outer)?;
        let attrs = TypeAttributes::parse_attrs(&outer)?;
        attrs.validate_opaque()?;

        let ReflectTypePathParser {
            type_path,
            generics,
        } = ReflectTypePathParser::parse(input)?;

        Ok(Self {
            attrs,
            type_path,
            generics,
        })
    }
}
