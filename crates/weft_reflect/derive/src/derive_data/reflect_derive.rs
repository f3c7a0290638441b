use syn::{Data, DeriveInput};

use super::{ReflectEnum, ReflectMeta, ReflectStruct, TypeAttributes, TypeParser};

/// The parsed input of `#[derive(Reflect)]`.
pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let parser = TypeParser::new_local(&input.ident, &input.generics);
        let meta = ReflectMeta::new(attrs, parser);

        match &input.data {
            Data::Struct(data) => Ok(Self::Struct(ReflectStruct::new(meta, &data.fields)?)),
            Data::Enum(data) => {
                if !meta.attrs().properties.is_empty() || !meta.attrs().constructors.is_empty() {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "enums cannot declare constructors or properties",
                    ));
                }
                Ok(Self::Enum(ReflectEnum::new(meta, &data.variants)?))
            }
            Data::Union(data) => Err(syn::Error::new_spanned(
                data.union_token,
                "unions cannot derive `Reflect`",
            )),
        }
    }
}
