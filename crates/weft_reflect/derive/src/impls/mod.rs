// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod constructors;
mod enum_kind;
mod opaque_kind;
mod struct_kind;
mod trait_get_type_meta;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use enum_kind::impl_enum;
pub(crate) use opaque_kind::impl_opaque;
pub(crate) use struct_kind::impl_struct;
pub(crate) use trait_type_path::impl_trait_type_path;

use auto_register::get_auto_register_impl;
use constructors::get_constructors_tokens;
use trait_get_type_meta::impl_trait_get_type_meta;
use trait_typed::impl_trait_typed;
