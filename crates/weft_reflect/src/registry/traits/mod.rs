// -----------------------------------------------------------------------------
// Modules

mod constructor;
mod convert;
mod default;
mod deserialize;
mod serialize;

// -----------------------------------------------------------------------------
// Exports

pub use constructor::{ConstructError, ConstructorArgs, ConstructorInfo, ConstructorParam};
pub use constructor::TypeTraitConstructors;
pub use convert::TypeTraitConvert;
pub use default::TypeTraitDefault;
pub use deserialize::TypeTraitDeserialize;
pub use serialize::TypeTraitSerialize;
