use thiserror::Error;

use crate::Reflect;
use crate::info::{Type, TypePath, Typed};

// -----------------------------------------------------------------------------
// ConstructError

/// A parametric constructor could not be invoked.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConstructError {
    #[error("constructor argument {position} is missing")]
    MissingArgument { position: usize },
    #[error("constructor argument {position} expected `{expected}`, found `{found}`")]
    ArgumentType {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("constructor `{name}` of `{type_path}` panicked")]
    Panicked {
        type_path: &'static str,
        name: &'static str,
    },
}

// -----------------------------------------------------------------------------
// ConstructorArgs

/// The positional arguments of a constructor call, consumed in order.
pub struct ConstructorArgs {
    args: alloc::vec::IntoIter<Box<dyn Reflect>>,
    position: usize,
}

impl ConstructorArgs {
    pub fn new(args: Vec<Box<dyn Reflect>>) -> Self {
        Self {
            args: args.into_iter(),
            position: 0,
        }
    }

    /// Takes the next argument as a `T`.
    pub fn take<T: Reflect + TypePath>(&mut self) -> Result<T, ConstructError> {
        let position = self.position;
        self.position += 1;
        let arg = self
            .args
            .next()
            .ok_or(ConstructError::MissingArgument { position })?;
        arg.take::<T>().map_err(|arg| ConstructError::ArgumentType {
            position,
            expected: T::type_path(),
            found: arg.reflect_type_path(),
        })
    }
}

// -----------------------------------------------------------------------------
// ConstructorInfo

/// A named constructor parameter.
#[derive(Debug, Clone, Copy)]
pub struct ConstructorParam {
    name: &'static str,
    ty: Type,
}

impl ConstructorParam {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: Type::of::<T>(),
        }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}

type InvokeFn = fn(&mut ConstructorArgs) -> Result<Box<dyn Reflect>, ConstructError>;

/// One constructor that builds a value from positional arguments.
#[derive(Clone)]
pub struct ConstructorInfo {
    name: &'static str,
    params: Vec<ConstructorParam>,
    invoke: InvokeFn,
}

impl ConstructorInfo {
    pub fn new(name: &'static str, params: Vec<ConstructorParam>, invoke: InvokeFn) -> Self {
        Self {
            name,
            params,
            invoke,
        }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn params(&self) -> &[ConstructorParam] {
        &self.params
    }

    /// Calls the constructor. The argument count must match [`params`](Self::params).
    pub fn invoke(&self, args: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, ConstructError> {
        if args.len() < self.params.len() {
            return Err(ConstructError::MissingArgument {
                position: args.len(),
            });
        }
        (self.invoke)(&mut ConstructorArgs::new(args))
    }
}

impl core::fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeTraitConstructors

/// The parametric constructors of a type.
///
/// Declared with `#[reflect(constructor(name(param: Type, ...)))]`, one
/// attribute per constructor. Each parameter is matched to a member of the
/// type through the active naming conventions.
///
/// ```
/// use weft_reflect::derive::Reflect;
/// use weft_reflect::registry::{GetTypeMeta, TypeTraitConstructors};
///
/// #[derive(Reflect)]
/// #[reflect(constructor(new(x: i32, y: i32)))]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Point {
///     fn new(x: i32, y: i32) -> Self {
///         Self { x, y }
///     }
/// }
///
/// let meta = Point::get_type_meta();
/// let ctors = meta.get_trait::<TypeTraitConstructors>().unwrap();
/// let point = ctors
///     .iter()
///     .next()
///     .unwrap()
///     .invoke(vec![Box::new(1_i32), Box::new(2_i32)])
///     .unwrap()
///     .take::<Point>()
///     .unwrap();
/// assert_eq!((point.x, point.y), (1, 2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeTraitConstructors {
    constructors: Vec<ConstructorInfo>,
}

impl TypeTraitConstructors {
    pub fn new(constructors: Vec<ConstructorInfo>) -> Self {
        Self { constructors }
    }

    pub fn push(&mut self, constructor: ConstructorInfo) {
        self.constructors.push(constructor);
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ConstructorInfo> {
        self.constructors.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ConstructError, ConstructorArgs, ConstructorInfo, ConstructorParam};
    use crate::Reflect;

    fn pair() -> ConstructorInfo {
        ConstructorInfo::new(
            "pair",
            vec![
                ConstructorParam::new::<u8>("a"),
                ConstructorParam::new::<String>("b"),
            ],
            |args: &mut ConstructorArgs| {
                let a = args.take::<u8>()?;
                let b = args.take::<String>()?;
                Ok(Box::new(format!("{a}{b}")) as Box<dyn Reflect>)
            },
        )
    }

    #[test]
    fn invoke_takes_arguments_in_order() {
        let value = pair()
            .invoke(vec![Box::new(4_u8), Box::new(String::from("x"))])
            .unwrap();
        assert_eq!(value.take::<String>().unwrap(), "4x");
    }

    #[test]
    fn invoke_reports_bad_arguments() {
        let err = pair().invoke(vec![Box::new(4_u8)]).unwrap_err();
        assert_eq!(err, ConstructError::MissingArgument { position: 1 });

        let err = pair()
            .invoke(vec![Box::new(4_u16), Box::new(String::new())])
            .unwrap_err();
        assert!(matches!(err, ConstructError::ArgumentType { position: 0, .. }));
    }
}
