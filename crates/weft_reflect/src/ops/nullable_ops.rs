use crate::Reflect;
use crate::ops::SetError;

/// An optional value.
pub trait Nullable: Reflect {
    fn value(&self) -> Option<&dyn Reflect>;

    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Replaces the content, `None` clears it.
    fn set_value(&mut self, value: Option<Box<dyn Reflect>>) -> Result<(), SetError>;
}
