use crate::Reflect;
use crate::ops::SetError;

/// A dictionary.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// Inserts an entry, replacing any previous value for the key.
    fn insert(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), SetError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
