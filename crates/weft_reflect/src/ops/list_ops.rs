use crate::Reflect;
use crate::ops::SetError;

/// A growable collection.
///
/// Sets implement `List` as well: `push` inserts and `iter` walks the set
/// in its own order.
pub trait List: Reflect {
    fn len(&self) -> usize;

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    /// Appends an item, the item must have the collection's item type.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), SetError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
