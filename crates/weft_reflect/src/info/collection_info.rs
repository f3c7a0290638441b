use crate::Reflect;
use crate::info::{Type, TypeInfo, TypePath, Typed};

// -----------------------------------------------------------------------------
// ListInfo

/// Information about a growable collection (`Vec`, `VecDeque`, sets).
#[derive(Debug)]
pub struct ListInfo {
    ty: Type,
    item_ty: Type,
    item_info: fn() -> &'static TypeInfo,
    is_set: bool,
    new_empty: fn(usize) -> Box<dyn Reflect>,
}

impl ListInfo {
    pub fn new<TList: TypePath, TItem: Typed>(
        is_set: bool,
        new_empty: fn(usize) -> Box<dyn Reflect>,
    ) -> Self {
        Self {
            ty: Type::of::<TList>(),
            item_ty: Type::of::<TItem>(),
            item_info: TItem::type_info,
            is_set,
            new_empty,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn item_ty(&self) -> &Type {
        &self.item_ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    /// Sets reject duplicate items and do not keep insertion order.
    #[inline(always)]
    pub const fn is_set(&self) -> bool {
        self.is_set
    }

    /// Creates an empty collection with room for `capacity` items.
    #[inline]
    pub fn new_empty(&self, capacity: usize) -> Box<dyn Reflect> {
        (self.new_empty)(capacity)
    }
}

// -----------------------------------------------------------------------------
// ArrayInfo

/// Builds a fixed length array from its items, or gives the items back.
pub type FromItemsFn = fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Vec<Box<dyn Reflect>>>;

/// Information about a fixed length array (`[T; N]`, `Box<[T]>`).
///
/// Arrays cannot grow, so they are rebuilt from a complete item list.
#[derive(Debug)]
pub struct ArrayInfo {
    ty: Type,
    item_ty: Type,
    item_info: fn() -> &'static TypeInfo,
    capacity: Option<usize>,
    from_items: FromItemsFn,
}

impl ArrayInfo {
    pub fn new<TArray: TypePath, TItem: Typed>(
        capacity: Option<usize>,
        from_items: FromItemsFn,
    ) -> Self {
        Self {
            ty: Type::of::<TArray>(),
            item_ty: Type::of::<TItem>(),
            item_info: TItem::type_info,
            capacity,
            from_items,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn item_ty(&self) -> &Type {
        &self.item_ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    /// `Some(N)` for `[T; N]`, `None` for boxed slices.
    #[inline(always)]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    #[inline]
    pub fn from_items(
        &self,
        items: Vec<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, Vec<Box<dyn Reflect>>> {
        (self.from_items)(items)
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// Information about a dictionary (`HashMap`, `BTreeMap`).
#[derive(Debug)]
pub struct MapInfo {
    ty: Type,
    key_ty: Type,
    key_info: fn() -> &'static TypeInfo,
    value_ty: Type,
    value_info: fn() -> &'static TypeInfo,
    new_empty: fn(usize) -> Box<dyn Reflect>,
}

impl MapInfo {
    pub fn new<TMap: TypePath, TKey: Typed, TValue: Typed>(
        new_empty: fn(usize) -> Box<dyn Reflect>,
    ) -> Self {
        Self {
            ty: Type::of::<TMap>(),
            key_ty: Type::of::<TKey>(),
            key_info: TKey::type_info,
            value_ty: Type::of::<TValue>(),
            value_info: TValue::type_info,
            new_empty,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn key_ty(&self) -> &Type {
        &self.key_ty
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key_info)()
    }

    #[inline(always)]
    pub const fn value_ty(&self) -> &Type {
        &self.value_ty
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }

    #[inline]
    pub fn new_empty(&self, capacity: usize) -> Box<dyn Reflect> {
        (self.new_empty)(capacity)
    }
}
