//! Session-scoped type indices.
//!
//! Indices below [`FIRST_NEW_INDEX`] are fixed: a primitive's index is its
//! [`PrimitiveCode`] and the compulsory framework types sit at `23..=28`.
//! Every other type is numbered in discovery order, starting with the
//! predeclared list of the session.
//!
//! - [`TypeIndex`] numbers types while writing.
//! - [`TypeTable`] resolves indices while reading, growing as type
//!   descriptor records arrive.

use core::any::TypeId;

use weft_reflect::info::{PrimitiveCode, TypeHandle, TypeInfo, Typed};
use weft_reflect::registry::TypeRegistry;
use weft_utils::TypeIdMap;

use crate::error::TypeIndexError;
use crate::record::{Header, ModuleIdentifier, TypeDescriptorRecord};

// -----------------------------------------------------------------------------
// Fixed indices

/// The index given to the first type discovered in a session.
pub const FIRST_NEW_INDEX: u32 = 29;

const FIRST_COMPULSORY_INDEX: u32 = PrimitiveCode::END;

fn compulsory() -> [&'static TypeInfo; 6] {
    [
        Vec::<i32>::type_info(),
        Vec::<String>::type_info(),
        TypeDescriptorRecord::type_info(),
        Vec::<TypeDescriptorRecord>::type_info(),
        ModuleIdentifier::type_info(),
        Header::type_info(),
    ]
}

/// Registers the compulsory framework types and everything they hold.
pub(crate) fn register_compulsory(registry: &mut TypeRegistry) {
    registry.register::<Header>();
    registry.register::<Vec<TypeDescriptorRecord>>();
}

/// The reserved index of a primitive or compulsory type.
pub fn fixed_index(info: &TypeInfo) -> Option<u32> {
    if let TypeInfo::Primitive(primitive) = info {
        return Some(primitive.code().code());
    }
    compulsory()
        .iter()
        .position(|candidate| candidate.type_id() == info.type_id())
        .map(|position| FIRST_COMPULSORY_INDEX + position as u32)
}

/// The type behind a reserved index.
pub fn fixed_info(index: u32) -> Option<&'static TypeInfo> {
    if let Some(code) = PrimitiveCode::from_code(index) {
        return Some(primitive_info(code));
    }
    let position = index.checked_sub(FIRST_COMPULSORY_INDEX)?;
    compulsory().get(position as usize).copied()
}

fn primitive_info(code: PrimitiveCode) -> &'static TypeInfo {
    use chrono::{DateTime, Local, NaiveDateTime, Utc};

    match code {
        PrimitiveCode::Bool => bool::type_info(),
        PrimitiveCode::Char => char::type_info(),
        PrimitiveCode::I8 => i8::type_info(),
        PrimitiveCode::U8 => u8::type_info(),
        PrimitiveCode::I16 => i16::type_info(),
        PrimitiveCode::U16 => u16::type_info(),
        PrimitiveCode::I32 => i32::type_info(),
        PrimitiveCode::U32 => u32::type_info(),
        PrimitiveCode::I64 => i64::type_info(),
        PrimitiveCode::U64 => u64::type_info(),
        PrimitiveCode::F32 => f32::type_info(),
        PrimitiveCode::F64 => f64::type_info(),
        PrimitiveCode::I128 => i128::type_info(),
        PrimitiveCode::NaiveDateTime => NaiveDateTime::type_info(),
        PrimitiveCode::U128 => u128::type_info(),
        PrimitiveCode::String => String::type_info(),
        PrimitiveCode::Isize => isize::type_info(),
        PrimitiveCode::Usize => usize::type_info(),
        PrimitiveCode::DateTimeUtc => DateTime::<Utc>::type_info(),
        PrimitiveCode::DateTimeLocal => DateTime::<Local>::type_info(),
    }
}

// -----------------------------------------------------------------------------
// TypeIndex

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InProgress,
    Ready,
}

/// Numbers the types of one serialization pass.
#[derive(Debug)]
pub struct TypeIndex {
    assigned: TypeIdMap<(u32, State)>,
    next: u32,
}

/// The answer of [`TypeIndex::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// A fixed or already announced index.
    Known(u32),
    /// The type has not been seen in this session.
    New,
}

impl TypeIndex {
    /// Creates an index where `predeclared` already hold `29..`.
    pub fn new(predeclared: &[TypeHandle]) -> Self {
        let mut index = Self {
            assigned: TypeIdMap::new(),
            next: FIRST_NEW_INDEX,
        };
        for handle in predeclared {
            let info = handle.info();
            if fixed_index(info).is_none() && !index.assigned.contains(&info.type_id()) {
                let assigned = index.reserve(info);
                index.assigned.insert(info.type_id(), (assigned, State::Ready));
            }
        }
        index
    }

    /// Looks a type up, failing if it is still being announced.
    pub fn lookup(&self, info: &'static TypeInfo) -> Result<Lookup, TypeIndexError> {
        if let Some(index) = fixed_index(info) {
            return Ok(Lookup::Known(index));
        }
        match self.assigned.get(&info.type_id()) {
            Some((index, State::Ready)) => Ok(Lookup::Known(*index)),
            Some((_, State::InProgress)) => Err(TypeIndexError::InProgress {
                type_path: info.type_path(),
            }),
            None => Ok(Lookup::New),
        }
    }

    /// Looks a type up, treating types still being announced as unknown.
    pub fn peek(&self, info: &'static TypeInfo) -> Option<u32> {
        match self.lookup(info) {
            Ok(Lookup::Known(index)) => Some(index),
            _ => None,
        }
    }

    /// Gives a new type the next index and marks it in progress.
    pub fn reserve(&mut self, info: &'static TypeInfo) -> u32 {
        let index = self.next;
        self.next += 1;
        self.assigned.insert(info.type_id(), (index, State::InProgress));
        log::trace!("type `{}` takes index {index}", info.type_path());
        index
    }

    /// Marks a reserved type as announced.
    pub fn complete(&mut self, info: &'static TypeInfo) {
        if let Some((_, state)) = self.assigned.get_mut(&info.type_id()) {
            *state = State::Ready;
        }
    }

    /// The number of types numbered beyond the fixed ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.assigned.len()
    }
}

// -----------------------------------------------------------------------------
// TypeTable

#[derive(Debug)]
struct Entry {
    type_path: String,
    info: Option<&'static TypeInfo>,
    members: Option<Vec<String>>,
}

/// Resolves the type indices of one deserialization pass.
#[derive(Debug)]
pub struct TypeTable {
    entries: Vec<Entry>,
    by_type: TypeIdMap<usize>,
}

impl TypeTable {
    /// Creates a table where `predeclared` already hold `29..`.
    pub fn new(predeclared: &[TypeHandle]) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            by_type: TypeIdMap::new(),
        };
        for handle in predeclared {
            let info = handle.info();
            if fixed_index(info).is_none() && !table.by_type.contains(&info.type_id()) {
                table.push(info.type_path().to_owned(), Some(info), None);
            }
        }
        table
    }

    /// Adds the type described by `record` at the next index.
    ///
    /// A type the registry does not know still takes its index, so later
    /// indices stay aligned; using it fails with `TypeNotFound`.
    pub fn register(&mut self, record: TypeDescriptorRecord, registry: &TypeRegistry) -> u32 {
        let info = registry
            .get_with_type_path(&record.type_path)
            .map(|meta| meta.type_info());
        if info.is_none() {
            log::debug!("type `{}` is not registered", record.type_path);
        }
        self.push(record.type_path, info, Some(record.members))
    }

    fn push(
        &mut self,
        type_path: String,
        info: Option<&'static TypeInfo>,
        members: Option<Vec<String>>,
    ) -> u32 {
        let index = FIRST_NEW_INDEX + self.entries.len() as u32;
        if let Some(info) = info {
            self.by_type.insert(info.type_id(), self.entries.len());
        }
        self.entries.push(Entry {
            type_path,
            info,
            members,
        });
        index
    }

    /// The type behind `index`.
    ///
    /// A type that was unknown when its record arrived is looked up again,
    /// since loading a module may have registered it since.
    pub fn resolve(
        &mut self,
        index: u32,
        registry: &TypeRegistry,
    ) -> Result<&'static TypeInfo, TypeIndexError> {
        if let Some(info) = fixed_info(index) {
            return Ok(info);
        }
        let position = index
            .checked_sub(FIRST_NEW_INDEX)
            .map(|position| position as usize)
            .filter(|position| *position < self.entries.len())
            .ok_or(TypeIndexError::UnknownIndex { index })?;
        let entry = &mut self.entries[position];
        if let Some(info) = entry.info {
            return Ok(info);
        }
        let info = registry
            .get_with_type_path(&entry.type_path)
            .map(|meta| meta.type_info())
            .ok_or_else(|| TypeIndexError::TypeNotFound {
                type_path: entry.type_path.clone(),
            })?;
        entry.info = Some(info);
        self.by_type.insert(info.type_id(), position);
        Ok(info)
    }

    /// The member names written for a type, when a record announced it.
    pub fn members_of(&self, type_id: TypeId) -> Option<&[String]> {
        let position = *self.by_type.get(&type_id)?;
        self.entries[position].members.as_deref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use weft_reflect::info::{PrimitiveCode, TypeHandle, TypePath, Typed};
    use weft_reflect::registry::TypeRegistry;

    use super::{FIRST_NEW_INDEX, Lookup, TypeIndex, TypeTable, fixed_index, fixed_info};
    use crate::error::TypeIndexError;
    use crate::record::{Header, TypeDescriptorRecord};

    #[test]
    fn primitive_index_is_its_code() {
        for code in PrimitiveCode::ALL {
            let info = fixed_info(code.code()).unwrap();
            assert_eq!(fixed_index(info), Some(code.code()));
        }
        assert_eq!(fixed_index(Header::type_info()), Some(28));
        assert_eq!(fixed_index(Vec::<i32>::type_info()), Some(23));
        assert!(fixed_info(FIRST_NEW_INDEX).is_none());
    }

    #[test]
    fn new_types_are_numbered_in_discovery_order() {
        let mut index = TypeIndex::new(&[]);
        let a = Vec::<u8>::type_info();
        let b = Option::<u8>::type_info();

        assert_eq!(index.lookup(a), Ok(Lookup::New));
        assert_eq!(index.reserve(a), FIRST_NEW_INDEX);
        assert!(matches!(
            index.lookup(a),
            Err(TypeIndexError::InProgress { .. })
        ));
        assert_eq!(index.peek(a), None);
        index.complete(a);
        assert_eq!(index.lookup(a), Ok(Lookup::Known(29)));

        assert_eq!(index.reserve(b), 30);
        assert_eq!(index.lookup(u64::type_info()), Ok(Lookup::Known(12)));
    }

    #[test]
    fn predeclared_types_come_first() {
        let handles = [TypeHandle::of::<u8>(), TypeHandle::of::<Vec<u8>>()];
        let index = TypeIndex::new(&handles);
        assert_eq!(index.peek(Vec::<u8>::type_info()), Some(29));

        let mut table = TypeTable::new(&handles);
        let registry = TypeRegistry::new();
        assert_eq!(
            table.resolve(29, &registry).unwrap().type_path(),
            "alloc::vec::Vec<u8>"
        );
    }

    #[test]
    fn unknown_records_keep_their_slot() {
        let registry = TypeRegistry::new();
        let mut table = TypeTable::new(&[]);
        let record = TypeDescriptorRecord {
            type_path: "nowhere::Missing".into(),
            ..Default::default()
        };
        assert_eq!(table.register(record, &registry), 29);
        let record = TypeDescriptorRecord {
            type_path: "u8".into(),
            ..Default::default()
        };
        assert_eq!(table.register(record, &registry), 30);

        assert!(matches!(
            table.resolve(29, &registry),
            Err(TypeIndexError::TypeNotFound { .. })
        ));
        assert_eq!(table.resolve(30, &registry).unwrap().type_path(), "u8");
        assert!(matches!(
            table.resolve(31, &registry),
            Err(TypeIndexError::UnknownIndex { index: 31 })
        ));
    }

    #[derive(weft_reflect::derive::Reflect, Default)]
    #[reflect(default)]
    struct Late {
        value: u8,
    }

    #[test]
    fn records_resolve_after_late_registration() {
        let mut registry = TypeRegistry::new();
        let mut table = TypeTable::new(&[]);
        let record = TypeDescriptorRecord {
            type_path: Late::type_path().into(),
            members: vec!["value".into()],
            ..Default::default()
        };
        table.register(record, &registry);
        assert!(table.resolve(29, &registry).is_err());

        registry.register::<Late>();
        assert!(table.resolve(29, &registry).unwrap().type_is::<Late>());
        let members = table.members_of(core::any::TypeId::of::<Late>()).unwrap();
        assert_eq!(members, ["value"]);
    }
}
