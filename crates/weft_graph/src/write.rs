//! The write walk.
//!
//! [`GraphWriter`] turns a reflected value into elements. Shared handles are
//! declared once in an [`InstanceSection`](Element::InstanceSection) detour
//! and referenced everywhere they occur, strings are declared by their first
//! occurrence, and type descriptor records are emitted as
//! [`TypeSection`](Element::TypeSection) detours right before a new type
//! index is used.

use alloc::sync::Arc;
use core::mem;

use weft_reflect::Reflect;
use weft_reflect::info::{ReflectKind, TypeInfo};
use weft_reflect::ops::{PrimitiveValue, ReflectRef, SharedHandle};
use weft_reflect::registry::TypeRegistry;
use weft_utils::hash::HashMap;

use crate::descriptor::{Construction, TypeDescriptor};
use crate::element::{self, Element, ElementKind};
use crate::error::{FormatError, GraphError};
use crate::format::FormatWriter;
use crate::index::{self, Lookup, TypeIndex};
use crate::modifiers::CombinedModifiers;
use crate::record::TypeDescriptorRecord;
use crate::settings::Settings;

// -----------------------------------------------------------------------------
// Tag

/// Which type index, if any, an element carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    /// The declared type is the runtime type.
    Omit,
    /// The runtime type differs from the declared one, or the value is a root.
    Runtime,
    /// The index of an `Option` whose inner value is written in its place.
    Wrapper(u32),
}

// -----------------------------------------------------------------------------
// GraphWriter

/// One serialization pass over one channel.
pub(crate) struct GraphWriter<'a> {
    out: &'a mut dyn FormatWriter,
    registry: &'a mut TypeRegistry,
    modifiers: &'a mut CombinedModifiers,
    types: TypeIndex,
    emit_records: bool,
    /// Records collected for the assembled table instead of written inline.
    collected: Option<Vec<TypeDescriptorRecord>>,
    strings: HashMap<String, u32>,
    shared: HashMap<usize, u32>,
    /// Keeps declared handles alive so their addresses are not reused.
    pinned: Vec<Box<dyn Reflect>>,
    next_instance: u32,
    in_type_channel: bool,
}

impl<'a> GraphWriter<'a> {
    pub fn new(
        out: &'a mut dyn FormatWriter,
        registry: &'a mut TypeRegistry,
        modifiers: &'a mut CombinedModifiers,
        settings: &Settings,
    ) -> Self {
        index::register_compulsory(registry);
        Self {
            out,
            registry,
            modifiers,
            types: TypeIndex::new(&settings.predeclared),
            emit_records: settings.emit_type_descriptors,
            collected: None,
            strings: HashMap::default(),
            shared: HashMap::default(),
            pinned: Vec::new(),
            next_instance: 0,
            in_type_channel: false,
        }
    }

    /// Collects records for one up-front table instead of writing them inline.
    pub fn collect_records(mut self) -> Self {
        self.collected = Some(Vec::new());
        self
    }

    pub fn into_records(self) -> Vec<TypeDescriptorRecord> {
        self.collected.unwrap_or_default()
    }

    /// Writes a root value, always tagged with its runtime type.
    pub fn write_root(&mut self, value: &dyn Reflect) -> Result<(), GraphError> {
        self.write_value(value, Tag::Runtime)
    }

    /// Writes the assembled type table as one type section.
    pub fn write_type_table(&mut self, records: Vec<TypeDescriptorRecord>) -> Result<(), GraphError> {
        self.type_section(|this| this.write_value(&records, Tag::Runtime))
    }

    // -------------------------------------------------------------------------
    // Walk

    fn write_value(&mut self, value: &dyn Reflect, tag: Tag) -> Result<(), GraphError> {
        let info = value.reflect_type_info();
        match value.reflect_ref() {
            ReflectRef::Dynamic(inner) => {
                inner.reflect_register(self.registry);
                self.write_value(inner, Tag::Runtime)
            }
            ReflectRef::Primitive(primitive) => {
                let ty = self.tag_index(info, tag)?;
                self.write_primitive(primitive.primitive_value(), ty, tag)
            }
            ReflectRef::Enum(variant) => {
                let ty = self.tag_index(info, tag)?;
                self.write_primitive(PrimitiveValue::I64(variant.discriminant()), ty, tag)
            }
            ReflectRef::Shared(handle) => {
                let ty = self.tag_index(info, tag)?;
                let instance = match self.shared.get(&handle.identity()) {
                    Some(instance) => *instance,
                    None => self.declare_shared(info, handle)?,
                };
                self.leaf(Element::Reference { ty, instance });
                Ok(())
            }
            ReflectRef::List(list) => {
                let ty = self.tag_index(info, tag)?;
                self.collection(ty, list.len(), ElementKind::Collection, |this| {
                    list.iter().try_for_each(|item| this.write_value(item, Tag::Omit))
                })
            }
            ReflectRef::Array(array) => {
                let ty = self.tag_index(info, tag)?;
                self.collection(ty, array.len(), ElementKind::Collection, |this| {
                    array.iter().try_for_each(|item| this.write_value(item, Tag::Omit))
                })
            }
            ReflectRef::Map(map) => {
                let ty = self.tag_index(info, tag)?;
                self.collection(ty, map.len(), ElementKind::Dictionary, |this| {
                    map.iter().try_for_each(|(key, value)| {
                        this.write_value(key, Tag::Omit)?;
                        this.write_value(value, Tag::Omit)
                    })
                })
            }
            ReflectRef::Nullable(nullable) => {
                if self.try_substitute(info, value)? {
                    return Ok(());
                }
                match (nullable.value(), tag) {
                    (None, Tag::Omit) => {
                        self.leaf(Element::Null);
                        Ok(())
                    }
                    (None, _) => {
                        let ty = self.tag_index(info, tag)?;
                        self.leaf(Element::Default { ty });
                        Ok(())
                    }
                    // An empty inner option names its own type, or it reads back as this one.
                    (Some(inner), Tag::Omit) => {
                        let inner_empty = matches!(
                            inner.reflect_ref(),
                            ReflectRef::Nullable(inner) if inner.value().is_none()
                        );
                        self.write_value(inner, if inner_empty { Tag::Runtime } else { Tag::Omit })
                    }
                    // A dynamic inner value carries its own tag.
                    (Some(inner), _) if inner.reflect_kind() == ReflectKind::Dynamic => {
                        self.write_value(inner, Tag::Omit)
                    }
                    (Some(inner), _) => {
                        if inner.reflect_kind() == ReflectKind::Nullable {
                            return Err(FormatError::NestedTypeTag {
                                type_path: info.type_path(),
                            }
                            .into());
                        }
                        let ty = self.tag_index(info, tag)?;
                        self.write_value(inner, ty.map_or(Tag::Omit, Tag::Wrapper))
                    }
                }
            }
            ReflectRef::Struct(_) => {
                if self.try_substitute(info, value)? {
                    return Ok(());
                }
                let descriptor = self.modifiers.describe(info, self.registry);
                if let Construction::Unavailable(err) = descriptor.construction() {
                    return Err(err.clone().into());
                }
                let own = self.type_index(info)?;
                let ty = match tag {
                    Tag::Omit => None,
                    Tag::Runtime => Some(own),
                    Tag::Wrapper(index) => Some(index),
                };
                self.write_struct(value, &descriptor, ty)
            }
            ReflectRef::Opaque(_) => {
                if self.try_substitute(info, value)? {
                    return Ok(());
                }
                let descriptor = self.modifiers.describe(info, self.registry);
                match descriptor.construction() {
                    Construction::Unavailable(err) => Err(err.clone().into()),
                    _ => Err(FormatError::malformed(format!(
                        "opaque `{}` has no container",
                        info.type_path()
                    ))
                    .into()),
                }
            }
        }
    }

    fn write_primitive(
        &mut self,
        value: PrimitiveValue,
        ty: Option<u32>,
        tag: Tag,
    ) -> Result<(), GraphError> {
        if let PrimitiveValue::String(text) = &value
            && !self.in_type_channel
        {
            if let Some(&instance) = self.strings.get(text) {
                self.leaf(Element::Reference { ty, instance });
                return Ok(());
            }
            let instance = self.next_instance();
            self.strings.insert(text.clone(), instance);
        }

        // A default element under an `Option` tag reads back as `None`.
        if value.is_zero() && !matches!(tag, Tag::Wrapper(_)) {
            self.leaf(Element::Default { ty });
            return Ok(());
        }

        element::trace("write", &value);
        let closed = self.out.enter_element(Element::Primitive { ty });
        self.out.write_primitive(&value);
        if !closed {
            self.out.exit_element(ElementKind::Primitive);
        }
        Ok(())
    }

    fn write_struct(
        &mut self,
        value: &dyn Reflect,
        descriptor: &TypeDescriptor,
        ty: Option<u32>,
    ) -> Result<(), GraphError> {
        self.open(Element::SubBranch { ty, count: None });
        for member in descriptor.members() {
            let member_value = member.get(value).ok_or_else(|| FormatError::UnknownMember {
                type_path: descriptor.info().type_path(),
                member: member.name().to_owned(),
            })?;
            self.write_value(member_value.as_reflect(), Tag::Omit)?;
        }
        self.out.exit_element(ElementKind::SubBranch);
        Ok(())
    }

    fn declare_shared(
        &mut self,
        info: &'static TypeInfo,
        handle: &dyn SharedHandle,
    ) -> Result<u32, GraphError> {
        let ty = self.type_index(info)?;
        let instance = self.next_instance();
        self.shared.insert(handle.identity(), instance);
        self.pinned.push(handle.share());

        let inner = handle.try_borrow_inner().ok_or(FormatError::Borrowed {
            type_path: info.type_path(),
        })?;
        self.open(Element::InstanceSection { ty, instance });
        self.write_value(&*inner, Tag::Runtime)?;
        self.out.exit_element(ElementKind::InstanceSection);
        Ok(instance)
    }

    fn collection(
        &mut self,
        ty: Option<u32>,
        count: usize,
        kind: ElementKind,
        items: impl FnOnce(&mut Self) -> Result<(), GraphError>,
    ) -> Result<(), GraphError> {
        let count = u32::try_from(count)
            .map_err(|_| FormatError::malformed(format!("{count} items do not fit a count")))?;
        self.open(Element::SubBranch {
            ty,
            count: Some(count),
        });
        let inner = match kind {
            ElementKind::Dictionary => Element::Dictionary,
            _ => Element::Collection,
        };
        self.open(inner);
        items(self)?;
        self.out.exit_element(kind);
        self.out.exit_element(ElementKind::SubBranch);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Containers

    /// Writes the container substitute of `value`, if its type has one.
    ///
    /// A container that cannot represent the value is disabled for the type
    /// and the value is written member by member instead.
    fn try_substitute(&mut self, info: &'static TypeInfo, value: &dyn Reflect) -> Result<bool, GraphError> {
        let descriptor = self.modifiers.describe(info, self.registry);
        let Some(container) = self.modifiers.container_for(&descriptor).map(Arc::clone) else {
            return Ok(false);
        };
        match container.create_substitute(value, self.registry) {
            Some(substitute) => {
                self.write_value(&*substitute, Tag::Runtime)?;
                Ok(true)
            }
            None => {
                log::warn!(
                    "container `{}` cannot represent a value of `{}`, writing its members instead",
                    container.name(),
                    info.type_path(),
                );
                self.modifiers.invalidate_container(info.type_id());
                Ok(false)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Types

    fn tag_index(&mut self, info: &'static TypeInfo, tag: Tag) -> Result<Option<u32>, GraphError> {
        match tag {
            Tag::Omit => Ok(None),
            Tag::Runtime => self.type_index(info).map(Some),
            Tag::Wrapper(index) => Ok(Some(index)),
        }
    }

    /// The index of `info`, announcing the type first if it is new.
    fn type_index(&mut self, info: &'static TypeInfo) -> Result<u32, GraphError> {
        if let Lookup::Known(index) = self.types.lookup(info)? {
            return Ok(index);
        }
        let index = self.types.reserve(info);
        if self.emit_records {
            let record = self.record_of(info);
            match &mut self.collected {
                Some(records) => records.push(record),
                None => self.type_section(|this| this.write_value(&record, Tag::Runtime))?,
            }
        } else {
            log::trace!(
                "type `{}` takes index {index} without a record",
                info.type_path()
            );
        }
        self.types.complete(info);
        Ok(index)
    }

    fn record_of(&mut self, info: &'static TypeInfo) -> TypeDescriptorRecord {
        let descriptor = self.modifiers.describe(info, self.registry);
        let constructor_map = match descriptor.construction() {
            Construction::Parametric { arguments, .. } => {
                arguments.iter().map(|slot| *slot as i32).collect()
            }
            _ => Vec::new(),
        };
        let nested = match info {
            TypeInfo::List(list) => vec![list.item_info()],
            TypeInfo::Array(array) => vec![array.item_info()],
            TypeInfo::Map(map) => vec![map.key_info(), map.value_info()],
            TypeInfo::Nullable(nullable) => vec![nullable.inner_info()],
            TypeInfo::Shared(shared) => vec![shared.inner_info()],
            _ => Vec::new(),
        };
        TypeDescriptorRecord {
            type_path: info.type_path().to_owned(),
            members: descriptor
                .members()
                .iter()
                .map(|member| member.name().to_owned())
                .collect(),
            constructor_map,
            nested: nested
                .into_iter()
                .map(|nested| self.types.peek(nested).map_or(-1, |index| index as i32))
                .collect(),
        }
    }

    fn type_section(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<(), GraphError>,
    ) -> Result<(), GraphError> {
        let outer = mem::replace(&mut self.in_type_channel, true);
        self.open(Element::TypeSection);
        let result = body(self);
        self.in_type_channel = outer;
        result?;
        self.out.exit_element(ElementKind::TypeSection);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Elements

    #[inline]
    fn open(&mut self, element: Element) {
        element::trace("write", &element);
        self.out.enter_element(element);
    }

    /// Writes an element without children.
    fn leaf(&mut self, element: Element) {
        let kind = element.kind();
        element::trace("write", &element);
        if !self.out.enter_element(element) {
            self.out.exit_element(kind);
        }
    }

    fn next_instance(&mut self) -> u32 {
        let instance = self.next_instance;
        self.next_instance += 1;
        instance
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use weft_reflect::registry::TypeRegistry;
    use weft_reflect::{Dynamic, Shared};

    use super::GraphWriter;
    use crate::element::Element;
    use crate::format::{Format, Recorder, WireOp};
    use crate::modifiers::{CombinedModifiers, ModifierSet};
    use crate::settings::Settings;

    fn record(value: &dyn weft_reflect::Reflect) -> Vec<WireOp> {
        let mut registry = TypeRegistry::new();
        value.reflect_register(&mut registry);
        let mut modifiers = CombinedModifiers::new(&[Arc::new(ModifierSet::builtin())]);
        modifiers.register_substitutes(&mut registry);
        let mut recorder = Recorder::new(Format::Xml);
        let settings = Settings::default();
        let mut writer = GraphWriter::new(&mut recorder, &mut registry, &mut modifiers, &settings);
        writer.write_root(value).unwrap();
        recorder.ops().to_vec()
    }

    fn entered(ops: &[WireOp]) -> Vec<Element> {
        ops.iter()
            .filter_map(|op| match op {
                WireOp::Enter(element) => Some(*element),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn zero_primitives_become_defaults() {
        assert_eq!(entered(&record(&0_i32)), [Element::Default { ty: Some(9) }]);
        assert_eq!(entered(&record(&7_i32)), [Element::Primitive { ty: Some(9) }]);
    }

    #[test]
    fn repeated_strings_are_referenced() {
        let value = vec![String::from("a"), String::from("a")];
        let elements = entered(&record(&value));
        assert_eq!(elements[0], Element::SubBranch { ty: Some(24), count: Some(2) });
        assert_eq!(elements[2], Element::Primitive { ty: None });
        assert_eq!(elements[3], Element::Reference { ty: None, instance: 0 });
    }

    #[test]
    fn shared_handles_are_declared_once() {
        let shared = Shared::new(5_u8);
        let value = vec![shared.clone(), shared];
        let elements = entered(&record(&value));
        let declarations = elements
            .iter()
            .filter(|element| matches!(element, Element::InstanceSection { .. }))
            .count();
        let references = elements
            .iter()
            .filter(|element| matches!(element, Element::Reference { instance: 0, .. }))
            .count();
        assert_eq!(declarations, 1);
        assert_eq!(references, 2);
    }

    #[test]
    fn dynamic_values_carry_their_type() {
        let value = vec![Dynamic::new(3_u16)];
        let elements = entered(&record(&value));
        assert!(elements.contains(&Element::Primitive { ty: Some(8) }));
    }

    #[test]
    fn some_zero_under_option_tag_stays_primitive() {
        let elements = entered(&record(&Some(0_u8)));
        assert!(matches!(elements.as_slice(), [.., Element::Primitive { ty: Some(_) }]));
        let elements = entered(&record(&Option::<u8>::None));
        assert!(matches!(elements.as_slice(), [.., Element::Default { ty: Some(_) }]));
    }

    #[test]
    fn empty_inner_options_name_their_type() {
        let value: Vec<Option<Option<u8>>> = vec![Some(None), None];
        let elements = entered(&record(&value));
        assert!(matches!(
            elements.as_slice(),
            [.., Element::Default { ty: Some(_) }, Element::Null]
        ));
    }

    #[test]
    fn records_precede_first_use() {
        let value: Vec<Option<u8>> = vec![None];
        let ops = record(&value);
        let elements = entered(&ops);
        assert_eq!(elements[0], Element::TypeSection);
        assert!(matches!(elements.last(), Some(Element::Null)));
    }
}
