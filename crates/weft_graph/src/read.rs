//! The read walk.
//!
//! [`GraphReader`] mirrors the write walk. Type sections and instance
//! sections are detours: whenever a value is expected, detours in front of
//! it are consumed first, registering types and declaring instances.
//!
//! # Instances
//!
//! Every shared handle and every string outside the type channel takes the
//! next instance slot. A slot is [`Empty`](InstanceSlot::Empty) while its
//! value is read, [`Pending`](InstanceSlot::Pending) while a parametric
//! constructor waits for its arguments, and [`Ready`](InstanceSlot::Ready)
//! once the handle exists. A reference to a pending slot defers the
//! assignment of the member that holds it until the slot becomes ready.

use core::mem;

use weft_reflect::info::{PrimitiveCode, SharedInfo, TypeInfo, Typed};
use weft_reflect::ops::{PrimitiveValue, ReflectMut, ReflectRef, SetError};
use weft_reflect::registry::{TypeRegistry, TypeTraitDefault};
use weft_reflect::{Dynamic, Reflect};

use crate::descriptor::{Construction, Member};
use crate::element::{self, Element, ElementKind, Token};
use crate::error::{AssignError, ConstructError, FormatError, GraphError, TypeIndexError};
use crate::format::FormatReader;
use crate::index::{self, TypeTable};
use crate::modifiers::CombinedModifiers;
use crate::record::TypeDescriptorRecord;
use crate::settings::Settings;

// -----------------------------------------------------------------------------
// Instances

type DeferredSetter = Box<dyn FnOnce(&dyn Reflect) -> Result<(), GraphError>>;

/// Element counts come from the stream; storage grows past this as items arrive.
const RESERVE_LIMIT: usize = 1024;

/// One entry of the instance registry.
enum InstanceSlot {
    Empty,
    Pending(Vec<DeferredSetter>),
    Ready(Box<dyn Reflect>),
}

/// The outcome of reading one value.
enum Read {
    Value(Box<dyn Reflect>),
    /// A reference to an instance that is not built yet.
    Deferred(u32),
}

impl Read {
    fn map(
        self,
        f: impl FnOnce(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, GraphError>,
    ) -> Result<Self, GraphError> {
        match self {
            Self::Value(value) => f(value).map(Self::Value),
            deferred => Ok(deferred),
        }
    }

    fn into_value(self, info: &'static TypeInfo) -> Result<Box<dyn Reflect>, GraphError> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Deferred(instance) => Err(ConstructError::CircularConstructorParameter {
                type_path: info.type_path(),
                instance,
            }
            .into()),
        }
    }
}

/// The instance a value is read for, when it is the inside of a shared handle.
#[derive(Clone, Copy)]
struct SharedCtx {
    instance: u32,
    info: &'static SharedInfo,
}

// -----------------------------------------------------------------------------
// GraphReader

/// One deserialization pass over one stream.
pub(crate) struct GraphReader<'a> {
    input: Box<dyn FormatReader + 'a>,
    registry: &'a mut TypeRegistry,
    modifiers: &'a mut CombinedModifiers,
    types: TypeTable,
    instances: Vec<InstanceSlot>,
    peeked: Option<Token>,
    checked: bool,
    in_type_channel: bool,
}

impl<'a> GraphReader<'a> {
    pub fn new(
        input: Box<dyn FormatReader + 'a>,
        registry: &'a mut TypeRegistry,
        modifiers: &'a mut CombinedModifiers,
        settings: &Settings,
    ) -> Self {
        index::register_compulsory(registry);
        Self {
            input,
            registry,
            modifiers,
            types: TypeTable::new(&settings.predeclared),
            instances: Vec::new(),
            peeked: None,
            checked: settings.checked,
            in_type_channel: false,
        }
    }

    pub fn start(&mut self) -> Result<(), GraphError> {
        self.input.start_tree()?;
        Ok(())
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        self.registry
    }

    /// Reads one root value of type `expected`.
    pub fn read_root(&mut self, expected: &'static TypeInfo) -> Result<Box<dyn Reflect>, GraphError> {
        self.read_value(expected)?.into_value(expected)
    }

    /// Consumes the end-of-data mark.
    pub fn finish(&mut self) -> Result<(), GraphError> {
        let next = match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.input.next_token(),
        };
        match next {
            Ok(Token::End) => Ok(()),
            Ok(token) => {
                log::debug!("found {token} instead of the end mark");
                self.structural(FormatError::MissingEndMark)
            }
            Err(FormatError::UnexpectedEnd) => self.structural(FormatError::MissingEndMark),
            Err(err) => Err(err.into()),
        }
    }

    // -------------------------------------------------------------------------
    // Tokens

    fn next_token(&mut self) -> Result<Token, GraphError> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }
        let token = self.input.next_token()?;
        element::trace("read", &token);
        Ok(token)
    }

    /// The next value element, after every detour in front of it.
    fn next_value_element(&mut self) -> Result<Element, GraphError> {
        loop {
            match self.next_token()? {
                Token::Open(Element::TypeSection) => self.read_type_section()?,
                Token::Open(Element::InstanceSection { ty, instance }) => {
                    self.read_instance_section(ty, instance)?;
                }
                Token::Open(element) => return Ok(element),
                token => {
                    return Err(FormatError::UnexpectedElement {
                        expected: "a value",
                        found: token.to_string(),
                    }
                    .into());
                }
            }
        }
    }

    fn expect_open(&mut self, element: Element) -> Result<(), GraphError> {
        match self.next_token()? {
            Token::Open(found) if found == element => Ok(()),
            token => {
                self.peeked = Some(token);
                self.structural(FormatError::UnexpectedElement {
                    expected: element.kind().tag(),
                    found: token.to_string(),
                })
            }
        }
    }

    fn expect_close(&mut self, kind: ElementKind) -> Result<(), GraphError> {
        match self.next_token()? {
            Token::Close(found) if found == kind => Ok(()),
            token => {
                self.peeked = Some(token);
                self.structural(FormatError::UnexpectedElement {
                    expected: kind.tag(),
                    found: token.to_string(),
                })
            }
        }
    }

    /// Fails on a structural oddity when checked, logs it otherwise.
    fn structural(&self, err: FormatError) -> Result<(), GraphError> {
        if self.checked {
            return Err(err.into());
        }
        log::warn!("ignoring a malformed stream: {err}");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Detours

    fn read_type_section(&mut self) -> Result<(), GraphError> {
        let outer = mem::replace(&mut self.in_type_channel, true);
        let read = self.read_value(Dynamic::type_info());
        self.in_type_channel = outer;

        let value = read?.into_value(Dynamic::type_info())?;
        let value = match value.take::<Dynamic>() {
            Ok(dynamic) => dynamic.into_inner(),
            Err(value) => value,
        };
        match value.take::<TypeDescriptorRecord>() {
            Ok(record) => {
                self.types.register(record, self.registry);
            }
            Err(value) => {
                let records = value.take::<Vec<TypeDescriptorRecord>>().map_err(|value| {
                    FormatError::UnexpectedElement {
                        expected: "a type descriptor record",
                        found: value.reflect_type_path().to_owned(),
                    }
                })?;
                log::trace!("reading a table of {} type records", records.len());
                for record in records {
                    self.types.register(record, self.registry);
                }
            }
        }
        self.expect_close(ElementKind::TypeSection)
    }

    fn read_instance_section(&mut self, ty: u32, instance: u32) -> Result<(), GraphError> {
        if instance as usize != self.instances.len() {
            return Err(FormatError::malformed(format!(
                "instance {instance} declared as number {}",
                self.instances.len()
            ))
            .into());
        }
        self.instances.push(InstanceSlot::Empty);

        let info = self.types.resolve(ty, self.registry)?;
        let TypeInfo::Shared(shared_info) = info else {
            return Err(FormatError::UnexpectedElement {
                expected: "a shared type",
                found: info.type_path().to_owned(),
            }
            .into());
        };
        let ctx = SharedCtx {
            instance,
            info: shared_info,
        };

        let element = self.next_value_element()?;
        let read = self.read_element(element, shared_info.inner_info(), Some(ctx))?;
        if !matches!(self.instances[instance as usize], InstanceSlot::Ready(_)) {
            let value = read.into_value(shared_info.inner_info())?;
            let handle = wrap_shared(shared_info, value)?;
            self.make_ready(instance, handle)?;
        }
        self.expect_close(ElementKind::InstanceSection)
    }

    // -------------------------------------------------------------------------
    // Values

    fn read_value(&mut self, expected: &'static TypeInfo) -> Result<Read, GraphError> {
        let element = self.next_value_element()?;
        self.read_element(element, expected, None)
    }

    fn read_element(
        &mut self,
        element: Element,
        expected: &'static TypeInfo,
        shared: Option<SharedCtx>,
    ) -> Result<Read, GraphError> {
        let tagged = match element.ty() {
            Some(index) => Some(self.types.resolve(index, self.registry)?),
            None => None,
        };

        if let Some(actual) = tagged
            && actual.type_id() != expected.type_id()
            && let Some(container) = self.modifiers.container_for_substitute(actual.type_id())
        {
            let container = container.clone();
            let substitute = self.read_as(element, actual, None)?.into_value(actual)?;
            let original = container.recover(substitute, self.registry)?;
            return Ok(Read::Value(wrap_for(expected, original)?));
        }

        match expected {
            TypeInfo::Nullable(nullable) => {
                if element == Element::Null {
                    return Ok(Read::Value(nullable.none()));
                }
                let read = match tagged {
                    // The tag names the `Option` itself, its inner value takes its place.
                    Some(actual) if actual.type_id() == expected.type_id() => {
                        if let Element::Default { .. } = element {
                            return Ok(Read::Value(nullable.none()));
                        }
                        self.read_as(element, nullable.inner_info(), None)?
                    }
                    _ => self.read_element(element, nullable.inner_info(), None)?,
                };
                read.map(|value| {
                    nullable
                        .some(value)
                        .map_err(|value| mismatch(nullable.inner_info(), &*value))
                })
            }
            TypeInfo::Dynamic(_) => {
                let actual = tagged.ok_or(FormatError::MissingTypeTag {
                    type_path: expected.type_path(),
                })?;
                self.read_as(element, actual, None)?
                    .map(|value| Ok(Box::new(Dynamic::from_boxed(value)) as Box<dyn Reflect>))
            }
            _ => match tagged {
                Some(actual) if actual.type_id() != expected.type_id() => self
                    .read_as(element, actual, None)?
                    .map(|value| wrap_for(expected, value)),
                _ => self.read_as(element, expected, shared),
            },
        }
    }

    fn read_as(
        &mut self,
        element: Element,
        info: &'static TypeInfo,
        shared: Option<SharedCtx>,
    ) -> Result<Read, GraphError> {
        match element {
            Element::Null => {
                if let TypeInfo::Nullable(nullable) = info {
                    return Ok(Read::Value(nullable.none()));
                }
                self.structural(FormatError::UnexpectedElement {
                    expected: info.type_path(),
                    found: element.kind().to_string(),
                })?;
                self.default_of(info).map(Read::Value)
            }
            Element::Default { .. } => self.default_of(info).map(Read::Value),
            Element::Reference { instance, .. } => self.reference(instance, info),
            Element::Primitive { .. } => self.read_primitive(info).map(Read::Value),
            Element::SubBranch { count, .. } => self.read_branch(info, count, shared),
            _ => Err(FormatError::UnexpectedElement {
                expected: info.type_path(),
                found: element.kind().to_string(),
            }
            .into()),
        }
    }

    fn default_of(&self, info: &'static TypeInfo) -> Result<Box<dyn Reflect>, GraphError> {
        let type_path = info.type_path();
        match info {
            TypeInfo::Primitive(primitive) => {
                if let Some(zero) = PrimitiveValue::zero(primitive.code()) {
                    return Ok(zero.into_reflect());
                }
            }
            TypeInfo::Enum(variants) => {
                return variants.from_discriminant(0).ok_or_else(|| {
                    FormatError::UnknownVariant {
                        type_path,
                        discriminant: 0,
                    }
                    .into()
                });
            }
            TypeInfo::Nullable(nullable) => return Ok(nullable.none()),
            _ => {}
        }
        self.registry
            .get_type_trait::<TypeTraitDefault>(info.type_id())
            .map(TypeTraitDefault::default)
            .ok_or_else(|| ConstructError::NotConstructible { type_path }.into())
    }

    fn reference(&self, instance: u32, info: &'static TypeInfo) -> Result<Read, GraphError> {
        match self.instances.get(instance as usize) {
            None => Err(FormatError::UnknownInstance { instance }.into()),
            Some(InstanceSlot::Ready(value)) => value
                .reflect_clone()
                .map(Read::Value)
                .map_err(|err| {
                    FormatError::malformed(format!("instance {instance} cannot be shared: {err}"))
                        .into()
                }),
            Some(InstanceSlot::Pending(_)) => Ok(Read::Deferred(instance)),
            Some(InstanceSlot::Empty) => Err(ConstructError::CircularConstructorParameter {
                type_path: info.type_path(),
                instance,
            }
            .into()),
        }
    }

    fn read_primitive(&mut self, info: &'static TypeInfo) -> Result<Box<dyn Reflect>, GraphError> {
        match info {
            TypeInfo::Primitive(primitive) => {
                let value = self.input.read_primitive(primitive.code())?;
                if let PrimitiveValue::String(text) = &value
                    && !self.in_type_channel
                {
                    self.instances
                        .push(InstanceSlot::Ready(Box::new(text.clone())));
                }
                Ok(value.into_reflect())
            }
            TypeInfo::Enum(variants) => {
                let discriminant = match self.input.read_primitive(PrimitiveCode::I64)? {
                    PrimitiveValue::I64(discriminant) => discriminant,
                    other => {
                        return Err(FormatError::malformed(format!(
                            "enum discriminant read as {other:?}"
                        ))
                        .into());
                    }
                };
                variants.from_discriminant(discriminant).ok_or_else(|| {
                    FormatError::UnknownVariant {
                        type_path: info.type_path(),
                        discriminant,
                    }
                    .into()
                })
            }
            _ => Err(FormatError::UnexpectedElement {
                expected: info.type_path(),
                found: ElementKind::Primitive.to_string(),
            }
            .into()),
        }
    }

    fn read_branch(
        &mut self,
        info: &'static TypeInfo,
        count: Option<u32>,
        shared: Option<SharedCtx>,
    ) -> Result<Read, GraphError> {
        if let TypeInfo::Struct(_) = info {
            return self.read_struct(info, shared);
        }
        let count = count.ok_or_else(|| {
            FormatError::malformed(format!("`{}` is written without a count", info.type_path()))
        })? as usize;
        let reserve = count.min(RESERVE_LIMIT);

        let value = match info {
            TypeInfo::List(list_info) => {
                self.expect_open(Element::Collection)?;
                let mut list = list_info.new_empty(reserve);
                for _ in 0..count {
                    let item = self.read_value(list_info.item_info())?;
                    let item = item.into_value(list_info.item_info())?;
                    if let ReflectMut::List(list) = list.reflect_mut() {
                        let shown = Shown::of(&*item);
                        list.push(item).map_err(|source| shown.fail(info, "item", source))?;
                    }
                }
                self.expect_close(ElementKind::Collection)?;
                list
            }
            TypeInfo::Array(array_info) => {
                self.expect_open(Element::Collection)?;
                let mut items = Vec::with_capacity(reserve);
                for _ in 0..count {
                    let item = self.read_value(array_info.item_info())?;
                    items.push(item.into_value(array_info.item_info())?);
                }
                self.expect_close(ElementKind::Collection)?;
                array_info
                    .from_items(items)
                    .map_err(|items| FormatError::ArrayLength {
                        type_path: info.type_path(),
                        expected: array_info.capacity(),
                        found: items.len(),
                    })?
            }
            TypeInfo::Map(map_info) => {
                self.expect_open(Element::Dictionary)?;
                let mut map = map_info.new_empty(reserve);
                for _ in 0..count {
                    let key = self.read_value(map_info.key_info())?;
                    let key = key.into_value(map_info.key_info())?;
                    let value = self.read_value(map_info.value_info())?;
                    let value = value.into_value(map_info.value_info())?;
                    if let ReflectMut::Map(map) = map.reflect_mut() {
                        let shown = Shown::of(&*value);
                        map.insert(key, value)
                            .map_err(|source| shown.fail(info, "entry", source))?;
                    }
                }
                self.expect_close(ElementKind::Dictionary)?;
                map
            }
            _ => {
                return Err(FormatError::UnexpectedElement {
                    expected: info.type_path(),
                    found: ElementKind::SubBranch.to_string(),
                }
                .into());
            }
        };
        self.expect_close(ElementKind::SubBranch)?;
        Ok(Read::Value(value))
    }

    // -------------------------------------------------------------------------
    // Structures

    fn read_struct(
        &mut self,
        info: &'static TypeInfo,
        shared: Option<SharedCtx>,
    ) -> Result<Read, GraphError> {
        let descriptor = self.modifiers.describe(info, self.registry);
        let members = descriptor.members();
        let type_path = info.type_path();

        let order: Vec<usize> = match self.types.members_of(info.type_id()) {
            Some(names) => names
                .iter()
                .map(|name| {
                    descriptor.member(name).map(|(slot, _)| slot).ok_or_else(|| {
                        FormatError::UnknownMember {
                            type_path,
                            member: name.clone(),
                        }
                    })
                })
                .collect::<Result<_, _>>()?,
            None => (0..members.len()).collect(),
        };

        match descriptor.construction() {
            Construction::Default(default) => {
                let value = default.default();
                match shared {
                    Some(ctx) => {
                        let handle = wrap_shared(ctx.info, value)?;
                        let parent = self.make_ready(ctx.instance, handle)?;
                        for slot in order {
                            let member = &members[slot];
                            match self.read_value(member.type_info())? {
                                Read::Value(value) => assign_shared(&*parent, member, value)?,
                                Read::Deferred(target) => {
                                    self.defer(target, &*parent, member)?;
                                }
                            }
                        }
                        self.expect_close(ElementKind::SubBranch)?;
                        Ok(Read::Value(parent))
                    }
                    None => {
                        let mut value = value;
                        for slot in order {
                            let member = &members[slot];
                            let read = self.read_value(member.type_info())?;
                            member.set(&mut *value, read.into_value(member.type_info())?)?;
                        }
                        self.expect_close(ElementKind::SubBranch)?;
                        Ok(Read::Value(value))
                    }
                }
            }
            Construction::Parametric {
                constructor,
                arguments,
            } => {
                if let Some(ctx) = shared {
                    self.instances[ctx.instance as usize] = InstanceSlot::Pending(Vec::new());
                }

                let mut values: Vec<Option<Box<dyn Reflect>>> =
                    members.iter().map(|_| None).collect();
                let mut deferred = Vec::new();
                for slot in order {
                    let member = &members[slot];
                    match self.read_value(member.type_info())? {
                        Read::Value(value) => values[slot] = Some(value),
                        Read::Deferred(target) => {
                            if shared.is_none() || arguments.contains(&slot) || !deferrable(member) {
                                return Err(ConstructError::CircularConstructorParameter {
                                    type_path,
                                    instance: target,
                                }
                                .into());
                            }
                            deferred.push((slot, target));
                        }
                    }
                }
                self.expect_close(ElementKind::SubBranch)?;

                let args = arguments
                    .iter()
                    .map(|&slot| {
                        values[slot].take().ok_or(ConstructError::MissingMember {
                            type_path,
                            member: members[slot].name(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let mut value =
                    constructor
                        .invoke(args)
                        .map_err(|source| ConstructError::Invoke {
                            type_path,
                            constructor: constructor.name(),
                            source,
                        })?;
                for (slot, member_value) in values.into_iter().enumerate() {
                    if let Some(member_value) = member_value {
                        members[slot].set(&mut *value, member_value)?;
                    }
                }

                let Some(ctx) = shared else {
                    return Ok(Read::Value(value));
                };
                let handle = wrap_shared(ctx.info, value)?;
                for (slot, target) in deferred {
                    self.defer(target, &*handle, &members[slot])?;
                }
                self.make_ready(ctx.instance, handle).map(Read::Value)
            }
            Construction::Unavailable(err) => Err(err.clone().into()),
            Construction::Intrinsic => Err(FormatError::malformed(format!(
                "`{type_path}` is not a structure"
            ))
            .into()),
        }
    }

    // -------------------------------------------------------------------------
    // Instance slots

    /// Stores the handle of an instance and runs the setters waiting for it.
    /// Returns another handle to the same value.
    fn make_ready(
        &mut self,
        instance: u32,
        handle: Box<dyn Reflect>,
    ) -> Result<Box<dyn Reflect>, GraphError> {
        let other = share(&*handle)?;
        let slot = &mut self.instances[instance as usize];
        let previous = mem::replace(slot, InstanceSlot::Ready(handle));
        if let (InstanceSlot::Pending(setters), InstanceSlot::Ready(ready)) = (previous, &*slot) {
            for setter in setters {
                setter(&**ready)?;
            }
        }
        Ok(other)
    }

    /// Assigns `member` of the shared `parent` once `target` is ready.
    fn defer(&mut self, target: u32, parent: &dyn Reflect, member: &Member) -> Result<(), GraphError> {
        let parent = share(parent)?;
        let type_path = member.type_info().type_path();
        let member = member.clone();
        let setter: DeferredSetter = Box::new(move |ready| {
            let value = share(ready)?;
            let value = wrap_for(member.type_info(), value)?;
            assign_shared(&*parent, &member, value)
        });
        match &mut self.instances[target as usize] {
            InstanceSlot::Pending(setters) => {
                setters.push(setter);
                Ok(())
            }
            InstanceSlot::Ready(ready) => setter(&**ready),
            InstanceSlot::Empty => Err(ConstructError::CircularConstructorParameter {
                type_path,
                instance: target,
            }
            .into()),
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Only members that can wait for their value may hold a pending instance.
fn deferrable(member: &Member) -> bool {
    matches!(
        member.type_info(),
        TypeInfo::Nullable(_) | TypeInfo::Dynamic(_)
    )
}

fn share(handle: &dyn Reflect) -> Result<Box<dyn Reflect>, GraphError> {
    handle.reflect_clone().map_err(|err| {
        FormatError::malformed(format!(
            "`{}` cannot be shared: {err}",
            handle.reflect_type_path()
        ))
        .into()
    })
}

fn wrap_shared(info: &'static SharedInfo, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, GraphError> {
    info.wrap(value)
        .map_err(|value| mismatch(info.inner_info(), &*value))
}

/// Adapts a value to the declared type of the slot it goes into.
fn wrap_for(expected: &'static TypeInfo, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, GraphError> {
    if (*value).ty_id() == expected.type_id() {
        return Ok(value);
    }
    match expected {
        TypeInfo::Nullable(nullable) => {
            let inner = wrap_for(nullable.inner_info(), value)?;
            nullable
                .some(inner)
                .map_err(|value| mismatch(nullable.inner_info(), &*value))
        }
        TypeInfo::Dynamic(_) => Ok(Box::new(Dynamic::from_boxed(value))),
        _ => Err(mismatch(expected, &*value)),
    }
}

fn assign_shared(parent: &dyn Reflect, member: &Member, value: Box<dyn Reflect>) -> Result<(), GraphError> {
    let ReflectRef::Shared(handle) = parent.reflect_ref() else {
        return Err(TypeIndexError::Mismatch {
            expected: "a shared handle",
            found: parent.reflect_type_path(),
        }
        .into());
    };
    let mut inner = handle.try_borrow_inner_mut().ok_or(FormatError::Borrowed {
        type_path: parent.reflect_type_path(),
    })?;
    member.set(&mut *inner, value)?;
    Ok(())
}

fn mismatch(expected: &'static TypeInfo, found: &dyn Reflect) -> GraphError {
    TypeIndexError::Mismatch {
        expected: expected.type_path(),
        found: found.reflect_type_path(),
    }
    .into()
}

/// What a rejected item looked like, captured before it is moved.
struct Shown {
    value: String,
    value_type: &'static str,
}

impl Shown {
    fn of(value: &dyn Reflect) -> Self {
        Self {
            value: format!("{value:?}"),
            value_type: value.reflect_type_path(),
        }
    }

    fn fail(self, info: &'static TypeInfo, member: &str, source: SetError) -> GraphError {
        AssignError {
            container: info.type_path(),
            member: member.to_owned(),
            value: self.value,
            value_type: self.value_type,
            source,
        }
        .into()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use weft_reflect::derive::Reflect;
    use weft_reflect::info::Typed;
    use weft_reflect::registry::TypeRegistry;
    use weft_reflect::Shared;

    use super::GraphReader;
    use crate::error::{ConstructError, FormatError, GraphError};
    use crate::format::Format;
    use crate::modifiers::{CombinedModifiers, ModifierSet};
    use crate::settings::Settings;
    use crate::write::GraphWriter;

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Node {
        value: i32,
        next: Option<Shared<Node>>,
    }

    #[derive(Reflect)]
    #[reflect(memberwise = false, constructor(new(id: i32)))]
    struct Link {
        id: i32,
        next: Option<Shared<Link>>,
    }

    impl Link {
        fn new(id: i32) -> Self {
            Self { id, next: None }
        }
    }

    #[derive(Reflect)]
    #[reflect(memberwise = false, constructor(new(inner: Option<Shared<Knot>>)))]
    struct Knot {
        inner: Option<Shared<Knot>>,
    }

    impl Knot {
        fn new(inner: Option<Shared<Knot>>) -> Self {
            Self { inner }
        }
    }

    fn write(
        value: &dyn weft_reflect::Reflect,
        format: Format,
        registry: &mut TypeRegistry,
        modifiers: &mut CombinedModifiers,
        end_mark: bool,
    ) -> Vec<u8> {
        let settings = Settings::default();
        let mut out = format.writer();
        out.start_tree();
        GraphWriter::new(&mut *out, registry, modifiers, &settings)
            .write_root(value)
            .unwrap();
        if end_mark {
            out.insert_data_end_mark();
        }
        out.finish()
    }

    fn round_trip<T: weft_reflect::Reflect + Typed>(
        value: &dyn weft_reflect::Reflect,
        format: Format,
    ) -> Result<T, GraphError> {
        let mut registry = TypeRegistry::new();
        value.reflect_register(&mut registry);
        let mut modifiers = CombinedModifiers::new(&[Arc::new(ModifierSet::builtin())]);
        modifiers.register_substitutes(&mut registry);
        let bytes = write(value, format, &mut registry, &mut modifiers, true);

        let settings = Settings::default();
        let mut reader =
            GraphReader::new(format.reader(&bytes)?, &mut registry, &mut modifiers, &settings);
        reader.start()?;
        let read = reader.read_root(T::type_info())?;
        reader.finish()?;
        Ok(read.take::<T>().unwrap())
    }

    const FORMATS: [Format; 3] = [Format::Binary, Format::Xml, Format::Json];

    #[test]
    fn plain_values_round_trip() {
        for format in FORMATS {
            assert_eq!(round_trip::<i32>(&0_i32, format).unwrap(), 0);
            assert_eq!(round_trip::<u8>(&200_u8, format).unwrap(), 200);
            assert_eq!(round_trip::<Option<u8>>(&Some(0_u8), format).unwrap(), Some(0));
            assert_eq!(round_trip::<Option<u8>>(&None::<u8>, format).unwrap(), None);

            let words = vec![String::from("a"), String::from("b"), String::from("a")];
            assert_eq!(round_trip::<Vec<String>>(&words, format).unwrap(), words);
        }
    }

    #[test]
    fn shared_handles_keep_their_identity() {
        for format in FORMATS {
            let shared = Shared::new(5_u8);
            let value = vec![shared.clone(), shared];
            let read = round_trip::<Vec<Shared<u8>>>(&value, format).unwrap();
            assert_eq!(*read[0].borrow(), 5);
            assert!(Shared::ptr_eq(&read[0], &read[1]));
        }
    }

    #[test]
    fn default_built_cycles_close() {
        for format in FORMATS {
            let node = Shared::new(Node {
                value: 7,
                next: None,
            });
            node.borrow_mut().next = Some(node.clone());

            let read = round_trip::<Shared<Node>>(&node, format).unwrap();
            let next = read.borrow().next.clone().unwrap();
            assert!(Shared::ptr_eq(&read, &next));
            assert_eq!(read.borrow().value, 7);

            node.borrow_mut().next = None;
            read.borrow_mut().next = None;
        }
    }

    #[test]
    fn parametric_cycles_are_assigned_after_construction() {
        for format in FORMATS {
            let link = Shared::new(Link::new(3));
            link.borrow_mut().next = Some(link.clone());

            let read = round_trip::<Shared<Link>>(&link, format).unwrap();
            assert_eq!(read.borrow().id, 3);
            let next = read.borrow().next.clone().unwrap();
            assert!(Shared::ptr_eq(&read, &next));

            link.borrow_mut().next = None;
            read.borrow_mut().next = None;
        }
    }

    #[test]
    fn constructor_arguments_cannot_close_a_cycle() {
        let knot = Shared::new(Knot::new(None));
        knot.borrow_mut().inner = Some(knot.clone());

        let err = round_trip::<Shared<Knot>>(&knot, Format::Binary).map(|_| ()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::Construct(ConstructError::CircularConstructorParameter { instance: 0, .. })
        ));
        knot.borrow_mut().inner = None;
    }

    fn read_without_end_mark(checked: bool) -> Result<u8, GraphError> {
        let mut registry = TypeRegistry::new();
        let mut modifiers = CombinedModifiers::new(&[Arc::new(ModifierSet::builtin())]);
        let bytes = write(&9_u8, Format::Binary, &mut registry, &mut modifiers, false);

        let settings = Settings::default().checked(checked);
        let mut reader =
            GraphReader::new(Format::Binary.reader(&bytes)?, &mut registry, &mut modifiers, &settings);
        reader.start()?;
        let read = reader.read_root(u8::type_info())?;
        reader.finish()?;
        Ok(read.take::<u8>().unwrap())
    }

    #[test]
    fn inflated_counts_fail_without_reserving_them() {
        let words: Vec<String> = (0..7).map(|i| i.to_string()).collect();
        let mut registry = TypeRegistry::new();
        let value: &dyn weft_reflect::Reflect = &words;
        value.reflect_register(&mut registry);
        let mut modifiers = CombinedModifiers::new(&[Arc::new(ModifierSet::builtin())]);
        let bytes = write(value, Format::Xml, &mut registry, &mut modifiers, true);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(" n=\"7\""));
        let text = text.replacen(" n=\"7\"", " n=\"4294967295\"", 1);

        let settings = Settings::default();
        let mut reader = GraphReader::new(
            Format::Xml.reader(text.as_bytes()).unwrap(),
            &mut registry,
            &mut modifiers,
            &settings,
        );
        reader.start().unwrap();
        assert!(reader.read_root(<Vec<String>>::type_info()).is_err());
    }

    #[test]
    fn missing_end_mark_fails_only_when_checked() {
        assert_eq!(read_without_end_mark(false).unwrap(), 9);
        let err = read_without_end_mark(true).unwrap_err();
        assert!(matches!(err, GraphError::Format(FormatError::MissingEndMark)));
    }
}
