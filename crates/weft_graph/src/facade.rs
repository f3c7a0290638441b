//! The serializer entry point.
//!
//! A [`Weft`] owns the type registry and the modifier cache. Every pass
//! locks them for its whole duration, so two passes never interleave their
//! type index mutations. Clones share the same state.
//!
//! A stream is laid out as
//!
//! ```text
//! preamble  header  [type table]  root  end-mark
//! ```
//!
//! where the type table only exists in the assembled streaming mode.

use alloc::sync::Arc;
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use weft_reflect::Reflect;
use weft_reflect::info::{TypeInfo, TypePath, Typed};
use weft_reflect::registry::{GetTypeMeta, TypeRegistry};

use crate::error::{GraphError, TypeIndexError};
use crate::format::{Format, Recorder};
use crate::modifiers::{ModifierCache, ModifierProvider, ModifierSet};
use crate::read::GraphReader;
use crate::record::{Header, ModuleIdentifier};
use crate::settings::{Settings, StreamingMode};
use crate::write::GraphWriter;

// -----------------------------------------------------------------------------
// EngineState

/// The process-wide part of an engine, guarded by one lock.
struct EngineState {
    registry: TypeRegistry,
    cache: ModifierCache,
}

// -----------------------------------------------------------------------------
// Weft

/// Serializes reflected object graphs to the binary, XML or JSON format.
///
/// ```
/// use weft_graph::{Format, Weft};
///
/// let weft = Weft::new();
/// let bytes = weft.serialize(&vec![1_i32, 2, 3], Format::Binary).unwrap();
/// let back: Vec<i32> = weft.deserialize(&bytes, Format::Binary).unwrap();
/// assert_eq!(back, [1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct Weft {
    state: Arc<Mutex<EngineState>>,
    modifiers: Vec<Arc<ModifierSet>>,
    settings: Settings,
}

impl Default for Weft {
    fn default() -> Self {
        Self::new()
    }
}

impl Weft {
    /// An engine with the built-in modifiers and default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> WeftBuilder {
        WeftBuilder {
            registry: TypeRegistry::new(),
            modifiers: Vec::new(),
            settings: Settings::default(),
        }
    }

    /// Another engine over the same state, using `sets` ahead of the
    /// built-in set.
    pub fn with_modifiers(&self, sets: impl IntoIterator<Item = Arc<ModifierSet>>) -> Self {
        let mut modifiers: Vec<_> = sets.into_iter().collect();
        // The built-in set is always last.
        modifiers.extend(self.modifiers.last().cloned());
        Self {
            state: Arc::clone(&self.state),
            modifiers,
            settings: self.settings.clone(),
        }
    }

    /// Another engine over the same state with other settings.
    pub fn with_settings(&self, settings: Settings) -> Self {
        Self {
            state: Arc::clone(&self.state),
            modifiers: self.modifiers.clone(),
            settings,
        }
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Registers `T` and every type it holds.
    pub fn register<T: GetTypeMeta>(&self) {
        self.lock().registry.register::<T>();
    }

    /// Runs `f` on the registry, with the engine locked.
    pub fn with_registry<R>(&self, f: impl FnOnce(&mut TypeRegistry) -> R) -> R {
        f(&mut self.lock().registry)
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Serialize

    /// Serializes `value` into a new buffer.
    pub fn serialize(&self, value: &dyn Reflect, format: Format) -> Result<Vec<u8>, GraphError> {
        let mut state = self.lock();
        let EngineState { registry, cache } = &mut *state;

        value.reflect_register(registry);
        let modifiers = cache.combine(&self.modifiers);
        modifiers.register_substitutes(registry);
        let header = Header {
            modules: modifiers.identities().to_vec(),
        };

        let mut out = format.writer();
        let assembled = self.settings.streaming == StreamingMode::Assembled
            && self.settings.emit_type_descriptors
            && out.can_manage_multiplex_streams();
        log::debug!(
            "serializing `{}` as {format:?}{}",
            value.reflect_type_path(),
            if assembled { ", assembled" } else { "" },
        );

        if assembled {
            let mut channel = Recorder::new(format);
            let mut writer =
                GraphWriter::new(&mut channel, registry, modifiers, &self.settings).collect_records();
            writer.write_root(&header)?;
            writer.write_root(value)?;
            let records = writer.into_records();

            out.start_tree();
            GraphWriter::new(&mut *out, registry, modifiers, &self.settings)
                .write_type_table(records)?;
            channel.replay(&mut *out);
        } else {
            out.start_tree();
            let mut writer = GraphWriter::new(&mut *out, registry, modifiers, &self.settings);
            writer.write_root(&header)?;
            writer.write_root(value)?;
        }
        out.insert_data_end_mark();
        Ok(out.finish())
    }

    /// Serializes `value` into `sink`.
    pub fn serialize_into(
        &self,
        value: &dyn Reflect,
        format: Format,
        mut sink: impl io::Write,
    ) -> Result<(), GraphError> {
        let bytes = self.serialize(value, format)?;
        sink.write_all(&bytes)?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Deserialize

    /// Deserializes a value of type `T` from `bytes`.
    pub fn deserialize<T: Reflect + Typed + GetTypeMeta>(
        &self,
        bytes: &[u8],
        format: Format,
    ) -> Result<T, GraphError> {
        self.register::<T>();
        self.deserialize_as(bytes, format, T::type_info())?
            .take::<T>()
            .map_err(|value| {
                TypeIndexError::Mismatch {
                    expected: T::type_path(),
                    found: value.reflect_type_path(),
                }
                .into()
            })
    }

    /// Deserializes a value of the type described by `expected`.
    ///
    /// The type must already be registered.
    pub fn deserialize_as(
        &self,
        bytes: &[u8],
        format: Format,
        expected: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, GraphError> {
        let mut state = self.lock();
        let EngineState { registry, cache } = &mut *state;
        let modifiers = cache.combine(&self.modifiers);
        modifiers.register_substitutes(registry);
        log::debug!("deserializing `{}` from {format:?}", expected.type_path());

        let mut reader = GraphReader::new(format.reader(bytes)?, registry, modifiers, &self.settings);
        reader.start()?;
        let header = reader
            .read_root(Header::type_info())?
            .take::<Header>()
            .map_err(|value| TypeIndexError::Mismatch {
                expected: Header::type_path(),
                found: value.reflect_type_path(),
            })?;
        for module in &header.modules {
            load_module(module, reader.registry_mut());
        }
        let value = reader.read_root(expected)?;
        reader.finish()?;
        Ok(value)
    }

    /// Reads all of `source`, then deserializes a `T` from it.
    pub fn deserialize_from<T: Reflect + Typed + GetTypeMeta>(
        &self,
        mut source: impl io::Read,
        format: Format,
    ) -> Result<T, GraphError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        self.deserialize(&bytes, format)
    }
}

/// Registers the types of a module named in a stream header, if it is known.
fn load_module(module: &ModuleIdentifier, registry: &mut TypeRegistry) {
    let provider = ModifierProvider::find(&module.full_name)
        .or_else(|| ModifierProvider::find(&module.short_name));
    match provider {
        Some(provider) => provider.load(registry),
        None => log::warn!(
            "module `{}` listed in the stream header is not available; its types will not resolve",
            module.full_name,
        ),
    }
}

fn with_builtin(mut sets: Vec<Arc<ModifierSet>>) -> Vec<Arc<ModifierSet>> {
    sets.push(Arc::new(ModifierSet::builtin()));
    sets
}

// -----------------------------------------------------------------------------
// WeftBuilder

/// Builds a [`Weft`].
///
/// ```
/// use weft_graph::container::NullableContainer;
/// use weft_graph::modifiers::ModifierSet;
/// use weft_graph::record::ModuleIdentifier;
/// use weft_graph::{Settings, StreamingMode, Weft};
///
/// let options = ModifierSet::builder(ModuleIdentifier::new("app", "app@1", "app"))
///     .container(NullableContainer)
///     .build();
/// let weft = Weft::builder()
///     .modifiers(options)
///     .settings(Settings::default().streaming(StreamingMode::Assembled))
///     .build();
/// assert_eq!(weft.settings().streaming, StreamingMode::Assembled);
/// ```
pub struct WeftBuilder {
    registry: TypeRegistry,
    modifiers: Vec<Arc<ModifierSet>>,
    settings: Settings,
}

impl WeftBuilder {
    /// Adds a modifier set. Earlier sets win single-valued decisions, the
    /// built-in set always comes last.
    pub fn modifiers(mut self, set: ModifierSet) -> Self {
        self.modifiers.push(Arc::new(set));
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Starts from `registry` instead of a registry of the primitives.
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers every type annotated with `#[reflect(auto_register)]`.
    pub fn auto_register(mut self) -> Self {
        if !self.registry.auto_register() {
            log::debug!("static type registration is not available");
        }
        self
    }

    pub fn build(self) -> Weft {
        Weft {
            state: Arc::new(Mutex::new(EngineState {
                registry: self.registry,
                cache: ModifierCache::new(),
            })),
            modifiers: with_builtin(self.modifiers),
            settings: self.settings,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use core::fmt;
    use core::str::FromStr;
    use std::collections::HashMap;
    use std::sync::{Mutex, PoisonError};

    use chrono::{DateTime, Local, NaiveDate};
    use weft_reflect::derive::Reflect;
    use weft_reflect::info::{TypeInfo, Typed};
    use weft_reflect::registry::GetTypeMeta;
    use weft_reflect::{Dynamic, Shared};

    use super::Weft;
    use crate::format::Format;
    use crate::modifiers::{FilterSet, ModifierSet};
    use crate::record::ModuleIdentifier;
    use crate::settings::{Settings, StreamingMode};

    const FORMATS: [Format; 3] = [Format::Binary, Format::Xml, Format::Json];

    fn round_trip<T: weft_reflect::Reflect + Typed + GetTypeMeta>(
        weft: &Weft,
        value: &T,
        format: Format,
    ) -> T {
        let bytes = weft.serialize(value, format).unwrap();
        weft.deserialize::<T>(&bytes, format).unwrap()
    }

    // -------------------------------------------------------------------------
    // Log capture

    static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct Capture;

    impl log::Log for Capture {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record<'_>) {
            if self.enabled(record.metadata()) {
                WARNINGS
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn capture_warnings() {
        static CAPTURE: Capture = Capture;
        if log::set_logger(&CAPTURE).is_ok() {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    fn warned(needle: &str) -> bool {
        WARNINGS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|line| line.contains(needle))
    }

    // -------------------------------------------------------------------------
    // Types

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Leaf {
        name: String,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Owner {
        first: Shared<Leaf>,
        second: Shared<Leaf>,
    }

    #[derive(Reflect, Debug, PartialEq)]
    #[reflect(memberwise = false, constructor(new(x: i32)))]
    struct Point {
        _x: i32,
    }

    impl Point {
        fn new(x: i32) -> Self {
            Self { _x: x }
        }
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Ring {
        label: String,
        next: Option<Shared<Ring>>,
    }

    /// A volume above 100 prints but does not parse back.
    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default, convert)]
    struct Volume {
        level: u8,
    }

    impl fmt::Display for Volume {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.level)
        }
    }

    impl FromStr for Volume {
        type Err = String;

        fn from_str(text: &str) -> Result<Self, Self::Err> {
            match text.parse::<u8>() {
                Ok(level) if level <= 100 => Ok(Self { level }),
                _ => Err(format!("`{text}` is not a volume")),
            }
        }
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Chain {
        depth: u32,
        next: Option<Shared<Chain>>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Maybe {
        inner: Option<Option<u8>>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Pair {
        a: u8,
        b: u16,
    }

    struct DenyBytes;

    impl FilterSet for DenyBytes {
        fn name(&self) -> &'static str {
            "deny-bytes"
        }

        fn type_policy(&self, info: &'static TypeInfo) -> Option<bool> {
            info.type_is::<u8>().then_some(false)
        }
    }

    /// Stored in kelvin, written in celsius.
    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    #[reflect(property(name = "celsius", get = celsius, set = set_celsius))]
    struct Thermometer {
        #[reflect(never_serialize)]
        kelvin: i32,
    }

    impl Thermometer {
        fn celsius(&self) -> i32 {
            self.kelvin - 273
        }

        fn set_celsius(&mut self, celsius: i32) {
            self.kelvin = celsius + 273;
        }
    }

    #[derive(Reflect, Default)]
    #[reflect(default, memberwise = false, constructor(new(id: u32)))]
    struct Ticket {
        id: u32,
        #[reflect(never_serialize)]
        issued: bool,
    }

    impl Ticket {
        fn new(id: u32) -> Self {
            Self { id, issued: true }
        }
    }

    // -------------------------------------------------------------------------
    // Scenarios

    #[test]
    fn int_arrays_stay_arrays() {
        let weft = Weft::new();
        for format in FORMATS {
            assert_eq!(round_trip(&weft, &[1_i32, 2, 3], format), [1, 2, 3]);
            assert_eq!(round_trip(&weft, &vec![1_i32, 2, 3], format), [1, 2, 3]);
        }
    }

    #[test]
    fn two_fields_share_one_instance() {
        let weft = Weft::new();
        for format in FORMATS {
            let leaf = Shared::new(Leaf {
                name: "leaf".to_owned(),
            });
            let owner = Owner {
                first: leaf.clone(),
                second: leaf,
            };
            let back = round_trip(&weft, &owner, format);
            assert!(Shared::ptr_eq(&back.first, &back.second));
            assert_eq!(back.first.borrow().name, "leaf");
        }
    }

    #[test]
    fn dictionaries_keep_their_entries() {
        let weft = Weft::new();
        let map = HashMap::from([("a".to_owned(), 1_i32), ("b".to_owned(), 2)]);
        for format in FORMATS {
            assert_eq!(round_trip(&weft, &map, format), map);
        }
    }

    #[test]
    fn constructor_parameters_bind_to_underscored_fields() {
        let weft = Weft::new();
        for format in FORMATS {
            assert_eq!(round_trip(&weft, &Point::new(42), format), Point::new(42));
        }
    }

    #[test]
    fn null_root_reads_back_as_null() {
        let weft = Weft::new();
        for format in FORMATS {
            assert!(round_trip(&weft, &None::<Shared<Leaf>>, format).is_none());
        }
    }

    #[test]
    fn cycles_close_on_the_same_instance() {
        let weft = Weft::new();
        for format in FORMATS {
            let a = Shared::new(Ring {
                label: "a".to_owned(),
                next: None,
            });
            let b = Shared::new(Ring {
                label: "b".to_owned(),
                next: Some(a.clone()),
            });
            a.borrow_mut().next = Some(b.clone());

            let back_a = round_trip(&weft, &a, format);
            let back_b = back_a.borrow().next.clone().unwrap();
            let around = back_b.borrow().next.clone().unwrap();
            assert!(Shared::ptr_eq(&back_a, &around));
            assert_eq!(back_b.borrow().label, "b");

            a.borrow_mut().next = None;
            back_a.borrow_mut().next = None;
        }
    }

    #[test]
    fn deep_chains_round_trip() {
        const LENGTH: u32 = 48;
        let weft = Weft::new();
        let mut head = None;
        for depth in (0..LENGTH).rev() {
            head = Some(Shared::new(Chain { depth, next: head }));
        }
        let head = head.unwrap();

        for format in FORMATS {
            let mut node = Some(round_trip(&weft, &head, format));
            let mut seen = 0;
            while let Some(current) = node {
                assert_eq!(current.borrow().depth, seen, "{format:?}");
                seen += 1;
                node = current.borrow().next.clone();
            }
            assert_eq!(seen, LENGTH, "{format:?}");
        }
    }

    #[test]
    fn nested_options_keep_their_level() {
        let weft = Weft::new();
        for format in FORMATS {
            for inner in [Some(None), Some(Some(3)), Some(Some(0)), None] {
                let value = Maybe { inner };
                assert_eq!(round_trip(&weft, &value, format), value, "{format:?}");
            }
            let items: Vec<Option<Option<u8>>> = vec![Some(None), None, Some(Some(1))];
            assert_eq!(round_trip(&weft, &items, format), items, "{format:?}");
        }
    }

    #[test]
    fn properties_travel_in_place_of_their_fields() {
        let weft = Weft::new();
        for format in FORMATS {
            let value = Thermometer { kelvin: 300 };
            assert_eq!(round_trip(&weft, &value, format), value, "{format:?}");
        }
        let text = String::from_utf8(
            weft.serialize(&Thermometer { kelvin: 300 }, Format::Json)
                .unwrap(),
        )
        .unwrap();
        assert!(text.contains("celsius"), "{text}");
        assert!(!text.contains("kelvin"), "{text}");
    }

    // -------------------------------------------------------------------------
    // Primitives

    macro_rules! assert_round_trips {
        ($weft:expr, $($value:expr),+ $(,)?) => {
            for format in FORMATS {
                $(
                    let value = $value;
                    assert_eq!(round_trip(&$weft, &value, format), value, "{format:?}");
                )+
            }
        };
    }

    #[test]
    fn integer_boundaries_round_trip() {
        let weft = Weft::new();
        assert_round_trips!(
            weft,
            i8::MIN, i8::MAX, u8::MAX,
            i16::MIN, i16::MAX, u16::MAX,
            i32::MIN, i32::MAX, u32::MAX,
            i64::MIN, i64::MAX, u64::MAX,
            i128::MIN, i128::MAX, u128::MAX,
            isize::MIN, usize::MAX,
            0_u64, -1_i32,
        );
    }

    #[test]
    fn other_primitives_round_trip() {
        let weft = Weft::new();
        let naive = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_nano_opt(13, 5, 7, 123_456_789)
            .unwrap();
        let utc = naive.and_utc();
        assert_round_trips!(
            weft,
            true, false,
            'é', '\u{1F600}',
            String::new(), " spaced <&> ".to_owned(),
            naive, utc, DateTime::<Local>::from(utc),
        );
    }

    #[test]
    fn floats_keep_their_bits() {
        let weft = Weft::new();
        for format in FORMATS {
            for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.0, f64::MAX, f64::MIN_POSITIVE] {
                assert_eq!(round_trip(&weft, &value, format).to_bits(), value.to_bits());
            }
            for value in [f32::NAN, f32::NEG_INFINITY, -0.0, f32::MAX, f32::EPSILON] {
                assert_eq!(round_trip(&weft, &value, format).to_bits(), value.to_bits());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Types and modules

    #[test]
    fn a_type_is_described_once_per_stream() {
        let weft = Weft::new();
        let value = vec![
            Dynamic::new(Leaf { name: "x".to_owned() }),
            Dynamic::new(Leaf { name: "y".to_owned() }),
        ];
        let bytes = weft.serialize(&value, Format::Xml).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert_eq!(text.matches("tests::Leaf").count(), 1, "{text}");

        let back: Vec<Dynamic> = weft.deserialize(&bytes, Format::Xml).unwrap();
        let names: Vec<_> = back
            .into_iter()
            .map(|item| item.into_inner().take::<Leaf>().unwrap().name)
            .collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn assembled_streams_put_the_table_first() {
        let weft = Weft::new().with_settings(Settings::default().streaming(StreamingMode::Assembled));
        let leaf = Shared::new(Leaf {
            name: "t".to_owned(),
        });
        let owner = Owner {
            first: leaf.clone(),
            second: leaf,
        };

        let text = String::from_utf8(weft.serialize(&owner, Format::Xml).unwrap()).unwrap();
        assert_eq!(text.matches("<types").count(), 1, "{text}");
        assert!(text.find("<types") < text.find("<b"), "{text}");

        for format in FORMATS {
            let back = round_trip(&weft, &owner, format);
            assert!(Shared::ptr_eq(&back.first, &back.second));
        }
    }

    #[test]
    fn unknown_types_fail_to_resolve() {
        let bytes = Weft::new()
            .serialize(&Dynamic::new(Leaf::default()), Format::Binary)
            .unwrap();
        let err = Weft::new()
            .deserialize::<Dynamic>(&bytes, Format::Binary)
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.code(), 502);
    }

    #[test]
    fn missing_header_modules_only_warn() {
        capture_warnings();
        let ghost = ModifierSet::builder(ModuleIdentifier::new("ghost", "ghost@0.1", "nowhere")).build();
        let weft = Weft::builder().modifiers(ghost).build();
        assert_eq!(round_trip(&weft, &5_u8, Format::Json), 5);
        assert!(warned("module `ghost@0.1`"));
    }

    #[test]
    fn modifier_sets_can_change_per_call() {
        let weft = Weft::new();
        let named = weft.with_modifiers([Arc::new(
            ModifierSet::builder(ModuleIdentifier::new("named", "named@1", "here")).build(),
        )]);
        let bytes = named.serialize(&7_u16, Format::Xml).unwrap();
        assert!(String::from_utf8(bytes.clone()).unwrap().contains("named@1"));
        assert_eq!(weft.deserialize::<u16>(&bytes, Format::Xml).unwrap(), 7);
    }

    #[test]
    fn sets_sharing_an_identity_keep_their_own_filters() {
        let weft = Weft::new();
        let app = || ModuleIdentifier::new("app", "app@1", "here");
        let plain = weft.with_modifiers([Arc::new(ModifierSet::builder(app()).build())]);
        let filtered = weft.with_modifiers([Arc::new(
            ModifierSet::builder(app()).filter(DenyBytes).build(),
        )]);

        let pair = Pair { a: 7, b: 9 };
        for format in FORMATS {
            assert_eq!(round_trip(&plain, &pair, format), pair);
            assert_eq!(round_trip(&filtered, &pair, format), Pair { a: 0, b: 9 });
            assert_eq!(round_trip(&plain, &pair, format), pair);
        }
    }

    #[test]
    fn forced_types_are_built_by_their_constructor() {
        let plain = Weft::new();
        let back = round_trip(&plain, &Ticket::new(4), Format::Binary);
        assert_eq!(back.id, 4);
        assert!(!back.issued);

        let forced = Weft::builder()
            .modifiers(
                ModifierSet::builder(ModuleIdentifier::new("tickets", "tickets@1", "here"))
                    .force_parametric::<Ticket>()
                    .build(),
            )
            .build();
        for format in FORMATS {
            let back = round_trip(&forced, &Ticket::new(4), format);
            assert_eq!(back.id, 4);
            assert!(back.issued, "{format:?}");
        }
    }

    #[test]
    fn streams_go_through_io() {
        let weft = Weft::new();
        let mut sink = Vec::new();
        weft.serialize_into(&vec![3_i64, 4], Format::Binary, &mut sink)
            .unwrap();
        let back: Vec<i64> = weft.deserialize_from(&sink[..], Format::Binary).unwrap();
        assert_eq!(back, [3, 4]);
    }

    // -------------------------------------------------------------------------
    // Containers

    #[test]
    fn converted_values_travel_as_text() {
        let weft = Weft::new();
        let bytes = weft.serialize(&Volume { level: 30 }, Format::Xml).unwrap();
        assert!(String::from_utf8(bytes.clone()).unwrap().contains("ConvertedText"));
        let back: Volume = weft.deserialize(&bytes, Format::Xml).unwrap();
        assert_eq!(back, Volume { level: 30 });
    }

    #[test]
    fn failing_container_falls_back_to_members() {
        capture_warnings();
        let weft = Weft::new();
        for format in FORMATS {
            assert_eq!(
                round_trip(&weft, &Volume { level: 200 }, format),
                Volume { level: 200 }
            );
        }
        assert!(warned("Volume`, writing its members instead"));
    }
}
