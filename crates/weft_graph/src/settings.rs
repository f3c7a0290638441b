use weft_reflect::info::{TypeHandle, Typed};

// -----------------------------------------------------------------------------
// StreamingMode

/// Where type descriptor records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamingMode {
    /// Each record is written inline, right before its type is first used.
    #[default]
    Interleaved,
    /// The instance channel is buffered and every record is written up
    /// front in one table. Falls back to [`Interleaved`](Self::Interleaved)
    /// for formats that cannot place the table ahead of the data.
    Assembled,
}

// -----------------------------------------------------------------------------
// Settings

/// Per-engine options.
///
/// ```
/// use weft_graph::{Settings, StreamingMode};
///
/// let settings = Settings::default()
///     .streaming(StreamingMode::Assembled)
///     .predeclare::<Vec<u8>>();
/// assert!(settings.emit_type_descriptors);
/// assert_eq!(settings.predeclared.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    pub streaming: StreamingMode,
    /// When off, both sides must predeclare the same types in the same order.
    pub emit_type_descriptors: bool,
    /// Turns structural oddities while reading into errors instead of warnings.
    pub checked: bool,
    /// Types numbered from the first free index before anything is written.
    pub predeclared: Vec<TypeHandle>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            streaming: StreamingMode::Interleaved,
            emit_type_descriptors: true,
            checked: cfg!(debug_assertions),
            predeclared: Vec::new(),
        }
    }
}

impl Settings {
    #[inline]
    pub fn streaming(mut self, mode: StreamingMode) -> Self {
        self.streaming = mode;
        self
    }

    #[inline]
    pub fn emit_type_descriptors(mut self, emit: bool) -> Self {
        self.emit_type_descriptors = emit;
        self
    }

    #[inline]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn predeclare<T: Typed>(mut self) -> Self {
        self.predeclared.push(TypeHandle::of::<T>());
        self
    }
}
