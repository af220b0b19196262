use alloc::string::String;

// -----------------------------------------------------------------------------
// Mode

/// How the text value of an output node is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Write the value inside a `<![CDATA[...]]>` section.
    Data,
    /// Escape markup characters in the value.
    Escape,
    /// Use the mode of the parent node, or [`Format::mode`] at the root.
    #[default]
    Inherit,
}

// -----------------------------------------------------------------------------
// Format

/// Controls the layout of written documents.
///
/// # Examples
///
/// ```
/// use vc_node::{Format, Mode};
///
/// let format = Format::new()
///     .with_indent(2)
///     .with_prolog("<?xml version=\"1.0\"?>");
///
/// assert_eq!(format.indent(), 2);
/// assert_eq!(format.mode(), Mode::Escape);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    indent: usize,
    prolog: Option<String>,
    mode: Mode,
}

impl Format {
    /// Three space indentation, no prolog, escaped text.
    #[inline]
    pub const fn new() -> Self {
        Self {
            indent: 3,
            prolog: None,
            mode: Mode::Escape,
        }
    }

    /// Sets the number of spaces per nesting level. Zero writes a single line.
    #[inline]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets a prolog written verbatim before the root element.
    #[inline]
    pub fn with_prolog(mut self, prolog: impl Into<String>) -> Self {
        self.prolog = Some(prolog.into());
        self
    }

    /// Sets the document wide text mode. [`Mode::Inherit`] is treated as [`Mode::Escape`].
    #[inline]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = match mode {
            Mode::Inherit => Mode::Escape,
            mode => mode,
        };
        self
    }

    #[inline]
    pub const fn indent(&self) -> usize {
        self.indent
    }

    #[inline]
    pub fn prolog(&self) -> Option<&str> {
        self.prolog.as_deref()
    }

    #[inline]
    pub const fn mode(&self) -> Mode {
        self.mode
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::new()
    }
}
