use core::fmt;

// -----------------------------------------------------------------------------
// LabelKind

/// The XML shape a member binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Attribute,
    Element,
    ElementList,
    ElementArray,
    ElementMap,
    Text,
    Version,
}

impl LabelKind {
    /// Whether labels of this kind live in the attribute map of a schema.
    #[inline]
    pub const fn is_attribute(&self) -> bool {
        matches!(self, Self::Attribute | Self::Version)
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute => f.pad("attribute"),
            Self::Element => f.pad("element"),
            Self::ElementList => f.pad("element list"),
            Self::ElementArray => f.pad("element array"),
            Self::ElementMap => f.pad("element map"),
            Self::Text => f.pad("text"),
            Self::Version => f.pad("version"),
        }
    }
}

// -----------------------------------------------------------------------------
// Per-kind annotations

macro_rules! impl_with {
    ($($field:ident : $ty:ty => $with:ident),+ $(,)?) => {
        $(
            #[inline]
            pub const fn $with(mut self, $field: $ty) -> Self {
                self.$field = $field;
                self
            }
        )+
    };
}

/// `#[xml(attribute(name, required, empty))]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeAnnotation {
    pub name: &'static str,
    pub required: bool,
    pub empty: Option<&'static str>,
}

impl AttributeAnnotation {
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: "",
            required: true,
            empty: None,
        }
    }

    impl_with!(name: &'static str => with_name, required: bool => with_required);

    #[inline]
    pub const fn with_empty(mut self, empty: &'static str) -> Self {
        self.empty = Some(empty);
        self
    }
}

/// `#[xml(element(name, required, data, empty))]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementAnnotation {
    pub name: &'static str,
    pub required: bool,
    pub data: bool,
    pub empty: Option<&'static str>,
}

impl ElementAnnotation {
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: "",
            required: true,
            data: false,
            empty: None,
        }
    }

    impl_with!(
        name: &'static str => with_name,
        required: bool => with_required,
        data: bool => with_data,
    );

    #[inline]
    pub const fn with_empty(mut self, empty: &'static str) -> Self {
        self.empty = Some(empty);
        self
    }
}

/// `#[xml(element_list(name, entry, inline, required, data, empty))]`
///
/// `empty = false` omits the container when the list has no items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementListAnnotation {
    pub name: &'static str,
    pub entry: &'static str,
    pub inline: bool,
    pub required: bool,
    pub data: bool,
    pub empty: bool,
}

impl ElementListAnnotation {
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: "",
            entry: "",
            inline: false,
            required: true,
            data: false,
            empty: true,
        }
    }

    impl_with!(
        name: &'static str => with_name,
        entry: &'static str => with_entry,
        inline: bool => with_inline,
        required: bool => with_required,
        data: bool => with_data,
        empty: bool => with_empty,
    );
}

/// `#[xml(element_array(name, entry, required, data, empty))]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementArrayAnnotation {
    pub name: &'static str,
    pub entry: &'static str,
    pub required: bool,
    pub data: bool,
    pub empty: bool,
}

impl ElementArrayAnnotation {
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: "",
            entry: "",
            required: true,
            data: false,
            empty: true,
        }
    }

    impl_with!(
        name: &'static str => with_name,
        entry: &'static str => with_entry,
        required: bool => with_required,
        data: bool => with_data,
        empty: bool => with_empty,
    );
}

/// `#[xml(element_map(name, entry, key, value, attribute, inline, required, data, empty))]`
///
/// With `attribute` the key is written as an attribute of the entry, and
/// a primitive value becomes the entry's text unless `value` names it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMapAnnotation {
    pub name: &'static str,
    pub entry: &'static str,
    pub key: &'static str,
    pub value: &'static str,
    pub attribute: bool,
    pub inline: bool,
    pub required: bool,
    pub data: bool,
    pub empty: bool,
}

impl ElementMapAnnotation {
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: "",
            entry: "",
            key: "",
            value: "",
            attribute: false,
            inline: false,
            required: true,
            data: false,
            empty: true,
        }
    }

    impl_with!(
        name: &'static str => with_name,
        entry: &'static str => with_entry,
        key: &'static str => with_key,
        value: &'static str => with_value,
        attribute: bool => with_attribute,
        inline: bool => with_inline,
        required: bool => with_required,
        data: bool => with_data,
        empty: bool => with_empty,
    );
}

/// `#[xml(text(required, data, empty))]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAnnotation {
    pub required: bool,
    pub data: bool,
    pub empty: Option<&'static str>,
}

impl TextAnnotation {
    #[inline]
    pub const fn new() -> Self {
        Self {
            required: true,
            data: false,
            empty: None,
        }
    }

    impl_with!(required: bool => with_required, data: bool => with_data);

    #[inline]
    pub const fn with_empty(mut self, empty: &'static str) -> Self {
        self.empty = Some(empty);
        self
    }
}

/// `#[xml(version(name, revision, required))]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VersionAnnotation {
    pub name: &'static str,
    pub revision: f64,
    pub required: bool,
}

impl VersionAnnotation {
    /// The revision assumed for documents without a version attribute.
    pub const DEFAULT_REVISION: f64 = 1.0;

    #[inline]
    pub const fn new() -> Self {
        Self {
            name: "",
            revision: Self::DEFAULT_REVISION,
            required: false,
        }
    }

    impl_with!(
        name: &'static str => with_name,
        revision: f64 => with_revision,
        required: bool => with_required,
    );
}

// -----------------------------------------------------------------------------
// Annotation

/// The schema directive attached to one member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Annotation {
    Attribute(AttributeAnnotation),
    Element(ElementAnnotation),
    ElementList(ElementListAnnotation),
    ElementArray(ElementArrayAnnotation),
    ElementMap(ElementMapAnnotation),
    Text(TextAnnotation),
    Version(VersionAnnotation),
}

impl Annotation {
    pub const fn kind(&self) -> LabelKind {
        match self {
            Self::Attribute(_) => LabelKind::Attribute,
            Self::Element(_) => LabelKind::Element,
            Self::ElementList(_) => LabelKind::ElementList,
            Self::ElementArray(_) => LabelKind::ElementArray,
            Self::ElementMap(_) => LabelKind::ElementMap,
            Self::Text(_) => LabelKind::Text,
            Self::Version(_) => LabelKind::Version,
        }
    }

    /// The explicit name, empty when the name is derived.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Attribute(a) => a.name,
            Self::Element(a) => a.name,
            Self::ElementList(a) => a.name,
            Self::ElementArray(a) => a.name,
            Self::ElementMap(a) => a.name,
            Self::Text(_) => "",
            Self::Version(a) => a.name,
        }
    }

    pub const fn required(&self) -> bool {
        match self {
            Self::Attribute(a) => a.required,
            Self::Element(a) => a.required,
            Self::ElementList(a) => a.required,
            Self::ElementArray(a) => a.required,
            Self::ElementMap(a) => a.required,
            Self::Text(a) => a.required,
            Self::Version(a) => a.required,
        }
    }

    /// The same directive with `required` relaxed, used for members
    /// picked up by a `default` access rule.
    pub const fn relaxed(self) -> Self {
        match self {
            Self::Attribute(a) => Self::Attribute(a.with_required(false)),
            Self::Element(a) => Self::Element(a.with_required(false)),
            Self::ElementList(a) => Self::ElementList(a.with_required(false)),
            Self::ElementArray(a) => Self::ElementArray(a.with_required(false)),
            Self::ElementMap(a) => Self::ElementMap(a.with_required(false)),
            Self::Text(a) => Self::Text(a.with_required(false)),
            Self::Version(a) => Self::Version(a.with_required(false)),
        }
    }
}
