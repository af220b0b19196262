use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::Result;
use crate::convert::Converter;
use crate::descriptor::LabelKind;
use crate::label::Label;
use crate::scan::Contact;
use crate::style::Style;
use crate::transform::Transformer;

/// A [`Label`] with every derived value computed once, converter included.
///
/// Schemas keep these for the lifetime of the cache, so reads and writes
/// never rebuild names or converters.
#[derive(Debug)]
pub struct CacheLabel {
    contact: Contact,
    kind: LabelKind,
    key: String,
    name: String,
    raw_name: &'static str,
    entry: Option<String>,
    required: bool,
    inline: bool,
    data: bool,
    attribute: bool,
    collection: bool,
    empty: Option<&'static str>,
    revision: Option<f64>,
    converter: Box<dyn Converter>,
}

impl CacheLabel {
    pub fn new(label: &dyn Label, style: &dyn Style, transformer: &Transformer) -> Result<Self> {
        let contact = label.contact().clone();
        Ok(Self {
            key: contact.key(),
            kind: label.kind(),
            name: String::from(label.name()),
            raw_name: label.raw_name(),
            entry: label.entry().map(String::from),
            required: label.is_required(),
            inline: label.is_inline(),
            data: label.is_data(),
            attribute: label.is_attribute(),
            collection: label.is_collection(),
            empty: label.empty(),
            revision: label.revision(),
            converter: label.converter(style, transformer)?,
            contact,
        })
    }

    #[inline]
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    #[inline]
    pub fn kind(&self) -> LabelKind {
        self.kind
    }

    /// The key of the member, unique within the schema.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn raw_name(&self) -> &'static str {
        self.raw_name
    }

    #[inline]
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    #[inline]
    pub fn is_data(&self) -> bool {
        self.data
    }

    #[inline]
    pub fn is_attribute(&self) -> bool {
        self.attribute
    }

    #[inline]
    pub fn is_collection(&self) -> bool {
        self.collection
    }

    #[inline]
    pub fn empty(&self) -> Option<&'static str> {
        self.empty
    }

    #[inline]
    pub fn revision(&self) -> Option<f64> {
        self.revision
    }

    /// The document revision from which the member is expected.
    #[inline]
    pub fn since(&self) -> Option<f64> {
        self.contact.since()
    }

    #[inline]
    pub fn converter(&self) -> &dyn Converter {
        &*self.converter
    }
}

impl fmt::Display for CacheLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} of {}", self.kind, self.contact)
        } else {
            write!(f, "{} '{}' of {}", self.kind, self.name, self.contact)
        }
    }
}
