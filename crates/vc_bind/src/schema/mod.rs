//! The per type binding schema.
//!
//! A [`Schema`] gathers the labels of a composite, keyed by the names
//! they are matched with, together with the constructor selection, the
//! lifecycle callbacks and the type level settings. The [`Scanner`]
//! builds and validates it once per type; the [`SchemaCache`] keeps it.

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod caller;
mod label_map;
mod scanner;

// -----------------------------------------------------------------------------
// Exports

pub use cache::SchemaCache;
pub use caller::Caller;
pub use label_map::LabelMap;
pub use scanner::Scanner;

// -----------------------------------------------------------------------------
// Schema

use alloc::string::String;

use crate::class::Class;
use crate::instance::Creator;
use crate::label::{CacheLabel, Decorator};

/// Everything needed to read and write one composite type.
#[derive(Debug)]
pub struct Schema {
    class: &'static Class,
    name: String,
    attributes: LabelMap,
    elements: LabelMap,
    text: Option<CacheLabel>,
    version: Option<CacheLabel>,
    revision: f64,
    creator: Creator,
    caller: Caller,
    decorator: Decorator,
    strict: bool,
    primitive: bool,
}

impl Schema {
    #[inline]
    pub fn class(&self) -> &'static Class {
        self.class
    }

    /// The styled element name of the type when it is a document root.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn attributes(&self) -> &LabelMap {
        &self.attributes
    }

    #[inline]
    pub fn elements(&self) -> &LabelMap {
        &self.elements
    }

    #[inline]
    pub fn text(&self) -> Option<&CacheLabel> {
        self.text.as_ref()
    }

    #[inline]
    pub fn version(&self) -> Option<&CacheLabel> {
        self.version.as_ref()
    }

    /// The revision the type is written with, `1.0` without a version label.
    #[inline]
    pub fn revision(&self) -> f64 {
        self.revision
    }

    #[inline]
    pub fn creator(&self) -> &Creator {
        &self.creator
    }

    #[inline]
    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    /// The namespace of the type and the prefixes it declares.
    #[inline]
    pub fn decorator(&self) -> &Decorator {
        &self.decorator
    }

    /// Whether unmatched nodes are errors, unless a read relaxes it.
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether the type binds nothing and has no root directive.
    #[inline]
    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    /// Every label: the version, attributes, elements, then the text.
    pub fn labels(&self) -> impl Iterator<Item = &CacheLabel> {
        self.version
            .iter()
            .chain(self.attributes.iter())
            .chain(self.elements.iter())
            .chain(self.text.as_ref())
    }
}
