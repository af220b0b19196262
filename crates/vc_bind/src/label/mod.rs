//! Schema descriptors binding one member to one XML shape.
//!
//! A [`Label`] is built per bound [`Contact`] by the [`LabelFactory`],
//! which picks the variant from the member's [`LabelKind`] and checks it
//! against the member class. Each label resolves its styled names and
//! manufactures the [`Converter`] doing the actual reading and writing.
//! Schemas hold labels as [`CacheLabel`] snapshots.

// -----------------------------------------------------------------------------
// Modules

mod array;
mod attribute;
mod cache;
mod decorator;
mod element;
mod factory;
mod list;
mod map;
mod text;
mod version;

// -----------------------------------------------------------------------------
// Exports

pub use array::ElementArrayLabel;
pub use attribute::AttributeLabel;
pub use cache::CacheLabel;
pub use decorator::Decorator;
pub use element::ElementLabel;
pub use factory::LabelFactory;
pub use list::ElementListLabel;
pub use map::ElementMapLabel;
pub use text::TextLabel;
pub use version::VersionLabel;

// -----------------------------------------------------------------------------
// Label

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::Result;
use crate::class::Class;
use crate::convert::Converter;
use crate::descriptor::LabelKind;
use crate::scan::Contact;
use crate::style::Style;
use crate::transform::Transformer;

/// The binding of one member.
pub trait Label: fmt::Debug + Send + Sync {
    fn contact(&self) -> &Contact;

    fn kind(&self) -> LabelKind;

    /// The styled name the label is matched by. Inline collections are
    /// matched by their entry name, text by the empty name.
    fn name(&self) -> &str;

    /// The explicit name, or the member name. Constructor parameters are
    /// matched against it.
    fn raw_name(&self) -> &'static str;

    /// The styled entry name of a collection.
    fn entry(&self) -> Option<&str> {
        None
    }

    fn is_required(&self) -> bool;

    /// Whether the value is written without an element of its own.
    fn is_inline(&self) -> bool {
        false
    }

    /// Whether text is written as CDATA.
    fn is_data(&self) -> bool {
        false
    }

    fn is_attribute(&self) -> bool {
        self.kind().is_attribute()
    }

    fn is_collection(&self) -> bool {
        false
    }

    /// The text standing in for an absent value.
    fn empty(&self) -> Option<&'static str> {
        None
    }

    /// The revision a version label writes.
    fn revision(&self) -> Option<f64> {
        None
    }

    fn converter(&self, style: &dyn Style, transformer: &Transformer) -> Result<Box<dyn Converter>>;
}

/// `name` unless empty, else the member name.
fn explicit_or(name: &'static str, contact: &Contact) -> &'static str {
    if name.is_empty() { contact.name() } else { name }
}

/// The styled entry name of a collection: explicit, or the root name of
/// the item type.
fn entry_name(style: &dyn Style, entry: &'static str, item: &'static Class) -> String {
    if entry.is_empty() {
        style.element(&item.root_name())
    } else {
        style.element(entry)
    }
}
