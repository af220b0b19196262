//! Reading and writing values against the node tree.
//!
//! Every label owns one [`Converter`], chosen from the label kind and the
//! member class. Composite values recurse through [`Traverser`] and the
//! schema of their concrete class.

mod array;
mod composite;
mod list;
mod map;
mod primitive;
mod traverser;

pub use array::{CompositeArray, PrimitiveArray};
pub use composite::Composite;
pub use list::{CompositeInlineList, CompositeList, PrimitiveInlineList, PrimitiveList};
pub use map::{CompositeInlineMap, CompositeKey, CompositeMap, CompositeValue, Entry};
pub use map::{PrimitiveKey, PrimitiveValue};
pub use primitive::Primitive;
pub use traverser::Traverser;

use alloc::boxed::Box;
use alloc::format;
use core::fmt;

use vc_node::{InputNode, OutputNode};

use crate::class::Class;
use crate::context::Context;
use crate::{Bind, Error, Result};

// -----------------------------------------------------------------------------
// Converter

/// Reads and writes the value of one label.
///
/// `read` receives the node matched for the label: an attribute, an
/// element, or for text and inline collections the element itself and
/// its first entry. `write` receives the element of the owning object
/// and creates whatever nodes the value needs.
pub trait Converter: fmt::Debug + Send + Sync {
    /// Returns `None` when the node holds no value.
    fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>>;

    /// Checks the node like `read` without keeping a value.
    fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
        self.read(context, node).map(drop)
    }

    /// `value` is never an empty option.
    fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()>;

    /// Writes the placeholder of an absent value, returning `false`
    /// when the label has none.
    fn write_empty(&self, context: &mut Context<'_>, parent: &OutputNode) -> Result<bool> {
        let _ = (context, parent);
        Ok(false)
    }

    /// The default value used when the node is absent.
    fn empty(&self, context: &mut Context<'_>) -> Result<Option<Box<dyn Bind>>> {
        let _ = context;
        Ok(None)
    }

    /// Inline collections can be read in several batches into one value.
    fn as_repeater(&self) -> Option<&dyn Repeater> {
        None
    }
}

/// A converter that appends to a value read earlier.
pub trait Repeater {
    fn repeat(
        &self,
        context: &mut Context<'_>,
        node: &InputNode,
        value: Box<dyn Bind>,
    ) -> Result<Option<Box<dyn Bind>>>;
}

/// Converts a collection entry to the item class of its container.
pub(crate) fn coerce_entry(item: &'static Class, value: Box<dyn Bind>) -> Result<Box<dyn Bind>> {
    item.coerce(value)
        .map_err(|value| Error::Persistence(format!("Entry {} does not match {item}", value.dyn_class())))
}

/// Reads an entry that may be left empty: an empty element is the null
/// value when the item class has one.
pub(crate) fn read_entry(
    context: &mut Context<'_>,
    converter: &dyn Converter,
    item: &'static Class,
    node: &InputNode,
) -> Result<Option<Box<dyn Bind>>> {
    if node.is_empty()
        && let Some(null) = item.null_value()
    {
        return Ok(Some(null));
    }
    converter.read(context, node)
}
