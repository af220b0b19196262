//! Type overrides and object identity carried in attributes.
//!
//! A [`Strategy`] sees every element that holds a composite or a
//! collection before the converters do. On read it may consume
//! attributes and report a [`Value`]; on write it may add attributes and
//! claim the element, in which case the body is not written.

mod cycle;
mod tree;

pub use cycle::CycleStrategy;
pub use tree::TreeStrategy;

use alloc::boxed::Box;

use vc_node::NodeMap;

use crate::class::Class;
use crate::session::Session;
use crate::{Bind, Result};

// -----------------------------------------------------------------------------
// Value

/// What a strategy learned from the attributes of an element.
pub trait Value {
    /// The concrete class named by the element, if it overrides the declared one.
    fn class(&self) -> Option<&'static Class>;

    /// The item count of an array element.
    fn length(&self) -> Option<usize> {
        None
    }

    /// Whether the element refers to an object read earlier.
    fn is_reference(&self) -> bool {
        false
    }

    /// Takes the referenced object, shared with its first occurrence.
    fn reference(&mut self) -> Option<Box<dyn Bind>> {
        None
    }

    /// Called with the finished object, `None` when only validating.
    fn set_value(&mut self, value: Option<&dyn Bind>, session: &mut Session) -> Result<()> {
        let _ = (value, session);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Strategy

/// Reads and writes the bookkeeping attributes of elements.
pub trait Strategy: Send + Sync {
    /// Consumes the attributes the strategy owns from `node`.
    fn read(
        &self,
        declared: &'static Class,
        node: &mut dyn NodeMap,
        session: &mut Session,
    ) -> Result<Option<Box<dyn Value>>>;

    /// Adds attributes describing `value`, declared as `declared`.
    ///
    /// Returns `true` when the element is complete and its body must
    /// not be written.
    fn write(
        &self,
        declared: &'static Class,
        value: &dyn Bind,
        node: &mut dyn NodeMap,
        session: &mut Session,
    ) -> Result<bool>;
}

/// Strips options and shared pointers from a declared class.
pub(crate) fn declared_target(declared: &'static Class) -> &'static Class {
    let mut class = declared;
    loop {
        class = match class {
            Class::Optional(info) => info.inner(),
            Class::Shared(info) => info.inner(),
            _ => return class,
        };
    }
}
