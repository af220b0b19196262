//! Deciding what to create for an element, and creating it.
//!
//! A factory asks the [`Strategy`](crate::strategy::Strategy) about the
//! element and yields an [`Instance`]: the concrete class to build, or
//! a reference to an object read earlier. Composites are then built by
//! the [`Creator`] from the values collected in a [`Criteria`].

mod builder;
mod creator;
mod criteria;
mod factory;

pub use builder::{Builder, Parameter};
pub use creator::Creator;
pub use criteria::{Criteria, Variable};
pub use factory::{ArrayFactory, CollectionFactory, MapFactory, ObjectFactory, PrimitiveFactory};

use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;

use crate::class::Class;
use crate::session::Session;
use crate::strategy::Value;
use crate::{Bind, Error, Result};

// -----------------------------------------------------------------------------
// Instance

/// A class known to be built for `declared`, not created yet.
#[derive(Debug, Clone, Copy)]
pub struct ClassInstance {
    declared: &'static Class,
    class: &'static Class,
}

/// An instance described by a strategy [`Value`], possibly a reference.
pub struct ObjectInstance {
    declared: &'static Class,
    class: &'static Class,
    value: Box<dyn Value>,
}

/// The outcome of resolving an element against a declared class.
pub enum Instance {
    Class(ClassInstance),
    Object(ObjectInstance),
}

impl Instance {
    pub(crate) fn of_class(declared: &'static Class, class: &'static Class) -> Self {
        Self::Class(ClassInstance { declared, class })
    }

    pub(crate) fn of_value(declared: &'static Class, class: &'static Class, value: Box<dyn Value>) -> Self {
        Self::Object(ObjectInstance {
            declared,
            class,
            value,
        })
    }

    /// The concrete class to build.
    pub fn class(&self) -> &'static Class {
        match self {
            Self::Class(instance) => instance.class,
            Self::Object(instance) => instance.class,
        }
    }

    pub fn declared(&self) -> &'static Class {
        match self {
            Self::Class(instance) => instance.declared,
            Self::Object(instance) => instance.declared,
        }
    }

    /// Whether the element refers to an object instead of describing one.
    pub fn is_reference(&self) -> bool {
        match self {
            Self::Class(_) => false,
            Self::Object(instance) => instance.value.is_reference(),
        }
    }

    /// The array length announced by the element.
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Class(_) => None,
            Self::Object(instance) => instance.value.length(),
        }
    }

    /// Takes the referenced object, as a value of the declared class.
    pub fn reference(&mut self) -> Result<Option<Box<dyn Bind>>> {
        let Self::Object(instance) = self else {
            return Ok(None);
        };
        match instance.value.reference() {
            Some(value) => coerce(instance.declared, value).map(Some),
            None => Ok(None),
        }
    }

    /// Creates an empty collection, or a composite through its
    /// parameterless constructor.
    pub fn get_instance(&self) -> Result<Box<dyn Bind>> {
        let class = self.class();
        match class {
            Class::List(info) => Ok(info.create()),
            Class::Map(info) => Ok(info.create()),
            Class::Composite(info) => match info.descriptor().constructors().iter().find(|c| c.is_default()) {
                Some(constructor) => constructor.invoke(Vec::new()),
                None => Err(Error::Instantiation(format!("No default constructor for {class}"))),
            },
            _ => Err(Error::Instantiation(format!("Unable to instantiate {class}"))),
        }
    }

    /// Converts a finished object to the declared class and reports it
    /// to the strategy.
    pub fn set_instance(&mut self, value: Box<dyn Bind>, session: &mut Session) -> Result<Box<dyn Bind>> {
        let value = coerce(self.declared(), value)?;
        if let Self::Object(instance) = self {
            instance.value.set_value(Some(&*value), session)?;
        }
        Ok(value)
    }

    /// Reports a validated element to the strategy.
    pub fn set_validated(&mut self, session: &mut Session) -> Result<()> {
        match self {
            Self::Class(_) => Ok(()),
            Self::Object(instance) => instance.value.set_value(None, session),
        }
    }
}

pub(crate) fn coerce(declared: &'static Class, value: Box<dyn Bind>) -> Result<Box<dyn Bind>> {
    declared.coerce(value).map_err(|value| {
        Error::Instantiation(format!("Incompatible {} for {declared}", value.dyn_class()))
    })
}
