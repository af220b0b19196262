use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::class::Class;
use crate::descriptor::LabelKind;
use crate::{Bind, Result};

/// Calls a constructor with one argument per parameter, `None` for
/// parameters with no value in the document.
pub type InvokeFn = fn(Vec<Option<Box<dyn Bind>>>) -> Result<Box<dyn Bind>>;

// -----------------------------------------------------------------------------
// ParameterDescriptor

/// A constructor parameter, bound to the label of the same kind and name.
#[derive(Debug, Clone, Copy)]
pub struct ParameterDescriptor {
    kind: LabelKind,
    name: &'static str,
    class: fn() -> &'static Class,
}

impl ParameterDescriptor {
    #[inline]
    pub const fn new(kind: LabelKind, name: &'static str, class: fn() -> &'static Class) -> Self {
        Self { kind, name, class }
    }

    #[inline]
    pub const fn kind(&self) -> LabelKind {
        self.kind
    }

    /// The label name the parameter matches, before styling.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn class(&self) -> &'static Class {
        (self.class)()
    }
}

// -----------------------------------------------------------------------------
// ConstructorDescriptor

/// A function able to create an instance of a composite type.
///
/// `#[xml(constructor(Self::new, attribute("id"), element("name")))]`
/// declares one; types without any declaration get one calling
/// [`Default::default`].
#[derive(Debug, Clone)]
pub struct ConstructorDescriptor {
    name: &'static str,
    parameters: Vec<ParameterDescriptor>,
    invoke: InvokeFn,
}

impl ConstructorDescriptor {
    #[inline]
    pub fn new(name: &'static str, parameters: Vec<ParameterDescriptor>, invoke: InvokeFn) -> Self {
        Self {
            name,
            parameters,
            invoke,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Whether the constructor takes no parameters.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.parameters.is_empty()
    }

    #[inline]
    pub fn invoke(&self, arguments: Vec<Option<Box<dyn Bind>>>) -> Result<Box<dyn Bind>> {
        (self.invoke)(arguments)
    }
}
