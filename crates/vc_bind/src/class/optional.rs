use alloc::boxed::Box;

use crate::Bind;
use crate::class::{Class, Type};

// -----------------------------------------------------------------------------
// OptionalInfo

/// `Option<T>`, the only class with a null value.
#[derive(Clone, Debug)]
pub struct OptionalInfo {
    ty: Type,
    inner: fn() -> &'static Class,
    get: fn(&dyn Bind) -> Option<&dyn Bind>,
    some: fn(Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>>,
    none: fn() -> Box<dyn Bind>,
}

impl OptionalInfo {
    #[inline]
    pub const fn new(
        ty: Type,
        inner: fn() -> &'static Class,
        get: fn(&dyn Bind) -> Option<&dyn Bind>,
        some: fn(Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>>,
        none: fn() -> Box<dyn Bind>,
    ) -> Self {
        Self {
            ty,
            inner,
            get,
            some,
            none,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn inner(&self) -> &'static Class {
        (self.inner)()
    }

    /// The contained value of a `Some`.
    #[inline]
    pub fn get<'a>(&self, option: &'a dyn Bind) -> Option<&'a dyn Bind> {
        (self.get)(option)
    }

    /// Wraps a value of the inner class in `Some`.
    #[inline]
    pub fn some(&self, value: Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>> {
        (self.some)(value)
    }

    #[inline]
    pub fn none(&self) -> Box<dyn Bind> {
        (self.none)()
    }
}
