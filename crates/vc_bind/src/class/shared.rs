use alloc::boxed::Box;

use crate::Bind;
use crate::class::{Class, Type};

// -----------------------------------------------------------------------------
// SharedInfo

/// A reference counted pointer, `Rc<T>` or `Arc<T>`.
///
/// Shared values have an identity, [`address`](SharedInfo::address),
/// which cycle strategies use to write one element per object and
/// `reference` attributes for repeats.
#[derive(Clone, Debug)]
pub struct SharedInfo {
    ty: Type,
    inner: fn() -> &'static Class,
    get: fn(&dyn Bind) -> Option<&dyn Bind>,
    wrap: fn(Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>>,
    share: fn(&dyn Bind) -> Option<Box<dyn Bind>>,
    address: fn(&dyn Bind) -> Option<usize>,
}

impl SharedInfo {
    #[inline]
    pub const fn new(
        ty: Type,
        inner: fn() -> &'static Class,
        get: fn(&dyn Bind) -> Option<&dyn Bind>,
        wrap: fn(Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>>,
        share: fn(&dyn Bind) -> Option<Box<dyn Bind>>,
        address: fn(&dyn Bind) -> Option<usize>,
    ) -> Self {
        Self {
            ty,
            inner,
            get,
            wrap,
            share,
            address,
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

    /// The pointee.
    #[inline]
    pub fn get<'a>(&self, pointer: &'a dyn Bind) -> Option<&'a dyn Bind> {
        (self.get)(pointer)
    }

    /// Moves a value of the inner class behind a new pointer.
    #[inline]
    pub fn wrap(&self, value: Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>> {
        (self.wrap)(value)
    }

    /// Clones the pointer, not the pointee.
    #[inline]
    pub fn share(&self, pointer: &dyn Bind) -> Option<Box<dyn Bind>> {
        (self.share)(pointer)
    }

    #[inline]
    pub fn address(&self, pointer: &dyn Bind) -> Option<usize> {
        (self.address)(pointer)
    }
}
