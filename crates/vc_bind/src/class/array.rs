use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Bind;
use crate::class::{Class, Type};

// -----------------------------------------------------------------------------
// ArrayInfo

/// A sequence with a length fixed at construction: `Box<[T]>` or `[T; N]`.
///
/// Arrays are written with a `length` attribute so that sparse content,
/// arrays of `Option<T>` with gaps, keeps its shape.
#[derive(Clone, Debug)]
pub struct ArrayInfo {
    ty: Type,
    item: fn() -> &'static Class,
    fixed: Option<usize>,
    items: fn(&dyn Bind) -> Vec<&dyn Bind>,
    collect: fn(Vec<Box<dyn Bind>>) -> Option<Box<dyn Bind>>,
}

impl ArrayInfo {
    #[inline]
    pub const fn new(
        ty: Type,
        item: fn() -> &'static Class,
        fixed: Option<usize>,
        items: fn(&dyn Bind) -> Vec<&dyn Bind>,
        collect: fn(Vec<Box<dyn Bind>>) -> Option<Box<dyn Bind>>,
    ) -> Self {
        Self {
            ty,
            item,
            fixed,
            items,
            collect,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn item(&self) -> &'static Class {
        (self.item)()
    }

    /// The compile time length of `[T; N]` arrays.
    #[inline]
    pub const fn fixed(&self) -> Option<usize> {
        self.fixed
    }

    #[inline]
    pub fn items<'a>(&self, array: &'a dyn Bind) -> Vec<&'a dyn Bind> {
        (self.items)(array)
    }

    #[inline]
    pub fn len(&self, array: &dyn Bind) -> usize {
        (self.items)(array).len()
    }

    /// Builds an array from items of the item class.
    ///
    /// Returns `None` when an item has another type or a fixed length
    /// array receives the wrong number of items.
    #[inline]
    pub fn collect(&self, items: Vec<Box<dyn Bind>>) -> Option<Box<dyn Bind>> {
        (self.collect)(items)
    }
}
