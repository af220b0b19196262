use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Bind;
use crate::class::{Class, Type};

// -----------------------------------------------------------------------------
// ListInfo

/// A growable sequence: `Vec`, `VecDeque`, `BTreeSet` or `HashSet`.
///
/// # Examples
///
/// ```
/// use vc_bind::class::Typed;
///
/// let info = <Vec<i32> as Typed>::class().as_list().unwrap();
/// let mut list = info.create();
/// info.push(&mut *list, Box::new(3_i32)).unwrap();
///
/// assert_eq!(info.len(&*list), 1);
/// assert!(info.item().ty().is::<i32>());
/// ```
#[derive(Clone, Debug)]
pub struct ListInfo {
    ty: Type,
    // Created on first visit; items may refer back to the enclosing type.
    item: fn() -> &'static Class,
    create: fn() -> Box<dyn Bind>,
    push: fn(&mut dyn Bind, Box<dyn Bind>) -> Result<(), Box<dyn Bind>>,
    items: fn(&dyn Bind) -> Vec<&dyn Bind>,
}

impl ListInfo {
    #[inline]
    pub const fn new(
        ty: Type,
        item: fn() -> &'static Class,
        create: fn() -> Box<dyn Bind>,
        push: fn(&mut dyn Bind, Box<dyn Bind>) -> Result<(), Box<dyn Bind>>,
        items: fn(&dyn Bind) -> Vec<&dyn Bind>,
    ) -> Self {
        Self {
            ty,
            item,
            create,
            push,
            items,
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

    /// Creates an empty list.
    #[inline]
    pub fn create(&self) -> Box<dyn Bind> {
        (self.create)()
    }

    /// Appends an item, returning it back if the list or item type differs.
    #[inline]
    pub fn push(&self, list: &mut dyn Bind, item: Box<dyn Bind>) -> Result<(), Box<dyn Bind>> {
        (self.push)(list, item)
    }

    /// The items in iteration order.
    #[inline]
    pub fn items<'a>(&self, list: &'a dyn Bind) -> Vec<&'a dyn Bind> {
        (self.items)(list)
    }

    #[inline]
    pub fn len(&self, list: &dyn Bind) -> usize {
        (self.items)(list).len()
    }
}
