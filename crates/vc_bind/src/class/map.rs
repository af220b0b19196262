use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Bind;
use crate::class::{Class, Type};

/// Inserts a key and value, returning both back on a type mismatch.
pub type InsertFn =
    fn(&mut dyn Bind, Box<dyn Bind>, Box<dyn Bind>) -> Result<(), (Box<dyn Bind>, Box<dyn Bind>)>;

// -----------------------------------------------------------------------------
// MapInfo

/// A keyed collection: `BTreeMap`, `HashMap` or `IndexMap`.
#[derive(Clone, Debug)]
pub struct MapInfo {
    ty: Type,
    key: fn() -> &'static Class,
    value: fn() -> &'static Class,
    create: fn() -> Box<dyn Bind>,
    insert: InsertFn,
    entries: fn(&dyn Bind) -> Vec<(&dyn Bind, &dyn Bind)>,
}

impl MapInfo {
    #[inline]
    pub const fn new(
        ty: Type,
        key: fn() -> &'static Class,
        value: fn() -> &'static Class,
        create: fn() -> Box<dyn Bind>,
        insert: InsertFn,
        entries: fn(&dyn Bind) -> Vec<(&dyn Bind, &dyn Bind)>,
    ) -> Self {
        Self {
            ty,
            key,
            value,
            create,
            insert,
            entries,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn key(&self) -> &'static Class {
        (self.key)()
    }

    #[inline]
    pub fn value(&self) -> &'static Class {
        (self.value)()
    }

    #[inline]
    pub fn create(&self) -> Box<dyn Bind> {
        (self.create)()
    }

    #[inline]
    pub fn insert(
        &self,
        map: &mut dyn Bind,
        key: Box<dyn Bind>,
        value: Box<dyn Bind>,
    ) -> Result<(), (Box<dyn Bind>, Box<dyn Bind>)> {
        (self.insert)(map, key, value)
    }

    /// The entries in iteration order.
    #[inline]
    pub fn entries<'a>(&self, map: &'a dyn Bind) -> Vec<(&'a dyn Bind, &'a dyn Bind)> {
        (self.entries)(map)
    }

    #[inline]
    pub fn len(&self, map: &dyn Bind) -> usize {
        (self.entries)(map).len()
    }
}
