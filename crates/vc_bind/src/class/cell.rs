//! Containers for static storage of [`Class`] values.
//!
//! - [`NonGenericClassCell`] wraps a [`OnceLock`], for concrete types.
//! - [`GenericClassCell`] keys leaked classes by [`TypeId`], because a
//!   `static` inside a generic function is shared by every instantiation.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::class::Class;
use crate::utils::TypeIdMap;

// -----------------------------------------------------------------------------
// NonGenericClassCell

/// Lazily initialized [`Class`] of a non generic type.
///
/// # Examples
///
/// ```
/// use vc_bind::class::{Class, NonGenericClassCell, PrimitiveInfo, Type, Typed};
///
/// struct Celsius(f32);
///
/// impl core::str::FromStr for Celsius {
///     type Err = core::num::ParseFloatError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Celsius)
///     }
/// }
///
/// impl core::fmt::Display for Celsius {
///     fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
///         self.0.fmt(f)
///     }
/// }
///
/// impl Typed for Celsius {
///     fn class() -> &'static Class {
///         static CELL: NonGenericClassCell = NonGenericClassCell::new();
///         CELL.get_or_init(|| {
///             Class::Primitive(PrimitiveInfo::parsed::<Self>(Type::of::<Self>("Celsius", "Celsius")))
///         })
///     }
/// }
///
/// assert!(Celsius::class().is_primitive());
/// ```
pub struct NonGenericClassCell(OnceLock<Class>);

impl NonGenericClassCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &Class
    where
        F: FnOnce() -> Class,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericClassCell

/// Lazily initialized [`Class`] per instantiation of a generic type.
///
/// # Examples
///
/// ```
/// use vc_bind::class::{Class, GenericClassCell, Typed};
///
/// struct Wrapper<T>(Vec<T>);
///
/// impl<T: Typed> Typed for Wrapper<T> {
///     fn class() -> &'static Class {
///         static CELL: GenericClassCell = GenericClassCell::new();
///         CELL.get_or_insert::<Self>(|| <Vec<T> as Typed>::class().clone())
///     }
/// }
///
/// assert!(Wrapper::<u8>::class().is_list());
/// ```
pub struct GenericClassCell(RwLock<TypeIdMap<&'static Class>>);

impl GenericClassCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> Class) -> &'static Class {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> Class) -> &'static Class {
        if let Some(class) = self.0.read().get(&type_id).copied() {
            return class;
        }
        // Built outside the lock; the class of a nested type may need the same cell.
        let class = f();
        *self
            .0
            .write()
            .get_or_insert(type_id, || Box::leak(Box::new(class)))
    }
}
