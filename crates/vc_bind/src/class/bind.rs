use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::class::Class;

// -----------------------------------------------------------------------------
// Typed

/// A type with a static [`Class`] describing how it binds to XML.
///
/// Usually implemented by `#[derive(Xml)]`, [`impl_primitive!`] or
/// [`impl_dynamic!`]. The crate implements it for primitives, strings,
/// standard collections, `Option`, `Rc` and `Arc`.
///
/// [`impl_primitive!`]: crate::impl_primitive
/// [`impl_dynamic!`]: crate::impl_dynamic
pub trait Typed: Any {
    fn class() -> &'static Class;
}

// -----------------------------------------------------------------------------
// Bind

/// The object safe view of a [`Typed`] value.
///
/// Every `Typed` type implements `Bind`; the engine moves values around
/// as `Box<dyn Bind>` and inspects them through their [`Class`].
///
/// The explicit `'static` bound makes `&dyn Bind` default to
/// `&(dyn Bind + 'static)`, which downcasting requires.
pub trait Bind: Any + 'static {
    /// Returns the [`Class`] of the underlying concrete type.
    fn dyn_class(&self) -> &'static Class;
}

impl<T: Typed> Bind for T {
    #[inline]
    fn dyn_class(&self) -> &'static Class {
        T::class()
    }
}

impl dyn Bind {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        <dyn Any>::is::<T>(self)
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// ```
    /// use vc_bind::Bind;
    ///
    /// let value: Box<dyn Bind> = Box::new(10_i32);
    /// assert_eq!(value.downcast_ref::<i32>(), Some(&10));
    /// assert!(value.downcast_ref::<u32>().is_none());
    /// ```
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, unboxing it.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    ///
    /// ```
    /// use vc_bind::Bind;
    ///
    /// let value: Box<dyn Bind> = Box::new(String::from("x"));
    /// let value = value.take::<i32>().unwrap_err();
    /// assert_eq!(value.take::<String>().unwrap(), "x");
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Bind>) -> Result<T, Box<dyn Bind>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { *<Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }
}

impl fmt::Debug for dyn Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Bind({})", self.dyn_class().ty().path())
    }
}
