use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt::Display;
use core::str::FromStr;

use crate::class::{Type, Typed};
use crate::{Bind, BoxError};

/// Parses text into a boxed value.
pub type ReadFn = fn(&str) -> Result<Box<dyn Bind>, BoxError>;

/// Formats a value as text, `None` if the value has another type.
pub type WriteFn = fn(&dyn Bind) -> Option<String>;

// -----------------------------------------------------------------------------
// PrimitiveInfo

/// A type stored as text: an attribute value or the text of an element.
///
/// # Examples
///
/// ```
/// use vc_bind::class::Typed;
///
/// let info = <u16 as Typed>::class().as_primitive().unwrap();
/// let value = info.read("42").unwrap();
/// assert_eq!(value.downcast_ref::<u16>(), Some(&42));
/// assert_eq!(info.write(&*value).as_deref(), Some("42"));
/// assert!(info.read("x").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct PrimitiveInfo {
    ty: Type,
    read: ReadFn,
    write: WriteFn,
}

impl PrimitiveInfo {
    #[inline]
    pub const fn new(ty: Type, read: ReadFn, write: WriteFn) -> Self {
        Self { ty, read, write }
    }

    /// A primitive read with [`FromStr`] and written with [`Display`].
    pub fn parsed<T>(ty: Type) -> Self
    where
        T: Typed + FromStr + Display,
        T::Err: Display,
    {
        Self {
            ty,
            read: |text| match text.parse::<T>() {
                Ok(value) => Ok(Box::new(value)),
                Err(e) => Err(e.to_string().into()),
            },
            write: |value| value.downcast_ref::<T>().map(ToString::to_string),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn read(&self, text: &str) -> Result<Box<dyn Bind>, BoxError> {
        (self.read)(text)
    }

    #[inline]
    pub fn write(&self, value: &dyn Bind) -> Option<String> {
        (self.write)(value)
    }
}
