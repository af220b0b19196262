//! Static descriptions of bindable types.
//!
//! Every [`Typed`] type has one [`Class`]: a closed set of kinds, each
//! carrying the function pointers the converters need to create,
//! inspect and fill values without knowing their concrete type.

// -----------------------------------------------------------------------------
// Modules

mod array;
mod bind;
mod cell;
mod composite;
mod dynamic;
mod list;
mod map;
mod optional;
mod primitive;
mod shared;
mod ty;

// -----------------------------------------------------------------------------
// Exports

pub use array::ArrayInfo;
pub use bind::{Bind, Typed};
pub use cell::{GenericClassCell, NonGenericClassCell};
pub use composite::CompositeInfo;
pub use dynamic::{DynamicInfo, DynamicVariant};
pub use list::ListInfo;
pub use map::{InsertFn, MapInfo};
pub use optional::OptionalInfo;
pub use primitive::{PrimitiveInfo, ReadFn, WriteFn};
pub use shared::SharedInfo;
pub use ty::Type;

// -----------------------------------------------------------------------------
// ClassKind

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

/// The kind of a [`Class`], a fast discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Primitive,
    Composite,
    List,
    Array,
    Map,
    Optional,
    Shared,
    Dynamic,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Composite => f.pad("Composite"),
            Self::List => f.pad("List"),
            Self::Array => f.pad("Array"),
            Self::Map => f.pad("Map"),
            Self::Optional => f.pad("Optional"),
            Self::Shared => f.pad("Shared"),
            Self::Dynamic => f.pad("Dynamic"),
        }
    }
}

// -----------------------------------------------------------------------------
// Class

/// The binding description of a type.
///
/// Obtained through [`Typed::class`] for a static type or
/// [`Bind::dyn_class`] for a boxed value.
///
/// # Examples
///
/// ```
/// use vc_bind::class::{ClassKind, Typed};
///
/// assert_eq!(<Vec<String> as Typed>::class().kind(), ClassKind::List);
/// assert_eq!(<Option<u8> as Typed>::class().strip_optional().kind(), ClassKind::Primitive);
/// ```
#[derive(Debug, Clone)]
pub enum Class {
    Primitive(PrimitiveInfo),
    Composite(CompositeInfo),
    List(ListInfo),
    Array(ArrayInfo),
    Map(MapInfo),
    Optional(OptionalInfo),
    Shared(SharedInfo),
    Dynamic(DynamicInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Returns the kind specific information, if this class is of that kind.
        #[inline]
        pub const fn $name(&self) -> Option<&$info> {
            match self {
                Self::$kind(info) => Some(info),
                _ => None,
            }
        }
    };
}

macro_rules! impl_is_method {
    ($name:ident : $kind:ident) => {
        #[inline]
        pub const fn $name(&self) -> bool {
            matches!(self, Self::$kind(..))
        }
    };
}

impl Class {
    impl_cast_method!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_method!(as_composite: Composite => CompositeInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_optional: Optional => OptionalInfo);
    impl_cast_method!(as_shared: Shared => SharedInfo);
    impl_cast_method!(as_dynamic: Dynamic => DynamicInfo);

    impl_is_method!(is_primitive: Primitive);
    impl_is_method!(is_composite: Composite);
    impl_is_method!(is_list: List);
    impl_is_method!(is_array: Array);
    impl_is_method!(is_map: Map);
    impl_is_method!(is_optional: Optional);
    impl_is_method!(is_shared: Shared);
    impl_is_method!(is_dynamic: Dynamic);

    pub const fn ty(&self) -> &Type {
        match self {
            Self::Primitive(info) => info.ty(),
            Self::Composite(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Shared(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
        }
    }

    pub const fn kind(&self) -> ClassKind {
        match self {
            Self::Primitive(_) => ClassKind::Primitive,
            Self::Composite(_) => ClassKind::Composite,
            Self::List(_) => ClassKind::List,
            Self::Array(_) => ClassKind::Array,
            Self::Map(_) => ClassKind::Map,
            Self::Optional(_) => ClassKind::Optional,
            Self::Shared(_) => ClassKind::Shared,
            Self::Dynamic(_) => ClassKind::Dynamic,
        }
    }

    /// Whether values are a list, array or map.
    #[inline]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Array(_) | Self::Map(_))
    }

    /// `Option<T>` becomes `T`, repeatedly.
    pub fn strip_optional(&'static self) -> &'static Class {
        let mut class = self;
        while let Self::Optional(info) = class {
            class = info.inner();
        }
        class
    }

    /// The class used to name collection entries: arrays name their
    /// entries after the component type, wrappers after the pointee.
    pub fn entry_class(&'static self) -> &'static Class {
        match self {
            Self::Array(info) => info.item().entry_class(),
            Self::Optional(info) => info.inner().entry_class(),
            Self::Shared(info) => info.inner().entry_class(),
            _ => self,
        }
    }

    /// The unstyled element name of the type: the declared root name of a
    /// composite, otherwise the decapitalized simple name.
    pub fn root_name(&'static self) -> String {
        let class = self.entry_class();
        if let Some(name) = class.as_composite().and_then(CompositeInfo::root_name) {
            return String::from(name);
        }
        class.ty().decapitalize()
    }

    /// Whether a value of class `actual` may be stored where `self` is declared.
    ///
    /// ```
    /// use vc_bind::class::Typed;
    ///
    /// let declared = <Option<String> as Typed>::class();
    /// assert!(declared.is_assignable_from(String::class()));
    /// assert!(!declared.is_assignable_from(i32::class()));
    /// ```
    pub fn is_assignable_from(&self, actual: &Class) -> bool {
        if self.ty() == actual.ty() {
            return true;
        }
        match self {
            Self::Optional(info) => info.inner().is_assignable_from(actual),
            Self::Shared(info) => info.inner().is_assignable_from(actual),
            Self::Dynamic(info) => info.variant_of(actual).is_some(),
            _ => false,
        }
    }

    /// Finds the class named `path` among the types assignable to `self`.
    pub fn resolve(&'static self, path: &str) -> Option<&'static Class> {
        if self.ty().path() == path {
            return Some(self);
        }
        match self {
            Self::Optional(info) => info.inner().resolve(path),
            Self::Shared(info) => info.inner().resolve(path),
            Self::Dynamic(info) => info.variant_named(path).map(DynamicVariant::class),
            _ => None,
        }
    }

    /// Converts a value of an assignable class into a value of `self`,
    /// wrapping it in `Some`, a shared pointer or a trait object.
    ///
    /// ```
    /// use vc_bind::Bind;
    /// use vc_bind::class::Typed;
    ///
    /// let value: Box<dyn Bind> = Box::new(5_u8);
    /// let value = <Option<u8> as Typed>::class().coerce(value).unwrap();
    /// assert_eq!(value.take::<Option<u8>>().unwrap(), Some(5));
    /// ```
    pub fn coerce(&'static self, value: Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>> {
        if self.ty() == value.dyn_class().ty() {
            return Ok(value);
        }
        match self {
            Self::Optional(info) => info.some(info.inner().coerce(value)?),
            Self::Shared(info) => info.wrap(info.inner().coerce(value)?),
            Self::Dynamic(info) => match info.variant_of(value.dyn_class()) {
                Some(variant) => variant.cast(value),
                None => Err(value),
            },
            _ => Err(value),
        }
    }

    /// The value used for an absent member: `None` for options.
    pub fn null_value(&self) -> Option<Box<dyn Bind>> {
        self.as_optional().map(OptionalInfo::none)
    }

    /// Looks through `Option`, shared pointers and trait objects to the
    /// concrete value, `None` for an empty option.
    pub fn actual(value: &dyn Bind) -> Option<&dyn Bind> {
        let mut current = value;
        loop {
            current = match current.dyn_class() {
                Self::Optional(info) => info.get(current)?,
                Self::Shared(info) => info.get(current)?,
                Self::Dynamic(info) => info.get(current)?,
                _ => return Some(current),
            };
        }
    }

    /// Unwraps an option, leaving other values as they are.
    pub fn present(value: &dyn Bind) -> Option<&dyn Bind> {
        match value.dyn_class() {
            Self::Optional(info) => info.get(value),
            _ => Some(value),
        }
    }

    /// Number of items of a list, array or map value.
    pub fn length(&self, value: &dyn Bind) -> Option<usize> {
        match self {
            Self::List(info) => Some(info.len(value)),
            Self::Array(info) => Some(info.len(value)),
            Self::Map(info) => Some(info.len(value)),
            _ => None,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty())
    }
}
