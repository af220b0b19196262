use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Bind;
use crate::class::{Class, Type};

// -----------------------------------------------------------------------------
// DynamicVariant

/// One concrete type that can stand behind a trait object.
#[derive(Clone, Debug)]
pub struct DynamicVariant {
    class: fn() -> &'static Class,
    cast: fn(Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>>,
}

impl DynamicVariant {
    #[inline]
    pub const fn new(
        class: fn() -> &'static Class,
        cast: fn(Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>>,
    ) -> Self {
        Self { class, cast }
    }

    #[inline]
    pub fn class(&self) -> &'static Class {
        (self.class)()
    }

    /// Boxes a value of this variant as the trait object.
    #[inline]
    pub fn cast(&self, value: Box<dyn Bind>) -> Result<Box<dyn Bind>, Box<dyn Bind>> {
        (self.cast)(value)
    }
}

// -----------------------------------------------------------------------------
// DynamicInfo

/// A `Box<dyn Trait>` with a closed list of concrete variants.
///
/// The variant in use is written as the `class` attribute. When a
/// document carries no `class`, the default variant is instantiated;
/// without one, reading fails.
#[derive(Clone, Debug)]
pub struct DynamicInfo {
    ty: Type,
    get: fn(&dyn Bind) -> Option<&dyn Bind>,
    variants: Vec<DynamicVariant>,
    default: Option<usize>,
}

impl DynamicInfo {
    #[inline]
    pub fn new(
        ty: Type,
        get: fn(&dyn Bind) -> Option<&dyn Bind>,
        variants: Vec<DynamicVariant>,
        default: Option<usize>,
    ) -> Self {
        Self {
            ty,
            get,
            variants,
            default,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// The concrete value behind the trait object.
    #[inline]
    pub fn get<'a>(&self, object: &'a dyn Bind) -> Option<&'a dyn Bind> {
        (self.get)(object)
    }

    #[inline]
    pub fn variants(&self) -> &[DynamicVariant] {
        &self.variants
    }

    /// The variant instantiated when no type override is present.
    #[inline]
    pub fn default_variant(&self) -> Option<&DynamicVariant> {
        self.default.and_then(|index| self.variants.get(index))
    }

    /// Finds the variant for a concrete class.
    pub fn variant_of(&self, class: &Class) -> Option<&DynamicVariant> {
        self.variants
            .iter()
            .find(|variant| variant.class().ty() == class.ty())
    }

    /// Finds the variant whose path is `path`.
    pub fn variant_named(&self, path: &str) -> Option<&DynamicVariant> {
        self.variants
            .iter()
            .find(|variant| variant.class().ty().path() == path)
    }
}

// -----------------------------------------------------------------------------
// impl_dynamic

/// Implements [`Typed`](crate::class::Typed) for `Box<dyn Trait>`.
///
/// The trait must have [`Bind`] as a supertrait. Every listed variant must
/// implement the trait and `Typed`; the optional `default` variant is
/// created when a document gives no `class` attribute.
///
/// # Examples
///
/// ```
/// use vc_bind::{Bind, Xml, impl_dynamic};
/// use vc_bind::class::Typed;
///
/// trait Shape: Bind {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Xml, Default)]
/// struct Square {
///     #[xml(attribute)]
///     side: f64,
/// }
///
/// impl Shape for Square {
///     fn area(&self) -> f64 {
///         self.side * self.side
///     }
/// }
///
/// impl_dynamic!(dyn Shape { Square } default Square);
///
/// let info = <Box<dyn Shape> as Typed>::class().as_dynamic().unwrap();
/// assert_eq!(info.variants().len(), 1);
/// assert!(info.default_variant().is_some());
/// ```
#[macro_export]
macro_rules! impl_dynamic {
    (dyn $trait:ident { $($variant:ty),+ $(,)? } $(default $default:ty)?) => {
        impl $crate::class::Typed for ::std::boxed::Box<dyn $trait> {
            fn class() -> &'static $crate::class::Class {
                static CELL: $crate::class::NonGenericClassCell =
                    $crate::class::NonGenericClassCell::new();
                CELL.get_or_init(|| {
                    let variants = ::std::vec![$(
                        $crate::class::DynamicVariant::new(
                            <$variant as $crate::class::Typed>::class,
                            |value| {
                                let value: $variant = value.take::<$variant>()?;
                                let object: ::std::boxed::Box<dyn $trait> =
                                    ::std::boxed::Box::new(value);
                                ::core::result::Result::Ok(::std::boxed::Box::new(object))
                            },
                        )
                    ),+];
                    let default: ::core::option::Option<usize> = ::core::option::Option::None
                        $(.or_else(|| {
                            let path = <$default as $crate::class::Typed>::class().ty().path();
                            variants.iter().position(|v| v.class().ty().path() == path)
                        }))?;
                    $crate::class::Class::Dynamic($crate::class::DynamicInfo::new(
                        $crate::class::Type::of::<Self>(
                            ::core::concat!(::core::module_path!(), "::", ::core::stringify!($trait)),
                            ::core::stringify!($trait),
                        ),
                        |object| {
                            object
                                .downcast_ref::<::std::boxed::Box<dyn $trait>>()
                                .map(|inner| &**inner as &dyn $crate::Bind)
                        },
                        variants,
                        default,
                    ))
                })
            }
        }
    };
}
