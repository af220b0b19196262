use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;

use crate::Bind;
use crate::class::{Class, GenericClassCell, OptionalInfo, SharedInfo, Type, Typed};

impl<T: Typed> Typed for Option<T> {
    fn class() -> &'static Class {
        static CELL: GenericClassCell = GenericClassCell::new();
        CELL.get_or_insert::<Self>(|| {
            Class::Optional(OptionalInfo::new(
                Type::named::<Self>("Option"),
                T::class,
                |option| {
                    option
                        .downcast_ref::<Option<T>>()?
                        .as_ref()
                        .map(|value| value as &dyn Bind)
                },
                |value| Ok(Box::new(Some(value.take::<T>()?))),
                || Box::new(None::<T>),
            ))
        })
    }
}

macro_rules! impl_shared {
    ($ty:ident, $name:literal) => {
        impl<T: Typed> Typed for $ty<T> {
            fn class() -> &'static Class {
                static CELL: GenericClassCell = GenericClassCell::new();
                CELL.get_or_insert::<Self>(|| {
                    Class::Shared(SharedInfo::new(
                        Type::named::<Self>($name),
                        T::class,
                        |pointer| {
                            let pointer = pointer.downcast_ref::<$ty<T>>()?;
                            Some(&**pointer as &dyn Bind)
                        },
                        |value| Ok(Box::new($ty::new(value.take::<T>()?))),
                        |pointer| {
                            let pointer = pointer.downcast_ref::<$ty<T>>()?;
                            Some(Box::new($ty::clone(pointer)))
                        },
                        |pointer| {
                            let pointer = pointer.downcast_ref::<$ty<T>>()?;
                            Some($ty::as_ptr(pointer) as *const () as usize)
                        },
                    ))
                })
            }
        }
    };
}

impl_shared!(Rc, "Rc");
impl_shared!(Arc, "Arc");

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use crate::Bind;
    use crate::class::{Class, Typed};

    #[test]
    fn shared_identity() {
        let info = <Rc<String> as Typed>::class().as_shared().unwrap();
        let first: Box<dyn Bind> = Box::new(Rc::new(String::from("x")));
        let second = info.share(&*first).unwrap();
        assert_eq!(info.address(&*first), info.address(&*second));

        let other: Box<dyn Bind> = Box::new(Rc::new(String::from("x")));
        assert_ne!(info.address(&*first), info.address(&*other));
    }

    #[test]
    fn actual_looks_through_wrappers() {
        let value: Option<Rc<u8>> = Some(Rc::new(3));
        let actual = Class::actual(&value).unwrap();
        assert_eq!(actual.downcast_ref::<u8>(), Some(&3));
        assert!(Class::actual(&None::<u8>).is_none());
    }
}
