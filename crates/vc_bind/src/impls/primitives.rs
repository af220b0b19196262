use alloc::string::String;

/// Implements [`Typed`](crate::class::Typed) as a primitive for types
/// that are [`FromStr`](core::str::FromStr) and [`Display`](core::fmt::Display).
///
/// Primitive types are written as attribute values or element text.
///
/// # Examples
///
/// ```
/// use core::fmt;
/// use core::str::FromStr;
///
/// use vc_bind::class::Typed;
/// use vc_bind::impl_primitive;
///
/// #[derive(Debug, PartialEq)]
/// struct Rgb(u8, u8, u8);
///
/// impl FromStr for Rgb {
///     type Err = String;
///     fn from_str(s: &str) -> Result<Self, String> {
///         let parts: Vec<u8> = s.split(',').filter_map(|p| p.parse().ok()).collect();
///         match parts[..] {
///             [r, g, b] => Ok(Rgb(r, g, b)),
///             _ => Err(format!("bad color '{s}'")),
///         }
///     }
/// }
///
/// impl fmt::Display for Rgb {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{},{},{}", self.0, self.1, self.2)
///     }
/// }
///
/// impl_primitive!(Rgb);
///
/// let info = Rgb::class().as_primitive().unwrap();
/// let value = info.read("1,2,3").unwrap();
/// assert_eq!(value.downcast_ref::<Rgb>(), Some(&Rgb(1, 2, 3)));
/// ```
#[macro_export]
macro_rules! impl_primitive {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::class::Typed for $ty {
                fn class() -> &'static $crate::class::Class {
                    static CELL: $crate::class::NonGenericClassCell =
                        $crate::class::NonGenericClassCell::new();
                    CELL.get_or_init(|| {
                        $crate::class::Class::Primitive($crate::class::PrimitiveInfo::parsed::<Self>(
                            $crate::class::Type::of::<Self>(
                                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($ty)),
                                ::core::stringify!($ty),
                            ),
                        ))
                    })
                }
            }
        )+
    };
}

macro_rules! impl_std_primitive {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl crate::class::Typed for $ty {
                fn class() -> &'static crate::class::Class {
                    static CELL: crate::class::NonGenericClassCell =
                        crate::class::NonGenericClassCell::new();
                    CELL.get_or_init(|| {
                        crate::class::Class::Primitive(crate::class::PrimitiveInfo::parsed::<Self>(
                            crate::class::Type::of::<Self>(
                                ::core::stringify!($ty),
                                ::core::stringify!($ty),
                            ),
                        ))
                    })
                }
            }
        )+
    };
}

impl_std_primitive!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

#[cfg(test)]
mod tests {
    use crate::class::Typed;

    #[test]
    fn primitive_text() {
        let info = bool::class().as_primitive().unwrap();
        assert_eq!(info.read("true").unwrap().take::<bool>().unwrap(), true);
        assert!(info.read("yes").is_err());

        let info = f64::class().as_primitive().unwrap();
        let value = info.read("1.5").unwrap();
        assert_eq!(info.write(&*value).as_deref(), Some("1.5"));
        assert_eq!(info.write(&1_u8), None);
    }

    #[test]
    fn primitive_names() {
        assert_eq!(String::class().ty().path(), "String");
        assert_eq!(String::class().root_name(), "string");
        assert_eq!(u8::class().root_name(), "u8");
    }
}
