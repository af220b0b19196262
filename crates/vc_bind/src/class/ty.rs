use alloc::string::String;
use core::any::TypeId;
use core::fmt;

// -----------------------------------------------------------------------------
// Type

/// Identity and names of a bindable type.
///
/// - `path` is the fully qualified name written in `class` attributes.
/// - `name` is the simple identifier used to derive element names.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
}

impl Type {
    /// Creates a [`Type`] for `T` with explicit names.
    ///
    /// # Examples
    ///
    /// ```
    /// # use core::any::TypeId;
    /// use vc_bind::class::Type;
    ///
    /// let ty = Type::of::<u32>("u32", "u32");
    /// assert_eq!(ty.id(), TypeId::of::<u32>());
    /// ```
    #[inline]
    pub fn of<T: ?Sized + 'static>(path: &'static str, name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            path,
            name,
        }
    }

    /// Creates a [`Type`] from [`core::any::type_name`], used for generic
    /// containers whose path is only known after monomorphization.
    #[inline]
    pub fn named<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::of::<T>(core::any::type_name::<T>(), name)
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The simple name with its first letter lowered, unless the name
    /// starts with two capitals (`URLList` stays as is).
    ///
    /// ```
    /// use vc_bind::class::Type;
    ///
    /// assert_eq!(Type::of::<()>("a::Entry", "Entry").decapitalize(), "entry");
    /// assert_eq!(Type::of::<()>("a::URL", "URL").decapitalize(), "URL");
    /// ```
    pub fn decapitalize(&self) -> String {
        decapitalize(self.name)
    }
}

pub(crate) fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            String::from(name)
        }
        (Some(first), _) => {
            let mut out: String = first.to_lowercase().collect();
            out.push_str(&name[first.len_utf8()..]);
            out
        }
        (None, _) => String::new(),
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path)
    }
}
