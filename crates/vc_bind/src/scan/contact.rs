use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::class::Class;
use crate::descriptor::{Access, Annotation, BaseDescriptor, LabelKind, NamespaceDescriptor};
use crate::{Bind, Error, Result};

// -----------------------------------------------------------------------------
// Contact

/// A bindable member together with the route from the scanned type to
/// the struct declaring it.
///
/// Members inherited through `#[xml(extends)]` bases carry the chain of
/// bases to walk before their own accessor applies.
#[derive(Clone)]
pub struct Contact {
    name: &'static str,
    class: &'static Class,
    owner: &'static Class,
    annotation: Annotation,
    access: Access,
    path: Vec<BaseDescriptor>,
    namespace: Option<NamespaceDescriptor>,
    since: Option<f64>,
}

impl Contact {
    pub(crate) fn new(
        name: &'static str,
        class: &'static Class,
        owner: &'static Class,
        annotation: Annotation,
        access: Access,
        path: Vec<BaseDescriptor>,
        namespace: Option<NamespaceDescriptor>,
        since: Option<f64>,
    ) -> Self {
        Self {
            name,
            class,
            owner,
            annotation,
            access,
            path,
            namespace,
            since,
        }
    }

    /// The member name, or the property name of an accessor pair.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// A name unique within the scanned type, qualified by the bases
    /// leading to the member.
    pub fn key(&self) -> String {
        let mut key = String::new();
        for base in &self.path {
            key.push_str(base.name());
            key.push('.');
        }
        key.push_str(self.name);
        key
    }

    #[inline]
    pub fn class(&self) -> &'static Class {
        self.class
    }

    /// The composite declaring the member.
    #[inline]
    pub fn owner(&self) -> &'static Class {
        self.owner
    }

    #[inline]
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    #[inline]
    pub fn kind(&self) -> LabelKind {
        self.annotation.kind()
    }

    #[inline]
    pub fn access(&self) -> &Access {
        &self.access
    }

    #[inline]
    pub fn namespace(&self) -> Option<&NamespaceDescriptor> {
        self.namespace.as_ref()
    }

    #[inline]
    pub fn since(&self) -> Option<f64> {
        self.since
    }

    /// Whether the member can only be filled through a constructor.
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.access.is_read_only()
    }

    /// Borrows the member value, `None` for an empty option.
    pub fn get<'a>(&self, object: &'a dyn Bind) -> Option<&'a dyn Bind> {
        Class::present(self.get_raw(object)?)
    }

    /// Borrows the member value as declared, options included.
    pub fn get_raw<'a>(&self, object: &'a dyn Bind) -> Option<&'a dyn Bind> {
        let mut target = object;
        for base in &self.path {
            target = base.get(target)?;
        }
        (self.access.getter())(target)
    }

    /// Stores a value, wrapping it to the declared class when needed.
    pub fn set(&self, object: &mut dyn Bind, value: Box<dyn Bind>) -> Result<()> {
        let Some(setter) = self.access.setter() else {
            return Err(Error::Persistence(format!("Unable to set {self}, it is read only")));
        };
        let value = self.class.coerce(value).map_err(|value| {
            Error::Persistence(format!("Value of {} can not be assigned to {self}", value.dyn_class()))
        })?;
        let mut target = object;
        for base in &self.path {
            target = base
                .get_mut(target)
                .ok_or_else(|| Error::Persistence(format!("Base '{}' not found for {self}", base.name())))?;
        }
        setter(target, value)
            .map_err(|value| Error::Persistence(format!("Value of {} can not be assigned to {self}", value.dyn_class())))
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.access {
            Access::Field { .. } => write!(f, "field '{}' in {}", self.name, self.owner),
            Access::Property { getter, .. } => write!(f, "method '{getter}' in {}", self.owner),
        }
    }
}

impl fmt::Debug for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contact")
            .field("name", &self.name)
            .field("class", &self.class.ty())
            .field("kind", &self.kind())
            .field("read_only", &self.is_read_only())
            .finish_non_exhaustive()
    }
}
