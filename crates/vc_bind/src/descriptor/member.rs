use alloc::boxed::Box;

use crate::Bind;
use crate::class::Class;
use crate::descriptor::Annotation;

/// Borrows a member out of its owner, `None` if the owner has another type.
pub type Getter = fn(&dyn Bind) -> Option<&dyn Bind>;

/// Moves a value into a member, returning it back on a type mismatch.
pub type Setter = fn(&mut dyn Bind, Box<dyn Bind>) -> Result<(), Box<dyn Bind>>;

// -----------------------------------------------------------------------------
// Access

/// How a member is reached.
#[derive(Debug, Clone, Copy)]
pub enum Access {
    /// A struct field. Without a setter the field is read only and must be
    /// filled through a constructor parameter.
    Field { get: Getter, set: Option<Setter> },
    /// A getter and optional setter method pair, named for diagnostics.
    Property {
        getter: &'static str,
        setter: Option<&'static str>,
        get: Getter,
        set: Option<Setter>,
    },
}

impl Access {
    #[inline]
    pub const fn getter(&self) -> Getter {
        match self {
            Self::Field { get, .. } | Self::Property { get, .. } => *get,
        }
    }

    #[inline]
    pub const fn setter(&self) -> Option<Setter> {
        match self {
            Self::Field { set, .. } | Self::Property { set, .. } => *set,
        }
    }

    #[inline]
    pub const fn is_read_only(&self) -> bool {
        self.setter().is_none()
    }

    #[inline]
    pub const fn is_property(&self) -> bool {
        matches!(self, Self::Property { .. })
    }
}

// -----------------------------------------------------------------------------
// NamespaceDescriptor

/// `namespace(reference = "..", prefix = "..")`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceDescriptor {
    reference: &'static str,
    prefix: &'static str,
}

impl NamespaceDescriptor {
    /// An empty prefix denotes the default namespace.
    #[inline]
    pub const fn new(reference: &'static str, prefix: &'static str) -> Self {
        Self { reference, prefix }
    }

    #[inline]
    pub const fn reference(&self) -> &'static str {
        self.reference
    }

    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One field or property of a derived type.
///
/// Members without an [`Annotation`] are only bound when the owning
/// type declares a matching `default` access rule.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    name: &'static str,
    class: fn() -> &'static Class,
    annotation: Option<Annotation>,
    access: Access,
    namespace: Option<NamespaceDescriptor>,
    since: Option<f64>,
}

impl MemberDescriptor {
    #[inline]
    pub const fn new(name: &'static str, class: fn() -> &'static Class, access: Access) -> Self {
        Self {
            name,
            class,
            annotation: None,
            access,
            namespace: None,
            since: None,
        }
    }

    #[inline]
    pub const fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    #[inline]
    pub const fn with_namespace(mut self, namespace: NamespaceDescriptor) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// The document revision that introduced this member.
    #[inline]
    pub const fn with_since(mut self, since: f64) -> Self {
        self.since = Some(since);
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn class(&self) -> &'static Class {
        (self.class)()
    }

    #[inline]
    pub const fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    #[inline]
    pub const fn access(&self) -> &Access {
        &self.access
    }

    #[inline]
    pub const fn namespace(&self) -> Option<&NamespaceDescriptor> {
        self.namespace.as_ref()
    }

    #[inline]
    pub const fn since(&self) -> Option<f64> {
        self.since
    }
}

// -----------------------------------------------------------------------------
// BaseDescriptor

/// An `#[xml(extends)]` field whose members are bound as if declared on
/// the owner.
#[derive(Debug, Clone, Copy)]
pub struct BaseDescriptor {
    name: &'static str,
    class: fn() -> &'static Class,
    get: Getter,
    get_mut: fn(&mut dyn Bind) -> Option<&mut dyn Bind>,
}

impl BaseDescriptor {
    #[inline]
    pub const fn new(
        name: &'static str,
        class: fn() -> &'static Class,
        get: Getter,
        get_mut: fn(&mut dyn Bind) -> Option<&mut dyn Bind>,
    ) -> Self {
        Self {
            name,
            class,
            get,
            get_mut,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn class(&self) -> &'static Class {
        (self.class)()
    }

    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Bind) -> Option<&'a dyn Bind> {
        (self.get)(owner)
    }

    #[inline]
    pub fn get_mut<'a>(&self, owner: &'a mut dyn Bind) -> Option<&'a mut dyn Bind> {
        (self.get_mut)(owner)
    }
}
