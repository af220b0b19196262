use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::descriptor::{BaseDescriptor, ConstructorDescriptor, MemberDescriptor, NamespaceDescriptor};
use crate::session::Session;
use crate::{Bind, BoxError};

// -----------------------------------------------------------------------------
// Type level directives

/// `#[xml(root)]`, `#[xml(root = "name")]` and `#[xml(strict = false)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootDescriptor {
    name: Option<&'static str>,
    strict: bool,
}

impl RootDescriptor {
    #[inline]
    pub const fn new(name: Option<&'static str>, strict: bool) -> Self {
        Self { name, strict }
    }

    #[inline]
    pub const fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Whether unmatched nodes are an error when reading this type.
    #[inline]
    pub const fn strict(&self) -> bool {
        self.strict
    }
}

/// `#[xml(order(elements(..), attributes(..)))]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDescriptor {
    elements: Vec<&'static str>,
    attributes: Vec<&'static str>,
}

impl OrderDescriptor {
    #[inline]
    pub fn new(elements: Vec<&'static str>, attributes: Vec<&'static str>) -> Self {
        Self {
            elements,
            attributes,
        }
    }

    #[inline]
    pub fn elements(&self) -> &[&'static str] {
        &self.elements
    }

    #[inline]
    pub fn attributes(&self) -> &[&'static str] {
        &self.attributes
    }
}

/// Which unannotated members a `default` rule binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultType {
    Field,
    Property,
}

/// `#[xml(default = "field")]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultDescriptor {
    access: DefaultType,
    required: bool,
}

impl DefaultDescriptor {
    #[inline]
    pub const fn new(access: DefaultType) -> Self {
        Self {
            access,
            required: false,
        }
    }

    #[inline]
    pub const fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[inline]
    pub const fn access(&self) -> DefaultType {
        self.access
    }

    /// Whether members picked up by this rule are required.
    #[inline]
    pub const fn required(&self) -> bool {
        self.required
    }
}

// -----------------------------------------------------------------------------
// Callbacks

pub type CommitFn = fn(&mut dyn Bind, &mut Session) -> Result<(), BoxError>;
pub type PersistFn = fn(&dyn Bind, &mut Session) -> Result<(), BoxError>;
pub type ReplaceFn = fn(&dyn Bind, &mut Session) -> Result<Option<Box<dyn Bind>>, BoxError>;
pub type ResolveFn = fn(Box<dyn Bind>, &mut Session) -> Result<Box<dyn Bind>, BoxError>;

/// Lifecycle hooks of a composite type.
///
/// - `commit` and `validate` run after a value is read, in that order.
/// - `persist` runs before a value is written, `complete` after it,
///   also when writing failed.
/// - `replace` substitutes the value written, `resolve` the value read.
#[derive(Debug, Clone, Copy, Default)]
pub struct Callbacks {
    pub commit: Option<CommitFn>,
    pub validate: Option<CommitFn>,
    pub persist: Option<PersistFn>,
    pub complete: Option<PersistFn>,
    pub replace: Option<ReplaceFn>,
    pub resolve: Option<ResolveFn>,
}

impl Callbacks {
    #[inline]
    pub const fn new() -> Self {
        Self {
            commit: None,
            validate: None,
            persist: None,
            complete: None,
            replace: None,
            resolve: None,
        }
    }
}

// -----------------------------------------------------------------------------
// ClassDescriptor

/// Everything `#[derive(Xml)]` records about a composite type.
///
/// # Examples
///
/// ```
/// use vc_bind::Xml;
/// use vc_bind::class::Typed;
///
/// #[derive(Xml, Default)]
/// #[xml(root = "entry", order(elements("value")))]
/// struct Entry {
///     #[xml(attribute)]
///     key: String,
///     #[xml(element)]
///     value: String,
/// }
///
/// let info = Entry::class().as_composite().unwrap();
/// let descriptor = info.descriptor();
/// assert_eq!(descriptor.root().unwrap().name(), Some("entry"));
/// assert_eq!(descriptor.members().len(), 2);
/// assert_eq!(descriptor.constructors().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassDescriptor {
    root: Option<RootDescriptor>,
    order: Option<OrderDescriptor>,
    default: Option<DefaultDescriptor>,
    namespace: Option<NamespaceDescriptor>,
    declarations: Vec<NamespaceDescriptor>,
    members: Vec<MemberDescriptor>,
    base: Option<BaseDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    callbacks: Callbacks,
}

impl ClassDescriptor {
    #[inline]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    #[inline]
    pub fn with_root(mut self, root: RootDescriptor) -> Self {
        self.root = Some(root);
        self
    }

    #[inline]
    pub fn with_order(mut self, order: OrderDescriptor) -> Self {
        self.order = Some(order);
        self
    }

    #[inline]
    pub fn with_default(mut self, default: DefaultDescriptor) -> Self {
        self.default = Some(default);
        self
    }

    #[inline]
    pub fn with_namespace(mut self, namespace: NamespaceDescriptor) -> Self {
        self.namespace = Some(namespace);
        self
    }

    #[inline]
    pub fn with_declaration(mut self, namespace: NamespaceDescriptor) -> Self {
        self.declarations.push(namespace);
        self
    }

    #[inline]
    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    #[inline]
    pub fn with_base(mut self, base: BaseDescriptor) -> Self {
        self.base = Some(base);
        self
    }

    #[inline]
    pub fn with_constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    #[inline]
    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    #[inline]
    pub const fn root(&self) -> Option<&RootDescriptor> {
        self.root.as_ref()
    }

    #[inline]
    pub const fn order(&self) -> Option<&OrderDescriptor> {
        self.order.as_ref()
    }

    #[inline]
    pub const fn default_access(&self) -> Option<&DefaultDescriptor> {
        self.default.as_ref()
    }

    #[inline]
    pub const fn namespace(&self) -> Option<&NamespaceDescriptor> {
        self.namespace.as_ref()
    }

    #[inline]
    pub fn declarations(&self) -> &[NamespaceDescriptor] {
        &self.declarations
    }

    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// The embedded base whose members are inherited.
    #[inline]
    pub const fn base(&self) -> Option<&BaseDescriptor> {
        self.base.as_ref()
    }

    #[inline]
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    #[inline]
    pub const fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }
}
