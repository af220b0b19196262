use crate::class::Type;
use crate::descriptor::ClassDescriptor;

// -----------------------------------------------------------------------------
// CompositeInfo

/// A type with members bound to attributes, elements or text.
///
/// The [`ClassDescriptor`] is produced by `#[derive(Xml)]` and scanned
/// into a schema the first time the type is read or written.
#[derive(Clone, Debug)]
pub struct CompositeInfo {
    ty: Type,
    descriptor: ClassDescriptor,
}

impl CompositeInfo {
    #[inline]
    pub const fn new(ty: Type, descriptor: ClassDescriptor) -> Self {
        Self { ty, descriptor }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn descriptor(&self) -> &ClassDescriptor {
        &self.descriptor
    }

    /// The root name declared on the type, if any.
    #[inline]
    pub fn root_name(&self) -> Option<&'static str> {
        self.descriptor.root().and_then(|root| root.name())
    }
}
