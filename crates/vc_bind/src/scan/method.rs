use alloc::format;
use alloc::vec::Vec;

use crate::class::Class;
use crate::descriptor::{Access, BaseDescriptor, ClassDescriptor, DefaultDescriptor, DefaultType};
use crate::scan::{Contact, annotation_of};
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// MethodPart

/// The role of an accessor method, read from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodType {
    /// `get_name` or a bare `name`.
    Get,
    /// `is_name`, for flags.
    Is,
    /// `set_name`.
    Set,
}

/// One half of a property accessor pair.
///
/// # Examples
///
/// ```
/// use vc_bind::scan::{MethodPart, MethodType};
///
/// let getter = MethodPart::getter("is_enabled");
/// assert_eq!(getter.kind(), MethodType::Is);
/// assert_eq!(getter.property(), "enabled");
///
/// let setter = MethodPart::setter("set_enabled").unwrap();
/// assert_eq!(setter.property(), getter.property());
/// assert!(MethodPart::setter("enabled").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodPart {
    method: &'static str,
    property: &'static str,
    kind: MethodType,
}

impl MethodPart {
    pub fn getter(method: &'static str) -> Self {
        if let Some(property) = method.strip_prefix("get_") {
            return Self {
                method,
                property,
                kind: MethodType::Get,
            };
        }
        if let Some(property) = method.strip_prefix("is_") {
            return Self {
                method,
                property,
                kind: MethodType::Is,
            };
        }
        Self {
            method,
            property: method,
            kind: MethodType::Get,
        }
    }

    pub fn setter(method: &'static str) -> Result<Self> {
        match method.strip_prefix("set_") {
            Some(property) if !property.is_empty() => Ok(Self {
                method,
                property,
                kind: MethodType::Set,
            }),
            _ => Err(Error::Method(format!("Method '{method}' is not a setter"))),
        }
    }

    #[inline]
    pub fn method(&self) -> &'static str {
        self.method
    }

    #[inline]
    pub fn property(&self) -> &'static str {
        self.property
    }

    #[inline]
    pub fn kind(&self) -> MethodType {
        self.kind
    }
}

// -----------------------------------------------------------------------------
// MethodScanner

/// Collects the property contacts declared directly on one struct.
///
/// A property is named after its getter. A setter must be named
/// `set_` followed by the same property name.
pub struct MethodScanner;

impl MethodScanner {
    pub fn scan(
        descriptor: &ClassDescriptor,
        owner: &'static Class,
        default: Option<&DefaultDescriptor>,
        path: &[BaseDescriptor],
    ) -> Result<Vec<Contact>> {
        let mut contacts = Vec::new();
        for member in descriptor.members() {
            let Access::Property { getter, setter, .. } = member.access() else {
                continue;
            };
            let get = MethodPart::getter(*getter);
            if let Some(setter) = *setter {
                let set = MethodPart::setter(setter)?;
                if set.property() != get.property() {
                    return Err(Error::Method(format!(
                        "Method '{}' does not match '{}' in {owner}",
                        set.method(),
                        get.method()
                    )));
                }
            }
            let Some(annotation) = annotation_of(member, default, DefaultType::Property) else {
                continue;
            };
            contacts.push(Contact::new(
                get.property(),
                member.class(),
                owner,
                annotation,
                *member.access(),
                path.to_vec(),
                member.namespace().copied(),
                member.since(),
            ));
        }
        Ok(contacts)
    }
}
