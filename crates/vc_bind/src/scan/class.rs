use alloc::format;
use alloc::vec::Vec;

use crate::class::Class;
use crate::descriptor::{BaseDescriptor, Callbacks, ClassDescriptor, CommitFn, ConstructorDescriptor};
use crate::descriptor::{NamespaceDescriptor, OrderDescriptor, PersistFn};
use crate::descriptor::{ReplaceFn, ResolveFn, RootDescriptor};
use crate::scan::{ConstructorScanner, Contact, FieldScanner, MethodScanner};
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// Hook

/// A callback and the bases leading to the struct that declares it.
#[derive(Debug, Clone)]
pub struct Hook<F> {
    path: Vec<BaseDescriptor>,
    func: F,
}

impl<F: Copy> Hook<F> {
    #[inline]
    pub fn path(&self) -> &[BaseDescriptor] {
        &self.path
    }

    #[inline]
    pub fn func(&self) -> F {
        self.func
    }
}

// -----------------------------------------------------------------------------
// ClassScanner

/// The scan of one composite type and its `extends` chain.
///
/// Type level directives are taken from the most derived struct that
/// declares them. Members are ordered base first; a derived member
/// replaces a base member of the same name in place.
#[derive(Debug)]
pub struct ClassScanner {
    class: &'static Class,
    root: Option<RootDescriptor>,
    order: Option<OrderDescriptor>,
    namespace: Option<NamespaceDescriptor>,
    declarations: Vec<NamespaceDescriptor>,
    contacts: Vec<Contact>,
    constructors: Vec<ConstructorDescriptor>,
    commit: Option<Hook<CommitFn>>,
    validate: Option<Hook<CommitFn>>,
    persist: Option<Hook<PersistFn>>,
    complete: Option<Hook<PersistFn>>,
    replace: Option<ReplaceFn>,
    resolve: Option<ResolveFn>,
}

struct Level<'a> {
    descriptor: &'a ClassDescriptor,
    class: &'static Class,
    path: Vec<BaseDescriptor>,
}

impl ClassScanner {
    pub fn new(class: &'static Class) -> Result<Self> {
        let levels = Self::hierarchy(class)?;
        let Some(own) = levels.first() else {
            return Err(Error::Persistence(format!("{class} is not a composite")));
        };

        let root = levels.iter().find_map(|l| l.descriptor.root().copied());
        let order = levels.iter().find_map(|l| l.descriptor.order().cloned());
        let default = levels.iter().find_map(|l| l.descriptor.default_access().copied());
        let namespace = levels.iter().find_map(|l| l.descriptor.namespace().copied());
        let mut declarations = Vec::new();
        for level in &levels {
            for declaration in level.descriptor.declarations() {
                if !declarations.contains(declaration) {
                    declarations.push(*declaration);
                }
            }
        }

        let mut contacts: Vec<Contact> = Vec::new();
        for level in levels.iter().rev() {
            let default = level.descriptor.default_access().or(default.as_ref());
            let mut found = FieldScanner::scan(level.descriptor, level.class, default, &level.path);
            found.extend(MethodScanner::scan(level.descriptor, level.class, default, &level.path)?);
            for (index, contact) in found.iter().enumerate() {
                if found[..index].iter().any(|c| c.name() == contact.name()) {
                    return Err(Error::Persistence(format!(
                        "Member '{}' declared twice in {}",
                        contact.name(),
                        level.class
                    )));
                }
            }
            // Anything matched here was contributed by a base level.
            for contact in found {
                match contacts.iter().position(|c| c.name() == contact.name()) {
                    Some(index) => contacts[index] = contact,
                    None => contacts.push(contact),
                }
            }
        }

        let hook = |select: fn(&Callbacks) -> Option<CommitFn>| {
            levels.iter().find_map(|l| {
                select(l.descriptor.callbacks()).map(|func| Hook {
                    path: l.path.clone(),
                    func,
                })
            })
        };
        let commit = hook(|c| c.commit);
        let validate = hook(|c| c.validate);
        let persist = levels.iter().find_map(|l| {
            l.descriptor.callbacks().persist.map(|func| Hook {
                path: l.path.clone(),
                func,
            })
        });
        let complete = levels.iter().find_map(|l| {
            l.descriptor.callbacks().complete.map(|func| Hook {
                path: l.path.clone(),
                func,
            })
        });

        Ok(Self {
            class,
            root,
            order,
            namespace,
            declarations,
            contacts,
            constructors: ConstructorScanner::scan(own.descriptor, class)?,
            commit,
            validate,
            persist,
            complete,
            replace: own.descriptor.callbacks().replace,
            resolve: own.descriptor.callbacks().resolve,
        })
    }

    /// The type followed by its bases, most derived first.
    fn hierarchy(class: &'static Class) -> Result<Vec<Level<'static>>> {
        let mut levels = Vec::new();
        let mut path = Vec::new();
        let mut current = class;
        loop {
            let Some(info) = current.as_composite() else {
                return Err(Error::Persistence(format!("{current} is not a composite")));
            };
            let descriptor = info.descriptor();
            levels.push(Level {
                descriptor,
                class: current,
                path: path.clone(),
            });
            let Some(base) = descriptor.base() else {
                return Ok(levels);
            };
            if levels.iter().any(|l| l.class.ty() == base.class().ty()) {
                return Err(Error::Persistence(format!("{class} extends itself through '{}'", base.name())));
            }
            path.push(*base);
            current = base.class();
        }
    }

    #[inline]
    pub fn class(&self) -> &'static Class {
        self.class
    }

    #[inline]
    pub fn root(&self) -> Option<&RootDescriptor> {
        self.root.as_ref()
    }

    #[inline]
    pub fn order(&self) -> Option<&OrderDescriptor> {
        self.order.as_ref()
    }

    #[inline]
    pub fn namespace(&self) -> Option<&NamespaceDescriptor> {
        self.namespace.as_ref()
    }

    #[inline]
    pub fn declarations(&self) -> &[NamespaceDescriptor] {
        &self.declarations
    }

    #[inline]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    #[inline]
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    #[inline]
    pub fn commit(&self) -> Option<&Hook<CommitFn>> {
        self.commit.as_ref()
    }

    #[inline]
    pub fn validate(&self) -> Option<&Hook<CommitFn>> {
        self.validate.as_ref()
    }

    #[inline]
    pub fn persist(&self) -> Option<&Hook<PersistFn>> {
        self.persist.as_ref()
    }

    #[inline]
    pub fn complete(&self) -> Option<&Hook<PersistFn>> {
        self.complete.as_ref()
    }

    #[inline]
    pub fn replace(&self) -> Option<ReplaceFn> {
        self.replace
    }

    #[inline]
    pub fn resolve(&self) -> Option<ResolveFn> {
        self.resolve
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::ClassScanner;
    use crate::class::Typed;
    use crate::{Error, Xml};

    #[derive(Xml, Default)]
    struct Cached {
        #[xml(attribute)]
        value: u32,
        #[xml(attribute, get = "value", set = "set_value")]
        cached: u32,
    }

    impl Cached {
        fn value(&self) -> &u32 {
            &self.cached
        }

        fn set_value(&mut self, value: u32) {
            self.cached = value;
        }
    }

    #[derive(Xml, Default)]
    struct Record {
        #[xml(attribute)]
        id: u32,
        #[xml(element)]
        note: String,
    }

    #[derive(Xml, Default)]
    struct Tagged {
        #[xml(extends)]
        base: Record,
        #[xml(attribute)]
        id: String,
        #[xml(element)]
        tag: String,
    }

    #[test]
    fn same_level_duplicates_are_rejected() {
        let error = ClassScanner::new(Cached::class()).unwrap_err();
        assert!(matches!(error, Error::Persistence(message) if message.contains("'value' declared twice")));
    }

    #[test]
    fn derived_members_replace_base_in_place() {
        let scanner = ClassScanner::new(Tagged::class()).unwrap();
        let names: Vec<&str> = scanner.contacts().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["id", "note", "tag"]);
        assert_eq!(scanner.contacts()[0].class().ty().path(), "String");
        assert!(scanner.contacts()[0].owner().ty().path().ends_with("Tagged"));
    }
}
