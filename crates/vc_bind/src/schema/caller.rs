use alloc::boxed::Box;
use alloc::format;

use crate::class::Class;
use crate::descriptor::{BaseDescriptor, CommitFn, PersistFn, ReplaceFn, ResolveFn};
use crate::scan::{ClassScanner, Hook};
use crate::session::Session;
use crate::{Bind, BoxError, Error, Result};

/// Invokes the lifecycle callbacks of a composite.
///
/// Callbacks declared on an `extends` base are applied to that base
/// within the object.
#[derive(Debug, Clone)]
pub struct Caller {
    class: &'static Class,
    commit: Option<Hook<CommitFn>>,
    validate: Option<Hook<CommitFn>>,
    persist: Option<Hook<PersistFn>>,
    complete: Option<Hook<PersistFn>>,
    replace: Option<ReplaceFn>,
    resolve: Option<ResolveFn>,
}

impl Caller {
    pub fn new(scanner: &ClassScanner) -> Self {
        Self {
            class: scanner.class(),
            commit: scanner.commit().cloned(),
            validate: scanner.validate().cloned(),
            persist: scanner.persist().cloned(),
            complete: scanner.complete().cloned(),
            replace: scanner.replace(),
            resolve: scanner.resolve(),
        }
    }

    fn fail(&self, name: &'static str, source: BoxError) -> Error {
        Error::Callback {
            name,
            class: self.class.ty().path(),
            source,
        }
    }

    fn base<'a>(&self, object: &'a dyn Bind, path: &[BaseDescriptor]) -> Result<&'a dyn Bind> {
        let mut target = object;
        for base in path {
            target = base
                .get(target)
                .ok_or_else(|| Error::Persistence(format!("Base '{}' not found in {}", base.name(), self.class)))?;
        }
        Ok(target)
    }

    fn base_mut<'a>(&self, object: &'a mut dyn Bind, path: &[BaseDescriptor]) -> Result<&'a mut dyn Bind> {
        let mut target = object;
        for base in path {
            target = base
                .get_mut(target)
                .ok_or_else(|| Error::Persistence(format!("Base '{}' not found in {}", base.name(), self.class)))?;
        }
        Ok(target)
    }

    /// Called once the object is built and its members are set.
    pub fn commit(&self, object: &mut dyn Bind, session: &mut Session) -> Result<()> {
        let Some(hook) = &self.commit else {
            return Ok(());
        };
        let target = self.base_mut(object, hook.path())?;
        (hook.func())(target, session).map_err(|e| self.fail("commit", e))
    }

    /// Called after `commit` to reject invalid objects.
    pub fn validate(&self, object: &mut dyn Bind, session: &mut Session) -> Result<()> {
        let Some(hook) = &self.validate else {
            return Ok(());
        };
        let target = self.base_mut(object, hook.path())?;
        (hook.func())(target, session).map_err(|e| self.fail("validate", e))
    }

    /// Called before the object is written.
    pub fn persist(&self, object: &dyn Bind, session: &mut Session) -> Result<()> {
        let Some(hook) = &self.persist else {
            return Ok(());
        };
        let target = self.base(object, hook.path())?;
        (hook.func())(target, session).map_err(|e| self.fail("persist", e))
    }

    /// Called after the object is written, even when writing failed.
    pub fn complete(&self, object: &dyn Bind, session: &mut Session) -> Result<()> {
        let Some(hook) = &self.complete else {
            return Ok(());
        };
        let target = self.base(object, hook.path())?;
        (hook.func())(target, session).map_err(|e| self.fail("complete", e))
    }

    /// A substitute to write in place of the object.
    pub fn replace(&self, object: &dyn Bind, session: &mut Session) -> Result<Option<Box<dyn Bind>>> {
        match self.replace {
            Some(replace) => replace(object, session).map_err(|e| self.fail("replace", e)),
            None => Ok(None),
        }
    }

    /// A substitute for the object just read.
    pub fn resolve(&self, object: Box<dyn Bind>, session: &mut Session) -> Result<Box<dyn Bind>> {
        match self.resolve {
            Some(resolve) => resolve(object, session).map_err(|e| self.fail("resolve", e)),
            None => Ok(object),
        }
    }
}
