use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use foldhash::fast::FixedState;
use indexmap::IndexMap;

use crate::label::CacheLabel;
use crate::{Bind, Error, Result};

// -----------------------------------------------------------------------------
// Variable

/// A value read for a label, waiting to be stored.
pub struct Variable<'s> {
    label: &'s CacheLabel,
    value: Box<dyn Bind>,
}

impl<'s> Variable<'s> {
    #[inline]
    pub fn label(&self) -> &'s CacheLabel {
        self.label
    }

    #[inline]
    pub fn value(&self) -> &dyn Bind {
        &*self.value
    }

    #[inline]
    pub fn into_value(self) -> Box<dyn Bind> {
        self.value
    }
}

// -----------------------------------------------------------------------------
// Criteria

/// The values read for one composite element, keyed by label.
///
/// Values stay here until a constructor has been chosen; what the
/// constructor does not take is then stored through the contacts.
#[derive(Default)]
pub struct Criteria<'s> {
    variables: IndexMap<String, Variable<'s>, FixedState>,
}

impl<'s> Criteria<'s> {
    pub fn new() -> Self {
        Self {
            variables: IndexMap::with_hasher(FixedState::default()),
        }
    }

    pub fn insert(&mut self, label: &'s CacheLabel, value: Box<dyn Bind>) {
        self.variables
            .insert(String::from(label.key()), Variable { label, value });
    }

    pub fn get(&self, key: &str) -> Option<&Variable<'s>> {
        self.variables.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Variable<'s>> {
        self.variables.shift_remove(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Stores every remaining value into `object`.
    pub fn commit(self, object: &mut dyn Bind) -> Result<()> {
        for (_, variable) in self.variables {
            let contact = variable.label.contact();
            if contact.is_read_only() {
                return Err(Error::Constructor(format!(
                    "No constructor parameter took the value of {contact}"
                )));
            }
            contact.set(object, variable.value)?;
        }
        Ok(())
    }
}
