use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use foldhash::fast::FixedState;
use indexmap::IndexMap;

use crate::class::Class;
use crate::label::CacheLabel;
use crate::{Error, Result};

/// Labels keyed by the name they are matched with, in writing order.
#[derive(Debug)]
pub struct LabelMap {
    labels: IndexMap<String, CacheLabel, FixedState>,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelMap {
    pub fn new() -> Self {
        Self {
            labels: IndexMap::with_hasher(FixedState::default()),
        }
    }

    /// Adds a label, handing it back when its name is taken.
    pub fn insert(&mut self, label: CacheLabel) -> Result<(), CacheLabel> {
        if self.labels.contains_key(label.name()) {
            return Err(label);
        }
        self.labels.insert(String::from(label.name()), label);
        Ok(())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&CacheLabel> {
        self.labels.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CacheLabel> {
        self.labels.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Moves the labels named in `order` to the front, in that order.
    ///
    /// Names may be given styled or as declared on the member. The error
    /// carries the first name without a label.
    pub(crate) fn reorder(&mut self, order: &[&'static str], styled: impl Fn(&str) -> String) -> Result<(), String> {
        let mut ordered: Vec<String> = Vec::with_capacity(order.len());
        for name in order {
            let key = self
                .labels
                .values()
                .find(|label| label.raw_name() == *name || label.name() == styled(name))
                .map(|label| String::from(label.name()))
                .ok_or_else(|| String::from(*name))?;
            if !ordered.contains(&key) {
                ordered.push(key);
            }
        }
        for (index, key) in ordered.iter().enumerate() {
            if let Some(current) = self.labels.get_index_of(key) {
                self.labels.move_index(current, index);
            }
        }
        Ok(())
    }
}

/// Describes a duplicate label for scan errors.
pub(crate) fn declared_twice(label: &CacheLabel, owner: &Class) -> Error {
    Error::Persistence(format!("Duplicate {label} declared twice in {owner}"))
}
