//! Per operation state shared with callbacks and strategies.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::utils::TypeIdMap;

// -----------------------------------------------------------------------------
// Session

/// A key/value bag that lives for one `read` or `write` call.
///
/// Lifecycle callbacks receive the same session throughout a call, so a
/// `commit` hook can leave a value for a later `validate` hook. String
/// values are also visible to `${name}` templates in the document.
///
/// # Examples
///
/// ```
/// use vc_bind::session::Session;
///
/// let mut session = Session::new(true);
/// session.insert("user", String::from("ada"));
/// session.insert("count", 3_u32);
///
/// assert_eq!(session.text("user"), Some("ada"));
/// assert_eq!(session.get::<u32>("count"), Some(&3));
/// assert!(session.get::<i64>("count").is_none());
/// ```
pub struct Session {
    strict: bool,
    attributes: HashMap<String, Box<dyn Any>, FixedState>,
    state: TypeIdMap<Box<dyn Any>>,
}

impl Session {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            attributes: HashMap::with_hasher(FixedState::default()),
            state: TypeIdMap::new(),
        }
    }

    /// Whether unmatched nodes are an error for the current call.
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn insert<T: Any>(&mut self, key: impl Into<String>, value: T) -> Option<Box<dyn Any>> {
        self.attributes.insert(key.into(), Box::new(value))
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.attributes.get(key)?.downcast_ref()
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.attributes.get_mut(key)?.downcast_mut()
    }

    /// The value under `key` when it is a `String` or `&'static str`.
    pub fn text(&self, key: &str) -> Option<&str> {
        let value = self.attributes.get(key)?;
        if let Some(text) = value.downcast_ref::<String>() {
            return Some(text);
        }
        value.downcast_ref::<&'static str>().copied()
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Any>> {
        self.attributes.remove(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Drops the engine state left by a previous call.
    pub(crate) fn reset_state(&mut self) {
        self.state.clear();
    }

    /// Engine owned state of type `T`, created on first use.
    pub(crate) fn state<T: Any + Default>(&mut self) -> &mut T {
        let slot = self
            .state
            .get_or_insert(TypeId::of::<T>(), || Box::new(T::default()));
        // Slots are only ever inserted under their own type id.
        match slot.downcast_mut::<T>() {
            Some(state) => state,
            None => unreachable!("session state slot holds another type"),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(true)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("strict", &self.strict)
            .field("keys", &self.attributes.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::Session;

    #[derive(Default)]
    struct Counter(usize);

    #[test]
    fn state_is_created_once() {
        let mut session = Session::default();
        session.state::<Counter>().0 += 1;
        session.state::<Counter>().0 += 1;
        assert_eq!(session.state::<Counter>().0, 2);
    }

    #[test]
    fn values_are_replaced_by_key() {
        let mut session = Session::new(false);
        assert!(session.insert("a", 1_i32).is_none());
        assert!(session.insert("a", "x").is_some());
        assert_eq!(session.text("a"), Some("x"));
        assert!(!session.is_strict());
        assert_eq!(session.len(), 1);
    }
}
