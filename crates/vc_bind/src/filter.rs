//! `${name}` substitution in attribute values and text.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::session::Session;

// -----------------------------------------------------------------------------
// Filter

/// Resolves a template variable to its replacement text.
pub trait Filter: Send + Sync {
    fn replace(&self, name: &str) -> Option<String>;
}

/// Never resolves anything, the default filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyFilter;

impl Filter for EmptyFilter {
    #[inline]
    fn replace(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Resolves variables from a fixed map.
///
/// # Examples
///
/// ```
/// use vc_bind::filter::{Filter, MapFilter};
///
/// let filter = MapFilter::new().with("host", "localhost");
/// assert_eq!(filter.replace("host").as_deref(), Some("localhost"));
/// assert!(filter.replace("port").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapFilter {
    values: HashMap<String, String, FixedState>,
}

impl MapFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }
}

impl Filter for MapFilter {
    fn replace(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Resolves variables from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentFilter;

impl Filter for EnvironmentFilter {
    fn replace(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Asks a stack of filters, most recently pushed first.
#[derive(Default)]
pub struct StackFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl StackFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: impl Filter + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.push(filter);
        self
    }
}

impl Filter for StackFilter {
    fn replace(&self, name: &str) -> Option<String> {
        self.filters.iter().rev().find_map(|filter| filter.replace(name))
    }
}

// -----------------------------------------------------------------------------
// Template

/// Expands `${name}` occurrences, looking names up in the session
/// first and the filter second. Unresolved variables are kept verbatim.
///
/// # Examples
///
/// ```
/// use vc_bind::filter::{MapFilter, Template};
/// use vc_bind::session::Session;
///
/// let filter = MapFilter::new().with("name", "world");
/// let mut session = Session::default();
/// session.insert("greeting", String::from("hello"));
///
/// let template = Template::new(&filter, &session);
/// assert_eq!(template.process("${greeting} ${name}${x}"), "hello world${x}");
/// ```
pub struct Template<'a> {
    filter: &'a dyn Filter,
    session: &'a Session,
}

impl<'a> Template<'a> {
    #[inline]
    pub fn new(filter: &'a dyn Filter, session: &'a Session) -> Self {
        Self { filter, session }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match self.session.text(name) {
            Some(text) => Some(String::from(text)),
            None => self.filter.replace(name),
        }
    }

    pub fn process<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !text.contains("${") {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let tail = &rest[start + 2..];
            let Some(end) = tail.find('}') else {
                out.push_str(&rest[start..]);
                return Cow::Owned(out);
            };
            let name = &tail[..end];
            match self.lookup(name) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[start..start + end + 3]),
            }
            rest = &tail[end + 1..];
        }
        out.push_str(rest);
        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::{EmptyFilter, MapFilter, StackFilter, Template};
    use crate::session::Session;

    #[test]
    fn unterminated_variable_is_kept() {
        let session = Session::default();
        let template = Template::new(&EmptyFilter, &session);
        assert_eq!(template.process("a ${b"), "a ${b");
        assert_eq!(template.process("plain"), "plain");
    }

    #[test]
    fn stack_prefers_last_pushed() {
        let stack = StackFilter::new()
            .with(MapFilter::new().with("a", "1").with("b", "2"))
            .with(MapFilter::new().with("a", "3"));
        let session = Session::default();
        let template = Template::new(&stack, &session);
        assert_eq!(template.process("${a}${b}"), "32");
    }
}
