use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};

use vc_node::NodeMap;

use crate::class::Class;
use crate::session::Session;
use crate::strategy::{Strategy, Value, declared_target};
use crate::{Bind, Error, Result};

const CLASS: &str = "class";
const LENGTH: &str = "length";

// -----------------------------------------------------------------------------
// TreeValue

struct TreeValue {
    class: Option<&'static Class>,
    length: Option<usize>,
}

impl Value for TreeValue {
    fn class(&self) -> Option<&'static Class> {
        self.class
    }

    fn length(&self) -> Option<usize> {
        self.length
    }
}

// -----------------------------------------------------------------------------
// TreeStrategy

/// Writes a `class` attribute when a value's type differs from the
/// declared one, and a `length` attribute on arrays.
///
/// # Examples
///
/// ```
/// use vc_bind::class::Typed;
/// use vc_bind::session::Session;
/// use vc_bind::strategy::{Strategy, TreeStrategy};
/// use vc_node::{NodeMap, NodeReader};
///
/// let node = NodeReader::read_str("<array length='3'/>").unwrap();
/// let mut session = Session::default();
/// let value = TreeStrategy::new()
///     .read(<Box<[u8]>>::class(), &mut node.attributes(), &mut session)
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(value.length(), Some(3));
/// assert!(node.attributes().get("length").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TreeStrategy {
    class: String,
    length: String,
}

impl TreeStrategy {
    pub fn new() -> Self {
        Self::with_names(CLASS, LENGTH)
    }

    /// Uses other attribute names for the type and the array length.
    pub fn with_names(class: impl Into<String>, length: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            length: length.into(),
        }
    }

    pub(crate) fn read_value(&self, declared: &'static Class, node: &mut dyn NodeMap) -> Result<Option<TreeValueParts>> {
        let class = match node.remove(&self.class) {
            Some(path) => Some(declared.resolve(&path).ok_or_else(|| {
                Error::Instantiation(format!("Unable to resolve class '{path}' for {declared}"))
            })?),
            None => None,
        };
        let target = class.unwrap_or_else(|| declared_target(declared));
        let length = match target {
            Class::Array(_) => match node.remove(&self.length) {
                Some(text) => Some(text.trim().parse::<usize>().map_err(|_| {
                    Error::Element(format!("Invalid {} '{text}' for {declared}", self.length))
                })?),
                None => Some(0),
            },
            _ => None,
        };
        if class.is_none() && length.is_none() {
            return Ok(None);
        }
        Ok(Some(TreeValueParts { class, length }))
    }

    pub(crate) fn write_value(&self, declared: &'static Class, value: &dyn Bind, node: &mut dyn NodeMap) {
        let Some(actual) = Class::actual(value) else {
            return;
        };
        let class = actual.dyn_class();
        if declared_target(declared).ty() != class.ty() {
            node.put(&self.class, class.ty().path());
        }
        if let Class::Array(info) = class {
            node.put(&self.length, &info.len(actual).to_string());
        }
    }
}

/// The fields of a tree value, reused by strategies building on this one.
pub(crate) struct TreeValueParts {
    pub class: Option<&'static Class>,
    pub length: Option<usize>,
}

impl Default for TreeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for TreeStrategy {
    fn read(
        &self,
        declared: &'static Class,
        node: &mut dyn NodeMap,
        _session: &mut Session,
    ) -> Result<Option<Box<dyn Value>>> {
        Ok(self.read_value(declared, node)?.map(|parts| {
            Box::new(TreeValue {
                class: parts.class,
                length: parts.length,
            }) as Box<dyn Value>
        }))
    }

    fn write(
        &self,
        declared: &'static Class,
        value: &dyn Bind,
        node: &mut dyn NodeMap,
        _session: &mut Session,
    ) -> Result<bool> {
        self.write_value(declared, value, node);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use vc_node::{NodeMap, NodeReader, NodeWriter};

    use super::TreeStrategy;
    use crate::Error;
    use crate::class::Typed;
    use crate::session::Session;
    use crate::strategy::Strategy;

    #[test]
    fn array_length_is_written() {
        let writer = NodeWriter::new(Default::default());
        let node = writer.document().child("array").unwrap();
        let value: Box<[Option<u8>]> = Box::new([Some(1), None, Some(3)]);
        let mut session = Session::default();
        let mut attributes = node.attributes();
        let claimed = TreeStrategy::new()
            .write(<Box<[Option<u8>]>>::class(), &value, &mut attributes, &mut session)
            .unwrap();
        assert!(!claimed);
        assert_eq!(attributes.get("length").as_deref(), Some("3"));
        assert!(attributes.get("class").is_none());
    }

    #[test]
    fn unknown_class_fails() {
        let node = NodeReader::read_str("<list class='nope'/>").unwrap();
        let mut session = Session::default();
        let err = TreeStrategy::new()
            .read(<Vec<u8>>::class(), &mut node.attributes(), &mut session)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Instantiation(_)));
    }

    #[test]
    fn plain_elements_have_no_value() {
        let node = NodeReader::read_str("<list a='1'/>").unwrap();
        let mut session = Session::default();
        let value = TreeStrategy::new()
            .read(<Vec<u8>>::class(), &mut node.attributes(), &mut session)
            .unwrap();
        assert!(value.is_none());
        assert_eq!(node.attributes().names(), Vec::from([String::from("a")]));
    }
}
