use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use indexmap::IndexMap;

use crate::document::Document;
use crate::{NodeError, NodeMap, Position};

// -----------------------------------------------------------------------------
// Cursor

/// Read progress of a single element.
struct Cursor {
    next: usize,
    attributes: IndexMap<String, String>,
}

struct Source {
    document: Document,
    cursors: RefCell<Vec<Cursor>>,
}

#[derive(Clone)]
enum Kind {
    Element(usize),
    Attribute {
        owner: usize,
        name: Rc<str>,
        value: Rc<str>,
    },
}

// -----------------------------------------------------------------------------
// InputNode

/// A handle to an element or attribute of a parsed document.
///
/// Handles are cheap to clone and share the read progress of the
/// document: children handed out by [`next`](InputNode::next) are
/// consumed for every handle of the same element.
///
/// # Examples
///
/// ```
/// use vc_node::NodeReader;
///
/// let root = NodeReader::read_str("<list><item>a</item><item>b</item><end/></list>").unwrap();
/// assert_eq!(root.name(), "list");
///
/// let mut items = Vec::new();
/// while let Some(item) = root.next_named("item") {
///     items.push(item.value().unwrap());
/// }
/// assert_eq!(items, ["a", "b"]);
///
/// assert_eq!(root.next().unwrap().name(), "end");
/// assert!(root.next().is_none());
/// ```
#[derive(Clone)]
pub struct InputNode {
    source: Rc<Source>,
    kind: Kind,
}

impl InputNode {
    fn element(source: &Rc<Source>, id: usize) -> Self {
        Self {
            source: Rc::clone(source),
            kind: Kind::Element(id),
        }
    }

    fn id(&self) -> usize {
        match &self.kind {
            Kind::Element(id) => *id,
            Kind::Attribute { owner, .. } => *owner,
        }
    }

    /// The local name, without any namespace prefix.
    pub fn name(&self) -> &str {
        match &self.kind {
            Kind::Element(id) => &self.source.document.elements[*id].name,
            Kind::Attribute { name, .. } => name,
        }
    }

    /// The namespace prefix of an element, if present.
    pub fn prefix(&self) -> Option<&str> {
        match &self.kind {
            Kind::Element(id) => self.source.document.elements[*id].prefix.as_deref(),
            Kind::Attribute { .. } => None,
        }
    }

    /// The namespace reference the element's prefix is bound to.
    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            Kind::Element(id) => self.source.document.reference(*id),
            Kind::Attribute { .. } => None,
        }
    }

    /// The text of an element or the value of an attribute.
    pub fn value(&self) -> Option<String> {
        match &self.kind {
            Kind::Element(id) => self.source.document.elements[*id].text.clone(),
            Kind::Attribute { value, .. } => Some(String::from(&**value)),
        }
    }

    pub fn position(&self) -> Position {
        self.source.document.elements[self.id()].position
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.kind, Kind::Element(_))
    }

    #[inline]
    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, Kind::Attribute { .. })
    }

    /// Whether this is the document element.
    pub fn is_root(&self) -> bool {
        matches!(self.kind, Kind::Element(0))
    }

    /// The enclosing element. For attributes this is the owning element.
    pub fn parent(&self) -> Option<InputNode> {
        match &self.kind {
            Kind::Element(id) => self.source.document.elements[*id]
                .parent
                .map(|parent| Self::element(&self.source, parent)),
            Kind::Attribute { owner, .. } => Some(Self::element(&self.source, *owner)),
        }
    }

    /// Consumes and returns the next unread child element.
    pub fn next(&self) -> Option<InputNode> {
        let Kind::Element(id) = self.kind else {
            return None;
        };
        let child = {
            let mut cursors = self.source.cursors.borrow_mut();
            let cursor = &mut cursors[id];
            let child = self.source.document.elements[id].children.get(cursor.next).copied()?;
            cursor.next += 1;
            child
        };
        Some(Self::element(&self.source, child))
    }

    /// Consumes the next unread child only if it has the given name.
    ///
    /// This is the walk used for inline collections, which stop at the
    /// first sibling with a different name.
    pub fn next_named(&self, name: &str) -> Option<InputNode> {
        let Kind::Element(id) = self.kind else {
            return None;
        };
        let child = {
            let mut cursors = self.source.cursors.borrow_mut();
            let cursor = &mut cursors[id];
            let child = self.source.document.elements[id].children.get(cursor.next).copied()?;
            if self.source.document.elements[child].name != name {
                return None;
            }
            cursor.next += 1;
            child
        };
        Some(Self::element(&self.source, child))
    }

    /// Returns the name of the next unread child without consuming it.
    pub fn peek_name(&self) -> Option<String> {
        let Kind::Element(id) = self.kind else {
            return None;
        };
        let cursors = self.source.cursors.borrow();
        let child = self.source.document.elements[id].children.get(cursors[id].next)?;
        Some(self.source.document.elements[*child].name.clone())
    }

    /// Returns an unconsumed attribute as a node.
    pub fn attribute(&self, name: &str) -> Option<InputNode> {
        let Kind::Element(id) = self.kind else {
            return None;
        };
        let value = self.source.cursors.borrow()[id].attributes.get(name).cloned()?;
        Some(Self {
            source: Rc::clone(&self.source),
            kind: Kind::Attribute {
                owner: id,
                name: Rc::from(name),
                value: Rc::from(value),
            },
        })
    }

    /// The attributes not yet consumed, as a mutable map.
    pub fn attributes(&self) -> InputNodeMap {
        InputNodeMap { node: self.clone() }
    }

    /// Whether nothing remains to be read: no attributes, children or text.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            Kind::Element(id) => {
                let element = &self.source.document.elements[*id];
                let cursors = self.source.cursors.borrow();
                let cursor = &cursors[*id];
                cursor.attributes.is_empty()
                    && cursor.next >= element.children.len()
                    && element.text.as_deref().is_none_or(str::is_empty)
            }
            Kind::Attribute { value, .. } => value.is_empty(),
        }
    }

    /// Consumes every remaining child of this element.
    pub fn skip(&self) {
        if let Kind::Element(id) = self.kind {
            let len = self.source.document.elements[id].children.len();
            self.source.cursors.borrow_mut()[id].next = len;
        }
    }
}

impl fmt::Debug for InputNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Element(_) => write!(f, "element '{}' at {}", self.name(), self.position()),
            Kind::Attribute { name, .. } => {
                write!(f, "attribute '{}' at {}", name, self.position())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// InputNodeMap

/// The unconsumed attributes of an [`InputNode`].
///
/// Removing an attribute marks it as consumed, which is how strategies
/// hide the attributes they interpret from strict schema checks.
pub struct InputNodeMap {
    node: InputNode,
}

impl InputNodeMap {
    fn with<R>(&self, f: impl FnOnce(&mut IndexMap<String, String>) -> R) -> Option<R> {
        let Kind::Element(id) = self.node.kind else {
            return None;
        };
        let mut cursors = self.node.source.cursors.borrow_mut();
        Some(f(&mut cursors[id].attributes))
    }

    /// The element these attributes belong to.
    #[inline]
    pub fn node(&self) -> &InputNode {
        &self.node
    }
}

impl NodeMap for InputNodeMap {
    fn name(&self) -> &str {
        self.node.name()
    }

    fn get(&self, name: &str) -> Option<String> {
        self.with(|map| map.get(name).cloned()).flatten()
    }

    fn remove(&mut self, name: &str) -> Option<String> {
        self.with(|map| map.shift_remove(name)).flatten()
    }

    fn put(&mut self, name: &str, value: &str) {
        self.with(|map| map.insert(String::from(name), String::from(value)));
    }

    fn names(&self) -> Vec<String> {
        self.with(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

// -----------------------------------------------------------------------------
// NodeReader

/// Entry point for reading documents.
pub struct NodeReader;

impl NodeReader {
    /// Parses a document and returns its root element.
    pub fn read_str(source: &str) -> Result<InputNode, NodeError> {
        let document = Document::parse(source)?;
        let cursors = document
            .elements
            .iter()
            .map(|element| Cursor {
                next: 0,
                attributes: element.attributes.iter().cloned().collect(),
            })
            .collect();
        let source = Rc::new(Source {
            document,
            cursors: RefCell::new(cursors),
        });
        Ok(InputNode::element(&source, 0))
    }

    /// Reads the whole of `reader` and parses it.
    pub fn read(mut reader: impl std::io::Read) -> Result<InputNode, NodeError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::read_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::NodeReader;
    use crate::NodeMap;

    const SOURCE: &str = r#"
        <root id="7" name="x">
           <first>1</first>
           <entry/>
           <entry>two</entry>
           <other/>
           <entry/>
        </root>"#;

    #[test]
    fn attributes_are_consumed_by_map() {
        let root = NodeReader::read_str(SOURCE).unwrap();
        let mut map = root.attributes();
        assert_eq!(map.names(), ["id", "name"]);
        assert_eq!(map.remove("id").as_deref(), Some("7"));
        assert!(root.attribute("id").is_none());
        assert_eq!(root.attribute("name").unwrap().value().as_deref(), Some("x"));
    }

    #[test]
    fn named_walk_stops_at_other_names() {
        let root = NodeReader::read_str(SOURCE).unwrap();
        assert!(root.next_named("entry").is_none());
        assert_eq!(root.next().unwrap().value().as_deref(), Some("1"));

        let mut count = 0;
        while root.next_named("entry").is_some() {
            count += 1;
        }
        assert_eq!(count, 2);
        assert_eq!(root.peek_name().as_deref(), Some("other"));
        root.skip();
        assert!(root.next().is_none());
    }

    #[test]
    fn empty_and_parent() {
        let root = NodeReader::read_str(SOURCE).unwrap();
        root.next();
        let entry = root.next().unwrap();
        assert!(entry.is_empty());
        assert_eq!(entry.parent().unwrap().name(), "root");
        assert!(entry.parent().unwrap().is_root());
        assert!(!root.is_empty());
        assert_eq!(entry.position().line(), 4);
    }

    #[test]
    fn attribute_node_reports_owner() {
        let root = NodeReader::read_str(SOURCE).unwrap();
        let id = root.attribute("id").unwrap();
        assert!(id.is_attribute());
        assert_eq!(id.name(), "id");
        assert_eq!(id.parent().unwrap().name(), "root");
        assert!(id.next().is_none());
    }
}
