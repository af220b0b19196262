use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

use crate::{Format, Mode, NodeError, NodeMap};

// -----------------------------------------------------------------------------
// Slot

struct Slot {
    name: String,
    reference: Option<String>,
    namespaces: IndexMap<String, String>,
    attributes: IndexMap<String, String>,
    value: Option<String>,
    comment: Option<String>,
    mode: Mode,
    children: Vec<usize>,
    parent: Option<usize>,
    committed: bool,
    removed: bool,
}

impl Slot {
    fn new(name: &str, parent: Option<usize>) -> Self {
        Self {
            name: String::from(name),
            reference: None,
            namespaces: IndexMap::new(),
            attributes: IndexMap::new(),
            value: None,
            comment: None,
            mode: Mode::Inherit,
            children: Vec::new(),
            parent,
            committed: false,
            removed: false,
        }
    }
}

struct Tree {
    slots: Vec<Slot>,
    format: Format,
}

// -----------------------------------------------------------------------------
// OutputNode

/// A handle to an element being written.
///
/// The node at the top of a [`NodeWriter`] is the document itself; its
/// single child is the root element.
///
/// # Examples
///
/// ```
/// use vc_node::{Format, NodeWriter};
///
/// let writer = NodeWriter::new(Format::new().with_indent(0));
/// let root = writer.document().child("book").unwrap();
/// root.set_attribute("id", "1");
/// root.child("title").unwrap().set_value("Dune & Co");
/// root.commit();
///
/// assert_eq!(
///     writer.finish().unwrap(),
///     r#"<book id="1"><title>Dune &amp; Co</title></book>"#,
/// );
/// ```
#[derive(Clone)]
pub struct OutputNode {
    tree: Rc<RefCell<Tree>>,
    id: usize,
}

impl OutputNode {
    pub fn name(&self) -> String {
        self.tree.borrow().slots[self.id].name.clone()
    }

    /// Whether this is the document node rather than an element.
    #[inline]
    pub fn is_document(&self) -> bool {
        self.id == 0
    }

    /// Whether this is the root element of the document.
    pub fn is_root(&self) -> bool {
        self.tree.borrow().slots[self.id].parent == Some(0)
    }

    pub fn parent(&self) -> Option<OutputNode> {
        let parent = self.tree.borrow().slots[self.id].parent?;
        Some(Self {
            tree: Rc::clone(&self.tree),
            id: parent,
        })
    }

    /// Appends a child element.
    ///
    /// Fails if this node has been committed, or when a second root
    /// element is added to the document node.
    pub fn child(&self, name: &str) -> Result<OutputNode, NodeError> {
        let mut tree = self.tree.borrow_mut();
        let slot = &tree.slots[self.id];
        if slot.committed {
            return Err(NodeError::Committed {
                parent: slot.name.clone(),
                child: String::from(name),
            });
        }
        if self.id == 0 {
            let existing = slot.children.iter().find(|c| !tree.slots[**c].removed);
            if let Some(existing) = existing {
                return Err(NodeError::DuplicateRoot(tree.slots[*existing].name.clone()));
            }
        }
        let id = tree.slots.len();
        tree.slots.push(Slot::new(name, Some(self.id)));
        tree.slots[self.id].children.push(id);
        Ok(Self {
            tree: Rc::clone(&self.tree),
            id,
        })
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.tree.borrow_mut().slots[self.id]
            .attributes
            .insert(String::from(name), String::from(value));
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.tree.borrow().slots[self.id].attributes.get(name).cloned()
    }

    /// The attributes of this element as a mutable map.
    pub fn attributes(&self) -> OutputNodeMap {
        OutputNodeMap {
            name: self.name(),
            node: self.clone(),
        }
    }

    pub fn set_value(&self, value: &str) {
        self.tree.borrow_mut().slots[self.id].value = Some(String::from(value));
    }

    pub fn value(&self) -> Option<String> {
        self.tree.borrow().slots[self.id].value.clone()
    }

    /// Writes a comment immediately before the element.
    pub fn set_comment(&self, comment: &str) {
        self.tree.borrow_mut().slots[self.id].comment = Some(String::from(comment));
    }

    pub fn set_mode(&self, mode: Mode) {
        self.tree.borrow_mut().slots[self.id].mode = mode;
    }

    /// Shorthand for [`Mode::Data`] when `data` is true, otherwise inherit.
    pub fn set_data(&self, data: bool) {
        self.set_mode(if data { Mode::Data } else { Mode::Inherit });
    }

    pub fn mode(&self) -> Mode {
        self.tree.borrow().slots[self.id].mode
    }

    /// Places the element in the namespace identified by `reference`.
    ///
    /// The prefix is resolved when the document is written, from the
    /// declarations made on this element or its ancestors.
    pub fn set_reference(&self, reference: &str) {
        self.tree.borrow_mut().slots[self.id].reference = Some(String::from(reference));
    }

    pub fn reference(&self) -> Option<String> {
        self.tree.borrow().slots[self.id].reference.clone()
    }

    /// Declares `prefix` for `reference` on this element. An empty prefix
    /// declares the default namespace.
    pub fn declare(&self, reference: &str, prefix: &str) {
        self.tree.borrow_mut().slots[self.id]
            .namespaces
            .insert(String::from(reference), String::from(prefix));
    }

    /// Finds the prefix bound to `reference` in scope at this element.
    pub fn prefix_of(&self, reference: &str) -> Option<String> {
        prefix_of(&self.tree.borrow(), self.id, reference)
    }

    /// Marks this element and its descendants as complete.
    pub fn commit(&self) {
        let mut tree = self.tree.borrow_mut();
        let mut pending = alloc::vec![self.id];
        while let Some(id) = pending.pop() {
            tree.slots[id].committed = true;
            pending.extend(tree.slots[id].children.iter().copied());
        }
    }

    pub fn is_committed(&self) -> bool {
        self.tree.borrow().slots[self.id].committed
    }

    /// Drops the element from the output. Committed elements are kept.
    pub fn remove(&self) {
        let mut tree = self.tree.borrow_mut();
        if !tree.slots[self.id].committed {
            tree.slots[self.id].removed = true;
        }
    }
}

impl fmt::Debug for OutputNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element '{}'", self.name())
    }
}

fn prefix_of(tree: &Tree, id: usize, reference: &str) -> Option<String> {
    let mut current = Some(id);
    while let Some(at) = current {
        let slot = &tree.slots[at];
        if let Some(prefix) = slot.namespaces.get(reference) {
            return Some(prefix.clone());
        }
        current = slot.parent;
    }
    None
}

// -----------------------------------------------------------------------------
// OutputNodeMap

/// The attributes of an [`OutputNode`].
pub struct OutputNodeMap {
    name: String,
    node: OutputNode,
}

impl OutputNodeMap {
    #[inline]
    pub fn node(&self) -> &OutputNode {
        &self.node
    }
}

impl NodeMap for OutputNodeMap {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, name: &str) -> Option<String> {
        self.node.attribute(name)
    }

    fn remove(&mut self, name: &str) -> Option<String> {
        self.node.tree.borrow_mut().slots[self.node.id]
            .attributes
            .shift_remove(name)
    }

    fn put(&mut self, name: &str, value: &str) {
        self.node.set_attribute(name, value);
    }

    fn names(&self) -> Vec<String> {
        self.node.tree.borrow().slots[self.node.id]
            .attributes
            .keys()
            .cloned()
            .collect()
    }
}

// -----------------------------------------------------------------------------
// NodeWriter

/// Builds a document and renders it with [`quick_xml::Writer`].
pub struct NodeWriter {
    tree: Rc<RefCell<Tree>>,
}

impl NodeWriter {
    pub fn new(format: Format) -> Self {
        let tree = Tree {
            slots: alloc::vec![Slot::new("", None)],
            format,
        };
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    /// The document node, parent of the root element.
    pub fn document(&self) -> OutputNode {
        OutputNode {
            tree: Rc::clone(&self.tree),
            id: 0,
        }
    }

    /// Renders the document to a string.
    pub fn finish(&self) -> Result<String, NodeError> {
        let tree = self.tree.borrow();
        let indent = tree.format.indent();
        let mut writer = if indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        } else {
            Writer::new(Vec::new())
        };

        for child in &tree.slots[0].children {
            render(&mut writer, &tree, *child, tree.format.mode())?;
        }

        let body = String::from_utf8(writer.into_inner())
            .map_err(|e| NodeError::Write(e.to_string()))?;
        match tree.format.prolog() {
            Some(prolog) => Ok(alloc::format!("{prolog}\n{body}")),
            None => Ok(body),
        }
    }

    /// Renders the document into `out`.
    pub fn finish_to(&self, mut out: impl std::io::Write) -> Result<(), NodeError> {
        let text = self.finish()?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), NodeError> {
    writer
        .write_event(event)
        .map_err(|e| NodeError::Write(e.to_string()))
}

fn render(
    writer: &mut Writer<Vec<u8>>,
    tree: &Tree,
    id: usize,
    inherited: Mode,
) -> Result<(), NodeError> {
    let slot = &tree.slots[id];
    if slot.removed {
        return Ok(());
    }
    let mode = match slot.mode {
        Mode::Inherit => inherited,
        mode => mode,
    };

    let qualified = match slot.reference.as_deref().and_then(|r| prefix_of(tree, id, r)) {
        Some(prefix) if !prefix.is_empty() => alloc::format!("{prefix}:{}", slot.name),
        _ => slot.name.clone(),
    };

    if let Some(comment) = &slot.comment {
        emit(writer, Event::Comment(BytesText::from_escaped(comment.as_str())))?;
    }

    let mut start = BytesStart::new(qualified.as_str());
    for (reference, prefix) in &slot.namespaces {
        let key = if prefix.is_empty() {
            String::from("xmlns")
        } else {
            alloc::format!("xmlns:{prefix}")
        };
        start.push_attribute((key.as_str(), reference.as_str()));
    }
    for (name, value) in &slot.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    let children: Vec<usize> = slot
        .children
        .iter()
        .copied()
        .filter(|c| !tree.slots[*c].removed)
        .collect();

    if children.is_empty() && slot.value.is_none() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if let Some(value) = &slot.value {
        match mode {
            Mode::Data => emit(writer, Event::CData(BytesCData::new(value.as_str())))?,
            _ => emit(writer, Event::Text(BytesText::new(value.as_str())))?,
        }
    }
    for child in children {
        render(writer, tree, child, mode)?;
    }
    emit(writer, Event::End(BytesEnd::new(qualified.as_str())))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::NodeWriter;
    use crate::{Format, Mode, NodeError, NodeMap};

    #[test]
    fn indented_output() {
        let writer = NodeWriter::new(Format::new());
        let root = writer.document().child("root").unwrap();
        root.child("a").unwrap().set_value("1");
        root.child("b").unwrap();
        root.commit();

        let expected = "<root>\n   <a>1</a>\n   <b/>\n</root>";
        assert_eq!(writer.finish().unwrap(), expected);
    }

    #[test]
    fn cdata_is_inherited() {
        let writer = NodeWriter::new(Format::new().with_indent(0));
        let root = writer.document().child("root").unwrap();
        root.set_mode(Mode::Data);
        root.child("a").unwrap().set_value("<x>");
        root.child("b").unwrap().set_mode(Mode::Escape);
        root.child("c").unwrap().set_value("<y>");
        assert_eq!(
            writer.finish().unwrap(),
            "<root><a><![CDATA[<x>]]></a><b/><c><![CDATA[<y>]]></c></root>"
        );
    }

    #[test]
    fn committed_nodes_reject_children() {
        let writer = NodeWriter::new(Format::new());
        let root = writer.document().child("root").unwrap();
        root.commit();
        assert!(root.is_committed());
        assert!(matches!(root.child("late"), Err(NodeError::Committed { .. })));
        assert!(matches!(writer.document().child("again"), Err(NodeError::DuplicateRoot(_))));
    }

    #[test]
    fn removed_nodes_are_skipped() {
        let writer = NodeWriter::new(Format::new().with_indent(0));
        let root = writer.document().child("root").unwrap();
        root.child("gone").unwrap().remove();
        let mut map = root.attributes();
        map.put("class", "x");
        map.put("length", "2");
        assert_eq!(map.remove("class").as_deref(), Some("x"));
        assert_eq!(writer.finish().unwrap(), r#"<root length="2"/>"#);
    }

    #[test]
    fn namespace_prefix_resolution() {
        let writer = NodeWriter::new(Format::new().with_indent(0).with_prolog("<?xml version=\"1.0\"?>"));
        let root = writer.document().child("root").unwrap();
        root.declare("urn:a", "a");
        root.set_reference("urn:a");
        let child = root.child("child").unwrap();
        child.set_reference("urn:a");
        root.child("plain").unwrap();
        assert_eq!(
            writer.finish().unwrap(),
            "<?xml version=\"1.0\"?>\n<a:root xmlns:a=\"urn:a\"><a:child/><plain/></a:root>"
        );
    }
}
