use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::trace;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::{NodeError, Position};

// -----------------------------------------------------------------------------
// Element

/// One parsed element. Children refer to other elements by index.
#[derive(Debug)]
pub(crate) struct Element {
    pub name: String,
    pub prefix: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub namespaces: Vec<(Option<String>, String)>,
    pub children: Vec<usize>,
    pub text: Option<String>,
    pub parent: Option<usize>,
    pub position: Position,
}

// -----------------------------------------------------------------------------
// Document

/// An arena of elements; the document element is always at index zero.
#[derive(Debug)]
pub(crate) struct Document {
    pub elements: Vec<Element>,
}

fn split_name(raw: &[u8]) -> (Option<String>, String) {
    let name = String::from_utf8_lossy(raw);
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_owned()), local.to_owned()),
        None => (None, name.into_owned()),
    }
}

fn to_offset(pos: impl TryInto<usize>) -> usize {
    pos.try_into().unwrap_or(usize::MAX)
}

impl Document {
    /// Looks up the namespace reference bound to the prefix of element `id`.
    pub fn reference(&self, id: usize) -> Option<&str> {
        let prefix = self.elements[id].prefix.as_deref();
        let mut current = Some(id);
        while let Some(at) = current {
            let element = &self.elements[at];
            let found = element.namespaces.iter().find(|(p, _)| p.as_deref() == prefix);
            if let Some((_, reference)) = found {
                return Some(reference.as_str());
            }
            current = element.parent;
        }
        None
    }

    /// Parses `source` into an element arena.
    pub fn parse(source: &str) -> Result<Self, NodeError> {
        let mut reader = Reader::from_str(source);
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut segments: Vec<Vec<String>> = Vec::new();
        let mut closed = false;

        let syntax = |message: String, offset: usize| NodeError::Syntax {
            message,
            position: Position::locate(source, offset),
        };

        loop {
            let offset = to_offset(reader.buffer_position());
            let event = reader
                .read_event()
                .map_err(|e| syntax(e.to_string(), to_offset(reader.buffer_position())))?;

            match event {
                Event::Start(start) | Event::Empty(start) if closed && stack.is_empty() => {
                    let (_, name) = split_name(start.name().as_ref());
                    return Err(syntax(
                        alloc::format!("unexpected second root element '{name}'"),
                        offset,
                    ));
                }
                Event::Start(start) => {
                    let id = open(&start, &stack, &mut elements, source, offset)?;
                    stack.push(id);
                    segments.push(Vec::new());
                }
                Event::Empty(start) => {
                    open(&start, &stack, &mut elements, source, offset)?;
                    if stack.is_empty() {
                        closed = true;
                    }
                }
                Event::End(_) => {
                    if let Some(id) = stack.pop() {
                        let texts = segments.pop().unwrap_or_default();
                        elements[id].text = join_text(texts, !elements[id].children.is_empty());
                    }
                    if stack.is_empty() {
                        closed = true;
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = segments.last_mut() {
                        let value = text.unescape().map_err(|e| syntax(e.to_string(), offset))?;
                        current.push(value.into_owned());
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = segments.last_mut() {
                        current.push(String::from_utf8_lossy(&data).into_owned());
                    }
                }
                Event::Eof => break,
                other => trace!("skipped {other:?} at {offset}"),
            }
        }

        if !stack.is_empty() {
            return Err(NodeError::UnexpectedEof(Position::locate(source, source.len())));
        }
        if elements.is_empty() {
            return Err(NodeError::NoRoot);
        }
        trace!("parsed {} elements", elements.len());
        Ok(Self { elements })
    }
}

fn open(
    start: &BytesStart<'_>,
    stack: &[usize],
    elements: &mut Vec<Element>,
    source: &str,
    offset: usize,
) -> Result<usize, NodeError> {
    let (prefix, name) = split_name(start.name().as_ref());
    let mut attributes = Vec::new();
    let mut namespaces = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| NodeError::Syntax {
            message: e.to_string(),
            position: Position::locate(source, offset),
        })?;
        let value = attr
            .unescape_value()
            .map_err(|e| NodeError::Syntax {
                message: e.to_string(),
                position: Position::locate(source, offset),
            })?
            .into_owned();
        let key = attr.key.as_ref();
        if key == b"xmlns" {
            namespaces.push((None, value));
        } else if let Some(declared) = key.strip_prefix(b"xmlns:") {
            namespaces.push((Some(String::from_utf8_lossy(declared).into_owned()), value));
        } else {
            let (_, local) = split_name(key);
            attributes.push((local, value));
        }
    }

    let id = elements.len();
    let parent = stack.last().copied();
    elements.push(Element {
        name,
        prefix,
        attributes,
        namespaces,
        children: Vec::new(),
        text: None,
        parent,
        position: Position::locate(source, offset),
    });
    if let Some(parent) = parent {
        elements[parent].children.push(id);
    }
    Ok(id)
}

/// Whitespace between child elements is layout, not content.
fn join_text(texts: Vec<String>, has_children: bool) -> Option<String> {
    let texts: Vec<String> = if has_children {
        texts
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.trim().to_string())
            .collect()
    } else {
        texts
    };
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::NodeError;

    #[test]
    fn parse_nested_elements() {
        let doc = Document::parse("<a x='1'>\n  <b>text</b>\n  <c/>\n</a>").unwrap();
        assert_eq!(doc.elements.len(), 3);
        assert_eq!(doc.elements[0].children, vec![1, 2]);
        assert_eq!(doc.elements[0].text, None);
        assert_eq!(doc.elements[1].text.as_deref(), Some("text"));
        assert_eq!(doc.elements[0].attributes, vec![("x".into(), "1".into())]);
        assert_eq!(doc.elements[2].position.line(), 3);
    }

    #[test]
    fn parse_entities_and_cdata() {
        let doc = Document::parse("<a>x &amp; <![CDATA[<y>]]></a>").unwrap();
        assert_eq!(doc.elements[0].text.as_deref(), Some("x & <y>"));
    }

    #[test]
    fn parse_namespaces() {
        let doc = Document::parse("<p:a xmlns:p='urn:a'><p:b/></p:a>").unwrap();
        let child = &doc.elements[1];
        assert_eq!(child.name, "b");
        assert_eq!(child.prefix.as_deref(), Some("p"));
        assert_eq!(doc.reference(1), Some("urn:a"));
        assert!(doc.elements[0].attributes.is_empty());
    }

    #[test]
    fn parse_rejects_unclosed() {
        let err = Document::parse("<a><b></b>").unwrap_err();
        assert!(matches!(err, NodeError::UnexpectedEof(_) | NodeError::Syntax { .. }));
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(Document::parse("   ").unwrap_err(), NodeError::NoRoot));
    }
}
