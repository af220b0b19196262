use alloc::vec::Vec;

use vc_node::OutputNode;

use crate::descriptor::NamespaceDescriptor;

/// Places elements in namespaces and declares prefixes on them.
///
/// ```
/// use vc_bind::descriptor::NamespaceDescriptor;
/// use vc_bind::label::Decorator;
/// use vc_node::{Format, NodeWriter};
///
/// let writer = NodeWriter::new(Format::new().with_indent(0));
/// let node = writer.document().child("book").unwrap();
///
/// Decorator::new(Some(NamespaceDescriptor::new("urn:books", "b")), Vec::new()).decorate(&node);
/// node.commit();
///
/// assert_eq!(writer.finish().unwrap(), r#"<b:book xmlns:b="urn:books"/>"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decorator {
    namespace: Option<NamespaceDescriptor>,
    declarations: Vec<NamespaceDescriptor>,
}

impl Decorator {
    pub fn new(namespace: Option<NamespaceDescriptor>, declarations: Vec<NamespaceDescriptor>) -> Self {
        Self {
            namespace,
            declarations,
        }
    }

    #[inline]
    pub fn namespace(&self) -> Option<&NamespaceDescriptor> {
        self.namespace.as_ref()
    }

    #[inline]
    pub fn declarations(&self) -> &[NamespaceDescriptor] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.namespace.is_none() && self.declarations.is_empty()
    }

    pub fn decorate(&self, node: &OutputNode) {
        for declaration in &self.declarations {
            node.declare(declaration.reference(), declaration.prefix());
        }
        if let Some(namespace) = &self.namespace {
            if node.prefix_of(namespace.reference()).is_none() {
                node.declare(namespace.reference(), namespace.prefix());
            }
            node.set_reference(namespace.reference());
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use pretty_assertions::assert_eq;

    use vc_node::{Format, NodeWriter};

    use super::Decorator;
    use crate::descriptor::NamespaceDescriptor;

    #[test]
    fn inherited_prefix_is_not_redeclared() {
        let writer = NodeWriter::new(Format::new().with_indent(0));
        let root = writer.document().child("library").unwrap();
        Decorator::new(None, vec![NamespaceDescriptor::new("urn:books", "b")]).decorate(&root);

        let book = root.child("book").unwrap();
        let member = Decorator::new(Some(NamespaceDescriptor::new("urn:books", "x")), vec![]);
        member.decorate(&book);
        root.commit();

        assert_eq!(
            writer.finish().unwrap(),
            r#"<library xmlns:b="urn:books"><b:book/></library>"#
        );
    }
}
