use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};

use foldhash::fast::FixedState;
use hashbrown::HashMap;
use vc_node::NodeMap;

use crate::class::Class;
use crate::session::Session;
use crate::strategy::{Strategy, TreeStrategy, Value};
use crate::{Bind, Error, Result};

const ID: &str = "id";
const REFERENCE: &str = "reference";

// -----------------------------------------------------------------------------
// Graphs

enum Entry {
    /// The element with this id is still being read.
    Pending,
    /// Seen while validating, no object exists.
    Validated,
    Resolved(Box<dyn Bind>),
}

/// Objects read so far, by id.
#[derive(Default)]
struct ReadGraph {
    entries: HashMap<String, Entry, FixedState>,
}

/// Ids assigned so far, by pointer address.
#[derive(Default)]
struct WriteGraph {
    ids: HashMap<usize, String, FixedState>,
}

fn share(value: &dyn Bind) -> Option<Box<dyn Bind>> {
    value.dyn_class().as_shared()?.share(value)
}

// -----------------------------------------------------------------------------
// CycleValue

struct CycleValue {
    class: Option<&'static Class>,
    length: Option<usize>,
    id: Option<String>,
    reference: Option<Box<dyn Bind>>,
    is_reference: bool,
}

impl Value for CycleValue {
    fn class(&self) -> Option<&'static Class> {
        self.class
    }

    fn length(&self) -> Option<usize> {
        self.length
    }

    fn is_reference(&self) -> bool {
        self.is_reference
    }

    fn reference(&mut self) -> Option<Box<dyn Bind>> {
        self.reference.take()
    }

    fn set_value(&mut self, value: Option<&dyn Bind>, session: &mut Session) -> Result<()> {
        let Some(id) = self.id.take() else {
            return Ok(());
        };
        let graph = session.state::<ReadGraph>();
        match value {
            None => {
                graph.entries.insert(id, Entry::Validated);
            }
            Some(value) => match Class::present(value).and_then(share) {
                Some(shared) => {
                    graph.entries.insert(id, Entry::Resolved(shared));
                }
                None => {
                    graph.entries.remove(&id);
                }
            },
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// CycleStrategy

/// Preserves the identity of shared values.
///
/// The first time an `Rc` or `Arc` is written its element gets an `id`
/// attribute; later occurrences of the same pointer are written as an
/// empty element with a `reference` attribute. Reading restores one
/// shared pointer per id. The `class` and `length` attributes of
/// [`TreeStrategy`] are written as well.
///
/// An element may only refer to an object that has been completely
/// read, so back references to an enclosing object are an error.
#[derive(Debug, Clone)]
pub struct CycleStrategy {
    id: String,
    reference: String,
    tree: TreeStrategy,
}

impl CycleStrategy {
    pub fn new() -> Self {
        Self::with_names(ID, REFERENCE)
    }

    pub fn with_names(id: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reference: reference.into(),
            tree: TreeStrategy::new(),
        }
    }

    /// Replaces the strategy used for `class` and `length`.
    pub fn with_tree(mut self, tree: TreeStrategy) -> Self {
        self.tree = tree;
        self
    }
}

impl Default for CycleStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for CycleStrategy {
    fn read(
        &self,
        declared: &'static Class,
        node: &mut dyn NodeMap,
        session: &mut Session,
    ) -> Result<Option<Box<dyn Value>>> {
        if let Some(reference) = node.remove(&self.reference) {
            let graph = session.state::<ReadGraph>();
            let shared = match graph.entries.get(&reference) {
                Some(Entry::Resolved(value)) => share(&**value),
                Some(Entry::Validated) => None,
                Some(Entry::Pending) => {
                    return Err(Error::Cycle(format!(
                        "Reference '{reference}' refers to an object still being read"
                    )));
                }
                None => return Err(Error::Cycle(format!("Invalid reference '{reference}' found"))),
            };
            return Ok(Some(Box::new(CycleValue {
                class: None,
                length: None,
                id: None,
                reference: shared,
                is_reference: true,
            })));
        }

        let tree = self.tree.read_value(declared, node)?;
        let id = node.remove(&self.id);
        if let Some(id) = &id {
            let graph = session.state::<ReadGraph>();
            if graph.entries.contains_key(id) {
                return Err(Error::Cycle(format!("Element with {} '{id}' declared twice", self.id)));
            }
            graph.entries.insert(id.clone(), Entry::Pending);
        }
        if tree.is_none() && id.is_none() {
            return Ok(None);
        }
        let (class, length) = tree.map_or((None, None), |parts| (parts.class, parts.length));
        Ok(Some(Box::new(CycleValue {
            class,
            length,
            id,
            reference: None,
            is_reference: false,
        })))
    }

    fn write(
        &self,
        declared: &'static Class,
        value: &dyn Bind,
        node: &mut dyn NodeMap,
        session: &mut Session,
    ) -> Result<bool> {
        let address = Class::present(value)
            .and_then(|shared| shared.dyn_class().as_shared()?.address(shared));
        if let Some(address) = address {
            let graph = session.state::<WriteGraph>();
            if let Some(id) = graph.ids.get(&address) {
                node.put(&self.reference, id);
                return Ok(true);
            }
            let id = graph.ids.len().to_string();
            node.put(&self.id, &id);
            graph.ids.insert(address, id);
        }
        self.tree.write_value(declared, value, node);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use vc_node::{NodeReader, NodeWriter};

    use super::CycleStrategy;
    use crate::Error;
    use crate::class::Typed;
    use crate::session::Session;
    use crate::strategy::Strategy;

    #[test]
    fn repeated_pointer_is_a_reference() {
        let writer = NodeWriter::new(Default::default());
        let root = writer.document().child("root").unwrap();
        let first = root.child("a").unwrap();
        let second = root.child("b").unwrap();

        let shared = Rc::new(5_u8);
        let copy = Rc::clone(&shared);
        let strategy = CycleStrategy::new();
        let mut session = Session::default();

        let claimed = strategy
            .write(<Rc<u8>>::class(), &shared, &mut first.attributes(), &mut session)
            .unwrap();
        assert!(!claimed);
        assert_eq!(first.attribute("id").as_deref(), Some("0"));

        let claimed = strategy
            .write(<Rc<u8>>::class(), &copy, &mut second.attributes(), &mut session)
            .unwrap();
        assert!(claimed);
        assert_eq!(second.attribute("reference").as_deref(), Some("0"));
    }

    #[test]
    fn reference_to_pending_object_fails() {
        let root = NodeReader::read_str("<a id='1'><b reference='1'/></a>").unwrap();
        let child = root.next().unwrap();
        let strategy = CycleStrategy::new();
        let mut session = Session::default();

        let value = strategy
            .read(<Rc<u8>>::class(), &mut root.attributes(), &mut session)
            .unwrap();
        assert!(value.is_some());

        let err = strategy
            .read(<Rc<u8>>::class(), &mut child.attributes(), &mut session)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Cycle(_)));
    }

    #[test]
    fn resolved_reference_shares_pointer() {
        let root = NodeReader::read_str("<a><b id='x'/><c reference='x'/></a>").unwrap();
        let b = root.next().unwrap();
        let c = root.next().unwrap();
        let strategy = CycleStrategy::new();
        let mut session = Session::default();

        let mut value = strategy
            .read(<Rc<u8>>::class(), &mut b.attributes(), &mut session)
            .unwrap()
            .unwrap();
        let shared = Rc::new(7_u8);
        value.set_value(Some(&shared), &mut session).unwrap();

        let mut reference = strategy
            .read(<Rc<u8>>::class(), &mut c.attributes(), &mut session)
            .unwrap()
            .unwrap();
        assert!(reference.is_reference());
        let object = reference.reference().unwrap().take::<Rc<u8>>().unwrap();
        assert!(Rc::ptr_eq(&object, &shared));
    }
}
