use alloc::string::String;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// NodeMap

/// The attributes of one element, as seen by strategies.
///
/// Both [`InputNodeMap`](crate::InputNodeMap) and
/// [`OutputNodeMap`](crate::OutputNodeMap) implement this, so a
/// strategy can interpret and produce attributes such as `class` or
/// `length` without knowing which direction the document flows.
pub trait NodeMap {
    /// Name of the element that owns the attributes.
    fn name(&self) -> &str;

    fn get(&self, name: &str) -> Option<String>;

    /// Removes an attribute, returning its value.
    fn remove(&mut self, name: &str) -> Option<String>;

    fn put(&mut self, name: &str, value: &str);

    /// Names of the attributes in document order.
    fn names(&self) -> Vec<String>;
}
