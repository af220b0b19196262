use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use log::debug;
use vc_node::{InputNode, OutputNode};

use crate::class::Class;
use crate::context::Context;
use crate::convert::{CompositeArray, CompositeList, CompositeMap, Converter, Entry, PrimitiveArray};
use crate::convert::{Composite, Primitive, PrimitiveList};
use crate::label::Decorator;
use crate::strategy::declared_target;
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Bind, Error, Result};

/// Reads and writes whole elements whose converter follows from the class alone.
///
/// Used for document roots and for the entries of collections: a list
/// of lists or a map of arrays nests through [`Traverser::converter`].
pub struct Traverser;

impl Traverser {
    /// The converter of an element named `name` holding a value of `class`.
    pub fn converter(
        style: &dyn Style,
        transformer: &Transformer,
        class: &'static Class,
        name: String,
    ) -> Result<Box<dyn Converter>> {
        let target = declared_target(class);
        let decorator = Decorator::default();
        Ok(match target {
            Class::List(info) => {
                let item = info.item();
                let entry = style.element(&item.root_name());
                if transformer.is_primitive(declared_target(item)) {
                    Box::new(PrimitiveList::new(class, item, name, entry, false, true, decorator))
                } else {
                    let by_type = declared_target(item).is_dynamic();
                    let converter = Self::converter(style, transformer, item, entry)?;
                    Box::new(CompositeList::new(class, item, name, converter, by_type, true, decorator))
                }
            }
            Class::Array(info) => {
                let item = info.item();
                let entry = style.element(&item.root_name());
                if transformer.is_primitive(declared_target(item)) {
                    Box::new(PrimitiveArray::new(class, item, name, entry, false, true, decorator))
                } else {
                    let converter = Self::converter(style, transformer, item, entry.clone())?;
                    Box::new(CompositeArray::new(class, item, name, entry, converter, true, decorator))
                }
            }
            Class::Map(_) => {
                let entry = Entry::with_defaults(style, transformer, class)?;
                Box::new(CompositeMap::new(class, name, entry, true, decorator))
            }
            _ if transformer.is_primitive(target) => Box::new(Primitive::element(class, name, false, None, decorator)),
            _ => Box::new(Composite::new(class, name, decorator)),
        })
    }

    /// Reads the document element as a value of `class`.
    pub fn read(context: &mut Context<'_>, node: &InputNode, class: &'static Class) -> Result<Box<dyn Bind>> {
        debug!("reading {class} from root {node:?}");
        let converter = Self::converter(context.style(), context.transformer(), class, String::from(node.name()))?;
        match converter.read(context, node)? {
            Some(value) => Ok(value),
            None => class
                .null_value()
                .ok_or_else(|| Error::Element(format!("Root {node:?} holds no value of {class}"))),
        }
    }

    pub fn validate(context: &mut Context<'_>, node: &InputNode, class: &'static Class) -> Result<()> {
        debug!("validating {class} against root {node:?}");
        let converter = Self::converter(context.style(), context.transformer(), class, String::from(node.name()))?;
        converter.validate(context, node)
    }

    /// Writes `value` as the document element `name` under `document`.
    pub fn write(context: &mut Context<'_>, document: &OutputNode, value: &dyn Bind, name: &str) -> Result<()> {
        let class = value.dyn_class();
        debug!("writing {class} as root '{name}'");
        let converter = Self::converter(context.style(), context.transformer(), class, String::from(name))?;
        match Class::present(value) {
            Some(value) => converter.write(context, document, value),
            None => Err(Error::Element(format!("Root value of {class} is empty"))),
        }
    }

    /// Writes a composite element: applies the replace callback, lets the
    /// strategy claim the element, then writes the schema of the concrete value.
    pub(crate) fn write_element(
        context: &mut Context<'_>,
        parent: &OutputNode,
        value: &dyn Bind,
        declared: &'static Class,
        name: &str,
        decorator: &Decorator,
    ) -> Result<()> {
        let replaced = Self::replace(context, value)?;
        let value = replaced.as_deref().unwrap_or(value);
        let node = parent.child(name)?;
        decorator.decorate(&node);
        if context.write_value(declared, value, &node)? {
            return Ok(());
        }
        match Class::actual(value) {
            Some(actual) => Composite::write_object(context, &node, actual),
            None => Ok(()),
        }
    }

    fn replace(context: &mut Context<'_>, value: &dyn Bind) -> Result<Option<Box<dyn Bind>>> {
        let Some(actual) = Class::actual(value) else {
            return Ok(None);
        };
        let class = actual.dyn_class();
        if !class.is_composite() {
            return Ok(None);
        }
        let schema = context.schema(class)?;
        schema.caller().replace(actual, context.session_mut())
    }
}
