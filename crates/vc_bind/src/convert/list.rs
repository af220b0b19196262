use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use log::trace;
use vc_node::{InputNode, OutputNode};

use crate::class::Class;
use crate::context::Context;
use crate::convert::{Converter, Primitive, Repeater, Traverser, coerce_entry, read_entry};
use crate::instance::CollectionFactory;
use crate::label::Decorator;
use crate::{Bind, Error, Result};

// -----------------------------------------------------------------------------
// Items

/// The entries of a list and how each one is converted.
#[derive(Debug)]
struct Items {
    class: &'static Class,
    item: &'static Class,
    converter: Box<dyn Converter>,
    by_type: bool,
}

impl Items {
    fn read_into(&self, context: &mut Context<'_>, list: &mut dyn Bind, node: &InputNode) -> Result<()> {
        let Some(value) = read_entry(context, &*self.converter, self.item, node)? else {
            return Ok(());
        };
        let value = coerce_entry(self.item, value)?;
        let info = list
            .dyn_class()
            .as_list()
            .ok_or_else(|| Error::Persistence(format!("{} is not a list", self.class)))?;
        info.push(list, value).map_err(|value| {
            Error::Persistence(format!(
                "Entry {} does not match {} at {}",
                value.dyn_class(),
                self.item,
                node.position()
            ))
        })
    }

    fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
        if node.is_empty() && self.item.is_optional() {
            return Ok(());
        }
        self.converter.validate(context, node)
    }

    /// Writes every present entry of `value` into `node`.
    fn write(&self, context: &mut Context<'_>, node: &OutputNode, list: &dyn Bind) -> Result<()> {
        let Some(info) = list.dyn_class().as_list() else {
            return Err(Error::Persistence(format!("{} is not a list", list.dyn_class())));
        };
        for item in info.items(list) {
            let Some(item) = Class::present(item) else {
                continue;
            };
            if self.by_type
                && let Some(actual) = Class::actual(item)
            {
                let name = context.style().element(&actual.dyn_class().root_name());
                Traverser::write_element(context, node, item, self.item, &name, &Decorator::default())?;
            } else {
                self.converter.write(context, node, item)?;
            }
        }
        Ok(())
    }

    fn len(list: &dyn Bind) -> usize {
        list.dyn_class().length(list).unwrap_or_default()
    }
}

// -----------------------------------------------------------------------------
// Wrapped lists

/// A list held in its own element, one child element per entry.
#[derive(Debug)]
struct Wrapped {
    name: String,
    items: Items,
    empty: bool,
    decorator: Decorator,
}

impl Wrapped {
    fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        trace!("list {} from {node:?}", self.items.class);
        let mut instance = CollectionFactory::new(self.items.class).instance(context, node)?;
        if instance.is_reference() {
            return instance.reference();
        }
        let mut list = instance.get_instance()?;
        while let Some(child) = node.next() {
            self.items.read_into(context, &mut *list, &child)?;
        }
        instance.set_instance(list, context.session_mut()).map(Some)
    }

    fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
        let mut instance = CollectionFactory::new(self.items.class).instance(context, node)?;
        if instance.is_reference() {
            return Ok(());
        }
        while let Some(child) = node.next() {
            self.items.validate(context, &child)?;
        }
        instance.set_validated(context.session_mut())
    }

    fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()> {
        let Some(list) = Class::actual(value) else {
            return Ok(());
        };
        if !self.empty && Items::len(list) == 0 {
            return Ok(());
        }
        let node = parent.child(&self.name)?;
        self.decorator.decorate(&node);
        if context.write_value(self.items.class, value, &node)? {
            return Ok(());
        }
        self.items.write(context, &node, list)
    }
}

// -----------------------------------------------------------------------------
// Inline lists

/// A list whose entries are written straight into the owning element.
#[derive(Debug)]
struct Inline {
    entry: String,
    items: Items,
}

impl Inline {
    fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        let instance = CollectionFactory::new(self.items.class).inline()?;
        self.repeat(context, node, instance.get_instance()?).map(Some)
    }

    fn repeat(&self, context: &mut Context<'_>, node: &InputNode, mut list: Box<dyn Bind>) -> Result<Box<dyn Bind>> {
        trace!("inline list {} from {node:?}", self.items.class);
        self.items.read_into(context, &mut *list, node)?;
        if let Some(parent) = node.parent() {
            while let Some(next) = parent.next_named(&self.entry) {
                self.items.read_into(context, &mut *list, &next)?;
            }
        }
        Ok(list)
    }

    fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
        self.items.validate(context, node)?;
        if let Some(parent) = node.parent() {
            while let Some(next) = parent.next_named(&self.entry) {
                self.items.validate(context, &next)?;
            }
        }
        Ok(())
    }

    fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()> {
        match Class::actual(value) {
            Some(list) => self.items.write(context, parent, list),
            None => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// Converters

/// A list of text values, each in an entry element.
///
/// ```xml
/// <names>
///    <name>one</name>
///    <name>two</name>
/// </names>
/// ```
#[derive(Debug)]
pub struct PrimitiveList(Wrapped);

impl PrimitiveList {
    pub fn new(
        class: &'static Class,
        item: &'static Class,
        name: String,
        entry: String,
        data: bool,
        empty: bool,
        decorator: Decorator,
    ) -> Self {
        let converter = Box::new(Primitive::element(item, entry, data, None, Decorator::default()));
        Self(Wrapped {
            name,
            items: Items {
                class,
                item,
                converter,
                by_type: false,
            },
            empty,
            decorator,
        })
    }
}

/// A list of objects or nested collections in a container element.
///
/// Entries are read from every child element regardless of its name.
/// When `by_type` is set, entries are named after their concrete type.
#[derive(Debug)]
pub struct CompositeList(Wrapped);

impl CompositeList {
    pub fn new(
        class: &'static Class,
        item: &'static Class,
        name: String,
        converter: Box<dyn Converter>,
        by_type: bool,
        empty: bool,
        decorator: Decorator,
    ) -> Self {
        Self(Wrapped {
            name,
            items: Items {
                class,
                item,
                converter,
                by_type,
            },
            empty,
            decorator,
        })
    }
}

/// Text entries written directly into the owning element.
///
/// Reading stops at the first sibling with another name, and resumes
/// when more entries appear later in the element.
#[derive(Debug)]
pub struct PrimitiveInlineList(Inline);

impl PrimitiveInlineList {
    pub fn new(class: &'static Class, item: &'static Class, entry: String, data: bool) -> Self {
        let converter = Box::new(Primitive::element(item, entry.clone(), data, None, Decorator::default()));
        Self(Inline {
            entry,
            items: Items {
                class,
                item,
                converter,
                by_type: false,
            },
        })
    }
}

/// Object entries written directly into the owning element.
#[derive(Debug)]
pub struct CompositeInlineList(Inline);

impl CompositeInlineList {
    pub fn new(class: &'static Class, item: &'static Class, entry: String, converter: Box<dyn Converter>) -> Self {
        Self(Inline {
            entry,
            items: Items {
                class,
                item,
                converter,
                by_type: false,
            },
        })
    }
}

macro_rules! impl_wrapped_converter {
    ($name:ident) => {
        impl Converter for $name {
            fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>> {
                self.0.read(context, node)
            }

            fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
                self.0.validate(context, node)
            }

            fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()> {
                self.0.write(context, parent, value)
            }
        }
    };
}

macro_rules! impl_inline_converter {
    ($name:ident) => {
        impl Converter for $name {
            fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>> {
                self.0.read(context, node)
            }

            fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
                self.0.validate(context, node)
            }

            fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()> {
                self.0.write(context, parent, value)
            }

            fn as_repeater(&self) -> Option<&dyn Repeater> {
                Some(self)
            }
        }

        impl Repeater for $name {
            fn repeat(
                &self,
                context: &mut Context<'_>,
                node: &InputNode,
                value: Box<dyn Bind>,
            ) -> Result<Option<Box<dyn Bind>>> {
                self.0.repeat(context, node, value).map(Some)
            }
        }
    };
}

impl_wrapped_converter!(PrimitiveList);
impl_wrapped_converter!(CompositeList);
impl_inline_converter!(PrimitiveInlineList);
impl_inline_converter!(CompositeInlineList);
