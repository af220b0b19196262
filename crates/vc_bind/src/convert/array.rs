use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use log::trace;
use vc_node::{InputNode, OutputNode, Position};

use crate::class::{ArrayInfo, Class};
use crate::context::Context;
use crate::convert::{Converter, Primitive, coerce_entry, read_entry};
use crate::instance::ArrayFactory;
use crate::label::Decorator;
use crate::{Bind, Error, Result};

/// An array in a container element carrying its `length`.
///
/// Empty slots are written as empty entry elements, and slots past the
/// last entry are left empty on read.
#[derive(Debug)]
struct Slots {
    class: &'static Class,
    item: &'static Class,
    name: String,
    entry: String,
    converter: Box<dyn Converter>,
    empty: bool,
    decorator: Decorator,
}

impl Slots {
    fn check_length(&self, length: Option<usize>, count: usize, position: Position) -> Result<()> {
        if length.is_some_and(|length| count >= length) {
            return Err(Error::Element(format!(
                "Array length missing or incorrect for {} at {position}",
                self.class
            )));
        }
        Ok(())
    }

    /// Grows `slots` to `length` empty slots. Only items with a null
    /// value may be left empty.
    fn pad(&self, slots: &mut Vec<Option<Box<dyn Bind>>>, length: usize, position: Position) -> Result<()> {
        let count = slots.len();
        if length <= count {
            return Ok(());
        }
        if !self.item.is_optional() {
            return Err(Error::Element(format!(
                "Entry {count} of {} is missing at {position}",
                self.class
            )));
        }
        slots.try_reserve_exact(length - count).map_err(|_| {
            Error::Element(format!(
                "Array length missing or incorrect for {} at {position}",
                self.class
            ))
        })?;
        slots.resize_with(length, || None);
        Ok(())
    }

    fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        trace!("array {} from {node:?}", self.class);
        let mut instance = ArrayFactory::new(self.class).instance(context, node)?;
        if instance.is_reference() {
            return instance.reference();
        }
        let Some(info) = instance.class().as_array() else {
            return Err(Error::Instantiation(format!("{} is not an array", instance.class())));
        };
        let length = instance.length();
        let mut slots = Vec::new();
        while let Some(child) = node.next() {
            self.check_length(length, slots.len(), child.position())?;
            slots.push(read_entry(context, &*self.converter, self.item, &child)?);
        }
        if let Some(length) = length.or(info.fixed()) {
            self.pad(&mut slots, length, node.position())?;
        }
        let array = self.collect(info, slots, node)?;
        instance.set_instance(array, context.session_mut()).map(Some)
    }

    fn collect(&self, info: &ArrayInfo, slots: Vec<Option<Box<dyn Bind>>>, node: &InputNode) -> Result<Box<dyn Bind>> {
        let count = slots.len();
        let mut items = Vec::new();
        items.try_reserve_exact(count).map_err(|_| {
            Error::Element(format!(
                "Array length missing or incorrect for {} at {}",
                self.class,
                node.position()
            ))
        })?;
        for (index, slot) in slots.into_iter().enumerate() {
            let value = match slot {
                Some(value) => coerce_entry(self.item, value)?,
                None => self.item.null_value().ok_or_else(|| {
                    Error::Element(format!(
                        "Entry {index} of {} is missing at {}",
                        self.class,
                        node.position()
                    ))
                })?,
            };
            items.push(value);
        }
        info.collect(items).ok_or_else(|| {
            Error::Element(format!(
                "Unable to build {} from {count} entries at {}",
                self.class,
                node.position()
            ))
        })
    }

    fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
        let mut instance = ArrayFactory::new(self.class).instance(context, node)?;
        if instance.is_reference() {
            return Ok(());
        }
        let length = instance.length();
        let mut count = 0;
        while let Some(child) = node.next() {
            self.check_length(length, count, child.position())?;
            if !child.is_empty() || !self.item.is_optional() {
                self.converter.validate(context, &child)?;
            }
            count += 1;
        }
        instance.set_validated(context.session_mut())
    }

    fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()> {
        let Some(array) = Class::actual(value) else {
            return Ok(());
        };
        let Some(info) = array.dyn_class().as_array() else {
            return Err(Error::Persistence(format!("{} is not an array", array.dyn_class())));
        };
        let items = info.items(array);
        if !self.empty && items.is_empty() {
            return Ok(());
        }
        let node = parent.child(&self.name)?;
        self.decorator.decorate(&node);
        if context.write_value(self.class, value, &node)? {
            return Ok(());
        }
        for item in items {
            match Class::present(item) {
                Some(item) => self.converter.write(context, &node, item)?,
                None => {
                    node.child(&self.entry)?;
                }
            }
        }
        Ok(())
    }
}

/// An array of text values.
///
/// ```xml
/// <values length="3">
///    <int>1</int>
///    <int/>
///    <int>3</int>
/// </values>
/// ```
#[derive(Debug)]
pub struct PrimitiveArray(Slots);

impl PrimitiveArray {
    pub fn new(
        class: &'static Class,
        item: &'static Class,
        name: String,
        entry: String,
        data: bool,
        empty: bool,
        decorator: Decorator,
    ) -> Self {
        let converter = Box::new(Primitive::element(item, entry.clone(), data, None, Decorator::default()));
        Self(Slots {
            class,
            item,
            name,
            entry,
            converter,
            empty,
            decorator,
        })
    }
}

/// An array of objects or nested collections.
#[derive(Debug)]
pub struct CompositeArray(Slots);

impl CompositeArray {
    pub fn new(
        class: &'static Class,
        item: &'static Class,
        name: String,
        entry: String,
        converter: Box<dyn Converter>,
        empty: bool,
        decorator: Decorator,
    ) -> Self {
        Self(Slots {
            class,
            item,
            name,
            entry,
            converter,
            empty,
            decorator,
        })
    }
}

macro_rules! impl_array_converter {
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

impl_array_converter!(PrimitiveArray);
impl_array_converter!(CompositeArray);
