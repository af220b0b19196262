use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use log::trace;
use vc_node::{InputNode, Mode, OutputNode};

use crate::class::{Class, MapInfo};
use crate::context::Context;
use crate::convert::{Converter, Primitive, Repeater, Traverser, coerce_entry};
use crate::instance::MapFactory;
use crate::label::Decorator;
use crate::strategy::declared_target;
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Bind, Error, Result};

// -----------------------------------------------------------------------------
// Keys and values

/// A text key held in an attribute or a child element of the entry.
#[derive(Debug)]
pub struct PrimitiveKey {
    class: &'static Class,
    name: String,
    attribute: bool,
}

impl PrimitiveKey {
    pub fn new(class: &'static Class, name: String, attribute: bool) -> Self {
        Self {
            class,
            name,
            attribute,
        }
    }
}

impl Converter for PrimitiveKey {
    fn read(&self, context: &mut Context<'_>, entry: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        let node = if self.attribute {
            entry.attribute(&self.name)
        } else {
            entry.next_named(&self.name)
        };
        let class = declared_target(self.class);
        match node.and_then(|node| node.value()) {
            Some(text) => Primitive::read_text(context, class, &text).map(Some),
            None => Primitive::read_blank(context, class, None),
        }
    }

    fn write(&self, context: &mut Context<'_>, entry: &OutputNode, key: &dyn Bind) -> Result<()> {
        let Some(key) = Class::actual(key) else {
            return Ok(());
        };
        let text = context.transformer().write(key)?;
        if self.attribute {
            entry.set_attribute(&self.name, &text);
        } else {
            entry.child(&self.name)?.set_value(&text);
        }
        Ok(())
    }
}

/// A text value held in a child element, or in the text of the entry
/// when it has no name.
#[derive(Debug)]
pub struct PrimitiveValue {
    class: &'static Class,
    name: Option<String>,
    data: bool,
}

impl PrimitiveValue {
    pub fn new(class: &'static Class, name: Option<String>, data: bool) -> Self {
        Self { class, name, data }
    }
}

impl Converter for PrimitiveValue {
    fn read(&self, context: &mut Context<'_>, entry: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        let text = match &self.name {
            Some(name) => entry.next_named(name).and_then(|node| node.value()),
            None => entry.value(),
        };
        let class = declared_target(self.class);
        match text {
            Some(text) => Primitive::read_text(context, class, &text).map(Some),
            None => Primitive::read_blank(context, class, None),
        }
    }

    fn write(&self, context: &mut Context<'_>, entry: &OutputNode, value: &dyn Bind) -> Result<()> {
        let Some(value) = Class::actual(value) else {
            return Ok(());
        };
        let text = context.transformer().write(value)?;
        let node = match &self.name {
            Some(name) => entry.child(name)?,
            None => entry.clone(),
        };
        node.set_value(&text);
        if self.data {
            node.set_mode(Mode::Data);
        }
        Ok(())
    }
}

/// A key written as an element of its own, such as an object or a list.
#[derive(Debug)]
pub struct CompositeKey {
    name: String,
    converter: Box<dyn Converter>,
}

impl CompositeKey {
    pub fn new(name: String, converter: Box<dyn Converter>) -> Self {
        Self { name, converter }
    }
}

impl Converter for CompositeKey {
    fn read(&self, context: &mut Context<'_>, entry: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        match entry.next_named(&self.name) {
            Some(node) => self.converter.read(context, &node),
            None => Ok(None),
        }
    }

    fn validate(&self, context: &mut Context<'_>, entry: &InputNode) -> Result<()> {
        match entry.next_named(&self.name) {
            Some(node) => self.converter.validate(context, &node),
            None => Ok(()),
        }
    }

    fn write(&self, context: &mut Context<'_>, entry: &OutputNode, key: &dyn Bind) -> Result<()> {
        self.converter.write(context, entry, key)
    }
}

/// A value written as an element of its own.
///
/// An absent element reads as no value, as does an empty one when the
/// value class is optional. Absent values write nothing.
#[derive(Debug)]
pub struct CompositeValue {
    class: &'static Class,
    name: String,
    converter: Box<dyn Converter>,
}

impl CompositeValue {
    pub fn new(class: &'static Class, name: String, converter: Box<dyn Converter>) -> Self {
        Self {
            class,
            name,
            converter,
        }
    }

    fn node(&self, entry: &InputNode) -> Option<InputNode> {
        let node = entry.next_named(&self.name)?;
        if node.is_empty() && self.class.is_optional() {
            return None;
        }
        Some(node)
    }
}

impl Converter for CompositeValue {
    fn read(&self, context: &mut Context<'_>, entry: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        match self.node(entry) {
            Some(node) => self.converter.read(context, &node),
            None => Ok(None),
        }
    }

    fn validate(&self, context: &mut Context<'_>, entry: &InputNode) -> Result<()> {
        match self.node(entry) {
            Some(node) => self.converter.validate(context, &node),
            None => Ok(()),
        }
    }

    fn write(&self, context: &mut Context<'_>, entry: &OutputNode, value: &dyn Bind) -> Result<()> {
        match Class::present(value) {
            Some(value) => self.converter.write(context, entry, value),
            None => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// Entry

/// The layout of one map entry: its element name, key and value.
///
/// ```xml
/// <entry key="a">
///    <value>1</value>
/// </entry>
/// ```
#[derive(Debug)]
pub struct Entry {
    class: &'static Class,
    name: String,
    key: Box<dyn Converter>,
    value: Box<dyn Converter>,
}

impl Entry {
    pub const DEFAULT_NAME: &str = "entry";
    pub const DEFAULT_KEY: &str = "key";
    pub const DEFAULT_VALUE: &str = "value";

    /// Builds the entry layout of the map class `class`.
    ///
    /// A text value is written as the text of the entry when the key is an
    /// attribute and `value` is empty.
    pub fn new(
        style: &dyn Style,
        transformer: &Transformer,
        class: &'static Class,
        name: String,
        key: String,
        value: String,
        attribute: bool,
        data: bool,
    ) -> Result<Self> {
        let info = map_info(class)?;
        let key_class = info.key();
        let value_class = info.value();

        let key: Box<dyn Converter> = if transformer.is_primitive(declared_target(key_class)) {
            Box::new(PrimitiveKey::new(key_class, key, attribute))
        } else if attribute {
            return Err(Error::Persistence(format!(
                "Key of {class} must be a primitive to be written as an attribute"
            )));
        } else {
            let converter = Traverser::converter(style, transformer, key_class, key.clone())?;
            Box::new(CompositeKey::new(key, converter))
        };

        let value: Box<dyn Converter> = if transformer.is_primitive(declared_target(value_class)) {
            let name = if value.is_empty() && attribute {
                None
            } else if value.is_empty() {
                Some(String::from(Self::DEFAULT_VALUE))
            } else {
                Some(value)
            };
            Box::new(PrimitiveValue::new(value_class, name, data))
        } else {
            let value = if value.is_empty() {
                String::from(Self::DEFAULT_VALUE)
            } else {
                value
            };
            let converter = Traverser::converter(style, transformer, value_class, value.clone())?;
            Box::new(CompositeValue::new(value_class, value, converter))
        };

        Ok(Self {
            class,
            name,
            key,
            value,
        })
    }

    /// The layout used when nothing is configured: `entry`, `key` and `value` elements.
    pub fn with_defaults(style: &dyn Style, transformer: &Transformer, class: &'static Class) -> Result<Self> {
        Self::new(
            style,
            transformer,
            class,
            String::from(Self::DEFAULT_NAME),
            String::from(Self::DEFAULT_KEY),
            String::from(Self::DEFAULT_VALUE),
            false,
            false,
        )
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn read_into(&self, context: &mut Context<'_>, map: &mut dyn Bind, node: &InputNode) -> Result<()> {
        let info = map_info(map.dyn_class())?;
        let key = self.key.read(context, node)?.ok_or_else(|| {
            Error::Element(format!("Entry of {} has no key at {}", self.class, node.position()))
        })?;
        let value = match self.value.read(context, node)? {
            Some(value) => value,
            None => info.value().null_value().ok_or_else(|| {
                Error::Element(format!("Entry of {} has no value at {}", self.class, node.position()))
            })?,
        };
        let key = coerce_entry(info.key(), key)?;
        let value = coerce_entry(info.value(), value)?;
        info.insert(map, key, value).map_err(|(key, value)| {
            Error::Persistence(format!(
                "Entry ({}, {}) does not match {} at {}",
                key.dyn_class(),
                value.dyn_class(),
                self.class,
                node.position()
            ))
        })
    }

    fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
        self.key.validate(context, node)?;
        self.value.validate(context, node)
    }

    fn write(&self, context: &mut Context<'_>, parent: &OutputNode, map: &dyn Bind) -> Result<()> {
        let info = map_info(map.dyn_class())?;
        for (key, value) in info.entries(map) {
            let node = parent.child(&self.name)?;
            self.key.write(context, &node, key)?;
            if let Some(value) = Class::present(value) {
                self.value.write(context, &node, value)?;
            }
        }
        Ok(())
    }
}

fn map_info(class: &'static Class) -> Result<&'static MapInfo> {
    declared_target(class)
        .as_map()
        .ok_or_else(|| Error::Persistence(format!("{class} is not a map")))
}

// -----------------------------------------------------------------------------
// Maps

/// A map in a container element, one child element per entry.
#[derive(Debug)]
pub struct CompositeMap {
    class: &'static Class,
    name: String,
    entry: Entry,
    empty: bool,
    decorator: Decorator,
}

impl CompositeMap {
    pub fn new(class: &'static Class, name: String, entry: Entry, empty: bool, decorator: Decorator) -> Self {
        Self {
            class,
            name,
            entry,
            empty,
            decorator,
        }
    }
}

impl Converter for CompositeMap {
    fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        trace!("map {} from {node:?}", self.class);
        let mut instance = MapFactory::new(self.class).instance(context, node)?;
        if instance.is_reference() {
            return instance.reference();
        }
        let mut map = instance.get_instance()?;
        while let Some(child) = node.next() {
            self.entry.read_into(context, &mut *map, &child)?;
        }
        instance.set_instance(map, context.session_mut()).map(Some)
    }

    fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
        let mut instance = MapFactory::new(self.class).instance(context, node)?;
        if instance.is_reference() {
            return Ok(());
        }
        while let Some(child) = node.next() {
            self.entry.validate(context, &child)?;
        }
        instance.set_validated(context.session_mut())
    }

    fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()> {
        let Some(map) = Class::actual(value) else {
            return Ok(());
        };
        if !self.empty && map.dyn_class().length(map) == Some(0) {
            return Ok(());
        }
        let node = parent.child(&self.name)?;
        self.decorator.decorate(&node);
        if context.write_value(self.class, value, &node)? {
            return Ok(());
        }
        self.entry.write(context, &node, map)
    }
}

/// Map entries written directly into the owning element.
#[derive(Debug)]
pub struct CompositeInlineMap {
    class: &'static Class,
    entry: Entry,
}

impl CompositeInlineMap {
    pub fn new(class: &'static Class, entry: Entry) -> Self {
        Self { class, entry }
    }
}

impl Converter for CompositeInlineMap {
    fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        let instance = MapFactory::new(self.class).inline()?;
        self.repeat(context, node, instance.get_instance()?)
    }

    fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
        self.entry.validate(context, node)?;
        if let Some(parent) = node.parent() {
            while let Some(next) = parent.next_named(self.entry.name()) {
                self.entry.validate(context, &next)?;
            }
        }
        Ok(())
    }

    fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()> {
        match Class::actual(value) {
            Some(map) => self.entry.write(context, parent, map),
            None => Ok(()),
        }
    }

    fn as_repeater(&self) -> Option<&dyn Repeater> {
        Some(self)
    }
}

impl Repeater for CompositeInlineMap {
    fn repeat(
        &self,
        context: &mut Context<'_>,
        node: &InputNode,
        mut map: Box<dyn Bind>,
    ) -> Result<Option<Box<dyn Bind>>> {
        trace!("inline map {} from {node:?}", self.class);
        self.entry.read_into(context, &mut *map, node)?;
        if let Some(parent) = node.parent() {
            while let Some(next) = parent.next_named(self.entry.name()) {
                self.entry.read_into(context, &mut *map, &next)?;
            }
        }
        Ok(Some(map))
    }
}
