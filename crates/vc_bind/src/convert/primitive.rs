use alloc::boxed::Box;
use alloc::string::String;

use log::trace;
use vc_node::{InputNode, Mode, OutputNode};

use crate::class::Class;
use crate::context::Context;
use crate::convert::Converter;
use crate::instance::PrimitiveFactory;
use crate::label::Decorator;
use crate::{Bind, Result};

#[derive(Debug)]
enum Target {
    Attribute(String),
    Element { name: String, decorator: Decorator },
    Text,
}

/// A value stored as text: an attribute, an element's text or the text
/// of the owning element.
///
/// Text passes through the `${name}` template before conversion.
#[derive(Debug)]
pub struct Primitive {
    class: &'static Class,
    target: Target,
    data: bool,
    empty: Option<String>,
}

impl Primitive {
    pub fn attribute(class: &'static Class, name: String, empty: Option<String>) -> Self {
        Self {
            class,
            target: Target::Attribute(name),
            data: false,
            empty,
        }
    }

    pub fn element(
        class: &'static Class,
        name: String,
        data: bool,
        empty: Option<String>,
        decorator: Decorator,
    ) -> Self {
        Self {
            class,
            target: Target::Element { name, decorator },
            data,
            empty,
        }
    }

    pub fn text(class: &'static Class, data: bool, empty: Option<String>) -> Self {
        Self {
            class,
            target: Target::Text,
            data,
            empty,
        }
    }

    /// Converts `text` to a value of `class`, expanding templates first.
    pub(crate) fn read_text(context: &Context<'_>, class: &'static Class, text: &str) -> Result<Box<dyn Bind>> {
        let text = context.template(text);
        context.transformer().read(class, &text)
    }

    /// The value of an element without text: the empty default, or the
    /// value of empty text where the class accepts it.
    pub(crate) fn read_blank(
        context: &Context<'_>,
        class: &'static Class,
        empty: Option<&str>,
    ) -> Result<Option<Box<dyn Bind>>> {
        match empty {
            Some(empty) => Self::read_text(context, class, empty).map(Some),
            None => Ok(context.transformer().read(class, "").ok()),
        }
    }

    pub(crate) fn write_text(&self, node: &OutputNode, text: &str) {
        node.set_value(text);
        if self.data {
            node.set_mode(Mode::Data);
        }
    }
}

impl Converter for Primitive {
    fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        trace!("primitive {} from {node:?}", self.class);
        let Target::Element { .. } = self.target else {
            let class = self.class.strip_optional();
            return match node.value() {
                Some(text) => Self::read_text(context, class, &text).map(Some),
                None => Self::read_blank(context, class, self.empty.as_deref()),
            };
        };
        let mut instance = PrimitiveFactory::new(self.class).instance(context, node)?;
        if instance.is_reference() {
            return instance.reference();
        }
        let class = instance.class();
        let value = match node.value() {
            Some(text) => Self::read_text(context, class, &text)?,
            None => match Self::read_blank(context, class, self.empty.as_deref())? {
                Some(value) => value,
                None => return Ok(None),
            },
        };
        instance.set_instance(value, context.session_mut()).map(Some)
    }

    fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()> {
        let text = context.transformer().write(value)?;
        match &self.target {
            Target::Attribute(name) => parent.set_attribute(name, &text),
            Target::Element { name, decorator } => {
                let child = parent.child(name)?;
                decorator.decorate(&child);
                if !context.write_value(self.class, value, &child)? {
                    self.write_text(&child, &text);
                }
            }
            Target::Text => self.write_text(parent, &text),
        }
        Ok(())
    }

    fn write_empty(&self, _context: &mut Context<'_>, parent: &OutputNode) -> Result<bool> {
        let Some(empty) = &self.empty else {
            return Ok(false);
        };
        match &self.target {
            Target::Attribute(name) => parent.set_attribute(name, empty),
            Target::Element { name, decorator } => {
                let child = parent.child(name)?;
                decorator.decorate(&child);
                self.write_text(&child, empty);
            }
            Target::Text => self.write_text(parent, empty),
        }
        Ok(true)
    }

    fn empty(&self, context: &mut Context<'_>) -> Result<Option<Box<dyn Bind>>> {
        match &self.empty {
            Some(empty) => Self::read_text(context, self.class.strip_optional(), empty).map(Some),
            None => Ok(None),
        }
    }
}
