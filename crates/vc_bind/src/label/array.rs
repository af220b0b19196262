use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::class::Class;
use crate::convert::{CompositeArray, Converter, PrimitiveArray, Traverser};
use crate::descriptor::{ElementArrayAnnotation, LabelKind};
use crate::label::{Decorator, Label, entry_name, explicit_or};
use crate::scan::Contact;
use crate::strategy::declared_target;
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Error, Result};

/// An array in a container element with a `length` attribute.
#[derive(Debug)]
pub struct ElementArrayLabel {
    contact: Contact,
    annotation: ElementArrayAnnotation,
    item: &'static Class,
    name: String,
    entry: String,
    decorator: Decorator,
}

impl ElementArrayLabel {
    pub fn new(contact: Contact, annotation: ElementArrayAnnotation, style: &dyn Style) -> Result<Self> {
        let Some(info) = declared_target(contact.class()).as_array() else {
            return Err(Error::Persistence(format!(
                "{contact} is bound as an array but holds {}",
                contact.class()
            )));
        };
        let item = info.item();
        let entry = entry_name(style, annotation.entry, item);
        let name = style.element(explicit_or(annotation.name, &contact));
        let decorator = Decorator::new(contact.namespace().copied(), Vec::new());
        Ok(Self {
            contact,
            annotation,
            item,
            name,
            entry,
            decorator,
        })
    }
}

impl Label for ElementArrayLabel {
    fn contact(&self) -> &Contact {
        &self.contact
    }

    fn kind(&self) -> LabelKind {
        LabelKind::ElementArray
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn raw_name(&self) -> &'static str {
        explicit_or(self.annotation.name, &self.contact)
    }

    fn entry(&self) -> Option<&str> {
        Some(&self.entry)
    }

    fn is_required(&self) -> bool {
        self.annotation.required
    }

    fn is_data(&self) -> bool {
        self.annotation.data
    }

    fn is_collection(&self) -> bool {
        true
    }

    fn converter(&self, style: &dyn Style, transformer: &Transformer) -> Result<Box<dyn Converter>> {
        let class = self.contact.class();
        let name = self.name.clone();
        let entry = self.entry.clone();
        let empty = self.annotation.empty;
        let decorator = self.decorator.clone();
        if transformer.is_primitive(declared_target(self.item)) {
            let data = self.annotation.data;
            return Ok(Box::new(PrimitiveArray::new(class, self.item, name, entry, data, empty, decorator)));
        }
        let converter = Traverser::converter(style, transformer, self.item, entry.clone())?;
        Ok(Box::new(CompositeArray::new(class, self.item, name, entry, converter, empty, decorator)))
    }
}
