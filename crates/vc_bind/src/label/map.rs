use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::convert::{CompositeInlineMap, CompositeMap, Converter, Entry};
use crate::descriptor::{ElementMapAnnotation, LabelKind};
use crate::label::{Decorator, Label, explicit_or};
use crate::scan::Contact;
use crate::strategy::declared_target;
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Error, Result};

/// A map, one entry element per key.
///
/// Keys are attributes or child elements of the entry; text values may
/// be the text of the entry itself.
#[derive(Debug)]
pub struct ElementMapLabel {
    contact: Contact,
    annotation: ElementMapAnnotation,
    name: String,
    entry: String,
    key: String,
    value: String,
    decorator: Decorator,
}

impl ElementMapLabel {
    pub fn new(contact: Contact, annotation: ElementMapAnnotation, style: &dyn Style) -> Result<Self> {
        if declared_target(contact.class()).as_map().is_none() {
            return Err(Error::Persistence(format!(
                "{contact} is bound as a map but holds {}",
                contact.class()
            )));
        }
        let entry = match annotation.entry {
            "" => style.element(Entry::DEFAULT_NAME),
            entry => style.element(entry),
        };
        let key = match (annotation.key, annotation.attribute) {
            ("", true) => style.attribute(Entry::DEFAULT_KEY),
            ("", false) => style.element(Entry::DEFAULT_KEY),
            (key, true) => style.attribute(key),
            (key, false) => style.element(key),
        };
        let value = match annotation.value {
            "" => String::new(),
            value => style.element(value),
        };
        let name = if annotation.inline {
            entry.clone()
        } else {
            style.element(explicit_or(annotation.name, &contact))
        };
        let decorator = Decorator::new(contact.namespace().copied(), Vec::new());
        Ok(Self {
            contact,
            annotation,
            name,
            entry,
            key,
            value,
            decorator,
        })
    }
}

impl Label for ElementMapLabel {
    fn contact(&self) -> &Contact {
        &self.contact
    }

    fn kind(&self) -> LabelKind {
        LabelKind::ElementMap
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

    fn is_inline(&self) -> bool {
        self.annotation.inline
    }

    fn is_data(&self) -> bool {
        self.annotation.data
    }

    fn is_collection(&self) -> bool {
        true
    }

    fn converter(&self, style: &dyn Style, transformer: &Transformer) -> Result<Box<dyn Converter>> {
        let class = self.contact.class();
        let entry = Entry::new(
            style,
            transformer,
            class,
            self.entry.clone(),
            self.key.clone(),
            self.value.clone(),
            self.annotation.attribute,
            self.annotation.data,
        )?;
        if self.annotation.inline {
            return Ok(Box::new(CompositeInlineMap::new(class, entry)));
        }
        Ok(Box::new(CompositeMap::new(
            class,
            self.name.clone(),
            entry,
            self.annotation.empty,
            self.decorator.clone(),
        )))
    }
}
