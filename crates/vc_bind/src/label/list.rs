use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::class::Class;
use crate::convert::{CompositeInlineList, CompositeList, Converter, PrimitiveInlineList, PrimitiveList, Traverser};
use crate::descriptor::{ElementListAnnotation, LabelKind};
use crate::label::{Decorator, Label, entry_name, explicit_or};
use crate::scan::Contact;
use crate::strategy::declared_target;
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Error, Result};

/// A list, in a container element or inline among its siblings.
#[derive(Debug)]
pub struct ElementListLabel {
    contact: Contact,
    annotation: ElementListAnnotation,
    item: &'static Class,
    name: String,
    entry: String,
    decorator: Decorator,
}

impl ElementListLabel {
    pub fn new(contact: Contact, annotation: ElementListAnnotation, style: &dyn Style) -> Result<Self> {
        let Some(info) = declared_target(contact.class()).as_list() else {
            return Err(Error::Persistence(format!(
                "{contact} is bound as a list but holds {}",
                contact.class()
            )));
        };
        let item = info.item();
        let entry = entry_name(style, annotation.entry, item);
        let name = if annotation.inline {
            entry.clone()
        } else {
            style.element(explicit_or(annotation.name, &contact))
        };
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

impl Label for ElementListLabel {
    fn contact(&self) -> &Contact {
        &self.contact
    }

    fn kind(&self) -> LabelKind {
        LabelKind::ElementList
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
        let item = self.item;
        let entry = self.entry.clone();
        let data = self.annotation.data;
        if transformer.is_primitive(declared_target(item)) {
            return Ok(if self.annotation.inline {
                Box::new(PrimitiveInlineList::new(class, item, entry, data))
            } else {
                let name = self.name.clone();
                Box::new(PrimitiveList::new(class, item, name, entry, data, self.annotation.empty, self.decorator.clone()))
            });
        }
        let converter = Traverser::converter(style, transformer, item, entry.clone())?;
        if self.annotation.inline {
            return Ok(Box::new(CompositeInlineList::new(class, item, entry, converter)));
        }
        let by_type = self.annotation.entry.is_empty() && declared_target(item).is_dynamic();
        Ok(Box::new(CompositeList::new(
            class,
            item,
            self.name.clone(),
            converter,
            by_type,
            self.annotation.empty,
            self.decorator.clone(),
        )))
    }
}
