use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::convert::{Composite, Converter, Primitive};
use crate::descriptor::{ElementAnnotation, LabelKind};
use crate::label::{Decorator, Label, explicit_or};
use crate::scan::Contact;
use crate::strategy::declared_target;
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Error, Result};

/// A single value in a child element: text for primitives, otherwise
/// the schema of the value's class.
#[derive(Debug)]
pub struct ElementLabel {
    contact: Contact,
    annotation: ElementAnnotation,
    name: String,
    decorator: Decorator,
}

impl ElementLabel {
    pub fn new(contact: Contact, annotation: ElementAnnotation, style: &dyn Style) -> Result<Self> {
        if declared_target(contact.class()).is_collection() {
            return Err(Error::Persistence(format!(
                "{contact} holds the collection {}, it needs a list, array or map binding",
                contact.class()
            )));
        }
        let name = style.element(explicit_or(annotation.name, &contact));
        let decorator = Decorator::new(contact.namespace().copied(), Vec::new());
        Ok(Self {
            contact,
            annotation,
            name,
            decorator,
        })
    }
}

impl Label for ElementLabel {
    fn contact(&self) -> &Contact {
        &self.contact
    }

    fn kind(&self) -> LabelKind {
        LabelKind::Element
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn raw_name(&self) -> &'static str {
        explicit_or(self.annotation.name, &self.contact)
    }

    fn is_required(&self) -> bool {
        self.annotation.required
    }

    fn is_data(&self) -> bool {
        self.annotation.data
    }

    fn empty(&self) -> Option<&'static str> {
        self.annotation.empty
    }

    fn converter(&self, _style: &dyn Style, transformer: &Transformer) -> Result<Box<dyn Converter>> {
        let class = self.contact.class();
        if transformer.is_primitive(declared_target(class)) {
            return Ok(Box::new(Primitive::element(
                class,
                self.name.clone(),
                self.annotation.data,
                self.annotation.empty.map(String::from),
                self.decorator.clone(),
            )));
        }
        Ok(Box::new(Composite::new(class, self.name.clone(), self.decorator.clone())))
    }
}
