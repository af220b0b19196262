use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use crate::convert::{Converter, Primitive};
use crate::descriptor::{AttributeAnnotation, LabelKind};
use crate::label::{Label, explicit_or};
use crate::scan::Contact;
use crate::strategy::declared_target;
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Error, Result};

/// A text value in an attribute of the owning element.
#[derive(Debug)]
pub struct AttributeLabel {
    contact: Contact,
    annotation: AttributeAnnotation,
    name: String,
}

impl AttributeLabel {
    pub fn new(contact: Contact, annotation: AttributeAnnotation, style: &dyn Style, transformer: &Transformer) -> Result<Self> {
        if !transformer.is_primitive(declared_target(contact.class())) {
            return Err(Error::Attribute(format!(
                "{contact} of {} can not be an attribute, it is not a primitive",
                contact.class()
            )));
        }
        let name = style.attribute(explicit_or(annotation.name, &contact));
        Ok(Self {
            contact,
            annotation,
            name,
        })
    }
}

impl Label for AttributeLabel {
    fn contact(&self) -> &Contact {
        &self.contact
    }

    fn kind(&self) -> LabelKind {
        LabelKind::Attribute
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

    fn empty(&self) -> Option<&'static str> {
        self.annotation.empty
    }

    fn converter(&self, _style: &dyn Style, _transformer: &Transformer) -> Result<Box<dyn Converter>> {
        Ok(Box::new(Primitive::attribute(
            self.contact.class(),
            self.name.clone(),
            self.annotation.empty.map(String::from),
        )))
    }
}
