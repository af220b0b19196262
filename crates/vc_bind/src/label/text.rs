use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use crate::convert::{Converter, Primitive};
use crate::descriptor::{LabelKind, TextAnnotation};
use crate::label::Label;
use crate::scan::Contact;
use crate::strategy::declared_target;
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Error, Result};

/// The text content of the owning element.
#[derive(Debug)]
pub struct TextLabel {
    contact: Contact,
    annotation: TextAnnotation,
}

impl TextLabel {
    pub fn new(contact: Contact, annotation: TextAnnotation, transformer: &Transformer) -> Result<Self> {
        if !transformer.is_primitive(declared_target(contact.class())) {
            return Err(Error::Text(format!(
                "{contact} of {} can not be text, it is not a primitive",
                contact.class()
            )));
        }
        Ok(Self { contact, annotation })
    }
}

impl Label for TextLabel {
    fn contact(&self) -> &Contact {
        &self.contact
    }

    fn kind(&self) -> LabelKind {
        LabelKind::Text
    }

    fn name(&self) -> &str {
        ""
    }

    fn raw_name(&self) -> &'static str {
        self.contact.name()
    }

    fn is_required(&self) -> bool {
        self.annotation.required
    }

    fn is_inline(&self) -> bool {
        true
    }

    fn is_data(&self) -> bool {
        self.annotation.data
    }

    fn empty(&self) -> Option<&'static str> {
        self.annotation.empty
    }

    fn converter(&self, _style: &dyn Style, _transformer: &Transformer) -> Result<Box<dyn Converter>> {
        Ok(Box::new(Primitive::text(
            self.contact.class(),
            self.annotation.data,
            self.annotation.empty.map(String::from),
        )))
    }
}
