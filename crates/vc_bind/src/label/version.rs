use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use crate::convert::{Converter, Primitive};
use crate::descriptor::{LabelKind, VersionAnnotation};
use crate::label::Label;
use crate::scan::Contact;
use crate::strategy::declared_target;
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Error, Result};

/// The revision of the schema, in an attribute of the owning element.
///
/// The member receives the revision found in the document.
#[derive(Debug)]
pub struct VersionLabel {
    contact: Contact,
    annotation: VersionAnnotation,
    name: String,
}

impl VersionLabel {
    pub const DEFAULT_NAME: &str = "version";

    pub fn new(contact: Contact, annotation: VersionAnnotation, style: &dyn Style) -> Result<Self> {
        if !declared_target(contact.class()).ty().is::<f64>() {
            return Err(Error::Attribute(format!(
                "{contact} must be an f64 to hold a version, found {}",
                contact.class()
            )));
        }
        let name = match annotation.name {
            "" => style.attribute(Self::DEFAULT_NAME),
            name => style.attribute(name),
        };
        Ok(Self {
            contact,
            annotation,
            name,
        })
    }
}

impl Label for VersionLabel {
    fn contact(&self) -> &Contact {
        &self.contact
    }

    fn kind(&self) -> LabelKind {
        LabelKind::Version
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn raw_name(&self) -> &'static str {
        match self.annotation.name {
            "" => self.contact.name(),
            name => name,
        }
    }

    fn is_required(&self) -> bool {
        self.annotation.required
    }

    fn revision(&self) -> Option<f64> {
        Some(self.annotation.revision)
    }

    fn converter(&self, _style: &dyn Style, _transformer: &Transformer) -> Result<Box<dyn Converter>> {
        Ok(Box::new(Primitive::attribute(self.contact.class(), self.name.clone(), None)))
    }
}
