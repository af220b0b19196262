use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use log::{trace, warn};
use vc_node::{InputNode, NodeMap, OutputNode};

use crate::class::Class;
use crate::context::Context;
use crate::convert::{Converter, Primitive, Traverser};
use crate::descriptor::{LabelKind, VersionAnnotation};
use crate::instance::{Criteria, ObjectFactory};
use crate::label::{CacheLabel, Decorator};
use crate::schema::Schema;
use crate::{Bind, Error, Result};

// -----------------------------------------------------------------------------
// Section

/// The labels matched while reading one element.
struct Section<'s> {
    criteria: Criteria<'s>,
    seen: Vec<&'s str>,
    validate: bool,
}

impl<'s> Section<'s> {
    fn new(validate: bool) -> Self {
        Self {
            criteria: Criteria::new(),
            seen: Vec::new(),
            validate,
        }
    }

    fn has_seen(&self, label: &CacheLabel) -> bool {
        self.seen.contains(&label.key())
    }

    fn accept(&mut self, context: &mut Context<'_>, label: &'s CacheLabel, node: &InputNode) -> Result<()> {
        let converter = label.converter();
        let repeated = self.has_seen(label);
        if repeated && converter.as_repeater().is_none() {
            return Err(Error::Persistence(format!(
                "Element '{}' declared twice at {}",
                label.name(),
                node.position()
            )));
        }
        if self.validate {
            converter.validate(context, node)?;
        } else {
            let value = match (self.criteria.remove(label.key()), converter.as_repeater()) {
                (Some(variable), Some(repeater)) => repeater.repeat(context, node, variable.into_value())?,
                _ => converter.read(context, node)?,
            };
            if let Some(value) = value {
                self.criteria.insert(label, value);
            }
        }
        if !repeated {
            self.seen.push(label.key());
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Composite

/// A value with its own schema, written as an element.
#[derive(Debug)]
pub struct Composite {
    class: &'static Class,
    name: String,
    decorator: Decorator,
}

impl Composite {
    pub fn new(class: &'static Class, name: String, decorator: Decorator) -> Self {
        Self {
            class,
            name,
            decorator,
        }
    }

    /// Reads `node` as a value of `declared`, resolving type overrides
    /// and references through the strategy.
    pub(crate) fn read_object(
        context: &mut Context<'_>,
        node: &InputNode,
        declared: &'static Class,
    ) -> Result<Option<Box<dyn Bind>>> {
        let mut instance = ObjectFactory::new(declared).instance(context, node)?;
        if instance.is_reference() {
            return instance.reference();
        }
        let class = instance.class();
        trace!("composite {class} from {node:?}");
        let object = if context.transformer().is_primitive(class) {
            match node.value() {
                Some(text) => Primitive::read_text(context, class, &text)?,
                None => match Primitive::read_blank(context, class, None)? {
                    Some(value) => value,
                    None => return Ok(None),
                },
            }
        } else {
            let schema = context.schema(class)?;
            Self::read_schema(context, node, &schema)?
        };
        instance.set_instance(object, context.session_mut()).map(Some)
    }

    /// Checks `node` against the schema of `declared` without creating objects.
    pub(crate) fn validate_object(
        context: &mut Context<'_>,
        node: &InputNode,
        declared: &'static Class,
    ) -> Result<()> {
        let mut instance = ObjectFactory::new(declared).instance(context, node)?;
        if instance.is_reference() {
            return Ok(());
        }
        let class = instance.class();
        if context.transformer().is_primitive(class) {
            if let Some(text) = node.value() {
                Primitive::read_text(context, class, &text)?;
            }
        } else {
            let schema = context.schema(class)?;
            Self::read_section(context, node, &schema, true)?;
        }
        instance.set_validated(context.session_mut())
    }

    fn read_schema(context: &mut Context<'_>, node: &InputNode, schema: &Schema) -> Result<Box<dyn Bind>> {
        let mut criteria = Self::read_section(context, node, schema, false)?;
        let mut object = schema.creator().instantiate(schema.class(), &mut criteria)?;
        criteria.commit(&mut *object)?;

        let caller = schema.caller();
        caller.commit(&mut *object, context.session_mut())?;
        caller.validate(&mut *object, context.session_mut())?;
        caller.resolve(object, context.session_mut())
    }

    fn read_section<'s>(
        context: &mut Context<'_>,
        node: &InputNode,
        schema: &'s Schema,
        validate: bool,
    ) -> Result<Criteria<'s>> {
        let mut section = Section::new(validate);
        let revision = Self::read_version(context, node, schema, &mut section)?;
        let strict = context.is_strict() && schema.is_strict() && revision.is_none();

        let mut attributes = node.attributes();
        for name in attributes.names() {
            let attribute = node.attribute(&name);
            attributes.remove(&name);
            match (schema.attributes().get(&name), attribute) {
                (Some(label), Some(attribute)) => section.accept(context, label, &attribute)?,
                _ if strict => {
                    return Err(Error::Attribute(format!(
                        "Attribute '{name}' does not have a match in {} at {}",
                        schema.class(),
                        node.position()
                    )));
                }
                _ => warn!("attribute '{name}' of {node:?} skipped, no match in {}", schema.class()),
            }
        }

        while let Some(child) = node.next() {
            match schema.elements().get(child.name()) {
                Some(label) => section.accept(context, label, &child)?,
                None if strict => {
                    return Err(Error::Element(format!(
                        "Element '{}' does not have a match in {} at {}",
                        child.name(),
                        schema.class(),
                        child.position()
                    )));
                }
                None => {
                    warn!("{child:?} skipped, no match in {}", schema.class());
                    child.skip();
                }
            }
        }

        if let Some(label) = schema.text()
            && node.value().is_some()
        {
            section.accept(context, label, node)?;
        }

        Self::read_missing(context, node, schema, &mut section, revision)?;
        Ok(section.criteria)
    }

    /// Reads the version attribute, returning the document revision when
    /// it differs from the schema revision.
    fn read_version<'s>(
        context: &mut Context<'_>,
        node: &InputNode,
        schema: &'s Schema,
        section: &mut Section<'s>,
    ) -> Result<Option<f64>> {
        let Some(label) = schema.version() else {
            return Ok(None);
        };
        let mut revision = VersionAnnotation::DEFAULT_REVISION;
        if let Some(attribute) = node.attribute(label.name()) {
            node.attributes().remove(label.name());
            if let Some(value) = label.converter().read(context, &attribute)? {
                if let Some(number) = value.downcast_ref::<f64>() {
                    revision = *number;
                }
                if !section.validate {
                    section.criteria.insert(label, value);
                }
            }
            section.seen.push(label.key());
        }
        if revision == schema.revision() {
            Ok(None)
        } else {
            warn!(
                "{node:?} has revision {revision}, {} expects {}",
                schema.class(),
                schema.revision()
            );
            Ok(Some(revision))
        }
    }

    /// Fills absent labels from their empty values and checks that
    /// required labels were present.
    fn read_missing<'s>(
        context: &mut Context<'_>,
        node: &InputNode,
        schema: &'s Schema,
        section: &mut Section<'s>,
        revision: Option<f64>,
    ) -> Result<()> {
        let labels = schema
            .attributes()
            .iter()
            .chain(schema.elements().iter())
            .chain(schema.text());
        for label in labels {
            if section.has_seen(label) {
                continue;
            }
            if let Some(value) = label.converter().empty(context)? {
                if !section.validate {
                    section.criteria.insert(label, value);
                }
                continue;
            }
            let gated = revision.is_some_and(|revision| label.since().is_some_and(|since| since > revision));
            if !label.is_required() || gated {
                continue;
            }
            let message = format!("Unable to satisfy {label} for {} at {}", schema.class(), node.position());
            return Err(match label.kind() {
                LabelKind::Attribute | LabelKind::Version => Error::Attribute(message),
                LabelKind::Text => Error::Text(message),
                _ => Error::Element(message),
            });
        }
        Ok(())
    }

    /// Writes the body of `value` into its element. `value` is concrete,
    /// not an option, pointer or trait object.
    pub(crate) fn write_object(context: &mut Context<'_>, node: &OutputNode, value: &dyn Bind) -> Result<()> {
        let class = value.dyn_class();
        if context.transformer().is_primitive(class) {
            let text = context.transformer().write(value)?;
            node.set_value(&text);
            return Ok(());
        }
        let schema = context.schema(class)?;
        schema.decorator().decorate(node);

        let caller = schema.caller();
        caller.persist(value, context.session_mut())?;
        let result = Self::write_schema(context, node, value, &schema);
        let complete = caller.complete(value, context.session_mut());
        result.and(complete)
    }

    fn write_schema(context: &mut Context<'_>, node: &OutputNode, value: &dyn Bind, schema: &Schema) -> Result<()> {
        if let Some(label) = schema.version() {
            let revision = schema.revision();
            if revision != VersionAnnotation::DEFAULT_REVISION || label.is_required() {
                label.converter().write(context, node, &revision)?;
            }
        }
        for label in schema.attributes().iter() {
            Self::write_label(context, node, value, label, schema)?;
        }
        for label in schema.elements().iter() {
            Self::write_label(context, node, value, label, schema)?;
        }
        if let Some(label) = schema.text() {
            Self::write_label(context, node, value, label, schema)?;
        }
        Ok(())
    }

    fn write_label(
        context: &mut Context<'_>,
        node: &OutputNode,
        value: &dyn Bind,
        label: &CacheLabel,
        schema: &Schema,
    ) -> Result<()> {
        let converter = label.converter();
        if let Some(member) = label.contact().get(value) {
            return converter.write(context, node, member);
        }
        if converter.write_empty(context, node)? || !label.is_required() {
            return Ok(());
        }
        let message = format!("Value for {label} is null in {}", schema.class());
        Err(match label.kind() {
            LabelKind::Attribute | LabelKind::Version => Error::Attribute(message),
            LabelKind::Text => Error::Text(message),
            _ => Error::Element(message),
        })
    }
}

impl Converter for Composite {
    fn read(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Option<Box<dyn Bind>>> {
        Self::read_object(context, node, self.class)
    }

    fn validate(&self, context: &mut Context<'_>, node: &InputNode) -> Result<()> {
        Self::validate_object(context, node, self.class)
    }

    fn write(&self, context: &mut Context<'_>, parent: &OutputNode, value: &dyn Bind) -> Result<()> {
        Traverser::write_element(context, parent, value, self.class, &self.name, &self.decorator)
    }
}
