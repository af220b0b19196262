use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

use crate::class::Class;
use crate::descriptor::{ConstructorDescriptor, LabelKind, VersionAnnotation};
use crate::instance::{Builder, Creator, Parameter};
use crate::label::{CacheLabel, Decorator, LabelFactory};
use crate::scan::ClassScanner;
use crate::schema::label_map::declared_twice;
use crate::schema::{Caller, LabelMap, Schema};
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Error, Result};

/// Builds and validates the [`Schema`] of a composite type.
pub struct Scanner;

impl Scanner {
    /// Scans `class` and checks its labels against each other and
    /// against its constructors.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_bind::Xml;
    /// use vc_bind::class::Typed;
    /// use vc_bind::schema::Scanner;
    /// use vc_bind::style::IdentityStyle;
    /// use vc_bind::transform::Transformer;
    ///
    /// #[derive(Xml, Default)]
    /// #[xml(root = "book", strict = false)]
    /// struct Book {
    ///     #[xml(attribute)]
    ///     isbn: String,
    ///     #[xml(element)]
    ///     title: String,
    /// }
    ///
    /// let schema = Scanner::scan(Book::class(), &IdentityStyle, &Transformer::new()).unwrap();
    /// assert_eq!(schema.name(), "book");
    /// assert!(schema.attributes().contains("isbn"));
    /// assert!(schema.elements().contains("title"));
    /// assert!(!schema.is_strict());
    /// ```
    pub fn scan(class: &'static Class, style: &dyn Style, transformer: &Transformer) -> Result<Schema> {
        debug!("scanning {class}");
        let scanner = ClassScanner::new(class)?;

        let mut attributes = LabelMap::new();
        let mut elements = LabelMap::new();
        let mut text: Option<CacheLabel> = None;
        let mut version: Option<CacheLabel> = None;

        for contact in scanner.contacts() {
            let label = LabelFactory::label(contact.clone(), style, transformer)?;
            match label.kind() {
                LabelKind::Text => {
                    if text.is_some() {
                        return Err(Error::Text(format!("{class} has more than one text label")));
                    }
                    text = Some(label);
                }
                LabelKind::Version => {
                    if version.is_some() {
                        return Err(Error::Attribute(format!("{class} has more than one version label")));
                    }
                    version = Some(label);
                }
                LabelKind::Attribute => {
                    attributes.insert(label).map_err(|label| declared_twice(&label, class))?;
                }
                _ => {
                    elements.insert(label).map_err(|label| declared_twice(&label, class))?;
                }
            }
        }
        if let (Some(text), Some(element)) = (&text, elements.iter().next()) {
            return Err(Error::Text(format!(
                "{text} can not be used with {element} in {class}"
            )));
        }
        if let Some(version) = &version
            && attributes.contains(version.name())
        {
            return Err(declared_twice(version, class));
        }

        if let Some(order) = scanner.order() {
            elements
                .reorder(order.elements(), |name| style.element(name))
                .map_err(|name| Error::Element(format!("Ordered element '{name}' missing for {class}")))?;
            attributes
                .reorder(order.attributes(), |name| style.attribute(name))
                .map_err(|name| Error::Attribute(format!("Ordered attribute '{name}' missing for {class}")))?;
        }

        let labels: Vec<&CacheLabel> = version
            .iter()
            .chain(attributes.iter())
            .chain(elements.iter())
            .chain(text.as_ref())
            .collect();
        let creator = Self::creator(class, scanner.constructors(), &labels)?;

        let revision = version
            .as_ref()
            .and_then(CacheLabel::revision)
            .unwrap_or(VersionAnnotation::DEFAULT_REVISION);
        let root = scanner.root();
        let primitive = attributes.is_empty() && elements.is_empty() && text.is_none() && root.is_none();
        let name = match root.and_then(|root| root.name()) {
            Some(name) => style.element(name),
            None => style.element(&class.root_name()),
        };

        Ok(Schema {
            class,
            name,
            attributes,
            elements,
            text,
            version,
            revision,
            creator,
            caller: Caller::new(&scanner),
            decorator: Decorator::new(scanner.namespace().copied(), scanner.declarations().to_vec()),
            strict: root.is_none_or(|root| root.strict()),
            primitive,
        })
    }

    /// Matches constructor parameters to labels and checks that every
    /// read only label can be filled by some constructor.
    fn creator(class: &'static Class, constructors: &[ConstructorDescriptor], labels: &[&CacheLabel]) -> Result<Creator> {
        let read_only: Vec<&str> = labels
            .iter()
            .filter(|label| label.contact().is_read_only())
            .map(|label| label.key())
            .collect();

        let mut builders = Vec::with_capacity(constructors.len());
        let mut covered: Vec<&str> = Vec::new();
        for constructor in constructors {
            let mut parameters = Vec::with_capacity(constructor.parameters().len());
            for parameter in constructor.parameters() {
                let label = labels
                    .iter()
                    .find(|label| label.kind() == parameter.kind() && label.raw_name() == parameter.name())
                    .ok_or_else(|| {
                        Error::Constructor(format!(
                            "Parameter '{}' of constructor '{}' in {class} has no matching {}",
                            parameter.name(),
                            constructor.name(),
                            parameter.kind()
                        ))
                    })?;
                let expected = label.contact().class();
                if parameter.class().ty() != expected.ty() {
                    return Err(Error::Constructor(format!(
                        "Parameter '{}' of constructor '{}' in {class} is {} but {label} is {expected}",
                        parameter.name(),
                        constructor.name(),
                        parameter.class()
                    )));
                }
                if !covered.contains(&label.key()) {
                    covered.push(label.key());
                }
                parameters.push(Parameter::new(label.key(), parameter.name(), parameter.class()));
            }
            let excluded = read_only
                .iter()
                .filter(|key| !parameters.iter().any(|p| p.key() == **key))
                .map(|key| String::from(*key))
                .collect();
            builders.push(Builder::new(constructor.clone(), parameters, excluded));
        }

        if let Some(label) = labels
            .iter()
            .find(|label| label.contact().is_read_only() && !covered.contains(&label.key()))
        {
            return Err(Error::Constructor(format!(
                "{label} in {class} is read only and no constructor accepts it"
            )));
        }
        Ok(Creator::new(builders))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::Scanner;
    use crate::class::Typed;
    use crate::descriptor::{Access, Annotation, AttributeAnnotation, ClassDescriptor};
    use crate::descriptor::{ConstructorDescriptor, LabelKind, MemberDescriptor, ParameterDescriptor};
    use crate::label::{CacheLabel, LabelFactory};
    use crate::scan::FieldScanner;
    use crate::style::{HyphenStyle, IdentityStyle};
    use crate::transform::Transformer;
    use crate::{Error, Xml};

    fn id_attribute() -> CacheLabel {
        let member = MemberDescriptor::new(
            "id",
            u32::class,
            Access::Field {
                get: |_| None,
                set: None,
            },
        )
        .with_annotation(Annotation::Attribute(AttributeAnnotation::new()));
        let descriptor = ClassDescriptor::new().with_member(member);
        let contact = FieldScanner::scan(&descriptor, u8::class(), None, &[])
            .into_iter()
            .next()
            .unwrap();
        LabelFactory::label(contact, &IdentityStyle, &Transformer::new()).unwrap()
    }

    fn constructor(parameter: ParameterDescriptor) -> ConstructorDescriptor {
        ConstructorDescriptor::new("new", Vec::from([parameter]), |_| {
            Err(Error::Instantiation(String::from("never called")))
        })
    }

    #[derive(Xml, Default)]
    #[xml(order(elements("second", "first")))]
    struct Ordered {
        #[xml(element)]
        first: u8,
        #[xml(element)]
        second: u8,
        #[xml(attribute)]
        third: u8,
    }

    #[derive(Xml, Default)]
    struct Twice {
        #[xml(element(name = "value"))]
        first: u8,
        #[xml(element(name = "value"))]
        second: u8,
    }

    #[derive(Xml, Default)]
    struct Mixed {
        #[xml(text)]
        body: String,
        #[xml(element)]
        other: u8,
    }

    #[derive(Xml)]
    #[xml(constructor(Frozen::new, attribute("id")))]
    struct Frozen {
        #[xml(attribute, read_only)]
        id: u32,
        #[xml(attribute, read_only)]
        tag: String,
    }

    impl Frozen {
        fn new(id: u32) -> Self {
            Self { id, tag: String::new() }
        }
    }

    #[derive(Xml, Default)]
    struct Empty;

    #[test]
    fn order_moves_labels_forward() {
        let schema = Scanner::scan(Ordered::class(), &IdentityStyle, &Transformer::new()).unwrap();
        let names: Vec<&str> = schema.elements().names().collect();
        assert_eq!(names, ["second", "first"]);
        assert!(schema.is_strict());
        assert_eq!(schema.revision(), 1.0);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let error = Scanner::scan(Twice::class(), &IdentityStyle, &Transformer::new()).unwrap_err();
        assert!(matches!(error, Error::Persistence(message) if message.contains("declared twice")));
    }

    #[test]
    fn text_excludes_elements() {
        let error = Scanner::scan(Mixed::class(), &IdentityStyle, &Transformer::new()).unwrap_err();
        assert!(matches!(error, Error::Text(_)));
    }

    #[test]
    fn read_only_needs_a_constructor() {
        let error = Scanner::scan(Frozen::class(), &IdentityStyle, &Transformer::new()).unwrap_err();
        assert!(matches!(error, Error::Constructor(message) if message.contains("'tag'")));
    }

    #[test]
    fn parameter_kind_must_match() {
        let label = id_attribute();
        let constructors = [constructor(ParameterDescriptor::new(LabelKind::Element, "id", u32::class))];
        let error = Scanner::creator(u8::class(), &constructors, &[&label]).unwrap_err();
        assert!(matches!(error, Error::Constructor(message) if message.contains("no matching element")));

        let constructors = [constructor(ParameterDescriptor::new(LabelKind::Attribute, "id", u32::class))];
        let creator = Scanner::creator(u8::class(), &constructors, &[&label]).unwrap();
        assert_eq!(creator.builders().len(), 1);
    }

    #[test]
    fn parameter_type_must_match() {
        let label = id_attribute();
        let constructors = [constructor(ParameterDescriptor::new(LabelKind::Attribute, "id", i64::class))];
        let error = Scanner::creator(u8::class(), &constructors, &[&label]).unwrap_err();
        assert!(matches!(error, Error::Constructor(message) if message.contains("'id'")));
    }

    #[test]
    fn bare_type_is_primitive() {
        let schema = Scanner::scan(Empty::class(), &HyphenStyle, &Transformer::new()).unwrap();
        assert!(schema.is_primitive());
        assert_eq!(schema.name(), "empty");
    }
}
