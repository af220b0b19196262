use crate::Result;
use crate::descriptor::Annotation;
use crate::label::{AttributeLabel, CacheLabel, ElementArrayLabel, ElementLabel};
use crate::label::{ElementListLabel, ElementMapLabel, TextLabel, VersionLabel};
use crate::scan::Contact;
use crate::style::Style;
use crate::transform::Transformer;

/// Builds the label of a contact from its directive.
pub struct LabelFactory;

impl LabelFactory {
    /// Picks the label variant for the contact's kind, checks it against
    /// the member class and caches the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_bind::Xml;
    /// use vc_bind::descriptor::LabelKind;
    /// use vc_bind::label::LabelFactory;
    /// use vc_bind::scan::ClassScanner;
    /// use vc_bind::style::HyphenStyle;
    /// use vc_bind::transform::Transformer;
    /// use vc_bind::class::Typed;
    ///
    /// #[derive(Xml, Default)]
    /// struct Order {
    ///     #[xml(attribute)]
    ///     order_id: u32,
    ///     #[xml(element_list(entry = "line"))]
    ///     order_lines: Vec<String>,
    /// }
    ///
    /// let scanner = ClassScanner::new(Order::class()).unwrap();
    /// let style = HyphenStyle;
    /// let transformer = Transformer::new();
    /// let labels: Vec<_> = scanner
    ///     .contacts()
    ///     .iter()
    ///     .map(|contact| LabelFactory::label(contact.clone(), &style, &transformer).unwrap())
    ///     .collect();
    ///
    /// assert_eq!(labels[0].name(), "order-id");
    /// assert_eq!(labels[1].kind(), LabelKind::ElementList);
    /// assert_eq!(labels[1].name(), "order-lines");
    /// assert_eq!(labels[1].entry(), Some("line"));
    /// ```
    pub fn label(contact: Contact, style: &dyn Style, transformer: &Transformer) -> Result<CacheLabel> {
        match *contact.annotation() {
            Annotation::Attribute(annotation) => {
                let label = AttributeLabel::new(contact, annotation, style, transformer)?;
                CacheLabel::new(&label, style, transformer)
            }
            Annotation::Element(annotation) => {
                let label = ElementLabel::new(contact, annotation, style)?;
                CacheLabel::new(&label, style, transformer)
            }
            Annotation::ElementList(annotation) => {
                let label = ElementListLabel::new(contact, annotation, style)?;
                CacheLabel::new(&label, style, transformer)
            }
            Annotation::ElementArray(annotation) => {
                let label = ElementArrayLabel::new(contact, annotation, style)?;
                CacheLabel::new(&label, style, transformer)
            }
            Annotation::ElementMap(annotation) => {
                let label = ElementMapLabel::new(contact, annotation, style)?;
                CacheLabel::new(&label, style, transformer)
            }
            Annotation::Text(annotation) => {
                let label = TextLabel::new(contact, annotation, transformer)?;
                CacheLabel::new(&label, style, transformer)
            }
            Annotation::Version(annotation) => {
                let label = VersionLabel::new(contact, annotation, style)?;
                CacheLabel::new(&label, style, transformer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::LabelFactory;
    use crate::Error;
    use crate::class::Typed;
    use crate::descriptor::{Access, Annotation, AttributeAnnotation, ClassDescriptor, ElementAnnotation};
    use crate::descriptor::{ElementMapAnnotation, MemberDescriptor, VersionAnnotation};
    use crate::scan::{Contact, FieldScanner};
    use crate::style::{CamelCaseStyle, IdentityStyle};
    use crate::transform::Transformer;

    fn contact<T: Typed>(name: &'static str, annotation: Annotation) -> Contact {
        let member = MemberDescriptor::new(
            name,
            T::class,
            Access::Field {
                get: |_| None,
                set: None,
            },
        )
        .with_annotation(annotation);
        let descriptor = ClassDescriptor::new().with_member(member);
        FieldScanner::scan(&descriptor, u8::class(), None, &[])
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn names_are_styled() {
        let transformer = Transformer::new();
        let attribute = contact::<u32>("item_count", Annotation::Attribute(AttributeAnnotation::new()));
        let label = LabelFactory::label(attribute, &CamelCaseStyle, &transformer).unwrap();
        assert_eq!(label.name(), "itemCount");
        assert_eq!(label.raw_name(), "item_count");

        let element = contact::<String>("title", Annotation::Element(ElementAnnotation::new().with_name("book_title")));
        let label = LabelFactory::label(element, &CamelCaseStyle, &transformer).unwrap();
        assert_eq!(label.name(), "BookTitle");
        assert_eq!(label.raw_name(), "book_title");
    }

    #[test]
    fn kind_must_fit_class() {
        let transformer = Transformer::new();
        let attribute = contact::<Vec<u8>>("values", Annotation::Attribute(AttributeAnnotation::new()));
        let error = LabelFactory::label(attribute, &IdentityStyle, &transformer).unwrap_err();
        assert!(matches!(error, Error::Attribute(_)));

        let element = contact::<Vec<u8>>("values", Annotation::Element(ElementAnnotation::new()));
        let error = LabelFactory::label(element, &IdentityStyle, &transformer).unwrap_err();
        assert!(matches!(error, Error::Persistence(_)));

        let map = contact::<Vec<u8>>("values", Annotation::ElementMap(ElementMapAnnotation::new()));
        let error = LabelFactory::label(map, &IdentityStyle, &transformer).unwrap_err();
        assert!(matches!(error, Error::Persistence(_)));

        let version = contact::<u32>("version", Annotation::Version(VersionAnnotation::new()));
        let error = LabelFactory::label(version, &IdentityStyle, &transformer).unwrap_err();
        assert!(matches!(error, Error::Attribute(_)));
    }

    #[test]
    fn map_entry_defaults() {
        let transformer = Transformer::new();
        let map = contact::<BTreeMap<String, u8>>(
            "scores",
            Annotation::ElementMap(ElementMapAnnotation::new().with_inline(true)),
        );
        let label = LabelFactory::label(map, &IdentityStyle, &transformer).unwrap();
        assert_eq!(label.name(), "entry");
        assert_eq!(label.entry(), Some("entry"));
        assert!(label.is_inline());
        assert!(label.is_collection());
    }
}
