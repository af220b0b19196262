//! Discovery of the bindable members of a composite type.
//!
//! [`ClassScanner`] walks a type and its `extends` bases, collecting
//! type level directives and a [`Contact`] per bound member, found by
//! [`FieldScanner`] and [`MethodScanner`].

mod class;
mod constructor;
mod contact;
mod field;
mod method;

pub use class::{ClassScanner, Hook};
pub use constructor::ConstructorScanner;
pub use contact::Contact;
pub use field::FieldScanner;
pub use method::{MethodPart, MethodScanner, MethodType};

use crate::class::Class;
use crate::descriptor::{Annotation, DefaultDescriptor, DefaultType, MemberDescriptor};
use crate::descriptor::{ElementAnnotation, ElementArrayAnnotation};
use crate::descriptor::{ElementListAnnotation, ElementMapAnnotation};

/// The directive binding `member`: its own, or one synthesized from the
/// member class when a `default` rule of the right access covers it.
pub(crate) fn annotation_of(
    member: &MemberDescriptor,
    default: Option<&DefaultDescriptor>,
    access: DefaultType,
) -> Option<Annotation> {
    if let Some(annotation) = member.annotation() {
        return Some(*annotation);
    }
    let default = default.filter(|default| default.access() == access)?;
    let annotation = match member.class().strip_optional() {
        Class::List(_) => Annotation::ElementList(ElementListAnnotation::new()),
        Class::Array(_) => Annotation::ElementArray(ElementArrayAnnotation::new()),
        Class::Map(_) => Annotation::ElementMap(ElementMapAnnotation::new()),
        _ => Annotation::Element(ElementAnnotation::new()),
    };
    Some(if default.required() {
        annotation
    } else {
        annotation.relaxed()
    })
}

#[cfg(test)]
mod tests {
    use super::annotation_of;
    use crate::class::{Class, Typed};
    use crate::descriptor::{Access, Annotation, DefaultDescriptor, DefaultType, LabelKind};
    use crate::descriptor::{AttributeAnnotation, MemberDescriptor};

    fn member(class: fn() -> &'static Class) -> MemberDescriptor {
        MemberDescriptor::new(
            "value",
            class,
            Access::Field {
                get: |_| None,
                set: None,
            },
        )
    }

    #[test]
    fn synthesized_kind_follows_class() {
        let default = DefaultDescriptor::new(DefaultType::Field);
        let list = annotation_of(&member(<Vec<u8>>::class), Some(&default), DefaultType::Field).unwrap();
        assert_eq!(list.kind(), LabelKind::ElementList);
        assert!(!list.required());

        let element = annotation_of(&member(u8::class), Some(&default), DefaultType::Field).unwrap();
        assert_eq!(element.kind(), LabelKind::Element);
    }

    #[test]
    fn default_rule_of_other_access_is_ignored() {
        let default = DefaultDescriptor::new(DefaultType::Property);
        assert!(annotation_of(&member(u8::class), Some(&default), DefaultType::Field).is_none());
    }

    #[test]
    fn explicit_annotation_wins() {
        let explicit = Annotation::Attribute(AttributeAnnotation::new());
        let member = member(u8::class).with_annotation(explicit);
        assert_eq!(annotation_of(&member, None, DefaultType::Field), Some(explicit));
    }
}
