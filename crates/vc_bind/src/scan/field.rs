use alloc::vec::Vec;

use crate::class::Class;
use crate::descriptor::{Access, BaseDescriptor, ClassDescriptor, DefaultDescriptor, DefaultType};
use crate::scan::{Contact, annotation_of};

/// Collects the field contacts declared directly on one struct.
pub struct FieldScanner;

impl FieldScanner {
    /// `path` leads from the scanned type to `owner`.
    pub fn scan(
        descriptor: &ClassDescriptor,
        owner: &'static Class,
        default: Option<&DefaultDescriptor>,
        path: &[BaseDescriptor],
    ) -> Vec<Contact> {
        descriptor
            .members()
            .iter()
            .filter(|member| matches!(member.access(), Access::Field { .. }))
            .filter_map(|member| {
                let annotation = annotation_of(member, default, DefaultType::Field)?;
                Some(Contact::new(
                    member.name(),
                    member.class(),
                    owner,
                    annotation,
                    *member.access(),
                    path.to_vec(),
                    member.namespace().copied(),
                    member.since(),
                ))
            })
            .collect()
    }
}
