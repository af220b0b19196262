//! Compile time schema descriptors.
//!
//! `#[derive(Xml)]` turns `#[xml(...)]` attributes into these values;
//! the [`scan`](crate::scan) module reads them back when building a schema.

mod annotation;
mod class;
mod constructor;
mod member;

pub use annotation::{Annotation, LabelKind};
pub use annotation::{AttributeAnnotation, ElementAnnotation, TextAnnotation, VersionAnnotation};
pub use annotation::{ElementArrayAnnotation, ElementListAnnotation, ElementMapAnnotation};
pub use class::{Callbacks, ClassDescriptor, CommitFn, DefaultDescriptor, DefaultType};
pub use class::{PersistFn, ReplaceFn, ResolveFn};
pub use class::{OrderDescriptor, RootDescriptor};
pub use constructor::{ConstructorDescriptor, InvokeFn, ParameterDescriptor};
pub use member::{Access, BaseDescriptor, Getter, MemberDescriptor, NamespaceDescriptor, Setter};
