//! [`Typed`](crate::class::Typed) implementations for std types.

mod collections;
mod primitives;
mod wrappers;
