//! Helpers called by code generated with `#[derive(Xml)]`.

use alloc::boxed::Box;
use alloc::format;

use crate::class::Typed;
use crate::{Bind, BoxError, Error, Result};

/// Takes the next constructor argument as a `T`.
///
/// An absent argument becomes `None` when `T` is an option.
pub fn argument<T: Typed>(arguments: &mut impl Iterator<Item = Option<Box<dyn Bind>>>, name: &str) -> Result<T> {
    let value = match arguments.next().flatten() {
        Some(value) => value,
        None => T::class().null_value().ok_or_else(|| {
            Error::Constructor(format!("No value for parameter '{name}' of {}", T::class()))
        })?,
    };
    value.take::<T>().map_err(|value| {
        Error::Constructor(format!(
            "Parameter '{name}' takes {} but was given {}",
            T::class(),
            value.dyn_class()
        ))
    })
}

#[inline]
pub fn hook<E: Into<BoxError>>(result: Result<(), E>) -> Result<(), BoxError> {
    result.map_err(Into::into)
}

pub fn replaced<R: Bind, E: Into<BoxError>>(result: Result<R, E>) -> Result<Option<Box<dyn Bind>>, BoxError> {
    match result {
        Ok(value) => Ok(Some(Box::new(value))),
        Err(e) => Err(e.into()),
    }
}

pub fn resolved<R: Bind, E: Into<BoxError>>(result: Result<R, E>) -> Result<Box<dyn Bind>, BoxError> {
    match result {
        Ok(value) => Ok(Box::new(value)),
        Err(e) => Err(e.into()),
    }
}

pub fn unknown_variant(text: &str, name: &str) -> BoxError {
    format!("'{text}' is not a variant of {name}").into()
}
