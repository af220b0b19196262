use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::class::Class;
use crate::descriptor::ConstructorDescriptor;
use crate::instance::{Criteria, coerce};
use crate::{Bind, Error, Result};

/// A constructor parameter bound to the label with key `key`.
#[derive(Debug, Clone)]
pub struct Parameter {
    key: String,
    name: &'static str,
    class: &'static Class,
}

impl Parameter {
    pub fn new(key: impl Into<String>, name: &'static str, class: &'static Class) -> Self {
        Self {
            key: key.into(),
            name,
            class,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn class(&self) -> &'static Class {
        self.class
    }

    /// Whether the constructor accepts `None` for this parameter.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.class.is_optional()
    }
}

/// A constructor candidate.
#[derive(Debug, Clone)]
pub struct Builder {
    constructor: ConstructorDescriptor,
    parameters: Vec<Parameter>,
    // Read only labels this constructor has no parameter for.
    excluded: Vec<String>,
}

impl Builder {
    pub fn new(constructor: ConstructorDescriptor, parameters: Vec<Parameter>, excluded: Vec<String>) -> Self {
        Self {
            constructor,
            parameters,
            excluded,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.constructor.name()
    }

    #[inline]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The number of parameters with a value, or `None` when the
    /// constructor cannot be used: a required parameter has no value,
    /// or a read only value would be left over.
    pub fn score(&self, criteria: &Criteria<'_>) -> Option<usize> {
        if self.excluded.iter().any(|key| criteria.contains(key)) {
            return None;
        }
        let mut score = 0;
        for parameter in &self.parameters {
            if criteria.contains(parameter.key()) {
                score += 1;
            } else if !parameter.is_optional() {
                return None;
            }
        }
        Some(score)
    }

    /// Calls the constructor with the values of its parameters, taking
    /// them out of `criteria`.
    pub fn instantiate(&self, criteria: &mut Criteria<'_>) -> Result<Box<dyn Bind>> {
        let mut arguments = Vec::with_capacity(self.parameters.len());
        for parameter in &self.parameters {
            let argument = match criteria.remove(parameter.key()) {
                Some(variable) => Some(coerce(parameter.class(), variable.into_value()).map_err(|_| {
                    Error::Constructor(format!(
                        "Value of parameter '{}' does not match {}",
                        parameter.name(),
                        parameter.class()
                    ))
                })?),
                None => None,
            };
            arguments.push(argument);
        }
        self.constructor.invoke(arguments)
    }
}
