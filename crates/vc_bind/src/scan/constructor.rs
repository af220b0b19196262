use alloc::format;
use alloc::vec::Vec;

use crate::class::Class;
use crate::descriptor::{ClassDescriptor, ConstructorDescriptor};
use crate::{Error, Result};

/// Collects the constructors of a composite type.
///
/// Constructors are not inherited: bases are built by the constructor
/// of the type embedding them.
pub struct ConstructorScanner;

impl ConstructorScanner {
    pub fn scan(descriptor: &ClassDescriptor, owner: &'static Class) -> Result<Vec<ConstructorDescriptor>> {
        for constructor in descriptor.constructors() {
            let parameters = constructor.parameters();
            for (index, parameter) in parameters.iter().enumerate() {
                let repeated = parameters[..index]
                    .iter()
                    .any(|p| p.kind() == parameter.kind() && p.name() == parameter.name());
                if repeated {
                    return Err(Error::Constructor(format!(
                        "Parameter '{}' declared twice in constructor '{}' of {owner}",
                        parameter.name(),
                        constructor.name()
                    )));
                }
            }
        }
        Ok(descriptor.constructors().to_vec())
    }
}
