use alloc::format;

use vc_node::InputNode;

use crate::class::Class;
use crate::context::Context;
use crate::instance::Instance;
use crate::strategy::declared_target;
use crate::{Error, Result};

/// The class built when an element names no type: the declared class
/// without options and pointers, or the default variant of a trait object.
fn default_class(declared: &'static Class) -> Result<&'static Class> {
    let target = declared_target(declared);
    match target {
        Class::Dynamic(info) => match info.default_variant() {
            Some(variant) => Ok(variant.class()),
            None => Err(Error::Instantiation(format!(
                "Cannot instantiate {target}, it has no default variant"
            ))),
        },
        _ => Ok(target),
    }
}

fn resolve(context: &mut Context<'_>, node: &InputNode, declared: &'static Class) -> Result<Instance> {
    let Some(value) = context.read_value(declared, node)? else {
        return Ok(Instance::of_class(declared, default_class(declared)?));
    };
    if value.is_reference() {
        return Ok(Instance::of_value(declared, declared, value));
    }
    let class = match value.class() {
        Some(class) if declared.is_assignable_from(class) => class,
        Some(class) => {
            return Err(Error::Instantiation(format!(
                "Incompatible {class} for {declared} at {}",
                node.position()
            )));
        }
        None => default_class(declared)?,
    };
    Ok(Instance::of_value(declared, class, value))
}

fn expect(
    instance: Instance,
    node: &InputNode,
    accept: impl FnOnce(&'static Class) -> bool,
    what: &str,
) -> Result<Instance> {
    let class = instance.class();
    if instance.is_reference() || accept(class) {
        Ok(instance)
    } else {
        Err(Error::Instantiation(format!(
            "Cannot instantiate {class} as {what} at {}",
            node.position()
        )))
    }
}

// -----------------------------------------------------------------------------
// Factories

/// Resolves the element of a composite or trait object value.
#[derive(Debug, Clone, Copy)]
pub struct ObjectFactory {
    declared: &'static Class,
}

impl ObjectFactory {
    #[inline]
    pub fn new(declared: &'static Class) -> Self {
        Self { declared }
    }

    pub fn instance(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Instance> {
        let instance = resolve(context, node, self.declared)?;
        let transformer = context.transformer();
        expect(
            instance,
            node,
            |class| class.is_composite() || transformer.is_primitive(class),
            "an object",
        )
    }
}

/// Resolves the container element of a list.
#[derive(Debug, Clone, Copy)]
pub struct CollectionFactory {
    declared: &'static Class,
}

impl CollectionFactory {
    #[inline]
    pub fn new(declared: &'static Class) -> Self {
        Self { declared }
    }

    pub fn instance(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Instance> {
        let instance = resolve(context, node, self.declared)?;
        expect(instance, node, Class::is_list, "a list")
    }

    /// The instance of an inline list, which has no element of its own.
    pub fn inline(&self) -> Result<Instance> {
        let class = default_class(self.declared)?;
        match class {
            Class::List(_) => Ok(Instance::of_class(self.declared, class)),
            _ => Err(Error::Instantiation(format!("Cannot instantiate {class} as a list"))),
        }
    }
}

/// Resolves the container element of a map.
#[derive(Debug, Clone, Copy)]
pub struct MapFactory {
    declared: &'static Class,
}

impl MapFactory {
    #[inline]
    pub fn new(declared: &'static Class) -> Self {
        Self { declared }
    }

    pub fn instance(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Instance> {
        let instance = resolve(context, node, self.declared)?;
        expect(instance, node, Class::is_map, "a map")
    }

    /// The instance of an inline map, which has no element of its own.
    pub fn inline(&self) -> Result<Instance> {
        let class = default_class(self.declared)?;
        match class {
            Class::Map(_) => Ok(Instance::of_class(self.declared, class)),
            _ => Err(Error::Instantiation(format!("Cannot instantiate {class} as a map"))),
        }
    }
}

/// Resolves the container element of an array, including its length.
#[derive(Debug, Clone, Copy)]
pub struct ArrayFactory {
    declared: &'static Class,
}

impl ArrayFactory {
    #[inline]
    pub fn new(declared: &'static Class) -> Self {
        Self { declared }
    }

    pub fn instance(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Instance> {
        let instance = resolve(context, node, self.declared)?;
        expect(instance, node, Class::is_array, "an array")
    }
}

/// Resolves an element holding text.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveFactory {
    declared: &'static Class,
}

impl PrimitiveFactory {
    #[inline]
    pub fn new(declared: &'static Class) -> Self {
        Self { declared }
    }

    pub fn instance(&self, context: &mut Context<'_>, node: &InputNode) -> Result<Instance> {
        let instance = resolve(context, node, self.declared)?;
        let transformer = context.transformer();
        expect(instance, node, |class| transformer.is_primitive(class), "a primitive")
    }
}
