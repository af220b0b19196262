//! Text conversions for primitive values.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::TypeId;

use crate::class::{Class, Typed};
use crate::utils::TypeIdMap;
use crate::{Bind, BoxError, Error, Result};

type ReadTransform = Arc<dyn Fn(&str) -> Result<Box<dyn Bind>, BoxError> + Send + Sync>;
type WriteTransform = Arc<dyn Fn(&dyn Bind) -> Option<String> + Send + Sync>;

#[derive(Clone)]
struct Transform {
    read: ReadTransform,
    write: WriteTransform,
}

// -----------------------------------------------------------------------------
// Transformer

/// Converts primitives to and from text.
///
/// Built in primitives convert through their class. Registered types
/// take precedence and are treated as primitives, whatever their class.
///
/// # Examples
///
/// ```
/// use vc_bind::transform::Transformer;
/// use vc_bind::class::Typed;
///
/// let mut transformer = Transformer::new();
/// transformer.register::<bool>(
///     |text| Ok(text == "yes"),
///     |value| String::from(if *value { "yes" } else { "no" }),
/// );
///
/// let value = transformer.read(bool::class(), "yes").unwrap();
/// assert_eq!(value.downcast_ref::<bool>(), Some(&true));
/// assert_eq!(transformer.write(&*value).unwrap(), "yes");
/// ```
#[derive(Clone, Default)]
pub struct Transformer {
    transforms: TypeIdMap<Transform>,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom conversion for `T`, replacing any earlier one.
    pub fn register<T: Typed>(
        &mut self,
        read: impl Fn(&str) -> Result<T, BoxError> + Send + Sync + 'static,
        write: impl Fn(&T) -> String + Send + Sync + 'static,
    ) {
        let transform = Transform {
            read: Arc::new(move |text| read(text).map(|value| Box::new(value) as Box<dyn Bind>)),
            write: Arc::new(move |value| value.downcast_ref::<T>().map(&write)),
        };
        self.transforms.insert(TypeId::of::<T>(), transform);
    }

    /// Whether values of `class` are written as text.
    pub fn is_primitive(&self, class: &Class) -> bool {
        class.is_primitive() || self.transforms.contains(&class.ty().id())
    }

    pub fn read(&self, class: &Class, text: &str) -> Result<Box<dyn Bind>> {
        let result = match self.transforms.get(&class.ty().id()) {
            Some(transform) => (transform.read)(text),
            None => match class.as_primitive() {
                Some(info) => info.read(text),
                None => return Err(Error::Transform(format!("Transform of {class} not supported"))),
            },
        };
        result.map_err(|e| Error::Transform(format!("Unable to read '{text}' as {class}: {e}")))
    }

    /// Writes `value` as text, looking through options and pointers
    /// unless a transform is registered for the wrapper itself.
    pub fn write(&self, value: &dyn Bind) -> Result<String> {
        let value = match self.transforms.contains(&value.dyn_class().ty().id()) {
            true => value,
            false => Class::actual(value).unwrap_or(value),
        };
        let class = value.dyn_class();
        let text = match self.transforms.get(&class.ty().id()) {
            Some(transform) => (transform.write)(value),
            None => class.as_primitive().and_then(|info| info.write(value)),
        };
        text.ok_or_else(|| Error::Transform(format!("Transform of {class} not supported")))
    }
}

#[cfg(test)]
mod tests {
    use super::Transformer;
    use crate::Error;
    use crate::class::Typed;

    #[test]
    fn builtin_primitives() {
        let transformer = Transformer::new();
        let value = transformer.read(i64::class(), "-12").unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&-12));
        assert_eq!(transformer.write(&*value).unwrap(), "-12");
    }

    #[test]
    fn malformed_text_is_a_transform_error() {
        let transformer = Transformer::new();
        let err = transformer.read(u8::class(), "300").unwrap_err();
        assert!(matches!(err, Error::Transform(_)));
    }

    #[test]
    fn collections_are_not_primitive() {
        let transformer = Transformer::new();
        assert!(!transformer.is_primitive(<Vec<u8>>::class()));
        assert!(transformer.read(<Vec<u8>>::class(), "1").is_err());
    }
}
