use alloc::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::Result;
use crate::class::Class;
use crate::schema::{Scanner, Schema};
use crate::style::Style;
use crate::transform::Transformer;
use crate::utils::TypeIdMap;

/// The schemas built so far, shared by every read and write of a persister.
///
/// A schema is built outside the lock; when two threads race, the first
/// one inserted is kept and the other is dropped.
#[derive(Default)]
pub struct SchemaCache {
    schemas: RwLock<TypeIdMap<Arc<Schema>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The schema of `class`, scanning it on first use.
    pub fn get(&self, class: &'static Class, style: &dyn Style, transformer: &Transformer) -> Result<Arc<Schema>> {
        let id = class.ty().id();
        if let Some(schema) = self.schemas.read().get(&id) {
            debug!("schema of {class} reused");
            return Ok(Arc::clone(schema));
        }
        let schema = Arc::new(Scanner::scan(class, style, transformer)?);
        let mut schemas = self.schemas.write();
        let schema = schemas.get_or_insert(id, || schema);
        debug!("schema of {class} cached");
        Ok(Arc::clone(schema))
    }

    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    pub fn clear(&self) {
        self.schemas.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::SchemaCache;
    use crate::class::Typed;
    use crate::style::IdentityStyle;
    use crate::transform::Transformer;
    use crate::{Error, Xml};

    #[derive(Xml, Default)]
    struct Point {
        #[xml(attribute)]
        x: i32,
        #[xml(attribute)]
        y: i32,
    }

    #[test]
    fn schemas_are_shared() {
        let cache = SchemaCache::new();
        let transformer = Transformer::new();
        let first = cache.get(Point::class(), &IdentityStyle, &transformer).unwrap();
        let second = cache.get(Point::class(), &IdentityStyle, &transformer).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn non_composites_are_rejected() {
        let cache = SchemaCache::new();
        let error = cache.get(u8::class(), &IdentityStyle, &Transformer::new()).unwrap_err();
        assert!(matches!(error, Error::Persistence(_)));
        assert!(cache.is_empty());
    }
}
