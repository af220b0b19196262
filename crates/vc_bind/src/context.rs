//! The state threaded through one read or write.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;

use vc_node::{InputNode, OutputNode};

use crate::class::Class;
use crate::filter::{Filter, Template};
use crate::schema::{Schema, SchemaCache};
use crate::session::Session;
use crate::strategy::{Strategy, Value};
use crate::style::Style;
use crate::transform::Transformer;
use crate::{Bind, Result};

// -----------------------------------------------------------------------------
// Support

/// The configuration of a persister, shared by all its calls.
pub struct Support {
    pub(crate) schemas: SchemaCache,
    pub(crate) transformer: Transformer,
    pub(crate) style: Box<dyn Style>,
    pub(crate) strategy: Box<dyn Strategy>,
    pub(crate) filter: Box<dyn Filter>,
}

// -----------------------------------------------------------------------------
// Context

/// Gives converters access to the configuration and the session of the
/// current call.
pub struct Context<'a> {
    support: &'a Support,
    session: &'a mut Session,
}

impl<'a> Context<'a> {
    pub(crate) fn new(support: &'a Support, session: &'a mut Session) -> Self {
        Self { support, session }
    }

    #[inline]
    pub fn session(&self) -> &Session {
        self.session
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut Session {
        self.session
    }

    #[inline]
    pub fn transformer(&self) -> &'a Transformer {
        &self.support.transformer
    }

    #[inline]
    pub fn style(&self) -> &'a dyn Style {
        &*self.support.style
    }

    /// Whether the call was made in strict mode.
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.session.is_strict()
    }

    /// The schema of a composite class, built on first use.
    pub fn schema(&self, class: &'static Class) -> Result<Arc<Schema>> {
        self.support
            .schemas
            .get(class, &*self.support.style, &self.support.transformer)
    }

    /// Lets the strategy consume the bookkeeping attributes of `node`.
    pub fn read_value(&mut self, declared: &'static Class, node: &InputNode) -> Result<Option<Box<dyn Value>>> {
        let mut attributes = node.attributes();
        self.support.strategy.read(declared, &mut attributes, self.session)
    }

    /// Lets the strategy describe `value` on `node`. Returns `true` when
    /// the strategy wrote the element completely.
    pub fn write_value(&mut self, declared: &'static Class, value: &dyn Bind, node: &OutputNode) -> Result<bool> {
        let mut attributes = node.attributes();
        self.support.strategy.write(declared, value, &mut attributes, self.session)
    }

    /// Expands `${name}` variables from the session and the filter.
    pub fn template<'t>(&self, text: &'t str) -> Cow<'t, str> {
        Template::new(&*self.support.filter, self.session).process(text)
    }

    /// The element name of `value` as a document root.
    pub fn root_name(&self, value: &dyn Bind) -> Result<String> {
        let class = value.dyn_class();
        let actual = Class::actual(value).map_or(class, |actual| actual.dyn_class());
        if actual.is_composite() && !self.transformer().is_primitive(actual) {
            return Ok(String::from(self.schema(actual)?.name()));
        }
        if actual.is_collection() {
            return Ok(self.style().element(&actual.ty().decapitalize()));
        }
        Ok(self.style().element(&class.root_name()))
    }
}
