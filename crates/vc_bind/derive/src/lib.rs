//! See [`derive Xml`](derive_xml).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static XML_ATTRIBUTE_NAME: &str = "xml";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # XML Binding Derivation
///
/// `#[derive(Xml)]` implements `Typed` for a struct or a unit enum.
///
/// - A struct with named fields (or a unit struct) becomes a `Composite`
///   class whose `ClassDescriptor` lists the members bound by `#[xml(..)]`.
/// - An enum of unit variants becomes a `Primitive` written as the
///   variant name.
///
/// Generic types get one class per instantiation, every type parameter
/// must implement `Typed`.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Xml, Default)]
/// #[xml(root = "order", strict = false)]
/// #[xml(order(elements("customer", "lines"), attributes("id")))]
/// #[xml(namespace(reference = "http://example.com/order", prefix = "o"))]
/// #[xml(declare(reference = "http://example.com/common", prefix = "c"))]
/// struct Order { /* ... */ }
/// ```
///
/// - `root` / `root = "name"`: the element name used when the type is
///   written as a document root or entry.
/// - `strict = false`: unmatched nodes are skipped when reading this type.
/// - `order(elements(..), attributes(..))`: names written first, in order.
/// - `namespace(..)` qualifies the element, `declare(..)` adds prefix
///   declarations to it.
/// - `default = "field"` / `default = "property"` / `default(field, required)`:
///   unannotated members are bound as elements (lists, arrays and maps as
///   the matching collection), optional unless `required` is given.
/// - `path = "a::b::Name"`: overrides the path written in `class`
///   attributes.
///
/// ## Member Attributes
///
/// Each member takes at most one label directive:
///
/// | directive | options |
/// |-----------|---------|
/// | `attribute` | `name`, `required`, `empty = "text"` |
/// | `element` | `name`, `required`, `data`, `empty = "text"` |
/// | `element_list` | `name`, `entry`, `inline`, `required`, `data`, `empty = bool` |
/// | `element_array` | `name`, `entry`, `required`, `data`, `empty = bool` |
/// | `element_map` | `name`, `entry`, `key`, `value`, `attribute`, `inline`, `required`, `data`, `empty = bool` |
/// | `text` | `required`, `data`, `empty = "text"` |
/// | `version` | `name`, `revision = 1.1`, `required` |
///
/// Members of type `Option<T>` are not required unless `required` is
/// given explicitly. Other member directives:
///
/// - `skip`: never bound.
/// - `extends`: the field is the base of this type, its members are
///   bound as if declared here.
/// - `read_only`: the field is only filled through a constructor.
/// - `get = "method"`, `set = "method"`: bind through an accessor pair,
///   `get` returns `&T` and `set` takes `T`.
/// - `namespace(reference = "..", prefix = "..")`
/// - `since = 1.1`: the revision that introduced the member.
///
/// ## Constructors
///
/// Types without a `constructor` directive are created with
/// `Default::default` and filled member by member. Read only members are
/// filled by a constructor naming them:
///
/// ```rust, ignore
/// #[derive(Xml)]
/// #[xml(constructor(Point::new, attribute("x"), attribute("y")))]
/// #[xml(constructor(Point::origin))]
/// struct Point {
///     #[xml(attribute, read_only)]
///     x: i32,
///     #[xml(attribute, read_only)]
///     y: i32,
/// }
/// ```
///
/// A parameter names the label it takes, the type is the type of the
/// member bound to it; `attribute("x", i64)` gives it explicitly.
/// `constructor(default)` adds `Default::default` next to others.
///
/// ## Callbacks
///
/// `commit`, `validate`, `persist`, `complete`, `replace` and `resolve`
/// name inherent methods:
///
/// ```rust, ignore
/// #[derive(Xml, Default)]
/// #[xml(commit = "on_commit", persist = "on_persist", resolve = "on_resolve")]
/// struct Config { /* ... */ }
///
/// impl Config {
///     fn on_commit(&mut self, session: &mut Session) -> Result<(), String> { /* ... */ }
///     fn on_persist(&self, session: &mut Session) -> Result<(), String> { /* ... */ }
///     fn on_resolve(self, session: &mut Session) -> Result<Config, String> { /* ... */ }
/// }
/// ```
///
/// `replace` takes `&self` and returns the value to write instead.
///
/// ## Enums
///
/// ```rust, ignore
/// #[derive(Xml)]
/// enum Status {
///     Active,
///     #[xml(name = "on-hold")]
///     OnHold,
/// }
/// ```
#[proc_macro_derive(Xml, attributes(xml))]
pub fn derive_xml(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    impls::match_xml_impls(&ast).into()
}
