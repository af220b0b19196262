//! The entry point: reading and writing typed values as documents.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

use log::debug;
use vc_node::{Format, NodeReader, NodeWriter};

use crate::class::Typed;
use crate::context::{Context, Support};
use crate::convert::Traverser;
use crate::filter::{EmptyFilter, Filter};
use crate::schema::{Schema, SchemaCache};
use crate::session::Session;
use crate::strategy::{Strategy, TreeStrategy};
use crate::style::{IdentityStyle, Style};
use crate::transform::Transformer;
use crate::{Bind, Error, Result};

/// Reads and writes values of [`Typed`] types.
///
/// A persister owns the schema cache, so keeping one around for many
/// calls avoids scanning types again. It is `Send + Sync` and may be
/// shared between threads.
///
/// # Examples
///
/// ```
/// use vc_bind::{Persister, Xml};
///
/// #[derive(Xml, Default, Debug, PartialEq)]
/// #[xml(root = "book")]
/// struct Book {
///     #[xml(attribute)]
///     isbn: String,
///     #[xml(element)]
///     title: String,
///     #[xml(element_list(entry = "author"))]
///     authors: Vec<String>,
/// }
///
/// let persister = Persister::new().with_format(vc_bind::vc_node::Format::new().with_indent(0));
/// let book = Book {
///     isbn: String::from("0-441-17271-7"),
///     title: String::from("Dune"),
///     authors: vec![String::from("Frank Herbert")],
/// };
///
/// let xml = persister.write(&book).unwrap();
/// assert_eq!(
///     xml,
///     r#"<book isbn="0-441-17271-7"><title>Dune</title><authors><author>Frank Herbert</author></authors></book>"#,
/// );
/// assert_eq!(persister.read::<Book>(&xml).unwrap(), book);
/// ```
pub struct Persister {
    support: Support,
    format: Format,
}

impl Default for Persister {
    fn default() -> Self {
        Self::new()
    }
}

impl Persister {
    /// A persister with the [`TreeStrategy`], identity names, no
    /// filter and the default [`Format`].
    pub fn new() -> Self {
        Self {
            support: Support {
                schemas: SchemaCache::new(),
                transformer: Transformer::new(),
                style: Box::new(IdentityStyle),
                strategy: Box::new(TreeStrategy::new()),
                filter: Box::new(EmptyFilter),
            },
            format: Format::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.support.strategy = Box::new(strategy);
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets the source of `${name}` variables not found in the session.
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.support.filter = Box::new(filter);
        self
    }

    /// Sets the naming style. Cached schemas are dropped, their names
    /// were derived with the previous style.
    pub fn with_style(mut self, style: impl Style + 'static) -> Self {
        self.support.style = Box::new(style);
        self.support.schemas.clear();
        self
    }

    /// Sets the text conversions. Cached schemas are dropped.
    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.support.transformer = transformer;
        self.support.schemas.clear();
        self
    }

    #[inline]
    pub fn format(&self) -> &Format {
        &self.format
    }

    #[inline]
    pub fn transformer(&self) -> &Transformer {
        &self.support.transformer
    }

    /// The schema of `T`, scanning it on first use.
    pub fn schema<T: Typed>(&self) -> Result<Arc<Schema>> {
        self.support
            .schemas
            .get(T::class(), &*self.support.style, &self.support.transformer)
    }

    /// Reads a value in strict mode.
    pub fn read<T: Typed>(&self, source: &str) -> Result<T> {
        self.read_with(source, true)
    }

    /// Reads a value; with `strict` off, unmatched nodes are skipped.
    ///
    /// A type declared with `strict = false` is always read leniently.
    pub fn read_with<T: Typed>(&self, source: &str, strict: bool) -> Result<T> {
        self.read_session(source, &mut Session::new(strict))
    }

    /// Reads a value with a caller supplied session, visible to callbacks
    /// and templates.
    pub fn read_session<T: Typed>(&self, source: &str, session: &mut Session) -> Result<T> {
        let node = NodeReader::read_str(source)?;
        session.reset_state();
        let mut context = Context::new(&self.support, session);
        let value = Traverser::read(&mut context, &node, T::class())?;
        debug!("read {} from '{}'", T::class(), node.name());
        take(value)
    }

    pub fn read_from<T: Typed>(&self, reader: impl std::io::Read) -> Result<T> {
        let node = NodeReader::read(reader)?;
        let mut session = Session::default();
        let mut context = Context::new(&self.support, &mut session);
        take(Traverser::read(&mut context, &node, T::class())?)
    }

    /// Checks a document against the schema of `T` without building values.
    pub fn validate<T: Typed>(&self, source: &str) -> Result<()> {
        let node = NodeReader::read_str(source)?;
        let mut session = Session::default();
        let mut context = Context::new(&self.support, &mut session);
        Traverser::validate(&mut context, &node, T::class())
    }

    pub fn write<T: Typed>(&self, value: &T) -> Result<String> {
        self.write_session(value, &mut Session::default())
    }

    /// Writes a value with a caller supplied session.
    pub fn write_session<T: Typed>(&self, value: &T, session: &mut Session) -> Result<String> {
        let writer = self.render(value, session)?;
        Ok(writer.finish()?)
    }

    pub fn write_to<T: Typed>(&self, value: &T, out: impl std::io::Write) -> Result<()> {
        let writer = self.render(value, &mut Session::default())?;
        Ok(writer.finish_to(out)?)
    }

    fn render(&self, value: &dyn Bind, session: &mut Session) -> Result<NodeWriter> {
        session.reset_state();
        let writer = NodeWriter::new(self.format.clone());
        let document = writer.document();
        let mut context = Context::new(&self.support, session);
        let name = context.root_name(value)?;
        Traverser::write(&mut context, &document, value, &name)?;
        debug!("wrote {} as '{name}'", value.dyn_class());
        Ok(writer)
    }
}

fn take<T: Typed>(value: Box<dyn Bind>) -> Result<T> {
    value.take::<T>().map_err(|value| {
        Error::Instantiation(format!("Read {} where {} was expected", value.dyn_class(), T::class()))
    })
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec::Vec;

    use pretty_assertions::assert_eq;
    use vc_node::Format;

    use super::Persister;
    use crate::filter::MapFilter;
    use crate::session::Session;
    use crate::strategy::CycleStrategy;
    use crate::style::HyphenStyle;
    use crate::{Bind, Error, Xml, impl_dynamic};

    fn persister() -> Persister {
        Persister::new().with_format(Format::new().with_indent(0))
    }

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "book")]
    struct Book {
        #[xml(attribute)]
        isbn: String,
        #[xml(element)]
        title: String,
        #[xml(element(required = false))]
        subtitle: Option<String>,
    }

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: String::from(isbn),
            title: String::from(title),
            subtitle: None,
        }
    }

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "library")]
    struct Library {
        #[xml(attribute)]
        name: String,
        #[xml(element_list(inline, entry = "book"))]
        books: Vec<Book>,
        #[xml(element_list(entry = "tag", empty = false, required = false))]
        tags: Vec<String>,
        #[xml(element_map(entry = "property", key = "name", attribute, required = false))]
        properties: BTreeMap<String, String>,
    }

    #[test]
    fn nested_round_trip() {
        let mut library = Library {
            name: String::from("city"),
            books: Vec::from([book("1", "Dune"), book("2", "Emma")]),
            tags: Vec::new(),
            properties: BTreeMap::new(),
        };
        library.books[1].subtitle = Some(String::from("A Novel"));
        library.properties.insert(String::from("open"), String::from("9-17"));

        let persister = persister();
        let xml = persister.write(&library).unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<library name="city">"#,
                r#"<book isbn="1"><title>Dune</title></book>"#,
                r#"<book isbn="2"><title>Emma</title><subtitle>A Novel</subtitle></book>"#,
                r#"<properties><property name="open">9-17</property></properties>"#,
                "</library>",
            )
        );
        assert_eq!(persister.read::<Library>(&xml).unwrap(), library);
    }

    #[test]
    fn indented_output_reads_back() {
        let persister = Persister::new();
        let value = book("7", "Ubik");
        let xml = persister.write(&value).unwrap();
        assert_eq!(xml, "<book isbn=\"7\">\n   <title>Ubik</title>\n</book>");
        assert_eq!(persister.read::<Book>(&xml).unwrap(), value);
    }

    #[test]
    fn writer_and_reader_streams() {
        let persister = persister();
        let mut out = Vec::new();
        persister.write_to(&book("3", "Kim"), &mut out).unwrap();
        let value: Book = persister.read_from(out.as_slice()).unwrap();
        assert_eq!(value, book("3", "Kim"));
    }

    #[test]
    fn schemas_are_cached() {
        let persister = persister();
        let first = persister.schema::<Book>().unwrap();
        let second = persister.schema::<Book>().unwrap();
        assert!(alloc::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "book");
    }

    #[test]
    fn primitive_and_list_roots() {
        let persister = persister();
        assert_eq!(persister.write(&5_u32).unwrap(), "<u32>5</u32>");
        assert_eq!(persister.read::<u32>("<u32>5</u32>").unwrap(), 5);

        let names = Vec::from([String::from("a"), String::from("b")]);
        let xml = persister.write(&names).unwrap();
        assert_eq!(xml, "<vec><string>a</string><string>b</string></vec>");
        assert_eq!(persister.read::<Vec<String>>(&xml).unwrap(), names);
    }

    // -------------------------------------------------------------------------
    // Arrays

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "entry")]
    struct Text {
        #[xml(attribute)]
        value: String,
    }

    fn text(value: &str) -> Text {
        Text {
            value: String::from(value),
        }
    }

    #[test]
    fn array_of_entries() {
        let source = r#"
            <root length='5'>
               <entry value='one'/>
               <entry value='two'/>
               <entry value='three'/>
               <entry value='four'/>
               <entry value='five'/>
            </root>"#;
        let persister = persister();
        let array = persister.read::<Box<[Text]>>(source).unwrap();
        let values: Vec<&str> = array.iter().map(|entry| entry.value.as_str()).collect();
        assert_eq!(values, ["one", "two", "three", "four", "five"]);

        let xml = persister.write(&array).unwrap();
        assert!(xml.starts_with(r#"<array length="5"><entry value="one"/>"#));
        assert_eq!(persister.read::<Box<[Text]>>(&xml).unwrap(), array);
    }

    #[test]
    fn array_slots_may_be_empty() {
        let persister = persister();
        let array: Box<[Option<Text>]> = Box::new([Some(text("a")), None, Some(text("c")), None]);
        let xml = persister.write(&array).unwrap();
        assert_eq!(
            xml,
            r#"<array length="4"><entry value="a"/><entry/><entry value="c"/><entry/></array>"#
        );
        assert_eq!(persister.read::<Box<[Option<Text>]>>(&xml).unwrap(), array);

        let short = persister
            .read::<Box<[Option<Text>]>>(r#"<array length="3"><entry value="a"/></array>"#)
            .unwrap();
        assert_eq!(short.as_ref(), [Some(text("a")), None, None]);
    }

    #[test]
    fn array_length_is_enforced() {
        let persister = persister();
        let missing = persister.read::<Box<[Text]>>(r#"<array length="2"><entry value="a"/></array>"#);
        assert!(matches!(missing, Err(Error::Element(_))));

        let overflow = persister.read::<Box<[Text]>>(r#"<array length="1"><entry value="a"/><entry value="b"/></array>"#);
        assert!(matches!(overflow, Err(Error::Element(_))));

        let invalid = persister.read::<Box<[Text]>>(r#"<array length="x"/>"#);
        assert!(matches!(invalid, Err(Error::Element(_))));
    }

    #[test]
    fn oversized_length_is_an_error() {
        let persister = persister();
        let composite = persister
            .read::<Box<[Option<Text>]>>(r#"<array length="18446744073709551615"><entry value="a"/></array>"#);
        assert!(matches!(composite, Err(Error::Element(_))));

        let primitive =
            persister.read::<Box<[Option<u32>]>>(r#"<array length="18446744073709551615"><u32>1</u32></array>"#);
        assert!(matches!(primitive, Err(Error::Element(_))));

        let required = persister.read::<Box<[Text]>>(r#"<array length="1000000000000"><entry value="a"/></array>"#);
        assert!(matches!(required, Err(Error::Element(message)) if message.contains("missing")));
    }

    // -------------------------------------------------------------------------
    // Strictness and validation

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "loose", strict = false)]
    struct Loose {
        #[xml(attribute)]
        id: u32,
    }

    #[test]
    fn unmatched_nodes_in_strict_mode() {
        let persister = persister();
        let attribute = persister.read::<Book>(r#"<book isbn="1" lang="en"><title>x</title></book>"#);
        assert!(matches!(attribute, Err(Error::Attribute(_))));

        let element = persister.read::<Book>(r#"<book isbn="1"><title>x</title><extra><a/></extra></book>"#);
        assert!(matches!(element, Err(Error::Element(_))));
    }

    #[test]
    fn repeated_single_element() {
        let persister = persister();
        let repeated = persister.read::<Book>(r#"<book isbn="1"><title>a</title><title>b</title></book>"#);
        assert!(matches!(repeated, Err(Error::Persistence(message)) if message.contains("declared twice")));

        let lenient = persister.read_with::<Book>(r#"<book isbn="1"><title>a</title><title>b</title></book>"#, false);
        assert!(matches!(lenient, Err(Error::Persistence(_))));
    }

    #[test]
    fn unmatched_nodes_skipped_when_lenient() {
        let persister = persister();
        let source = r#"<book isbn="1" lang="en"><extra><a/></extra><title>x</title></book>"#;
        assert_eq!(persister.read_with::<Book>(source, false).unwrap(), book("1", "x"));

        let loose = persister.read::<Loose>(r#"<loose id="4" other="1"><unknown/></loose>"#).unwrap();
        assert_eq!(loose, Loose { id: 4 });
    }

    #[test]
    fn missing_required_values() {
        let persister = persister();
        let element = persister.read::<Book>(r#"<book isbn="1"/>"#);
        assert!(matches!(element, Err(Error::Element(message)) if message.contains("title")));

        let attribute = persister.read::<Book>("<book><title>x</title></book>");
        assert!(matches!(attribute, Err(Error::Attribute(_))));

        let transform = persister.read::<Loose>(r#"<loose id="four"/>"#);
        assert!(matches!(transform, Err(Error::Transform(_))));
    }

    #[test]
    fn validate_checks_without_building() {
        let persister = persister();
        persister
            .validate::<Library>(r#"<library name="x"><book isbn="1"><title>t</title></book></library>"#)
            .unwrap();

        let invalid = persister.validate::<Library>(r#"<library name="x"><book isbn="1"/></library>"#);
        assert!(matches!(invalid, Err(Error::Element(_))));

        let malformed = persister.validate::<Library>("<library name='x'>");
        assert!(matches!(malformed, Err(Error::Node(_))));
    }

    // -------------------------------------------------------------------------
    // Versions

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "config")]
    struct Config {
        #[xml(version(revision = 2.0))]
        revision: f64,
        #[xml(element)]
        name: String,
        #[xml(element, since = 2.0)]
        port: u16,
    }

    #[test]
    fn older_revisions_are_tolerated() {
        let persister = persister();
        let old = persister
            .read::<Config>(r#"<config version="1.0"><name>db</name><legacy/></config>"#)
            .unwrap();
        assert_eq!(
            old,
            Config {
                revision: 1.0,
                name: String::from("db"),
                port: 0,
            }
        );

        let unversioned = persister.read::<Config>("<config><name>db</name></config>").unwrap();
        assert_eq!(unversioned.port, 0);
    }

    #[test]
    fn older_revisions_still_need_ungated_members() {
        let persister = persister();
        let missing = persister.read::<Config>(r#"<config version="1.0"><port>1</port></config>"#);
        assert!(matches!(missing, Err(Error::Element(message)) if message.contains("'name'")));
    }

    #[test]
    fn current_revision_is_strict() {
        let persister = persister();
        let missing = persister.read::<Config>(r#"<config version="2.0"><name>db</name></config>"#);
        assert!(matches!(missing, Err(Error::Element(_))));

        let current = Config {
            revision: 2.0,
            name: String::from("db"),
            port: 5432,
        };
        let xml = persister.write(&current).unwrap();
        assert_eq!(xml, r#"<config version="2"><name>db</name><port>5432</port></config>"#);
        assert_eq!(persister.read::<Config>(&xml).unwrap(), current);
    }

    // -------------------------------------------------------------------------
    // Constructors

    #[derive(Xml, Debug, PartialEq)]
    #[xml(root = "point")]
    #[xml(constructor(Point::new, attribute("x"), attribute("y")))]
    #[xml(constructor(Point::origin))]
    struct Point {
        #[xml(attribute(required = false), read_only)]
        x: i32,
        #[xml(attribute(required = false), read_only)]
        y: i32,
    }

    impl Point {
        fn new(x: i32, y: i32) -> Self {
            Self { x, y }
        }

        fn origin() -> Self {
            Self::new(0, 0)
        }
    }

    #[test]
    fn constructor_with_most_values_wins() {
        let persister = persister();
        assert_eq!(persister.read::<Point>(r#"<point x="3" y="4"/>"#).unwrap(), Point::new(3, 4));
        assert_eq!(persister.read::<Point>("<point/>").unwrap(), Point::origin());

        let partial = persister.read::<Point>(r#"<point x="3"/>"#);
        assert!(matches!(partial, Err(Error::Instantiation(_))));

        assert_eq!(persister.write(&Point::new(1, 2)).unwrap(), r#"<point x="1" y="2"/>"#);
    }

    // -------------------------------------------------------------------------
    // Inline aggregation

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "basket")]
    struct Basket {
        #[xml(element_list(entry = "fruit", inline))]
        fruits: Vec<String>,
        #[xml(element)]
        owner: String,
        #[xml(element_map(entry = "price", key = "item", attribute, inline))]
        prices: BTreeMap<String, u32>,
    }

    #[test]
    fn inline_entries_are_gathered() {
        let source = concat!(
            "<basket>",
            "<fruit>apple</fruit>",
            "<owner>ann</owner>",
            "<fruit>pear</fruit>",
            r#"<price item="apple">3</price>"#,
            r#"<price item="pear">4</price>"#,
            "</basket>",
        );
        let persister = persister();
        let basket = persister.read::<Basket>(source).unwrap();
        assert_eq!(basket.fruits, ["apple", "pear"]);
        assert_eq!(basket.owner, "ann");
        assert_eq!(basket.prices.get("pear"), Some(&4));

        let xml = persister.write(&basket).unwrap();
        assert_eq!(
            xml,
            concat!(
                "<basket>",
                "<fruit>apple</fruit>",
                "<fruit>pear</fruit>",
                "<owner>ann</owner>",
                r#"<price item="apple">3</price>"#,
                r#"<price item="pear">4</price>"#,
                "</basket>",
            )
        );
    }

    // -------------------------------------------------------------------------
    // Shared references

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "person")]
    struct Person {
        #[xml(attribute)]
        name: String,
    }

    #[derive(Xml, Default)]
    #[xml(root = "team")]
    struct Team {
        #[xml(element)]
        lead: Rc<Person>,
        #[xml(element_list(entry = "member"))]
        members: Vec<Rc<Person>>,
    }

    #[derive(Xml, Default)]
    #[xml(root = "node")]
    struct Node {
        #[xml(attribute)]
        name: String,
        #[xml(element_list(entry = "child", required = false))]
        children: Vec<Rc<Node>>,
    }

    fn person(name: &str) -> Rc<Person> {
        Rc::new(Person {
            name: String::from(name),
        })
    }

    #[test]
    fn shared_values_keep_identity() {
        let lead = person("ada");
        let team = Team {
            lead: Rc::clone(&lead),
            members: Vec::from([Rc::clone(&lead), person("bob")]),
        };
        let persister = persister().with_strategy(CycleStrategy::new());
        let xml = persister.write(&team).unwrap();
        assert_eq!(
            xml,
            concat!(
                "<team>",
                r#"<lead id="0" name="ada"/>"#,
                r#"<members><member reference="0"/><member id="1" name="bob"/></members>"#,
                "</team>",
            )
        );

        let read = persister.read::<Team>(&xml).unwrap();
        assert!(Rc::ptr_eq(&read.lead, &read.members[0]));
        assert!(!Rc::ptr_eq(&read.lead, &read.members[1]));
        assert_eq!(read.members[1].name, "bob");
    }

    #[test]
    fn broken_references() {
        let persister = persister().with_strategy(CycleStrategy::new());
        let enclosing = persister.read::<Node>(r#"<node id="0" name="a"><children><child reference="0"/></children></node>"#);
        assert!(matches!(enclosing, Err(Error::Cycle(_))));

        let unknown = persister.read::<Node>(r#"<node name="a"><children><child reference="9"/></children></node>"#);
        assert!(matches!(unknown, Err(Error::Cycle(_))));

        let twice = persister.read::<Node>(
            r#"<node id="0" name="a"><children><child id="1" name="b"/><child id="1" name="c"/></children></node>"#,
        );
        assert!(matches!(twice, Err(Error::Cycle(_))));
    }

    // -------------------------------------------------------------------------
    // Trait objects

    trait Shape: Bind {
        fn area(&self) -> f64;
    }

    #[derive(Xml, Default)]
    struct Square {
        #[xml(attribute)]
        side: f64,
    }

    #[derive(Xml, Default)]
    struct Circle {
        #[xml(attribute)]
        radius: f64,
    }

    impl Shape for Square {
        fn area(&self) -> f64 {
            self.side * self.side
        }
    }

    impl Shape for Circle {
        fn area(&self) -> f64 {
            3.0 * self.radius * self.radius
        }
    }

    impl_dynamic!(dyn Shape { Square, Circle } default Square);

    #[derive(Xml, Default)]
    #[xml(root = "drawing")]
    struct Drawing {
        #[xml(element_list)]
        shapes: Vec<Box<dyn Shape>>,
    }

    #[test]
    fn entries_named_by_concrete_type() {
        let drawing = Drawing {
            shapes: Vec::from([
                Box::new(Square { side: 2.0 }) as Box<dyn Shape>,
                Box::new(Circle { radius: 1.5 }),
            ]),
        };
        let persister = persister();
        let xml = persister.write(&drawing).unwrap();
        assert_eq!(
            xml,
            concat!(
                "<drawing><shapes>",
                r#"<square class="vc_bind::persister::tests::Square" side="2"/>"#,
                r#"<circle class="vc_bind::persister::tests::Circle" radius="1.5"/>"#,
                "</shapes></drawing>",
            )
        );

        let read = persister.read::<Drawing>(&xml).unwrap();
        let areas: Vec<f64> = read.shapes.iter().map(|shape| shape.area()).collect();
        assert_eq!(areas, [4.0, 6.75]);
    }

    #[test]
    fn default_variant_without_class() {
        let persister = persister();
        let read = persister
            .read::<Drawing>(r#"<drawing><shapes><shape side="3"/></shapes></drawing>"#)
            .unwrap();
        assert_eq!(read.shapes[0].area(), 9.0);

        let unknown = persister.read::<Drawing>(r#"<drawing><shapes><shape class="nope"/></shapes></drawing>"#);
        assert!(matches!(unknown, Err(Error::Instantiation(_))));
    }

    // -------------------------------------------------------------------------
    // Callbacks

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "account", commit = "on_commit", validate = "on_validate")]
    #[xml(persist = "on_persist", complete = "on_complete")]
    struct Account {
        #[xml(attribute)]
        balance: i64,
        #[xml(skip)]
        committed: bool,
    }

    impl Account {
        fn on_commit(&mut self, session: &mut Session) -> Result<(), String> {
            self.committed = true;
            session.insert("committed", true);
            Ok(())
        }

        fn on_validate(&mut self, _session: &mut Session) -> Result<(), String> {
            if self.balance < 0 {
                return Err(format!("negative balance {}", self.balance));
            }
            Ok(())
        }

        fn on_persist(&self, session: &mut Session) -> Result<(), String> {
            session.insert("persisted", self.balance);
            Ok(())
        }

        fn on_complete(&self, session: &mut Session) -> Result<(), String> {
            session.insert("completed", true);
            Ok(())
        }
    }

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "secret", replace = "masked", resolve = "unmasked")]
    struct Secret {
        #[xml(attribute)]
        value: String,
    }

    impl Secret {
        fn masked(&self, _session: &mut Session) -> Result<Secret, String> {
            Ok(Secret {
                value: self.value.chars().rev().collect(),
            })
        }

        fn unmasked(self, session: &mut Session) -> Result<Secret, String> {
            self.masked(session)
        }
    }

    #[test]
    fn lifecycle_callbacks_share_the_session() {
        let persister = persister();
        let mut session = Session::default();
        let account = persister
            .read_session::<Account>(r#"<account balance="10"/>"#, &mut session)
            .unwrap();
        assert!(account.committed);
        assert_eq!(session.get::<bool>("committed"), Some(&true));

        let mut session = Session::default();
        let xml = persister.write_session(&account, &mut session).unwrap();
        assert_eq!(xml, r#"<account balance="10"/>"#);
        assert_eq!(session.get::<i64>("persisted"), Some(&10));
        assert_eq!(session.get::<bool>("completed"), Some(&true));
    }

    #[test]
    fn failing_validation_is_reported() {
        let error = persister().read::<Account>(r#"<account balance="-5"/>"#).unwrap_err();
        match error {
            Error::Callback { name, source, .. } => {
                assert_eq!(name, "validate");
                assert_eq!(source.to_string(), "negative balance -5");
            }
            other => panic!("expected a callback error, got {other:?}"),
        }
    }

    #[test]
    fn replace_and_resolve_substitute_values() {
        let persister = persister();
        let secret = Secret {
            value: String::from("abc"),
        };
        let xml = persister.write(&secret).unwrap();
        assert_eq!(xml, r#"<secret value="cba"/>"#);
        assert_eq!(persister.read::<Secret>(&xml).unwrap(), secret);
    }

    // -------------------------------------------------------------------------
    // Enums, text and properties

    #[derive(Xml, Default, Debug, PartialEq, Clone, Copy)]
    enum Status {
        #[default]
        Active,
        #[xml(name = "on-hold")]
        OnHold,
    }

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "task")]
    struct Task {
        #[xml(attribute)]
        status: Status,
        #[xml(element_list(entry = "status"))]
        history: Vec<Status>,
    }

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "note")]
    struct Note {
        #[xml(attribute)]
        lang: String,
        #[xml(text(data))]
        body: String,
    }

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "temperature")]
    struct Temperature {
        #[xml(attribute, get = "celsius", set = "set_celsius")]
        celsius: f64,
        #[xml(element(empty = "n/a"))]
        comment: String,
    }

    impl Temperature {
        fn celsius(&self) -> &f64 {
            &self.celsius
        }

        fn set_celsius(&mut self, value: f64) {
            self.celsius = value.clamp(-273.15, f64::MAX);
        }
    }

    #[test]
    fn unit_enums_are_text() {
        let task = Task {
            status: Status::OnHold,
            history: Vec::from([Status::Active, Status::OnHold]),
        };
        let persister = persister();
        let xml = persister.write(&task).unwrap();
        assert_eq!(
            xml,
            r#"<task status="on-hold"><history><status>Active</status><status>on-hold</status></history></task>"#
        );
        assert_eq!(persister.read::<Task>(&xml).unwrap(), task);

        let unknown = persister.read::<Task>(r#"<task status="Paused"><history/></task>"#);
        assert!(matches!(unknown, Err(Error::Transform(_))));
    }

    #[test]
    fn text_as_character_data() {
        let note = Note {
            lang: String::from("en"),
            body: String::from("a < b"),
        };
        let persister = persister();
        let xml = persister.write(&note).unwrap();
        assert_eq!(xml, r#"<note lang="en"><![CDATA[a < b]]></note>"#);
        assert_eq!(persister.read::<Note>(&xml).unwrap(), note);
        assert_eq!(persister.read::<Note>(r#"<note lang="en">a &lt; b</note>"#).unwrap(), note);
    }

    #[test]
    fn properties_go_through_accessors() {
        let persister = persister();
        let read = persister.read::<Temperature>(r#"<temperature celsius="-300"/>"#).unwrap();
        assert_eq!(read.celsius, -273.15);
        assert_eq!(read.comment, "n/a");

        let xml = persister.write(&read).unwrap();
        assert_eq!(xml, r#"<temperature celsius="-273.15"><comment>n/a</comment></temperature>"#);
    }

    // -------------------------------------------------------------------------
    // Templates, styles and namespaces

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "server")]
    struct Server {
        #[xml(attribute)]
        host: String,
        #[xml(attribute)]
        port: u16,
        #[xml(element)]
        banner: String,
    }

    #[test]
    fn templates_expand_from_session_then_filter() {
        let persister = persister().with_filter(MapFilter::new().with("host", "example.org").with("port", "80"));
        let mut session = Session::default();
        session.insert("port", String::from("8080"));
        session.insert("user", String::from("ann"));

        let source = r#"<server host="${host}" port="${port}"><banner>hello ${user}, ${missing}</banner></server>"#;
        let server = persister.read_session::<Server>(source, &mut session).unwrap();
        assert_eq!(server.host, "example.org");
        assert_eq!(server.port, 8080);
        assert_eq!(server.banner, "hello ann, ${missing}");
    }

    #[derive(Xml, Default, Debug, PartialEq)]
    struct OrderLine {
        #[xml(attribute)]
        line_number: u32,
        #[xml(element)]
        product_name: String,
    }

    #[test]
    fn style_applies_to_every_name() {
        let line = OrderLine {
            line_number: 1,
            product_name: String::from("tea"),
        };
        let persister = persister().with_style(HyphenStyle);
        let xml = persister.write(&line).unwrap();
        assert_eq!(
            xml,
            r#"<order-line line-number="1"><product-name>tea</product-name></order-line>"#
        );
        assert_eq!(persister.read::<OrderLine>(&xml).unwrap(), line);

        let unstyled = super::Persister::new().read::<OrderLine>(&xml);
        assert!(unstyled.is_err());
    }

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "catalog", namespace(reference = "urn:catalog", prefix = "c"))]
    struct Catalog {
        #[xml(element, namespace(reference = "urn:catalog"))]
        title: String,
        #[xml(element)]
        owner: String,
    }

    #[test]
    fn namespaces_reuse_declared_prefixes() {
        let catalog = Catalog {
            title: String::from("Spring"),
            owner: String::from("ann"),
        };
        let persister = persister();
        let xml = persister.write(&catalog).unwrap();
        assert_eq!(
            xml,
            r#"<c:catalog xmlns:c="urn:catalog"><c:title>Spring</c:title><owner>ann</owner></c:catalog>"#
        );
        assert_eq!(persister.read::<Catalog>(&xml).unwrap(), catalog);
    }

    // -------------------------------------------------------------------------
    // Inheritance

    #[derive(Xml, Default, Debug, PartialEq)]
    struct Entity {
        #[xml(attribute)]
        id: u32,
        #[xml(element(required = false))]
        note: Option<String>,
    }

    #[derive(Xml, Default, Debug, PartialEq)]
    #[xml(root = "user")]
    struct User {
        #[xml(extends)]
        base: Entity,
        #[xml(element)]
        name: String,
    }

    #[test]
    fn base_members_come_first() {
        let user = User {
            base: Entity {
                id: 7,
                note: Some(String::from("admin")),
            },
            name: String::from("ann"),
        };
        let persister = persister();
        let xml = persister.write(&user).unwrap();
        assert_eq!(xml, r#"<user id="7"><note>admin</note><name>ann</name></user>"#);
        assert_eq!(persister.read::<User>(&xml).unwrap(), user);
    }
}
