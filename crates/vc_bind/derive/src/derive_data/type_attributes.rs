use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::parse::ParseStream;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, LitBool, LitStr, Path, Token, Type, parenthesized};

use super::{LabelKind, NamespaceAttribute, parse_flag, parse_str};
use crate::XML_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// DefaultAttribute

/// `default = "field"`, `default = "property"` or
/// `default(field, required)`.
pub(crate) struct DefaultAttribute {
    pub property: bool,
    pub required: bool,
}

impl DefaultAttribute {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        if meta.input.peek(Token![=]) {
            let access = parse_str(meta)?;
            return Ok(Self {
                property: Self::access(&access.value(), access.span())?,
                required: false,
            });
        }
        let mut property = None;
        let mut required = false;
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("required") {
                required = parse_flag(&inner)?;
            } else if let Some(ident) = inner.path.get_ident() {
                property = Some(Self::access(&ident.to_string(), ident.span())?);
            } else {
                return Err(inner.error("expected `field`, `property` or `required`"));
            }
            Ok(())
        })?;
        match property {
            Some(property) => Ok(Self { property, required }),
            None => Err(meta.error("expected `field` or `property`")),
        }
    }

    fn access(access: &str, span: Span) -> syn::Result<bool> {
        match access {
            "field" => Ok(false),
            "property" => Ok(true),
            _ => Err(syn::Error::new(span, "expected `field` or `property`")),
        }
    }
}

// -----------------------------------------------------------------------------
// ConstructorAttribute

/// `kind("name")` or `kind("name", Type)` inside a constructor.
pub(crate) struct ParameterAttribute {
    pub kind: LabelKind,
    pub name: LitStr,
    pub ty: Option<Type>,
}

/// `constructor(default)` or `constructor(path, kind("name"), ..)`.
pub(crate) enum ConstructorAttribute {
    Default,
    Function {
        path: Path,
        parameters: Vec<ParameterAttribute>,
    },
}

impl ConstructorAttribute {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let content;
        parenthesized!(content in meta.input);
        Self::parse_content(&content)
    }

    fn parse_content(input: ParseStream) -> syn::Result<Self> {
        let path: Path = input.parse()?;
        if path.is_ident("default") && input.is_empty() {
            return Ok(Self::Default);
        }

        let mut parameters = Vec::new();
        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let ident: Ident = input.parse()?;
            let Some(kind) = LabelKind::from_ident(&ident) else {
                return Err(syn::Error::new(ident.span(), "expected a label kind such as `attribute` or `element`"));
            };
            let inner;
            parenthesized!(inner in input);
            let name: LitStr = inner.parse()?;
            let ty = if inner.peek(Token![,]) {
                inner.parse::<Token![,]>()?;
                Some(inner.parse()?)
            } else {
                None
            };
            if !inner.is_empty() {
                return Err(inner.error("expected `\"name\"` or `\"name\", Type`"));
            }
            parameters.push(ParameterAttribute { kind, name, ty });
        }
        Ok(Self::Function { path, parameters })
    }
}

// -----------------------------------------------------------------------------
// CallbackAttributes

/// Inherent methods named by `commit = ".."` and friends.
#[derive(Default)]
pub(crate) struct CallbackAttributes {
    pub commit: Option<Ident>,
    pub validate: Option<Ident>,
    pub persist: Option<Ident>,
    pub complete: Option<Ident>,
    pub replace: Option<Ident>,
    pub resolve: Option<Ident>,
}

impl CallbackAttributes {
    pub fn is_empty(&self) -> bool {
        self.commit.is_none()
            && self.validate.is_none()
            && self.persist.is_none()
            && self.complete.is_none()
            && self.replace.is_none()
            && self.resolve.is_none()
    }

    /// Returns `Ok(false)` if `meta` is not a callback.
    fn parse(&mut self, meta: &ParseNestedMeta) -> syn::Result<bool> {
        let slot = if meta.path.is_ident("commit") {
            &mut self.commit
        } else if meta.path.is_ident("validate") {
            &mut self.validate
        } else if meta.path.is_ident("persist") {
            &mut self.persist
        } else if meta.path.is_ident("complete") {
            &mut self.complete
        } else if meta.path.is_ident("replace") {
            &mut self.replace
        } else if meta.path.is_ident("resolve") {
            &mut self.resolve
        } else {
            return Ok(false);
        };
        if slot.is_some() {
            return Err(meta.error("callback declared twice"));
        }
        *slot = Some(parse_str(meta)?.parse()?);
        Ok(true)
    }
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Every `#[xml(...)]` directive placed on the type itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `Some(None)` for a bare `root`.
    pub root: Option<Option<LitStr>>,
    pub strict: Option<LitBool>,
    pub order: Option<(Vec<LitStr>, Vec<LitStr>)>,
    pub default: Option<DefaultAttribute>,
    pub namespace: Option<NamespaceAttribute>,
    pub declarations: Vec<NamespaceAttribute>,
    pub constructors: Vec<ConstructorAttribute>,
    pub callbacks: CallbackAttributes,
    pub path: Option<LitStr>,
    /// The first directive that only applies to structs.
    pub struct_only: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs {
            if attr.path().is_ident(XML_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| parsed.parse_meta(&meta))?;
            }
        }
        Ok(parsed)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("path") {
            self.path = Some(parse_str(meta)?);
            return Ok(());
        }
        self.struct_only.get_or_insert(meta.path.span());

        if meta.path.is_ident("root") {
            let name = if meta.input.peek(Token![=]) {
                Some(parse_str(meta)?)
            } else {
                None
            };
            self.root = Some(name);
        } else if meta.path.is_ident("strict") {
            self.strict = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("order") {
            let mut elements = Vec::new();
            let mut attributes = Vec::new();
            meta.parse_nested_meta(|inner| {
                let content;
                parenthesized!(content in inner.input);
                let names = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                if inner.path.is_ident("elements") {
                    elements.extend(names);
                } else if inner.path.is_ident("attributes") {
                    attributes.extend(names);
                } else {
                    return Err(inner.error("expected `elements` or `attributes`"));
                }
                Ok(())
            })?;
            self.order = Some((elements, attributes));
        } else if meta.path.is_ident("default") {
            self.default = Some(DefaultAttribute::parse(meta)?);
        } else if meta.path.is_ident("namespace") {
            self.namespace = Some(NamespaceAttribute::parse(meta)?);
        } else if meta.path.is_ident("declare") {
            self.declarations.push(NamespaceAttribute::parse(meta)?);
        } else if meta.path.is_ident("constructor") {
            self.constructors.push(ConstructorAttribute::parse(meta)?);
        } else if !self.callbacks.parse(meta)? {
            return Err(meta.error("unknown `xml` type attribute"));
        }
        Ok(())
    }
}
