use proc_macro2::{Literal, Span, TokenStream};
use quote::{format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, Lit, LitStr, Token};

use super::{NamespaceAttribute, parse_flag, parse_float, parse_str};
use crate::XML_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// LabelKind

/// The member level directives, one per `LabelKind` of `vc_bind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LabelKind {
    Attribute,
    Element,
    ElementList,
    ElementArray,
    ElementMap,
    Text,
    Version,
}

impl LabelKind {
    pub fn from_ident(ident: &Ident) -> Option<Self> {
        Some(match ident.to_string().as_str() {
            "attribute" => Self::Attribute,
            "element" => Self::Element,
            "element_list" => Self::ElementList,
            "element_array" => Self::ElementArray,
            "element_map" => Self::ElementMap,
            "text" => Self::Text,
            "version" => Self::Version,
            _ => return None,
        })
    }

    /// The variant of `vc_bind::descriptor::LabelKind`.
    pub fn variant(self) -> Ident {
        let name = match self {
            Self::Attribute => "Attribute",
            Self::Element => "Element",
            Self::ElementList => "ElementList",
            Self::ElementArray => "ElementArray",
            Self::ElementMap => "ElementMap",
            Self::Text => "Text",
            Self::Version => "Version",
        };
        Ident::new(name, Span::call_site())
    }

    /// The annotation struct of `vc_bind::descriptor`.
    pub fn annotation(self) -> Ident {
        format_ident!("{}Annotation", self.variant())
    }

    fn is_collection(self) -> bool {
        matches!(self, Self::ElementList | Self::ElementArray | Self::ElementMap)
    }

    /// Whether the directive accepts the option `key`.
    fn accepts(self, key: &str) -> bool {
        let keys: &[&str] = match self {
            Self::Attribute => &["name", "required", "empty"],
            Self::Element => &["name", "required", "data", "empty"],
            Self::ElementList => &["name", "entry", "inline", "required", "data", "empty"],
            Self::ElementArray => &["name", "entry", "required", "data", "empty"],
            Self::ElementMap => &[
                "name", "entry", "key", "value", "attribute", "inline", "required", "data", "empty",
            ],
            Self::Text => &["required", "data", "empty"],
            Self::Version => &["name", "revision", "required"],
        };
        keys.contains(&key)
    }
}

// -----------------------------------------------------------------------------
// LabelAttribute

/// `empty = ".."` on text labels, `empty = false` on collections.
pub(crate) enum EmptyValue {
    Text(LitStr),
    Flag(bool),
}

/// One member directive and its options.
pub(crate) struct LabelAttribute {
    pub kind: LabelKind,
    pub name: Option<LitStr>,
    pub entry: Option<LitStr>,
    pub key: Option<LitStr>,
    pub value: Option<LitStr>,
    pub attribute: Option<bool>,
    pub inline: Option<bool>,
    pub required: Option<bool>,
    pub data: Option<bool>,
    pub empty: Option<EmptyValue>,
    pub revision: Option<Literal>,
}

impl LabelAttribute {
    fn new(kind: LabelKind) -> Self {
        Self {
            kind,
            name: None,
            entry: None,
            key: None,
            value: None,
            attribute: None,
            inline: None,
            required: None,
            data: None,
            empty: None,
            revision: None,
        }
    }

    fn parse(kind: LabelKind, meta: &ParseNestedMeta) -> syn::Result<Self> {
        let mut label = Self::new(kind);
        if meta.input.is_empty() || meta.input.peek(Token![,]) {
            return Ok(label);
        }
        meta.parse_nested_meta(|inner| {
            let Some(key) = inner.path.get_ident().map(ToString::to_string) else {
                return Err(inner.error("expected an option name"));
            };
            if !kind.accepts(&key) {
                return Err(inner.error(format!("`{key}` is not an option of this directive")));
            }
            match key.as_str() {
                "name" => label.name = Some(parse_str(&inner)?),
                "entry" => label.entry = Some(parse_str(&inner)?),
                "key" => label.key = Some(parse_str(&inner)?),
                "value" => label.value = Some(parse_str(&inner)?),
                "attribute" => label.attribute = Some(parse_flag(&inner)?),
                "inline" => label.inline = Some(parse_flag(&inner)?),
                "required" => label.required = Some(parse_flag(&inner)?),
                "data" => label.data = Some(parse_flag(&inner)?),
                "revision" => label.revision = Some(parse_float(&inner)?),
                "empty" if kind.is_collection() => label.empty = Some(EmptyValue::Flag(parse_flag(&inner)?)),
                "empty" => match inner.value()?.parse::<Lit>()? {
                    Lit::Str(text) => label.empty = Some(EmptyValue::Text(text)),
                    lit => return Err(syn::Error::new(lit.span(), "expected the text of an empty value")),
                },
                _ => return Err(inner.error("unknown option")),
            }
            Ok(())
        })?;
        Ok(label)
    }

    /// `Annotation::Kind(KindAnnotation::new().with_..())`.
    ///
    /// `optional` relaxes `required` unless it was given explicitly.
    pub fn to_tokens(&self, descriptor_: &TokenStream, optional: bool) -> TokenStream {
        let variant = self.kind.variant();
        let annotation = self.kind.annotation();

        let mut with = Vec::new();
        let strings = [
            (&self.name, "with_name"),
            (&self.entry, "with_entry"),
            (&self.key, "with_key"),
            (&self.value, "with_value"),
        ];
        for (value, method) in strings {
            if let Some(value) = value {
                let method = Ident::new(method, Span::call_site());
                with.push(quote!(.#method(#value)));
            }
        }
        let flags = [
            (self.attribute, "with_attribute"),
            (self.inline, "with_inline"),
            (self.data, "with_data"),
        ];
        for (value, method) in flags {
            if let Some(value) = value {
                let method = Ident::new(method, Span::call_site());
                with.push(quote!(.#method(#value)));
            }
        }
        match self.required {
            Some(required) => with.push(quote!(.with_required(#required))),
            None if optional && self.kind != LabelKind::Version => with.push(quote!(.with_required(false))),
            None => {}
        }
        match &self.empty {
            Some(EmptyValue::Text(text)) => with.push(quote!(.with_empty(#text))),
            Some(EmptyValue::Flag(flag)) => with.push(quote!(.with_empty(#flag))),
            None => {}
        }
        if let Some(revision) = &self.revision {
            with.push(quote!(.with_revision(#revision)));
        }

        quote! {
            #descriptor_::Annotation::#variant(
                #descriptor_::#annotation::new() #(#with)*
            )
        }
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Every `#[xml(...)]` directive placed on one field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub label: Option<LabelAttribute>,
    pub skip: Option<Span>,
    pub extends: Option<Span>,
    pub read_only: Option<Span>,
    pub get: Option<LitStr>,
    pub set: Option<LitStr>,
    pub namespace: Option<NamespaceAttribute>,
    pub since: Option<Literal>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs {
            if attr.path().is_ident(XML_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| parsed.parse_meta(&meta))?;
            }
        }
        parsed.validity()?;
        Ok(parsed)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        if let Some(kind) = meta.path.get_ident().and_then(LabelKind::from_ident) {
            if self.label.is_some() {
                return Err(meta.error("a member takes a single label directive"));
            }
            self.label = Some(LabelAttribute::parse(kind, meta)?);
        } else if meta.path.is_ident("skip") {
            self.skip = Some(meta.path.span());
        } else if meta.path.is_ident("extends") {
            self.extends = Some(meta.path.span());
        } else if meta.path.is_ident("read_only") {
            self.read_only = Some(meta.path.span());
        } else if meta.path.is_ident("get") {
            self.get = Some(parse_str(meta)?);
        } else if meta.path.is_ident("set") {
            self.set = Some(parse_str(meta)?);
        } else if meta.path.is_ident("namespace") {
            self.namespace = Some(NamespaceAttribute::parse(meta)?);
        } else if meta.path.is_ident("since") {
            self.since = Some(parse_float(meta)?);
        } else {
            return Err(meta.error("unknown `xml` field attribute"));
        }
        Ok(())
    }

    fn validity(&self) -> syn::Result<()> {
        if let Some(span) = self.skip {
            let other = self.label.is_some()
                || self.extends.is_some()
                || self.read_only.is_some()
                || self.get.is_some()
                || self.set.is_some();
            if other {
                return Err(syn::Error::new(span, "`skip` cannot be combined with other directives"));
            }
        }
        if let Some(span) = self.extends
            && (self.label.is_some() || self.get.is_some() || self.set.is_some())
        {
            return Err(syn::Error::new(span, "a base is not bound to a label of its own"));
        }
        if let Some(set) = &self.set
            && self.get.is_none()
        {
            return Err(syn::Error::new(set.span(), "`set` needs a matching `get`"));
        }
        if let Some(span) = self.read_only
            && self.set.is_some()
        {
            return Err(syn::Error::new(span, "a member with a setter is not read only"));
        }
        Ok(())
    }

    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.skip.is_some()
    }
}
