//! Parsing of `#[xml(...)]` attributes and the derive input.

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod type_attributes;
mod xml_enum;
mod xml_meta;
mod xml_struct;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use field_attributes::{FieldAttributes, LabelKind};
pub(crate) use type_attributes::{CallbackAttributes, ConstructorAttribute, ParameterAttribute};
pub(crate) use type_attributes::TypeAttributes;
pub(crate) use xml_enum::XmlEnum;
pub(crate) use xml_meta::XmlMeta;
pub(crate) use xml_struct::{XmlField, XmlStruct};

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{DeriveInput, Lit, LitBool, LitStr, Token};

/// The parsed input of `#[derive(Xml)]`.
pub(crate) enum XmlDerive<'a> {
    Struct(XmlStruct<'a>),
    Enum(XmlEnum<'a>),
}

impl<'a> XmlDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let meta = XmlMeta::new(&input.ident, &input.generics, attrs);
        match &input.data {
            syn::Data::Struct(data) => XmlStruct::new(meta, data).map(Self::Struct),
            syn::Data::Enum(data) => XmlEnum::new(meta, data).map(Self::Enum),
            syn::Data::Union(data) => Err(syn::Error::new(
                data.union_token.span,
                "`Xml` cannot be derived for unions",
            )),
        }
    }
}

// -----------------------------------------------------------------------------
// Shared parsers

/// `flag` or `flag = bool`.
pub(crate) fn parse_flag(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        Ok(meta.value()?.parse::<LitBool>()?.value)
    } else {
        Ok(true)
    }
}

/// `key = "text"`.
pub(crate) fn parse_str(meta: &ParseNestedMeta) -> syn::Result<LitStr> {
    meta.value()?.parse()
}

/// `key = 1.5` or `key = 2`, emitted as an unsuffixed float literal.
pub(crate) fn parse_float(meta: &ParseNestedMeta) -> syn::Result<Literal> {
    let value = match meta.value()?.parse::<Lit>()? {
        Lit::Float(lit) => lit.base10_parse::<f64>()?,
        Lit::Int(lit) => lit.base10_parse::<f64>()?,
        lit => return Err(syn::Error::new(lit.span(), "expected a number")),
    };
    Ok(Literal::f64_unsuffixed(value))
}

// -----------------------------------------------------------------------------
// NamespaceAttribute

/// `namespace(reference = "..", prefix = "..")`
#[derive(Clone)]
pub(crate) struct NamespaceAttribute {
    reference: LitStr,
    prefix: Option<LitStr>,
}

impl NamespaceAttribute {
    pub fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let mut reference = None;
        let mut prefix = None;
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("reference") {
                reference = Some(parse_str(&inner)?);
            } else if inner.path.is_ident("prefix") {
                prefix = Some(parse_str(&inner)?);
            } else {
                return Err(inner.error("expected `reference` or `prefix`"));
            }
            Ok(())
        })?;
        match reference {
            Some(reference) => Ok(Self { reference, prefix }),
            None => Err(meta.error("a namespace needs a `reference`")),
        }
    }

    /// `NamespaceDescriptor::new(reference, prefix)`, an absent prefix
    /// being the default namespace.
    pub fn to_tokens(&self, descriptor_: &TokenStream) -> TokenStream {
        let reference = &self.reference;
        let prefix = match &self.prefix {
            Some(prefix) => quote!(#prefix),
            None => quote!(""),
        };
        quote! {
            #descriptor_::NamespaceDescriptor::new(#reference, #prefix)
        }
    }
}
