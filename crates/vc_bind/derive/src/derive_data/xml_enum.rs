use syn::spanned::Spanned;
use syn::{DataEnum, Fields, Ident, LitStr};

use super::XmlMeta;
use crate::XML_ATTRIBUTE_NAME;

/// A unit variant and the text it is written as.
pub(crate) struct XmlVariant<'a> {
    pub ident: &'a Ident,
    pub text: LitStr,
}

/// An enum of unit variants, bound as a primitive.
pub(crate) struct XmlEnum<'a> {
    pub meta: XmlMeta<'a>,
    pub variants: Vec<XmlVariant<'a>>,
}

impl<'a> XmlEnum<'a> {
    pub fn new(meta: XmlMeta<'a>, data: &'a DataEnum) -> syn::Result<Self> {
        if let Some(span) = meta.attrs().struct_only {
            return Err(syn::Error::new(span, "enums only accept `path`"));
        }
        if meta.impl_with_generic() {
            return Err(syn::Error::new(meta.ident().span(), "`Xml` enums cannot be generic"));
        }
        if data.variants.is_empty() {
            return Err(syn::Error::new(meta.ident().span(), "`Xml` enums need at least one variant"));
        }

        let mut variants = Vec::with_capacity(data.variants.len());
        for variant in &data.variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new(
                    variant.fields.span(),
                    "`Xml` enums are written as text, variants cannot carry data",
                ));
            }
            let mut text = LitStr::new(&variant.ident.to_string(), variant.ident.span());
            for attr in &variant.attrs {
                if !attr.path().is_ident(XML_ATTRIBUTE_NAME) {
                    continue;
                }
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        text = meta.value()?.parse()?;
                        Ok(())
                    } else {
                        Err(meta.error("expected `name`"))
                    }
                })?;
            }
            variants.push(XmlVariant {
                ident: &variant.ident,
                text,
            });
        }
        Ok(Self { meta, variants })
    }
}
