use syn::spanned::Spanned;
use syn::{DataStruct, Field, Fields, Ident, Type};

use super::{FieldAttributes, LabelKind, XmlMeta};

// -----------------------------------------------------------------------------
// XmlField

/// A named field and its directives.
pub(crate) struct XmlField<'a> {
    pub field: &'a Field,
    pub ident: &'a Ident,
    pub attrs: FieldAttributes,
}

impl XmlField<'_> {
    #[inline]
    pub fn ty(&self) -> &Type {
        &self.field.ty
    }

    /// The member name, without a raw identifier prefix.
    pub fn name(&self) -> String {
        let name = self.ident.to_string();
        match name.strip_prefix("r#") {
            Some(name) => name.to_owned(),
            None => name,
        }
    }

    /// The name a constructor parameter refers to this member by.
    pub fn label_name(&self) -> String {
        match self.attrs.label.as_ref().and_then(|label| label.name.as_ref()) {
            Some(name) => name.value(),
            None => self.name(),
        }
    }

    pub fn label_kind(&self) -> Option<LabelKind> {
        self.attrs.label.as_ref().map(|label| label.kind)
    }

    /// Whether the field type is spelled `Option<..>`.
    pub fn is_optional(&self) -> bool {
        let Type::Path(path) = self.ty() else {
            return false;
        };
        path.qself.is_none()
            && path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Option")
    }

    #[inline]
    pub fn is_base(&self) -> bool {
        self.attrs.extends.is_some()
    }
}

// -----------------------------------------------------------------------------
// XmlStruct

/// A struct with named fields, or a unit struct.
pub(crate) struct XmlStruct<'a> {
    pub meta: XmlMeta<'a>,
    pub fields: Vec<XmlField<'a>>,
}

impl<'a> XmlStruct<'a> {
    pub fn new(meta: XmlMeta<'a>, data: &'a DataStruct) -> syn::Result<Self> {
        let fields = match &data.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(|field| {
                    let Some(ident) = field.ident.as_ref() else {
                        return Err(syn::Error::new(field.span(), "expected a named field"));
                    };
                    Ok(XmlField {
                        field,
                        ident,
                        attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()?,
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new(
                    unnamed.span(),
                    "`Xml` needs named fields, tuple structs are not supported",
                ));
            }
        };

        let mut bases = fields.iter().filter(|field| field.is_base());
        if let (Some(_), Some(second)) = (bases.next(), bases.next()) {
            return Err(syn::Error::new(second.field.span(), "a type extends at most one base"));
        }

        Ok(Self { meta, fields })
    }

    /// Fields bound to the schema: annotated ones, and the others when a
    /// `default` rule may pick them up.
    pub fn members(&self) -> impl Iterator<Item = &XmlField<'a>> {
        let default = self.meta.attrs().default.is_some();
        self.fields.iter().filter(move |field| {
            !field.attrs.is_skipped() && !field.is_base() && (default || field.attrs.label.is_some())
        })
    }

    pub fn base(&self) -> Option<&XmlField<'a>> {
        self.fields.iter().find(|field| field.is_base())
    }
}
