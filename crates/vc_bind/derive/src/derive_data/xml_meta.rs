use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericParam, Generics, Ident, Path, Type, WherePredicate, parse_quote};

use super::TypeAttributes;

/// What every derive needs regardless of the shape of the type.
pub(crate) struct XmlMeta<'a> {
    vc_bind_path: Path,
    ident: &'a Ident,
    generics: &'a Generics,
    attrs: TypeAttributes,
}

impl<'a> XmlMeta<'a> {
    #[inline]
    pub fn new(ident: &'a Ident, generics: &'a Generics, attrs: TypeAttributes) -> Self {
        Self {
            vc_bind_path: crate::path::vc_bind(),
            ident,
            generics,
            attrs,
        }
    }

    #[inline]
    pub fn vc_bind_path(&self) -> &Path {
        &self.vc_bind_path
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    /// Whether the `Typed` implementation depends on type or const parameters.
    pub fn impl_with_generic(&self) -> bool {
        !self
            .generics
            .params
            .iter()
            .all(|param| matches!(param, GenericParam::Lifetime(_)))
    }

    /// `Type::of::<Self>(path, name)`, or `Type::named::<Self>(name)` for
    /// generic types whose path is only known per instantiation.
    pub fn type_tokens(&self) -> TokenStream {
        let class_ = crate::path::class_(&self.vc_bind_path);
        let name = self.ident.to_string();
        if self.impl_with_generic() {
            return quote! {
                #class_::Type::named::<Self>(#name)
            };
        }
        let path = match &self.attrs.path {
            Some(path) => quote!(#path),
            None => quote!(::core::concat!(::core::module_path!(), "::", #name)),
        };
        quote! {
            #class_::Type::of::<Self>(#path, #name)
        }
    }

    /// Generics with `Typed` bounds on every type parameter and on `types`,
    /// plus `extra` predicates.
    pub fn bounded_generics(&self, types: &[&Type], extra: &[WherePredicate]) -> Generics {
        let class_ = crate::path::class_(&self.vc_bind_path);
        let mut generics = self.generics.clone();
        if !self.impl_with_generic() {
            return generics;
        }
        let params: Vec<Ident> = generics
            .type_params()
            .map(|param| param.ident.clone())
            .collect();
        let where_clause = generics.make_where_clause();
        for param in params {
            where_clause.predicates.push(parse_quote!(#param: #class_::Typed));
        }
        for ty in types {
            where_clause.predicates.push(parse_quote!(#ty: #class_::Typed));
        }
        where_clause.predicates.extend(extra.iter().cloned());
        generics
    }
}
