use proc_macro2::TokenStream;
use quote::quote;
use syn::Generics;

use crate::derive_data::XmlMeta;

/// Generate implementation code for `Typed`.
///
/// `class_tokens` builds the `Class`; it runs once per type, or once
/// per instantiation of a generic type.
pub(crate) fn impl_typed(meta: &XmlMeta, generics: &Generics, class_tokens: TokenStream) -> TokenStream {
    let class_ = crate::path::class_(meta.vc_bind_path());

    let inner_cell_tokens = if meta.impl_with_generic() {
        quote! {
            static CELL: #class_::GenericClassCell = #class_::GenericClassCell::new();
            CELL.get_or_insert::<Self>(|| {
                #class_tokens
            })
        }
    } else {
        quote! {
            static CELL: #class_::NonGenericClassCell = #class_::NonGenericClassCell::new();
            CELL.get_or_init(|| {
                #class_tokens
            })
        }
    };

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics #class_::Typed for #ident #ty_generics #where_clause {
            fn class() -> &'static #class_::Class {
                #inner_cell_tokens
            }
        }
    }
}
