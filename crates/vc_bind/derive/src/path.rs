//! Paths into `vc_bind` as seen from the crate invoking the derive.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `vc_bind` crate.
///
/// Crates may depend on `vc_bind` directly or through the `vc_xml`
/// facade, so the invoking crate's `Cargo.toml` is consulted. The lookup
/// reads files, call it once per macro invocation.
pub(crate) fn vc_bind() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_bind"))
}

#[inline(always)]
pub(crate) fn class_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_bind_path::class
    }
}

#[inline(always)]
pub(crate) fn descriptor_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_bind_path::descriptor
    }
}

#[inline(always)]
pub(crate) fn macro_exports_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_bind_path::__macro_exports
    }
}

#[inline(always)]
pub(crate) fn bind_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_bind_path::Bind
    }
}
