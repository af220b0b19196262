//! Code generation for `#[derive(Xml)]`.

mod composite;
mod primitive;
mod typed;

use proc_macro2::TokenStream;
use syn::DeriveInput;

use crate::derive_data::XmlDerive;

pub(crate) use composite::impl_composite;
pub(crate) use primitive::impl_primitive;
pub(crate) use typed::impl_typed;

/// Dispatches on the shape of the input, compile errors included.
pub(crate) fn match_xml_impls(ast: &DeriveInput) -> TokenStream {
    let derive = match XmlDerive::from_input(ast) {
        Ok(derive) => derive,
        Err(err) => return err.into_compile_error(),
    };
    let result = match &derive {
        XmlDerive::Struct(xml_struct) => impl_composite(xml_struct),
        XmlDerive::Enum(xml_enum) => Ok(impl_primitive(xml_enum)),
    };
    result.unwrap_or_else(syn::Error::into_compile_error)
}
