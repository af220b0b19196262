use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::XmlEnum;
use crate::impls::impl_typed;

/// A unit enum is a primitive written as the text of its variant.
pub(crate) fn impl_primitive(xml_enum: &XmlEnum) -> TokenStream {
    let meta = &xml_enum.meta;
    let vc_bind_path = meta.vc_bind_path();
    let class_ = crate::path::class_(vc_bind_path);
    let macro_exports_ = crate::path::macro_exports_(vc_bind_path);
    let type_tokens = meta.type_tokens();
    let name = meta.ident().to_string();

    let idents: Vec<_> = xml_enum.variants.iter().map(|variant| variant.ident).collect();
    let texts: Vec<_> = xml_enum.variants.iter().map(|variant| &variant.text).collect();

    let class_tokens = quote! {
        #class_::Class::Primitive(#class_::PrimitiveInfo::new(
            #type_tokens,
            |text| match text {
                #(#texts => ::core::result::Result::Ok(::std::boxed::Box::new(Self::#idents)),)*
                _ => ::core::result::Result::Err(
                    #macro_exports_::unknown_variant(text, #name),
                ),
            },
            |value| {
                value.downcast_ref::<Self>().map(|value| {
                    ::std::string::String::from(match value {
                        #(Self::#idents => #texts,)*
                    })
                })
            },
        ))
    };

    impl_typed(meta, &meta.bounded_generics(&[], &[]), class_tokens)
}
