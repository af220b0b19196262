use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Ident, Type, WherePredicate, parse_quote};

use crate::derive_data::{CallbackAttributes, ConstructorAttribute, ParameterAttribute};
use crate::derive_data::{XmlField, XmlStruct};
use crate::impls::impl_typed;

/// Paths shared by the generators below.
struct Paths {
    class_: TokenStream,
    descriptor_: TokenStream,
    macro_exports_: TokenStream,
    bind_: TokenStream,
}

/// A struct is a composite described by a `ClassDescriptor`.
pub(crate) fn impl_composite(xml_struct: &XmlStruct) -> syn::Result<TokenStream> {
    let meta = &xml_struct.meta;
    let vc_bind_path = meta.vc_bind_path();
    let paths = Paths {
        class_: crate::path::class_(vc_bind_path),
        descriptor_: crate::path::descriptor_(vc_bind_path),
        macro_exports_: crate::path::macro_exports_(vc_bind_path),
        bind_: crate::path::bind_(vc_bind_path),
    };
    let Paths {
        class_, descriptor_, ..
    } = &paths;
    let attrs = meta.attrs();

    let mut with = Vec::new();
    if attrs.root.is_some() || attrs.strict.is_some() {
        let name = match attrs.root.as_ref().and_then(Option::as_ref) {
            Some(name) => quote!(::core::option::Option::Some(#name)),
            None => quote!(::core::option::Option::None),
        };
        let strict = attrs.strict.as_ref().is_none_or(|strict| strict.value);
        with.push(quote! {
            .with_root(#descriptor_::RootDescriptor::new(#name, #strict))
        });
    }
    if let Some((elements, attributes)) = &attrs.order {
        with.push(quote! {
            .with_order(#descriptor_::OrderDescriptor::new(
                ::std::vec![#(#elements),*],
                ::std::vec![#(#attributes),*],
            ))
        });
    }
    if let Some(default) = &attrs.default {
        let access = if default.property {
            quote!(Property)
        } else {
            quote!(Field)
        };
        let required = default.required;
        with.push(quote! {
            .with_default(
                #descriptor_::DefaultDescriptor::new(#descriptor_::DefaultType::#access)
                    .with_required(#required)
            )
        });
    }
    if let Some(namespace) = &attrs.namespace {
        let namespace = namespace.to_tokens(descriptor_);
        with.push(quote!(.with_namespace(#namespace)));
    }
    for declaration in &attrs.declarations {
        let declaration = declaration.to_tokens(descriptor_);
        with.push(quote!(.with_declaration(#declaration)));
    }

    let mut types: Vec<&Type> = Vec::new();
    for field in xml_struct.members() {
        with.push(member_tokens(&paths, field)?);
        types.push(field.ty());
    }
    if let Some(base) = xml_struct.base() {
        with.push(base_tokens(&paths, base));
        types.push(base.ty());
    }

    let mut extra: Vec<WherePredicate> = Vec::new();
    if attrs.constructors.is_empty() {
        with.push(default_constructor_tokens(&paths));
        extra.push(parse_quote!(Self: ::core::default::Default));
    }
    for constructor in &attrs.constructors {
        match constructor {
            ConstructorAttribute::Default => {
                with.push(default_constructor_tokens(&paths));
                extra.push(parse_quote!(Self: ::core::default::Default));
            }
            ConstructorAttribute::Function { path, parameters } => {
                let mut resolved = Vec::with_capacity(parameters.len());
                for parameter in parameters {
                    let ty = parameter_type(xml_struct, parameter)?;
                    types.push(ty);
                    resolved.push((parameter, ty));
                }
                with.push(constructor_tokens(&paths, path, &resolved));
            }
        }
    }

    if !attrs.callbacks.is_empty() {
        with.push(callbacks_tokens(&paths, &attrs.callbacks));
    }

    let type_tokens = meta.type_tokens();
    let class_tokens = quote! {
        #class_::Class::Composite(#class_::CompositeInfo::new(
            #type_tokens,
            #descriptor_::ClassDescriptor::new()
                #(#with)*
        ))
    };

    let generics = meta.bounded_generics(&types, &extra);
    Ok(impl_typed(meta, &generics, class_tokens))
}

fn member_tokens(paths: &Paths, field: &XmlField) -> syn::Result<TokenStream> {
    let Paths {
        class_, descriptor_, ..
    } = paths;
    let name = field.name();
    let ty = field.ty();
    let access = access_tokens(paths, field)?;

    let annotation = field.attrs.label.as_ref().map(|label| {
        let annotation = label.to_tokens(descriptor_, field.is_optional());
        quote!(.with_annotation(#annotation))
    });
    let namespace = field.attrs.namespace.as_ref().map(|namespace| {
        let namespace = namespace.to_tokens(descriptor_);
        quote!(.with_namespace(#namespace))
    });
    let since = field.attrs.since.as_ref().map(|since| quote!(.with_since(#since)));

    Ok(quote! {
        .with_member(
            #descriptor_::MemberDescriptor::new(#name, <#ty as #class_::Typed>::class, #access)
                #annotation
                #namespace
                #since
        )
    })
}

/// `Access::Field` for plain fields, `Access::Property` when `get` names
/// an accessor method.
fn access_tokens(paths: &Paths, field: &XmlField) -> syn::Result<TokenStream> {
    let Paths {
        descriptor_, bind_, ..
    } = paths;
    let ident = field.ident;
    let ty = field.ty();

    let Some(getter) = &field.attrs.get else {
        let set = if field.attrs.read_only.is_some() {
            quote!(::core::option::Option::None)
        } else {
            setter_tokens(ty, quote!(owner.#ident = value))
        };
        return Ok(quote! {
            #descriptor_::Access::Field {
                get: |owner| ::core::option::Option::Some(&owner.downcast_ref::<Self>()?.#ident as &dyn #bind_),
                set: #set,
            }
        });
    };

    let get_ident: Ident = getter.parse()?;
    let (setter, set) = match &field.attrs.set {
        Some(setter) => {
            let set_ident: Ident = setter.parse()?;
            (
                quote!(::core::option::Option::Some(#setter)),
                setter_tokens(ty, quote!(owner.#set_ident(value))),
            )
        }
        None => (quote!(::core::option::Option::None), quote!(::core::option::Option::None)),
    };
    Ok(quote! {
        #descriptor_::Access::Property {
            getter: #getter,
            setter: #setter,
            get: |owner| ::core::option::Option::Some(owner.downcast_ref::<Self>()?.#get_ident() as &dyn #bind_),
            set: #set,
        }
    })
}

/// `Some(setter)` running `assign` with `owner: &mut Self` and `value: T`.
fn setter_tokens(ty: &Type, assign: TokenStream) -> TokenStream {
    quote! {
        ::core::option::Option::Some(|owner, value| {
            let ::core::option::Option::Some(owner) = owner.downcast_mut::<Self>() else {
                return ::core::result::Result::Err(value);
            };
            let value = value.take::<#ty>()?;
            #assign;
            ::core::result::Result::Ok(())
        })
    }
}

fn base_tokens(paths: &Paths, base: &XmlField) -> TokenStream {
    let Paths {
        class_,
        descriptor_,
        bind_,
        ..
    } = paths;
    let name = base.name();
    let ident = base.ident;
    let ty = base.ty();
    quote! {
        .with_base(#descriptor_::BaseDescriptor::new(
            #name,
            <#ty as #class_::Typed>::class,
            |owner| ::core::option::Option::Some(&owner.downcast_ref::<Self>()?.#ident as &dyn #bind_),
            |owner| ::core::option::Option::Some(&mut owner.downcast_mut::<Self>()?.#ident as &mut dyn #bind_),
        ))
    }
}

fn default_constructor_tokens(paths: &Paths) -> TokenStream {
    let descriptor_ = &paths.descriptor_;
    quote! {
        .with_constructor(#descriptor_::ConstructorDescriptor::new(
            "default",
            ::std::vec::Vec::new(),
            |_| ::core::result::Result::Ok(::std::boxed::Box::new(
                <Self as ::core::default::Default>::default(),
            )),
        ))
    }
}

/// The explicit type of a parameter, or the type of the member bound to
/// the label the parameter names.
fn parameter_type<'a>(xml_struct: &'a XmlStruct, parameter: &'a ParameterAttribute) -> syn::Result<&'a Type> {
    if let Some(ty) = &parameter.ty {
        return Ok(ty);
    }
    let name = parameter.name.value();
    xml_struct
        .fields
        .iter()
        .find(|field| field.label_kind() == Some(parameter.kind) && field.label_name() == name)
        .map(XmlField::ty)
        .ok_or_else(|| {
            syn::Error::new(
                parameter.name.span(),
                "no member of this struct binds this label, give the type as `kind(\"name\", Type)`",
            )
        })
}

fn constructor_tokens(paths: &Paths, path: &syn::Path, parameters: &[(&ParameterAttribute, &Type)]) -> TokenStream {
    let Paths {
        class_,
        descriptor_,
        macro_exports_,
        ..
    } = paths;
    let name = path.to_token_stream().to_string().replace(' ', "");

    let descriptors = parameters.iter().map(|(parameter, ty)| {
        let kind = parameter.kind.variant();
        let name = &parameter.name;
        quote! {
            #descriptor_::ParameterDescriptor::new(
                #descriptor_::LabelKind::#kind,
                #name,
                <#ty as #class_::Typed>::class,
            )
        }
    });

    let invoke = if parameters.is_empty() {
        quote! {
            |_| ::core::result::Result::Ok(::std::boxed::Box::new(#path()))
        }
    } else {
        let arguments = parameters.iter().map(|(parameter, ty)| {
            let name = &parameter.name;
            quote!(#macro_exports_::argument::<#ty>(&mut arguments, #name)?)
        });
        quote! {
            |arguments| {
                let mut arguments = arguments.into_iter();
                ::core::result::Result::Ok(::std::boxed::Box::new(#path(#(#arguments),*)))
            }
        }
    };

    quote! {
        .with_constructor(#descriptor_::ConstructorDescriptor::new(
            #name,
            ::std::vec![#(#descriptors),*],
            #invoke,
        ))
    }
}

fn callbacks_tokens(paths: &Paths, callbacks: &CallbackAttributes) -> TokenStream {
    let Paths {
        descriptor_,
        macro_exports_,
        ..
    } = paths;
    let mut hooks = Vec::new();

    let mutable = [("commit", &callbacks.commit), ("validate", &callbacks.validate)];
    for (slot, method) in mutable {
        if let Some(method) = method {
            let slot = Ident::new(slot, method.span());
            hooks.push(quote! {
                #slot: ::core::option::Option::Some(|value, session| match value.downcast_mut::<Self>() {
                    ::core::option::Option::Some(value) => #macro_exports_::hook(Self::#method(value, session)),
                    ::core::option::Option::None => ::core::result::Result::Ok(()),
                }),
            });
        }
    }
    let shared = [("persist", &callbacks.persist), ("complete", &callbacks.complete)];
    for (slot, method) in shared {
        if let Some(method) = method {
            let slot = Ident::new(slot, method.span());
            hooks.push(quote! {
                #slot: ::core::option::Option::Some(|value, session| match value.downcast_ref::<Self>() {
                    ::core::option::Option::Some(value) => #macro_exports_::hook(Self::#method(value, session)),
                    ::core::option::Option::None => ::core::result::Result::Ok(()),
                }),
            });
        }
    }
    if let Some(method) = &callbacks.replace {
        hooks.push(quote! {
            replace: ::core::option::Option::Some(|value, session| match value.downcast_ref::<Self>() {
                ::core::option::Option::Some(value) => #macro_exports_::replaced(Self::#method(value, session)),
                ::core::option::Option::None => ::core::result::Result::Ok(::core::option::Option::None),
            }),
        });
    }
    if let Some(method) = &callbacks.resolve {
        hooks.push(quote! {
            resolve: ::core::option::Option::Some(|value, session| match value.take::<Self>() {
                ::core::result::Result::Ok(value) => #macro_exports_::resolved(Self::#method(value, session)),
                ::core::result::Result::Err(value) => ::core::result::Result::Ok(value),
            }),
        });
    }

    quote! {
        .with_callbacks(#descriptor_::Callbacks {
            #(#hooks)*
            ..#descriptor_::Callbacks::new()
        })
    }
}
