//! Implementation of the `#[derive(Mappable)]` macro.

use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

use crate::attrs::{FieldAttrs, TypeAttrs};

pub fn derive_mappable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_mappable_inner(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

pub(crate) fn derive_mappable_inner(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Mappable cannot be derived for generic types",
        ));
    }

    let attrs = TypeAttrs::from_attrs(&input.attrs)?;
    let display_name = attrs.name.clone().unwrap_or_else(|| name.to_string());

    let fields = collect_fields(input, &display_name)?;
    let constructor = if attrs.no_default {
        quote! {}
    } else {
        quote! {
            .with_constructor(|| ::std::boxed::Box::new(<Self as ::std::default::Default>::default()))
        }
    };

    // type_name includes enclosing fns, so function-local types stay distinct
    Ok(quote! {
        impl ::automapper_core::Reflect for #name {
            fn descriptor() -> ::automapper_core::TypeDescriptor {
                ::automapper_core::TypeDescriptor {
                    type_hash: ::automapper_core::TypeHash::from_name(
                        ::std::any::type_name::<Self>()
                    ),
                    type_name: #display_name,
                    shape: ::automapper_core::TypeShape::Object {
                        meta: <Self as ::automapper_core::Mappable>::type_meta,
                    },
                }
            }
        }

        impl ::automapper_core::Mappable for #name {
            fn type_meta() -> ::automapper_core::TypeMeta {
                ::automapper_core::TypeMeta::new(
                    #display_name,
                    ::std::any::type_name::<Self>(),
                )
                .with_instance_check(|obj| obj.is::<Self>())
                #constructor
                #(#fields)*
            }
        }

        impl ::automapper_core::IntoValue for #name {
            fn into_value(self) -> ::automapper_core::Value {
                ::automapper_core::Value::Object(::automapper_core::ObjectValue::new(self))
            }
        }

        impl ::automapper_core::FromValue for #name {
            fn from_value(
                value: ::automapper_core::Value,
            ) -> ::std::result::Result<Self, ::automapper_core::ConversionError> {
                match value {
                    ::automapper_core::Value::Object(obj) => obj.downcast::<Self>(),
                    other => ::std::result::Result::Err(
                        ::automapper_core::ConversionError::TypeMismatch {
                            expected: #display_name,
                            actual: other.type_name(),
                        },
                    ),
                }
            }
        }
    })
}

/// Generate one `.with_field(...)` call per mapped struct field.
fn collect_fields(input: &DeriveInput, display_name: &str) -> syn::Result<Vec<TokenStream2>> {
    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Mappable can only be derived for structs",
            ));
        }
    };

    let named = match &data.fields {
        Fields::Named(fields) => &fields.named,
        Fields::Unit => return Ok(Vec::new()),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Mappable requires named fields",
            ));
        }
    };

    let mut seen = HashSet::new();
    let mut fields = Vec::new();

    for field in named {
        let field_attrs = FieldAttrs::from_attrs(&field.attrs)?;
        if field_attrs.skip {
            continue;
        }

        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let map_name = field_attrs
            .name
            .clone()
            .unwrap_or_else(|| field_ident.to_string());
        if !seen.insert(map_name.clone()) {
            return Err(syn::Error::new_spanned(
                field_ident,
                format!("duplicate mapping field name '{}'", map_name),
            ));
        }

        let field_ty = &field.ty;
        let (get, set) = field_attrs.access();
        let flags = match (get, set) {
            (true, true) => quote! { ::automapper_core::FieldFlags::READ_WRITE },
            (true, false) => quote! { ::automapper_core::FieldFlags::READ },
            _ => quote! { ::automapper_core::FieldFlags::WRITE },
        };
        let ignored = if field_attrs.ignore {
            quote! { .ignored() }
        } else {
            quote! {}
        };
        let map_to = match &field_attrs.map_to {
            Some(target) => quote! { .with_map_to(#target) },
            None => quote! {},
        };
        let converter = match &field_attrs.converter {
            Some(path) => quote! {
                .with_converter(|| ::automapper_core::Converter::new(#path))
            },
            None => quote! {},
        };

        fields.push(quote! {
            .with_field(
                ::automapper_core::FieldMeta::new(
                    #map_name,
                    <#field_ty as ::automapper_core::Reflect>::descriptor,
                    |obj| {
                        obj.downcast_ref::<Self>().map(|this| {
                            ::automapper_core::IntoValue::into_value(
                                ::std::clone::Clone::clone(&this.#field_ident),
                            )
                        })
                    },
                    |obj, value| match obj.downcast_mut::<Self>() {
                        ::std::option::Option::Some(this) => {
                            this.#field_ident =
                                <#field_ty as ::automapper_core::FromValue>::from_value(value)?;
                            ::std::result::Result::Ok(())
                        }
                        ::std::option::Option::None => ::std::result::Result::Err(
                            ::automapper_core::ConversionError::TypeMismatch {
                                expected: #display_name,
                                actual: "unknown",
                            },
                        ),
                    },
                )
                .with_flags(#flags)
                #ignored
                #map_to
                #converter
            )
        });
    }

    Ok(fields)
}
