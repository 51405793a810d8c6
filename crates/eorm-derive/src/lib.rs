//! Derive macro for ORM models.
//!
//! This crate provides `#[derive(Model)]`, which describes a struct's fields to
//! the `eorm-core` metadata registry.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Meta};

/// Derives `eorm_core::meta::Model` for a struct with named fields.
///
/// # Attributes
///
/// - `#[eorm(table = "table_name")]` - Specifies the SQL table name (optional,
///   defaults to snake_case of struct name)
///
/// # Field Attributes
///
/// - `#[eorm(primary_key)]` - Marks the field as (part of) the primary key
/// - `#[eorm(auto_increment)]` - The database assigns the value on insert
/// - `#[eorm(ignore)]` - Excludes the field from the table
/// - `#[eorm(column = "column_name")]` - Specifies the SQL column name
///   (optional, defaults to the field name)
/// - `#[eorm("auto_increment,primary_key")]` - A raw tag, validated when the
///   model is registered
///
/// Fields are reported in declaration order.
#[proc_macro_derive(Model, attributes(eorm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_model_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_model_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Model derive does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Model derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Model derive only supports structs",
            ));
        }
    };

    let type_name = struct_name.unraw().to_string();
    let table_name = match get_table_name(&input.attrs)? {
        Some(name) => quote! { ::std::option::Option::Some(#name) },
        None => quote! { ::std::option::Option::None },
    };

    let mut descriptors = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_name = ident.unraw().to_string();
        let field_type = &field.ty;
        let tag = parse_field_tag(&field.attrs)?;
        descriptors.push(quote! {
            ::eorm_core::meta::FieldDescriptor::new::<#field_type>(#field_name, #tag)
        });
    }

    Ok(quote! {
        impl ::eorm_core::meta::Model for #struct_name {
            fn type_name() -> &'static str {
                #type_name
            }

            fn table_name() -> ::std::option::Option<&'static str> {
                #table_name
            }

            fn fields() -> ::std::vec::Vec<::eorm_core::meta::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

fn get_table_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut table_name = None;
    for attr in attrs {
        if attr.path().is_ident("eorm") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let value: LitStr = meta.value()?.parse()?;
                    table_name = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported eorm struct attribute"))
                }
            })?;
        }
    }
    Ok(table_name)
}

/// Collects a field's `eorm` attributes into one comma-separated tag.
fn parse_field_tag(attrs: &[Attribute]) -> syn::Result<String> {
    let mut tokens: Vec<String> = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("eorm") {
            continue;
        }
        // Handle empty attribute like #[eorm]
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        if let Ok(raw) = attr.parse_args::<LitStr>() {
            tokens.push(raw.value());
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") {
                tokens.push("primary_key".to_string());
            } else if meta.path.is_ident("auto_increment") {
                tokens.push("auto_increment".to_string());
            } else if meta.path.is_ident("ignore") {
                tokens.push("-".to_string());
            } else if meta.path.is_ident("column") {
                let value: LitStr = meta.value()?.parse()?;
                tokens.push(format!("column={}", value.value()));
            } else {
                return Err(meta.error("unsupported eorm field attribute"));
            }
            Ok(())
        })?;
    }

    Ok(tokens.join(","))
}
