// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, Data, DataEnum, DeriveInput, Fields, FieldsNamed, GenericArgument, LitInt,
    LitStr, PathArguments, Type,
};

/// Type-level options from `#[marshal(...)]`.
#[derive(Default)]
struct TypeOptions {
    name: Option<LitStr>,
    legacy_id: Option<LitInt>,
    streamed: bool,
    external: bool,
}

fn parse_type_options(input: &DeriveInput) -> syn::Result<TypeOptions> {
    let mut options = TypeOptions::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("marshal")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                options.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("legacy_id") {
                options.legacy_id = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("streamed") {
                options.streamed = true;
            } else if meta.path.is_ident("external") {
                options.external = true;
            } else {
                return Err(meta.error("expected `name`, `legacy_id`, `streamed` or `external`"));
            }
            Ok(())
        })?;
    }
    if options.streamed && options.external {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`streamed` and `external` are mutually exclusive",
        ));
    }
    Ok(options)
}

fn is_skipped(field: &syn::Field) -> syn::Result<bool> {
    let mut skip = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("marshal")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

/// Element type of `Vec<P>` when `P` is one of the eight primitive kinds.
fn primitive_vec_element(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Vec" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let Some(GenericArgument::Type(inner)) = args.args.first() else {
        return None;
    };
    let Type::Path(inner_path) = inner else {
        return None;
    };
    let ident = inner_path.path.get_ident()?.to_string();
    matches!(
        ident.as_str(),
        "bool" | "i8" | "char" | "i16" | "i32" | "i64" | "f32" | "f64"
    )
    .then_some(inner)
}

/// `#[derive(Marshal)]`: binds a struct as a class or a fieldless enum as an
/// enum class.
///
/// Structs get `Marshallable` plus a by-value `PropertyValue` (the type must
/// also be `Default + Clone`). Every named field is a property unless marked
/// `#[marshal(skip)]`; `Vec<primitive>` fields use the primitive-array fast
/// path.
///
/// Type attributes:
/// - `#[marshal(name = "acme::Foo")]` canonical name (default: module path + ident)
/// - `#[marshal(legacy_id = 42)]` pinned legacy structural id
/// - `#[marshal(streamed)]` / `#[marshal(external)]` self-describing classes
///
/// Example:
/// ```ignore
/// use wirebind::Marshal;
///
/// #[derive(Marshal, Default, Clone)]
/// #[marshal(name = "acme::Foo")]
/// struct Foo {
///     id: i32,
///     name: String,
///     #[marshal(skip)]
///     cache: Option<String>,
/// }
///
/// #[derive(Marshal, Clone, Copy)]
/// enum Color {
///     Red,
///     Green,
/// }
/// ```
#[proc_macro_derive(Marshal, attributes(marshal))]
pub fn derive_marshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "Generic types cannot be bound")
            .to_compile_error()
            .into();
    }

    let options = match parse_type_options(&input) {
        Ok(options) => options,
        Err(e) => return e.to_compile_error().into(),
    };

    let ident = &input.ident;
    let ident_str = ident.to_string();
    let canonical_name = match &options.name {
        Some(name) => quote! { #name },
        None => quote! { concat!(module_path!(), "::", #ident_str) },
    };

    let expanded = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_struct(&input, &options, &canonical_name, fields),
            _ => Err(syn::Error::new_spanned(
                &input,
                "Only structs with named fields are supported",
            )),
        },
        Data::Enum(data) => expand_enum(&input, &options, &canonical_name, data),
        Data::Union(_) => Err(syn::Error::new_spanned(&input, "Unions are not supported")),
    };

    match expanded {
        Ok(tokens) => TokenStream::from(tokens),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_struct(
    input: &DeriveInput,
    options: &TypeOptions,
    canonical_name: &proc_macro2::TokenStream,
    fields: &FieldsNamed,
) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;

    let mut declarations = Vec::new();
    for field in &fields.named {
        if is_skipped(field)? {
            continue;
        }
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let name_str = field_name.to_string();
        let declaration = if primitive_vec_element(&field.ty).is_some() {
            quote! {
                class.array_property(#name_str, |s| &s.#field_name, |s| &mut s.#field_name);
            }
        } else {
            quote! {
                class.property(#name_str, |s| &s.#field_name, |s| &mut s.#field_name);
            }
        };
        declarations.push(declaration);
    }

    let legacy = options
        .legacy_id
        .as_ref()
        .map(|id| quote! { class.legacy_id(#id); });
    let capability = if options.streamed {
        Some(quote! { class.streamed(); })
    } else if options.external {
        Some(quote! { class.external(); })
    } else {
        None
    };

    Ok(quote! {
        impl ::wirebind::Marshallable for #ident {
            fn canonical_name() -> &'static str {
                #canonical_name
            }

            fn describe(class: &mut ::wirebind::ClassBuilder<Self>) {
                #(#declarations)*
                #legacy
                #capability
            }
        }

        impl ::wirebind::PropertyValue for #ident {
            fn type_ref() -> ::wirebind::TypeRef {
                ::wirebind::TypeRef::class(<Self as ::wirebind::Marshallable>::canonical_name())
            }

            fn to_value(&self) -> ::wirebind::Value {
                ::wirebind::object_to_value(self)
            }

            fn from_value(value: ::wirebind::Value) -> ::wirebind::Result<Self> {
                ::wirebind::object_from_value(value)
            }
        }
    })
}

fn expand_enum(
    input: &DeriveInput,
    options: &TypeOptions,
    canonical_name: &proc_macro2::TokenStream,
    data: &DataEnum,
) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    if options.legacy_id.is_some() || options.streamed || options.external {
        return Err(syn::Error::new_spanned(
            ident,
            "Enums only accept `#[marshal(name = ...)]`",
        ));
    }

    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(ident, "Enums need at least one variant"));
    }

    let mut variants = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Only fieldless enum variants are supported",
            ));
        }
        variants.push(&variant.ident);
    }

    let constants: Vec<String> = variants.iter().map(|v| v.to_string()).collect();
    let ordinals: Vec<u32> = (0..variants.len())
        .map(|i| u32::try_from(i).unwrap_or(u32::MAX))
        .collect();

    Ok(quote! {
        impl ::wirebind::MarshalEnum for #ident {
            fn canonical_name() -> &'static str {
                #canonical_name
            }

            fn constants() -> &'static [&'static str] {
                &[#(#constants),*]
            }

            fn ordinal(&self) -> u32 {
                match self {
                    #(Self::#variants => #ordinals,)*
                }
            }

            fn from_ordinal(ordinal: u32) -> Option<Self> {
                match ordinal {
                    #(#ordinals => Some(Self::#variants),)*
                    _ => None,
                }
            }
        }

        impl ::wirebind::PropertyValue for #ident {
            fn type_ref() -> ::wirebind::TypeRef {
                ::wirebind::TypeRef::enumeration(<Self as ::wirebind::MarshalEnum>::canonical_name())
            }

            fn to_value(&self) -> ::wirebind::Value {
                ::wirebind::enum_to_value(self)
            }

            fn from_value(value: ::wirebind::Value) -> ::wirebind::Result<Self> {
                ::wirebind::enum_from_value(value)
            }
        }
    })
}
