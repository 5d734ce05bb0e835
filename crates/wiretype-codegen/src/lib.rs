// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Derive macros for `wiretype`.
//!
//! - `#[derive(Reflect)]`: field table, typed accessors and visitation.
//! - `#[derive(Layout)]`: makes a reflected struct usable as a field and
//!   as a transfer element.
//!
//! Both expand to paths under `::wiretype`.

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Member, Type, Visibility};

/// Same limit as `wiretype::MAX_FIELDS`; the generated const assertion
/// checks the two agree.
const MAX_FIELDS: usize = 12;

struct FieldInfo {
    member: Member,
    ty: Type,
}

/// `#[derive(Reflect)]`: field count, shapes, offsets, accessors, visitor.
///
/// Accepted input: a `#[repr(C)]` or `#[repr(transparent)]` struct, not
/// packed, without lifetime parameters, whose fields are all `pub` and at
/// most 12. Anything else is a compile error.
///
/// Example:
/// ```ignore
/// #[derive(Clone, Copy, wiretype::Reflect)]
/// #[repr(C)]
/// pub struct Sample {
///     pub id: u32,
///     pub value: f64,
/// }
/// ```
#[proc_macro_derive(Reflect)]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_reflect(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// `#[derive(Layout)]`: descriptor synthesis for a reflected struct.
///
/// Requires `Reflect` (usually derived alongside) and `Copy`. A struct
/// without fields has no wire layout and is rejected.
#[proc_macro_derive(Layout)]
pub fn derive_layout(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_layout(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn struct_fields(input: &DeriveInput) -> syn::Result<Vec<FieldInfo>> {
    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "enums have no fixed field layout; only structs are supported",
            ))
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "unions are not supported; only structs are",
            ))
        }
    };

    let fields = match &data.fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unnamed(unnamed) => unnamed.unnamed.iter().collect(),
        Fields::Unit => Vec::new(),
    };

    fields
        .into_iter()
        .enumerate()
        .map(|(index, field)| {
            let member = match &field.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(index.into()),
            };
            Ok(FieldInfo {
                member,
                ty: field.ty.clone(),
            })
        })
        .collect()
}

/// Require `repr(C)` or `repr(transparent)` and reject `packed`.
fn check_repr(input: &DeriveInput) -> syn::Result<()> {
    let mut stable = false;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("C") || meta.path.is_ident("transparent") {
                stable = true;
            } else if meta.path.is_ident("packed") {
                return Err(meta.error(
                    "packed structs are not supported: fields may be unaligned",
                ));
            } else if meta.input.peek(syn::token::Paren) {
                // align(N)
                let content;
                syn::parenthesized!(content in meta.input);
                content.parse::<TokenStream2>()?;
            }
            Ok(())
        })?;
    }
    if stable {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &input.ident,
            "add #[repr(C)]: field order and offsets must match the declaration",
        ))
    }
}

fn check_fields(input: &DeriveInput) -> syn::Result<()> {
    if let Data::Struct(data) = &input.data {
        for field in &data.fields {
            if !matches!(field.vis, Visibility::Public(_)) {
                return Err(syn::Error::new_spanned(
                    field,
                    "all fields must be `pub`; types with hidden state are not supported",
                ));
            }
        }
    }
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "borrowed fields are not supported; the type must be 'static",
        ));
    }
    Ok(())
}

/// Where-clause: every type parameter and every field type is `Layout`.
fn layout_bounds(input: &DeriveInput, fields: &[FieldInfo]) -> syn::Generics {
    let mut generics = input.generics.clone();
    if generics.type_params().next().is_none() {
        return generics;
    }
    let params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    let clause = generics.make_where_clause();
    for param in params {
        clause
            .predicates
            .push(syn::parse_quote!(#param: ::wiretype::Layout));
    }
    for field in fields {
        let ty = &field.ty;
        clause
            .predicates
            .push(syn::parse_quote!(#ty: ::wiretype::Layout));
    }
    generics
}

#[allow(clippy::too_many_lines)]
fn expand_reflect(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = struct_fields(input)?;
    check_repr(input)?;
    check_fields(input)?;
    if fields.len() > MAX_FIELDS {
        return Err(syn::Error::new_spanned(
            &input.ident,
            format!(
                "{} fields exceed the supported maximum of {MAX_FIELDS}",
                fields.len()
            ),
        ));
    }

    let name = &input.ident;
    let type_name = name.to_string();
    let count = fields.len();
    let generics = layout_bounds(input, &fields);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let shapes = fields.iter().map(|f| {
        let ty = &f.ty;
        quote! { <#ty as ::wiretype::Layout>::SHAPE }
    });

    let offsets = fields.iter().enumerate().map(|(i, f)| {
        let member = &f.member;
        quote! { #i => ::core::option::Option::Some(::core::mem::offset_of!(Self, #member)), }
    });

    let sizes = fields.iter().enumerate().map(|(i, f)| {
        let ty = &f.ty;
        quote! { #i => ::core::option::Option::Some(::core::mem::size_of::<#ty>()), }
    });

    let describes = fields.iter().enumerate().map(|(i, f)| {
        let ty = &f.ty;
        quote! {
            #i => ::core::option::Option::Some(
                synth.datatype::<<#ty as ::wiretype::Layout>::Element>()
            ),
        }
    });

    let descriptor = |i: usize, f: &FieldInfo| {
        let ty = &f.ty;
        let member = &f.member;
        quote! {
            ::wiretype::FieldDescriptor::new(
                #i,
                <#ty as ::wiretype::Layout>::SHAPE,
                ::core::mem::offset_of!(Self, #member),
                ::core::mem::size_of::<#ty>(),
            )
        }
    };

    let visits = fields.iter().enumerate().map(|(i, f)| {
        let member = &f.member;
        let field = descriptor(i, f);
        quote! { ::wiretype::Layout::accept(&self.#member, &#field, visitor); }
    });

    let visits_mut = fields.iter().enumerate().map(|(i, f)| {
        let member = &f.member;
        let field = descriptor(i, f);
        quote! { ::wiretype::Layout::accept_mut(&mut self.#member, &#field, visitor); }
    });

    let accessors = fields.iter().enumerate().map(|(i, f)| {
        let ty = &f.ty;
        let member = &f.member;
        quote! {
            impl #impl_generics ::wiretype::FieldAt<#i> for #name #ty_generics #where_clause {
                type Type = #ty;

                #[inline]
                fn get(&self) -> &#ty {
                    &self.#member
                }

                #[inline]
                fn get_mut(&mut self) -> &mut #ty {
                    &mut self.#member
                }
            }
        }
    });

    // Forces the shapes (and their rank checks) to be evaluated at build time.
    let assertion = if input.generics.params.is_empty() {
        quote! {
            const _: () = ::core::assert!(
                <#name as ::wiretype::Reflect>::FIELD_SHAPES.len() <= ::wiretype::MAX_FIELDS,
                "too many fields for wiretype::Reflect",
            );
        }
    } else {
        TokenStream2::new()
    };

    let unused = if count == 0 {
        quote! { let _ = visitor; }
    } else {
        TokenStream2::new()
    };
    let unused_synth = if count == 0 {
        quote! { let _ = synth; }
    } else {
        TokenStream2::new()
    };

    Ok(quote! {
        unsafe impl #impl_generics ::wiretype::Reflect for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const FIELD_COUNT: usize = #count;
            const FIELD_SHAPES: &'static [::wiretype::FieldShape] = &[#(#shapes),*];

            fn field_offset(index: usize) -> ::core::option::Option<usize> {
                match index {
                    #(#offsets)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_size(index: usize) -> ::core::option::Option<usize> {
                match index {
                    #(#sizes)*
                    _ => ::core::option::Option::None,
                }
            }

            fn describe_field<Tr: ::wiretype::Transport>(
                index: usize,
                synth: &::wiretype::Synthesizer<Tr>,
            ) -> ::core::option::Option<::wiretype::Result<Tr::Handle>> {
                #unused_synth
                match index {
                    #(#describes)*
                    _ => ::core::option::Option::None,
                }
            }

            fn visit<V: ::wiretype::FieldVisitor + ?Sized>(&self, visitor: &mut V) {
                #unused
                #(#visits)*
            }

            fn visit_mut<V: ::wiretype::FieldVisitorMut + ?Sized>(&mut self, visitor: &mut V) {
                #unused
                #(#visits_mut)*
            }
        }

        #(#accessors)*

        #assertion
    })
}

fn expand_layout(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = struct_fields(input)?;
    if fields.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "a struct without fields has no wire layout",
        ));
    }

    let name = &input.ident;
    let type_name = name.to_string();
    let generics = layout_bounds(input, &fields);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        unsafe impl #impl_generics ::wiretype::Layout for #name #ty_generics #where_clause {
            type Element = Self;
            const SHAPE: ::wiretype::FieldShape =
                ::wiretype::FieldShape::scalar(::wiretype::ElementKind::Struct(#type_name));

            fn describe<Tr: ::wiretype::Transport>(
                synth: &::wiretype::Synthesizer<Tr>,
            ) -> ::wiretype::Result<Tr::Handle> {
                synth.composite::<Self>()
            }
        }
    })
}
