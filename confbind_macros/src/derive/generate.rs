//! Token generation for `#[derive(Bind)]`.
//!
//! The expansion is wrapped in an anonymous `const` block holding one
//! `static` `FieldMeta` per field, so field metadata is built at compile
//! time and shared by the read and write views.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse_quote;

use super::parse::{JsonKey, ParsedInput};

fn json_tokens(json: &JsonKey, krate: &TokenStream) -> TokenStream {
    match json {
        JsonKey::Inherit => quote! { #krate::JsonKey::Inherit },
        JsonKey::Rename(key) => quote! { #krate::JsonKey::Rename(#key) },
        JsonKey::Skip => quote! { #krate::JsonKey::Skip },
    }
}

/// Adds a `Bind` bound for every type parameter.
fn bind_generics(generics: &syn::Generics, krate: &TokenStream) -> syn::Generics {
    let mut bounded = generics.clone();
    let params: Vec<_> = generics.type_params().map(|param| param.ident.clone()).collect();
    let where_clause = bounded.make_where_clause();
    for param in params {
        where_clause
            .predicates
            .push(parse_quote! { #param: #krate::Bind });
    }
    bounded
}

/// Emits the `Bind` and `Record` implementations.
pub(crate) fn bind_impls(input: &ParsedInput, krate: &TokenStream) -> TokenStream {
    let ident = &input.ident;
    let generics = bind_generics(&input.generics, krate);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let metas: Vec<_> = (0..input.fields.len())
        .map(|index| format_ident!("__CONFBIND_FIELD_{}", index))
        .collect();
    let members: Vec<_> = input.fields.iter().map(|field| &field.member).collect();
    let statics = input.fields.iter().zip(&metas).map(|(field, meta)| {
        let name = &field.name;
        let annotation = &field.annotation;
        let json = json_tokens(&field.json, krate);
        quote! {
            static #meta: #krate::FieldMeta = #krate::FieldMeta {
                ident: #name,
                annotation: #annotation,
                json: #json,
            };
        }
    });

    quote! {
        const _: () = {
            #( #statics )*

            impl #impl_generics #krate::Bind for #ident #ty_generics #where_clause {
                fn node(&self) -> #krate::Node<'_> {
                    #krate::Node::Record(self)
                }

                fn node_mut(&mut self) -> #krate::NodeMut<'_> {
                    #krate::NodeMut::Record(self)
                }
            }

            impl #impl_generics #krate::Record for #ident #ty_generics #where_clause {
                fn fields(&self) -> ::std::vec::Vec<#krate::Field<'_>> {
                    ::std::vec![#( #krate::Field::new(&#metas, &self.#members) ),*]
                }

                fn fields_mut(&mut self) -> ::std::vec::Vec<#krate::FieldMut<'_>> {
                    ::std::vec![#( #krate::FieldMut::new(&#metas, &mut self.#members) ),*]
                }
            }
        };
    }
}
