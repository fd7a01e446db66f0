//! Procedural macros for `confbind`.
//!
//! `#[derive(Bind)]` implements `confbind::Bind` and `confbind::Record` for a
//! struct with named fields. Every `pub` field is exposed to the binding and
//! display drivers in declaration order; other fields are never touched.
//!
//! Field attributes:
//!
//! - `#[config("...")]` attaches a directive annotation such as
//!   `"env:PORT,default:8080"`. It is parsed by `confbind::Tag::parse`.
//! - `#[config(json = "key")]` reads the field from a different JSON key;
//!   `json = "-"` never reads it from JSON.
//!
//! Both forms may be combined: `#[config("print:-", json = "token")]`.
//! The struct attribute `#[config(crate = "path")]` points generated code at
//! a renamed dependency.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `confbind::Bind`.
#[proc_macro_derive(Bind, attributes(config))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
