//! Attribute parsing for `#[derive(Bind)]`.
//!
//! Struct and field attributes share the `config` name. The argument list is
//! a comma-separated mix of an optional bare string literal (the directive
//! annotation) and `key = "value"` pairs.

use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Token, Visibility};

/// JSON key override for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum JsonKey {
    Inherit,
    Rename(String),
    Skip,
}

/// A `pub` field exposed to the binding drivers.
#[derive(Debug, Clone)]
pub(crate) struct BindField {
    pub member: syn::Ident,
    /// Identifier without any `r#` prefix.
    pub name: String,
    pub annotation: String,
    pub json: JsonKey,
}

/// Everything the generator needs from the derive input.
#[derive(Debug, Clone)]
pub(crate) struct ParsedInput {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub fields: Vec<BindField>,
    pub crate_path: Option<syn::Path>,
}

enum ConfigArg {
    Annotation(LitStr),
    Json(LitStr),
    Crate(LitStr),
}

impl Parse for ConfigArg {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return input.parse().map(Self::Annotation);
        }
        // `crate` is a keyword, so accept any identifier here.
        let key = input.call(syn::Ident::parse_any)?;
        input.parse::<Token![=]>()?;
        let value: LitStr = input.parse()?;
        match key.to_string().as_str() {
            "json" => Ok(Self::Json(value)),
            "crate" => Ok(Self::Crate(value)),
            other => Err(syn::Error::new(
                key.span(),
                format!("unknown config key `{other}`; expected `json` or `crate`"),
            )),
        }
    }
}

/// Collects the arguments of every `#[config(...)]` attribute in order.
fn config_args(attrs: &[Attribute]) -> syn::Result<Vec<ConfigArg>> {
    let mut out = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("config")) {
        out.extend(attr.parse_args_with(Punctuated::<ConfigArg, Token![,]>::parse_terminated)?);
    }
    Ok(out)
}

fn store_once(slot: &mut Option<LitStr>, value: LitStr, what: &str) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            value.span(),
            format!("{what} specified more than once"),
        ));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<Option<syn::Path>> {
    let mut crate_path = None;
    for arg in config_args(attrs)? {
        match arg {
            ConfigArg::Crate(lit) => store_once(&mut crate_path, lit, "`crate`")?,
            ConfigArg::Annotation(lit) | ConfigArg::Json(lit) => {
                return Err(syn::Error::new(
                    lit.span(),
                    "directive annotations and `json` belong on fields, not on the struct",
                ));
            }
        }
    }
    crate_path
        .map(|lit| lit.parse::<syn::Path>())
        .transpose()
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<(String, JsonKey)> {
    let mut annotation = None;
    let mut json = None;
    for arg in config_args(attrs)? {
        match arg {
            ConfigArg::Annotation(lit) => store_once(&mut annotation, lit, "annotation")?,
            ConfigArg::Json(lit) => store_once(&mut json, lit, "`json`")?,
            ConfigArg::Crate(lit) => {
                return Err(syn::Error::new(
                    lit.span(),
                    "`crate` belongs on the struct, not on a field",
                ));
            }
        }
    }
    let json_key = match json {
        None => JsonKey::Inherit,
        Some(lit) => match lit.value().as_str() {
            "" => return Err(syn::Error::new(lit.span(), "JSON key must not be empty")),
            "-" => JsonKey::Skip,
            key => JsonKey::Rename(key.to_owned()),
        },
    };
    Ok((annotation.map(|lit| lit.value()).unwrap_or_default(), json_key))
}

/// Gathers the struct identifier, generics and bindable fields.
///
/// Attributes on non-`pub` fields are still validated so mistakes surface
/// even though those fields are never bound.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let crate_path = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Bind requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Bind can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::new();
    for field in named {
        let (annotation, json) = parse_field_attrs(&field.attrs)?;
        let (Visibility::Public(_), Some(member)) = (&field.vis, &field.ident) else {
            continue;
        };
        fields.push(BindField {
            member: member.clone(),
            name: member.unraw().to_string(),
            annotation,
            json,
        });
    }
    Ok(ParsedInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        fields,
        crate_path,
    })
}
