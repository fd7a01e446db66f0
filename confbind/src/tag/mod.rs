//! Parser for per-field `#[config("...")]` annotations.
//!
//! An annotation is a comma-separated list of directives. Each directive is a
//! bare keyword (`required`) or `keyword:arg`, where every colon after the
//! first belongs to the argument list:
//!
//! | keyword    | arguments | effect                                        |
//! |------------|-----------|-----------------------------------------------|
//! | `required` | none      | marks the field as required (advisory only)   |
//! | `name`     | 1         | renames the field for every source and output |
//! | `env`      | 1         | renames the environment variable segment only |
//! | `print`    | 1 or 2    | display name and/or display mode              |
//! | `default`  | 1 or more | default literal, arguments rejoined with `:`  |
//!
//! `name` is applied before `env` and `print`, whatever the written order, so
//! the narrower directives can still override a single name.

use crate::error::TagSyntaxError;
use crate::value::FieldMeta;

/// How a field appears in rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Render the value.
    #[default]
    Show,
    /// Omit the field and everything beneath it.
    Suppress,
    /// Render only values that differ from their zero value.
    NonZero,
    /// Render the element count instead of the contents.
    Len,
    /// Render a fixed placeholder unless the value is zero.
    Mask,
    /// Render a SHA-256 digest. Recognised but not implemented.
    Sha256,
}

impl DisplayMode {
    /// Maps a special `print` token to its mode.
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "-" | "none" => Some(Self::Suppress),
            "[nonzero]" => Some(Self::NonZero),
            "[len]" => Some(Self::Len),
            "[mask]" => Some(Self::Mask),
            "[sha256]" => Some(Self::Sha256),
            _ => None,
        }
    }
}

/// Parsed directives for one struct field.
///
/// # Examples
///
/// ```
/// use confbind::{DisplayMode, Tag};
///
/// let tag = Tag::parse("Password", "env:pw,print:Secret:[mask]").expect("valid tag");
/// assert_eq!(tag.env_name, "pw");
/// assert_eq!(tag.display_name, "Secret");
/// assert_eq!(tag.display, DisplayMode::Mask);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Canonical identifier, also the JSON key unless overridden.
    pub field_name: &'a str,
    /// Environment segment before upper-casing.
    pub env_name: &'a str,
    /// Name used in rendered output.
    pub display_name: &'a str,
    /// Display policy.
    pub display: DisplayMode,
    /// Default literal applied when the environment has no value.
    pub default: Option<&'a str>,
    /// Whether the field was marked `required`. Never enforced.
    pub required: bool,
}

/// Raw directive text, keyed by keyword, applied later in a fixed order.
#[derive(Default)]
struct Directives<'a> {
    required: Option<&'a str>,
    name: Option<&'a str>,
    env: Option<&'a str>,
    print: Option<&'a str>,
    default: Option<&'a str>,
}

impl<'a> Directives<'a> {
    fn collect(field: &str, annotation: &'a str) -> Result<Self, TagSyntaxError> {
        let mut out = Self::default();
        for directive in annotation.split(',') {
            let keyword = directive.split(':').next().unwrap_or_default();
            let slot = match keyword {
                "required" => &mut out.required,
                "name" => &mut out.name,
                "env" => &mut out.env,
                "print" => &mut out.print,
                "default" => &mut out.default,
                other => {
                    return Err(TagSyntaxError::UnknownDirective {
                        field: field.to_owned(),
                        directive: other.to_owned(),
                    });
                }
            };
            if slot.is_some() {
                return Err(TagSyntaxError::Repeated {
                    field: field.to_owned(),
                    directive: keyword.to_owned(),
                });
            }
            *slot = Some(directive);
        }
        Ok(out)
    }
}

/// Arguments of a raw directive: everything after the keyword, split on `:`.
fn arguments(directive: &str) -> Vec<&str> {
    directive.split(':').skip(1).collect()
}

/// Returns the single argument of `directive` or an argument-count error.
fn single<'a>(
    field: &str,
    directive: &'static str,
    args: &[&'a str],
) -> Result<&'a str, TagSyntaxError> {
    match args {
        [only] => Ok(*only),
        _ => Err(TagSyntaxError::ArgumentCount {
            field: field.to_owned(),
            directive,
            expected: "requires exactly one argument",
            actual: args.len(),
        }),
    }
}

impl<'a> Tag<'a> {
    /// The tag of a field without an annotation.
    #[must_use]
    pub const fn plain(field: &'a str) -> Self {
        Self {
            field_name: field,
            env_name: field,
            display_name: field,
            display: DisplayMode::Show,
            default: None,
            required: false,
        }
    }

    /// Parses `annotation` for the field named `field`.
    ///
    /// An empty annotation yields [`Tag::plain`].
    ///
    /// # Errors
    ///
    /// Returns a [`TagSyntaxError`] for unknown directives, repeated
    /// directives, wrong argument counts, or an invalid `print` mode.
    pub fn parse(field: &'a str, annotation: &'a str) -> Result<Self, TagSyntaxError> {
        let mut tag = Self::plain(field);
        if annotation.is_empty() {
            return Ok(tag);
        }
        let directives = Directives::collect(field, annotation)?;

        if let Some(raw) = directives.required {
            let args = arguments(raw);
            if !args.is_empty() {
                return Err(TagSyntaxError::ArgumentCount {
                    field: field.to_owned(),
                    directive: "required",
                    expected: "does not accept arguments",
                    actual: args.len(),
                });
            }
            tag.required = true;
        }
        if let Some(raw) = directives.name {
            let name = single(field, "name", &arguments(raw))?;
            tag.field_name = name;
            tag.env_name = name;
            tag.display_name = name;
        }
        if let Some(raw) = directives.env {
            tag.env_name = single(field, "env", &arguments(raw))?;
        }
        if let Some(raw) = directives.print {
            tag.apply_print(field, &arguments(raw))?;
        }
        if let Some(raw) = directives.default {
            // Colons after the first belong to the literal.
            let Some((_, literal)) = raw.split_once(':') else {
                return Err(TagSyntaxError::ArgumentCount {
                    field: field.to_owned(),
                    directive: "default",
                    expected: "requires at least one argument",
                    actual: 0,
                });
            };
            tag.default = Some(literal);
        }
        Ok(tag)
    }

    fn apply_print(&mut self, field: &str, args: &[&'a str]) -> Result<(), TagSyntaxError> {
        match args {
            [token] => {
                match DisplayMode::from_token(token) {
                    Some(DisplayMode::Suppress) => {
                        self.display = DisplayMode::Suppress;
                        self.display_name = "";
                    }
                    Some(mode) => self.display = mode,
                    None => self.display_name = *token,
                }
                Ok(())
            }
            [name, token] => {
                let mode = DisplayMode::from_token(token).ok_or_else(|| {
                    TagSyntaxError::InvalidPrintMode {
                        field: field.to_owned(),
                        token: (*token).to_owned(),
                    }
                })?;
                self.display_name = *name;
                self.display = mode;
                Ok(())
            }
            _ => Err(TagSyntaxError::ArgumentCount {
                field: field.to_owned(),
                directive: "print",
                expected: "requires one or two arguments",
                actual: args.len(),
            }),
        }
    }

    /// Whether a default literal is present.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Derives the tag for a struct field.
///
/// # Panics
///
/// Panics when the field's annotation is malformed. Annotations are part of
/// the struct definition, so a syntax error is a programming mistake.
pub(crate) fn field_tag(meta: &'static FieldMeta) -> Tag<'static> {
    Tag::parse(meta.ident, meta.annotation)
        .unwrap_or_else(|err| panic!("invalid config annotation: {err}"))
}
