//! Addresses of values inside a nested configuration structure.
//!
//! A [`Path`] is an immutable, append-only list of segments. Extending a path
//! allocates one link and shares the rest, so the traversal can fork a path
//! for every field and element without copying. Paths render two ways:
//!
//! - the display form (`Stuff.List[0].Name`) used in error messages and in
//!   rendered output; and
//! - the environment form (`STUFF_LIST_0_NAME`) used as the variable key.

use std::fmt;
use std::rc::Rc;

/// One step in a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A named struct field.
    Field {
        /// Name used in the display form.
        name: String,
        /// Name used in the environment form before upper-casing.
        env: String,
    },
    /// A position inside a sequence.
    Index(usize),
}

#[derive(Debug)]
struct Link {
    parent: Option<Rc<Link>>,
    segment: Segment,
}

/// Persistent path of field names and sequence indices.
///
/// # Examples
///
/// ```
/// use confbind::Path;
///
/// let path = Path::root("Test")
///     .index(7)
///     .field_with_env("SubItem", "Item")
///     .index(2);
/// assert_eq!(path.to_string(), "Test[7].SubItem[2]");
/// assert_eq!(path.env_key(), "TEST_7_ITEM_2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Path {
    tail: Option<Rc<Link>>,
    len: usize,
}

impl Path {
    /// Creates a path holding `name` as its only segment.
    ///
    /// An empty `name` yields the empty path, which JSON binding uses for the
    /// unnamed top level.
    #[must_use]
    pub fn root(name: &str) -> Self {
        let empty = Self::default();
        if name.is_empty() {
            empty
        } else {
            empty.field(name)
        }
    }

    /// Appends a field whose display and environment names are identical.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        self.field_with_env(name, name)
    }

    /// Appends a field with distinct display and environment names.
    #[must_use]
    pub fn field_with_env(&self, name: &str, env: &str) -> Self {
        self.push(Segment::Field {
            name: name.to_owned(),
            env: env.to_owned(),
        })
    }

    /// Appends a sequence index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.push(Segment::Index(index))
    }

    fn push(&self, segment: Segment) -> Self {
        Self {
            tail: Some(Rc::new(Link {
                parent: self.tail.clone(),
                segment,
            })),
            len: self.len + 1,
        }
    }

    /// Returns `true` when the path has no segments.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of segments in the path.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Segments in root-to-leaf order.
    #[must_use]
    pub fn segments(&self) -> Vec<&Segment> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.tail.as_deref();
        while let Some(link) = cursor {
            out.push(&link.segment);
            cursor = link.parent.as_deref();
        }
        out.reverse();
        out
    }

    /// Renders the environment variable key for this path.
    ///
    /// Field segments contribute their upper-cased environment name, index
    /// segments their decimal value, and every segment is joined with `_`.
    #[must_use]
    pub fn env_key(&self) -> String {
        let mut key = String::new();
        for (position, segment) in self.segments().into_iter().enumerate() {
            if position > 0 && !key.is_empty() {
                key.push('_');
            }
            match segment {
                Segment::Field { env, .. } => key.push_str(&env.to_uppercase()),
                Segment::Index(index) => key.push_str(&index.to_string()),
            }
        }
        key
    }
}

impl fmt::Display for Path {
    /// Renders the display form: fields joined by `.`, indices as `[i]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments().into_iter().enumerate() {
            match segment {
                Segment::Field { name, .. } => {
                    if position > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl Eq for Path {}
