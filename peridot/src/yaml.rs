//! YAML objects manipulated by this crate.

use std::ops::Index;

use hashlink::LinkedHashMap;
use peridot_parser::ScanError;

/// A YAML node.
///
/// A document loaded with [`Yaml::load_from_str`] is a tree of `Yaml` nodes.
/// Scalars are kept as strings; this subset of YAML has no implicit typing,
/// so `true`, `42` and `hello` all load as [`Yaml::String`].
///
/// # Examples
///
/// ```
/// use peridot::Yaml;
///
/// let doc = Yaml::load_from_str("name: peridot").unwrap();
/// assert_eq!(doc["name"].as_str(), Some("peridot"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Yaml {
    /// The absence of a value, as for a key with nothing after the colon.
    Null,
    /// A scalar.
    String(String),
    /// A mapping, with key insertion order preserved.
    Mapping(Mapping),
    /// A sequence of nodes.
    Sequence(Sequence),
}

/// The type contained in the [`Yaml::Mapping`] variant.
pub type Mapping = LinkedHashMap<String, Yaml>;
/// The type contained in the [`Yaml::Sequence`] variant.
pub type Sequence = Vec<Yaml>;

impl Yaml {
    /// Load a document from a string.
    ///
    /// This is a convenience for [`crate::parse`].
    ///
    /// # Errors
    /// Returns a [`ScanError`] when the input is malformed.
    pub fn load_from_str(source: &str) -> Result<Self, ScanError> {
        crate::parse(source)
    }

    /// Get the scalar content if the node is a scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Yaml::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get a reference to the underlying [`Mapping`] if the node is one.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Yaml::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Get a reference to the underlying [`Sequence`] if the node is one.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Yaml::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Whether the node is [`Yaml::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Yaml::Null)
    }

    /// Access a mapping field without panicking.
    ///
    /// # Return
    /// [`Some`] with the value under `key` if the node is a mapping
    /// containing it, [`None`] otherwise.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Yaml> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }
}

static NULL: Yaml = Yaml::Null;

impl<'a> Index<&'a str> for Yaml {
    type Output = Yaml;

    /// Index into a mapping by key.
    ///
    /// Returns [`Yaml::Null`] when the node is not a mapping or the key is
    /// absent.
    fn index(&self, idx: &'a str) -> &Yaml {
        self.get(idx).unwrap_or(&NULL)
    }
}

impl Index<usize> for Yaml {
    type Output = Yaml;

    /// Index into a sequence by position.
    ///
    /// Returns [`Yaml::Null`] when the node is not a sequence or the index
    /// is out of bounds.
    fn index(&self, idx: usize) -> &Yaml {
        match self {
            Yaml::Sequence(sequence) => sequence.get(idx).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}
