// Copyright 2015, Yuheng Chen.
// Copyright 2023, Ethiraric.
// See the LICENSE file at the top-level directory of this distribution.

//! A reader for a line-oriented YAML subset, in pure Rust.
//!
//! This crate loads documents made of nested mappings, sequences and string
//! scalars: the shape of changelogs, CI definitions and other hand-written
//! configuration. Mappings keep their key order. Scalars may be plain,
//! single-quoted, double-quoted (with escapes) or literal/folded blocks;
//! everything loads as a string or null, there is no implicit typing.
//!
//! # Usage
//!
//! ```
//! use peridot::Yaml;
//!
//! let doc = Yaml::load_from_str(
//!     "0.2.1:\n  changes:\n    - do not panic on empty inputs\n",
//! )
//! .unwrap();
//! assert_eq!(
//!     doc["0.2.1"]["changes"][0].as_str(),
//!     Some("do not panic on empty inputs")
//! );
//! ```
//!
//! Tokenization lives in [`peridot_parser`] and can be driven on its own
//! through [`Scanner`]; this crate adds the document model ([`Yaml`]) and
//! the [`DocumentBuilder`] assembling tokens into it.

#![warn(missing_docs, clippy::pedantic)]

mod loader;
mod yaml;

pub use peridot_parser::{Marker, ScanError, Scanner, Token, TokenKind};

pub use crate::loader::DocumentBuilder;
pub use crate::yaml::{Mapping, Sequence, Yaml};

/// Parse one document.
///
/// Inputs containing only whitespace and comments load as [`Yaml::Null`].
///
/// # Errors
/// Returns a [`ScanError`] when the input is malformed or its tokens do not
/// form a valid document.
pub fn parse(source: &str) -> Result<Yaml, ScanError> {
    let mut builder = DocumentBuilder::new();
    for token in Scanner::new(source) {
        builder.handle(token?)?;
    }
    Ok(builder.into_document())
}
