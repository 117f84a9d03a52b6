// Copyright 2015, Yuheng Chen.
// Copyright 2023, Ethiraric.
// See the LICENSE file at the top-level directory of this distribution.

//! Tokenizer for a line-oriented YAML subset.
//!
//! This crate turns a text input into a flat stream of [`Token`]s: mapping
//! keys, sequence entry indicators, scalars and comments, each tagged with
//! the indentation column it was found at. It performs all scalar work
//! (quoting, escapes, block scalar chomping, line folding) but leaves
//! nesting to the consumer; `peridot` builds documents on top of it.
//!
//! # Usage
//!
//! ```
//! use peridot_parser::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("name: peridot");
//! let token = scanner.next_token().unwrap().unwrap();
//! assert!(matches!(token.kind, TokenKind::MappingKey { .. }));
//! ```

#![warn(missing_docs, clippy::pedantic)]

mod accumulator;
pub mod char_traits;
mod scanner;

pub use crate::accumulator::{Chomping, LineAccumulator, Rendering};
pub use crate::scanner::{Marker, ScanError, Scanner, Token, TokenKind};
