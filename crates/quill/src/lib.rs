//! # Quill: a bracket-command markup language
//!
//! This crate implements the front end and the dispatch engine of the Quillcraft
//!     document compiler.
//! Quill documents are plain text with embedded bracket commands like
//!     `[font|face:Arial]`, `[align:center]` or `[leading:12pt]`.
//!
//! The pipeline is:
//!
//! 1. The [tokenizer] reads lines of source code and, using a parse-time
//!     [command registry](command::Map), produces an append-only [token list](token::TokenList).
//!     Malformed markup never stops tokenization: it is re-emitted as literal text
//!     and a warning is recorded in the [diagnostics](diag::Diagnostics).
//!
//! 2. The [dispatch engine](dispatch::Engine) walks the token list against a
//!     backend-specific [command map](dispatch::Map), invoking each command's handler
//!     against the backend's document state.
//!     Document state includes a [format stack](format::FormatStack) of
//!     save/restorable formatting attributes.
//!
//! ```
//! use quill::command::{self, Map};
//! use quill::tokenizer::Tokenizer;
//! use quill::token::TokenType;
//!
//! let mut map = Map::default();
//! map.insert(command::Descriptor::new_value("[leading:")).unwrap();
//! let mut tokenizer = Tokenizer::new(&map, Default::default());
//! let tokens = tokenizer.tokenize_document(0, "Hello [leading:12pt]World");
//! let types: Vec<TokenType> = tokens.iter().map(|t| t.token_type()).collect();
//! assert_eq!(
//!     types,
//!     vec![TokenType::Text, TokenType::Command, TokenType::Text, TokenType::EndOfLine]
//! );
//! ```

extern crate quill_stdext;

pub mod command;
pub mod diag;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod lexer;
pub mod options;
pub mod parse;
pub mod source;
pub mod token;
pub mod tokenizer;

/// Module that re-exports the crate's traits.
///
/// ```
/// use quill::traits::*;
/// ```
pub mod traits {
    pub use super::diag::Catalog;
    pub use super::dispatch::Handlers;
    pub use super::dispatch::State;
}

/// The version of Quill, as reported by the `$_version` system macro.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
