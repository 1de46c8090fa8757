//! # Introduction
//!
//! ebnftty reads grammars written in ISO/IEC 14977 Extended Backus-Naur Form
//! and turns them into a typed syntax tree. The tree can be printed back in a
//! canonical layout or browsed in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → Syntax → Formatter / Explorer
//! ```
//!
//! 1. [`parser`]: tokenises the text (keeping whitespace and comments as
//!    trivia on the following token) and builds the [`Syntax`] tree with
//!    precedence climbing.
//! 2. [`format`]: pretty-prints a parsed document, preserving comments.
//! 3. [`ui`]: ratatui-based explorer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let syntax = ebnftty::parse("digit = '0' | '1' ; number = digit , { digit } ;").unwrap();
//! assert_eq!(syntax.rules.len(), 2);
//! assert_eq!(syntax.rules[1].to_string(), "number = (, digit {digit});");
//! ```
//!
//! The grammar is checked for syntax only: undefined or duplicate rule names
//! are accepted.
//!
//! [`Syntax`]: parser::ast::Syntax

pub mod format;
pub mod parser;
pub mod ui;

pub use parser::{parse, parse_document, ParseError, ParseResult};
