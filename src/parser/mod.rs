//! EBNF source parser
//!
//! This module transforms ISO/IEC 14977 EBNF text into a syntax tree:
//! - [`lexer`]: Tokenization (source text → tokens with leading trivia)
//! - [`parse`]: Rule-list parsing, errors and the [`parse`](parse::parse) entry points
//! - `expressions`: Precedence climbing for rule bodies
//! - [`ast`]: Syntax tree definitions
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.
//!
//! Each parse is a pure function of its input: no state survives between calls,
//! so independent inputs can be parsed on different threads freely.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;

pub use parse::{parse, parse_document, ParseError, ParseResult};
