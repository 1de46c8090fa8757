//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the rule-list entry points.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent parser over a pre-lexed token vector:
//! - This module: Parser struct, token cursor helpers, `syntax` and `syntax_rule`
//! - `expressions`: precedence climbing for the four binary operators, atoms
//!   and bracketed groups
//!
//! Trivia never reaches the grammar rules: the lexer has already attached it to
//! the following token, so the cursor only ever sees significant tokens.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Parse error: input contains no syntax rules")]
    EmptyInput,

    #[error("Parse error at {location}: malformed rule, expected {expected}, found {found}")]
    MalformedRule {
        location: SourceLocation,
        expected: &'static str,
        found: String,
    },

    #[error("Parse error at {location}: expected '{expected}' to close the bracket opened at {opened}, found {found}")]
    MismatchedBracket {
        location: SourceLocation,
        expected: char,
        opened: SourceLocation,
        found: String,
    },

    #[error("Parse error at {location}: unexpected {found}, expected one of {}", .expected_one_of.join(", "))]
    UnexpectedToken {
        location: SourceLocation,
        found: String,
        expected_one_of: Vec<&'static str>,
    },
}

impl ParseError {
    /// Where the error was detected; `None` only for [`ParseError::EmptyInput`].
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            ParseError::Lex(err) => Some(err.location()),
            ParseError::EmptyInput => None,
            ParseError::MalformedRule { location, .. }
            | ParseError::MismatchedBracket { location, .. }
            | ParseError::UnexpectedToken { location, .. } => Some(*location),
        }
    }
}

/// A comment body and the span of the whole `(* ... *)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// Comments keyed by the index of the token they precede
pub type CommentMap = FxHashMap<usize, Vec<Comment>>;

/// Everything a consumer needs to reproduce a grammar: the tree, the
/// significant tokens it was built from, and the comments between them.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub syntax: Syntax,
    pub tokens: Vec<Token>,
    pub comments: CommentMap,
}

/// Parse EBNF source text into a [`Syntax`] tree.
pub fn parse(source: &str) -> Result<Syntax, ParseError> {
    Parser::new(source)?.parse_syntax()
}

/// Parse EBNF source text, keeping tokens and comments alongside the tree.
pub fn parse_document(source: &str) -> Result<ParseResult, ParseError> {
    let mut parser = Parser::new(source)?;
    let syntax = parser.parse_syntax()?;
    Ok(parser.into_result(syntax))
}

/// Recursive descent parser for EBNF
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Build a parser over an existing token stream. An [`TokenKind::Eof`]
    /// token is appended if the stream does not already end with one.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let end = tokens.last().map(|token| token.span.end).unwrap_or(0);
            let location = tokens
                .last()
                .map(|token| token.location)
                .unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::Eof,
                span: Span::new(end, end),
                location: SourceLocation::new(end, location.line, location.column),
                trivia: Vec::new(),
            });
        }

        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the whole rule list: one or more rules up to end of file
    pub fn parse_syntax(&mut self) -> Result<Syntax, ParseError> {
        if self.is_at_end() {
            return Err(ParseError::EmptyInput);
        }

        let mut rules = Vec::new();
        while !self.is_at_end() {
            rules.push(self.parse_rule()?);
        }

        let span = match (rules.first(), rules.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => return Err(ParseError::EmptyInput),
        };

        debug!(rules = rules.len(), "parsed syntax");
        Ok(Syntax { rules, span })
    }

    /// Parse a single rule: `identifier = [expression] ;`
    pub fn parse_rule(&mut self) -> Result<SyntaxRule, ParseError> {
        let name = match self.peek_kind() {
            TokenKind::Identifier(name) => Identifier {
                name: name.clone(),
                span: self.peek().span,
            },
            _ => return Err(self.malformed_rule("rule name")),
        };
        self.advance();

        if !self.match_token(&TokenKind::Equals) {
            return Err(self.malformed_rule("'=' after rule name"));
        }

        let definition = if self.starts_expression() {
            Some(self.parse_expression(1)?)
        } else {
            None
        };

        if !self.check(&TokenKind::Semicolon) {
            if definition.is_none() && !self.is_at_end() {
                let mut expected = EXPRESSION_START.to_vec();
                expected.push("';'");
                return Err(self.unexpected_token(expected));
            }
            return Err(self.malformed_rule("';' at end of rule"));
        }
        let end = self.advance().span;

        trace!(rule = %name.name, "parsed rule");
        Ok(SyntaxRule {
            span: name.span.to(end),
            name,
            definition,
        })
    }

    /// Hand the tokens and collected comments over together with `syntax`.
    pub fn into_result(self, syntax: Syntax) -> ParseResult {
        let comments = collect_comments(&self.tokens);
        ParseResult {
            syntax,
            tokens: self.tokens,
            comments,
        }
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// The current token; past the end this keeps returning the final `Eof`.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    pub(crate) fn malformed_rule(&self, expected: &'static str) -> ParseError {
        ParseError::MalformedRule {
            location: self.current_location(),
            expected,
            found: self.peek().to_string(),
        }
    }

    pub(crate) fn unexpected_token(&self, expected_one_of: Vec<&'static str>) -> ParseError {
        ParseError::UnexpectedToken {
            location: self.current_location(),
            found: self.peek().to_string(),
            expected_one_of,
        }
    }
}

/// Token descriptions that may begin an expression
pub(crate) const EXPRESSION_START: &[&str] = &[
    "identifier",
    "terminal string",
    "special sequence",
    "integer",
    "'['",
    "'{'",
    "'('",
];

fn collect_comments(tokens: &[Token]) -> CommentMap {
    let mut comments = CommentMap::default();
    for (index, token) in tokens.iter().enumerate() {
        let preceding: Vec<Comment> = token
            .comments()
            .map(|(text, span)| Comment {
                text: text.to_string(),
                span,
            })
            .collect();
        if !preceding.is_empty() {
            comments.insert(index, preceding);
        }
    }
    comments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_rule() {
        let syntax = parse("digit = '0' | '1' ;").unwrap();

        assert_eq!(syntax.rules.len(), 1);
        let rule = &syntax.rules[0];
        assert_eq!(rule.name.name, "digit");
        assert_eq!(rule.span, Span::new(0, 19));
        assert_eq!(rule.to_string(), "digit = (| '0' '1');");
    }

    #[test]
    fn test_parse_rule_list() {
        let source = "a = b ;\nb = 'x' ;\nc = ;";
        let syntax = parse(source).unwrap();

        let names: Vec<_> = syntax.rules.iter().map(|r| r.name.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(syntax.span, Span::new(0, source.len()));
        assert!(syntax.rule("c").is_some_and(|rule| rule.definition.is_none()));
        assert!(syntax.rule("d").is_none());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Err(ParseError::EmptyInput));
        assert_eq!(parse(" \n\t\r\n"), Err(ParseError::EmptyInput));
        assert_eq!(parse("(* only a comment *)"), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_missing_equals() {
        match parse("a 'x' ;") {
            Err(ParseError::MalformedRule { location, .. }) => assert_eq!(location.offset, 2),
            other => panic!("Expected malformed rule, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        assert!(matches!(
            parse("a = 'x'"),
            Err(ParseError::MalformedRule { expected: "';' at end of rule", .. })
        ));
        assert!(matches!(
            parse("a = 'x' 'y' ;"),
            Err(ParseError::MalformedRule { .. })
        ));
        assert!(matches!(parse("a ="), Err(ParseError::MalformedRule { .. })));
    }

    #[test]
    fn test_name_must_be_identifier() {
        assert!(matches!(
            parse("'a' = 'x' ;"),
            Err(ParseError::MalformedRule { expected: "rule name", .. })
        ));
        assert!(matches!(
            parse("a = 'x' ; ;"),
            Err(ParseError::MalformedRule { .. })
        ));
    }

    #[test]
    fn test_body_cannot_start_with_operator() {
        match parse("a = | 'x' ;") {
            Err(ParseError::UnexpectedToken {
                found,
                expected_one_of,
                ..
            }) => {
                assert_eq!(found, "'|'");
                assert!(expected_one_of.contains(&"';'"));
            }
            other => panic!("Expected unexpected token, got {:?}", other),
        }
    }

    #[test]
    fn test_lex_errors_propagate() {
        assert!(matches!(
            parse("a = 'x' ; (* abc"),
            Err(ParseError::Lex(LexError::UnterminatedLiteral { .. }))
        ));
        let err = parse("a = #;").unwrap_err();
        assert_eq!(err.location().map(|loc| loc.offset), Some(4));
    }

    #[test]
    fn test_comment_map() {
        let source = "(* lead *) a = (* mid *) 'x' ; (* tail *)";
        let result = parse_document(source).unwrap();

        assert_eq!(result.tokens.len(), 5);
        assert_eq!(result.comments.len(), 3);
        assert_eq!(result.comments[&0][0].text, " lead ");
        assert_eq!(result.comments[&2][0].text, " mid ");
        assert_eq!(result.comments[&4][0].text, " tail ");
        assert_eq!(result.comments[&4][0].span.slice(source), "(* tail *)");
    }

    #[test]
    fn test_from_tokens_appends_eof() {
        let mut tokens = Lexer::new("a = 'x' ;").tokenize().unwrap();
        tokens.pop();

        let mut parser = Parser::from_tokens(tokens);
        let syntax = parser.parse_syntax().unwrap();
        assert_eq!(syntax.rules.len(), 1);

        assert_eq!(Parser::from_tokens(Vec::new()).parse_syntax(), Err(ParseError::EmptyInput));
    }
}
