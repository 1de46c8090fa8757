//! Lexer (tokenizer) for EBNF source text
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Whitespace runs and `(* ... *)` comments are not tokens: they are recorded as
//! [`Trivia`] on the token that follows them, and the final [`TokenKind::Eof`]
//! token carries whatever trails the last real token. Token and trivia spans
//! together cover every byte of the input exactly once.

use super::ast::{Quote, SourceLocation, Span};
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// Token variants produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Identifier(String),
    Terminal(String, Quote),
    Integer(usize),
    SpecialSequence(String),

    // Punctuation
    Equals,    // =
    Semicolon, // ;
    Pipe,      // |
    Comma,     // ,
    Minus,     // -
    Star,      // *
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    LParen,    // (
    RParen,    // )

    // End of file
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::Terminal(text, quote) => {
                let q = quote.as_char();
                write!(f, "terminal {}{}{}", q, text, q)
            }
            TokenKind::Integer(n) => write!(f, "integer {}", n),
            TokenKind::SpecialSequence(text) => write!(f, "special sequence ?{}?", text),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// Skippable content between tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaKind {
    Whitespace,
    /// Comment body without the `(*` `*)` delimiters
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub span: Span,
}

/// A classified lexeme with its position and the trivia preceding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub location: SourceLocation,
    pub trivia: Vec<Trivia>,
}

impl Token {
    fn new(kind: TokenKind, span: Span, location: SourceLocation) -> Self {
        Self {
            kind,
            span,
            location,
            trivia: Vec::new(),
        }
    }

    /// Comment bodies in this token's leading trivia.
    pub fn comments(&self) -> impl Iterator<Item = (&str, Span)> {
        self.trivia.iter().filter_map(|trivia| match &trivia.kind {
            TriviaKind::Comment(text) => Some((text.as_str(), trivia.span)),
            TriviaKind::Whitespace => None,
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// Delimited constructs that can run off the end of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Terminal,
    Comment,
    SpecialSequence,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::Terminal => write!(f, "terminal string"),
            LiteralKind::Comment => write!(f, "comment"),
            LiteralKind::SpecialSequence => write!(f, "special sequence"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Lexer error at {location}: unrecognized character {found:?}")]
    UnrecognizedCharacter {
        found: char,
        location: SourceLocation,
    },

    /// `location` is where the construct was opened
    #[error("Lexer error at {location}: unterminated {kind}")]
    UnterminatedLiteral {
        kind: LiteralKind,
        location: SourceLocation,
    },

    #[error("Lexer error at {location}: integer {text} is too large")]
    IntegerOverflow {
        text: String,
        location: SourceLocation,
    },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::UnrecognizedCharacter { location, .. }
            | LexError::UnterminatedLiteral { location, .. }
            | LexError::IntegerOverflow { location, .. } => *location,
        }
    }
}

/// Lexer for EBNF source text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    offset: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let trivia = self.skip_trivia()?;

            let Some(ch) = self.peek() else {
                let mut eof = Token::new(
                    TokenKind::Eof,
                    Span::new(self.offset, self.offset),
                    self.current_location(),
                );
                eof.trivia = trivia;
                tokens.push(eof);
                break;
            };

            let mut token = self.next_token(ch)?;
            token.trivia = trivia;
            tokens.push(token);
        }

        trace!(tokens = tokens.len(), "tokenized input");
        Ok(tokens)
    }

    /// Consume whitespace and comments up to the next real token
    fn skip_trivia(&mut self) -> Result<Vec<Trivia>, LexError> {
        let mut trivia = Vec::new();

        loop {
            let start = self.offset;
            match self.peek() {
                Some(ch) if is_whitespace(ch) => {
                    while self.peek().is_some_and(is_whitespace) {
                        self.advance();
                    }
                    trivia.push(Trivia {
                        kind: TriviaKind::Whitespace,
                        span: Span::new(start, self.offset),
                    });
                }
                Some('(') if self.peek_next() == Some('*') => {
                    let text = self.comment()?;
                    trivia.push(Trivia {
                        kind: TriviaKind::Comment(text),
                        span: Span::new(start, self.offset),
                    });
                }
                _ => return Ok(trivia),
            }
        }
    }

    /// Lex one token starting at `ch`, which has not been consumed yet
    fn next_token(&mut self, ch: char) -> Result<Token, LexError> {
        let loc = self.current_location();
        let start = self.offset;

        let kind = match ch {
            '?' => TokenKind::SpecialSequence(self.delimited('?', LiteralKind::SpecialSequence)?),
            '\'' => TokenKind::Terminal(self.delimited('\'', LiteralKind::Terminal)?, Quote::Single),
            '"' => TokenKind::Terminal(self.delimited('"', LiteralKind::Terminal)?, Quote::Double),
            'a'..='z' | 'A'..='Z' => TokenKind::Identifier(self.identifier()),
            '0'..='9' => self.integer(loc)?,
            _ => {
                let kind = match ch {
                    '=' => TokenKind::Equals,
                    ';' => TokenKind::Semicolon,
                    '|' => TokenKind::Pipe,
                    ',' => TokenKind::Comma,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    _ => {
                        return Err(LexError::UnrecognizedCharacter {
                            found: ch,
                            location: loc,
                        })
                    }
                };
                self.advance();
                kind
            }
        };

        Ok(Token::new(kind, Span::new(start, self.offset), loc))
    }

    /// `(* ... *)`, returning the body. Comments do not nest.
    fn comment(&mut self) -> Result<String, LexError> {
        let loc = self.current_location();
        self.advance(); // (
        self.advance(); // *

        let mut text = String::new();
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some(')') => {
                    self.advance();
                    return Ok(text);
                }
                Some(ch) => text.push(ch),
                None => {
                    return Err(LexError::UnterminatedLiteral {
                        kind: LiteralKind::Comment,
                        location: loc,
                    })
                }
            }
        }
    }

    /// Text between an opening `close` character and the next `close`,
    /// taken verbatim.
    fn delimited(&mut self, close: char, kind: LiteralKind) -> Result<String, LexError> {
        let loc = self.current_location();
        self.advance(); // opening delimiter

        let mut text = String::new();
        loop {
            match self.advance() {
                Some(ch) if ch == close => return Ok(text),
                Some(ch) => text.push(ch),
                None => {
                    return Err(LexError::UnterminatedLiteral {
                        kind,
                        location: loc,
                    })
                }
            }
        }
    }

    fn identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        name
    }

    fn integer(&mut self, loc: SourceLocation) -> Result<TokenKind, LexError> {
        let mut digits = String::new();
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            digits.push(ch);
            self.advance();
        }

        digits
            .parse()
            .map(TokenKind::Integer)
            .map_err(|_| LexError::IntegerOverflow {
                text: digits,
                location: loc,
            })
    }

    // ===== Helper methods =====

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.offset, self.line, self.column)
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_simple_rule() {
        let tokens = kinds("digit = '0' | \"1\" ;");

        assert_eq!(tokens.len(), 7);
        assert!(matches!(tokens[0], TokenKind::Identifier(ref s) if s == "digit"));
        assert!(matches!(tokens[1], TokenKind::Equals));
        assert!(matches!(tokens[2], TokenKind::Terminal(ref s, Quote::Single) if s == "0"));
        assert!(matches!(tokens[3], TokenKind::Pipe));
        assert!(matches!(tokens[4], TokenKind::Terminal(ref s, Quote::Double) if s == "1"));
        assert!(matches!(tokens[5], TokenKind::Semicolon));
        assert!(matches!(tokens[6], TokenKind::Eof));
    }

    #[test]
    fn test_punctuation() {
        let tokens = kinds("= ; | , - * [ ] { } ( )");

        assert_eq!(
            tokens,
            vec![
                TokenKind::Equals,
                TokenKind::Semicolon,
                TokenKind::Pipe,
                TokenKind::Comma,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literals_are_verbatim() {
        let tokens = kinds("' a b ' \"it's\" ? any text ? 3 abc_12");

        assert!(matches!(tokens[0], TokenKind::Terminal(ref s, _) if s == " a b "));
        assert!(matches!(tokens[1], TokenKind::Terminal(ref s, _) if s == "it's"));
        assert!(matches!(tokens[2], TokenKind::SpecialSequence(ref s) if s == " any text "));
        assert!(matches!(tokens[3], TokenKind::Integer(3)));
        assert!(matches!(tokens[4], TokenKind::Identifier(ref s) if s == "abc_12"));
    }

    #[test]
    fn test_identifier_stops_at_non_ascii() {
        let tokens = kinds("ab 12cd");

        assert!(matches!(tokens[0], TokenKind::Identifier(ref s) if s == "ab"));
        assert!(matches!(tokens[1], TokenKind::Integer(12)));
        assert!(matches!(tokens[2], TokenKind::Identifier(ref s) if s == "cd"));
    }

    #[test]
    fn test_comments_become_trivia() {
        let tokens = Lexer::new("a (* one *) = (* two ** *)(*three*) ;")
            .tokenize()
            .unwrap();

        assert_eq!(tokens.len(), 4);
        assert!(tokens[0].trivia.is_empty());
        assert_eq!(
            tokens[1].comments().map(|(text, _)| text).collect::<Vec<_>>(),
            vec![" one "]
        );
        assert_eq!(
            tokens[2].comments().map(|(text, _)| text).collect::<Vec<_>>(),
            vec![" two ** ", "three"]
        );
    }

    #[test]
    fn test_comment_is_not_a_paren() {
        let tokens = kinds("( (**) )");

        assert_eq!(
            tokens,
            vec![TokenKind::LParen, TokenKind::RParen, TokenKind::Eof]
        );
    }

    #[test]
    fn test_trivia_and_tokens_cover_input() {
        let source = "  rule (* c *)\n\t= { 'x' , ? y ? } ;\r\n(* tail *)  ";
        let tokens = Lexer::new(source).tokenize().unwrap();

        let mut spans = Vec::new();
        for token in &tokens {
            spans.extend(token.trivia.iter().map(|trivia| trivia.span));
            spans.push(token.span);
        }

        let mut cursor = 0;
        for span in spans {
            assert_eq!(span.start, cursor);
            cursor = span.end;
        }
        assert_eq!(cursor, source.len());
    }

    #[test]
    fn test_locations() {
        let tokens = Lexer::new("a =\n  'é' ;").tokenize().unwrap();

        assert_eq!(tokens[2].location, SourceLocation::new(6, 2, 3));
        // 'é' is two bytes wide
        assert_eq!(tokens[2].span, Span::new(6, 10));
        assert_eq!(tokens[3].location, SourceLocation::new(11, 2, 7));
    }

    #[test]
    fn test_unrecognized_character() {
        let err = Lexer::new("a = 'x' . ;").tokenize().unwrap_err();

        assert_eq!(
            err,
            LexError::UnrecognizedCharacter {
                found: '.',
                location: SourceLocation::new(8, 1, 9),
            }
        );
    }

    #[test]
    fn test_unterminated_literals() {
        for (source, expected) in [
            ("(* abc", LiteralKind::Comment),
            ("a = 'abc ;", LiteralKind::Terminal),
            ("a = \"abc' ;", LiteralKind::Terminal),
            ("a = ? abc ;", LiteralKind::SpecialSequence),
        ] {
            match Lexer::new(source).tokenize() {
                Err(LexError::UnterminatedLiteral { kind, .. }) => assert_eq!(kind, expected),
                other => panic!("Expected unterminated {}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_integer_overflow() {
        let err = Lexer::new("99999999999999999999999999 * 'a'")
            .tokenize()
            .unwrap_err();

        assert!(matches!(err, LexError::IntegerOverflow { .. }));
    }
}
