//! Expression parsing implementation
//!
//! This module handles parsing of rule bodies using precedence climbing for
//! the binary operators and recursive descent for atoms and bracketed groups.
//!
//! # Precedence
//!
//! Lowest to highest, all left-associative:
//!
//! | level | operator | form             |
//! |-------|----------|------------------|
//! | 1     | `\|`     | alternation      |
//! | 2     | `,`      | concatenation    |
//! | 3     | `-`      | exception        |
//! | 4     | `*`      | repetition count |
//!
//! Two operators break the uniform pattern. The exception operator may have
//! no right operand at all (`"a" - ;`), and the repetition-count operator only
//! accepts an integer on its left, so it is recognized as a prefix form
//! (`3 * x`) when an operand is parsed rather than in the climbing loop.
//!
//! All parsing methods are implemented as methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser, EXPRESSION_START};

impl Parser {
    /// Parse an expression whose binary operators all bind at least as
    /// tightly as `min_precedence`. Use `1` for a full expression.
    pub fn parse_expression(&mut self, min_precedence: u8) -> Result<Expression, ParseError> {
        let mut left = self.parse_operand()?;

        loop {
            let operator = match self.peek_kind() {
                TokenKind::Pipe => BinaryOperator::Alternation,
                TokenKind::Comma => BinaryOperator::Concatenation,
                TokenKind::Minus => BinaryOperator::Exception,
                // A count always comes first, so '*' can never follow a
                // complete operand.
                TokenKind::Star => {
                    return Err(self.unexpected_token(vec!["'|'", "','", "'-'", "';'"]));
                }
                _ => break,
            };

            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }
            let operator_end = self.advance().span.end;

            let right = if operator == BinaryOperator::Exception && !self.starts_expression() {
                None
            } else {
                Some(Box::new(self.parse_expression(precedence + 1)?))
            };

            let start = left.span().start;
            let end = right
                .as_ref()
                .map_or(operator_end, |right| right.span().end);
            left = Expression::Binary(BinaryExpression {
                left: Operand::Expression(Box::new(left)),
                operator,
                right,
                span: Span::new(start, end),
            });
        }

        Ok(left)
    }

    /// Parse one operand: `integer * operand` or an atom/group
    fn parse_operand(&mut self) -> Result<Expression, ParseError> {
        let TokenKind::Integer(value) = *self.peek_kind() else {
            return self.parse_atom();
        };
        let count = Integer {
            value,
            span: self.advance().span,
        };

        if !self.match_token(&TokenKind::Star) {
            return Err(self.unexpected_token(vec!["'*' after repetition count"]));
        }

        let operator = BinaryOperator::RepetitionCount;
        let right = self.parse_expression(operator.precedence() + 1)?;
        let span = count.span.to(right.span());

        Ok(Expression::Binary(BinaryExpression {
            left: Operand::Integer(count),
            operator,
            right: Some(Box::new(right)),
            span,
        }))
    }

    /// Parse an atom (identifier, terminal, special sequence) or a group
    pub fn parse_atom(&mut self) -> Result<Expression, ParseError> {
        let span = self.peek().span;

        let atom = match self.peek_kind() {
            TokenKind::Identifier(name) => Atom::Identifier(Identifier {
                name: name.clone(),
                span,
            }),
            TokenKind::Terminal(text, quote) => Atom::Terminal(Terminal {
                text: text.clone(),
                quote: *quote,
                span,
            }),
            TokenKind::SpecialSequence(text) => Atom::SpecialSequence(SpecialSequence {
                text: text.clone(),
                span,
            }),
            TokenKind::LBracket => return self.parse_group(GroupKind::Optional),
            TokenKind::LBrace => return self.parse_group(GroupKind::Repeated),
            TokenKind::LParen => return self.parse_group(GroupKind::Grouped),
            _ => return Err(self.unexpected_token(EXPRESSION_START.to_vec())),
        };
        self.advance();

        Ok(Expression::Atom(atom))
    }

    /// Parse `[...]`, `{...}` or `(...)`; the contents may be empty
    fn parse_group(&mut self, kind: GroupKind) -> Result<Expression, ParseError> {
        let open = self.advance().clone();

        let inner = if self.starts_expression() {
            Some(Box::new(self.parse_expression(1)?))
        } else {
            None
        };

        // Whatever stopped the contents must be the matching closer
        if !self.check(&closing_token(kind)) {
            return Err(ParseError::MismatchedBracket {
                location: self.current_location(),
                expected: kind.close(),
                opened: open.location,
                found: self.peek().to_string(),
            });
        }
        let close = self.advance().span;

        Ok(Expression::Group(Group {
            kind,
            inner,
            span: open.span.to(close),
        }))
    }

    /// Whether the current token can begin an expression
    pub(crate) fn starts_expression(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Identifier(_)
                | TokenKind::Terminal(..)
                | TokenKind::SpecialSequence(_)
                | TokenKind::Integer(_)
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::LParen
        )
    }
}

fn closing_token(kind: GroupKind) -> TokenKind {
    match kind {
        GroupKind::Optional => TokenKind::RBracket,
        GroupKind::Repeated => TokenKind::RBrace,
        GroupKind::Grouped => TokenKind::RParen,
    }
}
