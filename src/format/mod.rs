//! Canonical pretty-printer for parsed grammars
//!
//! The [`Formatter`] walks the syntax tree in source order. Because the tree
//! keeps every bracket pair as a [`Group`] node, the walk emits exactly the
//! tokens the parser consumed, in the same order, which lets comments from the
//! [`CommentMap`](crate::parser::parse::CommentMap) be re-inserted in front of
//! the token they originally preceded.
//!
//! Layout rules:
//! - rules separated by a blank line in the source form blocks, and blocks stay
//!   separated by exactly one blank line
//! - within a block, rule names are padded so the `=` signs line up
//! - a rule wider than [`FormatConfig::line_width`] gets one top-level
//!   alternative per line, with `|` under the `=`

mod config;

pub use config::{FormatConfig, NewlineKind, QuoteStyle};

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Comment, ParseResult};
use tracing::debug;

/// Formats one parsed document
pub struct Formatter<'a> {
    result: &'a ParseResult,
    source: &'a str,
    config: &'a FormatConfig,
    /// Line break written between output lines; literal text keeps its own
    newline: &'static str,
    /// Index of the next token to be written, used to look up comments
    token_index: usize,
    output: String,
}

impl<'a> Formatter<'a> {
    /// `source` must be the text `result` was parsed from.
    pub fn new(result: &'a ParseResult, source: &'a str, config: &'a FormatConfig) -> Self {
        Self {
            result,
            source,
            config,
            newline: config.newline.as_str(),
            token_index: 0,
            output: String::new(),
        }
    }

    pub fn format(mut self) -> String {
        let result = self.result;
        let blocks = split_blocks(&result.syntax.rules, self.source);

        for (index, block) in blocks.iter().enumerate() {
            if index > 0 {
                self.output.push_str(self.newline);
            }

            let width = if self.config.align_definitions {
                block
                    .iter()
                    .map(|rule| rule.name.name.chars().count())
                    .max()
                    .unwrap_or(0)
            } else {
                0
            };

            for rule in block.iter() {
                self.format_rule(rule, width);
            }
        }

        // Whatever is attached to the final Eof token
        for comment in self.comments_here() {
            self.output.push_str(&render_comment(&comment.text, self.newline));
            self.output.push_str(self.newline);
        }

        debug!(
            rules = result.syntax.rules.len(),
            blocks = blocks.len(),
            "formatted syntax"
        );

        self.output
    }

    fn format_rule(&mut self, rule: &SyntaxRule, width: usize) {
        let leading = self.comments_here();
        for comment in leading {
            self.output.push_str(&render_comment(&comment.text, self.newline));
            self.output.push_str(self.newline);
        }

        if leading
            .iter()
            .any(|comment| comment.text.contains(&self.config.ignore_rule_comment_text))
        {
            self.copy_verbatim(rule);
            return;
        }
        self.token_index += 1; // name, comments already written

        let mut head = format!("{:<width$} ", rule.name.name, width = width);
        self.emit(&mut head, "=");
        head.push(' ');

        let alternatives = rule
            .definition
            .as_ref()
            .map(top_level_alternatives)
            .unwrap_or_default();

        let mut parts = Vec::with_capacity(alternatives.len());
        let mut separators = Vec::with_capacity(alternatives.len());
        for (index, alternative) in alternatives.iter().enumerate() {
            if index > 0 {
                let mut separator = String::new();
                self.emit(&mut separator, "|");
                separators.push(separator);
            }
            let mut part = String::new();
            self.expression(alternative, &mut part);
            parts.push(part);
        }

        let mut end = String::new();
        self.emit(&mut end, ";");

        let mut line = head.clone();
        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                line.push(' ');
                line.push_str(&separators[index - 1]);
                line.push(' ');
            }
            line.push_str(part);
        }
        if !parts.is_empty() {
            line.push(' ');
        }
        line.push_str(&end);

        if parts.len() > 1 && line.chars().count() > self.config.line_width {
            let indent = " ".repeat(head.chars().count().saturating_sub(2));
            line = head;
            line.push_str(&parts[0]);
            for (separator, part) in separators.iter().zip(&parts[1..]) {
                line.push_str(self.newline);
                line.push_str(&indent);
                line.push_str(separator);
                line.push(' ');
                line.push_str(part);
            }
            line.push(' ');
            line.push_str(&end);
        }

        self.output.push_str(&line);
        self.output.push_str(self.newline);
    }

    /// Copy a rule's source text unchanged and skip over its tokens
    fn copy_verbatim(&mut self, rule: &SyntaxRule) {
        self.output.push_str(rule.span.slice(self.source));
        self.output.push_str(self.newline);

        let consumed = self.result.tokens[self.token_index..]
            .iter()
            .take_while(|token| token.kind != TokenKind::Eof && token.span.end <= rule.span.end)
            .count();
        self.token_index += consumed;
    }

    fn expression(&mut self, expr: &Expression, out: &mut String) {
        match expr {
            Expression::Atom(atom) => {
                let text = self.atom_text(atom);
                self.emit(out, &text);
            }
            Expression::Binary(binary) => {
                match &binary.left {
                    Operand::Expression(left) => self.expression(left, out),
                    Operand::Integer(count) => self.emit(out, &count.value.to_string()),
                }

                if binary.operator != BinaryOperator::Concatenation {
                    out.push(' ');
                }
                self.emit(out, &binary.operator.symbol().to_string());

                if let Some(right) = &binary.right {
                    out.push(' ');
                    self.expression(right, out);
                }
            }
            Expression::Group(group) => {
                self.emit(out, &group.kind.open().to_string());
                if let Some(inner) = &group.inner {
                    out.push(' ');
                    self.expression(inner, out);
                    out.push(' ');
                }
                self.emit(out, &group.kind.close().to_string());
            }
        }
    }

    fn atom_text(&self, atom: &Atom) -> String {
        match atom {
            Atom::Identifier(ident) => ident.name.clone(),
            Atom::Terminal(terminal) => {
                let preferred = match self.config.quote_style {
                    QuoteStyle::Preserve => terminal.quote,
                    QuoteStyle::Single => Quote::Single,
                    QuoteStyle::Double => Quote::Double,
                };
                let quote = match preferred {
                    Quote::Single if terminal.text.contains('\'') => Quote::Double,
                    Quote::Double if terminal.text.contains('"') => Quote::Single,
                    quote => quote,
                };
                format!("{0}{1}{0}", quote.as_char(), terminal.text)
            }
            Atom::SpecialSequence(special) => format!("?{}?", special.text),
        }
    }

    /// Write the comments preceding the current token inline, then `text`
    fn emit(&mut self, out: &mut String, text: &str) {
        for comment in self.comments_here() {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push_str(&render_comment(&comment.text, self.newline));
            out.push(' ');
        }
        out.push_str(text);
        self.token_index += 1;
    }

    fn comments_here(&self) -> &'a [Comment] {
        self.result
            .comments
            .get(&self.token_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Format `result` (parsed from `source`) with `config`.
pub fn format(result: &ParseResult, source: &str, config: &FormatConfig) -> String {
    Formatter::new(result, source, config).format()
}

/// Single-line comments are normalized, multi-line ones kept as written
/// apart from their line endings
fn render_comment(text: &str, newline: &str) -> String {
    if text.contains('\n') {
        let body = text.replace("\r\n", "\n").replace('\n', newline);
        format!("(*{}*)", body)
    } else {
        format!("(* {} *)", text.trim())
    }
}

/// Flatten the left-leaning alternation chain at the root of a rule body
fn top_level_alternatives(expr: &Expression) -> Vec<&Expression> {
    match expr {
        Expression::Binary(BinaryExpression {
            left: Operand::Expression(left),
            operator: BinaryOperator::Alternation,
            right: Some(right),
            ..
        }) => {
            let mut alternatives = top_level_alternatives(left);
            alternatives.push(right);
            alternatives
        }
        _ => vec![expr],
    }
}

fn split_blocks<'r>(rules: &'r [SyntaxRule], source: &str) -> Vec<&'r [SyntaxRule]> {
    let mut blocks = Vec::new();
    let mut start = 0;

    for index in 1..rules.len() {
        let between = source
            .get(rules[index - 1].span.end..rules[index].span.start)
            .unwrap_or("");
        if between.contains("\n\n") || between.contains("\n\r\n") {
            blocks.push(&rules[start..index]);
            start = index;
        }
    }
    if start < rules.len() {
        blocks.push(&rules[start..]);
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn fmt_with(source: &str, config: &FormatConfig) -> String {
        let result = parse_document(source).unwrap();
        format(&result, source, config)
    }

    fn fmt(source: &str) -> String {
        fmt_with(source, &FormatConfig::default())
    }

    #[test]
    fn test_spacing() {
        assert_eq!(fmt("a=b;"), "a = b ;\n");
        assert_eq!(fmt("a = ;"), "a = ;\n");
        assert_eq!(
            fmt("r=[a],{b}|(c)-d,2*e,[ ];"),
            "r = [ a ], { b } | ( c ) - d, 2 * e, [] ;\n"
        );
        assert_eq!(fmt("r = a - ;"), "r = a - ;\n");
        assert_eq!(fmt("r = ?  x ? ;"), "r = ?  x ? ;\n");
    }

    #[test]
    fn test_alignment_and_blocks() {
        assert_eq!(
            fmt("a = 'x';\nlong_name = y;\n\n\n\nb=c;"),
            "a         = 'x' ;\nlong_name = y ;\n\nb = c ;\n"
        );

        let config = FormatConfig {
            align_definitions: false,
            ..FormatConfig::default()
        };
        assert_eq!(
            fmt_with("a = 'x';\nlong_name = y;", &config),
            "a = 'x' ;\nlong_name = y ;\n"
        );
    }

    #[test]
    fn test_long_rules_break_at_alternatives() {
        let config = FormatConfig {
            line_width: 20,
            ..FormatConfig::default()
        };
        assert_eq!(
            fmt_with("letter = 'a' | 'b' | 'c' , d ;", &config),
            "letter = 'a'\n       | 'b'\n       | 'c', d ;\n"
        );
        // Nothing to break at
        assert_eq!(
            fmt_with("letter = 'abc', 'def', 'ghi' ;", &config),
            "letter = 'abc', 'def', 'ghi' ;\n"
        );
    }

    #[test]
    fn test_quote_style() {
        let config = FormatConfig {
            quote_style: QuoteStyle::Double,
            ..FormatConfig::default()
        };
        assert_eq!(
            fmt_with("a = 'x' | 'say \"hi\"' ;", &config),
            "a = \"x\" | 'say \"hi\"' ;\n"
        );

        let config = FormatConfig {
            quote_style: QuoteStyle::Single,
            ..FormatConfig::default()
        };
        assert_eq!(
            fmt_with("a = \"x\" | \"it's\" ;", &config),
            "a = 'x' | \"it's\" ;\n"
        );
    }

    #[test]
    fn test_comments_are_kept() {
        assert_eq!(
            fmt("(*   header *)\na = (* mid *) 'x' , y(*before semi*);(* trailing *)"),
            "(* header *)\na = (* mid *) 'x', y (* before semi *) ;\n(* trailing *)\n"
        );
        assert_eq!(
            fmt("(*\n  multi\n  line\n*)\na = b ;"),
            "(*\n  multi\n  line\n*)\na = b ;\n"
        );
    }

    #[test]
    fn test_ignore_comment() {
        assert_eq!(
            fmt("(* ebnf-fmt-ignore *)\na   =   'x'  ;\nb=y;"),
            "(* ebnf-fmt-ignore *)\na   =   'x'  ;\nb = y ;\n"
        );
    }

    #[test]
    fn test_windows_newlines() {
        let config = FormatConfig {
            newline: NewlineKind::Windows,
            ..FormatConfig::default()
        };
        assert_eq!(fmt_with("a=b;\n\nc=d;", &config), "a = b ;\r\n\r\nc = d ;\r\n");
        assert_eq!(
            fmt_with("(* one\ntwo *)\na = 'x\ny' ;", &config),
            "(* one\r\ntwo *)\r\na = 'x\ny' ;\r\n"
        );
    }

    #[test]
    fn test_ignored_rule_is_byte_exact() {
        let source = "(* ebnf-fmt-ignore *)\r\na = 'x\r\ny'  ;\r\n";
        assert_eq!(fmt(source), "(* ebnf-fmt-ignore *)\na = 'x\r\ny'  ;\n");
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let source = "(* digits *)\ndigit = '0' | '1' | '2' ;\nnumber = digit , { digit } ;\n\nx = [ a - ] | 3 * ( b ) ;";
        let once = fmt(source);
        assert_eq!(fmt(&once), once);
    }
}
