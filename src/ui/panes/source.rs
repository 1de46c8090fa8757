//! Source pane rendering with syntax highlighting
//!
//! Displays the grammar text with the lines of the selected rule marked.
//!
//! # Features
//!
//! - Highlighting driven by the lexer's own tokens and trivia, so the colours
//!   always agree with what the parser saw
//! - Selected rule highlighting with a line marker
//! - Line numbering
//!
//! Highlighting is computed once per document by [`highlight_lines`]; the
//! render function only slices the visible window.

use crate::parser::ast::Span as SourceSpan;
use crate::parser::lexer::{Token, TokenKind, TriviaKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const TAB_WIDTH: usize = 4;

fn token_style(kind: &TokenKind, is_rule_name: bool) -> Style {
    match kind {
        TokenKind::Identifier(_) if is_rule_name => Style::default()
            .fg(DEFAULT_THEME.rule_name)
            .add_modifier(Modifier::BOLD),
        TokenKind::Identifier(_) => Style::default().fg(DEFAULT_THEME.identifier),
        TokenKind::Terminal(..) => Style::default().fg(DEFAULT_THEME.terminal),
        TokenKind::SpecialSequence(_) => Style::default().fg(DEFAULT_THEME.special),
        TokenKind::Integer(_) => Style::default().fg(DEFAULT_THEME.number),
        TokenKind::Equals | TokenKind::Semicolon => Style::default().fg(DEFAULT_THEME.fg),
        TokenKind::Eof => Style::default(),
        _ => Style::default().fg(DEFAULT_THEME.operator),
    }
}

/// Append `text` to the current line, starting a new display line at each
/// `\n` and expanding tabs against the running `column`.
fn push_text(
    text: &str,
    style: Style,
    column: &mut usize,
    lines: &mut Vec<Line<'static>>,
    current: &mut Vec<Span<'static>>,
) {
    for (part_index, part) in text.split('\n').enumerate() {
        if part_index > 0 {
            lines.push(Line::from(std::mem::take(current)));
            *column = 0;
        }
        if part.is_empty() {
            continue;
        }
        let mut expanded = String::with_capacity(part.len());
        for ch in part.chars() {
            match ch {
                '\t' => {
                    let width = TAB_WIDTH - *column % TAB_WIDTH;
                    expanded.extend(std::iter::repeat(' ').take(width));
                    *column += width;
                }
                '\r' => {}
                _ => {
                    expanded.push(ch);
                    *column += 1;
                }
            }
        }
        current.push(Span::styled(expanded, style));
    }
}

/// Split `source` into highlighted display lines using its token stream.
///
/// Text not covered by any token or trivia is emitted unstyled.
pub fn highlight_lines(source: &str, tokens: &[Token]) -> Vec<Line<'static>> {
    let mut segments: Vec<(SourceSpan, Style)> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        for trivia in &token.trivia {
            let style = match trivia.kind {
                TriviaKind::Comment(_) => Style::default()
                    .fg(DEFAULT_THEME.comment)
                    .add_modifier(Modifier::ITALIC),
                TriviaKind::Whitespace => Style::default(),
            };
            segments.push((trivia.span, style));
        }

        // An identifier directly followed by `=` is a rule head
        let is_rule_name = matches!(
            tokens.get(index + 1).map(|next| &next.kind),
            Some(TokenKind::Equals)
        );
        segments.push((token.span, token_style(&token.kind, is_rule_name)));
    }

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut column = 0;
    let mut cursor = 0;

    for (span, style) in segments {
        if span.start < cursor || span.end > source.len() {
            continue;
        }
        if span.start > cursor {
            push_text(
                &source[cursor..span.start],
                Style::default(),
                &mut column,
                &mut lines,
                &mut current,
            );
        }
        push_text(span.slice(source), style, &mut column, &mut lines, &mut current);
        cursor = span.end;
    }
    if cursor < source.len() {
        push_text(
            &source[cursor..],
            Style::default(),
            &mut column,
            &mut lines,
            &mut current,
        );
    }

    // A trailing newline does not open another display line
    if !current.is_empty() || !source.ends_with('\n') {
        lines.push(Line::from(current));
    }

    lines
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
}

/// Data needed to render the source pane
pub struct SourceRenderData<'a> {
    pub lines: &'a [Line<'static>],
    /// 1-based inclusive line range of the selected rule
    pub selected_lines: Option<(usize, usize)>,
}

/// Render the source pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: SourceRenderData,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let total_lines = data.lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = data
        .lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_selected = data
                .selected_lines
                .is_some_and(|(start, end)| (start..=end).contains(&line_num));

            let (marker, num_style) = if is_selected {
                (
                    "▶",
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (" ", Style::default().fg(DEFAULT_THEME.comment))
            };

            let mut spans = vec![Span::styled(format!("{}{:4} ", marker, line_num), num_style)];
            if is_selected {
                let background = Style::default().bg(DEFAULT_THEME.current_line_bg);
                spans.extend(line.spans.iter().map(|span| {
                    Span::styled(span.content.clone(), span.style.patch(background))
                }));
            } else {
                spans.extend(line.spans.iter().cloned());
            }

            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_highlight_reproduces_text() {
        let source = "a = 'x' (* note *)\n  | b ;\n";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let lines = highlight_lines(source, &tokens);
        assert_eq!(plain(&lines), vec!["a = 'x' (* note *)", "  | b ;"]);
    }

    #[test]
    fn test_highlight_expands_tabs() {
        let source = "a\t= b ;";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let lines = highlight_lines(source, &tokens);
        assert_eq!(plain(&lines), vec!["a   = b ;"]);
    }

    #[test]
    fn test_rule_name_styled_apart_from_references() {
        let source = "a = a ;";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let lines = highlight_lines(source, &tokens);
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "a");
        assert_eq!(spans[0].style.fg, Some(DEFAULT_THEME.rule_name));
        let reference = spans.iter().rev().find(|span| span.content == "a").unwrap();
        assert_eq!(reference.style.fg, Some(DEFAULT_THEME.identifier));
    }

    #[test]
    fn test_multiline_comment_spans_lines() {
        let source = "(* one\ntwo *) a = b ;";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let lines = highlight_lines(source, &tokens);
        assert_eq!(plain(&lines), vec!["(* one", "two *) a = b ;"]);
        assert_eq!(lines[1].spans[0].style.fg, Some(DEFAULT_THEME.comment));
    }
}
