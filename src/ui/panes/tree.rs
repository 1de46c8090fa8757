//! Syntax tree pane rendering
//!
//! Shows the selected rule as an indented outline, one row per node. The
//! outline itself is built by [`outline`], which is independent of the
//! terminal and is what the tests exercise.

use crate::parser::ast::*;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// What kind of node an outline row stands for; drives the row colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Rule,
    Operator,
    Group,
    Identifier,
    Terminal,
    SpecialSequence,
    Integer,
    /// Absent definitions, exception operands and group contents
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub depth: usize,
    pub label: String,
    pub role: NodeRole,
}

/// Flatten `rule` into outline rows, parents before children.
pub fn outline(rule: &SyntaxRule) -> Vec<OutlineRow> {
    let mut rows = vec![OutlineRow {
        depth: 0,
        label: format!("rule {}", rule.name.name),
        role: NodeRole::Rule,
    }];

    match &rule.definition {
        Some(definition) => push_expression(&mut rows, definition, 1),
        None => push_row(&mut rows, 1, "(empty definition)".to_string(), NodeRole::Empty),
    }

    rows
}

fn push_row(rows: &mut Vec<OutlineRow>, depth: usize, label: String, role: NodeRole) {
    rows.push(OutlineRow { depth, label, role });
}

fn push_expression(rows: &mut Vec<OutlineRow>, expr: &Expression, depth: usize) {
    match expr {
        Expression::Atom(Atom::Identifier(ident)) => {
            push_row(rows, depth, format!("identifier {}", ident.name), NodeRole::Identifier)
        }
        Expression::Atom(Atom::Terminal(terminal)) => {
            push_row(rows, depth, format!("terminal {}", terminal), NodeRole::Terminal)
        }
        Expression::Atom(Atom::SpecialSequence(special)) => {
            push_row(rows, depth, format!("special {}", special), NodeRole::SpecialSequence)
        }
        Expression::Binary(binary) => {
            let label = format!("{} {}", binary.operator.name(), binary.operator.symbol());
            push_row(rows, depth, label, NodeRole::Operator);

            match &binary.left {
                Operand::Expression(left) => push_expression(rows, left, depth + 1),
                Operand::Integer(count) => {
                    push_row(rows, depth + 1, format!("count {}", count.value), NodeRole::Integer)
                }
            }
            match &binary.right {
                Some(right) => push_expression(rows, right, depth + 1),
                None => push_row(
                    rows,
                    depth + 1,
                    "(nothing excluded)".to_string(),
                    NodeRole::Empty,
                ),
            }
        }
        Expression::Group(group) => {
            let name = match group.kind {
                GroupKind::Optional => "optional",
                GroupKind::Repeated => "repeated",
                GroupKind::Grouped => "grouped",
            };
            let label = format!("{} {} {}", name, group.kind.open(), group.kind.close());
            push_row(rows, depth, label, NodeRole::Group);

            match &group.inner {
                Some(inner) => push_expression(rows, inner, depth + 1),
                None => push_row(rows, depth + 1, "(empty)".to_string(), NodeRole::Empty),
            }
        }
    }
}

fn role_style(role: NodeRole) -> Style {
    match role {
        NodeRole::Rule => Style::default()
            .fg(DEFAULT_THEME.rule_name)
            .add_modifier(Modifier::BOLD),
        NodeRole::Operator | NodeRole::Group => Style::default().fg(DEFAULT_THEME.operator),
        NodeRole::Identifier => Style::default().fg(DEFAULT_THEME.identifier),
        NodeRole::Terminal => Style::default().fg(DEFAULT_THEME.terminal),
        NodeRole::SpecialSequence => Style::default().fg(DEFAULT_THEME.special),
        NodeRole::Integer => Style::default().fg(DEFAULT_THEME.number),
        NodeRole::Empty => Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::ITALIC),
    }
}

/// Render the syntax tree pane
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    rule: Option<&SyntaxRule>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Syntax Tree ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(rule) = rule else {
        let paragraph = Paragraph::new("(no rule selected)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let rows = outline(rule);
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Clamp scroll offset only if content exceeds visible area
    if rows.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(rows.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|row| {
            let guide = "│ ".repeat(row.depth.saturating_sub(1));
            let branch = if row.depth > 0 { "├ " } else { "" };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}{}", guide, branch),
                    Style::default().fg(DEFAULT_THEME.border_normal),
                ),
                Span::styled(row.label.clone(), role_style(row.role)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn rows(source: &str) -> Vec<(usize, String)> {
        let syntax = parse(source).unwrap();
        outline(&syntax.rules[0])
            .into_iter()
            .map(|row| (row.depth, row.label))
            .collect()
    }

    #[test]
    fn test_outline_shape() {
        assert_eq!(
            rows("r = 'a' , b | 3 * ? c ? ;"),
            vec![
                (0, "rule r".to_string()),
                (1, "alternation |".to_string()),
                (2, "concatenation ,".to_string()),
                (3, "terminal 'a'".to_string()),
                (3, "identifier b".to_string()),
                (2, "repetition-count *".to_string()),
                (3, "count 3".to_string()),
                (3, "special ? c ?".to_string()),
            ]
        );
    }

    #[test]
    fn test_outline_marks_absent_parts() {
        let syntax = parse("e = ; x = a - ; g = { } ;").unwrap();

        let empty = outline(&syntax.rules[0]);
        assert_eq!(empty[1].role, NodeRole::Empty);

        let exception = outline(&syntax.rules[1]);
        assert_eq!(exception.len(), 4);
        assert_eq!(exception[3].label, "(nothing excluded)");

        let group = outline(&syntax.rules[2]);
        assert_eq!(group[1].label, "repeated { }");
        assert_eq!(group[2].role, NodeRole::Empty);
    }
}
