//! Rule list pane rendering
//!
//! Lists every rule of the grammar in source order. The selected rule drives
//! the syntax tree pane and the source highlight.

use crate::parser::ast::Syntax;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Scroll state for the rule list
pub struct RulesScrollState {
    pub offset: usize,
}

/// Render the rule list pane
pub fn render_rules_pane(
    frame: &mut Frame,
    area: Rect,
    syntax: &Syntax,
    selected: usize,
    is_focused: bool,
    scroll_state: &mut RulesScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Rules ({}) ", syntax.rules.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the selection on screen
    if selected < scroll_state.offset {
        scroll_state.offset = selected;
    } else if selected >= scroll_state.offset + visible_height {
        scroll_state.offset = selected + 1 - visible_height;
    }

    let items: Vec<ListItem> = syntax
        .rules
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(index, rule)| {
            let is_selected = index == selected;
            let name_style = if is_selected {
                Style::default()
                    .fg(DEFAULT_THEME.rule_name)
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };

            let mut spans = vec![
                Span::styled(if is_selected { "▶ " } else { "  " }, name_style),
                Span::styled(rule.name.name.clone(), name_style),
            ];
            if rule.definition.is_none() {
                spans.push(Span::styled(
                    " (empty)",
                    Style::default()
                        .fg(DEFAULT_THEME.comment)
                        .add_modifier(Modifier::ITALIC),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
