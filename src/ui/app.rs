//! Explorer application state and event loop

use crate::parser::ast::{Span, SyntaxRule};
use crate::parser::ParseResult;
use crate::ui::panes::{
    self, RulesScrollState, SourceRenderData, SourceScrollState, StatusRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    text::Line,
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::debug;

/// Lines kept above the selected rule when the source pane follows the selection
const SOURCE_CONTEXT_LINES: usize = 2;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Rules,
    Tree,
    Source,
}

impl FocusedPane {
    /// Move focus to the next pane (rules -> tree -> source)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Rules => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Source,
            FocusedPane::Source => FocusedPane::Rules,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Rules => FocusedPane::Source,
            FocusedPane::Tree => FocusedPane::Rules,
            FocusedPane::Source => FocusedPane::Tree,
        }
    }
}

/// 1-based inclusive line range covered by `span` in `source`
pub fn line_range(source: &str, span: Span) -> (usize, usize) {
    let end = span.end.min(source.len());
    let start = span.start.min(end);
    let first = source.as_bytes()[..start]
        .iter()
        .filter(|&&byte| byte == b'\n')
        .count()
        + 1;
    let last = first
        + source.as_bytes()[start..end]
            .iter()
            .filter(|&&byte| byte == b'\n')
            .count();
    (first, last)
}

/// The explorer state
pub struct App {
    /// The parsed grammar with its tokens and comments
    pub document: ParseResult,

    /// The grammar text being explored
    pub source_code: String,

    /// Display name of the grammar file
    pub file_name: String,

    /// Highlighted source lines, computed once
    highlighted: Vec<Line<'static>>,

    /// Line range of each rule, parallel to `document.syntax.rules`
    rule_lines: Vec<(usize, usize)>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Index of the selected rule
    pub selected_rule: usize,

    /// Per-pane scroll offsets
    pub rules_scroll: RulesScrollState,
    pub tree_scroll: usize,
    pub source_scroll: SourceScrollState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app over a parsed grammar and the text it came from
    pub fn new(document: ParseResult, source_code: String, file_name: String) -> Self {
        let highlighted = panes::highlight_lines(&source_code, &document.tokens);
        let rule_lines = document
            .syntax
            .rules
            .iter()
            .map(|rule| line_range(&source_code, rule.span))
            .collect();

        let status_message = format!(
            "Parsed {} rule(s), {} comment(s)",
            document.syntax.rules.len(),
            document.comments.values().map(Vec::len).sum::<usize>()
        );

        let mut app = App {
            document,
            source_code,
            file_name,
            highlighted,
            rule_lines,
            focused_pane: FocusedPane::Rules,
            selected_rule: 0,
            rules_scroll: RulesScrollState { offset: 0 },
            tree_scroll: 0,
            source_scroll: SourceScrollState { offset: 0 },
            should_quit: false,
            status_message,
        };
        app.select_rule(0);
        app
    }

    /// The rule currently shown in the tree pane
    pub fn selected(&self) -> Option<&SyntaxRule> {
        self.document.syntax.rules.get(self.selected_rule)
    }

    /// Run the explorer until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(main_chunks[0]);

        // Right column: Tree (top) | Source (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        panes::render_rules_pane(
            frame,
            columns[0],
            &self.document.syntax,
            self.selected_rule,
            self.focused_pane == FocusedPane::Rules,
            &mut self.rules_scroll,
        );

        panes::render_tree_pane(
            frame,
            right_rows[0],
            self.document.syntax.rules.get(self.selected_rule),
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        panes::render_source_pane(
            frame,
            right_rows[1],
            SourceRenderData {
                lines: &self.highlighted,
                selected_lines: self.rule_lines.get(self.selected_rule).copied(),
            },
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                file_name: &self.file_name,
                message: &self.status_message,
                selected: self.selected_rule,
                total_rules: self.document.syntax.rules.len(),
            },
        );
    }

    /// Select a rule and bring its source into view
    fn select_rule(&mut self, index: usize) {
        let Some(last) = self.document.syntax.rules.len().checked_sub(1) else {
            return;
        };
        self.selected_rule = index.min(last);
        self.tree_scroll = 0;

        if let Some(&(start, _)) = self.rule_lines.get(self.selected_rule) {
            self.source_scroll.offset = start.saturating_sub(1 + SOURCE_CONTEXT_LINES);
        }
        if let Some(rule) = self.selected() {
            debug!(rule = %rule.name, "selected rule");
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Rules => self.select_rule(self.selected_rule.saturating_sub(1)),
                FocusedPane::Tree => self.tree_scroll = self.tree_scroll.saturating_sub(1),
                FocusedPane::Source => {
                    self.source_scroll.offset = self.source_scroll.offset.saturating_sub(1)
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Rules => self.select_rule(self.selected_rule.saturating_add(1)),
                FocusedPane::Tree => self.tree_scroll = self.tree_scroll.saturating_add(1),
                FocusedPane::Source => {
                    self.source_scroll.offset = self.source_scroll.offset.saturating_add(1)
                }
            },
            KeyCode::Home => match self.focused_pane {
                FocusedPane::Rules => self.select_rule(0),
                FocusedPane::Tree => self.tree_scroll = 0,
                FocusedPane::Source => self.source_scroll.offset = 0,
            },
            // Render functions clamp oversized offsets to the last page
            KeyCode::End => match self.focused_pane {
                FocusedPane::Rules => self.select_rule(usize::MAX),
                FocusedPane::Tree => self.tree_scroll = usize::MAX,
                FocusedPane::Source => self.source_scroll.offset = usize::MAX,
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use crossterm::event::KeyModifiers;

    fn app(source: &str) -> App {
        let document = parse_document(source).unwrap();
        App::new(document, source.to_string(), "test.ebnf".to_string())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_focus_cycle() {
        let mut pane = FocusedPane::Rules;
        for _ in 0..3 {
            pane = pane.next();
        }
        assert_eq!(pane, FocusedPane::Rules);
        assert_eq!(FocusedPane::Rules.prev(), FocusedPane::Source);
        assert_eq!(FocusedPane::Source.next().prev(), FocusedPane::Source);
    }

    #[test]
    fn test_line_range() {
        let source = "a = b ;\nc =\n  d ;\n";
        assert_eq!(line_range(source, Span::new(0, 7)), (1, 1));
        assert_eq!(line_range(source, Span::new(8, 17)), (2, 3));
        assert_eq!(line_range(source, Span::new(100, 200)), (4, 4));
    }

    #[test]
    fn test_rule_selection_clamps() {
        let mut app = app("a = x ;\nb = y ;\nc = z ;\n");
        assert_eq!(app.selected().unwrap().name.name, "a");

        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_rule, 0);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected().unwrap().name.name, "c");

        press(&mut app, KeyCode::Home);
        assert_eq!(app.selected_rule, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.selected_rule, 2);
    }

    #[test]
    fn test_arrows_follow_focus() {
        let mut app = app("a = x ;\nb = y ;\n");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Tree);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_rule, 0);
        assert_eq!(app.tree_scroll, 1);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Rules);
    }

    #[test]
    fn test_quit() {
        let mut app = app("a = x ;");
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_status_counts_comments() {
        let app = app("(* one *) a = x ; (* two *)");
        assert_eq!(app.status_message, "Parsed 1 rule(s), 2 comment(s)");
    }
}
