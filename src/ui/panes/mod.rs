//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`rules`]: Rule list with the current selection
//! - [`tree`]: Outline of the selected rule's syntax tree
//! - [`source`]: Grammar text with token-based highlighting
//! - [`status`]: Status bar with keybindings and selection position
//!
//! Each pane module exports a primary `render_*_pane()` function plus the
//! state types it needs (`*ScrollState`, `*RenderData`).

pub mod rules;
pub mod source;
pub mod status;
pub mod tree;

// Re-export render functions for convenience
pub use rules::{render_rules_pane, RulesScrollState};
pub use source::{highlight_lines, render_source_pane, SourceRenderData, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use tree::{outline, render_tree_pane, NodeRole, OutlineRow};
