//! Terminal syntax-tree explorer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: explorer state, keyboard event loop and pane focus
//! - **[`panes`]**: render functions for each visible pane (rules, tree,
//!   source, status bar)
//! - **[`theme`]**: colour palette shared by all panes
//!
//! Construct an [`App`] from a [`ParseResult`] and call [`App::run`] to start
//! the event loop.
//!
//! [`ParseResult`]: crate::parser::ParseResult
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
