//! Terminal inspector built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, emitter options
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   tokens, syntax tree, IR, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it from source text with
//! [`App::new`] and call [`App::run`] to start the event loop.
//!
//! [`App::new`]: app::App::new
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
