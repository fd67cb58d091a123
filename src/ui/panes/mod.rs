//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting
//! - [`listing`]: Scrollable list of pre-styled lines, used for the token,
//!   syntax tree and IR panes
//! - [`status`]: Status bar with keybindings and pipeline counts
//!
//! Each pane module exports a primary `render_*` function. Scroll offsets are
//! owned by the caller and clamped during rendering.

pub mod listing;
pub mod source;
pub mod status;

pub use listing::{render_listing_pane, ListingRenderData};
pub use source::render_source_pane;
pub use status::{render_status_bar, StatusRenderData};

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

/// Border style shared by all bordered panes
pub(crate) fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `offset` so the last page stays full, and return it.
pub(crate) fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) -> usize {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
    *offset
}
