//! Scrollable listing pane
//!
//! Tokens, the syntax tree dump and the IR are all line-oriented, so one
//! pane renders them all from pre-styled lines.

use crate::ui::panes::{border_style, clamp_scroll};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Everything a listing pane needs for one frame
pub struct ListingRenderData<'a> {
    pub title: String,
    pub lines: &'a [Line<'static>],
    /// Shown instead of the list when `lines` is empty
    pub placeholder: &'a str,
}

/// Render a bordered, scrollable list of lines
pub fn render_listing_pane(
    frame: &mut Frame,
    area: Rect,
    data: ListingRenderData<'_>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(data.title)
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if data.lines.is_empty() {
        let paragraph = Paragraph::new(data.placeholder)
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    let offset = clamp_scroll(scroll_offset, data.lines.len(), visible_height);

    let visible_items: Vec<ListItem> = data
        .lines
        .iter()
        .skip(offset)
        .take(visible_height)
        .map(|line| ListItem::new(line.clone()))
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
