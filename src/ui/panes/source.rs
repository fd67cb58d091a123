//! Source code pane rendering with syntax highlighting
//!
//! # Features
//!
//! - Syntax highlighting for keywords, strings, numbers, calls and `#` comments
//! - Line numbering
//! - Lines carrying a lexer diagnostic get an error-colored line number
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character scanner to apply syntax
//! highlighting styles. It does not share the compiler's lexer, so it keeps
//! working on lines the lexer would complain about.

use crate::ui::panes::{border_style, clamp_scroll};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Syntax highlighting for one line of script source
pub(crate) fn highlight_source_line(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Comment runs to the end of the line
        if c == '#' {
            flush_word(&mut spans, &mut current_word, false);
            let rest: String = chars[i..].iter().collect();
            spans.push(Span::styled(rest, Style::default().fg(DEFAULT_THEME.comment)));
            break;
        }

        if c == '"' {
            flush_word(&mut spans, &mut current_word, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != '"' {
                if chars[end] == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            let end = (end + 1).min(chars.len());
            let literal: String = chars[i..end].iter().collect();
            spans.push(Span::styled(literal, Style::default().fg(DEFAULT_THEME.string)));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' && !(c == '.' && is_number(&current_word)) {
            flush_word(&mut spans, &mut current_word, c == '(');

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };

            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word, false);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'_>>, word: &mut String, is_call: bool) {
    if word.is_empty() {
        return;
    }
    let style = word_style(word, is_call);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn is_number(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn word_style(word: &str, is_call: bool) -> Style {
    match word {
        "main" | "function" | "for" | "if" | "else" | "return" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        _ if is_number(word) => Style::default().fg(DEFAULT_THEME.number),
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    diagnostic_lines: &[usize],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    let offset = clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let num_style = if diagnostic_lines.contains(&line_num) {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            spans.extend(highlight_source_line(line).spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &Line<'_>) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_preserves_text() {
        let src = "main() { x = \"a b\" + 1.5; } # done";
        let line = highlight_source_line(src);
        assert_eq!(words(&line).concat(), src);
    }

    #[test]
    fn test_keywords_and_calls_styled() {
        let line = highlight_source_line("return f(x);");
        let spans = &line.spans;
        assert_eq!(spans[0].content, "return");
        assert_eq!(spans[0].style.fg, Some(DEFAULT_THEME.keyword));
        let call = spans.iter().find(|s| s.content == "f").unwrap();
        assert_eq!(call.style.fg, Some(DEFAULT_THEME.function));
    }

    #[test]
    fn test_comment_and_float() {
        let line = highlight_source_line("1.25 # note");
        assert_eq!(line.spans[0].content, "1.25");
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.number));
        let last = line.spans.last().unwrap();
        assert_eq!(last.content, "# note");
        assert_eq!(last.style.fg, Some(DEFAULT_THEME.comment));
    }
}
