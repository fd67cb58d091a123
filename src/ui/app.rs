//! Main TUI application state and logic

use crate::error::CompileError;
use crate::ir::{stats, EmitOptions, Emitter, Instruction, Opcode};
use crate::parser::{dump::dump_tree, parse, AstNode, LexError, Lexer, Token};
use crate::ui::panes::{self, ListingRenderData, StatusRenderData};
use crate::ui::theme::DEFAULT_THEME;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const PAGE_SIZE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tokens,
    Tree,
    Ir,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> tokens -> tree -> ir)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Ir,
            FocusedPane::Ir => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Ir,
            FocusedPane::Tokens => FocusedPane::Source,
            FocusedPane::Tree => FocusedPane::Tokens,
            FocusedPane::Ir => FocusedPane::Tree,
        }
    }
}

/// The main application state
pub struct App {
    /// The source code being inspected
    pub source_code: String,

    /// Parsed program; kept so the IR can be re-emitted with other options
    pub program: AstNode,

    pub tokens: Vec<Token>,
    pub diagnostics: Vec<LexError>,
    pub instructions: Vec<Instruction>,
    pub options: EmitOptions,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub tokens_scroll: usize,
    pub tree_scroll: usize,
    pub ir_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    token_lines: Vec<Line<'static>>,
    tree_lines: Vec<Line<'static>>,
    ir_lines: Vec<Line<'static>>,
}

impl App {
    /// Run the whole pipeline on `source_code`. Syntax and emission errors
    /// are returned before any terminal state is touched.
    pub fn new(source_code: String, options: EmitOptions) -> Result<Self, CompileError> {
        let mut lexer = Lexer::new(&source_code);
        let tokens = lexer.tokenize();
        let diagnostics = lexer.into_diagnostics();

        let program = parse(tokens.clone())?;
        let instructions = Emitter::new(options).emit_program(&program)?;

        let token_lines = token_lines(&tokens, &diagnostics);
        let tree_lines = tree_lines(&program);
        let ir_lines = ir_lines(&instructions);

        Ok(App {
            source_code,
            program,
            tokens,
            diagnostics,
            instructions,
            options,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            tokens_scroll: 0,
            tree_scroll: 0,
            ir_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            token_lines,
            tree_lines,
            ir_lines,
        })
    }

    /// Run the TUI application
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

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Tokens (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        // Right column: Syntax Tree (top) | IR (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        let diagnostic_lines: Vec<usize> =
            self.diagnostics.iter().map(|d| d.location.line).collect();

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            &diagnostic_lines,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_listing_pane(
            frame,
            left_rows[1],
            ListingRenderData {
                title: format!(" Tokens ({}) ", self.tokens.len()),
                lines: &self.token_lines,
                placeholder: "(no tokens)",
            },
            self.focused_pane == FocusedPane::Tokens,
            &mut self.tokens_scroll,
        );

        panes::render_listing_pane(
            frame,
            right_rows[0],
            ListingRenderData {
                title: " Syntax Tree ".to_string(),
                lines: &self.tree_lines,
                placeholder: "(empty program)",
            },
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        panes::render_listing_pane(
            frame,
            right_rows[1],
            ListingRenderData {
                title: format!(" IR ({} instructions) ", self.instructions.len()),
                lines: &self.ir_lines,
                placeholder: "(no instructions)",
            },
            self.focused_pane == FocusedPane::Ir,
            &mut self.ir_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                token_count: self.tokens.len(),
                node_count: self.program.node_count(),
                instruction_count: self.instructions.len(),
                diagnostic_count: self.diagnostics.len(),
                revisit_children: self.options.revisit_children,
            },
        );
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Tokens => &mut self.tokens_scroll,
            FocusedPane::Tree => &mut self.tree_scroll,
            FocusedPane::Ir => &mut self.ir_scroll,
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(PAGE_SIZE);
            }
            KeyCode::PageDown => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(PAGE_SIZE);
            }
            KeyCode::Home => {
                *self.focused_scroll() = 0;
            }
            KeyCode::End => {
                // Clamped to the last page on the next render
                *self.focused_scroll() = usize::MAX;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.toggle_revisit();
            }
            _ => {}
        }
    }

    /// Flip `revisit_children` and re-emit the IR
    fn toggle_revisit(&mut self) {
        let options = EmitOptions {
            revisit_children: !self.options.revisit_children,
        };

        match Emitter::new(options).emit_program(&self.program) {
            Ok(instructions) => {
                self.options = options;
                self.ir_lines = ir_lines(&instructions);
                self.instructions = instructions;
                self.ir_scroll = 0;
                self.status_message = if options.revisit_children {
                    "Re-emitted with child revisit".to_string()
                } else {
                    "Re-emitted with single visit".to_string()
                };
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }
}

fn token_lines(tokens: &[Token], diagnostics: &[LexError]) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = tokens
        .iter()
        .map(|token| {
            Line::from(vec![
                Span::styled(
                    format!("{:>4}:{:<4}", token.location.line, token.location.column),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    format!("{:<22}", token.kind.tag()),
                    if token.kind.is_keyword() {
                        Style::default()
                            .fg(DEFAULT_THEME.keyword)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(DEFAULT_THEME.keyword)
                    },
                ),
                Span::styled(token.text.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ])
        })
        .collect();

    lines.extend(diagnostics.iter().map(|diag| {
        Line::from(Span::styled(
            diag.to_string(),
            Style::default().fg(DEFAULT_THEME.error),
        ))
    }));

    lines
}

fn tree_lines(program: &AstNode) -> Vec<Line<'static>> {
    dump_tree(program)
        .lines()
        .map(|line| {
            let indent = line.len() - line.trim_start().len();
            let (tag, value) = match line[indent..].split_once(": ") {
                Some((tag, value)) => (tag, Some(value)),
                None => (&line[indent..], None),
            };

            let mut spans = vec![
                Span::raw(line[..indent].to_string()),
                Span::styled(tag.to_string(), Style::default().fg(DEFAULT_THEME.primary)),
            ];
            if let Some(value) = value {
                spans.push(Span::styled(
                    format!(": {}", value),
                    Style::default().fg(DEFAULT_THEME.fg),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

fn ir_lines(instructions: &[Instruction]) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = instructions
        .iter()
        .map(|instruction| {
            let text = instruction.to_string();
            match instruction.op {
                Opcode::Function => Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(DEFAULT_THEME.function)
                        .add_modifier(Modifier::BOLD),
                )),
                Opcode::Label => Line::from(Span::styled(
                    text,
                    Style::default().fg(DEFAULT_THEME.label),
                )),
                op => {
                    let operands = text[op.as_str().len()..].to_string();
                    Line::from(vec![
                        Span::styled(
                            format!("  {}", op.as_str()),
                            Style::default().fg(DEFAULT_THEME.opcode),
                        ),
                        Span::styled(operands, Style::default().fg(DEFAULT_THEME.fg)),
                    ])
                }
            }
        })
        .collect();

    if !instructions.is_empty() {
        lines.push(Line::default());
        lines.extend(stats::format_summary(instructions).lines().map(|row| {
            Line::from(Span::styled(
                row.to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ))
        }));
    }

    lines
}
