//! scriptc: lexer, parser and IR emitter for a small scripting language
//!
//! Every subcommand reads one source file (or `-` for standard input) and
//! prints one stage of the pipeline.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, LevelFilter};
use ratatui::{backend::CrosstermBackend, Terminal};

use scriptc::ir::{self, stats, EmitOptions};
use scriptc::parser::{dump::dump_tree, parse, Lexer};
use scriptc::ui::App;

/// Front end for a small scripting language
#[derive(Debug, Parser)]
#[command(name = "scriptc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// No log output at all
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the token stream, one token per line
    Tokens {
        /// Source file, or `-` for standard input
        file: String,
    },

    /// Print the indented syntax tree
    Ast {
        /// Source file, or `-` for standard input
        file: String,
    },

    /// Print the emitted instructions
    Ir {
        /// Source file, or `-` for standard input
        file: String,

        /// Walk the children of explicitly lowered nodes a second time
        #[arg(long)]
        revisit_children: bool,

        /// Print an opcode histogram to stderr
        #[arg(long)]
        stats: bool,

        /// Write the instructions to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the interactive inspector
    View {
        /// Source file, or `-` for standard input
        file: String,

        /// Start with child revisiting enabled
        #[arg(long)]
        revisit_children: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Off
    } else {
        match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).init() {
        eprintln!("Warning: could not install logger: {}", e);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Tokens { file } => {
            let source = read_source(&file)?;
            let mut lexer = Lexer::new(&source);
            let tokens = lexer.tokenize();

            for token in &tokens {
                println!("{}: {}", token.kind.tag(), token.text);
            }
            for diagnostic in lexer.diagnostics() {
                eprintln!("{}", diagnostic);
            }
        }

        Command::Ast { file } => {
            let source = read_source(&file)?;
            let program = parse(scriptc::parser::tokenize(&source))?;
            print!("{}", dump_tree(&program));
        }

        Command::Ir {
            file,
            revisit_children,
            stats: show_stats,
            output,
        } => {
            let source = read_source(&file)?;
            let instructions = scriptc::compile(&source, EmitOptions { revisit_children })?;
            let text = ir::render(&instructions);

            match output {
                Some(path) => {
                    fs::write(&path, text)
                        .map_err(|e| format!("cannot write '{}': {}", path.display(), e))?;
                    info!("wrote {} instructions to {}", instructions.len(), path.display());
                }
                None => print!("{}", text),
            }

            if show_stats {
                eprint!("{}", stats::format_summary(&instructions));
            }
        }

        Command::View {
            file,
            revisit_children,
        } => {
            let source = read_source(&file)?;
            let mut app = App::new(source, EmitOptions { revisit_children })?;
            run_inspector(&mut app)?;
        }
    }

    Ok(())
}

/// Read the whole input; `-` means standard input
fn read_source(file: &str) -> Result<String, Box<dyn Error>> {
    if file == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("cannot read standard input: {}", e))?;
        return Ok(source);
    }

    let source =
        fs::read_to_string(file).map_err(|e| format!("cannot read '{}': {}", file, e))?;
    info!("read {} bytes from {}", source.len(), file);
    Ok(source)
}

fn run_inspector(app: &mut App) -> Result<(), Box<dyn Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}
