//! pairdiff CLI - line-aligned two-pane diff viewer TUI

mod app;
mod color;
mod config;
mod logging;
mod print;
mod ui;
mod views;

use anyhow::{Context, Result};
use app::{App, CompareTarget, TerminalHost, WINDOW};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pairdiff_core::source::decode_lines;
use pairdiff_core::{CompareSummary, CompareWorkspace, DiffAlgorithm, DiffEngine, SourceId};
use ratatui::prelude::*;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Name of the buffer read from stdin with `--saved`
const STDIN_BUFFER: &str = "stdin";

#[derive(Parser, Debug)]
#[command(name = "pairdiff")]
#[command(author, version, about = "Line-aligned two-pane diff viewer")]
struct Args {
    /// Left file
    #[arg(required_unless_present = "saved")]
    left: Option<PathBuf>,

    /// Right file
    #[arg(required_unless_present = "saved")]
    right: Option<PathBuf>,

    /// Compare stdin (unsaved edits) against FILE on disk
    #[arg(long, value_name = "FILE", conflicts_with_all = ["left", "right"])]
    saved: Option<PathBuf>,

    /// Line matching algorithm
    #[arg(short, long, value_enum)]
    algorithm: Option<CliAlgorithm>,

    /// Scroll the panes independently
    #[arg(long)]
    no_sync: bool,

    /// Print the aligned panes as text and exit (status 1 if they differ, 2 on error)
    #[arg(long, conflicts_with = "json")]
    print: bool,

    /// Print the aligned panes as JSON and exit (status 1 if they differ, 2 on error)
    #[arg(long)]
    json: bool,

    /// Total output width for --print (default: fit the content)
    #[arg(long, requires = "print")]
    width: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliAlgorithm {
    #[value(alias = "lcs")]
    MatchingBlocks,
    Histogram,
    Myers,
}

impl From<CliAlgorithm> for DiffAlgorithm {
    fn from(algorithm: CliAlgorithm) -> Self {
        match algorithm {
            CliAlgorithm::MatchingBlocks => DiffAlgorithm::MatchingBlocks,
            CliAlgorithm::Histogram => DiffAlgorithm::Histogram,
            CliAlgorithm::Myers => DiffAlgorithm::Myers,
        }
    }
}

/// Build the host and the compare target from the arguments
fn prepare(args: &Args) -> Result<(TerminalHost, CompareTarget)> {
    let mut host = TerminalHost::new();
    let target = match (&args.saved, &args.left, &args.right) {
        (Some(saved), _, _) => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read buffer from stdin")?;
            let lines = decode_lines(&bytes).context("Failed to decode buffer from stdin")?;
            host.add_buffer(STDIN_BUFFER, lines, Some(saved.clone()));
            CompareTarget::Saved {
                buffer: SourceId::buffer(STDIN_BUFFER),
            }
        }
        (None, Some(left), Some(right)) => CompareTarget::Pair {
            left: SourceId::file(left),
            right: SourceId::file(right),
        },
        _ => anyhow::bail!("Usage: pairdiff <left> <right>\n       pairdiff --saved <file> < buffer"),
    };
    Ok((host, target))
}

fn build_app(
    workspace: CompareWorkspace,
    host: TerminalHost,
    target: CompareTarget,
    config: &config::Config,
) -> App {
    let mut app = App::new(workspace, host, target);
    app.zen_mode = config.ui.zen;
    app.line_numbers = config.ui.line_numbers;
    app.blank_fill = config.ui.blank_fill.clone();
    app.palette = config.colors.resolve();
    app
}

/// `--print` / `--json`: write the aligned panes to stdout
fn run_headless(
    args: &Args,
    workspace: CompareWorkspace,
    config: &config::Config,
) -> Result<CompareSummary> {
    let (host, target) = prepare(args)?;
    let mut app = build_app(workspace, host, target, config);
    let summary = app.compare().context("Failed to compare")?;

    let session = app
        .workspace
        .session(WINDOW)
        .context("Comparison did not produce a session")?;
    if args.json {
        println!("{}", print::render_json(session)?);
    } else {
        let width = args
            .width
            .unwrap_or_else(|| 2 * (print::content_width(session) + 7) + 3);
        print!("{}", print::render_plain(session, width, &app.blank_fill));
    }
    Ok(summary)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let headless = args.print || args.json;
    if headless {
        logging::init_stderr();
    } else {
        logging::init_file();
    }
    let config = config::Config::load();

    // CLI overrides config
    let algorithm = args
        .algorithm
        .map(DiffAlgorithm::from)
        .or_else(|| config.algorithm())
        .unwrap_or_default();
    let workspace = CompareWorkspace::new(DiffEngine::new().with_algorithm(algorithm))
        .with_sync(config.ui.sync_scroll && !args.no_sync)
        .with_reveal_first_diff(config.ui.reveal_first_diff);

    if headless {
        let result = run_headless(&args, workspace, &config);
        if let Err(err) = &result {
            eprintln!("Error: {:#}", err);
        }
        return Ok(ExitCode::from(print::exit_status(&result)));
    }

    let (host, target) = prepare(&args)?;
    let mut app = build_app(workspace, host, target, &config);
    app.compare().context("Failed to compare")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(ExitCode::SUCCESS)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Mouse(me) => {
                    if app.show_help {
                        continue;
                    }
                    let width = terminal.size()?.width;
                    match me.kind {
                        MouseEventKind::ScrollUp => app.wheel(me.column, width, false),
                        MouseEventKind::ScrollDown => app.wheel(me.column, width, true),
                        _ => {}
                    }
                }
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }

        if app.should_quit {
            app.workspace.clear_all(&mut app.host);
            return Ok(());
        }
    }
}
