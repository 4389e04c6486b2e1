//! src/main.rs – Tally launcher: interactive heavy-hitters viewer and batch export
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::event::Event;
use tui::{backend::CrosstermBackend, Terminal};

use tally::batch_mode::{self, BatchConfig, OutputFormat};
use tally::config::Config;
use tally::follow_up::{FollowUpDispatcher, QueueDispatcher};
use tally::logging::{init_logging, LogTarget, LOG_FILE};
use tally::results::{HittersView, ViewAction};
use tally::top_list::TopList;

/*──────────────────────── CLI structures ──────────────────────*/
#[derive(Parser)]
#[command(name = "Tally")]
#[command(about = "Browse heavy-hitter rankings with their rest-of-table row", long_about = None)]
struct Cli {
    /// Ranked list (JSON) to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a ranked list to a file (non-interactive)
    Export {
        /// Ranked list (JSON) to render
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output directory, defaults to Downloads
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Output format, defaults to the configured one
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/*──────────────────────── main ────────────────────────────────*/
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_result = Config::load();

    if let Some(Commands::Export { input, output_dir, format }) = cli.command {
        init_logging(LogTarget::Stderr, cli.verbose)?;
        let config = config_result?; // batch runs need a valid config

        let batch_config = BatchConfig {
            input,
            output_dir: output_dir.unwrap_or_else(batch_mode::default_output_dir),
            output_format: format.unwrap_or(config.export.format),
            missing_marker: config.display.missing_marker,
            verbose: cli.verbose,
        };
        let path = batch_mode::run_batch_mode(batch_config)?;
        println!("{}", path.display());
        return Ok(());
    }

    let data_dir = Config::data_dir();
    init_logging(LogTarget::File(&data_dir.join(LOG_FILE)), cli.verbose)?;

    // Interactive mode - fall back to defaults on a bad config
    let (config, config_error) = match config_result {
        Ok(cfg) => (cfg, None),
        Err(e) => {
            tracing::warn!(error = %e, "using default configuration");
            (Config::default(), Some(format!("{e:#}")))
        }
    };

    let file = cli
        .file
        .context("no ranked list given (usage: Tally FILE, or Tally export --input FILE)")?;
    let list = TopList::load(&file).with_context(|| format!("loading {}", file.display()))?;
    let mut view = HittersView::new(&list, &config.display)
        .with_context(|| format!("heavy hitters {} cannot be rendered", list.heavy_hitters_id))?;
    if let Some(error_msg) = config_error {
        view.set_error(error_msg);
    }

    let dispatcher = QueueDispatcher::new(data_dir);
    run_interactive_mode(&mut view, &dispatcher)
}

fn run_interactive_mode(view: &mut HittersView, dispatcher: &dyn FollowUpDispatcher) -> anyhow::Result<()> {
    /* Crossterm / TUI init */
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut term = Terminal::new(backend)?;

    let result = event_loop(&mut term, view, dispatcher);

    /* restore console, whatever the loop returned */
    let left = leave_alternate_screen();
    let raw_off = crossterm::terminal::disable_raw_mode();
    result?;
    left?;
    raw_off?;
    Ok(())
}

fn leave_alternate_screen() -> io::Result<()> {
    let mut out = io::stdout();
    crossterm::queue!(out, crossterm::terminal::LeaveAlternateScreen)?;
    out.flush()
}

fn event_loop<B: tui::backend::Backend>(
    term: &mut Terminal<B>,
    view: &mut HittersView,
    dispatcher: &dyn FollowUpDispatcher,
) -> anyhow::Result<()> {
    let tick = Duration::from_millis(100);
    let mut dirty = true;

    loop {
        if dirty {
            term.draw(|f| {
                let area = f.size();
                view.render(f, area);
            })?;
            dirty = false;
        }

        if !crossterm::event::poll(tick)? {
            continue;
        }
        match crossterm::event::read()? {
            Event::Key(k) => {
                match view.handle_key(k) {
                    ViewAction::Quit => break,
                    ViewAction::ShowAsTable => {
                        let request = view.follow_up_request();
                        match dispatcher.dispatch(&request) {
                            Ok(()) => view.set_status(format!(
                                "Requested rows outside {} as a table",
                                request.hitters_id
                            )),
                            Err(e) => {
                                tracing::error!(error = %e, "follow-up request failed");
                                view.set_error(format!("Request failed: {e}"));
                            }
                        }
                    }
                    ViewAction::None => {}
                }
                dirty = true;
            }
            Event::Resize(_, _) => dirty = true,
            _ => {}
        }
    }
    Ok(())
}
