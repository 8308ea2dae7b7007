use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use pazaak_rs::tui::client::{Client, DEFAULT_SERVER};
use pazaak_rs::tui::{app::AppState, controller};
use ratatui::prelude::*;
use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;

/// Terminal client for the human seat of a `multipaz` match.
#[derive(Parser, Debug)]
#[command(name = "pazaak-human", version, about)]
struct Cli {
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Refresh interval in milliseconds
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if !io::stdout().is_terminal() {
        println!(
            "pazaak-human requires a real terminal (TTY). Version: {}",
            pazaak_rs::VERSION
        );
        return Ok(());
    }
    let client = Client::new(cli.server)?;
    let mut terminal = setup_terminal()?;
    let mut app = AppState::default();

    let res = controller::run(&mut terminal, &mut app, &client, Duration::from_millis(cli.tick_ms));

    restore_terminal(terminal)?;
    Ok(res?)
}
