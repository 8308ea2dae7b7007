use crate::tui::app::{AppState, InputAction};
use crate::tui::client::Client;
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    client: &Client,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    poll_server(app, client);
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if handle_key(app, key.code) {
                    break;
                }
                if let Some(m) = app.take_submission() {
                    app.record_submit(client.submit(&m).map_err(|e| e.to_string()));
                    poll_server(app, client);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            poll_server(app, client);
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn poll_server(app: &mut AppState, client: &Client) {
    match client.fetch_state() {
        Ok(Some(snap)) => app.apply_state(snap.view, snap.time_left),
        Ok(None) => {}
        Err(e) => app.set_status(format!("Server unreachable: {e}")),
    }
}

/// Map a key to an action. Returns true when the client should quit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    if app.help_open() {
        if matches!(code, KeyCode::Esc | KeyCode::Char('?')) {
            let _ = app.handle_input(InputAction::ToggleHelp);
        }
        return false;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Char('?') => {
            let _ = app.handle_input(InputAction::ToggleHelp);
        }
        KeyCode::Char(c @ '1'..='4') => {
            let _ = app.handle_input(InputAction::Select((c as u8 - b'1') as usize));
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            let _ = app.handle_input(InputAction::ToggleFlip);
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            let _ = app.handle_input(InputAction::ToggleStand);
        }
        KeyCode::Enter => {
            let _ = app.handle_input(InputAction::Submit);
        }
        _ => {}
    }
    false
}
