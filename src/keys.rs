use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

const PAGE: usize = 10;

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    let ticket = match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => {
            guard.update_tab(MenuItem::Matches);
            None
        }
        (_, Char('2'), _) => {
            guard.update_tab(MenuItem::Teams);
            None
        }
        (_, Char('?'), _) => {
            guard.update_tab(MenuItem::Help);
            None
        }
        (MenuItem::Help, KeyCode::Esc, _) => {
            guard.exit_help();
            None
        }

        // Match table
        (MenuItem::Matches, Char('j') | KeyCode::Down, _) => {
            guard.state.matches.cursor_down();
            None
        }
        (MenuItem::Matches, Char('k') | KeyCode::Up, _) => {
            guard.state.matches.cursor_up();
            None
        }
        (MenuItem::Matches, KeyCode::PageDown, _) => {
            guard.state.matches.cursor_page(true, PAGE);
            None
        }
        (MenuItem::Matches, KeyCode::PageUp, _) => {
            guard.state.matches.cursor_page(false, PAGE);
            None
        }
        (MenuItem::Matches, KeyCode::Enter, _) => {
            guard.state.matches.activate_row();
            None
        }
        (MenuItem::Matches, KeyCode::Esc, _) => {
            guard.state.matches.close_popup();
            None
        }

        // Team checkboxes
        (MenuItem::Teams, Char('j') | KeyCode::Down, _) => {
            guard.state.teams.cursor_down();
            None
        }
        (MenuItem::Teams, Char('k') | KeyCode::Up, _) => {
            guard.state.teams.cursor_up();
            None
        }
        (MenuItem::Teams, Char(' ') | KeyCode::Enter, _) => guard.toggle_team_at_cursor(),
        (MenuItem::Teams, Char('l'), _) => guard.select_cursor_league(),

        // Filter shortcuts work from either tab
        (MenuItem::Matches | MenuItem::Teams, Char('a'), _) => Some(guard.select_all_teams()),
        (MenuItem::Matches | MenuItem::Teams, Char('x'), _) => Some(guard.clear_teams()),

        // Global
        (_, Char('f'), _) => {
            guard.toggle_full_screen();
            None
        }
        (_, Char('"'), _) => {
            guard.toggle_show_logs();
            None
        }

        _ => None,
    };

    drop(guard);
    if let Some(ticket) = ticket {
        let _ = network_requests.send(NetworkRequest::RunQuery(ticket)).await;
    }
}
