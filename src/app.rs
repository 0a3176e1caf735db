use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::view::QueryTicket;
use jleague_api::query::Dataset;
use jleague_api::view::{MatchView, TeamDirectory};
use log::info;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Matches,
    Teams,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let app = Self::with_settings(AppSettings::load());

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self { settings, state: AppState::new() }
    }

    // -----------------------------------------------------------------------
    // Network response handlers: called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Install the dataset and select every team, which issues the first query.
    pub fn on_dataset_loaded(&mut self, dataset: Arc<Dataset>) -> QueryTicket {
        self.state.last_error = None;
        let directory = TeamDirectory::from_dataset(&dataset);
        info!(
            "{} matches, {} venues, {} teams",
            dataset.matches().len(),
            dataset.venues().len(),
            directory.len()
        );
        let everyone = directory.all();
        self.state.teams.load(directory);
        self.state.dataset = Some(dataset);
        self.state.matches.change_filter(everyone)
    }

    pub fn on_query_completed(&mut self, generation: u64, view: MatchView) {
        self.state.matches.apply(generation, view);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Team filter: every change goes through the view controller
    // -----------------------------------------------------------------------

    pub fn toggle_team_at_cursor(&mut self) -> Option<QueryTicket> {
        let name = self.state.teams.current()?.name.clone();
        let mut filter = self.state.matches.filter().clone();
        if !filter.remove(&name) {
            filter.insert(name);
        }
        Some(self.state.matches.change_filter(filter))
    }

    pub fn select_all_teams(&mut self) -> QueryTicket {
        let everyone = self.state.teams.directory.all();
        self.state.matches.change_filter(everyone)
    }

    pub fn clear_teams(&mut self) -> QueryTicket {
        self.state.matches.change_filter(BTreeSet::new())
    }

    /// Replace the selection with every team of the league under the cursor.
    pub fn select_cursor_league(&mut self) -> Option<QueryTicket> {
        let league = self.state.teams.current()?.league.clone();
        let teams = self.state.teams.directory.in_league(&league);
        Some(self.state.matches.change_filter(teams))
    }

    pub fn is_team_selected(&self, name: &str) -> bool {
        self.state.matches.filter().contains(name)
    }
}
