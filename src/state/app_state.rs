use crate::app::MenuItem;
use crate::state::view::ViewController;
use jleague_api::query::Dataset;
use jleague_api::view::{TeamDirectory, TeamEntry};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Team selection panel
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TeamPanel {
    pub directory: TeamDirectory,
    pub cursor: usize,
}

impl TeamPanel {
    pub fn load(&mut self, directory: TeamDirectory) {
        self.directory = directory;
        self.cursor = 0;
    }

    pub fn current(&self) -> Option<&TeamEntry> {
        self.directory.teams.get(self.cursor)
    }

    pub fn cursor_down(&mut self) {
        let max = self.directory.len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(max);
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Top-level state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub dataset: Option<Arc<Dataset>>,
    pub teams: TeamPanel,
    pub matches: ViewController,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
