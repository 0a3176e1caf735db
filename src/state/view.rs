use jleague_api::view::{MatchView, VenueFeature};
use log::debug;
use std::collections::BTreeSet;

/// A query tagged with the filter generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: u64,
    pub teams: BTreeSet<String>,
}

/// Owns the current team filter and everything rendered from it: the table
/// rows, the marker layer, the table cursor and the open popup.
///
/// Every filter change bumps the generation. Results come back tagged with
/// the generation that asked for them; anything older than the latest change
/// is dropped, so a slow query can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct ViewController {
    filter: BTreeSet<String>,
    generation: u64,
    applied: u64,
    view: MatchView,
    cursor: usize,
    selected_feature: Option<usize>,
    popup_open: bool,
}

impl ViewController {
    pub fn filter(&self) -> &BTreeSet<String> {
        &self.filter
    }

    pub fn view(&self) -> &MatchView {
        &self.view
    }

    /// True while the latest filter change has no result on screen yet.
    pub fn is_pending(&self) -> bool {
        self.applied != self.generation
    }

    pub fn change_filter(&mut self, teams: BTreeSet<String>) -> QueryTicket {
        self.generation += 1;
        self.filter = teams;
        debug!(
            "filter changed (generation {}, {} teams)",
            self.generation,
            self.filter.len()
        );
        QueryTicket {
            generation: self.generation,
            teams: self.filter.clone(),
        }
    }

    /// Install a query result. The previous rows and marker layer are
    /// replaced wholesale. Returns false when the result is stale.
    pub fn apply(&mut self, generation: u64, view: MatchView) -> bool {
        if generation != self.generation {
            debug!(
                "discarding stale result (generation {generation}, latest {})",
                self.generation
            );
            return false;
        }
        self.applied = generation;
        self.view = view;
        self.cursor = 0;
        self.selected_feature = None;
        self.popup_open = false;
        true
    }

    // -----------------------------------------------------------------------
    // Table cursor
    // -----------------------------------------------------------------------

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_down(&mut self) {
        let max = self.view.rows.len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(max);
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_page(&mut self, forward: bool, page: usize) {
        if forward {
            let max = self.view.rows.len().saturating_sub(1);
            self.cursor = (self.cursor + page).min(max);
        } else {
            self.cursor = self.cursor.saturating_sub(page);
        }
    }

    // -----------------------------------------------------------------------
    // Table → map highlight (one way)
    // -----------------------------------------------------------------------

    /// Select the marker of the row under the cursor and open its popup,
    /// closing whichever popup was open before.
    pub fn activate_row(&mut self) -> Option<&VenueFeature> {
        let feature = self.view.feature_for_row(self.cursor)?;
        self.selected_feature = Some(feature);
        self.popup_open = true;
        self.view.features.get(feature)
    }

    pub fn close_popup(&mut self) {
        self.popup_open = false;
    }

    pub fn selected_feature(&self) -> Option<&VenueFeature> {
        self.view.features.get(self.selected_feature?)
    }

    pub fn selected_feature_index(&self) -> Option<usize> {
        self.selected_feature
    }

    pub fn popup(&self) -> Option<&VenueFeature> {
        if self.popup_open {
            self.selected_feature()
        } else {
            None
        }
    }
}
