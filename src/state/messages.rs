use crate::state::network::LoadingState;
use crate::state::view::QueryTicket;
use crossterm::event::KeyEvent;
use jleague_api::query::Dataset;
use jleague_api::view::MatchView;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadDataset,
    RunQuery(QueryTicket),
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    DatasetLoaded { dataset: Arc<Dataset> },
    /// Result of a filter change, tagged with the generation that asked for it.
    QueryCompleted { generation: u64, view: MatchView },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
