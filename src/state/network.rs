use crate::state::messages::{NetworkRequest, NetworkResponse};
use crate::state::view::QueryTicket;
use jleague_api::client::{ApiError, ApiResult};
use jleague_api::query::Dataset;
use jleague_api::snapshot::SnapshotDir;
use jleague_api::view::build_view;
use log::{debug, error, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Loads the snapshots and answers filter queries off the UI task.
pub struct NetworkWorker {
    snapshots: SnapshotDir,
    year: String,
    dataset: Option<Arc<Dataset>>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        snapshots: SnapshotDir,
        year: String,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            snapshots,
            year,
            dataset: None,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let response = match request {
                NetworkRequest::LoadDataset => {
                    self.start_loading_animation().await;
                    let result = self.handle_load_dataset().await;
                    self.stop_loading_animation(result.is_ok()).await;
                    result.unwrap_or_else(|err| NetworkResponse::Error { message: err.to_string() })
                }
                NetworkRequest::RunQuery(ticket) => {
                    // Queries run concurrently and may finish out of order.
                    match self.dataset.clone() {
                        Some(dataset) => {
                            tokio::spawn(run_query(dataset, ticket, self.responses.clone()));
                            continue;
                        }
                        None => NetworkResponse::Error {
                            message: "match data is not loaded yet".into(),
                        },
                    }
                }
            };

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_dataset(&mut self) -> ApiResult<NetworkResponse> {
        debug!("loading snapshots from {}", self.snapshots.path("").display());
        let snapshots = self.snapshots.clone();
        let year = self.year.clone();
        let dataset = tokio::task::spawn_blocking(move || -> ApiResult<Dataset> {
            let matches = snapshots.read_matches(&year)?;
            let venues = snapshots.read_venues()?;
            Ok(Dataset::new(matches, venues))
        })
        .await
        .map_err(|e| ApiError::Other(format!("snapshot loader stopped: {e}")))??;

        debug!(
            "loaded {} matches and {} venues",
            dataset.matches().len(),
            dataset.venues().len()
        );
        let dataset = Arc::new(dataset);
        self.dataset = Some(dataset.clone());
        Ok(NetworkResponse::DatasetLoaded { dataset })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

async fn run_query(dataset: Arc<Dataset>, ticket: QueryTicket, responses: mpsc::Sender<NetworkResponse>) {
    let generation = ticket.generation;
    let response = match tokio::task::spawn_blocking(move || build_view(&dataset, &ticket.teams)).await {
        Ok(view) => {
            debug!(
                "query {generation}: {} rows at {} venues",
                view.rows.len(),
                view.features.len()
            );
            if !view.unmatched_venues.is_empty() {
                warn!("matches at unknown venues left out: {:?}", view.unmatched_venues);
            }
            NetworkResponse::QueryCompleted { generation, view }
        }
        Err(e) => NetworkResponse::Error { message: format!("query {generation} failed: {e}") },
    };
    if let Err(e) = responses.send(response).await {
        error!("Failed to send query result: {e}");
    }
}
