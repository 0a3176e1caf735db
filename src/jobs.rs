use crate::state::app_settings::AppSettings;
use jleague_api::client::JLeagueApi;
use jleague_api::geocode::geocode_venues;
use jleague_api::query::Dataset;
use jleague_api::reconcile::reconcile;
use jleague_api::snapshot::SnapshotDir;
use jleague_api::venues::assemble_venues;
use jleague_api::view::{TeamDirectory, build_view};
use jleague_api::{Match, VenueNames};
use log::{error, info};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

/// Pause between stadium searches; the data site has no published rate limit.
pub const STADIUM_SEARCH_INTERVAL: Duration = Duration::from_secs(1);

/// Batch commands log to stderr so stdout stays clean for exported data.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn fetch_matches(settings: &AppSettings) -> anyhow::Result<()> {
    let api = JLeagueApi::with_endpoints(settings.endpoints.clone());
    info!("fetching {} matches", settings.year);
    let matches = api.fetch_matches(&settings.year).await?;
    let path = settings.snapshots().write_matches(&settings.year, &matches)?;
    info!("wrote {} matches to {}", matches.len(), path.display());
    Ok(())
}

pub async fn fetch_venue_names(settings: &AppSettings) -> anyhow::Result<()> {
    let snapshots = settings.snapshots();
    let matches = snapshots.read_matches(&settings.year)?;
    let codes = distinct_venue_codes(&matches);
    info!("looking up {} venue codes", codes.len());

    let api = JLeagueApi::with_endpoints(settings.endpoints.clone());
    let names = lookup_venue_names(&api, &codes, STADIUM_SEARCH_INTERVAL).await?;

    let path = snapshots.write_venue_names(&names)?;
    info!("wrote {} venue names to {}", names.len(), path.display());
    Ok(())
}

/// Search each code in turn, pausing `interval` between requests. Replies
/// the search cannot interpret become empty names; transport errors abort.
pub async fn lookup_venue_names(
    api: &JLeagueApi,
    codes: &[String],
    interval: Duration,
) -> anyhow::Result<VenueNames> {
    let mut names = VenueNames::new();
    for (i, code) in codes.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(interval).await;
        }
        let entry = api.search_stadium(code).await?;
        if entry.resolved().is_none() {
            info!("{code}: no single stadium name ({entry:?})");
        }
        names.insert(code.clone(), entry);
    }
    Ok(names)
}

pub async fn fetch_coordinates(settings: &AppSettings) -> anyhow::Result<()> {
    let snapshots = settings.snapshots();
    let raw = snapshots.read_venue_names()?;
    let reconciled = reconcile(&raw);
    info!(
        "{} venues to geocode, {} dropped",
        reconciled.names.len(),
        reconciled.dropped.len()
    );

    let api = JLeagueApi::with_endpoints(settings.endpoints.clone());
    let outcome = geocode_venues(&api, &reconciled).await?;

    let path = snapshots.write_venue_coordinates(&outcome.coordinates)?;
    info!("wrote {} coordinates to {}", outcome.coordinates.len(), path.display());
    let path = snapshots.write_incomplete_venues(&outcome.incomplete)?;
    if !outcome.incomplete.is_empty() {
        error!(
            "{} venues have no coordinates, see {}",
            outcome.incomplete.len(),
            path.display()
        );
    }
    Ok(())
}

pub fn assemble(settings: &AppSettings) -> anyhow::Result<()> {
    let snapshots = settings.snapshots();
    let names = snapshots.read_venue_names()?;
    let coordinates = snapshots.read_venue_coordinates()?;
    let venues = assemble_venues(&names, &coordinates);
    let path = snapshots.write_venues(&venues)?;
    info!("wrote {} venues to {}", venues.len(), path.display());
    Ok(())
}

pub fn export_geojson(settings: &AppSettings, teams: &[String]) -> anyhow::Result<()> {
    let geojson = geojson_for(&settings.snapshots(), &settings.year, teams)?;
    println!("{}", serde_json::to_string_pretty(&geojson)?);
    Ok(())
}

pub fn load_dataset(snapshots: &SnapshotDir, year: &str) -> anyhow::Result<Dataset> {
    let matches = snapshots.read_matches(year)?;
    let venues = snapshots.read_venues()?;
    Ok(Dataset::new(matches, venues))
}

/// Marker collection for `teams`, or for every team when none are given.
pub fn geojson_for(snapshots: &SnapshotDir, year: &str, teams: &[String]) -> anyhow::Result<Value> {
    let dataset = load_dataset(snapshots, year)?;
    let selection: BTreeSet<String> = if teams.is_empty() {
        TeamDirectory::from_dataset(&dataset).all()
    } else {
        teams.iter().cloned().collect()
    };
    let view = build_view(&dataset, &selection);
    if !view.unmatched_venues.is_empty() {
        error!("matches at unknown venues were left out: {:?}", view.unmatched_venues);
    }
    Ok(view.to_geojson())
}

/// Venue codes in the order they first appear.
pub fn distinct_venue_codes(matches: &[Match]) -> Vec<String> {
    let mut seen = HashSet::new();
    matches
        .iter()
        .map(|m| m.venue.as_str())
        .filter(|code| !code.is_empty() && seen.insert(*code))
        .map(str::to_owned)
        .collect()
}
