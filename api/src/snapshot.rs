//! Flat JSON snapshot files shared by the batch jobs and the viewer.

use crate::client::{ApiError, ApiResult};
use crate::{Coordinate, Match, Venue, VenueCoordinates, VenueNames};
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const VENUE_NAMES_FILE: &str = "venue-names.json";
pub const VENUE_COORDINATES_FILE: &str = "venue-coordinates.json";
pub const VENUE_INCOMPLETE_FILE: &str = "venue-incomplete-coordinates.json";
pub const VENUES_FILE: &str = "venues.json";

pub fn matches_file(year: &str) -> String {
    format!("matches-{year}.json")
}

/// A data directory holding every snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDir {
    root: PathBuf,
}

impl SnapshotDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn read_matches(&self, year: &str) -> ApiResult<Vec<Match>> {
        read_json(&self.path(&matches_file(year)))
    }

    pub fn write_matches(&self, year: &str, matches: &[Match]) -> ApiResult<PathBuf> {
        write_json(&self.path(&matches_file(year)), &matches)
    }

    pub fn read_venue_names(&self) -> ApiResult<VenueNames> {
        read_json(&self.path(VENUE_NAMES_FILE))
    }

    pub fn write_venue_names(&self, names: &VenueNames) -> ApiResult<PathBuf> {
        write_json(&self.path(VENUE_NAMES_FILE), names)
    }

    /// Entries written as `{}` carry no position and are skipped.
    pub fn read_venue_coordinates(&self) -> ApiResult<VenueCoordinates> {
        let raw: BTreeMap<String, MaybeCoordinate> = read_json(&self.path(VENUE_COORDINATES_FILE))?;
        Ok(raw
            .into_iter()
            .filter_map(|(code, c)| Some((code, Coordinate { lat: c.lat?, lon: c.lon? })))
            .collect())
    }

    pub fn write_venue_coordinates(&self, coordinates: &VenueCoordinates) -> ApiResult<PathBuf> {
        write_json(&self.path(VENUE_COORDINATES_FILE), coordinates)
    }

    pub fn write_incomplete_venues(&self, incomplete: &BTreeMap<String, String>) -> ApiResult<PathBuf> {
        write_json(&self.path(VENUE_INCOMPLETE_FILE), incomplete)
    }

    pub fn read_venues(&self) -> ApiResult<Vec<Venue>> {
        read_json(&self.path(VENUES_FILE))
    }

    pub fn write_venues(&self, venues: &[Venue]) -> ApiResult<PathBuf> {
        write_json(&self.path(VENUES_FILE), &venues)
    }
}

#[derive(serde::Deserialize)]
struct MaybeCoordinate {
    lat: Option<f64>,
    lon: Option<f64>,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> ApiResult<T> {
    debug!("read from: {}", path.display());
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApiError::Io(e, path.display().to_string()))?;
    serde_json::from_str(&content).map_err(|e| ApiError::Json(e, path.display().to_string()))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ApiResult<PathBuf> {
    debug!("write to: {}", path.display());
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ApiError::Io(e, parent.display().to_string()))?;
    }
    let payload =
        serde_json::to_string_pretty(value).map_err(|e| ApiError::Json(e, path.display().to_string()))?;
    std::fs::write(path, payload).map_err(|e| ApiError::Io(e, path.display().to_string()))?;
    Ok(path.to_path_buf())
}
