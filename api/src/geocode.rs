//! Batched geocoding of reconciled venue names.

use crate::VenueCoordinates;
use crate::client::{ApiError, ApiResult, JLeagueApi, MAX_TITLES_PER_QUERY};
use crate::reconcile::Reconciled;
use log::{debug, info};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeocodeOutcome {
    /// venue code → position
    pub coordinates: VenueCoordinates,
    /// venue code → queried name, for codes the API had no position for
    pub incomplete: BTreeMap<String, String>,
}

/// Split `names` into request-sized chunks, preserving order.
pub fn batches(names: &[String]) -> impl Iterator<Item = &[String]> {
    names.chunks(MAX_TITLES_PER_QUERY)
}

/// Geocode every reconciled venue, one request per chunk of 50 names, and
/// key the results by venue code.
pub async fn geocode_venues(api: &JLeagueApi, venues: &Reconciled) -> ApiResult<GeocodeOutcome> {
    let long_names = venues.long_names();
    let mut coordinates = VenueCoordinates::new();

    for (i, chunk) in batches(&long_names).enumerate() {
        debug!("geocoding batch {} ({} names)", i + 1, chunk.len());
        let fetched = api.fetch_coordinates(chunk).await?;
        coordinates.extend(key_by_code(venues, fetched)?);
    }

    let incomplete = incomplete_venues(venues, &coordinates);
    info!(
        "geocoded {} of {} venues, {} incomplete",
        coordinates.len(),
        venues.names.len(),
        incomplete.len()
    );
    Ok(GeocodeOutcome { coordinates, incomplete })
}

/// Re-key geocoding results from long name to venue code. A name that no
/// code carries means the request and the source data disagree.
pub fn key_by_code(
    venues: &Reconciled,
    fetched: BTreeMap<String, crate::Coordinate>,
) -> ApiResult<VenueCoordinates> {
    let mut out = VenueCoordinates::new();
    for (long_name, coordinate) in fetched {
        let mut codes = venues.codes_for(&long_name).peekable();
        if codes.peek().is_none() {
            return Err(ApiError::Integrity(format!(
                "geocoded name {long_name:?} does not belong to any venue code"
            )));
        }
        for code in codes {
            out.insert(code.to_owned(), coordinate);
        }
    }
    Ok(out)
}

pub fn incomplete_venues(venues: &Reconciled, coordinates: &VenueCoordinates) -> BTreeMap<String, String> {
    venues
        .names
        .iter()
        .filter(|(code, _)| !coordinates.contains_key(code.as_str()))
        .map(|(code, name)| (code.clone(), name.clone()))
        .collect()
}
