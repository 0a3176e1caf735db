//! Raw wire types for the remote endpoints: serde shapes only.
//! Mapping into domain types happens in client.rs and geocode.rs.
use serde::Deserialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Wikipedia query API  (action=query&prop=coordinates&redirects=1)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: Option<QueryBody>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct QueryBody {
    /// Titles the API rewrote before lookup (full-width spaces, casing, ...).
    #[serde(default)]
    pub normalized: Vec<TitleHop>,
    /// Titles that were followed through a redirect page.
    #[serde(default)]
    pub redirects: Vec<TitleHop>,
    /// Keyed by page id; missing pages carry negative ids.
    #[serde(default)]
    pub pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct TitleHop {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Page {
    #[serde(default)]
    pub title: String,
    pub coordinates: Option<Vec<PageCoordinate>>,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct PageCoordinate {
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// J.League stadium search  (SFCM02/search)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StadiumHit {
    #[serde(default)]
    pub name: String,
}
