pub mod client;
pub mod geocode;
pub mod html;
pub mod query;
pub mod reconcile;
pub mod snapshot;
pub mod venues;
pub mod view;
pub mod wire;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Domain types: the snapshot formats written by the batch jobs
// ---------------------------------------------------------------------------

/// One row of the league results search, exactly as scraped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub year: String,
    #[serde(rename = "tournaments")]
    pub tournament: String,
    pub section: String,
    pub date: String, // "02/14(金)"
    pub kickoff: String,
    pub home: String,
    pub score: String,
    pub away: String,
    pub venue: String, // venue code, joins Venue::short_name
    pub attendance: String,
    pub broadcast: String,
}

impl Match {
    /// Sortable date derived from `year` and the `MM/DD` prefix of `date`.
    pub fn match_date(&self) -> Option<NaiveDate> {
        let year = self.year.trim().parse::<i32>().ok()?;
        let md: String = self.date.trim().chars().take(5).collect();
        let (month, day) = md.split_once('/')?;
        NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub short_name: String,
    pub long_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Venue {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate { lat: self.lat, lon: self.lon }
    }
}

/// Result of a stadium-name search for one venue code.
///
/// A search that matched several stadiums keeps every candidate so the
/// snapshot can be corrected by hand. A failed search is an empty `Single`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VenueNameEntry {
    Single(String),
    Candidates(Vec<String>),
}

impl VenueNameEntry {
    /// The name usable as-is, if the entry holds exactly one non-empty name.
    pub fn resolved(&self) -> Option<&str> {
        match self {
            VenueNameEntry::Single(name) if !name.trim().is_empty() => Some(name.as_str()),
            VenueNameEntry::Candidates(names) if names.len() == 1 => Some(names[0].as_str()),
            _ => None,
        }
    }
}

impl Default for VenueNameEntry {
    fn default() -> Self {
        VenueNameEntry::Single(String::new())
    }
}

/// venue code → stadium search result
pub type VenueNames = BTreeMap<String, VenueNameEntry>;

/// venue code → geocoded position
pub type VenueCoordinates = BTreeMap<String, Coordinate>;

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(year: &str, date: &str) -> Match {
        Match { year: year.into(), date: date.into(), ..Default::default() }
    }

    #[test]
    fn match_date_reads_month_and_day_prefix() {
        let m = fixture("2025", "02/14(金)");
        assert_eq!(m.match_date(), NaiveDate::from_ymd_opt(2025, 2, 14));
    }

    #[test]
    fn match_date_is_none_for_undecided_dates() {
        assert_eq!(fixture("2025", "未定").match_date(), None);
        assert_eq!(fixture("", "02/14(金)").match_date(), None);
        assert_eq!(fixture("2025", "02/30(日)").match_date(), None);
    }

    #[test]
    fn venue_name_entry_round_trips_both_shapes() {
        let names: VenueNames =
            serde_json::from_str(r#"{"カシマ":"県立カシマサッカースタジアム","国立":["国立競技場","国立西が丘"]}"#)
                .unwrap();
        assert_eq!(names["カシマ"].resolved(), Some("県立カシマサッカースタジアム"));
        assert_eq!(names["国立"].resolved(), None);
    }

    #[test]
    fn empty_name_is_not_resolved() {
        assert_eq!(VenueNameEntry::default().resolved(), None);
    }

    #[test]
    fn match_serializes_tournament_under_snapshot_key() {
        let m = Match { tournament: "Ｊ１リーグ".into(), ..Default::default() };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["tournaments"], "Ｊ１リーグ");
    }
}
