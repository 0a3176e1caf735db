//! Render-independent view model: the table rows and map features for a
//! team selection, plus the team directory that drives the selection.

use crate::query::{Dataset, MatchRow};
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Bucket for teams that never play in a league competition (cup-only sides).
pub const OTHER_LEAGUE: &str = "その他";

/// One map marker: a venue hosting at least one selected match.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueFeature {
    pub short_name: String,
    pub long_name: String,
    pub lat: f64,
    pub lon: f64,
    /// Indices into `MatchView::rows`, in table order.
    pub row_indices: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchView {
    pub rows: Vec<MatchRow>,
    pub features: Vec<VenueFeature>,
    pub unmatched_venues: BTreeSet<String>,
}

impl MatchView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the feature the given table row belongs to.
    pub fn feature_for_row(&self, row: usize) -> Option<usize> {
        let code = &self.rows.get(row)?.game.venue;
        self.features.iter().position(|f| &f.short_name == code)
    }

    pub fn feature_rows<'a>(&'a self, feature: &'a VenueFeature) -> impl Iterator<Item = &'a MatchRow> + 'a {
        feature.row_indices.iter().filter_map(|&i| self.rows.get(i))
    }

    /// GeoJSON FeatureCollection of the markers, each carrying its matches.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|feature| {
                let matches: Vec<Value> = self
                    .feature_rows(feature)
                    .map(|row| {
                        json!({
                            "date": row.game.date,
                            "kickoff": row.game.kickoff,
                            "tournaments": row.game.tournament,
                            "section": row.game.section,
                            "home": row.game.home,
                            "score": row.game.score,
                            "away": row.game.away,
                            "attendance": row.game.attendance,
                            "broadcast": row.game.broadcast,
                        })
                    })
                    .collect();
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [feature.lon, feature.lat] },
                    "properties": {
                        "shortName": feature.short_name,
                        "longName": feature.long_name,
                        "matchCount": feature.row_indices.len(),
                        "matches": matches,
                    },
                })
            })
            .collect();
        json!({ "type": "FeatureCollection", "features": features })
    }
}

/// Query the dataset for `teams` and group the result by venue.
pub fn build_view(dataset: &Dataset, teams: &BTreeSet<String>) -> MatchView {
    let result = dataset.query(teams);
    let features = group_by_venue(&result.rows);
    MatchView {
        rows: result.rows,
        features,
        unmatched_venues: result.unmatched_venues,
    }
}

/// One feature per distinct venue, ordered by the venue's first row.
pub fn group_by_venue(rows: &[MatchRow]) -> Vec<VenueFeature> {
    let mut features: Vec<VenueFeature> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        let slot = *index.entry(row.game.venue.as_str()).or_insert_with(|| {
            features.push(VenueFeature {
                short_name: row.game.venue.clone(),
                long_name: row.venue_long_name.clone(),
                lat: row.latitude,
                lon: row.longitude,
                row_indices: Vec::new(),
            });
            features.len() - 1
        });
        features[slot].row_indices.push(i);
    }
    features
}

// ---------------------------------------------------------------------------
// Team directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamEntry {
    pub name: String,
    pub league: String,
}

/// Every team of the season, sorted by name, tagged with its league.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamDirectory {
    pub teams: Vec<TeamEntry>,
}

impl TeamDirectory {
    /// Every name found in a home or away cell, blank included.
    ///
    /// A team's league is the first league competition (a tournament name
    /// ending in リーグ) it appears in.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut league_of: BTreeMap<String, Option<String>> = BTreeMap::new();
        for m in dataset.matches() {
            let league = m.tournament.ends_with("リーグ").then(|| m.tournament.clone());
            // Undecided fixtures have blank team cells; "" is kept as a team
            // of its own so that selecting everyone still matches them.
            for team in [&m.home, &m.away] {
                let slot = league_of.entry(team.clone()).or_default();
                if slot.is_none() {
                    *slot = league.clone();
                }
            }
        }
        let teams = league_of
            .into_iter()
            .map(|(name, league)| TeamEntry {
                name,
                league: league.unwrap_or_else(|| OTHER_LEAGUE.to_owned()),
            })
            .collect();
        Self { teams }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn all(&self) -> BTreeSet<String> {
        self.teams.iter().map(|t| t.name.clone()).collect()
    }

    /// League names in order, with the catch-all bucket last.
    pub fn leagues(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.teams.iter().map(|t| t.league.as_str()).collect();
        let (mut leagues, other): (Vec<&str>, Vec<&str>) =
            set.into_iter().partition(|league| *league != OTHER_LEAGUE);
        leagues.extend(other);
        leagues.into_iter().map(str::to_owned).collect()
    }

    pub fn in_league(&self, league: &str) -> BTreeSet<String> {
        self.teams
            .iter()
            .filter(|t| t.league == league)
            .map(|t| t.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::{dataset, game, teams, venue};

    #[test]
    fn empty_selection_has_no_rows_and_no_markers() {
        let view = build_view(&dataset(), &BTreeSet::new());
        assert!(view.is_empty());
        assert!(view.features.is_empty());
    }

    #[test]
    fn kashima_scenario_marks_only_venues_hosting_kashima() {
        let view = build_view(&dataset(), &teams(&["鹿島"]));
        assert!(view.rows.iter().all(|r| r.game.home == "鹿島" || r.game.away == "鹿島"));
        let codes: Vec<&str> = view.features.iter().map(|f| f.short_name.as_str()).collect();
        assert_eq!(codes, vec!["Ｕ等々力", "カシマ"]);
        assert!(view.features.iter().all(|f| !f.row_indices.is_empty()));
    }

    #[test]
    fn features_group_every_row_once() {
        let view = build_view(&dataset(), &TeamDirectory::from_dataset(&dataset()).all());
        let grouped: usize = view.features.iter().map(|f| f.row_indices.len()).sum();
        assert_eq!(grouped, view.rows.len());
        let saitama = view.features.iter().find(|f| f.short_name == "埼玉").unwrap();
        assert_eq!(saitama.row_indices.len(), 2);
    }

    #[test]
    fn row_maps_to_its_venue_feature() {
        let view = build_view(&dataset(), &teams(&["浦和"]));
        for (i, row) in view.rows.iter().enumerate() {
            let feature = &view.features[view.feature_for_row(i).unwrap()];
            assert_eq!(feature.short_name, row.game.venue);
            assert!(feature.row_indices.contains(&i));
        }
        assert_eq!(view.feature_for_row(view.rows.len()), None);
    }

    #[test]
    fn geojson_uses_lon_lat_points() {
        let mut home = game("03/08(土)", "13:00", "Ｇ大阪", "川崎Ｆ", "パナスタ");
        home.attendance = "26,102".into();
        home.broadcast = "ＤＡＺＮ".into();
        let data = Dataset::new(
            vec![home, game("02/22(土)", "15:00", "浦和", "Ｇ大阪", "埼玉")],
            vec![venue("パナスタ", 34.80, 135.53), venue("埼玉", 35.90, 139.72)],
        );
        let view = build_view(&data, &teams(&["Ｇ大阪"]));
        let geojson = view.to_geojson();
        assert_eq!(geojson["type"], "FeatureCollection");
        let pana = geojson["features"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["properties"]["shortName"] == "パナスタ")
            .unwrap();
        assert_eq!(pana["geometry"]["coordinates"][0], 135.53);
        assert_eq!(pana["geometry"]["coordinates"][1], 34.80);
        assert_eq!(pana["properties"]["matchCount"], 1);
        assert_eq!(pana["properties"]["matches"][0]["home"], "Ｇ大阪");
        assert_eq!(pana["properties"]["matches"][0]["attendance"], "26,102");
        assert_eq!(pana["properties"]["matches"][0]["broadcast"], "ＤＡＺＮ");
    }

    #[test]
    fn selecting_every_team_keeps_undecided_fixtures() {
        let data = Dataset::new(
            vec![
                game("03/01(土)", "14:00", "鹿島", "浦和", "カシマ"),
                game("12/06(土)", "14:00", "", "", "カシマ"),
            ],
            vec![venue("カシマ", 35.99, 140.64)],
        );
        let directory = TeamDirectory::from_dataset(&data);
        let view = build_view(&data, &directory.all());

        assert_eq!(view.rows.len(), data.query_all().rows.len());
        assert_eq!(view.rows.len(), 2);
        assert!(directory.all().contains(""));
        assert_eq!(directory.in_league("Ｊ１リーグ").len(), 3);
    }

    #[test]
    fn directory_assigns_leagues_and_other_bucket() {
        let mut cup = game("06/11(水)", "19:00", "鹿島", "アマチュア", "カシマ");
        cup.tournament = "天皇杯".into();
        let mut j2 = game("02/15(土)", "14:00", "仙台", "山形", "ユアスタ");
        j2.tournament = "Ｊ２リーグ".into();
        let data = Dataset::new(
            vec![cup, game("02/22(土)", "14:00", "鹿島", "浦和", "カシマ"), j2],
            vec![venue("カシマ", 35.99, 140.64)],
        );
        let directory = TeamDirectory::from_dataset(&data);

        assert_eq!(directory.len(), 5);
        assert_eq!(directory.in_league("Ｊ１リーグ"), teams(&["浦和", "鹿島"]));
        assert_eq!(directory.in_league("Ｊ２リーグ"), teams(&["仙台", "山形"]));
        assert_eq!(directory.in_league(OTHER_LEAGUE), teams(&["アマチュア"]));
        assert_eq!(directory.leagues(), vec!["Ｊ１リーグ", "Ｊ２リーグ", OTHER_LEAGUE]);
    }
}
