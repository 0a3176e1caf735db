//! Matches joined to venues, filtered by team and put in chronological order.

use crate::venues::dedup_by_short_name;
use crate::{Match, Venue};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// The two snapshot tables, loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    matches: Vec<Match>,
    venues: Vec<Venue>,
    by_code: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(matches: Vec<Match>, venues: Vec<Venue>) -> Self {
        let venues = dedup_by_short_name(venues);
        let by_code = venues
            .iter()
            .enumerate()
            .map(|(i, v)| (v.short_name.clone(), i))
            .collect();
        Self { matches, venues, by_code }
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn venue(&self, code: &str) -> Option<&Venue> {
        self.by_code.get(code).map(|&i| &self.venues[i])
    }

    /// Every match that has a venue record, in chronological order.
    pub fn query_all(&self) -> QueryResult {
        self.join(|_| true)
    }

    /// Matches where home or away is one of `teams`. An empty selection
    /// returns nothing without touching the tables.
    pub fn query(&self, teams: &BTreeSet<String>) -> QueryResult {
        if teams.is_empty() {
            return QueryResult::default();
        }
        self.join(|m| teams.contains(&m.home) || teams.contains(&m.away))
    }

    fn join(&self, keep: impl Fn(&Match) -> bool) -> QueryResult {
        let mut unmatched_venues = BTreeSet::new();
        let mut rows: Vec<MatchRow> = self
            .matches
            .iter()
            .filter(|m| keep(m))
            .filter_map(|m| match self.venue(&m.venue) {
                Some(venue) => Some(MatchRow::new(m, venue)),
                None => {
                    unmatched_venues.insert(m.venue.clone());
                    None
                }
            })
            .collect();
        rows.sort_by(chronological);
        QueryResult { rows, unmatched_venues }
    }
}

/// One joined row: match fields plus the venue it was played at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRow {
    pub game: Match,
    pub match_date: Option<NaiveDate>,
    pub venue_long_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl MatchRow {
    fn new(game: &Match, venue: &Venue) -> Self {
        Self {
            match_date: game.match_date(),
            game: game.clone(),
            venue_long_name: venue.long_name.clone(),
            latitude: venue.lat,
            longitude: venue.lon,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub rows: Vec<MatchRow>,
    /// Venue codes of matching games that have no venue record. Those games
    /// are left out of `rows`.
    pub unmatched_venues: BTreeSet<String>,
}

/// Date ascending (undated games last), then kickoff, tournament, section.
/// Callers sort stably so equal keys keep snapshot order.
pub fn chronological(a: &MatchRow, b: &MatchRow) -> Ordering {
    let date = match (a.match_date, b.match_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    date.then_with(|| a.game.kickoff.cmp(&b.game.kickoff))
        .then_with(|| a.game.tournament.cmp(&b.game.tournament))
        .then_with(|| a.game.section.cmp(&b.game.section))
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn empty_selection_yields_nothing() {
        let result = dataset().query(&BTreeSet::new());
        assert!(result.rows.is_empty());
        assert!(result.unmatched_venues.is_empty());
    }

    #[test]
    fn full_selection_matches_unfiltered_count() {
        let data = dataset();
        let all_teams: BTreeSet<String> = data
            .matches()
            .iter()
            .flat_map(|m| [m.home.clone(), m.away.clone()])
            .collect();
        assert_eq!(data.query(&all_teams).rows.len(), data.query_all().rows.len());
    }

    #[test]
    fn filter_keeps_home_or_away_matches() {
        let result = dataset().query(&teams(&["鹿島"]));
        assert_eq!(result.rows.len(), 2);
        assert!(result.rows.iter().all(|r| r.game.involves("鹿島")));
    }

    #[test]
    fn rows_are_ordered_by_date_then_kickoff() {
        let result = dataset().query_all();
        let order: Vec<(&str, &str)> = result
            .rows
            .iter()
            .map(|r| (r.game.date.as_str(), r.game.kickoff.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("02/22(土)", "14:00"),
                ("02/22(土)", "15:00"),
                ("03/01(土)", "14:00"),
                ("03/08(土)", "13:00"),
                ("03/15(土)", "13:00"),
            ]
        );
    }

    #[test]
    fn tournament_and_section_break_remaining_ties() {
        let mut second_division = game("02/22(土)", "14:00", "Ａ", "Ｂ", "埼玉");
        second_division.tournament = "Ｊ２リーグ".into();
        let mut later_section = game("02/22(土)", "14:00", "Ｃ", "Ｄ", "埼玉");
        later_section.section = "第２節第１日".into();
        let first = game("02/22(土)", "14:00", "Ｅ", "Ｆ", "埼玉");
        let data = Dataset::new(
            vec![second_division, later_section, first],
            vec![venue("埼玉", 35.9, 139.7)],
        );
        let homes: Vec<String> = data.query_all().rows.into_iter().map(|r| r.game.home).collect();
        assert_eq!(homes, vec!["Ｅ", "Ｃ", "Ａ"]);
    }

    #[test]
    fn equal_keys_keep_snapshot_order_across_runs() {
        let data = Dataset::new(
            vec![
                game("02/22(土)", "14:00", "一", "二", "埼玉"),
                game("02/22(土)", "14:00", "三", "四", "埼玉"),
                game("02/22(土)", "14:00", "五", "六", "埼玉"),
            ],
            vec![venue("埼玉", 35.9, 139.7)],
        );
        for _ in 0..3 {
            let homes: Vec<String> = data.query_all().rows.into_iter().map(|r| r.game.home).collect();
            assert_eq!(homes, vec!["一", "三", "五"]);
        }
    }

    #[test]
    fn undated_games_sort_last() {
        let data = Dataset::new(
            vec![
                game("未定", "", "鹿島", "川崎Ｆ", "カシマ"),
                game("02/22(土)", "14:00", "鹿島", "浦和", "カシマ"),
            ],
            vec![venue("カシマ", 35.99, 140.64)],
        );
        let rows = data.query_all().rows;
        assert_eq!(rows[0].game.date, "02/22(土)");
        assert_eq!(rows[1].match_date, None);
    }

    #[test]
    fn games_without_venue_record_are_reported() {
        let result = dataset().query(&teams(&["鹿島"]));
        assert!(result.rows.iter().all(|r| r.game.venue != "●未定●"));
        assert_eq!(result.unmatched_venues, teams(&["●未定●"]));
    }

    #[test]
    fn joined_rows_carry_venue_fields() {
        let result = dataset().query(&teams(&["Ｇ大阪"]));
        let pana = result.rows.iter().find(|r| r.game.venue == "パナスタ").unwrap();
        assert_eq!(pana.venue_long_name, "パナスタ stadium");
        assert_eq!(pana.latitude, 34.80);
        assert_eq!(pana.longitude, 135.53);
    }
}
