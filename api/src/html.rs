//! League results search page → `Match` rows.

use crate::Match;
use scraper::{ElementRef, Html, Selector};

const ROW_SELECTOR: &str = ".search-table tbody tr";

/// Parse every result row of the search table. Cells are positional:
/// year, tournament, section, date, kickoff, home, score, away, venue,
/// attendance, broadcast. Missing trailing cells become empty strings.
pub fn parse_match_table(document: &str) -> Vec<Match> {
    let document = Html::parse_document(document);
    let (Ok(rows), Ok(cells)) = (Selector::parse(ROW_SELECTOR), Selector::parse("td")) else {
        return Vec::new();
    };

    document
        .select(&rows)
        .map(|row| {
            let text: Vec<String> = row.select(&cells).map(cell_text).collect();
            let cell = |i: usize| text.get(i).cloned().unwrap_or_default();
            Match {
                year: cell(0),
                tournament: cell(1),
                section: cell(2),
                date: cell(3),
                kickoff: cell(4),
                home: cell(5),
                score: cell(6),
                away: cell(7),
                venue: cell(8),
                attendance: cell(9),
                broadcast: cell(10),
            }
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}
