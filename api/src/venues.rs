use crate::reconcile::correction_for;
use crate::{Venue, VenueCoordinates, VenueNames};
use log::warn;
use std::collections::HashSet;

/// Join the venue-name and coordinate snapshots into venue records, sorted by
/// venue code. Only geocoded codes produce a venue.
pub fn assemble_venues(names: &VenueNames, coordinates: &VenueCoordinates) -> Vec<Venue> {
    coordinates
        .iter()
        .map(|(code, coordinate)| {
            let long_name = correction_for(code)
                .map(str::to_owned)
                .or_else(|| {
                    names
                        .get(code)
                        .and_then(|entry| entry.resolved())
                        .map(str::to_owned)
                })
                .unwrap_or_else(|| {
                    warn!("no venue name for {code}, using the code as its name");
                    code.clone()
                });
            Venue {
                short_name: code.clone(),
                long_name,
                lat: coordinate.lat,
                lon: coordinate.lon,
            }
        })
        .collect()
}

/// Keep the first venue for each short name. Duplicates only appear in
/// hand-edited snapshots; each one is logged.
pub fn dedup_by_short_name(venues: Vec<Venue>) -> Vec<Venue> {
    let mut seen = HashSet::new();
    venues
        .into_iter()
        .filter(|venue| {
            let fresh = seen.insert(venue.short_name.clone());
            if !fresh {
                warn!("duplicate venue {} ignored", venue.short_name);
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, VenueNameEntry};

    fn names() -> VenueNames {
        VenueNames::from([
            ("味スタ".to_string(), VenueNameEntry::Single("味の素スタジアム".into())),
            ("埼玉".to_string(), VenueNameEntry::Single("埼玉スタジアム２００２".into())),
            ("国立".to_string(), VenueNameEntry::Candidates(vec!["国立競技場".into(), "西が丘".into()])),
        ])
    }

    fn coordinates() -> VenueCoordinates {
        VenueCoordinates::from([
            ("味スタ".to_string(), Coordinate { lat: 35.66, lon: 139.53 }),
            ("埼玉".to_string(), Coordinate { lat: 35.90, lon: 139.72 }),
            ("国立".to_string(), Coordinate { lat: 35.67, lon: 139.71 }),
        ])
    }

    #[test]
    fn assembles_one_venue_per_coordinate() {
        let venues = assemble_venues(&names(), &coordinates());
        assert_eq!(venues.len(), 3);
        let ajista = venues.iter().find(|v| v.short_name == "味スタ").unwrap();
        assert_eq!(ajista.long_name, "味の素スタジアム");
        assert_eq!(ajista.lat, 35.66);
    }

    #[test]
    fn corrected_names_win_over_scraped_names() {
        let venues = assemble_venues(&names(), &coordinates());
        let saitama = venues.iter().find(|v| v.short_name == "埼玉").unwrap();
        assert_eq!(saitama.long_name, "埼玉スタジアム2002");
    }

    #[test]
    fn unresolved_names_fall_back_to_the_code() {
        let venues = assemble_venues(&names(), &coordinates());
        let kokuritsu = venues.iter().find(|v| v.short_name == "国立").unwrap();
        assert_eq!(kokuritsu.long_name, "国立");
    }

    #[test]
    fn short_names_are_unique() {
        let venues = assemble_venues(&names(), &coordinates());
        let unique: HashSet<&str> = venues.iter().map(|v| v.short_name.as_str()).collect();
        assert_eq!(unique.len(), venues.len());
    }

    #[test]
    fn dedup_keeps_the_first_record() {
        let venue = |name: &str, lat: f64| Venue {
            short_name: "埼玉".into(),
            long_name: name.into(),
            lat,
            lon: 139.7,
        };
        let out = dedup_by_short_name(vec![venue("first", 1.0), venue("second", 2.0)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].long_name, "first");
    }
}
