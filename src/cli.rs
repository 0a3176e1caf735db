/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Viewer,
    Help,
    Version,
    FetchMatches,
    FetchVenueNames,
    FetchCoordinates,
    AssembleVenues,
    /// Teams to include; empty means every team.
    ExportGeoJson { teams: Vec<String> },
}

impl Command {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut args = args.into_iter();
        let Some(arg) = args.next() else {
            return Ok(Command::Viewer);
        };

        let command = match arg.as_str() {
            "-h" | "--help" => Command::Help,
            "-V" | "--version" => Command::Version,
            "fetch-matches" => Command::FetchMatches,
            "fetch-venue-names" => Command::FetchVenueNames,
            "fetch-coordinates" => Command::FetchCoordinates,
            "assemble-venues" => Command::AssembleVenues,
            "export-geojson" => {
                return Ok(Command::ExportGeoJson { teams: args.collect() });
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        };

        match args.next() {
            Some(extra) => Err(format!("Unexpected argument: {extra}")),
            None => Ok(command),
        }
    }
}

pub fn usage_text() -> &'static str {
    "jmatch - J.League fixtures on a terminal map

Usage:
  jmatch                         browse matches and venues
  jmatch fetch-matches           scrape the season's match list
  jmatch fetch-venue-names       look up the full name of every venue code
  jmatch fetch-coordinates       geocode the venue names
  jmatch assemble-venues         join names and coordinates into venues.json
  jmatch export-geojson [TEAM..] print venue markers as GeoJSON
  jmatch --help
  jmatch --version

Environment:
  JMATCH_DATA_DIR        Snapshot directory (default public)
  JMATCH_YEAR            Competition year (default 2025, falls back to COMPETITION_YEARS)
  JMATCH_LOG             Viewer log level (error, warn, info, debug, trace)
  JMATCH_JLEAGUE_URL     Override the J.League data site base URL
  JMATCH_WIKIPEDIA_URL   Override the Wikipedia base URL
  RUST_LOG               Log filter for the fetch commands (default info)"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        Command::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_launches_the_viewer() {
        assert_eq!(parse(&[]), Ok(Command::Viewer));
    }

    #[test]
    fn batch_commands() {
        assert_eq!(parse(&["fetch-matches"]), Ok(Command::FetchMatches));
        assert_eq!(parse(&["fetch-venue-names"]), Ok(Command::FetchVenueNames));
        assert_eq!(parse(&["fetch-coordinates"]), Ok(Command::FetchCoordinates));
        assert_eq!(parse(&["assemble-venues"]), Ok(Command::AssembleVenues));
        assert_eq!(parse(&["-V"]), Ok(Command::Version));
        assert_eq!(parse(&["--help"]), Ok(Command::Help));
    }

    #[test]
    fn export_takes_team_names() {
        assert_eq!(
            parse(&["export-geojson", "鹿島", "浦和"]),
            Ok(Command::ExportGeoJson { teams: vec!["鹿島".into(), "浦和".into()] })
        );
        assert_eq!(parse(&["export-geojson"]), Ok(Command::ExportGeoJson { teams: vec![] }));
    }

    #[test]
    fn rejects_unknown_and_trailing_arguments() {
        assert!(parse(&["serve"]).is_err());
        assert!(parse(&["fetch-matches", "2024"]).is_err());
    }
}
