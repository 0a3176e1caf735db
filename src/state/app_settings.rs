use jleague_api::client::Endpoints;
use jleague_api::snapshot::SnapshotDir;
use log::LevelFilter;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "public";
pub const DEFAULT_YEAR: &str = "2025";

/// Settings read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub data_dir: PathBuf,
    /// Competition year; selects `matches-{year}.json`.
    pub year: String,
    pub endpoints: Endpoints,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            year: DEFAULT_YEAR.to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            full_screen: false,
            log_level: get("JMATCH_LOG").and_then(|level| level.parse().ok()),
            data_dir: get("JMATCH_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            year: get("JMATCH_YEAR")
                .or_else(|| get("COMPETITION_YEARS"))
                .unwrap_or(defaults.year),
            endpoints: Endpoints {
                jleague: get("JMATCH_JLEAGUE_URL").unwrap_or(defaults.endpoints.jleague),
                wikipedia: get("JMATCH_WIKIPEDIA_URL").unwrap_or(defaults.endpoints.wikipedia),
            },
        }
    }

    pub fn snapshots(&self) -> SnapshotDir {
        SnapshotDir::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s.data_dir, PathBuf::from("public"));
        assert_eq!(s.year, "2025");
        assert_eq!(s.log_level, None);
        assert_eq!(s.endpoints, Endpoints::default());
    }

    #[test]
    fn year_falls_back_to_competition_years() {
        assert_eq!(settings(&[("COMPETITION_YEARS", "2024")]).year, "2024");
        assert_eq!(
            settings(&[("COMPETITION_YEARS", "2024"), ("JMATCH_YEAR", "2023")]).year,
            "2023"
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        let s = settings(&[("JMATCH_DATA_DIR", "  "), ("JMATCH_LOG", "debug")]);
        assert_eq!(s.data_dir, PathBuf::from("public"));
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn endpoints_can_be_overridden() {
        let s = settings(&[("JMATCH_WIKIPEDIA_URL", "http://localhost:8080")]);
        assert_eq!(s.endpoints.wikipedia, "http://localhost:8080");
        assert_eq!(s.endpoints.jleague, jleague_api::client::JLEAGUE_DATA);
    }
}
