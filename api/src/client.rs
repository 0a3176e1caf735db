use crate::html::parse_match_table;
use crate::wire::{Page, QueryBody, QueryResponse, StadiumHit, TitleHop};
use crate::{Coordinate, Match, VenueNameEntry};
use log::{debug, error, warn};
use reqwest::{Client, RequestBuilder};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const JLEAGUE_DATA: &str = "https://data.j-league.or.jp";
pub const WIKIPEDIA_JA: &str = "https://ja.wikipedia.org";

/// The query API rejects more titles than this in one request.
pub const MAX_TITLES_PER_QUERY: usize = 50;

/// Base URLs of the remote collaborators. Overridable for tests and mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub jleague: String,
    pub wikipedia: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            jleague: JLEAGUE_DATA.to_owned(),
            wikipedia: WIKIPEDIA_JA.to_owned(),
        }
    }
}

/// Client for the J.League data site and the Japanese Wikipedia query API.
#[derive(Debug, Clone)]
pub struct JLeagueApi {
    client: Client,
    endpoints: Endpoints,
    timeout: Duration,
}

impl Default for JLeagueApi {
    fn default() -> Self {
        Self::with_endpoints(Endpoints::default())
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// More titles than the geocoding API accepts in one call.
    TooManyTitles { count: usize, max: usize },
    /// A geocoded name could not be traced back to the venue code it came from.
    Integrity(String),
    Io(std::io::Error, String),
    Json(serde_json::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::TooManyTitles { count, max } => {
                write!(f, "too many names: {count} given, max is {max}")
            }
            ApiError::Integrity(msg) => write!(f, "Integrity error: {msg}"),
            ApiError::Io(e, path) => write!(f, "I/O error for {path}: {e}"),
            ApiError::Json(e, path) => write!(f, "Invalid JSON in {path}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl JLeagueApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        Self {
            client: Client::builder()
                .user_agent("jmatch/0.1 (match map viewer)")
                .build()
                .unwrap_or_default(),
            endpoints,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Scrape every match of one season from the league results search.
    pub async fn fetch_matches(&self, year: &str) -> ApiResult<Vec<Match>> {
        let url = format!("{}/SFMS01/search", self.endpoints.jleague);
        debug!("get from: {url}?competition_years={year}");
        let request = self.client.get(&url).query(&[("competition_years", year)]);
        let body = self.send_text(request, &url).await?;
        let matches = parse_match_table(&body);
        debug!("rows.length is: {}", matches.len());
        Ok(matches)
    }

    /// Look up the official stadium name for an abbreviated venue code.
    ///
    /// The endpoint answers with a JSON array of hits. One hit resolves the
    /// name, several are kept as candidates. Any other answer is logged and
    /// recorded as an empty name rather than aborting the batch.
    pub async fn search_stadium(&self, code: &str) -> ApiResult<VenueNameEntry> {
        let url = format!("{}/SFCM02/search", self.endpoints.jleague);
        debug!("post to: {url}, with body: stadium_name={code}");
        let request = self
            .client
            .post(&url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .form(&[("stadium_name", code)]);
        let body = self.send_text(request, &url).await?;
        Ok(stadium_entry_from_body(code, &body))
    }

    /// Geocode up to [`MAX_TITLES_PER_QUERY`] article titles in one request.
    ///
    /// Keys of the returned map are the names exactly as queried, even when
    /// the API normalized the title or followed a redirect.
    pub async fn fetch_coordinates(&self, names: &[String]) -> ApiResult<BTreeMap<String, Coordinate>> {
        if names.len() > MAX_TITLES_PER_QUERY {
            return Err(ApiError::TooManyTitles {
                count: names.len(),
                max: MAX_TITLES_PER_QUERY,
            });
        }
        if names.is_empty() {
            return Ok(BTreeMap::new());
        }

        let url = format!("{}/w/api.php", self.endpoints.wikipedia);
        let titles = names.join("|");
        let colimit = MAX_TITLES_PER_QUERY.to_string();
        let request = self.client.get(&url).query(&[
            ("format", "json"),
            ("action", "query"),
            ("titles", titles.as_str()),
            ("redirects", "1"),
            ("prop", "coordinates"),
            ("colimit", colimit.as_str()),
        ]);
        debug!("get from: {url} ({} titles)", names.len());

        let raw: QueryResponse = self.send_json(request, &url).await?;
        Ok(map_query_coordinates(raw.query.unwrap_or_default()))
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> ApiResult<reqwest::Response> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))
    }

    async fn send_text(&self, request: RequestBuilder, url: &str) -> ApiResult<String> {
        self.send(request, url)
            .await?
            .text()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> ApiResult<T> {
        self.send(request, url)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Mapping: wire types → domain types
// ---------------------------------------------------------------------------

fn stadium_entry_from_body(code: &str, body: &str) -> VenueNameEntry {
    let hits = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .filter(serde_json::Value::is_array)
        .and_then(|value| serde_json::from_value::<Vec<StadiumHit>>(value).ok());

    match hits {
        Some(hits) if hits.len() == 1 => VenueNameEntry::Single(hits[0].name.clone()),
        Some(hits) => VenueNameEntry::Candidates(hits.into_iter().map(|h| h.name).collect()),
        None => {
            error!("failed to retrieve. venue: {code}, result: {}", body.trim());
            VenueNameEntry::default()
        }
    }
}

fn map_query_coordinates(body: QueryBody) -> BTreeMap<String, Coordinate> {
    let mut result = BTreeMap::new();
    for page in body.pages.values() {
        let Some(coordinate) = first_coordinate(page) else {
            continue;
        };
        let queried = queried_name(&page.title, &body.redirects, &body.normalized);
        result.insert(queried.to_owned(), coordinate);
    }
    result
}

fn first_coordinate(page: &Page) -> Option<Coordinate> {
    let coordinates = page.coordinates.as_deref()?;
    if coordinates.len() > 1 {
        warn!(
            "coordinates.length is greater than 1: {}, on {}",
            coordinates.len(),
            page.title
        );
    }
    coordinates.first().map(|c| Coordinate { lat: c.lat, lon: c.lon })
}

/// Walk a resolved page title back to the name that was sent:
/// title ← redirect ← normalization. Each hop is optional.
pub fn queried_name<'a>(title: &'a str, redirects: &'a [TitleHop], normalized: &'a [TitleHop]) -> &'a str {
    let redirected = redirects
        .iter()
        .find(|r| r.to == title)
        .map(|r| r.from.as_str())
        .unwrap_or(title);
    normalized
        .iter()
        .find(|n| n.to == redirected)
        .map(|n| n.from.as_str())
        .unwrap_or(redirected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn hop(from: &str, to: &str) -> TitleHop {
        TitleHop { from: from.into(), to: to.into() }
    }

    fn api_for(server: &mockito::Server) -> JLeagueApi {
        JLeagueApi::with_endpoints(Endpoints {
            jleague: server.url(),
            wikipedia: server.url(),
        })
    }

    #[test]
    fn queried_name_follows_redirect_then_normalization() {
        let normalized = vec![hop("サンプロ　アルウィン", "サンプロ アルウィン")];
        let redirects = vec![hop("サンプロ アルウィン", "長野県松本平広域公園総合球技場")];
        assert_eq!(
            queried_name("長野県松本平広域公園総合球技場", &redirects, &normalized),
            "サンプロ　アルウィン"
        );
    }

    #[test]
    fn queried_name_without_hops_is_the_title() {
        assert_eq!(queried_name("埼玉スタジアム2002", &[], &[]), "埼玉スタジアム2002");
    }

    #[test]
    fn queried_name_with_redirect_only() {
        let redirects = vec![hop("ヤマハスタジアム", "ヤマハスタジアム (磐田)")];
        assert_eq!(
            queried_name("ヤマハスタジアム (磐田)", &redirects, &[]),
            "ヤマハスタジアム"
        );
    }

    #[test]
    fn stadium_entry_single_hit_resolves() {
        let entry = stadium_entry_from_body("カシマ", r#"[{"name":"県立カシマサッカースタジアム"}]"#);
        assert_eq!(entry, VenueNameEntry::Single("県立カシマサッカースタジアム".into()));
    }

    #[test]
    fn stadium_entry_multiple_hits_become_candidates() {
        let entry = stadium_entry_from_body("国立", r#"[{"name":"国立競技場"},{"name":"国立西が丘サッカー場"}]"#);
        assert_eq!(
            entry,
            VenueNameEntry::Candidates(vec!["国立競技場".into(), "国立西が丘サッカー場".into()])
        );
    }

    #[test]
    fn stadium_entry_non_array_is_recorded_empty() {
        assert_eq!(stadium_entry_from_body("x", r#"{"error":"busy"}"#), VenueNameEntry::default());
        assert_eq!(stadium_entry_from_body("x", "<html>"), VenueNameEntry::default());
    }

    #[test]
    fn stadium_entry_empty_array_is_an_empty_candidate_list() {
        assert_eq!(stadium_entry_from_body("x", "[]"), VenueNameEntry::Candidates(vec![]));
    }

    #[tokio::test]
    async fn too_many_titles_fails_without_a_request() {
        let api = JLeagueApi::with_endpoints(Endpoints {
            jleague: "http://127.0.0.1:9".into(),
            wikipedia: "http://127.0.0.1:9".into(),
        });
        let names: Vec<String> = (0..51).map(|i| format!("stadium {i}")).collect();
        let err = api.fetch_coordinates(&names).await.unwrap_err();
        assert!(matches!(err, ApiError::TooManyTitles { count: 51, max: 50 }));
    }

    #[tokio::test]
    async fn fetch_coordinates_maps_results_back_to_queried_names() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("action".into(), "query".into()),
                Matcher::UrlEncoded("prop".into(), "coordinates".into()),
                Matcher::UrlEncoded("redirects".into(), "1".into()),
                Matcher::UrlEncoded("titles".into(), "サンプロ　アルウィン|埼玉スタジアム2002|無い".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"query":{
                    "normalized":[{"from":"サンプロ　アルウィン","to":"サンプロ アルウィン"}],
                    "redirects":[{"from":"サンプロ アルウィン","to":"長野県松本平広域公園総合球技場"}],
                    "pages":{
                        "1":{"title":"長野県松本平広域公園総合球技場","coordinates":[{"lat":36.2,"lon":137.9}]},
                        "2":{"title":"埼玉スタジアム2002","coordinates":[{"lat":35.9,"lon":139.7},{"lat":0.0,"lon":0.0}]},
                        "-1":{"title":"無い","missing":""}
                    }}}"#,
            )
            .create_async()
            .await;

        let names = vec![
            "サンプロ　アルウィン".to_string(),
            "埼玉スタジアム2002".to_string(),
            "無い".to_string(),
        ];
        let result = api_for(&server).fetch_coordinates(&names).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.len(), 2);
        assert_eq!(result["サンプロ　アルウィン"], Coordinate { lat: 36.2, lon: 137.9 });
        assert_eq!(result["埼玉スタジアム2002"], Coordinate { lat: 35.9, lon: 139.7 });
    }

    #[tokio::test]
    async fn fetch_matches_scrapes_the_search_table() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/SFMS01/search")
            .match_query(Matcher::UrlEncoded("competition_years".into(), "2025".into()))
            .with_body(
                r#"<table class="search-table"><tbody>
                   <tr><td>2025</td><td>Ｊ１リーグ</td><td>第１節第１日</td><td>02/14(金)</td><td>19:03</td>
                   <td>Ｇ大阪</td><td>2-5</td><td>Ｃ大阪</td><td>パナスタ</td><td>26,102</td><td>ＤＡＺＮ</td></tr>
                   </tbody></table>"#,
            )
            .create_async()
            .await;

        let matches = api_for(&server).fetch_matches("2025").await.unwrap();

        mock.assert_async().await;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].venue, "パナスタ");
    }

    #[tokio::test]
    async fn fetch_matches_fails_on_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/SFMS01/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = api_for(&server).fetch_matches("2025").await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)));
    }

    #[tokio::test]
    async fn search_stadium_posts_the_code_as_a_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/SFCM02/search")
            .match_body(Matcher::UrlEncoded("stadium_name".into(), "カシマ".into()))
            .with_body(r#"[{"name":"県立カシマサッカースタジアム"}]"#)
            .create_async()
            .await;

        let entry = api_for(&server).search_stadium("カシマ").await.unwrap();

        mock.assert_async().await;
        assert_eq!(entry.resolved(), Some("県立カシマサッカースタジアム"));
    }
}
