use reqwest::Url;

use crate::error::{BoardError, BoardResult};
use crate::filter::{FILTER_PARAM, FilterSelection, PAGE_PARAM};
use crate::http_cache::fetch_text_cached;
use crate::http_client::http_client;
use crate::payload::{
    ScoreboardPayload, StatisticsPayload, SubmissionsPayload, parse_scoreboard_json,
    parse_statistics_json, parse_submissions_json,
};

pub const TIME_PARAM: &str = "time";
pub const PAGE_SIZE_PARAM: &str = "page_size";

const JSON: &str = "application/json";
const HTML: &str = "text/html";

/// Endpoint builder rooted at the origin the contest page was served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    origin: Url,
    contest_id: String,
}

impl ApiEndpoints {
    pub fn new(page_url: &Url, contest_id: impl Into<String>) -> Self {
        let mut origin = page_url.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);
        Self {
            origin,
            contest_id: contest_id.into(),
        }
    }

    pub fn contest_id(&self) -> &str {
        &self.contest_id
    }

    /// `time` pins the board to a historical epoch second.
    pub fn scoreboard_url(&self, filter: FilterSelection, time: Option<i64>) -> Url {
        let mut pairs = filter_pairs(filter);
        if let Some(time) = time {
            pairs.push((TIME_PARAM, time.to_string()));
        }
        self.endpoint("scoreboard", &pairs)
    }

    pub fn statistics_url(&self, filter: FilterSelection) -> Url {
        self.endpoint("statistics", &filter_pairs(filter))
    }

    pub fn submissions_url(&self, filter: FilterSelection, page: u32, page_size: u32) -> Url {
        let mut pairs = filter_pairs(filter);
        pairs.push((PAGE_PARAM, page.max(1).to_string()));
        pairs.push((PAGE_SIZE_PARAM, page_size.max(1).to_string()));
        self.endpoint("submissions", &pairs)
    }

    fn endpoint(&self, kind: &str, pairs: &[(&str, String)]) -> Url {
        let mut url = self.origin.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().extend(["api", kind, self.contest_id.as_str()]);
        }
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        url
    }
}

fn filter_pairs(filter: FilterSelection) -> Vec<(&'static str, String)> {
    filter
        .query_value()
        .map(|value| vec![(FILTER_PARAM, value.to_string())])
        .unwrap_or_default()
}

fn get_text(url: &Url, accept: &str) -> BoardResult<String> {
    let client = http_client().map_err(|err| BoardError::network(format!("{err:#}")))?;
    fetch_text_cached(client, url.as_str(), accept)
        .map_err(|err| BoardError::network(format!("{url}: {err:#}")))
}

pub fn fetch_contest_page(url: &Url) -> BoardResult<String> {
    get_text(url, HTML)
}

pub fn fetch_scoreboard(
    endpoints: &ApiEndpoints,
    filter: FilterSelection,
    time: Option<i64>,
) -> BoardResult<ScoreboardPayload> {
    let body = get_text(&endpoints.scoreboard_url(filter, time), JSON)?;
    parse_scoreboard_json(&body)
}

pub fn fetch_statistics(
    endpoints: &ApiEndpoints,
    filter: FilterSelection,
) -> BoardResult<StatisticsPayload> {
    let body = get_text(&endpoints.statistics_url(filter), JSON)?;
    parse_statistics_json(&body)
}

pub fn fetch_submissions(
    endpoints: &ApiEndpoints,
    filter: FilterSelection,
    page: u32,
    page_size: u32,
) -> BoardResult<SubmissionsPayload> {
    let body = get_text(&endpoints.submissions_url(filter, page, page_size), JSON)?;
    parse_submissions_json(&body)
}
