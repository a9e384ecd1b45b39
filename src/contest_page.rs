use scraper::{Html, Selector};

use crate::error::{BoardError, BoardResult};
use crate::time_oracle::{ContestWindow, parse_timestamp};

pub const CONTEST_DATA_SELECTOR: &str = "#contest-data";

/// Raw contest attributes as published by the page or the environment,
/// before the window invariants are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContestIsland {
    pub id: String,
    pub start_time: i64,
    pub end_time: i64,
    pub frozen_time: Option<i64>,
    pub status: String,
}

impl ContestIsland {
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    pub fn into_window(self) -> BoardResult<ContestWindow> {
        let window = ContestWindow::new(
            self.id.trim(),
            self.start_time,
            self.end_time,
            self.frozen_time,
        )?;
        Ok(window.with_status(self.status))
    }
}

/// Reads the `#contest-data` element. `None` when the page has no such
/// element; attributes that are missing or unparseable read as empty or 0.
pub fn parse_contest_island(html: &str) -> Option<ContestIsland> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(CONTEST_DATA_SELECTOR).ok()?;
    let element = document.select(&selector).next()?;
    let attr = |name: &str| element.value().attr(name).unwrap_or_default();

    let frozen_raw = attr("data-frozen-time");
    Some(ContestIsland {
        id: attr("data-contest-id").trim().to_string(),
        start_time: parse_timestamp(attr("data-start-time")),
        end_time: parse_timestamp(attr("data-end-time")),
        frozen_time: if frozen_raw.trim().is_empty() {
            None
        } else {
            Some(parse_timestamp(frozen_raw))
        },
        status: attr("data-status").trim().to_string(),
    })
}

/// The island wins whenever it names a contest; otherwise the fallback is
/// used as a whole. Attributes are never mixed between the two sources.
pub fn resolve_window(
    island: Option<ContestIsland>,
    fallback: Option<ContestIsland>,
) -> BoardResult<ContestWindow> {
    match (island, fallback) {
        (Some(island), _) if island.has_id() => island.into_window(),
        (_, Some(fallback)) if fallback.has_id() => fallback.into_window(),
        _ => Err(BoardError::MissingContestId),
    }
}

pub fn window_from_page(
    html: Option<&str>,
    fallback: Option<ContestIsland>,
) -> BoardResult<ContestWindow> {
    resolve_window(html.and_then(parse_contest_island), fallback)
}
