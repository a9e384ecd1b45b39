use reqwest::Url;

use crate::payload::Team;

pub const FILTER_PARAM: &str = "filter";
pub const VIEW_PARAM: &str = "view";
pub const PAGE_PARAM: &str = "page";

const UNOFFICIAL_GROUP: &str = "unofficial";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterSelection {
    #[default]
    All,
    Official,
    Unofficial,
    Girls,
    Undergraduate,
    Special,
}

impl FilterSelection {
    pub const ALL: [FilterSelection; 6] = [
        FilterSelection::All,
        FilterSelection::Official,
        FilterSelection::Unofficial,
        FilterSelection::Girls,
        FilterSelection::Undergraduate,
        FilterSelection::Special,
    ];

    /// Total over any input: only the exact lowercase wire names are
    /// accepted, everything else (missing, empty, `ALL`, markup) is `All`.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("all") => FilterSelection::All,
            Some("official") => FilterSelection::Official,
            Some("unofficial") => FilterSelection::Unofficial,
            Some("girls") => FilterSelection::Girls,
            Some("undergraduate") => FilterSelection::Undergraduate,
            Some("special") => FilterSelection::Special,
            _ => FilterSelection::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterSelection::All => "all",
            FilterSelection::Official => "official",
            FilterSelection::Unofficial => "unofficial",
            FilterSelection::Girls => "girls",
            FilterSelection::Undergraduate => "undergraduate",
            FilterSelection::Special => "special",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterSelection::All => "All teams",
            FilterSelection::Official => "Official",
            FilterSelection::Unofficial => "Unofficial (*)",
            FilterSelection::Girls => "Girls",
            FilterSelection::Undergraduate => "Undergraduate",
            FilterSelection::Special => "Vocational",
        }
    }

    /// Query value for API calls; `All` is expressed by omission.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            FilterSelection::All => None,
            other => Some(other.as_str()),
        }
    }

    pub fn admits(self, team: &Team) -> bool {
        let unofficial = team.groups.iter().any(|g| g == UNOFFICIAL_GROUP);
        match self {
            FilterSelection::All => true,
            FilterSelection::Official => !unofficial,
            FilterSelection::Unofficial => unofficial,
            FilterSelection::Girls => team.girl,
            FilterSelection::Undergraduate => team.undergraduate,
            FilterSelection::Special => team.vocational,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    #[default]
    Rank,
    Statistics,
    Submissions,
}

impl ViewMode {
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("statistics") => ViewMode::Statistics,
            Some("submissions") => ViewMode::Submissions,
            _ => ViewMode::Rank,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Rank => "rank",
            ViewMode::Statistics => "statistics",
            ViewMode::Submissions => "submissions",
        }
    }
}

/// The part of the page state mirrored into the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewQuery {
    pub filter: FilterSelection,
    pub view: ViewMode,
    pub page: u32,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self::new(FilterSelection::All, ViewMode::Rank, 1)
    }
}

impl ViewQuery {
    pub fn new(filter: FilterSelection, view: ViewMode, page: u32) -> Self {
        Self {
            filter,
            view,
            page: page.max(1),
        }
    }

    pub fn parse_from_url(url: &Url) -> Self {
        let mut filter = None;
        let mut view = None;
        let mut page = None;
        for (key, value) in url.query_pairs() {
            match &*key {
                FILTER_PARAM if filter.is_none() => filter = Some(value.into_owned()),
                VIEW_PARAM if view.is_none() => view = Some(value.into_owned()),
                PAGE_PARAM if page.is_none() => page = Some(value.into_owned()),
                _ => {}
            }
        }
        let page = page
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        Self::new(
            FilterSelection::normalize(filter.as_deref()),
            ViewMode::normalize(view.as_deref()),
            page,
        )
    }

    /// Rewrites `filter`/`view`/`page` on `url`, keeping unrelated
    /// parameters in their original order.
    pub fn apply_to_url(&self, url: &mut Url) {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !matches!(&**key, FILTER_PARAM | VIEW_PARAM | PAGE_PARAM))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut pairs = kept;
        if let Some(filter) = self.filter.query_value() {
            pairs.push((FILTER_PARAM.to_string(), filter.to_string()));
        }
        if self.view != ViewMode::Rank {
            pairs.push((VIEW_PARAM.to_string(), self.view.as_str().to_string()));
        }
        if self.page > 1 {
            pairs.push((PAGE_PARAM.to_string(), self.page.to_string()));
        }

        if pairs.is_empty() {
            url.set_query(None);
            return;
        }
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
}
