use std::collections::VecDeque;

use crate::address_bar::AddressBar;
use crate::error::{BoardError, BoardResult};
use crate::filter::{FilterSelection, ViewQuery};
use crate::panels::{StatisticsView, SubmissionsView, render_statistics, render_submissions};
use crate::payload::{ScoreboardPayload, StatisticsPayload, SubmissionsPayload};
use crate::poll::{PollScheduler, RequestCategory, RequestTicket, RequestTracker, Settle};
use crate::render::{ScoreboardTable, render_scoreboard};
use crate::store::ScoreboardStore;
use crate::time_oracle::ContestWindow;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(BoardError),
}

impl PanelStatus {
    pub fn error(&self) -> Option<&BoardError> {
        match self {
            PanelStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScrubState {
    #[default]
    Idle,
    /// Pointer held on the progress bar; nothing is fetched until release.
    Dragging { fraction: f64, preview_time: i64 },
}

/// Parameters of one fetch. Two triggers with equal requests are the same
/// request; a different request in the same category supersedes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    Scoreboard {
        filter: FilterSelection,
        time: Option<i64>,
    },
    Statistics {
        filter: FilterSelection,
    },
    Submissions {
        filter: FilterSelection,
        page: u32,
        page_size: u32,
    },
}

impl FetchRequest {
    pub fn category(&self) -> RequestCategory {
        match self {
            FetchRequest::Scoreboard { .. } => RequestCategory::Scoreboard,
            FetchRequest::Statistics { .. } => RequestCategory::Statistics,
            FetchRequest::Submissions { .. } => RequestCategory::Submissions,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FetchRequest::Scoreboard { filter, time } => match time {
                Some(time) => format!("scoreboard [{}] at {time}", filter.as_str()),
                None => format!("scoreboard [{}]", filter.as_str()),
            },
            FetchRequest::Statistics { filter } => format!("statistics [{}]", filter.as_str()),
            FetchRequest::Submissions { filter, page, .. } => {
                format!("submissions [{}] page {page}", filter.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Fetch {
        ticket: RequestTicket,
        request: FetchRequest,
    },
}

#[derive(Debug, Clone)]
pub enum Delta {
    Scoreboard {
        ticket: RequestTicket,
        filter: FilterSelection,
        result: BoardResult<ScoreboardPayload>,
    },
    Statistics {
        ticket: RequestTicket,
        filter: FilterSelection,
        result: BoardResult<StatisticsPayload>,
    },
    Submissions {
        ticket: RequestTicket,
        filter: FilterSelection,
        result: BoardResult<SubmissionsPayload>,
    },
    Log(String),
}

/// Everything the UI thread owns. Only `apply_delta` and the controller
/// mutate it.
#[derive(Debug, Clone)]
pub struct BoardState {
    pub window: ContestWindow,
    pub address: AddressBar,
    pub query: ViewQuery,
    pub page_size: u32,
    pub store: ScoreboardStore,
    pub table: Option<ScoreboardTable>,
    pub statistics: Option<StatisticsView>,
    pub submissions: Option<SubmissionsView>,
    pub scoreboard_status: PanelStatus,
    pub statistics_status: PanelStatus,
    pub submissions_status: PanelStatus,
    pub tracker: RequestTracker,
    pub scheduler: PollScheduler,
    pub scrub: ScrubState,
    /// Historical timestamp the rank view is pinned to; `None` is live.
    pub pinned_time: Option<i64>,
    pub contest_name: String,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl BoardState {
    pub fn new(window: ContestWindow, address: AddressBar, page_size: u32) -> Self {
        let query = address.query();
        Self {
            window,
            address,
            query,
            page_size: page_size.max(1),
            store: ScoreboardStore::new(),
            table: None,
            statistics: None,
            submissions: None,
            scoreboard_status: PanelStatus::Idle,
            statistics_status: PanelStatus::Idle,
            submissions_status: PanelStatus::Idle,
            tracker: RequestTracker::new(),
            scheduler: PollScheduler::new(),
            scrub: ScrubState::Idle,
            pinned_time: None,
            contest_name: String::new(),
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn status(&self, category: RequestCategory) -> &PanelStatus {
        match category {
            RequestCategory::Scoreboard => &self.scoreboard_status,
            RequestCategory::Statistics => &self.statistics_status,
            RequestCategory::Submissions => &self.submissions_status,
        }
    }

    pub fn status_mut(&mut self, category: RequestCategory) -> &mut PanelStatus {
        match category {
            RequestCategory::Scoreboard => &mut self.scoreboard_status,
            RequestCategory::Statistics => &mut self.statistics_status,
            RequestCategory::Submissions => &mut self.submissions_status,
        }
    }

    /// Label shown above a panel; the default filter has none.
    pub fn filter_caption(filter: FilterSelection) -> Option<&'static str> {
        match filter {
            FilterSelection::All => None,
            other => Some(other.label()),
        }
    }
}

fn settle(state: &mut BoardState, ticket: RequestTicket) -> bool {
    match state.tracker.settle(ticket) {
        Settle::Accepted => true,
        Settle::Stale => {
            state.push_log(format!(
                "[INFO] Dropped stale {:?} response #{}",
                ticket.category, ticket.seq
            ));
            false
        }
    }
}

/// The error replaces the panel: a board left from an earlier filter or page
/// must not be shown next to it.
pub(crate) fn fail(state: &mut BoardState, category: RequestCategory, err: BoardError) {
    state.push_log(format!("[ERROR] {category:?} {}: {err}", err.kind_label()));
    match category {
        RequestCategory::Scoreboard => state.table = None,
        RequestCategory::Statistics => state.statistics = None,
        RequestCategory::Submissions => state.submissions = None,
    }
    *state.status_mut(category) = PanelStatus::Failed(err);
}

pub fn apply_delta(state: &mut BoardState, delta: Delta) {
    match delta {
        Delta::Scoreboard {
            ticket,
            filter,
            result,
        } => {
            if !settle(state, ticket) {
                return;
            }
            match result {
                Ok(payload) => {
                    let table = render_scoreboard(&payload, BoardState::filter_caption(filter));
                    state.push_log(format!(
                        "[INFO] Scoreboard #{}: {} teams",
                        ticket.seq,
                        payload.results.len()
                    ));
                    if !payload.contest_name.is_empty() {
                        state.contest_name = payload.contest_name.clone();
                    }
                    state.store.set(payload, ticket.seq);
                    state.table = Some(table);
                    state.scoreboard_status = PanelStatus::Ready;
                }
                Err(err) => fail(state, RequestCategory::Scoreboard, err),
            }
        }
        Delta::Statistics {
            ticket,
            filter,
            result,
        } => {
            if !settle(state, ticket) {
                return;
            }
            match result {
                Ok(payload) => {
                    state.statistics = Some(render_statistics(
                        &payload,
                        BoardState::filter_caption(filter),
                    ));
                    state.statistics_status = PanelStatus::Ready;
                }
                Err(err) => fail(state, RequestCategory::Statistics, err),
            }
        }
        Delta::Submissions {
            ticket,
            filter,
            result,
        } => {
            if !settle(state, ticket) {
                return;
            }
            match result {
                Ok(payload) => {
                    state.submissions = Some(render_submissions(
                        &payload,
                        BoardState::filter_caption(filter),
                    ));
                    state.submissions_status = PanelStatus::Ready;
                }
                Err(err) => fail(state, RequestCategory::Submissions, err),
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
