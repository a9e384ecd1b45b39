use std::collections::HashMap;
use std::sync::mpsc::Sender;

use crate::address_bar::{HistoryMode, sync_to_url};
use crate::error::BoardError;
use crate::filter::{FilterSelection, ViewMode, ViewQuery};
use crate::poll::RequestCategory;
use crate::state::{BoardState, FetchRequest, PanelStatus, ProviderCommand, ScrubState, fail};
use crate::time_oracle::phase_label;

/// Wires user input and the poll clock to fetches. Holds the explicit page
/// state; the provider worker only ever sees `ProviderCommand`s.
pub struct ViewController {
    pub state: BoardState,
    cmd_tx: Option<Sender<ProviderCommand>>,
    // Parameters of the request last issued per category.
    issued: HashMap<RequestCategory, FetchRequest>,
}

impl ViewController {
    pub fn new(state: BoardState, cmd_tx: Option<Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            cmd_tx,
            issued: HashMap::new(),
        }
    }

    /// Records the poll baseline and loads whatever view the address names.
    pub fn start(&mut self, now_ms: i64) {
        let tick = self.state.scheduler.tick(now_ms, &self.state.window);
        self.state.push_log(format!(
            "[INFO] Contest {} is {}",
            self.state.window.id,
            phase_label(tick.phase)
        ));
        self.load_active_view();
    }

    pub fn select_filter(&mut self, filter: FilterSelection) {
        if filter != self.state.query.filter {
            self.state.query.filter = filter;
            self.state.query.page = 1;
            self.state.push_log(format!("[INFO] Filter: {}", filter.label()));
        }
        // Same filter again resolves to the same request, which is dropped
        // while the first one is pending.
        self.persist(HistoryMode::Push);
        self.load_active_view();
    }

    pub fn cycle_filter(&mut self) {
        self.select_filter(self.state.query.filter.next());
    }

    pub fn switch_view(&mut self, view: ViewMode) {
        if view == self.state.query.view {
            return;
        }
        self.state.query.view = view;
        self.state.query.page = 1;
        self.state.scrub = ScrubState::Idle;
        self.persist(HistoryMode::Push);
        self.load_active_view();
    }

    pub fn next_page(&mut self) {
        let has_next = self
            .state
            .submissions
            .as_ref()
            .and_then(|view| view.pager.as_ref())
            .is_some_and(|pager| pager.has_next());
        if self.state.query.view == ViewMode::Submissions && has_next {
            self.goto_page(self.state.query.page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.state.query.view == ViewMode::Submissions && self.state.query.page > 1 {
            self.goto_page(self.state.query.page - 1);
        }
    }

    fn goto_page(&mut self, page: u32) {
        self.state.query.page = page.max(1);
        self.persist(HistoryMode::Push);
        self.load_active_view();
    }

    /// Pointer pressed on the progress bar. Ignored outside the rank view
    /// and before the contest starts.
    pub fn begin_scrub(&mut self, fraction: f64, now: i64) -> bool {
        if self.state.query.view != ViewMode::Rank || now < self.state.window.start_time {
            return false;
        }
        self.scrub_to_unchecked(fraction, now);
        true
    }

    pub fn scrub_to(&mut self, fraction: f64, now: i64) {
        if matches!(self.state.scrub, ScrubState::Dragging { .. }) {
            self.scrub_to_unchecked(fraction, now);
        }
    }

    fn scrub_to_unchecked(&mut self, fraction: f64, now: i64) {
        self.state.scrub = ScrubState::Dragging {
            fraction,
            preview_time: self.state.window.timestamp_at_fraction(fraction, now),
        };
    }

    /// Pointer released: exactly one fetch for the final position. Releasing
    /// at the live edge unpins the board.
    pub fn release_scrub(&mut self, now: i64) {
        let ScrubState::Dragging { preview_time, .. } = self.state.scrub else {
            return;
        };
        self.state.scrub = ScrubState::Idle;
        let live_edge = now.clamp(self.state.window.start_time, self.state.window.end_time);
        self.state.pinned_time = if preview_time >= live_edge {
            None
        } else {
            Some(preview_time)
        };
        self.state.push_log(match self.state.pinned_time {
            Some(time) => format!("[INFO] Board pinned at {time}"),
            None => "[INFO] Board back to live".to_string(),
        });
        self.request(self.scoreboard_request());
    }

    /// The timestamp the header clock shows: the drag preview, the pinned
    /// time, or `now`.
    pub fn display_time(&self, now: i64) -> i64 {
        match self.state.scrub {
            ScrubState::Dragging { preview_time, .. } => preview_time,
            ScrubState::Idle => self.state.pinned_time.unwrap_or(now),
        }
    }

    pub fn go_live(&mut self) {
        if self.state.pinned_time.take().is_some() {
            self.state.push_log("[INFO] Board back to live");
            if self.state.query.view == ViewMode::Rank {
                self.request(self.scoreboard_request());
            }
        }
    }

    pub fn retry(&mut self) {
        self.state.push_log("[INFO] Retrying");
        self.load_active_view();
    }

    pub fn history_back(&mut self) {
        if let Some(url) = self.state.address.back() {
            self.state.query = ViewQuery::parse_from_url(url);
            self.load_active_view();
        }
    }

    pub fn history_forward(&mut self) {
        if let Some(url) = self.state.address.forward() {
            self.state.query = ViewQuery::parse_from_url(url);
            self.load_active_view();
        }
    }

    /// Called from the UI loop. Phase changes always refresh; periodic
    /// refreshes only touch the live rank view.
    pub fn tick(&mut self, now_ms: i64) {
        let tick = self.state.scheduler.tick(now_ms, &self.state.window);
        if tick.phase_changed {
            self.state
                .push_log(format!("[INFO] Contest is now {}", phase_label(tick.phase)));
            self.persist(HistoryMode::Replace);
        }
        if tick.refresh
            && self.state.query.view == ViewMode::Rank
            && self.state.pinned_time.is_none()
            && !matches!(self.state.scrub, ScrubState::Dragging { .. })
        {
            self.request(self.scoreboard_request());
        }
    }

    fn persist(&mut self, mode: HistoryMode) {
        let query = self.state.query;
        sync_to_url(&mut self.state.address, &query, mode);
    }

    fn scoreboard_request(&self) -> FetchRequest {
        FetchRequest::Scoreboard {
            filter: self.state.query.filter,
            time: self.state.pinned_time,
        }
    }

    fn load_active_view(&mut self) {
        let filter = self.state.query.filter;
        let request = match self.state.query.view {
            ViewMode::Rank => self.scoreboard_request(),
            ViewMode::Statistics => FetchRequest::Statistics { filter },
            ViewMode::Submissions => FetchRequest::Submissions {
                filter,
                page: self.state.query.page,
                page_size: self.state.page_size,
            },
        };
        self.request(request);
    }

    /// Issues `request` unless the identical one is still pending. A pending
    /// request with other parameters is superseded.
    pub fn request(&mut self, request: FetchRequest) -> bool {
        let category = request.category();
        let ticket = if self.state.tracker.is_in_flight(category) {
            if self.issued.get(&category) == Some(&request) {
                return false;
            }
            self.state.tracker.supersede(category)
        } else {
            match self.state.tracker.begin(category) {
                Some(ticket) => ticket,
                None => return false,
            }
        };
        self.issued.insert(category, request);

        let Some(tx) = &self.cmd_tx else {
            self.state.tracker.settle(ticket);
            fail(&mut self.state, category, BoardError::network("no provider running"));
            return false;
        };
        if tx.send(ProviderCommand::Fetch { ticket, request }).is_err() {
            self.state.tracker.settle(ticket);
            fail(&mut self.state, category, BoardError::network("provider stopped"));
            return false;
        }
        *self.state.status_mut(category) = PanelStatus::Loading;
        self.state
            .push_log(format!("[INFO] Fetch #{} {}", ticket.seq, request.describe()));
        true
    }
}
