use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::time_oracle::{ContestPhase, ContestWindow, phase};

const HOUR: Duration = Duration::from_millis(3_600_000);
const FIVE_MINUTES: Duration = Duration::from_millis(300_000);
const MINUTE: Duration = Duration::from_millis(60_000);

// How close to the start the pre-contest cadence tightens.
const PRESTART_WINDOW_SECS: i64 = 60 * 60;

/// Refresh cadence for `phase`. `None` means stop polling; the transition
/// into `Ended` already produced the last refresh.
pub fn schedule(phase: ContestPhase, now: i64, window: &ContestWindow) -> Option<Duration> {
    match phase {
        ContestPhase::Ended => None,
        ContestPhase::NotStarted => {
            if window.start_time.saturating_sub(now) > PRESTART_WINDOW_SECS {
                Some(HOUR)
            } else {
                Some(FIVE_MINUTES)
            }
        }
        ContestPhase::Running | ContestPhase::Frozen => Some(MINUTE),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTick {
    pub phase: ContestPhase,
    pub phase_changed: bool,
    pub refresh: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PollScheduler {
    last_phase: Option<ContestPhase>,
    interval: Option<Duration>,
    next_due_ms: Option<i64>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn next_due_ms(&self) -> Option<i64> {
        self.next_due_ms
    }

    pub fn last_phase(&self) -> Option<ContestPhase> {
        self.last_phase
    }

    /// Re-derives the phase at `now_ms` and reports whether a scoreboard
    /// refresh is due. The first call only records the baseline: the initial
    /// load is issued by whoever starts the scheduler.
    pub fn tick(&mut self, now_ms: i64, window: &ContestWindow) -> PollTick {
        let now = now_ms.div_euclid(1000);
        let current = phase(now, window);
        let interval = schedule(current, now, window);

        let Some(previous) = self.last_phase else {
            self.last_phase = Some(current);
            self.reschedule(now_ms, interval);
            return PollTick {
                phase: current,
                phase_changed: false,
                refresh: false,
            };
        };

        if previous != current {
            self.last_phase = Some(current);
            self.reschedule(now_ms, interval);
            return PollTick {
                phase: current,
                phase_changed: true,
                refresh: true,
            };
        }

        if interval != self.interval {
            // Cadence tightened inside a phase (one hour before start).
            let candidate = interval.map(|d| now_ms + d.as_millis() as i64);
            self.next_due_ms = match (self.next_due_ms, candidate) {
                (Some(existing), Some(next)) => Some(existing.min(next)),
                (_, next) => next,
            };
            self.interval = interval;
        }

        let due = self.next_due_ms.is_some_and(|at| now_ms >= at);
        if due {
            self.reschedule(now_ms, interval);
        }
        PollTick {
            phase: current,
            phase_changed: false,
            refresh: due,
        }
    }

    fn reschedule(&mut self, now_ms: i64, interval: Option<Duration>) {
        self.interval = interval;
        self.next_due_ms = interval.map(|d| now_ms + d.as_millis() as i64);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestCategory {
    Scoreboard,
    Statistics,
    Submissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub category: RequestCategory,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Accepted,
    /// A newer request of the same category was issued; drop this response.
    Stale,
}

/// In-flight guards plus sequence numbers, one lane per category.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    next_seq: u64,
    latest: HashMap<RequestCategory, u64>,
    in_flight: HashSet<RequestCategory>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self, category: RequestCategory) -> bool {
        self.in_flight.contains(&category)
    }

    pub fn latest_seq(&self, category: RequestCategory) -> Option<u64> {
        self.latest.get(&category).copied()
    }

    /// Issues a ticket unless a request of this category is still pending,
    /// in which case the trigger is dropped.
    pub fn begin(&mut self, category: RequestCategory) -> Option<RequestTicket> {
        if self.is_in_flight(category) {
            return None;
        }
        Some(self.issue(category))
    }

    /// Issues a ticket even when one is pending. Used when the request
    /// parameters changed, so the pending response is already outdated.
    pub fn supersede(&mut self, category: RequestCategory) -> RequestTicket {
        self.issue(category)
    }

    pub fn settle(&mut self, ticket: RequestTicket) -> Settle {
        match self.latest.get(&ticket.category) {
            Some(latest) if *latest == ticket.seq => {
                self.in_flight.remove(&ticket.category);
                Settle::Accepted
            }
            _ => Settle::Stale,
        }
    }

    fn issue(&mut self, category: RequestCategory) -> RequestTicket {
        self.next_seq += 1;
        self.latest.insert(category, self.next_seq);
        self.in_flight.insert(category);
        RequestTicket {
            category,
            seq: self.next_seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_drops_overlapping_triggers() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(RequestCategory::Scoreboard).unwrap();
        assert!(tracker.begin(RequestCategory::Scoreboard).is_none());
        // Other lanes are independent.
        assert!(tracker.begin(RequestCategory::Statistics).is_some());
        assert_eq!(tracker.settle(first), Settle::Accepted);
        assert!(tracker.begin(RequestCategory::Scoreboard).is_some());
    }

    #[test]
    fn superseded_response_is_stale_even_when_it_lands_last() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(RequestCategory::Scoreboard).unwrap();
        let second = tracker.supersede(RequestCategory::Scoreboard);
        assert!(second.seq > first.seq);
        assert_eq!(tracker.settle(second), Settle::Accepted);
        assert_eq!(tracker.settle(first), Settle::Stale);
        assert!(!tracker.is_in_flight(RequestCategory::Scoreboard));
    }

    #[test]
    fn stale_settle_keeps_newer_request_in_flight() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(RequestCategory::Submissions).unwrap();
        let _second = tracker.supersede(RequestCategory::Submissions);
        assert_eq!(tracker.settle(first), Settle::Stale);
        assert!(tracker.is_in_flight(RequestCategory::Submissions));
    }
}
