use chrono::Utc;

use crate::error::{BoardError, BoardResult};

/// Contest clock read once at startup. `end_time` is an absolute epoch
/// second, never a duration relative to `start_time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestWindow {
    pub id: String,
    pub start_time: i64,
    pub end_time: i64,
    // Offset from `start_time` at which the board freezes.
    pub frozen_time: Option<i64>,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContestPhase {
    NotStarted,
    Running,
    Frozen,
    Ended,
}

impl ContestWindow {
    pub fn new(
        id: impl Into<String>,
        start_time: i64,
        end_time: i64,
        frozen_time: Option<i64>,
    ) -> BoardResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(BoardError::MissingContestId);
        }
        if start_time >= end_time {
            return Err(BoardError::malformed(format!(
                "contest {id} ends ({end_time}) before it starts ({start_time})"
            )));
        }
        Ok(Self {
            id,
            start_time,
            end_time,
            frozen_time: frozen_time.filter(|offset| *offset > 0),
            status: String::new(),
        })
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn duration(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time)
    }

    pub fn phase(&self, now: i64) -> ContestPhase {
        phase(now, self)
    }

    pub fn elapsed(&self, now: i64) -> i64 {
        now.saturating_sub(self.start_time).clamp(0, self.duration())
    }

    pub fn remaining(&self, now: i64) -> i64 {
        self.end_time.saturating_sub(now).clamp(0, self.duration())
    }

    pub fn progress_fraction(&self, now: i64) -> f64 {
        self.elapsed(now) as f64 / self.duration() as f64
    }

    /// Maps a progress-bar position to a contest timestamp. The result never
    /// runs past `now`, so a scrub cannot ask for a board from the future.
    pub fn timestamp_at_fraction(&self, fraction: f64, now: i64) -> i64 {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = self
            .start_time
            .saturating_add((self.duration() as f64 * fraction).round() as i64);
        let ceiling = now.clamp(self.start_time, self.end_time);
        target.min(ceiling)
    }
}

pub fn phase(now: i64, window: &ContestWindow) -> ContestPhase {
    if now < window.start_time {
        return ContestPhase::NotStarted;
    }
    if now >= window.end_time {
        return ContestPhase::Ended;
    }
    if let Some(offset) = window.frozen_time
        && now >= window.start_time.saturating_add(offset)
    {
        return ContestPhase::Frozen;
    }
    ContestPhase::Running
}

pub fn phase_label(phase: ContestPhase) -> &'static str {
    match phase {
        ContestPhase::NotStarted => "NOT STARTED",
        ContestPhase::Running => "RUNNING",
        ContestPhase::Frozen => "FROZEN",
        ContestPhase::Ended => "ENDED",
    }
}

/// `H:MM:SS` with no cap on hours; negative input renders as zero.
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

/// Reads an epoch-second attribute. Anything unparseable counts as 0.
pub fn parse_timestamp(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value;
    }
    trimmed
        .parse::<f64>()
        .map(sanitize_timestamp)
        .unwrap_or(0)
}

pub fn sanitize_timestamp(value: f64) -> i64 {
    if value.is_finite() { value.trunc() as i64 } else { 0 }
}

pub fn now_epoch_secs() -> i64 {
    Utc::now().timestamp()
}

pub fn now_epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}
