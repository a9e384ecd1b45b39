use chrono::{Local, TimeZone};

use crate::payload::{Pagination, StatisticsPayload, SubmissionsPayload};

pub const NO_SUBMISSIONS_MESSAGE: &str = "No submissions match this filter";
const PAGER_SPAN: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsView {
    pub caption: Option<String>,
    pub total_teams: u32,
    pub total_submissions: u64,
    pub accepted_submissions: u64,
    pub acceptance_percent: f64,
    pub problems: Vec<ProblemLine>,
    pub submission_types: Vec<Share>,
    pub solved_distribution: Vec<Share>,
    pub heatmap: Option<Heatmap>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProblemLine {
    pub problem_id: String,
    pub accepted: u64,
    pub total: u64,
    pub pending: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heatmap {
    pub rows: Vec<(String, Vec<u64>)>,
    pub time_labels: Vec<String>,
    pub max: u64,
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn saturating_total<'a>(counts: impl Iterator<Item = &'a u64>) -> u64 {
    counts.fold(0, |acc, count| acc.saturating_add(*count))
}

pub fn submission_type_label(kind: &str) -> String {
    match kind {
        "accepted" => "Accepted".to_string(),
        "rejected" => "Rejected".to_string(),
        "frozen" => "Frozen".to_string(),
        "pending" => "Pending".to_string(),
        "wrong_answer" => "Wrong answer".to_string(),
        "time_limit_exceeded" => "Time limit".to_string(),
        "memory_limit_exceeded" => "Memory limit".to_string(),
        "runtime_error" => "Runtime error".to_string(),
        "compilation_error" => "Compile error".to_string(),
        other => other.to_string(),
    }
}

pub fn render_statistics(payload: &StatisticsPayload, filter_label: Option<&str>) -> StatisticsView {
    let problems = payload
        .problem_stats
        .iter()
        .map(|stat| ProblemLine {
            problem_id: stat.problem_id.clone(),
            accepted: stat.accepted,
            total: stat.total,
            pending: stat.pending,
            percent: percent(stat.accepted, stat.total),
        })
        .collect();

    let type_total = saturating_total(payload.submission_types.values());
    let mut submission_types: Vec<Share> = payload
        .submission_types
        .iter()
        .map(|(kind, count)| Share {
            label: submission_type_label(kind),
            count: *count,
            percent: percent(*count, type_total),
        })
        .collect();
    // Stable sort keeps the map's name order among equal counts.
    submission_types.sort_by(|a, b| b.count.cmp(&a.count));

    let team_total = saturating_total(payload.team_solved_count.values());
    let solved_distribution = (0..=payload.problem_count)
        .map(|solved| {
            let count = payload
                .team_solved_count
                .get(&solved)
                .copied()
                .unwrap_or(0);
            Share {
                label: solved.to_string(),
                count,
                percent: percent(count, team_total),
            }
        })
        .collect();

    let heatmap = payload.problem_heatmap.as_ref().map(|grid| {
        let rows: Vec<(String, Vec<u64>)> = grid
            .iter()
            .enumerate()
            .map(|(idx, buckets)| {
                let id = payload
                    .problem_stats
                    .get(idx)
                    .map(|stat| stat.problem_id.clone())
                    .unwrap_or_else(|| idx.to_string());
                (id, buckets.clone())
            })
            .collect();
        let max = rows
            .iter()
            .flat_map(|(_, buckets)| buckets.iter().copied())
            .max()
            .unwrap_or(0);
        Heatmap {
            rows,
            time_labels: payload.time_labels.clone().unwrap_or_default(),
            max,
        }
    });

    StatisticsView {
        caption: filter_label.map(str::to_string),
        total_teams: payload.total_teams,
        total_submissions: payload.total_submissions,
        accepted_submissions: payload.accepted_submissions,
        acceptance_percent: percent(payload.accepted_submissions, payload.total_submissions),
        problems,
        submission_types,
        solved_distribution,
        heatmap,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Accepted,
    WrongAnswer,
    LimitExceeded,
    RuntimeError,
    CompileError,
    Frozen,
    Pending,
    Other,
}

pub fn status_kind(status: &str) -> StatusKind {
    match status.to_ascii_uppercase().as_str() {
        "ACCEPTED" => StatusKind::Accepted,
        "WRONG_ANSWER" => StatusKind::WrongAnswer,
        "TIME_LIMIT_EXCEEDED" | "MEMORY_LIMIT_EXCEEDED" => StatusKind::LimitExceeded,
        "RUNTIME_ERROR" => StatusKind::RuntimeError,
        "COMPILATION_ERROR" => StatusKind::CompileError,
        "FROZEN" => StatusKind::Frozen,
        "PENDING" => StatusKind::Pending,
        _ => StatusKind::Other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionLine {
    pub id: String,
    pub time: String,
    pub problem_id: String,
    pub status: String,
    pub status_kind: StatusKind,
    pub language: String,
    pub team_name: String,
    pub school: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
    pub pages: Vec<u32>,
    pub show_first: bool,
    pub leading_gap: bool,
    pub trailing_gap: bool,
    pub show_last: bool,
}

impl PageWindow {
    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }
}

/// At most five page links centred on the current page, with jumps to the
/// first and last page when they fall outside the span.
pub fn page_window(pagination: &Pagination) -> PageWindow {
    let total = pagination.total_pages.max(1);
    let current = pagination.current_page.clamp(1, total);
    let mut start = current.saturating_sub(2).max(1);
    let end = (start + PAGER_SPAN - 1).min(total);
    if end - start < PAGER_SPAN - 1 {
        start = end.saturating_sub(PAGER_SPAN - 1).max(1);
    }
    PageWindow {
        current,
        total_pages: total,
        total_items: pagination.total_items,
        page_size: pagination.page_size,
        pages: (start..=end).collect(),
        show_first: start > 1,
        leading_gap: start > 2,
        trailing_gap: end + 1 < total,
        show_last: end < total,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionsView {
    pub caption: Option<String>,
    pub rows: Vec<SubmissionLine>,
    pub pager: Option<PageWindow>,
    pub empty_message: Option<&'static str>,
}

pub fn render_submissions(
    payload: &SubmissionsPayload,
    filter_label: Option<&str>,
) -> SubmissionsView {
    let rows: Vec<SubmissionLine> = payload
        .submissions
        .iter()
        .filter(|s| !s.is_filtered)
        .map(|s| SubmissionLine {
            id: s.id.clone(),
            time: format_submission_time(s.timestamp),
            problem_id: s.problem_id.clone(),
            status: s.status.clone(),
            status_kind: status_kind(&s.status),
            language: s
                .language
                .clone()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| "-".to_string()),
            team_name: s.team_name.clone(),
            school: s.school.clone(),
        })
        .collect();

    let empty_message = rows.is_empty().then_some(NO_SUBMISSIONS_MESSAGE);
    SubmissionsView {
        caption: filter_label.map(str::to_string),
        pager: payload.pagination.as_ref().map(page_window),
        rows,
        empty_message,
    }
}

pub fn format_submission_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(current: u32, total: u32) -> Pagination {
        Pagination {
            current_page: current,
            total_pages: total,
            page_size: 15,
            total_items: total as u64 * 15,
        }
    }

    #[test]
    fn window_centres_on_current_page() {
        let w = page_window(&pagination(6, 20));
        assert_eq!(w.pages, vec![4, 5, 6, 7, 8]);
        assert!(w.show_first && w.leading_gap);
        assert!(w.show_last && w.trailing_gap);
    }

    #[test]
    fn window_slides_at_edges() {
        let w = page_window(&pagination(1, 20));
        assert_eq!(w.pages, vec![1, 2, 3, 4, 5]);
        assert!(!w.show_first && !w.has_prev());

        let w = page_window(&pagination(20, 20));
        assert_eq!(w.pages, vec![16, 17, 18, 19, 20]);
        assert!(!w.show_last && !w.has_next());

        let w = page_window(&pagination(2, 3));
        assert_eq!(w.pages, vec![1, 2, 3]);
    }

    #[test]
    fn adjacent_edge_page_has_no_gap() {
        let w = page_window(&pagination(4, 20));
        assert_eq!(w.pages, vec![2, 3, 4, 5, 6]);
        assert!(w.show_first);
        assert!(!w.leading_gap);
    }

    #[test]
    fn status_kind_is_case_insensitive() {
        assert_eq!(status_kind("accepted"), StatusKind::Accepted);
        assert_eq!(status_kind("MEMORY_LIMIT_EXCEEDED"), StatusKind::LimitExceeded);
        assert_eq!(status_kind("weird"), StatusKind::Other);
    }
}
