use std::collections::HashSet;

use crate::payload::{BalloonColor, ProblemResult, ScoreboardPayload, TeamResult};

/// Rank, school, team, score, penalty.
pub const FIXED_COLUMNS: usize = 5;
pub const FIXED_HEADERS: [&str; FIXED_COLUMNS] = ["Rank", "School", "Team", "Solved", "Penalty"];
pub const NO_DATA_MESSAGE: &str = "No data";

pub const DEFAULT_BALLOON: Rgb = Rgb::new(0x00, 0x7b, 0xff);

// Luminance threshold in thousandths: gray = 0.299R + 0.587G + 0.114B.
const LIGHT_GRAY_MILLI: u32 = 192_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Accepts `#RRGGBB`, `#RGB` and the same without the hash.
    pub fn parse_hex(raw: &str) -> Option<Rgb> {
        let hex = raw.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => Some(Rgb::new(
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Rgb::new(digit(0)?, digit(1)?, digit(2)?))
            }
            _ => None,
        }
    }

    /// `1000 * (0.299R + 0.587G + 0.114B)`, exact.
    pub fn gray_milli(&self) -> u32 {
        299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// White on dark backgrounds, black once gray reaches 192.
pub fn contrast_text(background: Rgb) -> Rgb {
    if background.gray_milli() < LIGHT_GRAY_MILLI {
        Rgb::WHITE
    } else {
        Rgb::BLACK
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemHeader {
    pub problem_id: String,
    pub solved_count: usize,
    pub background: Rgb,
    pub foreground: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamBadge {
    Girl,
    Undergraduate,
    Vocational,
    Unofficial,
}

impl TeamBadge {
    pub fn label(self) -> &'static str {
        match self {
            TeamBadge::Girl => "girl",
            TeamBadge::Undergraduate => "ug",
            TeamBadge::Vocational => "voc",
            TeamBadge::Unofficial => "*",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemCell {
    Empty,
    Solved {
        submissions: u32,
        minutes: i64,
        first_to_solve: bool,
    },
    Failed {
        attempts: u32,
    },
    FailedPending {
        attempts: u32,
        pending: u32,
    },
    Pending {
        pending: u32,
    },
}

impl ProblemCell {
    pub fn from_result(result: Option<&ProblemResult>) -> Self {
        match result.copied().unwrap_or(ProblemResult::Unattempted) {
            ProblemResult::Solved {
                attempts,
                solved_time,
                first_to_solve,
            } => ProblemCell::Solved {
                submissions: attempts + 1,
                minutes: solved_time,
                first_to_solve,
            },
            ProblemResult::Pending {
                attempts,
                pending_attempts,
            } if attempts > 0 => ProblemCell::FailedPending {
                attempts,
                pending: pending_attempts,
            },
            ProblemResult::Pending {
                pending_attempts, ..
            } => ProblemCell::Pending {
                pending: pending_attempts,
            },
            ProblemResult::Failed { attempts } => ProblemCell::Failed { attempts },
            ProblemResult::Unattempted => ProblemCell::Empty,
        }
    }

    pub fn text(&self) -> String {
        match self {
            ProblemCell::Empty => String::new(),
            ProblemCell::Solved {
                submissions,
                minutes,
                ..
            } => format!("{submissions}/{minutes}"),
            ProblemCell::Failed { attempts } => format!("-{attempts}"),
            ProblemCell::FailedPending { attempts, pending } => format!("-{attempts} +{pending}"),
            ProblemCell::Pending { pending } => format!("+{pending}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRow {
    pub rank: u32,
    pub organization: String,
    pub school_rank_badge: Option<u32>,
    pub team_name: String,
    pub badges: Vec<TeamBadge>,
    pub score: u32,
    pub total_time: i64,
    pub cells: Vec<ProblemCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Team(TeamRow),
    Empty { colspan: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardTable {
    pub caption: Option<String>,
    pub headers: Vec<ProblemHeader>,
    pub rows: Vec<TableRow>,
}

impl ScoreboardTable {
    pub fn column_count(&self) -> usize {
        FIXED_COLUMNS + self.headers.len()
    }

    pub fn team_rows(&self) -> impl Iterator<Item = &TeamRow> {
        self.rows.iter().filter_map(|row| match row {
            TableRow::Team(team) => Some(team),
            TableRow::Empty { .. } => None,
        })
    }
}

/// Builds the table for `payload`. Row order is exactly the payload's
/// result order.
pub fn render_scoreboard(payload: &ScoreboardPayload, filter_label: Option<&str>) -> ScoreboardTable {
    let caption = filter_label.map(str::to_string);

    if payload.results.is_empty() {
        return ScoreboardTable {
            caption,
            headers: problem_headers(payload, &[]),
            rows: vec![TableRow::Empty {
                colspan: payload.problem_ids.len() + FIXED_COLUMNS,
                message: NO_DATA_MESSAGE.to_string(),
            }],
        };
    }

    let mut annotated_schools: HashSet<&str> = HashSet::new();
    let mut rows = Vec::with_capacity(payload.results.len());
    for result in &payload.results {
        let first_of_school = annotated_schools.insert(result.team.organization.as_str());
        rows.push(team_row(result, &payload.problem_ids, first_of_school));
    }

    ScoreboardTable {
        caption,
        headers: problem_headers(payload, &rows),
        rows: rows.into_iter().map(TableRow::Team).collect(),
    }
}

fn team_row(result: &TeamResult, problem_ids: &[String], first_of_school: bool) -> TeamRow {
    let team = &result.team;
    let mut badges = Vec::new();
    if team.girl {
        badges.push(TeamBadge::Girl);
    }
    if team.undergraduate {
        badges.push(TeamBadge::Undergraduate);
    }
    if team.vocational {
        badges.push(TeamBadge::Vocational);
    }
    if team.is_unofficial() {
        badges.push(TeamBadge::Unofficial);
    }

    let cells = problem_ids
        .iter()
        .map(|id| ProblemCell::from_result(result.problem_results.get(id)))
        .collect();

    TeamRow {
        rank: result.rank,
        organization: team.organization.clone(),
        school_rank_badge: if first_of_school { result.school_rank } else { None },
        team_name: team.name.clone(),
        badges,
        score: result.score,
        total_time: result.total_time,
        cells,
    }
}

fn problem_headers(payload: &ScoreboardPayload, rows: &[TeamRow]) -> Vec<ProblemHeader> {
    payload
        .problem_ids
        .iter()
        .enumerate()
        .map(|(idx, problem_id)| {
            let solved_count = rows
                .iter()
                .filter(|row| matches!(row.cells.get(idx), Some(ProblemCell::Solved { .. })))
                .count();
            let (background, foreground) = header_colors(payload.balloon_colors.get(idx));
            ProblemHeader {
                problem_id: problem_id.clone(),
                solved_count,
                background,
                foreground,
            }
        })
        .collect()
}

fn header_colors(balloon: Option<&BalloonColor>) -> (Rgb, Rgb) {
    let background = balloon
        .and_then(|b| b.background_color.as_deref())
        .and_then(Rgb::parse_hex)
        .unwrap_or(DEFAULT_BALLOON);
    let foreground = balloon
        .and_then(|b| b.text_color.as_deref())
        .and_then(Rgb::parse_hex)
        .unwrap_or_else(|| contrast_text(background));
    (background, foreground)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Rgb::parse_hex("#FFFFFF"), Some(Rgb::WHITE));
        assert_eq!(Rgb::parse_hex("000"), Some(Rgb::BLACK));
        assert_eq!(Rgb::parse_hex("#fa0"), Some(Rgb::new(0xff, 0xaa, 0x00)));
        assert_eq!(Rgb::parse_hex("red"), None);
        assert_eq!(Rgb::parse_hex("#12345"), None);
    }

    #[test]
    fn gray_boundary_is_black() {
        assert_eq!(Rgb::new(192, 192, 192).gray_milli(), 192_000);
        assert_eq!(contrast_text(Rgb::new(192, 192, 192)), Rgb::BLACK);
        assert_eq!(contrast_text(Rgb::new(191, 192, 192)), Rgb::WHITE);
    }

    #[test]
    fn cell_text_forms() {
        let solved = ProblemCell::Solved {
            submissions: 3,
            minutes: 42,
            first_to_solve: false,
        };
        assert_eq!(solved.text(), "3/42");
        assert_eq!(ProblemCell::FailedPending { attempts: 2, pending: 1 }.text(), "-2 +1");
        assert_eq!(ProblemCell::Empty.text(), "");
    }
}
