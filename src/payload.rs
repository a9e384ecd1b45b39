use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::error::{BoardError, BoardResult};

// ---------------------------------------------------------------------------
// Typed payloads handed to the store and the renderers.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreboardPayload {
    pub contest_name: String,
    pub problem_ids: Vec<String>,
    // Aligned by index with `problem_ids`; may be shorter.
    pub balloon_colors: Vec<BalloonColor>,
    // Already rank-ordered by the server.
    pub results: Vec<TeamResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalloonColor {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamResult {
    pub rank: u32,
    pub team: Team,
    pub score: u32,
    /// Penalty minutes.
    pub total_time: i64,
    pub school_rank: Option<u32>,
    pub problem_results: HashMap<String, ProblemResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub organization: String,
    pub girl: bool,
    pub undergraduate: bool,
    pub vocational: bool,
    pub groups: Vec<String>,
}

impl Team {
    pub fn is_unofficial(&self) -> bool {
        self.groups.iter().any(|g| g == "unofficial")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemResult {
    Unattempted,
    Failed {
        attempts: u32,
    },
    /// Submissions hidden by the freeze; `attempts` counts the rejected ones
    /// made before them.
    Pending {
        attempts: u32,
        pending_attempts: u32,
    },
    Solved {
        attempts: u32,
        solved_time: i64,
        first_to_solve: bool,
    },
}

impl ProblemResult {
    /// Collapses the raw counters into the single state a cell depicts.
    /// Solved wins over everything; pending attempts only count while the
    /// result is marked frozen.
    pub fn from_counts(
        solved: bool,
        attempts: u32,
        pending_attempts: u32,
        is_frozen: bool,
        solved_time: i64,
        first_to_solve: bool,
    ) -> Self {
        if solved {
            return ProblemResult::Solved {
                attempts,
                solved_time,
                first_to_solve,
            };
        }
        if is_frozen && pending_attempts > 0 {
            return ProblemResult::Pending {
                attempts,
                pending_attempts,
            };
        }
        if attempts > 0 {
            return ProblemResult::Failed { attempts };
        }
        ProblemResult::Unattempted
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, ProblemResult::Solved { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsPayload {
    pub total_teams: u32,
    pub total_submissions: u64,
    pub accepted_submissions: u64,
    pub problem_count: u32,
    pub problem_stats: Vec<ProblemStat>,
    pub submission_types: BTreeMap<String, u64>,
    // Number of solved problems -> number of teams.
    pub team_solved_count: BTreeMap<u32, u64>,
    pub problem_heatmap: Option<Vec<Vec<u64>>>,
    pub time_labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProblemStat {
    #[serde(deserialize_with = "de_text_or_number")]
    pub problem_id: String,
    #[serde(default, alias = "submitted", alias = "total_submissions")]
    pub total: u64,
    #[serde(default, alias = "solved")]
    pub accepted: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(default, alias = "frozen")]
    pub pending: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionsPayload {
    pub submissions: Vec<Submission>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Submission {
    #[serde(alias = "submission_id", deserialize_with = "de_text_or_number")]
    pub id: String,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "de_text_or_number")]
    pub problem_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub is_filtered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_items: u64,
}

fn first_page() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Wire format. Everything optional on the wire is checked here, once.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ScoreboardWire {
    contest: Option<ContestWire>,
    results: Option<Vec<ResultWire>>,
}

#[derive(Debug, Deserialize)]
struct ContestWire {
    #[serde(default, rename = "contest_name")]
    name: String,
    #[serde(default, alias = "problem_ids")]
    problem_id: Option<Vec<String>>,
    #[serde(default)]
    balloon_color: Vec<BalloonWire>,
}

#[derive(Debug, Deserialize)]
struct BalloonWire {
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    background_color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultWire {
    #[serde(default)]
    rank: u32,
    team: Option<TeamWire>,
    #[serde(default)]
    score: u32,
    #[serde(default)]
    total_time: i64,
    #[serde(default)]
    school_rank: Option<u32>,
    #[serde(default)]
    problem_results: HashMap<String, Option<ProblemResultWire>>,
}

#[derive(Debug, Deserialize)]
struct TeamWire {
    #[serde(default, deserialize_with = "de_text_or_number")]
    team_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    organization: String,
    #[serde(default)]
    girl: bool,
    #[serde(default)]
    undergraduate: bool,
    #[serde(default)]
    vocational: bool,
    #[serde(default, rename = "group")]
    groups: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProblemResultWire {
    #[serde(default)]
    attempts: u32,
    #[serde(default)]
    solved: bool,
    #[serde(default)]
    solved_time: i64,
    #[serde(default)]
    first_to_solve: bool,
    #[serde(default)]
    is_frozen: bool,
    #[serde(default)]
    pending_attempts: u32,
}

#[derive(Debug, Deserialize)]
struct StatisticsWire {
    #[serde(default)]
    total_teams: u32,
    #[serde(default)]
    total_submissions: u64,
    #[serde(default, alias = "accepted")]
    accepted_submissions: u64,
    #[serde(default)]
    problem_count: u32,
    problem_stats: Option<Vec<ProblemStat>>,
    #[serde(default)]
    submission_types: BTreeMap<String, u64>,
    #[serde(default)]
    team_solved_count: BTreeMap<u32, u64>,
    #[serde(default)]
    problem_heatmap: Option<Vec<Vec<u64>>>,
    #[serde(default)]
    time_labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubmissionsWire {
    Paged {
        submissions: Vec<Submission>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    Bare(Vec<Submission>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

fn de_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Int(value) => value.to_string(),
        TextOrNumber::Float(value) => value.to_string(),
    })
}

// Upper bound on problems per contest; larger counts are treated as garbage.
const MAX_PROBLEM_COUNT: u32 = 1024;

fn non_null<'a>(raw: &'a str, what: &str) -> BoardResult<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(BoardError::malformed(format!("empty {what} body")));
    }
    Ok(trimmed)
}

pub fn parse_scoreboard_json(raw: &str) -> BoardResult<ScoreboardPayload> {
    let body = non_null(raw, "scoreboard")?;
    let wire: ScoreboardWire = serde_json::from_str(body)
        .map_err(|err| BoardError::malformed(format!("invalid scoreboard json: {err}")))?;

    let contest = wire
        .contest
        .ok_or_else(|| BoardError::malformed("scoreboard has no contest"))?;
    let results = wire
        .results
        .ok_or_else(|| BoardError::malformed("scoreboard has no results"))?;
    let problem_ids = contest
        .problem_id
        .ok_or_else(|| BoardError::malformed("contest has no problem_id list"))?;

    let balloon_colors = contest
        .balloon_color
        .into_iter()
        .map(|b| BalloonColor {
            background_color: b.background_color.filter(|c| !c.trim().is_empty()),
            text_color: b.color.filter(|c| !c.trim().is_empty()),
        })
        .collect();

    let mut typed = Vec::with_capacity(results.len());
    for (idx, result) in results.into_iter().enumerate() {
        let team = result
            .team
            .ok_or_else(|| BoardError::malformed(format!("result #{idx} has no team")))?;
        let problem_results = result
            .problem_results
            .into_iter()
            .map(|(problem_id, raw)| {
                let raw = raw.unwrap_or_default();
                let state = ProblemResult::from_counts(
                    raw.solved,
                    raw.attempts,
                    raw.pending_attempts,
                    raw.is_frozen,
                    raw.solved_time,
                    raw.first_to_solve,
                );
                (problem_id, state)
            })
            .collect();
        typed.push(TeamResult {
            rank: result.rank,
            team: Team {
                id: team.team_id,
                name: team.name,
                organization: team.organization,
                girl: team.girl,
                undergraduate: team.undergraduate,
                vocational: team.vocational,
                groups: team.groups,
            },
            score: result.score,
            total_time: result.total_time,
            // The server writes 0 for teams without a school rank.
            school_rank: result.school_rank.filter(|r| *r > 0),
            problem_results,
        });
    }

    Ok(ScoreboardPayload {
        contest_name: contest.name,
        problem_ids,
        balloon_colors,
        results: typed,
    })
}

pub fn parse_statistics_json(raw: &str) -> BoardResult<StatisticsPayload> {
    let body = non_null(raw, "statistics")?;
    let wire: StatisticsWire = serde_json::from_str(body)
        .map_err(|err| BoardError::malformed(format!("invalid statistics json: {err}")))?;
    let problem_stats = wire
        .problem_stats
        .ok_or_else(|| BoardError::malformed("statistics has no problem_stats"))?;
    if wire.problem_count > MAX_PROBLEM_COUNT {
        return Err(BoardError::malformed(format!(
            "statistics claims {} problems",
            wire.problem_count
        )));
    }
    Ok(StatisticsPayload {
        total_teams: wire.total_teams,
        total_submissions: wire.total_submissions,
        accepted_submissions: wire.accepted_submissions,
        problem_count: wire.problem_count.max(problem_stats.len() as u32),
        problem_stats,
        submission_types: wire.submission_types,
        team_solved_count: wire.team_solved_count,
        problem_heatmap: wire.problem_heatmap,
        time_labels: wire.time_labels,
    })
}

pub fn parse_submissions_json(raw: &str) -> BoardResult<SubmissionsPayload> {
    let body = non_null(raw, "submissions")?;
    let wire: SubmissionsWire = serde_json::from_str(body)
        .map_err(|err| BoardError::malformed(format!("invalid submissions json: {err}")))?;
    Ok(match wire {
        SubmissionsWire::Paged {
            submissions,
            pagination,
        } => SubmissionsPayload {
            submissions,
            pagination,
        },
        SubmissionsWire::Bare(submissions) => SubmissionsPayload {
            submissions,
            pagination: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_collapse_by_precedence() {
        assert!(ProblemResult::from_counts(true, 3, 2, true, 40, false).is_solved());
        assert_eq!(
            ProblemResult::from_counts(false, 2, 1, true, 0, false),
            ProblemResult::Pending {
                attempts: 2,
                pending_attempts: 1
            }
        );
        assert_eq!(
            ProblemResult::from_counts(false, 2, 1, false, 0, false),
            ProblemResult::Failed { attempts: 2 }
        );
        assert_eq!(
            ProblemResult::from_counts(false, 0, 3, false, 0, false),
            ProblemResult::Unattempted
        );
    }

    #[test]
    fn scoreboard_without_results_is_malformed() {
        let err = parse_scoreboard_json(r#"{"contest":{"problem_id":["A"]}}"#).unwrap_err();
        assert!(matches!(err, BoardError::MalformedPayload(_)));
        let err = parse_scoreboard_json(r#"{"results":[]}"#).unwrap_err();
        assert!(matches!(err, BoardError::MalformedPayload(_)));
        assert!(parse_scoreboard_json("null").is_err());
        assert!(parse_scoreboard_json("<html>").is_err());
    }

    #[test]
    fn null_problem_result_is_unattempted() {
        let raw = r#"{"contest":{"problem_id":["A"]},"results":[
            {"rank":1,"team":{"name":"t"},"problem_results":{"A":null}}]}"#;
        let payload = parse_scoreboard_json(raw).unwrap();
        assert_eq!(
            payload.results[0].problem_results.get("A"),
            Some(&ProblemResult::Unattempted)
        );
    }

    #[test]
    fn submissions_accept_bare_array_and_numeric_ids() {
        let raw = r#"[{"id":7,"problem_id":2,"status":"ACCEPTED","timestamp":1000}]"#;
        let payload = parse_submissions_json(raw).unwrap();
        assert_eq!(payload.submissions[0].id, "7");
        assert_eq!(payload.submissions[0].problem_id, "2");
        assert!(payload.pagination.is_none());
        assert!(parse_submissions_json(r#"{"items":[]}"#).is_err());
    }
}
