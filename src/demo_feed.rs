use std::collections::{BTreeMap, HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::BoardResult;
use crate::filter::FilterSelection;
use crate::payload::{
    BalloonColor, Pagination, ProblemResult, ProblemStat, ScoreboardPayload, StatisticsPayload,
    Submission, SubmissionsPayload, Team, TeamResult,
};
use crate::provider::BoardSource;
use crate::time_oracle::{ContestWindow, now_epoch_secs};

const CONTEST_NAME: &str = "Demo Regional Contest";
const PENALTY_MINUTES: i64 = 20;
const HEATMAP_BUCKET_SECS: i64 = 30 * 60;

const SCHOOLS: [&str; 8] = [
    "North Polytechnic",
    "Lakeside University",
    "Harbor Institute",
    "Central College",
    "Mountain Tech",
    "Riverside University",
    "Eastern Academy",
    "Valley Vocational School",
];

const BALLOONS: [(&str, Option<&str>); 10] = [
    ("#FF4136", None),
    ("#FFDC00", None),
    ("#2ECC40", None),
    ("#0074D9", None),
    ("#B10DC9", None),
    ("#FF851B", None),
    ("#7FDBFF", None),
    ("#111111", Some("#FFD700")),
    ("#F012BE", None),
    ("#C0C0C0", None),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Accepted,
    WrongAnswer,
    TimeLimit,
    RuntimeError,
}

impl Verdict {
    fn status(self) -> &'static str {
        match self {
            Verdict::Accepted => "ACCEPTED",
            Verdict::WrongAnswer => "WRONG_ANSWER",
            Verdict::TimeLimit => "TIME_LIMIT_EXCEEDED",
            Verdict::RuntimeError => "RUNTIME_ERROR",
        }
    }

    fn kind(self) -> &'static str {
        match self {
            Verdict::Accepted => "accepted",
            Verdict::WrongAnswer => "wrong_answer",
            Verdict::TimeLimit => "time_limit_exceeded",
            Verdict::RuntimeError => "runtime_error",
        }
    }
}

#[derive(Debug, Clone)]
struct DemoSubmission {
    id: u64,
    team: usize,
    problem: usize,
    at: i64,
    verdict: Verdict,
    language: &'static str,
}

/// A synthetic contest generated from a seed. Answers the same queries as
/// the HTTP backend, so the terminal runs without a server.
#[derive(Debug, Clone)]
pub struct DemoFeed {
    window: ContestWindow,
    problem_ids: Vec<String>,
    teams: Vec<Team>,
    // Sorted by time.
    log: Vec<DemoSubmission>,
    clock: Option<i64>,
}

impl DemoFeed {
    /// Window for a demo that is two hours in, with the freeze at hour four.
    pub fn demo_window(now: i64) -> BoardResult<ContestWindow> {
        let start = now - 2 * 3600;
        let window = ContestWindow::new("demo", start, start + 5 * 3600, Some(4 * 3600))?;
        Ok(window.with_status("running"))
    }

    pub fn new(window: ContestWindow, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let problem_count = 8;
        let problem_ids: Vec<String> = (0..problem_count)
            .map(|i| char::from(b'A' + i as u8).to_string())
            .collect();
        let difficulty: Vec<f64> = (0..problem_count)
            .map(|_| rng.gen_range(0.05..0.85))
            .collect();

        let team_count = 36;
        let teams: Vec<Team> = (0..team_count)
            .map(|i| {
                let school = SCHOOLS[i % SCHOOLS.len()];
                let unofficial = rng.gen_bool(0.15);
                Team {
                    id: format!("team{:03}", i + 1),
                    name: format!("{} #{}", school.split(' ').next().unwrap_or(school), i / SCHOOLS.len() + 1),
                    organization: school.to_string(),
                    girl: rng.gen_bool(0.15),
                    undergraduate: rng.gen_bool(0.6),
                    vocational: school.contains("Vocational"),
                    groups: if unofficial {
                        vec!["unofficial".to_string()]
                    } else {
                        Vec::new()
                    },
                }
            })
            .collect();

        let duration = window.duration().max(600);
        let languages = ["C++", "Java", "Python", "Rust"];
        let mut log = Vec::new();
        for team in 0..team_count {
            let skill: f64 = rng.gen_range(0.2..0.95);
            let language = languages[rng.gen_range(0..languages.len())];
            for (problem, hardness) in difficulty.iter().enumerate() {
                if !rng.gen_bool((skill * (1.0 - hardness) + 0.1).min(0.95)) {
                    continue;
                }
                let solves = rng.gen_bool((skill - hardness * 0.5).clamp(0.05, 0.95));
                let first_at = window.start_time + rng.gen_range(120..duration);
                let wrong = rng.gen_range(0..4u32);
                let mut at = first_at;
                for _ in 0..wrong {
                    let verdict = match rng.gen_range(0..3) {
                        0 => Verdict::WrongAnswer,
                        1 => Verdict::TimeLimit,
                        _ => Verdict::RuntimeError,
                    };
                    log.push((team, problem, at, verdict, language));
                    at += rng.gen_range(60..900);
                }
                if solves {
                    log.push((team, problem, at, Verdict::Accepted, language));
                }
            }
        }
        log.sort_by_key(|(team, problem, at, ..)| (*at, *team, *problem));
        let log = log
            .into_iter()
            .enumerate()
            .map(|(idx, (team, problem, at, verdict, language))| DemoSubmission {
                id: idx as u64 + 1,
                team,
                problem,
                at,
                verdict,
                language,
            })
            .collect();

        Self {
            window,
            problem_ids,
            teams,
            log,
            clock: None,
        }
    }

    /// Fixes "now" for deterministic answers.
    pub fn with_clock(mut self, now: i64) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn window(&self) -> &ContestWindow {
        &self.window
    }

    fn now(&self) -> i64 {
        self.clock.unwrap_or_else(now_epoch_secs)
    }

    /// Submissions made at or after this instant show as pending.
    fn hidden_from(&self) -> Option<i64> {
        if self.now() >= self.window.end_time {
            return None;
        }
        self.window.frozen_time.map(|offset| self.window.start_time + offset)
    }

    fn visible_until(&self, at: i64) -> impl Iterator<Item = &DemoSubmission> {
        self.log.iter().take_while(move |s| s.at <= at)
    }

    fn is_hidden(&self, submission: &DemoSubmission) -> bool {
        self.hidden_from().is_some_and(|from| submission.at >= from)
    }

    fn build_scoreboard(&self, filter: FilterSelection, at: i64) -> ScoreboardPayload {
        let team_count = self.teams.len();
        let problem_count = self.problem_ids.len();
        let mut attempts = vec![vec![0u32; problem_count]; team_count];
        let mut pending = vec![vec![0u32; problem_count]; team_count];
        let mut solved_at: Vec<Vec<Option<i64>>> = vec![vec![None; problem_count]; team_count];
        let mut first_solver: Vec<Option<usize>> = vec![None; problem_count];

        for sub in self.visible_until(at) {
            let (t, p) = (sub.team, sub.problem);
            if solved_at[t][p].is_some() {
                continue;
            }
            if self.is_hidden(sub) {
                pending[t][p] += 1;
            } else if sub.verdict == Verdict::Accepted {
                solved_at[t][p] = Some(sub.at);
                if first_solver[p].is_none() {
                    first_solver[p] = Some(t);
                }
            } else {
                attempts[t][p] += 1;
            }
        }

        let mut rows: Vec<(usize, u32, i64, HashMap<String, ProblemResult>)> = Vec::new();
        for (t, team) in self.teams.iter().enumerate() {
            if !filter.admits(team) {
                continue;
            }
            let mut score = 0;
            let mut penalty = 0;
            let mut results = HashMap::new();
            for p in 0..problem_count {
                let minutes = solved_at[t][p].map(|when| (when - self.window.start_time) / 60);
                if let Some(minutes) = minutes {
                    score += 1;
                    penalty += minutes + PENALTY_MINUTES * attempts[t][p] as i64;
                }
                let result = ProblemResult::from_counts(
                    minutes.is_some(),
                    attempts[t][p],
                    pending[t][p],
                    pending[t][p] > 0,
                    minutes.unwrap_or(0),
                    first_solver[p] == Some(t),
                );
                if result != ProblemResult::Unattempted {
                    results.insert(self.problem_ids[p].clone(), result);
                }
            }
            rows.push((t, score, penalty, results));
        }
        rows.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then(a.2.cmp(&b.2))
                .then_with(|| self.teams[a.0].name.cmp(&self.teams[b.0].name))
        });

        let mut results = Vec::with_capacity(rows.len());
        let mut ranked_schools: HashSet<&str> = HashSet::new();
        let mut rank = 0;
        let mut previous: Option<(u32, i64)> = None;
        for (idx, (t, score, penalty, problem_results)) in rows.into_iter().enumerate() {
            if previous != Some((score, penalty)) {
                rank = idx as u32 + 1;
                previous = Some((score, penalty));
            }
            let team = &self.teams[t];
            let school_rank = if !team.is_unofficial()
                && ranked_schools.insert(team.organization.as_str())
            {
                Some(ranked_schools.len() as u32)
            } else {
                None
            };
            results.push(TeamResult {
                rank,
                team: team.clone(),
                score,
                total_time: penalty,
                school_rank,
                problem_results,
            });
        }

        ScoreboardPayload {
            contest_name: CONTEST_NAME.to_string(),
            problem_ids: self.problem_ids.clone(),
            balloon_colors: BALLOONS
                .iter()
                .take(self.problem_ids.len())
                .map(|(bg, fg)| BalloonColor {
                    background_color: Some(bg.to_string()),
                    text_color: fg.map(str::to_string),
                })
                .collect(),
            results,
        }
    }

    fn build_statistics(&self, filter: FilterSelection, at: i64) -> StatisticsPayload {
        let board = self.build_scoreboard(filter, at);
        let admitted: HashSet<usize> = self
            .teams
            .iter()
            .enumerate()
            .filter(|(_, team)| filter.admits(team))
            .map(|(idx, _)| idx)
            .collect();

        let problem_count = self.problem_ids.len();
        let elapsed = (at - self.window.start_time).clamp(0, self.window.duration());
        let buckets = (self.window.duration() + HEATMAP_BUCKET_SECS - 1) / HEATMAP_BUCKET_SECS;
        let mut heatmap = vec![vec![0u64; buckets.max(1) as usize]; problem_count];
        let mut stats: Vec<ProblemStat> = self
            .problem_ids
            .iter()
            .map(|id| ProblemStat {
                problem_id: id.clone(),
                total: 0,
                accepted: 0,
                rejected: 0,
                pending: 0,
            })
            .collect();
        let mut types: BTreeMap<String, u64> = BTreeMap::new();
        let mut total = 0;
        let mut accepted = 0;

        for sub in self.visible_until(at).filter(|s| admitted.contains(&s.team)) {
            total += 1;
            let stat = &mut stats[sub.problem];
            stat.total += 1;
            let kind = if self.is_hidden(sub) {
                stat.pending += 1;
                "frozen"
            } else if sub.verdict == Verdict::Accepted {
                stat.accepted += 1;
                accepted += 1;
                let bucket = ((sub.at - self.window.start_time) / HEATMAP_BUCKET_SECS) as usize;
                if let Some(cell) = heatmap[sub.problem].get_mut(bucket) {
                    *cell += 1;
                }
                sub.verdict.kind()
            } else {
                stat.rejected += 1;
                sub.verdict.kind()
            };
            *types.entry(kind.to_string()).or_insert(0) += 1;
        }

        let mut solved_count: BTreeMap<u32, u64> = BTreeMap::new();
        for row in &board.results {
            *solved_count.entry(row.score).or_insert(0) += 1;
        }

        let shown_buckets = ((elapsed + HEATMAP_BUCKET_SECS - 1) / HEATMAP_BUCKET_SECS).max(1) as usize;
        for row in &mut heatmap {
            row.truncate(shown_buckets);
        }
        let time_labels = (0..shown_buckets)
            .map(|b| {
                let minutes = b as i64 * HEATMAP_BUCKET_SECS / 60;
                format!("{}:{:02}", minutes / 60, minutes % 60)
            })
            .collect();

        StatisticsPayload {
            total_teams: admitted.len() as u32,
            total_submissions: total,
            accepted_submissions: accepted,
            problem_count: problem_count as u32,
            problem_stats: stats,
            submission_types: types,
            team_solved_count: solved_count,
            problem_heatmap: Some(heatmap),
            time_labels: Some(time_labels),
        }
    }

    fn build_submissions(
        &self,
        filter: FilterSelection,
        page: u32,
        page_size: u32,
        at: i64,
    ) -> SubmissionsPayload {
        let page_size = page_size.max(1);
        let matching: Vec<&DemoSubmission> = self
            .visible_until(at)
            .filter(|s| filter.admits(&self.teams[s.team]))
            .collect();
        let total_items = matching.len() as u64;
        let total_pages = (matching.len() as u32).div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);

        let submissions = matching
            .into_iter()
            .rev()
            .skip(((page - 1) * page_size) as usize)
            .take(page_size as usize)
            .map(|sub| {
                let team = &self.teams[sub.team];
                Submission {
                    id: sub.id.to_string(),
                    timestamp: sub.at * 1000,
                    problem_id: self.problem_ids[sub.problem].clone(),
                    status: if self.is_hidden(sub) {
                        "FROZEN".to_string()
                    } else {
                        sub.verdict.status().to_string()
                    },
                    language: Some(sub.language.to_string()),
                    team_name: team.name.clone(),
                    school: team.organization.clone(),
                    is_filtered: false,
                }
            })
            .collect();

        SubmissionsPayload {
            submissions,
            pagination: Some(Pagination {
                current_page: page,
                total_pages,
                page_size,
                total_items,
            }),
        }
    }
}

impl BoardSource for DemoFeed {
    fn scoreboard(
        &mut self,
        filter: FilterSelection,
        time: Option<i64>,
    ) -> BoardResult<ScoreboardPayload> {
        let now = self.now();
        let at = time.unwrap_or(now).min(now);
        Ok(self.build_scoreboard(filter, at))
    }

    fn statistics(&mut self, filter: FilterSelection) -> BoardResult<StatisticsPayload> {
        let now = self.now();
        Ok(self.build_statistics(filter, now))
    }

    fn submissions(
        &mut self,
        filter: FilterSelection,
        page: u32,
        page_size: u32,
    ) -> BoardResult<SubmissionsPayload> {
        let now = self.now();
        Ok(self.build_submissions(filter, page, page_size, now))
    }
}
