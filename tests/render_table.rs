use std::fs;
use std::path::PathBuf;

use scoreboard_terminal::panels::{render_statistics, render_submissions, StatusKind};
use scoreboard_terminal::payload::{
    parse_scoreboard_json, parse_statistics_json, parse_submissions_json,
};
use scoreboard_terminal::render::{
    DEFAULT_BALLOON, NO_DATA_MESSAGE, ProblemCell, Rgb, TableRow, TeamBadge, render_scoreboard,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn empty_results_render_one_spanning_row() {
    let payload = parse_scoreboard_json(&read_fixture("scoreboard_empty.json")).expect("parse");
    let table = render_scoreboard(&payload, None);
    assert_eq!(table.rows.len(), 1);
    match &table.rows[0] {
        TableRow::Empty { colspan, message } => {
            assert_eq!(*colspan, 8);
            assert_eq!(message, NO_DATA_MESSAGE);
        }
        other => panic!("expected empty row, got {other:?}"),
    }
    assert_eq!(table.column_count(), 8);
}

#[test]
fn rows_keep_payload_order_and_cells_follow_precedence() {
    let payload = parse_scoreboard_json(&read_fixture("scoreboard.json")).expect("parse");
    let table = render_scoreboard(&payload, Some("Girls"));
    assert_eq!(table.caption.as_deref(), Some("Girls"));

    let rows: Vec<_> = table.team_rows().collect();
    let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(names, vec!["Segment Tree Enjoyers", "Off By One", "Greedy Is Fine"]);

    assert_eq!(
        rows[0].cells,
        vec![
            ProblemCell::Solved {
                submissions: 2,
                minutes: 12,
                first_to_solve: true
            },
            ProblemCell::FailedPending {
                attempts: 2,
                pending: 1
            },
            ProblemCell::Empty,
        ]
    );
    assert_eq!(rows[0].cells[1].text(), "-2 +1");
    assert_eq!(rows[1].cells[2], ProblemCell::Pending { pending: 2 });
    assert_eq!(rows[2].cells[0], ProblemCell::Failed { attempts: 3 });
}

#[test]
fn school_badge_only_on_first_occurrence() {
    let payload = parse_scoreboard_json(&read_fixture("scoreboard.json")).expect("parse");
    let table = render_scoreboard(&payload, None);
    let badges: Vec<Option<u32>> = table.team_rows().map(|r| r.school_rank_badge).collect();
    assert_eq!(badges, vec![Some(1), None, Some(2)]);
}

#[test]
fn team_badges_are_independent() {
    let payload = parse_scoreboard_json(&read_fixture("scoreboard.json")).expect("parse");
    let table = render_scoreboard(&payload, None);
    let rows: Vec<_> = table.team_rows().collect();
    assert_eq!(rows[0].badges, vec![TeamBadge::Girl]);
    assert_eq!(
        rows[1].badges,
        vec![
            TeamBadge::Undergraduate,
            TeamBadge::Vocational,
            TeamBadge::Unofficial
        ]
    );
    assert!(rows[2].badges.is_empty());
}

#[test]
fn headers_count_solves_and_pick_contrasting_text() {
    let payload = parse_scoreboard_json(&read_fixture("scoreboard.json")).expect("parse");
    let table = render_scoreboard(&payload, None);

    let a = &table.headers[0];
    assert_eq!(a.solved_count, 2);
    assert_eq!(a.background, Rgb::WHITE);
    assert_eq!(a.foreground, Rgb::BLACK);

    // Explicit text color wins over luminance.
    let b = &table.headers[1];
    assert_eq!(b.solved_count, 0);
    assert_eq!(b.background, Rgb::BLACK);
    assert_eq!(b.foreground, Rgb::new(0xFF, 0xD7, 0x00));

    let c = &table.headers[2];
    assert_eq!(c.background, DEFAULT_BALLOON);
    assert_eq!(c.foreground, Rgb::WHITE);
}

#[test]
fn statistics_panel_orders_verdicts_and_fills_distribution() {
    let stats = parse_statistics_json(&read_fixture("statistics.json")).expect("parse");
    let view = render_statistics(&stats, None);

    let labels: Vec<&str> = view.submission_types.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Wrong answer", "Frozen", "Accepted", "Time limit"]);
    assert!((view.submission_types[0].percent - 41.666).abs() < 0.01);

    let counts: Vec<u64> = view.solved_distribution.iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![1, 2, 0, 0]);

    let heatmap = view.heatmap.expect("fixture has a heatmap");
    assert_eq!(heatmap.max, 1);
    assert_eq!(heatmap.rows[0].0, "A");
}

#[test]
fn submissions_panel_hides_filtered_rows() {
    let page = parse_submissions_json(&read_fixture("submissions.json")).expect("parse");
    let view = render_submissions(&page, Some("Official"));
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].status_kind, StatusKind::Frozen);
    assert_eq!(view.rows[1].language, "-");
    let pager = view.pager.expect("fixture has pagination");
    assert_eq!(pager.pages, vec![1, 2, 3, 4]);
    assert!(pager.has_prev() && pager.has_next());
}

#[test]
fn black_balloon_without_text_color_gets_white_text() {
    let raw = r##"{
        "contest": {
            "contest_name": "Night Round",
            "problem_id": ["A", "B"],
            "balloon_color": [
                { "background_color": "#000000" },
                { "background_color": "#FFFF00" }
            ]
        },
        "results": []
    }"##;
    let payload = parse_scoreboard_json(raw).expect("parse");
    let table = render_scoreboard(&payload, None);
    assert_eq!(table.headers[0].background, Rgb::BLACK);
    assert_eq!(table.headers[0].foreground, Rgb::WHITE);
    // Bright yellow is above the gray threshold.
    assert_eq!(table.headers[1].foreground, Rgb::BLACK);
}

#[test]
fn huge_verdict_counts_do_not_overflow_totals() {
    let raw = r#"{
        "problem_count": 1,
        "problem_stats": [{ "problem_id": "A" }],
        "submission_types": { "accepted": 18446744073709551615, "wrong_answer": 1 },
        "team_solved_count": { "0": 18446744073709551615, "1": 5 }
    }"#;
    let stats = parse_statistics_json(raw).expect("parse");
    let view = render_statistics(&stats, None);
    assert_eq!(view.submission_types[0].label, "Accepted");
    assert!((view.submission_types[0].percent - 100.0).abs() < 1e-9);
    assert_eq!(view.solved_distribution.len(), 2);
    assert_eq!(view.solved_distribution[1].count, 5);
}
