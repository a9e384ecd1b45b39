use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use reqwest::Url;

use scoreboard_terminal::address_bar::AddressBar;
use scoreboard_terminal::controller::ViewController;
use scoreboard_terminal::error::BoardError;
use scoreboard_terminal::filter::{FilterSelection, ViewMode};
use scoreboard_terminal::payload::{parse_scoreboard_json, parse_submissions_json};
use scoreboard_terminal::poll::RequestTicket;
use scoreboard_terminal::state::{
    Delta, FetchRequest, PanelStatus, ProviderCommand, ScrubState, apply_delta,
};
use scoreboard_terminal::time_oracle::ContestWindow;

// Contest runs from t=1000s to t=19000s and freezes four hours in.
const NOW_MS: i64 = 5_000_000;
const NOW: i64 = 5_000;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn controller_at(url: &str) -> (ViewController, Receiver<ProviderCommand>) {
    let (tx, rx) = mpsc::channel();
    let window = ContestWindow::new("c1", 1_000, 19_000, Some(14_400)).expect("valid window");
    let address = AddressBar::new(Url::parse(url).expect("valid url"));
    let state = scoreboard_terminal::state::BoardState::new(window, address, 15);
    (ViewController::new(state, Some(tx)), rx)
}

fn controller() -> (ViewController, Receiver<ProviderCommand>) {
    controller_at("http://host/contest/c1")
}

fn drain(rx: &Receiver<ProviderCommand>) -> Vec<(RequestTicket, FetchRequest)> {
    rx.try_iter()
        .map(|cmd| match cmd {
            ProviderCommand::Fetch { ticket, request } => (ticket, request),
        })
        .collect()
}

fn scoreboard_ok(ticket: RequestTicket, filter: FilterSelection) -> Delta {
    let payload = parse_scoreboard_json(&read_fixture("scoreboard.json")).expect("parse");
    Delta::Scoreboard {
        ticket,
        filter,
        result: Ok(payload),
    }
}

#[test]
fn start_loads_the_view_named_by_the_address() {
    let (mut ctl, rx) = controller_at("http://host/contest/c1?filter=girls&view=statistics");
    ctl.start(NOW_MS);
    let sent = drain(&rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].1,
        FetchRequest::Statistics {
            filter: FilterSelection::Girls
        }
    );
    assert_eq!(ctl.state.statistics_status, PanelStatus::Loading);
}

#[test]
fn double_click_on_a_filter_issues_one_fetch() {
    let (mut ctl, rx) = controller();
    ctl.start(NOW_MS);
    ctl.select_filter(FilterSelection::Girls);
    ctl.select_filter(FilterSelection::Girls);

    let sent = drain(&rx);
    assert_eq!(sent.len(), 2, "initial load plus one filter fetch");
    assert_eq!(
        sent[1].1,
        FetchRequest::Scoreboard {
            filter: FilterSelection::Girls,
            time: None
        }
    );
    assert_eq!(ctl.state.address.history_len(), 2);
    assert_eq!(ctl.state.address.current().query(), Some("filter=girls"));
}

#[test]
fn only_the_latest_overlapping_response_is_rendered() {
    let (mut ctl, rx) = controller();
    ctl.start(NOW_MS);
    ctl.select_filter(FilterSelection::Girls);
    let sent = drain(&rx);
    let (all_ticket, girls_ticket) = (sent[0].0, sent[1].0);
    assert!(girls_ticket.seq > all_ticket.seq);

    // The "all" response lands first but is already outdated.
    apply_delta(&mut ctl.state, scoreboard_ok(all_ticket, FilterSelection::All));
    assert!(ctl.state.table.is_none());
    assert_eq!(ctl.state.scoreboard_status, PanelStatus::Loading);

    apply_delta(&mut ctl.state, scoreboard_ok(girls_ticket, FilterSelection::Girls));
    assert_eq!(ctl.state.scoreboard_status, PanelStatus::Ready);
    assert_eq!(ctl.state.store.version(), girls_ticket.seq);
    let table = ctl.state.table.as_ref().expect("table rendered");
    assert_eq!(table.caption.as_deref(), Some("Girls"));
    assert_eq!(ctl.state.contest_name, "Spring Regional");
}

#[test]
fn late_stale_response_does_not_overwrite_newer_board() {
    let (mut ctl, rx) = controller();
    ctl.start(NOW_MS);
    ctl.select_filter(FilterSelection::Official);
    let sent = drain(&rx);

    apply_delta(&mut ctl.state, scoreboard_ok(sent[1].0, FilterSelection::Official));
    apply_delta(&mut ctl.state, scoreboard_ok(sent[0].0, FilterSelection::All));

    let table = ctl.state.table.as_ref().expect("table rendered");
    assert_eq!(table.caption.as_deref(), Some("Official"));
    assert_eq!(ctl.state.store.version(), sent[1].0.seq);
    assert!(
        ctl.state
            .logs
            .iter()
            .any(|line| line.contains("Dropped stale"))
    );
}

#[test]
fn scrub_previews_locally_and_fetches_once_on_release() {
    let (mut ctl, rx) = controller();
    ctl.start(NOW_MS);
    let first = drain(&rx);
    apply_delta(&mut ctl.state, scoreboard_ok(first[0].0, FilterSelection::All));

    assert!(ctl.begin_scrub(0.1, NOW));
    ctl.scrub_to(0.15, NOW);
    ctl.scrub_to(0.2, NOW);
    assert!(drain(&rx).is_empty(), "dragging never fetches");
    assert_eq!(ctl.display_time(NOW), 4_600);

    ctl.release_scrub(NOW);
    assert_eq!(ctl.state.scrub, ScrubState::Idle);
    assert_eq!(ctl.state.pinned_time, Some(4_600));
    let sent = drain(&rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].1,
        FetchRequest::Scoreboard {
            filter: FilterSelection::All,
            time: Some(4_600)
        }
    );
    assert_eq!(ctl.display_time(NOW), 4_600);

    // Pinned boards are not polled.
    ctl.tick(NOW_MS + 60_000);
    assert!(drain(&rx).is_empty());

    ctl.go_live();
    assert_eq!(ctl.state.pinned_time, None);
    let sent = drain(&rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].1,
        FetchRequest::Scoreboard {
            filter: FilterSelection::All,
            time: None
        }
    );
}

#[test]
fn release_at_the_live_edge_unpins() {
    let (mut ctl, rx) = controller();
    ctl.start(NOW_MS);
    drain(&rx);

    assert!(ctl.begin_scrub(0.2, NOW));
    ctl.release_scrub(NOW);
    assert_eq!(ctl.state.pinned_time, Some(4_600));

    assert!(ctl.begin_scrub(1.0, NOW));
    ctl.release_scrub(NOW);
    assert_eq!(ctl.state.pinned_time, None);
}

#[test]
fn scrub_is_ignored_before_start_and_outside_rank_view() {
    let (mut ctl, _rx) = controller();
    ctl.start(NOW_MS);
    assert!(!ctl.begin_scrub(0.5, 500));
    assert_eq!(ctl.state.scrub, ScrubState::Idle);

    ctl.switch_view(ViewMode::Statistics);
    assert!(!ctl.begin_scrub(0.5, NOW));

    // Releasing without a drag is a no-op.
    ctl.release_scrub(NOW);
    assert_eq!(ctl.state.pinned_time, None);
}

#[test]
fn failed_load_can_be_retried() {
    let (mut ctl, rx) = controller();
    ctl.start(NOW_MS);
    let sent = drain(&rx);

    apply_delta(
        &mut ctl.state,
        Delta::Scoreboard {
            ticket: sent[0].0,
            filter: FilterSelection::All,
            result: Err(BoardError::network("connection refused")),
        },
    );
    let err = ctl
        .state
        .scoreboard_status
        .error()
        .expect("status should carry the error");
    assert_eq!(err.kind_label(), "NETWORK");
    assert!(ctl.state.logs.iter().any(|line| line.starts_with("[ERROR]")));

    ctl.retry();
    let again = drain(&rx);
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].1, sent[0].1);
    assert!(again[0].0.seq > sent[0].0.seq);
    assert_eq!(ctl.state.scoreboard_status, PanelStatus::Loading);
}

#[test]
fn submissions_paging_follows_the_pager() {
    let (mut ctl, rx) = controller_at("http://host/contest/c1?view=submissions");
    ctl.start(NOW_MS);
    let sent = drain(&rx);
    assert_eq!(
        sent[0].1,
        FetchRequest::Submissions {
            filter: FilterSelection::All,
            page: 1,
            page_size: 15
        }
    );

    // No pager yet, so there is nothing to advance to.
    ctl.next_page();
    assert!(drain(&rx).is_empty());

    let page = parse_submissions_json(&read_fixture("submissions.json")).expect("parse");
    apply_delta(
        &mut ctl.state,
        Delta::Submissions {
            ticket: sent[0].0,
            filter: FilterSelection::All,
            result: Ok(page),
        },
    );
    assert_eq!(ctl.state.submissions_status, PanelStatus::Ready);

    ctl.next_page();
    let sent = drain(&rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].1,
        FetchRequest::Submissions {
            filter: FilterSelection::All,
            page: 2,
            page_size: 15
        }
    );
    assert_eq!(
        ctl.state.address.current().query(),
        Some("view=submissions&page=2")
    );

    ctl.prev_page();
    assert_eq!(ctl.state.query.page, 1);
    assert_eq!(ctl.state.address.current().query(), Some("view=submissions"));
    assert_eq!(drain(&rx).len(), 1);
}

#[test]
fn changing_filter_resets_the_page() {
    let (mut ctl, rx) = controller_at("http://host/contest/c1?view=submissions&page=3");
    ctl.start(NOW_MS);
    assert_eq!(ctl.state.query.page, 3);
    ctl.select_filter(FilterSelection::Undergraduate);
    assert_eq!(ctl.state.query.page, 1);
    let sent = drain(&rx);
    assert_eq!(
        sent.last().map(|(_, request)| *request),
        Some(FetchRequest::Submissions {
            filter: FilterSelection::Undergraduate,
            page: 1,
            page_size: 15
        })
    );
}

#[test]
fn history_back_restores_the_previous_view() {
    let (mut ctl, rx) = controller();
    ctl.start(NOW_MS);
    let first = drain(&rx);
    apply_delta(&mut ctl.state, scoreboard_ok(first[0].0, FilterSelection::All));

    ctl.switch_view(ViewMode::Statistics);
    assert_eq!(ctl.state.address.history_len(), 2);
    drain(&rx);

    ctl.history_back();
    assert_eq!(ctl.state.query.view, ViewMode::Rank);
    let sent = drain(&rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1.category(), first[0].1.category());

    ctl.history_forward();
    assert_eq!(ctl.state.query.view, ViewMode::Statistics);
}

#[test]
fn phase_change_refreshes_and_rewrites_the_address_in_place() {
    // A non-canonical filter value normalizes to "all".
    let (mut ctl, rx) = controller_at("http://host/contest/c1?filter=Girls");
    let before_freeze = (1_000 + 14_400 - 1) * 1000;
    ctl.start(before_freeze);
    let first = drain(&rx);
    assert_eq!(
        first[0].1,
        FetchRequest::Scoreboard {
            filter: FilterSelection::All,
            time: None
        }
    );
    apply_delta(&mut ctl.state, scoreboard_ok(first[0].0, FilterSelection::All));

    ctl.tick(before_freeze + 1_000);
    assert_eq!(drain(&rx).len(), 1);
    assert_eq!(ctl.state.address.history_len(), 1);
    assert_eq!(ctl.state.address.current().as_str(), "http://host/contest/c1");
    assert!(ctl.state.logs.iter().any(|line| line.contains("FROZEN")));
}

#[test]
fn periodic_refresh_skips_other_views() {
    let (mut ctl, rx) = controller_at("http://host/contest/c1?view=statistics");
    ctl.start(NOW_MS);
    drain(&rx);
    ctl.tick(NOW_MS + 60_000);
    assert!(drain(&rx).is_empty());
}

#[test]
fn missing_provider_fails_the_panel() {
    let window = ContestWindow::new("c1", 1_000, 19_000, None).expect("valid window");
    let address = AddressBar::new(Url::parse("http://host/contest/c1").expect("valid url"));
    let state = scoreboard_terminal::state::BoardState::new(window, address, 15);
    let mut ctl = ViewController::new(state, None);
    ctl.start(NOW_MS);
    assert!(matches!(
        ctl.state.scoreboard_status,
        PanelStatus::Failed(BoardError::Network(_))
    ));
    assert!(
        ctl.state
            .logs
            .iter()
            .any(|line| line.starts_with("[ERROR]") && line.contains("no provider running"))
    );
}

#[test]
fn closed_provider_channel_is_logged_as_an_error() {
    let (mut ctl, rx) = controller();
    drop(rx);
    ctl.start(NOW_MS);
    assert!(ctl.state.scoreboard_status.error().is_some());
    assert!(
        ctl.state
            .logs
            .iter()
            .any(|line| line.starts_with("[ERROR]") && line.contains("provider stopped"))
    );
}

#[test]
fn failed_fetch_replaces_the_previous_board() {
    let (mut ctl, rx) = controller();
    ctl.start(NOW_MS);
    let first = drain(&rx);
    apply_delta(&mut ctl.state, scoreboard_ok(first[0].0, FilterSelection::All));
    assert!(ctl.state.table.is_some());

    ctl.select_filter(FilterSelection::Girls);
    let sent = drain(&rx);
    apply_delta(
        &mut ctl.state,
        Delta::Scoreboard {
            ticket: sent[0].0,
            filter: FilterSelection::Girls,
            result: Err(BoardError::network("boom")),
        },
    );
    assert!(ctl.state.scoreboard_status.error().is_some());
    assert!(ctl.state.table.is_none(), "the all-teams board must not linger");
}

#[test]
fn provider_worker_answers_from_the_demo_feed() {
    use std::time::Duration;

    use scoreboard_terminal::demo_feed::DemoFeed;
    use scoreboard_terminal::provider::spawn_provider;

    let now = 1_700_000_000;
    let window = DemoFeed::demo_window(now).expect("demo window");
    let feed = DemoFeed::new(window.clone(), 7).with_clock(now);

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (delta_tx, delta_rx) = mpsc::channel();
    spawn_provider(delta_tx, cmd_rx, feed);

    let address = AddressBar::new(Url::parse("http://localhost/contest/demo").expect("valid url"));
    let state = scoreboard_terminal::state::BoardState::new(window, address, 15);
    let mut ctl = ViewController::new(state, Some(cmd_tx));
    ctl.start(now * 1000);

    let delta = delta_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("provider should answer");
    apply_delta(&mut ctl.state, delta);
    assert_eq!(ctl.state.scoreboard_status, PanelStatus::Ready);
    let table = ctl.state.table.as_ref().expect("table rendered");
    assert_eq!(table.headers.len(), 8);
    assert_eq!(table.team_rows().count(), 36);
}
