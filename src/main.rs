use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table,
};
use reqwest::Url;

use scoreboard_terminal::address_bar::AddressBar;
use scoreboard_terminal::api::{self, ApiEndpoints};
use scoreboard_terminal::config::{AppConfig, load_dotenv};
use scoreboard_terminal::contest_page::window_from_page;
use scoreboard_terminal::controller::ViewController;
use scoreboard_terminal::demo_feed::DemoFeed;
use scoreboard_terminal::filter::{FilterSelection, ViewMode};
use scoreboard_terminal::http_client;
use scoreboard_terminal::panels::{StatisticsView, StatusKind, SubmissionsView};
use scoreboard_terminal::poll::RequestCategory;
use scoreboard_terminal::provider::{HttpSource, spawn_provider};
use scoreboard_terminal::render::{FIXED_HEADERS, ProblemCell, Rgb, ScoreboardTable, TableRow};
use scoreboard_terminal::state::{BoardState, Delta, PanelStatus, ScrubState, apply_delta};
use scoreboard_terminal::time_oracle::{
    ContestPhase, format_hms, now_epoch_millis, now_epoch_secs, phase, phase_label,
};

const DEMO_PAGE_URL: &str = "http://demo.local/contest/demo";
// Keyboard scrub step as a fraction of the contest.
const SCRUB_STEP: f64 = 1.0 / 60.0;

struct App {
    controller: ViewController,
    should_quit: bool,
    scroll: usize,
    progress_area: Rect,
}

impl App {
    fn new(controller: ViewController) -> Self {
        Self {
            controller,
            should_quit: false,
            scroll: 0,
            progress_area: Rect::default(),
        }
    }

    fn state(&self) -> &BoardState {
        &self.controller.state
    }

    fn on_key(&mut self, key: KeyEvent) {
        let now = now_epoch_secs();
        let ctl = &mut self.controller;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => ctl.switch_view(ViewMode::Rank),
            KeyCode::Char('2') => ctl.switch_view(ViewMode::Statistics),
            KeyCode::Char('3') => ctl.switch_view(ViewMode::Submissions),
            KeyCode::Char('f') => ctl.cycle_filter(),
            KeyCode::Char('a') => ctl.select_filter(FilterSelection::All),
            KeyCode::Char('o') => ctl.select_filter(FilterSelection::Official),
            KeyCode::Char('u') => ctl.select_filter(FilterSelection::Unofficial),
            KeyCode::Char('g') => ctl.select_filter(FilterSelection::Girls),
            KeyCode::Char('c') => ctl.select_filter(FilterSelection::Undergraduate),
            KeyCode::Char('v') => ctl.select_filter(FilterSelection::Special),
            KeyCode::Char('r') => ctl.retry(),
            KeyCode::Char('l') => ctl.go_live(),
            KeyCode::Char('n') | KeyCode::PageDown => ctl.next_page(),
            KeyCode::Char('p') | KeyCode::PageUp => ctl.prev_page(),
            KeyCode::Char('b') | KeyCode::Backspace => ctl.history_back(),
            KeyCode::Char('w') => ctl.history_forward(),
            KeyCode::Char(',') | KeyCode::Left => self.step_scrub(-SCRUB_STEP, now),
            KeyCode::Char('.') | KeyCode::Right => self.step_scrub(SCRUB_STEP, now),
            KeyCode::Enter => self.controller.release_scrub(now),
            KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Char('?') => {
                let state = &mut self.controller.state;
                state.help_overlay = !state.help_overlay;
            }
            _ => {}
        }
    }

    fn step_scrub(&mut self, step: f64, now: i64) {
        let window = &self.controller.state.window;
        let shown = self.controller.display_time(now);
        let fraction = window.progress_fraction(shown) + step;
        self.controller.begin_scrub(fraction, now);
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let area = self.progress_area;
        let now = now_epoch_secs();
        let inside = mouse.row == area.y
            && mouse.column >= area.x
            && mouse.column < area.x + area.width;
        let fraction = if area.width > 1 {
            mouse.column.saturating_sub(area.x) as f64 / (area.width - 1) as f64
        } else {
            0.0
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                self.controller.begin_scrub(fraction, now);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.controller.scrub_to(fraction, now),
            MouseEventKind::Up(MouseButton::Left) => self.controller.release_scrub(now),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    load_dotenv();
    let config = AppConfig::from_env();
    http_client::configure_timeout(config.request_timeout);

    let page_url = std::env::args().nth(1).or_else(|| config.page_url.clone());
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let mut startup_logs = Vec::new();

    let state = match page_url.filter(|_| !config.demo) {
        Some(raw) => {
            let url = Url::parse(&raw).with_context(|| format!("invalid contest page url {raw}"))?;
            let html = match api::fetch_contest_page(&url) {
                Ok(html) => Some(html),
                Err(err) => {
                    startup_logs.push(format!("[WARN] Contest page unavailable: {err}"));
                    None
                }
            };
            let window = window_from_page(html.as_deref(), config.contest_fallback.clone())
                .context("cannot determine the contest window")?;
            let endpoints = ApiEndpoints::new(&url, window.id.clone());
            spawn_provider(tx, cmd_rx, HttpSource::new(endpoints));
            BoardState::new(window, AddressBar::new(url), config.page_size)
        }
        None => {
            let window = DemoFeed::demo_window(now_epoch_secs())?;
            let feed = DemoFeed::new(window.clone(), rand::random());
            startup_logs.push(format!(
                "[INFO] Demo contest, {}s long",
                feed.window().duration()
            ));
            spawn_provider(tx, cmd_rx, feed);
            let url = Url::parse(DEMO_PAGE_URL).context("demo url")?;
            BoardState::new(window, AddressBar::new(url), config.page_size)
        }
    };

    let mut controller = ViewController::new(state, Some(cmd_tx));
    for line in startup_logs {
        controller.state.push_log(line);
    }
    controller.start(now_epoch_millis());
    let mut app = App::new(controller);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.controller.state, delta);
        }

        app.controller.tick(now_epoch_millis());

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let now = now_epoch_secs();
    let header = Paragraph::new(header_text(app, now))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    app.progress_area = chunks[1];
    frame.render_widget(progress_gauge(app, now), chunks[1]);
    frame.render_widget(Paragraph::new(tabs_line(app.state())), chunks[2]);

    let state = app.state();
    let body = chunks[3];
    match state.query.view {
        ViewMode::Rank => render_rank(frame, body, state, app.scroll),
        ViewMode::Statistics => render_statistics(frame, body, state),
        ViewMode::Submissions => render_submissions(frame, body, state),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[4]);

    let footer = Paragraph::new(footer_text(state.query.view))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[5]);

    if state.help_overlay {
        let area = frame.size();
        render_help_overlay(frame, area);
    }
}

fn header_text(app: &App, now: i64) -> String {
    let state = app.state();
    let window = &state.window;
    let shown = app.controller.display_time(now);
    let name = if state.contest_name.is_empty() {
        window.id.clone()
    } else {
        state.contest_name.clone()
    };
    let mode = match state.scrub {
        ScrubState::Dragging { .. } => " | PREVIEW",
        ScrubState::Idle if state.pinned_time.is_some() => " | PINNED (l: live)",
        ScrubState::Idle => "",
    };
    let line1 = format!(
        "{name} | {}{mode} | Elapsed {} | Remaining {}",
        phase_label(phase(now, window)),
        format_hms(window.elapsed(shown)),
        format_hms(window.remaining(shown)),
    );
    let line2 = state.address.current().to_string();
    format!("{line1}\n{line2}")
}

fn progress_gauge(app: &App, now: i64) -> Gauge<'static> {
    let window = &app.state().window;
    let shown = app.controller.display_time(now);
    let ratio = window.progress_fraction(shown).clamp(0.0, 1.0);
    let color = match phase(shown, window) {
        ContestPhase::Frozen => Color::LightBlue,
        ContestPhase::Ended => Color::DarkGray,
        _ => Color::Green,
    };
    Gauge::default()
        .ratio(ratio)
        .label(format!("{:.1}%", ratio * 100.0))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
}

fn tabs_line(state: &BoardState) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, view, label) in [
        ('1', ViewMode::Rank, "Rank"),
        ('2', ViewMode::Statistics, "Statistics"),
        ('3', ViewMode::Submissions, "Submissions"),
    ] {
        let style = if state.query.view == view {
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {key} {label} "), style));
    }
    spans.push(Span::raw(" | "));
    for filter in FilterSelection::ALL {
        let style = if state.query.filter == filter {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", filter.as_str()), style));
    }
    Line::from(spans)
}

fn panel_title(base: &str, caption: Option<&str>, status: &PanelStatus) -> String {
    let mut title = base.to_string();
    if let Some(caption) = caption {
        title.push_str(&format!(" [{caption}]"));
    }
    if *status == PanelStatus::Loading {
        title.push_str(" (loading)");
    }
    title
}

/// Draws the error in place of the panel when its last fetch failed.
/// Returns `true` when the panel body was replaced.
fn error_panel(frame: &mut Frame, area: Rect, title: &str, status: &PanelStatus) -> bool {
    let Some(err) = status.error() else {
        return false;
    };
    let text = format!("{err}\n\nPress r to retry.");
    let panel = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(panel, area);
    true
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn cell_style(cell: &ProblemCell) -> Style {
    match cell {
        ProblemCell::Empty => Style::default(),
        ProblemCell::Solved {
            first_to_solve: true,
            ..
        } => Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(0x00, 0x64, 0x00))
            .add_modifier(Modifier::BOLD),
        ProblemCell::Solved { .. } => Style::default().fg(Color::Black).bg(Color::LightGreen),
        ProblemCell::Failed { .. } => Style::default().fg(Color::White).bg(Color::Red),
        ProblemCell::FailedPending { .. } | ProblemCell::Pending { .. } => {
            Style::default().fg(Color::Black).bg(Color::LightBlue)
        }
    }
}

fn render_rank(frame: &mut Frame, area: Rect, state: &BoardState, scroll: usize) {
    let status = state.status(RequestCategory::Scoreboard);
    if error_panel(frame, area, "Scoreboard", status) {
        return;
    }
    let Some(table) = state.table.as_ref() else {
        let msg = Paragraph::new("Waiting for the scoreboard...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Scoreboard").borders(Borders::ALL));
        frame.render_widget(msg, area);
        return;
    };
    frame.render_widget(scoreboard_widget(table, status, scroll), area);
}

fn scoreboard_widget<'a>(table: &'a ScoreboardTable, status: &PanelStatus, scroll: usize) -> Table<'a> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut header: Vec<Cell> = FIXED_HEADERS
        .iter()
        .map(|h| Cell::from(*h).style(bold))
        .collect();
    for problem in &table.headers {
        header.push(
            Cell::from(format!("{} {}", problem.problem_id, problem.solved_count)).style(
                Style::default()
                    .fg(rgb(problem.foreground))
                    .bg(rgb(problem.background))
                    .add_modifier(Modifier::BOLD),
            ),
        );
    }

    let rows: Vec<Row> = table
        .rows
        .iter()
        .skip(scroll.min(table.rows.len().saturating_sub(1)))
        .map(|row| match row {
            TableRow::Team(team) => {
                let school = match team.school_rank_badge {
                    Some(rank) => format!("{} ({rank})", team.organization),
                    None => team.organization.clone(),
                };
                let badges: Vec<&str> = team.badges.iter().map(|b| b.label()).collect();
                let name = if badges.is_empty() {
                    team.team_name.clone()
                } else {
                    format!("{} [{}]", team.team_name, badges.join(" "))
                };
                let mut cells = vec![
                    Cell::from(team.rank.to_string()),
                    Cell::from(school),
                    Cell::from(name),
                    Cell::from(team.score.to_string()),
                    Cell::from(team.total_time.to_string()),
                ];
                cells.extend(
                    team.cells
                        .iter()
                        .map(|cell| Cell::from(cell.text()).style(cell_style(cell))),
                );
                Row::new(cells)
            }
            TableRow::Empty { message, .. } => {
                Row::new(vec![Cell::from(message.as_str())]).style(Style::default().fg(Color::DarkGray))
            }
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(5),
        Constraint::Length(24),
        Constraint::Min(18),
        Constraint::Length(6),
        Constraint::Length(8),
    ];
    widths.extend(table.headers.iter().map(|_| Constraint::Length(7)));

    Table::new(rows, widths).header(Row::new(header)).block(
        Block::default()
            .title(panel_title("Scoreboard", table.caption.as_deref(), status))
            .borders(Borders::ALL),
    )
}

fn render_statistics(frame: &mut Frame, area: Rect, state: &BoardState) {
    let status = state.status(RequestCategory::Statistics);
    if error_panel(frame, area, "Statistics", status) {
        return;
    }
    let Some(view) = state.statistics.as_ref() else {
        let msg = Paragraph::new("Loading statistics...")
            .block(Block::default().title("Statistics").borders(Borders::ALL));
        frame.render_widget(msg, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    let summary = Paragraph::new(statistics_text(view)).block(
        Block::default()
            .title(panel_title("Statistics", view.caption.as_deref(), status))
            .borders(Borders::ALL),
    );
    frame.render_widget(summary, columns[0]);

    let types: Vec<String> = view
        .submission_types
        .iter()
        .map(|share| format!("{:<14} {:>5} {:>5.1}%", share.label, share.count, share.percent))
        .collect();
    let types = Paragraph::new(types.join("\n"))
        .block(Block::default().title("Verdicts").borders(Borders::ALL));
    frame.render_widget(types, right[0]);

    let bars: Vec<Bar> = view
        .solved_distribution
        .iter()
        .map(|share| {
            Bar::default()
                .value(share.count)
                .label(Line::from(share.label.clone()))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(3)
        .bar_gap(1)
        .block(Block::default().title("Teams by solved").borders(Borders::ALL));
    frame.render_widget(chart, right[1]);
}

fn statistics_text(view: &StatisticsView) -> String {
    let mut lines = vec![
        format!("Teams: {}", view.total_teams),
        format!(
            "Submissions: {} | Accepted: {} ({:.1}%)",
            view.total_submissions, view.accepted_submissions, view.acceptance_percent
        ),
        String::new(),
        format!("{:<4} {:>6} {:>6} {:>6} {:>7}", "P", "AC", "Total", "Frozen", "Rate"),
    ];
    for problem in &view.problems {
        lines.push(format!(
            "{:<4} {:>6} {:>6} {:>6} {:>6.1}%",
            problem.problem_id, problem.accepted, problem.total, problem.pending, problem.percent
        ));
    }
    if let Some(heatmap) = view.heatmap.as_ref()
        && heatmap.max > 0
    {
        const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];
        lines.push(String::new());
        lines.push("Accepted over time:".to_string());
        for (problem_id, buckets) in &heatmap.rows {
            let strip: String = buckets
                .iter()
                .map(|count| SHADES[(count.saturating_mul(4).div_ceil(heatmap.max)) as usize])
                .collect();
            lines.push(format!("{problem_id:<4} |{strip}|"));
        }
    }
    lines.join("\n")
}

fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Accepted => Color::Green,
        StatusKind::WrongAnswer => Color::Red,
        StatusKind::LimitExceeded => Color::Yellow,
        StatusKind::RuntimeError => Color::Magenta,
        StatusKind::CompileError => Color::Gray,
        StatusKind::Frozen | StatusKind::Pending => Color::LightBlue,
        StatusKind::Other => Color::White,
    }
}

fn render_submissions(frame: &mut Frame, area: Rect, state: &BoardState) {
    let status = state.status(RequestCategory::Submissions);
    if error_panel(frame, area, "Submissions", status) {
        return;
    }
    let Some(view) = state.submissions.as_ref() else {
        let msg = Paragraph::new("Loading submissions...")
            .block(Block::default().title("Submissions").borders(Borders::ALL));
        frame.render_widget(msg, area);
        return;
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .title(panel_title("Submissions", view.caption.as_deref(), status))
        .borders(Borders::ALL);
    if let Some(message) = view.empty_message {
        frame.render_widget(Paragraph::new(message).block(block), parts[0]);
    } else {
        frame.render_widget(submissions_widget(view).block(block), parts[0]);
    }
    frame.render_widget(Paragraph::new(pager_line(view)), parts[1]);
}

fn submissions_widget(view: &SubmissionsView) -> Table<'_> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(
        ["ID", "Time", "Problem", "Status", "Lang", "Team", "School"]
            .into_iter()
            .map(|h| Cell::from(h).style(bold)),
    );
    let rows: Vec<Row> = view
        .rows
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.id.as_str()),
                Cell::from(s.time.as_str()),
                Cell::from(s.problem_id.as_str()),
                Cell::from(s.status.as_str()).style(Style::default().fg(status_color(s.status_kind))),
                Cell::from(s.language.as_str()),
                Cell::from(s.team_name.as_str()),
                Cell::from(s.school.as_str()),
            ])
        })
        .collect();
    Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(19),
            Constraint::Length(7),
            Constraint::Length(20),
            Constraint::Length(7),
            Constraint::Min(16),
            Constraint::Min(16),
        ],
    )
    .header(header)
}

fn pager_line(view: &SubmissionsView) -> Line<'static> {
    let Some(pager) = view.pager.as_ref() else {
        return Line::from("");
    };
    let mut spans = vec![Span::raw(if pager.has_prev() { "< p " } else { "    " })];
    if pager.show_first {
        spans.push(Span::raw(" 1 "));
    }
    if pager.leading_gap {
        spans.push(Span::raw(" .. "));
    }
    for page in &pager.pages {
        let style = if *page == pager.current {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    if pager.trailing_gap {
        spans.push(Span::raw(" .. "));
    }
    if pager.show_last {
        spans.push(Span::raw(format!(" {} ", pager.total_pages)));
    }
    spans.push(Span::raw(if pager.has_next() { " n >" } else { "" }));
    spans.push(Span::styled(
        format!("   {} submissions", pager.total_items),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

fn console_text(state: &BoardState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text(view: ViewMode) -> &'static str {
    match view {
        ViewMode::Rank => {
            "1/2/3 View | f Filter | ,/. Scrub Enter Apply | l Live | r Retry | b/w History | ? Help | q Quit"
        }
        ViewMode::Statistics => "1/2/3 View | f Filter | r Retry | b/w History | ? Help | q Quit",
        ViewMode::Submissions => {
            "1/2/3 View | f Filter | n/p Page | r Retry | b/w History | ? Help | q Quit"
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Scoreboard Terminal - Help",
        "",
        "Views:",
        "  1 / 2 / 3    Rank / Statistics / Submissions",
        "  b / w        History back / forward",
        "",
        "Filters:",
        "  f            Next filter",
        "  a o u        All / Official / Unofficial",
        "  g c v        Girls / Undergraduate / Vocational",
        "",
        "Rank view:",
        "  drag bar     Preview a past moment, release to load it",
        "  , / .        Step the preview, Enter loads it",
        "  l            Back to the live board",
        "  j/k or ↑/↓   Scroll",
        "",
        "  n / p        Next / previous submissions page",
        "  r            Retry after an error",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
