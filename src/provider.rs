use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api::{self, ApiEndpoints};
use crate::error::BoardResult;
use crate::filter::FilterSelection;
use crate::payload::{ScoreboardPayload, StatisticsPayload, SubmissionsPayload};
use crate::state::{Delta, FetchRequest, ProviderCommand};

/// Where the worker gets payloads from. Calls block; they only ever run on
/// the provider thread.
pub trait BoardSource: Send {
    fn scoreboard(
        &mut self,
        filter: FilterSelection,
        time: Option<i64>,
    ) -> BoardResult<ScoreboardPayload>;

    fn statistics(&mut self, filter: FilterSelection) -> BoardResult<StatisticsPayload>;

    fn submissions(
        &mut self,
        filter: FilterSelection,
        page: u32,
        page_size: u32,
    ) -> BoardResult<SubmissionsPayload>;
}

pub struct HttpSource {
    endpoints: ApiEndpoints,
}

impl HttpSource {
    pub fn new(endpoints: ApiEndpoints) -> Self {
        Self { endpoints }
    }
}

impl BoardSource for HttpSource {
    fn scoreboard(
        &mut self,
        filter: FilterSelection,
        time: Option<i64>,
    ) -> BoardResult<ScoreboardPayload> {
        api::fetch_scoreboard(&self.endpoints, filter, time)
    }

    fn statistics(&mut self, filter: FilterSelection) -> BoardResult<StatisticsPayload> {
        api::fetch_statistics(&self.endpoints, filter)
    }

    fn submissions(
        &mut self,
        filter: FilterSelection,
        page: u32,
        page_size: u32,
    ) -> BoardResult<SubmissionsPayload> {
        api::fetch_submissions(&self.endpoints, filter, page, page_size)
    }
}

pub fn spawn_provider<S>(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, mut source: S)
where
    S: BoardSource + 'static,
{
    thread::spawn(move || {
        // Ends when the controller drops its sender.
        while let Ok(first) = cmd_rx.recv() {
            let mut batch = vec![first];
            while let Ok(cmd) = cmd_rx.try_recv() {
                batch.push(cmd);
            }
            let skipped = batch.len();
            let batch = coalesce(batch);
            if skipped > batch.len() {
                let _ = tx.send(Delta::Log(format!(
                    "[INFO] Skipped {} superseded request(s)",
                    skipped - batch.len()
                )));
            }
            for cmd in batch {
                if tx.send(execute(&mut source, cmd)).is_err() {
                    return;
                }
            }
        }
    });
}

fn execute<S: BoardSource + ?Sized>(source: &mut S, cmd: ProviderCommand) -> Delta {
    let ProviderCommand::Fetch { ticket, request } = cmd;
    match request {
        FetchRequest::Scoreboard { filter, time } => Delta::Scoreboard {
            ticket,
            filter,
            result: source.scoreboard(filter, time),
        },
        FetchRequest::Statistics { filter } => Delta::Statistics {
            ticket,
            filter,
            result: source.statistics(filter),
        },
        FetchRequest::Submissions {
            filter,
            page,
            page_size,
        } => Delta::Submissions {
            ticket,
            filter,
            result: source.submissions(filter, page, page_size),
        },
    }
}

/// Keeps only the newest command per category. An older one would be
/// discarded as stale on arrival anyway.
pub fn coalesce(batch: Vec<ProviderCommand>) -> Vec<ProviderCommand> {
    let mut newest: HashMap<_, ProviderCommand> = HashMap::new();
    for cmd in batch {
        let ProviderCommand::Fetch { ticket, .. } = cmd;
        let newer_kept = newest
            .get(&ticket.category)
            .is_some_and(|ProviderCommand::Fetch { ticket: kept, .. }| kept.seq > ticket.seq);
        if !newer_kept {
            newest.insert(ticket.category, cmd);
        }
    }
    let mut out: Vec<ProviderCommand> = newest.into_values().collect();
    out.sort_by_key(|ProviderCommand::Fetch { ticket, .. }| ticket.seq);
    out
}
