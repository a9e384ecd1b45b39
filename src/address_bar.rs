use reqwest::Url;

use crate::filter::ViewQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// User navigation: adds a history entry.
    Push,
    /// Programmatic refresh: rewrites the current entry in place.
    Replace,
}

/// Page address plus the session history the back/forward keys walk.
#[derive(Debug, Clone)]
pub struct AddressBar {
    entries: Vec<Url>,
    cursor: usize,
}

impl AddressBar {
    pub fn new(url: Url) -> Self {
        Self {
            entries: vec![url],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Url {
        &self.entries[self.cursor]
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    pub fn query(&self) -> ViewQuery {
        ViewQuery::parse_from_url(self.current())
    }

    pub fn push(&mut self, url: Url) {
        // Pushing the address already shown would only add a dead entry.
        if *self.current() == url {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url);
        self.cursor = self.entries.len() - 1;
    }

    pub fn replace(&mut self, url: Url) {
        self.entries[self.cursor] = url;
    }

    pub fn back(&mut self) -> Option<&Url> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Url> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

/// Writes `query` into the current address. Returns whether the visible
/// address changed.
pub fn sync_to_url(bar: &mut AddressBar, query: &ViewQuery, mode: HistoryMode) -> bool {
    let mut next = bar.current().clone();
    query.apply_to_url(&mut next);
    if next == *bar.current() {
        return false;
    }
    match mode {
        HistoryMode::Push => bar.push(next),
        HistoryMode::Replace => bar.replace(next),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterSelection, ViewMode};

    fn bar() -> AddressBar {
        AddressBar::new(Url::parse("http://host/contest/demo").unwrap())
    }

    #[test]
    fn push_adds_entries_and_replace_does_not() {
        let mut bar = bar();
        let girls = ViewQuery::new(FilterSelection::Girls, ViewMode::Rank, 1);
        assert!(sync_to_url(&mut bar, &girls, HistoryMode::Push));
        assert_eq!(bar.history_len(), 2);

        let stats = ViewQuery::new(FilterSelection::Girls, ViewMode::Statistics, 1);
        assert!(sync_to_url(&mut bar, &stats, HistoryMode::Replace));
        assert_eq!(bar.history_len(), 2);
        assert_eq!(bar.query(), stats);
    }

    #[test]
    fn unchanged_query_is_not_recorded() {
        let mut bar = bar();
        assert!(!sync_to_url(&mut bar, &ViewQuery::default(), HistoryMode::Push));
        assert_eq!(bar.history_len(), 1);
    }

    #[test]
    fn back_and_forward_walk_history() {
        let mut bar = bar();
        let girls = ViewQuery::new(FilterSelection::Girls, ViewMode::Rank, 1);
        sync_to_url(&mut bar, &girls, HistoryMode::Push);

        let back = bar.back().map(ViewQuery::parse_from_url);
        assert_eq!(back, Some(ViewQuery::default()));
        assert!(bar.back().is_none());

        let fwd = bar.forward().map(ViewQuery::parse_from_url);
        assert_eq!(fwd, Some(girls));
        assert!(bar.forward().is_none());
    }

    #[test]
    fn push_after_back_drops_forward_entries() {
        let mut bar = bar();
        sync_to_url(
            &mut bar,
            &ViewQuery::new(FilterSelection::Girls, ViewMode::Rank, 1),
            HistoryMode::Push,
        );
        bar.back();
        sync_to_url(
            &mut bar,
            &ViewQuery::new(FilterSelection::Official, ViewMode::Rank, 1),
            HistoryMode::Push,
        );
        assert_eq!(bar.history_len(), 2);
        assert!(bar.forward().is_none());
    }
}
