// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::history::looks_like_url;
use crate::hotpage;
use crate::keys::NavDirection;
use crate::model::{HotPage, ResultItem, SettingsSnapshot};
use crate::results::ResultSnapshot;

/// An action the popup asks its host to perform. Every commit path ends in
/// exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    SwitchToTab(u64),
    RestoreClosed(usize),
    CloseTab(u64),
    OpenUrl(String),
}

/// A host command plus the query text to remember in search history, when
/// the commit was a search rather than a tab jump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub command: HostCommand,
    pub record_history: Option<String>,
}

impl CommitOutcome {
    fn command(command: HostCommand) -> Self {
        Self {
            command,
            record_history: None,
        }
    }

    fn search(command: HostCommand, query: &str) -> Self {
        Self {
            command,
            record_history: Some(query.to_owned()),
        }
    }
}

/// Cursor over the dense grid indices. The one invariant: `selected` is
/// always `< total` or `None`; every mutation reclamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    selected: Option<usize>,
    total: usize,
}

const COLUMNS: usize = 2;

impl SelectionState {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn select(&mut self, index: usize) {
        self.selected = if self.total == 0 {
            None
        } else {
            Some(index.min(self.total - 1))
        };
    }

    /// Inform the cursor the grid changed size. A shrinking grid clamps the
    /// cursor to the last row, an empty one clears it.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.selected = match self.selected {
            Some(_) if total == 0 => None,
            Some(index) => Some(index.min(total - 1)),
            None => None,
        };
    }

    /// One step in the two-column grid: row = index / 2, column = index % 2.
    /// Vertical steps keep the column, horizontal steps keep the row, and
    /// all edges clamp rather than wrap. With no selection, Down/Right land
    /// on the first item and Up/Left on the last.
    pub fn step(&mut self, direction: NavDirection) {
        if self.total == 0 {
            return;
        }
        let next = match self.selected {
            None => match direction {
                NavDirection::Down | NavDirection::Right => 0,
                NavDirection::Up | NavDirection::Left => self.total - 1,
            },
            Some(index) => {
                let rows = self.total.div_ceil(COLUMNS);
                let row = index / COLUMNS;
                let col = index % COLUMNS;
                match direction {
                    NavDirection::Down => {
                        if row + 1 < rows {
                            ((row + 1) * COLUMNS + col).min(self.total - 1)
                        } else {
                            index
                        }
                    }
                    NavDirection::Up => {
                        if row > 0 {
                            (row - 1) * COLUMNS + col
                        } else {
                            index
                        }
                    }
                    NavDirection::Right => {
                        if col + 1 < COLUMNS && index + 1 < self.total {
                            index + 1
                        } else {
                            index
                        }
                    }
                    NavDirection::Left => {
                        if col > 0 {
                            index - 1
                        } else {
                            index
                        }
                    }
                }
            }
        };
        self.selected = Some(next);
    }
}

/// Owns the selection cursor and turns tracker actions plus the current
/// grid into host commands.
#[derive(Debug, Default)]
pub struct NavigationController {
    selection: SelectionState,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn select(&mut self, index: usize) {
        self.selection.select(index);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn sync_total(&mut self, total: usize) {
        self.selection.set_total(total);
    }

    pub fn navigate(&mut self, direction: NavDirection) {
        self.selection.step(direction);
    }

    /// Commit the highlighted item; with nothing highlighted, fall back to
    /// searching (or directly navigating to) the typed input.
    pub fn commit_highlighted(
        &self,
        snapshot: &ResultSnapshot,
        settings: &SettingsSnapshot,
        query: &str,
    ) -> Option<CommitOutcome> {
        if let Some(item) = self.selection.selected().and_then(|index| snapshot.item(index)) {
            return self.commit_item(item, settings);
        }
        Self::commit_input(settings, query)
    }

    /// The web-search key: a matched hot page wins when configured to, and
    /// otherwise the input is searched or navigated to, never the selection.
    pub fn commit_web_search(
        &self,
        settings: &SettingsSnapshot,
        query: &str,
        hot_page: Option<&HotPage>,
    ) -> Option<CommitOutcome> {
        if settings.prioritize_hot_page {
            if let Some(page) = hot_page {
                return Some(CommitOutcome::command(HostCommand::OpenUrl(page.url.clone())));
            }
        }
        Self::commit_input(settings, query)
    }

    pub fn activate_at(
        &self,
        index: usize,
        snapshot: &ResultSnapshot,
        settings: &SettingsSnapshot,
    ) -> Option<CommitOutcome> {
        self.commit_item(snapshot.item(index)?, settings)
    }

    pub fn close_at(&self, index: usize, snapshot: &ResultSnapshot) -> Option<HostCommand> {
        match snapshot.item(index)? {
            ResultItem::Open(tab) => Some(HostCommand::CloseTab(tab.id)),
            _ => None,
        }
    }

    pub fn close_highlighted(&self, snapshot: &ResultSnapshot) -> Option<HostCommand> {
        self.close_at(self.selection.selected()?, snapshot)
    }

    pub fn open_pinned(&self, index: usize, settings: &SettingsSnapshot) -> Option<HostCommand> {
        settings
            .pinned_sites
            .get(index)
            .map(|site| HostCommand::OpenUrl(site.url.clone()))
    }

    pub fn open_engine(
        &self,
        engine_id: &str,
        settings: &SettingsSnapshot,
        query: &str,
    ) -> Option<HostCommand> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let engine = settings.engine(engine_id)?;
        Some(HostCommand::OpenUrl(settings.engine_url(engine, query)))
    }

    pub fn hot_page_jump(&self, hot_page: Option<&HotPage>) -> Option<HostCommand> {
        hot_page.map(|page| HostCommand::OpenUrl(page.url.clone()))
    }

    pub fn hot_page_jump_by_letter(
        &self,
        letter: char,
        settings: &SettingsSnapshot,
    ) -> Option<HostCommand> {
        hotpage::find_by_letter(&settings.hot_pages, letter)
            .map(|page| HostCommand::OpenUrl(page.url.clone()))
    }

    pub fn commit_suggestion(
        &self,
        index: usize,
        engine_id: Option<&str>,
        snapshot: &ResultSnapshot,
        settings: &SettingsSnapshot,
    ) -> Option<CommitOutcome> {
        if !snapshot.suggestions_shown {
            return None;
        }
        let ResultItem::Suggestion(text) = snapshot.item(index)? else {
            return None;
        };
        let url = match engine_id.and_then(|id| settings.engine(id)) {
            Some(engine) => settings.engine_url(engine, text),
            None => settings.search_url(text),
        };
        Some(CommitOutcome::search(HostCommand::OpenUrl(url), text))
    }

    fn commit_item(
        &self,
        item: &ResultItem,
        settings: &SettingsSnapshot,
    ) -> Option<CommitOutcome> {
        match item {
            ResultItem::Open(tab) => {
                Some(CommitOutcome::command(HostCommand::SwitchToTab(tab.id)))
            }
            ResultItem::Closed(closed) => Some(CommitOutcome::command(
                HostCommand::RestoreClosed(closed.session_index),
            )),
            ResultItem::Suggestion(text) => Some(CommitOutcome::search(
                HostCommand::OpenUrl(settings.search_url(text)),
                text,
            )),
        }
    }

    fn commit_input(settings: &SettingsSnapshot, query: &str) -> Option<CommitOutcome> {
        let input = query.trim();
        if input.is_empty() {
            return None;
        }
        let url = if looks_like_url(input) {
            if input.starts_with("http://") || input.starts_with("https://") {
                input.to_owned()
            } else {
                format!("https://{input}")
            }
        } else {
            settings.search_url(input)
        };
        // History recording itself skips URL-ish input.
        Some(CommitOutcome::search(HostCommand::OpenUrl(url), input))
    }
}
