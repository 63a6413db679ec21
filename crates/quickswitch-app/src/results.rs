// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::model::{ClosedEntry, ResultItem, SettingsSnapshot, TabEntry};

/// Backend for search suggestions shown in the suggestion grid.
pub trait SuggestionSource: Send + Sync {
    fn suggest(&self, query: &str) -> Result<Vec<String>>;
}

/// The grid as derived from the current inputs. `items` carries dense,
/// 0-based indices by position; when `suggestions_shown` is true the grid
/// holds suggestion rows instead of tabs, with indices starting over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSnapshot {
    pub items: Vec<ResultItem>,
    pub suggestions_shown: bool,
}

impl ResultSnapshot {
    pub fn item(&self, index: usize) -> Option<&ResultItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Owns the raw inputs to the result grid: every open tab, the
/// recently-closed list, the query, and the two mode bits. `recompute`
/// derives the visible grid; it is pure over current state and idempotent.
#[derive(Debug, Clone, Default)]
pub struct ResultSetModel {
    tabs: Vec<TabEntry>,
    recently_closed: Vec<ClosedEntry>,
    query: String,
    recently_closed_mode: bool,
    force_search: bool,
    suggestions: Vec<String>,
}

impl ResultSetModel {
    pub fn new(tabs: Vec<TabEntry>, recently_closed: Vec<ClosedEntry>) -> Self {
        Self {
            tabs,
            recently_closed,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn recently_closed_mode(&self) -> bool {
        self.recently_closed_mode
    }

    pub fn force_search(&self) -> bool {
        self.force_search
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_owned();
        if self.query.trim().is_empty() {
            // Clearing the box resets the transient modes and stale
            // suggestions along with it.
            self.force_search = false;
            self.suggestions.clear();
        }
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    pub fn toggle_force_search(&mut self) -> bool {
        self.force_search = !self.force_search;
        self.force_search
    }

    /// Flip between open tabs and the recently-closed list. Entering the
    /// closed side is refused when nothing there matches the query, so the
    /// toggle never lands on an empty view. Returns the resulting mode.
    pub fn toggle_recently_closed(&mut self) -> bool {
        self.recently_closed_mode = !self.recently_closed_mode;
        if self.recently_closed_mode {
            let query = self.query.trim().to_lowercase();
            let any_match = self
                .recently_closed
                .iter()
                .any(|closed| Self::matches(&query, &closed.title, &closed.url));
            if !any_match {
                self.recently_closed_mode = false;
            }
        }
        self.recently_closed_mode
    }

    pub fn remove_tab(&mut self, tab_id: u64) {
        self.tabs.retain(|tab| tab.id != tab_id);
    }

    pub fn closed_entry(&self, session_index: usize) -> Option<&ClosedEntry> {
        self.recently_closed
            .iter()
            .find(|closed| closed.session_index == session_index)
    }

    pub fn recompute(&self, settings: &SettingsSnapshot) -> ResultSnapshot {
        let query = self.query.trim().to_lowercase();
        let service_command = settings.is_service_command(&self.query);

        let (open, closed) = if service_command {
            // Service commands own the whole popup surface.
            (Vec::new(), Vec::new())
        } else {
            self.filtered(&query, settings)
        };

        let tabs_empty = open.is_empty() && closed.is_empty();
        let suggestions_shown =
            !query.is_empty() && !service_command && (self.force_search || tabs_empty);

        if suggestions_shown {
            let items = self
                .suggestions
                .iter()
                .take(settings.suggestion_limit)
                .cloned()
                .map(ResultItem::Suggestion)
                .collect();
            return ResultSnapshot {
                items,
                suggestions_shown: true,
            };
        }

        let mut items: Vec<ResultItem> = Vec::with_capacity(open.len() + closed.len());
        let mut open = open;
        // Stable sort keeps relative tab order while floating audible tabs
        // to the front.
        open.sort_by_key(|tab| !tab.audible);
        items.extend(open.into_iter().map(ResultItem::Open));
        items.extend(closed.into_iter().map(ResultItem::Closed));
        ResultSnapshot {
            items,
            suggestions_shown: false,
        }
    }

    fn filtered(
        &self,
        query: &str,
        settings: &SettingsSnapshot,
    ) -> (Vec<TabEntry>, Vec<ClosedEntry>) {
        let open = || {
            self.tabs
                .iter()
                .filter(|tab| Self::matches(query, &tab.title, &tab.url))
                .cloned()
                .collect::<Vec<_>>()
        };
        let closed = || {
            self.recently_closed
                .iter()
                .filter(|tab| Self::matches(query, &tab.title, &tab.url))
                .cloned()
                .collect::<Vec<_>>()
        };
        if settings.only_search_closed_when_jumped {
            if self.recently_closed_mode {
                (Vec::new(), closed())
            } else {
                (open(), Vec::new())
            }
        } else {
            (open(), closed())
        }
    }

    fn matches(query: &str, title: &str, url: &str) -> bool {
        query.is_empty()
            || title.to_lowercase().contains(query)
            || url.to_lowercase().contains(query)
    }
}

#[cfg(test)]
mod tests {
    use super::{ResultItem, ResultSetModel};
    use crate::model::{ClosedEntry, SettingsSnapshot, TabEntry};

    fn tab(id: u64, title: &str, url: &str) -> TabEntry {
        TabEntry {
            id,
            window_id: 1,
            title: title.to_owned(),
            url: url.to_owned(),
            audible: false,
            active: false,
        }
    }

    fn closed(session_index: usize, title: &str, url: &str) -> ClosedEntry {
        ClosedEntry {
            session_index,
            title: title.to_owned(),
            url: url.to_owned(),
        }
    }

    fn model() -> ResultSetModel {
        ResultSetModel::new(
            vec![
                tab(1, "Rust Book", "https://doc.rust-lang.org/book/"),
                tab(2, "Weather Oslo", "https://weather.example/oslo"),
                tab(3, "News", "https://news.example/"),
            ],
            vec![closed(0, "Old Rust Post", "https://blog.example/rust")],
        )
    }

    #[test]
    fn empty_query_lists_open_then_closed() {
        let model = model();
        let snapshot = model.recompute(&SettingsSnapshot::default());
        assert_eq!(snapshot.items.len(), 4);
        assert!(matches!(snapshot.items[0], ResultItem::Open(_)));
        assert!(matches!(snapshot.items[3], ResultItem::Closed(_)));
        assert!(!snapshot.suggestions_shown);
    }

    #[test]
    fn filter_is_case_insensitive_over_title_and_url() {
        let mut model = model();
        model.set_query("RUST");
        let snapshot = model.recompute(&SettingsSnapshot::default());
        let titles: Vec<_> = snapshot.items.iter().map(|item| item.title()).collect();
        assert_eq!(titles, vec!["Rust Book", "Old Rust Post"]);
    }

    #[test]
    fn audible_tabs_sort_first_keeping_relative_order() {
        let mut tabs = vec![
            tab(1, "a", "https://a.example"),
            tab(2, "b", "https://b.example"),
            tab(3, "c", "https://c.example"),
        ];
        tabs[1].audible = true;
        tabs[2].audible = true;
        let model = ResultSetModel::new(tabs, Vec::new());
        let snapshot = model.recompute(&SettingsSnapshot::default());
        let titles: Vec<_> = snapshot.items.iter().map(|item| item.title()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);
    }

    #[test]
    fn unmatched_query_switches_to_suggestions() {
        let mut model = model();
        model.set_query("zzzz");
        model.set_suggestions(vec!["zzzz top".to_owned()]);
        let snapshot = model.recompute(&SettingsSnapshot::default());
        assert!(snapshot.suggestions_shown);
        assert_eq!(
            snapshot.items,
            vec![ResultItem::Suggestion("zzzz top".to_owned())]
        );
    }

    #[test]
    fn force_search_prefers_suggestions_over_matching_tabs() {
        let mut model = model();
        model.set_query("rust");
        model.set_suggestions(vec!["rust lang".to_owned()]);
        assert!(model.toggle_force_search());
        let snapshot = model.recompute(&SettingsSnapshot::default());
        assert!(snapshot.suggestions_shown);

        // Clearing the query drops force-search again.
        model.set_query("");
        assert!(!model.force_search());
    }

    #[test]
    fn suggestions_capped_at_limit() {
        let mut model = ResultSetModel::new(Vec::new(), Vec::new());
        model.set_query("q");
        model.set_suggestions((0..20).map(|n| format!("s{n}")).collect());
        let snapshot = model.recompute(&SettingsSnapshot::default());
        assert_eq!(snapshot.items.len(), 8);
    }

    #[test]
    fn service_command_hides_tabs_and_suggestions() {
        let mut model = model();
        model.set_query("'t 12");
        model.set_suggestions(vec!["weather".to_owned()]);
        let snapshot = model.recompute(&SettingsSnapshot::default());
        assert!(snapshot.is_empty());
        assert!(!snapshot.suggestions_shown);
    }

    #[test]
    fn jumped_mode_searches_only_one_side() {
        let settings = SettingsSnapshot {
            only_search_closed_when_jumped: true,
            ..SettingsSnapshot::default()
        };
        let mut model = model();
        model.set_query("rust");
        let open_side = model.recompute(&settings);
        assert_eq!(open_side.items.len(), 1);
        assert!(matches!(open_side.items[0], ResultItem::Open(_)));

        assert!(model.toggle_recently_closed());
        let closed_side = model.recompute(&settings);
        assert_eq!(closed_side.items.len(), 1);
        assert!(matches!(closed_side.items[0], ResultItem::Closed(_)));
    }

    #[test]
    fn toggle_refuses_empty_closed_side() {
        let mut model = ResultSetModel::new(vec![tab(1, "a", "https://a.example")], Vec::new());
        assert!(!model.toggle_recently_closed());
        assert!(!model.recently_closed_mode());
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut model = model();
        model.set_query("rust");
        let settings = SettingsSnapshot::default();
        assert_eq!(model.recompute(&settings), model.recompute(&settings));
    }

    #[test]
    fn removing_a_tab_shrinks_the_grid() {
        let mut model = model();
        model.remove_tab(2);
        let snapshot = model.recompute(&SettingsSnapshot::default());
        assert!(
            snapshot
                .items
                .iter()
                .all(|item| item.title() != "Weather Oslo")
        );
    }
}
