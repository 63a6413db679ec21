// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use quickswitch_app::model::{ClosedEntry, TabEntry};
use std::path::PathBuf;

const SITES: [(&str, &str); 16] = [
    ("The Rust Programming Language", "doc.rust-lang.org"),
    ("ratatui documentation", "docs.rs"),
    ("crates.io", "crates.io"),
    ("Hacker News", "news.ycombinator.com"),
    ("NRK", "www.nrk.no"),
    ("Open-Meteo", "open-meteo.com"),
    ("Frankfurter API", "frankfurter.dev"),
    ("Wikipedia", "en.wikipedia.org"),
    ("GitHub", "github.com"),
    ("Stack Overflow", "stackoverflow.com"),
    ("MDN Web Docs", "developer.mozilla.org"),
    ("DuckDuckGo", "duckduckgo.com"),
    ("YouTube", "www.youtube.com"),
    ("Lobsters", "lobste.rs"),
    ("Aftenposten", "www.aftenposten.no"),
    ("This Week in Rust", "this-week-in-rust.org"),
];

const URL_PATHS: [&str; 8] = [
    "",
    "book/",
    "blog/2026/",
    "wiki/Main_Page",
    "questions/tagged/rust",
    "docs/latest/",
    "watch?v=dQw4w9WgXcQ",
    "search?q=grid+layout",
];

const SEARCH_QUERIES: [&str; 10] = [
    "rust borrow checker",
    "weather oslo tomorrow",
    "100 usd to nok",
    "2 + 2 * 10",
    "'e god morgen",
    "'d en serendipity",
    "ratatui table widget",
    "kitty keyboard protocol",
    "best hiking trails nordmarka",
    "frankfurter api rates",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic browser-session generator. The same seed always produces
/// the same tabs, closed entries, and queries, so tests can assert on
/// counts and shapes without hardcoding every fixture by hand.
#[derive(Debug, Clone)]
pub struct SessionFaker {
    rng: DeterministicRng,
    next_tab_id: u64,
    next_session_index: usize,
}

impl SessionFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_tab_id: 1,
            next_session_index: 0,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn tab(&mut self) -> TabEntry {
        let (title, host) = SITES[self.rng.int_n(SITES.len())];
        let path = URL_PATHS[self.rng.int_n(URL_PATHS.len())];
        let id = self.next_tab_id;
        self.next_tab_id += 1;
        TabEntry {
            id,
            window_id: 1 + self.rng.int_n(3) as u64,
            title: title.to_owned(),
            url: format!("https://{host}/{path}"),
            audible: self.rng.int_n(8) == 0,
            active: false,
        }
    }

    /// A tab list with exactly one active tab (the first), matching what
    /// the extension exports for a focused window.
    pub fn tabs(&mut self, count: usize) -> Vec<TabEntry> {
        let mut tabs: Vec<TabEntry> = (0..count).map(|_| self.tab()).collect();
        if let Some(first) = tabs.first_mut() {
            first.active = true;
        }
        tabs
    }

    pub fn closed_entry(&mut self) -> ClosedEntry {
        let (title, host) = SITES[self.rng.int_n(SITES.len())];
        let session_index = self.next_session_index;
        self.next_session_index += 1;
        ClosedEntry {
            session_index,
            title: title.to_owned(),
            url: format!("https://{host}/"),
        }
    }

    pub fn closed_entries(&mut self, count: usize) -> Vec<ClosedEntry> {
        (0..count).map(|_| self.closed_entry()).collect()
    }

    pub fn search_query(&mut self) -> String {
        SEARCH_QUERIES[self.rng.int_n(SEARCH_QUERIES.len())].to_owned()
    }

    /// A full session export in the extension's JSON shape.
    pub fn session_json(&mut self, tab_count: usize, closed_count: usize) -> String {
        let tabs = self.tabs(tab_count);
        let closed = self.closed_entries(closed_count);
        serde_json::json!({
            "tabs": tabs,
            "recently_closed": closed,
        })
        .to_string()
    }
}

/// Writes a session export to a temp file and hands back the directory
/// guard with the path. Dropping the guard removes the file.
pub fn temp_session_file(json: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("session.json");
    std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}

pub fn site_titles() -> impl Iterator<Item = &'static str> {
    SITES.iter().map(|(title, _)| *title)
}

pub fn search_queries() -> &'static [&'static str] {
    &SEARCH_QUERIES
}
