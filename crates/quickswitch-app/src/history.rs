// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Whether committed input should be treated as an address rather than a
/// search: an explicit scheme, a whitespace-free token with an interior
/// dot, or a localhost/dotted-quad prefix.
pub fn looks_like_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return true;
    }
    if !input.chars().any(char::is_whitespace) && input.len() >= 3 {
        let interior = &input.as_bytes()[1..input.len() - 1];
        if interior.contains(&b'.') {
            return true;
        }
    }
    lower.starts_with("localhost") || starts_with_ipv4(&lower)
}

fn starts_with_ipv4(input: &str) -> bool {
    let mut rest = input;
    for octet in 0..4 {
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        if !(1..=3).contains(&digits) {
            return false;
        }
        rest = &rest[digits..];
        if octet < 3 {
            match rest.strip_prefix('.') {
                Some(tail) => rest = tail,
                None => return false,
            }
        }
    }
    true
}

/// The last few committed searches, most recent first, deduplicated.
/// URL-ish input is never remembered. A close-modifier tap cycles the
/// cursor through the list, wrapping around.
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

const HISTORY_CAP: usize = 10;

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || looks_like_url(query) {
            return;
        }
        self.entries.retain(|entry| entry != query);
        self.entries.insert(0, query.to_owned());
        self.entries.truncate(HISTORY_CAP);
        self.cursor = None;
    }

    /// Advance to the next remembered search and return it.
    pub fn cycle(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.cursor {
            Some(cursor) => (cursor + 1) % self.entries.len(),
            None => 0,
        };
        self.cursor = Some(next);
        Some(&self.entries[next])
    }

    /// Typing resets the cycle position.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }
}
