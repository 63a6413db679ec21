// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Prefix grammars for the assistant-style interpreters: the AI trigger
//! suffix and the translation/definition service prefixes.

use std::collections::BTreeMap;

/// A trailing `?` always asks the AI; the configured trigger suffix works
/// too. The stripped question must be non-empty and the raw input longer
/// than one character, so a lone `?` never claims.
pub fn parse_ai(trigger: &str, query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.chars().count() <= 1 {
        return None;
    }
    if let Some(question) = trimmed.strip_suffix('?') {
        let question = question.trim();
        return (!question.is_empty()).then(|| question.to_owned());
    }
    if !trigger.is_empty() {
        if let Some(question) = trimmed.strip_suffix(trigger) {
            let question = question.trim();
            return (!question.is_empty()).then(|| question.to_owned());
        }
    }
    None
}

/// Longest-prefix-wins is not needed here: prefixes are short and
/// disjoint in practice, so the first (sorted) match takes the query.
/// The remainder must be non-empty after trimming.
pub fn parse_prefixed(prefixes: &BTreeMap<String, String>, query: &str) -> Option<(String, String)> {
    let trimmed = query.trim();
    for (prefix, value) in prefixes {
        if starts_with_ignore_case(trimmed, prefix) {
            let rest = trimmed[prefix.len()..].trim();
            if !rest.is_empty() {
                return Some((value.clone(), rest.to_owned()));
            }
        }
    }
    None
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
