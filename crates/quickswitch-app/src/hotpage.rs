// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use url::Url;

use crate::model::HotPage;

/// First hot page whose hostname has a tail starting with the query.
///
/// Tails begin at segment boundaries with `www.` stripped: for
/// `mail.proton.me` the candidates are `mail.proton.me` and `proton.me`,
/// never the bare TLD. Matching is case-insensitive prefix matching, so
/// typing `pro` is enough to light up `proton.me`.
pub fn find_matching<'a>(hot_pages: &'a [HotPage], query: &str) -> Option<&'a HotPage> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    hot_pages.iter().find(|page| {
        host_of(&page.url).is_some_and(|host| {
            let parts: Vec<&str> = host.split('.').collect();
            (0..parts.len().saturating_sub(1))
                .any(|start| parts[start..].join(".").starts_with(&query))
        })
    })
}

/// First hot page whose first hostname label starts with the letter, used
/// by the close+engine+letter chord.
pub fn find_by_letter(hot_pages: &[HotPage], letter: char) -> Option<&HotPage> {
    let letter = letter.to_ascii_lowercase();
    hot_pages.iter().find(|page| {
        host_of(&page.url)
            .and_then(|host| host.split('.').next().and_then(|label| label.chars().next()))
            .is_some_and(|first| first.to_ascii_lowercase() == letter)
    })
}

fn host_of(raw: &str) -> Option<String> {
    let host = Url::parse(raw).ok()?.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_owned())
}

#[cfg(test)]
mod tests {
    use super::{find_by_letter, find_matching};
    use crate::model::HotPage;

    fn pages() -> Vec<HotPage> {
        vec![
            HotPage {
                label: "Proton Mail".to_owned(),
                url: "https://mail.proton.me/inbox".to_owned(),
            },
            HotPage {
                label: "GitHub".to_owned(),
                url: "https://www.github.com/".to_owned(),
            },
        ]
    }

    #[test]
    fn matches_any_hostname_tail() {
        let pages = pages();
        assert_eq!(find_matching(&pages, "mail.p").map(|p| &p.label[..]), Some("Proton Mail"));
        assert_eq!(find_matching(&pages, "proton").map(|p| &p.label[..]), Some("Proton Mail"));
        assert_eq!(find_matching(&pages, "PRO").map(|p| &p.label[..]), Some("Proton Mail"));
    }

    #[test]
    fn tld_alone_never_matches() {
        let pages = pages();
        assert_eq!(find_matching(&pages, "me"), None);
        assert_eq!(find_matching(&pages, "com"), None);
    }

    #[test]
    fn www_prefix_is_stripped() {
        let pages = pages();
        assert_eq!(find_matching(&pages, "git").map(|p| &p.label[..]), Some("GitHub"));
        assert_eq!(find_matching(&pages, "www"), None);
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert_eq!(find_matching(&pages(), ""), None);
        assert_eq!(find_matching(&pages(), "   "), None);
    }

    #[test]
    fn letter_lookup_uses_first_label() {
        let pages = pages();
        assert_eq!(find_by_letter(&pages, 'm').map(|p| &p.label[..]), Some("Proton Mail"));
        assert_eq!(find_by_letter(&pages, 'G').map(|p| &p.label[..]), Some("GitHub"));
        // 'p' is the second label of mail.proton.me, not the first.
        assert_eq!(find_by_letter(&pages, 'p'), None);
    }

    #[test]
    fn invalid_urls_are_skipped() {
        let pages = vec![HotPage {
            label: "broken".to_owned(),
            url: "not a url".to_owned(),
        }];
        assert_eq!(find_matching(&pages, "not"), None);
        assert_eq!(find_by_letter(&pages, 'n'), None);
    }
}
