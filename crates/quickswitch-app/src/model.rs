// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Modifier keys required to be down for a binding to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifierFlags {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl ModifierFlags {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const fn count(self) -> usize {
        self.ctrl as usize + self.alt as usize + self.shift as usize + self.meta as usize
    }
}

/// One key plus required modifiers, as configured for a popup role.
///
/// `code` is the physical key (`ShiftLeft`, `KeyA`, `Digit1`), `key` the
/// logical one (`Shift`, `a`, `1`). A binding matches an event when the
/// required flag set is exactly the event's flag set and either name matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierBinding {
    pub display: String,
    pub code: String,
    pub key: String,
    pub flags: ModifierFlags,
}

impl ModifierBinding {
    pub fn new(display: &str, code: &str, key: &str, flags: ModifierFlags) -> Self {
        Self {
            display: display.to_owned(),
            code: code.to_owned(),
            key: key.to_owned(),
            flags,
        }
    }

    pub fn matches_press(&self, input: &KeyInput) -> bool {
        self.flags == input.flags && (input.code == self.code || input.key == self.key)
    }

    /// Release matching is looser than press matching: when the chord is a
    /// single bare modifier the flag has already dropped by the time the
    /// key-up arrives, so the event is recognized from the logical key name.
    /// A Ctrl+Alt chord is considered released when either key comes up.
    pub fn matches_release(&self, input: &KeyInput) -> bool {
        let flags = self.flags;
        if flags.count() == 1 {
            if flags.ctrl {
                return input.key == "Control";
            }
            if flags.alt {
                return input.key == "Alt";
            }
            if flags.shift {
                return input.key == "Shift";
            }
        }
        if flags.ctrl && flags.alt && !flags.shift && !flags.meta {
            return input.key == "Control" || input.key == "Alt";
        }
        self.matches_press(input)
    }

    /// The literal character a tap of this binding should type, if any.
    pub fn literal_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

/// One raw keyboard event as delivered by the host terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub code: String,
    pub key: String,
    pub flags: ModifierFlags,
    pub repeat: bool,
}

impl KeyInput {
    pub fn new(code: &str, key: &str, flags: ModifierFlags) -> Self {
        Self {
            code: code.to_owned(),
            key: key.to_owned(),
            flags,
            repeat: false,
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// The single letter this event types, if it is a plain letter key.
    pub fn letter(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphabetic() => Some(ch),
            _ => None,
        }
    }

    /// The digit this event types, if any.
    pub fn digit(&self) -> Option<u32> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => ch.to_digit(10),
            _ => None,
        }
    }
}

/// An open browser tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabEntry {
    pub id: u64,
    pub window_id: u64,
    pub title: String,
    pub url: String,
    pub audible: bool,
    pub active: bool,
}

/// A recently closed tab; `session_index` is the host's restore handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedEntry {
    pub session_index: usize,
    pub title: String,
    pub url: String,
}

/// One row of the result grid. Indices into the grid are dense and 0-based,
/// assigned per recompute; they are not stable across recomputes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultItem {
    Open(TabEntry),
    Closed(ClosedEntry),
    Suggestion(String),
}

impl ResultItem {
    pub fn title(&self) -> &str {
        match self {
            Self::Open(tab) => &tab.title,
            Self::Closed(closed) => &closed.title,
            Self::Suggestion(text) => text,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Open(tab) => Some(&tab.url),
            Self::Closed(closed) => Some(&closed.url),
            Self::Suggestion(_) => None,
        }
    }
}

/// Physical key chord that opens a search engine while the engine modifier
/// is held. Flags are the engine modifier's own flags merged with any extra
/// required ones, and must match the event's flags exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineShortcut {
    pub code: String,
    pub flags: ModifierFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEngine {
    pub id: String,
    pub label: String,
    pub url: String,
    pub url_suffix: String,
    pub shortcut: EngineShortcut,
}

impl SearchEngine {
    fn preset(id: &str, label: &str, letter: char, url: &str, url_suffix: &str) -> Self {
        Self {
            id: id.to_owned(),
            label: label.to_owned(),
            url: url.to_owned(),
            url_suffix: url_suffix.to_owned(),
            shortcut: EngineShortcut {
                code: format!("Key{}", letter.to_ascii_uppercase()),
                flags: ModifierFlags::NONE,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotPage {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedSite {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Immutable view of all configuration the popup core consults. Built once
/// at startup from the config file; components only ever borrow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub close_binding: ModifierBinding,
    pub target_binding: ModifierBinding,
    pub recently_closed_binding: ModifierBinding,
    pub engine_binding: ModifierBinding,
    pub force_search_binding: ModifierBinding,
    pub web_search_binding: ModifierBinding,
    pub recently_closed_enabled: bool,
    pub force_search_enabled: bool,
    pub enable_search_history: bool,
    pub only_search_closed_when_jumped: bool,
    pub prioritize_hot_page: bool,
    pub weather_locations: BTreeMap<String, WeatherLocation>,
    pub translation_prefixes: BTreeMap<String, String>,
    pub translation_targets: Vec<String>,
    pub definition_prefixes: BTreeMap<String, String>,
    pub target_currencies: Vec<String>,
    pub ai_trigger: String,
    pub ai_api_key: String,
    pub engines: Vec<SearchEngine>,
    pub hot_pages: Vec<HotPage>,
    pub pinned_sites: Vec<PinnedSite>,
    pub default_search_url: String,
    pub suggestion_limit: usize,
}

impl SettingsSnapshot {
    pub fn engine(&self, id: &str) -> Option<&SearchEngine> {
        self.engines.iter().find(|engine| engine.id == id)
    }

    /// Engine whose shortcut chord matches the event exactly.
    pub fn engine_for_input(&self, input: &KeyInput) -> Option<&SearchEngine> {
        self.engines
            .iter()
            .find(|engine| engine.shortcut.code == input.code && engine.shortcut.flags == input.flags)
    }

    /// Engine matched by shortcut code and shift requirement only, used
    /// while picking an engine for a highlighted suggestion.
    pub fn engine_for_suggestion_input(&self, input: &KeyInput) -> Option<&SearchEngine> {
        self.engines.iter().find(|engine| {
            engine.shortcut.code == input.code && engine.shortcut.flags.shift == input.flags.shift
        })
    }

    pub fn search_url(&self, query: &str) -> String {
        let mut out = self.default_search_url.clone();
        out.extend(url::form_urlencoded::byte_serialize(query.as_bytes()));
        out
    }

    pub fn engine_url(&self, engine: &SearchEngine, query: &str) -> String {
        let mut out = engine.url.clone();
        out.extend(url::form_urlencoded::byte_serialize(query.as_bytes()));
        out.push_str(&engine.url_suffix);
        out
    }

    /// True when the query is one of the weather/translation/definition
    /// service prefixes, alone or followed by a space. Such commands hide
    /// the tab list and suggestions entirely.
    pub fn is_service_command(&self, query: &str) -> bool {
        let trimmed = query.trim().to_lowercase();
        if trimmed.is_empty() {
            return false;
        }
        self.weather_locations
            .keys()
            .chain(self.translation_prefixes.keys())
            .chain(self.definition_prefixes.keys())
            .any(|prefix| {
                trimmed == *prefix || trimmed.starts_with(&format!("{prefix} "))
            })
    }
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            close_binding: ModifierBinding::new("Shift", "ShiftLeft", "Shift", ModifierFlags::SHIFT),
            target_binding: ModifierBinding::new("Alt", "AltLeft", "Alt", ModifierFlags::ALT),
            recently_closed_binding: ModifierBinding::new("Tab", "Tab", "Tab", ModifierFlags::NONE),
            engine_binding: ModifierBinding::new("F21", "F21", "F21", ModifierFlags::NONE),
            force_search_binding: ModifierBinding::new(
                "Ctrl",
                "ControlLeft",
                "Control",
                ModifierFlags::CTRL,
            ),
            web_search_binding: ModifierBinding::new("Enter", "Enter", "Enter", ModifierFlags::NONE),
            recently_closed_enabled: true,
            force_search_enabled: true,
            enable_search_history: true,
            only_search_closed_when_jumped: false,
            prioritize_hot_page: true,
            weather_locations: BTreeMap::from([
                (
                    "'t".to_owned(),
                    WeatherLocation {
                        name: "Tryvann".to_owned(),
                        latitude: 59.9847,
                        longitude: 10.6678,
                    },
                ),
                (
                    "'w".to_owned(),
                    WeatherLocation {
                        name: "Oslo Røa".to_owned(),
                        latitude: 59.9473,
                        longitude: 10.6348,
                    },
                ),
            ]),
            translation_prefixes: BTreeMap::from([
                ("'e".to_owned(), "en".to_owned()),
                ("'n".to_owned(), "no".to_owned()),
                ("'g".to_owned(), "de".to_owned()),
                ("'a".to_owned(), "auto".to_owned()),
            ]),
            translation_targets: vec!["en".to_owned(), "de".to_owned(), "no".to_owned()],
            definition_prefixes: BTreeMap::from([("'d".to_owned(), "en".to_owned())]),
            target_currencies: vec!["NOK".to_owned(), "EUR".to_owned(), "USD".to_owned()],
            ai_trigger: "''".to_owned(),
            ai_api_key: String::new(),
            engines: vec![
                SearchEngine::preset(
                    "shopping",
                    "DuckDuckGo",
                    's',
                    "https://duckduckgo.com/?q=",
                    "&ia=shopping&iax=shopping",
                ),
                SearchEngine::preset(
                    "translate",
                    "Translate",
                    't',
                    "https://translate.google.com/?sl=auto&tl=en&text=",
                    "",
                ),
                SearchEngine::preset(
                    "youtube",
                    "YouTube",
                    'y',
                    "https://www.youtube.com/results?search_query=",
                    "",
                ),
                SearchEngine::preset(
                    "wikipedia",
                    "Wikipedia",
                    'w',
                    "https://en.wikipedia.org/wiki/Special:Search?search=",
                    "",
                ),
                SearchEngine::preset("amazon_de", "Amazon.de", 'a', "https://www.amazon.de/s?k=", ""),
                SearchEngine::preset(
                    "amazon_com",
                    "Amazon.com",
                    'z',
                    "https://www.amazon.com/s?k=",
                    "",
                ),
                SearchEngine::preset(
                    "prisjakt",
                    "Prisjakt",
                    'p',
                    "https://www.prisjakt.no/search?query=",
                    "",
                ),
                SearchEngine::preset("ikea", "IKEA", 'i', "https://www.ikea.com/no/no/search/?q=", ""),
                SearchEngine::preset(
                    "finn",
                    "Finn.no",
                    'f',
                    "https://www.finn.no/recommerce/forsale/search?q=",
                    "",
                ),
                SearchEngine::preset(
                    "brave",
                    "Brave Search",
                    'b',
                    "https://search.brave.com/search?q=",
                    "",
                ),
            ],
            hot_pages: Vec::new(),
            pinned_sites: Vec::new(),
            default_search_url: "https://duckduckgo.com/?q=".to_owned(),
            suggestion_limit: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyInput, ModifierFlags, SettingsSnapshot};

    #[test]
    fn press_match_accepts_code_or_key() {
        let settings = SettingsSnapshot::default();
        let by_code = KeyInput::new("ShiftLeft", "Shift", ModifierFlags::SHIFT);
        let by_key = KeyInput::new("ShiftRight", "Shift", ModifierFlags::SHIFT);
        assert!(settings.close_binding.matches_press(&by_code));
        assert!(settings.close_binding.matches_press(&by_key));
    }

    #[test]
    fn press_match_requires_exact_flags() {
        let settings = SettingsSnapshot::default();
        let with_ctrl = KeyInput::new(
            "ShiftLeft",
            "Shift",
            ModifierFlags {
                ctrl: true,
                ..ModifierFlags::SHIFT
            },
        );
        assert!(!settings.close_binding.matches_press(&with_ctrl));
    }

    #[test]
    fn release_match_accepts_bare_modifier_name() {
        let settings = SettingsSnapshot::default();
        // On key-up the shift flag is already gone from the event.
        let release = KeyInput::new("ShiftLeft", "Shift", ModifierFlags::NONE);
        assert!(settings.close_binding.matches_release(&release));
        assert!(!settings.close_binding.matches_press(&release));
    }

    #[test]
    fn ctrl_alt_chord_releases_on_either_key() {
        let binding = super::ModifierBinding::new(
            "Ctrl+Alt",
            "ControlLeft",
            "Control",
            ModifierFlags {
                ctrl: true,
                alt: true,
                ..ModifierFlags::NONE
            },
        );
        let ctrl_up = KeyInput::new("ControlLeft", "Control", ModifierFlags::ALT);
        let alt_up = KeyInput::new("AltLeft", "Alt", ModifierFlags::CTRL);
        assert!(binding.matches_release(&ctrl_up));
        assert!(binding.matches_release(&alt_up));
    }

    #[test]
    fn service_command_detection() {
        let settings = SettingsSnapshot::default();
        assert!(settings.is_service_command("'t"));
        assert!(settings.is_service_command("'t 12"));
        assert!(settings.is_service_command("'e hello"));
        assert!(settings.is_service_command("'d word"));
        assert!(!settings.is_service_command("'translate"));
        assert!(!settings.is_service_command("plain query"));
        assert!(!settings.is_service_command(""));
    }

    #[test]
    fn engine_shortcut_lookup_requires_exact_flags() {
        let settings = SettingsSnapshot::default();
        let plain = KeyInput::new("KeyY", "y", ModifierFlags::NONE);
        let shifted = KeyInput::new("KeyY", "Y", ModifierFlags::SHIFT);
        assert_eq!(
            settings.engine_for_input(&plain).map(|e| e.id.as_str()),
            Some("youtube")
        );
        assert!(settings.engine_for_input(&shifted).is_none());
    }

    #[test]
    fn literal_char_only_for_single_char_keys() {
        let space = super::ModifierBinding::new("Space", "Space", " ", ModifierFlags::NONE);
        assert_eq!(space.literal_char(), Some(' '));
        let settings = SettingsSnapshot::default();
        assert_eq!(settings.close_binding.literal_char(), None);
    }
}
