// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use quickswitch_app::model::{
    EngineShortcut, HotPage, ModifierBinding, ModifierFlags, PinnedSite, SearchEngine,
    SettingsSnapshot, WeatherLocation,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "quickswitch";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub keys: Keys,
    #[serde(default)]
    pub behavior: Behavior,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub answers: Answers,
    #[serde(default)]
    pub engines: Option<Vec<EngineEntry>>,
    #[serde(default)]
    pub hot_pages: Vec<SiteEntry>,
    #[serde(default)]
    pub pinned_sites: Vec<SiteEntry>,
}

/// Key chords by popup role. Each value is a chord spec: a modifier name
/// (`Shift`, `Ctrl`, `Alt`, `Meta`), a `+`-joined modifier combo
/// (`Ctrl+Alt`), a named key (`Enter`, `Tab`, `Space`, `F21`), or a single
/// character.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Keys {
    pub close: Option<String>,
    pub target: Option<String>,
    pub recently_closed: Option<String>,
    pub engine: Option<String>,
    pub force_search: Option<String>,
    pub web_search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Behavior {
    pub recently_closed_enabled: Option<bool>,
    pub force_search_enabled: Option<bool>,
    pub enable_search_history: Option<bool>,
    pub only_search_closed_when_jumped: Option<bool>,
    pub prioritize_hot_page: Option<bool>,
    pub suggestion_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Search {
    pub default_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Answers {
    pub service_prefix: Option<String>,
    pub weather: Option<BTreeMap<String, WeatherEntry>>,
    pub translations: Option<BTreeMap<String, String>>,
    pub translation_targets: Option<Vec<String>>,
    pub definitions: Option<BTreeMap<String, String>>,
    pub target_currencies: Option<Vec<String>>,
    pub ai_trigger: Option<String>,
    pub ai_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineEntry {
    pub id: String,
    pub label: String,
    pub letter: String,
    pub url: String,
    #[serde(default)]
    pub url_suffix: String,
    #[serde(default)]
    pub shift: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    pub label: String,
    pub url: String,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("QUICKSWITCH_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set QUICKSWITCH_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                version: CONFIG_VERSION,
                ..Self::default()
            });
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned; add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the file into the immutable settings view the popup runs on.
    /// Unset values keep their built-in defaults; set values are validated
    /// here so every later component can trust the snapshot.
    pub fn to_snapshot(&self) -> Result<SettingsSnapshot> {
        let mut snapshot = SettingsSnapshot::default();

        if let Some(spec) = &self.keys.close {
            snapshot.close_binding = parse_binding(spec).context("keys.close")?;
        }
        if let Some(spec) = &self.keys.target {
            snapshot.target_binding = parse_binding(spec).context("keys.target")?;
        }
        if let Some(spec) = &self.keys.recently_closed {
            snapshot.recently_closed_binding = parse_binding(spec).context("keys.recently_closed")?;
        }
        if let Some(spec) = &self.keys.engine {
            snapshot.engine_binding = parse_binding(spec).context("keys.engine")?;
        }
        if let Some(spec) = &self.keys.force_search {
            snapshot.force_search_binding = parse_binding(spec).context("keys.force_search")?;
        }
        if let Some(spec) = &self.keys.web_search {
            snapshot.web_search_binding = parse_binding(spec).context("keys.web_search")?;
        }

        let held = [
            ("keys.close", &snapshot.close_binding),
            ("keys.target", &snapshot.target_binding),
            ("keys.engine", &snapshot.engine_binding),
        ];
        for (index, (name, binding)) in held.iter().enumerate() {
            for (other_name, other) in &held[index + 1..] {
                if binding.code == other.code && binding.flags == other.flags {
                    bail!("{name} and {other_name} use the same chord {:?}", binding.display);
                }
            }
        }

        if let Some(value) = self.behavior.recently_closed_enabled {
            snapshot.recently_closed_enabled = value;
        }
        if let Some(value) = self.behavior.force_search_enabled {
            snapshot.force_search_enabled = value;
        }
        if let Some(value) = self.behavior.enable_search_history {
            snapshot.enable_search_history = value;
        }
        if let Some(value) = self.behavior.only_search_closed_when_jumped {
            snapshot.only_search_closed_when_jumped = value;
        }
        if let Some(value) = self.behavior.prioritize_hot_page {
            snapshot.prioritize_hot_page = value;
        }
        if let Some(limit) = self.behavior.suggestion_limit {
            if limit == 0 {
                bail!("behavior.suggestion_limit must be at least 1");
            }
            snapshot.suggestion_limit = limit;
        }

        if let Some(url) = &self.search.default_url {
            validate_search_url("search.default_url", url)?;
            snapshot.default_search_url = url.clone();
        }

        if let Some(weather) = &self.answers.weather {
            let mut locations = BTreeMap::new();
            for (prefix, entry) in weather {
                validate_prefix("answers.weather", prefix)?;
                if !(-90.0..=90.0).contains(&entry.latitude) {
                    bail!(
                        "answers.weather.{prefix} latitude {} is out of range",
                        entry.latitude
                    );
                }
                if !(-180.0..=180.0).contains(&entry.longitude) {
                    bail!(
                        "answers.weather.{prefix} longitude {} is out of range",
                        entry.longitude
                    );
                }
                locations.insert(
                    prefix.clone(),
                    WeatherLocation {
                        name: entry.name.clone(),
                        latitude: entry.latitude,
                        longitude: entry.longitude,
                    },
                );
            }
            snapshot.weather_locations = locations;
        }

        if let Some(translations) = &self.answers.translations {
            for prefix in translations.keys() {
                validate_prefix("answers.translations", prefix)?;
            }
            snapshot.translation_prefixes = translations.clone();
        }
        if let Some(targets) = &self.answers.translation_targets {
            if targets.is_empty() {
                bail!("answers.translation_targets must list at least one language");
            }
            snapshot.translation_targets = targets.clone();
        }
        if let Some(definitions) = &self.answers.definitions {
            for prefix in definitions.keys() {
                validate_prefix("answers.definitions", prefix)?;
            }
            snapshot.definition_prefixes = definitions.clone();
        }

        if let Some(currencies) = &self.answers.target_currencies {
            let mut upper = Vec::with_capacity(currencies.len());
            for code in currencies {
                if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
                    bail!("answers.target_currencies entry {code:?} is not a three-letter code");
                }
                upper.push(code.to_ascii_uppercase());
            }
            snapshot.target_currencies = upper;
        }

        // Prefix tables are written with a leading quote; a different
        // service prefix rewrites those keys, leaving custom ones alone.
        if let Some(service) = &self.answers.service_prefix {
            validate_prefix("answers.service_prefix", service)?;
            if service != "'" {
                snapshot.weather_locations = remap_prefix_keys(snapshot.weather_locations, service);
                snapshot.translation_prefixes =
                    remap_prefix_keys(snapshot.translation_prefixes, service);
                snapshot.definition_prefixes =
                    remap_prefix_keys(snapshot.definition_prefixes, service);
            }
        }

        if let Some(trigger) = &self.answers.ai_trigger {
            if trigger.trim().is_empty() {
                bail!("answers.ai_trigger must not be blank");
            }
            snapshot.ai_trigger = trigger.clone();
        }
        if let Some(key) = &self.answers.ai_api_key {
            snapshot.ai_api_key = key.clone();
        }

        if let Some(entries) = &self.engines {
            let mut engines = Vec::with_capacity(entries.len());
            for entry in entries {
                let mut letters = entry.letter.chars();
                let (Some(letter), None) = (letters.next(), letters.next()) else {
                    bail!("engine {:?} letter {:?} must be one character", entry.id, entry.letter);
                };
                if !letter.is_ascii_alphabetic() {
                    bail!("engine {:?} letter {:?} must be a letter", entry.id, entry.letter);
                }
                if engines.iter().any(|engine: &SearchEngine| engine.id == entry.id) {
                    bail!("duplicate engine id {:?}", entry.id);
                }
                validate_search_url(&format!("engine {:?} url", entry.id), &entry.url)?;
                engines.push(SearchEngine {
                    id: entry.id.clone(),
                    label: entry.label.clone(),
                    url: entry.url.clone(),
                    url_suffix: entry.url_suffix.clone(),
                    shortcut: EngineShortcut {
                        code: format!("Key{}", letter.to_ascii_uppercase()),
                        flags: ModifierFlags {
                            shift: entry.shift,
                            ..ModifierFlags::NONE
                        },
                    },
                });
            }
            snapshot.engines = engines;
        }

        snapshot.hot_pages = self
            .hot_pages
            .iter()
            .map(|entry| HotPage {
                label: entry.label.clone(),
                url: entry.url.clone(),
            })
            .collect();
        snapshot.pinned_sites = self
            .pinned_sites
            .iter()
            .map(|entry| PinnedSite {
                label: entry.label.clone(),
                url: entry.url.clone(),
            })
            .collect();

        Ok(snapshot)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            r#"# quickswitch config
# Place this file at: {}

version = 1

[keys]
# close = "Shift"
# target = "Alt"
# recently_closed = "Tab"
# engine = "F21"
# force_search = "Ctrl"
# web_search = "Enter"

[behavior]
recently_closed_enabled = true
force_search_enabled = true
enable_search_history = true
only_search_closed_when_jumped = false
prioritize_hot_page = true
suggestion_limit = 8

[search]
default_url = "https://duckduckgo.com/?q="

[answers]
# service_prefix = "'"
# translation_targets = ["en", "de", "no"]
# target_currencies = ["NOK", "EUR", "USD"]
# ai_trigger = "''"
# ai_api_key = ""

[answers.weather."'t"]
name = "Tryvann"
latitude = 59.9847
longitude = 10.6678

[answers.translations]
"'e" = "en"
"'n" = "no"
"'a" = "auto"

[answers.definitions]
"'d" = "en"

# [[engines]]
# id = "youtube"
# label = "YouTube"
# letter = "y"
# url = "https://www.youtube.com/results?search_query="

# [[hot_pages]]
# label = "GitHub"
# url = "https://github.com/"

# [[pinned_sites]]
# label = "Mail"
# url = "https://mail.proton.me/"
"#,
            path.display(),
        )
    }
}

fn validate_prefix(section: &str, prefix: &str) -> Result<()> {
    if prefix.trim().is_empty() || prefix.contains(char::is_whitespace) {
        bail!("{section} prefix {prefix:?} must be a non-blank token without spaces");
    }
    Ok(())
}

fn remap_prefix_keys<V>(map: BTreeMap<String, V>, service: &str) -> BTreeMap<String, V> {
    map.into_iter()
        .map(|(prefix, value)| match prefix.strip_prefix('\'') {
            Some(rest) => (format!("{service}{rest}"), value),
            None => (prefix, value),
        })
        .collect()
}

fn validate_search_url(name: &str, url: &str) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("{name} must start with http:// or https://, got {url:?}");
    }
    Ok(())
}

/// Turn a chord spec into a binding. Modifier chords carry the full flag
/// set and take the last modifier's physical key, so the chord matches the
/// event that completes it.
fn parse_binding(spec: &str) -> Result<ModifierBinding> {
    let spec = spec.trim();
    if spec.is_empty() {
        bail!("chord spec must not be blank");
    }

    let parts: Vec<&str> = spec.split('+').collect();
    if parts.len() > 1 || modifier_part(spec).is_some() {
        let mut flags = ModifierFlags::NONE;
        let mut last = None;
        for part in &parts {
            let Some((code, key, bit)) = modifier_part(part) else {
                bail!("chord {spec:?} mixes modifier and non-modifier keys");
            };
            match bit {
                FlagBit::Ctrl => flags.ctrl = true,
                FlagBit::Alt => flags.alt = true,
                FlagBit::Shift => flags.shift = true,
                FlagBit::Meta => flags.meta = true,
            }
            last = Some((code, key));
        }
        let (code, key) = last.ok_or_else(|| anyhow!("chord {spec:?} is empty"))?;
        return Ok(ModifierBinding::new(spec, code, key, flags));
    }

    match spec {
        "Enter" | "Tab" | "Escape" => {
            return Ok(ModifierBinding::new(spec, spec, spec, ModifierFlags::NONE));
        }
        "Space" => {
            return Ok(ModifierBinding::new(spec, "Space", " ", ModifierFlags::NONE));
        }
        _ => {}
    }

    if let Some(number) = spec.strip_prefix('F') {
        if number.parse::<u8>().is_ok_and(|n| (1..=24).contains(&n)) {
            return Ok(ModifierBinding::new(spec, spec, spec, ModifierFlags::NONE));
        }
    }

    let mut chars = spec.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_alphabetic() {
            let code = format!("Key{}", ch.to_ascii_uppercase());
            return Ok(ModifierBinding::new(
                spec,
                &code,
                &ch.to_lowercase().to_string(),
                ModifierFlags::NONE,
            ));
        }
        return Ok(ModifierBinding::new(spec, spec, spec, ModifierFlags::NONE));
    }

    bail!("unrecognized chord spec {spec:?}")
}

enum FlagBit {
    Ctrl,
    Alt,
    Shift,
    Meta,
}

fn modifier_part(part: &str) -> Option<(&'static str, &'static str, FlagBit)> {
    Some(match part {
        "Shift" => ("ShiftLeft", "Shift", FlagBit::Shift),
        "Ctrl" | "Control" => ("ControlLeft", "Control", FlagBit::Ctrl),
        "Alt" => ("AltLeft", "Alt", FlagBit::Alt),
        "Meta" | "Super" => ("MetaLeft", "Meta", FlagBit::Meta),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_binding};
    use anyhow::Result;
    use quickswitch_app::model::ModifierFlags;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        let snapshot = config.to_snapshot()?;
        assert_eq!(snapshot.close_binding.key, "Shift");
        assert_eq!(snapshot.suggestion_limit, 8);
        assert!(snapshot.recently_closed_enabled);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("[keys]\nclose = \"Shift\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        assert!(error.to_string().contains("version = 1"));
        Ok(())
    }

    #[test]
    fn unsupported_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 9\n")?;
        let error = Config::load(&path).expect_err("v9 config should fail");
        assert!(error.to_string().contains("unsupported config version 9"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn overrides_flow_into_the_snapshot() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n\
             [keys]\nclose = \"Ctrl\"\nforce_search = \"F20\"\n\
             [behavior]\nsuggestion_limit = 4\nenable_search_history = false\n\
             [search]\ndefault_url = \"https://search.example/?q=\"\n\
             [answers]\ntarget_currencies = [\"nok\", \"usd\"]\n",
        )?;
        let snapshot = Config::load(&path)?.to_snapshot()?;
        assert_eq!(snapshot.close_binding.key, "Control");
        assert!(snapshot.close_binding.flags.ctrl);
        assert_eq!(snapshot.force_search_binding.code, "F20");
        assert_eq!(snapshot.suggestion_limit, 4);
        assert!(!snapshot.enable_search_history);
        assert_eq!(snapshot.default_search_url, "https://search.example/?q=");
        assert_eq!(snapshot.target_currencies, ["NOK", "USD"]);
        Ok(())
    }

    #[test]
    fn conflicting_hold_chords_are_rejected() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[keys]\nclose = \"Shift\"\ntarget = \"Shift\"\n")?;
        let error = Config::load(&path)?
            .to_snapshot()
            .expect_err("same chord twice should fail");
        assert!(error.to_string().contains("same chord"));
        Ok(())
    }

    #[test]
    fn modifier_combo_chords_union_their_flags() -> Result<()> {
        let binding = parse_binding("Ctrl+Alt")?;
        assert!(binding.flags.ctrl);
        assert!(binding.flags.alt);
        // The chord completes on the last modifier pressed.
        assert_eq!(binding.code, "AltLeft");
        assert_eq!(binding.key, "Alt");
        Ok(())
    }

    #[test]
    fn character_chords_map_to_physical_codes() -> Result<()> {
        let letter = parse_binding("g")?;
        assert_eq!(letter.code, "KeyG");
        assert_eq!(letter.key, "g");
        assert_eq!(letter.flags, ModifierFlags::NONE);

        let umlaut = parse_binding("ö")?;
        assert_eq!(umlaut.code, "ö");
        assert_eq!(umlaut.key, "ö");
        Ok(())
    }

    #[test]
    fn blank_and_mixed_chords_are_rejected() {
        assert!(parse_binding("  ").is_err());
        assert!(parse_binding("Ctrl+Enter").is_err());
        assert!(parse_binding("ShiftAltGr").is_err());
    }

    #[test]
    fn zero_suggestion_limit_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[behavior]\nsuggestion_limit = 0\n")?;
        let error = Config::load(&path)?
            .to_snapshot()
            .expect_err("zero limit should fail");
        assert!(error.to_string().contains("suggestion_limit"));
        Ok(())
    }

    #[test]
    fn engine_entries_build_shortcuts() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n\
             [[engines]]\nid = \"docs\"\nlabel = \"Docs\"\nletter = \"d\"\n\
             url = \"https://docs.example/?q=\"\nshift = true\n",
        )?;
        let snapshot = Config::load(&path)?.to_snapshot()?;
        assert_eq!(snapshot.engines.len(), 1);
        assert_eq!(snapshot.engines[0].shortcut.code, "KeyD");
        assert!(snapshot.engines[0].shortcut.flags.shift);
        Ok(())
    }

    #[test]
    fn bad_engine_letters_and_duplicate_ids_are_rejected() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n\
             [[engines]]\nid = \"docs\"\nlabel = \"Docs\"\nletter = \"dd\"\n\
             url = \"https://docs.example/?q=\"\n",
        )?;
        let error = Config::load(&path)?
            .to_snapshot()
            .expect_err("two-letter shortcut should fail");
        assert!(error.to_string().contains("one character"));

        let (_temp, path) = write_config(
            "version = 1\n\
             [[engines]]\nid = \"docs\"\nlabel = \"Docs\"\nletter = \"d\"\n\
             url = \"https://docs.example/?q=\"\n\
             [[engines]]\nid = \"docs\"\nlabel = \"Docs 2\"\nletter = \"e\"\n\
             url = \"https://docs2.example/?q=\"\n",
        )?;
        let error = Config::load(&path)?
            .to_snapshot()
            .expect_err("duplicate id should fail");
        assert!(error.to_string().contains("duplicate engine id"));
        Ok(())
    }

    #[test]
    fn weather_coordinates_are_range_checked() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[answers.weather.\"'t\"]\nname = \"Nowhere\"\nlatitude = 99.0\nlongitude = 10.0\n",
        )?;
        let error = Config::load(&path)?
            .to_snapshot()
            .expect_err("latitude 99 should fail");
        assert!(error.to_string().contains("latitude"));
        Ok(())
    }

    #[test]
    fn service_prefix_remaps_only_leading_quote_keys() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n\
             [answers]\nservice_prefix = \";\"\n\
             [answers.translations]\n\"'e\" = \"en\"\n\"zz\" = \"de\"\n",
        )?;
        let snapshot = Config::load(&path)?.to_snapshot()?;
        assert_eq!(snapshot.translation_prefixes[";e"], "en");
        assert_eq!(snapshot.translation_prefixes["zz"], "de");
        assert!(!snapshot.translation_prefixes.contains_key("'e"));
        // Built-in tables are rewritten too.
        assert_eq!(snapshot.definition_prefixes[";d"], "en");
        assert!(snapshot.weather_locations.contains_key(";t"));
        Ok(())
    }

    #[test]
    fn bad_currency_codes_are_rejected() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[answers]\ntarget_currencies = [\"NOKK\"]\n")?;
        let error = Config::load(&path)?
            .to_snapshot()
            .expect_err("four-letter code should fail");
        assert!(error.to_string().contains("three-letter"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("QUICKSWITCH_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("QUICKSWITCH_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_ends_with_config_toml() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("QUICKSWITCH_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("config.toml"));
        Ok(())
    }

    #[test]
    fn example_config_parses_and_round_trips() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        std::fs::write(&path, &example)?;

        let snapshot = Config::load(&path)?.to_snapshot()?;
        assert_eq!(snapshot.suggestion_limit, 8);
        assert_eq!(snapshot.weather_locations["'t"].name, "Tryvann");
        assert_eq!(snapshot.translation_prefixes["'a"], "auto");
        assert_eq!(snapshot.definition_prefixes["'d"], "en");
        Ok(())
    }
}
