// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Turns a [`QueryClaim`] into a displayable [`InstantAnswer`] by calling
//! out through the provider traits. Every failure degrades to `None` (or
//! an in-answer error for definitions) so the popup never blocks on a
//! flaky backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use quickswitch_app::model::{SettingsSnapshot, WeatherLocation};
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

use crate::currency::CurrencyQuery;
use crate::registry::QueryClaim;
use crate::{lang, math};

/// Converted amounts keyed by target currency code.
pub trait RateProvider: Send + Sync {
    fn convert(&self, amount: f64, from: &str, to: &[String]) -> Result<BTreeMap<String, f64>>;
}

pub trait ForecastProvider: Send + Sync {
    fn hourly(&self, location: &WeatherLocation) -> Result<HourlyForecast>;
}

/// `Ok(None)` means the backend had no usable translation.
pub trait TranslationProvider: Send + Sync {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<Option<String>>;
}

pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Result<Option<String>>;
}

/// `Ok(None)` means the word is not in the dictionary, as opposed to a
/// transport failure.
pub trait DefinitionProvider: Send + Sync {
    fn lookup(&self, lang: &str, word: &str) -> Result<Option<DefinitionEntry>>;
}

pub trait SpellingProvider: Send + Sync {
    fn suggest(&self, word: &str) -> Result<Option<String>>;
}

pub trait AiProvider: Send + Sync {
    fn answer(&self, question: &str) -> Result<Option<String>>;
}

/// Hourly forecast series, parallel-indexed by time slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyForecast {
    pub times: Vec<OffsetDateTime>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub wind: Vec<f64>,
    pub weather_code: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionEntry {
    pub word: String,
    pub phonetic: Option<String>,
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Meaning {
    pub part_of_speech: String,
    pub senses: Vec<Sense>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sense {
    pub definition: String,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstantAnswer {
    Math {
        expression: String,
        value: String,
    },
    Currency {
        conversions: Vec<Conversion>,
        multi: bool,
    },
    Weather(WeatherAnswer),
    Translation(TranslationAnswer),
    Definition(DefinitionAnswer),
    Ai {
        question: String,
        answer: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub currency: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherAnswer {
    pub heading: String,
    pub current: WeatherPoint,
    pub upcoming: Vec<WeatherPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherPoint {
    pub label: String,
    pub temperature: i64,
    pub wind: i64,
    pub humidity: i64,
    pub precipitation: i64,
    pub symbol: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationAnswer {
    pub lines: Vec<TranslationLine>,
    pub detected: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationLine {
    pub lang: String,
    pub text: String,
    pub is_original: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionAnswer {
    pub word: String,
    pub phonetic: Option<String>,
    pub meanings: Vec<Meaning>,
    pub language: Option<String>,
    pub corrected_from: Option<String>,
    pub error: Option<String>,
}

impl DefinitionAnswer {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// WMO weather code as display text.
pub fn weather_symbol(code: i64) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 => "fog",
        48 => "depositing rime fog",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        56 => "light freezing drizzle",
        57 => "dense freezing drizzle",
        61 => "slight rain",
        63 => "moderate rain",
        65 => "heavy rain",
        66 => "light freezing rain",
        67 => "heavy freezing rain",
        71 => "slight snow",
        73 => "moderate snow",
        75 => "heavy snow",
        77 => "snow grains",
        80 => "slight rain showers",
        81 => "moderate rain showers",
        82 => "violent rain showers",
        85 => "slight snow showers",
        86 => "heavy snow showers",
        95 => "thunderstorm",
        96 => "thunderstorm with slight hail",
        99 => "thunderstorm with heavy hail",
        _ => "unknown",
    }
}

pub struct Providers {
    pub rates: Box<dyn RateProvider>,
    pub forecast: Box<dyn ForecastProvider>,
    pub translator: Box<dyn TranslationProvider>,
    pub detector: Box<dyn LanguageDetector>,
    pub definitions: Box<dyn DefinitionProvider>,
    pub spelling: Box<dyn SpellingProvider>,
    /// Absent when no API key is configured.
    pub ai: Option<Box<dyn AiProvider>>,
}

const RATE_CACHE_TTL: Duration = Duration::minutes(10);

struct CachedRate {
    rate: f64,
    fetched_at: OffsetDateTime,
}

pub struct AnswerFetcher {
    providers: Providers,
    rates: Mutex<HashMap<(String, String), CachedRate>>,
}

impl AnswerFetcher {
    pub fn new(providers: Providers) -> Self {
        Self {
            providers,
            rates: Mutex::new(HashMap::new()),
        }
    }

    pub fn resolve(
        &self,
        claim: QueryClaim,
        settings: &SettingsSnapshot,
        now: OffsetDateTime,
    ) -> Option<InstantAnswer> {
        match claim {
            QueryClaim::Ai { question } => self.ai(question),
            QueryClaim::Weather {
                location,
                hour_offset,
            } => self.weather(&location, hour_offset, now),
            QueryClaim::Translate { source_lang, text } => {
                self.translate(&source_lang, text, settings)
            }
            QueryClaim::Define { lang, word } => self.define(&lang, &word),
            QueryClaim::Math { expression } => math_answer(expression),
            QueryClaim::Currency(query) => self.currency(query, now),
        }
    }

    fn ai(&self, question: String) -> Option<InstantAnswer> {
        let Some(provider) = &self.providers.ai else {
            return Some(InstantAnswer::Ai {
                question,
                answer: "No AI API key set. Add your free key to the config file.".to_owned(),
            });
        };
        match provider.answer(&question) {
            Ok(Some(answer)) => Some(InstantAnswer::Ai { question, answer }),
            _ => None,
        }
    }

    fn currency(&self, query: CurrencyQuery, now: OffsetDateTime) -> Option<InstantAnswer> {
        match query {
            CurrencyQuery::Pair { amount, from, to } => {
                if let Some(rate) = self.cached_rate(&from, &to, now) {
                    return Some(InstantAnswer::Currency {
                        conversions: vec![conversion(&to, amount * rate)],
                        multi: false,
                    });
                }
                let rates = self
                    .providers
                    .rates
                    .convert(amount, &from, std::slice::from_ref(&to))
                    .ok()?;
                let converted = *rates.get(&to)?;
                self.store_rate(&from, &to, amount, converted, now);
                Some(InstantAnswer::Currency {
                    conversions: vec![conversion(&to, converted)],
                    multi: false,
                })
            }
            CurrencyQuery::Multi {
                amount,
                from,
                targets,
            } => {
                if targets.is_empty() {
                    return None;
                }
                // The batch always hits the backend; only the per-pair
                // rates are cached for later single conversions.
                let rates = self.providers.rates.convert(amount, &from, &targets).ok()?;
                let mut conversions = Vec::new();
                for target in &targets {
                    if let Some(&converted) = rates.get(target) {
                        self.store_rate(&from, target, amount, converted, now);
                        conversions.push(conversion(target, converted));
                    }
                }
                (!conversions.is_empty()).then_some(InstantAnswer::Currency {
                    conversions,
                    multi: true,
                })
            }
        }
    }

    fn cached_rate(&self, from: &str, to: &str, now: OffsetDateTime) -> Option<f64> {
        let cache = self.rates.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .get(&(from.to_owned(), to.to_owned()))
            .filter(|entry| now - entry.fetched_at < RATE_CACHE_TTL)
            .map(|entry| entry.rate)
    }

    fn store_rate(&self, from: &str, to: &str, amount: f64, converted: f64, now: OffsetDateTime) {
        if amount == 0.0 {
            return;
        }
        let mut cache = self.rates.lock().unwrap_or_else(PoisonError::into_inner);
        cache.insert(
            (from.to_owned(), to.to_owned()),
            CachedRate {
                rate: converted / amount,
                fetched_at: now,
            },
        );
    }

    fn weather(
        &self,
        location: &WeatherLocation,
        hour_offset: i64,
        now: OffsetDateTime,
    ) -> Option<InstantAnswer> {
        let forecast = self.providers.forecast.hourly(location).ok()?;
        if forecast.times.is_empty() {
            return None;
        }

        let now_index = forecast
            .times
            .iter()
            .enumerate()
            .min_by_key(|(_, slot)| (**slot - now).whole_milliseconds().abs())
            .map(|(index, _)| index)?;
        let target = now_index as i64 + hour_offset;
        if target < 0 || target >= forecast.times.len() as i64 {
            return None;
        }
        let target = target as usize;

        let clock = format_description!("[hour]:[minute]");
        let current_label = if hour_offset == 0 {
            "Now".to_owned()
        } else {
            forecast.times[target].format(clock).ok()?
        };
        let current = sample(&forecast, target, current_label);

        let mut upcoming = Vec::new();
        for step in [1usize, 3, 6, 9] {
            let index = target + step;
            if index < forecast.times.len() {
                let label = forecast.times[index].format(clock).ok()?;
                upcoming.push(sample(&forecast, index, label));
            }
        }

        let heading = if hour_offset == 0 {
            location.name.clone()
        } else if hour_offset < 24 {
            format!("{} (+{hour_offset}h)", location.name)
        } else {
            let date = format_description!("[weekday repr:short] [day padding:none] [month repr:short]");
            format!("{} ({})", location.name, forecast.times[target].format(date).ok()?)
        };

        Some(InstantAnswer::Weather(WeatherAnswer {
            heading,
            current,
            upcoming,
        }))
    }

    fn translate(
        &self,
        source_lang: &str,
        text: String,
        settings: &SettingsSnapshot,
    ) -> Option<InstantAnswer> {
        let detected = if source_lang == "auto" {
            self.detect_language(&text)
        } else {
            source_lang.to_owned()
        };

        let mut lines = vec![TranslationLine {
            lang: detected.clone(),
            text: text.clone(),
            is_original: true,
        }];
        for target in &settings.translation_targets {
            if *target == detected {
                continue;
            }
            if let Ok(Some(translated)) = self.providers.translator.translate(&text, &detected, target)
            {
                lines.push(TranslationLine {
                    lang: target.clone(),
                    text: translated,
                    is_original: false,
                });
            }
        }

        // Display order follows the configured target list; anything not
        // in it (usually the detected original) sinks to the end.
        lines.sort_by_key(|line| {
            settings
                .translation_targets
                .iter()
                .position(|target| *target == line.lang)
                .unwrap_or(usize::MAX)
        });

        Some(InstantAnswer::Translation(TranslationAnswer {
            lines,
            detected,
        }))
    }

    fn detect_language(&self, text: &str) -> String {
        match self.providers.detector.detect(text) {
            Ok(Some(code)) => {
                let code = code.to_lowercase();
                let code = match code.as_str() {
                    "nb" | "nn" => "no".to_owned(),
                    _ => code,
                };
                if lang::is_known(&code) {
                    code
                } else {
                    "en".to_owned()
                }
            }
            _ => "en".to_owned(),
        }
    }

    fn define(&self, lang_code: &str, word: &str) -> Option<InstantAnswer> {
        let answer = match self.providers.definitions.lookup(lang_code, &word.to_lowercase()) {
            Ok(Some(entry)) => definition_answer(entry, language_label(lang_code), None),
            Ok(None) if lang_code == "en" => match self.providers.spelling.suggest(word) {
                Ok(Some(suggestion)) => {
                    match self.providers.definitions.lookup("en", &suggestion) {
                        Ok(Some(entry)) => {
                            definition_answer(entry, None, Some(word.to_owned()))
                        }
                        Ok(None) => not_found(word),
                        Err(_) => DefinitionAnswer::failure("Failed to fetch definition"),
                    }
                }
                Ok(None) => not_found(word),
                Err(_) => DefinitionAnswer::failure("Failed to fetch definition"),
            },
            Ok(None) => not_found(word),
            Err(_) => DefinitionAnswer::failure("Failed to fetch definition"),
        };
        Some(InstantAnswer::Definition(answer))
    }
}

fn math_answer(expression: String) -> Option<InstantAnswer> {
    let value = math::evaluate(&expression)?;
    Some(InstantAnswer::Math {
        value: math::format_result(value),
        expression,
    })
}

fn conversion(currency: &str, converted: f64) -> Conversion {
    Conversion {
        currency: currency.to_owned(),
        amount: format!("{converted:.2}"),
    }
}

fn sample(forecast: &HourlyForecast, index: usize, label: String) -> WeatherPoint {
    let rounded = |series: &[f64]| series.get(index).copied().unwrap_or(0.0).round() as i64;
    WeatherPoint {
        label,
        temperature: rounded(&forecast.temperature),
        wind: rounded(&forecast.wind),
        humidity: rounded(&forecast.humidity),
        precipitation: rounded(&forecast.precipitation),
        symbol: forecast
            .weather_code
            .get(index)
            .copied()
            .map_or("unknown", weather_symbol),
    }
}

fn language_label(lang_code: &str) -> Option<String> {
    (lang_code != "en").then(|| lang::name(lang_code).to_owned())
}

fn not_found(word: &str) -> DefinitionAnswer {
    DefinitionAnswer::failure(format!("Word not found: \"{word}\""))
}

fn definition_answer(
    mut entry: DefinitionEntry,
    language: Option<String>,
    corrected_from: Option<String>,
) -> DefinitionAnswer {
    entry.meanings.truncate(3);
    for meaning in &mut entry.meanings {
        meaning.senses.truncate(2);
    }
    DefinitionAnswer {
        word: entry.word,
        phonetic: entry.phonetic,
        meanings: entry.meanings,
        language,
        corrected_from,
        error: None,
    }
}
