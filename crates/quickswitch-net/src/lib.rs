// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Blocking HTTP clients for the instant-answer and suggestion backends.
//! Each client implements one of the provider traits from
//! `quickswitch-answer` (or [`SuggestionSource`] from `quickswitch-app`)
//! so the fetch layer never knows which service it is talking to.

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use time::PrimitiveDateTime;
use time::macros::format_description;

use quickswitch_answer::{
    AiProvider, DefinitionEntry, DefinitionProvider, ForecastProvider, HourlyForecast,
    LanguageDetector, Meaning, Providers, RateProvider, Sense, SpellingProvider,
    TranslationProvider,
};
use quickswitch_app::model::WeatherLocation;
use quickswitch_app::results::SuggestionSource;

pub const FRANKFURTER_URL: &str = "https://api.frankfurter.app";
pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com";
pub const MYMEMORY_URL: &str = "https://api.mymemory.translated.net";
pub const DICTIONARY_URL: &str = "https://api.dictionaryapi.dev";
pub const DATAMUSE_URL: &str = "https://api.datamuse.com";
pub const BRAVE_SUGGEST_URL: &str = "https://search.brave.com";
pub const GROQ_URL: &str = "https://api.groq.com/openai/v1";

pub const GROQ_MODEL: &str = "llama-3.1-8b-instant";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Suggestions race the keystroke; anything slower than this is stale.
pub const SUGGEST_TIMEOUT: Duration = Duration::from_secs(3);

const AI_SYSTEM_PROMPT: &str = "Answer in 1-2 short sentences maximum. Be concise and direct. \
     always use metric and celsius. my location is norway. if the answer is a number only \
     display the number";

/// Wire up every live backend. The AI provider is only present when an
/// API key is configured.
pub fn live_providers(ai_api_key: &str) -> Result<Providers> {
    let ai: Option<Box<dyn AiProvider>> = if ai_api_key.trim().is_empty() {
        None
    } else {
        Some(Box::new(GroqClient::new(GROQ_URL, ai_api_key, DEFAULT_TIMEOUT)?))
    };
    Ok(Providers {
        rates: Box::new(FrankfurterClient::new(FRANKFURTER_URL, DEFAULT_TIMEOUT)?),
        forecast: Box::new(OpenMeteoClient::new(OPEN_METEO_URL, DEFAULT_TIMEOUT)?),
        translator: Box::new(MyMemoryClient::new(MYMEMORY_URL, DEFAULT_TIMEOUT)?),
        detector: Box::new(MyMemoryClient::new(MYMEMORY_URL, DEFAULT_TIMEOUT)?),
        definitions: Box::new(DictionaryClient::new(DICTIONARY_URL, DEFAULT_TIMEOUT)?),
        spelling: Box::new(DatamuseClient::new(DATAMUSE_URL, DEFAULT_TIMEOUT)?),
        ai,
    })
}

fn build_http(timeout: Duration) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .context("build HTTP client")
}

fn trimmed_base(base_url: &str, service: &str) -> Result<String> {
    let base_url = base_url.trim_end_matches('/').to_owned();
    if base_url.is_empty() {
        bail!("{service} base URL must not be empty");
    }
    Ok(base_url)
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!("cannot reach {base_url} ({error})")
}

/// Exchange rates from Frankfurter's `/latest` endpoint.
#[derive(Debug, Clone)]
pub struct FrankfurterClient {
    base_url: String,
    http: HttpClient,
}

impl FrankfurterClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: trimmed_base(base_url, "currency")?,
            http: build_http(timeout)?,
        })
    }
}

impl RateProvider for FrankfurterClient {
    fn convert(&self, amount: f64, from: &str, to: &[String]) -> Result<BTreeMap<String, f64>> {
        let response = self
            .http
            .get(format!("{}/latest", self.base_url))
            .query(&[
                ("amount", amount.to_string()),
                ("from", from.to_owned()),
                ("to", to.join(",")),
            ])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            bail!("currency server returned {}", status.as_u16());
        }
        let parsed: RatesResponse = response.json().context("decode exchange rates")?;
        Ok(parsed.rates)
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: BTreeMap<String, f64>,
}

/// Hourly forecasts from Open-Meteo, 16 days out, in UTC.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    base_url: String,
    http: HttpClient,
}

impl OpenMeteoClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: trimmed_base(base_url, "weather")?,
            http: build_http(timeout)?,
        })
    }
}

impl ForecastProvider for OpenMeteoClient {
    fn hourly(&self, location: &WeatherLocation) -> Result<HourlyForecast> {
        let response = self
            .http
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                (
                    "hourly",
                    "temperature_2m,relative_humidity_2m,precipitation_probability,weather_code,wind_speed_10m"
                        .to_owned(),
                ),
                ("forecast_days", "16".to_owned()),
                ("timezone", "UTC".to_owned()),
            ])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            bail!("weather server returned {}", status.as_u16());
        }
        let parsed: ForecastResponse = response.json().context("decode forecast")?;
        let hourly = parsed.hourly;

        let times = hourly
            .time
            .iter()
            .map(|raw| parse_forecast_time(raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(HourlyForecast {
            times,
            temperature: fill_gaps(hourly.temperature_2m),
            humidity: fill_gaps(hourly.relative_humidity_2m),
            precipitation: fill_gaps(hourly.precipitation_probability),
            wind: fill_gaps(hourly.wind_speed_10m),
            weather_code: hourly
                .weather_code
                .into_iter()
                .map(|code| code.unwrap_or(-1))
                .collect(),
        })
    }
}

fn parse_forecast_time(raw: &str) -> Result<time::OffsetDateTime> {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let parsed = PrimitiveDateTime::parse(raw, format)
        .with_context(|| format!("parse forecast time {raw:?}"))?;
    Ok(parsed.assume_utc())
}

fn fill_gaps(series: Vec<Option<f64>>) -> Vec<f64> {
    series.into_iter().map(|value| value.unwrap_or(0.0)).collect()
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: ForecastSeries,
}

#[derive(Debug, Deserialize)]
struct ForecastSeries {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Option<i64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

/// MyMemory serves both translation and language detection through the
/// same `/get` endpoint; detection is a translation into English with an
/// `autodetect` source.
#[derive(Debug, Clone)]
pub struct MyMemoryClient {
    base_url: String,
    http: HttpClient,
}

impl MyMemoryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: trimmed_base(base_url, "translation")?,
            http: build_http(timeout)?,
        })
    }

    fn get(&self, text: &str, langpair: &str) -> Result<Option<MyMemoryData>> {
        let response = self
            .http
            .get(format!("{}/get", self.base_url))
            .query(&[("q", text), ("langpair", langpair)])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        if !response.status().is_success() {
            return Ok(None);
        }
        let parsed: MyMemoryResponse = response.json().context("decode translation")?;
        if parsed.response_status != 200 {
            return Ok(None);
        }
        Ok(parsed.response_data)
    }
}

impl TranslationProvider for MyMemoryClient {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<Option<String>> {
        let data = self.get(text, &format!("{from}|{to}"))?;
        Ok(data
            .and_then(|data| data.translated_text)
            .filter(|translated| !translated.is_empty()))
    }
}

impl LanguageDetector for MyMemoryClient {
    fn detect(&self, text: &str) -> Result<Option<String>> {
        let data = self.get(text, "autodetect|en")?;
        Ok(data
            .and_then(|data| data.detected_language)
            .filter(|code| !code.is_empty()))
    }
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseStatus")]
    response_status: i64,
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    #[serde(rename = "detectedLanguage")]
    detected_language: Option<String>,
}

/// Word lookups against dictionaryapi.dev. A 404 is a dictionary miss,
/// not a transport failure.
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    base_url: String,
    http: HttpClient,
}

impl DictionaryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: trimmed_base(base_url, "dictionary")?,
            http: build_http(timeout)?,
        })
    }
}

impl DefinitionProvider for DictionaryClient {
    fn lookup(&self, lang: &str, word: &str) -> Result<Option<DefinitionEntry>> {
        let response = self
            .http
            .get(format!("{}/api/v2/entries/{lang}/{word}", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            bail!("dictionary server returned {}", status.as_u16());
        }
        let entries: Vec<DictionaryEntry> = response.json().context("decode definition")?;
        let Some(entry) = entries.into_iter().next() else {
            return Ok(None);
        };

        let phonetic = entry
            .phonetic
            .filter(|text| !text.is_empty())
            .or_else(|| {
                entry
                    .phonetics
                    .into_iter()
                    .find_map(|candidate| candidate.text.filter(|text| !text.is_empty()))
            });
        let meanings = entry
            .meanings
            .into_iter()
            .map(|meaning| Meaning {
                part_of_speech: meaning.part_of_speech,
                senses: meaning
                    .definitions
                    .into_iter()
                    .map(|sense| Sense {
                        definition: sense.definition,
                        example: sense.example,
                    })
                    .collect(),
            })
            .collect();
        Ok(Some(DefinitionEntry {
            word: entry.word,
            phonetic,
            meanings,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct DictionaryEntry {
    word: String,
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<DictionaryPhonetic>,
    #[serde(default)]
    meanings: Vec<DictionaryMeaning>,
}

#[derive(Debug, Deserialize)]
struct DictionaryPhonetic {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DictionaryMeaning {
    #[serde(rename = "partOfSpeech")]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<DictionaryDefinition>,
}

#[derive(Debug, Deserialize)]
struct DictionaryDefinition {
    definition: String,
    example: Option<String>,
}

/// Spelling corrections from Datamuse; only the best match is used.
#[derive(Debug, Clone)]
pub struct DatamuseClient {
    base_url: String,
    http: HttpClient,
}

impl DatamuseClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: trimmed_base(base_url, "spelling")?,
            http: build_http(timeout)?,
        })
    }
}

impl SpellingProvider for DatamuseClient {
    fn suggest(&self, word: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(format!("{}/sug", self.base_url))
            .query(&[("s", word), ("max", "1")])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            bail!("spelling server returned {}", status.as_u16());
        }
        let suggestions: Vec<DatamuseRow> =
            response.json().context("decode spelling suggestions")?;
        Ok(suggestions.into_iter().next().map(|row| row.word))
    }
}

#[derive(Debug, Deserialize)]
struct DatamuseRow {
    word: String,
}

/// Search suggestions from Brave's OpenSearch endpoint. The response is
/// `[query, [suggestion, ...]]`; anything malformed yields no rows.
#[derive(Debug, Clone)]
pub struct BraveSuggestClient {
    base_url: String,
    http: HttpClient,
}

impl BraveSuggestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: trimmed_base(base_url, "suggestions")?,
            http: build_http(timeout)?,
        })
    }
}

impl SuggestionSource for BraveSuggestClient {
    fn suggest(&self, query: &str) -> Result<Vec<String>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .http
            .get(format!("{}/api/suggest", self.base_url))
            .query(&[("q", query)])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }
        let parsed: serde_json::Value = response.json().context("decode suggestions")?;
        let Some(rows) = parsed.get(1).and_then(|value| value.as_array()) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .iter()
            .filter_map(|value| value.as_str().map(str::to_owned))
            .take(8)
            .collect())
    }
}

/// Groq's OpenAI-compatible chat endpoint, pinned to a small instant
/// model. No answer (or any API error) simply means no instant answer.
pub struct GroqClient {
    base_url: String,
    api_key: String,
    http: HttpClient,
}

impl GroqClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            bail!("AI API key must not be empty");
        }
        Ok(Self {
            base_url: trimmed_base(base_url, "AI")?,
            api_key: api_key.to_owned(),
            http: build_http(timeout)?,
        })
    }
}

impl AiProvider for GroqClient {
    fn answer(&self, question: &str) -> Result<Option<String>> {
        let request = ChatRequest::new(question);
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        if !response.status().is_success() {
            return Ok(None);
        }
        let parsed: ChatResponse = response.json().context("decode AI response")?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_owned())
            .filter(|answer| !answer.is_empty()))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'static str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

impl<'a> ChatRequest<'a> {
    fn new(question: &'a str) -> Self {
        Self {
            model: GROQ_MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: AI_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            max_tokens: 100,
            temperature: 0.5,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
