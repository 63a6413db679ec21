// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use quickswitch_app::model::{SettingsSnapshot, WeatherLocation};
use time::OffsetDateTime;

use crate::currency::{self, CurrencyQuery};
use crate::{math, prefix, weather};

/// One interpreter's claim on the query. A query yields at most one claim.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClaim {
    Ai {
        question: String,
    },
    Weather {
        location: WeatherLocation,
        hour_offset: i64,
    },
    Translate {
        source_lang: String,
        text: String,
    },
    Define {
        lang: String,
        word: String,
    },
    Math {
        expression: String,
    },
    Currency(CurrencyQuery),
}

type Interpreter = fn(&SettingsSnapshot, &str, OffsetDateTime) -> Option<QueryClaim>;

/// Interpreters in priority order; the first claim wins. The order matters
/// at the seams: `5 usd?` is an AI question, `5 usd` is currency, and
/// `5+5` is arithmetic before anything else gets a look.
const INTERPRETERS: [Interpreter; 6] = [
    interpret_ai,
    interpret_weather,
    interpret_translation,
    interpret_definition,
    interpret_math,
    interpret_currency,
];

pub fn classify(
    settings: &SettingsSnapshot,
    query: &str,
    now: OffsetDateTime,
) -> Option<QueryClaim> {
    INTERPRETERS
        .iter()
        .find_map(|interpret| interpret(settings, query, now))
}

fn interpret_ai(settings: &SettingsSnapshot, query: &str, _: OffsetDateTime) -> Option<QueryClaim> {
    prefix::parse_ai(&settings.ai_trigger, query).map(|question| QueryClaim::Ai { question })
}

fn interpret_weather(
    settings: &SettingsSnapshot,
    query: &str,
    now: OffsetDateTime,
) -> Option<QueryClaim> {
    weather::parse_query(settings, query, now).map(|parsed| QueryClaim::Weather {
        location: parsed.location,
        hour_offset: parsed.hour_offset,
    })
}

fn interpret_translation(
    settings: &SettingsSnapshot,
    query: &str,
    _: OffsetDateTime,
) -> Option<QueryClaim> {
    prefix::parse_prefixed(&settings.translation_prefixes, query).map(|(source_lang, text)| {
        QueryClaim::Translate { source_lang, text }
    })
}

fn interpret_definition(
    settings: &SettingsSnapshot,
    query: &str,
    _: OffsetDateTime,
) -> Option<QueryClaim> {
    prefix::parse_prefixed(&settings.definition_prefixes, query)
        .map(|(lang, word)| QueryClaim::Define { lang, word })
}

fn interpret_math(
    _: &SettingsSnapshot,
    query: &str,
    _: OffsetDateTime,
) -> Option<QueryClaim> {
    math::claim(query).map(|expression| QueryClaim::Math {
        expression: expression.to_owned(),
    })
}

fn interpret_currency(
    settings: &SettingsSnapshot,
    query: &str,
    _: OffsetDateTime,
) -> Option<QueryClaim> {
    currency::parse(&settings.target_currencies, query).map(QueryClaim::Currency)
}
