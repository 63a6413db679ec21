// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use quickswitch_app::model::{SettingsSnapshot, WeatherLocation};
use time::{Date, Month, OffsetDateTime};

/// Forecast horizon of the hourly API, in hours (16 days).
pub const MAX_HOUR_OFFSET: i64 = 384;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub location: WeatherLocation,
    pub hour_offset: i64,
}

/// Match a weather prefix, alone or followed by a time offset. Trailing
/// text that fails to parse as an offset still claims the query with
/// offset zero, so half-typed offsets keep showing current weather.
pub fn parse_query(
    settings: &SettingsSnapshot,
    query: &str,
    now: OffsetDateTime,
) -> Option<WeatherQuery> {
    let trimmed = query.trim().to_lowercase();
    for (prefix, location) in &settings.weather_locations {
        if trimmed == *prefix {
            return Some(WeatherQuery {
                location: location.clone(),
                hour_offset: 0,
            });
        }
        if trimmed.starts_with(&format!("{prefix} ")) {
            let rest = trimmed[prefix.len()..].trim();
            let hour_offset = parse_time_offset(rest, now)
                .map(|hours| hours.min(MAX_HOUR_OFFSET))
                .unwrap_or(0);
            return Some(WeatherQuery {
                location: location.clone(),
                hour_offset,
            });
        }
    }
    None
}

/// The offset grammar: empty means now, a bare integer means hours, `Nd`
/// means days, a weekday name means the next such day, and `DDmon` means
/// that calendar date (next year when already past).
pub fn parse_time_offset(input: &str, now: OffsetDateTime) -> Option<i64> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return Some(0);
    }

    if let Ok(hours) = trimmed.parse::<i64>() {
        if hours.to_string() == trimmed {
            return Some(hours);
        }
    }

    if let Some(day_digits) = trimmed.strip_suffix('d') {
        if !day_digits.is_empty() && day_digits.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(days) = day_digits.parse::<i64>() {
                return Some(days * 24);
            }
        }
    }

    const DAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];
    if let Some(target_day) = DAY_NAMES.iter().position(|name| *name == trimmed) {
        let today = now.weekday().number_days_from_sunday() as i64;
        let mut days_until = target_day as i64 - today;
        if days_until <= 0 {
            // Today or earlier in the week means the next occurrence.
            days_until += 7;
        }
        return Some(days_until * 24);
    }

    if let Some(hours) = parse_date_offset(&trimmed, now) {
        return Some(hours);
    }

    None
}

const MONTHS: [(&str, Month); 12] = [
    ("jan", Month::January),
    ("feb", Month::February),
    ("mar", Month::March),
    ("apr", Month::April),
    ("may", Month::May),
    ("jun", Month::June),
    ("jul", Month::July),
    ("aug", Month::August),
    ("sep", Month::September),
    ("oct", Month::October),
    ("nov", Month::November),
    ("dec", Month::December),
];

fn parse_date_offset(input: &str, now: OffsetDateTime) -> Option<i64> {
    let digit_count = input.chars().take_while(|c| c.is_ascii_digit()).count();
    if !(1..=2).contains(&digit_count) {
        return None;
    }
    let day: u8 = input[..digit_count].parse().ok()?;
    let month_name = &input[digit_count..];
    let (_, month) = MONTHS.iter().find(|(name, _)| *name == month_name)?;

    let mut target = Date::from_calendar_date(now.year(), *month, day)
        .ok()?
        .midnight()
        .assume_offset(now.offset());
    if target < now {
        target = Date::from_calendar_date(now.year() + 1, *month, day)
            .ok()?
            .midnight()
            .assume_offset(now.offset());
    }
    let seconds = (target - now).whole_seconds();
    Some(((seconds as f64) / 3600.0).round() as i64)
}
