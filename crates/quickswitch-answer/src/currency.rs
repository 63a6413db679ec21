// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// ISO codes accepted as conversion endpoints.
pub const CURRENCY_CODES: [&str; 33] = [
    "USD", "EUR", "GBP", "JPY", "NOK", "SEK", "DKK", "CHF", "CAD", "AUD", "NZD", "CNY", "INR",
    "BRL", "MXN", "PLN", "CZK", "HUF", "RON", "BGN", "ISK", "HRK", "RUB", "TRY", "ZAR", "KRW",
    "SGD", "HKD", "THB", "MYR", "IDR", "PHP", "ILS",
];

const CURRENCY_ALIASES: [(&str, &str); 1] = [("euro", "EUR")];

pub fn normalize(input: &str) -> Option<String> {
    let upper = input.to_uppercase();
    if CURRENCY_CODES.contains(&upper.as_str()) {
        return Some(upper);
    }
    let lower = input.to_lowercase();
    CURRENCY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, code)| (*code).to_owned())
}

/// A parsed conversion request. The single-code form fans out to the
/// configured target currencies with the source removed.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrencyQuery {
    Pair {
        amount: f64,
        from: String,
        to: String,
    },
    Multi {
        amount: f64,
        from: String,
        targets: Vec<String>,
    },
}

/// Accepts `AMOUNT CODE [to|in] CODE` and `AMOUNT CODE`, with the amount
/// optionally glued to the first code (`10usd nok`). Unknown codes reject
/// the whole query.
pub fn parse(target_currencies: &[String], query: &str) -> Option<CurrencyQuery> {
    let trimmed = query.trim();
    let (amount, rest) = split_amount(trimmed)?;
    let rest = rest.trim_start();

    let first_len = rest.chars().take_while(char::is_ascii_alphabetic).count();
    if first_len == 0 {
        return None;
    }
    let (first, tail) = rest.split_at(first_len);

    if tail.is_empty() {
        let from = normalize(first)?;
        let targets = target_currencies
            .iter()
            .filter(|code| **code != from)
            .cloned()
            .collect();
        return Some(CurrencyQuery::Multi {
            amount,
            from,
            targets,
        });
    }

    // Two-code form needs whitespace between the codes.
    if !tail.starts_with(char::is_whitespace) {
        return None;
    }
    let second = strip_connector(tail.trim_start()).trim_start();
    if second.is_empty() || !second.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let from = normalize(first)?;
    let to = normalize(second)?;
    Some(CurrencyQuery::Pair { amount, from, to })
}

/// Leading `to`/`in` connectors are optional noise, spaced or glued:
/// `usd to nok`, `usd in nok`, `usd tonok`, and `usd nok` all mean the
/// same thing. A bare `to` or `in` is left alone so it fails currency
/// normalization instead of vanishing.
fn strip_connector(code: &str) -> &str {
    for connector in ["to", "in"] {
        if code.len() > connector.len()
            && code[..connector.len()].eq_ignore_ascii_case(connector)
        {
            return &code[connector.len()..];
        }
    }
    code
}

fn split_amount(input: &str) -> Option<(f64, &str)> {
    let int_len = input.chars().take_while(char::is_ascii_digit).count();
    if int_len == 0 {
        return None;
    }
    let mut len = int_len;
    let after_int = &input[int_len..];
    if let Some(frac) = after_int.strip_prefix('.') {
        let frac_len = frac.chars().take_while(char::is_ascii_digit).count();
        if frac_len == 0 {
            return None;
        }
        len += 1 + frac_len;
    }
    let amount: f64 = input[..len].parse().ok()?;
    Some((amount, &input[len..]))
}

#[cfg(test)]
mod tests {
    use super::{CurrencyQuery, normalize, parse};

    fn targets() -> Vec<String> {
        vec!["NOK".to_owned(), "EUR".to_owned(), "USD".to_owned()]
    }

    #[test]
    fn normalization_and_aliases() {
        assert_eq!(normalize("usd"), Some("USD".to_owned()));
        assert_eq!(normalize("NOK"), Some("NOK".to_owned()));
        assert_eq!(normalize("Euro"), Some("EUR".to_owned()));
        assert_eq!(normalize("doge"), None);
    }

    #[test]
    fn pair_forms() {
        let expected = Some(CurrencyQuery::Pair {
            amount: 10.0,
            from: "USD".to_owned(),
            to: "NOK".to_owned(),
        });
        assert_eq!(parse(&targets(), "10 usd nok"), expected);
        assert_eq!(parse(&targets(), "10 usd to nok"), expected);
        assert_eq!(parse(&targets(), "10 usd in nok"), expected);
        assert_eq!(parse(&targets(), "10usd nok"), expected);
        // Connector glued to the target code.
        assert_eq!(parse(&targets(), "10 usd tonok"), expected);
    }

    #[test]
    fn decimal_amounts() {
        assert_eq!(
            parse(&targets(), "50.5 gbp in nok"),
            Some(CurrencyQuery::Pair {
                amount: 50.5,
                from: "GBP".to_owned(),
                to: "NOK".to_owned(),
            })
        );
    }

    #[test]
    fn single_code_fans_out_to_targets_minus_source() {
        assert_eq!(
            parse(&targets(), "10 sek"),
            Some(CurrencyQuery::Multi {
                amount: 10.0,
                from: "SEK".to_owned(),
                targets: targets(),
            })
        );
        // Source currency dropped from its own target list.
        assert_eq!(
            parse(&targets(), "10 usd"),
            Some(CurrencyQuery::Multi {
                amount: 10.0,
                from: "USD".to_owned(),
                targets: vec!["NOK".to_owned(), "EUR".to_owned()],
            })
        );
    }

    #[test]
    fn unknown_codes_reject() {
        assert_eq!(parse(&targets(), "10 doge"), None);
        assert_eq!(parse(&targets(), "10 usd to doge"), None);
        // A dangling connector is not a currency.
        assert_eq!(parse(&targets(), "10 usd to"), None);
    }

    #[test]
    fn non_currency_shapes_reject() {
        assert_eq!(parse(&targets(), "usd 10"), None);
        assert_eq!(parse(&targets(), "10"), None);
        assert_eq!(parse(&targets(), "10."), None);
        assert_eq!(parse(&targets(), "10 usd nok eur"), None);
        assert_eq!(parse(&targets(), ""), None);
    }
}
