//! Currency pair and amount extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::CurrencyPair;

/// ISO 4217 codes recognised as currency mentions.
const KNOWN_CODES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "CNY", "INR", "AUD", "CAD", "CHF", "MXN", "THB", "KRW", "SGD",
    "HKD", "NZD", "SEK", "NOK", "DKK", "PLN", "CZK", "HUF", "TRY", "BRL", "ARS", "ZAR", "AED",
    "EGP", "MAD", "IDR", "VND", "PHP", "MYR", "ISK",
];

/// Codes that collide with ordinary English words and only count when
/// written in upper case.
const AMBIGUOUS_CODES: &[&str] = &["TRY", "MAD", "PHP"];

/// Currency names, longest first so "us dollars" wins over "dollars".
const ALIASES: &[(&str, &str)] = &[
    ("australian dollars", "AUD"),
    ("australian dollar", "AUD"),
    ("canadian dollars", "CAD"),
    ("canadian dollar", "CAD"),
    ("american dollars", "USD"),
    ("us dollars", "USD"),
    ("us dollar", "USD"),
    ("british pounds", "GBP"),
    ("pounds sterling", "GBP"),
    ("japanese yen", "JPY"),
    ("swiss francs", "CHF"),
    ("swiss franc", "CHF"),
    ("dollars", "USD"),
    ("dollar", "USD"),
    ("bucks", "USD"),
    ("euros", "EUR"),
    ("euro", "EUR"),
    ("pounds", "GBP"),
    ("pound", "GBP"),
    ("sterling", "GBP"),
    ("quid", "GBP"),
    ("yen", "JPY"),
    ("yuan", "CNY"),
    ("renminbi", "CNY"),
    ("rupees", "INR"),
    ("rupee", "INR"),
    ("francs", "CHF"),
    ("pesos", "MXN"),
    ("baht", "THB"),
    ("lira", "TRY"),
    ("reais", "BRL"),
    ("rand", "ZAR"),
    ("dirhams", "AED"),
    ("dirham", "AED"),
    ("forint", "HUF"),
    ("zloty", "PLN"),
    ("ringgit", "MYR"),
];

const SYMBOLS: &[(char, &str)] = &[
    ('$', "USD"),
    ('€', "EUR"),
    ('£', "GBP"),
    ('¥', "JPY"),
    ('₹', "INR"),
    ('₩', "KRW"),
    ('฿', "THB"),
];

const NUMBER: &str = r"(\d[\d,]*(?:\.\d+)?)";

fn alias_alternation() -> String {
    ALIASES
        .iter()
        .map(|(name, _)| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|")
}

fn currency_token_pattern() -> String {
    format!(r"(?:{}|[a-z]{{3}})", alias_alternation())
}

/// "USD to EUR" with explicit upper-case codes (case-sensitive).
static CODE_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{3})\s+(?:to|in|into|for|->|→)\s+([A-Z]{3})\b").unwrap()
});

/// "dollars to euros", "usd into yen".
static NAMED_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    let token = currency_token_pattern();
    Regex::new(&format!(
        r"(?i)\b({token})\s+(?:to|in|into|for|->|→)\s+({token})\b"
    ))
    .unwrap()
});

/// Any single currency mention: name, code, or symbol.
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let symbols: String = SYMBOLS.iter().map(|(symbol, _)| *symbol).collect();
    Regex::new(&format!(
        r"(?i)(?:\b({aliases}|[a-z]{{3}})\b|([{symbols}]))",
        aliases = alias_alternation()
    ))
    .unwrap()
});

/// "$230", "€1,200.50", "£2k".
static SYMBOL_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    let symbols: String = SYMBOLS.iter().map(|(symbol, _)| *symbol).collect();
    Regex::new(&format!(r"[{symbols}]\s?{NUMBER}(\s*[kK]\b)?")).unwrap()
});

/// "100 USD", "250 euros", "3k yen".
static NUMBER_CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i){NUMBER}(\s*k\b)?\s*({})\b",
        currency_token_pattern()
    ))
    .unwrap()
});

/// "convert 500", "how much is 20".
static CONVERT_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:convert|exchange|change|how much is|how much are)\s+{NUMBER}(\s*k\b)?"
    ))
    .unwrap()
});

/// Resolve a currency token (code, alias or symbol) to its ISO code.
///
/// Lower-case codes are accepted unless they collide with an English word
/// ("try", "mad").
pub fn resolve_currency(token: &str) -> Option<&'static str> {
    let trimmed = token.trim();
    if let Some(ch) = trimmed.chars().next() {
        if let Some((_, code)) = SYMBOLS.iter().find(|(symbol, _)| *symbol == ch) {
            return Some(*code);
        }
    }

    let lower = trimmed.to_lowercase();
    if let Some((_, code)) = ALIASES.iter().find(|(name, _)| *name == lower) {
        return Some(*code);
    }

    let upper = trimmed.to_uppercase();
    let code = KNOWN_CODES.iter().find(|code| **code == upper)?;
    if AMBIGUOUS_CODES.contains(code) && trimmed != upper {
        return None;
    }
    Some(*code)
}

fn is_known_code(code: &str) -> bool {
    KNOWN_CODES.contains(&code)
}

/// Every recognised currency mention, in order of appearance.
pub fn currency_mentions(text: &str) -> Vec<&'static str> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|m| resolve_currency(m.as_str()))
        .collect()
}

/// Extract a source/target currency pair.
///
/// Tiers: upper-case "XXX to YYY" (one side may be an unknown code so the
/// provider can report it), named or coded "A to B", then the first two
/// distinct mentions in order. A pair whose sides are equal is rejected.
pub fn extract_currency_pair(text: &str) -> Option<CurrencyPair> {
    let explicit = CODE_PAIR_RE.captures_iter(text).find_map(|caps| {
        let from = caps.get(1)?.as_str();
        let to = caps.get(2)?.as_str();
        (is_known_code(from) || is_known_code(to)).then(|| CurrencyPair::new(from, to))
    });

    let named = || {
        NAMED_PAIR_RE.captures_iter(text).find_map(|caps| {
            let from = resolve_currency(caps.get(1)?.as_str())?;
            let to = resolve_currency(caps.get(2)?.as_str())?;
            Some(CurrencyPair::new(from, to))
        })
    };

    let mentions = || {
        let found = currency_mentions(text);
        let from = *found.first()?;
        let to = found.iter().find(|code| **code != from)?;
        Some(CurrencyPair::new(from, *to))
    };

    explicit
        .or_else(named)
        .or_else(mentions)
        .filter(|pair| pair.from != pair.to)
}

fn parse_number(digits: &str, thousands: bool) -> Option<f64> {
    let value: f64 = digits.replace(',', "").parse().ok()?;
    let value = if thousands { value * 1000.0 } else { value };
    (value > 0.0 && value.is_finite()).then_some(value)
}

/// Extract a monetary amount.
///
/// Tiers: currency symbol + number, number + currency token, then a
/// number following "convert"/"exchange". A trailing "k" multiplies by
/// 1000; thousands separators are ignored; non-positive values are
/// rejected.
pub fn extract_amount(text: &str) -> Option<f64> {
    let symbol = || {
        SYMBOL_AMOUNT_RE.captures_iter(text).find_map(|caps| {
            parse_number(caps.get(1)?.as_str(), caps.get(2).is_some())
        })
    };

    let number_currency = || {
        NUMBER_CURRENCY_RE.captures_iter(text).find_map(|caps| {
            resolve_currency(caps.get(3)?.as_str())?;
            parse_number(caps.get(1)?.as_str(), caps.get(2).is_some())
        })
    };

    let convert = || {
        CONVERT_AMOUNT_RE.captures_iter(text).find_map(|caps| {
            parse_number(caps.get(1)?.as_str(), caps.get(2).is_some())
        })
    };

    symbol().or_else(number_currency).or_else(convert)
}
