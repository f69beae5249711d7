//! Trip context analysis: budget, party, duration and interests parsed
//! from a single message.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::currency::{currency_mentions, extract_amount};
use super::normalize::{contains_phrase, word_text};

/// Keywords whose co-occurrence (two or more distinct hits) signals that a
/// message carries planning context worth analysing.
const CONTEXT_KEYWORDS: &[&str] = &[
    "budget", "cheap", "affordable", "luxury", "luxurious", "splurge", "backpacking",
    "family", "kids", "children", "couple", "honeymoon", "solo", "alone", "friends", "group",
    "adults", "people", "day", "days", "week", "weeks", "night", "nights", "weekend",
    "fortnight", "month",
];

const INTERESTS: &[(&str, &[&str])] = &[
    ("beaches", &["beach", "beaches", "surf", "surfing", "snorkeling", "diving"]),
    ("hiking", &["hike", "hiking", "trek", "trekking", "mountains"]),
    ("museums", &["museum", "museums", "gallery", "galleries"]),
    ("food", &["food", "foodie", "restaurants", "cuisine", "street food"]),
    ("nightlife", &["nightlife", "bars", "clubs", "party"]),
    ("shopping", &["shopping", "markets", "boutiques"]),
    ("history", &["history", "historic", "historical", "ruins", "castles"]),
    ("nature", &["nature", "wildlife", "parks", "national park"]),
    ("art", &["art", "architecture"]),
    ("skiing", &["ski", "skiing", "snowboarding"]),
    ("wine", &["wine", "vineyards", "winery"]),
];

/// "5 days", "two weeks", "3-night"
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d+|a|an|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|fourteen)\s*-?\s*(days?|nights?|weeks?)\b",
    )
    .unwrap()
});

/// "4 people", "family of five", "group of 6"
static TRAVELERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:family|group|party)\s+of\s+(\d+|two|three|four|five|six|seven|eight|nine|ten)|(\d+|two|three|four|five|six|seven|eight|nine|ten)\s+(?:people|persons|adults|travell?ers|of us|friends|guests))\b",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    Budget,
    Moderate,
    Luxury,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelParty {
    Solo,
    Couple,
    Family,
    Friends,
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Planning context parsed from a message. Every field is optional; an
/// empty context is a valid result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<BudgetLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travelers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<TravelParty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub interests: Vec<String>,
}

impl TripContext {
    pub fn is_empty(&self) -> bool {
        *self == TripContext::default()
    }
}

fn small_number(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    let n = match lower.as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "fourteen" => 14,
        other => return other.parse().ok(),
    };
    Some(n)
}

/// Number of distinct context keywords present in `text`.
pub fn context_signal_count(text: &str) -> usize {
    let words = word_text(text);
    CONTEXT_KEYWORDS
        .iter()
        .filter(|keyword| contains_phrase(&words, keyword))
        .count()
}

fn any_phrase(words: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| contains_phrase(words, phrase))
}

fn budget_level(words: &str) -> Option<BudgetLevel> {
    if any_phrase(words, &["luxury", "luxurious", "splurge", "five star", "5 star", "high end"]) {
        Some(BudgetLevel::Luxury)
    } else if any_phrase(words, &["moderate", "mid range", "midrange", "reasonable"]) {
        Some(BudgetLevel::Moderate)
    } else if any_phrase(words, &["budget", "cheap", "affordable", "backpacking", "low cost"]) {
        Some(BudgetLevel::Budget)
    } else {
        None
    }
}

fn party(words: &str) -> Option<TravelParty> {
    if any_phrase(words, &["family", "kids", "children", "toddler", "baby"]) {
        Some(TravelParty::Family)
    } else if any_phrase(words, &["honeymoon", "couple", "partner", "wife", "husband", "girlfriend", "boyfriend"]) {
        Some(TravelParty::Couple)
    } else if any_phrase(words, &["solo", "alone", "by myself"]) {
        Some(TravelParty::Solo)
    } else if any_phrase(words, &["friends", "mates"]) {
        Some(TravelParty::Friends)
    } else if any_phrase(words, &["group"]) {
        Some(TravelParty::Group)
    } else {
        None
    }
}

fn duration_days(text: &str, words: &str) -> Option<u32> {
    if let Some(days) = DURATION_RE.captures_iter(text).find_map(|caps| {
        let count = small_number(caps.get(1)?.as_str())?;
        let unit = caps.get(2)?.as_str().to_lowercase();
        Some(if unit.starts_with("week") {
            count * 7
        } else {
            count
        })
    }) {
        return Some(days);
    }

    if contains_phrase(words, "fortnight") {
        Some(14)
    } else if contains_phrase(words, "long weekend") {
        Some(3)
    } else if contains_phrase(words, "weekend") {
        Some(2)
    } else {
        None
    }
}

fn travelers(text: &str, party: Option<TravelParty>) -> Option<u32> {
    TRAVELERS_RE
        .captures_iter(text)
        .find_map(|caps| small_number(caps.get(1).or_else(|| caps.get(2))?.as_str()))
        .or(match party {
            Some(TravelParty::Solo) => Some(1),
            Some(TravelParty::Couple) => Some(2),
            _ => None,
        })
}

fn interests(words: &str) -> Vec<String> {
    INTERESTS
        .iter()
        .filter(|(_, keywords)| any_phrase(words, keywords))
        .map(|(label, _)| label.to_string())
        .collect()
}

/// Parse budget, travel party, trip length and interests out of a message.
pub fn analyze_trip_context(message: &str) -> TripContext {
    let words = word_text(message);
    let party = party(&words);

    let budget = extract_amount(message).map(|amount| Budget {
        amount,
        currency: currency_mentions(message)
            .first()
            .map(|code| code.to_string()),
    });

    TripContext {
        budget,
        budget_level: budget_level(&words),
        travelers: travelers(message, party),
        party,
        duration_days: duration_days(message, &words),
        interests: interests(&words),
    }
}
