//! Location and country extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::normalize::{
    canonical_country, contains_phrase, country_aliases, country_for_hub, is_known_place,
    leading_word_capitalized, normalize_location, word_text,
};

/// Travel verb followed by a directional preposition: "flying to X",
/// "holiday in X", "heading into X".
static TRAVEL_VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:travel(?:l?ing)?|trip|going|go|flying|fly|heading|head|visiting|holiday|vacation|staying|stay|moving|honeymoon|backpacking)\s+(?:to|in|into|around)\s+([\p{L}][\p{L}'.-]*(?:\s+[\p{L}][\p{L}'.-]*){0,3})",
    )
    .unwrap()
});

/// Bare preposition or visit verb followed by a phrase: "in X", "visit X".
static PREPOSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:in|to|at|for|around|near|visit|visiting|explore|exploring|about)\s+([\p{L}][\p{L}'.-]*(?:\s+[\p{L}][\p{L}'.-]*){0,3})",
    )
    .unwrap()
});

/// Run of up to three capitalized tokens (case-sensitive).
static CAPITALIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\p{Lu}[\p{L}'-]+(?:\s+\p{Lu}[\p{L}'-]+){0,2})").unwrap());

/// First normalized candidate captured by `re`, scanning matches left to
/// right.
fn first_candidate(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| normalize_location(m.as_str()))
}

/// First candidate captured by a preposition-led `re` that reads as a
/// place: written capitalized, or a known hub city or country.
///
/// A rejected capture is rescanned from its own start, so "to dinner in
/// Paris" still reaches "in Paris".
pub(crate) fn place_candidate(re: &Regex, text: &str) -> Option<String> {
    let mut pos = 0;
    while let Some(caps) = re.captures_at(text, pos) {
        let m = caps.get(1)?;
        let accepted = normalize_location(m.as_str())
            .filter(|name| leading_word_capitalized(m.as_str()) || is_known_place(name));
        if accepted.is_some() {
            return accepted;
        }
        pos = m.start();
    }
    None
}

/// Extract a place name from free text.
///
/// Tiers, most specific first: travel verb + preposition, bare
/// preposition, capitalized token run. In the two preposition tiers a
/// lower-case candidate is only taken when it names a known hub city or
/// country.
pub fn extract_location(text: &str) -> Option<String> {
    place_candidate(&TRAVEL_VERB_RE, text)
        .or_else(|| place_candidate(&PREPOSITION_RE, text))
        .or_else(|| first_candidate(&CAPITALIZED_RE, text))
}

/// Extract a country name.
///
/// An explicit country mention wins; otherwise a recognised hub city is
/// mapped back to its country ("Lisbon" → "Portugal").
pub fn extract_country(text: &str) -> Option<String> {
    let words = word_text(text);

    let mut aliases: Vec<&str> = country_aliases().collect();
    aliases.sort_by_key(|alias| std::cmp::Reverse(alias.split(' ').count()));

    if let Some(country) = aliases
        .into_iter()
        .filter(|alias| contains_phrase(&words, alias))
        .find_map(canonical_country)
    {
        return Some(country.to_string());
    }

    extract_location(text)
        .and_then(|city| country_for_hub(&city))
        .map(str::to_string)
}
