//! Flight route (city pair) extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::CityPair;
use super::location::{extract_location, place_candidate};
use super::normalize::normalize_location;

/// "from X to Y"
static FROM_TO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bfrom\s+([\p{L}][\p{L}'.-]*(?:\s+[\p{L}][\p{L}'.-]*){0,2})\s+to\s+([\p{L}][\p{L}'.-]*(?:\s+[\p{L}][\p{L}'.-]*){0,3})",
    )
    .unwrap()
});

/// "to Y from X"
static TO_FROM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bto\s+([\p{L}][\p{L}'.-]*(?:\s+[\p{L}][\p{L}'.-]*){0,2})\s+from\s+([\p{L}][\p{L}'.-]*(?:\s+[\p{L}][\p{L}'.-]*){0,3})",
    )
    .unwrap()
});

/// "flights X to Y", "fly X to Y"
static TRAVEL_NOUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:fly|flying|flights?|fares?|tickets?)\s+([\p{L}][\p{L}'.-]*(?:\s+[\p{L}][\p{L}'.-]*){0,2})\s+to\s+([\p{L}][\p{L}'.-]*(?:\s+[\p{L}][\p{L}'.-]*){0,3})",
    )
    .unwrap()
});

/// "Berlin to Rome", "Berlin - Rome" (case-sensitive)
static CAPITALIZED_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\p{Lu}[\p{L}'-]+(?:\s+\p{Lu}[\p{L}'-]+){0,2})\s+(?:to|-|→)\s+(\p{Lu}[\p{L}'-]+(?:\s+\p{Lu}[\p{L}'-]+){0,2})",
    )
    .unwrap()
});

/// "to Y"
static TO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bto\s+([\p{L}][\p{L}'.-]*(?:\s+[\p{L}][\p{L}'.-]*){0,3})").unwrap()
});

fn same_place(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Scan `re` for an explicit origin/destination pair. `swapped` means the
/// destination is captured first.
fn explicit_pair(re: &Regex, text: &str, swapped: bool) -> Option<CityPair> {
    re.captures_iter(text).find_map(|caps| {
        let first = normalize_location(caps.get(1)?.as_str())?;
        let second = normalize_location(caps.get(2)?.as_str())?;
        let (origin, destination) = if swapped {
            (second, first)
        } else {
            (first, second)
        };
        (!same_place(&origin, &destination)).then_some(CityPair {
            origin,
            destination,
            origin_inferred: false,
        })
    })
}

fn inferred_pair(destination: String, default_origin: &str) -> Option<CityPair> {
    let origin = default_origin.trim();
    if origin.is_empty() || same_place(origin, &destination) {
        return None;
    }
    Some(CityPair {
        origin: origin.to_string(),
        destination,
        origin_inferred: true,
    })
}

/// Extract an origin/destination pair for a flight search.
///
/// Tiers: "from X to Y" (either order), "flights X to Y", capitalized
/// "X to Y", then a lone destination ("to Y", or any location) paired with
/// `default_origin`, which marks the pair `origin_inferred`. Pairs whose
/// two sides are the same place are rejected.
pub fn extract_city_pair(text: &str, default_origin: &str) -> Option<CityPair> {
    explicit_pair(&FROM_TO_RE, text, false)
        .or_else(|| explicit_pair(&TO_FROM_RE, text, true))
        .or_else(|| explicit_pair(&TRAVEL_NOUN_RE, text, false))
        .or_else(|| explicit_pair(&CAPITALIZED_PAIR_RE, text, false))
        .or_else(|| {
            place_candidate(&TO_RE, text)
                .or_else(|| extract_location(text))
                .and_then(|destination| inferred_pair(destination, default_origin))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explicit(origin: &str, destination: &str) -> Option<CityPair> {
        Some(CityPair {
            origin: origin.into(),
            destination: destination.into(),
            origin_inferred: false,
        })
    }

    #[test]
    fn test_from_to_tier() {
        assert_eq!(
            extract_city_pair("cheap flights from New York to Paris in May", "London"),
            explicit("New York", "Paris")
        );
        assert_eq!(
            extract_city_pair("flights to Rome from berlin next week", "London"),
            explicit("Berlin", "Rome")
        );
    }

    #[test]
    fn test_travel_noun_tier() {
        assert_eq!(
            extract_city_pair("any fares madrid to lisbon?", "London"),
            explicit("Madrid", "Lisbon")
        );
    }

    #[test]
    fn test_capitalized_tier() {
        assert_eq!(
            extract_city_pair("Berlin - Vienna, what are my options", "London"),
            explicit("Berlin", "Vienna")
        );
    }

    #[test]
    fn test_default_origin_tier() {
        assert_eq!(
            extract_city_pair("I want to fly to Tokyo", "London"),
            Some(CityPair {
                origin: "London".into(),
                destination: "Tokyo".into(),
                origin_inferred: true,
            })
        );
        assert_eq!(
            extract_city_pair("flights for Lisbon?", "Madrid"),
            Some(CityPair {
                origin: "Madrid".into(),
                destination: "Lisbon".into(),
                origin_inferred: true,
            })
        );
    }

    #[test]
    fn test_to_tier_skips_common_nouns() {
        assert_eq!(
            extract_city_pair("I have to eat before we fly to Rome", "London"),
            Some(CityPair {
                origin: "London".into(),
                destination: "Rome".into(),
                origin_inferred: true,
            })
        );
        assert_eq!(
            extract_city_pair("cheapest way to get to lisbon?", "London"),
            Some(CityPair {
                origin: "London".into(),
                destination: "Lisbon".into(),
                origin_inferred: true,
            })
        );
        assert_eq!(extract_city_pair("any flights to dinner?", "London"), None);
    }

    #[test]
    fn test_rejects_same_place() {
        assert_eq!(extract_city_pair("flights to London", "London"), None);
        assert_eq!(extract_city_pair("from Paris to Paris", ""), None);
    }

    #[test]
    fn test_no_route() {
        assert_eq!(extract_city_pair("any cheap flights?", "London"), None);
        assert_eq!(extract_city_pair("flights to Rome", ""), None);
    }
}
