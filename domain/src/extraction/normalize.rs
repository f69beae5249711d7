//! Candidate normalization shared by every extractor.

use crate::util::title_case;

/// Words that can never be (part of) a place name. Covers function words,
/// travel vocabulary, temporal fillers, months, weekdays and common
/// currency codes.
const STOP_WORDS: &[&str] = &[
    // function words
    "a", "an", "the", "and", "or", "but", "of", "in", "on", "at", "to", "for", "from", "into",
    "with", "without", "by", "about", "around", "near", "during", "over", "under", "between",
    "i", "i'm", "im", "i'll", "i've", "me", "my", "we", "we're", "our", "us", "you", "your", "it",
    "it's", "its", "he", "she", "they", "them", "their", "what", "what's", "whats", "where",
    "when", "which", "who", "how", "why", "is", "are", "was", "were", "be", "been", "being",
    "am", "do", "does", "did", "can", "could", "should", "would", "will", "shall", "may",
    "might", "must", "any", "some", "there", "here", "that", "this", "these", "those", "so",
    "if", "then", "than", "also", "just", "only", "very", "really", "too", "much", "many",
    "more", "most", "all", "not", "no", "yes", "ok", "okay", "hi", "hello", "hey", "please",
    "thanks", "thank", "well", "let", "let's", "up", "out", "there's", "like", "want",
    "need", "know", "tell", "give", "show", "find", "check", "look", "get", "go", "going",
    "went", "see", "say", "think", "plan", "planning", "pack", "packing", "wear", "bring",
    "doing", "have", "has", "had", "make", "take", "try", "recommend",
    // travel vocabulary
    "trip", "travel", "traveling", "travelling", "vacation", "holiday", "holidays", "visit",
    "visiting", "tour", "tourist", "tourists", "hotel", "hotels", "hostel", "hostels", "stay",
    "staying", "accommodation", "flight", "flights", "fly", "flying", "airport", "weather",
    "forecast", "temperature", "climate", "rain", "sunny", "tips", "tip", "advice", "best",
    "good", "great", "cheap", "budget", "places", "place", "things", "thing", "city", "cities",
    "country", "capital", "language", "languages", "currency", "money", "exchange", "rate",
    "convert", "info", "information", "attractions", "attraction", "sights", "restaurants",
    "restaurant", "food", "museum", "museums", "family", "kids", "friends", "people", "guide",
    "itinerary", "weekend", "somewhere", "anywhere", "abroad", "home", "visa", "visas",
    "passport", "luggage", "clothes", "jacket", "umbrella",
    // temporal fillers
    "today", "tomorrow", "tonight", "yesterday", "now", "soon", "later", "next", "last",
    "week", "weeks", "month", "months", "year", "years", "day", "days", "night", "nights",
    "morning", "afternoon", "evening", "time", "summer", "winter", "spring", "autumn", "fall",
    "season", "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december", "jan", "feb", "mar", "apr", "jun", "jul",
    "aug", "sep", "sept", "oct", "nov", "dec", "monday", "tuesday", "wednesday", "thursday",
    "friday", "saturday", "sunday",
    // currency codes and names
    "usd", "eur", "gbp", "jpy", "cny", "inr", "aud", "cad", "chf", "mxn", "thb", "krw",
    "dollars", "dollar", "euros", "euro", "pounds", "pound", "yen",
];

/// A country and the city used as its representative travel hub.
struct CountryEntry {
    aliases: &'static [&'static str],
    country: &'static str,
    hub: &'static str,
}

/// Country → hub lookup. Multi-word aliases are listed before the
/// single-word aliases they contain.
const COUNTRIES: &[CountryEntry] = &[
    CountryEntry { aliases: &["united states", "usa", "us of a", "america"], country: "United States", hub: "New York" },
    CountryEntry { aliases: &["united kingdom", "uk", "england", "great britain", "britain"], country: "United Kingdom", hub: "London" },
    CountryEntry { aliases: &["united arab emirates", "uae"], country: "United Arab Emirates", hub: "Dubai" },
    CountryEntry { aliases: &["south korea", "korea"], country: "South Korea", hub: "Seoul" },
    CountryEntry { aliases: &["south africa"], country: "South Africa", hub: "Cape Town" },
    CountryEntry { aliases: &["new zealand"], country: "New Zealand", hub: "Auckland" },
    CountryEntry { aliases: &["czech republic", "czechia"], country: "Czech Republic", hub: "Prague" },
    CountryEntry { aliases: &["japan"], country: "Japan", hub: "Tokyo" },
    CountryEntry { aliases: &["france"], country: "France", hub: "Paris" },
    CountryEntry { aliases: &["italy"], country: "Italy", hub: "Rome" },
    CountryEntry { aliases: &["spain"], country: "Spain", hub: "Madrid" },
    CountryEntry { aliases: &["germany"], country: "Germany", hub: "Berlin" },
    CountryEntry { aliases: &["portugal"], country: "Portugal", hub: "Lisbon" },
    CountryEntry { aliases: &["greece"], country: "Greece", hub: "Athens" },
    CountryEntry { aliases: &["netherlands", "holland"], country: "Netherlands", hub: "Amsterdam" },
    CountryEntry { aliases: &["switzerland"], country: "Switzerland", hub: "Zurich" },
    CountryEntry { aliases: &["austria"], country: "Austria", hub: "Vienna" },
    CountryEntry { aliases: &["ireland"], country: "Ireland", hub: "Dublin" },
    CountryEntry { aliases: &["iceland"], country: "Iceland", hub: "Reykjavik" },
    CountryEntry { aliases: &["hungary"], country: "Hungary", hub: "Budapest" },
    CountryEntry { aliases: &["poland"], country: "Poland", hub: "Krakow" },
    CountryEntry { aliases: &["croatia"], country: "Croatia", hub: "Dubrovnik" },
    CountryEntry { aliases: &["norway"], country: "Norway", hub: "Oslo" },
    CountryEntry { aliases: &["sweden"], country: "Sweden", hub: "Stockholm" },
    CountryEntry { aliases: &["denmark"], country: "Denmark", hub: "Copenhagen" },
    CountryEntry { aliases: &["turkey", "turkiye"], country: "Turkey", hub: "Istanbul" },
    CountryEntry { aliases: &["egypt"], country: "Egypt", hub: "Cairo" },
    CountryEntry { aliases: &["morocco"], country: "Morocco", hub: "Marrakech" },
    CountryEntry { aliases: &["thailand"], country: "Thailand", hub: "Bangkok" },
    CountryEntry { aliases: &["vietnam"], country: "Vietnam", hub: "Hanoi" },
    CountryEntry { aliases: &["china"], country: "China", hub: "Beijing" },
    CountryEntry { aliases: &["india"], country: "India", hub: "New Delhi" },
    CountryEntry { aliases: &["indonesia"], country: "Indonesia", hub: "Bali" },
    CountryEntry { aliases: &["singapore"], country: "Singapore", hub: "Singapore" },
    CountryEntry { aliases: &["australia"], country: "Australia", hub: "Sydney" },
    CountryEntry { aliases: &["canada"], country: "Canada", hub: "Toronto" },
    CountryEntry { aliases: &["mexico"], country: "Mexico", hub: "Mexico City" },
    CountryEntry { aliases: &["brazil"], country: "Brazil", hub: "Rio De Janeiro" },
    CountryEntry { aliases: &["argentina"], country: "Argentina", hub: "Buenos Aires" },
    CountryEntry { aliases: &["peru"], country: "Peru", hub: "Lima" },
];

/// Maximum number of words a place name may span.
const MAX_PLACE_WORDS: usize = 3;

/// Minimum length (in characters) of an accepted place name.
const MIN_PLACE_CHARS: usize = 3;

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word.to_lowercase().as_str())
}

/// Strip surrounding punctuation and a trailing possessive from a token.
fn clean_token(token: &str) -> &str {
    let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-');
    let trimmed = trimmed.trim_matches('\'');
    trimmed
        .strip_suffix("'s")
        .or_else(|| trimmed.strip_suffix("’s"))
        .unwrap_or(trimmed)
}

/// Normalize a raw candidate into a place name.
///
/// Leading filler words are skipped, the name ends at the first stop word
/// (so "Tokyo in March" → "Tokyo"), tokens are title-cased, and a country
/// is replaced by its hub city. Returns `None` when nothing usable remains.
pub fn normalize_location(raw: &str) -> Option<String> {
    let mut words: Vec<&str> = Vec::new();
    for token in raw.split_whitespace().map(clean_token) {
        if token.is_empty() {
            if words.is_empty() {
                continue;
            }
            break;
        }
        let stop = is_stop_word(token);
        if words.is_empty() && stop {
            continue;
        }
        if stop || words.len() == MAX_PLACE_WORDS {
            break;
        }
        if token.chars().any(|c| c.is_ascii_digit()) {
            break;
        }
        words.push(token);
    }

    if words.is_empty() {
        return None;
    }

    let candidate = words.join(" ");
    if let Some(entry) = country_entry(&candidate) {
        return Some(entry.hub.to_string());
    }

    if candidate.chars().count() < MIN_PLACE_CHARS {
        return None;
    }

    Some(title_case(&candidate))
}

/// Whether the first non-stop token of a raw candidate starts with an
/// upper-case letter, as written by the user.
pub fn leading_word_capitalized(raw: &str) -> bool {
    raw.split_whitespace()
        .map(clean_token)
        .find(|token| !token.is_empty() && !is_stop_word(token))
        .and_then(|token| token.chars().next())
        .is_some_and(char::is_uppercase)
}

/// Whether a normalized place name is a hub city from the country table.
/// Countries normalize to their hub, so this covers both.
pub fn is_known_place(name: &str) -> bool {
    country_for_hub(name).is_some()
}

fn country_entry(name: &str) -> Option<&'static CountryEntry> {
    let lower = name.to_lowercase();
    COUNTRIES
        .iter()
        .find(|entry| entry.aliases.contains(&lower.as_str()))
}

/// Canonical country name for a country alias ("holland" → "Netherlands").
pub fn canonical_country(name: &str) -> Option<&'static str> {
    country_entry(name).map(|entry| entry.country)
}

/// Country whose hub is the given city ("Tokyo" → "Japan").
pub fn country_for_hub(city: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|entry| entry.hub.eq_ignore_ascii_case(city))
        .map(|entry| entry.country)
}

/// Lower-case `text`, replace everything except letters, digits and
/// apostrophes with single spaces, and pad both ends with a space so that
/// whole-word phrases can be found with [`contains_phrase`].
pub fn word_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    let mut last_space = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '\'' {
            out.extend(ch.to_lowercase());
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    if !last_space {
        out.push(' ');
    }
    out
}

/// Whole-word (or whole-phrase) containment on text prepared by
/// [`word_text`]. `phrase` must be lower-case.
pub fn contains_phrase(words: &str, phrase: &str) -> bool {
    words.contains(&format!(" {} ", phrase))
}

/// Every country alias, in table order (multi-word aliases first within an
/// entry).
pub fn country_aliases() -> impl Iterator<Item = &'static str> {
    COUNTRIES.iter().flat_map(|entry| entry.aliases.iter().copied())
}
