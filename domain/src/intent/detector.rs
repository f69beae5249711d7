//! Required-tool detection.
//!
//! Each tool owns a keyword set. A keyword hit only schedules the tool when
//! the tool's arguments can be resolved; otherwise the tool is reported as
//! unresolved and skipped. The trip-context tool is the exception: it is
//! scheduled on keyword co-occurrence alone and receives the raw message.

use serde::{Deserialize, Serialize};

use crate::conversation::entities::Turn;
use crate::extraction::history::{
    amount_in_context, city_pair_in_context, country_in_context, currency_pair_in_context,
    location_in_context,
};
use crate::extraction::normalize::{contains_phrase, word_text};
use crate::extraction::trip_context::context_signal_count;
use crate::tool::entities::{ToolCall, ToolName};

/// Default number of recent human turns scanned for missing arguments.
pub const DEFAULT_HISTORY_SCAN_TURNS: usize = 8;

/// Co-occurring context keywords needed to schedule trip-context analysis.
pub const CONTEXT_SIGNAL_THRESHOLD: usize = 2;

/// Amount converted when the user names currencies but no figure.
const DEFAULT_CONVERSION_AMOUNT: f64 = 1.0;

fn trigger_keywords(tool: ToolName) -> &'static [&'static str] {
    match tool {
        ToolName::Weather => &[
            "weather", "forecast", "temperature", "rain", "raining", "sunny", "snow", "cold",
            "hot", "warm", "climate", "humid", "humidity", "pack", "packing", "wear",
            "umbrella", "jacket",
        ],
        ToolName::Country => &[
            "visa", "visas", "passport", "language", "languages", "spoken", "capital",
            "population", "what currency", "local currency", "currency do they",
            "country info", "plug", "plugs",
        ],
        ToolName::Currency => &[
            "convert", "conversion", "exchange", "exchange rate", "rate", "currency", "how much is",
            "worth",
        ],
        ToolName::Flights => &[
            "flight", "flights", "fly", "flying", "airfare", "airfares", "fare", "fares",
            "plane", "airline", "airlines", "tickets",
        ],
        ToolName::Hotels => &[
            "hotel", "hotels", "accommodation", "stay", "staying", "hostel", "hostels",
            "where to stay", "place to stay", "airbnb", "lodging", "resort", "resorts",
            "bed and breakfast",
        ],
        ToolName::Places => &[
            "attractions", "attraction", "sightseeing", "things to do", "places to visit",
            "what to see", "what to do", "must see", "museum", "museums", "landmarks", "sights",
            "activities", "restaurant", "restaurants", "viewpoint", "viewpoints", "park", "parks",
        ],
        ToolName::TripContext => &[],
    }
}

/// Category hint for the places tool, taken from the first matching keyword.
fn places_category(words: &str) -> Option<&'static str> {
    const CATEGORIES: &[(&str, &[&str])] = &[
        ("museum", &["museum", "museums", "gallery", "galleries"]),
        ("restaurant", &["restaurant", "restaurants", "eat", "food"]),
        ("viewpoint", &["viewpoint", "viewpoints", "view", "views"]),
        ("park", &["park", "parks", "garden", "gardens"]),
    ];
    CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_phrase(words, k)))
        .map(|(category, _)| *category)
}

/// Tools to run for one message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolPlan {
    /// Scheduled calls, in [`ToolName::ALL`] order
    pub calls: Vec<ToolCall>,
    /// Tools whose keywords matched but whose arguments could not be resolved
    pub unresolved: Vec<ToolName>,
}

impl ToolPlan {
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn tool_names(&self) -> Vec<ToolName> {
        self.calls.iter().map(|call| call.tool).collect()
    }
}

/// Decides which tools a message requires and resolves their arguments.
#[derive(Debug, Clone)]
pub struct ToolDetector {
    default_origin: String,
    history_scan_turns: usize,
}

impl Default for ToolDetector {
    fn default() -> Self {
        Self::new("London")
    }
}

impl ToolDetector {
    pub fn new(default_origin: impl Into<String>) -> Self {
        Self {
            default_origin: default_origin.into(),
            history_scan_turns: DEFAULT_HISTORY_SCAN_TURNS,
        }
    }

    pub fn with_history_scan_turns(mut self, turns: usize) -> Self {
        self.history_scan_turns = turns;
        self
    }

    fn triggered(tool: ToolName, words: &str) -> bool {
        trigger_keywords(tool)
            .iter()
            .any(|keyword| contains_phrase(words, keyword))
    }

    /// Build the tool plan for `text`, falling back to `history` (human
    /// turns only) for arguments the message does not carry. Pass an empty
    /// history to restrict resolution to `text` itself.
    pub fn detect(&self, text: &str, history: &[Turn]) -> ToolPlan {
        let words = word_text(text);
        let mut plan = ToolPlan::default();

        for tool in ToolName::ALL {
            let call = match tool {
                ToolName::TripContext => {
                    if context_signal_count(text) < CONTEXT_SIGNAL_THRESHOLD {
                        continue;
                    }
                    Some(ToolCall::new(tool).with_arg("message", text))
                }
                _ if !Self::triggered(tool, &words) => continue,
                _ => self.resolve(tool, text, &words, history),
            };

            match call {
                Some(call) => plan.calls.push(call),
                None => plan.unresolved.push(tool),
            }
        }

        plan
    }

    fn resolve(&self, tool: ToolName, text: &str, words: &str, history: &[Turn]) -> Option<ToolCall> {
        let k = self.history_scan_turns;
        match tool {
            ToolName::Weather | ToolName::Hotels => {
                let location = location_in_context(text, history, k)?;
                Some(ToolCall::new(tool).with_arg("location", location.value))
            }
            ToolName::Places => {
                let location = location_in_context(text, history, k)?;
                let call = ToolCall::new(tool).with_arg("location", location.value);
                Some(match places_category(words) {
                    Some(category) => call.with_arg("category", category),
                    None => call,
                })
            }
            ToolName::Country => {
                let country = country_in_context(text, history, k)?;
                Some(ToolCall::new(tool).with_arg("country", country.value))
            }
            ToolName::Currency => {
                let pair = currency_pair_in_context(text, history, k)?;
                let amount = amount_in_context(text, history, k)
                    .map(|entity| entity.value)
                    .unwrap_or(DEFAULT_CONVERSION_AMOUNT);
                Some(
                    ToolCall::new(tool)
                        .with_arg("amount", amount)
                        .with_arg("from", pair.value.from)
                        .with_arg("to", pair.value.to),
                )
            }
            ToolName::Flights => {
                let route = city_pair_in_context(text, history, k, &self.default_origin)?;
                Some(
                    ToolCall::new(tool)
                        .with_arg("origin", route.value.origin)
                        .with_arg("destination", route.value.destination)
                        .with_arg("origin_inferred", route.value.origin_inferred),
                )
            }
            ToolName::TripContext => Some(ToolCall::new(tool).with_arg("message", text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ToolDetector {
        ToolDetector::new("London")
    }

    #[test]
    fn test_packing_schedules_weather() {
        let plan = detector().detect("What should I pack for Tokyo in March?", &[]);
        assert_eq!(plan.tool_names(), vec![ToolName::Weather]);
        assert_eq!(plan.calls[0].get_string("location"), Some("Tokyo"));
        assert!(plan.unresolved.is_empty());
    }

    #[test]
    fn test_weather_location_skips_common_nouns() {
        let cases = [
            ("What should I wear to dinner in Paris?", "Paris"),
            ("I want to eat sushi in Tokyo, what's the weather?", "Tokyo"),
        ];
        for (message, expected) in cases {
            let plan = detector().detect(message, &[]);
            let weather = plan
                .calls
                .iter()
                .find(|c| c.tool == ToolName::Weather)
                .unwrap();
            assert_eq!(weather.get_string("location"), Some(expected));
        }
    }

    #[test]
    fn test_keyword_without_entity_is_unresolved() {
        let plan = detector().detect("what's the weather like?", &[]);
        assert!(plan.is_empty());
        assert_eq!(plan.unresolved, vec![ToolName::Weather]);
    }

    #[test]
    fn test_hotel_location_from_history() {
        let history = vec![
            Turn::human("I'm flying to Lisbon"),
            Turn::assistant("Great choice! Paris is nice too, but Lisbon has better weather."),
        ];
        let plan = detector().detect("any hotel tips?", &history);
        assert_eq!(plan.tool_names(), vec![ToolName::Hotels]);
        assert_eq!(plan.calls[0].get_string("location"), Some("Lisbon"));
    }

    #[test]
    fn test_currency_call_with_default_amount() {
        let plan = detector().detect("what's the exchange rate from USD to JPY?", &[]);
        let call = &plan.calls[0];
        assert_eq!(call.tool, ToolName::Currency);
        assert_eq!(call.get_f64("amount"), Some(1.0));
        assert_eq!(call.get_string("from"), Some("USD"));
        assert_eq!(call.get_string("to"), Some("JPY"));
    }

    #[test]
    fn test_flights_with_inferred_origin() {
        let plan = detector().detect("find me flights to Rome", &[]);
        let call = &plan.calls[0];
        assert_eq!(call.tool, ToolName::Flights);
        assert_eq!(call.get_string("origin"), Some("London"));
        assert_eq!(call.get_string("destination"), Some("Rome"));
        assert_eq!(call.get_bool("origin_inferred"), Some(true));
    }

    #[test]
    fn test_multiple_tools_in_enumeration_order() {
        let plan = detector().detect(
            "Weather in Kyoto and hotels there, plus museums in Kyoto",
            &[],
        );
        assert_eq!(
            plan.tool_names(),
            vec![ToolName::Weather, ToolName::Hotels, ToolName::Places]
        );
        assert_eq!(plan.calls[2].get_string("category"), Some("museum"));
    }

    #[test]
    fn test_trip_context_on_cooccurring_signals() {
        let message = "cheap family holiday ideas for a week";
        let plan = detector().detect(message, &[]);
        let call = plan
            .calls
            .iter()
            .find(|c| c.tool == ToolName::TripContext)
            .unwrap();
        assert_eq!(call.get_string("message"), Some(message));

        let single = detector().detect("cheap ideas", &[]);
        assert!(!single.tool_names().contains(&ToolName::TripContext));
    }

    #[test]
    fn test_country_info() {
        let plan = detector().detect("Do I need a visa for Japan?", &[]);
        assert_eq!(plan.calls[0].tool, ToolName::Country);
        assert_eq!(plan.calls[0].get_string("country"), Some("Japan"));
    }

    #[test]
    fn test_empty_history_restricts_to_text() {
        let history = vec![Turn::human("trip to Oslo")];
        let with_history = detector().detect("how's the weather?", &history);
        let without = detector().detect("how's the weather?", &[]);
        assert_eq!(with_history.calls.len(), 1);
        assert!(without.is_empty());
    }
}
