//! History-aware extraction.
//!
//! When the current message yields nothing, the most recent human turns are
//! scanned newest-first. Assistant turns are never scanned: they may contain
//! place names the model invented.

use super::{
    CityPair, CurrencyPair, EntityKind, ExtractedEntity, SourceSpan, extract_amount,
    extract_city_pair, extract_country, extract_currency_pair, extract_location,
};
use crate::conversation::entities::Turn;

/// Apply `extract` to the current message, then to up to `max_turns` of
/// the latest human turns, newest first.
pub fn extract_in_context<T>(
    kind: EntityKind,
    text: &str,
    history: &[Turn],
    max_turns: usize,
    extract: impl Fn(&str) -> Option<T>,
) -> Option<ExtractedEntity<T>> {
    if let Some(value) = extract(text) {
        return Some(ExtractedEntity::new(kind, value, SourceSpan::CurrentMessage));
    }

    history
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, turn)| turn.is_human())
        .take(max_turns)
        .find_map(|(index, turn)| {
            extract(turn.text())
                .map(|value| ExtractedEntity::new(kind, value, SourceSpan::HistoryTurn(index)))
        })
}

pub fn location_in_context(
    text: &str,
    history: &[Turn],
    max_turns: usize,
) -> Option<ExtractedEntity<String>> {
    extract_in_context(EntityKind::Location, text, history, max_turns, extract_location)
}

pub fn country_in_context(
    text: &str,
    history: &[Turn],
    max_turns: usize,
) -> Option<ExtractedEntity<String>> {
    extract_in_context(EntityKind::Country, text, history, max_turns, extract_country)
}

pub fn currency_pair_in_context(
    text: &str,
    history: &[Turn],
    max_turns: usize,
) -> Option<ExtractedEntity<CurrencyPair>> {
    extract_in_context(
        EntityKind::CurrencyPair,
        text,
        history,
        max_turns,
        extract_currency_pair,
    )
}

pub fn amount_in_context(
    text: &str,
    history: &[Turn],
    max_turns: usize,
) -> Option<ExtractedEntity<f64>> {
    extract_in_context(EntityKind::Amount, text, history, max_turns, extract_amount)
}

pub fn city_pair_in_context(
    text: &str,
    history: &[Turn],
    max_turns: usize,
    default_origin: &str,
) -> Option<ExtractedEntity<CityPair>> {
    extract_in_context(EntityKind::CityPair, text, history, max_turns, |t| {
        extract_city_pair(t, default_origin)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<Turn> {
        vec![
            Turn::human("I'm flying to Lisbon"),
            Turn::assistant("Lisbon is lovely, though Paris is also popular in spring."),
        ]
    }

    #[test]
    fn test_current_message_wins() {
        let found = location_in_context("hotels in Porto", &history(), 8).unwrap();
        assert_eq!(found.value, "Porto");
        assert_eq!(found.source, SourceSpan::CurrentMessage);
        assert!(!found.from_history());
    }

    #[test]
    fn test_history_fallback_skips_assistant_turns() {
        let history = vec![
            Turn::human("I'm flying to Lisbon"),
            Turn::assistant("Have you considered Paris instead?"),
        ];
        let found = location_in_context("any hotel tips?", &history, 8).unwrap();
        assert_eq!(found.value, "Lisbon");
        assert_eq!(found.source, SourceSpan::HistoryTurn(0));
        assert_eq!(found.kind, EntityKind::Location);
    }

    #[test]
    fn test_newest_human_turn_first() {
        let history = vec![
            Turn::human("Thinking about Rome"),
            Turn::assistant("Rome is great."),
            Turn::human("Actually, what about Vienna?"),
            Turn::assistant("Vienna works too."),
        ];
        let found = location_in_context("what's the weather like?", &history, 8).unwrap();
        assert_eq!(found.value, "Vienna");
        assert_eq!(found.source, SourceSpan::HistoryTurn(2));
    }

    #[test]
    fn test_scan_limit() {
        let mut history = vec![Turn::human("trip to Oslo")];
        for i in 0..3 {
            history.push(Turn::assistant(format!("reply {i}")));
            history.push(Turn::human("ok"));
        }
        assert!(location_in_context("and hotels?", &history, 3).is_none());
        assert_eq!(
            location_in_context("and hotels?", &history, 4)
                .unwrap()
                .value,
            "Oslo"
        );
    }

    #[test]
    fn test_currency_pair_and_amount_from_history() {
        let history = vec![Turn::human("convert 200 USD to EUR")];
        let pair = currency_pair_in_context("and what's the rate now?", &history, 8).unwrap();
        assert_eq!(pair.value, CurrencyPair::new("USD", "EUR"));
        let amount = amount_in_context("and what's the rate now?", &history, 8).unwrap();
        assert_eq!(amount.value, 200.0);
    }

    #[test]
    fn test_city_pair_from_history() {
        let history = vec![Turn::human("flights from Berlin to Rome")];
        let pair = city_pair_in_context("any direct ones?", &history, 8, "London").unwrap();
        assert_eq!(pair.value.origin, "Berlin");
        assert_eq!(pair.value.destination, "Rome");
        assert!(pair.from_history());
    }
}
