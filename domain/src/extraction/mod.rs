//! Entity extraction
//!
//! Pure pattern cascades that pull structured values out of free text:
//!
//! | Extractor | Output | Tiers (most → least specific) |
//! |-----------|--------|-------------------------------|
//! | [`extract_location`] | city name | travel verb + "to/in X" → preposition + X (capitalized or known place) → capitalized token |
//! | [`extract_country`] | country name | country vocabulary → city hub reverse lookup |
//! | [`extract_currency_pair`] | `{from, to}` | "USD to EUR" → "dollars to euros" → two mentions in order |
//! | [`extract_amount`] | number | symbol + number → number + currency → "convert N" |
//! | [`extract_city_pair`] | `{origin, destination}` | "from X to Y" → "flights X to Y" → "X to Y" → "to Y" + default origin |
//!
//! Every candidate goes through [`normalize::normalize_location`] (trim,
//! drop filler/temporal words, title-case, length and stop-word filtering,
//! country → hub city mapping). Ties are broken by tier order only. The
//! history-aware variants in [`history`] fall back to recent human turns when
//! the current message yields nothing.

pub mod currency;
pub mod history;
pub mod location;
pub mod normalize;
pub mod route;
pub mod trip_context;

use serde::{Deserialize, Serialize};

pub use currency::{extract_amount, extract_currency_pair};
pub use location::{extract_country, extract_location};
pub use route::extract_city_pair;
pub use trip_context::{TripContext, analyze_trip_context, context_signal_count};

/// What an extracted entity represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Location,
    Country,
    CurrencyPair,
    CityPair,
    Amount,
}

/// Where an entity was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSpan {
    CurrentMessage,
    /// Index of the turn in conversation history (oldest = 0)
    HistoryTurn(usize),
}

/// A value produced by an extractor together with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity<T> {
    pub kind: EntityKind,
    pub value: T,
    pub source: SourceSpan,
}

impl<T> ExtractedEntity<T> {
    pub fn new(kind: EntityKind, value: T, source: SourceSpan) -> Self {
        Self {
            kind,
            value,
            source,
        }
    }

    pub fn from_history(&self) -> bool {
        matches!(self.source, SourceSpan::HistoryTurn(_))
    }
}

/// Source and target currency codes (ISO 4217, upper case)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
}

impl CurrencyPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Flight route; `origin_inferred` is set when the origin was not stated
/// and the configured default was used instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPair {
    pub origin: String,
    pub destination: String,
    pub origin_inferred: bool,
}
