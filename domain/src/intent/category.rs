//! Coarse query category scoring.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;
use crate::extraction::normalize::{contains_phrase, word_text};

/// Coarse category of a user query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryCategory {
    Destination,
    Packing,
    Attractions,
    /// Catch-all when no scored category reaches the threshold
    General,
}

impl QueryCategory {
    /// Scored categories, in tie-break order.
    pub const SCORED: [QueryCategory; 3] = [
        QueryCategory::Destination,
        QueryCategory::Packing,
        QueryCategory::Attractions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCategory::Destination => "destination",
            QueryCategory::Packing => "packing",
            QueryCategory::Attractions => "attractions",
            QueryCategory::General => "general",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            QueryCategory::Destination => &[
                "where should i go",
                "where to go",
                "trip to",
                "travel to",
                "go to",
                "worth visiting",
                "best time",
                "destination",
                "destinations",
                "visit",
                "vacation",
                "holiday",
                "recommend",
                "getaway",
            ],
            QueryCategory::Packing => &[
                "what should i pack",
                "what to pack",
                "what to wear",
                "carry on",
                "pack",
                "packing",
                "bring",
                "wear",
                "clothes",
                "luggage",
                "suitcase",
                "jacket",
                "umbrella",
                "essentials",
            ],
            QueryCategory::Attractions => &[
                "things to do",
                "places to visit",
                "must see",
                "what to see",
                "attractions",
                "attraction",
                "sightseeing",
                "landmarks",
                "museum",
                "museums",
                "activities",
                "restaurants",
                "nightlife",
                "tour",
                "tours",
                "see",
            ],
            QueryCategory::General => &[],
        }
    }
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueryCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "destination" => Ok(QueryCategory::Destination),
            "packing" => Ok(QueryCategory::Packing),
            "attractions" => Ok(QueryCategory::Attractions),
            "general" => Ok(QueryCategory::General),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

/// Minimum score for a scored category to win over `General`.
pub const CATEGORY_THRESHOLD: u32 = 1;

/// Weight of a keyword: phrases are the most specific, long words next.
pub fn keyword_weight(keyword: &str) -> u32 {
    if keyword.contains(' ') {
        3
    } else if keyword.chars().count() >= 6 {
        2
    } else {
        1
    }
}

/// Winning category and its score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentScore {
    pub category: QueryCategory,
    pub score: u32,
}

fn score(words: &str, category: QueryCategory) -> u32 {
    category
        .keywords()
        .iter()
        .filter(|keyword| contains_phrase(words, keyword))
        .map(|keyword| keyword_weight(keyword))
        .sum()
}

/// Score `text` against every scored category and pick the best.
///
/// Ties keep the category listed first in [`QueryCategory::SCORED`]; a best
/// score under [`CATEGORY_THRESHOLD`] yields `General`.
pub fn classify_query(text: &str) -> IntentScore {
    let words = word_text(text);

    let mut best = IntentScore {
        category: QueryCategory::General,
        score: 0,
    };
    for category in QueryCategory::SCORED {
        let score = score(&words, category);
        if score > best.score {
            best = IntentScore { category, score };
        }
    }

    if best.score < CATEGORY_THRESHOLD {
        return IntentScore {
            category: QueryCategory::General,
            score: 0,
        };
    }
    best
}
