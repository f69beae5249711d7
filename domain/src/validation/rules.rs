//! Validation domains, hallucination signatures and the values each domain
//! requires an answer to carry.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tool::value_objects::ToolResult;
use crate::util::format_grouped;

/// A category of fact the model is prone to fabricate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationDomain {
    Weather,
    Flights,
    Currency,
}

impl ValidationDomain {
    pub const ALL: [ValidationDomain; 3] = [
        ValidationDomain::Weather,
        ValidationDomain::Flights,
        ValidationDomain::Currency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationDomain::Weather => "weather",
            ValidationDomain::Flights => "flights",
            ValidationDomain::Currency => "currency",
        }
    }
}

impl std::fmt::Display for ValidationDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[$€£¥₹]\s?\d[\d,]*(?:\.\d+)?|\b\d[\d,]*(?:\.\d+)?\s?(?:usd|eur|gbp|dollars|euros|pounds)\b",
    )
    .unwrap()
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let month = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
    Regex::new(&format!(
        r"(?i)\b{month}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?\b|\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{month}\b"
    ))
    .unwrap()
});

static AIRLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:turkish airlines|british airways|lufthansa|ryanair|easyjet|emirates|qatar airways|etihad|delta air lines|united airlines|american airlines|air france|klm|iberia|tap air portugal|vueling|wizz ?air|norwegian air|finnair|singapore airlines|cathay pacific|japan airlines|jetblue|southwest airlines|ita airways|aer lingus)\b",
    )
    .unwrap()
});

/// "<Name> Airlines/Airways/Air", case-sensitive so "fresh air" is ignored.
static GENERIC_AIRLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\p{Lu}\p{L}+\s(?:Airlines|Airways|Air)\b").unwrap());

static FLIGHT_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Z]{2}|[A-Z]\d|\d[A-Z])\s?\d{3,4}\b").unwrap()
});

static PRICE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d[\d,]*\s?(?:-|–|to)\s?\d[\d,]*\s?(?:usd|eur|gbp|dollars|euros|pounds)\b|\bbetween\s+[$€£]?\d[\d,]*\s+and\s+[$€£]?\d[\d,]*",
    )
    .unwrap()
});

static CLOCK_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:[01]?\d|2[0-3]):[0-5]\d\s?(?:am|pm)?\b|\b(?:1[0-2]|0?[1-9])\s?(?:am|pm)\b")
        .unwrap()
});

/// One pattern that marks fabricated content
#[derive(Debug)]
pub struct HallucinationSignature {
    pub label: &'static str,
    pattern: &'static LazyLock<Regex>,
}

impl HallucinationSignature {
    /// First match of this signature in `text`.
    pub fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.pattern.find(text).map(|m| m.as_str())
    }
}

static FLIGHT_SIGNATURES: [HallucinationSignature; 7] = [
    HallucinationSignature { label: "price", pattern: &PRICE_RE },
    HallucinationSignature { label: "date", pattern: &DATE_RE },
    HallucinationSignature { label: "airline", pattern: &AIRLINE_RE },
    HallucinationSignature { label: "airline", pattern: &GENERIC_AIRLINE_RE },
    HallucinationSignature { label: "flight number", pattern: &FLIGHT_NUMBER_RE },
    HallucinationSignature { label: "price range", pattern: &PRICE_RANGE_RE },
    HallucinationSignature { label: "departure time", pattern: &CLOCK_TIME_RE },
];

/// A value the corrected answer must state verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredValue {
    pub field: String,
    pub value: String,
}

impl RequiredValue {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A signature hit inside a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMatch<'a> {
    pub label: &'static str,
    pub text: &'a str,
}

/// Static rule for one validation domain: the signatures that betray a
/// fabrication and the tool-result fields a corrected answer must carry.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRule {
    pub domain: ValidationDomain,
    pub signatures: &'static [HallucinationSignature],
}

impl ValidationRule {
    pub fn for_domain(domain: ValidationDomain) -> Self {
        let signatures: &'static [HallucinationSignature] = match domain {
            ValidationDomain::Flights => &FLIGHT_SIGNATURES,
            ValidationDomain::Weather | ValidationDomain::Currency => &[],
        };
        Self { domain, signatures }
    }

    /// Every signature found in `draft`, one entry per signature.
    pub fn detect<'a>(&self, draft: &'a str) -> Vec<SignatureMatch<'a>> {
        self.signatures
            .iter()
            .filter_map(|signature| {
                signature.find(draft).map(|text| SignatureMatch {
                    label: signature.label,
                    text,
                })
            })
            .collect()
    }

    /// Values from `result` that a corrected answer must reproduce.
    pub fn required_values(&self, result: &ToolResult) -> Vec<RequiredValue> {
        let Some(payload) = result.payload() else {
            return Vec::new();
        };

        let fields: &[&str] = match self.domain {
            ValidationDomain::Weather => &["location", "temperature", "condition"],
            ValidationDomain::Flights => &["origin", "destination"],
            ValidationDomain::Currency => &["amount", "from", "to", "rate", "converted_amount"],
        };

        let mut values: Vec<RequiredValue> = fields
            .iter()
            .filter_map(|field| {
                let value = payload.get(*field)?;
                let text = if *field == "converted_amount" {
                    format_grouped(value.as_f64()?)
                } else {
                    value_text(value)?
                };
                Some(RequiredValue::new(*field, text))
            })
            .collect();

        if self.domain == ValidationDomain::Flights {
            if let Some(links) = payload.get("booking_links").and_then(|v| v.as_array()) {
                values.extend(links.iter().filter_map(|link| {
                    let provider = link.get("provider")?.as_str()?;
                    let url = link.get("url")?.as_str()?;
                    Some(RequiredValue::new(provider, url))
                }));
            }
        }

        values
    }
}

/// Render a scalar JSON value as it should appear in prose. Whole numbers
/// drop their fractional part (`12.0` → `"12"`).
pub fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                let f = n.as_f64()?;
                Some(if f.fract() == 0.0 {
                    format!("{:.0}", f)
                } else {
                    format!("{}", f)
                })
            }
        }
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flight_labels(draft: &str) -> Vec<&'static str> {
        ValidationRule::for_domain(ValidationDomain::Flights)
            .detect(draft)
            .into_iter()
            .map(|m| m.label)
            .collect()
    }

    #[test]
    fn test_flight_signatures_fire() {
        assert_eq!(flight_labels("Tickets start at $230."), vec!["price"]);
        assert_eq!(flight_labels("There is a departure on March 15th."), vec!["date"]);
        assert!(flight_labels("Turkish Airlines flies this route.").contains(&"airline"));
        assert_eq!(flight_labels("Try flight TK 1234."), vec!["flight number"]);
        assert!(flight_labels("Expect 200-400 euros.").contains(&"price range"));
        assert_eq!(flight_labels("The first one leaves at 9:45."), vec!["departure time"]);
        assert_eq!(flight_labels("Departs at 7pm daily."), vec!["departure time"]);
        assert_eq!(flight_labels("Departure is on 3 May."), vec!["date"]);
    }

    #[test]
    fn test_generic_airline_name() {
        assert_eq!(flight_labels("Try Wizzy Airways."), vec!["airline"]);
        assert!(flight_labels("Get some fresh air in the park.").is_empty());
    }

    #[test]
    fn test_clean_flight_draft() {
        let draft = "I can't quote fares, but Skyscanner and Google Flights let you \
                     compare options from London to Rome. Book early and stay flexible.";
        assert!(flight_labels(draft).is_empty());
    }

    #[test]
    fn test_weather_and_currency_have_no_signatures() {
        assert!(
            ValidationRule::for_domain(ValidationDomain::Weather)
                .detect("$230 on March 15th")
                .is_empty()
        );
    }

    #[test]
    fn test_required_values_weather() {
        let result = ToolResult::success(json!({
            "location": "Berlin",
            "temperature": 12.0,
            "condition": "Partly cloudy",
            "humidity": 70
        }));
        let values = ValidationRule::for_domain(ValidationDomain::Weather).required_values(&result);
        assert_eq!(
            values,
            vec![
                RequiredValue::new("location", "Berlin"),
                RequiredValue::new("temperature", "12"),
                RequiredValue::new("condition", "Partly cloudy"),
            ]
        );
    }

    #[test]
    fn test_required_values_flights_include_links() {
        let result = ToolResult::success(json!({
            "origin": "London",
            "destination": "Rome",
            "booking_links": [{"provider": "Skyscanner", "url": "https://www.skyscanner.net"}]
        }));
        let values = ValidationRule::for_domain(ValidationDomain::Flights).required_values(&result);
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], RequiredValue::new("Skyscanner", "https://www.skyscanner.net"));
    }

    #[test]
    fn test_required_values_failure_is_empty() {
        let rule = ValidationRule::for_domain(ValidationDomain::Currency);
        assert!(rule.required_values(&ToolResult::failure("boom")).is_empty());
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(12)), Some("12".into()));
        assert_eq!(value_text(&json!(12.0)), Some("12".into()));
        assert_eq!(value_text(&json!(12.5)), Some("12.5".into()));
        assert_eq!(value_text(&json!("")), None);
        assert_eq!(value_text(&json!(null)), None);
    }
}
