//! Draft answer validation against tool results.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rules::{RequiredValue, ValidationDomain, ValidationRule, value_text};
use crate::tool::value_objects::{ToolInvocation, ToolResult};
use crate::util::format_grouped;

/// A detected mismatch between a draft and the tool data for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub domain: ValidationDomain,
    /// Human-readable reasons, one per finding
    pub reasons: Vec<String>,
    /// Values the rewrite must state verbatim
    pub required_values: Vec<RequiredValue>,
    /// Set when the tool for this domain failed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tool_failed: bool,
}

impl Violation {
    fn merge(&mut self, other: Violation) {
        for reason in other.reasons {
            if !self.reasons.contains(&reason) {
                self.reasons.push(reason);
            }
        }
        for value in other.required_values {
            if !self.required_values.contains(&value) {
                self.required_values.push(value);
            }
        }
        self.tool_failed |= other.tool_failed;
    }
}

/// Per-domain hallucination checks.
///
/// | Domain | Violation when |
/// |--------|----------------|
/// | weather | tool succeeded and the draft never names the resolved location |
/// | flights | the draft contains a price, date, airline, flight number, price range or clock time |
/// | currency | tool succeeded and the draft lacks the converted amount in any accepted rendering |
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator;

impl ResponseValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check one tool result of `domain` against `draft`.
    pub fn check(
        &self,
        domain: ValidationDomain,
        result: &ToolResult,
        draft: &str,
    ) -> Option<Violation> {
        let rule = ValidationRule::for_domain(domain);
        match domain {
            ValidationDomain::Weather => check_weather(&rule, result, draft),
            ValidationDomain::Flights => check_flights(&rule, result, draft),
            ValidationDomain::Currency => check_currency(&rule, result, draft),
        }
    }

    /// Check every invocation that belongs to a validation domain, skipping
    /// the domains in `skip`. Findings are merged per domain and returned in
    /// domain order.
    pub fn check_all(
        &self,
        invocations: &[ToolInvocation],
        draft: &str,
        skip: &[ValidationDomain],
    ) -> Vec<Violation> {
        let mut found: BTreeMap<ValidationDomain, Violation> = BTreeMap::new();

        for invocation in invocations {
            let Some(domain) = invocation.tool().validation_domain() else {
                continue;
            };
            if skip.contains(&domain) {
                continue;
            }
            if let Some(violation) = self.check(domain, &invocation.result, draft) {
                match found.get_mut(&domain) {
                    Some(existing) => existing.merge(violation),
                    None => {
                        found.insert(domain, violation);
                    }
                }
            }
        }

        found.into_values().collect()
    }
}

fn check_weather(rule: &ValidationRule, result: &ToolResult, draft: &str) -> Option<Violation> {
    let location = result
        .payload()?
        .get("location")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())?;

    if draft.to_lowercase().contains(&location.to_lowercase()) {
        return None;
    }

    Some(Violation {
        domain: ValidationDomain::Weather,
        reasons: vec![format!(
            "the answer does not mention the forecast location '{}'",
            location
        )],
        required_values: rule.required_values(result),
        tool_failed: false,
    })
}

fn check_flights(rule: &ValidationRule, result: &ToolResult, draft: &str) -> Option<Violation> {
    let matches = rule.detect(draft);
    if matches.is_empty() {
        return None;
    }

    Some(Violation {
        domain: ValidationDomain::Flights,
        reasons: matches
            .iter()
            .map(|m| format!("the answer states a {} (\"{}\") the flight search never returned", m.label, m.text))
            .collect(),
        required_values: rule.required_values(result),
        tool_failed: !result.is_success(),
    })
}

/// Renderings of a converted amount accepted in a draft: unrounded, two
/// decimals, grouped, and whole-number forms when the cents are zero.
pub fn amount_renderings(amount: f64) -> Vec<String> {
    let mut candidates = vec![format!("{}", amount), format!("{:.2}", amount), format_grouped(amount)];
    if (amount * 100.0).round() % 100.0 == 0.0 {
        candidates.push(format!("{:.0}", amount));
        candidates.push(format_grouped(amount).trim_end_matches(".00").to_string());
    }

    let mut forms: Vec<String> = Vec::with_capacity(candidates.len());
    for form in candidates {
        if !forms.contains(&form) {
            forms.push(form);
        }
    }
    forms
}

/// Upper-case three-letter code directly after an amount ("92 EUR").
fn following_code(rest: &str) -> Option<&str> {
    let word = rest
        .trim_start()
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()?;
    (word.len() == 3 && word.chars().all(|c| c.is_ascii_uppercase())).then_some(word)
}

/// Whether `draft` states `form` as a whole number in the `target`
/// currency. No digit, `.` or `,` may touch the number on either side
/// ("92" does not match "920" or "92.5"; "92." at a sentence end does), and
/// an occurrence tagged with some other currency code ("1 GBP") is the
/// source amount, not the converted one.
fn states_amount(draft: &str, form: &str, target: &str) -> bool {
    let pattern = format!(r"(?:^|[^\d.,])({})(?:[.,]?(?:$|[^\d.,]))", regex::escape(form));
    let Ok(re) = Regex::new(&pattern) else {
        return false;
    };
    re.captures_iter(draft)
        .filter_map(|caps| caps.get(1))
        .any(|m| match following_code(&draft[m.end()..]) {
            Some(code) => target.is_empty() || code.eq_ignore_ascii_case(target),
            None => true,
        })
}

fn check_currency(rule: &ValidationRule, result: &ToolResult, draft: &str) -> Option<Violation> {
    let payload = result.payload()?;
    let converted = payload.get("converted_amount")?.as_f64()?;

    let target = payload.get("to").and_then(value_text).unwrap_or_default();
    if amount_renderings(converted)
        .iter()
        .any(|form| states_amount(draft, form, &target))
    {
        return None;
    }

    Some(Violation {
        domain: ValidationDomain::Currency,
        reasons: vec![format!(
            "the answer does not state the converted amount {} {}",
            format_grouped(converted),
            target
        )
        .trim_end()
        .to_string()],
        required_values: rule.required_values(result),
        tool_failed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolCall, ToolName};
    use serde_json::json;

    fn weather_ok() -> ToolResult {
        ToolResult::success(json!({
            "location": "Berlin",
            "temperature": 12,
            "condition": "Partly cloudy"
        }))
    }

    fn currency_ok() -> ToolResult {
        ToolResult::success(json!({
            "amount": 100.0,
            "from": "USD",
            "to": "EUR",
            "rate": 0.925,
            "converted_amount": 92.5
        }))
    }

    #[test]
    fn test_weather_missing_location() {
        let v = ResponseValidator
            .check(ValidationDomain::Weather, &weather_ok(), "It's mild, around 12 degrees.")
            .unwrap();
        assert_eq!(v.domain, ValidationDomain::Weather);
        assert!(v.reasons[0].contains("Berlin"));
        assert_eq!(v.required_values[0], RequiredValue::new("location", "Berlin"));
    }

    #[test]
    fn test_weather_location_case_insensitive() {
        assert!(
            ResponseValidator
                .check(ValidationDomain::Weather, &weather_ok(), "berlin is 12°C today")
                .is_none()
        );
    }

    #[test]
    fn test_weather_failure_is_not_checked() {
        assert!(
            ResponseValidator
                .check(ValidationDomain::Weather, &ToolResult::failure("down"), "no idea")
                .is_none()
        );
    }

    #[test]
    fn test_flights_violation_even_on_success() {
        let result = ToolResult::success(json!({"origin": "London", "destination": "Istanbul"}));
        for draft in [
            "Fares from $230",
            "Fly on March 15th",
            "Turkish Airlines has a daily service",
            "Book TK 1234",
        ] {
            let v = ResponseValidator.check(ValidationDomain::Flights, &result, draft);
            assert!(v.is_some(), "expected violation for {draft:?}");
            assert!(!v.unwrap().tool_failed);
        }
    }

    #[test]
    fn test_flights_violation_on_failure() {
        let v = ResponseValidator
            .check(
                ValidationDomain::Flights,
                &ToolResult::failure("offline"),
                "Flights are $99",
            )
            .unwrap();
        assert!(v.tool_failed);
        assert!(v.required_values.is_empty());
    }

    #[test]
    fn test_currency_renderings_accepted() {
        for draft in ["That's 92.5 EUR", "You get 92.50 EUR", "about 92.50 euros"] {
            assert!(
                ResponseValidator
                    .check(ValidationDomain::Currency, &currency_ok(), draft)
                    .is_none()
            );
        }
        let v = ResponseValidator
            .check(ValidationDomain::Currency, &currency_ok(), "roughly 93 euros")
            .unwrap();
        assert!(v.reasons[0].contains("92.50 EUR"));
    }

    #[test]
    fn test_currency_amount_inside_longer_number_rejected() {
        let converted = |amount: f64| {
            ToolResult::success(json!({"from": "USD", "to": "EUR", "converted_amount": amount}))
        };

        let v = ResponseValidator.check(
            ValidationDomain::Currency,
            &converted(92.0),
            "100 USD is about 920 EUR today.",
        );
        assert!(v.is_some());

        let v = ResponseValidator.check(
            ValidationDomain::Currency,
            &converted(1.0),
            "1 GBP buys you 1.17 EUR.",
        );
        assert!(v.is_some());

        assert!(
            ResponseValidator
                .check(ValidationDomain::Currency, &converted(92.0), "You get 92 EUR.")
                .is_none()
        );
        assert!(
            ResponseValidator
                .check(ValidationDomain::Currency, &converted(92.0), "That comes to 92.")
                .is_none()
        );
    }

    #[test]
    fn test_states_amount_boundaries() {
        assert!(states_amount("92.50", "92.50", "EUR"));
        assert!(states_amount("about €1,500, give or take", "1,500", "EUR"));
        assert!(!states_amount("1,092.50 EUR", "92.50", "EUR"));
        assert!(!states_amount("92.505", "92.50", "EUR"));
        assert!(!states_amount("1.17 EUR", "1", "EUR"));
    }

    #[test]
    fn test_source_amount_is_not_the_converted_amount() {
        assert!(!states_amount("1 GBP buys you 1.17 EUR.", "1", "EUR"));
        assert!(states_amount("1 GBP buys you 1 EUR.", "1", "EUR"));
        assert!(states_amount("1 GBP buys you about 1 euro.", "1", "EUR"));
    }

    #[test]
    fn test_amount_renderings() {
        assert_eq!(amount_renderings(1234.5), vec!["1234.5", "1234.50", "1,234.50"]);
        assert_eq!(
            amount_renderings(1500.0),
            vec!["1500", "1500.00", "1,500.00", "1,500"]
        );
    }

    #[test]
    fn test_check_all_skips_and_orders() {
        let invocations = vec![
            ToolInvocation::new(
                ToolCall::new(ToolName::Currency).with_arg("amount", 100.0),
                currency_ok(),
                5,
            ),
            ToolInvocation::new(
                ToolCall::new(ToolName::Weather).with_arg("location", "Berlin"),
                weather_ok(),
                5,
            ),
            ToolInvocation::new(
                ToolCall::new(ToolName::Hotels).with_arg("location", "Berlin"),
                ToolResult::success(json!({"hotels": []})),
                5,
            ),
        ];
        let draft = "Nice weather ahead.";

        let all = ResponseValidator.check_all(&invocations, draft, &[]);
        let domains: Vec<_> = all.iter().map(|v| v.domain).collect();
        assert_eq!(domains, vec![ValidationDomain::Weather, ValidationDomain::Currency]);

        let skipped = ResponseValidator.check_all(&invocations, draft, &[ValidationDomain::Weather]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].domain, ValidationDomain::Currency);
    }
}
