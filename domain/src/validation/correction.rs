//! Correction directive generation.

use super::rules::ValidationDomain;
use super::validator::Violation;

const HEADER: &str = "CORRECTION REQUIRED: your previous answer is not consistent with the tool \
results. Rewrite the complete answer for the user and follow every rule below.";

const FOOTER: &str = "Do not mention this correction or apologise for the previous draft.";

fn listed_values(violation: &Violation) -> String {
    violation
        .required_values
        .iter()
        .map(|v| format!("{}: {}", v.field, v.value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn domain_directive(violation: &Violation) -> String {
    let mut lines = vec![format!("[{}]", violation.domain.as_str().to_uppercase())];
    lines.extend(violation.reasons.iter().map(|reason| format!("- Problem: {}.", reason)));

    match violation.domain {
        ValidationDomain::Weather => {
            lines.push(format!(
                "- State these values exactly as given: {}.",
                listed_values(violation)
            ));
        }
        ValidationDomain::Flights => {
            lines.push(
                "- Remove every price, price range, date, airline name, flight number and \
                 departure time. The flight search returned none of these."
                    .to_string(),
            );
            if violation.tool_failed {
                lines.push(
                    "- The flight search failed: say that live flight information is unavailable."
                        .to_string(),
                );
            } else if !violation.required_values.is_empty() {
                lines.push(format!(
                    "- Refer the user to these booking sites for current options: {}.",
                    listed_values(violation)
                ));
            }
        }
        ValidationDomain::Currency => {
            lines.push(format!(
                "- Quote the conversion using exactly these values: {}.",
                listed_values(violation)
            ));
        }
    }

    lines.join("\n")
}

/// Build the single system directive covering every violation of one
/// validation pass.
pub fn correction_directive(violations: &[Violation]) -> String {
    let mut sections = vec![HEADER.to_string()];
    sections.extend(violations.iter().map(domain_directive));
    sections.push(FOOTER.to_string());
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::RequiredValue;

    fn weather_violation() -> Violation {
        Violation {
            domain: ValidationDomain::Weather,
            reasons: vec!["the answer does not mention the forecast location 'Berlin'".into()],
            required_values: vec![
                RequiredValue::new("location", "Berlin"),
                RequiredValue::new("temperature", "12"),
            ],
            tool_failed: false,
        }
    }

    #[test]
    fn test_directive_names_values_verbatim() {
        let text = correction_directive(&[weather_violation()]);
        assert!(text.starts_with("CORRECTION REQUIRED"));
        assert!(text.contains("[WEATHER]"));
        assert!(text.contains("location: Berlin; temperature: 12"));
    }

    #[test]
    fn test_directive_accumulates_domains() {
        let flights = Violation {
            domain: ValidationDomain::Flights,
            reasons: vec!["the answer states a price (\"$230\") the flight search never returned".into()],
            required_values: vec![],
            tool_failed: true,
        };
        let text = correction_directive(&[weather_violation(), flights]);
        let weather_at = text.find("[WEATHER]").unwrap();
        let flights_at = text.find("[FLIGHTS]").unwrap();
        assert!(weather_at < flights_at);
        assert!(text.contains("live flight information is unavailable"));
        assert!(text.ends_with(FOOTER));
    }
}
