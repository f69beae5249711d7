//! Console output formatter for assistant replies

use colored::Colorize;
use tripwise_application::ProcessOutcome;
use tripwise_domain::Turn;

/// Formats process outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Answer followed by a dimmed metadata line (tools, steps, timing).
    pub fn format(outcome: &ProcessOutcome) -> String {
        let Some(reply) = outcome.reply() else {
            return format!("{}\n", outcome.content().yellow());
        };

        let mut output = String::new();
        output.push_str(&reply.content);
        output.push_str("\n\n");

        let mut meta = Vec::new();
        if !reply.tools_used.is_empty() {
            let tools: Vec<&str> = reply.tools_used.iter().map(|t| t.as_str()).collect();
            meta.push(format!("tools: {}", tools.join(", ")));
        }
        if !reply.corrections.is_empty() {
            let domains: Vec<&str> = reply.corrections.iter().map(|d| d.as_str()).collect();
            meta.push(format!("corrected: {}", domains.join(", ")));
        }
        if reply.follow_up_iterations > 0 {
            meta.push(format!("follow-ups: {}", reply.follow_up_iterations));
        }
        meta.push(format!("intent: {}", reply.intent.as_str()));
        meta.push(format!("{} steps", reply.steps));
        meta.push(Self::format_duration(reply.duration_ms));

        output.push_str(&format!("{}\n", meta.join(" · ").dimmed()));
        output
    }

    /// Answer text only (or the apology on failure)
    pub fn format_answer_only(outcome: &ProcessOutcome) -> String {
        format!("{}\n", outcome.content())
    }

    /// Format as JSON
    pub fn format_json(outcome: &ProcessOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Conversation history as "you:" / "tripwise:" lines
    pub fn format_history(history: &[Turn]) -> String {
        if history.is_empty() {
            return format!("{}\n", "(no conversation yet)".dimmed());
        }

        let mut output = String::new();
        for turn in history {
            let speaker = if turn.is_human() {
                "you:".cyan().bold()
            } else {
                "tripwise:".green().bold()
            };
            output.push_str(&format!(
                "{} {}\n",
                speaker,
                Self::indent(turn.text(), "   ").trim_start()
            ));
        }
        output
    }

    fn format_duration(ms: u64) -> String {
        if ms >= 1000 {
            format!("{:.1}s", ms as f64 / 1000.0)
        } else {
            format!("{}ms", ms)
        }
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
