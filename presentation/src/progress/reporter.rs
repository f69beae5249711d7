//! Progress reporting while a message is processed

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tripwise_application::ProgressNotifier;
use tripwise_domain::{OrchestrationState, ToolCall, ToolInvocation, ToolName, ValidationDomain};

/// Reports progress with a single spinner whose message follows the
/// orchestration state
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Remove the spinner from the terminal
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_state(&self, state: OrchestrationState) {
        match state {
            OrchestrationState::Idle => self.spinner.finish_and_clear(),
            other => self.spinner.set_message(other.label().to_string()),
        }
    }

    fn on_tool_complete(&self, invocation: &ToolInvocation) {
        let mark = if invocation.succeeded() {
            "✓".green()
        } else {
            "✗".red()
        };
        self.spinner.println(format!(
            "  {} {} {}",
            mark,
            invocation.tool(),
            format!("({}ms)", invocation.duration_ms).dimmed()
        ));
    }

    fn on_correction(&self, domains: &[ValidationDomain]) {
        let names: Vec<&str> = domains.iter().map(|d| d.as_str()).collect();
        self.spinner.println(format!(
            "  {} correcting {}",
            "↺".yellow(),
            names.join(", ")
        ));
    }

    fn on_follow_up(&self, iteration: usize, tools: &[ToolName]) {
        let names: Vec<&str> = tools.iter().map(|t| t.as_str()).collect();
        self.spinner.println(format!(
            "  {} follow-up {}: {}",
            "→".cyan(),
            iteration,
            names.join(", ")
        ));
    }
}

/// Simple text-based progress (no spinner), for non-interactive output
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_state(&self, state: OrchestrationState) {
        if state != OrchestrationState::Idle {
            eprintln!("{} {}", "->".cyan(), state.label());
        }
    }

    fn on_tool_start(&self, call: &ToolCall) {
        eprintln!("   {} {}", "calling".dimmed(), call.tool);
    }

    fn on_tool_complete(&self, invocation: &ToolInvocation) {
        if invocation.succeeded() {
            eprintln!("   {} {}", "v".green(), invocation.tool());
        } else {
            eprintln!("   {} {} (failed)", "x".red(), invocation.tool());
        }
    }
}
