//! Prompt templates for answer synthesis

use crate::conversation::entities::{Message, Turn};
use crate::intent::category::QueryCategory;
use crate::tool::value_objects::{ToolInvocation, ToolResult};

/// Templates for generating the synthesis prompt
pub struct PromptTemplate;

impl PromptTemplate {
    /// Base system prompt: persona and grounding rules
    pub fn system() -> &'static str {
        r#"You are Tripwise, a friendly and practical travel assistant.
Answer travel questions about destinations, weather, packing, money, flights, hotels and things to do.

Grounding rules:
1. When a TOOL RESULT is provided, use its values verbatim (place names, temperatures, amounts, links).
2. Never invent prices, price ranges, dates, airline names, flight numbers or departure times. For flights, point the user to the booking links instead.
3. When a TOOL FAILED notice is provided, tell the user that this information is currently unavailable. Do not guess it.
4. If you need data you do not have, say so plainly.
Keep answers concise and well structured."#
    }

    /// Category-specific focus appended to the system prompt
    pub fn category_focus(category: QueryCategory) -> Option<&'static str> {
        match category {
            QueryCategory::Destination => Some(
                "Focus: help the user choose or learn about a destination (best time to go, highlights, practical tips).",
            ),
            QueryCategory::Packing => Some(
                "Focus: give a practical packing list grounded in the weather data, grouped by category.",
            ),
            QueryCategory::Attractions => Some(
                "Focus: suggest concrete things to see and do, using the places data when available.",
            ),
            QueryCategory::General => None,
        }
    }

    /// Full system prompt for a classified query
    pub fn system_for(category: QueryCategory) -> String {
        match Self::category_focus(category) {
            Some(focus) => format!("{}\n\n{}", Self::system(), focus),
            None => Self::system().to_string(),
        }
    }

    /// System notice narrating one tool execution to the model
    pub fn tool_notice(invocation: &ToolInvocation) -> String {
        let name = invocation.tool().as_str();
        match &invocation.result {
            ToolResult::Success { payload } => {
                format!("TOOL RESULT [{}]: {}", name, payload)
            }
            ToolResult::Failure { reason } => format!(
                "TOOL FAILED [{}]: {}. Do not invent this data; tell the user it is unavailable.",
                name,
                reason.trim_end_matches('.')
            ),
        }
    }

    /// Messages for one synthesis call, in order: system prompt, history,
    /// one notice per tool invocation, then the user message.
    pub fn build_messages(
        category: QueryCategory,
        history: &[Turn],
        invocations: &[ToolInvocation],
        user_message: &str,
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + invocations.len() + 2);
        messages.push(Message::system(Self::system_for(category)));
        messages.extend(history.iter().map(Message::from));
        messages.extend(
            invocations
                .iter()
                .map(|invocation| Message::system(Self::tool_notice(invocation))),
        );
        messages.push(Message::human(user_message));
        messages
    }

    /// Extend a synthesis prompt with the rejected draft and the correction
    /// directive so the model rewrites its own answer.
    pub fn with_correction(mut messages: Vec<Message>, draft: &str, directive: &str) -> Vec<Message> {
        messages.push(Message::assistant(draft));
        messages.push(Message::system(directive));
        messages
    }
}
