//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown query category: {0}")]
    UnknownCategory(String),

    #[error("History window must be at least 1 turn")]
    EmptyHistoryWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_display() {
        let error = DomainError::UnknownTool("book_flight".to_string());
        assert_eq!(error.to_string(), "Unknown tool: book_flight");
    }

    #[test]
    fn test_empty_window_display() {
        assert_eq!(
            DomainError::EmptyHistoryWindow.to_string(),
            "History window must be at least 1 turn"
        );
    }
}
