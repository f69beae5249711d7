//! Sliding-window conversation memory.

use super::entities::Turn;
use crate::core::error::DomainError;
use std::collections::VecDeque;

/// Number of turns retained by default.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Bounded, ordered store of conversation turns.
///
/// After every append the oldest turns are evicted until the count is back
/// within the window, so the most recent exchange is always retained.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<Turn>,
    window: usize,
}

impl ConversationMemory {
    pub fn new(window: usize) -> Result<Self, DomainError> {
        if window == 0 {
            return Err(DomainError::EmptyHistoryWindow);
        }
        Ok(Self {
            turns: VecDeque::with_capacity(window + 1),
            window,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.window {
            self.turns.pop_front();
        }
    }

    /// Turns in insertion order, oldest first.
    pub fn history(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self {
            turns: VecDeque::with_capacity(DEFAULT_HISTORY_WINDOW + 1),
            window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_window_rejected() {
        assert_eq!(
            ConversationMemory::new(0).unwrap_err(),
            DomainError::EmptyHistoryWindow
        );
    }

    #[test]
    fn test_window_drops_oldest_first() {
        let mut memory = ConversationMemory::new(20).unwrap();
        for i in 1..=25 {
            memory.append(Turn::human(format!("turn #{}", i)));
        }

        let history = memory.history();
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].text(), "turn #6");
        assert_eq!(history[19].text(), "turn #25");
        assert!(history.iter().all(|t| t.text() != "turn #5"));
    }

    #[test]
    fn test_under_window_keeps_everything() {
        let mut memory = ConversationMemory::default();
        memory.append(Turn::human("hello"));
        memory.append(Turn::assistant("hi"));
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.window(), DEFAULT_HISTORY_WINDOW);
    }

    #[test]
    fn test_clear() {
        let mut memory = ConversationMemory::new(4).unwrap();
        memory.append(Turn::human("a"));
        memory.append(Turn::assistant("b"));
        memory.clear();
        assert!(memory.is_empty());
        assert!(memory.history().is_empty());
    }
}
