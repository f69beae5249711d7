//! Orchestration states

use serde::{Deserialize, Serialize};

/// States of one message-processing run.
///
/// ```text
/// Idle → Classifying → ExecutingTools → Synthesizing → Validating
///                                            ▲              │
///                                            │              ├─→ CorrectingOnce ─┐
///                                            │              ▼                   │
///                                            └──── ExploringFollowUps ◄─────────┘
///                                                           │
///                                                           ▼
///                                                      Finalizing → Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationState {
    Idle,
    Classifying,
    ExecutingTools,
    Synthesizing,
    Validating,
    CorrectingOnce,
    ExploringFollowUps,
    Finalizing,
}

impl OrchestrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestrationState::Idle => "idle",
            OrchestrationState::Classifying => "classifying",
            OrchestrationState::ExecutingTools => "executing_tools",
            OrchestrationState::Synthesizing => "synthesizing",
            OrchestrationState::Validating => "validating",
            OrchestrationState::CorrectingOnce => "correcting_once",
            OrchestrationState::ExploringFollowUps => "exploring_follow_ups",
            OrchestrationState::Finalizing => "finalizing",
        }
    }

    /// Short progress label for display
    pub fn label(&self) -> &'static str {
        match self {
            OrchestrationState::Idle => "Ready",
            OrchestrationState::Classifying => "Understanding the question",
            OrchestrationState::ExecutingTools => "Looking up travel data",
            OrchestrationState::Synthesizing => "Writing an answer",
            OrchestrationState::Validating => "Checking the answer",
            OrchestrationState::CorrectingOnce => "Correcting the answer",
            OrchestrationState::ExploringFollowUps => "Following up",
            OrchestrationState::Finalizing => "Finishing",
        }
    }

    /// Whether the loop may move from `self` to `next`.
    pub fn can_transition_to(&self, next: OrchestrationState) -> bool {
        use OrchestrationState::*;
        matches!(
            (self, next),
            (Idle, Classifying)
                | (Classifying, ExecutingTools)
                | (ExecutingTools, Synthesizing)
                | (Synthesizing, Validating)
                | (Validating, CorrectingOnce)
                | (Validating, ExploringFollowUps)
                | (CorrectingOnce, ExploringFollowUps)
                | (ExploringFollowUps, ExecutingTools)
                | (ExploringFollowUps, Finalizing)
                | (Finalizing, Idle)
        )
    }
}

impl std::fmt::Display for OrchestrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrchestrationState::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            Idle,
            Classifying,
            ExecutingTools,
            Synthesizing,
            Validating,
            CorrectingOnce,
            ExploringFollowUps,
            Finalizing,
            Idle,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_follow_up_loops_back_to_tools() {
        assert!(ExploringFollowUps.can_transition_to(ExecutingTools));
        assert!(Validating.can_transition_to(ExploringFollowUps));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!Idle.can_transition_to(Synthesizing));
        assert!(!CorrectingOnce.can_transition_to(CorrectingOnce));
        assert!(!Finalizing.can_transition_to(Classifying));
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_value(ExploringFollowUps).unwrap(),
            serde_json::json!("exploring_follow_ups")
        );
    }
}
