//! Logo design workflow — state machine, step handlers, and engine.
//!
//! The workflow is a closed set of named steps. Each step has one handler
//! and a fixed set of outgoing transitions, declared as data in
//! [`TRANSITIONS`] rather than scattered conditionals. The engine drives
//! the machine: it pauses only at steps that await external input (`chat`
//! and `collect_feedback`) and at the terminal steps.

pub mod engine;
pub mod prompts;
pub mod state;
pub mod steps;

use serde::{Deserialize, Serialize};

/// Identifier of a workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Chat,
    Summarize,
    Design,
    Generate,
    Rank,
    CollectFeedback,
    Package,
    Complete,
    Error,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Chat => "chat",
            Step::Summarize => "summarize",
            Step::Design => "design",
            Step::Generate => "generate",
            Step::Rank => "rank",
            Step::CollectFeedback => "collect_feedback",
            Step::Package => "package",
            Step::Complete => "complete",
            Step::Error => "error",
        }
    }

    /// Steps whose contract is "await external input". The engine stops
    /// auto-advancing when it reaches one of these.
    pub fn awaits_input(&self) -> bool {
        matches!(self, Step::Chat | Step::CollectFeedback)
    }

    /// Terminal steps: no outgoing transitions, no recovery.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Complete | Step::Error)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The transition table, as data.
///
/// Each row is `(from, allowed targets)`. Handlers may only move the state
/// along a declared edge; the engine logs any violation.
pub const TRANSITIONS: &[(Step, &[Step])] = &[
    (Step::Chat, &[Step::Chat, Step::Summarize]),
    (Step::Summarize, &[Step::Design, Step::Error]),
    (Step::Design, &[Step::Generate, Step::Error]),
    (Step::Generate, &[Step::Rank, Step::Error]),
    (Step::Rank, &[Step::Generate, Step::CollectFeedback]),
    (
        Step::CollectFeedback,
        &[
            Step::Design,
            Step::Generate,
            Step::Package,
            Step::CollectFeedback,
            Step::Error,
        ],
    ),
    (Step::Package, &[Step::Complete]),
];

/// Whether `from → to` is a declared edge of the workflow.
pub fn can_transition(from: Step, to: Step) -> bool {
    TRANSITIONS
        .iter()
        .find(|(step, _)| *step == from)
        .map(|(_, targets)| targets.contains(&to))
        .unwrap_or(false)
}

/// Validate the transition table: every non-terminal step must have at
/// least one outgoing edge, and terminal steps must have none. Called once
/// at engine construction.
pub fn validate_transitions() {
    for step in [
        Step::Chat,
        Step::Summarize,
        Step::Design,
        Step::Generate,
        Step::Rank,
        Step::CollectFeedback,
        Step::Package,
    ] {
        assert!(
            TRANSITIONS.iter().any(|(from, targets)| *from == step && !targets.is_empty()),
            "step {step} has no outgoing transitions"
        );
    }
    assert!(
        !TRANSITIONS.iter().any(|(from, _)| from.is_terminal()),
        "terminal steps must not have outgoing transitions"
    );
}
