//! Workflow engine — owns the session store and the injected providers,
//! and drives the state machine.
//!
//! The engine runs the step that was awaiting input, then auto-advances
//! through every subsequent step synchronously until it reaches a
//! wait-point (`chat`, `collect_feedback`) or a terminal step
//! (`complete`, `error`). One user confirmation can therefore trigger the
//! full summarize → design → generate → rank cascade in a single call.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ServerError;
use crate::providers::{ImageGenerator, LogoAssessor, TextGenerator};
use crate::store::SessionStore;

use super::state::{ChatMessage, WorkflowState, GREETING};
use super::steps::{self, StepContext};
use super::{can_transition, validate_transitions, Step};

/// Default diagnostic log of generated images, one line per image.
const IMAGE_LOG_FILE: &str = "generated_images_log.txt";

/// Engine reply for one processed user message.
#[derive(Debug, Clone, Serialize)]
pub struct EngineReply {
    pub conversation: Vec<ChatMessage>,
    pub current_step: Step,
}

pub struct WorkflowEngine {
    store: SessionStore,
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    assessor: Arc<dyn LogoAssessor>,
    image_log: Option<PathBuf>,
}

impl WorkflowEngine {
    pub fn new(
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
        assessor: Arc<dyn LogoAssessor>,
    ) -> Self {
        validate_transitions();
        Self {
            store: SessionStore::new(),
            text,
            image,
            assessor,
            image_log: Some(PathBuf::from(IMAGE_LOG_FILE)),
        }
    }

    /// Override (or disable) the diagnostic image log.
    pub fn with_image_log(mut self, path: Option<PathBuf>) -> Self {
        self.image_log = path;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a new design session. The assistant opens the conversation.
    pub async fn start_session(&self) -> (String, String) {
        let session_id = self.store.create(WorkflowState::new()).await;
        tracing::info!(%session_id, "design session started");
        (session_id, GREETING.to_string())
    }

    /// Process one user message for a session, driving the workflow until
    /// it next awaits input or terminates.
    pub async fn process_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<EngineReply, ServerError> {
        let mut state = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| ServerError::NotFound("Session not found".to_string()))?;

        tracing::info!(%session_id, step = %state.current_step, "processing user message");

        state.conversation_history.push(ChatMessage::user(message));

        let ctx = StepContext {
            text: self.text.as_ref(),
            image: self.image.as_ref(),
            assessor: self.assessor.as_ref(),
            image_log: self.image_log.as_deref(),
        };

        // Run the step that was awaiting this message.
        match state.current_step {
            Step::Chat => {
                state.user_input = message.to_string();
                let from = state.current_step;
                steps::chat(&mut state, &ctx).await?;
                log_transition(from, state.current_step);
            }
            Step::CollectFeedback => {
                state.user_feedback = Some(message.to_string());
                let from = state.current_step;
                steps::collect_feedback(&mut state, &ctx).await?;
                log_transition(from, state.current_step);
            }
            // Terminal sessions accept no further work; the message is
            // recorded in history but nothing runs.
            _ => {}
        }

        // Auto-advance through steps that need no external input.
        while !state.current_step.awaits_input() && !state.current_step.is_terminal() {
            let from = state.current_step;
            match state.current_step {
                Step::Summarize => steps::summarize(&mut state, &ctx).await?,
                Step::Design => steps::design(&mut state, &ctx).await?,
                Step::Generate => steps::generate(&mut state, &ctx).await?,
                Step::Rank => steps::rank(&mut state, &ctx),
                Step::Package => steps::package(&mut state),
                Step::Chat | Step::CollectFeedback | Step::Complete | Step::Error => break,
            }
            log_transition(from, state.current_step);
        }

        self.store.put(session_id, state.clone()).await;

        Ok(EngineReply {
            conversation: state.conversation_history,
            current_step: state.current_step,
        })
    }
}

fn log_transition(from: Step, to: Step) {
    if from != to && !can_transition(from, to) {
        tracing::warn!(%from, %to, "handler produced an undeclared transition");
    } else {
        tracing::debug!(%from, %to, "step transition");
    }
}
