//! Central workflow state shared across all step handlers.
//!
//! A single `WorkflowState` record is created per session and threaded
//! through every step. Handlers mutate it in place; the session store
//! keeps the latest copy between HTTP requests.

use serde::{Deserialize, Serialize};

use super::Step;

/// Message role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// ─── Client Requirements (structured brief) ────────────────────────────────

/// Structured design brief extracted from the consultation.
///
/// All fields are defaulted so a slightly incomplete model response still
/// parses; the five top-level sections are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRequirements {
    pub company_details: CompanyDetails,
    pub brand_requirements: BrandRequirements,
    pub design_specifications: DesignSpecifications,
    pub technical_requirements: TechnicalRequirements,
    pub competitive_context: CompetitiveContext,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyDetails {
    pub name: String,
    pub industry: String,
    pub business_function: String,
    pub target_audience: String,
    pub unique_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandRequirements {
    pub personality: Vec<String>,
    pub desired_perception: String,
    pub core_values: Vec<String>,
    pub emotional_goal: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSpecifications {
    pub logo_style: String,
    pub color_direction: String,
    pub aesthetic_approach: String,
    pub visual_inspiration: String,
    pub avoid: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalRequirements {
    pub primary_applications: Vec<String>,
    pub scalability_needs: String,
    pub background_variations: String,
    pub file_priorities: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitiveContext {
    pub key_competitors: Vec<String>,
    pub differentiation: String,
    pub industry_positioning: String,
}

// ─── Design Concepts ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

/// One proposed logo design direction, carrying a generation-ready prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignConcept {
    pub concept_id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub color_palette: ColorPalette,
    #[serde(default)]
    pub typography: String,
    #[serde(default)]
    pub symbol_concept: String,
    #[serde(default)]
    pub rationale: String,
    /// Prompt handed to the image generation provider. The designer model
    /// is asked for `midjourney_prompt`; both names are accepted.
    #[serde(alias = "midjourney_prompt")]
    pub generation_prompt: String,
}

/// Full designer output: concepts plus overall rationale.
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptSheet {
    pub concepts: Vec<DesignConcept>,
    #[serde(default)]
    pub design_rationale: String,
    #[serde(default)]
    pub technical_notes: String,
}

// ─── Generated Logos ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoVariations {
    pub primary: String,
    pub horizontal: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub prompt_used: String,
    pub model: String,
}

/// One rendered logo image, tagged with its originating concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedLogo {
    pub concept_id: u32,
    pub concept_name: String,
    pub image_url: String,
    pub variations: LogoVariations,
    pub generation_metadata: GenerationMetadata,
}

// ─── Ranking ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentScores {
    pub design_quality: u32,
    pub brand_alignment: u32,
    pub technical_quality: u32,
    pub uniqueness: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub concept_id: u32,
    pub scores: AssessmentScores,
    pub total_score: u32,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

/// One ranking pass over the currently generated logo set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResults {
    pub overall_quality: Verdict,
    pub best_concept_id: u32,
    pub assessments: Vec<Assessment>,
    pub regeneration_needed: bool,
    #[serde(default)]
    pub regeneration_reasons: Vec<String>,
}

// ─── Workflow State ────────────────────────────────────────────────────────

/// Opening assistant message for every new session.
pub const GREETING: &str = "\u{1F44B} Hello! I'm Alex, your logo design assistant. \
Let's begin by understanding your brand. Can you tell me about your company, \
its industry, and your target audience?";

/// Default cap on image regeneration rounds.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Central state shared across all workflow steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    // User interaction
    pub conversation_history: Vec<ChatMessage>,
    pub user_input: String,
    pub user_feedback: Option<String>,
    pub iteration_count: u32,

    // Step outputs
    pub chat_summary: Option<String>,
    pub client_requirements: Option<ClientRequirements>,
    pub design_concepts: Vec<DesignConcept>,
    pub generated_logos: Vec<GeneratedLogo>,
    pub ranking_results: Option<RankingResults>,
    pub final_package: Option<String>,

    // Control flow
    pub current_step: Step,
    pub needs_regeneration: bool,
    pub user_approved: bool,
    pub error_message: Option<String>,

    // Regeneration bounds
    pub generation_attempts: u32,
    pub max_attempts: u32,
}

impl WorkflowState {
    /// Fresh state at the `chat` step with the assistant greeting as the
    /// only history entry.
    pub fn new() -> Self {
        Self {
            conversation_history: vec![ChatMessage::assistant(GREETING)],
            user_input: String::new(),
            user_feedback: None,
            iteration_count: 0,
            chat_summary: None,
            client_requirements: None,
            design_concepts: Vec::new(),
            generated_logos: Vec::new(),
            ranking_results: None,
            final_package: None,
            current_step: Step::Chat,
            needs_regeneration: false,
            user_approved: false,
            error_message: None,
            generation_attempts: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Record a handler failure: the engine never advances out of `Error`.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(step = %self.current_step, error = %message, "workflow step failed");
        self.error_message = Some(message);
        self.current_step = Step::Error;
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}
