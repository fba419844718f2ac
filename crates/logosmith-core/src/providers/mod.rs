//! Provider interfaces and implementations.
//!
//! All network side effects of the workflow are isolated behind these
//! traits so step handlers can be exercised with fakes. Real
//! implementations live in [`openai`] (text) and [`replicate`] (images);
//! [`fake`] holds scripted test doubles.

pub mod fake;
pub mod openai;
pub mod replicate;

use async_trait::async_trait;

use crate::error::ServerError;
use crate::workflow::state::{
    Assessment, AssessmentScores, ChatMessage, ClientRequirements, GeneratedLogo, RankingResults,
    Verdict,
};

/// Text generation over an ordered list of role-tagged messages.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<String, ServerError>;
}

/// One generated image plus provenance.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub image_url: String,
    pub model: String,
    pub prompt: String,
}

/// Image generation: submit a job and wait for its outcome.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        style: &str,
    ) -> Result<GeneratedImage, ServerError>;
}

/// Evaluates a generated logo set against the client requirements.
///
/// The shipped [`SimulatedAssessor`] returns a canned verdict without
/// looking at the images; swapping in a real image-quality integration
/// only requires another implementation of this trait.
pub trait LogoAssessor: Send + Sync {
    fn assess(
        &self,
        logos: &[GeneratedLogo],
        requirements: Option<&ClientRequirements>,
    ) -> RankingResults;
}

/// Fixed-outcome assessor. Produces the same two canned assessments on
/// every pass, with a configurable overall verdict.
#[derive(Debug, Clone)]
pub struct SimulatedAssessor {
    verdict: Verdict,
}

impl SimulatedAssessor {
    pub fn passing() -> Self {
        Self { verdict: Verdict::Pass }
    }

    pub fn failing() -> Self {
        Self { verdict: Verdict::Fail }
    }
}

impl Default for SimulatedAssessor {
    fn default() -> Self {
        Self::passing()
    }
}

impl LogoAssessor for SimulatedAssessor {
    fn assess(
        &self,
        _logos: &[GeneratedLogo],
        _requirements: Option<&ClientRequirements>,
    ) -> RankingResults {
        let failing = self.verdict == Verdict::Fail;
        RankingResults {
            overall_quality: self.verdict,
            best_concept_id: 1,
            assessments: vec![
                Assessment {
                    concept_id: 1,
                    scores: AssessmentScores {
                        design_quality: 9,
                        brand_alignment: 8,
                        technical_quality: 8,
                        uniqueness: 9,
                    },
                    total_score: 34,
                    issues: Vec::new(),
                    recommendation: "Approved - excellent quality".to_string(),
                },
                Assessment {
                    concept_id: 2,
                    scores: AssessmentScores {
                        design_quality: 7,
                        brand_alignment: 8,
                        technical_quality: 6,
                        uniqueness: 7,
                    },
                    total_score: 28,
                    issues: vec!["Text could be clearer at small sizes".to_string()],
                    recommendation: "Approved with minor concerns".to_string(),
                },
            ],
            regeneration_needed: failing,
            regeneration_reasons: if failing {
                vec!["Overall quality below the acceptance bar".to_string()]
            } else {
                Vec::new()
            },
        }
    }
}
