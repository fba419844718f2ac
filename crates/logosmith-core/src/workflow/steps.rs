//! Step handlers — one per workflow step.
//!
//! Each handler receives the full `WorkflowState` plus a `StepContext`
//! with the injected providers, mutates the state, and sets
//! `current_step` to one of its declared targets. Parse failures and
//! caught provider failures move the state to `Step::Error`; provider
//! failures in chat, summarize, and collect_feedback propagate to the
//! caller as `ServerError`.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use futures::future::try_join_all;

use crate::error::ServerError;
use crate::providers::{ImageGenerator, LogoAssessor, TextGenerator};

use super::prompts;
use super::state::{
    ChatMessage, ConceptSheet, GeneratedLogo, GenerationMetadata, LogoVariations, Role, Verdict,
    WorkflowState,
};
use super::Step;

/// Canvas size for every generation request.
const IMAGE_WIDTH: u32 = 1024;
const IMAGE_HEIGHT: u32 = 1024;
const IMAGE_STYLE: &str = "minimal tech logo";

/// Injected collaborators for a handler invocation.
pub struct StepContext<'a> {
    pub text: &'a dyn TextGenerator,
    pub image: &'a dyn ImageGenerator,
    pub assessor: &'a dyn LogoAssessor,
    /// Diagnostic append-only log of generated images; never read back.
    pub image_log: Option<&'a Path>,
}

// ─── Completion gate (chat → summarize) ────────────────────────────────────

const AFFIRMATIVE_TOKENS: &[&str] = &["yes", "go ahead", "correct", "that's right", "sounds good"];

const SUMMARY_TOKENS: &[&str] = &[
    "to summarize",
    "summary",
    "here's what i understood",
    "here\u{2019}s what i understood",
    "let me recap",
    "does this accurately capture",
];

fn user_confirmed(message: &str) -> bool {
    let lowered = message.to_lowercase();
    let lowered = lowered.trim();
    AFFIRMATIVE_TOKENS.iter().any(|token| lowered.contains(token))
}

fn assistant_offered_summary(reply: &str) -> bool {
    let lowered = reply.to_lowercase();
    SUMMARY_TOKENS.iter().any(|token| lowered.contains(token))
}

// ─── JSON extraction ───────────────────────────────────────────────────────

/// Strip a markdown code fence if the model wrapped its JSON in one.
fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

// ─── Handlers ──────────────────────────────────────────────────────────────

/// Chat: consultation turn. Advances to `summarize` only when the user
/// confirmed AND the assistant's reply offered a summary — both sides of
/// the gate must hold.
pub async fn chat(state: &mut WorkflowState, ctx: &StepContext<'_>) -> Result<(), ServerError> {
    let mut messages = vec![ChatMessage::system(prompts::CONSULTANT)];
    messages.extend(
        state
            .conversation_history
            .iter()
            .filter(|msg| msg.role == Role::User)
            .cloned(),
    );

    let reply = ctx.text.generate_text(&messages).await?;

    let complete = user_confirmed(&state.user_input) && assistant_offered_summary(&reply);

    state.conversation_history.push(ChatMessage::assistant(&reply));
    state.user_input.clear();
    state.current_step = if complete { Step::Summarize } else { Step::Chat };
    Ok(())
}

/// Summarize: extract the structured five-section brief from the full
/// transcript.
pub async fn summarize(
    state: &mut WorkflowState,
    ctx: &StepContext<'_>,
) -> Result<(), ServerError> {
    let transcript = state
        .conversation_history
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join("\n");

    let messages = vec![
        ChatMessage::system(prompts::BRIEF_WRITER),
        ChatMessage::user(format!("Conversation to summarize:\n{transcript}")),
    ];

    let reply = ctx.text.generate_text(&messages).await?;

    let parsed = serde_json::from_str(extract_json(&reply));
    match parsed {
        Ok(requirements) => {
            state.client_requirements = Some(requirements);
            state.chat_summary = Some(reply);
            state.current_step = Step::Design;
        }
        Err(err) => {
            tracing::warn!(error = %err, "brief did not parse");
            state.fail("Failed to parse client requirements");
        }
    }
    Ok(())
}

/// Design: produce three concepts, each with a generation-ready prompt.
/// Both parse failures and provider failures are caught here and become
/// the error step.
pub async fn design(state: &mut WorkflowState, ctx: &StepContext<'_>) -> Result<(), ServerError> {
    let Some(requirements) = state.client_requirements.clone() else {
        state.fail("Design step reached without client requirements");
        return Ok(());
    };

    let requirements_text = serde_json::to_string_pretty(&requirements)
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    let messages = vec![
        ChatMessage::system(prompts::DESIGNER),
        ChatMessage::user(format!("Client Requirements:\n{requirements_text}")),
    ];

    match ctx.text.generate_text(&messages).await {
        Ok(reply) => match serde_json::from_str::<ConceptSheet>(extract_json(&reply)) {
            Ok(sheet) => {
                tracing::info!(concepts = sheet.concepts.len(), "design concepts produced");
                state.design_concepts = sheet.concepts;
                state.current_step = Step::Generate;
            }
            Err(err) => {
                tracing::warn!(error = %err, "concept sheet did not parse");
                state.fail("Failed to parse design concepts");
            }
        },
        Err(err) => state.fail(format!("Designer step failed: {err}")),
    }
    Ok(())
}

/// Generate: fan out one image request per concept and join the full set.
/// One failing generation fails the whole batch.
pub async fn generate(state: &mut WorkflowState, ctx: &StepContext<'_>) -> Result<(), ServerError> {
    let jobs = state.design_concepts.iter().map(|concept| async move {
        let image = ctx
            .image
            .generate_image(&concept.generation_prompt, IMAGE_WIDTH, IMAGE_HEIGHT, IMAGE_STYLE)
            .await?;
        tracing::info!(concept = %concept.name, url = %image.image_url, "image generated");
        Ok::<GeneratedLogo, ServerError>(GeneratedLogo {
            concept_id: concept.concept_id,
            concept_name: concept.name.clone(),
            image_url: image.image_url.clone(),
            variations: LogoVariations {
                primary: image.image_url.clone(),
                horizontal: image.image_url.clone(),
                icon: image.image_url.clone(),
            },
            generation_metadata: GenerationMetadata {
                prompt_used: concept.generation_prompt.clone(),
                model: image.model,
            },
        })
    });

    let joined = try_join_all(jobs).await;

    match joined {
        Ok(logos) => {
            if let Some(log_path) = ctx.image_log {
                for logo in &logos {
                    append_image_log(log_path, &logo.concept_name, &logo.image_url);
                }
            }

            let links = logos
                .iter()
                .map(|logo| logo.image_url.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            state.conversation_history.push(ChatMessage::assistant(format!(
                "\u{1F5BC}\u{FE0F} Here are your logo concepts:\n{links}"
            )));

            state.generated_logos = logos;
            state.generation_attempts += 1;
            state.current_step = Step::Rank;
        }
        Err(err) => state.fail(format!("Image generation failed: {err}")),
    }
    Ok(())
}

/// Best-effort diagnostic line per generated image; write failures are
/// logged and otherwise ignored.
fn append_image_log(path: &Path, concept_name: &str, url: &str) {
    let result = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| writeln!(file, "[{}] {} \u{2192} {}", Utc::now(), concept_name, url));
    if let Err(err) = result {
        tracing::warn!(path = %path.display(), error = %err, "could not append image log");
    }
}

/// Rank: evaluate the generated set via the injected assessor. Only
/// escalates to regeneration while attempts remain.
pub fn rank(state: &mut WorkflowState, ctx: &StepContext<'_>) {
    let results = ctx
        .assessor
        .assess(&state.generated_logos, state.client_requirements.as_ref());

    let needs_regeneration =
        results.overall_quality == Verdict::Fail && state.generation_attempts < state.max_attempts;

    tracing::info!(
        verdict = ?results.overall_quality,
        best = results.best_concept_id,
        attempts = state.generation_attempts,
        needs_regeneration,
        "ranking pass complete"
    );

    state.needs_regeneration = needs_regeneration;
    state.ranking_results = Some(results);
    state.current_step = if needs_regeneration {
        Step::Generate
    } else {
        Step::CollectFeedback
    };
}

/// Decision shape returned by the iteration model.
#[derive(Debug, serde::Deserialize)]
struct FeedbackDecision {
    action: String,
    #[serde(default)]
    reason: String,
}

/// Collect feedback: classify the user's feedback into one of the four
/// iteration actions and map it to the next step.
pub async fn collect_feedback(
    state: &mut WorkflowState,
    ctx: &StepContext<'_>,
) -> Result<(), ServerError> {
    let context = serde_json::json!({
        "user_feedback": state.user_feedback.as_deref().unwrap_or(""),
        "current_designs": state.design_concepts,
        "ranking_results": state.ranking_results,
        "iteration_count": state.iteration_count,
    });
    let context_text =
        serde_json::to_string_pretty(&context).map_err(|e| ServerError::Internal(e.to_string()))?;

    let messages = vec![
        ChatMessage::system(prompts::ITERATION),
        ChatMessage::user(format!("Feedback Context:\n{context_text}")),
    ];

    let reply = ctx.text.generate_text(&messages).await?;

    match serde_json::from_str::<FeedbackDecision>(extract_json(&reply)) {
        Ok(decision) => {
            let next = match decision.action.as_str() {
                "redesign" => Step::Design,
                "regenerate" => Step::Generate,
                "approve" | "package" => {
                    state.user_approved = true;
                    Step::Package
                }
                other => {
                    tracing::warn!(action = %other, "unrecognized feedback action, staying put");
                    Step::CollectFeedback
                }
            };
            tracing::info!(action = %decision.action, reason = %decision.reason, next = %next, "feedback classified");
            state.iteration_count += 1;
            state.user_feedback = None;
            state.current_step = next;
        }
        Err(err) => {
            tracing::warn!(error = %err, "feedback decision did not parse");
            state.fail("Failed to parse feedback analysis");
        }
    }
    Ok(())
}

/// Package: select the ranked-best logos and assemble the deliverable
/// manifest. No files are rendered; only a reference path is produced.
pub fn package(state: &mut WorkflowState) {
    let package_id = format!("logo_package_{}", Utc::now().format("%Y%m%d_%H%M%S"));
    let manifest = build_manifest(state, &package_id);

    tracing::debug!(%package_id, manifest = %manifest, "assembled deliverable manifest");

    state.final_package = Some(format!("packages/{package_id}.pdf"));
    state.current_step = Step::Complete;
}

/// Deliverable manifest for the package step. The final logo set contains
/// exactly the logos whose concept id matches the ranking's best concept;
/// it is empty when no ranking result exists.
pub fn build_manifest(state: &WorkflowState, package_id: &str) -> serde_json::Value {
    let final_logos: Vec<&GeneratedLogo> = match &state.ranking_results {
        Some(ranking) => state
            .generated_logos
            .iter()
            .filter(|logo| logo.concept_id == ranking.best_concept_id)
            .collect(),
        None => Vec::new(),
    };

    // Palette comes from the first concept, simplified.
    let color_palette = state
        .design_concepts
        .first()
        .map(|concept| serde_json::to_value(&concept.color_palette).unwrap_or_default())
        .unwrap_or_else(|| serde_json::json!({}));

    serde_json::json!({
        "package_id": package_id,
        "client_info": state.client_requirements,
        "final_logos": final_logos,
        "color_palette": color_palette,
        "brand_guidelines": {
            "logo_usage": "Guidelines for proper logo usage",
            "color_usage": "When and how to use brand colors",
            "typography": "Recommended fonts and text treatments",
            "spacing": "Minimum clear space requirements",
            "backgrounds": "Approved background treatments",
        },
        "file_deliverables": {
            "svg_files": ["logo.svg", "logo_horizontal.svg", "logo_icon.svg"],
            "png_files": ["logo_300dpi.png", "logo_web.png"],
            "pdf_files": ["logo_vector.pdf", "brand_guidelines.pdf"],
            "additional": ["favicon.ico", "social_media_kit.zip"],
        },
        "usage_guidelines": [
            "Always maintain minimum clear space around logo",
            "Do not alter logo colors without approval",
            "Use vector formats when possible for scalability",
            "Ensure adequate contrast on all backgrounds",
            "Do not stretch, skew, or modify logo proportions",
        ],
        "technical_specs": {
            "color_codes": {"primary": "#000000", "secondary": "#ffffff"},
            "fonts": ["Arial", "Helvetica"],
            "minimum_sizes": {"print": "1 inch", "digital": "32px"},
        },
    })
}
