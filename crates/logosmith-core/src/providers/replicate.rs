//! Replicate image generation client (submit-and-poll).
//!
//! POST {base_url}/predictions with `Token` auth, expecting 201 on
//! submission, then GET {base_url}/predictions/{id} at a fixed interval
//! until the prediction reports `succeeded` or `failed`, or the poll cap
//! is exhausted. The interval and cap are injectable for tests.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ServerError;

use super::{GeneratedImage, ImageGenerator};

const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";
const DEFAULT_MODEL_VERSION: &str = "fofr/logo-diffusion";

/// Poll every 5 seconds, up to 60 attempts (5 minutes).
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_POLLS: u32 = 60;

#[derive(Debug, Clone)]
pub struct ReplicateClient {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
    model_version: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl ReplicateClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Build a client from `REPLICATE_API_TOKEN`, honoring
    /// `REPLICATE_BASE_URL` and `REPLICATE_MODEL_VERSION` overrides.
    pub fn from_env() -> Result<Self, ServerError> {
        let api_token = std::env::var("REPLICATE_API_TOKEN")
            .map_err(|_| ServerError::Internal("REPLICATE_API_TOKEN is not set".to_string()))?;
        let mut client = Self::new(api_token);
        if let Ok(base_url) = std::env::var("REPLICATE_BASE_URL") {
            client.base_url = base_url;
        }
        if let Ok(version) = std::env::var("REPLICATE_MODEL_VERSION") {
            client.model_version = version;
        }
        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    fn predictions_url(&self) -> String {
        format!("{}/predictions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct PredictionSubmitted {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PredictionStatus {
    status: String,
    #[serde(default)]
    output: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl ImageGenerator for ReplicateClient {
    async fn generate_image(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        style: &str,
    ) -> Result<GeneratedImage, ServerError> {
        // Fold the style hint into the prompt; logo-diffusion has no
        // separate style parameter.
        let full_prompt = if style.is_empty() {
            prompt.to_string()
        } else {
            format!("{prompt}, {style}")
        };

        let payload = serde_json::json!({
            "version": self.model_version,
            "input": {
                "prompt": full_prompt,
                "width": width,
                "height": height,
                "num_outputs": 1,
                "guidance_scale": 7.5,
                "num_inference_steps": 50,
            }
        });

        let response = self
            .client
            .post(self.predictions_url())
            .header("Authorization", format!("Token {}", self.api_token))
            .json(&payload)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::CREATED {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServerError::Provider(format!(
                "Failed to start prediction ({status}): {body}"
            )));
        }

        let submitted: PredictionSubmitted = response.json().await.map_err(|e| {
            ServerError::Provider(format!("Malformed prediction submission response: {e}"))
        })?;

        tracing::debug!(prediction_id = %submitted.id, "prediction submitted, polling");

        let poll_url = format!("{}/{}", self.predictions_url(), submitted.id);
        for _ in 0..self.max_polls {
            let poll: PredictionStatus = self
                .client
                .get(&poll_url)
                .header("Authorization", format!("Token {}", self.api_token))
                .send()
                .await?
                .json()
                .await
                .map_err(|e| {
                    ServerError::Provider(format!("Malformed prediction poll response: {e}"))
                })?;

            match poll.status.as_str() {
                "succeeded" => {
                    let image_url = poll
                        .output
                        .unwrap_or_default()
                        .into_iter()
                        .next()
                        .ok_or_else(|| {
                            ServerError::Provider(
                                "Prediction succeeded but returned no output".to_string(),
                            )
                        })?;
                    return Ok(GeneratedImage {
                        image_url,
                        model: format!("replicate:{}", self.model_version),
                        prompt: full_prompt,
                    });
                }
                "failed" => {
                    return Err(ServerError::Provider(format!(
                        "Generation failed: {}",
                        poll.error.unwrap_or_else(|| "Unknown error".to_string())
                    )));
                }
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }

        Err(ServerError::Provider(
            "Image generation timed out after polling".to_string(),
        ))
    }
}
