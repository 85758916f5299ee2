//! Generative triage strategy backed by a local Ollama instance.
//!
//! The synthesizer only sees the `RecommendationGenerate` trait; this
//! client owns the HTTP plumbing, the prompt wording, and the strict-JSON
//! response contract.

use serde::{Deserialize, Serialize};

use super::parser::parse_recommendation;
use super::synthesizer::{LabeledExcerpt, RecommendationGenerate};
use super::TriageError;
use crate::models::Recommendation;

/// Preferred triage models in order of preference.
const TRIAGE_MODELS: &[&str] = &["medgemma", "medgemma:27b", "medgemma:4b", "medgemma:latest"];

const SYSTEM_PROMPT: &str = "You are an NHS DTAC-aware assistant for cardiology/cardiothoracic \
     teams. Provide conservative, guideline-aligned triage recommendations based on the letter. \
     Prefer NICE CG95 (chest pain), NG185 (ACS), NG208 (valve disease), and the NHS England \
     Adult Cardiac Surgery Service Specification. Do not invent facts.";

const SCHEMA_HINT: &str = "Return STRICT JSON with keys: recommendation_type, urgency, \
     suggested_timeframe, red_flags, confidence_level, evidence_basis, reasoning. \
     Urgency must be one of: EMERGENCY, URGENT, ROUTINE.";

/// Ollama HTTP client for local triage inference.
pub struct OllamaTriageClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaTriageClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default local instance with the crate's configured endpoint,
    /// preferred model, and timeout.
    pub fn default_local() -> Self {
        Self::new(
            crate::config::OLLAMA_BASE_URL,
            TRIAGE_MODELS[0],
            crate::config::GENERATION_TIMEOUT_SECS,
        )
    }

    /// Probe Ollama and return a client only when a preferred model is
    /// actually available. `None` means "run heuristic-only".
    pub fn if_available() -> Option<Self> {
        let client = Self::default_local();
        match client.find_best_model() {
            Ok(model) => {
                tracing::info!(model = %model, "Ollama triage model confirmed");
                Some(Self {
                    model,
                    ..client
                })
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ollama triage unavailable");
                None
            }
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Find the best available triage model.
    pub fn find_best_model(&self) -> Result<String, TriageError> {
        let available = self.list_models()?;
        for preferred in TRIAGE_MODELS {
            if available.iter().any(|m| m.starts_with(preferred)) {
                return Ok(preferred.to_string());
            }
        }
        Err(TriageError::NoModelAvailable)
    }

    pub fn list_models(&self) -> Result<Vec<String>, TriageError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TriageError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| TriageError::MalformedResponse(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    fn raw_generate(&self, prompt: &str) -> Result<String, TriageError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            system: SYSTEM_PROMPT,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TriageError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| TriageError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> TriageError {
        if e.is_connect() {
            TriageError::OllamaConnection(self.base_url.clone())
        } else if e.is_timeout() {
            TriageError::Timeout(self.timeout_secs)
        } else {
            TriageError::HttpClient(e.to_string())
        }
    }
}

impl RecommendationGenerate for OllamaTriageClient {
    fn generate(
        &self,
        text: &str,
        context: &[LabeledExcerpt],
    ) -> Result<Recommendation, TriageError> {
        let prompt = build_prompt(text, context);
        let raw = self.raw_generate(&prompt)?;
        parse_recommendation(&raw)
    }
}

/// Assemble the generation request: letter text, an optional KB context
/// block of labeled excerpts, and the strict-JSON schema hint.
fn build_prompt(text: &str, context: &[LabeledExcerpt]) -> String {
    let mut prompt = format!("Letter text:\n{text}\n");

    if !context.is_empty() {
        let block: Vec<String> = context
            .iter()
            .map(|excerpt| format!("[{}] {}", excerpt.label, excerpt.text))
            .collect();
        prompt.push_str("\nKB context:\n");
        prompt.push_str(&block.join("\n---\n"));
        prompt.push('\n');
    }

    prompt.push_str(&format!("\n{SCHEMA_HINT}\nReturn STRICT JSON only."));
    prompt
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}
