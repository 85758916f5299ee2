use std::sync::Arc;

use super::fallback::HeuristicTriage;
use super::TriageError;
use crate::audit::AuditSink;
use crate::config::{MAX_CONTEXT_SNIPPETS, SNIPPET_EXCERPT_CHARS};
use crate::models::{ContextSnippet, Recommendation};

/// A knowledge-base snippet reduced to what a generation request may
/// contain: a short label and a bounded excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExcerpt {
    pub label: String,
    pub text: String,
}

/// The generative capability: one method, two interchangeable variants
/// (a real backend or a test double). Implementations must be safe for
/// concurrent read-only invocation and must bound their own wait.
pub trait RecommendationGenerate {
    fn generate(
        &self,
        text: &str,
        context: &[LabeledExcerpt],
    ) -> Result<Recommendation, TriageError>;
}

/// Composes an optional generative strategy with the deterministic
/// heuristic engine. Never fails the caller: every path ends in exactly
/// one fully populated recommendation.
pub struct RecommendationSynthesizer {
    generator: Option<Box<dyn RecommendationGenerate + Send + Sync>>,
    fallback: HeuristicTriage,
    audit: Arc<dyn AuditSink>,
}

impl RecommendationSynthesizer {
    /// Heuristic-only synthesizer, for deployments without a generative
    /// backend.
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self {
            generator: None,
            fallback: HeuristicTriage::new(),
            audit,
        }
    }

    /// Synthesizer with an injected generative strategy. The strategy is
    /// attempted first on every non-blank input; the heuristic engine
    /// remains the guaranteed terminal state.
    pub fn with_generator(
        audit: Arc<dyn AuditSink>,
        generator: Box<dyn RecommendationGenerate + Send + Sync>,
    ) -> Self {
        Self {
            generator: Some(generator),
            fallback: HeuristicTriage::new(),
            audit,
        }
    }

    /// Produce a recommendation for a redacted letter. `patient_id_hash`
    /// is used only as the correlation key when a generation failure is
    /// recorded; it never influences the result.
    pub fn synthesize(
        &self,
        text: &str,
        snippets: &[ContextSnippet],
        patient_id_hash: &str,
    ) -> Recommendation {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.fallback.recommend("");
        }

        if let Some(generator) = &self.generator {
            let excerpts = format_excerpts(snippets);
            // One attempt only; retries belong to the backend's owner.
            match generator.generate(trimmed, &excerpts) {
                Ok(recommendation) => {
                    tracing::debug!(urgency = %recommendation.urgency, "generative triage succeeded");
                    return recommendation;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "generative triage failed, using heuristic fallback");
                    self.audit
                        .log_error("RecommendationSynthesizer", patient_id_hash, &e.to_string());
                }
            }
        }

        self.fallback.recommend(trimmed)
    }
}

/// Format the highest-ranked snippets as short labeled excerpts: at most
/// [`MAX_CONTEXT_SNIPPETS`], each truncated to [`SNIPPET_EXCERPT_CHARS`]
/// characters.
pub fn format_excerpts(snippets: &[ContextSnippet]) -> Vec<LabeledExcerpt> {
    snippets
        .iter()
        .take(MAX_CONTEXT_SNIPPETS)
        .map(|snippet| LabeledExcerpt {
            label: snippet.label().to_string(),
            text: snippet.text.chars().take(SNIPPET_EXCERPT_CHARS).collect(),
        })
        .collect()
}
