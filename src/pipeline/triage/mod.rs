pub mod classifier;
pub mod fallback;
pub mod ollama;
pub mod parser;
pub mod signals;
pub mod synthesizer;

pub use classifier::*;
pub use fallback::*;
pub use ollama::*;
pub use parser::*;
pub use synthesizer::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("No compatible triage model available")]
    NoModelAvailable,

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Model response missing or invalid urgency: {0}")]
    InvalidUrgency(String),

    #[error("Signal scoring fault: {0}")]
    Scoring(String),
}
