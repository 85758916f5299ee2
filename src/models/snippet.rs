use serde::{Deserialize, Serialize};

/// A passage retrieved from the external knowledge base, supplied to the
/// synthesizer as optional generation context. Never authoritative on its
/// own; only `text` and the label fields are consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub text: String,
    #[serde(default)]
    pub meta: SnippetMeta,
    /// Cosine distance from the retrieval query, when the store reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnippetMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ContextSnippet {
    /// Display label for excerpt formatting: title, else source, else "kb".
    pub fn label(&self) -> &str {
        self.meta
            .title
            .as_deref()
            .or(self.meta.source.as_deref())
            .unwrap_or("kb")
    }
}
