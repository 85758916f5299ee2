use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Referra";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "referra=info".to_string()
}

/// Chunking defaults for indexing-bound text.
pub const DEFAULT_CHUNK_SIZE: usize = 2200;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// At most this many knowledge-base snippets accompany a generation
/// request, each truncated to the excerpt bound.
pub const MAX_CONTEXT_SNIPPETS: usize = 3;
pub const SNIPPET_EXCERPT_CHARS: usize = 400;

/// Word budget for the extractive letter excerpt.
pub const SUMMARY_MAX_WORDS: usize = 140;

/// Fixed retrieval query for triage context.
pub const KB_QUERY: &str = "cardiac surgery referral criteria and ACS triage";

/// Local Ollama endpoint and the bound on a single generation attempt.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const GENERATION_TIMEOUT_SECS: u64 = 120;

/// Get the application data directory
/// ~/Referra/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Get the default audit-log directory
pub fn audit_log_dir() -> PathBuf {
    app_data_dir().join("audit_logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Referra"));
    }

    #[test]
    fn audit_dir_under_app_data() {
        let audit = audit_log_dir();
        assert!(audit.starts_with(app_data_dir()));
        assert!(audit.ends_with("audit_logs"));
    }

    #[test]
    fn chunk_defaults_respect_caller_contract() {
        assert!(DEFAULT_CHUNK_SIZE > DEFAULT_CHUNK_OVERLAP);
    }
}
