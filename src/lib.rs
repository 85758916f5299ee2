pub mod audit;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod redaction;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries embedding this crate. Honors RUST_LOG,
/// falls back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Referra core v{}", config::APP_VERSION);
}
