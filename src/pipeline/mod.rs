pub mod chunker;
pub mod processor;
pub mod summary;
pub mod triage;
