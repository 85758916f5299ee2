//! Append-only audit logging for traceability. Records carry hashed
//! patient identifiers only — raw PII must never reach a sink.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Recommendation;

pub const ACTION_RECOMMENDATION: &str = "CLINICAL_RECOMMENDATION";
pub const ACTION_ERROR: &str = "ERROR";

/// One self-contained audit record. Optional fields are present only for
/// the record kinds that use them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub record_id: Uuid,
    pub timestamp: String,
    pub action: String,
    pub patient_id_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
}

impl AuditRecord {
    fn base(action: &str, patient_id_hash: &str) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            timestamp: Local::now().to_rfc3339(),
            action: action.to_string(),
            patient_id_hash: patient_id_hash.to_string(),
            user_id: None,
            details: None,
            component: None,
            error: None,
            recommendation: None,
        }
    }
}

/// Narrow append-only audit interface. Implementations must be safe for
/// concurrent writers and must never block the triage pipeline: a failed
/// append is swallowed, not surfaced.
pub trait AuditSink: Send + Sync {
    /// Append one self-contained record.
    fn append(&self, record: AuditRecord);

    fn log_access(&self, action: &str, patient_id_hash: &str, user_id: &str, details: &str) {
        let mut record = AuditRecord::base(action, patient_id_hash);
        record.user_id = Some(user_id.to_string());
        record.details = Some(details.to_string());
        self.append(record);
    }

    fn log_recommendation(&self, patient_id_hash: &str, recommendation: &Recommendation) {
        let mut record = AuditRecord::base(ACTION_RECOMMENDATION, patient_id_hash);
        record.recommendation = Some(recommendation.clone());
        self.append(record);
    }

    fn log_error(&self, component: &str, patient_id_hash: &str, error_message: &str) {
        let mut record = AuditRecord::base(ACTION_ERROR, patient_id_hash);
        record.component = Some(component.to_string());
        record.error = Some(error_message.to_string());
        self.append(record);
    }
}

/// Daily append-only JSONL files: one serialized record per line, written
/// in a single call so concurrent writers interleave only between records.
pub struct JsonlAuditSink {
    log_dir: PathBuf,
}

impl JsonlAuditSink {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    fn current_file(&self) -> PathBuf {
        let day = Local::now().format("%Y%m%d");
        self.log_dir.join(format!("audit_{day}.log"))
    }

    fn try_append(&self, record: &AuditRecord) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.log_dir)?;
        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.current_file())?;
        file.write_all(format!("{line}\n").as_bytes())
    }
}

impl AuditSink for JsonlAuditSink {
    fn append(&self, record: AuditRecord) {
        if let Err(e) = self.try_append(&record) {
            tracing::warn!(error = %e, action = %record.action, "audit append failed");
        }
    }
}

/// In-memory sink for tests and embedders that manage persistence
/// themselves.
#[derive(Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, record: AuditRecord) {
        self.records
            .lock()
            .expect("audit mutex poisoned")
            .push(record);
    }
}
