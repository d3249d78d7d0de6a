//! Bulk delivery input and report types

use super::message::DispatchResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One recipient in a bulk report run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItem {
    /// Patient identifier used in the subject and attachment name
    pub patient_id: String,
    /// Recipient address
    pub email: String,
    /// Salutation name; the composer falls back to "Patient"
    pub patient_name: Option<String>,
    /// Path to the generated report PDF
    pub pdf_path: PathBuf,
}

/// Partitioned outcome of a bulk run
///
/// Every input item lands in exactly one partition, so
/// `successful.len() + failed.len()` always equals the input length. Each
/// partition keeps encounter order.
#[derive(Debug, Default, Serialize)]
pub struct BulkReport {
    pub successful: Vec<DispatchResult>,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    /// Number of items processed
    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }
}

/// A per-item failure captured without aborting the batch
#[derive(Debug, Serialize)]
pub struct BulkFailure {
    pub item: BulkItem,
    /// Rendered error description for the caller's records
    pub error: String,
}
