use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An open manufacturing job, used only to detect the "Job Created" tag.
/// Issued-to-job quantities are never added to any
/// inventory pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenJob {
    pub job_number: String,
    pub so_number: Option<String>,
    pub part_number: String,
    pub required_qty: Decimal,
    pub completed_qty: Decimal,
}
