use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two user-entered risk buckets the scheduling grid writes.
/// Only the engine reads these; only the scheduling collaborator
/// writes them (via `POST /scheduling/api/update-projection`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum RiskType {
    NoLowRisk,
    HighRisk,
}

/// A user-entered quantity keyed by `(so_number, part_number, risk_type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProjection {
    pub so_number: String,
    pub part_number: String,
    pub risk_type: RiskType,
    pub quantity: Decimal,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}
