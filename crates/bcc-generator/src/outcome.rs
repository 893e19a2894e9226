use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    Created,
    Failed,
}

impl OutcomeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeStatus::Created => "Created",
            OutcomeStatus::Failed => "Failed",
        }
    }
}

/// Result of one unit in a batch, in the shape streamed to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponOutcome {
    pub code: String,
    pub name: String,
    /// Remote id, present only for created coupons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub status: OutcomeStatus,
    /// RFC 3339 with millisecond precision.
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CouponOutcome {
    #[must_use]
    pub fn created(code: String, name: String, id: i64) -> Self {
        Self {
            code,
            name,
            id: Some(id),
            status: OutcomeStatus::Created,
            created_at: now_stamp(),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(code: String, name: String, error: impl Into<String>) -> Self {
        Self {
            code,
            name,
            id: None,
            status: OutcomeStatus::Failed,
            created_at: now_stamp(),
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn is_created(&self) -> bool {
        self.status == OutcomeStatus::Created
    }
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Everything a finished run produced, in unit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub outcomes: Vec<CouponOutcome>,
    pub created: u32,
    pub failed: u32,
}

impl GenerationReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Codes of the coupons that were created.
    pub fn created_codes(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_created())
            .map(|o| o.code.as_str())
    }
}
