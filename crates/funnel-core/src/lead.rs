//! Captured lead identity and the result payload handed to external systems

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::Answer;
use crate::error::{Error, Result};
use crate::traits::RiskCategory;

/// A prospective customer's contact identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub phone: String,
}

impl Lead {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Both fields must be non-empty after trimming
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "name is required"));
        }
        if self.phone.trim().is_empty() {
            return Err(Error::validation("phone", "phone is required"));
        }
        Ok(())
    }
}

/// The payload constructed on funnel completion
///
/// Mirrors what would be posted to a CRM/webhook integration. In this
/// system the hand-off is a [`crate::traits::ResultSink`] implementation
/// that records and logs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub lead: Lead,
    pub score: u32,
    pub answers: Vec<Answer>,
    pub category: RiskCategory,
    #[serde(rename = "capturedAt")]
    pub captured_at: DateTime<Utc>,
}

impl ResultPayload {
    pub fn new(lead: Lead, score: u32, answers: Vec<Answer>, category: RiskCategory) -> Self {
        Self {
            lead,
            score,
            answers,
            category,
            captured_at: Utc::now(),
        }
    }
}
