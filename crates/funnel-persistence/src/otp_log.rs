//! Simulated OTP dispatch log
//!
//! Messages are never actually sent; each simulated dispatch is recorded
//! here so the flow leaves an audit trail (queued, then simulated-sent).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use funnel_core::{DispatchAudit, Result};

use crate::PersistenceError;

/// Delivery status of a simulated send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    Queued,
    SimulatedSent,
}

/// One recorded dispatch
#[derive(Debug, Clone, Serialize)]
pub struct OtpDispatchRecord {
    pub message_id: Uuid,
    pub phone: String,
    pub status: DispatchStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// In-memory dispatch audit trail
#[derive(Default)]
pub struct OtpDispatchLog {
    records: RwLock<Vec<OtpDispatchRecord>>,
}

impl OtpDispatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for one phone number, oldest first
    pub fn for_phone(&self, phone: &str) -> Vec<OtpDispatchRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.phone == phone)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl DispatchAudit for OtpDispatchLog {
    async fn record_queued(&self, phone: &str) -> Result<Uuid> {
        let record = OtpDispatchRecord {
            message_id: Uuid::new_v4(),
            phone: phone.to_string(),
            status: DispatchStatus::Queued,
            created_at: Utc::now(),
            sent_at: None,
        };
        let id = record.message_id;
        self.records.write().push(record);
        Ok(id)
    }

    async fn record_sent(&self, message_id: Uuid, sent_at: DateTime<Utc>) -> Result<()> {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.message_id == message_id)
            .ok_or_else(|| PersistenceError::NotFound(message_id.to_string()))?;
        record.status = DispatchStatus::SimulatedSent;
        record.sent_at = Some(sent_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_then_sent() {
        let log = OtpDispatchLog::new();
        let id = log.record_queued("0812").await.unwrap();

        let records = log.for_phone("0812");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, DispatchStatus::Queued);
        assert!(records[0].sent_at.is_none());

        log.record_sent(id, Utc::now()).await.unwrap();
        let records = log.for_phone("0812");
        assert_eq!(records[0].status, DispatchStatus::SimulatedSent);
        assert!(records[0].sent_at.is_some());
    }

    #[tokio::test]
    async fn test_record_sent_unknown_id_fails() {
        let log = OtpDispatchLog::new();
        assert!(log.record_sent(Uuid::new_v4(), Utc::now()).await.is_err());
    }
}
