//! Recording result sink
//!
//! The stand-in for the CRM/spreadsheet webhook: completed assessment
//! payloads are logged and retained in memory, and the admin API reads
//! them back as the contacts it displays.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use funnel_core::{Result, ResultPayload, ResultSink};

/// One retained completed assessment
#[derive(Debug, Clone, Serialize)]
pub struct CapturedContact {
    pub id: Uuid,
    #[serde(flatten)]
    pub payload: ResultPayload,
    #[serde(rename = "recordedAt")]
    pub recorded_at: DateTime<Utc>,
}

/// Sink that records payloads instead of posting them anywhere
#[derive(Default)]
pub struct RecordingResultSink {
    records: RwLock<Vec<CapturedContact>>,
}

impl RecordingResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured contacts, newest first
    pub fn list(&self) -> Vec<CapturedContact> {
        let mut records = self.records.read().clone();
        records.reverse();
        records
    }

    /// One captured contact by id
    pub fn get(&self, id: Uuid) -> Option<CapturedContact> {
        self.records.read().iter().find(|c| c.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ResultSink for RecordingResultSink {
    async fn submit(&self, payload: &ResultPayload) -> Result<()> {
        let contact = CapturedContact {
            id: Uuid::new_v4(),
            payload: payload.clone(),
            recorded_at: Utc::now(),
        };

        tracing::info!(
            contact_id = %contact.id,
            name = %payload.lead.name,
            score = payload.score,
            category = payload.category.as_str(),
            "captured assessment payload (webhook stand-in)"
        );

        self.records.write().push(contact);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_core::{Answer, Lead, RiskCategory};

    fn payload(name: &str, score: u32) -> ResultPayload {
        ResultPayload::new(
            Lead::new(name, "0812"),
            score,
            vec![Answer {
                question_id: 1,
                points: score,
                text: "option".into(),
            }],
            RiskCategory::HighRisk,
        )
    }

    #[tokio::test]
    async fn test_records_and_lists_newest_first() {
        let sink = RecordingResultSink::new();
        assert!(sink.is_empty());

        sink.submit(&payload("first", 10)).await.unwrap();
        sink.submit(&payload("second", 20)).await.unwrap();

        let contacts = sink.list();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].payload.lead.name, "second");
        assert_eq!(contacts[1].payload.lead.name, "first");
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let sink = RecordingResultSink::new();
        sink.submit(&payload("only", 42)).await.unwrap();

        let id = sink.list()[0].id;
        let fetched = sink.get(id).unwrap();
        assert_eq!(fetched.payload.lead.name, "only");
        assert!(sink.get(Uuid::new_v4()).is_none());
    }
}
