//! Result payload hand-off seam

use async_trait::async_trait;

use crate::error::Result;
use crate::lead::ResultPayload;

/// Receives the payload built when a funnel reaches its result
///
/// Stands in for the CRM/spreadsheet webhook integration. The demo
/// implementation records and logs; a real one would post over the wire.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Hand off a completed assessment
    async fn submit(&self, payload: &ResultPayload) -> Result<()>;
}
