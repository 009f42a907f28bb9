//! Publisher trait and outbound batch type.

use async_trait::async_trait;

use tender_core::tender::TenderRecord;

use crate::error::QueueError;

/// One outbound unit: an ordered group of records sharing an ordering key.
///
/// All batches produced from the same run carry the same `group_id`, so
/// the queue's ordering guarantee spans the whole record stream rather
/// than a single batch.
#[derive(Debug, Clone)]
pub struct TenderBatch {
    /// Position of this batch within the run (0-based).
    pub index: usize,
    /// Ordering key for the queue (FIFO message group).
    pub group_id: String,
    pub records: Vec<TenderRecord>,
}

impl TenderBatch {
    /// Tender numbers of the records in this batch, for failure reporting.
    pub fn tender_numbers(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.tender_number.clone())
            .collect()
    }
}

/// Trait for queue publisher backends.
///
/// Implementations handle the specifics of sending one batch to a
/// particular queue provider.
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Send one batch to the queue.
    ///
    /// A batch either lands fully or counts as failed; partial entry
    /// acceptance by the provider is reported as a failure.
    async fn send_batch(&self, batch: &TenderBatch) -> Result<(), QueueError>;

    /// Human-readable provider name (e.g., "sqs").
    fn provider_name(&self) -> &str;
}
