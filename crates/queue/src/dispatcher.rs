//! Partition validated records into batches and deliver them in order.
//!
//! Delivery is strictly sequential: the queue's ordering guarantee is
//! scoped to the order in which sends are issued with the shared group
//! key, so reordering here would be a correctness bug. A failed batch
//! does not block the remaining batches.

use serde::Serialize;
use tracing::{info, warn};

use tender_core::tender::TenderRecord;

use crate::publisher::{QueuePublisher, TenderBatch};

/// Partition records into contiguous batches of `batch_size`, preserving
/// input order within and across batches. Only the final batch may be
/// smaller. Every batch carries the same `group_id`.
pub fn into_batches(
    records: Vec<TenderRecord>,
    batch_size: usize,
    group_id: &str,
) -> Vec<TenderBatch> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(records.len().div_ceil(batch_size));
    let mut chunk = Vec::with_capacity(batch_size);

    for record in records {
        chunk.push(record);
        if chunk.len() == batch_size {
            batches.push(TenderBatch {
                index: batches.len(),
                group_id: group_id.to_string(),
                records: std::mem::replace(&mut chunk, Vec::with_capacity(batch_size)),
            });
        }
    }

    if !chunk.is_empty() {
        batches.push(TenderBatch {
            index: batches.len(),
            group_id: group_id.to_string(),
            records: chunk,
        });
    }

    batches
}

/// A batch that could not be delivered, with enough detail to identify
/// which records were lost.
#[derive(Debug, Clone, Serialize)]
pub struct FailedBatch {
    pub index: usize,
    pub tender_numbers: Vec<String>,
    pub error: String,
}

/// Outcome of delivering a run's batches.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: Vec<FailedBatch>,
}

impl DispatchReport {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delivers batches through a publisher backend.
pub struct Dispatcher {
    publisher: Box<dyn QueuePublisher>,
}

impl Dispatcher {
    pub fn new(publisher: Box<dyn QueuePublisher>) -> Self {
        Self { publisher }
    }

    /// Deliver every batch in order.
    ///
    /// Individual batch failures are recorded and do not block subsequent
    /// batches; the report surfaces the count and identity of lost records
    /// so operators can detect silent data loss.
    pub async fn dispatch_all(&self, batches: &[TenderBatch]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for batch in batches {
            match self.publisher.send_batch(batch).await {
                Ok(()) => {
                    info!(
                        batch = batch.index,
                        records = batch.records.len(),
                        provider = self.publisher.provider_name(),
                        "Batch delivered"
                    );
                    report.delivered += 1;
                }
                Err(e) => {
                    let tender_numbers = batch.tender_numbers();
                    warn!(
                        batch = batch.index,
                        tenders = ?tender_numbers,
                        error = %e,
                        "Batch delivery failed"
                    );
                    report.failed.push(FailedBatch {
                        index: batch.index,
                        tender_numbers,
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
