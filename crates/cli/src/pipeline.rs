//! Single-pass ingestion pipeline: normalize, batch, dispatch, summarize.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use tender_core::config::QueueConfig;
use tender_queue::{into_batches, Dispatcher, FailedBatch};
use tender_source::normalize::{normalize_batch, Rejection};

/// Per-stage outcome of one invocation, reported to the operator.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub fetched: usize,
    pub validated: usize,
    pub rejected: usize,
    pub rejected_missing_identifier: usize,
    pub rejected_date_parse: usize,
    pub batches_total: usize,
    pub batches_delivered: usize,
    pub batches_failed: usize,
    /// Identity of every undelivered batch, so lost records are traceable.
    pub failed_batches: Vec<FailedBatch>,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            fetched = self.fetched,
            validated = self.validated,
            rejected = self.rejected,
            "Normalization finished"
        );
        if self.rejected > 0 {
            warn!(
                missing_identifier = self.rejected_missing_identifier,
                date_parse = self.rejected_date_parse,
                "Some tenders were skipped"
            );
        }
        info!(
            total = self.batches_total,
            delivered = self.batches_delivered,
            failed = self.batches_failed,
            "Batch delivery finished"
        );
        if self.batches_failed > 0 {
            warn!(
                failed = self.batches_failed,
                "Some batches were not delivered; their records are lost for this run"
            );
        }
    }
}

/// Run the normalize → batch → dispatch pipeline over a fetched listing.
///
/// With no dispatcher (dry run) the batches are built but not delivered.
/// Record rejections and batch failures never abort the run; they are
/// counted and surfaced in the summary.
pub async fn process(
    raws: Vec<Value>,
    queue: &QueueConfig,
    dispatcher: Option<&Dispatcher>,
) -> RunSummary {
    let fetched = raws.len();

    let (records, rejections) = normalize_batch(&raws);
    let validated = records.len();
    let rejected_missing_identifier = rejections
        .iter()
        .filter(|(_, r)| matches!(r, Rejection::MissingIdentifier))
        .count();
    let rejected_date_parse = rejections.len() - rejected_missing_identifier;

    let batches = into_batches(records, queue.batch_size, &queue.message_group);
    let batches_total = batches.len();

    let (batches_delivered, failed_batches) = match dispatcher {
        Some(dispatcher) => {
            let report = dispatcher.dispatch_all(&batches).await;
            (report.delivered, report.failed)
        }
        None => {
            info!(batches = batches_total, "Dry run: skipping delivery");
            (0, Vec::new())
        }
    };

    RunSummary {
        fetched,
        validated,
        rejected: rejections.len(),
        rejected_missing_identifier,
        rejected_date_parse,
        batches_total,
        batches_delivered,
        batches_failed: failed_batches.len(),
        failed_batches,
    }
}
