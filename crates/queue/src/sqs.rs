//! AWS SQS FIFO publisher implementation.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_sqs::config::BehaviorVersion;
use aws_sdk_sqs::types::SendMessageBatchRequestEntry;
use aws_sdk_sqs::Client;
use tracing::{debug, info};

use tender_core::config::{AwsConfig, QueueConfig};

use crate::error::QueueError;
use crate::publisher::{QueuePublisher, TenderBatch};

/// SQS-backed batch publisher.
pub struct SqsPublisher {
    client: Client,
    queue_url: String,
}

impl SqsPublisher {
    /// Create a new SQS publisher from project config.
    pub async fn new(aws: &AwsConfig, queue: &QueueConfig) -> Result<Self, QueueError> {
        let region = aws_sdk_sqs::config::Region::new(aws.region.clone());

        // Build SQS client config directly — do NOT use aws_config::defaults()
        // because it reads AWS_ENDPOINT_URL from the environment, which may
        // point to another service and would misroute all SQS requests.
        let mut sqs_config = aws_sdk_sqs::Config::builder()
            .region(region)
            .behavior_version(BehaviorVersion::latest());

        // Use static credentials if provided (local dev / explicit config).
        if let (Some(key_id), Some(secret)) = (&aws.access_key_id, &aws.secret_access_key) {
            let creds = Credentials::new(
                key_id,
                secret,
                aws.session_token.clone(),
                None,
                "tender-queue-static",
            );
            sqs_config = sqs_config.credentials_provider(creds);
        }

        if let Some(ref endpoint) = aws.endpoint_url {
            if !endpoint.is_empty() {
                let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                    endpoint.clone()
                } else {
                    format!("https://{endpoint}")
                };
                sqs_config = sqs_config.endpoint_url(&url);
            }
        }

        let client = Client::from_conf(sqs_config.build());

        info!(
            queue_url = %queue.queue_url,
            region = %aws.region,
            "SQS publisher initialized"
        );

        Ok(Self {
            client,
            queue_url: queue.queue_url.clone(),
        })
    }
}

#[async_trait]
impl QueuePublisher for SqsPublisher {
    async fn send_batch(&self, batch: &TenderBatch) -> Result<(), QueueError> {
        debug!(
            batch = batch.index,
            records = batch.records.len(),
            "Sending batch to SQS"
        );

        let mut entries = Vec::with_capacity(batch.records.len());
        for (i, record) in batch.records.iter().enumerate() {
            let body = serde_json::to_string(record)
                .map_err(|e| QueueError::Serialize(format!("record {}: {e}", record.tender_number)))?;

            // The shared AI queue has content-based deduplication enabled,
            // so no explicit deduplication id is set.
            let entry = SendMessageBatchRequestEntry::builder()
                .id(format!("tender_message_{}_{i}", batch.index))
                .message_body(body)
                .message_group_id(&batch.group_id)
                .build()
                .map_err(|e| QueueError::Provider(format!("entry build failed: {e}")))?;

            entries.push(entry);
        }

        let resp = self
            .client
            .send_message_batch()
            .queue_url(&self.queue_url)
            .set_entries(Some(entries))
            .send()
            .await
            .map_err(|e| QueueError::Delivery(format!("SQS send failed: {e:?}")))?;

        let failed = resp.failed();
        if !failed.is_empty() {
            let detail: Vec<String> = failed
                .iter()
                .map(|f| format!("{}: {}", f.id(), f.message().unwrap_or("unknown error")))
                .collect();
            return Err(QueueError::Delivery(format!(
                "{} of {} entries rejected ({})",
                failed.len(),
                batch.records.len(),
                detail.join("; ")
            )));
        }

        Ok(())
    }

    fn provider_name(&self) -> &str {
        "sqs"
    }
}
