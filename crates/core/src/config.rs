use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub aws: AwsConfig,
    pub queue: QueueConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            source: SourceConfig::from_env(),
            aws: AwsConfig::from_env(),
            queue: QueueConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  source:  url={}, timeout={}s, attempts={}",
            self.source.api_url,
            self.source.timeout_secs,
            self.source.attempts
        );
        tracing::info!(
            "  aws:     region={}, static_creds={}",
            self.aws.region,
            self.aws.has_static_credentials()
        );
        tracing::info!(
            "  queue:   url={}, group={}, batch_size={}",
            self.queue.queue_url,
            self.queue.message_group,
            self.queue.batch_size
        );
    }
}

// ── Source API ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint listing currently advertised tenders.
    pub api_url: String,
    /// Timeout for the fetch call, in seconds.
    pub timeout_secs: u64,
    /// How many times to attempt the fetch before giving up.
    pub attempts: u32,
    /// Delay between fetch attempts, in seconds.
    pub retry_delay_secs: u64,
}

impl SourceConfig {
    fn from_env() -> Self {
        Self {
            api_url: env_or(
                "TENDER_API_URL",
                "https://transnetetenders.azurewebsites.net/Home/GetAdvertisedTenders",
            ),
            timeout_secs: env_u64("FETCH_TIMEOUT_SECS", 30),
            attempts: env_u32("FETCH_ATTEMPTS", 1).max(1),
            retry_delay_secs: env_u64("FETCH_RETRY_DELAY_SECS", 5),
        }
    }
}

// ── AWS ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env() -> Self {
        Self {
            region: env_or("AWS_REGION", "us-east-1"),
            access_key_id: env_opt("AWS_ACCESS_KEY_ID"),
            secret_access_key: env_opt("AWS_SECRET_ACCESS_KEY"),
            session_token: env_opt("AWS_SESSION_TOKEN"),
            endpoint_url: env_opt("AWS_ENDPOINT_URL"),
        }
    }

    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

// ── Queue ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Target FIFO queue shared with the other source adapters.
    pub queue_url: String,
    /// Ordering key for this source's record stream.
    pub message_group: String,
    /// Records per outbound batch (SQS caps a send at 10 entries).
    pub batch_size: usize,
}

impl QueueConfig {
    fn from_env() -> Self {
        Self {
            queue_url: env_or(
                "QUEUE_URL",
                "https://sqs.us-east-1.amazonaws.com/211635102441/AIQueue.fifo",
            ),
            message_group: env_or("QUEUE_MESSAGE_GROUP", "TransnetTenderScrape"),
            batch_size: env_usize("QUEUE_BATCH_SIZE", 10).clamp(1, 10),
        }
    }
}
