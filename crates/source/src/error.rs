//! Source fetch error types.
//!
//! Any of these is fatal for the invocation: nothing was obtained from the
//! portal, so there is no partial processing to do.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("source API returned status {code}")]
    Status { code: u16 },

    #[error("response decode error: {0}")]
    Decode(String),
}
