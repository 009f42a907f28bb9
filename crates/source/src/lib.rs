pub mod client;
pub mod error;
pub mod normalize;

pub use client::TransnetClient;
pub use error::SourceError;
pub use normalize::{normalize, normalize_batch, Rejection};
