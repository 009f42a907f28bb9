pub mod dispatcher;
pub mod error;
pub mod publisher;
pub mod sqs;

pub use dispatcher::{into_batches, DispatchReport, Dispatcher, FailedBatch};
pub use error::QueueError;
pub use publisher::{QueuePublisher, TenderBatch};
pub use sqs::SqsPublisher;
