//! Processing stage: queue messages in, receipts and processed orders out

mod message;
mod poller;
mod processor;

pub use message::{MSG_MISSING_ID, QueueEvent, QueueMessage};
pub use poller::QueuePoller;
pub use processor::{BatchAck, BatchProcessor, BatchReport, MessageOutcome, ProcessedMessage};
