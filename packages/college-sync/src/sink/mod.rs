//! Destinations for the final record list.
//!
//! A sink overwrites its destination on every write; there is no append or
//! merge.

pub mod jsonl;
pub mod rows;
pub mod sheets;

pub use jsonl::JsonLinesSink;
pub use rows::{build_rows, reflow_exams, HEADER};
pub use sheets::SheetsSink;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::record::CollegeRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReport {
    pub destination: String,
    /// Data rows, not counting the header
    pub rows_written: usize,
    /// Whether the destination had to be created
    pub created: bool,
}

#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn write(
        &self,
        records: &[CollegeRecord],
        destination: &str,
    ) -> Result<SinkReport, SinkError>;
}
