use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{RecordSink, SinkReport};
use crate::error::SinkError;
use crate::record::CollegeRecord;

/// Writes one JSON object per record to any writer. Used for dry runs.
pub struct JsonLinesSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    async fn write(
        &self,
        records: &[CollegeRecord],
        destination: &str,
    ) -> Result<SinkReport, SinkError> {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for record in records {
            serde_json::to_writer(&mut *out, record)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;

        Ok(SinkReport {
            destination: destination.to_string(),
            rows_written: records.len(),
            created: false,
        })
    }
}
