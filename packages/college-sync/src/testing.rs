//! Test doubles for the fetch and sink seams.
//!
//! These make no network calls, so the retrieval loop can be exercised
//! deterministically (pair them with a paused tokio clock to skip the
//! backoff sleeps).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::DomainConfig;
use crate::error::{FetchError, FetchResult, SinkError};
use crate::fetcher::BatchFetcher;
use crate::record::CollegeRecord;
use crate::sink::{RecordSink, SinkReport};
use crate::window::RankWindow;

/// A scripted reply for one upstream call.
#[derive(Debug, Clone)]
pub enum Reply {
    /// One record per rank in the requested window
    FullWindow,
    /// `n` records numbered from the window's first rank; may run past the
    /// window's end to simulate an over-returning upstream
    Records(usize),
    Empty,
    Transport,
    Malformed,
}

/// Fetcher that plays back scripted replies and logs every call.
///
/// Replies queued with [`ScriptedFetcher::on`] for a specific window are
/// consumed first; otherwise the shared queue is used, then the fallback.
pub struct ScriptedFetcher {
    per_window: Mutex<Vec<(RankWindow, VecDeque<Reply>)>>,
    queue: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: Mutex<Vec<RankWindow>>,
}

impl ScriptedFetcher {
    /// Every call succeeds with a full window unless scripted otherwise.
    pub fn new() -> Self {
        Self::with_fallback(Reply::FullWindow)
    }

    pub fn with_fallback(fallback: Reply) -> Self {
        Self {
            per_window: Mutex::new(Vec::new()),
            queue: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue replies for calls on exactly `window`.
    pub fn on(self, window: RankWindow, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.per_window
            .lock()
            .unwrap()
            .push((window, replies.into_iter().collect()));
        self
    }

    /// Queue replies for calls on any window without a dedicated script.
    pub fn then(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.queue.lock().unwrap().extend(replies);
        self
    }

    /// Windows requested so far, in call order.
    pub fn calls(&self) -> Vec<RankWindow> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, window: RankWindow) -> usize {
        self.calls().iter().filter(|w| **w == window).count()
    }

    fn next_reply(&self, window: RankWindow) -> Reply {
        let mut per_window = self.per_window.lock().unwrap();
        if let Some((_, replies)) = per_window.iter_mut().find(|(w, _)| *w == window) {
            if let Some(reply) = replies.pop_front() {
                return reply;
            }
        }
        drop(per_window);

        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for ScriptedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` records named after consecutive ranks from `window.start()`.
pub fn ranked_records(domain: &DomainConfig, window: RankWindow, count: usize) -> Vec<CollegeRecord> {
    (window.start()..)
        .take(count)
        .map(|rank| {
            let mut record = CollegeRecord::named(format!("{} #{}", domain.display_name, rank));
            record.location = Some("Somewhere, India".to_string());
            record
        })
        .collect()
}

#[async_trait]
impl BatchFetcher for ScriptedFetcher {
    async fn fetch_batch(
        &self,
        domain: &DomainConfig,
        window: RankWindow,
    ) -> FetchResult<Vec<CollegeRecord>> {
        self.calls.lock().unwrap().push(window);

        match self.next_reply(window) {
            Reply::FullWindow => Ok(ranked_records(domain, window, window.width() as usize)),
            Reply::Records(n) => Ok(ranked_records(domain, window, n)),
            Reply::Empty => Ok(Vec::new()),
            Reply::Transport => Err(FetchError::Transport("scripted transport failure".into())),
            Reply::Malformed => Err(FetchError::MalformedResponse(
                "scripted malformed response".into(),
            )),
        }
    }
}

/// Sink that keeps every write in memory.
#[derive(Default)]
pub struct MemorySink {
    writes: Mutex<Vec<(String, Vec<CollegeRecord>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(destination, records)` for each write, in order.
    pub fn writes(&self) -> Vec<(String, Vec<CollegeRecord>)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn write(
        &self,
        records: &[CollegeRecord],
        destination: &str,
    ) -> Result<SinkReport, SinkError> {
        self.writes
            .lock()
            .unwrap()
            .push((destination.to_string(), records.to_vec()));
        Ok(SinkReport {
            destination: destination.to_string(),
            rows_written: records.len(),
            created: false,
        })
    }
}
