//! Batched, gap-filling retrieval of ranked records.
//!
//! 1. Partition `[1, target]` into windows of `batch_size`.
//! 2. Drive each window through the retry state machine, strictly one after
//!    another, pausing `inter_window_delay` after every window.
//! 3. Ranks whose window never succeeded are regrouped into contiguous gap
//!    batches and retried the same way, until the accumulator reaches the
//!    target or the gaps run out.
//!
//! Window failures never escape this module; a run against a dead upstream
//! returns an empty [`Retrieval`].

pub mod attempt;

pub use attempt::{run_window, AttemptFailure, RetryPolicy, WindowOutcome, WindowState};

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::DomainConfig;
use crate::fetcher::BatchFetcher;
use crate::record::CollegeRecord;
use crate::window::{group_missing, missing_ranks, partition, RankWindow, BATCH_SIZE};

pub const INTER_WINDOW_DELAY: Duration = Duration::from_millis(1000);

/// When a successful window counts its ranks as retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confirmation {
    /// Any non-empty yield confirms the whole window.
    #[default]
    Optimistic,
    /// Only a yield at least as large as the window confirms it. Short
    /// batches are kept but their ranks go to the gap pass.
    Strict,
}

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub batch_size: u32,
    pub retry: RetryPolicy,
    pub inter_window_delay: Duration,
    pub confirmation: Confirmation,
    /// Drop records whose normalized name was already accumulated this run
    pub dedupe: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            retry: RetryPolicy::default(),
            inter_window_delay: INTER_WINDOW_DELAY,
            confirmation: Confirmation::default(),
            dedupe: false,
        }
    }
}

/// Accumulator owned by one run.
#[derive(Debug, Default)]
struct RetrievalState {
    records: Vec<CollegeRecord>,
    confirmed: BTreeSet<u32>,
    seen: HashSet<String>,
}

impl RetrievalState {
    /// Fold a window outcome in. Returns the number of records appended.
    fn absorb(&mut self, outcome: WindowOutcome, config: &RetrievalConfig) -> usize {
        let window = outcome.window;
        let records = match outcome.result {
            Ok(records) => records,
            Err(failure) => {
                warn!(
                    window = %window,
                    attempts = outcome.attempts,
                    reason = %failure,
                    "Window abandoned after retries"
                );
                return 0;
            }
        };

        let yielded = records.len() as u32;
        let confirms = match config.confirmation {
            Confirmation::Optimistic => true,
            Confirmation::Strict => yielded >= window.width(),
        };

        if yielded < window.width() {
            warn!(
                window = %window,
                yielded,
                width = window.width(),
                confirmed = confirms,
                "Window returned fewer records than requested"
            );
        }
        if confirms {
            self.confirmed.extend(window.ranks());
        }

        let before = self.records.len();
        for record in records {
            if config.dedupe && !self.seen.insert(record.identity_key()) {
                continue;
            }
            self.records.push(record);
        }
        self.records.len() - before
    }
}

/// Result of one retrieval run.
#[derive(Debug, Default)]
pub struct Retrieval {
    pub target: u32,
    pub records: Vec<CollegeRecord>,
    pub confirmed: BTreeSet<u32>,
    /// Unconfirmed ranks after the initial pass
    pub missing_after_initial: Vec<u32>,
    /// Unconfirmed ranks after the gap-filling pass
    pub still_missing: Vec<u32>,
    pub upstream_calls: u32,
    pub gap_batches: u32,
}

impl Retrieval {
    pub fn is_short(&self) -> bool {
        (self.records.len() as u32) < self.target
    }

    pub fn into_records(self) -> Vec<CollegeRecord> {
        self.records
    }
}

pub struct Retriever<F> {
    fetcher: F,
    config: RetrievalConfig,
}

impl<F: BatchFetcher> Retriever<F> {
    pub fn new(fetcher: F, config: RetrievalConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    async fn fetch_window(&self, domain: &DomainConfig, window: RankWindow) -> WindowOutcome {
        let outcome = run_window(&self.fetcher, domain, window, &self.config.retry).await;
        tokio::time::sleep(self.config.inter_window_delay).await;
        outcome
    }

    /// Fetch up to `domain.target_count` ranked records.
    pub async fn retrieve(&self, domain: &DomainConfig) -> Retrieval {
        let target = domain.target_count;
        let batch_size = self.config.batch_size.max(1);
        let mut state = RetrievalState::default();
        let mut upstream_calls = 0;
        let mut gap_batches = 0;

        let windows = partition(target, batch_size);
        info!(
            domain = domain.key,
            target,
            windows = windows.len(),
            "Starting retrieval"
        );

        for window in windows {
            let outcome = self.fetch_window(domain, window).await;
            upstream_calls += outcome.attempts;
            let added = state.absorb(outcome, &self.config);
            info!(
                domain = domain.key,
                window = %window,
                added,
                total = state.records.len(),
                "Window complete"
            );
        }

        let missing_after_initial = missing_ranks(target, &state.confirmed);

        if !missing_after_initial.is_empty() && (state.records.len() as u32) < target {
            let gaps = group_missing(&missing_after_initial, batch_size);
            info!(
                domain = domain.key,
                missing = missing_after_initial.len(),
                gap_batches = gaps.len(),
                "Starting gap-filling pass"
            );

            for gap in gaps {
                if state.records.len() as u32 >= target {
                    info!(domain = domain.key, "Target reached, stopping gap fill");
                    break;
                }
                let outcome = self.fetch_window(domain, gap).await;
                upstream_calls += outcome.attempts;
                gap_batches += 1;
                let added = state.absorb(outcome, &self.config);
                info!(
                    domain = domain.key,
                    gap = %gap,
                    added,
                    total = state.records.len(),
                    "Gap batch complete"
                );
            }
        }

        let still_missing = missing_ranks(target, &state.confirmed);
        let obtained = state.records.len();

        if (obtained as u32) < target {
            warn!(
                domain = domain.key,
                obtained,
                target,
                unconfirmed = still_missing.len(),
                "Retrieval finished short of target"
            );
        } else {
            info!(domain = domain.key, obtained, target, "Retrieval complete");
        }

        Retrieval {
            target,
            records: state.records,
            confirmed: state.confirmed,
            missing_after_initial,
            still_missing,
            upstream_calls,
            gap_batches,
        }
    }
}
