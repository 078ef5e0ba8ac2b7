//! Per-window retry loop as an explicit state machine.
//!
//! ```text
//! Pending -> Attempting(1) -> Attempting(2) -> ... -> Succeeded | Exhausted
//! ```
//!
//! Both the initial pass and the gap-filling pass drive windows through
//! [`run_window`], so the retry and backoff policy lives in one place.

use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::DomainConfig;
use crate::error::{FetchError, FetchResult};
use crate::fetcher::BatchFetcher;
use crate::record::CollegeRecord;
use crate::window::RankWindow;

pub const MAX_ATTEMPTS: u32 = 3;
pub const BACKOFF: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upstream calls per window, including the first
    pub max_attempts: u32,
    /// Wait between a failed attempt and the next one
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            backoff: BACKOFF,
        }
    }
}

/// Why an attempt did not count as a success.
#[derive(Debug)]
pub enum AttemptFailure {
    /// The call succeeded but nothing survived sanitization
    EmptyYield,
    Fetch(FetchError),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::EmptyYield => f.write_str("empty yield"),
            AttemptFailure::Fetch(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug)]
pub enum WindowState {
    Pending,
    Attempting {
        attempt: u32,
    },
    Succeeded {
        records: Vec<CollegeRecord>,
        attempts: u32,
    },
    Exhausted {
        attempts: u32,
        last_failure: AttemptFailure,
    },
}

impl WindowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WindowState::Succeeded { .. } | WindowState::Exhausted { .. })
    }

    /// Transition after attempt number `attempt` finished with `result`.
    pub fn after_attempt(
        attempt: u32,
        result: FetchResult<Vec<CollegeRecord>>,
        max_attempts: u32,
    ) -> WindowState {
        let failure = match result {
            Ok(records) if !records.is_empty() => {
                return WindowState::Succeeded {
                    records,
                    attempts: attempt,
                }
            }
            Ok(_) => AttemptFailure::EmptyYield,
            Err(e) => AttemptFailure::Fetch(e),
        };

        if attempt >= max_attempts {
            WindowState::Exhausted {
                attempts: attempt,
                last_failure: failure,
            }
        } else {
            WindowState::Attempting {
                attempt: attempt + 1,
            }
        }
    }
}

/// Terminal result of driving one window.
#[derive(Debug)]
pub struct WindowOutcome {
    pub window: RankWindow,
    /// Upstream calls made for this window
    pub attempts: u32,
    pub result: Result<Vec<CollegeRecord>, AttemptFailure>,
}

/// Drive one window to `Succeeded` or `Exhausted`.
///
/// Sleeps `policy.backoff` between attempts, never after the last one.
pub async fn run_window<F: BatchFetcher + ?Sized>(
    fetcher: &F,
    domain: &DomainConfig,
    window: RankWindow,
    policy: &RetryPolicy,
) -> WindowOutcome {
    let max_attempts = policy.max_attempts.max(1);
    let mut state = WindowState::Pending;

    loop {
        state = match state {
            WindowState::Pending => WindowState::Attempting { attempt: 1 },
            WindowState::Attempting { attempt } => {
                debug!(domain = domain.key, window = %window, attempt, "Fetching window");
                let result = fetcher.fetch_batch(domain, window).await;

                match &result {
                    Ok(records) if records.is_empty() => warn!(
                        domain = domain.key,
                        window = %window,
                        attempt,
                        "Window yielded no usable records"
                    ),
                    Err(e) => warn!(
                        domain = domain.key,
                        window = %window,
                        attempt,
                        error = %e,
                        "Window fetch failed"
                    ),
                    Ok(_) => {}
                }

                let next = WindowState::after_attempt(attempt, result, max_attempts);
                if matches!(next, WindowState::Attempting { .. }) {
                    tokio::time::sleep(policy.backoff).await;
                }
                next
            }
            WindowState::Succeeded { records, attempts } => {
                return WindowOutcome {
                    window,
                    attempts,
                    result: Ok(records),
                }
            }
            WindowState::Exhausted {
                attempts,
                last_failure,
            } => {
                return WindowOutcome {
                    window,
                    attempts,
                    result: Err(last_failure),
                }
            }
        };
    }
}
