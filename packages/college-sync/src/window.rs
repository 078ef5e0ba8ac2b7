//! Rank windows: contiguous inclusive rank ranges requested in one call.

use std::collections::BTreeSet;
use std::fmt;

/// Ranks per upstream request.
pub const BATCH_SIZE: u32 = 10;

/// Inclusive rank range `[start, end]`, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RankWindow {
    start: u32,
    end: u32,
}

impl RankWindow {
    /// `None` unless `1 <= start <= end`.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start >= 1 && start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of ranks covered.
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn ranks(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl fmt::Display for RankWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Split `[1, target]` into consecutive windows of `batch_size`; the last one
/// may be narrower. Empty when `target` or `batch_size` is zero.
pub fn partition(target: u32, batch_size: u32) -> Vec<RankWindow> {
    if batch_size == 0 {
        return Vec::new();
    }
    (1..=target)
        .step_by(batch_size as usize)
        .filter_map(|start| RankWindow::new(start, (start + batch_size - 1).min(target)))
        .collect()
}

/// Ranks in `[1, target]` that are not in `confirmed`, ascending.
pub fn missing_ranks(target: u32, confirmed: &BTreeSet<u32>) -> Vec<u32> {
    (1..=target).filter(|r| !confirmed.contains(r)).collect()
}

/// Group ascending ranks into contiguous runs, each split so that no window
/// is wider than `max_width`.
pub fn group_missing(ranks: &[u32], max_width: u32) -> Vec<RankWindow> {
    let max_width = max_width.max(1);
    let mut windows = Vec::new();
    let mut iter = ranks.iter().copied();

    let Some(first) = iter.next() else {
        return windows;
    };
    let (mut start, mut end) = (first, first);

    for rank in iter {
        if rank == end + 1 && rank - start < max_width {
            end = rank;
            continue;
        }
        windows.extend(RankWindow::new(start, end));
        start = rank;
        end = rank;
    }
    windows.extend(RankWindow::new(start, end));
    windows
}
