//! Integration tests for the batched, gap-filling retrieval loop.
//!
//! All tests run on a paused tokio clock: backoff and rate-limit sleeps
//! complete instantly while still advancing virtual time, so elapsed time
//! counts exactly the delays the orchestrator took.

use std::time::Duration;

use college_sync::testing::{MemorySink, Reply, ScriptedFetcher};
use college_sync::sync::sync_domain;
use college_sync::{
    Confirmation, Domain, DomainConfig, RankWindow, RetrievalConfig, Retriever,
};
use tokio::time::Instant;

/// Engineering config with a custom target.
fn domain(target: u32) -> DomainConfig {
    DomainConfig {
        target_count: target,
        ..Domain::Engineering.config().clone()
    }
}

fn w(start: u32, end: u32) -> RankWindow {
    RankWindow::new(start, end).unwrap()
}

fn retriever(fetcher: ScriptedFetcher) -> Retriever<ScriptedFetcher> {
    Retriever::new(fetcher, RetrievalConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_twenty_five_ranks_request_three_windows_in_order() {
    let retriever = retriever(ScriptedFetcher::new());

    let retrieval = retriever.retrieve(&domain(25)).await;

    assert_eq!(retriever.fetcher().calls(), vec![w(1, 10), w(11, 20), w(21, 25)]);
    assert_eq!(retrieval.records.len(), 25);
    assert_eq!(retrieval.confirmed, (1..=25).collect());
    assert!(retrieval.missing_after_initial.is_empty());
    assert_eq!(retrieval.gap_batches, 0);
    assert_eq!(retrieval.upstream_calls, 3);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_delay_follows_every_window() {
    let retriever = retriever(ScriptedFetcher::new());
    let start = Instant::now();

    retriever.retrieve(&domain(25)).await;

    assert_eq!(start.elapsed(), Duration::from_millis(3 * 1000));
}

#[tokio::test(start_paused = true)]
async fn test_window_recovers_on_third_attempt() {
    let fetcher = ScriptedFetcher::new().on(
        w(1, 10),
        [Reply::Transport, Reply::Transport, Reply::FullWindow],
    );
    let retriever = retriever(fetcher);
    let start = Instant::now();

    let retrieval = retriever.retrieve(&domain(10)).await;

    assert_eq!(retriever.fetcher().calls_for(w(1, 10)), 3);
    assert_eq!(retrieval.records.len(), 10);
    assert_eq!(retrieval.confirmed, (1..=10).collect());
    assert_eq!(retrieval.upstream_calls, 3);
    // Two backoffs, then the inter-window delay.
    assert_eq!(start.elapsed(), Duration::from_millis(2 * 2000 + 1000));
}

#[tokio::test(start_paused = true)]
async fn test_no_backoff_after_final_failed_attempt() {
    let fetcher = ScriptedFetcher::with_fallback(Reply::Malformed);
    let retriever = Retriever::new(
        fetcher,
        RetrievalConfig {
            inter_window_delay: Duration::ZERO,
            ..Default::default()
        },
    );
    let start = Instant::now();

    let retrieval = retriever.retrieve(&domain(5)).await;

    // Initial window and one gap batch, three attempts each, two backoffs each.
    assert_eq!(retrieval.upstream_calls, 6);
    assert_eq!(start.elapsed(), Duration::from_millis(2 * 2 * 2000));
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_window_is_gap_filled() {
    let fetcher = ScriptedFetcher::new().on(
        w(11, 20),
        [Reply::Empty, Reply::Empty, Reply::Empty],
    );
    let retriever = retriever(fetcher);

    let retrieval = retriever.retrieve(&domain(30)).await;

    assert_eq!(retrieval.missing_after_initial, (11..=20).collect::<Vec<_>>());
    assert_eq!(retriever.fetcher().calls_for(w(11, 20)), 4);
    assert_eq!(
        retriever.fetcher().calls(),
        vec![
            w(1, 10),
            w(11, 20),
            w(11, 20),
            w(11, 20),
            w(21, 30),
            w(11, 20),
        ]
    );
    assert_eq!(retrieval.gap_batches, 1);
    assert_eq!(retrieval.records.len(), 30);
    assert!(retrieval.still_missing.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_no_gap_fill_once_target_is_met() {
    let fetcher = ScriptedFetcher::new()
        .on(w(1, 10), [Reply::Records(20)])
        .on(w(11, 20), [Reply::Empty, Reply::Empty, Reply::Empty]);
    let retriever = retriever(fetcher);

    let retrieval = retriever.retrieve(&domain(20)).await;

    assert_eq!(retrieval.records.len(), 20);
    assert_eq!(retrieval.missing_after_initial, (11..=20).collect::<Vec<_>>());
    assert_eq!(retrieval.gap_batches, 0);
    assert_eq!(retriever.fetcher().calls_for(w(11, 20)), 3);
    assert_eq!(retriever.fetcher().calls().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_gap_fill_stops_when_target_reached() {
    let fetcher = ScriptedFetcher::new()
        .on(w(1, 10), [Reply::Empty, Reply::Empty, Reply::Empty])
        .on(w(11, 20), [Reply::Empty, Reply::Empty, Reply::Empty])
        .on(w(21, 30), [Reply::Records(25)]);
    let retriever = retriever(fetcher);

    let retrieval = retriever.retrieve(&domain(30)).await;

    // 25 records after the first pass; the [1-10] gap batch brings it to 35.
    assert_eq!(retrieval.gap_batches, 1);
    assert_eq!(retrieval.records.len(), 35);
    assert_eq!(retriever.fetcher().calls_for(w(1, 10)), 4);
    assert_eq!(retriever.fetcher().calls_for(w(11, 20)), 3);
    assert_eq!(retrieval.still_missing, (11..=20).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_total_outage_returns_empty_without_error() {
    let retriever = retriever(ScriptedFetcher::with_fallback(Reply::Transport));

    let retrieval = retriever.retrieve(&domain(25)).await;

    assert!(retrieval.records.is_empty());
    assert!(retrieval.is_short());
    assert_eq!(retrieval.gap_batches, 3);
    assert_eq!(retrieval.upstream_calls, 18);
    assert_eq!(retrieval.still_missing, (1..=25).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_optimistic_confirmation_hides_short_batch() {
    let fetcher = ScriptedFetcher::new().on(w(1, 10), [Reply::Records(4)]);
    let retriever = retriever(fetcher);

    let retrieval = retriever.retrieve(&domain(10)).await;

    assert_eq!(retrieval.records.len(), 4);
    assert_eq!(retrieval.confirmed, (1..=10).collect());
    assert_eq!(retrieval.gap_batches, 0);
}

#[tokio::test(start_paused = true)]
async fn test_strict_confirmation_refetches_short_batch() {
    let fetcher = ScriptedFetcher::new().on(w(1, 10), [Reply::Records(4)]);
    let retriever = Retriever::new(
        fetcher,
        RetrievalConfig {
            confirmation: Confirmation::Strict,
            ..Default::default()
        },
    );

    let retrieval = retriever.retrieve(&domain(10)).await;

    assert_eq!(retrieval.missing_after_initial, (1..=10).collect::<Vec<_>>());
    assert_eq!(retrieval.gap_batches, 1);
    assert_eq!(retrieval.records.len(), 14);
    assert!(retrieval.still_missing.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_sync_writes_short_result_to_domain_tab() {
    let fetcher = ScriptedFetcher::new().on(w(1, 10), [Reply::Records(7)]);
    let retriever = retriever(fetcher);
    let sink = MemorySink::new();
    let domain = Domain::Law.config();

    let report = sync_domain(&retriever, &sink, domain, domain.sheet_name)
        .await
        .unwrap();

    let writes = sink.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "Law Colleges");
    assert_eq!(writes[0].1.len(), report.obtained);
    assert_eq!(report.obtained, 37);
    assert_eq!(report.target, 40);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_response_is_retried() {
    let fetcher = ScriptedFetcher::new().then([Reply::Malformed]);
    let retriever = retriever(fetcher);

    let retrieval = retriever.retrieve(&domain(20)).await;

    assert_eq!(
        retriever.fetcher().calls(),
        vec![w(1, 10), w(1, 10), w(11, 20)]
    );
    assert_eq!(retrieval.records.len(), 20);
    assert_eq!(retrieval.upstream_calls, 3);
}
