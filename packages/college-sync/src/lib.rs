//! Ranked college list sync
//!
//! Fetches ranked institutions per academic domain from a search-backed chat
//! completion API, normalizes them into [`CollegeRecord`]s and overwrites a
//! spreadsheet tab with the result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use college_sync::{Domain, Retriever, RetrievalConfig, StructuredFetcher};
//!
//! let fetcher = StructuredFetcher::new(client, FetcherSettings::new("sonar-pro"));
//! let retriever = Retriever::new(fetcher, RetrievalConfig::default());
//!
//! let retrieval = retriever.retrieve(Domain::Engineering.config()).await;
//! println!("{} of {}", retrieval.records.len(), retrieval.target);
//! ```
//!
//! # Modules
//!
//! - [`domain`] - The closed set of domains and their prompt fragments
//! - [`record`] - Canonical record and sanitizer
//! - [`window`] - Rank window partitioning and gap grouping
//! - [`fetcher`] - One upstream call per window (structured and legacy)
//! - [`retrieval`] - Retry state machine and the gap-filling orchestrator
//! - [`sink`] - Spreadsheet and JSON-lines destinations
//! - [`testing`] - Scripted fetcher and in-memory sink

pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod record;
pub mod retrieval;
pub mod sink;
pub mod sync;
pub mod testing;
pub mod window;

pub use config::Config;
pub use domain::{Domain, DomainConfig};
pub use error::{ConfigError, FetchError, SinkError};
pub use fetcher::{BatchFetcher, FetcherSettings, LegacyFetcher, StructuredFetcher};
pub use record::{sanitize, CollegeRecord};
pub use retrieval::{Confirmation, Retrieval, RetrievalConfig, Retriever};
pub use sink::{JsonLinesSink, RecordSink, SheetsSink, SinkReport};
pub use window::{partition, RankWindow, BATCH_SIZE};

/// Install the `tracing` subscriber used by the binaries.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,college_sync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
