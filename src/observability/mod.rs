//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, stderr)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → terminal / log aggregation
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (chain, tx_hash, source) on every event
//! - Metrics are cheap no-ops unless an exporter is installed

pub mod logging;
pub mod metrics;
