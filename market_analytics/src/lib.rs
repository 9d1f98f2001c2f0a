//! Market-data analytics core.
//!
//! Takes raw intraday records from a [`DataProvider`](market_data_source::providers::DataProvider),
//! cleans them into an append-only canonical [`Series`](models::series::Series),
//! derives rolling statistics (period returns, volatility, volume averages),
//! classifies each new bar (trend flips, volume spikes, price anomalies) and
//! gates the resulting signals through a cooldown before emitting alerts.
//!
//! Data flows one way through [`pipeline::Pipeline::run_batch`]:
//!
//! ```text
//! raw records -> normalizer -> Series -> metrics -> detector -> dispatcher -> alerts
//! ```
//!
//! One pipeline instance owns all mutable state for one (symbol, interval)
//! pair; instances share nothing and may run concurrently. A batch commits
//! atomically at the end or not at all, so readers always observe the
//! last-known-good series even after a failed batch.

pub mod config;
pub mod detector;
pub mod dispatcher;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod time;
