//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the unified interface for
//! fetching raw intraday bar records from a market data vendor.
//!
//! Each concrete provider implementation (such as Alpha Vantage) implements
//! [`DataProvider`] to handle vendor-specific API logic, error mapping and
//! request validation. The trait is designed for async usage and supports
//! dynamic dispatch (`Arc<dyn DataProvider>`) so callers can select a vendor
//! at runtime.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_source::models::{
//!     raw::RawBarRecord,
//!     request_params::BarsRequestParams,
//! };
//! use market_data_source::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         _params: &BarsRequestParams,
//!     ) -> Result<Vec<RawBarRecord>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod alphavantage_rest;

use async_trait::async_trait;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, Snafu};

use crate::models::{raw::RawBarRecord, request_params::BarsRequestParams};

/// Trait for fetching raw intraday bar records from a market data provider.
///
/// Implement this trait for each concrete data vendor. Implementations must
/// not retry failed calls on their own — retry policy belongs to the caller —
/// and must return records untouched, leaving parsing to the consumer.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches raw bar records for the given request parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The symbol, interval and optional month slice to request.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RawBarRecord>)` - Raw rows in provider order.
    /// * `Err(ProviderError)` - If the request fails.
    async fn fetch_bars(
        &self,
        params: &BarsRequestParams,
    ) -> Result<Vec<RawBarRecord>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// The API key environment variable is not set.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// Transport-level failure (connect error, timeout, TLS).
    #[snafu(display("API request failed: {source}"))]
    Request {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The response body could not be decoded as the expected payload.
    #[snafu(display("Failed to decode provider payload: {source}"))]
    Decode {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider answered with a non-success HTTP status.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The provider throttled the request (quota exhausted).
    #[snafu(display("Provider rate limit hit: {message}"))]
    RateLimited {
        message: String,
        backtrace: Backtrace,
    },

    /// The provider rejected the request itself: unknown symbol, bad
    /// parameters or an invalid API key.
    #[snafu(display("Provider rejected request: {message}"))]
    InvalidRequest {
        message: String,
        backtrace: Backtrace,
    },

    /// A well-formed payload that is missing the expected time-series section.
    #[snafu(display("Provider payload missing '{section}' section"))]
    MissingSection {
        section: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },
}
