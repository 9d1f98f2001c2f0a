use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;

use crate::{
    models::{raw::RawBarRecord, request_params::BarsRequestParams},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, DecodeSnafu, InvalidRequestSnafu,
        MissingEnvVarSnafu, MissingSectionSnafu, ProviderError, ProviderInitError,
        RateLimitedSnafu, RequestSnafu,
        alphavantage_rest::{
            params::{construct_params, validate_month},
            response::AlphaVantageResponse,
        },
    },
};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Whole-request bound: connect, send and body read together.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Alpha Vantage intraday REST provider.
///
/// Reads its API key from the `ALPHAVANTAGE_API_KEY` environment variable.
/// The key is held as a [`SecretString`] and only exposed when the query is
/// assembled. No retry or backoff happens here; a failed call surfaces as a
/// [`ProviderError`] and retry policy stays with the caller.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: SecretString,
}

impl AlphaVantageProvider {
    /// Creates a provider with the default request timeout.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a provider with a caller-supplied request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderInitError> {
        let api_key =
            SecretString::new(get_env_var("ALPHAVANTAGE_API_KEY").context(MissingEnvVarSnafu)?.into());

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl DataProvider for AlphaVantageProvider {
    async fn fetch_bars(
        &self,
        params: &BarsRequestParams,
    ) -> Result<Vec<RawBarRecord>, ProviderError> {
        if let Some(month) = &params.month {
            validate_month(month)?;
        }

        let mut query = construct_params(params);
        query.push((
            "apikey".to_string(),
            self.api_key.expose_secret().to_string(),
        ));

        let response = self
            .client
            .get(BASE_URL)
            .query(&query)
            .send()
            .await
            .context(RequestSnafu)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                message: format!("{status}: {body}"),
            }
            .fail();
        }

        let payload: AlphaVantageResponse = response.json().await.context(DecodeSnafu)?;

        // The endpoint reports failures in-band with a 200 status.
        if let Some(message) = payload.error_message {
            return InvalidRequestSnafu { message }.fail();
        }
        if let Some(message) = payload.note.or(payload.information) {
            return RateLimitedSnafu { message }.fail();
        }

        let section = format!("Time Series ({})", params.interval);
        let Some(rows) = payload.time_series.get(&section) else {
            return MissingSectionSnafu { section }.fail();
        };

        let records = rows
            .iter()
            .map(|(stamp, fields)| RawBarRecord {
                timestamp: stamp.clone(),
                open: fields.open.clone(),
                high: fields.high.clone(),
                low: fields.low.clone(),
                close: fields.close.clone(),
                volume: fields.volume.clone(),
            })
            .collect();

        Ok(records)
    }
}
