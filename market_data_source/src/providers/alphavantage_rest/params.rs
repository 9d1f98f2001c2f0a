//! Query construction and request validation for the Alpha Vantage endpoint.

use chrono::NaiveDate;
use snafu::ensure;

use crate::models::request_params::BarsRequestParams;
use crate::providers::{ProviderError, ValidationSnafu};

/// Builds the intraday query pairs for a request.
///
/// The API key is appended separately by the provider so the secret never
/// travels through helper code.
pub fn construct_params(params: &BarsRequestParams) -> Vec<(String, String)> {
    let mut query = vec![
        ("function".to_string(), "TIME_SERIES_INTRADAY".to_string()),
        ("symbol".to_string(), params.symbol.clone()),
        ("interval".to_string(), params.interval.as_str().to_string()),
        ("adjusted".to_string(), "true".to_string()),
        ("outputsize".to_string(), "full".to_string()),
    ];

    if let Some(month) = &params.month {
        query.push(("month".to_string(), month.clone()));
    }

    query
}

/// Validates a month slice before it is sent to the provider.
///
/// Alpha Vantage expects `"YYYY-MM"`; anything else comes back as an opaque
/// in-band error, so rejecting it locally gives the caller a usable message.
pub fn validate_month(month: &str) -> Result<(), ProviderError> {
    let well_formed = month.len() == 7
        && NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_ok();
    ensure!(
        well_formed,
        ValidationSnafu {
            message: format!("month must be formatted as YYYY-MM, got {month:?}"),
        }
    );
    Ok(())
}
