//! Serde mapping for the Alpha Vantage intraday payload.

use indexmap::IndexMap;
use serde::Deserialize;

/// One bar's fields as Alpha Vantage spells them.
///
/// All values arrive as quoted strings; they are passed through to the raw
/// record without coercion.
#[derive(Deserialize, Debug)]
pub struct AlphaVantageBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

/// Top-level intraday response.
///
/// The time-series section's key embeds the interval (`"Time Series (5min)"`),
/// so after the named sections are peeled off, the remaining keys are captured
/// into `time_series` and looked up by the expected key. Error conditions are
/// reported in-band: `"Error Message"` for rejected requests, `"Note"` /
/// `"Information"` for rate limiting.
#[derive(Deserialize, Debug)]
pub struct AlphaVantageResponse {
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,

    #[serde(rename = "Note")]
    pub note: Option<String>,

    #[serde(rename = "Information")]
    pub information: Option<String>,

    #[serde(rename = "Meta Data")]
    pub meta: Option<IndexMap<String, String>>,

    /// Keyed by section name, then by bar timestamp, in provider order.
    #[serde(flatten)]
    pub time_series: IndexMap<String, IndexMap<String, AlphaVantageBar>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Meta Data": {
            "1. Information": "Intraday (5min) open, high, low, close prices and volume",
            "2. Symbol": "AAPL",
            "6. Time Zone": "US/Eastern"
        },
        "Time Series (5min)": {
            "2024-03-08 19:55:00": {
                "1. open": "170.7300",
                "2. high": "170.8000",
                "3. low": "170.7100",
                "4. close": "170.7500",
                "5. volume": "4245"
            },
            "2024-03-08 19:50:00": {
                "1. open": "170.6900",
                "2. high": "170.7400",
                "3. low": "170.6800",
                "4. close": "170.7300",
                "5. volume": "2618"
            }
        }
    }"#;

    #[test]
    fn parses_time_series_in_provider_order() {
        let response: AlphaVantageResponse = serde_json::from_str(SAMPLE).unwrap();
        assert!(response.error_message.is_none());
        assert!(response.note.is_none());

        let series = response.time_series.get("Time Series (5min)").unwrap();
        assert_eq!(series.len(), 2);

        // Provider sends newest-first; order must survive deserialization.
        let (first_stamp, first_bar) = series.get_index(0).unwrap();
        assert_eq!(first_stamp, "2024-03-08 19:55:00");
        assert_eq!(first_bar.open, "170.7300");
        assert_eq!(first_bar.volume, "4245");
    }

    #[test]
    fn parses_error_message_payload() {
        let raw = r#"{"Error Message": "Invalid API call."}"#;
        let response: AlphaVantageResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.error_message.as_deref(), Some("Invalid API call."));
        assert!(response.time_series.is_empty());
    }

    #[test]
    fn parses_rate_limit_note() {
        let raw = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#;
        let response: AlphaVantageResponse = serde_json::from_str(raw).unwrap();
        assert!(response.note.is_some());
    }
}
