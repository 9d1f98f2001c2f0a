#![cfg(test)]
use market_data_source::{
    models::{interval::Interval, request_params::BarsRequestParams},
    providers::{DataProvider, alphavantage_rest::provider::AlphaVantageProvider},
};

#[tokio::test]
#[ignore]
async fn test_alphavantage_provider_fetch_bars() {
    // This test requires ALPHAVANTAGE_API_KEY to be set in the environment
    // (a .env file works too) and burns one request of the daily quota.
    dotenvy::dotenv().ok();
    if std::env::var("ALPHAVANTAGE_API_KEY").is_err() {
        println!("Skipping test_alphavantage_provider_fetch_bars: API key not set.");
        return;
    }

    let provider = AlphaVantageProvider::new().expect("Failed to create AlphaVantageProvider");

    let params = BarsRequestParams {
        symbol: "AAPL".to_string(),
        interval: Interval::Min5,
        month: None,
    };

    let result = provider.fetch_bars(&params).await;

    assert!(
        result.is_ok(),
        "fetch_bars returned an error: {:?}",
        result.err()
    );

    let records = result.unwrap();
    assert!(
        !records.is_empty(),
        "Expected at least one raw record for AAPL"
    );

    // Raw fields should be numeric-looking strings the normalizer can coerce.
    let first = &records[0];
    assert!(first.open.parse::<f64>().is_ok(), "open: {}", first.open);
    assert!(first.close.parse::<f64>().is_ok(), "close: {}", first.close);
    assert!(
        first.volume.parse::<u64>().is_ok(),
        "volume: {}",
        first.volume
    );
}
