//! Property suite for the §-independent invariants: normalization is
//! idempotent, canonical series are strictly monotonic, and rolling
//! statistics appear exactly at their availability boundaries.

use chrono::{Duration, TimeZone, Utc};
use market_analytics::{
    metrics::MetricEngine,
    models::{bar::Bar, series::Series},
    normalizer,
};
use market_data_source::models::{interval::Interval, raw::RawBarRecord};
use proptest::prelude::*;

/// Renders a canonical series back into raw records, the way a provider
/// replaying our own data would.
fn render_raw(series: &Series) -> Vec<RawBarRecord> {
    series
        .bars()
        .iter()
        .map(|bar| RawBarRecord {
            timestamp: bar.timestamp.to_rfc3339(),
            open: bar.open.to_string(),
            high: bar.high.to_string(),
            low: bar.low.to_string(),
            close: bar.close.to_string(),
            volume: bar.volume.to_string(),
        })
        .collect()
}

fn arb_raw_records() -> impl Strategy<Value = Vec<RawBarRecord>> {
    // Minutes may collide: duplicate timestamps must be deduplicated
    // keeping the last occurrence.
    prop::collection::vec((0u32..1440, 1.0f64..1000.0, 0u64..1_000_000), 0..60).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(minute, price, volume)| {
                    let stamp = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap()
                        + Duration::minutes(minute as i64);
                    RawBarRecord {
                        timestamp: stamp.to_rfc3339(),
                        open: price.to_string(),
                        high: (price * 1.01).to_string(),
                        low: (price * 0.99).to_string(),
                        close: price.to_string(),
                        volume: volume.to_string(),
                    }
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn normalize_is_idempotent(records in arb_raw_records()) {
        let first = normalizer::normalize("AAPL", Interval::Min1, &records, 1.0).unwrap();
        let replayed = render_raw(&first.series);
        let second = normalizer::normalize("AAPL", Interval::Min1, &replayed, 1.0).unwrap();

        prop_assert_eq!(&first.series, &second.series);
        prop_assert_eq!(second.dropped.total(), 0);
    }

    #[test]
    fn normalized_series_is_strictly_monotonic(records in arb_raw_records()) {
        let batch = normalizer::normalize("AAPL", Interval::Min1, &records, 1.0).unwrap();
        let stamps: Vec<_> = batch.series.bars().iter().map(|b| b.timestamp).collect();
        prop_assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn rolling_statistics_appear_exactly_at_the_boundary(
        window in 2usize..8,
        extra in 0usize..20,
        base_price in 10.0f64..500.0,
    ) {
        let len = window + 1 + extra;
        let bars: Vec<Bar> = (0..len)
            .map(|i| {
                let stamp = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap()
                    + Duration::minutes(i as i64);
                let close = base_price + (i % 5) as f64;
                Bar::new(stamp, close, close + 1.0, (close - 1.0).max(0.1), close, 100 + i as u64)
                    .unwrap()
            })
            .collect();
        let series = Series::from_bars("AAPL", Interval::Min1, bars).unwrap();
        let (derived, _) = MetricEngine::compute(&series, window);

        for (i, point) in derived.iter().enumerate() {
            prop_assert_eq!(point.return_pct.is_some(), i >= 1);
            prop_assert_eq!(point.volume_avg.is_some(), i >= window - 1);
            prop_assert_eq!(point.volatility.is_some(), i >= window);
        }
    }
}
