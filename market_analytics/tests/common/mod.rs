#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use market_data_source::{
    models::{raw::RawBarRecord, request_params::BarsRequestParams},
    providers::{ApiSnafu, DataProvider, ProviderError},
};

/// One canned reply for the scripted provider.
pub enum Scripted {
    Rows(Vec<RawBarRecord>),
    Fail(String),
}

/// A provider that replays scripted batches in order.
///
/// Batches are served front-to-back, one per `fetch_bars` call; an exhausted
/// script serves empty batches.
pub struct ScriptedProvider {
    batches: Mutex<VecDeque<Scripted>>,
}

impl ScriptedProvider {
    pub fn new(batches: Vec<Scripted>) -> Self {
        Self {
            batches: Mutex::new(batches.into_iter().collect()),
        }
    }
}

#[async_trait]
impl DataProvider for ScriptedProvider {
    async fn fetch_bars(
        &self,
        _params: &BarsRequestParams,
    ) -> Result<Vec<RawBarRecord>, ProviderError> {
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Rows(rows)) => Ok(rows),
            Some(Scripted::Fail(message)) => ApiSnafu { message }.fail(),
            None => Ok(Vec::new()),
        }
    }
}

/// Raw record `minutes` past 2024-03-08 14:30 UTC, RFC-3339 stamped, with a
/// tight valid OHLC envelope around `close`.
pub fn raw_bar(minutes: i64, close: f64, volume: u64) -> RawBarRecord {
    let stamp =
        Utc.with_ymd_and_hms(2024, 3, 8, 14, 30, 0).unwrap() + Duration::minutes(minutes);
    RawBarRecord {
        timestamp: stamp.to_rfc3339(),
        open: close.to_string(),
        high: (close * 1.001).to_string(),
        low: (close * 0.999).to_string(),
        close: close.to_string(),
        volume: volume.to_string(),
    }
}

/// A record that fails timestamp parsing.
pub fn junk_bar() -> RawBarRecord {
    RawBarRecord {
        timestamp: "not a timestamp".to_string(),
        open: "100.0".to_string(),
        high: "100.0".to_string(),
        low: "100.0".to_string(),
        close: "100.0".to_string(),
        volume: "1000".to_string(),
    }
}
