//! Data-source collaborator for the market analytics pipeline.
//!
//! This crate owns everything vendor-facing: the [`DataProvider`](providers::DataProvider)
//! trait, the provider-native record and request types, and the Alpha Vantage
//! intraday REST implementation. Records leave this crate untouched — parsing,
//! validation and cleaning all happen downstream in the analytics normalizer,
//! so a provider bug can never silently "fix" data.

pub mod models;
pub mod providers;
