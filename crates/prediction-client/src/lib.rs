//! Client for the wind power prediction service.
//!
//! This crate provides:
//! - Decoding of the two reply shapes the service produces
//! - Normalization of either shape into a canonical [`PredictionResult`]
//! - An HTTP transport behind the [`PredictionApi`] trait
//! - A dispatcher that drives the loading / error / result state of a request cycle

pub mod api;
pub mod config;
pub mod dispatcher;
pub mod response;
pub mod state;

pub use api::{HealthStatus, HttpPredictionApi, PredictionApi, REQUEST_ID_HEADER};
pub use config::ClientConfig;
pub use dispatcher::Dispatcher;
pub use response::{normalize, RawResponse};
pub use state::PredictionState;

pub use wind_common::{InputRecord, PredictionResult, WindError, WindResult};
