//! Canonical prediction result types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Categorical production bucket derived from the normalized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductionLevel {
    Low,
    Medium,
    High,
}

impl ProductionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionLevel::Low => "Low",
            ProductionLevel::Medium => "Medium",
            ProductionLevel::High => "High",
        }
    }
}

impl fmt::Display for ProductionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model output block of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutput {
    /// Fraction of rated power, in principle within [0, 1]
    pub normalized_output: f64,
    pub power_output_mw: f64,
    pub production_level: ProductionLevel,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Summary of the inputs a prediction was made from.
///
/// Results synthesized locally only fill in the two wind speeds. Summaries
/// sent by the service are kept verbatim, including keys not modelled here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_10m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_100m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_10m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_100m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InputSummary {
    /// Summary holding only the wind speeds at both heights.
    pub fn from_speeds(wind_speed_10m: f64, wind_speed_100m: f64) -> Self {
        Self {
            wind_speed_10m: Some(wind_speed_10m),
            wind_speed_100m: Some(wind_speed_100m),
            ..Default::default()
        }
    }
}

/// Service metadata attached to structured replies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canonical record handed to the presentation layer.
///
/// Top-level keys of a service reply that are not modelled here land in
/// `extra` and serialize back in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: PredictionOutput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_summary: Option<InputSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
