//! Common types and utilities shared by the wind power prediction crates.

pub mod derived;
pub mod error;
pub mod input;
pub mod prediction;

pub use derived::{categorize, direction, magnitude, power_output_mw, REFERENCE_CAPACITY_MW};
pub use error::{WindError, WindResult, FALLBACK_ERROR_MESSAGE};
pub use input::{update_field, FieldName, InputRecord};
pub use prediction::{InputSummary, PredictionOutput, PredictionResult, ProductionLevel, ResponseMeta};
