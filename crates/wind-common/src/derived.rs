//! Derived wind quantities computed from velocity components and model output.

use std::f64::consts::PI;

use crate::prediction::ProductionLevel;

/// Rated capacity the normalized model output is scaled against.
pub const REFERENCE_CAPACITY_MW: f64 = 100.0;

/// Upper bound (exclusive) of the Low production bucket.
const LOW_THRESHOLD: f64 = 0.2;

/// Upper bound (exclusive) of the Medium production bucket.
const MEDIUM_THRESHOLD: f64 = 0.6;

/// Magnitude of the horizontal wind vector (m/s).
pub fn magnitude(x: f64, y: f64) -> f64 {
    (x * x + y * y).sqrt()
}

/// Meteorological wind direction in degrees, rounded to one decimal place.
///
/// This is the direction the wind is blowing FROM:
/// - 270° = wind from West (U > 0, V = 0)
/// - 180° = wind from South (U = 0, V > 0)
///
/// The result is always in `[0, 360)`.
pub fn direction(u: f64, v: f64) -> f64 {
    let degrees = (270.0 - v.atan2(u) * 180.0 / PI).rem_euclid(360.0);
    let rounded = (degrees * 10.0).round() / 10.0;

    // 359.95 and above round up to a full turn
    if rounded >= 360.0 {
        0.0
    } else {
        rounded
    }
}

/// Bucket a normalized output into a production level.
///
/// Out-of-range values are not clamped; they fall into the outer buckets.
pub fn categorize(normalized_output: f64) -> ProductionLevel {
    if normalized_output < LOW_THRESHOLD {
        ProductionLevel::Low
    } else if normalized_output < MEDIUM_THRESHOLD {
        ProductionLevel::Medium
    } else {
        ProductionLevel::High
    }
}

/// Power in megawatts for a normalized output.
pub fn power_output_mw(normalized_output: f64) -> f64 {
    normalized_output * REFERENCE_CAPACITY_MW
}
