//! Meteorological and temporal inputs for a prediction request.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{WindError, WindResult};

/// Year range the model was trained on.
pub const YEAR_RANGE: (i32, i32) = (2020, 2024);

/// Inputs sent to the prediction endpoint.
///
/// Records are replaced as a whole; use [`update_field`] to derive a new one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRecord {
    /// Zonal wind at 10 m (m/s)
    pub u10: f64,
    /// Meridional wind at 10 m (m/s)
    pub v10: f64,
    /// Zonal wind at 100 m (m/s)
    pub u100: f64,
    /// Meridional wind at 100 m (m/s)
    pub v100: f64,
    pub hour: i32,
    pub day: i32,
    pub month: i32,
    pub year: i32,
}

impl Default for InputRecord {
    fn default() -> Self {
        Self {
            u10: 2.0,
            v10: -2.0,
            u100: 3.0,
            v100: -3.0,
            hour: 12,
            day: 15,
            month: 6,
            year: 2023,
        }
    }
}

/// Names of the individual input fields, matching the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    U10,
    V10,
    U100,
    V100,
    Hour,
    Day,
    Month,
    Year,
}

impl FieldName {
    pub const ALL: [FieldName; 8] = [
        FieldName::U10,
        FieldName::V10,
        FieldName::U100,
        FieldName::V100,
        FieldName::Hour,
        FieldName::Day,
        FieldName::Month,
        FieldName::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::U10 => "u10",
            FieldName::V10 => "v10",
            FieldName::U100 => "u100",
            FieldName::V100 => "v100",
            FieldName::Hour => "hour",
            FieldName::Day => "day",
            FieldName::Month => "month",
            FieldName::Year => "year",
        }
    }

    /// Whether the field holds a whole number on the wire.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldName::Hour | FieldName::Day | FieldName::Month | FieldName::Year
        )
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = WindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| WindError::InvalidField {
                field: s.to_string(),
                message: format!("Unknown field: {}", s),
            })
    }
}

impl InputRecord {
    /// Load a record from a YAML or JSON file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> WindResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let record: InputRecord = serde_yaml::from_str(&content)?;
        Ok(record)
    }

    /// Current value of a field as a float.
    pub fn get(&self, name: FieldName) -> f64 {
        match name {
            FieldName::U10 => self.u10,
            FieldName::V10 => self.v10,
            FieldName::U100 => self.u100,
            FieldName::V100 => self.v100,
            FieldName::Hour => self.hour as f64,
            FieldName::Day => self.day as f64,
            FieldName::Month => self.month as f64,
            FieldName::Year => self.year as f64,
        }
    }

    /// Copy of this record with one field replaced.
    ///
    /// Integer fields take the value truncated toward zero.
    pub fn with_field(&self, name: FieldName, value: f64) -> Self {
        match name {
            FieldName::U10 => Self { u10: value, ..*self },
            FieldName::V10 => Self { v10: value, ..*self },
            FieldName::U100 => Self { u100: value, ..*self },
            FieldName::V100 => Self { v100: value, ..*self },
            FieldName::Hour => Self { hour: value as i32, ..*self },
            FieldName::Day => Self { day: value as i32, ..*self },
            FieldName::Month => Self { month: value as i32, ..*self },
            FieldName::Year => Self { year: value as i32, ..*self },
        }
    }

    /// Check the record against the ranges the prediction service accepts.
    ///
    /// Returns the first violation found, in field order.
    pub fn validate(&self) -> WindResult<()> {
        for name in [FieldName::U10, FieldName::V10, FieldName::U100, FieldName::V100] {
            if !self.get(name).is_finite() {
                return Err(invalid(name, format!("Field {} must be numeric", name)));
            }
        }

        if !(0..=23).contains(&self.hour) {
            return Err(invalid(FieldName::Hour, "Hour must be between 0 and 23".to_string()));
        }
        if !(1..=31).contains(&self.day) {
            return Err(invalid(FieldName::Day, "Day must be between 1 and 31".to_string()));
        }
        if !(1..=12).contains(&self.month) {
            return Err(invalid(FieldName::Month, "Month must be between 1 and 12".to_string()));
        }
        let (min_year, max_year) = YEAR_RANGE;
        if !(min_year..=max_year).contains(&self.year) {
            return Err(invalid(
                FieldName::Year,
                format!("Year must be between {} and {}", min_year, max_year),
            ));
        }

        Ok(())
    }

    /// Calendar timestamp (on the hour) named by the temporal fields.
    ///
    /// `None` when the fields do not form a real date, e.g. 31 February.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let month = u32::try_from(self.month).ok()?;
        let day = u32::try_from(self.day).ok()?;
        let hour = u32::try_from(self.hour).ok()?;
        NaiveDate::from_ymd_opt(self.year, month, day)?.and_hms_opt(hour, 0, 0)
    }
}

fn invalid(name: FieldName, message: String) -> WindError {
    WindError::InvalidField {
        field: name.to_string(),
        message,
    }
}

/// Derive a new record with `name` set from raw user text.
///
/// Text that does not parse as a finite number (including the empty string)
/// becomes `0`; this never fails.
pub fn update_field(current: &InputRecord, name: FieldName, raw_text: &str) -> InputRecord {
    let value = raw_text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);

    current.with_field(name, value)
}
