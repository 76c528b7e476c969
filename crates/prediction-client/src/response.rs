//! Decoding and normalization of prediction service replies.
//!
//! The service answers in one of two shapes with no discriminator field:
//! - Scalar: `{"prediction": 0.42}`
//! - Structured: `{"prediction": {"normalized_output": .., "power_output_mw": ..,
//!   "production_level": ..}, "input_summary": {..}, "meta": {..}}`
//!
//! [`RawResponse::decode`] picks the variant once at the boundary; everything
//! downstream matches on the enum.

use serde_json::Value;
use tracing::debug;
use wind_common::{
    categorize, magnitude, power_output_mw, InputRecord, InputSummary, PredictionOutput,
    PredictionResult, WindError, WindResult,
};

/// A decoded service reply.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// Bare normalized output
    Scalar { prediction: f64 },
    /// Reply already in canonical form
    Structured(PredictionResult),
}

impl RawResponse {
    /// Decide which shape a reply body has and decode it.
    pub fn decode(body: Value) -> WindResult<Self> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            other => {
                return Err(WindError::MalformedResponse(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        match fields.get("prediction") {
            Some(Value::Number(number)) => {
                let prediction = number.as_f64().ok_or_else(|| {
                    WindError::MalformedResponse(format!("prediction {} is not representable", number))
                })?;
                debug!(prediction, "Decoded scalar prediction");
                return Ok(RawResponse::Scalar { prediction });
            }
            Some(Value::Object(_)) => {}
            Some(other) => {
                return Err(WindError::MalformedResponse(format!(
                    "prediction must be a number or an object, got {}",
                    json_kind(other)
                )))
            }
            None => {
                return Err(WindError::MalformedResponse(
                    "reply has no prediction field".to_string(),
                ))
            }
        }

        // A summary the service sent in some other shape is carried as-is
        let foreign_summary = if matches!(fields.get("input_summary"), Some(v) if !v.is_object()) {
            fields.remove("input_summary")
        } else {
            None
        };

        let mut result: PredictionResult = serde_json::from_value(Value::Object(fields))
            .map_err(|e| WindError::MalformedResponse(format!("structured prediction is invalid: {}", e)))?;
        if let Some(summary) = foreign_summary {
            result.extra.insert("input_summary".to_string(), summary);
        }
        debug!(level = %result.prediction.production_level, "Decoded structured prediction");
        Ok(RawResponse::Structured(result))
    }
}

/// Produce the canonical result for a decoded reply.
///
/// Structured replies pass through untouched, including their summary (or
/// lack of one). Scalar replies are expanded using the request's inputs.
pub fn normalize(raw: RawResponse, input: &InputRecord) -> PredictionResult {
    match raw {
        RawResponse::Structured(result) => result,
        RawResponse::Scalar { prediction } => PredictionResult {
            prediction: PredictionOutput {
                normalized_output: prediction,
                power_output_mw: power_output_mw(prediction),
                production_level: categorize(prediction),
                extra: Default::default(),
            },
            input_summary: Some(InputSummary::from_speeds(
                magnitude(input.u10, input.v10),
                magnitude(input.u100, input.v100),
            )),
            meta: None,
            extra: Default::default(),
        },
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wind_common::ProductionLevel;

    fn input(u10: f64, v10: f64, u100: f64, v100: f64) -> InputRecord {
        InputRecord {
            u10,
            v10,
            u100,
            v100,
            ..Default::default()
        }
    }

    #[test]
    fn test_scalar_reply_is_synthesized() {
        let raw = RawResponse::decode(json!({"prediction": 0.45})).unwrap();
        assert_eq!(raw, RawResponse::Scalar { prediction: 0.45 });

        let result = normalize(raw, &input(3.0, 4.0, 0.0, 0.0));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "prediction": {
                    "normalized_output": 0.45,
                    "power_output_mw": 45.0,
                    "production_level": "Medium"
                },
                "input_summary": {
                    "wind_speed_10m": 5.0,
                    "wind_speed_100m": 0.0
                }
            })
        );
    }

    #[test]
    fn test_scalar_integer_and_out_of_range_values() {
        let result = normalize(
            RawResponse::decode(json!({"prediction": 1})).unwrap(),
            &InputRecord::default(),
        );
        assert_eq!(result.prediction.normalized_output, 1.0);
        assert_eq!(result.prediction.power_output_mw, 100.0);
        assert_eq!(result.prediction.production_level, ProductionLevel::High);

        let result = normalize(
            RawResponse::decode(json!({"prediction": -0.1})).unwrap(),
            &InputRecord::default(),
        );
        assert_eq!(result.prediction.production_level, ProductionLevel::Low);
    }

    #[test]
    fn test_structured_reply_passes_through_unchanged() {
        let body = json!({
            "prediction": {
                "normalized_output": 0.9,
                "power_output_mw": 90,
                "production_level": "High"
            }
        });

        let result = normalize(RawResponse::decode(body).unwrap(), &input(3.0, 4.0, 1.0, 1.0));
        assert_eq!(result.prediction.normalized_output, 0.9);
        assert_eq!(result.prediction.power_output_mw, 90.0);
        assert_eq!(result.prediction.production_level, ProductionLevel::High);
        assert!(result.input_summary.is_none(), "summary must not be added");
        assert!(result.meta.is_none());
    }

    #[test]
    fn test_structured_summary_is_not_recomputed() {
        let body = json!({
            "prediction": {
                "normalized_output": 0.3,
                "power_output_mw": 30.0,
                "production_level": "Medium"
            },
            "input_summary": {
                "timestamp": "2023-06-15 12:00:00",
                "wind_speed_10m": 99.0,
                "wind_direction_10m": 315.0
            },
            "meta": {
                "model_version": "1.0",
                "request_id": "abc"
            }
        });

        let result = normalize(RawResponse::decode(body).unwrap(), &input(3.0, 4.0, 0.0, 0.0));
        let summary = result.input_summary.unwrap();
        assert_eq!(summary.wind_speed_10m, Some(99.0));
        assert_eq!(summary.wind_speed_100m, None);
        assert_eq!(summary.wind_direction_10m, Some(315.0));
        assert_eq!(result.meta.unwrap().request_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_structured_reply_keeps_unknown_keys() {
        let body = json!({
            "prediction": {
                "normalized_output": 0.7,
                "power_output_mw": 70.0,
                "production_level": "High",
                "confidence": 0.7
            },
            "input_summary": {"wind_speed_10m": 8.5},
            "meta": {"model_version": "1.0"},
            "warnings": ["stale scaler"]
        });

        let result = normalize(RawResponse::decode(body.clone()).unwrap(), &InputRecord::default());
        assert_eq!(result.prediction.extra.get("confidence"), Some(&json!(0.7)));
        assert_eq!(result.extra.get("warnings"), Some(&json!(["stale scaler"])));
        assert_eq!(serde_json::to_value(&result).unwrap(), body);
    }

    #[test]
    fn test_structured_reply_with_non_object_summary_is_carried() {
        let body = json!({
            "prediction": {
                "normalized_output": 0.2,
                "power_output_mw": 20.0,
                "production_level": "Low"
            },
            "input_summary": "n/a"
        });

        let result = normalize(RawResponse::decode(body.clone()).unwrap(), &input(3.0, 4.0, 0.0, 0.0));
        assert!(result.input_summary.is_none(), "summary must not be synthesized");
        assert_eq!(result.extra.get("input_summary"), Some(&json!("n/a")));
        assert_eq!(serde_json::to_value(&result).unwrap(), body);
    }

    #[test]
    fn test_rejects_non_numeric_prediction() {
        for body in [
            json!({"prediction": null}),
            json!({"prediction": "0.5"}),
            json!({"prediction": true}),
            json!({"prediction": [0.5]}),
        ] {
            let err = RawResponse::decode(body.clone()).unwrap_err();
            assert!(matches!(err, WindError::MalformedResponse(_)), "{body}");
        }
    }

    #[test]
    fn test_rejects_missing_prediction_and_non_object_bodies() {
        assert!(matches!(
            RawResponse::decode(json!({"result": 0.5})),
            Err(WindError::MalformedResponse(_))
        ));
        assert!(matches!(
            RawResponse::decode(json!(0.5)),
            Err(WindError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_rejects_structured_prediction_missing_fields() {
        let body = json!({"prediction": {"normalized_output": 0.5}});
        let err = RawResponse::decode(body).unwrap_err();
        assert!(err.to_string().contains("structured prediction is invalid"));

        let body = json!({
            "prediction": {
                "normalized_output": 0.5,
                "power_output_mw": 50.0,
                "production_level": "Extreme"
            }
        });
        assert!(RawResponse::decode(body).is_err());
    }
}
