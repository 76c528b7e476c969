//! Terminal rendering of prediction outcomes.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use prediction_client::{HealthStatus, PredictionState};
use wind_common::{direction, magnitude, InputRecord};

/// Formats prediction state for output.
pub struct PredictionReport;

impl PredictionReport {
    /// Format the outcome of a request cycle as a console table.
    pub fn format_table(input: &InputRecord, state: &PredictionState) -> String {
        let mut table = new_table("Prediction Results");

        if let Some(result) = state.result() {
            let prediction = &result.prediction;
            table.add_row(vec![
                "Power Production:",
                prediction.production_level.as_str(),
            ]);
            table.add_row(vec![
                "Normalized Output:",
                &format!("{:.4} (0-1 scale)", prediction.normalized_output),
            ]);
            table.add_row(vec![
                "Estimated Power:",
                &format!("{:.2} MW", prediction.power_output_mw),
            ]);

            if let Some(summary) = &result.input_summary {
                table.add_row(vec!["", ""]);
                if let Some(speed) = summary.wind_speed_10m {
                    table.add_row(vec!["Wind Speed 10m:", &format!("{:.2} m/s", speed)]);
                }
                if let Some(speed) = summary.wind_speed_100m {
                    table.add_row(vec!["Wind Speed 100m:", &format!("{:.2} m/s", speed)]);
                }
                if let Some(dir) = summary.wind_direction_10m {
                    table.add_row(vec!["Wind Direction 10m:", &format!("{:.1}°", dir)]);
                }
                if let Some(dir) = summary.wind_direction_100m {
                    table.add_row(vec!["Wind Direction 100m:", &format!("{:.1}°", dir)]);
                }
                if let Some(ts) = &summary.timestamp {
                    table.add_row(vec!["Timestamp:", ts]);
                }
            }

            if let Some(request_id) = result.meta.as_ref().and_then(|m| m.request_id.as_deref()) {
                table.add_row(vec!["Request ID:", request_id]);
            }
        } else {
            let when = input
                .timestamp()
                .map(|ts| ts.format("%Y-%m-%d %H:00").to_string())
                .unwrap_or_else(|| "invalid date".to_string());
            table.add_row(vec!["Requested For:", &when]);
        }

        if let Some(error) = state.error() {
            table.add_row(vec!["", ""]);
            table.add_row(vec!["Error:", error]);
        }

        table.to_string()
    }

    /// Format the state as JSON.
    pub fn format_json(state: &PredictionState) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(state)?)
    }

    /// Format a health probe reply.
    pub fn format_health(base_url: &str, health: &HealthStatus) -> String {
        let mut table = new_table(&format!("Service Health: {}", base_url));
        table.add_row(vec!["Status:", health.status.as_str()]);
        table.add_row(vec!["Model Loaded:", yes_no(health.model_loaded)]);
        table.add_row(vec!["Scaler Loaded:", yes_no(health.scaler_loaded)]);
        if let Some(ts) = &health.timestamp {
            table.add_row(vec!["Timestamp:", ts]);
        }
        table.to_string()
    }

    /// Format speed and meteorological direction of a wind vector.
    pub fn format_wind(u: f64, v: f64) -> String {
        let mut table = new_table("Wind Vector");
        table.add_row(vec!["Components:", &format!("u = {}, v = {} m/s", u, v)]);
        table.add_row(vec!["Speed:", &format!("{:.2} m/s", magnitude(u, v))]);
        table.add_row(vec!["Direction (from):", &format!("{:.1}°", direction(u, v))]);
        table.to_string()
    }
}

fn new_table(title: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![title.to_string()]);
    table
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wind_common::{InputSummary, PredictionOutput, PredictionResult, ProductionLevel};

    fn succeeded() -> PredictionState {
        let mut state = PredictionState::new();
        state.start();
        state.succeed(PredictionResult {
            prediction: PredictionOutput {
                normalized_output: 0.45,
                power_output_mw: 45.0,
                production_level: ProductionLevel::Medium,
                extra: Default::default(),
            },
            input_summary: Some(InputSummary::from_speeds(5.0, 0.0)),
            meta: None,
            extra: Default::default(),
        });
        state
    }

    #[test]
    fn test_table_shows_result() {
        let table = PredictionReport::format_table(&InputRecord::default(), &succeeded());

        assert!(table.contains("Medium"));
        assert!(table.contains("0.4500 (0-1 scale)"));
        assert!(table.contains("45.00 MW"));
        assert!(table.contains("5.00 m/s"));
        assert!(!table.contains("Error:"));
    }

    #[test]
    fn test_table_shows_stale_result_and_error() {
        let mut state = succeeded();
        state.start();
        state.fail("bad input");

        let table = PredictionReport::format_table(&InputRecord::default(), &state);
        assert!(table.contains("45.00 MW"));
        assert!(table.contains("bad input"));
    }

    #[test]
    fn test_table_without_result_shows_request_time() {
        let mut state = PredictionState::new();
        state.start();
        state.fail("Failed to get prediction. Please try again.");

        let table = PredictionReport::format_table(&InputRecord::default(), &state);
        assert!(table.contains("2023-06-15 12:00"));
        assert!(table.contains("Failed to get prediction"));
    }

    #[test]
    fn test_json_output() {
        let json = PredictionReport::format_json(&succeeded()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["loading"], false);
        assert!(value["error"].is_null());
        assert_eq!(value["result"]["prediction"]["production_level"], "Medium");
    }

    #[test]
    fn test_wind_vector() {
        let table = PredictionReport::format_wind(3.0, 4.0);
        assert!(table.contains("5.00 m/s"));
        assert!(table.contains("216.9°"));
    }
}
