//! Forecast aggregation and synthesized forecast sequences.
//!
//! Two placeholder sequences exist and are deliberately different:
//!
//! - `default_forecast`: a matched resort came back without a forecast
//!   ("Cloudy", 32°F / 20°F)
//! - `offline_forecast`: the whole batch failed ("Unavailable", 0°F / 0°F)

use crate::models::ForecastDay;

/// Number of days the model is asked to forecast.
pub const FORECAST_DAYS: usize = 7;

pub const DEFAULT_CONDITION: &str = "Cloudy";
pub const DEFAULT_HIGH_TEMP_F: i32 = 32;
pub const DEFAULT_LOW_TEMP_F: i32 = 20;

/// Condition label used for every day of an offline forecast.
pub const OFFLINE_CONDITION: &str = "Unavailable";

/// Total predicted new snow across a forecast sequence, in inches.
///
/// Non-finite or negative depths contribute nothing, so the result is never
/// negative. An empty sequence sums to 0.
pub fn total_accumulation(days: &[ForecastDay]) -> f64 {
    days.iter().map(|d| sanitize_depth(Some(d.snow_depth))).sum()
}

/// Clamp a reported snow depth to a usable value (missing, NaN, ±Inf, or
/// negative → 0).
pub fn sanitize_depth(depth: Option<f64>) -> f64 {
    match depth {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Placeholder label for the n-th (0-based) forecast day.
pub fn day_label(index: usize) -> String {
    format!("Day {}", index + 1)
}

/// Seven cloudy, snowless days. Used when a resort matched but had no forecast.
pub fn default_forecast() -> Vec<ForecastDay> {
    synthesize(DEFAULT_CONDITION, DEFAULT_HIGH_TEMP_F, DEFAULT_LOW_TEMP_F)
}

/// Seven "Unavailable" days at 0°F. Used for the full-batch fallback.
pub fn offline_forecast() -> Vec<ForecastDay> {
    synthesize(OFFLINE_CONDITION, 0, 0)
}

fn synthesize(condition: &str, high_temp: i32, low_temp: i32) -> Vec<ForecastDay> {
    (0..FORECAST_DAYS)
        .map(|i| ForecastDay {
            date: day_label(i),
            snow_depth: 0.0,
            condition: condition.to_string(),
            high_temp,
            low_temp,
        })
        .collect()
}
