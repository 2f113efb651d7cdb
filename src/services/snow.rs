//! Lenient parsing of the structured snow/forecast response.
//!
//! The model is asked for a JSON array matching `snow_response_schema()`, but
//! nothing guarantees it complies. Parsing degrades instead of failing:
//! an unusable body yields no records, a non-object element is skipped, and
//! missing or wrongly typed fields stay `None` for the reconciler to default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::ForecastDay;
use crate::services::forecast::{day_label, sanitize_depth};

/// Condition label used when a reported day omits one.
const UNKNOWN_CONDITION: &str = "Unknown";

/// Snow data for one resort as reported by the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnowRecord {
    pub resort_name: Option<String>,
    pub description: Option<String>,
    pub current_base_depth: Option<f64>,
    /// `None` when the field was absent or null. An empty array stays `Some`.
    pub forecast: Option<Vec<ForecastDay>>,
}

// --- Gemini JSON response types ---

// Every field is lenient: a wrong type reads as `None` instead of failing the
// whole record.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnowRecord {
    #[serde(default, deserialize_with = "lenient")]
    resort_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    resort_description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    current_base_depth: Option<f64>,
    #[serde(default, deserialize_with = "lenient_days")]
    forecast: Option<Vec<RawForecastDay>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawForecastDay {
    #[serde(default, deserialize_with = "lenient")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    snow_depth: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    condition: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    high_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    low_temp: Option<f64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A non-array forecast reads as `None`. Inside the array, a day that is not
/// an object keeps its position with every field defaulted.
fn lenient_days<'de, D>(deserializer: D) -> Result<Option<Vec<RawForecastDay>>, D::Error>
where
    D: Deserializer<'de>,
{
    let days = match Value::deserialize(deserializer)? {
        Value::Array(days) => days,
        _ => return Ok(None),
    };
    Ok(Some(
        days.into_iter()
            .map(|day| serde_json::from_value(day).unwrap_or_default())
            .collect(),
    ))
}

/// Parse the model's JSON text into snow records.
pub fn parse_snow_batch(text: Option<&str>) -> Vec<SnowRecord> {
    let body = match text.map(strip_code_fence) {
        Some(b) if !b.is_empty() => b,
        _ => return Vec::new(),
    };

    let elements: Vec<Value> = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Snow response is not a JSON array, treating as empty: {}", e);
            return Vec::new();
        }
    };

    elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            if !value.is_object() {
                tracing::warn!("Skipping non-object snow record at index {}", i);
                return None;
            }
            match serde_json::from_value::<RawSnowRecord>(value) {
                Ok(raw) => Some(SnowRecord::from(raw)),
                Err(e) => {
                    tracing::warn!("Skipping malformed snow record at index {}: {}", i, e);
                    None
                }
            }
        })
        .collect()
}

impl From<RawSnowRecord> for SnowRecord {
    fn from(raw: RawSnowRecord) -> Self {
        Self {
            resort_name: raw.resort_name,
            description: raw.resort_description.filter(|d| !d.trim().is_empty()),
            current_base_depth: raw
                .current_base_depth
                .filter(|d| d.is_finite())
                .map(|d| d.max(0.0)),
            forecast: raw.forecast.map(|days| {
                days.into_iter()
                    .enumerate()
                    .map(|(i, day)| convert_day(i, day))
                    .collect()
            }),
        }
    }
}

fn convert_day(index: usize, raw: RawForecastDay) -> ForecastDay {
    ForecastDay {
        date: raw
            .date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| day_label(index)),
        snow_depth: sanitize_depth(raw.snow_depth),
        condition: raw
            .condition
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string()),
        high_temp: round_temp(raw.high_temp),
        low_temp: round_temp(raw.low_temp),
    }
}

fn round_temp(v: Option<f64>) -> i32 {
    match v {
        Some(t) if t.is_finite() => t.round() as i32,
        _ => 0,
    }
}

/// Strip a surrounding Markdown code fence (```json ... ```), if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let json = serde_json::json!([
            {
                "resortName": "Niseko United",
                "resortDescription": "Famous for powder.",
                "currentBaseDepth": 98.5,
                "forecast": [
                    { "date": "Mon", "snowDepth": 6.0, "condition": "Heavy Snow", "highTemp": 27, "lowTemp": 18 },
                    { "date": "Tue", "snowDepth": 2.5, "condition": "Snow", "highTemp": 26.6, "lowTemp": 15.2 }
                ]
            }
        ])
        .to_string();

        let records = parse_snow_batch(Some(&json));
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.resort_name.as_deref(), Some("Niseko United"));
        assert_eq!(r.description.as_deref(), Some("Famous for powder."));
        assert_eq!(r.current_base_depth, Some(98.5));
        let forecast = r.forecast.as_ref().unwrap();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].condition, "Heavy Snow");
        assert_eq!(forecast[1].high_temp, 27);
        assert_eq!(forecast[1].low_temp, 15);
    }

    #[test]
    fn test_empty_and_missing_body() {
        assert!(parse_snow_batch(None).is_empty());
        assert!(parse_snow_batch(Some("")).is_empty());
        assert!(parse_snow_batch(Some("   ")).is_empty());
        assert!(parse_snow_batch(Some("[]")).is_empty());
    }

    #[test]
    fn test_malformed_json_degrades_to_empty() {
        assert!(parse_snow_batch(Some("[{\"resortName\": \"Kiroro")).is_empty());
        assert!(parse_snow_batch(Some("{\"resortName\": \"Kiroro\"}")).is_empty());
        assert!(parse_snow_batch(Some("I'm sorry, I can't help with that.")).is_empty());
    }

    #[test]
    fn test_wrongly_typed_field_keeps_record() {
        let json = r#"[{
            "resortName": "Kiroro Resort",
            "resortDescription": "Deep powder bowl.",
            "currentBaseDepth": "85",
            "forecast": [{"date": "Mon", "snowDepth": 5, "condition": "Snow", "highTemp": 25, "lowTemp": 14}]
        }]"#;
        let records = parse_snow_batch(Some(json));
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.resort_name.as_deref(), Some("Kiroro Resort"));
        assert_eq!(r.description.as_deref(), Some("Deep powder bowl."));
        assert_eq!(r.current_base_depth, None);
        let forecast = r.forecast.as_ref().unwrap();
        assert_eq!(forecast.len(), 1);
        assert_eq!(forecast[0].snow_depth, 5.0);
    }

    #[test]
    fn test_non_object_day_is_defaulted_in_place() {
        let json = r#"[{"resortName": "Niseko United", "forecast": [null, {"snowDepth": "deep"}, {"snowDepth": 4}]}]"#;
        let records = parse_snow_batch(Some(json));
        let forecast = records[0].forecast.as_ref().unwrap();
        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast[0].date, "Day 1");
        assert_eq!(forecast[0].snow_depth, 0.0);
        assert_eq!(forecast[0].condition, "Unknown");
        assert_eq!(forecast[1].snow_depth, 0.0);
        assert_eq!(forecast[2].date, "Day 3");
        assert_eq!(forecast[2].snow_depth, 4.0);
    }

    #[test]
    fn test_non_array_forecast_reads_as_missing() {
        let records = parse_snow_batch(Some(r#"[{"resortName": "Sahoro Resort", "forecast": "sunny"}]"#));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].forecast, None);
    }

    #[test]
    fn test_non_object_elements_are_skipped() {
        let json = r#"[
            "not an object",
            42,
            ["Kiroro Resort"],
            null,
            {"resortName": "Furano Ski Resort", "currentBaseDepth": 60}
        ]"#;
        let records = parse_snow_batch(Some(json));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].resort_name.as_deref(), Some("Furano Ski Resort"));
        assert_eq!(records[0].current_base_depth, Some(60.0));
    }

    #[test]
    fn test_missing_fields_stay_none() {
        let records = parse_snow_batch(Some(r#"[{"resortName": "Sahoro Resort", "forecast": null}]"#));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, None);
        assert_eq!(records[0].current_base_depth, None);
        assert_eq!(records[0].forecast, None);
    }

    #[test]
    fn test_empty_forecast_array_is_kept() {
        let records = parse_snow_batch(Some(r#"[{"resortName": "Sahoro Resort", "forecast": []}]"#));
        assert_eq!(records[0].forecast, Some(vec![]));
    }

    #[test]
    fn test_day_fields_are_defaulted_and_sanitized() {
        let json = r#"[{"resortName": "Asahidake", "forecast": [
            {"snowDepth": -3.0},
            {"date": "Wed", "condition": "", "highTemp": 12.5}
        ]}]"#;
        let records = parse_snow_batch(Some(json));
        let forecast = records[0].forecast.as_ref().unwrap();
        assert_eq!(forecast[0].date, "Day 1");
        assert_eq!(forecast[0].snow_depth, 0.0);
        assert_eq!(forecast[0].condition, "Unknown");
        assert_eq!(forecast[1].date, "Wed");
        assert_eq!(forecast[1].condition, "Unknown");
        assert_eq!(forecast[1].high_temp, 13);
        assert_eq!(forecast[1].low_temp, 0);
    }

    #[test]
    fn test_negative_base_depth_clamped() {
        let records = parse_snow_batch(Some(r#"[{"resortName": "Asahidake", "currentBaseDepth": -4}]"#));
        assert_eq!(records[0].current_base_depth, Some(0.0));
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let text = "```json\n[{\"resortName\": \"Kamui Ski Links\"}]\n```";
        let records = parse_snow_batch(Some(text));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].resort_name.as_deref(), Some("Kamui Ski Links"));
    }

    #[test]
    fn test_strip_code_fence_plain_text_untouched() {
        assert_eq!(strip_code_fence("  [1, 2]  "), "[1, 2]");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
    }
}
