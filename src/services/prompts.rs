//! Builders for the two batched Gemini requests.
//!
//! Both requests cover every requested resort at once so a full refresh costs
//! exactly two model calls.

use crate::models::Resort;
use crate::services::gemini::{GenerateRequest, GroundingTool, LatLng};

/// Starting point for travel distance/time questions.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            name: "Sapporo City Center".to_string(),
            latitude: 43.0621,
            longitude: 141.3544,
        }
    }
}

/// Display names joined with ", ".
pub fn resort_list(requested: &[Resort]) -> String {
    requested
        .iter()
        .map(|r| r.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Structured forecast request: search-grounded, JSON output constrained by
/// [`snow_response_schema`].
pub fn snow_request(requested: &[Resort], model: &str) -> GenerateRequest {
    let prompt = format!(
        "Provide a detailed 7-day snow forecast for these Hokkaido resorts: {}.\n\
         For each resort, return:\n\
         1. Current total snow base depth on the ground in inches.\n\
         2. Daily predicted new snowfall in inches for the next 7 days.\n\
         3. High and Low temperatures in Fahrenheit for each day.\n\
         4. General weather condition for each day.\n\
         5. A brief 2-sentence description of the resort.",
        resort_list(requested)
    );

    GenerateRequest {
        model: model.to_string(),
        prompt,
        tools: vec![GroundingTool::GoogleSearch],
        response_schema: Some(snow_response_schema()),
        lat_lng: None,
    }
}

/// Free-text travel request: maps-grounded around `origin`. Maps grounding
/// does not accept a response schema, so the line format is spelled out in
/// the prompt instead.
pub fn travel_request(requested: &[Resort], model: &str, origin: &Origin) -> GenerateRequest {
    let prompt = format!(
        "Provide driving distance (miles) and current travel time (hours/mins) from {} to these resorts: {}.\n\
         Format the output strictly as a list with one line per resort:\n\
         Resort: [Resort Name] | Distance: [Distance] | Time: [Time]",
        origin.name,
        resort_list(requested)
    );

    GenerateRequest {
        model: model.to_string(),
        prompt,
        tools: vec![GroundingTool::GoogleMaps],
        response_schema: None,
        lat_lng: Some(LatLng {
            latitude: origin.latitude,
            longitude: origin.longitude,
        }),
    }
}

/// OpenAPI-subset schema for the snow response (array of resort objects).
pub fn snow_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "resortName": { "type": "STRING" },
                "resortDescription": { "type": "STRING" },
                "currentBaseDepth": { "type": "NUMBER" },
                "forecast": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "date": { "type": "STRING" },
                            "snowDepth": { "type": "NUMBER" },
                            "condition": { "type": "STRING" },
                            "highTemp": { "type": "NUMBER" },
                            "lowTemp": { "type": "NUMBER" }
                        },
                        "required": ["date", "snowDepth", "condition", "highTemp", "lowTemp"]
                    }
                }
            },
            "required": ["resortName", "resortDescription", "currentBaseDepth", "forecast"]
        }
    })
}
