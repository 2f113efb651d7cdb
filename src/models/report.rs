//! Reconciled per-resort report, the value handed to the presentation layer.

use serde::Serialize;
use utoipa::ToSchema;

use super::resort::MapCoords;

/// One calendar day of forecast weather.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastDay {
    /// Day label as reported (e.g. "Mon 12/01" or "Day 3")
    pub date: String,
    /// Predicted new snow in inches (never negative)
    pub snow_depth: f64,
    /// Free-text condition, e.g. "Heavy Snow"
    pub condition: String,
    /// High temperature in °F
    pub high_temp: i32,
    /// Low temperature in °F
    pub low_temp: i32,
}

/// Where a group of fields in a [`ResortInfo`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    /// Taken from the model's response.
    Reported,
    /// The response had no value for this resort; a per-field default was used.
    Defaulted,
    /// The whole batch failed; this is offline placeholder data.
    Offline,
}

/// Per-field-group origin markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Provenance {
    pub description: DataOrigin,
    pub base_depth: DataOrigin,
    pub forecast: DataOrigin,
    /// Distance and travel time together
    pub travel: DataOrigin,
}

impl Provenance {
    pub fn offline() -> Self {
        Self {
            description: DataOrigin::Offline,
            base_depth: DataOrigin::Offline,
            forecast: DataOrigin::Offline,
            travel: DataOrigin::Offline,
        }
    }

    pub fn is_offline(&self) -> bool {
        *self == Self::offline()
    }
}

/// A web page or map place the model cited while answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Reconciled snow report for one requested resort.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResortInfo {
    /// Slug, e.g. "furano-ski-resort"
    pub id: String,
    /// Display name
    pub name: String,
    /// Japanese name
    pub localized_name: String,
    pub description: String,
    /// Current snow on the ground in inches
    pub base_depth: f64,
    pub forecast: Vec<ForecastDay>,
    /// Sum of forecast snow depth in inches
    pub total_accumulation: f64,
    /// Driving distance from the origin, free text with units
    pub distance: String,
    /// Driving time from the origin, free text
    pub travel_time: String,
    pub sources: Vec<GroundingSource>,
    pub coords: MapCoords,
    pub provenance: Provenance,
}
