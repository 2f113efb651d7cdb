//! Joins model output back onto the requested resort list.
//!
//! The model's resort names are not trusted to match ours exactly, so each
//! requested resort is matched by the first word of its name: the first
//! record (in response order) whose name contains that word wins. Output
//! always has one entry per requested resort, in request order.

use crate::models::{DataOrigin, Provenance, Resort, ResortInfo};
use crate::services::forecast::{default_forecast, offline_forecast, total_accumulation};
use crate::services::snow::SnowRecord;
use crate::services::travel::TravelRecord;

/// Per-field default when the travel response had nothing for a resort.
pub const DEFAULT_DISTANCE: &str = "Distance unknown";
pub const DEFAULT_TRAVEL_TIME: &str = "Time unknown";

/// Distance and time shown when the whole batch failed.
pub const OFFLINE_DISTANCE: &str = "Unknown";
pub const OFFLINE_TRAVEL_TIME: &str = "Unknown";

pub const OFFLINE_DESCRIPTION: &str =
    "Weather station temporarily offline due to heavy blizzard conditions.";

fn default_description(resort: Resort) -> String {
    format!("{} is a premier ski destination in Hokkaido.", resort.display_name())
}

/// Build one [`ResortInfo`] per requested resort from the parsed responses.
pub fn reconcile(
    requested: &[Resort],
    snow_records: &[SnowRecord],
    travel_records: &[TravelRecord],
) -> Vec<ResortInfo> {
    requested
        .iter()
        .map(|&resort| {
            let key = resort.normalization_key();
            let snow = first_match(snow_records, &key, |s| s.resort_name.as_deref());
            let travel = first_match(travel_records, &key, |t| t.resort_name.as_deref());
            build_info(resort, snow, travel)
        })
        .collect()
}

/// Placeholder entries for every requested resort, used when the batch fails.
pub fn offline_fallback(requested: &[Resort]) -> Vec<ResortInfo> {
    requested
        .iter()
        .map(|&resort| {
            let forecast = offline_forecast();
            ResortInfo {
                id: resort.id(),
                name: resort.display_name().to_string(),
                localized_name: resort.localized_name().to_string(),
                description: OFFLINE_DESCRIPTION.to_string(),
                base_depth: 0.0,
                total_accumulation: total_accumulation(&forecast),
                forecast,
                distance: OFFLINE_DISTANCE.to_string(),
                travel_time: OFFLINE_TRAVEL_TIME.to_string(),
                sources: Vec::new(),
                coords: resort.coords(),
                provenance: Provenance::offline(),
            }
        })
        .collect()
}

/// First record whose lowercased name contains `key`. Not best match.
fn first_match<'a, T>(
    records: &'a [T],
    key: &str,
    name: impl Fn(&T) -> Option<&str>,
) -> Option<&'a T> {
    records
        .iter()
        .find(|r| name(r).is_some_and(|n| n.to_lowercase().contains(key)))
}

fn origin_of<T>(value: &Option<T>) -> DataOrigin {
    if value.is_some() {
        DataOrigin::Reported
    } else {
        DataOrigin::Defaulted
    }
}

fn build_info(resort: Resort, snow: Option<&SnowRecord>, travel: Option<&TravelRecord>) -> ResortInfo {
    let empty_snow = SnowRecord::default();
    let empty_travel = TravelRecord::default();
    let snow = snow.unwrap_or(&empty_snow);
    let travel = travel.unwrap_or(&empty_travel);

    let provenance = Provenance {
        description: origin_of(&snow.description),
        base_depth: origin_of(&snow.current_base_depth),
        forecast: origin_of(&snow.forecast),
        travel: if travel.distance.is_some() || travel.time.is_some() {
            DataOrigin::Reported
        } else {
            DataOrigin::Defaulted
        },
    };

    let forecast = snow.forecast.clone().unwrap_or_else(default_forecast);

    ResortInfo {
        id: resort.id(),
        name: resort.display_name().to_string(),
        localized_name: resort.localized_name().to_string(),
        description: snow
            .description
            .clone()
            .unwrap_or_else(|| default_description(resort)),
        base_depth: snow.current_base_depth.unwrap_or(0.0),
        total_accumulation: total_accumulation(&forecast),
        forecast,
        distance: travel
            .distance
            .clone()
            .unwrap_or_else(|| DEFAULT_DISTANCE.to_string()),
        travel_time: travel
            .time
            .clone()
            .unwrap_or_else(|| DEFAULT_TRAVEL_TIME.to_string()),
        sources: Vec::new(),
        coords: resort.coords(),
        provenance,
    }
}
