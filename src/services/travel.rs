//! Parser for the free-text travel response.
//!
//! The maps-grounded request cannot use a response schema, so the model is
//! asked for one line per resort:
//!
//! ```text
//! Resort: Furano Ski Resort | Distance: 120 miles | Time: 2.5 hours
//! ```
//!
//! Anything else the model says (preamble, bullet commentary, blank lines) is
//! dropped without error.

const RESORT_LABEL: &str = "Resort:";
const DISTANCE_LABEL: &str = "Distance:";
const TIME_LABEL: &str = "Time:";

/// One parsed travel line. Missing or blank segments are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelRecord {
    pub resort_name: Option<String>,
    pub distance: Option<String>,
    pub time: Option<String>,
}

/// Parse pipe-delimited travel lines. `None` or empty input yields no records.
pub fn parse_travel_text(raw: Option<&str>) -> Vec<TravelRecord> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.lines()
        .filter(|line| line.contains('|'))
        .map(|line| {
            let mut parts = line.split('|');
            TravelRecord {
                resort_name: labelled_segment(parts.next(), RESORT_LABEL),
                distance: labelled_segment(parts.next(), DISTANCE_LABEL),
                time: labelled_segment(parts.next(), TIME_LABEL),
            }
        })
        .collect()
}

/// Remove the first occurrence of `label` and surrounding whitespace.
fn labelled_segment(segment: Option<&str>, label: &str) -> Option<String> {
    let value = segment?.replacen(label, "", 1);
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
