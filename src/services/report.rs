//! Snow report orchestration: two batched model calls, reconciled per resort.
//!
//! Flow for one refresh:
//! 1. Build the structured snow request and the free-text travel request.
//! 2. Run both concurrently, each wrapped in `with_retry`, and wait for both.
//! 3. Both succeeded → parse, reconcile, attach grounding sources.
//!    Either failed → discard everything and return `offline_fallback`.
//!
//! Nothing is cached between refreshes and no state is shared between
//! concurrent refreshes.

use std::sync::Arc;
use std::time::Instant;

use crate::errors::AppError;
use crate::models::{GroundingSource, Resort, ResortInfo};
use crate::services::gemini::{ContentGenerator, GeneratedContent};
use crate::services::prompts::{snow_request, travel_request, Origin};
use crate::services::reconcile::{offline_fallback, reconcile};
use crate::services::retry::{with_retry, RetryPolicy};
use crate::services::snow::parse_snow_batch;
use crate::services::travel::parse_travel_text;

/// Models, origin and retry budget for a [`SnowReportService`].
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub snow_model: String,
    pub travel_model: String,
    pub origin: Origin,
    pub retry: RetryPolicy,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            snow_model: "gemini-3-flash-preview".to_string(),
            travel_model: "gemini-2.5-flash".to_string(),
            origin: Origin::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Fetches and reconciles snow reports. Cheap to clone.
#[derive(Clone)]
pub struct SnowReportService {
    generator: Arc<dyn ContentGenerator>,
    settings: ReportSettings,
}

impl SnowReportService {
    pub fn new(generator: Arc<dyn ContentGenerator>, settings: ReportSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    /// One `ResortInfo` per requested resort, in request order. Never fails:
    /// any upstream failure yields offline placeholders for every resort.
    pub async fn fetch_all_resorts_data(&self, requested: &[Resort]) -> Vec<ResortInfo> {
        let start = Instant::now();

        match self.fetch_batch(requested).await {
            Ok(resorts) => {
                tracing::info!(
                    "Snow report for {} resorts ready in {}ms",
                    resorts.len(),
                    start.elapsed().as_millis()
                );
                resorts
            }
            Err(e) => {
                tracing::error!(
                    "Snow report batch failed after {}ms, serving offline data: {}",
                    start.elapsed().as_millis(),
                    e
                );
                offline_fallback(requested)
            }
        }
    }

    async fn fetch_batch(&self, requested: &[Resort]) -> Result<Vec<ResortInfo>, AppError> {
        let snow_req = snow_request(requested, &self.settings.snow_model);
        let travel_req = travel_request(
            requested,
            &self.settings.travel_model,
            &self.settings.origin,
        );

        let generator = self.generator.as_ref();
        let retry = &self.settings.retry;
        let (snow_req, travel_req) = (&snow_req, &travel_req);

        let (snow_result, travel_result) = futures::future::join(
            with_retry(retry, move || generator.generate(snow_req)),
            with_retry(retry, move || generator.generate(travel_req)),
        )
        .await;

        if let Err(e) = &snow_result {
            tracing::warn!("Snow request failed: {}", e);
        }
        if let Err(e) = &travel_result {
            tracing::warn!("Travel request failed: {}", e);
        }
        let snow = snow_result?;
        let travel = travel_result?;

        let snow_records = parse_snow_batch(snow.text.as_deref());
        let travel_records = parse_travel_text(travel.text.as_deref());
        tracing::debug!(
            "Parsed {} snow records and {} travel records",
            snow_records.len(),
            travel_records.len()
        );

        let sources = merge_sources(&snow, &travel);
        let mut resorts = reconcile(requested, &snow_records, &travel_records);
        for info in &mut resorts {
            info.sources = sources.clone();
        }
        Ok(resorts)
    }
}

/// Sources from both responses, deduplicated by URI, first occurrence kept.
fn merge_sources(snow: &GeneratedContent, travel: &GeneratedContent) -> Vec<GroundingSource> {
    let mut merged: Vec<GroundingSource> = Vec::new();
    for source in snow.sources.iter().chain(travel.sources.iter()) {
        if !merged.iter().any(|s| s.uri == source.uri) {
            merged.push(source.clone());
        }
    }
    merged
}
