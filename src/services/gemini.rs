//! Gemini `generateContent` client.
//!
//! See: https://ai.google.dev/api/generate-content
//!
//! The client is built once at startup and cloned into every consumer;
//! `reqwest::Client` pools connections internally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::AppError;
use crate::models::GroundingSource;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Grounding tool the model may call while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundingTool {
    GoogleSearch,
    GoogleMaps,
}

/// Geographic hint used to bias maps retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single-prompt generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub tools: Vec<GroundingTool>,
    /// When set, the model is asked for `application/json` matching this schema.
    pub response_schema: Option<serde_json::Value>,
    pub lat_lng: Option<LatLng>,
}

/// Text of the first candidate plus whatever sources grounded it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedContent {
    /// `None` when the model returned no candidate text (e.g. blocked output).
    pub text: Option<String>,
    pub sources: Vec<GroundingSource>,
}

/// Anything that can answer a [`GenerateRequest`].
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedContent, AppError>;
}

/// Client for the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

// --- Gemini JSON request types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct WireContent {
    role: &'static str,
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
struct WirePart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfig {
    lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

// --- Gemini JSON response types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
    /// Thinking models may include reasoning parts; those are not the answer.
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<ChunkRef>,
    maps: Option<ChunkRef>,
}

#[derive(Debug, Deserialize)]
struct ChunkRef {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Call `models/{model}:generateContent` and extract the answer text.
    pub async fn generate_content(
        &self,
        request: &GenerateRequest,
    ) -> Result<GeneratedContent, AppError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&build_body(request))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &body));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Gemini JSON parse error: {}", e))
        })?;

        Ok(extract_content(parsed))
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedContent, AppError> {
        self.generate_content(request).await
    }
}

fn build_body(request: &GenerateRequest) -> GenerateContentBody {
    let tools = request
        .tools
        .iter()
        .map(|tool| match tool {
            GroundingTool::GoogleSearch => serde_json::json!({ "googleSearch": {} }),
            GroundingTool::GoogleMaps => serde_json::json!({ "googleMaps": {} }),
        })
        .collect();

    GenerateContentBody {
        contents: vec![WireContent {
            role: "user",
            parts: vec![WirePart {
                text: request.prompt.clone(),
            }],
        }],
        tools,
        tool_config: request.lat_lng.map(|lat_lng| ToolConfig {
            retrieval_config: RetrievalConfig { lat_lng },
        }),
        generation_config: request
            .response_schema
            .clone()
            .map(|response_schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            }),
    }
}

/// Map a non-2xx response onto an error, recognising rate limiting by status
/// code, by the `RESOURCE_EXHAUSTED` status string, or by "429" in the message.
fn classify_error(status: reqwest::StatusCode, body: &str) -> AppError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| body.trim().to_string());
    let resource_exhausted = envelope
        .as_ref()
        .and_then(|e| e.error.status.as_deref())
        .is_some_and(|s| s == "RESOURCE_EXHAUSTED");

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || resource_exhausted
        || message.contains("429")
    {
        AppError::RateLimited(format!("Gemini returned HTTP {}: {}", status, message))
    } else {
        AppError::ExternalServiceError(format!("Gemini returned HTTP {}: {}", status, message))
    }
}

/// Join the non-thought text parts of the first candidate and collect its
/// grounding sources.
fn extract_content(response: GenerateContentResponse) -> GeneratedContent {
    let Some(candidate) = response.candidates.and_then(|c| c.into_iter().next()) else {
        return GeneratedContent::default();
    };

    let text: String = candidate
        .content
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought.unwrap_or(false))
        .filter_map(|p| p.text)
        .collect();

    let sources = candidate
        .grounding_metadata
        .and_then(|m| m.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web.or(chunk.maps))
        .filter_map(|r| {
            let uri = r.uri?;
            Some(GroundingSource {
                title: r.title.unwrap_or_else(|| uri.clone()),
                uri,
            })
        })
        .collect();

    GeneratedContent {
        text: if text.is_empty() { None } else { Some(text) },
        sources,
    }
}
