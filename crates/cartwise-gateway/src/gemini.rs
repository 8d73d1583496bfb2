//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::backend::{GenerateRequest, ModelBackend, OutputShape, Tool};
use crate::error::{BackendFailure, BackendSetupError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini REST client implementing [`ModelBackend`].
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`BackendSetupError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, BackendSetupError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`BackendSetupError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`BackendSetupError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, BackendSetupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cartwise/0.1 (grocery-planner)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BackendSetupError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    fn build_url(&self) -> Result<Url, BackendFailure> {
        let url = self
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| BackendFailure::new(Some(400), format!("invalid model path: {e}")))?;
        Ok(url)
    }

    fn build_body(request: &GenerateRequest) -> Value {
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
        });

        match request.tool {
            Some(Tool::WebSearch) => {
                body["tools"] = json!([{ "google_search": {} }]);
            }
            Some(Tool::Maps) => {
                body["tools"] = json!([{ "google_maps": {} }]);
                if let Some(near) = &request.near {
                    body["toolConfig"] = json!({
                        "retrievalConfig": {
                            "latLng": { "latitude": near.latitude, "longitude": near.longitude }
                        }
                    });
                }
            }
            None => {
                // Grounded calls cannot request a JSON mime type.
                if request.shape == OutputShape::Json {
                    body["generationConfig"] = json!({ "responseMimeType": "application/json" });
                }
            }
        }
        body
    }

    /// Concatenates the text parts of the first candidate.
    fn extract_text(body: &str) -> String {
        match serde_json::from_str::<GenerateResponse>(body) {
            Ok(parsed) => parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content)
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|p| p.text)
                        .collect::<String>()
                })
                .unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "unexpected generateContent envelope; treating as empty");
                String::new()
            }
        }
    }

    fn failure_from_status(status: u16, body: &str) -> BackendFailure {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("HTTP {status}"));
        BackendFailure::new(Some(status), message)
    }
}

/// Network-level failure. The URL is stripped so nothing request-specific
/// ends up in item errors or logs.
fn transport_failure(err: reqwest::Error) -> BackendFailure {
    let status = err.status().map(|s| s.as_u16());
    BackendFailure::new(status, err.without_url().to_string())
}

impl ModelBackend for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, BackendFailure> {
        let url = self.build_url()?;
        let body = Self::build_body(request);

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_failure)?;

        if !status.is_success() {
            return Err(Self::failure_from_status(status.as_u16(), &text));
        }
        Ok(Self::extract_text(&text))
    }
}
