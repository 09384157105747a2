use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::errors::CoreError;
use crate::models::analysis::{AnalysisReport, AnalysisRequest};
use super::traits::AnalysisProvider;

const PROVIDER_NAME: &str = "Gemini";

/// Generative-language API provider for "Quantum Pulse" analysis blurbs.
///
/// - **Auth**: API key sent in the `x-goog-api-key` header.
/// - **Endpoint**: `POST {base_url}/models/{model}:generateContent`
/// - **Output**: JSON text (`responseMimeType: application/json`) with
///   `sentiment`, `prediction`, `riskLevel`, `technobabble`.
///
/// Replies are treated as unreliable: empty text, code fences and
/// loosely typed risk levels are all handled in [`parse_generate_content`].
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(&AnalysisConfig {
            api_key: Some(api_key.into()),
            ..AnalysisConfig::default()
        })
    }

    /// Build from config. The request timeout is enforced by the caller
    /// (see `AnalysisTicket`), the client timeout is a second guard.
    pub fn with_config(config: &AnalysisConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Themed prompt asking for a JSON blurb in the request's language.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    format!(
        "Act as a futuristic market analyst from the year 2142.\n\
         Provide a brief \"Quantum Pulse Analysis\" for {name} ({symbol}).\n\
         Current Market Data: Price ${price}, 24h Change {change}%.\n\
         \n\
         IMPORTANT: Response MUST be in {language}.\n\
         \n\
         Structure your response in JSON with these keys:\n\
         - \"sentiment\": A sci-fi term for market mood (e.g., \"Hyper-Bullish\", \"Solar Flare Volatility\").\n\
         - \"prediction\": A short futuristic prediction.\n\
         - \"riskLevel\": 1-10 with a technical-sounding reason.\n\
         - \"technobabble\": A high-tech explanation of current movement.\n\
         \n\
         Keep it concise and thematic.",
        name = request.name,
        symbol = request.symbol,
        price = request.price,
        change = request.change_24h,
        language = request.language.display_name(),
    )
}

// ── generateContent request/response types ─────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Extract the report from a raw `generateContent` response body.
pub fn parse_generate_content(body: &str) -> Result<AnalysisReport, CoreError> {
    let resp: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        CoreError::MalformedResponse(format!("{PROVIDER_NAME} envelope: {e}"))
    })?;

    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .concat()
        })
        .unwrap_or_default();

    parse_report_text(&text)
}

/// Parse the model's JSON text, tolerating surrounding whitespace and
/// a markdown code fence.
pub fn parse_report_text(text: &str) -> Result<AnalysisReport, CoreError> {
    let trimmed = strip_code_fence(text.trim());
    if trimmed.is_empty() {
        return Err(CoreError::EmptyResponse(PROVIDER_NAME.into()));
    }
    serde_json::from_str(trimmed)
        .map_err(|e| CoreError::MalformedResponse(format!("{PROVIDER_NAME} report: {e}")))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line, which may
    // also be the only line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, CoreError> {
        if self.api_key.is_empty() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: "No API key configured".into(),
            });
        }

        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(request)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP {status} for {}", request.symbol),
            });
        }

        parse_generate_content(&body)
    }
}
