//! Cake-message suggestions from an external generative-text service
//!
//! The service is a black box that returns a list of short strings. Any
//! failure falls back to a fixed list so the order form always has
//! something to offer.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Returned whenever the service cannot be used
pub const FALLBACK_SUGGESTIONS: &[&str] = &["Happy Birthday!", "Congratulations!", "Best Wishes!"];

const USER_AGENT: &str = concat!("sweettrack-shop/", env!("CARGO_PKG_VERSION"));

/// Suggestion service errors
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("Suggestion service is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Service returned no suggestions")]
    Empty,
}

/// What the customer wants a message for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionRequest {
    pub occasion: String,
    pub recipient: String,
    pub tone: String,
}

impl Default for SuggestionRequest {
    fn default() -> Self {
        Self {
            occasion: "Birthday".to_string(),
            recipient: "a loved one".to_string(),
            tone: "warm and elegant".to_string(),
        }
    }
}

impl SuggestionRequest {
    /// Replace blank fields with their defaults
    pub fn with_defaults(self) -> Self {
        let defaults = Self::default();
        let pick = |value: String, default: String| {
            if value.trim().is_empty() {
                default
            } else {
                value.trim().to_string()
            }
        };
        Self {
            occasion: pick(self.occasion, defaults.occasion),
            recipient: pick(self.recipient, defaults.recipient),
            tone: pick(self.tone, defaults.tone),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Provide 5 short, creative, and aesthetically pleasing \"Message on Cake\" ideas for a {} for {}. \
             The tone should be {}. Keep them brief enough to fit on a cake.",
            self.occasion, self.recipient, self.tone
        )
    }
}

#[async_trait]
pub trait MessageSuggester: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError>;
}

/// Suggestions plus whether they came from the fallback list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    pub suggestions: Vec<String>,
    pub fallback: bool,
}

/// Ask the suggester, substituting the fallback list on any error
pub async fn suggest_or_fallback(
    suggester: &dyn MessageSuggester,
    request: &SuggestionRequest,
) -> Suggestions {
    match suggester.suggest(request).await {
        Ok(suggestions) => Suggestions {
            suggestions,
            fallback: false,
        },
        Err(SuggestionError::NotConfigured) => {
            tracing::debug!("Suggestion service not configured, using fallback");
            fallback()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Suggestion service failed, using fallback");
            fallback()
        }
    }
}

fn fallback() -> Suggestions {
    Suggestions {
        suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        fallback: true,
    }
}

/// Used when no API key is configured
pub struct DisabledSuggester;

#[async_trait]
impl MessageSuggester for DisabledSuggester {
    async fn suggest(&self, _request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError> {
        Err(SuggestionError::NotConfigured)
    }
}

/// Gemini-style `generateContent` client
pub struct GeminiSuggester {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSuggester {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, SuggestionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| SuggestionError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Request body asking for a JSON array of strings
pub fn generate_content_body(request: &SuggestionRequest) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": request.prompt() }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        }
    })
}

/// Pull the suggestion list out of a `generateContent` response
///
/// The first candidate's first text part holds a JSON array of strings.
pub fn parse_generate_content_response(body: &Value) -> Result<Vec<String>, SuggestionError> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| SuggestionError::ParseError("response has no text part".to_string()))?;

    let suggestions: Vec<String> =
        serde_json::from_str(text).map_err(|e| SuggestionError::ParseError(e.to_string()))?;

    let suggestions: Vec<String> = suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if suggestions.is_empty() {
        return Err(SuggestionError::Empty);
    }
    Ok(suggestions)
}

#[async_trait]
impl MessageSuggester for GeminiSuggester {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError> {
        tracing::debug!(occasion = %request.occasion, model = %self.model, "Requesting cake message suggestions");

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&generate_content_body(request))
            .send()
            .await
            .map_err(|e| SuggestionError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SuggestionError::ApiError(status.as_u16(), error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SuggestionError::ParseError(e.to_string()))?;

        let suggestions = parse_generate_content_response(&body)?;
        tracing::info!(count = suggestions.len(), "Received cake message suggestions");
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSuggester;

    #[async_trait]
    impl MessageSuggester for FailingSuggester {
        async fn suggest(&self, _request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError> {
            Err(SuggestionError::ApiError(503, "overloaded".to_string()))
        }
    }

    #[test]
    fn test_blank_fields_take_defaults() {
        let request = SuggestionRequest {
            occasion: "Wedding".to_string(),
            recipient: "  ".to_string(),
            tone: String::new(),
        }
        .with_defaults();
        assert_eq!(request.occasion, "Wedding");
        assert_eq!(request.recipient, "a loved one");
        assert_eq!(request.tone, "warm and elegant");
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = SuggestionRequest::default().prompt();
        assert!(prompt.contains("Birthday"));
        assert!(prompt.contains("a loved one"));
        assert!(prompt.contains("warm and elegant"));
    }

    #[test]
    fn test_body_requests_string_array() {
        let body = generate_content_body(&SuggestionRequest::default());
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_parse_response() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "[\"Sweet 16!\", \" \", \"Happy Birthday, Mia\"]" }] }
            }]
        });
        let suggestions = parse_generate_content_response(&body).unwrap();
        assert_eq!(suggestions, vec!["Sweet 16!", "Happy Birthday, Mia"]);
    }

    #[test]
    fn test_parse_rejects_missing_or_empty() {
        assert!(matches!(
            parse_generate_content_response(&json!({ "candidates": [] })),
            Err(SuggestionError::ParseError(_))
        ));

        let empty = json!({ "candidates": [{ "content": { "parts": [{ "text": "[]" }] } }] });
        assert!(matches!(parse_generate_content_response(&empty), Err(SuggestionError::Empty)));

        let prose = json!({ "candidates": [{ "content": { "parts": [{ "text": "Happy Birthday!" }] } }] });
        assert!(matches!(parse_generate_content_response(&prose), Err(SuggestionError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_failures_fall_back() {
        let result = suggest_or_fallback(&FailingSuggester, &SuggestionRequest::default()).await;
        assert!(result.fallback);
        assert_eq!(result.suggestions, FALLBACK_SUGGESTIONS);

        let result = suggest_or_fallback(&DisabledSuggester, &SuggestionRequest::default()).await;
        assert!(result.fallback);
    }
}
