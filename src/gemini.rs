use crate::errors::OracleError;
use crate::oracle::Oracle;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` client with structured (JSON schema) output.
#[derive(Clone)]
pub struct GeminiOracle {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiOracle {
    /// Creates a new `GeminiOracle`.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key.
    /// * `timeout` - Upper bound for a single HTTP call.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::transport(format!("Failed to create Gemini client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request_body(prompt: &str, schema: &Value) -> Value {
        json!({
            "contents": [
                { "role": "user", "parts": [{ "text": prompt }] }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseJsonSchema": schema
            }
        })
    }

    /// Concatenates the text parts of the first candidate.
    fn response_text(body: &Value) -> Result<String, OracleError> {
        let candidate = body["candidates"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| OracleError::transport("Gemini response has no candidates"))?;

        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate["finishReason"].as_str().unwrap_or("UNKNOWN");
            return Err(OracleError::transport(format!(
                "Gemini candidate has no text (finishReason: {})",
                reason
            )));
        }

        Ok(text)
    }
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl Oracle for GeminiOracle {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<String, OracleError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        tracing::debug!(model, prompt_len = prompt.len(), "Calling Gemini generateContent");

        let response = self
            .client
            .post(&url)
            // Header rather than query string so the key never shows up in URL logs
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request_body(prompt, schema))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(OracleError::Transport {
                status: Some(status.as_u16()),
                message: extract_error_message(&error_text),
            });
        }

        let body: Value = response.json().await.map_err(|e| OracleError::Transport {
            status: Some(status.as_u16()),
            message: format!("Failed to parse Gemini envelope: {}", e),
        })?;

        Self::response_text(&body)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let oracle = GeminiOracle::new("key".to_string(), Duration::from_secs(5));
        assert!(oracle.is_ok());
    }

    #[test]
    fn test_request_body_constrains_output() {
        let schema = json!({"type": "object"});
        let body = GeminiOracle::build_request_body("hello", &schema);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseJsonSchema"], schema);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"is_mean"}, {"text": "ingful\":true}"}]},
                "finishReason": "STOP"
            }]
        });
        assert_eq!(
            GeminiOracle::response_text(&body).unwrap(),
            "{\"is_meaningful\":true}"
        );
    }

    #[test]
    fn test_response_text_without_candidates() {
        let err = GeminiOracle::response_text(&json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, OracleError::Transport { status: None, .. }));

        let err = GeminiOracle::response_text(&json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let oracle = GeminiOracle::new("k".into(), Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://localhost:1234/");
        assert_eq!(oracle.base_url, "http://localhost:1234");
    }
}
