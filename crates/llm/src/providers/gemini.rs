use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider};

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Build a provider for `model`. A blank key is rejected so "credential
    /// present" always means a usable key.
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::NotConfigured("Gemini API key is empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the Gemini generateContent API: the prompt
    /// as a single user turn.
    fn build_request_body(prompt: &str, temperature: f32, max_tokens: u32) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_tokens,
            },
        })
    }

    /// Pull the reply text out of a generateContent response: every text part
    /// of the first candidate, joined.
    fn parse_response(resp: &serde_json::Value) -> Result<String, LlmError> {
        let candidate = match resp["candidates"].get(0) {
            Some(c) => c,
            None => {
                if let Some(reason) = resp["promptFeedback"]["blockReason"].as_str() {
                    return Err(LlmError::Blocked(reason.to_string()));
                }
                return Err(LlmError::ParseError("missing candidates[0]".into()));
            }
        };

        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return match candidate["finishReason"].as_str() {
                Some(reason) if reason != "STOP" => Err(LlmError::Blocked(reason.to_string())),
                _ => Err(LlmError::ParseError(
                    "missing candidates[0].content.parts[].text".into(),
                )),
            };
        }

        Ok(text)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = self.endpoint();
        let body = Self::build_request_body(prompt, temperature, max_tokens);

        debug!("Gemini request to model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        Self::parse_response(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_structure() {
        let body = GeminiProvider::build_request_body("whole prompt", 0.1, 4096);

        assert!(body.get("system_instruction").is_none());
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "whole prompt");

        let temp = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.1).abs() < 1e-6, "temperature should be ~0.1, got {temp}");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn test_parse_joins_text_parts() {
        let resp = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Try " }, { "text": "Dish A" }] },
                "finishReason": "STOP",
            }]
        });
        assert_eq!(GeminiProvider::parse_response(&resp).unwrap(), "Try Dish A");
    }

    #[test]
    fn test_parse_prompt_blocked() {
        let resp = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = GeminiProvider::parse_response(&resp).unwrap_err();
        assert!(matches!(err, LlmError::Blocked(ref r) if r == "SAFETY"));
    }

    #[test]
    fn test_parse_candidate_without_text() {
        let resp = json!({ "candidates": [{ "finishReason": "RECITATION" }] });
        assert!(matches!(
            GeminiProvider::parse_response(&resp).unwrap_err(),
            LlmError::Blocked(ref r) if r == "RECITATION"
        ));

        let resp = json!({ "candidates": [{ "content": { "parts": [] }, "finishReason": "STOP" }] });
        assert!(matches!(
            GeminiProvider::parse_response(&resp).unwrap_err(),
            LlmError::ParseError(_)
        ));

        assert!(matches!(
            GeminiProvider::parse_response(&json!({})).unwrap_err(),
            LlmError::ParseError(_)
        ));
    }

    #[test]
    fn test_blank_key_rejected() {
        let err = GeminiProvider::new("  ".into(), "gemini-2.5-flash".into(), "http://x".into());
        assert!(matches!(err, Err(LlmError::NotConfigured(_))));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = GeminiProvider::new(
            "key".into(),
            "gemini-2.5-flash".into(),
            "https://generativelanguage.googleapis.com/".into(),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(provider.model(), "gemini-2.5-flash");
    }
}
