//! Gemini `generateContent` provider
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::{EnhanceError, EnhancementProvider};
use crate::config::EnhancementConfig;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";
const PLACEHOLDER_KEY: &str = "your_gemini_api_key_here";
const JSON_ONLY_SUFFIX: &str =
    "\n\n응답은 반드시 유효한 JSON 형식으로만 답변해주세요. 다른 텍스트는 포함하지 마세요.";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Provider backed by the Gemini REST API
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, EnhanceError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Read the API key from the configured environment variable
    pub fn from_config(config: &EnhancementConfig) -> Result<Self, EnhanceError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty() && key != PLACEHOLDER_KEY)
            .ok_or_else(|| EnhanceError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(api_key, config.model.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }

    fn request(&self, body: &GenerateRequest<'_>) -> RequestBuilder {
        self.client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
    }
}

impl EnhancementProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, EnhanceError> {
        let text = format!("{}{}", prompt, JSON_ONLY_SUFFIX);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &text }],
            }],
        };

        tracing::debug!("Sending {} chars to {}", text.chars().count(), self.model);

        let response: GenerateResponse = self
            .request(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(EnhanceError::EmptyResponse);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let provider = GeminiProvider::new("k", "gemini-1.5-flash").unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_key_sent_as_header() {
        let provider = GeminiProvider::new("secret-key-123", "gemini-1.5-flash").unwrap();
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
        };
        let request = provider.request(&body).build().unwrap();

        assert_eq!(request.url().query(), None);
        assert!(!request.url().as_str().contains("secret-key-123"));
        assert_eq!(
            request.headers().get(API_KEY_HEADER).unwrap(),
            "secret-key-123"
        );
    }

    #[tokio::test]
    async fn test_http_error_hides_key() {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let err = client
            .get("http://127.0.0.1:1/v1beta/models/m:generateContent?key=secret-key-123")
            .send()
            .await
            .unwrap_err();
        assert!(format!("{}", err).contains("secret-key-123"));

        let err = EnhanceError::from(err);
        assert!(matches!(err, EnhanceError::Http(_)));
        assert!(!format!("{}", err).contains("secret-key-123"));
        assert!(!format!("{:?}", err).contains("secret-key-123"));
    }

    #[test]
    fn test_missing_key() {
        let config = EnhancementConfig {
            api_key_env: "REVIEWLENS_TEST_GEMINI_KEY_NEVER_SET".to_string(),
            ..EnhancementConfig::default()
        };
        assert!(matches!(
            GeminiProvider::from_config(&config),
            Err(EnhanceError::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_response_shape() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"{\"summary\":"},{"text":"\"ok\"}"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let parts = &response.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text, "{\"summary\":");
    }
}
