use crate::config::Config;
use crate::errors::AppError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Client for the Gemini generateContent API.
///
/// Model identifier and sampling temperature are fixed at construction time;
/// there are no per-request overrides.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Creates a new `GeminiClient` from the application config.
    ///
    /// Fails with `UpstreamConfigError` when the API key is missing, so a
    /// misconfigured deployment is caught before any request is accepted.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        if config.google_api_key.trim().is_empty() {
            return Err(AppError::UpstreamConfigError(
                "Missing Google API key".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| {
                AppError::ModelInvocationError(format!("Failed to create Gemini client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.gemini_base_url.clone(),
            api_key: config.google_api_key.clone(),
            model: config.gemini_model.clone(),
            temperature: config.gemini_temperature,
        })
    }

    /// Sends a prompt to the model and returns the full text completion.
    ///
    /// Non-streaming: the whole completion is awaited within the request
    /// scope. Transport, auth and quota failures all surface as
    /// `ModelInvocationError`; no retries happen here.
    pub async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        tracing::info!("Invoking model {} ({} prompt chars)", self.model, prompt.chars().count());

        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "temperature": self.temperature
            }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ModelInvocationError(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ModelInvocationError(format!(
                "Gemini returned {}: {}",
                status, error_text
            )));
        }

        let result: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::ModelInvocationError(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::ModelInvocationError(
                "Gemini response contained no text candidates".to_string(),
            ));
        }

        tracing::debug!("Model returned {} chars", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_key: &str) -> Config {
        Config {
            port: 3000,
            google_api_key: api_key.to_string(),
            gemini_base_url: "https://example.com".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_temperature: 0.2,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new(&test_config("key"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_empty_key_is_config_error() {
        let err = GeminiClient::new(&test_config("  ")).unwrap_err();
        assert!(matches!(err, AppError::UpstreamConfigError(_)));
    }
}
