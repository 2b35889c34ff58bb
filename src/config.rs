use serde::Deserialize;

/// Default Gemini API host. Overridable via `GEMINI_BASE_URL` so tests can
/// point the client at a mock server.
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier used by the analyzer.
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub google_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    /// Sampling temperature for the model. Kept low so the structured JSON
    /// output stays consistent between runs.
    pub gemini_temperature: f32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            google_api_key: std::env::var("GOOGLE_API_KEY")
                .map_err(|_| anyhow::anyhow!("GOOGLE_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("GOOGLE_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("GEMINI_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.trim_end_matches('/').to_string())
                })
                .transpose()?
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_temperature: std::env::var("GEMINI_TEMPERATURE")
                .unwrap_or_else(|_| "0.2".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("GEMINI_TEMPERATURE must be a valid float"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Gemini base URL: {}", config.gemini_base_url);
        tracing::debug!("Gemini model: {}", config.gemini_model);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
