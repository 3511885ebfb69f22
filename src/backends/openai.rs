use super::{http_client, truncate_body, write_asset, GenerationBackend};
use crate::config_loader::{Secret, Settings};
use crate::error::{AssetError, Result};
use reqwest::blocking::Client;
use serde_json::json;
use std::path::Path;

/// Paid speech synthesis through the OpenAI audio API.
pub struct OpenAiBackend {
    client: Client,
    url: String,
    api_key: Secret,
    model: String,
    voice: String,
    // Slightly slower than normal for children
    speed: f32,
}

impl OpenAiBackend {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if settings.openai_api_key.is_empty() {
            return Err(AssetError::BackendUnavailable(
                "OpenAI API key not configured. Set SINBAD_OPENAI_API_KEY or OPENAI_API_KEY"
                    .to_string(),
            ));
        }

        Ok(Self {
            client: http_client(settings)?,
            url: settings.openai_url.clone(),
            api_key: settings.openai_api_key.clone(),
            model: settings.openai_model.clone(),
            voice: settings.openai_voice.clone(),
            speed: settings.openai_speed,
        })
    }

    pub fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose())
            .json(&json!({
                "model": self.model,
                "voice": self.voice,
                "input": text,
                "speed": self.speed,
            }))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AssetError::Backend(format!(
                "OpenAI returned {}: {}",
                status,
                truncate_body(&body, 200)
            )));
        }
        Ok(resp.bytes()?.to_vec())
    }
}

impl GenerationBackend for OpenAiBackend {
    fn id(&self) -> &'static str {
        "openai"
    }

    fn generate(&self, text: &str, output: &Path) -> Result<()> {
        let audio = self.synthesize(text)?;
        write_asset(output, &audio)
    }
}
