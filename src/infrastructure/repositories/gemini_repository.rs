use super::extraction_repository::{ExtractionError, ExtractionRepository};
use super::speech_repository::{SpeechRepository, SpeechRepositoryError};
use crate::infrastructure::config::GeminiSettings;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini REST implementation of the speech and extraction repositories
pub struct GeminiRepository {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiRepository {
    pub fn new(settings: GeminiSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { client, settings })
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            model
        )
    }

    /// POST a generateContent request and parse the response body
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        body: &Value,
    ) -> Result<GenerateContentResponse, String> {
        let response = self
            .client
            .post(self.generate_url(model))
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = model, "Gemini request failed");
                format!("Gemini request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status.as_u16(),
                model = model,
                body = %preview(&error_body),
                "Gemini returned an error status"
            );
            return Err(format!("Gemini returned HTTP {}", status.as_u16()));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| format!("Invalid Gemini response: {}", e))
    }
}

#[async_trait]
impl SpeechRepository for GeminiRepository {
    fn is_available(&self) -> bool {
        self.settings.api_key.is_some()
    }

    async fn generate_speech(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, SpeechRepositoryError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(SpeechRepositoryError::Unavailable)?;

        tracing::info!(
            model = %self.settings.tts_model,
            voice = voice_id,
            text_length = text.len(),
            text_preview = %preview(text),
            "Calling Gemini speech generation"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": voice_id }
                    }
                }
            }
        });

        let response = self
            .generate_content(api_key, &self.settings.tts_model, &body)
            .await
            .map_err(SpeechRepositoryError::Request)?;

        let inline = response
            .parts()
            .find_map(|part| part.inline_data.as_ref())
            .ok_or(SpeechRepositoryError::NoAudio)?;

        let audio = STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| SpeechRepositoryError::Decode(e.to_string()))?;

        tracing::debug!(
            audio_size = audio.len(),
            mime_type = ?inline.mime_type,
            "Gemini speech generation successful"
        );

        Ok(audio)
    }
}

#[async_trait]
impl ExtractionRepository for GeminiRepository {
    async fn extract_text(&self, url: &str) -> Result<String, ExtractionError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(ExtractionError::Unavailable)?;

        let prompt = format!(
            "Please extract the main readable article or content text from this URL: {}. \
             Ignore navigation, footers, and ads. \
             Return ONLY the raw text content, no markdown formatting wrapping (like ```).",
            url
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "tools": [{ "google_search": {} }]
        });

        let response = self
            .generate_content(api_key, &self.settings.text_model, &body)
            .await
            .map_err(ExtractionError::Request)?;

        let text = response
            .parts()
            .filter_map(|part| part.text.as_deref())
            .collect::<String>();

        if text.trim().is_empty() {
            return Err(ExtractionError::NoContent);
        }

        tracing::info!(url = url, text_length = text.len(), "Article text extracted");
        Ok(text)
    }
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|content| content.parts.iter())
    }
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
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}
