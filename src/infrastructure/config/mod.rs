use crate::domain::voice::DEFAULT_VOICE_ID;
use serde::Deserialize;
use std::env;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("could not build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gemini: GeminiSettings,
    pub default_voice: String,
    pub playback_rate: f32,
    pub volume: f32,
    pub auto_scroll: bool,
    pub audio_cache_enabled: bool,
    pub pcm_player: String,
    pub speech_synthesizer: String,
    pub log_format: LogFormat,
}

/// Connection settings for the Gemini REST API
#[derive(Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub tts_model: String,
    pub text_model: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("tts_model", &self.tts_model)
            .field("text_model", &self.text_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let config = Config {
            gemini: GeminiSettings {
                api_key,
                base_url: env::var("GEMINI_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
                tts_model: env::var("GEMINI_TTS_MODEL")
                    .unwrap_or_else(|_| DEFAULT_TTS_MODEL.to_string()),
                text_model: env::var("GEMINI_TEXT_MODEL")
                    .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
                timeout_secs: parse_var("GEMINI_TIMEOUT_SECS", 60)?,
            },
            default_voice: env::var("DEFAULT_VOICE")
                .unwrap_or_else(|_| DEFAULT_VOICE_ID.to_string()),
            playback_rate: parse_var("PLAYBACK_RATE", 1.0)?,
            volume: parse_var("VOLUME", 1.0)?,
            auto_scroll: parse_flag("AUTO_SCROLL", true),
            audio_cache_enabled: parse_flag("AUDIO_CACHE_ENABLED", true),
            pcm_player: env::var("PCM_PLAYER").unwrap_or_else(|_| "paplay".to_string()),
            speech_synthesizer: env::var("SPEECH_SYNTHESIZER")
                .unwrap_or_else(|_| "espeak-ng".to_string()),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(LogFormat::Pretty),
        };

        Ok(config)
    }

    pub fn has_cloud_credentials(&self) -> bool {
        self.gemini.api_key.is_some()
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}
