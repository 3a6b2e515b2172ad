use super::error::SpeechServiceError;
use crate::infrastructure::repositories::SpeechRepository;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Generated PCM audio, shared between the cache and playback
pub type SpeechAudio = Arc<Vec<u8>>;

/// Cloud speech generation with an optional in-memory cache keyed by
/// `(voice, text)`. Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct SpeechService {
    speech_repo: Arc<dyn SpeechRepository>,
    cache: Option<Cache<(String, String), SpeechAudio>>,
}

impl SpeechService {
    pub fn new(speech_repo: Arc<dyn SpeechRepository>, cache_enabled: bool) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(256)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self { speech_repo, cache }
    }

    /// Whether credentials are configured for the cloud service
    pub fn is_available(&self) -> bool {
        self.speech_repo.is_available()
    }

    /// Raw 16-bit PCM for `text` spoken by `voice_id`
    pub async fn generate(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<SpeechAudio, SpeechServiceError> {
        let key = (voice_id.to_string(), text.to_string());

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key).await {
                tracing::info!(
                    voice = voice_id,
                    cached_audio_size = cached.len(),
                    "Speech cache hit - returning cached audio"
                );
                return Ok(cached);
            }
        }

        let audio = Arc::new(self.speech_repo.generate_speech(text, voice_id).await?);

        if audio.is_empty() {
            return Err(SpeechServiceError::Dependency(
                "speech service returned empty audio".to_string(),
            ));
        }

        if let Some(cache) = &self.cache {
            cache.insert(key, audio.clone()).await;
            tracing::debug!(voice = voice_id, audio_size = audio.len(), "Speech audio cached");
        }

        Ok(audio)
    }
}
