use super::model::{PlatformVoice, VoiceGender, VoiceOption};

/// Voice ids served by the cloud speech service
pub const CLOUD_VOICE_IDS: [&str; 5] = ["Puck", "Charon", "Kore", "Fenrir", "Zephyr"];

pub const DEFAULT_VOICE_ID: &str = "Zephyr";

/// Static catalog of cloud voices
pub fn cloud_voices() -> Vec<VoiceOption> {
    vec![
        VoiceOption::online("Puck", VoiceGender::Male),
        VoiceOption::online("Charon", VoiceGender::Male),
        VoiceOption::online("Kore", VoiceGender::Female),
        VoiceOption::online("Fenrir", VoiceGender::Male),
        VoiceOption::online("Zephyr", VoiceGender::Female),
    ]
}

/// Whether `voice_id` names a cloud voice. Backend selection depends on this
/// predicate alone.
pub fn is_cloud_voice(voice_id: &str) -> bool {
    CLOUD_VOICE_IDS.contains(&voice_id)
}

/// Cloud voices plus whatever the platform synthesizer currently reports.
/// Ids are unique across the whole catalog.
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    cloud: Vec<VoiceOption>,
    platform: Vec<PlatformVoice>,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceCatalog {
    pub fn new() -> Self {
        Self {
            cloud: cloud_voices(),
            platform: Vec::new(),
        }
    }

    /// Replace the platform part of the catalog. Voices whose name collides
    /// with an id already present are skipped. Returns how many were kept.
    pub fn replace_platform_voices(&mut self, voices: Vec<PlatformVoice>) -> usize {
        let mut kept: Vec<PlatformVoice> = Vec::with_capacity(voices.len());

        for voice in voices {
            let taken = is_cloud_voice(&voice.name) || kept.iter().any(|v| v.name == voice.name);
            if taken {
                tracing::debug!(voice = %voice.name, "Skipping platform voice with duplicate id");
                continue;
            }
            kept.push(voice);
        }

        let count = kept.len();
        self.platform = kept;
        count
    }

    pub fn all(&self) -> Vec<VoiceOption> {
        self.cloud
            .iter()
            .cloned()
            .chain(self.platform.iter().map(VoiceOption::from))
            .collect()
    }

    pub fn find(&self, voice_id: &str) -> Option<VoiceOption> {
        self.all().into_iter().find(|v| v.id == voice_id)
    }

    pub fn contains(&self, voice_id: &str) -> bool {
        is_cloud_voice(voice_id) || self.platform_voice(voice_id).is_some()
    }

    /// Platform voice matching `voice_id`, if the synthesizer knows it
    pub fn platform_voice(&self, voice_id: &str) -> Option<&PlatformVoice> {
        self.platform.iter().find(|v| v.name == voice_id)
    }

    pub fn platform_voices(&self) -> &[PlatformVoice] {
        &self.platform
    }
}
