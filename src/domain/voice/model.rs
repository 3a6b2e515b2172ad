use serde::{Deserialize, Serialize};

/// Where a voice's audio comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoiceKind {
    /// Cloud neural voice, audio arrives as PCM buffers
    Online,
    /// Platform speech synthesizer
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceGender {
    Male,
    Female,
    Neutral,
}

impl std::fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VoiceGender::Male => "Male",
            VoiceGender::Female => "Female",
            VoiceGender::Neutral => "Neutral",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceOption {
    pub id: String,
    pub display_name: String,
    pub kind: VoiceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<VoiceGender>,
}

impl VoiceOption {
    pub fn online(id: &str, gender: VoiceGender) -> Self {
        Self {
            id: id.to_string(),
            display_name: format!("{} (Gemini)", id),
            kind: VoiceKind::Online,
            language: None,
            gender: Some(gender),
        }
    }

    pub fn is_online(&self) -> bool {
        self.kind == VoiceKind::Online
    }
}

/// A voice reported by the platform speech synthesizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformVoice {
    /// Human readable name, also used as the voice id in the catalog
    pub name: String,
    /// Identifier the synthesizer understands when selecting this voice
    pub identifier: String,
    pub language: Option<String>,
    pub gender: Option<VoiceGender>,
}

impl From<&PlatformVoice> for VoiceOption {
    fn from(voice: &PlatformVoice) -> Self {
        Self {
            id: voice.name.clone(),
            display_name: voice.name.clone(),
            kind: VoiceKind::Offline,
            language: voice.language.clone(),
            gender: voice.gender,
        }
    }
}
