pub mod catalog;
pub mod model;

pub use catalog::{cloud_voices, is_cloud_voice, VoiceCatalog, CLOUD_VOICE_IDS, DEFAULT_VOICE_ID};
pub use model::{PlatformVoice, VoiceGender, VoiceKind, VoiceOption};
