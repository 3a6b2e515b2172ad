use serde::{Deserialize, Serialize};

pub const MIN_PLAYBACK_RATE: f32 = 0.5;
pub const MAX_PLAYBACK_RATE: f32 = 2.0;

/// Where the sequencer is in its play/advance cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    Idle,
    /// Waiting for the backend to produce audio for the current chunk
    Loading,
    PlayingChunk,
    Paused,
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PlaybackPhase::Idle => "idle",
            PlaybackPhase::Loading => "loading",
            PlaybackPhase::PlayingChunk => "playing",
            PlaybackPhase::Paused => "paused",
        };
        write!(f, "{}", label)
    }
}

/// The single playback record of a reading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub is_loading: bool,
    pub current_chunk_index: usize,
    pub playback_rate: f32,
    pub volume: f32,
    pub selected_voice_id: String,
    pub auto_scroll: bool,
}

impl PlaybackState {
    pub fn new(selected_voice_id: impl Into<String>) -> Self {
        Self {
            is_playing: false,
            is_loading: false,
            current_chunk_index: 0,
            playback_rate: 1.0,
            volume: 1.0,
            selected_voice_id: selected_voice_id.into(),
            auto_scroll: true,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.playback_rate = clamp_rate(rate);
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = clamp_volume(volume);
        self
    }

    pub fn with_auto_scroll(mut self, auto_scroll: bool) -> Self {
        self.auto_scroll = auto_scroll;
        self
    }
}

pub fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        return 1.0;
    }
    rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
}

pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 1.0;
    }
    volume.clamp(0.0, 1.0)
}
