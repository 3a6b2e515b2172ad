pub mod error;
pub mod event;
pub mod sequencer;
pub mod state;

pub use error::PlaybackError;
pub use event::{SequencerEvent, Transition};
pub use sequencer::PlaybackSequencer;
pub use state::{PlaybackPhase, PlaybackState, MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE};
