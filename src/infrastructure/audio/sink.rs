use super::completion::CompletionSlot;
use super::pcm::AudioBuffer;
use super::AudioError;

/// Output device for decoded PCM buffers.
///
/// Implementations fire `on_ended` when a buffer finishes playing on its own.
/// They may fire it after `halt` as well; the player detaches the slot first.
pub trait PcmSink: Send + Sync {
    /// Play `buffer` once at `gain`, replacing whatever was playing
    fn start(
        &mut self,
        buffer: AudioBuffer,
        gain: f32,
        on_ended: CompletionSlot,
    ) -> Result<(), AudioError>;

    /// Stop playback immediately. No-op when idle.
    fn halt(&mut self);

    /// Suspend playback, keeping the position
    fn suspend(&mut self);

    fn resume(&mut self);
}
