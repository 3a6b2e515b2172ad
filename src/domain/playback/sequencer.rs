use super::error::PlaybackError;
use super::event::{SequencerEvent, Transition};
use super::state::{clamp_rate, clamp_volume, PlaybackPhase, PlaybackState};
use crate::domain::reader::{Document, ProcessingStats, TextChunk};
use crate::domain::speech::{SpeechAudio, SpeechService, SpeechServiceError};
use crate::domain::voice::{is_cloud_voice, VoiceCatalog};
use crate::infrastructure::audio::{AudioError, AudioPlayer, OnEnded};
use tokio::sync::mpsc;

/// What `play` does after a pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResumeAction {
    None,
    /// Audio is suspended mid-chunk
    ContinueAudio,
    /// Paused before audio arrived; the chunk starts over
    RestartChunk,
    /// The chunk ended while paused
    Advance,
}

/// Drives chunk-by-chunk playback of a document.
///
/// Every chunk start, stop, skip, voice change and load opens a new session.
/// Backend events from an older session are dropped, so a late cloud response
/// or a completion callback from a stopped stream can never move playback.
pub struct PlaybackSequencer {
    speech: SpeechService,
    player: AudioPlayer,
    catalog: VoiceCatalog,
    document: Document,
    state: PlaybackState,
    phase: PlaybackPhase,
    session: u64,
    resume_action: ResumeAction,
    last_error: Option<String>,
    events_tx: mpsc::UnboundedSender<SequencerEvent>,
    events_rx: mpsc::UnboundedReceiver<SequencerEvent>,
}

impl PlaybackSequencer {
    pub fn new(speech: SpeechService, player: AudioPlayer, state: PlaybackState) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            speech,
            player,
            catalog: VoiceCatalog::new(),
            document: Document::default(),
            state,
            phase: PlaybackPhase::Idle,
            session: 0,
            resume_action: ResumeAction::None,
            last_error: None,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn chunks(&self) -> &[TextChunk] {
        &self.document.chunks
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.document.stats
    }

    pub fn current_chunk(&self) -> Option<&TextChunk> {
        self.document.chunks.get(self.state.current_chunk_index)
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Message of the most recent playback failure, cleared by the next load
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the document. Stops playback and resets the index.
    pub fn load_document(&mut self, document: Document) {
        self.halt();
        self.document = document;
        self.state.current_chunk_index = 0;
        self.last_error = None;

        tracing::info!(
            chunk_count = self.document.chunks.len(),
            total_words = self.document.stats.total_words,
            "Document loaded into sequencer"
        );
    }

    /// Start or resume playback at the current chunk
    pub fn play(&mut self) -> Transition {
        if self.document.is_empty() {
            tracing::debug!("Play requested with no chunks");
            self.state.is_playing = false;
            return Transition::Ignored;
        }

        match self.phase {
            PlaybackPhase::Idle => {
                self.state.is_playing = true;
                self.begin_chunk()
            }
            PlaybackPhase::Paused => self.resume(),
            PlaybackPhase::Loading | PlaybackPhase::PlayingChunk => Transition::Ignored,
        }
    }

    pub fn pause(&mut self) -> Transition {
        let index = self.state.current_chunk_index;

        match self.phase {
            PlaybackPhase::PlayingChunk => {
                self.player.pause();
                self.resume_action = ResumeAction::ContinueAudio;
            }
            PlaybackPhase::Loading => {
                // the in-flight response is dropped; resume requests it again
                self.session += 1;
                self.state.is_loading = false;
                self.resume_action = ResumeAction::RestartChunk;
            }
            PlaybackPhase::Idle | PlaybackPhase::Paused => return Transition::Ignored,
        }

        self.phase = PlaybackPhase::Paused;
        self.state.is_playing = false;
        tracing::debug!(index, "Playback paused");
        Transition::Paused { index }
    }

    pub fn toggle_play(&mut self) -> Transition {
        if self.state.is_playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Halt audio and keep the index. Idempotent.
    pub fn stop(&mut self) -> Transition {
        self.halt();
        tracing::debug!(index = self.state.current_chunk_index, "Playback stopped");
        Transition::Stopped
    }

    pub fn skip_next(&mut self) -> Transition {
        let target = self.state.current_chunk_index.saturating_add(1);
        self.jump_to(target)
    }

    pub fn skip_prev(&mut self) -> Transition {
        let target = self.state.current_chunk_index.saturating_sub(1);
        self.jump_to(target)
    }

    /// Move to `index`, clamped to the chunk list. Playback continues at the
    /// new chunk only if it was playing before the jump.
    pub fn jump_to(&mut self, index: usize) -> Transition {
        if self.document.is_empty() {
            self.state.current_chunk_index = 0;
            return Transition::Ignored;
        }

        let was_playing = self.state.is_playing;
        self.halt();

        let last = self.document.chunks.len() - 1;
        self.state.current_chunk_index = index.min(last);

        if was_playing {
            self.state.is_playing = true;
            self.begin_chunk()
        } else {
            Transition::Moved {
                index: self.state.current_chunk_index,
            }
        }
    }

    /// Switch voice. Playback stops and does not restart on its own.
    pub fn select_voice(&mut self, voice_id: &str) -> Transition {
        if !self.catalog.contains(voice_id) {
            tracing::warn!(voice = voice_id, "Selected voice is not in the catalog");
        }

        self.halt();
        self.state.selected_voice_id = voice_id.to_string();
        tracing::info!(voice = voice_id, "Voice selected");

        Transition::VoiceChanged {
            voice_id: voice_id.to_string(),
        }
    }

    /// Takes effect from the next chunk
    pub fn set_playback_rate(&mut self, rate: f32) -> f32 {
        self.state.playback_rate = clamp_rate(rate);
        self.state.playback_rate
    }

    /// Takes effect from the next chunk
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.state.volume = clamp_volume(volume);
        self.state.volume
    }

    pub fn set_auto_scroll(&mut self, auto_scroll: bool) {
        self.state.auto_scroll = auto_scroll;
    }

    /// Re-read the platform voice list into the catalog
    pub async fn refresh_platform_voices(&mut self) -> Result<usize, AudioError> {
        let voices = self.player.platform_voices().await?;
        let kept = self.catalog.replace_platform_voices(voices);
        tracing::info!(platform_voices = kept, "Platform voices refreshed");
        Ok(kept)
    }

    /// Wait for the next backend event
    pub async fn next_event(&mut self) -> Option<SequencerEvent> {
        self.events_rx.recv().await
    }

    /// Wait for the next backend event and apply it
    pub async fn step(&mut self) -> Option<Transition> {
        let event = self.next_event().await?;
        Some(self.handle_event(event))
    }

    pub fn handle_event(&mut self, event: SequencerEvent) -> Transition {
        if event.session() != self.session {
            tracing::debug!(
                event_session = event.session(),
                current_session = self.session,
                "Discarding event from superseded session"
            );
            return Transition::Ignored;
        }

        match event {
            SequencerEvent::SpeechReady { session, result } => {
                if self.phase != PlaybackPhase::Loading || !self.state.is_playing {
                    return Transition::Ignored;
                }
                self.state.is_loading = false;

                match result {
                    Ok(audio) => self.start_buffer(session, audio),
                    Err(e) => self.fail(e.into()),
                }
            }
            SequencerEvent::ChunkEnded { .. } => match self.phase {
                PlaybackPhase::PlayingChunk => self.advance(),
                PlaybackPhase::Paused => {
                    self.resume_action = ResumeAction::Advance;
                    Transition::Ignored
                }
                PlaybackPhase::Idle | PlaybackPhase::Loading => Transition::Ignored,
            },
        }
    }

    fn resume(&mut self) -> Transition {
        let index = self.state.current_chunk_index;
        self.state.is_playing = true;

        match std::mem::replace(&mut self.resume_action, ResumeAction::None) {
            ResumeAction::ContinueAudio => {
                self.player.resume();
                self.phase = PlaybackPhase::PlayingChunk;
                Transition::Resumed { index }
            }
            ResumeAction::Advance => self.advance(),
            ResumeAction::RestartChunk | ResumeAction::None => self.begin_chunk(),
        }
    }

    /// Request or start audio for the current chunk
    fn begin_chunk(&mut self) -> Transition {
        let index = self.state.current_chunk_index;
        let Some(chunk) = self.document.chunks.get(index) else {
            self.state.is_playing = false;
            self.phase = PlaybackPhase::Idle;
            return Transition::Ignored;
        };
        let text = chunk.text.clone();

        self.session += 1;
        let session = self.session;
        self.resume_action = ResumeAction::None;
        let voice_id = self.state.selected_voice_id.clone();

        if is_cloud_voice(&voice_id) {
            if !self.speech.is_available() {
                return self.fail(SpeechServiceError::Unavailable.into());
            }

            self.state.is_loading = true;
            self.phase = PlaybackPhase::Loading;
            tracing::debug!(index, voice = %voice_id, "Requesting cloud speech");

            let speech = self.speech.clone();
            let events_tx = self.events_tx.clone();
            tokio::spawn(async move {
                let result = speech.generate(&text, &voice_id).await;
                // receiver lives as long as the sequencer
                let _ = events_tx.send(SequencerEvent::SpeechReady { session, result });
            });

            return Transition::Loading { index };
        }

        self.state.is_loading = false;
        let voice = self.catalog.platform_voice(&voice_id).cloned();
        if voice.is_none() {
            tracing::debug!(voice = %voice_id, "Unknown platform voice, using synthesizer default");
        }

        let on_ended = self.completion(session);
        match self.player.play_utterance(
            &text,
            voice,
            self.state.playback_rate,
            self.state.volume,
            on_ended,
        ) {
            Ok(()) => {
                self.phase = PlaybackPhase::PlayingChunk;
                tracing::debug!(index, voice = %voice_id, "Speaking chunk");
                Transition::Started { index }
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn start_buffer(&mut self, session: u64, audio: SpeechAudio) -> Transition {
        let index = self.state.current_chunk_index;
        let on_ended = self.completion(session);

        match self.player.play_pcm(&audio, self.state.volume, on_ended) {
            Ok(()) => {
                self.phase = PlaybackPhase::PlayingChunk;
                Transition::Started { index }
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn advance(&mut self) -> Transition {
        let next = self.state.current_chunk_index + 1;

        if next >= self.document.chunks.len() {
            self.halt();
            self.state.current_chunk_index = 0;
            tracing::info!("Reached end of document");
            return Transition::Finished;
        }

        self.state.current_chunk_index = next;
        self.begin_chunk()
    }

    fn completion(&self, session: u64) -> OnEnded {
        let events_tx = self.events_tx.clone();
        Box::new(move || {
            let _ = events_tx.send(SequencerEvent::ChunkEnded { session });
        })
    }

    fn fail(&mut self, error: PlaybackError) -> Transition {
        tracing::error!(
            error = %error,
            index = self.state.current_chunk_index,
            voice = %self.state.selected_voice_id,
            "Playback failed"
        );

        self.halt();
        let message = error.to_string();
        self.last_error = Some(message.clone());
        Transition::Failed { message }
    }

    /// Silence audio, drop pending events and return to idle. Keeps the index.
    fn halt(&mut self) {
        self.player.stop();
        self.session += 1;
        self.state.is_playing = false;
        self.state.is_loading = false;
        self.phase = PlaybackPhase::Idle;
        self.resume_action = ResumeAction::None;
    }
}
