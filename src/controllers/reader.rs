use std::fmt::Write as _;
use std::sync::Arc;

use super::command::{Command, HELP};
use crate::{
    domain::{
        playback::{PlaybackSequencer, SequencerEvent, Transition},
        reader::{Document, ReaderServiceApi},
    },
    error::{AppError, AppResult},
};

/// Longest chunk preview shown in listings
const PREVIEW_CHARS: usize = 60;

/// What the terminal should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Maps terminal commands onto the reader and the playback sequencer and
/// renders what changed
pub struct ReaderController {
    reader_service: Arc<dyn ReaderServiceApi>,
    sequencer: PlaybackSequencer,
}

impl ReaderController {
    pub fn new(reader_service: Arc<dyn ReaderServiceApi>, sequencer: PlaybackSequencer) -> Self {
        Self {
            reader_service,
            sequencer,
        }
    }

    pub fn sequencer(&self) -> &PlaybackSequencer {
        &self.sequencer
    }

    pub fn load(&mut self, document: Document) -> String {
        self.sequencer.load_document(document);
        let stats = self.sequencer.stats();
        format!(
            "Loaded {} chunks, {} words, about {}.",
            self.sequencer.chunks().len(),
            stats.total_words,
            stats.estimated_time_label
        )
    }

    pub async fn execute(&mut self, command: Command) -> AppResult<Reply> {
        tracing::debug!(command = ?command, "Executing command");

        let transition = match command {
            Command::Play => self.sequencer.play(),
            Command::Pause => self.sequencer.pause(),
            Command::Toggle => self.sequencer.toggle_play(),
            Command::Stop => self.sequencer.stop(),
            Command::Next => self.sequencer.skip_next(),
            Command::Prev => self.sequencer.skip_prev(),
            Command::Jump(index) => self.sequencer.jump_to(index),
            Command::Voice(voice_id) => self.sequencer.select_voice(&voice_id),
            Command::Quit => {
                self.sequencer.stop();
                return Ok(Reply::Quit);
            }
            other => return self.execute_other(other).await.map(Reply::Output),
        };

        Ok(Reply::Output(self.describe(transition).unwrap_or_default()))
    }

    async fn execute_other(&mut self, command: Command) -> AppResult<String> {
        let output = match command {
            Command::Voices => self.render_voices(),
            Command::RefreshVoices => {
                let count = self.sequencer.refresh_platform_voices().await?;
                format!("Found {} system voices.", count)
            }
            Command::Rate(rate) => {
                let rate = self.sequencer.set_playback_rate(rate);
                format!("Speed {:.2}x", rate)
            }
            Command::Volume(volume) => {
                let volume = self.sequencer.set_volume(volume);
                format!("Volume {:.0}%", volume * 100.0)
            }
            Command::AutoScroll(setting) => {
                let enabled = setting.unwrap_or(!self.sequencer.state().auto_scroll);
                self.sequencer.set_auto_scroll(enabled);
                format!("Auto-scroll {}", if enabled { "on" } else { "off" })
            }
            Command::Chunks => self.render_chunks(),
            Command::Stats => self.render_stats(),
            Command::Status => self.render_status(),
            Command::LoadFile(path) => {
                let document = self.reader_service.load_from_file(&path).await?;
                self.load(document)
            }
            Command::LoadUrl(url) => {
                let document = self.reader_service.load_from_url(&url).await?;
                self.load(document)
            }
            Command::LoadText(text) => {
                let document = self.reader_service.load_text(&text);
                self.load(document)
            }
            Command::Help => HELP.to_string(),
            playback => {
                return Err(AppError::BadRequest(format!(
                    "{:?} is a playback command",
                    playback
                )))
            }
        };

        Ok(output)
    }

    pub async fn next_event(&mut self) -> Option<SequencerEvent> {
        self.sequencer.next_event().await
    }

    /// Apply a backend event, returning anything worth printing
    pub fn handle_event(&mut self, event: SequencerEvent) -> Option<String> {
        let transition = self.sequencer.handle_event(event);
        self.describe(transition)
    }

    fn describe(&self, transition: Transition) -> Option<String> {
        let total = self.sequencer.chunks().len();

        match transition {
            Transition::Ignored => None,
            Transition::Loading { index } => {
                Some(format!("[{}/{}] generating audio...", index + 1, total))
            }
            Transition::Started { index } => {
                if !self.sequencer.state().auto_scroll {
                    return None;
                }
                let chunk = self.sequencer.chunks().get(index)?;
                Some(format!("[{}/{}] {}", index + 1, total, chunk.text))
            }
            Transition::Resumed { index } => Some(format!("Resumed at {}/{}", index + 1, total)),
            Transition::Paused { index } => Some(format!("Paused at {}/{}", index + 1, total)),
            Transition::Stopped => Some("Stopped.".to_string()),
            Transition::Moved { index } => Some(format!("At {}/{}", index + 1, total)),
            Transition::VoiceChanged { voice_id } => Some(format!("Voice set to {}.", voice_id)),
            Transition::Finished => Some("Finished reading.".to_string()),
            Transition::Failed { message } => Some(format!("Playback stopped: {}", message)),
        }
    }

    fn render_status(&self) -> String {
        let state = self.sequencer.state();
        let total = self.sequencer.chunks().len();
        let position = if total == 0 {
            "no text loaded".to_string()
        } else {
            format!("chunk {}/{}", state.current_chunk_index + 1, total)
        };

        let mut out = format!(
            "{} | {} | voice {} | speed {:.2}x | volume {:.0}% | auto-scroll {}",
            self.sequencer.phase(),
            position,
            state.selected_voice_id,
            state.playback_rate,
            state.volume * 100.0,
            if state.auto_scroll { "on" } else { "off" },
        );
        if let Some(error) = self.sequencer.last_error() {
            let _ = write!(out, "\nLast error: {}", error);
        }
        out
    }

    fn render_stats(&self) -> String {
        let stats = self.sequencer.stats();
        format!(
            "{} words, {} chunks, about {}",
            stats.total_words,
            self.sequencer.chunks().len(),
            stats.estimated_time_label
        )
    }

    fn render_chunks(&self) -> String {
        let current = self.sequencer.state().current_chunk_index;
        let chunks = self.sequencer.chunks();
        if chunks.is_empty() {
            return "No text loaded.".to_string();
        }

        let mut out = String::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let marker = if index == current { '>' } else { ' ' };
            let _ = writeln!(out, "{} {:>3}. {}", marker, index + 1, preview(&chunk.text));
        }
        out.trim_end().to_string()
    }

    fn render_voices(&self) -> String {
        let selected = &self.sequencer.state().selected_voice_id;
        let mut out = String::new();

        for voice in self.sequencer.catalog().all() {
            let marker = if &voice.id == selected { '*' } else { ' ' };
            let kind = if voice.is_online() { "online" } else { "system" };
            let _ = write!(out, "{} {:<24} {:<7}", marker, voice.id, kind);
            if let Some(language) = &voice.language {
                let _ = write!(out, " {}", language);
            }
            if let Some(gender) = voice.gender {
                let _ = write!(out, " {}", gender);
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}
