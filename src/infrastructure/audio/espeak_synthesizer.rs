use super::process::{PlaybackProcess, ProcessExit};
use super::synthesizer::{
    OutcomeHandler, SpeechSynthesizer, SynthesisFailure, Utterance, UtteranceOutcome,
};
use super::AudioError;
use crate::domain::voice::{PlatformVoice, VoiceGender};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::process::Command;

/// Words per minute at rate 1.0
const BASE_WORDS_PER_MINUTE: f32 = 175.0;
const MIN_WORDS_PER_MINUTE: f32 = 80.0;
const MAX_WORDS_PER_MINUTE: f32 = 450.0;
/// Amplitude at volume 1.0
const BASE_AMPLITUDE: f32 = 100.0;

struct RunningUtterance {
    process: PlaybackProcess,
    canceled: Arc<AtomicBool>,
}

/// Platform synthesizer backed by `espeak-ng` (or a program with the same
/// command line)
pub struct ProcessSpeechSynthesizer {
    program: String,
    current: Option<RunningUtterance>,
}

impl ProcessSpeechSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: None,
        }
    }

    /// Command line for `utterance`. The text itself is written to stdin,
    /// which has no argument length limit.
    fn command(&self, utterance: &Utterance) -> Command {
        let words_per_minute = (BASE_WORDS_PER_MINUTE * utterance.rate)
            .clamp(MIN_WORDS_PER_MINUTE, MAX_WORDS_PER_MINUTE)
            .round() as u32;
        let amplitude = (BASE_AMPLITUDE * utterance.volume.clamp(0.0, 1.0)).round() as u32;

        let mut command = Command::new(&self.program);
        command
            .arg("-s")
            .arg(words_per_minute.to_string())
            .arg("-a")
            .arg(amplitude.to_string());
        if let Some(voice) = &utterance.voice {
            command.arg("-v").arg(&voice.identifier);
        }
        command.arg("--stdin");
        command
    }
}

#[async_trait]
impl SpeechSynthesizer for ProcessSpeechSynthesizer {
    fn speak(
        &mut self,
        utterance: Utterance,
        on_outcome: OutcomeHandler,
    ) -> Result<(), AudioError> {
        if let Some(previous) = self.current.take() {
            previous.canceled.store(true, Ordering::SeqCst);
            previous.process.kill();
        }

        let canceled = Arc::new(AtomicBool::new(false));
        let canceled_flag = canceled.clone();

        tracing::debug!(
            text_length = utterance.text.len(),
            voice = ?utterance.voice.as_ref().map(|v| &v.name),
            rate = utterance.rate,
            "Speaking utterance"
        );

        let command = self.command(&utterance);
        let text = utterance.text.into_bytes();

        let process = PlaybackProcess::spawn(command, Some(text), move |exit| {
            let outcome = match exit {
                ProcessExit::Completed => UtteranceOutcome::Ended,
                ProcessExit::Killed if canceled_flag.load(Ordering::SeqCst) => {
                    UtteranceOutcome::Failed(SynthesisFailure::Canceled)
                }
                ProcessExit::Killed => UtteranceOutcome::Failed(SynthesisFailure::Interrupted),
                ProcessExit::Failed(reason) => {
                    UtteranceOutcome::Failed(SynthesisFailure::Other(reason))
                }
            };
            on_outcome(outcome);
        })
        .map_err(|source| AudioError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        self.current = Some(RunningUtterance { process, canceled });
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|running| !running.process.is_finished())
    }

    fn cancel(&mut self) {
        if let Some(running) = self.current.take() {
            running.canceled.store(true, Ordering::SeqCst);
            running.process.kill();
        }
    }

    fn pause(&mut self) {
        if let Some(running) = &self.current {
            running.process.suspend();
        }
    }

    fn resume(&mut self) {
        if let Some(running) = &self.current {
            running.process.resume();
        }
    }

    async fn voices(&self) -> Result<Vec<PlatformVoice>, AudioError> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .output()
            .await
            .map_err(|source| AudioError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AudioError::Synthesizer(format!(
                "{} --voices exited with {}",
                self.program, output.status
            )));
        }

        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
/// ```
pub fn parse_voice_list(output: &str) -> Vec<PlatformVoice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 4 {
                return None;
            }

            let gender = match columns[2].rsplit('/').next() {
                Some("M") => Some(VoiceGender::Male),
                Some("F") => Some(VoiceGender::Female),
                _ => None,
            };

            Some(PlatformVoice {
                name: columns[3].to_string(),
                identifier: columns[1].to_string(),
                language: Some(columns[1].to_string()),
                gender,
            })
        })
        .collect()
}
