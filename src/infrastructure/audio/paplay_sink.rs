use super::completion::CompletionSlot;
use super::pcm::AudioBuffer;
use super::process::{PlaybackProcess, ProcessExit};
use super::sink::PcmSink;
use super::AudioError;
use tokio::process::Command;

/// Server-side buffering requested from PulseAudio. Stopping the player
/// process only silences audio once this much has drained.
const PLAYBACK_LATENCY_MS: u32 = 100;

/// Plays PCM buffers by piping raw float samples into a PulseAudio client
/// (`paplay` or a compatible program).
pub struct ProcessPcmSink {
    program: String,
    current: Option<PlaybackProcess>,
}

impl ProcessPcmSink {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: None,
        }
    }

    fn command(&self, sample_rate: u32) -> Command {
        let mut command = Command::new(&self.program);
        command.args([
            "--raw".to_string(),
            "--format=float32le".to_string(),
            "--channels=1".to_string(),
            format!("--rate={}", sample_rate),
            format!("--latency-msec={}", PLAYBACK_LATENCY_MS),
        ]);
        command
    }
}

impl PcmSink for ProcessPcmSink {
    fn start(
        &mut self,
        buffer: AudioBuffer,
        gain: f32,
        on_ended: CompletionSlot,
    ) -> Result<(), AudioError> {
        self.halt();

        let command = self.command(buffer.sample_rate());
        let data = buffer.to_f32le_bytes(gain);

        let process = PlaybackProcess::spawn(command, Some(data), move |exit| match exit {
            ProcessExit::Completed => {
                on_ended.fire();
            }
            ProcessExit::Killed => {}
            ProcessExit::Failed(reason) => {
                tracing::warn!(reason = %reason, "PCM player exited abnormally");
                on_ended.fire();
            }
        })
        .map_err(|source| AudioError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        self.current = Some(process);
        Ok(())
    }

    fn halt(&mut self) {
        if let Some(process) = self.current.take() {
            process.kill();
        }
    }

    fn suspend(&mut self) {
        if let Some(process) = &self.current {
            process.suspend();
        }
    }

    fn resume(&mut self) {
        if let Some(process) = &self.current {
            process.resume();
        }
    }
}
