use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use voxstream_reader::domain::voice::PlatformVoice;
use voxstream_reader::infrastructure::audio::{
    AudioBuffer, AudioError, CompletionSlot, OutcomeHandler, PcmSink, SpeechSynthesizer,
    SynthesisFailure, Utterance, UtteranceOutcome,
};
use voxstream_reader::infrastructure::repositories::{SpeechRepository, SpeechRepositoryError};

/// Buffer started on the fake sink
#[derive(Debug, Clone, PartialEq)]
pub struct StartedBuffer {
    pub samples: usize,
    pub gain: f32,
}

#[derive(Default)]
struct SinkLog {
    started: Vec<StartedBuffer>,
    halts: usize,
    suspends: usize,
    resumes: usize,
    pending: Option<CompletionSlot>,
    auto_complete: bool,
}

/// PCM sink that records calls instead of making sound. Buffers end when the
/// test says so, or at once in auto-complete mode.
pub struct FakePcmSink {
    log: Arc<Mutex<SinkLog>>,
}

#[derive(Clone)]
pub struct FakeSinkHandle {
    log: Arc<Mutex<SinkLog>>,
}

impl FakePcmSink {
    pub fn new() -> (Self, FakeSinkHandle) {
        let log = Arc::new(Mutex::new(SinkLog::default()));
        (Self { log: log.clone() }, FakeSinkHandle { log })
    }
}

impl PcmSink for FakePcmSink {
    fn start(
        &mut self,
        buffer: AudioBuffer,
        gain: f32,
        on_ended: CompletionSlot,
    ) -> Result<(), AudioError> {
        let auto_complete = {
            let mut log = self.log.lock();
            log.started.push(StartedBuffer {
                samples: buffer.samples().len(),
                gain,
            });
            if !log.auto_complete {
                log.pending = Some(on_ended.clone());
            }
            log.auto_complete
        };

        if auto_complete {
            on_ended.fire();
        }
        Ok(())
    }

    fn halt(&mut self) {
        let mut log = self.log.lock();
        log.halts += 1;
        log.pending = None;
    }

    fn suspend(&mut self) {
        self.log.lock().suspends += 1;
    }

    fn resume(&mut self) {
        self.log.lock().resumes += 1;
    }
}

#[allow(dead_code)]
impl FakeSinkHandle {
    pub fn set_auto_complete(&self, auto_complete: bool) {
        self.log.lock().auto_complete = auto_complete;
    }

    /// End the current buffer naturally. Returns whether a callback ran.
    pub fn finish(&self) -> bool {
        let pending = self.log.lock().pending.take();
        pending.map(|slot| slot.fire()).unwrap_or(false)
    }

    /// The slot of the buffer currently held, kept even after `halt`
    pub fn pending_slot(&self) -> Option<CompletionSlot> {
        self.log.lock().pending.clone()
    }

    pub fn started(&self) -> Vec<StartedBuffer> {
        self.log.lock().started.clone()
    }

    pub fn halts(&self) -> usize {
        self.log.lock().halts
    }

    pub fn suspends(&self) -> usize {
        self.log.lock().suspends
    }

    pub fn resumes(&self) -> usize {
        self.log.lock().resumes
    }
}

#[derive(Default)]
struct SynthLog {
    spoken: Vec<Utterance>,
    pending: Option<OutcomeHandler>,
    cancels: usize,
    pauses: usize,
    resumes: usize,
    voices: Vec<PlatformVoice>,
    auto_end: bool,
}

/// Platform synthesizer stand-in. Canceling a pending utterance reports
/// `Canceled`, like real engines do.
pub struct FakeSynthesizer {
    log: Arc<Mutex<SynthLog>>,
}

#[derive(Clone)]
pub struct FakeSynthesizerHandle {
    log: Arc<Mutex<SynthLog>>,
}

impl FakeSynthesizer {
    pub fn new(voices: Vec<PlatformVoice>) -> (Self, FakeSynthesizerHandle) {
        let log = Arc::new(Mutex::new(SynthLog {
            voices,
            ..SynthLog::default()
        }));
        (Self { log: log.clone() }, FakeSynthesizerHandle { log })
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    fn speak(
        &mut self,
        utterance: Utterance,
        on_outcome: OutcomeHandler,
    ) -> Result<(), AudioError> {
        let immediate = {
            let mut log = self.log.lock();
            log.spoken.push(utterance);
            if log.auto_end {
                Some(on_outcome)
            } else {
                log.pending = Some(on_outcome);
                None
            }
        };

        if let Some(on_outcome) = immediate {
            on_outcome(UtteranceOutcome::Ended);
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.log.lock().pending.is_some()
    }

    fn cancel(&mut self) {
        let pending = {
            let mut log = self.log.lock();
            log.cancels += 1;
            log.pending.take()
        };
        if let Some(on_outcome) = pending {
            on_outcome(UtteranceOutcome::Failed(SynthesisFailure::Canceled));
        }
    }

    fn pause(&mut self) {
        self.log.lock().pauses += 1;
    }

    fn resume(&mut self) {
        self.log.lock().resumes += 1;
    }

    async fn voices(&self) -> Result<Vec<PlatformVoice>, AudioError> {
        Ok(self.log.lock().voices.clone())
    }
}

#[allow(dead_code)]
impl FakeSynthesizerHandle {
    pub fn set_auto_end(&self, auto_end: bool) {
        self.log.lock().auto_end = auto_end;
    }

    /// Report the pending utterance as spoken to the end
    pub fn finish(&self) -> bool {
        self.report(UtteranceOutcome::Ended)
    }

    pub fn fail(&self, failure: SynthesisFailure) -> bool {
        self.report(UtteranceOutcome::Failed(failure))
    }

    fn report(&self, outcome: UtteranceOutcome) -> bool {
        let pending = self.log.lock().pending.take();
        match pending {
            Some(on_outcome) => {
                on_outcome(outcome);
                true
            }
            None => false,
        }
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.log.lock().spoken.clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.log
            .lock()
            .spoken
            .iter()
            .map(|utterance| utterance.text.clone())
            .collect()
    }

    pub fn cancels(&self) -> usize {
        self.log.lock().cancels
    }

    pub fn pauses(&self) -> usize {
        self.log.lock().pauses
    }

    pub fn resumes(&self) -> usize {
        self.log.lock().resumes
    }
}

/// Cloud speech stand-in. Returns `audio` for every request unless a failure
/// is scripted; requests can be held until the test releases them.
pub struct ScriptedSpeechRepository {
    available: bool,
    audio: Mutex<Vec<u8>>,
    failure: Mutex<Option<String>>,
    gated: AtomicBool,
    gate: Semaphore,
    requests: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl ScriptedSpeechRepository {
    pub fn new(available: bool) -> Arc<Self> {
        Arc::new(Self {
            available,
            // 100 ms of silence at 24 kHz
            audio: Mutex::new(vec![0u8; 4_800]),
            failure: Mutex::new(None),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn set_audio(&self, audio: Vec<u8>) {
        *self.audio.lock() = audio;
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    /// Hold every request until `release` is called
    pub fn hold_responses(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    /// Let one held request complete, whenever it arrives
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    /// `(voice, text)` of every request so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl SpeechRepository for ScriptedSpeechRepository {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate_speech(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, SpeechRepositoryError> {
        self.requests
            .lock()
            .push((voice_id.to_string(), text.to_string()));

        if self.gated.load(Ordering::SeqCst) {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }

        if let Some(message) = self.failure.lock().clone() {
            return Err(SpeechRepositoryError::Request(message));
        }
        Ok(self.audio.lock().clone())
    }
}
