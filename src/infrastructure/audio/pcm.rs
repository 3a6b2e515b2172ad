use super::AudioError;

/// Sample rate of the PCM audio produced by the cloud speech service
pub const PCM_SAMPLE_RATE: u32 = 24_000;

/// Decoded mono audio, samples normalized to [-1.0, 1.0]
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Decode raw little-endian signed 16-bit mono PCM at 24 kHz
    pub fn from_pcm16le(bytes: &[u8]) -> Result<Self, AudioError> {
        if bytes.len() % 2 != 0 {
            return Err(AudioError::MalformedPcm(bytes.len()));
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
            .collect();

        Ok(Self {
            samples,
            sample_rate: PCM_SAMPLE_RATE,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.samples.len() as f64 / f64::from(self.sample_rate))
    }

    /// Samples scaled by `gain` as raw float32 little-endian bytes
    pub fn to_f32le_bytes(&self, gain: f32) -> Vec<u8> {
        self.samples
            .iter()
            .flat_map(|sample| (sample * gain).to_le_bytes())
            .collect()
    }
}
