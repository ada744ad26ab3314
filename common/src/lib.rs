use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Real = f64;
pub type SampleRate = f64;
pub type Seconds = f64;

#[derive(Debug, Error, PartialEq)]
pub enum WaveformError {
    #[error("waveform contains no samples")]
    Empty,
    #[error("sampling rate must be positive, got {0} Hz")]
    NonPositiveSampleRate(SampleRate),
}

/// A single-channel ground-velocity recording: uniformly sampled
/// amplitudes, the sampling rate, and the absolute time of the first
/// sample. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<Real>,
    sample_rate: SampleRate,
    start_time: DateTime<Utc>,
}

impl Waveform {
    pub fn new(
        samples: Vec<Real>,
        sample_rate: SampleRate,
        start_time: DateTime<Utc>,
    ) -> Result<Self, WaveformError> {
        if samples.is_empty() {
            return Err(WaveformError::Empty);
        }
        if sample_rate <= 0.0 {
            return Err(WaveformError::NonPositiveSampleRate(sample_rate));
        }
        Ok(Self {
            samples,
            sample_rate,
            start_time,
        })
    }

    pub fn samples(&self) -> &[Real] {
        &self.samples
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Trace duration in seconds, from the first sample to the last.
    pub fn duration(&self) -> Seconds {
        (self.len().saturating_sub(1)) as Seconds / self.sample_rate
    }
}

/// A waveform after bandpass filtering. Same sample count, sampling
/// rate and start timestamp as the source; only the amplitudes differ.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredWaveform {
    samples: Vec<Real>,
    sample_rate: SampleRate,
    start_time: DateTime<Utc>,
}

impl FilteredWaveform {
    /// Wraps filtered amplitudes with the time base of the source
    /// waveform. The caller guarantees the sample count is unchanged.
    pub fn from_source(source: &Waveform, samples: Vec<Real>) -> Self {
        Self {
            samples,
            sample_rate: source.sample_rate(),
            start_time: source.start_time(),
        }
    }

    pub fn samples(&self) -> &[Real] {
        &self.samples
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Seconds {
        (self.len().saturating_sub(1)) as Seconds / self.sample_rate
    }

    /// Time offset of sample `index` from the trace start.
    pub fn time_of(&self, index: usize) -> Seconds {
        index as Seconds / self.sample_rate
    }

    /// The trace as `(time offset, amplitude)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seconds, Real)> + Clone + '_ {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, v)| (self.time_of(i), *v))
    }
}
