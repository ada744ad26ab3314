use super::{Real, SampleRate, TriggerError};
use seismo_common::{FilteredWaveform, Waveform};
use std::f64::consts::PI;

/// The frequency range, in Hz, retained by the filter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Passband {
    pub(crate) min: Real,
    pub(crate) max: Real,
}

/// Filter length in samples. Odd, so the kernel is symmetric about a
/// single centre tap and the centred convolution is zero-phase.
const NUM_TAPS: usize = 129;

/// A linear-phase FIR bandpass filter (windowed sinc, Hann window).
///
/// Applied by centred convolution the filter introduces no phase
/// shift, so peak timing in the output matches the input. Downstream
/// trigger selection depends on that.
#[derive(Debug, Clone)]
pub(crate) struct BandpassFilter {
    coefficients: Vec<Real>,
}

impl BandpassFilter {
    /// Designs a filter for the given passband and sampling rate.
    ///
    /// Structural violations of the passband (non-positive bound,
    /// min ≥ max) are `InvalidPassband`; a band the sampling rate
    /// cannot carry (max ≥ Nyquist, or a non-positive rate) is
    /// `UnsupportedSampleRate`.
    pub(crate) fn new(passband: &Passband, sample_rate: SampleRate) -> Result<Self, TriggerError> {
        if passband.min <= 0.0 || passband.min >= passband.max {
            return Err(TriggerError::InvalidPassband {
                min: passband.min,
                max: passband.max,
            });
        }
        let nyquist = sample_rate / 2.0;
        if sample_rate <= 0.0 || passband.max >= nyquist {
            return Err(TriggerError::UnsupportedSampleRate {
                sample_rate,
                max: passband.max,
            });
        }

        // Cutoffs normalised to the Nyquist frequency.
        let low = passband.min / nyquist;
        let high = passband.max / nyquist;
        let half = (NUM_TAPS / 2) as Real;

        let mut coefficients: Vec<Real> = (0..NUM_TAPS)
            .map(|i| {
                let n = i as Real - half;
                let sinc = if n.abs() < 1e-12 {
                    high - low
                } else {
                    let pi_n = PI * n;
                    ((high * pi_n).sin() - (low * pi_n).sin()) / pi_n
                };
                let hann = 0.5 * (1.0 - (2.0 * PI * i as Real / (NUM_TAPS - 1) as Real).cos());
                sinc * hann
            })
            .collect();

        // Normalise to unit gain at the centre of the band.
        let centre = (low + high) / 2.0;
        let gain: Real = coefficients
            .iter()
            .enumerate()
            .map(|(i, &c)| c * (PI * centre * (i as Real - half)).cos())
            .sum();
        if gain.abs() > 1e-12 {
            for c in &mut coefficients {
                *c /= gain;
            }
        }

        Ok(Self { coefficients })
    }

    /// Filters the waveform, producing a trace of identical length and
    /// time base. Samples beyond either end are treated as zero.
    pub(crate) fn apply(&self, waveform: &Waveform) -> FilteredWaveform {
        let samples = waveform.samples();
        let n = samples.len() as isize;
        let half = (self.coefficients.len() / 2) as isize;

        let filtered = (0..n)
            .map(|i| {
                self.coefficients
                    .iter()
                    .enumerate()
                    .map(|(j, &c)| {
                        let k = i + j as isize - half;
                        if (0..n).contains(&k) {
                            c * samples[k as usize]
                        } else {
                            0.0
                        }
                    })
                    .sum()
            })
            .collect();

        FilteredWaveform::from_source(waveform, filtered)
    }
}
