use super::{Real, SampleRate, Seconds, TriggerError};
use seismo_common::FilteredWaveform;

/// A validated pair of STA/LTA window lengths, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StaLtaWindows {
    sta: Seconds,
    lta: Seconds,
}

impl StaLtaWindows {
    /// Both lengths must be positive and the short window strictly
    /// shorter than the long one. Whether the windows fit the trace is
    /// checked at computation time, when the trace is known.
    pub(crate) fn new(sta: Seconds, lta: Seconds) -> Result<Self, TriggerError> {
        if sta <= 0.0 || lta <= 0.0 || sta >= lta {
            return Err(TriggerError::InvalidWindowLengths {
                sta,
                lta,
                duration: 0.0,
                sample_rate: 0.0,
            });
        }
        Ok(Self { sta, lta })
    }

    pub(crate) fn sta(&self) -> Seconds {
        self.sta
    }

    pub(crate) fn lta(&self) -> Seconds {
        self.lta
    }

    fn samples(len: Seconds, sample_rate: SampleRate) -> usize {
        (len * sample_rate).round() as usize
    }
}

/// Guard against a silent long window producing an unbounded ratio.
const QUIET_LTA: Real = 1e-30;

/// The STA/LTA ratio series of a filtered trace.
///
/// For each sample index i the value is the mean absolute amplitude
/// over the trailing short window divided by the mean absolute
/// amplitude over the trailing long window, both windows ending at i.
/// Indices before the long window is fully populated form the warm-up
/// region: they hold ratio 0 and are excluded from peak search.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CharacteristicFunction {
    values: Vec<Real>,
    sample_rate: SampleRate,
    /// Index of the first sample with a fully populated long window.
    first_valid: usize,
}

impl CharacteristicFunction {
    pub(crate) fn compute(
        filtered: &FilteredWaveform,
        windows: &StaLtaWindows,
    ) -> Result<Self, TriggerError> {
        let sample_rate = filtered.sample_rate();
        let invalid = || TriggerError::InvalidWindowLengths {
            sta: windows.sta(),
            lta: windows.lta(),
            duration: filtered.duration(),
            sample_rate,
        };

        if windows.lta() > filtered.duration() {
            return Err(invalid());
        }
        let sta_samples = StaLtaWindows::samples(windows.sta(), sample_rate);
        let lta_samples = StaLtaWindows::samples(windows.lta(), sample_rate);
        // At low sampling rates the windows can collapse to the same
        // sample count even though the lengths in seconds differ.
        if sta_samples == 0 || sta_samples >= lta_samples {
            return Err(invalid());
        }

        let samples = filtered.samples();
        let mut values = Vec::with_capacity(samples.len());
        let mut sta_sum = 0.0;
        let mut lta_sum = 0.0;

        for (i, &sample) in samples.iter().enumerate() {
            sta_sum += sample.abs();
            lta_sum += sample.abs();
            if let Some(left) = i.checked_sub(sta_samples) {
                sta_sum -= samples[left].abs();
            }
            if let Some(left) = i.checked_sub(lta_samples) {
                lta_sum -= samples[left].abs();
            }

            if i + 1 < lta_samples {
                values.push(0.0);
            } else {
                let sta = sta_sum / sta_samples as Real;
                let lta = lta_sum / lta_samples as Real;
                values.push(if lta > QUIET_LTA { sta / lta } else { 0.0 });
            }
        }

        Ok(Self {
            values,
            sample_rate,
            first_valid: lta_samples - 1,
        })
    }

    /// Builds a characteristic function from raw ratio values, letting
    /// tests shape the series directly.
    #[cfg(test)]
    pub(crate) fn from_values(
        values: Vec<Real>,
        sample_rate: SampleRate,
        first_valid: usize,
    ) -> Self {
        Self {
            values,
            sample_rate,
            first_valid,
        }
    }

    pub(crate) fn values(&self) -> &[Real] {
        &self.values
    }

    pub(crate) fn first_valid(&self) -> usize {
        self.first_valid
    }

    /// `(time offset, ratio)` pairs past the warm-up region, in
    /// ascending time order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Seconds, Real)> + Clone + '_ {
        let sample_rate = self.sample_rate;
        self.values
            .iter()
            .enumerate()
            .skip(self.first_valid)
            .map(move |(i, &v)| (i as Seconds / sample_rate, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use chrono::{DateTime, Utc};
    use seismo_common::Waveform;

    fn filtered(samples: Vec<Real>, sample_rate: SampleRate) -> FilteredWaveform {
        let start = DateTime::<Utc>::from_timestamp(0, 0).expect("valid timestamp");
        let waveform =
            Waveform::new(samples.clone(), sample_rate, start).expect("valid waveform");
        FilteredWaveform::from_source(&waveform, samples)
    }

    #[test]
    fn rejects_degenerate_window_lengths() {
        assert!(StaLtaWindows::new(0.0, 600.0).is_err());
        assert!(StaLtaWindows::new(120.0, 0.0).is_err());
        assert!(StaLtaWindows::new(600.0, 600.0).is_err());
        assert!(StaLtaWindows::new(700.0, 600.0).is_err());
        assert!(StaLtaWindows::new(120.0, 600.0).is_ok());
    }

    #[test]
    fn rejects_a_long_window_exceeding_the_trace() {
        let trace = filtered(vec![1.0; 100], 1.0);
        let windows = StaLtaWindows::new(10.0, 300.0).expect("valid windows");
        assert!(matches!(
            CharacteristicFunction::compute(&trace, &windows),
            Err(TriggerError::InvalidWindowLengths { .. })
        ));
    }

    #[test]
    fn rejects_windows_that_collapse_at_low_sampling_rates() {
        // 0.2 s and 0.4 s both round to a single sample at 2.6 Hz.
        let trace = filtered(vec![1.0; 100], 2.6);
        let windows = StaLtaWindows::new(0.2, 0.4).expect("valid windows");
        assert!(matches!(
            CharacteristicFunction::compute(&trace, &windows),
            Err(TriggerError::InvalidWindowLengths { .. })
        ));
    }

    #[test]
    fn output_aligns_one_to_one_with_the_input() {
        let trace = filtered(vec![1.0; 500], 1.0);
        let windows = StaLtaWindows::new(10.0, 50.0).expect("valid windows");
        let cf = CharacteristicFunction::compute(&trace, &windows).expect("valid cf");
        assert_eq!(cf.values().len(), trace.len());
    }

    #[test]
    fn warm_up_region_is_zero_and_excluded_from_iteration() {
        let trace = filtered(vec![1.0; 200], 1.0);
        let windows = StaLtaWindows::new(10.0, 50.0).expect("valid windows");
        let cf = CharacteristicFunction::compute(&trace, &windows).expect("valid cf");

        assert_eq!(cf.first_valid(), 49);
        assert!(cf.values()[..49].iter().all(|&v| v == 0.0));

        let (first_time, _) = cf.iter().next().expect("non-empty iteration");
        assert_approx_eq!(first_time, 49.0);
    }

    #[test]
    fn constant_amplitude_gives_unit_ratio() {
        let trace = filtered(vec![2.5; 300], 1.0);
        let windows = StaLtaWindows::new(10.0, 50.0).expect("valid windows");
        let cf = CharacteristicFunction::compute(&trace, &windows).expect("valid cf");
        for &v in &cf.values()[cf.first_valid()..] {
            assert_approx_eq!(v, 1.0);
        }
    }

    #[test]
    fn values_are_non_negative_past_warm_up() {
        let samples: Vec<Real> = (0..400).map(|i| ((i * 37) % 13) as Real - 6.0).collect();
        let trace = filtered(samples, 1.0);
        let windows = StaLtaWindows::new(10.0, 50.0).expect("valid windows");
        let cf = CharacteristicFunction::compute(&trace, &windows).expect("valid cf");
        assert!(cf.iter().all(|(_, v)| v >= 0.0));
    }

    #[test]
    fn a_silent_long_window_yields_zero_ratio() {
        let mut samples = vec![0.0; 200];
        samples[199] = 1.0;
        let trace = filtered(samples, 1.0);
        let windows = StaLtaWindows::new(10.0, 50.0).expect("valid windows");
        let cf = CharacteristicFunction::compute(&trace, &windows).expect("valid cf");
        // All-zero windows are defined to 0 rather than NaN.
        assert_eq!(cf.values()[100], 0.0);
    }

    #[test]
    fn an_energy_burst_raises_the_ratio_near_its_onset() {
        // 3600 s of background at 1 Hz with a burst centred at 1800 s.
        let samples: Vec<Real> = (0..3600)
            .map(|i| {
                let background = if i % 2 == 0 { 0.01 } else { -0.01 };
                if (1750..1850).contains(&i) {
                    background + 1.0
                } else {
                    background
                }
            })
            .collect();
        let trace = filtered(samples, 1.0);
        let windows = StaLtaWindows::new(120.0, 600.0).expect("valid windows");
        let cf = CharacteristicFunction::compute(&trace, &windows).expect("valid cf");

        let (peak_time, peak_value) = cf
            .iter()
            .fold((0.0, Real::MIN), |best, (t, v)| {
                if v > best.1 { (t, v) } else { best }
            });
        assert!(peak_value > 2.0, "burst ratio {peak_value} too small");
        assert!(
            (peak_time - 1800.0).abs() <= 120.0,
            "ratio peaked at {peak_time}s, expected near 1800s"
        );
    }
}
