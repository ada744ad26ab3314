use crate::{
    catalog::DetectionResult,
    parameters::DetectionParameters,
    trigger_detection::{
        BandpassFilter, CharacteristicFunction, StaLtaWindows, TriggerError, max_velocity_time,
        select_trigger,
    },
};
use seismo_common::{FilteredWaveform, Waveform};
use tracing::{debug, info};

/// Outcome of one detection run. Finding no trigger is expected
/// behaviour, kept apart from the error path so the caller can report
/// "no event detected" rather than a failure.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Detection {
    Trigger(DetectionResult),
    NoTriggerFound,
}

/// A completed run: the outcome plus the filtered trace, the latter
/// retained as a read-only view for plotting.
#[derive(Debug, Clone)]
pub(crate) struct Analysis {
    pub(crate) detection: Detection,
    pub(crate) filtered: FilteredWaveform,
}

impl Analysis {
    /// The chosen trigger offset, if any.
    pub(crate) fn trigger_time(&self) -> Option<seismo_common::Seconds> {
        match &self.detection {
            Detection::Trigger(result) => Some(result.time_rel()),
            Detection::NoTriggerFound => None,
        }
    }
}

/// Runs the detection pipeline over one waveform.
///
/// Each stage fully consumes its input before the next begins: filter,
/// characteristic function, velocity peak, windowed trigger selection,
/// catalog record.
pub(crate) fn process(
    waveform: &Waveform,
    source: &str,
    parameters: &DetectionParameters,
) -> Result<Analysis, TriggerError> {
    let filter = BandpassFilter::new(&parameters.passband.0, waveform.sample_rate())?;
    let filtered = filter.apply(waveform);
    debug!("filtered {} samples at {} Hz", filtered.len(), filtered.sample_rate());

    let windows = StaLtaWindows::new(parameters.sta_len, parameters.lta_len)?;
    let cf = CharacteristicFunction::compute(&filtered, &windows)?;

    let (velocity_peak_time, velocity_peak) = max_velocity_time(&filtered);
    info!("highest velocity peak at {velocity_peak_time}s with value {velocity_peak} m/s");

    let detection = match select_trigger(&cf, velocity_peak_time, parameters.window_size) {
        Some(peak) => {
            info!(
                "best STA/LTA trigger at {}s (ratio {})",
                peak.time, peak.value
            );
            Detection::Trigger(DetectionResult::new(source, waveform.start_time(), peak.time))
        }
        None => Detection::NoTriggerFound,
    };

    Ok(Analysis {
        detection,
        filtered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::PassbandWrapper;
    use chrono::{DateTime, Utc};
    use rand::Rng;
    use seismo_common::Real;
    use std::{f64::consts::PI, str::FromStr};

    const SAMPLE_RATE: f64 = 1.0;

    fn start() -> DateTime<Utc> {
        "1971-02-09T00:00:00Z".parse().expect("valid timestamp")
    }

    fn parameters(window_size: f64) -> DetectionParameters {
        DetectionParameters {
            passband: PassbandWrapper::from_str("0.05,0.2").expect("valid passband"),
            sta_len: 120.0,
            lta_len: 600.0,
            window_size,
        }
    }

    /// An in-band wave packet centred on `onset` seconds, zero
    /// elsewhere, 3600 samples at 1 Hz.
    fn wave_packet(onset: usize) -> Vec<Real> {
        (0..3600)
            .map(|i| {
                let offset = i as Real - onset as Real;
                if offset.abs() < 150.0 {
                    let envelope = 0.5 * (1.0 + (PI * offset / 150.0).cos());
                    envelope * (2.0 * PI * 0.1 * offset).sin()
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// The wave packet over a faint noise background.
    fn synthetic_trace(onset: usize) -> Waveform {
        let mut rng = rand::rng();
        let samples: Vec<Real> = wave_packet(onset)
            .into_iter()
            .map(|v| v + rng.random_range(-1e-3..1e-3))
            .collect();
        Waveform::new(samples, SAMPLE_RATE, start()).expect("valid waveform")
    }

    #[test]
    fn a_burst_at_1800s_triggers_near_1800s() {
        let waveform = synthetic_trace(1800);
        let analysis =
            process(&waveform, "synthetic", &parameters(1000.0)).expect("pipeline should run");

        match analysis.detection {
            Detection::Trigger(result) => {
                assert!(
                    (result.time_rel() - 1800.0).abs() <= 150.0,
                    "trigger at {}s, expected near 1800s",
                    result.time_rel()
                );
                assert_eq!(result.filename(), "synthetic");
            }
            Detection::NoTriggerFound => panic!("expected a trigger"),
        }
    }

    #[test]
    fn the_filtered_view_keeps_the_input_shape() {
        let waveform = synthetic_trace(1800);
        let analysis =
            process(&waveform, "synthetic", &parameters(1000.0)).expect("pipeline should run");
        assert_eq!(analysis.filtered.len(), waveform.len());
        assert_eq!(analysis.filtered.sample_rate(), waveform.sample_rate());
        assert!(analysis.trigger_time().is_some());
    }

    #[test]
    fn a_flat_trace_finds_no_trigger() {
        let samples = vec![0.0; 1200];
        let waveform = Waveform::new(samples, SAMPLE_RATE, start()).expect("valid waveform");
        let analysis =
            process(&waveform, "flat", &parameters(1000.0)).expect("pipeline should run");
        assert_eq!(analysis.detection, Detection::NoTriggerFound);
        assert_eq!(analysis.trigger_time(), None);
    }

    #[test]
    fn a_velocity_burst_far_from_the_event_finds_no_trigger() {
        // A large unrelated velocity spike at 50 s dominates the
        // signed maximum, while the only STA/LTA activity sits around
        // the wave packet at 2000 s, outside the 1000 s window. The
        // background is silent so the characteristic function has no
        // incidental noise peaks.
        let mut samples = wave_packet(2000);
        samples[50] = 100.0;
        let waveform =
            Waveform::new(samples, SAMPLE_RATE, start()).expect("valid waveform");

        let analysis =
            process(&waveform, "spiked", &parameters(1000.0)).expect("pipeline should run");
        assert_eq!(analysis.detection, Detection::NoTriggerFound);
    }

    #[test]
    fn configuration_errors_surface_verbatim() {
        let waveform = synthetic_trace(1800);
        let mut bad_passband = parameters(1000.0);
        bad_passband.passband = PassbandWrapper::from_str("1.0,0.2").expect("parses as a pair");
        assert!(matches!(
            process(&waveform, "synthetic", &bad_passband),
            Err(TriggerError::InvalidPassband { .. })
        ));

        let mut bad_windows = parameters(1000.0);
        bad_windows.sta_len = 900.0;
        assert!(matches!(
            process(&waveform, "synthetic", &bad_windows),
            Err(TriggerError::InvalidWindowLengths { .. })
        ));

        let mut oversized_lta = parameters(1000.0);
        oversized_lta.lta_len = 4000.0;
        assert!(matches!(
            process(&waveform, "synthetic", &oversized_lta),
            Err(TriggerError::InvalidWindowLengths { .. })
        ));
    }
}
