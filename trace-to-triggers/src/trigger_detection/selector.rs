use super::{
    CharacteristicFunction, EventFilter, Peak, PeakDetector, Real, Seconds,
};
use seismo_common::FilteredWaveform;

/// Time offset and value of the dominant velocity peak: the global
/// maximum of the signed filtered trace, first occurrence on ties.
///
/// Known weakness, inherited deliberately: a large velocity burst
/// unrelated to the event dominates this maximum and can pull the
/// whole selection off target.
pub(crate) fn max_velocity_time(filtered: &FilteredWaveform) -> (Seconds, Real) {
    filtered
        .iter()
        .fold((0.0, Real::MIN), |best, (time, value)| {
            if value > best.1 { (time, value) } else { best }
        })
}

/// Chooses the best trigger: among characteristic-function peaks within
/// `window_size` seconds of the velocity-peak time (inclusive on both
/// bounds), the one with the greatest ratio value wins; equal values
/// fall to the earliest time. `None` means no trigger — an expected
/// outcome, not a failure.
pub(crate) fn select_trigger(
    cf: &CharacteristicFunction,
    velocity_peak_time: Seconds,
    window_size: Seconds,
) -> Option<Peak> {
    cf.iter()
        .events(PeakDetector::default())
        .filter(|peak| (peak.time - velocity_peak_time).abs() <= window_size)
        .fold(None, |best: Option<Peak>, peak| match best {
            Some(best) if best.value >= peak.value => Some(best),
            _ => Some(peak),
        })
}
