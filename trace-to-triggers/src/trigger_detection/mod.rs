//! Tools for locating the most probable seismic-event onset in a
//! single ground-velocity trace.
//!
//! The stages run strictly forward: the raw waveform is bandpass
//! filtered, an STA/LTA characteristic function is computed from the
//! filtered trace, local maxima are extracted from the characteristic
//! function, and the selector reconciles those peaks with the dominant
//! velocity peak inside a symmetric time window. Typical usage:
//! ```ignore
//! let filter = BandpassFilter::new(&Passband { min: 0.5, max: 1.0 }, rate)?;
//! let filtered = filter.apply(&waveform);
//! let windows = StaLtaWindows::new(120.0, 600.0)?;
//! let cf = CharacteristicFunction::compute(&filtered, &windows)?;
//! let (t_vel, _) = max_velocity_time(&filtered);
//! let trigger = select_trigger(&cf, t_vel, 1000.0);
//! ```

pub(crate) mod bandpass;
pub(crate) mod peaks;
pub(crate) mod selector;
pub(crate) mod sta_lta;

pub(crate) use bandpass::{BandpassFilter, Passband};
pub(crate) use peaks::{EventFilter, Peak, PeakDetector};
pub(crate) use selector::{max_velocity_time, select_trigger};
pub(crate) use sta_lta::{CharacteristicFunction, StaLtaWindows};

pub(crate) use seismo_common::{Real, SampleRate, Seconds};

use thiserror::Error;

/// Configuration errors. All are fatal to the run and reported to the
/// caller verbatim; none are retried.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum TriggerError {
    #[error("invalid passband [{min}, {max}] Hz: bounds must be positive and min < max")]
    InvalidPassband { min: Real, max: Real },
    #[error("sampling rate {sample_rate} Hz cannot support a passband up to {max} Hz")]
    UnsupportedSampleRate { sample_rate: SampleRate, max: Real },
    #[error(
        "invalid STA/LTA window lengths: sta {sta}s, lta {lta}s for a {duration}s trace at {sample_rate} Hz"
    )]
    InvalidWindowLengths {
        sta: Seconds,
        lta: Seconds,
        duration: Seconds,
        sample_rate: SampleRate,
    },
}
