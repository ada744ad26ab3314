use crate::trigger_detection::{Passband, Real, Seconds};
use anyhow::{Error, anyhow};
use clap::Args;
use std::str::FromStr;

/// Clap-facing wrapper: a passband given as `min,max` in Hz.
#[derive(Debug, Clone)]
pub(crate) struct PassbandWrapper(pub(crate) Passband);

impl FromStr for PassbandWrapper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals: Vec<_> = s.split(',').collect();
        if vals.len() == 2 {
            Ok(PassbandWrapper(Passband {
                min: Real::from_str(vals[0].trim())?,
                max: Real::from_str(vals[1].trim())?,
            }))
        } else {
            Err(anyhow!(
                "Incorrect number of parameters in passband, expected pattern '*,*', got '{s}'"
            ))
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct DetectionParameters {
    /// Bandpass filter passband in Hz, as 'min,max'.
    #[clap(long, default_value = "0.5,1.0")]
    pub(crate) passband: PassbandWrapper,

    /// Short-term average window length in seconds.
    #[clap(long, default_value = "120")]
    pub(crate) sta_len: Seconds,

    /// Long-term average window length in seconds.
    #[clap(long, default_value = "600")]
    pub(crate) lta_len: Seconds,

    /// Half-width in seconds of the trigger search window around the
    /// velocity peak.
    #[clap(long, default_value = "1000")]
    pub(crate) window_size: Seconds,
}
