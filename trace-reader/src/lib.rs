//! Reads tabular seismic trace files into [`Waveform`] values.
//!
//! A trace file is a CSV table with one row per sample:
//!
//! ```text
//! time_abs(%Y-%m-%dT%H:%M:%S.%f),time_rel(sec),velocity(m/s)
//! 1971-02-09T00:00:00.000000,0.0,-6.15e-14
//! 1971-02-09T00:00:00.150943,0.1509433962,-7.93e-14
//! ```
//!
//! The sampling rate is derived from the relative-time column, which
//! must be uniformly spaced. The absolute start timestamp comes from
//! the first record.

pub mod loader;

pub use loader::{LoaderError, load_trace_file, parse_trace};

pub use seismo_common::Waveform;
