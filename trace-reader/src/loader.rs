use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use seismo_common::{Real, Seconds, Waveform, WaveformError};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use thiserror::Error;
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Relative tolerance on the spacing of the relative-time column.
const SPACING_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("trace file is missing the header line")]
    MissingHeader,
    #[error("unexpected header line: '{0}'")]
    UnexpectedHeader(String),
    #[error("line {line}: expected three comma-separated fields")]
    MissingField { line: usize },
    #[error("line {line}: cannot parse timestamp")]
    BadTimestamp {
        line: usize,
        source: chrono::ParseError,
    },
    #[error("line {line}: cannot parse number")]
    BadNumber {
        line: usize,
        source: std::num::ParseFloatError,
    },
    #[error("trace file needs at least two records to derive a sampling rate")]
    TooShort,
    #[error("line {line}: sample spacing {found}s differs from {expected}s")]
    NonUniformSampleInterval {
        line: usize,
        expected: Seconds,
        found: Seconds,
    },
    #[error("relative times must be strictly increasing at line {line}")]
    NonIncreasingTime { line: usize },
    #[error(transparent)]
    Waveform(#[from] WaveformError),
}

struct TraceRecord {
    time_abs: Option<DateTime<Utc>>,
    time_rel: Seconds,
    velocity: Real,
}

impl TraceRecord {
    /// Parses one CSV row. The absolute timestamp is only decoded when
    /// requested, as only the first record's value is used.
    fn parse(row: &str, line: usize, with_time_abs: bool) -> Result<Self, LoaderError> {
        let mut fields = row.split(',');
        let time_abs_field = fields.next().ok_or(LoaderError::MissingField { line })?;
        let time_rel_field = fields.next().ok_or(LoaderError::MissingField { line })?;
        let velocity_field = fields.next().ok_or(LoaderError::MissingField { line })?;

        let time_abs = with_time_abs
            .then(|| {
                NaiveDateTime::parse_from_str(time_abs_field.trim(), TIMESTAMP_FORMAT)
                    .map(|naive| naive.and_utc())
                    .map_err(|source| LoaderError::BadTimestamp { line, source })
            })
            .transpose()?;

        let time_rel = time_rel_field
            .trim()
            .parse()
            .map_err(|source| LoaderError::BadNumber { line, source })?;
        let velocity = velocity_field
            .trim()
            .parse()
            .map_err(|source| LoaderError::BadNumber { line, source })?;

        Ok(TraceRecord {
            time_abs,
            time_rel,
            velocity,
        })
    }
}

/// Loads a trace file from disk. See the crate docs for the format.
pub fn load_trace_file(path: &Path) -> Result<Waveform, LoaderError> {
    let file = File::open(path)?;
    let waveform = parse_trace(BufReader::new(file))?;
    debug!(
        "loaded {} samples at {} Hz from {}",
        waveform.len(),
        waveform.sample_rate(),
        path.display()
    );
    Ok(waveform)
}

/// Parses a trace table from any buffered reader.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Waveform, LoaderError> {
    let mut lines = reader.lines();

    let header = lines.next().ok_or(LoaderError::MissingHeader)??;
    if !header.trim_start().starts_with("time_abs") {
        return Err(LoaderError::UnexpectedHeader(header));
    }

    let mut start_time = None;
    let mut times = Vec::new();
    let mut samples = Vec::new();

    // Header is line 1, records start at line 2.
    for (index, row) in lines.enumerate() {
        let line = index + 2;
        let row = row?;
        if row.trim().is_empty() {
            continue;
        }
        let record = TraceRecord::parse(&row, line, start_time.is_none())?;
        if let Some(time_abs) = record.time_abs {
            // Records usually begin at time_rel 0, but the format does
            // not require it.
            start_time = Some(time_abs - Duration::microseconds((record.time_rel * 1e6).round() as i64));
        }
        if let Some(&previous) = times.last() {
            if record.time_rel <= previous {
                return Err(LoaderError::NonIncreasingTime { line });
            }
        }
        times.push(record.time_rel);
        samples.push(record.velocity);
    }

    let start_time = start_time.ok_or(LoaderError::Waveform(WaveformError::Empty))?;
    let sample_rate = derive_sample_rate(&times)?;

    Ok(Waveform::new(samples, sample_rate, start_time)?)
}

/// Derives the sampling rate from the relative-time column, rejecting
/// non-uniform spacing.
fn derive_sample_rate(times: &[Seconds]) -> Result<f64, LoaderError> {
    let (&first, rest) = times.split_first().ok_or(LoaderError::TooShort)?;
    let &second = rest.first().ok_or(LoaderError::TooShort)?;
    let expected = second - first;

    for (index, pair) in times.windows(2).enumerate() {
        let found = match pair {
            [a, b] => b - a,
            _ => continue,
        };
        if (found - expected).abs() > expected * SPACING_TOLERANCE {
            return Err(LoaderError::NonUniformSampleInterval {
                line: index + 3,
                expected,
                found,
            });
        }
    }

    let last = times.last().copied().unwrap_or(first);
    Ok((times.len() - 1) as f64 / (last - first))
}
