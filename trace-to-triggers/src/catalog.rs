use chrono::{DateTime, Duration, Utc};
use seismo_common::Seconds;
use std::{
    fmt::{self, Display},
    fs::File,
    io::{self, Write},
    path::Path,
};

/// Header of the detection catalog. The absolute-time column name
/// spells out its own format.
pub(crate) const CATALOG_HEADER: &str =
    "filename,time_abs(%Y-%m-%dT%H:%M:%S.%f),time_rel(sec)";

const TIME_ABS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// The catalog entry for one detected trigger: the source trace, the
/// absolute onset timestamp, and the onset offset from trace start.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DetectionResult {
    filename: String,
    time_abs: DateTime<Utc>,
    time_rel: Seconds,
}

impl DetectionResult {
    /// Converts the relative trigger time to an absolute timestamp
    /// (microsecond precision) against the trace start.
    pub(crate) fn new(filename: &str, start_time: DateTime<Utc>, time_rel: Seconds) -> Self {
        let time_abs = start_time + Duration::microseconds((time_rel * 1e6).round() as i64);
        Self {
            filename: filename.to_owned(),
            time_abs,
            time_rel,
        }
    }

    pub(crate) fn filename(&self) -> &str {
        &self.filename
    }

    pub(crate) fn time_abs(&self) -> DateTime<Utc> {
        self.time_abs
    }

    pub(crate) fn time_rel(&self) -> Seconds {
        self.time_rel
    }
}

/// One catalog row.
impl Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.filename,
            self.time_abs.format(TIME_ABS_FORMAT),
            self.time_rel
        )
    }
}

pub(crate) fn write_catalog<W: Write>(
    writer: &mut W,
    result: &DetectionResult,
) -> io::Result<()> {
    writeln!(writer, "{CATALOG_HEADER}")?;
    writeln!(writer, "{result}")
}

pub(crate) fn save_catalog(path: &Path, result: &DetectionResult) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_catalog(&mut file, result)
}
