use std::fmt;

/// Result type for timecard-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or rendering a table
#[derive(Debug)]
pub enum Error {
    /// IO operation on the CSV file failed
    Io(std::io::Error),

    /// CSV encoding failed
    Csv(csv::Error),

    /// No metric is attached under this name
    UnknownMetric(String),

    /// The metric declares no value type to coerce into
    UnsupportedValue { metric: String, value: String },

    /// A line was written before the table headers
    HeadersNotWritten,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::UnknownMetric(name) => write!(f, "Unknown metric: {}", name),
            Error::UnsupportedValue { metric, value } => {
                write!(f, "Metric '{}' does not support setting {}", metric, value)
            }
            Error::HeadersNotWritten => write!(f, "write_headers must be called before write_line"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::UnknownMetric(_) | Error::UnsupportedValue { .. } | Error::HeadersNotWritten => {
                None
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}
