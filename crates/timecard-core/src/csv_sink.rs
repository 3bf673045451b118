use crate::Result;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// CSV file that committed table rows are appended to.
///
/// The file is opened and closed on every write; no handle is held between
/// rows.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates or truncates the file and writes the header row.
    pub fn write_header<I, S>(&self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut wtr = csv::Writer::from_path(&self.path)?;
        wtr.write_record(columns)?;
        wtr.flush()?;
        tracing::debug!(path = %self.path.display(), "csv header written");
        Ok(())
    }

    /// Appends one data row.
    pub fn append_row<I, S>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut wtr = csv::Writer::from_writer(file);
        wtr.write_record(values)?;
        wtr.flush()?;
        tracing::trace!(path = %self.path.display(), "csv row appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_header_truncates_and_rows_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, "stale\n").unwrap();

        let sink = CsvSink::new(&path);
        sink.write_header(["count", "ratio"]).unwrap();
        sink.append_row(["1", "0.5"]).unwrap();
        sink.append_row(["2", "a,b"]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["count,ratio", "1,0.5", "2,\"a,b\""]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("missing").join("table.csv"));
        let err = sink.write_header(["count"]).unwrap_err();
        assert!(matches!(err, Error::Csv(_) | Error::Io(_)));
    }
}
