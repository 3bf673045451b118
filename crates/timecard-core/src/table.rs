use crate::console::{ConsoleSink, StdoutConsole};
use crate::csv_sink::CsvSink;
use crate::map::MetricMap;
use crate::metric::Metric;
use crate::style::Palette;
use crate::value::Value;
use crate::{Error, Result};
use std::path::PathBuf;

const NEW_LINE: &str = "\n\r";
const REWRITE_LINE: &str = "\r";

/// A live table of metrics: a header written once, then one line per tick.
///
/// Provisional lines (`commit = false`) are redrawn in place. A committed line
/// stays on screen, is appended to the CSV file when one is configured, and
/// resets per-cycle metric state.
pub struct Timecard {
    metrics: MetricMap,
    csv: Option<CsvSink>,
    console: Box<dyn ConsoleSink>,
    palette: Palette,
    headers_written: bool,
    last_line_committed: bool,
}

impl Timecard {
    pub fn new(console: impl ConsoleSink + 'static) -> Self {
        Self {
            metrics: MetricMap::new(),
            csv: None,
            console: Box::new(console),
            palette: Palette::default(),
            headers_written: false,
            last_line_committed: false,
        }
    }

    /// Table on stdout, colored when stdout is a terminal.
    pub fn stdout() -> Self {
        Self::new(StdoutConsole::new()).with_palette(Palette::detect())
    }

    pub fn with_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv = Some(CsvSink::new(path));
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn csv(&self) -> Option<&CsvSink> {
        self.csv.as_ref()
    }

    /// Attaches `metric` under `name`; replacing a name keeps its column.
    pub fn attach(&mut self, name: impl Into<String>, metric: impl Metric + 'static) {
        self.metrics.insert(name, metric);
    }

    pub fn metrics(&self) -> &MetricMap {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut MetricMap {
        &mut self.metrics
    }

    pub fn get(&self, name: &str) -> Option<&dyn Metric> {
        self.metrics.get(name)
    }

    pub fn get_as<T: Metric + 'static>(&self, name: &str) -> Option<&T> {
        self.metrics.get_as(name)
    }

    pub fn get_as_mut<T: Metric + 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.metrics.get_as_mut(name)
    }

    /// Assigns into the metric under `name`. Before the headers are written a
    /// missing name attaches a new column; afterwards it is an error, since
    /// the header row is already fixed.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if self.headers_written && !self.metrics.contains(name) {
            return Err(Error::UnknownMetric(name.to_string()));
        }
        self.metrics.set(name, value)
    }

    pub fn accumulate(&mut self, name: &str, delta: impl Into<Value>) -> Result<()> {
        self.metrics.accumulate(name, delta)
    }

    pub fn deaccumulate(&mut self, name: &str, delta: impl Into<Value>) -> Result<()> {
        self.metrics.deaccumulate(name, delta)
    }

    /// Console width of one table line. Column widths are resolved by
    /// [`Timecard::write_headers`]; before that groups count as zero wide.
    pub fn header_width(&self) -> usize {
        let columns: usize = self.metrics.values().map(|metric| metric.width()).sum();
        columns + self.metrics.len().saturating_sub(1)
    }

    /// CSV column names: `{group}_{child}` per group child, `{title}` or
    /// `{title}_{subtitle}` for everything else.
    pub fn csv_columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        for metric in self.metrics.values() {
            if let Some(group) = metric.as_group() {
                for child in group.children().values() {
                    columns.push(format!("{}_{}", metric.title(), child.title()));
                }
            } else if metric.subtitle().is_empty() {
                columns.push(metric.title().to_string());
            } else {
                columns.push(format!("{}_{}", metric.title(), metric.subtitle()));
            }
        }
        columns
    }

    /// Writes the title and subtitle rows, and the CSV header row when a file
    /// is configured (truncating it).
    pub fn write_headers(&mut self) -> Result<()> {
        let mut titles = Vec::with_capacity(self.metrics.len());
        let mut subtitles = Vec::with_capacity(self.metrics.len());
        for metric in self.metrics.values_mut() {
            subtitles.push(metric.render_subtitle(&self.palette));
            titles.push(metric.render_title(&self.palette));
        }

        let separator = self.palette.separator();
        self.console.write(&titles.join(" "))?;
        self.console.write(NEW_LINE)?;
        self.console.write(&subtitles.join(separator.as_str()))?;
        self.console.write(NEW_LINE)?;
        self.console.flush()?;

        if let Some(csv) = &self.csv {
            csv.write_header(self.csv_columns())?;
        }

        self.headers_written = true;
        tracing::debug!(
            metrics = self.metrics.len(),
            width = self.header_width(),
            "table headers written"
        );
        Ok(())
    }

    /// Renders one line of values. With `commit`, the line is kept, persisted
    /// and every metric is reset afterwards.
    pub fn write_line(&mut self, commit: bool) -> Result<()> {
        if !self.headers_written {
            return Err(Error::HeadersNotWritten);
        }

        let mut cells = Vec::with_capacity(self.metrics.len());
        let mut row = Vec::new();
        for metric in self.metrics.values_mut() {
            cells.push(metric.render_cell(commit, &self.palette));
            if commit {
                match metric.as_group() {
                    Some(group) => {
                        row.extend(group.children().values().map(|child| child.to_persisted()))
                    }
                    None => row.push(metric.to_persisted()),
                }
                metric.reset();
            }
        }

        if commit && let Some(csv) = &self.csv {
            csv.append_row(&row)?;
        }

        let prefix = if self.last_line_committed {
            NEW_LINE
        } else {
            REWRITE_LINE
        };
        let separator = self.palette.separator();
        let mut line = cells.join(separator.as_str());
        if !commit {
            line = self.palette.provisional_line(&line);
        }

        self.console.write(prefix)?;
        self.console.write(&line)?;
        self.console.flush()?;

        self.last_line_committed = commit;
        Ok(())
    }

    /// Moves the cursor past the last rendered line.
    pub fn finish(&mut self) -> Result<()> {
        self.console.write("\n")?;
        self.console.flush()?;
        Ok(())
    }
}
