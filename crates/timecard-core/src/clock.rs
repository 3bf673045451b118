use crate::metric::{Header, Metric};
use crate::scalar::Scalar;
use crate::style::Palette;
use crate::value::{Value, ValueKind};
use crate::Result;
use chrono::{Local, NaiveDateTime};
use std::any::Any;
use std::time::Instant;

const FULL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Wall-clock time, read fresh on every render.
///
/// `show_date = false` drops the date from the console column only; the CSV
/// column always carries the full timestamp.
#[derive(Debug, Clone)]
pub struct ClockTime {
    header: Header,
    show_date: bool,
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::new("time", true)
    }
}

impl ClockTime {
    pub fn new(title: impl Into<String>, show_date: bool) -> Self {
        let width = if show_date { 19 } else { 8 };
        Self {
            header: Header::new(title, width),
            show_date,
        }
    }

    pub fn show_date(&self) -> bool {
        self.show_date
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    pub fn format_at(&self, at: NaiveDateTime) -> String {
        let format = if self.show_date { FULL_FORMAT } else { TIME_FORMAT };
        at.format(format).to_string()
    }
}

impl Metric for ClockTime {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn value(&self) -> Value {
        Value::Time(Self::now())
    }

    fn display(&self) -> String {
        self.format_at(Self::now())
    }

    fn to_persisted(&self) -> String {
        Self::now().format(FULL_FORMAT).to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Time elapsed between two consecutive renders of this cell.
///
/// The first render measures from construction.
#[derive(Debug, Clone)]
pub struct ElapsedTime {
    inner: Scalar,
    last: Instant,
}

impl Default for ElapsedTime {
    fn default() -> Self {
        Self::new("delta")
    }
}

impl ElapsedTime {
    pub fn new(title: impl Into<String>) -> Self {
        Self::started_at(title, Instant::now())
    }

    pub fn started_at(title: impl Into<String>, start: Instant) -> Self {
        Self {
            inner: Scalar::duration(title),
            last: start,
        }
    }

    /// Stores the time since the previous tick and moves the baseline to `now`.
    pub fn tick_at(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last);
        self.inner.set_number(elapsed.as_secs_f64());
        self.last = now;
    }
}

impl Metric for ElapsedTime {
    fn header(&self) -> &Header {
        self.inner.header()
    }

    fn header_mut(&mut self) -> &mut Header {
        self.inner.header_mut()
    }

    fn value(&self) -> Value {
        self.inner.value()
    }

    fn display(&self) -> String {
        self.inner.display()
    }

    fn value_kind(&self) -> Option<ValueKind> {
        self.inner.value_kind()
    }

    fn set_value(&mut self, value: Value) -> Result<()> {
        self.inner.set_value(value)
    }

    fn accumulate(&mut self, delta: Value) -> Result<()> {
        self.inner.accumulate(delta)
    }

    fn deaccumulate(&mut self, delta: Value) -> Result<()> {
        self.inner.deaccumulate(delta)
    }

    fn to_persisted(&self) -> String {
        self.inner.to_persisted()
    }

    fn render_cell(&mut self, commit: bool, palette: &Palette) -> String {
        self.tick_at(Instant::now());
        palette.value(commit, &self.cell_text())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
