//! Live console tables of metric values, in the style of `dstat`.
//!
//! A [`Timecard`] owns an ordered set of metrics. The caller mutates them each
//! tick and calls [`Timecard::write_line`]; provisional lines are redrawn in
//! place, committed lines stay on screen and are appended to an optional CSV
//! file.
//!
//! ```no_run
//! use timecard_core::{Scalar, Timecard, TotalAndRate};
//!
//! # fn main() -> timecard_core::Result<()> {
//! let mut table = Timecard::stdout().with_csv("stats.csv");
//! table.attach("count", Scalar::integer("count"));
//! table.attach("traffic", TotalAndRate::traffic("traffic"));
//! table.write_headers()?;
//!
//! for tick in 1..=10 {
//!     table.accumulate("count", 1)?;
//!     table.accumulate("traffic", 4096)?;
//!     table.write_line(tick % 5 == 0)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod console;
pub mod csv_sink;
pub mod error;
pub mod format;
pub mod group;
pub mod map;
pub mod metric;
pub mod rate;
pub mod scalar;
pub mod style;
pub mod table;
pub mod timeit;
pub mod value;

pub use clock::{ClockTime, ElapsedTime};
pub use console::{ConsoleSink, MemoryConsole, StdoutConsole};
pub use csv_sink::CsvSink;
pub use error::{Error, Result};
pub use group::MetricGroup;
pub use map::MetricMap;
pub use metric::{Header, Metric};
pub use rate::TotalAndRate;
pub use scalar::{Scalar, ScalarKind};
pub use style::Palette;
pub use table::Timecard;
pub use timeit::{Timeit, TimingGuard};
pub use value::{Value, ValueKind};
