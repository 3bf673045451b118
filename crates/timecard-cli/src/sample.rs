//! The demo table driven by `timecard`: one column of every metric kind,
//! fed with pseudo-random values.

use crate::config::Config;
use rand::Rng;
use std::thread;
use std::time::Duration;
use timecard_core::{
    ClockTime, ConsoleSink, ElapsedTime, MetricGroup, Result, Scalar, Timecard, Timeit,
    TotalAndRate,
};

/// One step of the timed burst.
pub const BURST_STEP: Duration = Duration::from_millis(10);
/// Upper bound on the number of steps per burst.
pub const MAX_BURST: u32 = 100;

/// Builds the demo table on `console`, with a CSV file when one is configured.
pub fn build_table(config: &Config, console: impl ConsoleSink + 'static) -> Timecard {
    let mut table = Timecard::new(console).with_palette(config.palette());
    if let Some(path) = &config.csv {
        table = table.with_csv(path);
    }

    table.attach("time", ClockTime::new("time", config.show_date));
    table.attach("delta", ElapsedTime::new("delta"));
    table.attach("timeit", Timeit::new("timeit", &config.limits));
    table.attach("count", Scalar::integer("count"));
    table.attach("float", Scalar::float("float"));

    let mut foo = TotalAndRate::new("foo");
    foo.group_mut().insert("bar", Scalar::integer("bar"));
    table.attach("foo", foo);

    table.attach(
        "rand",
        MetricGroup::new("random")
            .with("a", Scalar::integer("a"))
            .with("b", Scalar::integer("b"))
            .with("c", Scalar::integer("c")),
    );
    table.attach("bytes", Scalar::bytes("bytes"));
    table.attach("traffic", TotalAndRate::traffic("traffic"));
    table
}

/// Advances every demo metric by one tick. The timed burst sleeps up to
/// [`MAX_BURST`] times `step`.
pub fn tick<R: Rng + ?Sized>(table: &mut Timecard, rng: &mut R, step: Duration) -> Result<()> {
    table.accumulate("count", 1)?;
    table.accumulate("float", 0.1)?;
    table.accumulate("foo", rng.gen_range(0..=100_i64))?;
    if let Some(foo) = table.get_as_mut::<TotalAndRate>("foo") {
        foo.group_mut().accumulate_child("bar", rng.gen_range(0..=100_i64))?;
    }

    if let Some(group) = table.get_as_mut::<MetricGroup>("rand") {
        for name in ["a", "b", "c"] {
            group.set(name, rng.gen_range(0..=100_i64))?;
        }
    }

    table.set("bytes", rng.gen_range(0..=1_000_000_i64))?;
    table.accumulate("traffic", rng.gen_range(0..=1_000_000_i64))?;

    let steps = rng.gen_range(0..=MAX_BURST);
    if let Some(timeit) = table.get_as_mut::<Timeit>("timeit") {
        let _guard = timeit.start();
        for _ in 0..steps {
            thread::sleep(step);
        }
    }

    tracing::trace!(steps, "tick");
    Ok(())
}
