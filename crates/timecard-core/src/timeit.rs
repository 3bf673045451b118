use crate::group::MetricGroup;
use crate::metric::{Header, Metric};
use crate::scalar::Scalar;
use crate::style::Palette;
use crate::value::Value;
use std::any::Any;
use std::time::{Duration, Instant};

const MIN: &str = "min";
const AVERAGE: &str = "average";
const MAX: &str = "max";

/// Execution-time sampler: min, running average and max of the samples taken
/// since the last committed line, plus one counter per threshold.
///
/// The average is `(previous + sample) / 2`, so recent samples weigh more
/// than a true mean would give them. Each sample bumps at most one counter,
/// that of the largest threshold it reaches.
#[derive(Debug)]
pub struct Timeit {
    group: MetricGroup,
    /// Thresholds in seconds, largest first.
    limits: Vec<f64>,
}

impl Timeit {
    pub fn new(title: impl Into<String>, limits: &[f64]) -> Self {
        let mut group = MetricGroup::new(title)
            .with(MIN, Scalar::duration("min"))
            .with(AVERAGE, Scalar::duration("avr"))
            .with(MAX, Scalar::duration("max"));

        let mut ascending: Vec<f64> = limits.iter().copied().filter(|l| !l.is_nan()).collect();
        ascending.sort_by(f64::total_cmp);
        ascending.dedup();
        for limit in &ascending {
            group.insert(limit_key(*limit), Scalar::integer(format!(">{:.1}s", limit)));
        }

        ascending.reverse();
        let mut timeit = Self {
            group,
            limits: ascending,
        };
        timeit.reset();
        timeit
    }

    pub fn group(&self) -> &MetricGroup {
        &self.group
    }

    pub fn limits(&self) -> &[f64] {
        &self.limits
    }

    pub fn min(&self) -> Value {
        self.group.child_value(MIN)
    }

    pub fn average(&self) -> Value {
        self.group.child_value(AVERAGE)
    }

    pub fn max(&self) -> Value {
        self.group.child_value(MAX)
    }

    /// Counter of samples whose largest reached threshold is `limit`.
    pub fn bucket(&self, limit: f64) -> Value {
        self.group.child_value(&limit_key(limit))
    }

    /// Feeds one elapsed duration into the statistics.
    pub fn record(&mut self, elapsed: Duration) {
        let sample = elapsed.as_secs_f64();

        let (min, average, max) = match (
            self.min().as_f64(),
            self.average().as_f64(),
            self.max().as_f64(),
        ) {
            (Some(min), Some(average), Some(max)) => {
                (min.min(sample), (average + sample) / 2.0, max.max(sample))
            }
            _ => (sample, sample, sample),
        };
        self.set_stat(MIN, min);
        self.set_stat(AVERAGE, average);
        self.set_stat(MAX, max);

        if let Some(limit) = self.limits.iter().copied().find(|limit| sample >= *limit) {
            if let Some(bucket) = self.group.get_as_mut::<Scalar>(&limit_key(limit)) {
                bucket.increment();
            }
        }

        tracing::trace!(metric = self.group.title(), sample, "timing sample recorded");
    }

    fn set_stat(&mut self, name: &str, secs: f64) {
        if let Some(stat) = self.group.get_as_mut::<Scalar>(name) {
            stat.set_number(secs);
        }
    }

    /// Starts a timed scope; the sample is recorded when the guard drops,
    /// including during unwinding.
    pub fn start(&mut self) -> TimingGuard<'_> {
        TimingGuard {
            timeit: self,
            started: Instant::now(),
        }
    }

    /// Times `op` and returns its result. The sample is recorded whether or
    /// not `op` fails.
    pub fn measure<T, E>(&mut self, op: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let _guard = self.start();
        op()
    }

    /// Times `op` and discards its error after recording the sample.
    pub fn measure_suppressed<T, E>(&mut self, op: impl FnOnce() -> Result<T, E>) -> Option<T> {
        self.measure(op).ok()
    }
}

fn limit_key(limit: f64) -> String {
    limit.to_string()
}

/// Records the time since [`Timeit::start`] into the sampler on drop.
#[must_use = "the sample is recorded when the guard is dropped"]
pub struct TimingGuard<'a> {
    timeit: &'a mut Timeit,
    started: Instant,
}

impl TimingGuard<'_> {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        self.timeit.record(self.started.elapsed());
    }
}

impl Metric for Timeit {
    fn header(&self) -> &Header {
        self.group.header()
    }

    fn header_mut(&mut self) -> &mut Header {
        self.group.header_mut()
    }

    fn value(&self) -> Value {
        Value::Unset
    }

    fn display(&self) -> String {
        self.group.display()
    }

    fn reset(&mut self) {
        for name in [MIN, AVERAGE, MAX] {
            if let Some(stat) = self.group.get_as_mut::<Scalar>(name) {
                stat.clear();
            }
        }
        for limit in self.limits.clone() {
            if let Some(bucket) = self.group.get_as_mut::<Scalar>(&limit_key(limit)) {
                bucket.zero();
            }
        }
    }

    fn render_subtitle(&mut self, palette: &Palette) -> String {
        self.group.render_subtitle(palette)
    }

    fn cell_text(&self) -> String {
        self.group.cell_text()
    }

    fn render_cell(&mut self, commit: bool, palette: &Palette) -> String {
        self.group.render_cell(commit, palette)
    }

    fn as_group(&self) -> Option<&MetricGroup> {
        Some(&self.group)
    }

    fn as_group_mut(&mut self) -> Option<&mut MetricGroup> {
        Some(&mut self.group)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: f64) -> Duration {
        Duration::from_secs_f64(value)
    }

    fn approx(value: Value, expected: f64) -> bool {
        value
            .as_f64()
            .is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_children_and_bucket_titles() {
        let timeit = Timeit::new("timeit", &[1.0, 0.2, 0.5]);
        let titles: Vec<_> = timeit
            .group()
            .children()
            .values()
            .map(|m| m.title().to_string())
            .collect();
        assert_eq!(titles, vec!["min", "avr", "max", ">0.2s", ">0.5s", ">1.0s"]);
        assert_eq!(timeit.limits(), &[1.0, 0.5, 0.2]);
    }

    #[test]
    fn test_samples_track_min_max_and_running_average() {
        let mut timeit = Timeit::new("timeit", &[0.1, 0.5]);
        assert!(timeit.min().is_unset());

        timeit.record(secs(0.05));
        timeit.record(secs(0.2));
        timeit.record(secs(0.1));

        assert!(approx(timeit.min(), 0.05));
        assert!(approx(timeit.max(), 0.2));
        assert!(approx(timeit.average(), ((0.05 + 0.2) / 2.0 + 0.1) / 2.0));
    }

    #[test]
    fn test_one_bucket_per_sample() {
        let mut timeit = Timeit::new("timeit", &[0.1, 0.5]);
        timeit.record(secs(0.05));
        timeit.record(secs(0.2));
        timeit.record(secs(0.1));
        timeit.record(secs(0.7));

        assert_eq!(timeit.bucket(0.1), Value::Int(2));
        assert_eq!(timeit.bucket(0.5), Value::Int(1));
    }

    #[test]
    fn test_reset_clears_statistics() {
        let mut timeit = Timeit::new("timeit", &[0.1]);
        timeit.record(secs(0.3));
        timeit.reset();

        assert!(timeit.min().is_unset());
        assert!(timeit.average().is_unset());
        assert!(timeit.max().is_unset());
        assert_eq!(timeit.bucket(0.1), Value::Int(0));

        timeit.record(secs(0.01));
        assert!(approx(timeit.average(), 0.01));
    }

    #[test]
    fn test_measure_records_on_error() {
        let mut timeit = Timeit::new("timeit", &[]);
        let result: Result<(), &str> = timeit.measure(|| Err("boom"));
        assert_eq!(result, Err("boom"));
        assert!(!timeit.max().is_unset());
    }

    #[test]
    fn test_measure_suppressed_swallows_error() {
        let mut timeit = Timeit::new("timeit", &[]);
        let value = timeit.measure_suppressed(|| Err::<u8, _>("boom"));
        assert_eq!(value, None);
        assert!(!timeit.min().is_unset());

        let value = timeit.measure_suppressed(|| Ok::<_, &str>(7));
        assert_eq!(value, Some(7));
    }

    #[test]
    fn test_guard_records_on_panic() {
        let mut timeit = Timeit::new("timeit", &[]);
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = timeit.start();
            panic!("operation failed");
        }));
        assert!(outcome.is_err());
        assert!(!timeit.max().is_unset());
    }

    #[test]
    fn test_provisional_cells_before_first_sample() {
        let mut timeit = Timeit::new("timeit", &[0.5]);
        timeit.render_subtitle(&Palette::plain());
        let blank = " ".repeat(6);
        assert_eq!(
            timeit.cell_text(),
            format!("{blank} {blank} {blank} {:>7}", 0)
        );
    }
}
