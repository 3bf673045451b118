use crate::group::MetricGroup;
use crate::metric::{Header, Metric};
use crate::scalar::Scalar;
use crate::style::Palette;
use crate::value::{Value, ValueKind};
use crate::Result;
use std::any::Any;
use std::time::{Duration, Instant};

/// Shortest interval over which a rate is recomputed.
pub const MIN_RATE_INTERVAL: Duration = Duration::from_millis(900);

pub const TOTAL: &str = "total";
pub const PER_SEC: &str = "persec";

/// A running total plus its per-second rate of change.
///
/// The rate is recomputed when a committed line is rendered, and only once at
/// least [`MIN_RATE_INTERVAL`] has passed since the previous computation.
/// The rate is blanked after every committed line, so a commit that falls
/// inside the interval shows and persists an empty rate. The metric's own
/// value is the total.
#[derive(Debug)]
pub struct TotalAndRate {
    group: MetricGroup,
    last_total: f64,
    last_time: Instant,
}

impl TotalAndRate {
    /// Integer total with a float rate.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_children(title, Scalar::integer("total"), Scalar::float("/sec"), Instant::now())
    }

    /// Byte total with a byte rate, both rendered with binary prefixes.
    pub fn traffic(title: impl Into<String>) -> Self {
        Self::with_children(title, Scalar::bytes("total"), Scalar::bytes("/sec"), Instant::now())
    }

    /// Like [`TotalAndRate::new`] with an explicit baseline time.
    pub fn started_at(title: impl Into<String>, start: Instant) -> Self {
        Self::with_children(title, Scalar::integer("total"), Scalar::float("/sec"), start)
    }

    fn with_children(
        title: impl Into<String>,
        total: Scalar,
        mut per_sec: Scalar,
        start: Instant,
    ) -> Self {
        per_sec.clear();
        let group = MetricGroup::new(title)
            .with(TOTAL, total)
            .with(PER_SEC, per_sec);
        Self {
            group,
            last_total: 0.0,
            last_time: start,
        }
    }

    pub fn group(&self) -> &MetricGroup {
        &self.group
    }

    /// Extra columns can be attached next to `total` and `/sec`.
    pub fn group_mut(&mut self) -> &mut MetricGroup {
        &mut self.group
    }

    pub fn total(&self) -> Value {
        self.group.child_value(TOTAL)
    }

    pub fn rate(&self) -> Value {
        self.group.child_value(PER_SEC)
    }

    /// Recomputes the rate as of `now`, unless the previous computation was
    /// less than [`MIN_RATE_INTERVAL`] ago.
    pub fn calc_at(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_time);
        if elapsed < MIN_RATE_INTERVAL {
            tracing::trace!(
                metric = self.group.title(),
                elapsed_secs = elapsed.as_secs_f64(),
                "rate interval too short, keeping previous rate"
            );
            return;
        }

        let total = self.total().as_f64().unwrap_or_default();
        let rate = (total - self.last_total) / elapsed.as_secs_f64();
        self.last_total = total;
        self.last_time = now;

        tracing::debug!(metric = self.group.title(), rate, "rate recomputed");
        if let Some(per_sec) = self.group.get_as_mut::<Scalar>(PER_SEC) {
            per_sec.set_number(rate);
        }
    }

    fn total_mut(&mut self) -> Option<&mut (dyn Metric + 'static)> {
        self.group.children_mut().get_mut(TOTAL)
    }
}

impl Metric for TotalAndRate {
    fn header(&self) -> &Header {
        self.group.header()
    }

    fn header_mut(&mut self) -> &mut Header {
        self.group.header_mut()
    }

    fn value(&self) -> Value {
        self.total()
    }

    fn display(&self) -> String {
        self.group.display()
    }

    fn value_kind(&self) -> Option<ValueKind> {
        self.group.get(TOTAL).and_then(|total| total.value_kind())
    }

    fn set_value(&mut self, value: Value) -> Result<()> {
        match self.total_mut() {
            Some(total) => total.set_value(value),
            None => Err(crate::metric::unsupported(self.group.title(), value)),
        }
    }

    fn accumulate(&mut self, delta: Value) -> Result<()> {
        match self.total_mut() {
            Some(total) => total.accumulate(delta),
            None => Err(crate::metric::unsupported(self.group.title(), delta)),
        }
    }

    fn deaccumulate(&mut self, delta: Value) -> Result<()> {
        match self.total_mut() {
            Some(total) => total.deaccumulate(delta),
            None => Err(crate::metric::unsupported(self.group.title(), delta)),
        }
    }

    /// Blanks the rate after a committed line; the baseline is kept.
    fn reset(&mut self) {
        if let Some(per_sec) = self.group.get_as_mut::<Scalar>(PER_SEC) {
            per_sec.clear();
        }
    }

    fn render_subtitle(&mut self, palette: &Palette) -> String {
        self.group.render_subtitle(palette)
    }

    fn cell_text(&self) -> String {
        self.group.cell_text()
    }

    fn render_cell(&mut self, commit: bool, palette: &Palette) -> String {
        if commit {
            self.calc_at(Instant::now());
        }
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

    #[test]
    fn test_rate_over_one_second() {
        let start = Instant::now();
        let mut foo = TotalAndRate::started_at("foo", start);
        assert!(foo.rate().is_unset());

        foo.accumulate(Value::Int(100)).unwrap();
        foo.calc_at(start + Duration::from_secs(1));
        assert_eq!(foo.rate(), Value::Float(100.0));
    }

    #[test]
    fn test_calc_at_skips_short_interval() {
        let start = Instant::now();
        let mut foo = TotalAndRate::started_at("foo", start);
        foo.accumulate(Value::Int(100)).unwrap();
        foo.calc_at(start + Duration::from_secs(1));

        foo.accumulate(Value::Int(500)).unwrap();
        foo.calc_at(start + Duration::from_millis(1500));
        assert_eq!(foo.rate(), Value::Float(100.0));

        // The skipped computation does not move the baseline.
        foo.calc_at(start + Duration::from_secs(3));
        assert_eq!(foo.rate(), Value::Float(250.0));
    }

    #[test]
    fn test_reset_blanks_rate_and_keeps_baseline() {
        let start = Instant::now();
        let mut foo = TotalAndRate::started_at("foo", start);
        foo.accumulate(Value::Int(100)).unwrap();
        foo.calc_at(start + Duration::from_secs(1));
        foo.reset();

        assert!(foo.rate().is_unset());
        assert_eq!(foo.total(), Value::Int(100));

        foo.accumulate(Value::Int(50)).unwrap();
        foo.calc_at(start + Duration::from_secs(2));
        assert_eq!(foo.rate(), Value::Float(50.0));
    }

    #[test]
    fn test_value_aliases_total() {
        let mut foo = TotalAndRate::new("foo");
        foo.accumulate(Value::Int(7)).unwrap();
        foo.set_value(Value::Float(12.9)).unwrap();
        assert_eq!(foo.value(), Value::Int(12));
        assert_eq!(foo.total(), Value::Int(12));
        assert_eq!(foo.value_kind(), Some(ValueKind::Int));
    }

    #[test]
    fn test_traffic_renders_bytes() {
        let start = Instant::now();
        let mut traffic = TotalAndRate::traffic("traffic");
        traffic.last_time = start;
        traffic.accumulate(Value::Int(2048)).unwrap();
        traffic.calc_at(start + Duration::from_secs(2));

        traffic.render_subtitle(&Palette::plain());
        assert_eq!(traffic.cell_text(), "  2.00K   1.00K");
        assert_eq!(traffic.group().get(PER_SEC).unwrap().to_persisted(), "1024");
    }

    #[test]
    fn test_extra_child_columns() {
        let mut foo = TotalAndRate::new("foo");
        foo.group_mut().insert("bar", Scalar::integer("bar"));
        let subtitle = foo.render_subtitle(&Palette::plain());
        assert_eq!(subtitle, "  total   /sec     bar");
        assert_eq!(foo.width(), 22);
    }
}
