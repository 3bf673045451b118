use crate::metric::Metric;
use crate::scalar::Scalar;
use crate::value::Value;
use crate::{Error, Result};

/// Insertion-ordered mapping from name to metric.
///
/// Insertion order is rendering order. Replacing an existing name keeps its
/// position.
#[derive(Debug, Default)]
pub struct MetricMap {
    entries: Vec<(String, Box<dyn Metric>)>,
}

impl MetricMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }

    /// Attaches `metric` under `name`, replacing any metric already there.
    pub fn insert(&mut self, name: impl Into<String>, metric: impl Metric + 'static) {
        self.insert_boxed(name, Box::new(metric));
    }

    pub fn insert_boxed(&mut self, name: impl Into<String>, metric: Box<dyn Metric>) {
        let name = name.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1 = metric,
            None => self.entries.push((name, metric)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Metric> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, metric)| metric.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Metric + 'static)> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, metric)| metric.as_mut())
    }

    /// Typed lookup, `None` when the name is missing or holds another type.
    pub fn get_as<T: Metric + 'static>(&self, name: &str) -> Option<&T> {
        self.get(name)?.as_any().downcast_ref::<T>()
    }

    pub fn get_as_mut<T: Metric + 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.get_mut(name)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn require(&self, name: &str) -> Result<&dyn Metric> {
        self.get(name)
            .ok_or_else(|| Error::UnknownMetric(name.to_string()))
    }

    pub fn require_mut(&mut self, name: &str) -> Result<&mut (dyn Metric + 'static)> {
        self.get_mut(name)
            .ok_or_else(|| Error::UnknownMetric(name.to_string()))
    }

    /// Assigns a scalar to the metric under `name`, coerced into the metric's
    /// declared value type.
    ///
    /// `Value::Unset` leaves an existing metric untouched. A number set on a
    /// missing name attaches a new integer or float metric titled `name`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if let Some(metric) = self.get_mut(name) {
            if value.is_unset() {
                return Ok(());
            }
            if metric.value_kind().is_none() {
                return Err(crate::metric::unsupported(metric.title(), value));
            }
            return metric.set_value(value);
        }

        let mut metric = match value {
            Value::Int(_) => Scalar::integer(name),
            Value::Float(_) => Scalar::float(name),
            Value::Time(_) | Value::Unset => {
                return Err(Error::UnknownMetric(name.to_string()));
            }
        };
        metric.set_value(value)?;
        self.insert(name, metric);
        Ok(())
    }

    pub fn accumulate(&mut self, name: &str, delta: impl Into<Value>) -> Result<()> {
        self.require_mut(name)?.accumulate(delta.into())
    }

    pub fn deaccumulate(&mut self, name: &str, delta: impl Into<Value>) -> Result<()> {
        self.require_mut(name)?.deaccumulate(delta.into())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Metric)> {
        self.entries
            .iter()
            .map(|(key, metric)| (key.as_str(), metric.as_ref()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut (dyn Metric + 'static))> {
        self.entries
            .iter_mut()
            .map(|(key, metric)| (key.as_str(), metric.as_mut()))
    }

    pub fn values(&self) -> impl Iterator<Item = &dyn Metric> {
        self.entries.iter().map(|(_, metric)| metric.as_ref())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut (dyn Metric + 'static)> {
        self.entries.iter_mut().map(|(_, metric)| metric.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;

    #[test]
    fn test_insertion_order_is_kept() {
        let mut map = MetricMap::new();
        map.insert("b", Scalar::integer("b"));
        map.insert("a", Scalar::integer("a"));
        map.insert("c", Scalar::integer("c"));
        map.insert("a", Scalar::float("a2"));

        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(map.require("a").unwrap().title(), "a2");
    }

    #[test]
    fn test_set_coerces_into_existing_metric() {
        let mut map = MetricMap::new();
        map.insert("count", Scalar::integer("count"));
        map.set("count", 4.8).unwrap();
        assert_eq!(map.require("count").unwrap().value(), Value::Int(4));

        map.set("count", Value::Unset).unwrap();
        assert_eq!(map.require("count").unwrap().value(), Value::Int(4));
    }

    #[test]
    fn test_set_on_missing_name_attaches_metric() {
        let mut map = MetricMap::new();
        map.set("hits", 3).unwrap();
        map.set("ratio", 0.5).unwrap();

        let hits = map.get_as::<Scalar>("hits").unwrap();
        assert_eq!(hits.value(), Value::Int(3));
        assert_eq!(map.require("ratio").unwrap().value(), Value::Float(0.5));
    }

    #[test]
    fn test_set_without_value_type_fails() {
        let mut map = MetricMap::new();
        map.insert("time", ClockTime::default());
        let err = map.set("time", 1).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { .. }));
    }

    #[test]
    fn test_accumulate_unknown_name() {
        let mut map = MetricMap::new();
        let err = map.accumulate("missing", 1).unwrap_err();
        assert!(matches!(err, Error::UnknownMetric(name) if name == "missing"));
    }

    #[test]
    fn test_typed_lookup_checks_type() {
        let mut map = MetricMap::new();
        map.insert("count", Scalar::integer("count"));
        assert!(map.get_as::<ClockTime>("count").is_none());
        map.get_as_mut::<Scalar>("count").unwrap().clear();
        assert!(map.require("count").unwrap().value().is_unset());
    }
}
