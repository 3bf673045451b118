use crate::format::{format_bytes, format_duration, format_float_exact};
use crate::metric::{Header, Metric, unsupported};
use crate::value::{Value, ValueKind};
use crate::Result;
use std::any::Any;

/// How a scalar metric stores and renders its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Plain decimal integer.
    Integer,
    /// Integer byte count, rendered with binary prefixes.
    Bytes,
    /// Float with one decimal place.
    Float,
    /// Seconds, rendered as ms / s / m. Starts unset.
    Duration,
}

impl ScalarKind {
    fn default_width(self) -> usize {
        match self {
            ScalarKind::Integer | ScalarKind::Bytes => 7,
            ScalarKind::Float | ScalarKind::Duration => 6,
        }
    }

    fn value_kind(self) -> ValueKind {
        match self {
            ScalarKind::Integer | ScalarKind::Bytes => ValueKind::Int,
            ScalarKind::Float | ScalarKind::Duration => ValueKind::Float,
        }
    }

    fn initial_value(self) -> Value {
        match self {
            ScalarKind::Integer | ScalarKind::Bytes => Value::Int(0),
            ScalarKind::Float => Value::Float(0.0),
            ScalarKind::Duration => Value::Unset,
        }
    }
}

/// Single numeric metric cell.
#[derive(Debug, Clone)]
pub struct Scalar {
    header: Header,
    kind: ScalarKind,
    value: Value,
}

impl Scalar {
    pub fn new(kind: ScalarKind, title: impl Into<String>) -> Self {
        Self {
            header: Header::new(title, kind.default_width()),
            kind,
            value: kind.initial_value(),
        }
    }

    pub fn integer(title: impl Into<String>) -> Self {
        Self::new(ScalarKind::Integer, title)
    }

    pub fn bytes(title: impl Into<String>) -> Self {
        Self::new(ScalarKind::Bytes, title)
    }

    pub fn float(title: impl Into<String>) -> Self {
        Self::new(ScalarKind::Float, title)
    }

    pub fn duration(title: impl Into<String>) -> Self {
        Self::new(ScalarKind::Duration, title)
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.header.set_subtitle(subtitle);
        self
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Clears the value, including for kinds whose initial value is zero.
    pub fn clear(&mut self) {
        self.value = Value::Unset;
    }

    /// Restores the kind's initial value (zero, or unset for durations).
    pub fn zero(&mut self) {
        self.value = self.kind.initial_value();
    }

    /// Stores a number coerced into the kind's value type. Float to Int
    /// truncates toward zero.
    pub fn set_number(&mut self, v: f64) {
        self.value = match self.kind.value_kind() {
            ValueKind::Int => Value::Int(v.trunc() as i64),
            ValueKind::Float => Value::Float(v),
        };
    }

    /// Adds one; an unset value becomes one.
    pub fn increment(&mut self) {
        let one = match self.kind.value_kind() {
            ValueKind::Int => Value::Int(1),
            ValueKind::Float => Value::Float(1.0),
        };
        self.value = self.value.plus(one);
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        value
            .coerce(self.kind.value_kind())
            .ok_or_else(|| unsupported(self.header.title(), value))
    }
}

impl Metric for Scalar {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn value(&self) -> Value {
        self.value
    }

    fn value_kind(&self) -> Option<ValueKind> {
        Some(self.kind.value_kind())
    }

    fn set_value(&mut self, value: Value) -> Result<()> {
        self.value = match value {
            Value::Unset => Value::Unset,
            v => self.coerce(v)?,
        };
        Ok(())
    }

    fn accumulate(&mut self, delta: Value) -> Result<()> {
        let delta = self.coerce(delta)?;
        self.value = self.value.plus(delta);
        Ok(())
    }

    fn deaccumulate(&mut self, delta: Value) -> Result<()> {
        let delta = self.coerce(delta)?;
        self.value = self.value.minus(delta);
        Ok(())
    }

    fn display(&self) -> String {
        match (self.kind, self.value) {
            (_, Value::Unset) => " ".to_string(),
            (ScalarKind::Bytes, v) => format_bytes(v.as_i64().unwrap_or_default()),
            (ScalarKind::Float, v) => format!("{:.1}", v.as_f64().unwrap_or_default()),
            (ScalarKind::Duration, v) => format_duration(v.as_f64().unwrap_or_default()),
            (ScalarKind::Integer, v) => v.to_string(),
        }
    }

    fn to_persisted(&self) -> String {
        match (self.kind, self.value) {
            (ScalarKind::Duration, Value::Unset) => String::new(),
            (_, Value::Unset) => " ".to_string(),
            (ScalarKind::Float | ScalarKind::Duration, v) => {
                format_float_exact(v.as_f64().unwrap_or_default())
            }
            (ScalarKind::Integer | ScalarKind::Bytes, v) => v.to_string(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
