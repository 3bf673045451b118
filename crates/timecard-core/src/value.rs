use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

/// Current value of a metric cell.
#[derive(Debug, Clone, Copy, Default)]
pub enum Value {
    Int(i64),
    Float(f64),
    Time(NaiveDateTime),
    #[default]
    Unset,
}

/// Value type a metric declares; assignments are coerced into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
}

impl Value {
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    /// Converts a numeric value into `kind`. Float to Int truncates toward zero.
    pub fn coerce(self, kind: ValueKind) -> Option<Value> {
        match (self, kind) {
            (Value::Int(v), ValueKind::Int) => Some(Value::Int(v)),
            (Value::Int(v), ValueKind::Float) => Some(Value::Float(v as f64)),
            (Value::Float(v), ValueKind::Int) => Some(Value::Int(v.trunc() as i64)),
            (Value::Float(v), ValueKind::Float) => Some(Value::Float(v)),
            (Value::Time(_), _) | (Value::Unset, _) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Time(_) | Value::Unset => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) => Some(v.trunc() as i64),
            Value::Time(_) | Value::Unset => None,
        }
    }

    /// Adds an already coerced delta. An unset value takes the delta as is.
    pub(crate) fn plus(self, delta: Value) -> Value {
        match (self, delta) {
            (Value::Unset, d) => d,
            (Value::Int(a), Value::Int(b)) => Value::Int(a.saturating_add(b)),
            (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
            (Value::Int(a), Value::Float(b)) => Value::Float(a as f64 + b),
            (Value::Float(a), Value::Int(b)) => Value::Float(a + b as f64),
            (v, _) => v,
        }
    }

    /// Subtracts an already coerced delta. An unset value takes the delta
    /// unnegated, matching the historical behaviour of the subtract operation.
    pub(crate) fn minus(self, delta: Value) -> Value {
        match (self, delta) {
            (Value::Unset, d) => d,
            (Value::Int(a), Value::Int(b)) => Value::Int(a.saturating_sub(b)),
            (Value::Float(a), Value::Float(b)) => Value::Float(a - b),
            (Value::Int(a), Value::Float(b)) => Value::Float(a as f64 - b),
            (Value::Float(a), Value::Int(b)) => Value::Float(a - b as f64),
            (v, _) => v,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.partial_cmp(other), Some(Ordering::Equal))
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Unset, Value::Unset) => Some(Ordering::Equal),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Time(t) => write!(f, "{}", t),
            Value::Unset => write!(f, "unset"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Time(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Unset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_float_to_int_truncates() {
        assert_eq!(Value::Float(2.9).coerce(ValueKind::Int), Some(Value::Int(2)));
        assert_eq!(Value::Float(-2.9).coerce(ValueKind::Int), Some(Value::Int(-2)));
        assert_eq!(Value::Int(3).coerce(ValueKind::Float), Some(Value::Float(3.0)));
        assert_eq!(Value::Unset.coerce(ValueKind::Int), None);
    }

    #[test]
    fn test_plus_initializes_unset() {
        assert_eq!(Value::Unset.plus(Value::Int(5)), Value::Int(5));
        assert_eq!(Value::Int(5).plus(Value::Int(2)), Value::Int(7));
    }

    #[test]
    fn test_minus_on_unset_keeps_sign() {
        assert_eq!(Value::Unset.minus(Value::Int(5)), Value::Int(5));
        assert_eq!(Value::Int(5).minus(Value::Int(2)), Value::Int(3));
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        assert!(Value::Int(1) < Value::Float(1.5));
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_eq!(Value::Unset.partial_cmp(&Value::Int(0)), None);
        assert_eq!(Value::Unset, Value::Unset);
    }
}
