use std::{cmp::Ordering, collections::HashMap, fmt};

use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};

/// A runtime value produced while evaluating a filter.
///
/// Filters are not type-checked up front. Every operator and comparator
/// matches on the shape of the values it receives and reports unsupported
/// combinations as errors.
///
/// # Examples
///
/// ```
/// use resfilter_lang::Value;
/// use std::collections::HashMap;
///
/// let code = Value::Integer(200);
/// let body = Value::String("<html>".to_string());
/// let headers = Value::Object(HashMap::from([(
///     "Server".to_string(),
///     Value::String("nginx".to_string()),
/// )]));
///
/// assert_eq!(code.as_string(), "200");
/// assert!(body.is_truthy());
/// assert_eq!(headers.type_name(), "object");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (JSON null)
    Null,

    /// Boolean, produced by comparisons and by `startswith`/`unique`
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (status codes, counters, indices)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// Mapping from string keys to values
    Object(HashMap<String, Value>),
}

impl Value {
    /// Check if the value is truthy (for folding clause values)
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null => false,
            Boolean(b) => *b,
            Float(n) => *n != 0.0,
            Integer(n) => *n != 0,
            String(s) => !s.is_empty(),
            Array(arr) => !arr.is_empty(),
            Object(obj) => !obj.is_empty(),
        }
    }

    /// Convert to boolean for conditions
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            _ => self.is_truthy(),
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Some(*n as i64),
            _ => None,
        }
    }

    /// Loose string form used by `=` and the text operators.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(n) => n.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(_) | Value::Object(_) => self.canonical(),
        }
    }

    /// Human-readable name of the value's shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Deterministic JSON-like rendering with sorted object keys.
    ///
    /// Strings are quoted, so `1` and `"1"` render differently. This is the
    /// identity the uniqueness cache remembers.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        match self {
            Value::String(s) => {
                out.push('"');
                for ch in s.chars() {
                    match ch {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                        c => out.push(c),
                    }
                }
                out.push('"');
            }
            Value::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out);
                }
                out.push(']');
            }
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                out.push('{');
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    Value::String(key.clone()).write_canonical(out);
                    out.push(':');
                    map[key].write_canonical(out);
                }
                out.push('}');
            }
            scalar => out.push_str(&scalar.as_string()),
        }
    }

    /// Equality that treats integers and floats as one numeric domain.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                self.compare(other) == Some(Ordering::Equal)
            }
            _ => self == other,
        }
    }

    /// Total order between comparable values: numbers, strings, booleans.
    ///
    /// Returns `None` for shapes that have no order between them.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Order-preserving "add": `self` first, `other` second.
    ///
    /// Numbers are summed (mixed integer/float sums go through exact decimal
    /// arithmetic and collapse back to an integer when whole), strings and
    /// arrays are concatenated, and a scalar joins an array at the matching
    /// end. Returns `None` for incompatible shapes.
    pub fn add(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.checked_add(*b).map(Value::Integer),
            (Value::Float(a), Value::Float(b)) => Some(Value::Float(a + b)),
            (Value::Integer(a), Value::Float(b)) => Some(mixed_sum(*a, *b)),
            (Value::Float(a), Value::Integer(b)) => Some(mixed_sum(*b, *a)),
            (Value::String(a), Value::String(b)) => Some(Value::String(format!("{}{}", a, b))),
            (Value::Array(a), Value::Array(b)) => {
                let mut joined = a.clone();
                joined.extend(b.iter().cloned());
                Some(Value::Array(joined))
            }
            (Value::Array(a), item) => {
                let mut joined = a.clone();
                joined.push(item.clone());
                Some(Value::Array(joined))
            }
            (item, Value::Array(b)) => {
                let mut joined = Vec::with_capacity(b.len() + 1);
                joined.push(item.clone());
                joined.extend(b.iter().cloned());
                Some(Value::Array(joined))
            }
            _ => None,
        }
    }
}

fn mixed_sum(int: i64, float: f64) -> Value {
    if let Some(id) = Decimal::from_i64(int)
        && let Some(fd) = Decimal::from_f64(float)
    {
        let rd = id + fd;
        if rd.is_integer()
            && let Some(r) = rd.to_i64()
        {
            return Value::Integer(r);
        } else if let Some(r) = rd.to_f64() {
            return Value::Float(r);
        }
    }
    Value::Float(int as f64 + float)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
