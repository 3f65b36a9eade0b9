use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::value::Value;

/// A segment in a dotted field path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Object field access by name
    ///
    /// # Examples
    /// - `code` → `Field("code")`
    /// - `headers.response` → `[Field("headers"), Field("response")]`
    Field(String),

    /// Array element access by index
    ///
    /// # Examples
    /// - `history.0` → `[Field("history"), Index(0)]`
    /// - `history.-1` → `[Field("history"), Index(-1)]` (counts from the end)
    ///
    /// # Note
    /// On objects an index segment falls back to the string key, so
    /// `params.1` still reaches a key named `"1"`.
    Index(i64),
}

impl PathSegment {
    fn key(&self) -> String {
        match self {
            PathSegment::Field(name) => name.clone(),
            PathSegment::Index(n) => n.to_string(),
        }
    }
}

/// A dotted attribute path such as `headers.response.Server`.
///
/// Keeps the source text alongside the parsed segments: the text is what
/// baseline lookups match shorthand tags against.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        if raw.is_empty() {
            return Err(LookupError::InvalidPath(raw.to_string()));
        }

        let mut segments = Vec::new();
        for part in raw.split('.') {
            if part.is_empty() {
                return Err(LookupError::InvalidPath(raw.to_string()));
            }
            let looks_numeric = part
                .strip_prefix('-')
                .unwrap_or(part)
                .chars()
                .all(|c| c.is_ascii_digit());
            match part.parse::<i64>() {
                Ok(n) if looks_numeric => segments.push(PathSegment::Index(n)),
                _ => segments.push(PathSegment::Field(part.to_string())),
            }
        }

        Ok(FieldPath {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// First segment as a key; records use it to resolve their attributes.
    pub fn head(&self) -> String {
        self.segments[0].key()
    }

    /// Everything after the first segment.
    pub fn rest(&self) -> &[PathSegment] {
        &self.segments[1..]
    }
}

impl FromStr for FieldPath {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Failures of the get/set-by-path capability.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("invalid field path '{0}'")]
    InvalidPath(String),

    #[error("field '{0}' not found")]
    NotFound(String),

    #[error("payload {0} does not exist")]
    PayloadOutOfRange(usize),

    #[error("cannot navigate into {found} with segment '{segment}'")]
    NotNavigable {
        segment: String,
        found: &'static str,
    },

    #[error("cannot combine {existing} with {new}")]
    Incompatible {
        existing: &'static str,
        new: &'static str,
    },
}

/// How an assignment folds the new value into the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combiner {
    /// `existing + new` (`=+`)
    Append,
    /// `new + existing` (`=-`)
    Prepend,
}

impl Combiner {
    pub fn apply(self, existing: &Value, new: &Value) -> Result<Value, LookupError> {
        let combined = match self {
            Combiner::Append => existing.add(new),
            Combiner::Prepend => new.add(existing),
        };
        combined.ok_or(LookupError::Incompatible {
            existing: existing.type_name(),
            new: new.type_name(),
        })
    }
}

fn resolve_index(idx: i64, len: usize) -> Option<usize> {
    if idx >= 0 {
        let index = idx as usize;
        (index < len).then_some(index)
    } else {
        let abs = idx.unsigned_abs() as usize;
        (abs <= len).then(|| len - abs)
    }
}

/// Follow `path` from `root`, failing on the first missing segment.
pub fn lookup<'a>(root: &'a Value, path: &[PathSegment]) -> Result<&'a Value, LookupError> {
    let mut current = root;
    for segment in path {
        current = match (current, segment) {
            (Value::Object(map), segment) => {
                let key = segment.key();
                map.get(&key).ok_or(LookupError::NotFound(key))?
            }
            (Value::Array(arr), PathSegment::Index(idx)) => resolve_index(*idx, arr.len())
                .and_then(|i| arr.get(i))
                .ok_or_else(|| LookupError::NotFound(idx.to_string()))?,
            (v, segment) => {
                return Err(LookupError::NotNavigable {
                    segment: segment.key(),
                    found: v.type_name(),
                });
            }
        };
    }
    Ok(current)
}

/// Write `value` at `path` below `root`.
///
/// Intermediate segments must exist. Without a combiner the last object key
/// is created if missing; with one, the existing value is required.
pub fn assign(
    root: &mut Value,
    path: &[PathSegment],
    value: Value,
    combiner: Option<Combiner>,
) -> Result<(), LookupError> {
    let Some((last, parents)) = path.split_last() else {
        return match combiner {
            None => {
                *root = value;
                Ok(())
            }
            Some(c) => {
                *root = c.apply(root, &value)?;
                Ok(())
            }
        };
    };

    let mut current = root;
    for segment in parents {
        current = match (current, segment) {
            (Value::Object(map), segment) => {
                let key = segment.key();
                map.get_mut(&key).ok_or(LookupError::NotFound(key))?
            }
            (Value::Array(arr), PathSegment::Index(idx)) => {
                let len = arr.len();
                resolve_index(*idx, len)
                    .and_then(|i| arr.get_mut(i))
                    .ok_or_else(|| LookupError::NotFound(idx.to_string()))?
            }
            (v, segment) => {
                return Err(LookupError::NotNavigable {
                    segment: segment.key(),
                    found: v.type_name(),
                });
            }
        };
    }

    match (current, last) {
        (Value::Object(map), segment) => {
            let key = segment.key();
            match combiner {
                None => {
                    map.insert(key, value);
                }
                Some(c) => {
                    let existing = map.get(&key).ok_or_else(|| LookupError::NotFound(key.clone()))?;
                    let combined = c.apply(existing, &value)?;
                    map.insert(key, combined);
                }
            }
            Ok(())
        }
        (Value::Array(arr), PathSegment::Index(idx)) => {
            let index = resolve_index(*idx, arr.len())
                .ok_or_else(|| LookupError::NotFound(idx.to_string()))?;
            arr[index] = match combiner {
                None => value,
                Some(c) => c.apply(&arr[index], &value)?,
            };
            Ok(())
        }
        (v, segment) => Err(LookupError::NotNavigable {
            segment: segment.key(),
            found: v.type_name(),
        }),
    }
}
