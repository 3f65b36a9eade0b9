//! Records the filter language evaluates against.
//!
//! The evaluator only talks to the [`Record`] trait: read a field path,
//! write a field path, fetch a placeholder value by its 1-based index.
//! [`FuzzResult`] is the stock implementation; [`SliceRecord`] wraps a
//! single dictionary word so payloads can be filtered before they are sent.

use std::collections::HashMap;

use crate::{
    path::{self, Combiner, FieldPath, LookupError},
    value::Value,
};

/// Get/set-by-path capability plus access to the generated payloads.
pub trait Record {
    /// Read the value at `path`.
    fn get(&self, path: &FieldPath) -> Result<Value, LookupError>;

    /// Write `value` at `path`, optionally folding it into the current value.
    fn set(
        &mut self,
        path: &FieldPath,
        value: Value,
        combiner: Option<Combiner>,
    ) -> Result<(), LookupError>;

    /// The `index`-th placeholder value (1-based).
    fn payload(&self, index: usize) -> Result<Value, LookupError>;
}

/// Map shorthand attribute names to their canonical spelling.
pub fn canonical_attribute(name: &str) -> &str {
    match name {
        "c" => "code",
        "l" => "lines",
        "w" => "words",
        "h" => "chars",
        "i" => "index",
        other => other,
    }
}

/// Project `path` into a structured value, honouring attribute shorthands.
///
/// Used for `FUZZ[field]` when the payload is itself a previous result.
pub fn project(value: &Value, path: &FieldPath) -> Result<Value, LookupError> {
    let Value::Object(map) = value else {
        return Err(LookupError::NotNavigable {
            segment: path.head(),
            found: value.type_name(),
        });
    };

    let head = path.head();
    let root = map
        .get(&head)
        .or_else(|| map.get(canonical_attribute(&head)))
        .ok_or(LookupError::NotFound(head.clone()))?;

    path::lookup(root, path.rest()).cloned()
}

/// A single fuzzing result.
///
/// Holds the measured attributes (`code`, `lines`, `words`, `chars`,
/// `index`), any extra attributes the producer attached (`url`, `headers`,
/// ...) and the payload values that generated the request.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzResult {
    attributes: HashMap<String, Value>,
    payloads: Vec<Value>,
}

impl FuzzResult {
    /// Creates a result with the given sequence index and zeroed metrics.
    pub fn new(index: i64) -> Self {
        let attributes = HashMap::from([
            ("code".to_string(), Value::Integer(0)),
            ("lines".to_string(), Value::Integer(0)),
            ("words".to_string(), Value::Integer(0)),
            ("chars".to_string(), Value::Integer(0)),
            ("index".to_string(), Value::Integer(index)),
        ]);
        FuzzResult {
            attributes,
            payloads: Vec::new(),
        }
    }

    pub fn with_code(self, code: i64) -> Self {
        self.with_attribute("code", Value::Integer(code))
    }

    pub fn with_lines(self, lines: i64) -> Self {
        self.with_attribute("lines", Value::Integer(lines))
    }

    pub fn with_words(self, words: i64) -> Self {
        self.with_attribute("words", Value::Integer(words))
    }

    pub fn with_chars(self, chars: i64) -> Self {
        self.with_attribute("chars", Value::Integer(chars))
    }

    /// Attach an attribute. Shorthand names are stored under their canonical name.
    pub fn with_attribute(mut self, name: &str, value: Value) -> Self {
        self.attributes
            .insert(canonical_attribute(name).to_string(), value);
        self
    }

    /// Append the next payload value (`FUZZ`, then `FUZ2Z`, ...).
    pub fn with_payload(mut self, value: impl Into<Value>) -> Self {
        self.payloads.push(value.into());
        self
    }

    pub fn code(&self) -> Option<i64> {
        self.attribute("code").and_then(Value::as_int)
    }

    pub fn lines(&self) -> Option<i64> {
        self.attribute("lines").and_then(Value::as_int)
    }

    pub fn words(&self) -> Option<i64> {
        self.attribute("words").and_then(Value::as_int)
    }

    pub fn chars(&self) -> Option<i64> {
        self.attribute("chars").and_then(Value::as_int)
    }

    pub fn index(&self) -> Option<i64> {
        self.attribute("index").and_then(Value::as_int)
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(canonical_attribute(name))
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    pub fn payloads(&self) -> &[Value] {
        &self.payloads
    }

    fn root_key(path: &FieldPath) -> String {
        canonical_attribute(&path.head()).to_string()
    }
}

impl Record for FuzzResult {
    fn get(&self, path: &FieldPath) -> Result<Value, LookupError> {
        let key = Self::root_key(path);
        let root = self
            .attributes
            .get(&key)
            .ok_or_else(|| LookupError::NotFound(path.as_str().to_string()))?;
        path::lookup(root, path.rest()).cloned()
    }

    fn set(
        &mut self,
        path: &FieldPath,
        value: Value,
        combiner: Option<Combiner>,
    ) -> Result<(), LookupError> {
        let key = Self::root_key(path);
        match self.attributes.get_mut(&key) {
            Some(root) => path::assign(root, path.rest(), value, combiner),
            None if combiner.is_none() && path.rest().is_empty() => {
                self.attributes.insert(key, value);
                Ok(())
            }
            None => Err(LookupError::NotFound(path.as_str().to_string())),
        }
    }

    fn payload(&self, index: usize) -> Result<Value, LookupError> {
        index
            .checked_sub(1)
            .and_then(|i| self.payloads.get(i))
            .cloned()
            .ok_or(LookupError::PayloadOutOfRange(index))
    }
}

/// A raw dictionary word evaluated on its own.
///
/// There is no response yet, so `FUZZ` is the word itself and no other
/// placeholder exists. Field paths project into the word when it is
/// structured (for example a previous result being re-fuzzed).
#[derive(Debug, Clone, PartialEq)]
pub struct SliceRecord {
    word: Value,
}

impl SliceRecord {
    pub fn new(word: impl Into<Value>) -> Self {
        SliceRecord { word: word.into() }
    }

    pub fn word(&self) -> &Value {
        &self.word
    }

    pub fn into_word(self) -> Value {
        self.word
    }
}

impl Record for SliceRecord {
    fn get(&self, path: &FieldPath) -> Result<Value, LookupError> {
        project(&self.word, path)
    }

    fn set(
        &mut self,
        path: &FieldPath,
        value: Value,
        combiner: Option<Combiner>,
    ) -> Result<(), LookupError> {
        path::assign(&mut self.word, path.segments(), value, combiner)
    }

    fn payload(&self, index: usize) -> Result<Value, LookupError> {
        if index == 1 {
            Ok(self.word.clone())
        } else {
            Err(LookupError::PayloadOutOfRange(index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn test_aliases_resolve_to_canonical_attributes() {
        let mut res = FuzzResult::new(3).with_code(200).with_lines(10);
        assert_eq!(res.get(&path("c")).unwrap(), Value::Integer(200));
        assert_eq!(res.get(&path("lines")).unwrap(), Value::Integer(10));
        assert_eq!(res.get(&path("i")).unwrap(), Value::Integer(3));

        res.set(&path("c"), Value::Integer(500), None).unwrap();
        assert_eq!(res.code(), Some(500));
    }

    #[test]
    fn test_payload_is_one_based() {
        let res = FuzzResult::new(1).with_payload("a").with_payload("b");
        assert_eq!(res.payload(1).unwrap(), Value::from("a"));
        assert_eq!(res.payload(2).unwrap(), Value::from("b"));
        assert_eq!(res.payload(0), Err(LookupError::PayloadOutOfRange(0)));
        assert_eq!(res.payload(3), Err(LookupError::PayloadOutOfRange(3)));
    }

    #[test]
    fn test_slice_record_only_has_first_payload() {
        let word = SliceRecord::new("admin");
        assert_eq!(word.payload(1).unwrap(), Value::from("admin"));
        assert!(word.payload(2).is_err());
        assert!(word.get(&path("url")).is_err());
    }

    #[test]
    fn test_project_into_structured_payload() {
        let prev = Value::Object(HashMap::from([("code".to_string(), Value::Integer(302))]));
        assert_eq!(project(&prev, &path("c")).unwrap(), Value::Integer(302));
        assert!(project(&Value::from("plain"), &path("c")).is_err());
    }
}
