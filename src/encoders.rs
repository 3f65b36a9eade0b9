//! Named encode/decode transforms for the `encode()` and `decode()` operators.

use std::{collections::HashMap, fmt, sync::Arc};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use thiserror::Error;

/// Characters left untouched by `urlencode`, matching a classic `quote()`.
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncoderError {
    #[error("unknown encoder '{0}'")]
    Unknown(String),

    #[error("{encoder} cannot decode '{input}': {reason}")]
    Decode {
        encoder: &'static str,
        input: String,
        reason: String,
    },
}

/// An encode/decode pair addressable by name.
pub trait Encoder: Send + Sync {
    fn name(&self) -> &'static str;

    fn encode(&self, input: &str) -> String;

    fn decode(&self, input: &str) -> Result<String, EncoderError>;
}

fn decode_error(encoder: &'static str, input: &str, reason: impl fmt::Display) -> EncoderError {
    EncoderError::Decode {
        encoder,
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

pub struct UrlEncode;

impl Encoder for UrlEncode {
    fn name(&self) -> &'static str {
        "urlencode"
    }

    fn encode(&self, input: &str) -> String {
        utf8_percent_encode(input, URL_SAFE).to_string()
    }

    fn decode(&self, input: &str) -> Result<String, EncoderError> {
        percent_decode_str(input)
            .decode_utf8()
            .map(|s| s.into_owned())
            .map_err(|e| decode_error(self.name(), input, e))
    }
}

pub struct DoubleUrlEncode;

impl Encoder for DoubleUrlEncode {
    fn name(&self) -> &'static str {
        "double_urlencode"
    }

    fn encode(&self, input: &str) -> String {
        UrlEncode.encode(&UrlEncode.encode(input))
    }

    fn decode(&self, input: &str) -> Result<String, EncoderError> {
        UrlEncode
            .decode(input)
            .and_then(|once| UrlEncode.decode(&once))
            .map_err(|e| match e {
                EncoderError::Decode { reason, .. } => decode_error(self.name(), input, reason),
                other => other,
            })
    }
}

pub struct Base64;

impl Encoder for Base64 {
    fn name(&self) -> &'static str {
        "base64"
    }

    fn encode(&self, input: &str) -> String {
        STANDARD.encode(input.as_bytes())
    }

    fn decode(&self, input: &str) -> Result<String, EncoderError> {
        let bytes = STANDARD
            .decode(input.trim())
            .map_err(|e| decode_error(self.name(), input, e))?;
        String::from_utf8(bytes).map_err(|e| decode_error(self.name(), input, e))
    }
}

pub struct Hexlify;

impl Encoder for Hexlify {
    fn name(&self) -> &'static str {
        "hexlify"
    }

    fn encode(&self, input: &str) -> String {
        input.bytes().map(|b| format!("{:02x}", b)).collect()
    }

    fn decode(&self, input: &str) -> Result<String, EncoderError> {
        if input.len() % 2 != 0 || !input.is_ascii() {
            return Err(decode_error(self.name(), input, "odd length or non-hex input"));
        }
        let bytes = (0..input.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&input[i..i + 2], 16))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| decode_error(self.name(), input, e))?;
        String::from_utf8(bytes).map_err(|e| decode_error(self.name(), input, e))
    }
}

/// Identity transform, handy for pipelines that always name an encoder.
pub struct NoEncoding;

impl Encoder for NoEncoding {
    fn name(&self) -> &'static str {
        "none"
    }

    fn encode(&self, input: &str) -> String {
        input.to_string()
    }

    fn decode(&self, input: &str) -> Result<String, EncoderError> {
        Ok(input.to_string())
    }
}

/// Encoders available to a filter, keyed by name.
#[derive(Clone)]
pub struct EncoderRegistry {
    encoders: HashMap<String, Arc<dyn Encoder>>,
}

impl EncoderRegistry {
    /// A registry with no encoders at all.
    pub fn empty() -> Self {
        EncoderRegistry {
            encoders: HashMap::new(),
        }
    }

    /// Add (or replace) an encoder under its own name.
    pub fn register(&mut self, encoder: impl Encoder + 'static) {
        self.encoders
            .insert(encoder.name().to_string(), Arc::new(encoder));
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Encoder>, EncoderError> {
        self.encoders
            .get(name)
            .cloned()
            .ok_or_else(|| EncoderError::Unknown(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.encoders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        let mut registry = EncoderRegistry::empty();
        registry.register(UrlEncode);
        registry.register(DoubleUrlEncode);
        registry.register(Base64);
        registry.register(Hexlify);
        registry.register(NoEncoding);
        registry
    }
}

impl fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderRegistry")
            .field("encoders", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = EncoderRegistry::default();
        assert_eq!(
            registry.names(),
            vec!["base64", "double_urlencode", "hexlify", "none", "urlencode"]
        );
    }

    #[test]
    fn test_urlencode_keeps_path_separators() {
        assert_eq!(UrlEncode.encode("a b/c?d"), "a%20b/c%3Fd");
        assert_eq!(UrlEncode.decode("a%20b").unwrap(), "a b");
    }

    #[test]
    fn test_double_urlencode() {
        assert_eq!(DoubleUrlEncode.encode("a b"), "a%2520b");
        assert_eq!(DoubleUrlEncode.decode("a%2520b").unwrap(), "a b");
    }

    #[test]
    fn test_base64_and_hexlify() {
        assert_eq!(Base64.encode("admin"), "YWRtaW4=");
        assert_eq!(Base64.decode("YWRtaW4=").unwrap(), "admin");
        assert!(Base64.decode("***").is_err());

        assert_eq!(Hexlify.encode("AB"), "4142");
        assert_eq!(Hexlify.decode("4142").unwrap(), "AB");
        assert!(Hexlify.decode("414").is_err());
    }

    #[test]
    fn test_unknown_encoder() {
        let registry = EncoderRegistry::default();
        assert_eq!(
            registry.get("rot13").err(),
            Some(EncoderError::Unknown("rot13".to_string()))
        );
    }
}
