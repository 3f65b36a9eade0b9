// tests/operator_tests.rs

use std::collections::HashMap;

use resfilter_lang::{
    Encoder, EncoderError, EncoderRegistry, FilterError, FuzzResult, ResFilter, Value,
};

fn with_payloads(payloads: &[&str]) -> FuzzResult {
    payloads
        .iter()
        .fold(FuzzResult::new(1).with_code(200), |r, p| r.with_payload(*p))
}

fn check(filter: &str, payloads: &[&str]) -> bool {
    let mut r = with_payloads(payloads);
    ResFilter::with_filter(filter)
        .and_then(|f| f.is_visible(&mut r, None))
        .unwrap_or_else(|e| panic!("'{}' failed: {}", filter, e))
}

fn check_err(filter: &str, payloads: &[&str]) -> FilterError {
    let mut r = with_payloads(payloads);
    ResFilter::with_filter(filter)
        .and_then(|f| f.is_visible(&mut r, None))
        .expect_err(filter)
}

// ============================================================================
// Transform Operators
// ============================================================================

#[test]
fn test_unquote() {
    assert!(check("FUZZ|unquote()='a b/c'", &["a%20b%2Fc"]));
    assert!(check("FUZZ|un()='100%'", &["100%25"]));
}

#[test]
fn test_encode_and_decode() {
    assert!(check("FUZZ|encode('base64')='YWRtaW4='", &["admin"]));
    assert!(check("FUZZ|e('urlencode')='a%20b/c'", &["a b/c"]));
    assert!(check("FUZZ|e('double_urlencode')='a%2520b'", &["a b"]));
    assert!(check("FUZZ|d('hexlify')='hi'", &["6869"]));
    assert!(check("FUZZ|decode('none')='same'", &["same"]));
}

#[test]
fn test_encoder_failures_are_bad_options() {
    assert!(matches!(
        check_err("FUZZ|e('rot13')='x'", &["x"]),
        FilterError::BadOptions(_)
    ));
    assert!(matches!(
        check_err("FUZZ|d('base64')='x'", &["!!not base64!!"]),
        FilterError::BadOptions(_)
    ));
}

#[test]
fn test_custom_encoder() {
    struct Reverse;

    impl Encoder for Reverse {
        fn name(&self) -> &'static str {
            "reverse"
        }

        fn encode(&self, input: &str) -> String {
            input.chars().rev().collect()
        }

        fn decode(&self, input: &str) -> Result<String, EncoderError> {
            Ok(self.encode(input))
        }
    }

    let mut encoders = EncoderRegistry::default();
    encoders.register(Reverse);

    let filter = ResFilter::with_filter("FUZZ|e('reverse')='nimda'")
        .unwrap()
        .with_encoders(encoders);
    let mut r = with_payloads(&["admin"]);
    assert!(filter.is_visible(&mut r, None).unwrap());
    assert!(filter.encoders().names().contains(&"reverse"));
}

#[test]
fn test_replace() {
    assert!(check("FUZZ|replace('a','4')='4dmin4'", &["admina"]));
    assert!(check("FUZZ|r('x','')='admin'", &["xadminx"]));
}

#[test]
fn test_case_operators() {
    assert!(check("FUZZ|upper()='ADMIN'", &["Admin"]));
    assert!(check("FUZZ|lower()='admin'", &["AdMiN"]));
    assert!(check("FUZZ|l()='admin'", &["ADMIN"]));
}

#[test]
fn test_gregex() {
    assert!(check(r"FUZ2Z|gregex('id=(\d+)')='42'", &["x", "id=42;x"]));
    assert!(check(r"FUZ2Z|gregex('id=(\d+)')=''", &["x", "noid"]));
    assert!(check(r"FUZZ|gre('a.id=(\d)')='5'", &["a\nid=5"]));
}

#[test]
fn test_gregex_errors() {
    assert!(matches!(
        check_err("FUZZ|gregex('(')", &["x"]),
        FilterError::BadOptions(_)
    ));
    assert!(matches!(
        check_err("FUZZ|gregex('a')", &["a"]),
        FilterError::BadOptions(_)
    ));
}

#[test]
fn test_startswith_trims() {
    assert!(check("FUZZ|startswith('adm')", &["  admin"]));
    assert!(check("not FUZZ|sw('root')", &["admin"]));
}

#[test]
fn test_unique_keys_by_canonical_form() {
    let filter = ResFilter::with_filter("FUZZ|unique()").unwrap();
    let mut as_int = FuzzResult::new(1).with_payload(Value::Integer(1));
    let mut as_str = FuzzResult::new(2).with_payload("1");
    assert!(filter.is_visible(&mut as_int, None).unwrap());
    assert!(filter.is_visible(&mut as_str, None).unwrap());
}

#[test]
fn test_operator_on_field() {
    let mut r = FuzzResult::new(1).with_attribute("server", Value::from("NGINX/1.2"));
    let filter = ResFilter::with_filter("server|lower()|sw('nginx')");
    assert!(filter.is_err());

    let filter = ResFilter::with_filter("server|lower()~'nginx'").unwrap();
    assert!(filter.is_visible(&mut r, None).unwrap());
}

#[test]
fn test_unknown_operator_and_arity() {
    for bad in [
        "FUZZ|reverse()",
        "FUZZ|upper('x')",
        "FUZZ|replace('a')",
        "FUZZ|gregex()",
        "FUZZ|unique(1)",
    ] {
        assert!(
            matches!(check_err(bad, &["x"]), FilterError::BadOptions(_)),
            "Expected BadOptions for {}",
            bad
        );
    }
}

#[test]
fn test_text_operators_reject_collections() {
    let mut r = FuzzResult::new(1).with_payload(Value::Array(vec![Value::from("a")]));
    let err = ResFilter::with_filter("FUZZ|upper()")
        .unwrap()
        .is_visible(&mut r, None)
        .unwrap_err();
    assert!(matches!(err, FilterError::BadOptions(_)));
}

// ============================================================================
// Regex Match
// ============================================================================

#[test]
fn test_regex_match() {
    assert!(check("FUZZ=~'^adm'", &["admin"]));
    assert!(!check("FUZZ=~'^adm'", &["root"]));
    assert!(check("FUZZ=~'^admin$'", &["x\nadmin\ny"]));
}

#[test]
fn test_invalid_regex() {
    assert!(matches!(
        check_err("FUZZ=~'[a'", &["x"]),
        FilterError::BadOptions(_)
    ));
}

// ============================================================================
// Containment
// ============================================================================

fn structured() -> FuzzResult {
    FuzzResult::new(1)
        .with_attribute(
            "tags",
            Value::Array(vec![Value::from("Login"), Value::from("static")]),
        )
        .with_attribute(
            "headers",
            Value::Object(HashMap::from([
                ("Server".to_string(), Value::from("nginx")),
                (
                    "Set-Cookie".to_string(),
                    Value::Array(vec![Value::from("SESSION=abc")]),
                ),
            ])),
        )
}

fn check_structured(filter: &str) -> Result<bool, FilterError> {
    ResFilter::with_filter(filter)?.is_visible(&mut structured(), None)
}

#[test]
fn test_string_containment_ignores_case() {
    assert!(check("FUZZ~'ADMIN'", &["/Admin/panel"]));
    assert!(check("FUZZ!~'root'", &["/Admin/panel"]));
    assert!(!check("FUZZ!~'panel'", &["/Admin/panel"]));
}

#[test]
fn test_sequence_containment() {
    assert!(check_structured("tags~'login'").unwrap());
    assert!(check_structured("tags~'stat'").unwrap());
    assert!(!check_structured("tags~'admin'").unwrap());
    assert!(check_structured("tags!~'admin'").unwrap());
}

#[test]
fn test_mapping_containment() {
    assert!(check_structured("headers~'server'").unwrap());
    assert!(check_structured("headers~'NGINX'").unwrap());
    assert!(check_structured("headers~'session'").unwrap());
    assert!(!check_structured("headers~'apache'").unwrap());
    assert!(check_structured("headers!~'apache'").unwrap());
    assert!(!check_structured("headers!~'nginx'").unwrap());
}

#[test]
fn test_containment_on_scalar_is_bad_options() {
    let mut r = FuzzResult::new(1).with_code(200);
    let err = ResFilter::with_filter("c~'2'")
        .unwrap()
        .is_visible(&mut r, None)
        .unwrap_err();
    assert!(matches!(err, FilterError::BadOptions(_)));
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_string_ordering() {
    assert!(check("FUZZ<'b'", &["a"]));
    assert!(check("FUZZ>='abc'", &["abd"]));
}

#[test]
fn test_mixed_ordering_is_bad_options() {
    assert!(matches!(
        check_err("FUZZ<5", &["a"]),
        FilterError::BadOptions(_)
    ));
}
