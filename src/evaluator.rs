use std::sync::Arc;

use percent_encoding::percent_decode_str;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::{
    ast::{
        Clause, ClauseBody, CompOp, Comparison, Connective, Formula, Operand, OperatorCall,
        RightHand, Statement, Term,
    },
    cache::UniqueCache,
    encoders::{Encoder, EncoderRegistry},
    parser::ParseError,
    path::FieldPath,
    record::{self, Record},
    value::Value,
};

/// Status code carried by results whose request failed; what `XXX` stands for.
pub const ERROR_CODE: i64 = -1;

/// The two ways a filter evaluation can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// The filter is malformed or references something that does not exist
    #[error("Incorrect filter expression: {0}")]
    IncorrectFilter(String),

    /// The filter is well formed but cannot be applied to these values
    #[error("Bad options: {0}")]
    BadOptions(String),
}

impl From<ParseError> for FilterError {
    fn from(e: ParseError) -> Self {
        FilterError::IncorrectFilter(e.to_string())
    }
}

/// Per-call evaluation state.
///
/// Built fresh for every record, so nothing here leaks from one call to the
/// next. It also lists the `unique()` entries this call added to the shared
/// cache, so a failed evaluation can take them back.
pub struct EvalContext<'r> {
    /// The record being judged (and possibly rewritten)
    pub record: &'r mut dyn Record,
    /// Reference record for `BBB`, if one was set
    pub baseline: Option<&'r dyn Record>,
    observed: Vec<(usize, String)>,
}

impl<'r> EvalContext<'r> {
    pub fn new(record: &'r mut dyn Record) -> Self {
        EvalContext {
            record,
            baseline: None,
            observed: Vec::new(),
        }
    }

    pub fn with_baseline(mut self, baseline: &'r dyn Record) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// `(location, canonical value)` pairs first seen during this call.
    pub fn observed(&self) -> &[(usize, String)] {
        &self.observed
    }
}

/// A resolved value plus the field it was read from, if any.
///
/// The field travels with the value so a trailing `:=`, `=+` or `=-` knows
/// what to write and `BBB` knows which baseline attribute to fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub field: Option<FieldPath>,
}

impl Resolved {
    fn plain(value: Value) -> Self {
        Resolved { value, field: None }
    }
}

/// Evaluates parsed filters against records.
///
/// Holds only the state shared between calls: the encoder registry and the
/// uniqueness cache.
pub struct Evaluator<'f> {
    encoders: &'f EncoderRegistry,
    cache: &'f UniqueCache,
}

fn build_regex(pattern: &str) -> Result<Regex, FilterError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| FilterError::BadOptions(format!("Invalid regex expression used in expression: {}", e)))
}

/// String form of a scalar for the text operators.
fn text(value: &Value, what: &str) -> Result<String, FilterError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) => Ok(value.as_string()),
        other => Err(FilterError::BadOptions(format!(
            "{} requires a string value, got {}",
            what,
            other.type_name()
        ))),
    }
}

/// Case-insensitive containment below the top level: strings by substring,
/// sequences and mappings by any of their values.
fn item_contains(item: &Value, needle: &str) -> bool {
    match item {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|i| item_contains(i, needle)),
        Value::Object(map) => map.values().any(|v| item_contains(v, needle)),
        Value::Null => false,
        scalar => scalar.as_string().to_lowercase().contains(needle),
    }
}

fn contains(haystack: &Value, needle: &Value) -> Result<bool, FilterError> {
    let needle = text(needle, "Containment")?.to_lowercase();
    match haystack {
        Value::String(s) => Ok(s.to_lowercase().contains(&needle)),
        Value::Array(items) => Ok(items.iter().any(|i| item_contains(i, &needle))),
        Value::Object(map) => Ok(map
            .iter()
            .any(|(k, v)| k.to_lowercase().contains(&needle) || item_contains(v, &needle))),
        other => Err(FilterError::BadOptions(format!(
            "Invalid operand type {} for containment",
            other.type_name()
        ))),
    }
}

impl<'f> Evaluator<'f> {
    pub fn new(encoders: &'f EncoderRegistry, cache: &'f UniqueCache) -> Self {
        Evaluator { encoders, cache }
    }

    /// Evaluates a formula against the context's record.
    ///
    /// Every clause is evaluated, left to right, before the fold runs, so
    /// mutations and `unique()` bookkeeping happen for all of them whatever
    /// the outcome. On error, callers own the rollback of
    /// [`EvalContext::observed`]; `ResFilter::is_visible` does it for you.
    ///
    /// # Examples
    ///
    /// ```
    /// use resfilter_lang::{EncoderRegistry, EvalContext, Evaluator, FuzzResult, UniqueCache};
    /// use resfilter_lang::parser::parse_filter;
    ///
    /// let formula = parse_filter("c=200 and l>5").unwrap();
    /// let mut result = FuzzResult::new(1).with_code(200).with_lines(10);
    ///
    /// let encoders = EncoderRegistry::default();
    /// let cache = UniqueCache::new();
    /// let evaluator = Evaluator::new(&encoders, &cache);
    ///
    /// let mut ctx = EvalContext::new(&mut result);
    /// assert!(evaluator.eval_formula(&formula, &mut ctx).unwrap());
    /// ```
    pub fn eval_formula(&self, formula: &Formula, ctx: &mut EvalContext) -> Result<bool, FilterError> {
        let first = self.eval_clause(&formula.first, ctx)?;

        let mut rest = Vec::with_capacity(formula.rest.len());
        for (connective, clause) in &formula.rest {
            rest.push((*connective, self.eval_clause(clause, ctx)?));
        }

        Ok(rest
            .into_iter()
            .fold(first, |acc, (connective, value)| match connective {
                Connective::And => acc && value,
                Connective::Or => acc || value,
            }))
    }

    fn eval_clause(&self, clause: &Clause, ctx: &mut EvalContext) -> Result<bool, FilterError> {
        let value = match &clause.body {
            ClauseBody::Statement(statement) => self.eval_statement(statement, ctx)?.as_bool(),
            ClauseBody::Group(formula) => self.eval_formula(formula, ctx)?,
        };
        log::trace!("clause negated={} value={}", clause.negated, value);
        Ok(value != clause.negated)
    }

    fn eval_statement(&self, statement: &Statement, ctx: &mut EvalContext) -> Result<Value, FilterError> {
        match statement {
            Statement::Term(term) => Ok(self.resolve_term(term, ctx)?.value),
            Statement::Comparison(comparison) => self.eval_comparison(comparison, ctx),
        }
    }

    /// Resolves a term: operand first, then its operator call.
    pub fn resolve_term(&self, term: &Term, ctx: &mut EvalContext) -> Result<Resolved, FilterError> {
        let resolved = self.resolve_operand(&term.operand, ctx)?;
        match &term.operator {
            Some(call) => Ok(Resolved {
                value: self.apply_operator(resolved.value, call, ctx)?,
                field: resolved.field,
            }),
            None => Ok(resolved),
        }
    }

    fn resolve_operand(&self, operand: &Operand, ctx: &mut EvalContext) -> Result<Resolved, FilterError> {
        match operand {
            Operand::Integer(n) => Ok(Resolved::plain(Value::Integer(*n))),
            Operand::String(s) => Ok(Resolved::plain(Value::String(s.clone()))),
            Operand::Field(path) => {
                let value = ctx.record.get(path).map_err(|e| {
                    FilterError::IncorrectFilter(format!(
                        "Non-existing introspection field or parameter \"{}\" ({})",
                        path, e
                    ))
                })?;
                Ok(Resolved {
                    value,
                    field: Some(path.clone()),
                })
            }
            Operand::Placeholder { index, field } => {
                let payload = ctx.record.payload(*index).map_err(|_| {
                    FilterError::IncorrectFilter(format!(
                        "Non existent FUZZ payload {}! Use a correct index.",
                        index
                    ))
                })?;

                let Some(path) = field else {
                    return Ok(Resolved::plain(payload));
                };

                let value = record::project(&payload, path).map_err(|e| {
                    FilterError::IncorrectFilter(format!(
                        "A field expression must be used with a structured payload, not a {}: {}",
                        payload.type_name(),
                        e
                    ))
                })?;
                Ok(Resolved {
                    value,
                    field: Some(path.clone()),
                })
            }
        }
    }

    fn apply_operator(
        &self,
        value: Value,
        call: &OperatorCall,
        ctx: &mut EvalContext,
    ) -> Result<Value, FilterError> {
        let name = call.name.as_str();
        let result = match (name, &call.arg1, &call.arg2) {
            ("un" | "unquote", None, None) => Value::String(
                percent_decode_str(&text(&value, "unquote()")?)
                    .decode_utf8_lossy()
                    .into_owned(),
            ),
            ("e" | "encode", Some(encoder), None) => {
                let encoder = self.encoder(encoder)?;
                Value::String(encoder.encode(&text(&value, "encode()")?))
            }
            ("d" | "decode", Some(encoder), None) => {
                let encoder = self.encoder(encoder)?;
                let decoded = encoder
                    .decode(&text(&value, "decode()")?)
                    .map_err(|e| FilterError::BadOptions(e.to_string()))?;
                Value::String(decoded)
            }
            ("r" | "replace", Some(old), Some(new)) => Value::String(
                text(&value, "replace()")?.replace(&old.as_string(), &new.as_string()),
            ),
            ("upper", None, None) => Value::String(text(&value, "upper()")?.to_uppercase()),
            ("l" | "lower", None, None) => Value::String(text(&value, "lower()")?.to_lowercase()),
            ("gre" | "gregex", Some(pattern), None) => {
                let regex = build_regex(&text(pattern, "gregex() pattern")?)?;
                let haystack = text(&value, "gregex()")?;
                match regex.captures(&haystack) {
                    None => Value::String(String::new()),
                    Some(caps) => match caps.get(1) {
                        Some(group) => Value::String(group.as_str().to_string()),
                        None if caps.len() < 2 => {
                            return Err(FilterError::BadOptions(format!(
                                "gregex() pattern '{}' has no capture group",
                                regex.as_str()
                            )));
                        }
                        None => Value::String(String::new()),
                    },
                }
            }
            ("sw" | "startswith", Some(prefix), None) => Value::Boolean(
                text(&value, "startswith()")?
                    .trim()
                    .starts_with(&prefix.as_string()),
            ),
            ("u" | "unique", None, None) => {
                let key = value.canonical();
                let first = self.cache.observe_key(call.location, key.clone());
                if first {
                    ctx.observed.push((call.location, key));
                }
                Value::Boolean(first)
            }
            _ => {
                let arity = usize::from(call.arg1.is_some()) + usize::from(call.arg2.is_some());
                return Err(FilterError::BadOptions(format!(
                    "Bad format, operator '{}' does not take {} argument(s); expected one of un, e, d, r, upper, l, gre, sw, u",
                    name, arity
                )));
            }
        };

        log::trace!("{}({}) -> {}", name, value.canonical(), result.canonical());
        Ok(result)
    }

    fn encoder(&self, name: &Value) -> Result<Arc<dyn Encoder>, FilterError> {
        self.encoders
            .get(&name.as_string())
            .map_err(|e| FilterError::BadOptions(e.to_string()))
    }

    fn resolve_baseline(&self, tag: Option<&FieldPath>, ctx: &EvalContext) -> Result<Value, FilterError> {
        let baseline = ctx.baseline.ok_or_else(|| {
            FilterError::BadOptions("specify a baseline value when using BBB".to_string())
        })?;

        let attribute = match tag.map(FieldPath::as_str) {
            Some("l" | "lines") => Some("lines"),
            Some("c" | "code") => Some("code"),
            Some("w" | "words") => Some("words"),
            Some("h" | "chars") => Some("chars"),
            Some("i" | "index") => Some("index"),
            _ => None,
        };

        let result = match attribute {
            Some(name) => FieldPath::parse(name).and_then(|path| baseline.get(&path)),
            // Anything else compares against the baseline's own payload.
            None => baseline.payload(1),
        };
        result.map_err(|e| FilterError::BadOptions(format!("baseline lookup failed: {}", e)))
    }

    fn eval_comparison(&self, comparison: &Comparison, ctx: &mut EvalContext) -> Result<Value, FilterError> {
        let left = self.resolve_term(&comparison.left, ctx)?;

        let right = match &comparison.right {
            RightHand::Baseline => self.resolve_baseline(left.field.as_ref(), ctx)?,
            RightHand::ErrorMarker => Value::Integer(ERROR_CODE),
            RightHand::Term(term) => self.resolve_term(term, ctx)?.value,
        };

        let (lhs, rhs) = (&left.value, &right);
        let outcome = match comparison.op {
            CompOp::Equal => lhs.as_string() == rhs.as_string(),
            CompOp::NotEqual => !lhs.loose_eq(rhs),
            CompOp::LessThan | CompOp::GreaterThan | CompOp::LessEqual | CompOp::GreaterEqual => {
                let ordering = lhs.compare(rhs).ok_or_else(|| {
                    FilterError::BadOptions(format!(
                        "Invalid operand types used in expression: cannot order {} and {}",
                        lhs.type_name(),
                        rhs.type_name()
                    ))
                })?;
                match comparison.op {
                    CompOp::LessThan => ordering.is_lt(),
                    CompOp::GreaterThan => ordering.is_gt(),
                    CompOp::LessEqual => ordering.is_le(),
                    _ => ordering.is_ge(),
                }
            }
            CompOp::Matches => {
                let regex = build_regex(&text(rhs, "Regex pattern")?)?;
                regex.is_match(&text(lhs, "Regex match")?)
            }
            CompOp::Contains => contains(lhs, rhs)?,
            CompOp::NotContains => !contains(lhs, rhs)?,
            CompOp::Assign | CompOp::AppendAssign | CompOp::PrependAssign => {
                let target = left.field.as_ref().ok_or_else(|| {
                    FilterError::BadOptions(
                        "Assignments need a field or FUZZ[field] on the left-hand side".to_string(),
                    )
                })?;
                ctx.record
                    .set(target, right.clone(), comparison.op.combiner())
                    .map_err(|e| {
                        FilterError::BadOptions(format!("Cannot update field '{}': {}", target, e))
                    })?;
                true
            }
        };

        Ok(Value::Boolean(outcome))
    }
}
