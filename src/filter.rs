//! The result filter: one compiled expression, a baseline and the
//! uniqueness cache shared by every evaluation.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::{
    ast::Formula,
    cache::UniqueCache,
    encoders::EncoderRegistry,
    evaluator::{EvalContext, Evaluator, FilterError},
    parser::parse_filter,
    record::Record,
};

static FUZZ_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"FUZ\d*Z").expect("valid placeholder regex"));

/// Decides visibility of (and applies rewrites to) results.
///
/// # Examples
///
/// ```
/// use resfilter_lang::{FuzzResult, ResFilter};
///
/// let filter = ResFilter::with_filter("FUZZ|unique()").unwrap();
///
/// let mut seen = Vec::new();
/// for word in ["a", "a", "b"] {
///     let mut result = FuzzResult::new(1).with_payload(word);
///     seen.push(filter.is_visible(&mut result, None).unwrap());
/// }
/// assert_eq!(seen, vec![true, false, true]);
/// ```
///
/// # Concurrency
///
/// `is_visible` takes `&self`. The field a mutation writes to travels with
/// each resolved value, so the only state shared between calls is the
/// uniqueness cache, which is behind a mutex. A `ResFilter` can be shared
/// by worker threads as long as each record is owned by one of them.
#[derive(Default)]
pub struct ResFilter {
    filter_string: Option<String>,
    formula: Option<Formula>,
    baseline: Option<Box<dyn Record + Send + Sync>>,
    encoders: EncoderRegistry,
    cache: UniqueCache,
}

impl fmt::Debug for ResFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResFilter")
            .field("filter_string", &self.filter_string)
            .field("has_baseline", &self.baseline.is_some())
            .field("encoders", &self.encoders)
            .field("cache", &self.cache)
            .finish()
    }
}

impl ResFilter {
    /// A filter with no expression of its own; pass one to `is_visible`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `filter_string` once and keeps the result for every call.
    pub fn with_filter(filter_string: &str) -> Result<Self, FilterError> {
        let formula = parse_filter(filter_string)?;
        Ok(ResFilter {
            filter_string: Some(filter_string.to_string()),
            formula: Some(formula),
            ..Self::default()
        })
    }

    /// Replace the encoder registry used by `encode()`/`decode()`.
    pub fn with_encoders(mut self, encoders: EncoderRegistry) -> Self {
        self.encoders = encoders;
        self
    }

    pub fn encoders(&self) -> &EncoderRegistry {
        &self.encoders
    }

    /// Whether the filter carries an expression of its own.
    pub fn is_active(&self) -> bool {
        self.filter_string.is_some()
    }

    pub fn filter_string(&self) -> Option<&str> {
        self.filter_string.as_deref()
    }

    /// Set the reference result `BBB` compares against.
    ///
    /// The uniqueness cache is left alone; call [`ResFilter::reset_cache`]
    /// as well when starting an unrelated stream.
    pub fn set_baseline<R: Record + Send + Sync + 'static>(&mut self, baseline: R) {
        self.baseline = Some(Box::new(baseline));
    }

    pub fn clear_baseline(&mut self) {
        self.baseline = None;
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Forget every value `unique()` has seen.
    pub fn reset_cache(&self) {
        log::debug!("clearing uniqueness cache ({} entries)", self.cache.len());
        self.cache.clear();
    }

    pub fn cache(&self) -> &UniqueCache {
        &self.cache
    }

    /// Evaluate against `record`, using `filter_string` when given and the
    /// filter's own expression otherwise.
    ///
    /// Mutating filters (`:=`, `=+`, `=-`) rewrite `record` in place.
    pub fn is_visible(
        &self,
        record: &mut dyn Record,
        filter_string: Option<&str>,
    ) -> Result<bool, FilterError> {
        let parsed;
        let formula = match (filter_string, &self.formula) {
            (Some(source), _) => {
                parsed = parse_filter(source)?;
                &parsed
            }
            (None, Some(formula)) => formula,
            (None, None) => {
                return Err(FilterError::IncorrectFilter(
                    "no filter expression to evaluate".to_string(),
                ));
            }
        };

        let mut ctx = EvalContext::new(record);
        if let Some(baseline) = self.baseline.as_deref() {
            ctx = ctx.with_baseline(baseline);
        }

        let visible = match Evaluator::new(&self.encoders, &self.cache).eval_formula(formula, &mut ctx) {
            Ok(visible) => visible,
            Err(e) => {
                // The record was never reported; its values must not count as seen.
                self.cache.forget(ctx.observed());
                return Err(e);
            }
        };
        log::debug!(
            "filter '{}' -> {}",
            filter_string.or(self.filter_string.as_deref()).unwrap_or_default(),
            visible
        );
        Ok(visible)
    }

    /// Placeholder names (`FUZZ`, `FUZ2Z`, ...) the expression mentions, in
    /// source order, without evaluating anything.
    pub fn referenced_placeholders(&self) -> Vec<String> {
        self.filter_string
            .as_deref()
            .map(placeholders_in)
            .unwrap_or_default()
    }
}

/// Placeholder-shaped tokens in `source`, in order of appearance.
pub fn placeholders_in(source: &str) -> Vec<String> {
    FUZZ_MARKER_RE
        .find_iter(source)
        .map(|m| m.as_str().to_string())
        .collect()
}
