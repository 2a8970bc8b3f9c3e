//! Field validation for request input
//!
//! A [`Validator`] is created fresh for every request, fed with rules, then
//! asked whether the input is acceptable. It never fails: violations are only
//! accumulated. Each field keeps at most one message, so when several rules
//! fail for the same field the last rule applied wins. Callers apply rules in
//! a fixed order to keep the outcome deterministic.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn slug_regex() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[a-z-]+$").expect("slug pattern is valid"))
}

/// Accumulates field-level validation failures
#[derive(Debug, Default, Clone)]
pub struct Validator {
    errors: BTreeMap<String, String>,
}

impl Validator {
    /// Create a validator with no recorded errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Record "`field` is required" when `value` is empty
    pub fn required(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.add(field, format!("{field} is required"));
        }
    }

    /// Record an error when a non-empty `value` is longer than `max` characters
    ///
    /// Length is counted in characters, not bytes, so `"ÉÉ"` has length 2.
    pub fn max_length(&mut self, field: &str, value: &str, max: usize) {
        if !value.is_empty() && value.chars().count() > max {
            self.add(field, format!("{field} must not exceed {max} characters"));
        }
    }

    /// Record an error when a non-empty `value` is not lowercase letters and hyphens
    pub fn slug_shape(&mut self, field: &str, value: &str) {
        if !value.is_empty() && !slug_regex().is_match(value) {
            self.add(
                field,
                format!("{field} must contain only lowercase letters and hyphens"),
            );
        }
    }

    /// `true` when no rule has failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The recorded messages, ordered by field name
    pub fn errors(&self) -> Vec<String> {
        self.errors.values().cloned().collect()
    }

    /// Consume the validator, returning the recorded messages ordered by field name
    pub fn into_errors(self) -> Vec<String> {
        self.errors.into_values().collect()
    }

    fn add(&mut self, field: &str, message: String) {
        self.errors.insert(field.to_owned(), message);
    }
}
