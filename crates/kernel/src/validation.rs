//! Field-level guards shared by request payloads.
//!
//! Guards never short-circuit: every violated field is reported so a client
//! can fix a payload in one round trip.

use serde::Serialize;

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub error: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error: error.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Implemented by payloads that carry field constraints.
pub trait Validate {
    /// Collect every violated constraint. An empty list means the payload is valid.
    fn violations(&self) -> Vec<FieldViolation>;

    fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Check that `value` holds between `min` and `max` characters inclusive.
pub fn check_length(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let length = value.chars().count();
    if length < min {
        violations.push(FieldViolation::new(
            field,
            format!("must be at least {} characters", min),
        ));
    } else if length > max {
        violations.push(FieldViolation::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
}

/// Check that `value` lies in `min..=max`.
pub fn check_range(violations: &mut Vec<FieldViolation>, field: &str, value: i64, min: i64, max: i64) {
    if !(min..=max).contains(&value) {
        violations.push(FieldViolation::new(
            field,
            format!("must be between {} and {}", min, max),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        name: String,
        score: i64,
    }

    impl Validate for Pair {
        fn violations(&self) -> Vec<FieldViolation> {
            let mut violations = Vec::new();
            check_length(&mut violations, "name", &self.name, 1, 3);
            check_range(&mut violations, "score", self.score, 1, 5);
            violations
        }
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let mut violations = Vec::new();
        check_length(&mut violations, "name", "a", 1, 3);
        check_length(&mut violations, "name", "abc", 1, 3);
        assert!(violations.is_empty());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut violations = Vec::new();
        check_length(&mut violations, "name", "ééé", 1, 3);
        assert!(violations.is_empty());
    }

    #[test]
    fn empty_and_oversized_values_are_reported() {
        let mut violations = Vec::new();
        check_length(&mut violations, "title", "", 1, 3);
        check_length(&mut violations, "author", "abcd", 1, 3);
        assert_eq!(
            violations,
            vec![
                FieldViolation::new("title", "must be at least 1 characters"),
                FieldViolation::new("author", "must be at most 3 characters"),
            ]
        );
    }

    #[test]
    fn range_rejects_both_sides() {
        let mut violations = Vec::new();
        check_range(&mut violations, "rating", 0, 1, 5);
        check_range(&mut violations, "rating", 6, 1, 5);
        check_range(&mut violations, "rating", 5, 1, 5);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].to_string(), "rating: must be between 1 and 5");
    }

    #[test]
    fn validate_collects_every_violation() {
        let pair = Pair {
            name: String::new(),
            score: 9,
        };
        let violations = pair.validate().unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "score"]);

        let ok = Pair {
            name: "ok".to_string(),
            score: 3,
        };
        assert!(ok.validate().is_ok());
    }
}
