//! Query predicates over JSON documents.
//!
//! A [`Filter`] is a conjunction of per-field conditions, mirroring the
//! single/double inequality + equality queries the managed store indexes.
//! Comparison is typed: numbers compare as `f64`, strings
//! lexicographically; a missing field or a type mismatch never matches.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Eq(Value),
    Lt(Value),
    Gt(Value),
}

/// A conjunction of field conditions.  The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches all documents in a collection.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn field_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((field.to_string(), Condition::Eq(value.into())));
        self
    }

    pub fn field_lt(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((field.to_string(), Condition::Lt(value.into())));
        self
    }

    pub fn field_gt(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((field.to_string(), Condition::Gt(value.into())));
        self
    }

    /// Whether a document body satisfies every clause.
    pub fn matches(&self, data: &Value) -> bool {
        self.clauses.iter().all(|(field, condition)| {
            let Some(actual) = data.get(field) else {
                return false;
            };
            match condition {
                Condition::Eq(expected) => actual == expected,
                Condition::Lt(bound) => compare(actual, bound).is_some_and(|o| o.is_lt()),
                Condition::Gt(bound) => compare(actual, bound).is_some_and(|o| o.is_gt()),
            }
        })
    }
}

/// Ordering between two JSON scalars of the same kind, `None` otherwise.
fn compare(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x.as_f64().and_then(|x| y.as_f64().and_then(|y| x.partial_cmp(&y)))
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(Filter::all().matches(&json!({})));
        assert!(Filter::all().matches(&json!({ "any": 1 })));
    }

    #[test]
    fn test_eq_and_inequality_conjunction() {
        let filter = Filter::new()
            .field_eq("status", "in-progress")
            .field_lt("deadline", 100);

        assert!(filter.matches(&json!({ "status": "in-progress", "deadline": 99 })));
        assert!(!filter.matches(&json!({ "status": "in-progress", "deadline": 100 })));
        assert!(!filter.matches(&json!({ "status": "overdue", "deadline": 50 })));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let filter = Filter::new().field_lt("createdAt", 100);
        assert!(!filter.matches(&json!({ "other": 1 })));
    }

    #[test]
    fn test_double_inequality_window() {
        let filter = Filter::new().field_gt("deadline", 10).field_lt("deadline", 20);
        assert!(filter.matches(&json!({ "deadline": 15 })));
        assert!(!filter.matches(&json!({ "deadline": 10 })));
        assert!(!filter.matches(&json!({ "deadline": 20 })));
    }

    #[test]
    fn test_type_mismatch_never_matches() {
        let filter = Filter::new().field_lt("deadline", 10);
        assert!(!filter.matches(&json!({ "deadline": "soon" })));
    }

    #[test]
    fn test_bool_equality() {
        let filter = Filter::new().field_eq("reminderSent", true);
        assert!(filter.matches(&json!({ "reminderSent": true })));
        assert!(!filter.matches(&json!({ "reminderSent": false })));
    }
}
