//! Schema-free extension properties with compare-and-swap writes
//!
//! Every entity owns one bag. Values are plain JSON (`serde_json::Value`);
//! a write only succeeds when the caller names the value it expects to
//! replace, compared structurally via [`deep_equal`].

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::{Number, Value};

use crate::support::errors::{DomainError, DomainResult};

/// How a successful [`PropertyBag::set`] was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The property did not exist before
    Created,
    /// An existing value was replaced
    Updated,
}

/// Result of a successful compare-and-swap
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyUpdate {
    pub old_value: Value,
    pub new_value: Value,
    pub outcome: SetOutcome,
}

/// Per-entity store of named JSON values
#[derive(Debug, Default)]
pub struct PropertyBag {
    values: DashMap<String, Value>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> DomainResult<Value> {
        self.values
            .get(name)
            .map(|value| value.clone())
            .ok_or_else(|| DomainError::not_found("Unknown property!"))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Replace `name` with `new_value` if its current value equals
    /// `expected_old`. An unset property is created when `expected_old` is
    /// the empty string.
    ///
    /// The comparison and the write happen while holding the entry lock of
    /// `name`, so two racing writers with the same stale expectation can
    /// never both succeed.
    pub fn set(&self, name: &str, expected_old: &Value, new_value: Value) -> DomainResult<PropertyUpdate> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("Invalid property name!"));
        }

        match self.values.entry(name.to_string()) {
            Entry::Vacant(slot) => {
                if !is_creation_sentinel(expected_old) {
                    return Err(mismatch());
                }
                slot.insert(new_value.clone());
                Ok(PropertyUpdate {
                    old_value: expected_old.clone(),
                    new_value,
                    outcome: SetOutcome::Created,
                })
            }
            Entry::Occupied(mut slot) => {
                if !deep_equal(slot.get(), expected_old) {
                    return Err(mismatch());
                }
                let old_value = slot.insert(new_value.clone());
                Ok(PropertyUpdate {
                    old_value,
                    new_value,
                    outcome: SetOutcome::Updated,
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn mismatch() -> DomainError {
    metrics::counter!("property_cas_conflicts_total").increment(1);
    DomainError::conflict("Property value mismatch!")
}

fn is_creation_sentinel(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

/// Structural equality of two JSON values.
///
/// Numbers compare by numeric value (`1 == 1.0`), arrays element-wise in
/// order, objects by key set and per-key value regardless of key order.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| deep_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(key, l)| y.get(key).is_some_and(|r| deep_equal(l, r)))
        }
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use serde_json::json;

    #[test]
    fn get_unset_property_is_not_found() {
        let bag = PropertyBag::new();
        assert!(matches!(bag.get("UndefinedProperty"), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn empty_string_creates_once() {
        let bag = PropertyBag::new();
        let update = bag.set("UndefinedProperty", &json!(""), json!("Test123!")).unwrap();
        assert_eq!(update.outcome, SetOutcome::Created);
        assert_eq!(update.old_value, json!(""));
        assert_eq!(bag.get("UndefinedProperty").unwrap(), json!("Test123!"));

        let again = bag.set("UndefinedProperty", &json!(""), json!("Noch ein Test!"));
        assert!(matches!(again, Err(DomainError::Conflict(_))));
        assert_eq!(bag.get("UndefinedProperty").unwrap(), json!("Test123!"));
    }

    #[test]
    fn matching_old_value_updates() {
        let bag = PropertyBag::new();
        bag.set("p", &json!(""), json!("Test123!")).unwrap();
        let update = bag.set("p", &json!("Test123!"), json!(42)).unwrap();
        assert_eq!(update.outcome, SetOutcome::Updated);
        assert_eq!(update.old_value, json!("Test123!"));
        assert_eq!(bag.get("p").unwrap(), json!(42));
    }

    #[test]
    fn unset_property_with_non_sentinel_expectation_conflicts() {
        let bag = PropertyBag::new();
        assert!(bag.set("p", &json!("something"), json!(1)).is_err());
        assert!(!bag.contains("p"));
    }

    #[test]
    fn object_comparison_ignores_key_order() {
        let bag = PropertyBag::new();
        bag.set("p", &json!(""), json!({"a": "b", "c": [1, 2]})).unwrap();
        assert!(bag.set("p", &json!({"a": "x"}), json!(null)).is_err());
        assert!(bag.set("p", &json!({"c": [1, 2], "a": "b"}), json!(null)).is_ok());
        assert_eq!(bag.get("p").unwrap(), json!(null));
    }

    #[test]
    fn deep_equal_rules() {
        assert!(deep_equal(&json!(1), &json!(1.0)));
        assert!(!deep_equal(&json!(1), &json!("1")));
        assert!(!deep_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(deep_equal(&json!({"a": {"b": [true, null]}}), &json!({"a": {"b": [true, null]}})));
    }

    #[test]
    fn racing_writers_with_same_expectation_have_one_winner() {
        let bag = Arc::new(PropertyBag::new());
        bag.set("counter", &json!(""), json!(0)).unwrap();

        let handles: Vec<_> = (1..=16)
            .map(|i| {
                let bag = Arc::clone(&bag);
                std::thread::spawn(move || bag.set("counter", &json!(0), json!(i)).is_ok())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert_ne!(bag.get("counter").unwrap(), json!(0));
    }
}
