use crate::value::AttrValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output of a calculator: pollutant key to estimate.
///
/// Key names (`tn_lbs_reduced`, `tss_tons_reduced`, ...) are consumed verbatim
/// by reporting, so calculators choose them and nothing here rewrites them.
/// Some protocols nest one level (`nitrogen.protocol_2`, `{value, adjustor}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReductionResult {
    values: BTreeMap<String, AttrValue>,
}

impl ReductionResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// A result with every key set to `0.0`.
    pub fn zeroed(keys: &[&str]) -> Self {
        keys.iter().fold(Self::new(), |acc, key| acc.with(*key, 0.0))
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Insert a numeric value.
    pub fn insert_number(&mut self, key: impl Into<String>, value: f64) {
        self.insert(key, AttrValue::Float(value));
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.values.get(key)
    }

    /// Numeric value of a top-level key; missing reads as `0.0`.
    pub fn number(&self, key: &str) -> f64 {
        self.get(key).and_then(AttrValue::as_number).unwrap_or(0.0)
    }

    /// Numeric value one level down, e.g. `nested("nitrogen", "protocol_2")`.
    pub fn nested(&self, outer: &str, inner: &str) -> f64 {
        self.get(outer)
            .and_then(AttrValue::as_object)
            .and_then(|obj| obj.get(inner))
            .and_then(AttrValue::as_number)
            .unwrap_or(0.0)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether the result has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.values.iter()
    }

    /// Copy every entry of `other` into `self`, replacing duplicates.
    pub fn merge(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// Apply `f` to every numeric leaf, including one level of nesting.
    pub fn map_numbers(self, f: impl Fn(f64) -> f64) -> Self {
        fn walk(value: AttrValue, f: &dyn Fn(f64) -> f64) -> AttrValue {
            match value {
                AttrValue::Float(x) => AttrValue::Float(f(x)),
                AttrValue::Integer(i) => AttrValue::Float(f(i as f64)),
                AttrValue::Object(obj) => {
                    AttrValue::Object(obj.into_iter().map(|(k, v)| (k, walk(v, f))).collect())
                }
                AttrValue::Array(arr) => {
                    AttrValue::Array(arr.into_iter().map(|v| walk(v, f)).collect())
                }
                other => other,
            }
        }
        Self { values: self.values.into_iter().map(|(k, v)| (k, walk(v, &f))).collect() }
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, AttrValue> {
        self.values
    }
}

impl From<ReductionResult> for AttrValue {
    fn from(result: ReductionResult) -> Self {
        Self::Object(result.values)
    }
}

impl From<BTreeMap<String, AttrValue>> for ReductionResult {
    fn from(values: BTreeMap<String, AttrValue>) -> Self {
        Self { values }
    }
}
