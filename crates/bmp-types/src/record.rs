use crate::period::MeasurementPeriod;
use crate::value::AttrValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// An attribute that was present but did not hold a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("attribute '{key}' is {found}, expected a number")]
pub struct NonNumeric {
    /// Attribute name
    pub key: String,
    /// Type name of the value that was found
    pub found: &'static str,
}

/// A flat attribute bag describing one practice instance at one point in time.
///
/// There is no fixed schema. Every accessor treats an absent attribute as its
/// zero value (`0.0`, `false`, empty list) so calculators never fail on sparse
/// records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PracticeRecord {
    attributes: BTreeMap<String, AttrValue>,
}

impl PracticeRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object into a record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute, returning it if it was present.
    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.attributes.remove(key)
    }

    /// Raw attribute lookup.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Whether the attribute is present and not null.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the record has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.attributes.iter()
    }

    /// Numeric attribute; anything that is not a number reads as `0.0`.
    pub fn number(&self, key: &str) -> f64 {
        self.number_or(key, 0.0)
    }

    /// Numeric attribute with a caller-supplied default for absent, null or
    /// non-numeric values.
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(AttrValue::as_number).unwrap_or(default)
    }

    /// Strict numeric read used when a calculator validates a whole input
    /// vector. Absent and null still read as `0.0`; any other non-number is an
    /// error.
    pub fn numeric(&self, key: &str) -> Result<f64, NonNumeric> {
        match self.get(key) {
            None | Some(AttrValue::Null) => Ok(0.0),
            Some(value) => value.as_number().ok_or_else(|| NonNumeric {
                key: key.to_string(),
                found: value.type_name(),
            }),
        }
    }

    /// Truthiness of an attribute; absent reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(AttrValue::is_truthy)
    }

    /// String attribute.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_str)
    }

    /// Array attribute; absent or non-array reads as empty.
    pub fn list(&self, key: &str) -> &[AttrValue] {
        self.get(key).and_then(AttrValue::as_array).unwrap_or(&[])
    }

    /// Object attribute.
    pub fn object(&self, key: &str) -> Option<&BTreeMap<String, AttrValue>> {
        self.get(key).and_then(AttrValue::as_object)
    }

    /// Object attribute as a record of its own.
    pub fn record(&self, key: &str) -> Option<Self> {
        self.object(key).map(|obj| Self::from(obj.clone()))
    }

    /// Object elements of an array attribute as records. Elements wrapped as
    /// `{"properties": {...}}` are unwrapped; non-object elements are skipped.
    pub fn records(&self, key: &str) -> Vec<Self> {
        self.list(key)
            .iter()
            .filter_map(AttrValue::as_object)
            .map(|obj| match obj.get("properties").and_then(AttrValue::as_object) {
                Some(properties) => Self::from(properties.clone()),
                None => Self::from(obj.clone()),
            })
            .collect()
    }

    /// Follow a dotted path through nested objects, e.g.
    /// `planning.nitrogen.value`.
    pub fn path(&self, dotted: &str) -> Option<&AttrValue> {
        let mut segments = dotted.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Numeric value at a dotted path; absent or non-numeric reads as `0.0`.
    pub fn path_number(&self, dotted: &str) -> f64 {
        self.path(dotted).and_then(AttrValue::as_number).unwrap_or(0.0)
    }

    /// The record's `measurement_period` tag, if present and recognised.
    pub fn measurement_period(&self) -> Option<MeasurementPeriod> {
        self.text("measurement_period").and_then(|s| s.parse().ok())
    }

    /// The raw `practice_code` token.
    pub fn practice_code(&self) -> Option<&str> {
        self.text("practice_code")
    }

    /// Secondary code injected by the dispatcher.
    pub fn secondary_code(&self) -> Option<&str> {
        self.text("secondary_code")
    }
}

impl From<BTreeMap<String, AttrValue>> for PracticeRecord {
    fn from(attributes: BTreeMap<String, AttrValue>) -> Self {
        Self { attributes }
    }
}

impl From<PracticeRecord> for AttrValue {
    fn from(record: PracticeRecord) -> Self {
        Self::Object(record.attributes)
    }
}

impl FromIterator<(String, AttrValue)> for PracticeRecord {
    fn from_iter<T: IntoIterator<Item = (String, AttrValue)>>(iter: T) -> Self {
        Self { attributes: iter.into_iter().collect() }
    }
}
