//! Header → field mapping tables and per-field value rules.
//!
//! A mapping is data, not code: each volunteer type ships one static table of
//! `(spreadsheet header, record field, rule)` rows plus the defaults its records
//! need. Headers are matched exactly (case and punctuation as pasted, after the
//! header row is trimmed); unmapped columns are dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Spreadsheet header → raw cell text, for one data row.
pub type RawRecord = BTreeMap<String, String>;

/// Record field → transformed value, ready to hand to the backend.
pub type TransformedRecord = BTreeMap<String, FieldValue>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Bool(_) => None,
        }
    }
}

/// How a cell's text becomes a field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRule {
    /// Copied verbatim.
    Text,
    /// `true` iff the lowercased text contains "yes" ("Yes, in Tempe" → true).
    YesFlag,
    /// Like `YesFlag`, but "agree" also counts ("I agree" → true).
    AgreeFlag,
}

impl FieldRule {
    pub fn apply(self, raw: &str) -> FieldValue {
        match self {
            FieldRule::Text => FieldValue::Text(raw.to_string()),
            FieldRule::YesFlag => FieldValue::Bool(raw.to_lowercase().contains("yes")),
            FieldRule::AgreeFlag => {
                let lower = raw.to_lowercase();
                FieldValue::Bool(lower.contains("yes") || lower.contains("agree"))
            }
        }
    }
}

/// `const`-friendly value used in static default tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaticValue {
    Bool(bool),
    Text(&'static str),
}

impl From<StaticValue> for FieldValue {
    fn from(v: StaticValue) -> Self {
        match v {
            StaticValue::Bool(b) => FieldValue::Bool(b),
            StaticValue::Text(s) => FieldValue::Text(s.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldMap {
    pub header: &'static str,
    pub field: &'static str,
    pub rule: FieldRule,
}

impl FieldMap {
    pub const fn text(header: &'static str, field: &'static str) -> Self {
        Self { header, field, rule: FieldRule::Text }
    }

    pub const fn flag(header: &'static str, field: &'static str, rule: FieldRule) -> Self {
        Self { header, field, rule }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HeaderMapping {
    pub name: &'static str,
    pub columns: &'static [FieldMap],
    /// Filled in only when the field is still absent after mapping.
    pub defaults: &'static [(&'static str, StaticValue)],
    /// Always written, overriding whatever the paste said.
    pub forced: &'static [(&'static str, StaticValue)],
}

impl HeaderMapping {
    pub fn column(&self, header: &str) -> Option<&FieldMap> {
        self.columns.iter().find(|c| c.header == header)
    }

    /// Copy every mapped header present in `raw`, applying the column rule.
    pub fn apply(&self, raw: &RawRecord) -> TransformedRecord {
        let mut out = TransformedRecord::new();
        for col in self.columns {
            if let Some(cell) = raw.get(col.header) {
                out.insert(col.field.to_string(), col.rule.apply(cell));
            }
        }
        out
    }

    /// Apply defaults (absent fields only) and forced values.
    pub fn finish(&self, mut record: TransformedRecord) -> TransformedRecord {
        for (field, value) in self.defaults {
            record
                .entry((*field).to_string())
                .or_insert_with(|| FieldValue::from(*value));
        }
        for (field, value) in self.forced {
            record.insert((*field).to_string(), FieldValue::from(*value));
        }
        record
    }
}

/// Turns one raw row into the record handed back to the caller.
pub trait RecordTransform {
    fn transform(&self, raw: &RawRecord) -> TransformedRecord;
}

impl RecordTransform for HeaderMapping {
    fn transform(&self, raw: &RawRecord) -> TransformedRecord {
        self.finish(self.apply(raw))
    }
}

impl<F> RecordTransform for F
where
    F: Fn(&RawRecord) -> TransformedRecord,
{
    fn transform(&self, raw: &RawRecord) -> TransformedRecord {
        self(raw)
    }
}
