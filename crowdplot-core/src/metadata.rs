//! Location metadata index
//!
//! The metadata file is a JSON object mapping arbitrary keys to location
//! records. Every field of a record is optional; the index keeps whatever
//! each record can contribute and skips the rest.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::{LocationInfo, UNKNOWN_REGION};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("IO error reading metadata: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One record of the metadata file.
///
/// Scalars are kept as raw JSON values because upstream data mixes numbers
/// and strings for the same field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub postal: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub region: Option<Value>,
    /// Current count (e.g. machines currently in service).
    #[serde(default, rename = "atm")]
    pub current: Option<Value>,
    #[serde(default)]
    pub total: Option<Value>,
}

pub type CountExtractor = fn(&LocationRecord) -> Option<&Value>;

/// Auxiliary count sources, in order of precedence.
pub const AUX_COUNT_FIELDS: [(&str, CountExtractor); 2] = [
    ("atm", current_field),
    ("total", total_field),
];

fn current_field(record: &LocationRecord) -> Option<&Value> {
    record.current.as_ref()
}

fn total_field(record: &LocationRecord) -> Option<&Value> {
    record.total.as_ref()
}

/// Lookups keyed by postal code.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    names: HashMap<String, String>,
    regions: HashMap<String, String>,
    aux_counts: HashMap<String, String>,
}

impl MetadataIndex {
    /// Load and index a metadata file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MetadataError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Index records in file order; a later record sharing a postal code
    /// overrides an earlier one.
    pub fn from_json(content: &str) -> Result<Self, MetadataError> {
        let object: serde_json::Map<String, Value> = serde_json::from_str(content)?;
        let records = object
            .into_iter()
            .map(|(_, value)| serde_json::from_value(value))
            .collect::<Result<Vec<LocationRecord>, _>>()?;
        Ok(Self::from_records(&records))
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LocationRecord>,
    {
        let mut index = Self::default();
        for record in records {
            let Some(postal) = record.postal.as_ref().and_then(non_empty_text) else {
                continue;
            };
            if let Some(name) = record.name.as_ref().and_then(non_empty_text) {
                index.names.insert(postal.clone(), name);
            }
            if let Some(region) = record.region.as_ref().and_then(non_empty_text) {
                index.regions.insert(postal.clone(), region);
            }
            if let Some(count) = auxiliary_count(record) {
                index.aux_counts.insert(postal, count);
            }
        }
        log::debug!(
            "Indexed metadata: {} names, {} regions, {} counts",
            index.names.len(),
            index.regions.len(),
            index.aux_counts.len()
        );
        index
    }

    pub fn name(&self, postal: &str) -> Option<&str> {
        self.names.get(postal).map(String::as_str)
    }

    pub fn region(&self, postal: &str) -> Option<&str> {
        self.regions.get(postal).map(String::as_str)
    }

    pub fn auxiliary_count(&self, postal: &str) -> Option<&str> {
        self.aux_counts.get(postal).map(String::as_str)
    }

    /// Resolve a location, filling in defaults for anything missing.
    pub fn location(&self, postal: &str) -> LocationInfo {
        LocationInfo {
            display_name: self.name(postal).unwrap_or_default().to_string(),
            region: self.region(postal).unwrap_or(UNKNOWN_REGION).to_string(),
            auxiliary_count: self.auxiliary_count(postal).map(str::to_string),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len().max(self.regions.len()).max(self.aux_counts.len())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.regions.is_empty() && self.aux_counts.is_empty()
    }
}

/// First field in [`AUX_COUNT_FIELDS`] whose value is made only of digits.
pub fn auxiliary_count(record: &LocationRecord) -> Option<String> {
    AUX_COUNT_FIELDS.iter().find_map(|(field, extract)| {
        let text = extract(record).and_then(scalar_text)?;
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            Some(text)
        } else {
            log::trace!("Ignoring non-numeric {} value {:?}", field, text);
            None
        }
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
