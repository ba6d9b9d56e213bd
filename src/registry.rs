//! The immutable in-memory provider table built once at startup.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{DirectoryError, Result};
use crate::normalize::normalize;

/// One row of the provider registry.
///
/// Matchable text fields (name, address, category, specialization) are
/// stored in normalized form; phone and notes pass through verbatim. An
/// empty string is the valid "absent" value, never a null marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub name: String,
    pub address: String,
    pub category: String,
    pub specialization: String,
    pub phone: String,
    pub notes: String,
}

/// Immutable, insertion-ordered table of provider records.
///
/// Insertion order is also the display and pagination order. Built once
/// before the conversation core becomes reachable; safe to share across
/// concurrent sessions without locking.
#[derive(Debug, Clone, Default)]
pub struct RegistryIndex {
    records: Vec<ProviderRecord>,
}

impl RegistryIndex {
    /// Builds the index from source rows, normalizing every matchable text
    /// field so no normalization happens on the filtering path later.
    ///
    /// A row missing any required field fails the whole load; the registry
    /// is small and curated, so partial loads are not worth modeling.
    pub fn load(rows: &[Value]) -> Result<Self> {
        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            records.push(ProviderRecord {
                name: normalize(&text_field(row, "name", i)?),
                address: normalize(&text_field(row, "address", i)?),
                category: normalize(&text_field(row, "category", i)?),
                specialization: normalize(&text_field(row, "specialization", i)?),
                phone: text_field(row, "phone", i)?,
                notes: text_field(row, "notes", i)?,
            });
        }

        info!("Loaded {} provider records", records.len());
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ProviderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose normalized category equals `category`, insertion order
    /// preserved.
    pub fn filter_by_category(&self, category: &str) -> Vec<&ProviderRecord> {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }
}

/// Distinct non-empty specialization values of `records`, first-seen order.
pub fn specializations_of<'a>(records: &[&'a ProviderRecord]) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for record in records {
        let spec = record.specialization.as_str();
        if !spec.is_empty() && !seen.contains(&spec) {
            seen.push(spec);
        }
    }
    seen
}

fn text_field(row: &Value, field: &str, row_index: usize) -> Result<String> {
    let value = row
        .get(field)
        .ok_or_else(|| DirectoryError::MissingField(format!("{field} not found in row {row_index}")))?;

    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        // Numeric phone cells arrive as JSON numbers; keep them verbatim.
        other => Ok(other.to_string()),
    }
}
