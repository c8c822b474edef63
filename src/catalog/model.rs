//! Species records as they cross the data boundary.
//!
//! Upstream data arrives loosely shaped (`RawSpeciesRecord`, snake_case fields,
//! most of them optional). Everything past the loader works with
//! `SpeciesRecord`, which is only constructible through `TryFrom` so blank ids,
//! blank names and malformed timestamps fail at load time instead of leaking
//! into the view layer.

use crate::catalog::identity::{CategoryId, SpeciesId};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Route prefix for species detail views.
pub const DETAIL_ROUTE: &str = "/logbook";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("species record has no id")]
    MissingId,

    #[error("species record {id} has an empty name")]
    BlankName { id: String },

    #[error("species record {id} has invalid {field} timestamp '{value}'")]
    InvalidTimestamp {
        id: String,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
/// Record shape supplied by the upstream data service or a bundled JSON file.
pub struct RawSpeciesRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub habitat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "RawSpeciesRecord", into = "RawSpeciesRecord")]
/// Validated, immutable species entry.
pub struct SpeciesRecord {
    pub id: SpeciesId,
    pub name: String,
    pub slug: Option<String>,
    pub scientific_name: String,
    pub description: String,
    pub habitat: String,
    pub category: Option<CategoryId>,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// Compact projection used by the logbook grid.
pub struct SpeciesCard {
    pub id: SpeciesId,
    pub name: String,
    pub scientific_name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub href: String,
}

impl SpeciesRecord {
    /// Link target for the record's detail view.
    pub fn href(&self) -> String {
        format!("{DETAIL_ROUTE}/{}", self.id)
    }

    pub fn card(&self) -> SpeciesCard {
        SpeciesCard {
            id: self.id.clone(),
            name: self.name.clone(),
            scientific_name: self.scientific_name.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            href: self.href(),
        }
    }
}

impl TryFrom<RawSpeciesRecord> for SpeciesRecord {
    type Error = RecordError;

    fn try_from(raw: RawSpeciesRecord) -> Result<Self, Self::Error> {
        let id = non_blank(raw.id).ok_or(RecordError::MissingId)?;
        let name = non_blank(raw.name).ok_or_else(|| RecordError::BlankName { id: id.clone() })?;
        let created_at = parse_timestamp(&id, "created_at", raw.created_at)?;
        let updated_at = parse_timestamp(&id, "updated_at", raw.updated_at)?;

        Ok(SpeciesRecord {
            id: SpeciesId(id),
            name,
            slug: non_blank(raw.slug),
            scientific_name: raw.scientific_name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            habitat: raw.habitat.unwrap_or_default(),
            category: non_blank(raw.category).map(CategoryId),
            image_url: non_blank(raw.image_url),
            created_at,
            updated_at,
            created_by: non_blank(raw.created_by),
        })
    }
}

impl From<SpeciesRecord> for RawSpeciesRecord {
    fn from(record: SpeciesRecord) -> Self {
        RawSpeciesRecord {
            id: Some(record.id.0),
            name: Some(record.name),
            slug: record.slug,
            scientific_name: Some(record.scientific_name),
            description: Some(record.description),
            habitat: Some(record.habitat),
            category: record.category.map(|c| c.0),
            image_url: record.image_url,
            created_at: record.created_at.map(|ts| ts.to_rfc3339()),
            updated_at: record.updated_at.map(|ts| ts.to_rfc3339()),
            created_by: record.created_by,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_timestamp(
    id: &str,
    field: &'static str,
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>, RecordError> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&value)
        .map(|ts| Some(ts.with_timezone(&Utc)))
        .map_err(|source| RecordError::InvalidTimestamp {
            id: id.to_string(),
            field,
            value,
            source,
        })
}

/// Split a record stream into JSON values.
///
/// Accepts a JSON array, a single object, or NDJSON. Blank input is an error;
/// an explicit empty array is a valid, empty catalog.
pub(crate) fn record_values(input: &str) -> Result<Vec<Value>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("No species records provided");
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return match value {
            Value::Array(items) => Ok(items),
            Value::Object(_) => Ok(vec![value]),
            _ => bail!("Unsupported JSON input; expected object or array"),
        };
    }

    let mut values = Vec::new();
    for (idx, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Unable to parse species record from line {}", idx + 1))?;
        values.push(value);
    }
    Ok(values)
}

/// Convert raw JSON values into strict records, naming the failing index.
pub(crate) fn records_from_values(values: Vec<Value>) -> Result<Vec<SpeciesRecord>> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let raw: RawSpeciesRecord = serde_json::from_value(value)
                .with_context(|| format!("species record #{idx} is not an object of strings"))?;
            SpeciesRecord::try_from(raw).with_context(|| format!("species record #{idx}"))
        })
        .collect()
}
