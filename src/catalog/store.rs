//! Immutable backing sequence of species records for a session.
//!
//! The store keeps records in their source order and builds an id index next
//! to them. It is strict about duplicate ids and schema violations, but
//! deliberately lenient about categories: a record pointing at a category the
//! registry does not know is kept (it shows up under "all") and only logged.

use crate::catalog::model::{SpeciesRecord, record_values, records_from_values};
use crate::catalog::{CategoryRegistry, SpeciesId};
use crate::schema_loader::RecordSchema;
use anyhow::{Context, Result, bail};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
/// Species catalog plus a derived index keyed by record id.
pub struct CatalogStore {
    records: Vec<SpeciesRecord>,
    by_id: BTreeMap<SpeciesId, usize>,
}

impl CatalogStore {
    /// Load and validate a catalog file against the bundled record schema.
    pub fn load(path: &Path) -> Result<Self> {
        let schema = RecordSchema::bundled()?;
        Self::load_with_schema(path, &schema)
    }

    /// Load a catalog file, validating each record against `schema` before
    /// converting it into a strict `SpeciesRecord`.
    pub fn load_with_schema(path: &Path, schema: &RecordSchema) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let values =
            record_values(&data).with_context(|| format!("parsing {}", path.display()))?;

        for (idx, value) in values.iter().enumerate() {
            schema.validate(value).with_context(|| {
                format!(
                    "species catalog {} record #{idx}{}",
                    path.display(),
                    value
                        .get("id")
                        .and_then(|id| id.as_str())
                        .map(|id| format!(" ({id})"))
                        .unwrap_or_default()
                )
            })?;
        }

        let records =
            records_from_values(values).with_context(|| format!("loading {}", path.display()))?;
        let store = Self::from_records(records)?;
        debug!(path = %path.display(), records = store.len(), "loaded species catalog");
        Ok(store)
    }

    /// Build a store from already-validated records.
    ///
    /// Rejects duplicate ids; order is preserved exactly.
    pub fn from_records(records: Vec<SpeciesRecord>) -> Result<Self> {
        let by_id = build_index(&records)?;
        Ok(Self { records, by_id })
    }

    /// The full catalog in source order.
    pub fn all(&self) -> &[SpeciesRecord] {
        &self.records
    }

    /// Resolve a record by id.
    ///
    /// Returns `None` rather than erroring; the caller renders its own
    /// not-found state.
    pub fn find_by_id(&self, id: &SpeciesId) -> Option<&SpeciesRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Category ids referenced by records but absent from `registry`.
    pub fn unknown_categories(&self, registry: &CategoryRegistry) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|record| record.category.as_ref())
            .filter(|category| !registry.contains(category))
            .map(|category| category.0.clone())
            .collect()
    }

    /// Log each unknown category once so data-quality drift is visible.
    pub fn report_unknown_categories(&self, registry: &CategoryRegistry) {
        for category in self.unknown_categories(registry) {
            let count = self
                .records
                .iter()
                .filter(|r| r.category.as_ref().is_some_and(|c| c.0 == category))
                .count();
            warn!(
                category = %category,
                records = count,
                "records reference a category missing from the registry; they only appear under \"all\""
            );
        }
    }
}

fn build_index(records: &[SpeciesRecord]) -> Result<BTreeMap<SpeciesId, usize>> {
    let mut map = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        if map.insert(record.id.clone(), idx).is_some() {
            bail!("duplicate species id {}", record.id);
        }
    }
    Ok(map)
}
