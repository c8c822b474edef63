//! JSON Schema loading for species records.
//!
//! The record schema ships inside the binary; an on-disk copy can replace it
//! (e.g. a newer schema next to a data directory). Either way the
//! `schema_version` marker must be in the allowed set before the schema is
//! compiled.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

pub const RECORD_SCHEMA_VERSION: &str = "microcosm_species_v1";

/// Relative location of the record schema under a data root.
pub const RECORD_SCHEMA_PATH: &str = "schema/species_record.schema.json";

const BUNDLED_RECORD_SCHEMA: &str = include_str!("../schema/species_record.schema.json");

/// Compiled validator for a single species record.
pub struct RecordSchema {
    pub schema_version: String,
    compiled: JSONSchema,
}

impl RecordSchema {
    /// Compile the schema bundled with the crate.
    pub fn bundled() -> Result<Self> {
        let value: Value =
            serde_json::from_str(BUNDLED_RECORD_SCHEMA).context("parsing bundled record schema")?;
        Self::from_value(&value, "bundled record schema")
    }

    /// Compile a schema from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_reader(
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?,
        )
        .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::from_value(&value, &path.display().to_string())
    }

    /// Prefer `<root>/schema/species_record.schema.json`, falling back to the
    /// bundled copy when the root has none.
    pub fn for_root(root: Option<&Path>) -> Result<Self> {
        if let Some(root) = root {
            let candidate = root.join(RECORD_SCHEMA_PATH);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
        }
        Self::bundled()
    }

    fn from_value(schema: &Value, origin: &str) -> Result<Self> {
        let schema_version = extract_schema_version(schema)
            .ok_or_else(|| anyhow!("{origin} missing schema_version marker"))?;

        let allowed = allowed_schema_versions();
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }

        let compiled =
            JSONSchema::compile(schema).map_err(|err| anyhow!("compiling {origin}: {err}"))?;

        Ok(Self {
            schema_version,
            compiled,
        })
    }

    /// Validate one record value, joining every violation into the error.
    pub fn validate(&self, record: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(record) {
            let details = errors
                .map(|err| {
                    let path = err.instance_path.to_string();
                    if path.is_empty() {
                        err.to_string()
                    } else {
                        format!("{path}: {err}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            bail!("failed schema validation:\n{details}");
        }
        Ok(())
    }
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([RECORD_SCHEMA_VERSION.to_string()])
}

fn extract_schema_version(schema: &Value) -> Option<String> {
    let version = schema.get("schema_version").and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}
