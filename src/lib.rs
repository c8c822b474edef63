//! Shared library for the Microcosm Log species logbook.
//!
//! The crate exposes the species catalog (validated records, id lookup), the
//! fixed category registry, the pure category/query filter, and the logbook
//! view state that ties them to user input. Functions here locate the bundled
//! data on disk and parse record streams; the `logbook` binary is a thin CLI
//! over them.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod assemble;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod format;
pub mod logbook;
pub mod render;
pub mod schema_loader;
pub mod session;

pub use assemble::{assemble_catalog, write_catalog};
pub use catalog::{
    ALL_SENTINEL, CatalogStore, CategoryDefinition, CategoryId, CategoryRegistry,
    CategorySelector, FilterControl, RawSpeciesRecord, RecordError, SpeciesCard, SpeciesId,
    SpeciesRecord,
};
pub use config::Config;
pub use filter::{filter_species, matches_category, matches_query};
pub use logbook::{FilterSnapshot, LogbookError, LogbookView};
pub use schema_loader::RecordSchema;
pub use session::{Session, SessionContext, SessionError, UserProfile};

/// Catalog location relative to a data root.
pub const CATALOG_RELATIVE_PATH: &str = "data/species/sample.json";

/// Returns true when `candidate` looks like a data root.
fn is_data_root(candidate: &Path) -> bool {
    candidate.join(CATALOG_RELATIVE_PATH).is_file()
}

fn data_root_from_hint(hint: &Path) -> Option<PathBuf> {
    if hint.as_os_str().is_empty() || !is_data_root(hint) {
        return None;
    }
    fs::canonicalize(hint).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_data_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the directory holding `data/species/sample.json`.
///
/// Search order: the configured `MICROCOSM_ROOT` if it is a real data root,
/// then climbing up from the current executable, then the build-time hint.
pub fn find_data_root(config: &Config) -> Result<PathBuf> {
    if let Some(root) = config.root.as_deref().and_then(data_root_from_hint) {
        return Ok(root);
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(root) = exe_path.parent().and_then(search_upwards) {
            return Ok(root);
        }
    }

    if let Some(hint) = option_env!("MICROCOSM_ROOT_HINT") {
        if let Some(root) = data_root_from_hint(Path::new(hint)) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate the species data root. Set MICROCOSM_ROOT to a directory containing {CATALOG_RELATIVE_PATH}, or pass --catalog."
    );
}

/// Bundled catalog path under `root`.
pub fn default_catalog_path(root: &Path) -> PathBuf {
    root.join(CATALOG_RELATIVE_PATH)
}

/// Resolve the catalog path: explicit override first, then the data root.
pub fn resolve_catalog_path(config: &Config, override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path.or(config.catalog.as_deref()) {
        if !path.is_file() {
            bail!("Species catalog not found: {}", path.display());
        }
        return Ok(path.to_path_buf());
    }
    Ok(default_catalog_path(&find_data_root(config)?))
}

/// Parse a species stream (JSON array, single object, or NDJSON) into strict
/// records, without schema validation.
pub fn parse_species_stream(input: &str) -> Result<Vec<SpeciesRecord>> {
    catalog::model::records_from_values(catalog::model::record_values(input)?)
}

/// Load the session catalog: resolve the path, validate with the schema next
/// to the data root (or the bundled one), and report unknown categories.
pub fn load_catalog(
    config: &Config,
    override_path: Option<&Path>,
    registry: &CategoryRegistry,
) -> Result<CatalogStore> {
    let path = resolve_catalog_path(config, override_path)?;
    let schema_root = path
        .parent()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(Path::to_path_buf);
    let schema = RecordSchema::for_root(schema_root.as_deref())?;
    let store = CatalogStore::load_with_schema(&path, &schema)?;
    store.report_unknown_categories(registry);
    Ok(store)
}
