//! Build a bundled catalog file from a directory of species entries.
//!
//! Layout: `<data_dir>/<slug>/entry.json` plus an optional
//! `<data_dir>/<slug>/images/` directory. Entries without an id get a fresh
//! UUID; entries without an image pick up the first image file, addressed as
//! `<slug>/<filename>`. Directories without `entry.json` are skipped.
//!
//! Slugs, whether taken from `entry.json` or from the directory name, are
//! normalised to the `[a-z0-9][a-z0-9_-]*` shape the record schema accepts.

use crate::catalog::{CatalogStore, RawSpeciesRecord, SpeciesRecord};
use anyhow::{Context, Result, bail};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use uuid::Uuid;

const ENTRY_FILE: &str = "entry.json";
const IMAGES_DIR: &str = "images";

/// Collect every entry under `data_dir` into validated records.
///
/// Duplicate ids across entries are an error.
pub fn assemble_catalog(data_dir: &Path) -> Result<Vec<SpeciesRecord>> {
    if !data_dir.is_dir() {
        bail!("Data directory not found: {}", data_dir.display());
    }

    let entry_dirs = entry_dirs(data_dir)?;
    if entry_dirs.is_empty() {
        info!(dir = %data_dir.display(), "no species entries found; nothing to assemble");
        return Ok(Vec::new());
    }
    info!(
        dir = %data_dir.display(),
        entries = entry_dirs.len(),
        "assembling species catalog"
    );

    let mut records = Vec::new();
    for dir in entry_dirs {
        let entry_path = dir.join(ENTRY_FILE);
        if !entry_path.is_file() {
            debug!(dir = %dir.display(), "skipping directory without entry.json");
            continue;
        }
        records.push(assemble_entry(&dir, &entry_path)?);
    }

    // Reuse the store's uniqueness check before anything is written out.
    CatalogStore::from_records(records.clone())
        .with_context(|| format!("assembling {}", data_dir.display()))?;
    Ok(records)
}

fn entry_dirs(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(data_dir)
        .with_context(|| format!("reading data directory {}", data_dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn assemble_entry(dir: &Path, entry_path: &Path) -> Result<SpeciesRecord> {
    let data = fs::read_to_string(entry_path)
        .with_context(|| format!("reading {}", entry_path.display()))?;
    let mut raw: RawSpeciesRecord = serde_json::from_str(&data)
        .with_context(|| format!("parsing {}", entry_path.display()))?;

    let dir_name = dir
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("non UTF-8 entry directory {}", dir.display()))?;

    let source = match raw.slug.as_deref() {
        Some(slug) if !slug.trim().is_empty() => slug.to_string(),
        _ => dir_name,
    };
    let Some(slug) = normalize_slug(&source) else {
        bail!(
            "cannot derive a slug from '{source}' for {}",
            entry_path.display()
        );
    };
    if slug != source {
        debug!(from = %source, to = %slug, "normalised slug");
    }
    raw.slug = Some(slug);
    if raw.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
        raw.id = Some(Uuid::new_v4().to_string());
    }
    if raw.image_url.as_deref().is_none_or(|url| url.trim().is_empty()) {
        let slug = raw.slug.clone().unwrap_or_default();
        raw.image_url = first_image(&dir.join(IMAGES_DIR))?
            .map(|filename| format!("{slug}/{filename}"));
        if raw.image_url.is_none() {
            warn!(slug = %slug, "entry has no image; cards will show the placeholder");
        }
    }

    SpeciesRecord::try_from(raw).with_context(|| format!("validating {}", entry_path.display()))
}

/// Lowercase `source` and fold every run of other characters into one `-`.
///
/// `None` when nothing alphanumeric is left.
fn normalize_slug(source: &str) -> Option<String> {
    let mut slug = String::with_capacity(source.len());
    let mut pending_dash = false;
    for ch in source.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            if ch == '_' && slug.is_empty() {
                continue;
            }
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    (!slug.is_empty()).then_some(slug)
}

fn first_image(images_dir: &Path) -> Result<Option<String>> {
    if !images_dir.is_dir() {
        return Ok(None);
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(images_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !name.starts_with('.') {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names.into_iter().next())
}

/// Write records as a pretty JSON array, replacing `path` atomically.
pub fn write_catalog(path: &Path, records: &[SpeciesRecord]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("allocating temp file in {}", parent.display()))?;
    serde_json::to_writer_pretty(&mut tmp, records)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "catalog written");
    Ok(())
}
