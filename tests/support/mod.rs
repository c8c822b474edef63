use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn bundled_catalog() -> PathBuf {
    repo_root().join(microcosm_log::CATALOG_RELATIVE_PATH)
}

pub fn logbook_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_logbook"))
}

/// Write `records` to a temp catalog file that lives as long as the handle.
pub fn catalog_file(records: Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("failed to allocate catalog file")?;
    serde_json::to_writer(&mut file, &records)?;
    file.flush()?;
    Ok(file)
}

/// `logbook` with a scrubbed environment pointed at `catalog`.
pub fn logbook(catalog: &Path) -> Command {
    let mut cmd = Command::new(logbook_binary());
    cmd.env_remove("MICROCOSM_ROOT")
        .env_remove("MICROCOSM_CATALOG")
        .env("MICROCOSM_LOG", "warn")
        .arg("--catalog")
        .arg(catalog);
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn run_with_stdin(mut cmd: Command, input: &str) -> Result<Output> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().context("failed to spawn logbook")?;
    child
        .stdin
        .take()
        .context("stdin not piped")?
        .write_all(input.as_bytes())?;
    let output = child.wait_with_output()?;
    if !output.status.success() {
        bail!(
            "browse failed: {:?}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}
