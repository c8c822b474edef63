use std::env;
use std::path::{Path, PathBuf};

const CATALOG: &str = "data/species/sample.json";

fn main() {
    println!("cargo:rerun-if-env-changed=MICROCOSM_ROOT_HINT");
    println!("cargo:rerun-if-changed={CATALOG}");

    let Some(raw_hint) = env::var("MICROCOSM_ROOT_HINT")
        .ok()
        .or_else(|| env::var("CARGO_MANIFEST_DIR").ok())
    else {
        return;
    };

    let candidate = PathBuf::from(raw_hint);
    let root = candidate.canonicalize().unwrap_or(candidate);
    if !root.join(Path::new(CATALOG)).is_file() {
        // The binary can still find a root at run time or take --catalog.
        println!(
            "cargo:warning=no species catalog under {}; skipping root hint",
            root.display()
        );
        return;
    }

    println!("cargo:rustc-env=MICROCOSM_ROOT_HINT={}", root.display());
}
