use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Run `rustfmt` over every `.rs` file directly under `dir`.
///
/// The binary can be overridden with `TYPEGEN_RUSTFMT_BIN`.
pub fn format_units(dir: &Path) -> anyhow::Result<()> {
    // Allow tests to override the rustfmt binary path without mutating PATH
    let rustfmt_bin = std::env::var("TYPEGEN_RUSTFMT_BIN").unwrap_or_else(|_| "rustfmt".to_string());

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "rs"))
        .collect();
    if files.is_empty() {
        return Ok(());
    }
    files.sort();

    debug!(bin = %rustfmt_bin, files = files.len(), "formatting generated units");
    let status = Command::new(&rustfmt_bin)
        .arg("--edition")
        .arg("2021")
        .args(&files)
        .status()
        .with_context(|| format!("failed to run {rustfmt_bin}"))?;
    if !status.success() {
        anyhow::bail!("rustfmt failed");
    }
    Ok(())
}
