//! Output sinks for generated compilation units.
//!
//! A unit is a name (`pet`, `add_pet`) plus its source text. Sinks normalize the
//! text and persist it; they never see templates or definitions.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::WriteError;

/// Destination for rendered units. Shared across worker threads.
pub trait OutputWriter: Sync {
    /// Persist `code` as unit `unit`.
    fn write_unit(&self, unit: &str, code: &str) -> Result<(), WriteError>;
}

/// Tidy rendered text: no trailing whitespace, no leading blank lines, at most
/// one consecutive blank line, exactly one trailing newline.
pub fn normalize_code(code: &str) -> String {
    let code = code.trim_start_matches('\u{feff}');
    let mut out = String::with_capacity(code.len());
    let mut blank_run = 0usize;
    for line in code.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 || out.is_empty() {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    if out.is_empty() {
        out.push('\n');
    }
    out
}

/// Writes each unit to `<dir>/<unit>.rs`.
///
/// The text goes to a temporary file in `dir` first and is renamed into place
/// only after a successful flush, so a failed unit never leaves a partial file
/// and never touches another unit.
#[derive(Debug, Clone)]
pub struct FsWriter {
    dir: PathBuf,
}

impl FsWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Like [`new`](Self::new), creating `dir` if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, WriteError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| WriteError {
            unit: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn unit_path(&self, unit: &str) -> PathBuf {
        self.dir.join(format!("{unit}.rs"))
    }
}

impl OutputWriter for FsWriter {
    fn write_unit(&self, unit: &str, code: &str) -> Result<(), WriteError> {
        let wrap = |source| WriteError {
            unit: unit.to_string(),
            source,
        };
        let path = self.unit_path(unit);
        let normalized = normalize_code(code);

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(wrap)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            writer.write_all(normalized.as_bytes()).map_err(wrap)?;
            writer.flush().map_err(wrap)?;
        }
        temp.persist(&path).map_err(|err| wrap(err.error))?;

        debug!(unit, path = %path.display(), bytes = normalized.len(), "wrote unit");
        Ok(())
    }
}

/// Keeps units in memory; used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    units: DashMap<String, String>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, unit: &str) -> Option<String> {
        self.units.get(unit).map(|entry| entry.value().clone())
    }

    /// Unit names in sorted order.
    pub fn unit_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.units.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn into_units(self) -> BTreeMap<String, String> {
        self.units.into_iter().collect()
    }
}

impl OutputWriter for MemoryWriter {
    fn write_unit(&self, unit: &str, code: &str) -> Result<(), WriteError> {
        self.units.insert(unit.to_string(), normalize_code(code));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_code() {
        let raw = "\n\nfn a() {}   \n\n\n\nfn b() {}\n\n\n";
        assert_eq!(normalize_code(raw), "fn a() {}\n\nfn b() {}\n");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_code("\n \n"), "\n");
    }

    #[test]
    fn test_fs_writer_writes_unit() {
        let dir = TempDir::new().unwrap();
        let writer = FsWriter::create(dir.path().join("types")).unwrap();
        writer.write_unit("pet", "pub struct Pet;").unwrap();
        let content = fs::read_to_string(writer.unit_path("pet")).unwrap();
        assert_eq!(content, "pub struct Pet;\n");
    }

    #[test]
    fn test_fs_writer_overwrites_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let writer = FsWriter::new(dir.path());
        writer.write_unit("pet", "old").unwrap();
        writer.write_unit("pet", "new").unwrap();
        assert_eq!(fs::read_to_string(writer.unit_path("pet")).unwrap(), "new\n");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_fs_writer_missing_dir_reports_unit() {
        let dir = TempDir::new().unwrap();
        let writer = FsWriter::new(dir.path().join("does-not-exist"));
        let err = writer.write_unit("pet", "x").unwrap_err();
        assert_eq!(err.unit, "pet");
    }

    #[test]
    fn test_memory_writer() {
        let writer = MemoryWriter::new();
        writer.write_unit("b", "two").unwrap();
        writer.write_unit("a", "one").unwrap();
        assert_eq!(writer.unit_names(), ["a", "b"]);
        assert_eq!(writer.get("a").as_deref(), Some("one\n"));
        assert_eq!(writer.len(), 2);
    }
}
