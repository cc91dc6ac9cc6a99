//! Generator configuration and definitions loading.
//!
//! A `typegen.toml` next to the definitions document is picked up automatically;
//! an explicit `--config` path wins. CLI flags override whatever the file says.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::generator::default_template_source;
use crate::model::GenerationInput;

/// File name looked up next to the definitions document
pub const CONFIG_FILE_NAME: &str = "typegen.toml";

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Name of the generated module; also the output subdirectory
    pub package_name: String,
    /// Root directory; units go to `<target_dir>/<package_name>/`
    pub target_dir: PathBuf,
    /// When false, the run emits nothing
    pub generate_types: bool,
    /// Inline template overrides keyed by template name
    pub user_templates: BTreeMap<String, String>,
    /// Directory of `<name>.rs.j2` override files
    pub template_dir: Option<PathBuf>,
    /// Run rustfmt over the written units
    pub format: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package_name: "types".to_string(),
            target_dir: PathBuf::from("generated"),
            generate_types: true,
            user_templates: BTreeMap::new(),
            template_dir: None,
            format: false,
        }
    }
}

impl GeneratorConfig {
    /// Directory the units of this run are written to
    pub fn output_dir(&self) -> PathBuf {
        self.target_dir.join(&self.package_name)
    }

    /// All template overrides: files from `template_dir` first, then inline
    /// `user_templates`, which win on conflict.
    pub fn template_overrides(&self) -> anyhow::Result<BTreeMap<String, String>> {
        let mut overrides = match &self.template_dir {
            Some(dir) => load_template_dir(dir)?,
            None => BTreeMap::new(),
        };
        overrides.extend(
            self.user_templates
                .iter()
                .map(|(name, source)| (name.clone(), source.clone())),
        );
        Ok(overrides)
    }
}

/// Read override templates from `dir`.
///
/// A file overrides the built-in template whose name matches the file name up to
/// its first dot (`type.rs.j2` overrides `type`). Other files are skipped with a
/// warning.
pub fn load_template_dir(dir: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read template directory: {}", dir.display()))?;

    let mut overrides = BTreeMap::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read template directory: {}", dir.display()))?
            .path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('.').next())
        else {
            continue;
        };
        if default_template_source(name).is_none() {
            warn!(path = %path.display(), "ignoring file that matches no template");
            continue;
        }
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template: {}", path.display()))?;
        debug!(template = name, path = %path.display(), "loaded template override");
        overrides.insert(name.to_string(), source);
    }
    Ok(overrides)
}

/// Load generator configuration from a TOML file
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it exists but fails
/// to parse. A relative `template_dir` is resolved against the file's directory.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read generator config: {}", config_path.display()))?;

    let mut config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse generator config: {}", config_path.display()))?;

    if let (Some(dir), Some(base)) = (&config.template_dir, config_path.parent()) {
        if dir.is_relative() {
            config.template_dir = Some(base.join(dir));
        }
    }

    Ok(Some(config))
}

/// Auto-detect `typegen.toml` alongside the definitions document
pub fn auto_detect_config_path(input_path: &Path) -> Option<PathBuf> {
    let config_path = input_path.parent()?.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Resolve the config path
///
/// Priority:
/// 1. Explicitly provided path (via CLI), which must exist
/// 2. Auto-detected alongside the definitions document
/// 3. None (defaults)
pub fn resolve_config_path(explicit_path: Option<&Path>, input_path: &Path) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            anyhow::bail!("Generator config not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    Ok(auto_detect_config_path(input_path))
}

/// Load a definitions document, YAML for `.yaml`/`.yml` and JSON otherwise.
///
/// Top-level schemas without a `type_decl` get one rendered from their properties.
pub fn load_input(path: &Path) -> anyhow::Result<GenerationInput> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read definitions: {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml");

    let mut input: GenerationInput = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse definitions: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse definitions: {}", path.display()))?
    };
    input.fill_declarations();
    Ok(input)
}
