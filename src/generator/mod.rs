//! # Generator Module
//!
//! Turns normalized type and operation definitions into Rust source units.
//!
//! ## Overview
//!
//! A run produces, under `<target_dir>/<package_name>/`:
//! - **Type units** - one file per schema, parameter, response and body type
//! - **Operation units** - one file per operation that has parameter types,
//!   holding those types and the operation's request body aliases
//! - **`mod.rs`** - declares and re-exports every unit
//!
//! Types that allow additional properties also get `get`/`set` accessors and
//! encode/decode code that keeps unknown keys in a typed map (see
//! [`crate::open_schema`]).
//!
//! ## Architecture
//!
//! ```text
//! Definitions → Template Registry → Type / Operation pipelines → Output Writer
//!                      ↑                      ↑
//!               user overrides          Import Resolver
//! ```
//!
//! 1. **Template Registry** - built-in minijinja templates, selectively replaced
//!    by caller overrides, then frozen
//! 2. **Import Resolver** - scans each declaration for tokens that need a `use`
//! 3. **Planner** - flattens open schemas into the per-field plan the
//!    `type-properties` template iterates
//! 4. **Pipelines** - render every unit in parallel and hand it to the writer
//!
//! ## Usage
//!
//! ```bash
//! openapi-typegen generate --input definitions.yaml --output src/api
//! ```
//!
//! ```rust,ignore
//! use openapi_typegen::config::{load_input, GeneratorConfig};
//! use openapi_typegen::generator::generate;
//!
//! let input = load_input("definitions.yaml".as_ref())?;
//! let report = generate(&GeneratorConfig::default(), &input)?;
//! println!("{} type units", report.type_units.len());
//! ```
//!
//! ## Template Customization
//!
//! Built-in templates live in `templates/`:
//!
//! - `type.rs.j2` - base declaration of a type
//! - `type-properties.rs.j2` - accessors and encode/decode for open types
//! - `param-type.rs.j2` - parameter types of one operation
//! - `request-bodies.rs.j2` - request body aliases
//!
//! Override any of them by name through `user_templates` in `typegen.toml` or by
//! placing a file of the same name in `template_dir`.

mod format;
mod imports;
mod naming;
mod pipeline;
mod planner;
mod templates;
mod writer;

pub use format::*;
pub use imports::*;
pub use naming::*;
pub use pipeline::*;
pub use planner::*;
pub use templates::*;
pub use writer::*;

use anyhow::Context;
use askama::Template;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::model::GenerationInput;

/// Unit name of the generated module index
pub const MOD_RS_UNIT: &str = "mod";

/// Units written by one run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub type_units: Vec<String>,
    pub operation_units: Vec<String>,
}

impl GenerationReport {
    /// Every unit name, types first
    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.type_units
            .iter()
            .chain(&self.operation_units)
            .map(String::as_str)
    }
}

/// Build the frozen registry for `config`: defaults, then `template_dir`
/// files, then inline `user_templates`.
pub fn build_registry(config: &GeneratorConfig) -> anyhow::Result<TemplateRegistry> {
    let overrides = config.template_overrides()?;
    let registry = TemplateRegistry::with_overrides(&overrides)
        .context("Failed to build template registry")?;
    Ok(registry)
}

/// Run both pipelines against `writer`, then write `mod.rs`.
///
/// Nothing is emitted when `config.generate_types` is false. Types are emitted
/// first; if any type fails, operations are not attempted.
pub fn generate_with_writer(
    config: &GeneratorConfig,
    input: &GenerationInput,
    registry: &TemplateRegistry,
    writer: &dyn OutputWriter,
) -> Result<GenerationReport, GenerateError> {
    if !config.generate_types {
        info!(package = %config.package_name, "type generation disabled, nothing to emit");
        return Ok(GenerationReport::default());
    }

    let imports = default_imports()?;
    let emitter = Emitter::new(registry, imports, &config.package_name);

    let type_units = emit_types(&emitter, &input.all_types(), writer)?;
    let operation_units = emit_operations(&emitter, &input.operations, writer)?;

    let report = GenerationReport {
        type_units,
        operation_units,
    };
    let mut modules: Vec<String> = Vec::new();
    for unit in report.units() {
        let module = sanitize_rust_identifier(unit);
        if modules.contains(&module) {
            warn!(unit, "unit name emitted twice; last write wins");
            continue;
        }
        modules.push(module);
    }
    let index = ModRsTemplateData {
        package_name: config.package_name.clone(),
        modules,
    }
    .render()?;
    writer.write_unit(MOD_RS_UNIT, &index)?;

    info!(
        package = %config.package_name,
        types = report.type_units.len(),
        operations = report.operation_units.len(),
        "generation complete"
    );
    Ok(report)
}

/// Generate into `config.output_dir()` on disk, formatting afterwards if
/// `config.format` is set.
///
/// With `config.generate_types` off, no directory is created.
pub fn generate(config: &GeneratorConfig, input: &GenerationInput) -> anyhow::Result<GenerationReport> {
    let registry = build_registry(config)?;
    if !config.generate_types {
        return Ok(generate_with_writer(config, input, &registry, &MemoryWriter::new())?);
    }
    let out_dir = config.output_dir();
    let writer = FsWriter::create(&out_dir)?;
    let report = generate_with_writer(config, input, &registry, &writer)?;
    if config.format {
        format_units(&out_dir)?;
    }
    Ok(report)
}
