//! # CLI Module
//!
//! Command-line interface for the `openapi-typegen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Emit type and operation units from a definitions document:
//!
//! ```bash
//! openapi-typegen generate --input definitions.yaml --output src/api
//! ```
//!
//! Options:
//! - `--input <FILE>` - Definitions document, YAML or JSON (required)
//! - `--config <FILE>` - Generator config; defaults to `typegen.toml` next to the input
//! - `--output <DIR>` - Target directory; units go to `<DIR>/<package_name>/`
//! - `--package-name <NAME>` - Generated module name
//! - `--template-dir <DIR>` - Directory of template overrides
//! - `--skip-types` - Emit operation units only
//! - `--format` - Run rustfmt over the written units
//! - `--dry-run` - Render everything, print the unit paths, write nothing
//!
//! ### `templates`
//!
//! ```bash
//! # Names of the built-in templates
//! openapi-typegen templates list
//!
//! # Print a built-in template, as a starting point for an override
//! openapi-typegen templates show type > overrides/type.rs.j2
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use openapi_typegen::cli::{execute, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! execute(&cli, &mut std::io::stdout().lock())?;
//! ```

mod commands;


pub use commands::{execute, run_cli, Cli, Commands, TemplateCommands};
