//! # openapi-typegen
//!
//! **openapi-typegen** turns normalized API definitions (schemas, parameters,
//! responses, request bodies and operations) into Rust source files by rendering
//! a small set of named, overridable templates.
//!
//! ## Overview
//!
//! - **[`generator`]** - template registry, import resolver, open-schema planner,
//!   the type and operation pipelines and the output writers
//! - **[`open_schema`]** - runtime support called by generated code for types
//!   that allow additional properties
//! - **[`model`]** - the definitions a run consumes
//! - **[`config`]** - `typegen.toml` and definitions loading
//! - **[`cli`]** - the `openapi-typegen` command line
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`error`]** - error types
//!
//! ## Open types
//!
//! A schema that allows additional properties becomes a struct with its declared
//! fields plus `additional_properties: Option<HashMap<String, V>>`. The generated
//! `get`/`set` accessors reach the open map, and encode/decode keep declared
//! keys typed while every unknown key round-trips through the map:
//!
//! ```text
//! {"id": 7, "extra": "x"}  →  Tag { id: 7, name: None, additional_properties: {"extra": "x"} }
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use openapi_typegen::config::{load_input, GeneratorConfig};
//! use openapi_typegen::generator::generate;
//!
//! let input = load_input("definitions.yaml".as_ref())?;
//! let config = GeneratorConfig {
//!     package_name: "petstore".to_string(),
//!     target_dir: "src/api".into(),
//!     ..GeneratorConfig::default()
//! };
//! generate(&config, &input)?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod model;
pub mod open_schema;

pub use config::{load_config, load_input, GeneratorConfig};
pub use error::{GenerateError, PatternError, TemplateError, WriteError};
pub use generator::{generate, generate_with_writer, GenerationReport, TemplateRegistry};
pub use model::{
    GenerationInput, OperationDefinition, PropertyDefinition, RequestBodyDefinition, Schema,
    TypeDefinition,
};
