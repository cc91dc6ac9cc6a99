//! Error types for the generator.
//!
//! Every failure is wrapped with the type name or operation id at the point it is
//! detected and propagated unchanged from there. Nothing here is retryable: the
//! same input always fails the same way.

use thiserror::Error;

/// Failures of the template registry.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template source does not parse (built-in or caller override)
    #[error("error parsing template '{name}': {source}")]
    TemplateSyntax {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// Render or override requested for a name that was never registered
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    /// Rendering the bound data failed (e.g. a missing field access)
    #[error("error rendering template '{name}': {source}")]
    TemplateRender {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// A `look_for` entry of an import table is not a valid token pattern.
#[derive(Debug, Error)]
#[error("invalid import pattern '{look_for}': {source}")]
pub struct PatternError {
    pub look_for: String,
    #[source]
    pub source: regex::Error,
}

/// The output sink could not persist a unit.
#[derive(Debug, Error)]
#[error("error writing unit '{unit}': {source}")]
pub struct WriteError {
    pub unit: String,
    #[source]
    pub source: std::io::Error,
}

/// Errors surfaced by a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Emitting a type definition failed
    #[error("error generating type '{type_name}': {source}")]
    Type {
        type_name: String,
        #[source]
        source: Box<GenerateError>,
    },

    /// Emitting an operation's types failed
    #[error("error generating types for operation '{operation_id}': {source}")]
    Operation {
        operation_id: String,
        #[source]
        source: Box<GenerateError>,
    },

    /// Definition violates a model invariant
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// Rendering the package `mod.rs` failed
    #[error("error rendering package index: {0}")]
    Index(#[from] askama::Error),
}

impl GenerateError {
    pub(crate) fn for_type(type_name: &str, source: GenerateError) -> Self {
        GenerateError::Type {
            type_name: type_name.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn for_operation(operation_id: &str, source: GenerateError) -> Self {
        GenerateError::Operation {
            operation_id: operation_id.to_string(),
            source: Box::new(source),
        }
    }
}
