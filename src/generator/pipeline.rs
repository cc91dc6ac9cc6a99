//! Type and operation emission pipelines.
//!
//! Both pipelines are pure given the frozen [`TemplateRegistry`] and the import
//! table: each input element is rendered independently on the rayon pool and
//! handed to the [`OutputWriter`]. Every element is attempted; the first failure in
//! input order is returned and the rest are logged.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::imports::ImportTable;
use super::naming::to_snake_case;
use super::planner::OpenSchemaPlan;
use super::templates::{
    TemplateRegistry, PARAM_TYPE_TEMPLATE, REQUEST_BODIES_TEMPLATE, TYPE_PROPERTIES_TEMPLATE,
    TYPE_TEMPLATE,
};
use super::writer::OutputWriter;
use crate::error::GenerateError;
use crate::model::{OperationDefinition, PropertyDefinition, RequestBodyDefinition, TypeDefinition};

/// Schema as seen by templates
#[derive(Debug, Clone, Serialize)]
pub struct SchemaView<'a> {
    pub type_decl: &'a str,
    pub is_struct: bool,
    pub has_additional_properties: bool,
    pub additional_properties_type: Option<&'a str>,
    pub properties: &'a [PropertyDefinition],
}

/// Type definition as seen by templates
#[derive(Debug, Clone, Serialize)]
pub struct TypeView<'a> {
    pub type_name: &'a str,
    pub json_name: &'a str,
    pub schema: SchemaView<'a>,
}

impl<'a> From<&'a TypeDefinition> for TypeView<'a> {
    fn from(def: &'a TypeDefinition) -> Self {
        let schema = &def.schema;
        Self {
            type_name: &def.type_name,
            json_name: &def.json_name,
            schema: SchemaView {
                type_decl: schema.type_decl(),
                is_struct: schema.is_struct(),
                has_additional_properties: schema.has_additional_properties,
                additional_properties_type: schema
                    .additional_properties_type
                    .as_deref()
                    .map(|s| s.type_decl()),
                properties: &schema.properties,
            },
        }
    }
}

/// Operation as seen by templates
#[derive(Debug, Clone, Serialize)]
pub struct OperationView<'a> {
    pub operation_id: &'a str,
    pub type_definitions: Vec<TypeView<'a>>,
    pub bodies: &'a [RequestBodyDefinition],
}

impl<'a> From<&'a OperationDefinition> for OperationView<'a> {
    fn from(op: &'a OperationDefinition) -> Self {
        Self {
            operation_id: &op.operation_id,
            type_definitions: op.type_definitions.iter().map(TypeView::from).collect(),
            bodies: &op.bodies,
        }
    }
}

/// Context of the `type` template
#[derive(Debug, Serialize)]
pub struct TypeContext<'a> {
    pub package_name: &'a str,
    pub imports: &'a [String],
    #[serde(rename = "type")]
    pub type_def: &'a TypeView<'a>,
}

/// Context of the `type-properties` template
#[derive(Debug, Serialize)]
pub struct PropertiesContext<'a> {
    pub package_name: &'a str,
    #[serde(rename = "type")]
    pub type_def: &'a TypeView<'a>,
    pub plan: &'a OpenSchemaPlan,
}

/// Context of the `param-type` template
#[derive(Debug, Serialize)]
pub struct OperationContext<'a> {
    pub package_name: &'a str,
    pub imports: &'a [String],
    pub operation: &'a OperationView<'a>,
}

/// Context of the `request-bodies` template: every operation, plus the one
/// whose unit is being rendered
#[derive(Debug, Serialize)]
pub struct BodiesContext<'a> {
    pub operations: &'a [OperationView<'a>],
    pub operation_id: &'a str,
}

/// A rendered compilation unit, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedUnit {
    pub name: String,
    pub code: String,
}

/// Renders units from definitions against a frozen registry.
#[derive(Clone, Copy)]
pub struct Emitter<'a> {
    registry: &'a TemplateRegistry,
    imports: &'a ImportTable,
    package_name: &'a str,
}

impl<'a> Emitter<'a> {
    pub fn new(registry: &'a TemplateRegistry, imports: &'a ImportTable, package_name: &'a str) -> Self {
        Self {
            registry,
            imports,
            package_name,
        }
    }

    /// Render the unit for one type definition.
    ///
    /// # Errors
    ///
    /// Any render or planning failure, wrapped with the type name.
    pub fn render_type(&self, def: &TypeDefinition) -> Result<EmittedUnit, GenerateError> {
        self.type_code(def)
            .map(|code| EmittedUnit {
                name: to_snake_case(&def.type_name),
                code,
            })
            .map_err(|err| GenerateError::for_type(&def.type_name, err))
    }

    fn type_code(&self, def: &TypeDefinition) -> Result<String, GenerateError> {
        let view = TypeView::from(def);
        let imports = self.imports.resolve(def.schema.type_decl());
        let base = self.registry.render(
            TYPE_TEMPLATE,
            &TypeContext {
                package_name: self.package_name,
                imports: &imports,
                type_def: &view,
            },
        )?;
        let properties = self.properties_code(def, &view)?.unwrap_or_default();
        Ok([base, properties].join("\n\n"))
    }

    fn properties_code(&self, def: &TypeDefinition, view: &TypeView<'_>) -> Result<Option<String>, GenerateError> {
        let Some(plan) = OpenSchemaPlan::for_type(def)? else {
            return Ok(None);
        };
        let code = self.registry.render(
            TYPE_PROPERTIES_TEMPLATE,
            &PropertiesContext {
                package_name: self.package_name,
                type_def: view,
                plan: &plan,
            },
        )?;
        Ok(Some(code))
    }

    /// Render the unit for one operation; `None` when it has no type definitions.
    ///
    /// `operations` is the whole operation list, bound to the `request-bodies`
    /// template.
    ///
    /// # Errors
    ///
    /// Any render or planning failure, wrapped with the operation id.
    pub fn render_operation(
        &self,
        op: &OperationDefinition,
        operations: &[OperationView<'_>],
    ) -> Result<Option<EmittedUnit>, GenerateError> {
        if op.type_definitions.is_empty() {
            debug!(operation_id = %op.operation_id, "operation has no types, skipping");
            return Ok(None);
        }
        self.operation_code(op, operations)
            .map(|code| {
                Some(EmittedUnit {
                    name: to_snake_case(&op.operation_id),
                    code,
                })
            })
            .map_err(|err| GenerateError::for_operation(&op.operation_id, err))
    }

    fn operation_code(&self, op: &OperationDefinition, operations: &[OperationView<'_>]) -> Result<String, GenerateError> {
        let view = OperationView::from(op);

        // A unit must not `use` the same item twice
        let mut imports: Vec<String> = Vec::new();
        let decls = op
            .type_definitions
            .iter()
            .map(|def| def.schema.type_decl())
            .chain(op.bodies.iter().map(|body| body.type_def.as_str()));
        for decl in decls {
            for import in self.imports.resolve(decl) {
                if !imports.contains(&import) {
                    imports.push(import);
                }
            }
        }

        let mut properties = Vec::new();
        for (def, type_view) in op.type_definitions.iter().zip(&view.type_definitions) {
            if let Some(code) = self.properties_code(def, type_view)? {
                properties.push(code);
            }
        }

        let params = self.registry.render(
            PARAM_TYPE_TEMPLATE,
            &OperationContext {
                package_name: self.package_name,
                imports: &imports,
                operation: &view,
            },
        )?;
        let bodies = self.registry.render(
            REQUEST_BODIES_TEMPLATE,
            &BodiesContext {
                operations,
                operation_id: &op.operation_id,
            },
        )?;
        Ok([params, properties.join("\n\n"), bodies].join("\n\n"))
    }
}

/// Fan-in: keep the first failure in input order, log the rest.
fn collect_outcomes(kind: &str, outcomes: Vec<Result<Option<String>, GenerateError>>) -> Result<Vec<String>, GenerateError> {
    let mut written = Vec::new();
    let mut first_error = None;
    for outcome in outcomes {
        match outcome {
            Ok(Some(unit)) => written.push(unit),
            Ok(None) => {}
            Err(err) if first_error.is_none() => first_error = Some(err),
            Err(err) => warn!(kind, error = %err, "additional unit failed"),
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(written),
    }
}

/// Emit one unit per type definition.
///
/// Returns the unit names written, in input order.
pub fn emit_types(
    emitter: &Emitter<'_>,
    types: &[TypeDefinition],
    writer: &dyn OutputWriter,
) -> Result<Vec<String>, GenerateError> {
    let outcomes: Vec<_> = types
        .par_iter()
        .map(|def| -> Result<Option<String>, GenerateError> {
            let unit = emitter.render_type(def)?;
            writer
                .write_unit(&unit.name, &unit.code)
                .map_err(|err| GenerateError::for_type(&def.type_name, err.into()))?;
            debug!(type_name = %def.type_name, unit = %unit.name, "emitted type");
            Ok(Some(unit.name))
        })
        .collect();
    let written = collect_outcomes("type", outcomes)?;
    info!(count = written.len(), "type units written");
    Ok(written)
}

/// Emit one unit per operation that has type definitions.
///
/// Returns the unit names written, in input order.
pub fn emit_operations(
    emitter: &Emitter<'_>,
    operations: &[OperationDefinition],
    writer: &dyn OutputWriter,
) -> Result<Vec<String>, GenerateError> {
    let views: Vec<OperationView<'_>> = operations.iter().map(OperationView::from).collect();
    let outcomes: Vec<_> = operations
        .par_iter()
        .map(|op| -> Result<Option<String>, GenerateError> {
            let Some(unit) = emitter.render_operation(op, &views)? else {
                return Ok(None);
            };
            writer
                .write_unit(&unit.name, &unit.code)
                .map_err(|err| GenerateError::for_operation(&op.operation_id, err.into()))?;
            debug!(operation_id = %op.operation_id, unit = %unit.name, "emitted operation");
            Ok(Some(unit.name))
        })
        .collect();
    let written = collect_outcomes("operation", outcomes)?;
    info!(count = written.len(), "operation units written");
    Ok(written)
}
