//! Open-schema serialization planning.
//!
//! Decides whether a type needs generated accessor/encode/decode code and, if so,
//! flattens its declared properties into the per-field plan the `type-properties`
//! template iterates.

use serde::Serialize;
use std::collections::HashSet;

use crate::error::GenerateError;
use crate::model::TypeDefinition;

/// Field of the generated struct that holds the open map.
pub const ADDITIONAL_PROPERTIES_FIELD: &str = "additional_properties";

/// One declared field, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPlan {
    /// Wire key
    pub json_key: String,
    /// Rust field identifier
    pub field_name: String,
    pub required: bool,
    /// Declared type without the `Option<>` wrapper optional fields carry
    pub type_decl: String,
}

/// Everything the `type-properties` template needs for one open type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenSchemaPlan {
    pub type_name: String,
    /// Value type of the open-fields map
    pub value_type: String,
    pub fields: Vec<FieldPlan>,
}

impl OpenSchemaPlan {
    /// Plan for `def`, or `None` when the schema is closed.
    ///
    /// # Errors
    ///
    /// `InvalidDefinition` when an open schema has no value type, is not a
    /// struct, repeats a wire key, or declares a field that collides with the
    /// open map field.
    pub fn for_type(def: &TypeDefinition) -> Result<Option<Self>, GenerateError> {
        let schema = &def.schema;
        if !schema.has_additional_properties {
            return Ok(None);
        }
        let value_type = schema.additional_properties_type.as_ref().ok_or_else(|| {
            GenerateError::InvalidDefinition(format!(
                "{} allows additional properties but has no additional properties type",
                def.type_name
            ))
        })?;
        if !schema.is_struct() {
            return Err(GenerateError::InvalidDefinition(format!(
                "{} allows additional properties but is not declared as a struct",
                def.type_name
            )));
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(schema.properties.len());
        for prop in &schema.properties {
            if !seen.insert(prop.json_field_name.as_str()) {
                return Err(GenerateError::InvalidDefinition(format!(
                    "{} declares '{}' more than once",
                    def.type_name, prop.json_field_name
                )));
            }
            if prop.target_field_name == ADDITIONAL_PROPERTIES_FIELD {
                return Err(GenerateError::InvalidDefinition(format!(
                    "{} declares a field named '{ADDITIONAL_PROPERTIES_FIELD}'",
                    def.type_name
                )));
            }
            fields.push(FieldPlan {
                json_key: prop.json_field_name.clone(),
                field_name: prop.target_field_name.clone(),
                required: prop.required,
                type_decl: prop.schema.type_decl().to_string(),
            });
        }

        Ok(Some(Self {
            type_name: def.type_name.clone(),
            value_type: value_type.type_decl().to_string(),
            fields,
        }))
    }
}
