//! Normalized definitions consumed by the generator.
//!
//! These records are produced upstream (OpenAPI resolution is not part of this
//! crate) and are read-only for the whole generation run. Every type derives
//! `Deserialize` so a definitions document can be loaded from YAML or JSON.

use serde::{Deserialize, Serialize};

/// A named, fully resolved type to emit (schema, parameter, response or body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Rust type name, unique within one compilation unit (e.g. `Pet`)
    pub type_name: String,
    /// Name of the schema in the source document
    pub json_name: String,
    /// Resolved schema for the type
    pub schema: Schema,
}

/// Resolved schema node.
///
/// `type_decl` is the rendered declaration: either a struct body (`{ ... }`) or
/// a plain type expression such as `Vec<Pet>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Empty in a definitions document means "render from `properties`"
    #[serde(default)]
    pub type_decl: String,
    #[serde(default)]
    pub has_additional_properties: bool,
    /// Value type of the open-fields map; present iff `has_additional_properties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties_type: Option<Box<Schema>>,
    /// Declared properties in declaration (and serialization) order
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

/// One declared property of an object schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Key used on the wire
    pub json_field_name: String,
    /// Rust field identifier
    pub target_field_name: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Schema,
}

/// One API operation and the types it requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDefinition {
    pub operation_id: String,
    #[serde(default)]
    pub type_definitions: Vec<TypeDefinition>,
    #[serde(default)]
    pub bodies: Vec<RequestBodyDefinition>,
}

/// A request body accepted by an operation, one per content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBodyDefinition {
    /// Suffix distinguishing the content type (e.g. `Json`)
    pub name_tag: String,
    /// Type expression of the body
    pub type_def: String,
}

/// Everything a generation run consumes, as loaded from a definitions document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationInput {
    #[serde(default)]
    pub schemas: Vec<TypeDefinition>,
    #[serde(default)]
    pub parameters: Vec<TypeDefinition>,
    #[serde(default)]
    pub responses: Vec<TypeDefinition>,
    #[serde(default)]
    pub request_bodies: Vec<TypeDefinition>,
    #[serde(default)]
    pub operations: Vec<OperationDefinition>,
}

impl GenerationInput {
    /// All type definitions in emission order: schemas, parameters, responses, bodies.
    pub fn all_types(&self) -> Vec<TypeDefinition> {
        self.schemas
            .iter()
            .chain(&self.parameters)
            .chain(&self.responses)
            .chain(&self.request_bodies)
            .cloned()
            .collect()
    }

    /// Render a struct body for every type definition that was loaded without
    /// a `type_decl`: schemas, parameters, responses, request bodies and each
    /// operation's `type_definitions`.
    pub fn fill_declarations(&mut self) {
        let operation_types = self
            .operations
            .iter_mut()
            .flat_map(|op| op.type_definitions.iter_mut());
        self.schemas
            .iter_mut()
            .chain(self.parameters.iter_mut())
            .chain(self.responses.iter_mut())
            .chain(self.request_bodies.iter_mut())
            .chain(operation_types)
            .for_each(|def| def.schema.fill_declaration());
    }
}

impl Schema {
    /// Schema for a plain type expression (`i64`, `Vec<Pet>`, ...).
    pub fn primitive(type_decl: impl Into<String>) -> Self {
        Self {
            type_decl: type_decl.into(),
            ..Self::default()
        }
    }

    /// Object schema whose struct body is rendered from `properties`.
    ///
    /// Convenience for fixtures and hand-built definitions. Optional properties
    /// become `Option<T>`; an open schema gains an `additional_properties` map.
    /// Closed structs carry serde attributes because the type template derives
    /// `Serialize`/`Deserialize` for them.
    pub fn object(properties: Vec<PropertyDefinition>, additional: Option<Schema>) -> Self {
        let open = additional.is_some();
        let mut body = String::from("{\n");
        for prop in &properties {
            if !open {
                body.push_str(&format!(
                    "    #[serde(rename = {:?}",
                    prop.json_field_name
                ));
                if !prop.required {
                    body.push_str(", default, skip_serializing_if = \"Option::is_none\"");
                }
                body.push_str(")]\n");
            }
            let ty = if prop.required {
                prop.schema.type_decl.clone()
            } else {
                format!("Option<{}>", prop.schema.type_decl)
            };
            body.push_str(&format!("    pub {}: {},\n", prop.target_field_name, ty));
        }
        if let Some(value) = &additional {
            body.push_str(&format!(
                "    pub additional_properties: Option<HashMap<String, {}>>,\n",
                value.type_decl
            ));
        }
        body.push('}');
        Self {
            type_decl: body,
            has_additional_properties: open,
            additional_properties_type: additional.map(Box::new),
            properties,
        }
    }

    fn fill_declaration(&mut self) {
        if !self.type_decl.trim().is_empty() {
            return;
        }
        let open = self.has_additional_properties;
        let additional = self.additional_properties_type.take().map(|boxed| *boxed);
        *self = Schema::object(std::mem::take(&mut self.properties), additional);
        // An open schema without a value type stays open so planning rejects it
        self.has_additional_properties |= open;
    }

    /// Rendered declaration text.
    pub fn type_decl(&self) -> &str {
        &self.type_decl
    }

    /// Whether the declaration is a struct body rather than a type expression.
    pub fn is_struct(&self) -> bool {
        self.type_decl.trim_start().starts_with('{')
    }
}

impl PropertyDefinition {
    pub fn new(
        json_field_name: impl Into<String>,
        target_field_name: impl Into<String>,
        required: bool,
        schema: Schema,
    ) -> Self {
        Self {
            json_field_name: json_field_name.into(),
            target_field_name: target_field_name.into(),
            required,
            schema,
        }
    }
}

impl TypeDefinition {
    pub fn new(type_name: impl Into<String>, json_name: impl Into<String>, schema: Schema) -> Self {
        Self {
            type_name: type_name.into(),
            json_name: json_name.into(),
            schema,
        }
    }
}

impl OperationDefinition {
    pub fn new(
        operation_id: impl Into<String>,
        type_definitions: Vec<TypeDefinition>,
        bodies: Vec<RequestBodyDefinition>,
    ) -> Self {
        Self {
            operation_id: operation_id.into(),
            type_definitions,
            bodies,
        }
    }
}

impl RequestBodyDefinition {
    pub fn new(name_tag: impl Into<String>, type_def: impl Into<String>) -> Self {
        Self {
            name_tag: name_tag.into(),
            type_def: type_def.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_decl_open_schema_has_map_and_no_serde_attrs() {
        let schema = Schema::object(
            vec![
                PropertyDefinition::new("id", "id", true, Schema::primitive("i64")),
                PropertyDefinition::new("name", "name", false, Schema::primitive("String")),
            ],
            Some(Schema::primitive("String")),
        );
        assert!(schema.is_struct());
        assert!(schema.has_additional_properties);
        assert!(schema.type_decl().contains("pub id: i64,"));
        assert!(schema.type_decl().contains("pub name: Option<String>,"));
        assert!(schema
            .type_decl()
            .contains("pub additional_properties: Option<HashMap<String, String>>,"));
        assert!(!schema.type_decl().contains("#[serde"));
    }

    #[test]
    fn test_object_decl_closed_schema_renames_fields() {
        let schema = Schema::object(
            vec![PropertyDefinition::new(
                "petType",
                "pet_type",
                false,
                Schema::primitive("String"),
            )],
            None,
        );
        assert!(!schema.has_additional_properties);
        assert!(schema
            .type_decl()
            .contains("#[serde(rename = \"petType\", default, skip_serializing_if = \"Option::is_none\")]"));
    }

    #[test]
    fn test_all_types_order() {
        let input = GenerationInput {
            schemas: vec![TypeDefinition::new("A", "a", Schema::primitive("i64"))],
            parameters: vec![TypeDefinition::new("B", "b", Schema::primitive("i64"))],
            responses: vec![TypeDefinition::new("C", "c", Schema::primitive("i64"))],
            request_bodies: vec![TypeDefinition::new("D", "d", Schema::primitive("i64"))],
            operations: vec![],
        };
        let names: Vec<_> = input.all_types().into_iter().map(|t| t.type_name).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_fill_declarations_from_properties() {
        let mut input: GenerationInput = serde_json::from_value(serde_json::json!({
            "schemas": [{
                "type_name": "Tag",
                "json_name": "Tag",
                "schema": {
                    "has_additional_properties": true,
                    "additional_properties_type": {"type_decl": "String"},
                    "properties": [
                        {"json_field_name": "id", "target_field_name": "id", "required": true,
                         "schema": {"type_decl": "i64"}}
                    ]
                }
            }, {
                "type_name": "Ids",
                "json_name": "Ids",
                "schema": {"type_decl": "Vec<i64>"}
            }],
            "operations": [{
                "operation_id": "findPets",
                "type_definitions": [{
                    "type_name": "FindPetsParams",
                    "json_name": "findPets",
                    "schema": {
                        "properties": [
                            {"json_field_name": "limit", "target_field_name": "limit", "required": false,
                             "schema": {"type_decl": "i32"}}
                        ]
                    }
                }]
            }]
        }))
        .unwrap();
        input.fill_declarations();
        let tag = &input.schemas[0].schema;
        assert!(tag.is_struct());
        assert!(tag.has_additional_properties);
        assert!(tag.type_decl().contains("pub id: i64,"));
        assert_eq!(tag.properties.len(), 1);
        assert_eq!(input.schemas[1].schema.type_decl(), "Vec<i64>");

        let params = &input.operations[0].type_definitions[0].schema;
        assert!(params.is_struct());
        assert!(params.type_decl().contains("pub limit: Option<i32>,"));
    }

    #[test]
    fn test_primitive_is_not_struct() {
        assert!(!Schema::primitive("Vec<Pet>").is_struct());
    }
}
