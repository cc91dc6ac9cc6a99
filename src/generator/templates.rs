use askama::Template;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::naming::{rust_string_literal, to_camel_case, to_snake_case};
use crate::error::TemplateError;

/// Base declaration of a single type
pub const TYPE_TEMPLATE: &str = "type";
/// Open-field accessors and encode/decode for an open type
pub const TYPE_PROPERTIES_TEMPLATE: &str = "type-properties";
/// Parameter types of one operation
pub const PARAM_TYPE_TEMPLATE: &str = "param-type";
/// Request body aliases, bound to the whole operation list
pub const REQUEST_BODIES_TEMPLATE: &str = "request-bodies";

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (TYPE_TEMPLATE, include_str!("../../templates/type.rs.j2")),
    (
        TYPE_PROPERTIES_TEMPLATE,
        include_str!("../../templates/type-properties.rs.j2"),
    ),
    (PARAM_TYPE_TEMPLATE, include_str!("../../templates/param-type.rs.j2")),
    (
        REQUEST_BODIES_TEMPLATE,
        include_str!("../../templates/request-bodies.rs.j2"),
    ),
];

/// Built-in source of template `name`, if it is one of the defaults.
pub fn default_template_source(name: &str) -> Option<&'static str> {
    DEFAULT_TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, source)| *source)
}

/// Names of all built-in templates.
pub fn default_template_names() -> impl Iterator<Item = &'static str> {
    DEFAULT_TEMPLATES.iter().map(|(name, _)| *name)
}

fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    // Missing fields are contract violations between pipeline and template
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("camel_case", |value: String| to_camel_case(&value));
    env.add_filter("snake_case", |value: String| to_snake_case(&value));
    env.add_filter("rust_string", |value: String| rust_string_literal(&value));
    env
}

/// Mutable registry used while defaults and overrides are applied.
///
/// Call [`build`](Self::build) to freeze it into a [`TemplateRegistry`].
pub struct TemplateRegistryBuilder {
    env: Environment<'static>,
    names: BTreeSet<String>,
}

impl Default for TemplateRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistryBuilder {
    /// Empty registry with the shared filters installed.
    pub fn new() -> Self {
        Self {
            env: new_environment(),
            names: BTreeSet::new(),
        }
    }

    /// Registry holding every built-in template.
    pub fn with_defaults() -> Result<Self, TemplateError> {
        let mut builder = Self::new();
        for (name, source) in DEFAULT_TEMPLATES {
            builder.register(name, source)?;
        }
        Ok(builder)
    }

    /// Add (or replace) template `name`.
    ///
    /// # Errors
    ///
    /// `TemplateSyntax` if `source` does not parse.
    pub fn register(&mut self, name: &str, source: &str) -> Result<&mut Self, TemplateError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
            .map_err(|source| TemplateError::TemplateSyntax {
                name: name.to_string(),
                source,
            })?;
        self.names.insert(name.to_string());
        Ok(self)
    }

    /// Replace a registered template with caller-supplied source.
    ///
    /// # Errors
    ///
    /// `UnknownTemplate` if `name` was never registered, `TemplateSyntax` if the
    /// source does not parse. On error the previous template stays in place.
    pub fn override_template(&mut self, name: &str, source: &str) -> Result<&mut Self, TemplateError> {
        if !self.names.contains(name) {
            return Err(TemplateError::UnknownTemplate(name.to_string()));
        }
        debug!(template = name, "overriding template");
        self.register(name, source)
    }

    /// Apply every `name → source` override; names not listed keep their defaults.
    pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> Result<&mut Self, TemplateError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (name, source) in overrides {
            self.override_template(name, source)?;
        }
        Ok(self)
    }

    /// Freeze the registry for the rest of the run.
    pub fn build(self) -> TemplateRegistry {
        TemplateRegistry {
            env: self.env,
            names: self.names,
        }
    }
}

/// Read-only template registry.
///
/// Rendering takes `&self`, so one registry can be shared across threads.
pub struct TemplateRegistry {
    env: Environment<'static>,
    names: BTreeSet<String>,
}

impl TemplateRegistry {
    /// Registry with the built-in templates and no overrides.
    pub fn with_defaults() -> Result<Self, TemplateError> {
        Ok(TemplateRegistryBuilder::with_defaults()?.build())
    }

    /// Registry with the built-in templates and `overrides` applied.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Result<Self, TemplateError> {
        let mut builder = TemplateRegistryBuilder::with_defaults()?;
        builder.apply_overrides(overrides)?;
        Ok(builder.build())
    }

    /// Render template `name` against `ctx`.
    ///
    /// # Errors
    ///
    /// `UnknownTemplate` if `name` was never registered, `TemplateRender` if
    /// rendering fails (for example a field the context does not have).
    pub fn render<S: Serialize>(&self, name: &str, ctx: &S) -> Result<String, TemplateError> {
        if !self.names.contains(name) {
            return Err(TemplateError::UnknownTemplate(name.to_string()));
        }
        let render_err = |source| TemplateError::TemplateRender {
            name: name.to_string(),
            source,
        };
        let template = self.env.get_template(name).map_err(render_err)?;
        template.render(ctx).map_err(render_err)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Template data for the generated `mod.rs` that ties the units together
#[derive(Template)]
#[template(path = "mod.rs.txt", escape = "none")]
pub struct ModRsTemplateData {
    /// Package (module) name
    pub package_name: String,
    /// Module names to declare and re-export
    pub modules: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_registered() {
        let registry = TemplateRegistry::with_defaults().unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            ["param-type", "request-bodies", "type", "type-properties"]
        );
        for name in default_template_names() {
            assert!(registry.contains(name));
            assert!(default_template_source(name).is_some());
        }
    }

    #[test]
    fn test_override_replaces_default() {
        let mut builder = TemplateRegistryBuilder::with_defaults().unwrap();
        builder
            .override_template(TYPE_TEMPLATE, "custom {{ type.type_name }}")
            .unwrap();
        let registry = builder.build();
        let out = registry
            .render(TYPE_TEMPLATE, &json!({"type": {"type_name": "Pet"}}))
            .unwrap();
        assert_eq!(out, "custom Pet");
    }

    #[test]
    fn test_override_syntax_error_keeps_previous() {
        let mut builder = TemplateRegistryBuilder::new();
        builder.register("greeting", "hello {{ name }}").unwrap();
        let err = builder
            .override_template("greeting", "hello {{ name ")
            .err()
            .unwrap();
        assert!(matches!(err, TemplateError::TemplateSyntax { ref name, .. } if name == "greeting"));
        let registry = builder.build();
        assert_eq!(
            registry.render("greeting", &json!({"name": "x"})).unwrap(),
            "hello x"
        );
    }

    #[test]
    fn test_override_unknown_name() {
        let mut builder = TemplateRegistryBuilder::with_defaults().unwrap();
        let err = builder.override_template("nope", "x").err().unwrap();
        assert!(matches!(err, TemplateError::UnknownTemplate(ref n) if n == "nope"));
    }

    #[test]
    fn test_render_unknown_name() {
        let registry = TemplateRegistry::with_defaults().unwrap();
        let err = registry.render("missing", &json!({})).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownTemplate(_)));
    }

    #[test]
    fn test_render_missing_field_fails() {
        let mut builder = TemplateRegistryBuilder::new();
        builder.register("t", "{{ type.type_name }}").unwrap();
        let registry = builder.build();
        let err = registry.render("t", &json!({"other": 1})).unwrap_err();
        assert!(matches!(err, TemplateError::TemplateRender { .. }));
    }

    #[test]
    fn test_filters() {
        let mut builder = TemplateRegistryBuilder::new();
        builder
            .register(
                "f",
                "{{ id | camel_case }} {{ name | snake_case }} {{ key | rust_string }}",
            )
            .unwrap();
        let registry = builder.build();
        let out = registry
            .render("f", &json!({"id": "addPet", "name": "FindPets", "key": "a\"b"}))
            .unwrap();
        assert_eq!(out, "AddPet find_pets \"a\\\"b\"");
    }

    #[test]
    fn test_default_render_is_stable() {
        let registry = TemplateRegistry::with_defaults().unwrap();
        let ctx = json!({
            "operations": [{"operation_id": "addPet", "type_definitions": [], "bodies": [
                {"name_tag": "Json", "type_def": "Pet"}
            ]}],
            "operation_id": "addPet"
        });
        let first = registry.render(REQUEST_BODIES_TEMPLATE, &ctx).unwrap();
        let second = registry.render(REQUEST_BODIES_TEMPLATE, &ctx).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("pub type AddPetJsonRequestBody = Pet;"));
    }

    #[test]
    fn test_mod_rs_template() {
        let rendered = ModRsTemplateData {
            package_name: "types".to_string(),
            modules: vec!["pet".to_string(), "tag".to_string()],
        }
        .render()
        .unwrap();
        assert!(rendered.contains("pub mod pet;"));
        assert!(rendered.contains("pub mod tag;"));
        assert!(rendered.contains("pub use tag::*;"));
    }
}
