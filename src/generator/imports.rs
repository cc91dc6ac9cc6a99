//! Import sniffing for emitted declarations.
//!
//! A textual heuristic, not dependency analysis: each table entry names a token
//! and the `use` line it needs. An entry fires when its token appears in the
//! declaration as a whole identifier: preceded by a non-identifier character or
//! the start of the text, and followed by a non-identifier character or the end.
//! `DateTime` never triggers an entry for `Time`, and `NaiveDateTime` never
//! triggers `NaiveDate`.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// One entry of an import table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Token pattern (a regex fragment) searched for in the declaration
    pub look_for: String,
    /// Import statement emitted on a match
    pub render: String,
}

impl ImportSpec {
    pub fn new(look_for: impl Into<String>, render: impl Into<String>) -> Self {
        Self {
            look_for: look_for.into(),
            render: render.into(),
        }
    }
}

/// Import table with every pattern compiled once.
#[derive(Debug, Clone)]
pub struct ImportTable {
    entries: Vec<(ImportSpec, Regex)>,
}

impl ImportTable {
    /// Compile `specs`, keeping their order.
    pub fn new(specs: impl IntoIterator<Item = ImportSpec>) -> Result<Self, PatternError> {
        let entries = specs
            .into_iter()
            .map(|spec| {
                let regex = token_regex(&spec.look_for)?;
                Ok((spec, regex))
            })
            .collect::<Result<Vec<_>, PatternError>>()?;
        Ok(Self { entries })
    }

    /// Imports referenced by `decl`, in table order. Duplicates are not removed.
    pub fn resolve(&self, decl: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, regex)| regex.is_match(decl))
            .map(|(spec, _)| spec.render.clone())
            .collect()
    }

    pub fn specs(&self) -> impl Iterator<Item = &ImportSpec> {
        self.entries.iter().map(|(spec, _)| spec)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn token_regex(look_for: &str) -> Result<Regex, PatternError> {
    Regex::new(&format!("(?:^|[^A-Za-z0-9_])(?:{look_for})(?:$|[^A-Za-z0-9_])")).map_err(|source| PatternError {
        look_for: look_for.to_string(),
        source,
    })
}

/// Resolve imports for `decl` against an uncompiled table.
///
/// Fails only when a `look_for` entry is not a valid pattern; no match is not an error.
pub fn resolve_imports(decl: &str, table: &[ImportSpec]) -> Result<Vec<String>, PatternError> {
    Ok(ImportTable::new(table.iter().cloned())?.resolve(decl))
}

/// The shipped import table.
///
/// No two entries match the same token, so a single declaration never yields a
/// duplicate import.
pub fn default_import_specs() -> Vec<ImportSpec> {
    [
        ("HashMap", "use std::collections::HashMap;"),
        ("BTreeMap", "use std::collections::BTreeMap;"),
        ("HashSet", "use std::collections::HashSet;"),
        ("BTreeSet", "use std::collections::BTreeSet;"),
        ("Duration", "use std::time::Duration;"),
        ("DateTime", "use chrono::DateTime;"),
        ("Utc", "use chrono::Utc;"),
        ("NaiveDate", "use chrono::NaiveDate;"),
        ("NaiveDateTime", "use chrono::NaiveDateTime;"),
        ("Uuid", "use uuid::Uuid;"),
        ("Decimal", "use rust_decimal::Decimal;"),
        ("Value", "use serde_json::Value;"),
        ("Url", "use url::Url;"),
    ]
    .into_iter()
    .map(|(look_for, render)| ImportSpec::new(look_for, render))
    .collect()
}

static DEFAULT_IMPORTS: OnceCell<ImportTable> = OnceCell::new();

/// Compiled [`default_import_specs`], built on first use.
pub fn default_imports() -> Result<&'static ImportTable, PatternError> {
    DEFAULT_IMPORTS.get_or_try_init(|| ImportTable::new(default_import_specs()))
}
