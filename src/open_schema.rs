//! # Open Schema Runtime
//!
//! Serialization support for "open" object types: types that declare a fixed set
//! of fields and also accept arbitrary extra keys of one uniform value type.
//!
//! Generated code does not inline the decode/encode logic. It delegates to
//! [`OpenObject`], a generic JSON mapping from field name to not-yet-typed value:
//!
//! ```text
//! decode: bytes → OpenObject → take declared keys in order → remainder → open map
//! encode: declared fields (optional `None` omitted) → open map → OpenObject → bytes
//! ```
//!
//! Declared fields always win: a key matching a declared field is consumed as that
//! field and never shows up in the open map.
//!
//! ## Example
//!
//! ```rust
//! use openapi_typegen::open_schema::OpenObject;
//!
//! let mut object = OpenObject::from_slice(br#"{"id": 7, "extra": "x"}"#).unwrap();
//! let id: i64 = object.take_required("id").unwrap();
//! let name: Option<String> = object.take("name").unwrap();
//! let extra = object.into_additional::<String>().unwrap();
//!
//! assert_eq!(id, 7);
//! assert!(name.is_none());
//! assert_eq!(extra.unwrap()["extra"], "x");
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Failure while decoding an open object.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Input is not a well-formed JSON object
    #[error("error reading object: {0}")]
    Malformed(#[source] serde_json::Error),

    /// A required declared field is absent
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// A present field has the wrong shape for its target type
    #[error("error reading '{field}': {source}")]
    Field {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while encoding an open object.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("error marshaling '{field}': {source}")]
    Field {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("error serializing object: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Generic field-name → raw value mapping used on both sides of the open contract.
///
/// Key order is insertion order, so declared fields written first stay first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenObject {
    fields: Map<String, Value>,
}

impl OpenObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw bytes; anything other than a JSON object is rejected before any
    /// field is looked at.
    pub fn from_slice(raw: &[u8]) -> Result<Self, DecodeError> {
        let fields = serde_json::from_slice::<Map<String, Value>>(raw).map_err(DecodeError::Malformed)?;
        Ok(Self { fields })
    }

    /// Remove `key` and decode it. Absent keys and explicit `null` yield `None`.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, DecodeError> {
        match self.fields.remove(key) {
            Some(raw) => serde_json::from_value::<Option<T>>(raw).map_err(|source| DecodeError::Field {
                field: key.to_string(),
                source,
            }),
            None => Ok(None),
        }
    }

    /// Remove `key` and decode it; absence is a [`DecodeError::MissingField`].
    pub fn take_required<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, DecodeError> {
        let raw = self.fields.remove(key).ok_or_else(|| DecodeError::MissingField {
            field: key.to_string(),
        })?;
        serde_json::from_value(raw).map_err(|source| DecodeError::Field {
            field: key.to_string(),
            source,
        })
    }

    /// Decode every remaining key into the open-fields value type.
    ///
    /// Returns `None` when nothing is left, so the open map is only allocated
    /// when there is something to put in it.
    pub fn into_additional<T: DeserializeOwned>(self) -> Result<Option<HashMap<String, T>>, DecodeError> {
        if self.fields.is_empty() {
            return Ok(None);
        }
        let mut additional = HashMap::with_capacity(self.fields.len());
        for (field, raw) in self.fields {
            match serde_json::from_value(raw) {
                Ok(value) => {
                    additional.insert(field, value);
                }
                Err(source) => return Err(DecodeError::Field { field, source }),
            }
        }
        Ok(Some(additional))
    }

    /// Encode `value` under `key`, replacing any previous value.
    pub fn insert<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), EncodeError> {
        let raw = serde_json::to_value(value).map_err(|source| EncodeError::Field {
            field: key.to_string(),
            source,
        })?;
        self.fields.insert(key.to_string(), raw);
        Ok(())
    }

    /// Encode an optional declared field; `None` omits the key (never `null`).
    pub fn insert_optional<T: Serialize>(&mut self, key: &str, value: &Option<T>) -> Result<(), EncodeError> {
        match value {
            Some(inner) => self.insert(key, inner),
            None => Ok(()),
        }
    }

    /// Append every entry of the open-fields map after the declared fields.
    pub fn extend_additional<T: Serialize>(
        &mut self,
        additional: Option<&HashMap<String, T>>,
    ) -> Result<(), EncodeError> {
        for (field, value) in additional.into_iter().flatten() {
            self.insert(field, value)?;
        }
        Ok(())
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        serde_json::to_vec(&self.fields).map_err(EncodeError::Serialize)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for OpenObject {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Look up an open field; `None` if the map is unset or the key is absent.
pub fn get_additional<'a, V>(additional: &'a Option<HashMap<String, V>>, field_name: &str) -> Option<&'a V> {
    additional.as_ref().and_then(|map| map.get(field_name))
}

/// Insert or overwrite an open field, allocating the map on first use.
pub fn set_additional<V>(additional: &mut Option<HashMap<String, V>>, field_name: impl Into<String>, value: V) {
    additional
        .get_or_insert_with(HashMap::new)
        .insert(field_name.into(), value);
}
