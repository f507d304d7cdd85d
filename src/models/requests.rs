//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP requests.

use serde_json::{Map, Value};

use crate::error::{CacheError, Result};

/// Query string of the GET operation (GET /get?key=...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetQuery {
    /// The cache key, absent when the parameter is missing
    pub key: Option<String>,
}

impl GetQuery {
    /// Builds the query from decoded `name=value` pairs.
    ///
    /// A repeated `key` parameter resolves to its first occurrence.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let key = pairs
            .into_iter()
            .find_map(|(name, value)| (name == "key").then_some(value));
        Self { key }
    }

    /// Returns the requested key or a validation error when it is missing.
    pub fn key(&self) -> Result<&str> {
        self.key
            .as_deref()
            .ok_or_else(|| CacheError::validation("Missing 'key' parameter"))
    }
}

/// Request body for the PUT operation (POST /put)
///
/// A field set to JSON `null` is kept as `None` so it can be reported as a
/// null key or value rather than a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutRequest {
    /// The cache key
    pub key: Option<String>,
    /// The value to store
    pub value: Option<String>,
}

impl PutRequest {
    /// Decodes a JSON object body.
    ///
    /// Errors on an empty body, undecodable JSON, non-string fields, and on
    /// a body lacking either `key` or `value`.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.is_empty() {
            return Err(CacheError::BadRequest("Empty request body".to_string()));
        }

        let fields: Map<String, Value> = serde_json::from_slice(body)
            .map_err(|err| CacheError::BadRequest(format!("Invalid request format: {}", err)))?;

        if !fields.contains_key("key") || !fields.contains_key("value") {
            return Err(CacheError::validation(
                "Missing 'key' or 'value' in request",
            ));
        }

        Ok(Self {
            key: string_field(&fields, "key")?,
            value: string_field(&fields, "value")?,
        })
    }

    /// Returns key and value, or a validation error if either is null.
    pub fn validate(&self) -> Result<(&str, &str)> {
        match (self.key.as_deref(), self.value.as_deref()) {
            (Some(key), Some(value)) => Ok((key, value)),
            _ => Err(CacheError::validation("Key and value must not be null.")),
        }
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(CacheError::BadRequest(format!(
            "Invalid request format: '{}' must be a string",
            name
        ))),
    }
}
