//! Documentation summary: a JSON object of named lists of `{ "name": ... }` records.
//!
//! ```json
//! {
//!   "constants": [{ "name": "NICE_CONSTANT" }],
//!   "functions": [{ "name": "NiceFunction" }]
//! }
//! ```
//!
//! Records may carry additional fields; only `name` is read.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ReconError;
use crate::model::Identifier;

#[derive(Debug, Clone, Deserialize)]
pub struct DocEntry {
    pub name: Identifier,
}

#[derive(Debug, Clone)]
pub struct DocSummary {
    origin: String,
    lists: Map<String, Value>,
}

impl DocSummary {
    /// Parse a summary. `origin` names the input in error messages.
    pub fn from_json(input: &str, origin: impl Into<String>) -> Result<Self, ReconError> {
        let origin = origin.into();
        let value: Value = serde_json::from_str(input).map_err(|e| ReconError::DocsParse {
            path: origin.clone(),
            message: e.to_string(),
        })?;
        match value {
            Value::Object(lists) => Ok(Self { origin, lists }),
            other => Err(ReconError::DocsParse {
                path: origin,
                message: format!("expected a JSON object at top level, found {}", kind(&other)),
            }),
        }
    }

    /// Names of list `list`, in document order.
    pub fn names(&self, list: &str) -> Result<Vec<Identifier>, ReconError> {
        let value = self
            .lists
            .get(list)
            .ok_or_else(|| ReconError::MissingDocList(list.to_string()))?;
        let entries: Vec<DocEntry> =
            serde_json::from_value(value.clone()).map_err(|e| ReconError::DocsParse {
                path: self.origin.clone(),
                message: format!("list '{list}': {e}"),
            })?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
