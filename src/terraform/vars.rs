use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use super::ToolError;

/// Input variables for one lifecycle run, written to a `-var-file`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TfVars(Map<String, Value>);

impl TfVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a variable set from any value serializing to a JSON object.
    pub fn from_serializable<T: Serialize>(inputs: &T) -> Result<Self, ToolError> {
        match serde_json::to_value(inputs) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(ToolError::InvalidVariables(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ToolError::InvalidVariables(e.to_string())),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Writes the set as pretty-printed JSON to a temp file that is removed on drop.
    pub(crate) fn write_temp(&self) -> Result<NamedTempFile, ToolError> {
        let mut file = tempfile::Builder::new()
            .prefix("tfvars")
            .suffix(".json")
            .tempfile()
            .map_err(ToolError::VarFile)?;

        serde_json::to_writer_pretty(file.as_file_mut(), &self.0)
            .map_err(|e| ToolError::VarFile(e.into()))?;
        file.as_file_mut().flush().map_err(ToolError::VarFile)?;

        tracing::debug!(path = %file.path().display(), count = self.0.len(), "variable file written");
        Ok(file)
    }
}

impl From<Map<String, Value>> for TfVars {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
