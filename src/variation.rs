use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// Variation returned by the Kameleoon client for a visitor and feature flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    /// Variation key, reported as the variant of a resolution.
    pub key: String,
    /// Variation id, when the visitor is part of an experiment.
    #[serde(default)]
    pub id: Option<i64>,
    /// Experiment id, when the visitor is part of an experiment.
    #[serde(default)]
    pub experiment_id: Option<i64>,
    /// Variables attached to the variation, in the order the client returned them.
    #[serde(default)]
    pub variables: IndexMap<String, Variable>,
}

impl Variation {
    /// Create a variation outside of any experiment.
    pub fn new(key: impl Into<String>, variables: impl IntoIterator<Item = Variable>) -> Self {
        Variation {
            key: key.into(),
            id: None,
            experiment_id: None,
            variables: variables
                .into_iter()
                .map(|variable| (variable.key.clone(), variable))
                .collect(),
        }
    }

    /// Key of the first variable, if the variation has any.
    pub fn first_variable_key(&self) -> Option<&str> {
        self.variables.keys().next().map(String::as_str)
    }
}

/// Named, typed payload attached to a [`Variation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    #[allow(missing_docs)]
    pub key: String,
    /// Type declared for the variable in the Kameleoon app.
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    /// Decoded payload. `None` when the variable holds no value.
    #[serde(default)]
    pub value: Option<Value>,
}

impl Variable {
    /// Create a variable holding `value`.
    pub fn new(key: impl Into<String>, variable_type: VariableType, value: impl Into<Value>) -> Self {
        Variable {
            key: key.into(),
            variable_type,
            value: Some(value.into()),
        }
    }

    /// Decode a variable whose payload arrives as raw JSON.
    ///
    /// `JSON` variables transported as a string are parsed into structured values; a string
    /// that is not valid JSON is kept as a string.
    pub fn from_json(
        key: impl Into<String>,
        variable_type: VariableType,
        value: serde_json::Value,
    ) -> Self {
        let value = match (variable_type, value) {
            (VariableType::Json, serde_json::Value::String(raw)) => {
                match serde_json::from_str::<serde_json::Value>(&raw) {
                    Ok(parsed) => Value::from_json(parsed),
                    Err(_) => Some(Value::String(raw)),
                }
            }
            (_, value) => Value::from_json(value),
        };
        Variable {
            key: key.into(),
            variable_type,
            value,
        }
    }
}

/// Variable types supported by Kameleoon.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum VariableType {
    Boolean,
    Number,
    String,
    Json,
    Js,
    Css,
}
