use derive_more::From;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Evaluation context passed along with every flag lookup.
///
/// It carries the targeting key (the Kameleoon visitor code) and an ordered bag of attributes.
/// Attribute order is preserved, so data records derived from the context are produced in the
/// order the attributes were set.
///
/// # Examples
/// ```
/// # use kameleoon_openfeature::{ContextValue, EvaluationContext};
/// let context = EvaluationContext::with_targeting_key("visitor-code")
///     .with_field("variableKey", "title")
///     .with_field(
///         "conversion",
///         ContextValue::structure([("goalId", ContextValue::from(42i64))]),
///     );
/// assert_eq!(context.targeting_key(), Some("visitor-code"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    targeting_key: Option<String>,
    #[serde(default)]
    fields: IndexMap<String, ContextValue>,
}

impl EvaluationContext {
    /// Create an empty context without a targeting key.
    pub fn new() -> Self {
        EvaluationContext::default()
    }

    /// Create an empty context for the given targeting key.
    pub fn with_targeting_key(targeting_key: impl Into<String>) -> Self {
        EvaluationContext {
            targeting_key: Some(targeting_key.into()),
            fields: IndexMap::new(),
        }
    }

    /// Set an attribute. Setting an existing key replaces its value in place.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Targeting key of the subject, if any.
    pub fn targeting_key(&self) -> Option<&str> {
        self.targeting_key.as_deref()
    }

    /// Attribute stored under `key`.
    pub fn field(&self, key: &str) -> Option<&ContextValue> {
        self.fields.get(key)
    }

    /// All attributes in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Value of an evaluation context attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum ContextValue {
    /// Explicitly empty attribute.
    Null,
    /// A boolean value.
    Boolean(bool),
    /// An integral number.
    Integer(i64),
    /// A floating-point number.
    Float(f64),
    /// A string value.
    String(String),
    /// A list of values.
    List(Vec<ContextValue>),
    /// A nested, ordered set of attributes.
    Structure(IndexMap<String, ContextValue>),
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl ContextValue {
    /// Build a [`ContextValue::Structure`] from key-value pairs.
    pub fn structure<K, I>(fields: I) -> ContextValue
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ContextValue)>,
    {
        ContextValue::Structure(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Return `true` for [`ContextValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ContextValue::Null)
    }

    /// Returns the value as a string slice if it is of type String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is of type Integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ContextValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns nested attributes if the value is a structure.
    pub fn as_structure(&self) -> Option<&IndexMap<String, ContextValue>> {
        match self {
            ContextValue::Structure(fields) => Some(fields),
            _ => None,
        }
    }
}
