//! Dynamically typed flag values and the type sets used to check them.
use derive_more::From;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value carried by a variation variable (and by defaults passed into the resolver).
///
/// Every value is tagged with its [`ValueType`] when it is decoded, so type checks are a plain
/// tag comparison.
///
/// # Examples
/// ```
/// # use kameleoon_openfeature::{Value, ValueType};
/// let value: Value = 42i64.into();
/// assert_eq!(value.value_type(), ValueType::Integer);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Boolean(bool),
    /// An integral number.
    Integer(i64),
    /// A floating-point number.
    Float(f64),
    /// A string value.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A string-keyed mapping, in insertion order.
    Map(IndexMap<String, Value>),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl Value {
    /// Decode a JSON payload into a tagged `Value`.
    ///
    /// Integral JSON numbers become [`Value::Integer`], all other numbers [`Value::Float`].
    /// Returns `None` for JSON `null`.
    ///
    /// The decode is lossy: `Value` has no null, so nulls nested inside arrays and objects are
    /// dropped. Array elements after a null shift down by one, and object keys holding null
    /// disappear.
    ///
    /// ```
    /// # use kameleoon_openfeature::Value;
    /// assert_eq!(Value::from_json(serde_json::json!(10)), Some(Value::Integer(10)));
    /// assert_eq!(Value::from_json(serde_json::json!(10.0)), Some(Value::Float(10.0)));
    /// assert_eq!(Value::from_json(serde_json::Value::Null), None);
    /// assert_eq!(
    ///     Value::from_json(serde_json::json!([1, null, 2])),
    ///     Some(Value::Array(vec![Value::Integer(1), Value::Integer(2)]))
    /// );
    /// ```
    pub fn from_json(value: serde_json::Value) -> Option<Value> {
        Some(match value {
            serde_json::Value::Null => return None,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64()?),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().filter_map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .filter_map(|(key, value)| Some((key, Value::from_json(value)?)))
                    .collect(),
            ),
        })
    }

    /// Return the type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Boolean(_) => ValueType::Boolean,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Map(_) => ValueType::Map,
        }
    }

    /// Returns the value as a boolean if it is of type Boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is of type String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is of type Integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64` if it is of type Float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as `f64` if it is any number. Integers are widened.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_boolean().ok_or(value)
    }
}

impl TryFrom<Value> for String {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_integer().ok_or(value)
    }
}

impl TryFrom<Value> for f64 {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_number().ok_or(value)
    }
}

/// Type tag of a [`Value`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ValueType {
    Boolean,
    String,
    Integer,
    Float,
    Array,
    Map,
}

/// Set of value types a caller accepts for a resolved flag value.
///
/// ```
/// # use kameleoon_openfeature::{AllowedTypes, Value};
/// assert!(AllowedTypes::NUMBER.allows(&Value::Integer(1)));
/// assert!(!AllowedTypes::FLOAT.allows(&Value::Integer(1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedTypes(&'static [ValueType]);

impl AllowedTypes {
    /// Booleans only.
    pub const BOOLEAN: AllowedTypes = AllowedTypes(&[ValueType::Boolean]);
    /// Strings only.
    pub const STRING: AllowedTypes = AllowedTypes(&[ValueType::String]);
    /// Any number, integral or floating-point.
    pub const NUMBER: AllowedTypes = AllowedTypes(&[ValueType::Integer, ValueType::Float]);
    /// Integers only.
    pub const INTEGER: AllowedTypes = AllowedTypes(&[ValueType::Integer]);
    /// Floating-point numbers only.
    pub const FLOAT: AllowedTypes = AllowedTypes(&[ValueType::Float]);
    /// Structured values: arrays and maps.
    pub const OBJECT: AllowedTypes = AllowedTypes(&[ValueType::Array, ValueType::Map]);

    /// Build a custom set.
    pub const fn new(types: &'static [ValueType]) -> AllowedTypes {
        AllowedTypes(types)
    }

    /// Tags in this set.
    pub fn types(&self) -> &'static [ValueType] {
        self.0
    }

    /// Return `true` if `ty` is a member of this set.
    pub fn contains(&self, ty: ValueType) -> bool {
        self.0.contains(&ty)
    }

    /// Return `true` if the tag of `value` is a member of this set.
    pub fn allows(&self, value: &Value) -> bool {
        self.contains(value.value_type())
    }
}
