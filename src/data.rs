//! Kameleoon data records and their conversion from an [`EvaluationContext`].
//!
//! Two context attributes are recognized:
//!
//! - `"conversion"`: a structure (or a list of structures) with `"goalId"` and `"revenue"`,
//!   turned into [`Conversion`] records.
//! - `"customData"`: a structure (or a list of structures) with `"index"` and `"values"`,
//!   turned into [`CustomData`] records.
//!
//! Every structure yields a record, even with missing or malformed fields; validating them is
//! left to the Kameleoon client. All other attributes are ignored.
use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::{ContextValue, EvaluationContext};

/// Context attribute keys that carry Kameleoon data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// `"conversion"`
    Conversion,
    /// `"customData"`
    CustomData,
}

impl DataType {
    /// Attribute key for [`Conversion`] records.
    pub const CONVERSION: &'static str = "conversion";
    /// Attribute key for [`CustomData`] records.
    pub const CUSTOM_DATA: &'static str = "customData";

    /// Context attribute key of this data type.
    pub fn key(self) -> &'static str {
        match self {
            DataType::Conversion => DataType::CONVERSION,
            DataType::CustomData => DataType::CUSTOM_DATA,
        }
    }

    /// Data type for a context attribute key, `None` if the key is not recognized.
    pub fn from_key(key: &str) -> Option<DataType> {
        match key {
            DataType::CONVERSION => Some(DataType::Conversion),
            DataType::CUSTOM_DATA => Some(DataType::CustomData),
            _ => None,
        }
    }

    fn make(self, value: &ContextValue) -> Option<Data> {
        match self {
            DataType::Conversion => Conversion::from_context_value(value).map(Data::from),
            DataType::CustomData => CustomData::from_context_value(value).map(Data::from),
        }
    }
}

/// Data record handed to the Kameleoon client before a variation is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Data {
    #[allow(missing_docs)]
    Conversion(Conversion),
    #[allow(missing_docs)]
    CustomData(CustomData),
}

/// Goal conversion tracked for a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// Goal id, `None` if the context did not carry an integral one.
    pub goal_id: Option<i64>,
    #[allow(missing_docs)]
    pub revenue: f64,
    /// Whether the conversion cancels a previous one. Never set from a context.
    pub negative: bool,
}

impl Conversion {
    /// Structure key holding the goal id.
    pub const GOAL_ID: &'static str = "goalId";
    /// Structure key holding the revenue.
    pub const REVENUE: &'static str = "revenue";

    #[allow(missing_docs)]
    pub fn new(goal_id: i64, revenue: f64) -> Self {
        Conversion {
            goal_id: Some(goal_id),
            revenue,
            negative: false,
        }
    }

    /// Build a conversion from a context structure.
    ///
    /// Returns `None` only if `value` is not a structure. A missing or non-integral goal id
    /// becomes `None`. A missing or non-numeric revenue becomes `0.0`; an integral revenue is
    /// converted to `f64`.
    pub fn from_context_value(value: &ContextValue) -> Option<Conversion> {
        let fields = value.as_structure()?;
        let goal_id = fields
            .get(Conversion::GOAL_ID)
            .and_then(ContextValue::as_integer);
        let revenue = match fields.get(Conversion::REVENUE) {
            Some(ContextValue::Float(revenue)) => *revenue,
            Some(ContextValue::Integer(revenue)) => *revenue as f64,
            _ => 0.0,
        };
        Some(Conversion {
            goal_id,
            revenue,
            negative: false,
        })
    }
}

/// Custom data value set for a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomData {
    /// Index of the custom data as configured in the Kameleoon app, `None` if the context did
    /// not carry an integral one.
    pub index: Option<i64>,
    #[allow(missing_docs)]
    pub values: Vec<String>,
}

impl CustomData {
    /// Structure key holding the custom data index.
    pub const INDEX: &'static str = "index";
    /// Structure key holding the custom data values.
    pub const VALUES: &'static str = "values";

    #[allow(missing_docs)]
    pub fn new<S: Into<String>>(index: i64, values: impl IntoIterator<Item = S>) -> Self {
        CustomData {
            index: Some(index),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Build custom data from a context structure.
    ///
    /// Returns `None` only if `value` is not a structure. A missing or non-integral index
    /// becomes `None`. A single string in `"values"` becomes a one-element list, missing values
    /// become an empty list, and non-string list elements are dropped.
    pub fn from_context_value(value: &ContextValue) -> Option<CustomData> {
        let fields = value.as_structure()?;
        let index = fields
            .get(CustomData::INDEX)
            .and_then(ContextValue::as_integer);
        let values = match fields.get(CustomData::VALUES) {
            Some(ContextValue::String(value)) => vec![value.clone()],
            Some(ContextValue::List(values)) => values
                .iter()
                .filter_map(|value| value.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        };
        Some(CustomData { index, values })
    }
}

/// Convert evaluation context attributes into Kameleoon data records.
///
/// Records follow attribute order, then element order within a list attribute. Elements that
/// are not structures are skipped.
///
/// ```
/// # use kameleoon_openfeature::{data::{to_kameleoon, Conversion, Data}, ContextValue, EvaluationContext};
/// let context = EvaluationContext::with_targeting_key("visitor").with_field(
///     "conversion",
///     ContextValue::structure([("goalId", ContextValue::from(7i64))]),
/// );
/// assert_eq!(to_kameleoon(Some(&context)), vec![Data::Conversion(Conversion::new(7, 0.0))]);
/// assert!(to_kameleoon(None).is_empty());
/// ```
pub fn to_kameleoon(context: Option<&EvaluationContext>) -> Vec<Data> {
    let Some(context) = context else {
        return Vec::new();
    };

    let mut data = Vec::new();
    for (key, value) in context.fields() {
        let Some(data_type) = DataType::from_key(key) else {
            continue;
        };
        match value {
            ContextValue::Null => {}
            ContextValue::List(values) => {
                data.extend(values.iter().filter_map(|value| data_type.make(value)))
            }
            value => data.extend(data_type.make(value)),
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::{to_kameleoon, Conversion, CustomData, Data, DataType};
    use crate::{ContextValue, EvaluationContext};

    fn conversion(goal_id: i64) -> ContextValue {
        ContextValue::structure([(Conversion::GOAL_ID, ContextValue::Integer(goal_id))])
    }

    fn custom_data(index: i64) -> ContextValue {
        ContextValue::structure([(CustomData::INDEX, ContextValue::Integer(index))])
    }

    #[test]
    fn recognized_keys() {
        assert_eq!(DataType::CONVERSION, "conversion");
        assert_eq!(DataType::CUSTOM_DATA, "customData");
        assert_eq!(Conversion::GOAL_ID, "goalId");
        assert_eq!(Conversion::REVENUE, "revenue");
        assert_eq!(CustomData::INDEX, "index");
        assert_eq!(CustomData::VALUES, "values");
        assert_eq!(DataType::from_key("customData"), Some(DataType::CustomData));
        assert_eq!(DataType::Conversion.key(), "conversion");
    }

    #[test]
    fn absent_context_returns_empty() {
        assert!(to_kameleoon(None).is_empty());
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let context = EvaluationContext::with_targeting_key("visitor")
            .with_field("age", 42i64)
            .with_field("conversions", conversion(1))
            .with_field("variableKey", "title");
        assert!(to_kameleoon(Some(&context)).is_empty());
    }

    #[test]
    fn conversion_with_and_without_revenue() {
        let with_revenue = ContextValue::structure([
            (Conversion::GOAL_ID, ContextValue::Integer(12)),
            (Conversion::REVENUE, ContextValue::Float(431.25)),
        ]);
        let context = EvaluationContext::with_targeting_key("visitor")
            .with_field(DataType::CONVERSION, with_revenue);
        assert_eq!(
            to_kameleoon(Some(&context)),
            vec![Data::Conversion(Conversion::new(12, 431.25))]
        );

        let context = EvaluationContext::with_targeting_key("visitor")
            .with_field(DataType::CONVERSION, conversion(13));
        assert_eq!(
            to_kameleoon(Some(&context)),
            vec![Data::Conversion(Conversion::new(13, 0.0))]
        );
    }

    #[test]
    fn integral_revenue_is_coerced_to_float() {
        let value = ContextValue::structure([
            (Conversion::GOAL_ID, ContextValue::Integer(1)),
            (Conversion::REVENUE, ContextValue::Integer(25)),
        ]);
        let conversion = Conversion::from_context_value(&value).unwrap();
        assert_eq!(conversion.revenue, 25.0);
        assert!(!conversion.negative);
    }

    #[test]
    fn custom_data_values() {
        let cases: [(&str, ContextValue, Vec<&str>); 4] = [
            ("EmptyValues", ContextValue::List(vec![]), vec![]),
            ("SingleString", "v1".into(), vec!["v1"]),
            (
                "MultipleValues",
                ContextValue::List(vec!["v1".into(), "v2".into(), "v3".into()]),
                vec!["v1", "v2", "v3"],
            ),
            (
                "NonStringElements",
                ContextValue::List(vec!["v1".into(), ContextValue::Integer(2)]),
                vec!["v1"],
            ),
        ];

        for (name, values, expected) in cases {
            let value = ContextValue::structure([
                (CustomData::INDEX, ContextValue::Integer(7)),
                (CustomData::VALUES, values),
            ]);
            let context = EvaluationContext::with_targeting_key("visitor")
                .with_field(DataType::CUSTOM_DATA, value);

            assert_eq!(
                to_kameleoon(Some(&context)),
                vec![Data::CustomData(CustomData::new(7, expected))],
                "case {name}"
            );
        }
    }

    #[test]
    fn custom_data_without_values_is_empty() {
        let custom_data = CustomData::from_context_value(&custom_data(3)).unwrap();
        assert_eq!(custom_data, CustomData::new(3, Vec::<String>::new()));
    }

    #[test]
    fn all_types_follow_attribute_then_element_order() {
        let context = EvaluationContext::with_targeting_key("visitor")
            .with_field(
                DataType::CONVERSION,
                ContextValue::List(vec![conversion(1), conversion(2)]),
            )
            .with_field(
                DataType::CUSTOM_DATA,
                ContextValue::List(vec![custom_data(3), custom_data(4)]),
            );

        assert_eq!(
            to_kameleoon(Some(&context)),
            vec![
                Data::Conversion(Conversion::new(1, 0.0)),
                Data::Conversion(Conversion::new(2, 0.0)),
                Data::CustomData(CustomData::new(3, Vec::<String>::new())),
                Data::CustomData(CustomData::new(4, Vec::<String>::new())),
            ]
        );
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let context = EvaluationContext::with_targeting_key("visitor")
            .with_field(
                DataType::CONVERSION,
                ContextValue::List(vec!["not a structure".into(), conversion(5)]),
            )
            .with_field(DataType::CUSTOM_DATA, ContextValue::Integer(1))
            .with_field("other", ContextValue::Null);

        assert_eq!(
            to_kameleoon(Some(&context)),
            vec![Data::Conversion(Conversion::new(5, 0.0))]
        );
    }

    #[test]
    fn structures_without_ids_are_kept() {
        let context = EvaluationContext::with_targeting_key("visitor")
            .with_field(
                DataType::CONVERSION,
                ContextValue::structure([(Conversion::REVENUE, ContextValue::Float(10.0))]),
            )
            .with_field(
                DataType::CUSTOM_DATA,
                ContextValue::structure([
                    (CustomData::INDEX, ContextValue::from("first")),
                    (CustomData::VALUES, ContextValue::from("x")),
                ]),
            );

        assert_eq!(
            to_kameleoon(Some(&context)),
            vec![
                Data::Conversion(Conversion {
                    goal_id: None,
                    revenue: 10.0,
                    negative: false,
                }),
                Data::CustomData(CustomData {
                    index: None,
                    values: vec!["x".to_owned()],
                }),
            ]
        );
    }

    #[test]
    fn null_attributes_are_ignored() {
        let context = EvaluationContext::with_targeting_key("visitor")
            .with_field(DataType::CONVERSION, ContextValue::Null);
        assert!(to_kameleoon(Some(&context)).is_empty());
    }
}
