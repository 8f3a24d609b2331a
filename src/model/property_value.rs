use super::PropertyKind;
use crate::error::{AppError, Result};
use crate::types::RichTextItem;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed page property value.
///
/// Serializes to the request shape, which nests the payload under a key equal
/// to the type tag: `{"select": {"name": "Done"}}`. Responses are decoded by
/// [`PropertyValue::from_wire`], which reads the `type` tag first and then the
/// payload under that key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Title {
        title: Vec<RichTextItem>,
    },
    RichText {
        rich_text: Vec<RichTextItem>,
    },
    Number {
        number: Option<NumberValue>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        multi_select: Vec<SelectOption>,
    },
    Status {
        status: Option<SelectOption>,
    },
    Date {
        date: Option<DateRange>,
    },
    Checkbox {
        checkbox: bool,
    },
    Url {
        url: Option<String>,
    },
    Email {
        email: Option<String>,
    },
    PhoneNumber {
        phone_number: Option<String>,
    },
    People {
        people: Vec<UserRef>,
    },
    Relation {
        relation: Vec<RelationRef>,
    },
    Formula {
        formula: Option<FormulaValue>,
    },
    Rollup {
        rollup: Option<RollupValue>,
    },
    CreatedTime {
        created_time: Option<String>,
    },
    LastEditedTime {
        last_edited_time: Option<String>,
    },
    CreatedBy {
        created_by: Option<UserRef>,
    },
    LastEditedBy {
        last_edited_by: Option<UserRef>,
    },
    /// Kinds the client reads past without modelling (files, unique_id, ...).
    #[serde(skip_serializing)]
    Unsupported { kind: String },
}

/// A number payload. Values the user typed that don't parse as a finite
/// float are kept as text and left for the remote to reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberValue {
    Float(f64),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SelectOption {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// A user mention inside a property. Only the id is sent back to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing)]
    pub name: Option<String>,
}

impl UserRef {
    /// The name when the API shared it, otherwise the id.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRef {
    pub id: String,
}

/// Computed value of a formula property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormulaValue {
    String(Option<String>),
    Number(Option<f64>),
    Boolean(Option<bool>),
    Date(Option<DateRange>),
    #[serde(skip_serializing)]
    Unsupported(String),
}

/// Aggregated value of a rollup property. Array items are property values
/// of the related pages' rolled-up property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RollupValue {
    Number(Option<f64>),
    Date(Option<DateRange>),
    Array(Vec<PropertyValue>),
    #[serde(skip_serializing)]
    Unsupported(String),
}

impl PropertyValue {
    /// The declared kind this value belongs to.
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Title { .. } => PropertyKind::Title,
            PropertyValue::RichText { .. } => PropertyKind::RichText,
            PropertyValue::Number { .. } => PropertyKind::Number,
            PropertyValue::Select { .. } => PropertyKind::Select,
            PropertyValue::MultiSelect { .. } => PropertyKind::MultiSelect,
            PropertyValue::Status { .. } => PropertyKind::Status,
            PropertyValue::Date { .. } => PropertyKind::Date,
            PropertyValue::Checkbox { .. } => PropertyKind::Checkbox,
            PropertyValue::Url { .. } => PropertyKind::Url,
            PropertyValue::Email { .. } => PropertyKind::Email,
            PropertyValue::PhoneNumber { .. } => PropertyKind::PhoneNumber,
            PropertyValue::People { .. } => PropertyKind::People,
            PropertyValue::Relation { .. } => PropertyKind::Relation,
            PropertyValue::Formula { .. } => PropertyKind::Formula,
            PropertyValue::Rollup { .. } => PropertyKind::Rollup,
            PropertyValue::CreatedTime { .. } => PropertyKind::CreatedTime,
            PropertyValue::LastEditedTime { .. } => PropertyKind::LastEditedTime,
            PropertyValue::CreatedBy { .. } => PropertyKind::CreatedBy,
            PropertyValue::LastEditedBy { .. } => PropertyKind::LastEditedBy,
            PropertyValue::Unsupported { kind } => PropertyKind::Other(kind.clone()),
        }
    }

    /// Decodes a property value object from an API response.
    ///
    /// An absent or `null` payload is a legal empty value. A payload of the
    /// wrong JSON shape is a [`AppError::MalformedResponse`].
    pub fn from_wire(value: &Value) -> Result<Self> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::MalformedResponse("property value has no type".into()))?;

        let decoded = match PropertyKind::from_tag(tag) {
            PropertyKind::Title => PropertyValue::Title {
                title: payload(value, tag)?.unwrap_or_default(),
            },
            PropertyKind::RichText => PropertyValue::RichText {
                rich_text: payload(value, tag)?.unwrap_or_default(),
            },
            PropertyKind::Number => PropertyValue::Number {
                number: payload::<f64>(value, tag)?.map(NumberValue::Float),
            },
            PropertyKind::Select => PropertyValue::Select {
                select: payload(value, tag)?,
            },
            PropertyKind::MultiSelect => PropertyValue::MultiSelect {
                multi_select: payload(value, tag)?.unwrap_or_default(),
            },
            PropertyKind::Status => PropertyValue::Status {
                status: payload(value, tag)?,
            },
            PropertyKind::Date => PropertyValue::Date {
                date: payload(value, tag)?,
            },
            PropertyKind::Checkbox => PropertyValue::Checkbox {
                checkbox: payload(value, tag)?.unwrap_or(false),
            },
            PropertyKind::Url => PropertyValue::Url {
                url: payload(value, tag)?,
            },
            PropertyKind::Email => PropertyValue::Email {
                email: payload(value, tag)?,
            },
            PropertyKind::PhoneNumber => PropertyValue::PhoneNumber {
                phone_number: payload(value, tag)?,
            },
            PropertyKind::People => PropertyValue::People {
                people: payload(value, tag)?.unwrap_or_default(),
            },
            PropertyKind::Relation => PropertyValue::Relation {
                relation: payload(value, tag)?.unwrap_or_default(),
            },
            PropertyKind::Formula => PropertyValue::Formula {
                formula: match value.get(tag) {
                    Some(inner) if !inner.is_null() => Some(FormulaValue::from_wire(inner)?),
                    _ => None,
                },
            },
            PropertyKind::Rollup => PropertyValue::Rollup {
                rollup: match value.get(tag) {
                    Some(inner) if !inner.is_null() => Some(RollupValue::from_wire(inner)?),
                    _ => None,
                },
            },
            PropertyKind::CreatedTime => PropertyValue::CreatedTime {
                created_time: payload(value, tag)?,
            },
            PropertyKind::LastEditedTime => PropertyValue::LastEditedTime {
                last_edited_time: payload(value, tag)?,
            },
            PropertyKind::CreatedBy => PropertyValue::CreatedBy {
                created_by: payload(value, tag)?,
            },
            PropertyKind::LastEditedBy => PropertyValue::LastEditedBy {
                last_edited_by: payload(value, tag)?,
            },
            PropertyKind::Other(kind) => PropertyValue::Unsupported { kind },
        };
        Ok(decoded)
    }
}

impl FormulaValue {
    fn from_wire(value: &Value) -> Result<Self> {
        let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
        Ok(match tag {
            "string" => FormulaValue::String(payload(value, tag)?),
            "number" => FormulaValue::Number(payload(value, tag)?),
            "boolean" => FormulaValue::Boolean(payload(value, tag)?),
            "date" => FormulaValue::Date(payload(value, tag)?),
            other => FormulaValue::Unsupported(other.to_string()),
        })
    }
}

impl RollupValue {
    fn from_wire(value: &Value) -> Result<Self> {
        let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
        Ok(match tag {
            "number" => RollupValue::Number(payload(value, tag)?),
            "date" => RollupValue::Date(payload(value, tag)?),
            "array" => {
                let items = match value.get(tag) {
                    Some(Value::Array(items)) => items
                        .iter()
                        .map(PropertyValue::from_wire)
                        .collect::<Result<Vec<_>>>()?,
                    None | Some(Value::Null) => Vec::new(),
                    Some(_) => {
                        return Err(AppError::MalformedResponse(
                            "rollup array payload is not a list".into(),
                        ))
                    }
                };
                RollupValue::Array(items)
            }
            other => RollupValue::Unsupported(other.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        PropertyValue::from_wire(&value).map_err(serde::de::Error::custom)
    }
}

/// Reads the payload stored under `tag`, treating absent and `null` as `None`.
fn payload<T: DeserializeOwned>(value: &Value, tag: &str) -> Result<Option<T>> {
    match value.get(tag) {
        None | Some(Value::Null) => Ok(None),
        Some(inner) => T::deserialize(inner).map(Some).map_err(|e| {
            AppError::MalformedResponse(format!("{} payload: {}", tag, e))
        }),
    }
}
