//! Compiles `Field<op>Value` expressions into database query filters.

use crate::error::{AppError, Result};
use crate::formatting::properties::is_true_token;
use crate::model::{PropertyKind, PropertySchema};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A comparison operator as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    GreaterOrEqual,
    LessOrEqual,
    NotEqual,
    NotContains,
    Contains,
    Greater,
    Less,
    Equal,
}

impl Operator {
    /// Scan order. Two-character tokens come before the one-character tokens
    /// they contain, and `!~=` before `~=`.
    pub const PRIORITY: [Operator; 8] = [
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::NotEqual,
        Operator::NotContains,
        Operator::Contains,
        Operator::Greater,
        Operator::Less,
        Operator::Equal,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::NotEqual => "!=",
            Operator::NotContains => "!~=",
            Operator::Contains => "~=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::Equal => "=",
        }
    }

    /// Finds the operator of an expression: the first operator in
    /// [`PRIORITY`](Self::PRIORITY) order that occurs anywhere, together with
    /// the byte offset of its first occurrence.
    pub fn scan(expr: &str) -> Option<(Operator, usize)> {
        Self::PRIORITY
            .iter()
            .find_map(|op| expr.find(op.token()).map(|idx| (*op, idx)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The operand of a condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

/// One property condition:
/// `{"property": name, <field>: {<condition>: value}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFilter {
    pub property: String,
    /// Filter field, the property's type tag (`rich_text` for unknown kinds).
    pub field: String,
    /// API operator name such as `equals` or `on_or_after`.
    pub condition: &'static str,
    pub value: FilterValue,
}

/// A query filter: one condition, or several joined with `and`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Property(PropertyFilter),
    And(Vec<PropertyFilter>),
}

impl Serialize for PropertyFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut condition = serde_json::Map::new();
        condition.insert(
            self.condition.to_string(),
            serde_json::to_value(&self.value).map_err(serde::ser::Error::custom)?,
        );
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("property", &self.property)?;
        map.serialize_entry(&self.field, &condition)?;
        map.end()
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Filter::Property(filter) => filter.serialize(serializer),
            Filter::And(filters) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("and", filters)?;
                map.end()
            }
        }
    }
}

/// Compiles one expression such as `Status=Done` or `Count>=10`.
///
/// The expression is split at the operator found by [`Operator::scan`]; both
/// sides are trimmed. The property's declared kind picks the filter field and
/// the API operator name.
pub fn compile_filter(expr: &str, schema: &PropertySchema) -> Result<PropertyFilter> {
    let (op, idx) =
        Operator::scan(expr).ok_or_else(|| AppError::NoOperatorFound(expr.to_string()))?;
    let property = expr[..idx].trim();
    let raw = expr[idx + op.token().len()..].trim();
    let kind = schema.require(property)?;

    let text = || FilterValue::Text(raw.to_string());
    let (field, condition, value) = match kind {
        PropertyKind::Title
        | PropertyKind::RichText
        | PropertyKind::Url
        | PropertyKind::Email
        | PropertyKind::PhoneNumber => (kind.as_str(), text_condition(op), text()),
        PropertyKind::Number => (kind.as_str(), number_condition(op), number_value(raw)),
        PropertyKind::Date | PropertyKind::CreatedTime | PropertyKind::LastEditedTime => {
            (kind.as_str(), date_condition(op), text())
        }
        PropertyKind::Select | PropertyKind::Status => {
            let condition = match op {
                Operator::NotEqual => "does_not_equal",
                _ => "equals",
            };
            (kind.as_str(), condition, text())
        }
        PropertyKind::MultiSelect => {
            let condition = match op {
                Operator::NotContains | Operator::NotEqual => "does_not_contain",
                _ => "contains",
            };
            (kind.as_str(), condition, text())
        }
        PropertyKind::Checkbox => (
            kind.as_str(),
            "equals",
            FilterValue::Bool(is_true_token(raw)),
        ),
        _ => ("rich_text", text_condition(op), text()),
    };

    log::debug!("filter {:?} -> {} {} on {}", expr, field, condition, property);

    Ok(PropertyFilter {
        property: property.to_string(),
        field: field.to_string(),
        condition,
        value,
    })
}

/// Compiles every expression in order. No expressions means no filter; one
/// expression is returned as is; two or more are wrapped in `and`.
pub fn compile_filters<S: AsRef<str>>(
    exprs: &[S],
    schema: &PropertySchema,
) -> Result<Option<Filter>> {
    let mut filters = exprs
        .iter()
        .map(|expr| compile_filter(expr.as_ref(), schema))
        .collect::<Result<Vec<_>>>()?;

    Ok(match filters.len() {
        0 => None,
        1 => filters.pop().map(Filter::Property),
        _ => Some(Filter::And(filters)),
    })
}

fn text_condition(op: Operator) -> &'static str {
    match op {
        Operator::NotEqual => "does_not_equal",
        Operator::Contains => "contains",
        Operator::NotContains => "does_not_contain",
        _ => "equals",
    }
}

fn number_condition(op: Operator) -> &'static str {
    match op {
        Operator::NotEqual => "does_not_equal",
        Operator::Greater => "greater_than",
        Operator::GreaterOrEqual => "greater_than_or_equal_to",
        Operator::Less => "less_than",
        Operator::LessOrEqual => "less_than_or_equal_to",
        Operator::Equal | Operator::Contains | Operator::NotContains => "equals",
    }
}

fn date_condition(op: Operator) -> &'static str {
    match op {
        Operator::Greater | Operator::GreaterOrEqual => "on_or_after",
        Operator::Less | Operator::LessOrEqual => "on_or_before",
        Operator::NotEqual => "does_not_equal",
        _ => "equals",
    }
}

fn number_value(raw: &str) -> FilterValue {
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => FilterValue::Number(n),
        _ => FilterValue::Text(raw.to_string()),
    }
}
