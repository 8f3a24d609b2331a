// src/formatting/properties/mod.rs
//! Property codec: plain strings to typed property values and back.
//!
//! `encode` builds the request payload for a `key=value` argument using the
//! declared kind of the property. `decode` turns a response value into the
//! text shown in tables and field listings. Neither direction fails.

use crate::model::{
    DateRange, FormulaValue, NumberValue, PropertyKind, PropertyValue, RelationRef, RollupValue,
    SelectOption, UserRef,
};
use crate::types::{concat_plain_text, single_run};

/// Arrow placed between the start and end of a date range.
const DATE_RANGE_SEPARATOR: &str = " → ";

/// Separator for list-valued properties.
const LIST_SEPARATOR: &str = ", ";

/// Tokens that mean "checked". Matching is exact and case-sensitive.
const TRUE_TOKENS: [&str; 3] = ["true", "1", "yes"];

/// Whether `raw` is one of the accepted true tokens.
pub fn is_true_token(raw: &str) -> bool {
    TRUE_TOKENS.contains(&raw)
}

/// Builds the typed value for `raw` according to the declared `kind`.
///
/// Kinds that can't be written from a plain string (people, formula,
/// timestamps, unknown tags) fall back to a rich text value.
pub fn encode(kind: &PropertyKind, raw: &str) -> PropertyValue {
    match kind {
        PropertyKind::Title => PropertyValue::Title {
            title: single_run(raw),
        },
        PropertyKind::Number => PropertyValue::Number {
            number: Some(encode_number(raw)),
        },
        PropertyKind::Select => PropertyValue::Select {
            select: Some(SelectOption::named(raw)),
        },
        PropertyKind::Status => PropertyValue::Status {
            status: Some(SelectOption::named(raw)),
        },
        PropertyKind::MultiSelect => PropertyValue::MultiSelect {
            multi_select: raw
                .split(',')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(SelectOption::named)
                .collect(),
        },
        PropertyKind::Date => PropertyValue::Date {
            date: Some(DateRange {
                start: raw.to_string(),
                end: None,
                time_zone: None,
            }),
        },
        PropertyKind::Checkbox => PropertyValue::Checkbox {
            checkbox: is_true_token(raw),
        },
        PropertyKind::Url => PropertyValue::Url {
            url: Some(raw.to_string()),
        },
        PropertyKind::Email => PropertyValue::Email {
            email: Some(raw.to_string()),
        },
        PropertyKind::PhoneNumber => PropertyValue::PhoneNumber {
            phone_number: Some(raw.to_string()),
        },
        PropertyKind::RichText
        | PropertyKind::People
        | PropertyKind::Relation
        | PropertyKind::Formula
        | PropertyKind::Rollup
        | PropertyKind::CreatedTime
        | PropertyKind::LastEditedTime
        | PropertyKind::CreatedBy
        | PropertyKind::LastEditedBy
        | PropertyKind::Other(_) => PropertyValue::RichText {
            rich_text: single_run(raw),
        },
    }
}

/// A relation value pointing at `ids`, in order.
pub fn encode_relation(ids: &[String]) -> PropertyValue {
    PropertyValue::Relation {
        relation: ids.iter().map(|id| RelationRef { id: id.clone() }).collect(),
    }
}

fn encode_number(raw: &str) -> NumberValue {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => NumberValue::Float(n),
        _ => NumberValue::Raw(raw.to_string()),
    }
}

/// The display text for a property value. Empty values decode to `""`.
pub fn decode(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Title { title: runs } | PropertyValue::RichText { rich_text: runs } => {
            concat_plain_text(runs)
        }
        PropertyValue::Number { number } => match number {
            Some(NumberValue::Float(n)) => format_number(*n),
            Some(NumberValue::Raw(raw)) => raw.clone(),
            None => String::new(),
        },
        PropertyValue::Select { select: option } | PropertyValue::Status { status: option } => {
            option.as_ref().map(|o| o.name.clone()).unwrap_or_default()
        }
        PropertyValue::MultiSelect { multi_select } => join(multi_select.iter().map(|o| o.name.as_str())),
        PropertyValue::Date { date } => date.as_ref().map(decode_date).unwrap_or_default(),
        PropertyValue::Checkbox { checkbox } => {
            let mark = if *checkbox { "✓" } else { "✗" };
            mark.to_string()
        }
        PropertyValue::Url { url: text }
        | PropertyValue::Email { email: text }
        | PropertyValue::PhoneNumber { phone_number: text }
        | PropertyValue::CreatedTime { created_time: text }
        | PropertyValue::LastEditedTime {
            last_edited_time: text,
        } => text.clone().unwrap_or_default(),
        PropertyValue::People { people } => join(people.iter().map(UserRef::display_name)),
        PropertyValue::Relation { relation } => join(relation.iter().map(|r| r.id.as_str())),
        PropertyValue::CreatedBy { created_by: user }
        | PropertyValue::LastEditedBy {
            last_edited_by: user,
        } => user
            .as_ref()
            .map(|u| u.display_name().to_string())
            .unwrap_or_default(),
        PropertyValue::Formula { formula } => formula.as_ref().map(decode_formula).unwrap_or_default(),
        PropertyValue::Rollup { rollup } => rollup.as_ref().map(decode_rollup).unwrap_or_default(),
        PropertyValue::Unsupported { .. } => String::new(),
    }
}

/// Shortest round-trip form: `10`, `3.5`, `-0.25`.
fn format_number(n: f64) -> String {
    format!("{}", n)
}

fn decode_date(date: &DateRange) -> String {
    match date.end.as_deref() {
        Some(end) if !end.is_empty() => format!("{}{}{}", date.start, DATE_RANGE_SEPARATOR, end),
        _ => date.start.clone(),
    }
}

fn decode_formula(formula: &FormulaValue) -> String {
    match formula {
        FormulaValue::String(text) => text.clone().unwrap_or_default(),
        FormulaValue::Number(number) => number.map(format_number).unwrap_or_default(),
        FormulaValue::Boolean(flag) => flag.map(|b| b.to_string()).unwrap_or_default(),
        FormulaValue::Date(date) => date.as_ref().map(decode_date).unwrap_or_default(),
        FormulaValue::Unsupported(_) => String::new(),
    }
}

fn decode_rollup(rollup: &RollupValue) -> String {
    match rollup {
        RollupValue::Number(number) => number.map(format_number).unwrap_or_default(),
        RollupValue::Date(date) => date.as_ref().map(decode_date).unwrap_or_default(),
        RollupValue::Array(items) => {
            let decoded: Vec<String> = items.iter().map(decode).collect();
            decoded.join(LIST_SEPARATOR)
        }
        RollupValue::Unsupported(_) => String::new(),
    }
}

fn join<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(LIST_SEPARATOR)
}
