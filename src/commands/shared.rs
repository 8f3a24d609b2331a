// src/commands/shared.rs
//! Pieces several commands share: `key=value` arguments, list fetching and
//! the "created" summary.

use super::Session;
use crate::api::{collect_all, PaginatedResponse};
use crate::config::PageFlags;
use crate::error::{AppError, Result};
use crate::formatting::properties::encode;
use crate::model::{PropertySchema, PropertyValue};
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::future::Future;

/// Splits `key=value` on the first `=`. The value may itself contain `=`.
pub fn parse_assignment(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .ok_or_else(|| AppError::InvalidPropertyFormat(arg.to_string()))
}

/// Encodes every `key=value` argument by the key's declared kind.
pub(crate) fn encode_assignments<S: AsRef<str>>(
    args: &[S],
    schema: &PropertySchema,
) -> Result<IndexMap<String, PropertyValue>> {
    let mut properties = IndexMap::new();
    for arg in args {
        let (key, raw) = parse_assignment(arg.as_ref())?;
        let kind = schema.require(key)?;
        properties.insert(key.to_string(), encode(kind, raw));
    }
    Ok(properties)
}

/// `Name:type,Other:type` into `{"Name": {"type": {}}, ...}`. Entries
/// without a `:` are skipped.
pub(crate) fn property_definitions(columns: &str) -> serde_json::Map<String, Value> {
    columns
        .split(',')
        .filter_map(|entry| entry.trim().split_once(':'))
        .map(|(name, kind)| (name.trim().to_string(), json!({ kind.trim(): {} })))
        .collect()
}

/// What a list command fetched.
pub(crate) struct Listing {
    /// The untouched first page, kept when only one page was requested.
    pub raw: Option<Value>,
    pub results: Vec<Value>,
    pub next_cursor: Option<String>,
}

impl Listing {
    /// The raw page when there is one, else `{"results": [...]}`.
    pub fn to_json(&self) -> Value {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => json!({ "results": self.results }),
        }
    }
}

/// One page from `--cursor` without `--all`; every page from `--cursor`
/// onwards with it.
pub(crate) async fn fetch_listing<F, Fut>(paging: &PageFlags, mut fetch: F) -> Result<Listing>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let start = paging.cursor.clone().filter(|c| !c.is_empty());

    if !paging.all {
        let raw = fetch(start).await?;
        let page = PaginatedResponse::<Value>::from_value(&raw)?;
        let next_cursor = page.next_cursor.filter(|_| page.has_more);
        return Ok(Listing {
            results: page.results,
            next_cursor,
            raw: Some(raw),
        });
    }

    let results = collect_all(
        |cursor| {
            let page = fetch(cursor);
            async move { PaginatedResponse::<Value>::from_value(&page.await?) }
        },
        start.as_deref(),
        false,
    )
    .await?;
    Ok(Listing {
        raw: None,
        results,
        next_cursor: None,
    })
}

/// Tells the user how to fetch the next page, if there is one.
pub(crate) fn hint_next_page(session: &mut Session<'_>, next_cursor: Option<&str>) -> Result<()> {
    match next_cursor {
        Some(cursor) => session
            .out
            .subtitle(&format!("\nMore results available. Use --cursor {}", cursor)),
        None => Ok(()),
    }
}

/// A string field of a raw object, or `""`.
pub(crate) fn str_field<'v>(value: &'v Value, key: &str) -> &'v str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Prints the raw response under `--format json`, else `✓ <title>` with
/// the new object's ID and URL.
pub(crate) fn report_created(session: &mut Session<'_>, title: &str, response: &Value) -> Result<()> {
    if session.is_json() {
        return session.out.json(response);
    }
    session.out.title("✓", title)?;
    session.out.field("ID", str_field(response, "id"))?;
    let url = str_field(response, "url");
    if !url.is_empty() {
        session.out.field("URL", url)?;
    }
    Ok(())
}

/// Prints the raw response under `--format json`, else a one-line
/// confirmation.
pub(crate) fn report_done(session: &mut Session<'_>, message: &str, response: &Value) -> Result<()> {
    if session.is_json() {
        session.out.json(response)
    } else {
        session.out.line(message)
    }
}
